//! Conversion logic between DTOs and domain entities.

use duelroom_shared::time::timestamp_to_rfc3339;

use crate::domain::entity::Room;
use crate::infrastructure::dto::http::RoomSummaryDto;

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.to_string(),
            members: room.member_count(),
            ready: room.ready_count(),
            roles_assigned: room.roles.is_some(),
            started: room.started,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, RoomCode, Timestamp};

    #[test]
    fn test_room_to_summary_dto() {
        // テスト項目: Room エンティティが RoomSummaryDto に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomCode::new("ABCDE".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );
        room.join(ConnectionId::new("alice".to_string()).unwrap())
            .unwrap();
        room.join(ConnectionId::new("bob".to_string()).unwrap())
            .unwrap();
        room.mark_ready(&ConnectionId::new("alice".to_string()).unwrap(), "alice")
            .unwrap();

        // when (操作):
        let dto = RoomSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(
            dto,
            RoomSummaryDto {
                code: "ABCDE".to_string(),
                members: 2,
                ready: 1,
                roles_assigned: true,
                started: false,
                created_at: "2023-01-01T00:00:00.000Z".to_string(),
            }
        );
    }
}
