//! UseCase: ルーム一覧 / 詳細の取得

use std::sync::Arc;

use crate::domain::{Room, RoomCode, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }

    pub async fn count(&self) -> usize {
        self.repository.count_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, code: String) -> Result<Room, GetRoomDetailError> {
        let code = RoomCode::try_from(code).map_err(|_| GetRoomDetailError::InvalidRoomCode)?;
        self.repository
            .get_room(&code)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ConnectionId, infrastructure::repository::InMemoryRoomRepository};
    use duelroom_shared::time::SystemClock;

    async fn create_repository_with_room() -> Arc<InMemoryRoomRepository> {
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock)));
        repository
            .join(
                RoomCode::new("ABCDE".to_string()).unwrap(),
                ConnectionId::new("alice".to_string()).unwrap(),
            )
            .await
            .unwrap();
        repository
    }

    #[tokio::test]
    async fn test_get_rooms() {
        // テスト項目: 存在する Room の一覧と数が取得できる
        // given (前提条件):
        let usecase = GetRoomsUseCase::new(create_repository_with_room().await);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].code.as_str(), "ABCDE");
        assert_eq!(usecase.count().await, 1);
    }

    #[tokio::test]
    async fn test_get_room_detail() {
        // テスト項目: コード指定で Room を取得でき、不正 / 未使用コードはエラーになる
        // given (前提条件):
        let usecase = GetRoomDetailUseCase::new(create_repository_with_room().await);

        // when (操作):
        let found = usecase.execute("ABCDE".to_string()).await;
        let missing = usecase.execute("ZZZZZ".to_string()).await;
        let invalid = usecase.execute("bad!".to_string()).await;

        // then (期待する結果):
        assert_eq!(found.unwrap().member_count(), 1);
        assert_eq!(missing.unwrap_err(), GetRoomDetailError::RoomNotFound);
        assert_eq!(invalid.unwrap_err(), GetRoomDetailError::InvalidRoomCode);
    }
}
