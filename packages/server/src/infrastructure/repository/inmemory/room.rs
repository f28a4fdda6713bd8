//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をプロセス内のルームレジストリとして使用します。
//!
//! ## ロック
//!
//! - レジストリ全体のロックは参加（検索・作成 + メンバー追加）と
//!   離脱（メンバー削除 + 空 Room の削除）の間だけ保持する
//! - ready や中継は Room 単位のロックのみを使うため、無関係な Room 同士は直列化されない
//! - ロックの取得順は常に「レジストリ → Room」
//! - 参加は Room のロックを保持したまま返し、呼び出し側が通知を enqueue してから解放する

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use duelroom_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, JoinedRoom, LeaveOutcome, RepositoryError, Room, RoomCode, RoomGuard,
    RoomRepository, SharedRoom, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ルームコード → Room
    rooms: Mutex<HashMap<RoomCode, SharedRoom>>,
    /// Room の作成時刻に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// ロック済みのレジストリから Room を取得、無ければ空の Room を作成する（作成した場合 true）
    ///
    /// 作成された Room は空なので、レジストリのロックを解放する前にメンバーを追加すること。
    fn lookup_or_create_locked(
        &self,
        rooms: &mut HashMap<RoomCode, SharedRoom>,
        code: RoomCode,
    ) -> (SharedRoom, bool) {
        match rooms.entry(code) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let room = Room::new(entry.key().clone(), Timestamp::new(self.clock.now_millis()));
                let room = Arc::new(Mutex::new(room));
                tracing::debug!("Room '{}' created in registry", entry.key());
                entry.insert(room.clone());
                (room, true)
            }
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(
        &self,
        code: RoomCode,
        connection_id: ConnectionId,
    ) -> Result<(JoinedRoom, RoomGuard), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let (room, created) = self.lookup_or_create_locked(&mut rooms, code.clone());

        let mut guard = room.clone().lock_owned().await;
        let roles = match guard.join(connection_id) {
            Ok(roles) => roles,
            Err(e) => {
                // 作成直後の Room への参加に失敗した場合、空の Room を残さない
                if guard.is_empty() {
                    rooms.remove(&code);
                }
                return Err(e.into());
            }
        };

        let joined = JoinedRoom {
            code,
            room,
            created,
            roles,
        };
        Ok((joined, guard))
    }

    async fn leave(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(code.to_string()))?;

        let mut guard = room.lock().await;
        if !guard.leave(connection_id) {
            return Ok(LeaveOutcome::NotAMember);
        }
        if !guard.is_empty() {
            return Ok(LeaveOutcome::MemberRemoved {
                remaining: guard.member_count(),
            });
        }
        drop(guard);

        rooms.remove(code);
        tracing::debug!("Room '{}' removed from registry", code);
        Ok(LeaveOutcome::RoomDeleted)
    }

    async fn remove(&self, code: &RoomCode) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(code.to_string()))?;

        let is_empty = room.lock().await.is_empty();
        if !is_empty {
            return Err(RepositoryError::RoomNotEmpty(code.to_string()));
        }

        rooms.remove(code);
        Ok(())
    }

    async fn get_room(&self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.lock().await.get(code).cloned()?;
        let snapshot = room.lock().await.clone();
        Some(snapshot)
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let shared: Vec<SharedRoom> = self.rooms.lock().await.values().cloned().collect();

        let mut snapshots = Vec::with_capacity(shared.len());
        for room in shared {
            snapshots.push(room.lock().await.clone());
        }
        snapshots.sort_by(|a, b| a.code.cmp(&b.code));
        snapshots
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
