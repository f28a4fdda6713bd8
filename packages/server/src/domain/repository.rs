//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, JoinedRoom, LeaveOutcome, RepositoryError, Room, RoomCode, RoomGuard};

/// Room Repository trait（ルームコード → Room のプロセス内レジストリ）
///
/// ## 原子性
///
/// - `join`: 検索・作成とメンバー追加を 1 つの操作として行う。
///   同じコードに対して 2 つの参加が同時に「作成」を観測することはない。
///   空の Room がレジストリに残ることはない
/// - `leave`: メンバー削除と、空になった Room の削除を 1 つの操作として行う
/// - `remove`: メンバーが残っている Room は削除しない
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room に参加する（存在しなければ作成する）
    ///
    /// Room のロックを保持したまま返す。呼び出し側は参加の通知（success / role）を
    /// enqueue し終えるまでガードを保持し、その後に解放する。
    async fn join(
        &self,
        code: RoomCode,
        connection_id: ConnectionId,
    ) -> Result<(JoinedRoom, RoomGuard), RepositoryError>;

    /// Room から離脱し、空になった場合は Room を削除する
    async fn leave(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, RepositoryError>;

    /// 空の Room を削除する
    async fn remove(&self, code: &RoomCode) -> Result<(), RepositoryError>;

    /// Room のスナップショットを取得
    async fn get_room(&self, code: &RoomCode) -> Option<Room>;

    /// 全 Room のスナップショットを取得
    async fn get_rooms(&self) -> Vec<Room>;

    /// 存在する Room の数を取得
    async fn count_rooms(&self) -> usize;
}
