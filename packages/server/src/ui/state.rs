//! Server state shared by every handler.

use std::{sync::Arc, time::Duration};

use crate::usecase::{GetRoomDetailUseCase, GetRoomsUseCase, SessionUseCases};

/// Shared application state
pub struct AppState {
    /// 接続セッションが使うユースケース一式
    pub session_usecases: SessionUseCases,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// ready ハンドシェイクの期限（None なら無期限）
    pub ready_timeout: Option<Duration>,
}
