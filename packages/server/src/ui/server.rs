//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use duelroom_shared::time::{Clock, SystemClock};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{MessagePusher, RoomRepository},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    usecase::{GetRoomDetailUseCase, GetRoomsUseCase, SessionUseCases},
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Matchmaking and relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::in_memory(None);
/// server.run("0.0.0.0".to_string(), 8765).await?;
/// ```
pub struct Server {
    /// 接続セッションが使うユースケース一式
    session_usecases: SessionUseCases,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// ready ハンドシェイクの期限
    ready_timeout: Option<Duration>,
}

impl Server {
    /// Create a new Server instance from its collaborators
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        ready_timeout: Option<Duration>,
    ) -> Self {
        Self {
            session_usecases: SessionUseCases::new(repository.clone(), message_pusher),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            ready_timeout,
        }
    }

    /// Create a server backed by the in-memory registry and WebSocket pusher
    pub fn in_memory(ready_timeout: Option<Duration>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let repository = Arc::new(InMemoryRoomRepository::new(clock));
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        Self::new(repository, message_pusher, ready_timeout)
    }

    /// Build the router without binding
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            session_usecases: self.session_usecases,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            ready_timeout: self.ready_timeout,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/", get(websocket_handler))
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{code}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to `host:port` and serve until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Duelroom server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
