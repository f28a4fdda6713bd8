//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle, time::Instant};

use crate::{
    domain::ConnectionId,
    ui::state::AppState,
    usecase::{SessionControl, SessionHandler},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the rx channel into the WebSocket sender.
///
/// Messages pushed for this connection (by its own session or its peer's) are
/// written in enqueue order. The task finishes once every sender handle has been
/// dropped, handing the sink back so a close frame can follow the queued messages.
/// Returns `None` if a write fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<Option<SplitSink<WebSocket, Message>>> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return None;
            }
        }
        Some(sender)
    })
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let usecases = state.session_usecases.clone();

    let (tx, rx) = mpsc::unbounded_channel();
    usecases
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut session = SessionHandler::new(connection_id.clone(), usecases, state.ready_timeout);
    let mut outbound_closed = false;

    let violation = loop {
        let deadline = session.ready_deadline();
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = wait_for_deadline(deadline) => {
                match session.handle_ready_timeout().await {
                    SessionControl::Close(reason) => break Some(reason),
                    SessionControl::Continue => continue,
                }
            }
            _ = &mut send_task => {
                tracing::warn!("Connection '{}': outbound stream failed", connection_id);
                outbound_closed = true;
                break None;
            }
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("Connection '{}' closed abnormally: {}", connection_id, e);
                break None;
            }
            None => {
                tracing::warn!("Connection '{}' dropped without close frame", connection_id);
                break None;
            }
        };

        match msg {
            Message::Text(text) => {
                if let SessionControl::Close(reason) = session.handle_text(text.as_str()).await {
                    break Some(reason);
                }
            }
            Message::Binary(_) => {
                tracing::debug!("Ignoring binary frame from '{}'", connection_id);
            }
            Message::Close(frame) => {
                tracing::info!(
                    "Connection '{}' closed by client: {:?}",
                    connection_id,
                    frame
                );
                break None;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
        }
    };

    session.close().await;
    state
        .session_usecases
        .message_pusher
        .unregister_client(&connection_id)
        .await;

    if !outbound_closed {
        // unregister で送信側が閉じたので、キュー済みのメッセージを送り切ってから終了する
        match send_task.await {
            Ok(Some(mut sender)) => {
                if let Some(reason) = violation {
                    let frame = CloseFrame {
                        code: close_code::POLICY,
                        reason: Utf8Bytes::from_static(reason),
                    };
                    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
                        tracing::debug!(
                            "Failed to send close frame to '{}': {}",
                            connection_id,
                            e
                        );
                    }
                }
                let _ = sender.close().await;
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Pusher task for '{}' failed: {}", connection_id, e),
        }
    }

    tracing::info!("Connection '{}' closed", connection_id);
}
