use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use voxrelay_transcription::StreamingSession;

use crate::state::AppState;

/// Accepts the WebSocket handshake. The session leaves `Connecting`
/// only once the upgrade completes.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs one streaming session over its whole lifetime.
///
/// Chunks are handled strictly in arrival order: the recognition call
/// and the emission for chunk *n* are awaited before chunk *n+1* is
/// read off the socket. All state is local to this task; the cleanup
/// tail below runs on every exit path.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let mut session = StreamingSession::new();
    if let Err(e) = session.open() {
        warn!(%connection_id, %e, "Session failed to open");
        return;
    }
    info!(%connection_id, "Client connected");

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Binary(chunk)) => {
                // Each chunk is an independent recognition unit.
                let result = match state
                    .recognizer
                    .recognize(chunk.to_vec(), &state.stream_config)
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(%connection_id, %e, "Recognition failed, closing session");
                        break;
                    }
                };

                match session.process_chunk(&result) {
                    Ok(Some(text)) => {
                        debug!(%connection_id, text = %text.trim_start(), "Transcribed chunk");
                        if socket.send(Message::Text(text.into())).await.is_err() {
                            // Peer went away mid-emission.
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(%connection_id, %e, "Session rejected chunk");
                        break;
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Err(e) => {
                warn!(%connection_id, %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup tail: normal close, peer-initiated close, and error paths
    // all land here. The socket is dropped with the task.
    session.close();
    info!(%connection_id, "Client disconnected");
}
