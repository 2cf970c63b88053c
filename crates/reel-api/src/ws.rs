//! WebSocket progress streaming.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use reel_models::{JobId, JobState, WsMessage};

use crate::state::AppState;

/// GET /ws/jobs/:job_id
///
/// Stream a job's progress events until it settles. Clients that connect
/// after the job already settled receive the terminal event immediately.
pub async fn ws_job_progress(
    ws: WebSocketUpgrade,
    Path(job_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_job_socket(socket, state, job_id))
}

async fn handle_job_socket(mut socket: WebSocket, state: AppState, job_id: String) {
    let job_id = JobId::from_string(job_id);

    let Some(mut events) = state.jobs.subscribe(&job_id).await else {
        let error = WsMessage::error("Job not found");
        let _ = send(&mut socket, &error).await;
        return;
    };

    // A job that settled before this client connected gets its terminal
    // event replayed from the record.
    if let Some(job) = state.jobs.get(&job_id).await {
        match job.state {
            JobState::Completed => {
                let output = job.output_path.unwrap_or_default();
                let _ = send(&mut socket, &WsMessage::done(output)).await;
                return;
            }
            JobState::Failed => {
                let message = job.error_message.unwrap_or_else(|| "Job failed".to_string());
                let _ = send(&mut socket, &WsMessage::error(message)).await;
                return;
            }
            JobState::Pending | JobState::Processing => {}
        }
    }

    loop {
        match events.recv().await {
            Ok(message) => {
                let terminal = message.is_terminal();
                if !send(&mut socket, &message).await {
                    debug!(job_id = %job_id, "Progress socket closed by client");
                    break;
                }
                if terminal {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(job_id = %job_id, skipped, "Progress subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    let _ = socket.close().await;
}

/// Serialize and send one message; false when the client is gone.
async fn send(socket: &mut WebSocket, message: &WsMessage) -> bool {
    let Ok(json) = serde_json::to_string(message) else {
        return false;
    };
    socket.send(Message::Text(json)).await.is_ok()
}
