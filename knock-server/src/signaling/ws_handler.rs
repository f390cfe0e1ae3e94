use crate::signaling::SignalingService;
use knock_core::{ClientSignal, ConnectionId, ServerSignal};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, timeout};
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let conn = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, conn, service))
}

async fn handle_socket(socket: WebSocket, conn: ConnectionId, service: SignalingService) {
    info!("New WebSocket connection: {}", conn);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let heartbeat = service.heartbeat();

    service.add_peer(conn, tx);
    if let Err(e) = service.send_signal(conn, &ServerSignal::Welcome { connection_id: conn }) {
        warn!("Could not greet {}: {}", conn, e);
    }

    let mut send_task = tokio::spawn(async move {
        let mut ping = interval_at(Instant::now() + heartbeat.interval, heartbeat.interval);

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(msg).await.is_err() {
                        break;
                    }
                }
                _ = ping.tick() => {
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            loop {
                let next = match timeout(heartbeat.idle_timeout, receiver.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        info!(
                            "Connection {} silent for {:?}, closing",
                            conn, heartbeat.idle_timeout
                        );
                        break;
                    }
                };

                let msg = match next {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        warn!("WebSocket error on {}: {}", conn, e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientSignal>(&text) {
                        Ok(signal) => {
                            if let Err(e) = service.relay().signal(conn, signal).await {
                                error!("Relay died: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid ClientSignal from {}: {}", conn, e);
                            let reply = ServerSignal::error(format!("malformed frame: {e}"));
                            if let Err(e) = service.send_signal(conn, &reply) {
                                warn!("Could not report malformed frame to {}: {}", conn, e);
                            }
                        }
                    },
                    Message::Close(_) => break,
                    Message::Pong(_) => debug!("Pong from {}", conn),
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&conn);
    if let Err(e) = service.relay().disconnect(conn).await {
        error!("Disconnect of {} not delivered: {}", conn, e);
    }
    info!("WebSocket disconnected: {}", conn);
}
