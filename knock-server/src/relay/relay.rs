use crate::config::RelayConfig;
use crate::directory::ConnectionDirectory;
use crate::error::RelayError;
use crate::persistence::VisitQueue;
use crate::relay::{RelayCommand, RelayStats};
use crate::room::RoomRegistry;
use crate::signaling::SignalingOutput;
use knock_core::{ClientSignal, ConnectionId, RoomToken};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{info, warn};

/// The single writer of call state.
///
/// Every join, control frame, disconnect and sweep runs to completion here
/// before the next one is taken, so the registry and directory need no locks.
pub struct Relay {
    pub(crate) registry: Box<dyn RoomRegistry>,
    pub(crate) directory: ConnectionDirectory,
    pub(crate) visits: VisitQueue,
    command_rx: mpsc::Receiver<RelayCommand>,
    sweep_interval: Duration,
}

impl Relay {
    pub fn new(
        registry: Box<dyn RoomRegistry>,
        command_rx: mpsc::Receiver<RelayCommand>,
        output: Arc<dyn SignalingOutput>,
        visits: VisitQueue,
        sweep_interval: Duration,
    ) -> Self {
        let sweep_interval = if sweep_interval.is_zero() {
            let fallback = RelayConfig::default().sweep_interval;
            warn!("Zero sweep interval, using {:?}", fallback);
            fallback
        } else {
            sweep_interval
        };

        Self {
            registry,
            directory: ConnectionDirectory::new(output),
            visits,
            command_rx,
            sweep_interval,
        }
    }

    pub async fn run(mut self) {
        info!(
            "Relay event loop started (sweep every {:?})",
            self.sweep_interval
        );

        let mut sweep = interval_at(
            Instant::now() + self.sweep_interval,
            self.sweep_interval,
        );
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Shutting down relay.");
                            break;
                        }
                    }
                }

                _ = sweep.tick() => {
                    self.sweep_orphans().await;
                }
            }
        }

        info!("Relay event loop finished");
    }

    async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Signal { conn, signal } => {
                if let Err(e) = self.dispatch(conn, signal).await {
                    warn!("Signal from {} not applied: {}", conn, e);
                }
            }

            RelayCommand::Disconnect { conn } => {
                self.disconnect(conn).await;
            }

            RelayCommand::Inspect { room, reply } => {
                let _ = reply.send(self.registry.get(&room).cloned());
            }

            RelayCommand::Stats { reply } => {
                let _ = reply.send(RelayStats {
                    rooms: self.registry.len(),
                    joined_connections: self.directory.len(),
                });
            }
        }
    }

    async fn dispatch(&mut self, conn: ConnectionId, signal: ClientSignal) -> Result<(), RelayError> {
        match signal {
            ClientSignal::Join {
                room_id,
                role,
                profile,
            } => self.join(conn, room_id, role, profile).await,

            ClientSignal::Offer { room_id, offer } => self.relay_offer(&room_id, offer, conn).await,

            ClientSignal::Answer { answer, to } => {
                let to = self.target_or_counterpart(conn, to)?;
                self.relay_answer(answer, to).await
            }

            ClientSignal::IceCandidate { candidate, to } => {
                let to = self.target_or_counterpart(conn, to)?;
                self.relay_ice_candidate(candidate, to, conn).await
            }

            ClientSignal::AcceptCall { room_id } => {
                let room = self.joined_room(conn, room_id)?;
                self.accept_call(&room).await
            }

            ClientSignal::RejectCall { room_id } => {
                let room = self.joined_room(conn, room_id)?;
                self.reject_call(&room).await
            }

            ClientSignal::EndCall { room_id } => {
                let room = self.joined_room(conn, room_id)?;
                self.end_call(&room).await
            }

            ClientSignal::LeaveMessage {
                room_id,
                name,
                message,
            } => self.leave_message(&room_id, name, message).await,

            ClientSignal::ToggleCamera { room_id, enabled } => {
                let room = self.joined_room(conn, room_id)?;
                let from_role = self
                    .directory
                    .get(conn)
                    .map(|entry| entry.role)
                    .ok_or(RelayError::NotJoined(conn))?;
                self.toggle_camera(&room, enabled, from_role).await
            }
        }
    }

    /// Explicit room from the frame, else the room the sender joined, as long
    /// as that room still binds the sender. A token reopened by a new host does
    /// not belong to connections from the earlier call.
    fn joined_room(
        &self,
        conn: ConnectionId,
        explicit: Option<RoomToken>,
    ) -> Result<RoomToken, RelayError> {
        if let Some(room) = explicit {
            return Ok(room);
        }

        let entry = self.directory.get(conn).ok_or(RelayError::NotJoined(conn))?;
        match self.registry.get(&entry.room) {
            Some(room) if room.involves(conn) => Ok(entry.room.clone()),
            _ => Err(RelayError::NotJoined(conn)),
        }
    }

    fn target_or_counterpart(
        &self,
        conn: ConnectionId,
        to: Option<ConnectionId>,
    ) -> Result<ConnectionId, RelayError> {
        if let Some(to) = to {
            return Ok(to);
        }

        let token = self.joined_room(conn, None)?;
        self.registry
            .get(&token)
            .and_then(|room| room.counterpart(conn))
            .ok_or(RelayError::NoGuestBound(token))
    }
}
