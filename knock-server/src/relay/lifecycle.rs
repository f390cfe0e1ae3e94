use crate::directory::ConnectionEntry;
use crate::error::RelayError;
use crate::relay::Relay;
use crate::room::Room;
use chrono::Utc;
use knock_core::{ConnectionId, Profile, Role, RoomToken, ServerSignal};
use tracing::{debug, info, warn};

impl Relay {
    pub(crate) async fn join(
        &mut self,
        conn: ConnectionId,
        room_id: RoomToken,
        role: Role,
        profile: Profile,
    ) -> Result<(), RelayError> {
        self.release_previous_binding(conn, &room_id, role).await;

        let ring_host = match role {
            Role::Host => {
                self.registry
                    .create_or_replace_host(room_id.clone(), conn, profile.clone());
                info!("Host {} opened room {}", conn, room_id);
                None
            }

            Role::Guest => {
                let attached = self
                    .registry
                    .attach_guest(&room_id, conn, profile.clone())
                    .map(|room| room.host);

                match attached {
                    Ok(host) => {
                        info!(
                            "Guest {} ({}) rings room {}",
                            conn,
                            profile.display_name().unwrap_or("anonymous"),
                            room_id
                        );
                        Some(host)
                    }
                    Err(e @ RelayError::RoomNotFound(_)) => {
                        let reply = ServerSignal::error(e.to_string());
                        if let Err(send_err) = self.directory.send(conn, reply).await {
                            warn!("Could not report failed join to {}: {}", conn, send_err);
                        }
                        return Err(e);
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let entry = ConnectionEntry {
            room: room_id.clone(),
            role,
            profile: profile.clone(),
        };
        self.directory.record(conn, entry);

        match ring_host {
            Some(host) => self.notify_ring(host, profile, room_id, Utc::now()).await,
            None => Ok(()),
        }
    }

    /// Transport-detected teardown. Unconditional and idempotent.
    pub(crate) async fn disconnect(&mut self, conn: ConnectionId) {
        self.directory.forget(conn);

        let Some(room) = self.registry.find_by_connection(conn).cloned() else {
            debug!("Connection {} left without a room", conn);
            return;
        };

        self.close_room(conn, &room).await;
        info!(
            "Connection {} dropped, room {} closed ({})",
            conn, room.token, room.status
        );
    }

    /// A connection is bound to at most one room. Joining any other room, or
    /// the same room in the other role, ends the call it was part of.
    async fn release_previous_binding(&mut self, conn: ConnectionId, room_id: &RoomToken, role: Role) {
        if let Some(previous) = self.directory.forget(conn) {
            debug!(
                "Connection {} re-joins, leaving {} as {}",
                conn, previous.room, previous.role
            );
        }

        let Some(bound) = self.registry.find_by_connection(conn).cloned() else {
            return;
        };
        if bound.token == *room_id && bound.role_of(conn) == Some(role) {
            return;
        }

        self.close_room(conn, &bound).await;
        info!(
            "Connection {} moved to room {}, room {} closed ({})",
            conn, room_id, bound.token, bound.status
        );
    }

    async fn close_room(&mut self, leaver: ConnectionId, room: &Room) {
        if let Some(peer) = room.counterpart(leaver) {
            if let Err(e) = self.directory.send(peer, ServerSignal::CallEnded).await {
                warn!("Could not tell {} that room {} ended: {}", peer, room.token, e);
            }
        }
        self.registry.remove(&room.token);
    }
}
