use crate::error::RelayError;
use crate::persistence::{VisitOutcome, VisitRecord};
use crate::relay::Relay;
use crate::room::{CallStatus, Room};
use chrono::{DateTime, Utc};
use knock_core::{ConnectionId, Profile, Role, RoomToken, ServerSignal};
use serde_json::Value;
use tracing::{debug, info};

impl Relay {
    pub(crate) async fn notify_ring(
        &self,
        host: ConnectionId,
        guest_profile: Profile,
        room_id: RoomToken,
        timestamp: DateTime<Utc>,
    ) -> Result<(), RelayError> {
        let msg = ServerSignal::Ring {
            guest_profile,
            room_id,
            timestamp,
        };
        self.directory.send(host, msg).await
    }

    pub(crate) async fn relay_offer(
        &self,
        room_id: &RoomToken,
        offer: Value,
        from: ConnectionId,
    ) -> Result<(), RelayError> {
        let room = self.room(room_id)?;
        let msg = ServerSignal::Offer {
            offer,
            from,
            guest_profile: room.guest_profile_or_default(),
        };
        self.directory.send(room.host, msg).await
    }

    pub(crate) async fn relay_answer(
        &self,
        answer: Value,
        to: ConnectionId,
    ) -> Result<(), RelayError> {
        self.directory
            .send(to, ServerSignal::Answer { answer })
            .await
    }

    /// No sequencing beyond transport order.
    pub(crate) async fn relay_ice_candidate(
        &self,
        candidate: Value,
        to: ConnectionId,
        from: ConnectionId,
    ) -> Result<(), RelayError> {
        self.directory
            .send(to, ServerSignal::IceCandidate { candidate, from })
            .await
    }

    pub(crate) async fn accept_call(&mut self, room_id: &RoomToken) -> Result<(), RelayError> {
        let room = self.room(room_id)?;
        let guest = room
            .guest
            .ok_or_else(|| RelayError::NoGuestBound(room_id.clone()))?;
        let guest_profile = room.guest_profile_or_default();

        self.registry.transition(room_id, CallStatus::Connected)?;
        self.visits.record(VisitRecord::call(
            room_id.clone(),
            guest_profile,
            VisitOutcome::Accepted,
            Utc::now(),
        ));
        info!("Room {} connected", room_id);

        self.directory.send(guest, ServerSignal::CallAccepted).await
    }

    pub(crate) async fn reject_call(&mut self, room_id: &RoomToken) -> Result<(), RelayError> {
        let room = self.room(room_id)?;
        let guest = room
            .guest
            .ok_or_else(|| RelayError::NoGuestBound(room_id.clone()))?;
        let guest_profile = room.guest_profile_or_default();

        self.registry.remove(room_id);
        self.visits.record(VisitRecord::call(
            room_id.clone(),
            guest_profile,
            VisitOutcome::Rejected,
            Utc::now(),
        ));
        info!("Room {} rejected its caller", room_id);

        self.directory.send(guest, ServerSignal::CallRejected).await
    }

    /// Repeated calls after removal do nothing.
    pub(crate) async fn end_call(&mut self, room_id: &RoomToken) -> Result<(), RelayError> {
        let Some(room) = self.registry.remove(room_id) else {
            debug!("end-call for absent room {}", room_id);
            return Ok(());
        };

        let delivered = self.directory.broadcast(&room, ServerSignal::CallEnded).await;
        match room.connected_at {
            Some(since) => info!(
                "Room {} ended after {}s ({} notified)",
                room_id,
                (Utc::now() - since).num_seconds(),
                delivered
            ),
            None => info!("Room {} ended while {} ({} notified)", room_id, room.status, delivered),
        }
        Ok(())
    }

    /// Recorded even when the host is away; pushed live only if the host is bound.
    pub(crate) async fn leave_message(
        &self,
        room_id: &RoomToken,
        name: String,
        message: String,
    ) -> Result<(), RelayError> {
        let timestamp = Utc::now();
        self.visits.record(VisitRecord::message_left(
            room_id.clone(),
            Profile::named(name.clone()),
            message.clone(),
            timestamp,
        ));

        let Some(room) = self.registry.get(room_id) else {
            debug!("Message left for room {} with no host online", room_id);
            return Ok(());
        };

        let msg = ServerSignal::NewMessage {
            name,
            message,
            timestamp,
        };
        self.directory.send(room.host, msg).await
    }

    pub(crate) async fn toggle_camera(
        &self,
        room_id: &RoomToken,
        enabled: bool,
        from_role: Role,
    ) -> Result<(), RelayError> {
        let room = self.room(room_id)?;
        let target = room
            .connection_for(from_role.opposite())
            .ok_or_else(|| RelayError::NoGuestBound(room_id.clone()))?;

        self.directory
            .send(target, ServerSignal::CameraToggled { enabled })
            .await
    }

    fn room(&self, room_id: &RoomToken) -> Result<&Room, RelayError> {
        self.registry
            .get(room_id)
            .ok_or_else(|| RelayError::RoomNotFound(room_id.clone()))
    }
}
