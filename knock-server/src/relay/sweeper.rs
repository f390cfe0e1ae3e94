use crate::relay::Relay;
use tracing::{debug, info};

impl Relay {
    /// Drops rooms whose host session the transport no longer knows.
    /// Nobody is notified: the host is unreachable by definition.
    pub(crate) async fn sweep_orphans(&mut self) -> usize {
        let mut removed = 0;

        for (token, host) in self.registry.host_bindings() {
            if self.directory.is_live(host).await {
                continue;
            }
            if self.registry.remove(&token).is_some() {
                info!("Swept orphan room {} (host {} gone)", token, host);
                removed += 1;
            }
        }

        debug!(
            "Orphan sweep removed {} rooms, {} remain",
            removed,
            self.registry.len()
        );
        removed
    }
}
