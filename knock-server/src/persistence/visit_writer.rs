use crate::persistence::{VisitRecord, VisitRecorder};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// One-way outbox for visit records. Pushing never blocks the relay loop.
#[derive(Clone)]
pub struct VisitQueue {
    tx: mpsc::UnboundedSender<VisitRecord>,
}

impl VisitQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<VisitRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Creates the queue and spawns its [`VisitWriter`].
    pub fn spawn(recorder: Arc<dyn VisitRecorder>) -> Self {
        let (queue, rx) = Self::new();
        tokio::spawn(VisitWriter::new(rx, recorder).run());
        queue
    }

    pub fn record(&self, record: VisitRecord) {
        if let Err(e) = self.tx.send(record) {
            error!(
                "Visit writer stopped, dropping {:?} record for room {}",
                e.0.outcome, e.0.room_id
            );
        }
    }
}

/// Drains the queue. Each write runs on its own task; writes are unordered.
pub struct VisitWriter {
    rx: mpsc::UnboundedReceiver<VisitRecord>,
    recorder: Arc<dyn VisitRecorder>,
}

impl VisitWriter {
    pub fn new(rx: mpsc::UnboundedReceiver<VisitRecord>, recorder: Arc<dyn VisitRecorder>) -> Self {
        Self { rx, recorder }
    }

    pub async fn run(mut self) {
        while let Some(record) = self.rx.recv().await {
            let recorder = Arc::clone(&self.recorder);
            tokio::spawn(async move {
                let room = record.room_id.clone();
                if let Err(e) = recorder.create_visit_record(record).await {
                    error!("Visit for room {} lost: {}", room, e);
                }
            });
        }

        info!("Visit writer finished");
    }
}
