use crate::error::RelayError;
use crate::persistence::VisitRecord;
use async_trait::async_trait;
use tracing::info;

/// Visit-history collaborator. Called off the relay loop; failures never
/// affect call state.
#[async_trait]
pub trait VisitRecorder: Send + Sync {
    async fn create_visit_record(&self, record: VisitRecord) -> Result<(), RelayError>;
}

/// Writes visits to the log only.
#[derive(Debug, Default, Clone)]
pub struct LoggingVisitRecorder;

#[async_trait]
impl VisitRecorder for LoggingVisitRecorder {
    async fn create_visit_record(&self, record: VisitRecord) -> Result<(), RelayError> {
        info!(
            room = %record.room_id,
            kind = ?record.kind,
            outcome = ?record.outcome,
            "Visit recorded"
        );
        Ok(())
    }
}

/// POSTs each visit as JSON to the visit-history service.
#[derive(Debug, Clone)]
pub struct WebhookVisitRecorder {
    client: reqwest::Client,
    url: String,
}

impl WebhookVisitRecorder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl VisitRecorder for WebhookVisitRecorder {
    async fn create_visit_record(&self, record: VisitRecord) -> Result<(), RelayError> {
        self.client
            .post(&self.url)
            .json(&record)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| RelayError::PersistenceFailure(e.to_string()))?;
        Ok(())
    }
}
