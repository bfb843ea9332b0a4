use shared::{abstract_trait::DynEmailService, domain::requests::EmailRequest};
use tokio::sync::mpsc::Receiver;
use tracing::{error, info};

/// Drains the in-process mail queue and hands every message to the mailer.
pub struct EmailWorker {
    mailer: DynEmailService,
    receiver: Receiver<EmailRequest>,
}

impl EmailWorker {
    pub fn new(mailer: DynEmailService, receiver: Receiver<EmailRequest>) -> Self {
        Self { mailer, receiver }
    }

    /// Runs until every sender is dropped. Failed deliveries are logged and skipped.
    pub async fn run(mut self) {
        info!("🚀 Starting email worker...");

        while let Some(req) = self.receiver.recv().await {
            if let Err(e) = self.mailer.send(&req).await {
                error!("❌ Failed to deliver '{}' to {}: {e}", req.subject, req.to);
            }
        }

        info!("📪 Mail queue closed, email worker stopped");
    }
}
