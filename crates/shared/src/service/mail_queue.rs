use crate::{
    abstract_trait::{DynMailQueue, MailQueueTrait},
    domain::requests::EmailRequest,
    errors::ServiceError,
    utils::EmailTemplateData,
};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Producer side of the in-process mail queue; the email worker owns the receiver.
#[derive(Clone)]
pub struct MailQueue {
    sender: mpsc::Sender<EmailRequest>,
}

impl MailQueue {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EmailRequest>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl MailQueueTrait for MailQueue {
    async fn enqueue(&self, req: EmailRequest) -> Result<(), ServiceError> {
        let to = req.to.clone();
        self.sender.send(req).await.map_err(|e| {
            error!("❌ Mail queue is closed, dropping email to {to}: {e}");
            ServiceError::Internal("Mail queue is closed".to_string())
        })?;

        info!("📨 Queued email to {to}");
        Ok(())
    }
}

/// Queues a notification; delivery problems never fail the caller.
pub(crate) async fn notify(
    queue: &DynMailQueue,
    to: &str,
    subject: &str,
    message: String,
    button: &str,
    link: String,
) {
    let req = EmailRequest {
        to: to.to_string(),
        subject: subject.to_string(),
        data: EmailTemplateData {
            title: subject.to_string(),
            message,
            button: button.to_string(),
            link,
        },
    };

    if let Err(e) = queue.enqueue(req).await {
        error!("❌ Failed to queue '{subject}' email for {to}: {e}");
    }
}
