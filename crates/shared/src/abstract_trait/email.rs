use crate::{domain::requests::EmailRequest, errors::ServiceError};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynEmailService = Arc<dyn EmailServiceTrait>;
pub type DynMailQueue = Arc<dyn MailQueueTrait>;

/// Delivers one rendered email.
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError>;
}

/// Hands an email to the background sender without waiting for delivery.
#[async_trait]
pub trait MailQueueTrait: Send + Sync {
    async fn enqueue(&self, req: EmailRequest) -> Result<(), ServiceError>;
}
