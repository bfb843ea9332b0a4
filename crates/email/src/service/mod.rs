mod email;
mod worker;

pub use self::email::EmailService;
pub use self::worker::EmailWorker;
