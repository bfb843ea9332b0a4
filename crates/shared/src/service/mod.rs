mod auth;
mod mail_queue;
mod order;
mod payment;
mod spot;
mod user;
mod vehicle;
mod verification;

pub use self::auth::{AuthService, AuthServiceDeps};
pub use self::mail_queue::MailQueue;
pub use self::order::{
    OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderService,
};
pub use self::payment::{PaymentService, PaymentServiceDeps};
pub use self::spot::{SpotCommandService, SpotCommandServiceDeps, SpotQueryService, SpotService};
pub use self::user::{UserCommandService, UserQueryService, UserService};
pub use self::vehicle::VehicleService;
pub use self::verification::VerificationService;
