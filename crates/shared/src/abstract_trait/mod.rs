mod auth;
mod email;
mod order;
mod payment;
mod refresh_token;
mod reset_token;
mod security;
mod spot;
mod user;
mod vehicle;
mod verification;

pub use self::auth::*;
pub use self::email::{DynEmailService, DynMailQueue, EmailServiceTrait, MailQueueTrait};
pub use self::order::*;
pub use self::payment::{
    DynPaymentGateway, DynPaymentService, PaymentGatewayTrait, PaymentServiceTrait,
};
pub use self::refresh_token::{DynRefreshTokenRepository, RefreshTokenRepositoryTrait};
pub use self::reset_token::{DynResetTokenRepository, ResetTokenRepositoryTrait};
pub use self::security::{DynHashing, DynJwtService, HashingTrait, JwtServiceTrait};
pub use self::spot::*;
pub use self::user::*;
pub use self::vehicle::{DynVehicleRepository, DynVehicleService, VehicleRepositoryTrait, VehicleServiceTrait};
pub use self::verification::{
    DynVerificationRepository, DynVerificationService, VerificationRepositoryTrait,
    VerificationServiceTrait,
};
