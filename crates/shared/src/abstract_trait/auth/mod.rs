mod identity;
mod login;
mod password_reset;
mod register;
mod token;

pub use self::identity::{DynIdentityService, IdentityServiceTrait};
pub use self::login::{DynLoginService, LoginServiceTrait};
pub use self::password_reset::{DynPasswordResetService, PasswordResetServiceTrait};
pub use self::register::{DynRegisterService, RegisterServiceTrait};
pub use self::token::{DynTokenService, TokenServiceTrait};
