mod kinds;
mod order;
mod refresh_token;
mod reset_token;
mod spot;
mod user;
mod vehicle;
mod verification;

pub use self::kinds::{OrderStatus, UserRole, VehicleType, VerificationStatus};
pub use self::order::Order;
pub use self::refresh_token::RefreshToken;
pub use self::reset_token::ResetToken;
pub use self::spot::Spot;
pub use self::user::User;
pub use self::vehicle::Vehicle;
pub use self::verification::Verification;
