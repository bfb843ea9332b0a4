mod api;
mod order;
mod pagination;
mod payment;
mod spot;
mod token;
mod user;
mod vehicle;
mod verification;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::order::OrderResponse;
pub use self::pagination::Pagination;
pub use self::payment::CheckoutResponse;
pub use self::spot::SpotResponse;
pub use self::token::TokenResponse;
pub use self::user::{UserResponse, UserResponseDeleteAt};
pub use self::vehicle::VehicleResponse;
pub use self::verification::VerificationResponse;
