mod auth;
mod email;
mod order;
mod payment;
mod refresh_token;
mod reset_token;
mod spot;
mod user;
mod vehicle;
mod verification;

pub use self::auth::{
    LoginRequest, RegisterRequest, ResendVerificationRequest, VerifyCodeQuery,
};
pub use self::email::EmailRequest;
pub use self::order::{CreateOrderRecord, CreateOrderRequest, FindAllOrders};
pub use self::payment::{GatewayOrder, GatewayOrderRequest, VerifyPaymentRequest};
pub use self::refresh_token::{CreateRefreshToken, RefreshTokenRequest};
pub use self::reset_token::{CreateResetPasswordRequest, CreateResetTokenRequest, ForgotPasswordRequest};
pub use self::spot::{
    CreateSpotRecord, CreateSpotRequest, FindAllSpots, SearchSpotsQuery, SpotSearchFilter,
    UpdateSpotRecord, UpdateSpotRequest, normalize_features,
};
pub use self::user::{CreateUserRequest, FindAllUsers, UpdateProfileRequest};
pub use self::vehicle::{CreateVehicleRequest, normalize_plate};
pub use self::verification::{
    FindAllVerifications, ReviewVerificationRequest, SubmitVerificationRequest,
};
