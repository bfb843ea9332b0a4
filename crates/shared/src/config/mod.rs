mod database;
mod hashing;
mod jwt;
mod myconfig;
mod razorpay;
mod redis;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::hashing::Hashing;
pub use self::jwt::{Claims, JwtConfig};
pub use self::myconfig::{AdminSeed, Config, EmailConfig, RazorpayConfig};
pub use self::razorpay::{RazorpayClient, sign_payment, verify_payment_signature};
pub use self::redis::{RedisClient, RedisConfig};
