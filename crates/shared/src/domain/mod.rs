pub mod requests;
pub mod responses;
mod session;

pub use self::session::Session;
