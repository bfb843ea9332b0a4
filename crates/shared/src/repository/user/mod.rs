mod command;
mod query;

use crate::abstract_trait::{DynUserCommandRepository, DynUserQueryRepository};
use crate::config::ConnectionPool;
use std::sync::Arc;

pub use self::command::UserCommandRepository;
pub use self::query::UserQueryRepository;

pub(crate) const USER_COLUMNS: &str = "user_id, name, email, password, role, verification_code, \
     is_verified, is_blocked, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct UserRepository {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
}

impl UserRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(UserQueryRepository::new(pool.clone())) as DynUserQueryRepository;
        let command = Arc::new(UserCommandRepository::new(pool)) as DynUserCommandRepository;

        Self { query, command }
    }
}
