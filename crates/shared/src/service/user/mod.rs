mod command;
mod query;

pub use self::command::UserCommandService;
pub use self::query::UserQueryService;

use crate::abstract_trait::{DynUserCommandService, DynUserQueryService};

#[derive(Clone)]
pub struct UserService {
    pub query: DynUserQueryService,
    pub command: DynUserCommandService,
}
