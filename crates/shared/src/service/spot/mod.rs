mod command;
mod query;

pub use self::command::{SpotCommandService, SpotCommandServiceDeps};
pub use self::query::SpotQueryService;

use crate::abstract_trait::{DynSpotCommandService, DynSpotQueryService};
use chrono::Duration;

pub(crate) fn spot_cache_key(id: i32) -> String {
    format!("spot:{id}")
}

pub(crate) fn spot_cache_ttl() -> Duration {
    Duration::minutes(10)
}

#[derive(Clone)]
pub struct SpotService {
    pub query: DynSpotQueryService,
    pub command: DynSpotCommandService,
}
