mod command;
mod query;

use crate::abstract_trait::{DynSpotCommandRepository, DynSpotQueryRepository};
use crate::config::ConnectionPool;
use std::sync::Arc;

pub use self::command::SpotCommandRepository;
pub use self::query::SpotQueryRepository;

pub(crate) const SPOT_COLUMNS: &str = "spot_id, owner_id, title, address, city, latitude, longitude, \
     hourly_rate, daily_rate, total_spots, available_spots, features, image_url, \
     created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct SpotRepository {
    pub query: DynSpotQueryRepository,
    pub command: DynSpotCommandRepository,
}

impl SpotRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(SpotQueryRepository::new(pool.clone())) as DynSpotQueryRepository;
        let command = Arc::new(SpotCommandRepository::new(pool)) as DynSpotCommandRepository;

        Self { query, command }
    }
}
