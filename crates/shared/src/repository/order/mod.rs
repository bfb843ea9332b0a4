mod command;
mod query;

use crate::abstract_trait::{DynOrderCommandRepository, DynOrderQueryRepository};
use crate::config::ConnectionPool;
use std::sync::Arc;

pub use self::command::OrderCommandRepository;
pub use self::query::OrderQueryRepository;

pub(crate) const ORDER_COLUMNS: &str = "order_id, user_id, spot_id, vehicle_id, start_time, end_time, \
     amount, currency, status, gateway_order_id, gateway_payment_id, created_at, updated_at";

#[derive(Clone)]
pub struct OrderRepository {
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
}

impl OrderRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(OrderQueryRepository::new(pool.clone())) as DynOrderQueryRepository;
        let command = Arc::new(OrderCommandRepository::new(pool)) as DynOrderCommandRepository;

        Self { query, command }
    }
}
