mod command;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::OrderQueryService;

use crate::{
    abstract_trait::{DynOrderCommandService, DynOrderQueryService},
    errors::ServiceError,
    model::{Order as OrderModel, OrderStatus},
};

#[derive(Clone)]
pub struct OrderService {
    pub query: DynOrderQueryService,
    pub command: DynOrderCommandService,
}

pub(crate) fn order_status(order: &OrderModel) -> Result<OrderStatus, ServiceError> {
    order.status.parse().map_err(|e: String| {
        ServiceError::Internal(format!("Order {} has {e}", order.order_id))
    })
}

pub(crate) fn order_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Order with id {id} not found"))
}
