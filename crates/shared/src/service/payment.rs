use crate::{
    abstract_trait::{
        DynMailQueue, DynOrderCommandRepository, DynOrderQueryRepository, DynPaymentGateway,
        PaymentServiceTrait,
    },
    domain::{
        Session,
        requests::VerifyPaymentRequest,
        responses::{ApiResponse, CheckoutResponse, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Order as OrderModel, OrderStatus},
    service::{
        mail_queue::notify,
        order::{order_not_found, order_status},
    },
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct PaymentService {
    order_query: DynOrderQueryRepository,
    order_command: DynOrderCommandRepository,
    gateway: DynPaymentGateway,
    mail: DynMailQueue,
    tracer: ServiceTracer,
}

pub struct PaymentServiceDeps {
    pub order_query: DynOrderQueryRepository,
    pub order_command: DynOrderCommandRepository,
    pub gateway: DynPaymentGateway,
    pub mail: DynMailQueue,
    pub registry: Arc<Mutex<Registry>>,
}

impl PaymentService {
    pub async fn new(deps: PaymentServiceDeps) -> Self {
        let tracer = ServiceTracer::new("payment-service", "payment", &deps.registry).await;

        Self {
            order_query: deps.order_query,
            order_command: deps.order_command,
            gateway: deps.gateway,
            mail: deps.mail,
            tracer,
        }
    }

    async fn own_order(&self, session: &Session, id: i32) -> Result<OrderModel, ServiceError> {
        let order = self
            .order_query
            .find_by_id(id)
            .await?
            .ok_or_else(|| order_not_found(id))?;

        if order.user_id != session.user_id {
            return Err(ServiceError::Forbidden(
                "Only the parker who booked can pay for this order".to_string(),
            ));
        }
        Ok(order)
    }

    async fn checkout_details(
        &self,
        session: &Session,
        order_id: i32,
    ) -> Result<CheckoutResponse, ServiceError> {
        let order = self.own_order(session, order_id).await?;

        match order_status(&order)? {
            OrderStatus::Created => {}
            OrderStatus::Paid => {
                return Err(ServiceError::Conflict("Order is already paid".to_string()));
            }
            other => {
                return Err(ServiceError::Conflict(format!(
                    "Order is {other} and cannot be paid"
                )));
            }
        }

        let gateway_order_id = order.gateway_order_id.ok_or_else(|| {
            ServiceError::Conflict("Order has no payment gateway order".to_string())
        })?;

        Ok(CheckoutResponse {
            key_id: self.gateway.key_id().to_string(),
            order_id: order.order_id,
            gateway_order_id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    async fn confirm(
        &self,
        session: &Session,
        req: &VerifyPaymentRequest,
    ) -> Result<OrderModel, ServiceError> {
        let order = self.own_order(session, req.order_id).await?;

        if order.gateway_order_id.as_deref() != Some(req.gateway_order_id.as_str()) {
            return Err(ServiceError::BadRequest(
                "Gateway order id does not match this order".to_string(),
            ));
        }

        match order_status(&order)? {
            OrderStatus::Created => {}
            OrderStatus::Paid => {
                return Err(ServiceError::Conflict("Order is already paid".to_string()));
            }
            other => {
                return Err(ServiceError::Conflict(format!(
                    "Order is {other} and cannot be paid"
                )));
            }
        }

        if !self.gateway.verify_signature(
            &req.gateway_order_id,
            &req.gateway_payment_id,
            &req.gateway_signature,
        ) {
            warn!("⚠️ Invalid payment signature for order {}", order.order_id);
            return Err(ServiceError::BadRequest(
                "Invalid payment signature".to_string(),
            ));
        }

        self.order_command
            .mark_paid(order.order_id, &req.gateway_payment_id)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
                other => ServiceError::Repo(other),
            })
    }
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    async fn checkout(
        &self,
        session: &Session,
        order_id: i32,
    ) -> Result<ApiResponse<CheckoutResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "Checkout",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        match self.checkout_details(session, order_id).await {
            Ok(details) => {
                self.tracer.success(&tracing_ctx, method, "Checkout prepared");
                Ok(ApiResponse::success("Checkout details retrieved", details))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }

    async fn verify(
        &self,
        session: &Session,
        req: &VerifyPaymentRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "💳 Verifying payment {} for order {}",
            req.gateway_payment_id, req.order_id
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "VerifyPayment",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("order.id", req.order_id.to_string()),
                KeyValue::new("gateway.order_id", req.gateway_order_id.clone()),
            ],
        );

        let order = match self.confirm(session, req).await {
            Ok(order) => order,
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                return Err(e);
            }
        };

        notify(
            &self.mail,
            &session.email,
            "Booking confirmed",
            format!(
                "Hi {}, your payment for booking #{} was received. Your spot is reserved from {} to {}.",
                session.name, order.order_id, order.start_time, order.end_time
            ),
            "",
            String::new(),
        )
        .await;

        info!("✅ Order {} is paid", order.order_id);
        self.tracer.success(&tracing_ctx, method, "Payment verified");

        Ok(ApiResponse::success(
            "Payment verified successfully",
            OrderResponse::from(order),
        ))
    }
}
