use crate::{
    abstract_trait::{DynUserQueryRepository, UserQueryServiceTrait},
    domain::{
        requests::FindAllUsers,
        responses::{ApiResponse, ApiResponsePagination, Pagination, UserResponseDeleteAt},
    },
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub struct UserQueryService {
    query: DynUserQueryRepository,
    tracer: ServiceTracer,
}

impl UserQueryService {
    pub async fn new(query: DynUserQueryRepository, registry: &Arc<Mutex<Registry>>) -> Self {
        let tracer = ServiceTracer::new("user-query-service", "user", registry).await;
        Self { query, tracer }
    }
}

#[async_trait]
impl UserQueryServiceTrait for UserQueryService {
    async fn find_all(
        &self,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserResponseDeleteAt>>, ServiceError> {
        info!(
            "🔍 Listing users | page: {}, page_size: {}, search: {:?}",
            req.page, req.page_size, req.search
        );

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindAllUsers",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("page", req.page as i64),
                KeyValue::new("page_size", req.page_size as i64),
                KeyValue::new("search", req.search.clone()),
            ],
        );

        let (users, total) = match self.query.find_all(req).await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ Failed to fetch users: {e:?}");
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<UserResponseDeleteAt> =
            users.into_iter().map(UserResponseDeleteAt::from).collect();

        info!("✅ Found {} users (total {total})", data.len());
        self.tracer
            .success(&tracing_ctx, method, "Users retrieved successfully");

        Ok(ApiResponsePagination::success(
            "Users retrieved successfully",
            data,
            Pagination::new(req.page, req.page_size, total),
        ))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<UserResponseDeleteAt>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindUserById",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user.id", id.to_string()),
            ],
        );

        match self.query.find_by_id(id).await {
            Ok(Some(user)) => {
                self.tracer.success(&tracing_ctx, method, "User found");
                Ok(ApiResponse::success(
                    "User retrieved successfully",
                    UserResponseDeleteAt::from(user),
                ))
            }
            Ok(None) => {
                self.tracer.error(&tracing_ctx, method, "User not found");
                Err(ServiceError::NotFound(format!("User with id {id} not found")))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                Err(ServiceError::Repo(e))
            }
        }
    }
}
