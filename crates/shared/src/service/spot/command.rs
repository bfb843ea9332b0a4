use super::spot_cache_key;
use crate::{
    abstract_trait::{
        DynSpotCommandRepository, DynSpotQueryRepository, DynVerificationRepository,
        SpotCommandServiceTrait,
    },
    cache::CacheStore,
    domain::{
        Session,
        requests::{CreateSpotRecord, CreateSpotRequest, UpdateSpotRecord, UpdateSpotRequest},
        responses::{ApiResponse, SpotResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::VerificationStatus,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub struct SpotCommandService {
    query: DynSpotQueryRepository,
    command: DynSpotCommandRepository,
    verification: DynVerificationRepository,
    cache_store: Arc<CacheStore>,
    tracer: ServiceTracer,
}

pub struct SpotCommandServiceDeps {
    pub query: DynSpotQueryRepository,
    pub command: DynSpotCommandRepository,
    pub verification: DynVerificationRepository,
    pub cache_store: Arc<CacheStore>,
    pub registry: Arc<Mutex<Registry>>,
}

impl SpotCommandService {
    pub async fn new(deps: SpotCommandServiceDeps) -> Self {
        let SpotCommandServiceDeps {
            query,
            command,
            verification,
            cache_store,
            registry,
        } = deps;

        let tracer = ServiceTracer::new("spot-command-service", "spot", &registry).await;

        Self {
            query,
            command,
            verification,
            cache_store,
            tracer,
        }
    }

    async fn ensure_verified_owner(&self, session: &Session) -> Result<(), ServiceError> {
        let verified = self
            .verification
            .find_by_user(session.user_id)
            .await?
            .is_some_and(|v| v.status == VerificationStatus::Verified.as_str());

        if !verified {
            return Err(ServiceError::Forbidden(
                "Your identity document must be verified before listing spots".to_string(),
            ));
        }
        Ok(())
    }

    /// `admin_allowed` lets administrators act on spots they do not own.
    async fn ensure_owner(
        &self,
        session: &Session,
        id: i32,
        admin_allowed: bool,
    ) -> Result<(), ServiceError> {
        let owner_id = self
            .query
            .find_owner_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Spot with id {id} not found")))?;

        if owner_id == session.user_id || (admin_allowed && session.is_admin()) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "You can only manage your own spots".to_string(),
            ))
        }
    }

    fn missing(id: i32) -> impl FnOnce(RepositoryError) -> ServiceError {
        move |e| match e {
            RepositoryError::NotFound => {
                ServiceError::NotFound(format!("Spot with id {id} not found"))
            }
            other => ServiceError::Repo(other),
        }
    }
}

#[async_trait]
impl SpotCommandServiceTrait for SpotCommandService {
    async fn create(
        &self,
        session: &Session,
        req: &CreateSpotRequest,
    ) -> Result<ApiResponse<SpotResponse>, ServiceError> {
        info!("🅿️ Owner {} is listing '{}'", session.user_id, req.title);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "CreateSpot",
            vec![
                KeyValue::new("component", "spot"),
                KeyValue::new("owner.id", session.user_id.to_string()),
                KeyValue::new("spot.city", req.city.clone()),
            ],
        );

        if let Err(e) = self.ensure_verified_owner(session).await {
            self.tracer.error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let record = CreateSpotRecord::new(session.user_id, req);

        match self.command.create(&record).await {
            Ok(spot) => {
                info!("✅ Spot {} created", spot.spot_id);
                self.tracer.success(&tracing_ctx, method, "Spot created");
                Ok(ApiResponse::success(
                    "Spot created successfully",
                    SpotResponse::from(spot),
                ))
            }
            Err(e) => {
                error!("❌ Failed to create spot: {e:?}");
                self.tracer
                    .error(&tracing_ctx, method, "Failed to create spot");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn update(
        &self,
        session: &Session,
        id: i32,
        req: &UpdateSpotRequest,
    ) -> Result<ApiResponse<SpotResponse>, ServiceError> {
        info!("✏️ Owner {} is updating spot {id}", session.user_id);

        let method = Method::Put;
        let tracing_ctx = self.tracer.start(
            "UpdateSpot",
            vec![
                KeyValue::new("component", "spot"),
                KeyValue::new("spot.id", id.to_string()),
            ],
        );

        if let Err(e) = self.ensure_owner(session, id, false).await {
            self.tracer.error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let record = UpdateSpotRecord::new(id, req);

        let spot = match self.command.update(&record).await.map_err(Self::missing(id)) {
            Ok(spot) => spot,
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, &e.to_string());
                return Err(e);
            }
        };

        self.cache_store.delete_from_cache(&spot_cache_key(id)).await;

        self.tracer.success(&tracing_ctx, method, "Spot updated");

        Ok(ApiResponse::success(
            "Spot updated successfully",
            SpotResponse::from(spot),
        ))
    }

    async fn delete(&self, session: &Session, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ User {} is deleting spot {id}", session.user_id);

        let method = Method::Delete;
        let tracing_ctx = self.tracer.start(
            "DeleteSpot",
            vec![
                KeyValue::new("component", "spot"),
                KeyValue::new("spot.id", id.to_string()),
            ],
        );

        if let Err(e) = self.ensure_owner(session, id, true).await {
            self.tracer.error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        if let Err(e) = self.command.trash(id).await.map_err(Self::missing(id)) {
            self.tracer.error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        self.cache_store.delete_from_cache(&spot_cache_key(id)).await;

        self.tracer.success(&tracing_ctx, method, "Spot deleted");

        Ok(ApiResponse::success("Spot deleted successfully", ()))
    }
}
