use crate::{
    abstract_trait::{
        DynMailQueue, DynUserQueryRepository, DynVerificationRepository, VerificationServiceTrait,
    },
    domain::{
        Session,
        requests::{FindAllVerifications, ReviewVerificationRequest, SubmitVerificationRequest},
        responses::{ApiResponse, ApiResponsePagination, Pagination, VerificationResponse},
    },
    errors::ServiceError,
    model::{Verification as VerificationModel, VerificationStatus},
    service::mail_queue::notify,
    utils::{Method, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct VerificationService {
    repository: DynVerificationRepository,
    user_query: DynUserQueryRepository,
    mail: DynMailQueue,
    app_base_url: String,
    tracer: ServiceTracer,
}

impl VerificationService {
    pub async fn new(
        repository: DynVerificationRepository,
        user_query: DynUserQueryRepository,
        mail: DynMailQueue,
        app_base_url: String,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer = ServiceTracer::new("verification-service", "verification", registry).await;

        Self {
            repository,
            user_query,
            mail,
            app_base_url,
            tracer,
        }
    }

    async fn notify_outcome(&self, verification: &VerificationModel) {
        let user = match self.user_query.find_by_id(verification.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                warn!("⚠️ Could not load owner {} for review email: {e:?}", verification.user_id);
                return;
            }
        };

        let remarks = verification
            .remarks
            .as_deref()
            .map(|r| format!(" Remarks: {r}"))
            .unwrap_or_default();

        let message = if verification.status == VerificationStatus::Verified.as_str() {
            format!("Hi {}, your document has been verified. You can now list parking spots.{remarks}", user.name)
        } else {
            format!("Hi {}, your document was rejected. Please upload a new one.{remarks}", user.name)
        };

        notify(
            &self.mail,
            &user.email,
            &format!("Verification {}", verification.status.to_lowercase()),
            message,
            "Open Parkspot",
            self.app_base_url.clone(),
        )
        .await;
    }
}

#[async_trait]
impl VerificationServiceTrait for VerificationService {
    async fn submit(
        &self,
        session: &Session,
        req: &SubmitVerificationRequest,
    ) -> Result<ApiResponse<VerificationResponse>, ServiceError> {
        info!("📄 Owner {} submitted a verification document", session.user_id);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "SubmitVerification",
            vec![
                KeyValue::new("component", "verification"),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        match self.repository.find_by_user(session.user_id).await {
            Ok(Some(existing)) if existing.status == VerificationStatus::Verified.as_str() => {
                self.tracer.error(&tracing_ctx, method, "Already verified");
                return Err(ServiceError::Conflict(
                    "Your account is already verified".to_string(),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        }

        match self
            .repository
            .upsert_pending(session.user_id, req.document_url.trim())
            .await
        {
            Ok(verification) => {
                self.tracer
                    .success(&tracing_ctx, method, "Document submitted");
                Ok(ApiResponse::success(
                    "Document submitted for review",
                    VerificationResponse::from(verification),
                ))
            }
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to store document");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_mine(
        &self,
        session: &Session,
    ) -> Result<ApiResponse<VerificationResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindMyVerification",
            vec![
                KeyValue::new("component", "verification"),
                KeyValue::new("user.id", session.user_id.to_string()),
            ],
        );

        match self.repository.find_by_user(session.user_id).await {
            Ok(Some(verification)) => {
                self.tracer
                    .success(&tracing_ctx, method, "Verification found");
                Ok(ApiResponse::success(
                    "Verification retrieved successfully",
                    VerificationResponse::from(verification),
                ))
            }
            Ok(None) => {
                self.tracer.error(&tracing_ctx, method, "Not submitted");
                Err(ServiceError::NotFound(
                    "No verification document submitted".to_string(),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_all(
        &self,
        req: &FindAllVerifications,
    ) -> Result<ApiResponsePagination<Vec<VerificationResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindAllVerifications",
            vec![
                KeyValue::new("component", "verification"),
                KeyValue::new("page", req.page as i64),
                KeyValue::new(
                    "status",
                    req.status.map(|s| s.as_str()).unwrap_or("any"),
                ),
            ],
        );

        let (items, total) = match self.repository.find_all(req).await {
            Ok(result) => result,
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        self.tracer
            .success(&tracing_ctx, method, "Verifications listed");

        Ok(ApiResponsePagination::success(
            "Verifications retrieved successfully",
            items.into_iter().map(VerificationResponse::from).collect(),
            Pagination::new(req.page, req.page_size, total),
        ))
    }

    async fn review(
        &self,
        id: i32,
        req: &ReviewVerificationRequest,
    ) -> Result<ApiResponse<VerificationResponse>, ServiceError> {
        info!("📝 Reviewing verification {id} as {}", req.status);

        let method = Method::Put;
        let tracing_ctx = self.tracer.start(
            "ReviewVerification",
            vec![
                KeyValue::new("component", "verification"),
                KeyValue::new("verification.id", id.to_string()),
                KeyValue::new("verification.status", req.status.as_str()),
            ],
        );

        if req.status == VerificationStatus::Pending {
            self.tracer.error(&tracing_ctx, method, "Invalid outcome");
            return Err(ServiceError::BadRequest(
                "Review outcome must be Verified or Rejected".to_string(),
            ));
        }

        match self.repository.find_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.tracer.error(&tracing_ctx, method, "Not found");
                return Err(ServiceError::NotFound(format!(
                    "Verification with id {id} not found"
                )));
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        }

        let remarks = req
            .remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let verification = match self.repository.update_status(id, req.status, remarks).await {
            Ok(verification) => verification,
            Err(e) => {
                self.tracer
                    .error(&tracing_ctx, method, "Failed to update status");
                return Err(ServiceError::Repo(e));
            }
        };

        self.notify_outcome(&verification).await;

        self.tracer.success(&tracing_ctx, method, "Review saved");

        Ok(ApiResponse::success(
            "Verification reviewed successfully",
            VerificationResponse::from(verification),
        ))
    }
}
