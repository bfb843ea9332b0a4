use crate::{
    abstract_trait::{
        DynHashing, DynJwtService, DynMailQueue, DynOrderCommandService, DynOrderQueryService,
        DynPaymentGateway, DynPaymentService, DynRefreshTokenRepository, DynResetTokenRepository,
        DynSpotCommandService, DynSpotQueryService, DynUserCommandService, DynUserQueryService,
        DynVehicleRepository, DynVehicleService, DynVerificationRepository,
        DynVerificationService,
    },
    cache::CacheStore,
    config::ConnectionPool,
    repository::{
        OrderRepository, RefreshTokenRepository, ResetTokenRepository, SpotRepository,
        UserRepository, VehicleRepository, VerificationRepository,
    },
    service::{
        AuthService, AuthServiceDeps, OrderCommandService, OrderCommandServiceDeps,
        OrderQueryService, OrderService, PaymentService, PaymentServiceDeps, SpotCommandService,
        SpotCommandServiceDeps, SpotQueryService, SpotService, UserCommandService,
        UserQueryService, UserService, VehicleService, VerificationService,
    },
};
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub vehicle_service: DynVehicleService,
    pub verification_service: DynVerificationService,
    pub spot_service: SpotService,
    pub order_service: OrderService,
    pub payment_service: DynPaymentService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"<AuthService>")
            .field("user_service", &"<UserService>")
            .field("vehicle_service", &"<VehicleService>")
            .field("verification_service", &"<VerificationService>")
            .field("spot_service", &"<SpotService>")
            .field("order_service", &"<OrderService>")
            .field("payment_service", &"<PaymentService>")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub hash: DynHashing,
    pub jwt_config: DynJwtService,
    pub mail: DynMailQueue,
    pub gateway: DynPaymentGateway,
    pub cache: Arc<CacheStore>,
    pub registry: Arc<Mutex<Registry>>,
    pub app_base_url: String,
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps) -> Self {
        let DependenciesInjectDeps {
            pool,
            hash,
            jwt_config,
            mail,
            gateway,
            cache,
            registry,
            app_base_url,
        } = deps;

        let refresh_token =
            Arc::new(RefreshTokenRepository::new(pool.clone())) as DynRefreshTokenRepository;
        let reset_token =
            Arc::new(ResetTokenRepository::new(pool.clone())) as DynResetTokenRepository;
        let vehicle_repository =
            Arc::new(VehicleRepository::new(pool.clone())) as DynVehicleRepository;
        let verification_repository =
            Arc::new(VerificationRepository::new(pool.clone())) as DynVerificationRepository;

        let user_repository = UserRepository::new(pool.clone());
        let spot_repository = SpotRepository::new(pool.clone());
        let order_repository = OrderRepository::new(pool);

        let auth_service = AuthService::new(AuthServiceDeps {
            hash: hash.clone(),
            jwt: jwt_config,
            mail: mail.clone(),
            reset_token,
            refresh_token: refresh_token.clone(),
            user_query: user_repository.query.clone(),
            user_command: user_repository.command.clone(),
            cache: cache.clone(),
            registry: registry.clone(),
            app_base_url: app_base_url.clone(),
        })
        .await;

        let user_service = UserService {
            query: Arc::new(
                UserQueryService::new(user_repository.query.clone(), &registry).await,
            ) as DynUserQueryService,
            command: Arc::new(
                UserCommandService::new(
                    user_repository.query.clone(),
                    user_repository.command.clone(),
                    refresh_token,
                    hash,
                    &registry,
                )
                .await,
            ) as DynUserCommandService,
        };

        let vehicle_service =
            Arc::new(VehicleService::new(vehicle_repository.clone(), &registry).await)
                as DynVehicleService;

        let verification_service = Arc::new(
            VerificationService::new(
                verification_repository.clone(),
                user_repository.query.clone(),
                mail.clone(),
                app_base_url,
                &registry,
            )
            .await,
        ) as DynVerificationService;

        let spot_service = SpotService {
            query: Arc::new(
                SpotQueryService::new(spot_repository.query.clone(), cache.clone(), &registry)
                    .await,
            ) as DynSpotQueryService,
            command: Arc::new(
                SpotCommandService::new(SpotCommandServiceDeps {
                    query: spot_repository.query.clone(),
                    command: spot_repository.command.clone(),
                    verification: verification_repository,
                    cache_store: cache.clone(),
                    registry: registry.clone(),
                })
                .await,
            ) as DynSpotCommandService,
        };

        let order_service = OrderService {
            query: Arc::new(
                OrderQueryService::new(
                    order_repository.query.clone(),
                    spot_repository.query.clone(),
                    &registry,
                )
                .await,
            ) as DynOrderQueryService,
            command: Arc::new(
                OrderCommandService::new(OrderCommandServiceDeps {
                    command: order_repository.command.clone(),
                    query: order_repository.query.clone(),
                    spot_query: spot_repository.query.clone(),
                    vehicle: vehicle_repository,
                    gateway: gateway.clone(),
                    cache_store: cache,
                    registry: registry.clone(),
                })
                .await,
            ) as DynOrderCommandService,
        };

        let payment_service = Arc::new(
            PaymentService::new(PaymentServiceDeps {
                order_query: order_repository.query,
                order_command: order_repository.command,
                gateway,
                mail,
                registry,
            })
            .await,
        ) as DynPaymentService;

        Self {
            auth_service,
            user_service,
            vehicle_service,
            verification_service,
            spot_service,
            order_service,
            payment_service,
        }
    }
}
