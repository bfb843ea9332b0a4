use crate::{
    abstract_trait::*,
    cache::CacheStore,
    config::AdminSeed,
    domain::{
        Session,
        requests::*,
        responses::Pagination,
    },
    errors::{RepositoryError, ServiceError},
    model::{
        Order, OrderStatus, RefreshToken, ResetToken, Spot, User, UserRole, Vehicle,
        Verification, VerificationStatus,
    },
    service::*,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use prometheus_client::registry::Registry;
use std::sync::{
    Arc, Mutex as StdMutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    refresh_tokens: Vec<RefreshToken>,
    reset_tokens: Vec<ResetToken>,
    vehicles: Vec<Vehicle>,
    verifications: Vec<Verification>,
    spots: Vec<Spot>,
    orders: Vec<Order>,
    next_id: i32,
}

impl Tables {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Every repository backed by plain vectors.
#[derive(Default)]
struct MemoryStore {
    tables: StdMutex<Tables>,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    fn page<T: Clone>(rows: Vec<T>, page: i32, page_size: i32) -> (Vec<T>, i64) {
        let total = rows.len() as i64;
        let skip = usize::try_from(Pagination::offset(page, page_size)).unwrap_or(usize::MAX);
        let items = rows
            .into_iter()
            .skip(skip)
            .take(usize::try_from(page_size).unwrap_or(0))
            .collect();
        (items, total)
    }

    fn user(&self, id: i32) -> Option<User> {
        self.with(|t| t.users.iter().find(|u| u.user_id == id).cloned())
    }

    fn spot(&self, id: i32) -> Option<Spot> {
        self.with(|t| t.spots.iter().find(|s| s.spot_id == id).cloned())
    }

    fn order(&self, id: i32) -> Option<Order> {
        self.with(|t| t.orders.iter().find(|o| o.order_id == id).cloned())
    }

    fn refresh_tokens_of(&self, user_id: i32) -> usize {
        self.with(|t| t.refresh_tokens.iter().filter(|r| r.user_id == user_id).count())
    }

    fn update_user(
        &self,
        id: i32,
        f: impl FnOnce(&mut User),
    ) -> Result<User, RepositoryError> {
        self.with(|t| {
            let user = t
                .users
                .iter_mut()
                .find(|u| u.user_id == id)
                .ok_or(RepositoryError::NotFound)?;
            f(user);
            Ok(user.clone())
        })
    }

    fn seed_user(&self, email: &str, role: UserRole, verified: bool) -> User {
        self.with(|t| {
            let user = User {
                user_id: t.id(),
                name: "Seeded".into(),
                email: email.into(),
                password: "hashed:password123".into(),
                role: role.as_str().into(),
                verification_code: None,
                is_verified: verified,
                is_blocked: false,
                created_at: None,
                updated_at: None,
                deleted_at: None,
            };
            t.users.push(user.clone());
            user
        })
    }

    fn seed_verification(&self, user_id: i32, status: VerificationStatus) {
        self.with(|t| {
            let id = t.id();
            t.verifications.push(Verification {
                verification_id: id,
                user_id,
                document_url: "https://docs.test/id.pdf".into(),
                status: status.as_str().into(),
                remarks: None,
                created_at: None,
                updated_at: None,
            });
        });
    }

    fn seed_spot(&self, owner_id: i32, available: i32) -> Spot {
        self.with(|t| {
            let spot = Spot {
                spot_id: t.id(),
                owner_id,
                title: "MG Road basement".into(),
                address: "12 MG Road".into(),
                city: "Bengaluru".into(),
                latitude: 12.9756,
                longitude: 77.6050,
                hourly_rate: 4_000,
                daily_rate: 30_000,
                total_spots: available.max(1),
                available_spots: available,
                features: vec!["covered".into()],
                image_url: None,
                created_at: None,
                updated_at: None,
                deleted_at: None,
            };
            t.spots.push(spot.clone());
            spot
        })
    }

    fn seed_vehicle(&self, user_id: i32) -> Vehicle {
        self.with(|t| {
            let vehicle = Vehicle {
                vehicle_id: t.id(),
                user_id,
                plate_number: "KA01AB1234".into(),
                vehicle_type: "car".into(),
                model: None,
                color: None,
                created_at: None,
                updated_at: None,
                deleted_at: None,
            };
            t.vehicles.push(vehicle.clone());
            vehicle
        })
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for MemoryStore {
    async fn find_all(&self, req: &FindAllUsers) -> Result<(Vec<User>, i64), RepositoryError> {
        let needle = req.search.to_lowercase();
        let rows = self.with(|t| {
            t.users
                .iter()
                .filter(|u| {
                    needle.is_empty()
                        || u.name.to_lowercase().contains(&needle)
                        || u.email.contains(&needle)
                })
                .cloned()
                .collect()
        });
        Ok(Self::page(rows, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let email = email.to_lowercase();
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn find_by_verification_code(&self, code: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .find(|u| u.verification_code.as_deref() == Some(code))
                .cloned()
        }))
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for MemoryStore {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<User, RepositoryError> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == req.email) {
                return Err(RepositoryError::AlreadyExists("email".into()));
            }
            let user = User {
                user_id: t.id(),
                name: req.name.clone(),
                email: req.email.to_lowercase(),
                password: req.password.clone(),
                role: req.role.as_str().into(),
                verification_code: req.verification_code.clone(),
                is_verified: req.is_verified,
                is_blocked: false,
                created_at: None,
                updated_at: None,
                deleted_at: None,
            };
            t.users.push(user.clone());
            Ok(user)
        })
    }

    async fn update_profile(
        &self,
        user_id: i32,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        self.update_user(user_id, |u| {
            if let Some(name) = name {
                u.name = name.into();
            }
            if let Some(hash) = password_hash {
                u.password = hash.into();
            }
        })
    }

    async fn mark_verified(&self, user_id: i32) -> Result<User, RepositoryError> {
        self.update_user(user_id, |u| {
            u.is_verified = true;
            u.verification_code = None;
        })
    }

    async fn update_verification_code(
        &self,
        user_id: i32,
        code: &str,
    ) -> Result<User, RepositoryError> {
        self.update_user(user_id, |u| u.verification_code = Some(code.into()))
    }

    async fn update_password(&self, user_id: i32, password: &str) -> Result<User, RepositoryError> {
        self.update_user(user_id, |u| u.password = password.into())
    }

    async fn set_blocked(&self, user_id: i32, blocked: bool) -> Result<User, RepositoryError> {
        self.update_user(user_id, |u| u.is_blocked = blocked)
    }

    async fn trash_user(&self, user_id: i32) -> Result<User, RepositoryError> {
        self.update_user(user_id, |u| u.deleted_at = Some(Utc::now().naive_utc()))
    }
}

#[async_trait]
impl RefreshTokenRepositoryTrait for MemoryStore {
    async fn create(&self, req: &CreateRefreshToken) -> Result<RefreshToken, RepositoryError> {
        Ok(self.with(|t| {
            let token = RefreshToken {
                refresh_token_id: t.id(),
                user_id: req.user_id,
                token: req.token.clone(),
                expired_date: req.expired_date,
                created_at: None,
                updated_at: None,
            };
            t.refresh_tokens.push(token.clone());
            token
        }))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, RepositoryError> {
        Ok(self.with(|t| t.refresh_tokens.iter().find(|r| r.token == token).cloned()))
    }

    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        self.with(|t| t.refresh_tokens.retain(|r| r.token != token));
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        self.with(|t| t.refresh_tokens.retain(|r| r.user_id != user_id));
        Ok(())
    }
}

#[async_trait]
impl ResetTokenRepositoryTrait for MemoryStore {
    async fn create_reset_token(
        &self,
        req: &CreateResetTokenRequest,
    ) -> Result<ResetToken, RepositoryError> {
        Ok(self.with(|t| {
            t.reset_tokens.retain(|r| r.user_id != req.user_id);
            let token = ResetToken {
                reset_token_id: t.id(),
                user_id: req.user_id,
                token: req.reset_token.clone(),
                expired_date: req.expired_at,
            };
            t.reset_tokens.push(token.clone());
            token
        }))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ResetToken>, RepositoryError> {
        Ok(self.with(|t| t.reset_tokens.iter().find(|r| r.token == token).cloned()))
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        self.with(|t| t.reset_tokens.retain(|r| r.user_id != user_id));
        Ok(())
    }
}

#[async_trait]
impl VehicleRepositoryTrait for MemoryStore {
    async fn create(
        &self,
        user_id: i32,
        plate_number: &str,
        req: &CreateVehicleRequest,
    ) -> Result<Vehicle, RepositoryError> {
        Ok(self.with(|t| {
            let vehicle = Vehicle {
                vehicle_id: t.id(),
                user_id,
                plate_number: plate_number.into(),
                vehicle_type: req.vehicle_type.as_str().into(),
                model: req.model.clone(),
                color: req.color.clone(),
                created_at: None,
                updated_at: None,
                deleted_at: None,
            };
            t.vehicles.push(vehicle.clone());
            vehicle
        }))
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Vehicle>, RepositoryError> {
        Ok(self.with(|t| {
            t.vehicles
                .iter()
                .filter(|v| v.user_id == user_id && v.deleted_at.is_none())
                .cloned()
                .collect()
        }))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, RepositoryError> {
        Ok(self.with(|t| {
            t.vehicles
                .iter()
                .find(|v| v.vehicle_id == id && v.deleted_at.is_none())
                .cloned()
        }))
    }

    async fn find_by_plate(
        &self,
        user_id: i32,
        plate_number: &str,
    ) -> Result<Option<Vehicle>, RepositoryError> {
        Ok(self.with(|t| {
            t.vehicles
                .iter()
                .find(|v| {
                    v.user_id == user_id && v.plate_number == plate_number && v.deleted_at.is_none()
                })
                .cloned()
        }))
    }

    async fn trash(&self, id: i32) -> Result<Vehicle, RepositoryError> {
        self.with(|t| {
            let vehicle = t
                .vehicles
                .iter_mut()
                .find(|v| v.vehicle_id == id && v.deleted_at.is_none())
                .ok_or(RepositoryError::NotFound)?;
            vehicle.deleted_at = Some(Utc::now().naive_utc());
            Ok(vehicle.clone())
        })
    }
}

#[async_trait]
impl VerificationRepositoryTrait for MemoryStore {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Verification>, RepositoryError> {
        Ok(self.with(|t| t.verifications.iter().find(|v| v.user_id == user_id).cloned()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Verification>, RepositoryError> {
        Ok(self.with(|t| {
            t.verifications
                .iter()
                .find(|v| v.verification_id == id)
                .cloned()
        }))
    }

    async fn find_all(
        &self,
        req: &FindAllVerifications,
    ) -> Result<(Vec<Verification>, i64), RepositoryError> {
        let rows = self.with(|t| {
            t.verifications
                .iter()
                .filter(|v| req.status.is_none_or(|s| v.status == s.as_str()))
                .cloned()
                .collect()
        });
        Ok(Self::page(rows, req.page, req.page_size))
    }

    async fn upsert_pending(
        &self,
        user_id: i32,
        document_url: &str,
    ) -> Result<Verification, RepositoryError> {
        Ok(self.with(|t| {
            t.verifications.retain(|v| v.user_id != user_id);
            let verification = Verification {
                verification_id: t.id(),
                user_id,
                document_url: document_url.into(),
                status: VerificationStatus::Pending.as_str().into(),
                remarks: None,
                created_at: None,
                updated_at: None,
            };
            t.verifications.push(verification.clone());
            verification
        }))
    }

    async fn update_status(
        &self,
        id: i32,
        status: VerificationStatus,
        remarks: Option<&str>,
    ) -> Result<Verification, RepositoryError> {
        self.with(|t| {
            let verification = t
                .verifications
                .iter_mut()
                .find(|v| v.verification_id == id)
                .ok_or(RepositoryError::NotFound)?;
            verification.status = status.as_str().into();
            verification.remarks = remarks.map(str::to_string);
            Ok(verification.clone())
        })
    }
}

#[async_trait]
impl SpotQueryRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Spot>, RepositoryError> {
        Ok(self.spot(id).filter(|s| s.deleted_at.is_none()))
    }

    async fn find_owner_id(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        Ok(self.spot(id).map(|s| s.owner_id))
    }

    async fn search(&self, filter: &SpotSearchFilter) -> Result<(Vec<Spot>, i64), RepositoryError> {
        let rows: Vec<Spot> = self.with(|t| {
            t.spots
                .iter()
                .filter(|s| s.deleted_at.is_none())
                .filter(|s| s.available_spots >= filter.min_available)
                .filter(|s| filter.features.iter().all(|f| s.features.contains(f)))
                .filter(|s| {
                    filter
                        .city
                        .as_deref()
                        .is_none_or(|c| s.city.eq_ignore_ascii_case(c))
                })
                .cloned()
                .collect()
        });
        let total = rows.len() as i64;
        let limit = filter.limit.unwrap_or(total) as usize;
        let items = rows
            .into_iter()
            .skip(filter.offset as usize)
            .take(limit)
            .collect();
        Ok((items, total))
    }

    async fn find_by_owner(
        &self,
        owner_id: i32,
        req: &FindAllSpots,
    ) -> Result<(Vec<Spot>, i64), RepositoryError> {
        let rows = self.with(|t| {
            t.spots
                .iter()
                .filter(|s| s.owner_id == owner_id && s.deleted_at.is_none())
                .cloned()
                .collect()
        });
        Ok(Self::page(rows, req.page, req.page_size))
    }
}

#[async_trait]
impl SpotCommandRepositoryTrait for MemoryStore {
    async fn create(&self, req: &CreateSpotRecord) -> Result<Spot, RepositoryError> {
        Ok(self.with(|t| {
            let spot = Spot {
                spot_id: t.id(),
                owner_id: req.owner_id,
                title: req.title.clone(),
                address: req.address.clone(),
                city: req.city.clone(),
                latitude: req.latitude,
                longitude: req.longitude,
                hourly_rate: req.hourly_rate,
                daily_rate: req.daily_rate,
                total_spots: req.total_spots,
                available_spots: req.available_spots,
                features: req.features.clone(),
                image_url: req.image_url.clone(),
                created_at: None,
                updated_at: None,
                deleted_at: None,
            };
            t.spots.push(spot.clone());
            spot
        }))
    }

    async fn update(&self, req: &UpdateSpotRecord) -> Result<Spot, RepositoryError> {
        self.with(|t| {
            let spot = t
                .spots
                .iter_mut()
                .find(|s| s.spot_id == req.spot_id && s.deleted_at.is_none())
                .ok_or(RepositoryError::NotFound)?;
            if let Some(title) = &req.title {
                spot.title = title.clone();
            }
            if let Some(rate) = req.hourly_rate {
                spot.hourly_rate = rate;
            }
            if let Some(total) = req.total_spots {
                spot.available_spots =
                    (spot.available_spots + total - spot.total_spots).clamp(0, total);
                spot.total_spots = total;
            }
            if let Some(available) = req.available_spots {
                spot.available_spots = available;
            }
            Ok(spot.clone())
        })
    }

    async fn trash(&self, id: i32) -> Result<Spot, RepositoryError> {
        self.with(|t| {
            let spot = t
                .spots
                .iter_mut()
                .find(|s| s.spot_id == id && s.deleted_at.is_none())
                .ok_or(RepositoryError::NotFound)?;
            spot.deleted_at = Some(Utc::now().naive_utc());
            Ok(spot.clone())
        })
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, RepositoryError> {
        Ok(self.order(id))
    }

    async fn find_by_user(
        &self,
        user_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let rows = self.with(|t| {
            t.orders
                .iter()
                .filter(|o| o.user_id == user_id)
                .filter(|o| req.status.is_none_or(|s| o.status == s.as_str()))
                .cloned()
                .collect()
        });
        Ok(Self::page(rows, req.page, req.page_size))
    }

    async fn find_by_spot_owner(
        &self,
        owner_id: i32,
        req: &FindAllOrders,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let rows = self.with(|t| {
            t.orders
                .iter()
                .filter(|o| {
                    t.spots
                        .iter()
                        .any(|s| s.spot_id == o.spot_id && s.owner_id == owner_id)
                })
                .filter(|o| req.status.is_none_or(|s| o.status == s.as_str()))
                .cloned()
                .collect()
        });
        Ok(Self::page(rows, req.page, req.page_size))
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for MemoryStore {
    async fn create_booking(&self, req: &CreateOrderRecord) -> Result<Order, RepositoryError> {
        self.with(|t| {
            let spot = t
                .spots
                .iter_mut()
                .find(|s| s.spot_id == req.spot_id && s.deleted_at.is_none())
                .ok_or(RepositoryError::NotFound)?;
            if spot.available_spots <= 0 {
                return Err(RepositoryError::Conflict("No spots available".into()));
            }
            spot.available_spots -= 1;

            let order = Order {
                order_id: t.id(),
                user_id: req.user_id,
                spot_id: req.spot_id,
                vehicle_id: req.vehicle_id,
                start_time: req.start_time,
                end_time: req.end_time,
                amount: req.amount,
                currency: req.currency.clone(),
                status: OrderStatus::Created.as_str().into(),
                gateway_order_id: None,
                gateway_payment_id: None,
                created_at: None,
                updated_at: None,
            };
            t.orders.push(order.clone());
            Ok(order)
        })
    }

    async fn attach_gateway_order(
        &self,
        order_id: i32,
        gateway_order_id: &str,
    ) -> Result<Order, RepositoryError> {
        self.with(|t| {
            let order = t
                .orders
                .iter_mut()
                .find(|o| o.order_id == order_id)
                .ok_or(RepositoryError::NotFound)?;
            order.gateway_order_id = Some(gateway_order_id.into());
            Ok(order.clone())
        })
    }

    async fn mark_paid(
        &self,
        order_id: i32,
        gateway_payment_id: &str,
    ) -> Result<Order, RepositoryError> {
        self.with(|t| {
            let order = t
                .orders
                .iter_mut()
                .find(|o| o.order_id == order_id && o.status == OrderStatus::Created.as_str())
                .ok_or_else(|| RepositoryError::Conflict("Order is not awaiting payment".into()))?;
            order.status = OrderStatus::Paid.as_str().into();
            order.gateway_payment_id = Some(gateway_payment_id.into());
            Ok(order.clone())
        })
    }

    async fn release(
        &self,
        order_id: i32,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        self.with(|t| {
            let order = t
                .orders
                .iter_mut()
                .find(|o| o.order_id == order_id && from.iter().any(|s| o.status == s.as_str()))
                .ok_or_else(|| RepositoryError::Conflict("Order changed concurrently".into()))?;
            order.status = to.as_str().into();
            let order = order.clone();

            if let Some(spot) = t.spots.iter_mut().find(|s| s.spot_id == order.spot_id) {
                spot.available_spots = (spot.available_spots + 1).min(spot.total_spots);
            }
            Ok(order)
        })
    }
}

struct FakeGateway {
    fail: AtomicBool,
}

#[async_trait]
impl PaymentGatewayTrait for FakeGateway {
    fn key_id(&self) -> &str {
        "rzp_test_key"
    }

    async fn create_order(&self, req: &GatewayOrderRequest) -> Result<GatewayOrder, ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Gateway("gateway unreachable".into()));
        }
        Ok(GatewayOrder {
            id: format!("gw_{}", req.receipt),
            amount: req.amount,
            currency: req.currency.clone(),
            status: "created".into(),
        })
    }

    fn verify_signature(&self, gateway_order_id: &str, gateway_payment_id: &str, signature: &str) -> bool {
        signature == format!("{gateway_order_id}|{gateway_payment_id}")
    }
}

#[derive(Default)]
struct RecordingMailQueue {
    sent: StdMutex<Vec<EmailRequest>>,
}

impl RecordingMailQueue {
    fn subjects_for(&self, to: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == to)
            .map(|m| m.subject.clone())
            .collect()
    }

    fn last_link(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|m| m.data.link.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailQueueTrait for RecordingMailQueue {
    async fn enqueue(&self, req: EmailRequest) -> Result<(), ServiceError> {
        self.sent.lock().unwrap().push(req);
        Ok(())
    }
}

struct PlainHashing;

#[async_trait]
impl HashingTrait for PlainHashing {
    async fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        Ok(format!("hashed:{password}"))
    }

    async fn compare_password(&self, hashed: &str, password: &str) -> Result<(), ServiceError> {
        if hashed == format!("hashed:{password}") {
            Ok(())
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }
}

#[derive(Debug)]
struct FakeJwt;

impl JwtServiceTrait for FakeJwt {
    fn generate_token(&self, user_id: i32, token_type: &str) -> Result<String, ServiceError> {
        Ok(format!("{token_type}:{user_id}:{}", Utc::now().timestamp_nanos_opt().unwrap_or(0)))
    }

    fn verify_token(&self, token: &str, expected_type: &str) -> Result<i32, ServiceError> {
        let mut parts = token.split(':');
        match (parts.next(), parts.next()) {
            (Some(kind), Some(id)) if kind == expected_type => {
                id.parse().map_err(|_| ServiceError::Unauthorized("bad token".into()))
            }
            (Some(_), Some(_)) => Err(ServiceError::InvalidTokenType),
            _ => Err(ServiceError::Unauthorized("bad token".into())),
        }
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    mail: Arc<RecordingMailQueue>,
    gateway: Arc<FakeGateway>,
    auth: AuthService,
    users: UserService,
    vehicles: DynVehicleService,
    verifications: DynVerificationService,
    spots: SpotService,
    orders: OrderService,
    payments: DynPaymentService,
}

impl Harness {
    async fn new() -> Self {
        Self::with_cache(CacheStore::disabled()).await
    }

    async fn with_cache(cache: CacheStore) -> Self {
        let store = Arc::new(MemoryStore::default());
        let mail = Arc::new(RecordingMailQueue::default());
        let gateway = Arc::new(FakeGateway {
            fail: AtomicBool::new(false),
        });
        let registry = Arc::new(Mutex::new(Registry::default()));
        let cache = Arc::new(cache);
        let hash = Arc::new(PlainHashing) as DynHashing;
        let base_url = "https://parkspot.test".to_string();

        let auth = AuthService::new(AuthServiceDeps {
            hash: hash.clone(),
            jwt: Arc::new(FakeJwt),
            mail: mail.clone(),
            reset_token: store.clone(),
            refresh_token: store.clone(),
            user_query: store.clone(),
            user_command: store.clone(),
            cache: cache.clone(),
            registry: registry.clone(),
            app_base_url: base_url.clone(),
        })
        .await;

        let users = UserService {
            query: Arc::new(UserQueryService::new(store.clone(), &registry).await),
            command: Arc::new(
                UserCommandService::new(
                    store.clone(),
                    store.clone(),
                    store.clone(),
                    hash,
                    &registry,
                )
                .await,
            ),
        };

        let vehicles = Arc::new(VehicleService::new(store.clone(), &registry).await);
        let verifications = Arc::new(
            VerificationService::new(
                store.clone(),
                store.clone(),
                mail.clone(),
                base_url,
                &registry,
            )
            .await,
        );

        let spots = SpotService {
            query: Arc::new(SpotQueryService::new(store.clone(), cache.clone(), &registry).await),
            command: Arc::new(
                SpotCommandService::new(SpotCommandServiceDeps {
                    query: store.clone(),
                    command: store.clone(),
                    verification: store.clone(),
                    cache_store: cache.clone(),
                    registry: registry.clone(),
                })
                .await,
            ),
        };

        let orders = OrderService {
            query: Arc::new(OrderQueryService::new(store.clone(), store.clone(), &registry).await),
            command: Arc::new(
                OrderCommandService::new(OrderCommandServiceDeps {
                    command: store.clone(),
                    query: store.clone(),
                    spot_query: store.clone(),
                    vehicle: store.clone(),
                    gateway: gateway.clone(),
                    cache_store: cache,
                    registry: registry.clone(),
                })
                .await,
            ),
        };

        let payments = Arc::new(
            PaymentService::new(PaymentServiceDeps {
                order_query: store.clone(),
                order_command: store.clone(),
                gateway: gateway.clone(),
                mail: mail.clone(),
                registry,
            })
            .await,
        );

        Self {
            store,
            mail,
            gateway,
            auth,
            users,
            vehicles,
            verifications,
            spots,
            orders,
            payments,
        }
    }

    fn session(user: &User) -> Session {
        Session::try_from(user).unwrap()
    }

    /// Parker with a vehicle, and an owner with one spot of `capacity` slots.
    fn marketplace(&self, capacity: i32) -> (Session, Vehicle, Session, Spot) {
        let parker = self.store.seed_user("parker@example.com", UserRole::Parker, true);
        let owner = self.store.seed_user("owner@example.com", UserRole::Owner, true);
        let vehicle = self.store.seed_vehicle(parker.user_id);
        let spot = self.store.seed_spot(owner.user_id, capacity);
        (Self::session(&parker), vehicle, Self::session(&owner), spot)
    }

    async fn book(&self, parker: &Session, vehicle: &Vehicle, spot: &Spot) -> Result<i32, ServiceError> {
        let start = Utc::now() + Duration::hours(1);
        let req = CreateOrderRequest {
            spot_id: spot.spot_id,
            vehicle_id: vehicle.vehicle_id,
            start_time: start,
            end_time: start + Duration::hours(3),
        };
        self.orders
            .command
            .create(parker, &req)
            .await
            .map(|res| res.data.id)
    }
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Asha".into(),
        email: email.into(),
        password: "password123".into(),
        confirm_password: "password123".into(),
        role: UserRole::Owner,
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn registration_requires_email_verification_before_login() {
    let h = Harness::new().await;

    let registered = h
        .auth
        .register
        .register(&register_request("Asha@Example.com"))
        .await
        .unwrap();
    assert_eq!(registered.data.email, "asha@example.com");
    assert!(!registered.data.is_verified);

    let err = h
        .auth
        .login
        .login(&login_request("asha@example.com", "password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let link = h.mail.last_link();
    let code = link.split("verify_code=").nth(1).unwrap();
    assert_eq!(code.len(), 32);

    h.auth.register.verify_code(code).await.unwrap();

    let tokens = h
        .auth
        .login
        .login(&login_request("asha@example.com", "password123"))
        .await
        .unwrap();
    assert!(tokens.data.access_token.starts_with("access:"));

    let session = h
        .auth
        .identity
        .authenticate(&tokens.data.access_token)
        .await
        .unwrap();
    assert_eq!(session.role, UserRole::Owner);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let h = Harness::new().await;
    h.auth
        .register
        .register(&register_request("asha@example.com"))
        .await
        .unwrap();

    let err = h
        .auth
        .register
        .register(&register_request("ASHA@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let h = Harness::new().await;
    h.store.seed_user("ravi@example.com", UserRole::Parker, true);

    let wrong = h
        .auth
        .login
        .login(&login_request("ravi@example.com", "nope-nope"))
        .await
        .unwrap_err();
    let unknown = h
        .auth
        .login
        .login(&login_request("ghost@example.com", "password123"))
        .await
        .unwrap_err();

    assert!(matches!(wrong, ServiceError::InvalidCredentials));
    assert!(matches!(unknown, ServiceError::InvalidCredentials));
}

#[tokio::test]
async fn refresh_rotates_the_stored_token() {
    let h = Harness::new().await;
    let user = h.store.seed_user("ravi@example.com", UserRole::Parker, true);

    let tokens = h
        .auth
        .login
        .login(&login_request("ravi@example.com", "password123"))
        .await
        .unwrap()
        .data;

    let rotated = h
        .auth
        .identity
        .refresh_token(&tokens.refresh_token)
        .await
        .unwrap()
        .data;
    assert_ne!(rotated.refresh_token, tokens.refresh_token);
    assert_eq!(h.store.refresh_tokens_of(user.user_id), 1);

    let err = h
        .auth
        .identity
        .refresh_token(&tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
}

#[tokio::test]
async fn password_reset_replaces_password_and_revokes_sessions() {
    let h = Harness::new().await;
    let user = h.store.seed_user("ravi@example.com", UserRole::Parker, true);
    h.auth
        .login
        .login(&login_request("ravi@example.com", "password123"))
        .await
        .unwrap();

    h.auth
        .passreset
        .forgot_password("ravi@example.com")
        .await
        .unwrap();
    let token = h.mail.last_link().split("token=").nth(1).unwrap().to_string();

    h.auth
        .passreset
        .reset_password(&CreateResetPasswordRequest {
            reset_token: token.clone(),
            password: "brand-new-pass".into(),
            confirm_password: "brand-new-pass".into(),
        })
        .await
        .unwrap();

    assert_eq!(h.store.refresh_tokens_of(user.user_id), 0);
    assert!(
        h.auth
            .login
            .login(&login_request("ravi@example.com", "brand-new-pass"))
            .await
            .is_ok()
    );

    let reused = h
        .auth
        .passreset
        .reset_password(&CreateResetPasswordRequest {
            reset_token: token,
            password: "another-pass".into(),
            confirm_password: "another-pass".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(reused, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn blocked_user_cannot_authenticate() {
    let h = Harness::new().await;
    let admin = h.store.seed_user("admin@example.com", UserRole::Admin, true);
    let parker = h.store.seed_user("ravi@example.com", UserRole::Parker, true);
    let tokens = h
        .auth
        .login
        .login(&login_request("ravi@example.com", "password123"))
        .await
        .unwrap()
        .data;

    h.users
        .command
        .set_blocked(&Harness::session(&admin), parker.user_id, true)
        .await
        .unwrap();

    let err = h
        .auth
        .identity
        .authenticate(&tokens.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert_eq!(h.store.refresh_tokens_of(parker.user_id), 0);
}

#[tokio::test]
async fn admin_cannot_block_or_delete_themselves() {
    let h = Harness::new().await;
    let admin = h.store.seed_user("admin@example.com", UserRole::Admin, true);
    let session = Harness::session(&admin);

    let blocked = h
        .users
        .command
        .set_blocked(&session, admin.user_id, true)
        .await
        .unwrap_err();
    let trashed = h
        .users
        .command
        .trash_user(&session, admin.user_id)
        .await
        .unwrap_err();

    assert!(matches!(blocked, ServiceError::BadRequest(_)));
    assert!(matches!(trashed, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let h = Harness::new().await;
    let seed = AdminSeed {
        name: "Root".into(),
        email: "root@parkspot.test".into(),
        password: "supersecret".into(),
    };

    h.users.command.ensure_admin(&seed).await.unwrap();
    h.users.command.ensure_admin(&seed).await.unwrap();

    let admins = h.store.with(|t| {
        t.users
            .iter()
            .filter(|u| u.email == "root@parkspot.test" && u.role == "admin" && u.is_verified)
            .count()
    });
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn vehicle_plates_are_unique_per_owner() {
    let h = Harness::new().await;
    let parker = h.store.seed_user("ravi@example.com", UserRole::Parker, true);
    let session = Harness::session(&parker);
    let req = CreateVehicleRequest {
        plate_number: "ka 01 ab 1234".into(),
        vehicle_type: crate::model::VehicleType::Car,
        model: None,
        color: None,
    };

    let created = h.vehicles.create(&session, &req).await.unwrap();
    assert_eq!(created.data.plate_number, "KA01AB1234");

    let err = h.vehicles.create(&session, &req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

fn spot_request() -> CreateSpotRequest {
    CreateSpotRequest {
        title: "Indiranagar driveway".into(),
        address: "100ft Road".into(),
        city: "Bengaluru".into(),
        latitude: 12.9719,
        longitude: 77.6412,
        hourly_rate: 3_000,
        daily_rate: 20_000,
        total_spots: 2,
        available_spots: None,
        features: vec!["CCTV".into()],
        image_url: None,
    }
}

#[tokio::test]
async fn listing_a_spot_requires_a_verified_document() {
    let h = Harness::new().await;
    let owner = h.store.seed_user("owner@example.com", UserRole::Owner, true);
    let session = Harness::session(&owner);

    let err = h
        .spots
        .command
        .create(&session, &spot_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    h.verifications
        .submit(
            &session,
            &SubmitVerificationRequest {
                document_url: "https://docs.test/aadhaar.pdf".into(),
            },
        )
        .await
        .unwrap();
    let pending = h
        .spots
        .command
        .create(&session, &spot_request())
        .await
        .unwrap_err();
    assert!(matches!(pending, ServiceError::Forbidden(_)));

    let verification_id = h.verifications.find_mine(&session).await.unwrap().data.id;
    h.verifications
        .review(
            verification_id,
            &ReviewVerificationRequest {
                status: VerificationStatus::Verified,
                remarks: None,
            },
        )
        .await
        .unwrap();
    assert!(!h.mail.subjects_for("owner@example.com").is_empty());

    let spot = h
        .spots
        .command
        .create(&session, &spot_request())
        .await
        .unwrap();
    assert_eq!(spot.data.available_spots, 2);
    assert_eq!(spot.data.features, vec!["cctv"]);
}

#[tokio::test]
async fn only_the_owner_edits_a_spot() {
    let h = Harness::new().await;
    let (parker, _, owner, spot) = h.marketplace(3);
    h.store.seed_verification(owner.user_id, VerificationStatus::Verified);

    let update = UpdateSpotRequest {
        title: Some("Renamed".into()),
        address: None,
        city: None,
        latitude: None,
        longitude: None,
        hourly_rate: None,
        daily_rate: None,
        total_spots: None,
        available_spots: None,
        features: None,
        image_url: None,
    };

    let err = h
        .spots
        .command
        .update(&parker, spot.spot_id, &update)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let updated = h
        .spots
        .command
        .update(&owner, spot.spot_id, &update)
        .await
        .unwrap();
    assert_eq!(updated.data.title, "Renamed");

    let missing = h.spots.command.delete(&owner, 9_999).await.unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn booking_takes_a_slot_and_opens_a_gateway_order() {
    let h = Harness::new().await;
    let (parker, vehicle, _, spot) = h.marketplace(1);

    let order_id = h.book(&parker, &vehicle, &spot).await.unwrap();
    let order = h.store.order(order_id).unwrap();

    assert_eq!(order.status, "created");
    assert_eq!(order.amount, 12_000);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.gateway_order_id.as_deref(), Some(format!("gw_order_{order_id}").as_str()));
    assert_eq!(h.store.spot(spot.spot_id).unwrap().available_spots, 0);

    let full = h.book(&parker, &vehicle, &spot).await.unwrap_err();
    assert!(matches!(full, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn gateway_failure_releases_the_reserved_slot() {
    let h = Harness::new().await;
    let (parker, vehicle, _, spot) = h.marketplace(1);
    h.gateway.fail.store(true, Ordering::SeqCst);

    let err = h.book(&parker, &vehicle, &spot).await.unwrap_err();
    assert!(matches!(err, ServiceError::Gateway(_)));

    assert_eq!(h.store.spot(spot.spot_id).unwrap().available_spots, 1);
    let statuses: Vec<String> = h.store.with(|t| t.orders.iter().map(|o| o.status.clone()).collect());
    assert_eq!(statuses, vec!["cancelled"]);
}

#[tokio::test]
async fn booking_rejects_bad_windows_and_foreign_vehicles() {
    let h = Harness::new().await;
    let (parker, vehicle, owner, spot) = h.marketplace(2);
    let start = Utc::now() - Duration::hours(2);

    let past = h
        .orders
        .command
        .create(
            &parker,
            &CreateOrderRequest {
                spot_id: spot.spot_id,
                vehicle_id: vehicle.vehicle_id,
                start_time: start,
                end_time: start + Duration::hours(1),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(past, ServiceError::BadRequest(_)));

    let foreign = h.book(&owner, &vehicle, &spot).await.unwrap_err();
    assert!(matches!(foreign, ServiceError::NotFound(_)));
    assert_eq!(h.store.spot(spot.spot_id).unwrap().available_spots, 2);
}

#[tokio::test]
async fn order_lifecycle_enforces_roles_and_transitions() {
    let h = Harness::new().await;
    let (parker, vehicle, owner, spot) = h.marketplace(1);
    let order_id = h.book(&parker, &vehicle, &spot).await.unwrap();

    let early = h.orders.command.complete(&owner, order_id).await.unwrap_err();
    assert!(matches!(early, ServiceError::Conflict(_)));

    let not_parker = h.orders.command.cancel(&owner, order_id).await.unwrap_err();
    assert!(matches!(not_parker, ServiceError::Forbidden(_)));

    let gateway_order_id = format!("gw_order_{order_id}");
    let payment_id = "pay_001".to_string();
    h.payments
        .verify(
            &parker,
            &VerifyPaymentRequest {
                order_id,
                gateway_signature: format!("{gateway_order_id}|{payment_id}"),
                gateway_order_id,
                gateway_payment_id: payment_id,
            },
        )
        .await
        .unwrap();
    assert!(
        h.mail
            .subjects_for("parker@example.com")
            .iter()
            .any(|s| s.contains("Booking confirmed"))
    );

    let stranger = h.store.seed_user("other@example.com", UserRole::Owner, true);
    let hidden = h
        .orders
        .query
        .find_by_id(&Harness::session(&stranger), order_id)
        .await
        .unwrap_err();
    assert!(matches!(hidden, ServiceError::Forbidden(_)));

    let completed = h.orders.command.complete(&owner, order_id).await.unwrap();
    assert_eq!(completed.data.status, "completed");
    assert_eq!(h.store.spot(spot.spot_id).unwrap().available_spots, 1);

    let late = h.orders.command.cancel(&parker, order_id).await.unwrap_err();
    assert!(matches!(late, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn payment_verification_rejects_forged_signatures() {
    let h = Harness::new().await;
    let (parker, vehicle, _, spot) = h.marketplace(1);
    let order_id = h.book(&parker, &vehicle, &spot).await.unwrap();

    let checkout = h.payments.checkout(&parker, order_id).await.unwrap().data;
    assert_eq!(checkout.key_id, "rzp_test_key");

    let forged = h
        .payments
        .verify(
            &parker,
            &VerifyPaymentRequest {
                order_id,
                gateway_order_id: checkout.gateway_order_id.clone(),
                gateway_payment_id: "pay_001".into(),
                gateway_signature: "forged".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(forged, ServiceError::BadRequest(_)));

    let mismatched = h
        .payments
        .verify(
            &parker,
            &VerifyPaymentRequest {
                order_id,
                gateway_order_id: "gw_someone_else".into(),
                gateway_payment_id: "pay_001".into(),
                gateway_signature: "gw_someone_else|pay_001".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(mismatched, ServiceError::BadRequest(_)));
    assert_eq!(h.store.order(order_id).unwrap().status, "created");
}

#[tokio::test]
async fn cancelled_order_cannot_be_paid() {
    let h = Harness::new().await;
    let (parker, vehicle, _, spot) = h.marketplace(1);
    let order_id = h.book(&parker, &vehicle, &spot).await.unwrap();

    h.orders.command.cancel(&parker, order_id).await.unwrap();
    assert_eq!(h.store.spot(spot.spot_id).unwrap().available_spots, 1);

    let err = h.payments.checkout(&parker, order_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn search_hides_full_spots_by_default() {
    let h = Harness::new().await;
    let owner = h.store.seed_user("owner@example.com", UserRole::Owner, true);
    h.store.seed_spot(owner.user_id, 0);
    let open = h.store.seed_spot(owner.user_id, 2);

    let found = h
        .spots
        .query
        .search(&SearchSpotsQuery::default())
        .await
        .unwrap();

    assert_eq!(found.pagination.total_items, 1);
    assert_eq!(found.data[0].id, open.spot_id);
}

#[tokio::test]
async fn repeated_login_failures_lock_the_account_out() {
    let h = Harness::with_cache(CacheStore::in_memory()).await;
    h.store.seed_user("ravi@example.com", UserRole::Parker, true);

    for _ in 0..5 {
        let err = h
            .auth
            .login
            .login(&login_request("ravi@example.com", "nope-nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }

    let err = h
        .auth
        .login
        .login(&login_request("RAVI@example.com", "password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::TooManyAttempts(_)));

    let other = h.store.seed_user("asha@example.com", UserRole::Parker, true);
    let tokens = h
        .auth
        .login
        .login(&login_request(&other.email, "password123"))
        .await
        .unwrap();
    assert!(tokens.data.access_token.starts_with("access:"));
}

#[tokio::test]
async fn successful_login_clears_the_failure_count() {
    let h = Harness::with_cache(CacheStore::in_memory()).await;
    h.store.seed_user("ravi@example.com", UserRole::Parker, true);

    for round in 0..2 {
        for _ in 0..4 {
            h.auth
                .login
                .login(&login_request("ravi@example.com", "nope-nope"))
                .await
                .unwrap_err();
        }
        assert!(
            h.auth
                .login
                .login(&login_request("ravi@example.com", "password123"))
                .await
                .is_ok(),
            "round {round} should still accept the right password"
        );
    }
}

#[tokio::test]
async fn failures_are_not_counted_without_a_cache() {
    let h = Harness::new().await;
    h.store.seed_user("ravi@example.com", UserRole::Parker, true);

    for _ in 0..6 {
        h.auth
            .login
            .login(&login_request("ravi@example.com", "nope-nope"))
            .await
            .unwrap_err();
    }

    assert!(
        h.auth
            .login
            .login(&login_request("ravi@example.com", "password123"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn verification_code_works_only_once() {
    let h = Harness::new().await;
    h.auth
        .register
        .register(&register_request("asha@example.com"))
        .await
        .unwrap();

    let link = h.mail.last_link();
    let code = link.split("verify_code=").nth(1).unwrap().to_string();

    let verified = h.auth.register.verify_code(&code).await.unwrap();
    assert!(verified.data.is_verified);

    let err = h.auth.register.verify_code(&code).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn resend_verification_needs_an_unverified_account() {
    let h = Harness::new().await;
    h.store.seed_user("done@example.com", UserRole::Parker, true);
    h.auth
        .register
        .register(&register_request("asha@example.com"))
        .await
        .unwrap();
    let first = h.mail.last_link();

    let unknown = h
        .auth
        .register
        .resend_verification(&ResendVerificationRequest {
            email: "ghost@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(unknown, ServiceError::NotFound(_)));

    let verified = h
        .auth
        .register
        .resend_verification(&ResendVerificationRequest {
            email: "done@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(verified, ServiceError::Conflict(_)));

    h.auth
        .register
        .resend_verification(&ResendVerificationRequest {
            email: "Asha@Example.com".into(),
        })
        .await
        .unwrap();
    let second = h.mail.last_link();
    assert_ne!(first, second);

    let stale = first.split("verify_code=").nth(1).unwrap();
    let err = h.auth.register.verify_code(stale).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let fresh = second.split("verify_code=").nth(1).unwrap();
    h.auth.register.verify_code(fresh).await.unwrap();
}

#[tokio::test]
async fn rejected_documents_can_be_resubmitted() {
    let h = Harness::new().await;
    let owner = h.store.seed_user("owner@example.com", UserRole::Owner, true);
    let session = Harness::session(&owner);
    let document = |url: &str| SubmitVerificationRequest {
        document_url: url.into(),
    };

    h.verifications
        .submit(&session, &document("https://docs.test/blurry.pdf"))
        .await
        .unwrap();
    let first = h.verifications.find_mine(&session).await.unwrap().data;
    h.verifications
        .review(
            first.id,
            &ReviewVerificationRequest {
                status: VerificationStatus::Rejected,
                remarks: Some("Unreadable".into()),
            },
        )
        .await
        .unwrap();

    let resubmitted = h
        .verifications
        .submit(&session, &document("https://docs.test/clear.pdf"))
        .await
        .unwrap()
        .data;
    assert_eq!(resubmitted.status, VerificationStatus::Pending.as_str());
    assert_eq!(resubmitted.document_url, "https://docs.test/clear.pdf");

    h.verifications
        .review(
            resubmitted.id,
            &ReviewVerificationRequest {
                status: VerificationStatus::Verified,
                remarks: None,
            },
        )
        .await
        .unwrap();

    let err = h
        .verifications
        .submit(&session, &document("https://docs.test/again.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn spot_cache_is_dropped_on_booking_update_and_delete() {
    let h = Harness::with_cache(CacheStore::in_memory()).await;
    let (parker, vehicle, owner, spot) = h.marketplace(3);
    h.store.seed_verification(owner.user_id, VerificationStatus::Verified);

    let cached = h.spots.query.find_by_id(spot.spot_id).await.unwrap().data;
    assert_eq!(cached.available_spots, 3);

    h.store.with(|t| {
        if let Some(s) = t.spots.iter_mut().find(|s| s.spot_id == spot.spot_id) {
            s.title = "Changed behind the cache".into();
        }
    });
    let stale = h.spots.query.find_by_id(spot.spot_id).await.unwrap().data;
    assert_eq!(stale.title, cached.title);

    h.book(&parker, &vehicle, &spot).await.unwrap();
    let after_booking = h.spots.query.find_by_id(spot.spot_id).await.unwrap().data;
    assert_eq!(after_booking.available_spots, 2);
    assert_eq!(after_booking.title, "Changed behind the cache");

    let update = UpdateSpotRequest {
        title: Some("Renamed".into()),
        address: None,
        city: None,
        latitude: None,
        longitude: None,
        hourly_rate: None,
        daily_rate: None,
        total_spots: None,
        available_spots: None,
        features: None,
        image_url: None,
    };
    h.spots
        .command
        .update(&owner, spot.spot_id, &update)
        .await
        .unwrap();
    let after_update = h.spots.query.find_by_id(spot.spot_id).await.unwrap().data;
    assert_eq!(after_update.title, "Renamed");

    h.spots.command.delete(&owner, spot.spot_id).await.unwrap();
    let err = h.spots.query.find_by_id(spot.spot_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
