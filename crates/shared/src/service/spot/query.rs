use super::{spot_cache_key, spot_cache_ttl};
use crate::{
    abstract_trait::{DynSpotQueryRepository, SpotQueryServiceTrait},
    cache::CacheStore,
    domain::{
        Session,
        requests::{FindAllSpots, SearchSpotsQuery, SpotSearchFilter},
        responses::{ApiResponse, ApiResponsePagination, Pagination, SpotResponse},
    },
    errors::ServiceError,
    model::Spot as SpotModel,
    utils::{Method, ServiceTracer, haversine_km},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub struct SpotQueryService {
    query: DynSpotQueryRepository,
    cache_store: Arc<CacheStore>,
    tracer: ServiceTracer,
}

impl SpotQueryService {
    pub async fn new(
        query: DynSpotQueryRepository,
        cache_store: Arc<CacheStore>,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let tracer = ServiceTracer::new("spot-query-service", "spot", registry).await;

        Self {
            query,
            cache_store,
            tracer,
        }
    }
}

/// Keeps the spots inside the radius, nearest first, and returns the requested page
/// together with the number of matches.
fn rank_by_distance(
    spots: Vec<SpotModel>,
    (lat, lng, radius_km): (f64, f64, f64),
    page: i32,
    page_size: i32,
) -> (Vec<SpotResponse>, i64) {
    let mut ranked: Vec<(f64, SpotModel)> = spots
        .into_iter()
        .map(|spot| (haversine_km(lat, lng, spot.latitude, spot.longitude), spot))
        .filter(|(distance, _)| *distance <= radius_km)
        .collect();

    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.spot_id.cmp(&b.1.spot_id)));

    let total = ranked.len() as i64;
    let skip = usize::try_from(Pagination::offset(page, page_size)).unwrap_or(usize::MAX);

    let data = ranked
        .into_iter()
        .skip(skip)
        .take(usize::try_from(page_size).unwrap_or(0))
        .map(|(distance, spot)| SpotResponse::from(spot).with_distance(distance))
        .collect();

    (data, total)
}

#[async_trait]
impl SpotQueryServiceTrait for SpotQueryService {
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<SpotResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindSpotById",
            vec![
                KeyValue::new("component", "spot"),
                KeyValue::new("spot.id", id.to_string()),
            ],
        );

        let cache_key = spot_cache_key(id);

        if let Some(cached) = self
            .cache_store
            .get_from_cache::<SpotResponse>(&cache_key)
            .await
        {
            info!("✅ Found spot {id} in cache");
            self.tracer
                .success(&tracing_ctx, method, "Spot retrieved from cache");
            return Ok(ApiResponse::success("Spot retrieved successfully", cached));
        }

        let spot = match self.query.find_by_id(id).await {
            Ok(Some(spot)) => SpotResponse::from(spot),
            Ok(None) => {
                self.tracer.error(&tracing_ctx, method, "Spot not found");
                return Err(ServiceError::NotFound(format!("Spot with id {id} not found")));
            }
            Err(e) => {
                error!("❌ Failed to fetch spot {id}: {e:?}");
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        self.cache_store
            .set_to_cache(&cache_key, &spot, spot_cache_ttl())
            .await;

        self.tracer.success(&tracing_ctx, method, "Spot retrieved");

        Ok(ApiResponse::success("Spot retrieved successfully", spot))
    }

    async fn search(
        &self,
        query: &SearchSpotsQuery,
    ) -> Result<ApiResponsePagination<Vec<SpotResponse>>, ServiceError> {
        let filter = SpotSearchFilter::from_query(query);
        let page = query.page().max(1);
        let page_size = query.page_size().clamp(1, 100);

        info!("🔍 Searching spots | filter: {:?}", filter);

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "SearchSpots",
            vec![
                KeyValue::new("component", "spot"),
                KeyValue::new("page", page as i64),
                KeyValue::new("page_size", page_size as i64),
                KeyValue::new("geo", filter.bbox.is_some()),
            ],
        );

        let (spots, total) = match self.query.search(&filter).await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ Spot search failed: {e:?}");
                self.tracer.error(&tracing_ctx, method, "Database error");
                return Err(ServiceError::Repo(e));
            }
        };

        let (data, total) = match query.location() {
            Some(location) => rank_by_distance(spots, location, page, page_size),
            None => (spots.into_iter().map(SpotResponse::from).collect(), total),
        };

        info!("✅ Spot search matched {total} spots");
        self.tracer.success(&tracing_ctx, method, "Spots searched");

        Ok(ApiResponsePagination::success(
            "Spots retrieved successfully",
            data,
            Pagination::new(page, page_size, total),
        ))
    }

    async fn find_mine(
        &self,
        session: &Session,
        req: &FindAllSpots,
    ) -> Result<ApiResponsePagination<Vec<SpotResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "FindMySpots",
            vec![
                KeyValue::new("component", "spot"),
                KeyValue::new("owner.id", session.user_id.to_string()),
            ],
        );

        match self.query.find_by_owner(session.user_id, req).await {
            Ok((spots, total)) => {
                self.tracer.success(&tracing_ctx, method, "Owner spots listed");
                Ok(ApiResponsePagination::success(
                    "Spots retrieved successfully",
                    spots.into_iter().map(SpotResponse::from).collect(),
                    Pagination::new(req.page, req.page_size, total),
                ))
            }
            Err(e) => {
                self.tracer.error(&tracing_ctx, method, "Database error");
                Err(ServiceError::Repo(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(id: i32, latitude: f64, longitude: f64) -> SpotModel {
        SpotModel {
            spot_id: id,
            owner_id: 1,
            title: format!("Spot {id}"),
            address: "Somewhere".into(),
            city: "Bengaluru".into(),
            latitude,
            longitude,
            hourly_rate: 5_000,
            daily_rate: 40_000,
            total_spots: 4,
            available_spots: 4,
            features: vec![],
            image_url: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn ranks_nearest_first_and_drops_outside_radius() {
        let centre = (12.9716, 77.5946, 5.0);
        let spots = vec![
            spot(1, 12.9900, 77.5946),
            spot(2, 12.9720, 77.5950),
            spot(3, 13.2000, 77.5946),
        ];

        let (data, total) = rank_by_distance(spots, centre, 1, 10);

        assert_eq!(total, 2);
        assert_eq!(data.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);
        assert!(data[0].distance_km.unwrap() < data[1].distance_km.unwrap());
    }

    #[test]
    fn pages_after_ranking() {
        let centre = (12.9716, 77.5946, 10.0);
        let spots = (1..=5)
            .map(|i| spot(i, 12.9716 + i as f64 * 0.001, 77.5946))
            .collect();

        let (data, total) = rank_by_distance(spots, centre, 2, 2);

        assert_eq!(total, 5);
        assert_eq!(data.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn far_pages_are_empty() {
        let (data, total) = rank_by_distance(vec![], (12.0, 77.0, 5.0), 30_000_000, 100);
        assert!(data.is_empty());
        assert_eq!(total, 0);

        let spots = vec![spot(1, 12.0, 77.0)];
        let (data, total) = rank_by_distance(spots, (12.0, 77.0, 5.0), i32::MAX, 100);
        assert!(data.is_empty());
        assert_eq!(total, 1);
    }
}
