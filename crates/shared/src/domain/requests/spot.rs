use crate::domain::{
    requests::user::{default_page, default_page_size},
    responses::Pagination,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Lower-cased, trimmed, de-duplicated tags in first-seen order.
pub fn normalize_features<I, S>(features: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for feature in features {
        let tag = feature.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

fn validate_capacity(req: &CreateSpotRequest) -> Result<(), ValidationError> {
    match req.available_spots {
        Some(available) if available > req.total_spots => Err(ValidationError::new(
            "available_spots",
        )
        .with_message("Available spots cannot exceed total spots".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_capacity"))]
pub struct CreateSpotRequest {
    #[validate(
        length(min = 1, max = 150, message = "Title is required"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 255, message = "Address is required"),
        custom(function = "validate_not_blank")
    )]
    pub address: String,

    #[validate(
        length(min = 1, max = 100, message = "City is required"),
        custom(function = "validate_not_blank")
    )]
    pub city: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,

    #[validate(range(min = 1, message = "Hourly rate must be at least 1"))]
    pub hourly_rate: i64,

    #[validate(range(min = 1, message = "Daily rate must be at least 1"))]
    pub daily_rate: i64,

    #[validate(range(min = 1, max = 10000, message = "Total spots must be at least 1"))]
    pub total_spots: i32,

    #[validate(range(min = 0, message = "Available spots cannot be negative"))]
    pub available_spots: Option<i32>,

    #[serde(default)]
    pub features: Vec<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSpotRequest {
    #[validate(
        length(min = 1, max = 150, message = "Title must not be empty"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = 255, message = "Address must not be empty"),
        custom(function = "validate_not_blank")
    )]
    pub address: Option<String>,

    #[validate(
        length(min = 1, max = 100, message = "City must not be empty"),
        custom(function = "validate_not_blank")
    )]
    pub city: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,

    #[validate(range(min = 1, message = "Hourly rate must be at least 1"))]
    pub hourly_rate: Option<i64>,

    #[validate(range(min = 1, message = "Daily rate must be at least 1"))]
    pub daily_rate: Option<i64>,

    #[validate(range(min = 1, max = 10000, message = "Total spots must be at least 1"))]
    pub total_spots: Option<i32>,

    #[validate(range(min = 0, message = "Available spots cannot be negative"))]
    pub available_spots: Option<i32>,

    pub features: Option<Vec<String>>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Normalized insert data.
#[derive(Debug, Clone)]
pub struct CreateSpotRecord {
    pub owner_id: i32,
    pub title: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hourly_rate: i64,
    pub daily_rate: i64,
    pub total_spots: i32,
    pub available_spots: i32,
    pub features: Vec<String>,
    pub image_url: Option<String>,
}

impl CreateSpotRecord {
    pub fn new(owner_id: i32, req: &CreateSpotRequest) -> Self {
        Self {
            owner_id,
            title: req.title.trim().to_string(),
            address: req.address.trim().to_string(),
            city: req.city.trim().to_string(),
            latitude: req.latitude,
            longitude: req.longitude,
            hourly_rate: req.hourly_rate,
            daily_rate: req.daily_rate,
            total_spots: req.total_spots,
            available_spots: req.available_spots.unwrap_or(req.total_spots),
            features: normalize_features(&req.features),
            image_url: req.image_url.clone(),
        }
    }
}

/// Partial update; `None` keeps the stored value. When only `total_spots` changes the
/// available count moves by the same delta.
#[derive(Debug, Clone, Default)]
pub struct UpdateSpotRecord {
    pub spot_id: i32,
    pub title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hourly_rate: Option<i64>,
    pub daily_rate: Option<i64>,
    pub total_spots: Option<i32>,
    pub available_spots: Option<i32>,
    pub features: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl UpdateSpotRecord {
    pub fn new(spot_id: i32, req: &UpdateSpotRequest) -> Self {
        Self {
            spot_id,
            title: req.title.as_deref().map(|v| v.trim().to_string()),
            address: req.address.as_deref().map(|v| v.trim().to_string()),
            city: req.city.as_deref().map(|v| v.trim().to_string()),
            latitude: req.latitude,
            longitude: req.longitude,
            hourly_rate: req.hourly_rate,
            daily_rate: req.daily_rate,
            total_spots: req.total_spots,
            available_spots: req.available_spots,
            features: req.features.as_ref().map(normalize_features),
            image_url: req.image_url.clone(),
        }
    }
}

/// Public search parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct SearchSpotsQuery {
    /// Matches title, address or city, case-insensitive.
    pub search: Option<String>,

    pub city: Option<String>,

    /// Comma-separated tags; a spot must carry all of them.
    pub features: Option<String>,

    #[validate(range(min = 1, message = "max_hourly_rate must be at least 1"))]
    pub max_hourly_rate: Option<i64>,

    #[validate(range(min = 0, message = "min_available cannot be negative"))]
    pub min_available: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "lng must be between -180 and 180"))]
    pub lng: Option<f64>,

    #[validate(range(min = 0.1, max = 100.0, message = "radius_km must be between 0.1 and 100"))]
    pub radius_km: Option<f64>,

    #[validate(range(min = 1, max = 100000, message = "Page must be between 1 and 100000"))]
    pub page: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: Option<i32>,
}

/// Resolved filter handed to the repository. `limit = None` returns every match.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotSearchFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub features: Vec<String>,
    pub max_hourly_rate: Option<i64>,
    pub min_available: i32,
    pub bbox: Option<crate::utils::BoundingBox>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl SearchSpotsQuery {
    pub fn page(&self) -> i32 {
        self.page.unwrap_or_else(default_page)
    }

    pub fn page_size(&self) -> i32 {
        self.page_size.unwrap_or_else(default_page_size)
    }

    /// Centre and radius when both coordinates are given.
    pub fn location(&self) -> Option<(f64, f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng, self.radius_km.unwrap_or(DEFAULT_RADIUS_KM))),
            _ => None,
        }
    }

    pub fn feature_list(&self) -> Vec<String> {
        self.features
            .as_deref()
            .map(|raw| normalize_features(raw.split(',')))
            .unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SpotSearchFilter {
    pub fn from_query(query: &SearchSpotsQuery) -> Self {
        let page_size = query.page_size().clamp(1, 100);
        let bbox = query
            .location()
            .map(|(lat, lng, radius)| crate::utils::bounding_box(lat, lng, radius));

        Self {
            search: non_empty(&query.search),
            city: non_empty(&query.city),
            features: query.feature_list(),
            max_hourly_rate: query.max_hourly_rate,
            min_available: query.min_available.unwrap_or(1),
            limit: if bbox.is_some() { None } else { Some(i64::from(page_size)) },
            offset: if bbox.is_some() {
                0
            } else {
                Pagination::offset(query.page(), page_size)
            },
            bbox,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllSpots {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100000, message = "Page must be between 1 and 100000"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateSpotRequest {
        CreateSpotRequest {
            title: "MG Road basement".into(),
            address: "12 MG Road".into(),
            city: "Bengaluru".into(),
            latitude: 12.9756,
            longitude: 77.6050,
            hourly_rate: 4_000,
            daily_rate: 30_000,
            total_spots: 10,
            available_spots: None,
            features: vec![" Covered".into(), "cctv".into(), "covered ".into(), "".into()],
            image_url: None,
        }
    }

    #[test]
    fn features_are_normalized() {
        let record = CreateSpotRecord::new(3, &create_request());
        assert_eq!(record.features, vec!["covered", "cctv"]);
        assert_eq!(record.available_spots, 10);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut req = create_request();
        assert!(req.validate().is_ok());

        req.latitude = 91.0;
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.available_spots = Some(11);
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.title = "   ".into();
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.image_url = Some("not a url".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn location_search_drops_sql_paging() {
        let query = SearchSpotsQuery {
            lat: Some(12.97),
            lng: Some(77.59),
            page: Some(2),
            features: Some("CCTV, covered,,".into()),
            ..Default::default()
        };

        let filter = SpotSearchFilter::from_query(&query);
        assert!(filter.bbox.is_some());
        assert_eq!(filter.limit, None);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.features, vec!["cctv", "covered"]);
        assert_eq!(filter.min_available, 1);
        assert_eq!(query.location(), Some((12.97, 77.59, DEFAULT_RADIUS_KM)));
    }

    #[test]
    fn plain_search_pages_in_sql() {
        let query = SearchSpotsQuery {
            city: Some("  ".into()),
            page: Some(3),
            page_size: Some(20),
            ..Default::default()
        };

        let filter = SpotSearchFilter::from_query(&query);
        assert_eq!(filter.city, None);
        assert_eq!(filter.limit, Some(20));
        assert_eq!(filter.offset, 40);
    }
}
