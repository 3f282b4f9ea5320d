//! Filter criteria evaluated against stored items.
//!
//! [`ItemFilter`] is what arrives on the query string; [`ItemQuery`] is the
//! checked form the repository evaluates. All constraints are combined with
//! AND.

use chrono::{DateTime, Utc};

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemFilter, LATITUDE_RANGE, LONGITUDE_RANGE};

/// Closed latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> ItemResult<Self> {
        let bounds = [
            ("minLat", min_lat, 90.0, LATITUDE_RANGE),
            ("maxLat", max_lat, 90.0, LATITUDE_RANGE),
            ("minLon", min_lon, 180.0, LONGITUDE_RANGE),
            ("maxLon", max_lon, 180.0, LONGITUDE_RANGE),
        ];
        for (field, value, limit, reason) in bounds {
            if !(-limit..=limit).contains(&value) {
                return Err(ItemError::validation(field, reason));
            }
        }

        if min_lat > max_lat {
            return Err(ItemError::validation(
                "maxLat",
                "must not be less than minLat",
            ));
        }
        if min_lon > max_lon {
            return Err(ItemError::validation(
                "maxLon",
                "must not be less than minLon",
            ));
        }

        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

/// Validated filter criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    /// Lowercased keyword
    keyword: Option<String>,
    bounding_box: Option<BoundingBox>,
    valid_at: Option<DateTime<Utc>>,
    owner_id: Option<String>,
}

impl ItemQuery {
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_lowercase());
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn with_valid_at(mut self, instant: DateTime<Utc>) -> Self {
        self.valid_at = Some(instant);
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.keyword.is_none()
            && self.bounding_box.is_none()
            && self.valid_at.is_none()
            && self.owner_id.is_none()
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(keyword) = &self.keyword {
            if !item.keywords.iter().any(|k| k.to_lowercase() == *keyword) {
                return false;
            }
        }
        if let Some(bbox) = &self.bounding_box {
            if !bbox.contains(item.latitude, item.longitude) {
                return false;
            }
        }
        if let Some(instant) = self.valid_at {
            if instant < item.valid_from || instant > item.valid_to {
                return false;
            }
        }
        if let Some(owner_id) = &self.owner_id {
            if item.owner_id != *owner_id {
                return false;
            }
        }
        true
    }
}

/// Parse an RFC 3339 instant from the query string.
///
/// Form decoding turns an unencoded `+` offset into a space, so a failed
/// parse is retried with spaces read back as `+`.
fn parse_instant(raw: &str) -> ItemResult<DateTime<Utc>> {
    let parse = |value: &str| {
        DateTime::parse_from_rfc3339(value).map(|instant| instant.with_timezone(&Utc))
    };

    let raw = raw.trim();
    parse(raw)
        .or_else(|_| parse(&raw.replace(' ', "+")))
        .map_err(|_| ItemError::validation("validAt", "must be an RFC 3339 timestamp"))
}

impl TryFrom<ItemFilter> for ItemQuery {
    type Error = ItemError;

    fn try_from(filter: ItemFilter) -> ItemResult<Self> {
        let mut query = ItemQuery::default();

        if let Some(keyword) = filter.keyword {
            if keyword.trim().is_empty() {
                return Err(ItemError::validation("keyword", "must not be blank"));
            }
            query = query.with_keyword(&keyword);
        }

        let bounds = [
            ("minLat", filter.min_lat),
            ("maxLat", filter.max_lat),
            ("minLon", filter.min_lon),
            ("maxLon", filter.max_lon),
        ];
        if bounds.iter().any(|(_, value)| value.is_some()) {
            if let Some((missing, _)) = bounds.iter().find(|(_, value)| value.is_none()) {
                return Err(ItemError::validation(
                    *missing,
                    "is required when filtering by bounding box",
                ));
            }
            let [min_lat, max_lat, min_lon, max_lon] = bounds.map(|(_, v)| v.unwrap_or_default());
            query = query.with_bounding_box(BoundingBox::new(min_lat, max_lat, min_lon, max_lon)?);
        }

        if let Some(raw) = filter.valid_at {
            query = query.with_valid_at(parse_instant(&raw)?);
        }

        if let Some(owner_id) = filter.owner_id {
            if owner_id.trim().is_empty() {
                return Err(ItemError::validation("ownerId", "must not be blank"));
            }
            query = query.with_owner(owner_id);
        }

        Ok(query)
    }
}
