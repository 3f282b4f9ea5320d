use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult};

pub const LATITUDE_RANGE: &str = "must be between -90 and 90";
pub const LONGITUDE_RANGE: &str = "must be between -180 and 180";
const REQUIRED: &str = "is required";

/// Item entity - a lost or found object with its location and validity window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier assigned by the catalog
    pub id: Uuid,
    /// Opaque identifier of the submitter
    pub owner_id: String,
    /// Keywords describing the item, in submission order
    pub keywords: Vec<String>,
    /// Free-text description
    pub description: String,
    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Latitude in degrees, -90..=90
    pub latitude: f64,
    /// Longitude in degrees, -180..=180
    pub longitude: f64,
    /// Start of the validity window
    pub valid_from: DateTime<Utc>,
    /// End of the validity window
    pub valid_to: DateTime<Utc>,
}

/// A create field as sent by the client: either the expected type or
/// whatever JSON arrived in its place.
///
/// Keeping mistyped values lets validation report them per field, in field
/// order, instead of failing the whole body at deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(serde_json::Value),
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Lenient::Invalid(_))
    }

    fn into_valid(self) -> Option<T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Invalid(_) => None,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}

/// DTO for creating a new item.
///
/// Every field is optional and leniently typed on the wire so a missing or
/// mistyped field can be reported by name instead of failing
/// deserialization. Legacy names (`user_id`, `lat`, `lon`) are accepted as
/// aliases.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[serde(alias = "owner_id", alias = "user_id")]
    #[schema(value_type = Option<String>)]
    pub owner_id: Option<Lenient<String>>,
    #[schema(value_type = Option<Vec<String>>)]
    pub keywords: Option<Lenient<Vec<String>>>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Lenient<String>>,
    #[schema(value_type = Option<String>)]
    pub image: Option<Lenient<String>>,
    #[serde(alias = "lat")]
    #[schema(value_type = Option<f64>)]
    pub latitude: Option<Lenient<f64>>,
    #[serde(alias = "lon")]
    #[schema(value_type = Option<f64>)]
    pub longitude: Option<Lenient<f64>>,
}

/// Create input that passed validation; handed to the repository.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewItem {
    pub owner_id: String,
    pub keywords: Vec<String>,
    pub description: String,
    pub image: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Query parameters accepted when listing items.
///
/// The four bounding-box bounds must be given together.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    /// Items having this keyword (case-insensitive exact match)
    pub keyword: Option<String>,
    /// Southern edge of the bounding box
    pub min_lat: Option<f64>,
    /// Northern edge of the bounding box
    pub max_lat: Option<f64>,
    /// Western edge of the bounding box
    pub min_lon: Option<f64>,
    /// Eastern edge of the bounding box
    pub max_lon: Option<f64>,
    /// Items whose validity window contains this instant (RFC 3339).
    /// A `+` in the offset must be sent as `%2B`; an unencoded `+` arrives
    /// as a space and is read back as `+`.
    pub valid_at: Option<String>,
    /// Items submitted by this owner
    pub owner_id: Option<String>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_missing_text(field: &Option<Lenient<String>>) -> bool {
    match field {
        None => true,
        Some(value) => value.valid().is_some_and(|text| is_blank(text)),
    }
}

fn is_mistyped<T>(field: &Option<Lenient<T>>) -> bool {
    field.as_ref().is_some_and(Lenient::is_invalid)
}

const MUST_BE_STRING: &str = "must be a string";
const MUST_BE_STRING_LIST: &str = "must be a list of strings";
const MUST_BE_NUMBER: &str = "must be a number";

impl CreateItem {
    /// Validate and convert into a [`NewItem`].
    ///
    /// Checks run in three passes, each in field order (ownerId, keywords,
    /// description, image, latitude, longitude): presence of the required
    /// fields, then JSON types, then coordinate ranges. The first failure is
    /// returned.
    pub fn into_new_item(self) -> ItemResult<NewItem> {
        self.check_presence()?;
        self.check_types()?;

        // Presence and types were checked above, the fallbacks are unreachable.
        let new_item = NewItem {
            owner_id: self.owner_id.and_then(Lenient::into_valid).unwrap_or_default(),
            keywords: self.keywords.and_then(Lenient::into_valid).unwrap_or_default(),
            description: self
                .description
                .and_then(Lenient::into_valid)
                .unwrap_or_default(),
            image: self
                .image
                .and_then(Lenient::into_valid)
                .filter(|url| !is_blank(url)),
            latitude: self.latitude.and_then(Lenient::into_valid).unwrap_or_default(),
            longitude: self.longitude.and_then(Lenient::into_valid).unwrap_or_default(),
        };

        check_ranges(&new_item)?;
        Ok(new_item)
    }

    fn check_presence(&self) -> ItemResult<()> {
        if is_missing_text(&self.owner_id) {
            return Err(ItemError::validation("ownerId", REQUIRED));
        }

        match self.keywords.as_ref().map(|k| k.valid().map(Vec::as_slice)) {
            None | Some(Some([])) => return Err(ItemError::validation("keywords", REQUIRED)),
            Some(Some(keywords)) if keywords.iter().any(|k| is_blank(k)) => {
                return Err(ItemError::validation(
                    "keywords",
                    "must not contain blank keywords",
                ));
            }
            Some(_) => {}
        }

        if is_missing_text(&self.description) {
            return Err(ItemError::validation("description", REQUIRED));
        }
        if self.latitude.is_none() {
            return Err(ItemError::validation("latitude", REQUIRED));
        }
        if self.longitude.is_none() {
            return Err(ItemError::validation("longitude", REQUIRED));
        }

        Ok(())
    }

    fn check_types(&self) -> ItemResult<()> {
        let fields = [
            ("ownerId", is_mistyped(&self.owner_id), MUST_BE_STRING),
            ("keywords", is_mistyped(&self.keywords), MUST_BE_STRING_LIST),
            ("description", is_mistyped(&self.description), MUST_BE_STRING),
            ("image", is_mistyped(&self.image), MUST_BE_STRING),
            ("latitude", is_mistyped(&self.latitude), MUST_BE_NUMBER),
            ("longitude", is_mistyped(&self.longitude), MUST_BE_NUMBER),
        ];

        match fields.into_iter().find(|(_, invalid, _)| *invalid) {
            Some((field, _, reason)) => Err(ItemError::validation(field, reason)),
            None => Ok(()),
        }
    }

    /// Demo item seeded at startup when enabled.
    pub fn sample() -> Self {
        Self {
            owner_id: Some("demo".to_string().into()),
            keywords: Some(
                vec!["saw".to_string(), "wood".to_string(), "tools".to_string()].into(),
            ),
            description: Some("A saw and wood".to_string().into()),
            image: Some("https://placekitten.com/200/300".to_string().into()),
            latitude: Some(Lenient::Valid(37.38797546109132)),
            longitude: Some(Lenient::Valid(-122.05688209785687)),
        }
    }
}

fn check_ranges(item: &NewItem) -> ItemResult<()> {
    let errors = item.validate().err();

    let coordinates = [
        ("latitude", item.latitude, LATITUDE_RANGE),
        ("longitude", item.longitude, LONGITUDE_RANGE),
    ];
    for (field, value, reason) in coordinates {
        let out_of_range = errors
            .as_ref()
            .is_some_and(|e| e.field_errors().contains_key(field));
        // NaN compares false against both bounds, so the range rule lets it through.
        if out_of_range || value.is_nan() {
            return Err(ItemError::validation(field, reason));
        }
    }

    Ok(())
}

impl Item {
    /// Build a stored item; the validity window opens and closes at `now`.
    pub fn new(id: Uuid, input: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: input.owner_id,
            keywords: input.keywords,
            description: input.description,
            image: input.image,
            latitude: input.latitude,
            longitude: input.longitude,
            valid_from: now,
            valid_to: now,
        }
    }
}

impl ItemFilter {
    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.min_lat.is_none()
            && self.max_lat.is_none()
            && self.min_lon.is_none()
            && self.max_lon.is_none()
            && self.valid_at.is_none()
            && self.owner_id.is_none()
    }
}
