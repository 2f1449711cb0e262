use serde::{Deserialize, Serialize};
use validator::Validate;

/// Property attributes submitted for a rent prediction
///
/// The declared ranges are checked at the HTTP boundary, before the
/// request reaches the prediction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RentInput {
    #[validate(range(min = 0.0, max = 20.0))]
    pub bedrooms: f64,
    #[validate(range(min = 0.0, max = 20.0))]
    pub bathrooms: f64,
    #[validate(range(min = 50.0, max = 10000.0))]
    pub floor_area: f64,
    pub lat: f64,
    pub lng: f64,

    /// Property category, e.g. "home" or "short_term"
    pub category: String,
    /// Property condition, e.g. "new" or "used"
    pub condition: String,
    /// "Yes" / "No"
    pub is_furnished: String,
    /// "Yes" / "No"
    pub parking_space: String,
    /// Amenities summary or main feature
    pub amenities: String,
    pub region: String,
    /// Locality within the region
    pub locality: String,
}

impl RentInput {
    /// Numeric fields keyed by the column name they feed
    pub fn numeric_features(&self) -> [(&'static str, f64); 5] {
        [
            ("bedrooms", self.bedrooms),
            ("bathrooms", self.bathrooms),
            ("floor_area", self.floor_area),
            ("lat", self.lat),
            ("lng", self.lng),
        ]
    }

    /// Categorical fields keyed by the prefix of their indicator columns
    pub fn categorical_features(&self) -> [(&'static str, &str); 7] {
        [
            ("category", self.category.as_str()),
            ("condition", self.condition.as_str()),
            ("is_furnished", self.is_furnished.as_str()),
            ("parking_space", self.parking_space.as_str()),
            ("amenities", self.amenities.as_str()),
            ("region", self.region.as_str()),
            ("locality", self.locality.as_str()),
        ]
    }
}
