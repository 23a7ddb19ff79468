// 🏠 Place - a rentable listing
//
// The only kind with numeric and list fields, so it is where type coercion of
// update values actually matters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    // ========================================================================
    // REFERENCES (ids of other records, not validated)
    // ========================================================================
    pub city_id: String,
    pub user_id: String,

    // ========================================================================
    // DESCRIPTION
    // ========================================================================
    pub name: String,
    pub description: String,

    // ========================================================================
    // CAPACITY & PRICING
    // ========================================================================
    pub number_rooms: i64,
    pub number_bathrooms: i64,
    pub max_guest: i64,
    pub price_by_night: i64,

    // ========================================================================
    // LOCATION
    // ========================================================================
    pub latitude: f64,
    pub longitude: f64,

    /// Ids of the Amenity records this place offers
    pub amenity_ids: Vec<String>,
}
