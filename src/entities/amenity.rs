// 🛁 Amenity - something a place offers (wifi, pool, ...)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenity {
    pub name: String,
}
