// 🏙️ City - belongs to a State through `state_id`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct City {
    /// Id of the owning State (not checked against the registry)
    pub state_id: String,
    pub name: String,
}
