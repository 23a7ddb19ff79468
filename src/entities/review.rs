// ✍️ Review - a user's text about a place

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub place_id: String,
    pub user_id: String,
    pub text: String,
}
