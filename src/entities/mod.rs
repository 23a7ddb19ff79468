// Entity Models
//
// Every record has:
// - Stable identity (kind + UUID) that never changes
// - created_at / updated_at timestamps
// - A fixed field set per kind, plus an open extension map for anything else

pub mod kind;
pub mod model;
pub mod user;
pub mod state;
pub mod city;
pub mod place;
pub mod amenity;
pub mod review;

pub use kind::Kind;
pub use model::{Attributes, Entity, CLASS_TAG};
pub use user::User;
pub use state::State;
pub use city::City;
pub use place::Place;
pub use amenity::Amenity;
pub use review::Review;
