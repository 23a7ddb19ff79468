// 🏷️ Kind - the closed set of record categories
//
// The kind name doubles as the "__class__" tag in the persisted document and
// as the prefix of every registry key ("User.<id>").

use std::fmt;

use super::model::Attributes;
use super::{Amenity, City, Place, Review, State, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    BaseModel,
    User,
    State,
    City,
    Place,
    Amenity,
    Review,
}

impl Kind {
    /// Every known kind, in the order `help` and docs list them
    pub const ALL: [Kind; 7] = [
        Kind::BaseModel,
        Kind::User,
        Kind::State,
        Kind::City,
        Kind::Place,
        Kind::Amenity,
        Kind::Review,
    ];

    /// Name used on the command line, in keys and in the `__class__` tag
    pub fn name(&self) -> &'static str {
        match self {
            Kind::BaseModel => "BaseModel",
            Kind::User => "User",
            Kind::State => "State",
            Kind::City => "City",
            Kind::Place => "Place",
            Kind::Amenity => "Amenity",
            Kind::Review => "Review",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Field set a fresh record of this kind starts with
    pub fn default_attributes(&self) -> Attributes {
        match self {
            Kind::BaseModel => Attributes::BaseModel,
            Kind::User => Attributes::User(User::default()),
            Kind::State => Attributes::State(State::default()),
            Kind::City => Attributes::City(City::default()),
            Kind::Place => Attributes::Place(Place::default()),
            Kind::Amenity => Attributes::Amenity(Amenity::default()),
            Kind::Review => Attributes::Review(Review::default()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_every_kind() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(Kind::from_name("user"), None);
        assert_eq!(Kind::from_name("BaseModel"), Some(Kind::BaseModel));
        assert_eq!(Kind::from_name("Base"), None);
        assert_eq!(Kind::from_name(""), None);
    }

    #[test]
    fn test_default_attributes_match_kind() {
        for kind in Kind::ALL {
            assert_eq!(kind.default_attributes().kind(), kind);
        }
    }
}
