// 🧱 Entity - identity, timestamps and attributes of one record
//
// "Identity persists, values change": id and created_at are fixed at
// creation, everything else is an attribute the console may reassign.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

use super::{Amenity, City, Kind, Place, Review, State, User};
use crate::error::EntityError;

/// Reserved key carrying the kind name in the dict form
pub const CLASS_TAG: &str = "__class__";

/// ISO-8601 without offset, microsecond precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Keys the dict form always carries and no assignment may change
const RESERVED: [&str; 4] = ["id", "created_at", "updated_at", CLASS_TAG];

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Current UTC time, truncated to what the ISO form can carry
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts `2024-05-01T10:00:00`, `2024-05-01T10:00:00.123456` and RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).naive_utc())
        })
}

// ============================================================================
// ATTRIBUTES (fixed field set per kind)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Attributes {
    BaseModel,
    User(User),
    State(State),
    City(City),
    Place(Place),
    Amenity(Amenity),
    Review(Review),
}

impl Attributes {
    pub fn kind(&self) -> Kind {
        match self {
            Attributes::BaseModel => Kind::BaseModel,
            Attributes::User(_) => Kind::User,
            Attributes::State(_) => Kind::State,
            Attributes::City(_) => Kind::City,
            Attributes::Place(_) => Kind::Place,
            Attributes::Amenity(_) => Kind::Amenity,
            Attributes::Review(_) => Kind::Review,
        }
    }

    /// Fields as an ordered JSON map, in declaration order
    pub fn to_map(&self) -> Map<String, Value> {
        match self {
            Attributes::BaseModel => Map::new(),
            Attributes::User(fields) => fields_to_map(fields),
            Attributes::State(fields) => fields_to_map(fields),
            Attributes::City(fields) => fields_to_map(fields),
            Attributes::Place(fields) => fields_to_map(fields),
            Attributes::Amenity(fields) => fields_to_map(fields),
            Attributes::Review(fields) => fields_to_map(fields),
        }
    }

    /// Store `value` in the typed field `name`.
    ///
    /// Returns false when the kind has no such field or the value's JSON type
    /// does not fit it; the caller keeps the value elsewhere in that case.
    pub fn assign(&mut self, name: &str, value: &Value) -> bool {
        match self {
            Attributes::BaseModel => false,
            Attributes::User(fields) => assign_field(fields, name, value),
            Attributes::State(fields) => assign_field(fields, name, value),
            Attributes::City(fields) => assign_field(fields, name, value),
            Attributes::Place(fields) => assign_field(fields, name, value),
            Attributes::Amenity(fields) => assign_field(fields, name, value),
            Attributes::Review(fields) => assign_field(fields, name, value),
        }
    }
}

fn fields_to_map<T: Serialize>(fields: &T) -> Map<String, Value> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn assign_field<T: Serialize + DeserializeOwned>(fields: &mut T, name: &str, value: &Value) -> bool {
    let mut map = fields_to_map(fields);
    if !map.contains_key(name) {
        return false;
    }
    map.insert(name.to_string(), value.clone());

    let Ok(updated) = serde_json::from_value::<T>(Value::Object(map)) else {
        return false;
    };

    // the field must hold the value as given: an integer in a float field
    // would come back as 25.0
    if fields_to_map(&updated).get(name) != Some(value) {
        return false;
    }
    *fields = updated;
    true
}

// ============================================================================
// ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    attributes: Attributes,

    /// Names outside the kind's field set, and values that don't fit a
    /// field's type. Shadows the typed field of the same name.
    extra: IndexMap<String, Value>,
}

impl Entity {
    /// Fresh record: new UUID, both timestamps set to now.
    ///
    /// Not registered anywhere; the caller hands it to a `Registry`.
    pub fn new(kind: Kind) -> Self {
        let now = now();

        Entity {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: kind.default_attributes(),
            extra: IndexMap::new(),
        }
    }

    /// Rebuild a record from its dict form (the reload path)
    pub fn from_dict(kind: Kind, dict: &Map<String, Value>) -> Result<Self, EntityError> {
        let id = match dict.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => return Err(EntityError::MissingId),
        };

        let mut entity = Entity {
            id,
            created_at: timestamp_field(dict, "created_at")?,
            updated_at: timestamp_field(dict, "updated_at")?,
            attributes: kind.default_attributes(),
            extra: IndexMap::new(),
        };

        for (name, value) in dict {
            if RESERVED.contains(&name.as_str()) {
                continue;
            }
            entity.put(name, value.clone());
        }

        Ok(entity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Kind {
        self.attributes.kind()
    }

    /// Registry key: "Kind.id"
    pub fn key(&self) -> String {
        format!("{}.{}", self.kind(), self.id)
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// Move `updated_at` to now; never backwards if the clock steps back
    pub fn touch(&mut self) {
        let now = now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Assign one attribute. Returns false for reserved names, which are
    /// left untouched.
    pub fn set_attribute(&mut self, name: &str, value: Value) -> bool {
        if RESERVED.contains(&name) {
            debug!(key = %self.key(), attribute = name, "ignoring assignment to reserved attribute");
            return false;
        }
        self.put(name, value);
        true
    }

    /// Current value of `name` as it would be rendered
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attribute_map().get(name).cloned()
    }

    fn put(&mut self, name: &str, value: Value) {
        if self.attributes.assign(name, &value) {
            self.extra.shift_remove(name);
        } else {
            self.extra.insert(name.to_string(), value);
        }
    }

    /// id, timestamps, typed fields, then extension fields
    fn attribute_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert("created_at".into(), Value::String(format_timestamp(&self.created_at)));
        map.insert("updated_at".into(), Value::String(format_timestamp(&self.updated_at)));

        map.extend(self.attributes.to_map());
        for (name, value) in &self.extra {
            map.insert(name.clone(), value.clone());
        }
        map
    }

    /// JSON-ready form written to the backing file
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = self.attribute_map();
        dict.insert(CLASS_TAG.into(), Value::String(self.kind().name().to_string()));
        dict
    }
}

fn timestamp_field(dict: &Map<String, Value>, field: &'static str) -> Result<NaiveDateTime, EntityError> {
    let raw = dict
        .get(field)
        .and_then(Value::as_str)
        .ok_or(EntityError::MissingTimestamp { field })?;

    parse_timestamp(raw).ok_or_else(|| EntityError::InvalidTimestamp {
        field,
        value: raw.to_string(),
    })
}

impl fmt::Display for Entity {
    /// `[Kind] (id) {attributes}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {}", self.kind(), self.id, Value::Object(self.attribute_map()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_entity_has_identity_and_timestamps() {
        let entity = Entity::new(Kind::State);

        assert!(!entity.id().is_empty());
        assert_eq!(entity.kind(), Kind::State);
        assert_eq!(entity.created_at(), entity.updated_at());
        assert_eq!(entity.key(), format!("State.{}", entity.id()));
    }

    #[test]
    fn test_new_entities_get_distinct_ids() {
        let ids: std::collections::HashSet<String> = (0..100)
            .map(|_| Entity::new(Kind::BaseModel).id().to_string())
            .collect();

        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_to_dict_carries_class_tag_and_iso_timestamps() {
        let entity = Entity::new(Kind::User);
        let dict = entity.to_dict();

        assert_eq!(dict[CLASS_TAG], json!("User"));
        assert_eq!(dict["email"], json!(""));
        let created = dict["created_at"].as_str().unwrap();
        assert_eq!(parse_timestamp(created), Some(entity.created_at()));
    }

    #[test]
    fn test_from_dict_round_trip() {
        let mut original = Entity::new(Kind::Place);
        original.set_attribute("name", json!("Loft"));
        original.set_attribute("max_guest", json!(3));
        original.set_attribute("nickname", json!("cozy"));

        let restored = Entity::from_dict(Kind::Place, &original.to_dict()).unwrap();

        assert_eq!(restored.to_dict(), original.to_dict());
        assert_eq!(restored.attribute("nickname"), Some(json!("cozy")));
    }

    #[test]
    fn test_from_dict_accepts_timestamps_without_fraction() {
        let dict = json!({
            "id": "abc",
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-01T10:00:00.500000",
            "__class__": "BaseModel"
        });

        let entity = Entity::from_dict(Kind::BaseModel, dict.as_object().unwrap()).unwrap();

        assert_eq!(format_timestamp(&entity.created_at()), "2024-05-01T10:00:00.000000");
        assert_eq!(format_timestamp(&entity.updated_at()), "2024-05-01T10:00:00.500000");
    }

    #[test]
    fn test_from_dict_rejects_missing_id_and_bad_timestamp() {
        let no_id = json!({"created_at": "2024-05-01T10:00:00", "updated_at": "2024-05-01T10:00:00"});
        assert_eq!(
            Entity::from_dict(Kind::User, no_id.as_object().unwrap()),
            Err(EntityError::MissingId)
        );

        let bad_ts = json!({"id": "x", "created_at": "yesterday", "updated_at": "2024-05-01T10:00:00"});
        assert!(matches!(
            Entity::from_dict(Kind::User, bad_ts.as_object().unwrap()),
            Err(EntityError::InvalidTimestamp { field: "created_at", .. })
        ));
    }

    #[test]
    fn test_set_attribute_typed_and_extension() {
        let mut place = Entity::new(Kind::Place);

        place.set_attribute("number_rooms", json!(4));
        place.set_attribute("age", json!(25));
        assert_eq!(place.attribute("number_rooms"), Some(json!(4)));
        assert_eq!(place.attribute("age"), Some(json!(25)));
        assert!(place.extra().contains_key("age"));
        assert!(!place.extra().contains_key("number_rooms"));

        // A string doesn't fit an integer field: kept as given, shadowing it
        place.set_attribute("number_rooms", json!("many"));
        assert_eq!(place.attribute("number_rooms"), Some(json!("many")));

        // Fitting value again clears the shadow
        place.set_attribute("number_rooms", json!(2));
        assert_eq!(place.attribute("number_rooms"), Some(json!(2)));
        assert!(!place.extra().contains_key("number_rooms"));
    }

    #[test]
    fn test_integer_in_float_field_keeps_its_type() {
        let mut place = Entity::new(Kind::Place);

        place.set_attribute("latitude", json!(25));
        assert_eq!(place.attribute("latitude"), Some(json!(25)));
        assert!(place.extra().contains_key("latitude"));

        place.set_attribute("latitude", json!(25.5));
        assert_eq!(place.attribute("latitude"), Some(json!(25.5)));
        assert!(!place.extra().contains_key("latitude"));

        let restored = Entity::from_dict(Kind::Place, &place.to_dict()).unwrap();
        assert_eq!(restored.attribute("latitude"), Some(json!(25.5)));
    }

    #[test]
    fn test_reserved_attributes_are_not_assignable() {
        let mut entity = Entity::new(Kind::City);
        let id = entity.id().to_string();

        assert!(!entity.set_attribute("id", json!("other")));
        assert!(!entity.set_attribute("__class__", json!("User")));
        assert_eq!(entity.id(), id);
        assert_eq!(entity.kind(), Kind::City);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut entity = Entity::new(Kind::Review);
        let before = entity.updated_at();

        entity.touch();

        assert!(entity.updated_at() >= before);
        assert!(entity.updated_at() >= entity.created_at());
    }

    #[test]
    fn test_display_format() {
        let entity = Entity::new(Kind::State);
        let rendered = entity.to_string();

        assert!(rendered.starts_with(&format!("[State] ({}) {{", entity.id())));
        assert!(rendered.contains("\"name\":\"\""));
        assert!(!rendered.contains(CLASS_TAG));
    }
}
