// hbnb Console - Core Library
// Exposes all modules for use by the console binary and tests

pub mod entities;   // Record kinds + Entity (identity, timestamps, attributes)
pub mod registry;   // Live records keyed by "Kind.id"
pub mod storage;    // JSON document persistence
pub mod grammar;    // Dotted-call rewriting, canonical line parsing, value coercion
pub mod console;    // Command dispatcher + read loop
pub mod help;       // Built-in help topics
pub mod config;     // CLI arguments
pub mod error;      // User-facing and load errors

// Re-export commonly used types
pub use entities::{
    Entity, Kind, Attributes, CLASS_TAG,
    User, State, City, Place, Amenity, Review,
};
pub use registry::Registry;
pub use storage::{Document, Persistence, JsonFileStorage, MemoryStorage};
pub use grammar::{translate, Translation};
pub use console::{Console, Flow, PROMPT};
pub use config::Args;
pub use error::{CommandError, EntityError, RegistryError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
