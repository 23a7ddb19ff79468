//! Command line configuration for the hbnb console

use clap::Parser;
use std::path::PathBuf;

use crate::storage::JsonFileStorage;

/// Interactive console for hbnb records, persisted as one JSON file
#[derive(Parser, Debug, Clone)]
#[command(name = "hbnb", version)]
#[command(about = "Create, show, update and destroy hbnb records from a line-oriented shell")]
pub struct Args {
    /// JSON document the registry is loaded from and flushed to
    #[arg(short, long, default_value = JsonFileStorage::DEFAULT_PATH)]
    pub file: PathBuf,

    /// Read commands from this file instead of stdin
    pub script: Option<PathBuf>,
}

impl Args {
    pub fn storage(&self) -> JsonFileStorage {
        JsonFileStorage::new(&self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["hbnb"]);

        assert_eq!(args.file, PathBuf::from("file.json"));
        assert!(args.script.is_none());
    }

    #[test]
    fn test_file_and_script() {
        let args = Args::parse_from(["hbnb", "--file", "/tmp/store.json", "commands.txt"]);

        assert_eq!(args.storage().path(), PathBuf::from("/tmp/store.json").as_path());
        assert_eq!(args.script, Some(PathBuf::from("commands.txt")));
    }
}
