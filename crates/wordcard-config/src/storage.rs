use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_database_path() -> PathBuf {
    PathBuf::from("vocab.db")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("raw_images/staging")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("raw_images")
}

fn default_image_extension() -> String {
    "png".to_string()
}

/// Where records and image files live on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Images land here before their record has an identity
    pub staging_dir: PathBuf,
    /// Final `<id>.<ext>` images
    pub image_dir: PathBuf,
    pub image_extension: String,
}

impl StorageConfig {
    pub fn new() -> Self {
        let database_path = env::var("WORDCARD_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let image_dir = env::var("WORDCARD_IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_image_dir());

        let staging_dir = env::var("WORDCARD_STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_staging_dir());

        Self {
            database_path,
            staging_dir,
            image_dir,
            image_extension: default_image_extension(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            staging_dir: default_staging_dir(),
            image_dir: default_image_dir(),
            image_extension: default_image_extension(),
        }
    }
}
