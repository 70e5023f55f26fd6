//! Category and exclusion configuration.
//!
//! This module loads the organization rules from a TOML configuration file:
//! which file extensions belong to which category folder, which names must
//! never be touched, and whether hidden files are organized at all.
//!
//! # Configuration File Format
//!
//! ```toml
//! move_hidden = false
//! exclude = ["notes.txt", "do-not-touch"]
//!
//! [categories]
//! Images = [".jpg", ".png", ".gif"]
//! Documents = [".pdf", ".docx", ".txt"]
//! ```
//!
//! The order in which categories are declared is significant: a file is
//! assigned to the *first* category whose extension list contains its suffix.
//! Extensions are written with the leading dot and matched case-insensitively.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A single category rule: a folder name and the extensions routed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Name of the category (and of the folder created under the desktop).
    pub name: String,
    /// Extensions including the leading dot, e.g. `".pdf"`.
    pub extensions: Vec<String>,
}

/// Organization rules as deserialized from the configuration file.
///
/// Absent keys fall back to an empty category mapping, an empty exclusion
/// list, and `move_hidden = false`. The raw form is turned into lookup
/// structures with [`Config::compile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Ordered category rules. Declaration order decides first-match wins.
    #[serde(default, deserialize_with = "ordered_categories")]
    pub categories: Vec<CategoryRule>,

    /// Literal file or folder names that are never touched.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether names starting with `.` are organized. Defaults to false.
    #[serde(default)]
    pub move_hidden: bool,
}

/// Deserializes the `[categories]` table into a `Vec` so that the document
/// order of the category names survives deserialization. Relies on the toml
/// crate's `preserve_order` feature; without it the table arrives sorted.
fn ordered_categories<'de, D>(deserializer: D) -> Result<Vec<CategoryRule>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CategoriesVisitor;

    impl<'de> Visitor<'de> for CategoriesVisitor {
        type Value = Vec<CategoryRule>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of category name to extension list")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut rules = Vec::new();
            while let Some((name, extensions)) = map.next_entry::<String, Vec<String>>()? {
                rules.push(CategoryRule { name, extensions });
            }
            Ok(rules)
        }
    }

    deserializer.deserialize_map(CategoriesVisitor)
}

impl Config {
    /// Load configuration from a specific file.
    ///
    /// The file is loaded fresh on every call; there is no caching.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the raw configuration into lookup structures for matching.
    pub fn compile(self) -> Rules {
        Rules::new(self)
    }
}

/// Compiled organization rules for efficient matching.
///
/// Extension lists become lowercased sets, and category names plus the
/// exclusion list merge into one protected-name set that is checked before
/// any entry is considered organizable.
#[derive(Debug, Clone)]
pub struct Rules {
    categories: Vec<(String, HashSet<String>)>,
    protected: HashSet<String>,
    move_hidden: bool,
}

impl Rules {
    fn new(config: Config) -> Self {
        let mut protected: HashSet<String> =
            config.categories.iter().map(|c| c.name.clone()).collect();
        protected.extend(config.exclude);

        let categories = config
            .categories
            .into_iter()
            .map(|rule| {
                let extensions = rule
                    .extensions
                    .iter()
                    .map(|ext| ext.to_lowercase())
                    .collect();
                (rule.name, extensions)
            })
            .collect();

        Self {
            categories,
            protected,
            move_hidden: config.move_hidden,
        }
    }

    /// Returns the first category whose extension set contains `suffix`.
    ///
    /// `suffix` is expected lowercased and dot-prefixed (e.g. `".pdf"`).
    /// Categories are checked in declaration order.
    pub fn category_for(&self, suffix: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, extensions)| extensions.contains(suffix))
            .map(|(name, _)| name.as_str())
    }

    /// Whether `name` is a category folder or explicitly excluded.
    pub fn is_protected(&self, name: &str) -> bool {
        self.protected.contains(name)
    }

    /// Whether hidden-named entries are organized.
    pub fn move_hidden(&self) -> bool {
        self.move_hidden
    }

    /// Declared category names, in configuration order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }
}
