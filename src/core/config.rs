use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::scheme::Scheme;
use crate::error::{DsvError, Result};
use crate::format::DsvFormat;
use crate::schema::naming::{
    Identity, KebabCase, LowercaseWords, PascalCase, SentenceCaseWords, SnakeCase, TitleCaseWords,
    UppercaseWords,
};

/// Header naming strategy selectable from TOML.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamingKind {
    #[default]
    Identity,
    SnakeCase,
    KebabCase,
    PascalCase,
    TitleCaseWords,
    SentenceCaseWords,
    LowercaseWords,
    UppercaseWords,
}

impl NamingKind {
    fn apply(self, format: DsvFormat) -> DsvFormat {
        match self {
            NamingKind::Identity => format.with_naming_strategy(Identity),
            NamingKind::SnakeCase => format.with_naming_strategy(SnakeCase),
            NamingKind::KebabCase => format.with_naming_strategy(KebabCase),
            NamingKind::PascalCase => format.with_naming_strategy(PascalCase),
            NamingKind::TitleCaseWords => format.with_naming_strategy(TitleCaseWords),
            NamingKind::SentenceCaseWords => format.with_naming_strategy(SentenceCaseWords),
            NamingKind::LowercaseWords => format.with_naming_strategy(LowercaseWords),
            NamingKind::UppercaseWords => format.with_naming_strategy(UppercaseWords),
        }
    }
}

/// Configuration for a single dialect loaded from TOML.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DialectConfig {
    /// Free-form description shown by `dsvkit dialects`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field delimiter (exactly one character)
    pub delimiter: String,
    /// Quote character (exactly one character)
    #[serde(default = "default_quote")]
    pub quote: String,
    #[serde(default)]
    pub write_crlf: bool,
    #[serde(default)]
    pub skip_empty_lines: bool,
    #[serde(default)]
    pub allow_jagged_rows: bool,
    #[serde(default)]
    pub naming: NamingKind,
    #[serde(default)]
    pub missing_columns_as_null: bool,
    #[serde(default)]
    pub ignore_unknown_keys: bool,
    #[serde(default = "default_true")]
    pub enums_by_name: bool,
}

fn default_quote() -> String {
    "\"".to_string()
}

fn default_true() -> bool {
    true
}

impl DialectConfig {
    /// Builds and validates the scheme this dialect describes.
    pub fn scheme(&self) -> Result<Scheme> {
        let delimiter = single_char("delimiter", &self.delimiter)?;
        let quote = single_char("quote", &self.quote)?;
        Ok(Scheme::builder(delimiter)
            .quote(quote)
            .write_crlf(self.write_crlf)
            .skip_empty_lines(self.skip_empty_lines)
            .allow_jagged_rows(self.allow_jagged_rows)
            .build()?)
    }

    /// Builds the full format: scheme plus schema-adapter policies.
    pub fn format(&self) -> Result<DsvFormat> {
        let format = DsvFormat::new(self.scheme()?)
            .with_missing_columns_as_null(self.missing_columns_as_null)
            .with_ignore_unknown_keys(self.ignore_unknown_keys)
            .with_enums_by_name(self.enums_by_name);
        Ok(self.naming.apply(format))
    }
}

fn single_char(setting: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(DsvError::Config(format!(
            "{} must be exactly one character, got {:?}",
            setting, value
        ))),
    }
}

/// Global settings for dsvkit.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Dialect used when none is given on the command line
    #[serde(default)]
    pub default_dialect: Option<String>,
}

/// Collection of dialect configurations loaded from TOML files.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DialectRegistry {
    /// Map of dialect names to their configurations
    #[serde(default)]
    pub dialects: BTreeMap<String, DialectConfig>,
    #[serde(default)]
    pub settings: Settings,
}

impl DialectRegistry {
    /// Parses dialect configurations from TOML content.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the dialects bundled with the library.
    pub fn load_default() -> Result<Self> {
        let content = include_str!("../../dialects.toml");
        Self::from_toml(content).map_err(|e| DsvError::Config(format!("bundled dialects: {}", e)))
    }

    /// Loads configuration from a custom file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| DsvError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Loads configuration with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in dialects (from library)
    /// 2. `~/.config/dsvkit/dialects.toml` (user overrides)
    /// 3. `./dialects.toml` (project-local overrides)
    ///
    /// Later configurations override earlier ones for matching dialect names.
    /// An override file that fails to load is skipped with a warning.
    pub fn load_with_overrides() -> Result<Self> {
        let mut config = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("dsvkit").join("dialects.toml");
            config.merge_file_if_present(&user_config_path);
        }

        config.merge_file_if_present(Path::new("dialects.toml"));
        Ok(config)
    }

    fn merge_file_if_present(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match Self::load_from_file(path) {
            Ok(other) => {
                debug!(path = %path.display(), dialects = other.dialects.len(), "merged dialect overrides");
                self.merge(other);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load dialect overrides"),
        }
    }

    /// Merges another configuration into this one.
    ///
    /// Dialects from `other` override dialects with the same name in `self`.
    pub fn merge(&mut self, other: DialectRegistry) {
        self.dialects.extend(other.dialects);
        if other.settings.default_dialect.is_some() {
            self.settings.default_dialect = other.settings.default_dialect;
        }
    }

    /// Retrieves a dialect configuration by name.
    pub fn get_dialect(&self, name: &str) -> Option<&DialectConfig> {
        self.dialects.get(name)
    }

    /// Resolves `name`, or the configured default dialect when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<&DialectConfig> {
        let name = name
            .or(self.settings.default_dialect.as_deref())
            .ok_or_else(|| DsvError::Config("no dialect given and no default_dialect configured".to_string()))?;
        self.get_dialect(name)
            .ok_or_else(|| DsvError::Config(format!("unknown dialect '{}'", name)))
    }
}
