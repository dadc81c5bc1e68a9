#![forbid(unsafe_code)]

//! Crate-wide binding configuration.
//!
//! [`BindConfig`] captures the tunable defaults that widget constructors
//! consult. It can be loaded from TOML or JSON at startup when the `config`
//! feature is enabled.
//!
//! # Loading
//!
//! ```toml
//! # tether.toml
//! [text]
//! trim_input = true
//! float_precision = 3
//!
//! [lifetime]
//! default_ownership = "auto"
//!
//! [notify]
//! skip_equal_writes = false
//! ```
//!
//! ```rust,ignore
//! let config = BindConfig::from_toml_file("tether.toml")?;
//! let config = BindConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `BindConfig::default()` trims text input, prints floats with their
//! shortest round-trip representation, resolves ownership automatically and
//! notifies on every write.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Largest useful number of fractional digits for an `f64`.
const MAX_FLOAT_PRECISION: usize = 17;

/// Top-level configuration for widget bindings.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BindConfig {
    /// Text-entry coercion.
    pub text: TextConfig,

    /// Binding lifetime defaults.
    pub lifetime: LifetimeConfig,

    /// Notification policy for observables created by widgets.
    pub notify: NotifyConfig,
}

impl BindConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(precision) = self.text.float_precision
            && precision > MAX_FLOAT_PRECISION
        {
            errors.push(format!(
                "text.float_precision must be <= {MAX_FLOAT_PRECISION}, got {precision}"
            ));
        }
        errors
    }

    #[cfg(feature = "config")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Text-entry coercion settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TextConfig {
    /// Strip surrounding whitespace before parsing typed input.
    pub trim_input: bool,

    /// Fixed number of fractional digits when displaying floats.
    /// `None` uses the shortest representation that parses back exactly.
    pub float_precision: Option<usize>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            trim_input: true,
            float_precision: None,
        }
    }
}

/// Who tears down a widget's auxiliary listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Ownership {
    /// Own the binding iff the widget created its observable.
    #[default]
    Auto,
    /// Always release listeners when the widget is destroyed.
    Own,
    /// Never install a destroy handler; the caller manages lifetime.
    Borrow,
}

impl Ownership {
    /// Resolve to a concrete decision given whether the widget created its
    /// own observable.
    #[must_use]
    pub fn resolve(self, created_observable: bool) -> bool {
        match self {
            Self::Auto => created_observable,
            Self::Own => true,
            Self::Borrow => false,
        }
    }
}

/// Binding lifetime defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LifetimeConfig {
    /// Ownership used when a constructor is not told explicitly.
    pub default_ownership: Ownership,
}

/// Notification policy for widget-created observables.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NotifyConfig {
    /// Treat writes equal to the current value as no-ops.
    pub skip_equal_writes: bool,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
