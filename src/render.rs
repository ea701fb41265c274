//! Display rendering for contextual errors
//!
//! The default rendering is `message: with context: {key: value, ...}`, with a
//! contextual parent nested inside the braces under the `parent` key. The
//! separator, the treatment of empty contexts, and how deep nested parents are
//! expanded come from a [`RenderConfig`], loadable from TOML:
//!
//! ```toml
//! context_separator = " | "
//! show_empty_context = false
//! max_depth = 2
//! ```
//!
//! Configuration is optional. `Display` uses [`RenderConfig::default_ref`], and
//! nothing in this crate reads a file unless the caller opts in through
//! [`RenderConfig::load`]. Rendering and lookups never do I/O.

use std::fmt;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::context::{downcast_contextual, ContextValue};
use crate::contextual::ContextualError;
use crate::errors::{ConfigError, ConfigResult};

static DEFAULT_RENDER_CONFIG: Lazy<RenderConfig> = Lazy::new(RenderConfig::default);

/// Rendering options for [`ContextualError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Placed between the message and the context map.
    pub context_separator: String,
    /// When false, an error without context renders as its bare message.
    pub show_empty_context: bool,
    /// Nested contextual errors expanded with their context. Deeper ones
    /// render as their message chain. `None` expands everything.
    pub max_depth: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            context_separator: ": with context: ".to_string(),
            show_empty_context: true,
            max_depth: None,
        }
    }
}

impl RenderConfig {
    /// The process-wide default used by `Display`
    pub fn default_ref() -> &'static RenderConfig {
        &DEFAULT_RENDER_CONFIG
    }

    /// Parse and validate a configuration from TOML text
    ///
    /// Missing fields take their default values; unknown fields are rejected.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The content is not valid TOML for this structure
    /// - A value fails validation
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io_with_source(path, "read render config", e))?;
        let config = Self::from_toml_str(&content)?;

        tracing::debug!(path = %path.display(), ?config, "Loaded render config");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.context_separator.is_empty() {
            return Err(ConfigError::invalid_value(
                "context_separator",
                "\"\"",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// A [`ContextualError`] paired with the config to display it with
pub struct Rendered<'a> {
    error: &'a ContextualError,
    config: &'a RenderConfig,
}

impl<'a> Rendered<'a> {
    pub(crate) fn new(error: &'a ContextualError, config: &'a RenderConfig) -> Self {
        Self { error, config }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_error(self.error, self.config, 0, f)
    }
}

pub(crate) fn write_error(
    err: &ContextualError,
    config: &RenderConfig,
    depth: usize,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.write_str(err.message())?;
    if !err.has_context() && !config.show_empty_context {
        return Ok(());
    }

    f.write_str(&config.context_separator)?;
    f.write_str("{")?;
    for (i, (key, value)) in err.entries().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{:?}: ", key)?;
        write_value(value, config, depth, f)?;
    }
    f.write_str("}")
}

fn write_value(
    value: &ContextValue,
    config: &RenderConfig,
    depth: usize,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(nested) = value.as_contextual() {
        let expand = config.max_depth.map_or(true, |max| depth < max);
        return if expand {
            write_error(nested, config, depth + 1, f)
        } else {
            write_message_chain(nested, f)
        };
    }

    match value {
        ContextValue::Data(data) => write!(f, "{:?}", data),
        ContextValue::Error(err) => write!(f, "{}", err),
    }
}

/// Messages of the whole chain joined by `": "`, without context
pub(crate) fn write_message_chain(
    err: &ContextualError,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (i, cause) in err.chain().enumerate() {
        if i > 0 {
            f.write_str(": ")?;
        }
        match downcast_contextual(cause) {
            Some(contextual) => f.write_str(contextual.message())?,
            None => write!(f, "{}", cause)?,
        }
    }
    Ok(())
}
