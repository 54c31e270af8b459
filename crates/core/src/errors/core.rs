use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for the draftsman generator
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A schema that cannot be resolved. Every resolution pass fails with this
    /// variant; the message names the offending model, relation or column.
    #[error("{message}")]
    Logic { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl CoreError {
    /// Create a new schema logic error
    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new pipeline ordering error
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }

    /// Check if the error is a schema logic error
    pub fn is_logic(&self) -> bool {
        matches!(self, Self::Logic { .. })
    }

    /// Check if the error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Check if the error is a pipeline ordering error
    pub fn is_pipeline(&self) -> bool {
        matches!(self, Self::Pipeline { .. })
    }
}

impl From<ConfigError> for CoreError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

/// Result alias used throughout the resolution engine
pub type CoreResult<T> = Result<T, CoreError>;

/// Fail the current pass with a logic error built from a format string
#[macro_export]
macro_rules! logic_error {
    ($($arg:tt)*) => {
        return Err($crate::CoreError::logic(format!($($arg)*)))
    };
}
