use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Environment variable error: {message}")]
    EnvironmentError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Create a missing required field error
    pub fn missing_required(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create an environment error
    pub fn environment_error(message: impl Into<String>) -> Self {
        Self::EnvironmentError {
            message: message.into(),
        }
    }
}

/// Trait for validating configuration values
pub trait ConfigValidator<T: ?Sized> {
    /// Validate a configuration value
    fn validate(&self, field: &str, value: &T) -> Result<(), ConfigError>;
}

/// Validates a backslash separated namespace such as `App\Models`
pub struct NamespaceValidator {
    pub allow_empty: bool,
}

impl Default for NamespaceValidator {
    fn default() -> Self {
        Self { allow_empty: false }
    }
}

impl ConfigValidator<str> for NamespaceValidator {
    fn validate(&self, field: &str, value: &str) -> Result<(), ConfigError> {
        if value.is_empty() {
            if self.allow_empty {
                return Ok(());
            }
            return Err(ConfigError::missing_required(
                field,
                "Set it to a namespace such as `App`",
            ));
        }

        for segment in value.split('\\') {
            let mut chars = segment.chars();
            let valid = match chars.next() {
                Some(first) => {
                    first.is_ascii_uppercase()
                        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                None => false,
            };

            if !valid {
                return Err(ConfigError::invalid_value(
                    field,
                    value,
                    "backslash separated StudlyCase segments",
                ));
            }
        }

        Ok(())
    }
}

/// Validates an output directory
pub struct PathValidator;

impl ConfigValidator<str> for PathValidator {
    fn validate(&self, field: &str, value: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::missing_required(
                field,
                "Output paths cannot be empty",
            ));
        }

        if value.contains('\\') {
            return Err(ConfigError::invalid_value(
                field,
                value,
                "a forward slash separated relative path",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_validator() {
        let validator = NamespaceValidator::default();

        assert!(validator.validate("namespace", "App").is_ok());
        assert!(validator.validate("namespace", "App\\Models").is_ok());
        assert!(validator.validate("namespace", "").is_err());
        assert!(validator.validate("namespace", "app").is_err());
        assert!(validator.validate("namespace", "App\\\\Models").is_err());
        assert!(validator.validate("namespace", "App\\My-Models").is_err());
    }

    #[test]
    fn test_namespace_validator_allow_empty() {
        let validator = NamespaceValidator { allow_empty: true };
        assert!(validator.validate("models_namespace", "").is_ok());
    }

    #[test]
    fn test_path_validator() {
        let validator = PathValidator;

        assert!(validator.validate("models_path", "app/Models").is_ok());
        assert!(validator.validate("models_path", "  ").is_err());
        assert!(validator.validate("models_path", "app\\Models").is_err());
    }
}
