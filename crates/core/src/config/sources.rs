use std::fmt;

/// Origin of one generator setting, e.g. where `models_path` was read from.
///
/// Settings start as [`ConfigSource::Default`] and are overwritten in load
/// order: settings file, environment, then the schema being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Laravel default layout, carrying the default value
    Default(String),
    /// Generator settings file, carrying its path
    File(String),
    /// `DRAFTSMAN_*` environment variable, carrying its name
    EnvVar(String),
    /// Top-level key of the schema itself, such as `namespace`
    Schema,
}

impl ConfigSource {
    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File(_))
    }

    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default(value) => write!(f, "default [{}]", value),
            ConfigSource::File(path) => write!(f, "settings file [{}]", path),
            ConfigSource::EnvVar(var) => write!(f, "environment variable [{}]", var),
            ConfigSource::Schema => f.write_str("schema"),
        }
    }
}
