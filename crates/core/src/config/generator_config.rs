use crate::config::{ConfigError, ConfigSource, ConfigValidator, NamespaceValidator, PathValidator};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/// Configuration trait for generator configuration
pub trait GeneratorConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> &BTreeMap<String, ConfigSource>;
}

/// Where generated files go and which namespaces they live in
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub namespace: String,
    pub models_namespace: String,
    pub models_path: String,
    pub migrations_path: String,
    pub factories_path: String,
    pub seeders_path: String,
    pub observers_path: String,
    pub scopes_path: String,
    pub casts_path: String,
    pub traits_path: String,
    sources: BTreeMap<String, ConfigSource>,
}

/// On-disk shape of a generator configuration file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GeneratorConfigFile {
    namespace: Option<String>,
    models_namespace: Option<String>,
    models_path: Option<String>,
    migrations_path: Option<String>,
    factories_path: Option<String>,
    seeders_path: Option<String>,
    observers_path: Option<String>,
    scopes_path: Option<String>,
    casts_path: Option<String>,
    traits_path: Option<String>,
}

impl GeneratorConfigFile {
    fn into_values(self) -> [Option<String>; 10] {
        [
            self.namespace,
            self.models_namespace,
            self.models_path,
            self.migrations_path,
            self.factories_path,
            self.seeders_path,
            self.observers_path,
            self.scopes_path,
            self.casts_path,
            self.traits_path,
        ]
    }
}

impl GeneratorConfig {
    /// Create a configuration with Laravel's default layout
    pub fn new() -> Self {
        let mut config = Self {
            namespace: "App".to_string(),
            models_namespace: "Models".to_string(),
            models_path: "app/Models".to_string(),
            migrations_path: "database/migrations".to_string(),
            factories_path: "database/factories".to_string(),
            seeders_path: "database/seeders".to_string(),
            observers_path: "app/Observers".to_string(),
            scopes_path: "app/Models/Scopes".to_string(),
            casts_path: "app/Casts".to_string(),
            traits_path: "app/Traits".to_string(),
            sources: BTreeMap::new(),
        };

        let defaults: Vec<(&'static str, String)> = config
            .fields_mut()
            .into_iter()
            .map(|(field, _, value)| (field, value.clone()))
            .collect();
        for (field, value) in defaults {
            config
                .sources
                .insert(field.to_string(), ConfigSource::Default(value));
        }

        config
    }

    /// Load a configuration file on top of the defaults
    pub fn from_yaml(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: GeneratorConfigFile = serde_yaml::from_str(yaml)?;
        let mut config = Self::new();

        let values = file.into_values();
        let mut loaded = Vec::new();
        for ((field, _, slot), value) in config.fields_mut().into_iter().zip(values) {
            if let Some(value) = value {
                *slot = value;
                loaded.push(field);
            }
        }
        for field in loaded {
            config
                .sources
                .insert(field.to_string(), ConfigSource::File(origin.to_string()));
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content, &path.display().to_string())
    }

    /// Override the root namespace with a schema's `namespace` key
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        if let Some(previous) = self.sources.insert("namespace".to_string(), ConfigSource::Schema) {
            tracing::debug!(namespace = %self.namespace, overrides = %previous, "namespace taken from schema");
        }
        self
    }

    /// Namespace of generated models, e.g. `App\Models`
    pub fn model_namespace(&self) -> String {
        self.join_namespace(&self.models_namespace)
    }

    pub fn observer_namespace(&self) -> String {
        self.join_namespace("Observers")
    }

    pub fn scope_namespace(&self) -> String {
        format!("{}\\Scopes", self.model_namespace())
    }

    pub fn cast_namespace(&self) -> String {
        self.join_namespace("Casts")
    }

    pub fn trait_namespace(&self) -> String {
        self.join_namespace("Traits")
    }

    fn join_namespace(&self, child: &str) -> String {
        if child.is_empty() {
            self.namespace.clone()
        } else {
            format!("{}\\{}", self.namespace, child)
        }
    }

    fn fields_mut(&mut self) -> [(&'static str, &'static str, &mut String); 10] {
        [
            ("namespace", "DRAFTSMAN_NAMESPACE", &mut self.namespace),
            (
                "models_namespace",
                "DRAFTSMAN_MODELS_NAMESPACE",
                &mut self.models_namespace,
            ),
            ("models_path", "DRAFTSMAN_MODELS_PATH", &mut self.models_path),
            (
                "migrations_path",
                "DRAFTSMAN_MIGRATIONS_PATH",
                &mut self.migrations_path,
            ),
            (
                "factories_path",
                "DRAFTSMAN_FACTORIES_PATH",
                &mut self.factories_path,
            ),
            ("seeders_path", "DRAFTSMAN_SEEDERS_PATH", &mut self.seeders_path),
            (
                "observers_path",
                "DRAFTSMAN_OBSERVERS_PATH",
                &mut self.observers_path,
            ),
            ("scopes_path", "DRAFTSMAN_SCOPES_PATH", &mut self.scopes_path),
            ("casts_path", "DRAFTSMAN_CASTS_PATH", &mut self.casts_path),
            ("traits_path", "DRAFTSMAN_TRAITS_PATH", &mut self.traits_path),
        ]
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorConfigTrait for GeneratorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        let mut loaded = Vec::new();

        for (field, var, slot) in config.fields_mut() {
            match env::var(var) {
                Ok(value) => {
                    *slot = value;
                    loaded.push((field, var));
                }
                Err(env::VarError::NotPresent) => {}
                Err(env::VarError::NotUnicode(_)) => {
                    return Err(ConfigError::environment_error(format!(
                        "{} is not valid unicode",
                        var
                    )));
                }
            }
        }
        for (field, var) in loaded {
            tracing::debug!(field, var, "generator config overridden from environment");
            config
                .sources
                .insert(field.to_string(), ConfigSource::EnvVar(var.to_string()));
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        NamespaceValidator::default().validate("namespace", &self.namespace)?;
        NamespaceValidator { allow_empty: true }
            .validate("models_namespace", &self.models_namespace)?;

        for (field, value) in [
            ("models_path", &self.models_path),
            ("migrations_path", &self.migrations_path),
            ("factories_path", &self.factories_path),
            ("seeders_path", &self.seeders_path),
            ("observers_path", &self.observers_path),
            ("scopes_path", &self.scopes_path),
            ("casts_path", &self.casts_path),
            ("traits_path", &self.traits_path),
        ] {
            PathValidator.validate(field, value)?;
        }

        Ok(())
    }

    fn config_sources(&self) -> &BTreeMap<String, ConfigSource> {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model_namespace(), "App\\Models");
        assert_eq!(config.scope_namespace(), "App\\Models\\Scopes");
        assert_eq!(config.observer_namespace(), "App\\Observers");
        assert!(config.validate().is_ok());
        assert!(config.config_sources()["namespace"].is_default());
    }

    #[test]
    fn test_from_yaml_overrides_defaults() {
        let config = GeneratorConfig::from_yaml(
            "namespace: Acme\nmodels_path: src/Domain\n",
            "draftsman.yaml",
        )
        .unwrap();

        assert_eq!(config.namespace, "Acme");
        assert_eq!(config.models_path, "src/Domain");
        assert_eq!(config.migrations_path, "database/migrations");
        assert!(config.config_sources()["namespace"].is_file());
        assert!(config.config_sources()["migrations_path"].is_default());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        assert!(GeneratorConfig::from_yaml("namespcae: Acme\n", "draftsman.yaml").is_err());
    }

    #[test]
    fn test_from_yaml_validates() {
        let error = GeneratorConfig::from_yaml("namespace: acme\n", "draftsman.yaml").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_empty_models_namespace() {
        let mut config = GeneratorConfig::new();
        config.models_namespace = String::new();
        assert_eq!(config.model_namespace(), "App");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("DRAFTSMAN_NAMESPACE", "Shop");
        env::set_var("DRAFTSMAN_MODELS_PATH", "app/Entities");
        let config = GeneratorConfig::from_env();
        env::remove_var("DRAFTSMAN_NAMESPACE");
        env::remove_var("DRAFTSMAN_MODELS_PATH");

        let config = config.unwrap();
        assert_eq!(config.namespace, "Shop");
        assert_eq!(config.models_path, "app/Entities");
        assert_eq!(
            config.config_sources()["namespace"],
            ConfigSource::EnvVar("DRAFTSMAN_NAMESPACE".to_string())
        );
        assert!(config.config_sources()["models_path"].is_env_var());

        let config = config.with_namespace("Blog");
        assert_eq!(config.namespace, "Blog");
        assert_eq!(config.config_sources()["namespace"], ConfigSource::Schema);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_namespace() {
        env::set_var("DRAFTSMAN_NAMESPACE", "not valid");
        let result = GeneratorConfig::from_env();
        env::remove_var("DRAFTSMAN_NAMESPACE");

        assert!(result.is_err());
    }
}
