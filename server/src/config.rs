//! Configuration system for the WidgetGen server.
//!
//! Supports:
//! - CLI arguments (highest priority)
//! - Environment variables, selected by the production/development profile
//! - TOML config file
//! - Defaults (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use widgetgen_api::ApiConfig;

use crate::error::{ServerError, ServerResult};

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google's public keys for Firebase ID tokens, as a JWK set.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const DEFAULT_PORT: u16 = 8080;

/// Command-line arguments for the WidgetGen server.
#[derive(Parser, Debug, Clone)]
#[command(name = "widgetgen-server")]
#[command(about = "WidgetGen Server - structured widget generation backed by Gemini")]
#[command(version)]
pub struct CliArgs {
    /// Deployment profile; `production` reads the `*_PROD` variables, anything
    /// else the `*_DEV` ones. Falls back to WIDGETGEN_ENV, then NODE_ENV.
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// HTTP port (overrides the profile's port variable and the config file)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Interface to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Configuration file path
    #[arg(long, short = 'c', env = "WIDGETGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "WIDGETGEN_LOG_JSON")]
    pub log_json: bool,
}

/// Deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Reads the `*_PROD` variables
    Production,
    /// Reads the `*_DEV` variables
    Development,
}

impl Environment {
    /// Profile named by `name`. Only the exact value `production` selects
    /// [`Environment::Production`].
    pub fn from_name(name: &str) -> Self {
        if name.trim() == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Profile from the CLI flag, else `WIDGETGEN_ENV`, else `NODE_ENV`.
    pub fn resolve<F>(flag: Option<&str>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        flag.map(str::to_string)
            .or_else(|| env("WIDGETGEN_ENV"))
            .or_else(|| env("NODE_ENV"))
            .map_or(Self::Development, |name| Self::from_name(&name))
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Production => "PROD",
            Self::Development => "DEV",
        }
    }

    /// Variable holding the Gemini API key.
    pub fn api_key_var(self) -> String {
        format!("GOOGLE_API_KEY_{}", self.suffix())
    }

    /// Variables holding the port, preferred first.
    pub fn port_vars(self) -> [String; 2] {
        [
            format!("WIDGETGEN_PORT_{}", self.suffix()),
            format!("REACT_APP_API_{}_PORT", self.suffix()),
        ]
    }

    /// Variables holding the Firebase project id, preferred first.
    pub fn project_id_vars(self) -> [String; 2] {
        [
            format!("FIREBASE_PROJECT_ID_{}", self.suffix()),
            format!("REACT_APP_{}_FB_PROJECT_ID", self.suffix()),
        ]
    }
}

/// Optional settings read from the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub cors_origins: Option<Vec<String>>,
    pub generation_timeout_secs: Option<u64>,
    pub enable_docs: Option<bool>,
    pub gemini_base_url: Option<String>,
    pub jwks_url: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ServerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Full server configuration (merged from all sources).
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub firebase_project_id: String,
    pub model: String,
    pub gemini_base_url: String,
    pub jwks_url: String,
    pub cors_origins: Vec<String>,
    pub generation_timeout_secs: u64,
    pub enable_docs: bool,
}

impl ServerConfig {
    /// Load configuration from CLI args, the process environment and the
    /// optional config file.
    pub fn load(args: &CliArgs) -> ServerResult<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(args, file, |name| std::env::var(name).ok())
    }

    /// Merge the sources. `env` looks up one environment variable.
    pub fn from_sources<F>(args: &CliArgs, file: FileConfig, env: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = Environment::resolve(args.environment.as_deref(), &env);
        let lookup = |names: &[String]| {
            names
                .iter()
                .find_map(|name| env(name).filter(|value| !value.trim().is_empty()))
        };

        let api_key_var = profile.api_key_var();
        let api_key = lookup(std::slice::from_ref(&api_key_var)).ok_or(
            ServerError::MissingSetting {
                name: "Gemini API key",
                env_var: api_key_var,
            },
        )?;

        let project_vars = profile.project_id_vars();
        let firebase_project_id =
            lookup(&project_vars[..]).ok_or_else(|| ServerError::MissingSetting {
                name: "Firebase project id",
                env_var: project_vars[0].clone(),
            })?;

        let env_port = match lookup(&profile.port_vars()[..]) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                ServerError::InvalidSetting {
                    name: "port",
                    reason: format!("{:?}: {}", raw, e),
                }
            })?),
            None => None,
        };

        let defaults = match profile {
            Environment::Production => ApiConfig::production(Vec::new()),
            Environment::Development => ApiConfig::development(),
        };

        // Open to every origin unless the config file narrows it.
        let cors_origins = file
            .cors_origins
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            environment: profile,
            host: args
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| defaults.host.clone()),
            port: args.port.or(env_port).or(file.port).unwrap_or(DEFAULT_PORT),
            api_key,
            firebase_project_id,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: file
                .gemini_base_url
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            jwks_url: file.jwks_url.unwrap_or_else(|| DEFAULT_JWKS_URL.to_string()),
            cors_origins,
            generation_timeout_secs: file
                .generation_timeout_secs
                .unwrap_or(defaults.generation_timeout_secs),
            enable_docs: file.enable_docs.unwrap_or(defaults.enable_docs),
        })
    }

    /// HTTP layer configuration.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.host.clone(),
            port: self.port,
            enable_cors: true,
            cors_origins: self.cors_origins.clone(),
            generation_timeout_secs: self.generation_timeout_secs,
            enable_docs: self.enable_docs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn args(environment: Environment) -> CliArgs {
        let name = match environment {
            Environment::Production => "production",
            Environment::Development => "development",
        };
        CliArgs {
            environment: Some(name.to_string()),
            port: None,
            host: None,
            config: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_profile_selects_variables() {
        let vars = env(&[
            ("GOOGLE_API_KEY_PROD", "prod-key"),
            ("GOOGLE_API_KEY_DEV", "dev-key"),
            ("FIREBASE_PROJECT_ID_PROD", "widgets-prod"),
            ("FIREBASE_PROJECT_ID_DEV", "widgets-dev"),
            ("WIDGETGEN_PORT_PROD", "9000"),
            ("WIDGETGEN_PORT_DEV", "3001"),
        ]);

        let prod =
            ServerConfig::from_sources(&args(Environment::Production), FileConfig::default(), &vars)
                .unwrap();
        assert_eq!(prod.api_key, "prod-key");
        assert_eq!(prod.firebase_project_id, "widgets-prod");
        assert_eq!(prod.port, 9000);
        assert!(!prod.enable_docs);

        let dev = ServerConfig::from_sources(
            &args(Environment::Development),
            FileConfig::default(),
            &vars,
        )
        .unwrap();
        assert_eq!(dev.api_key, "dev-key");
        assert_eq!(dev.port, 3001);
        assert_eq!(dev.model, DEFAULT_MODEL);
        assert_eq!(dev.cors_origins, vec!["*"]);
        assert!(dev.enable_docs);
    }

    #[test]
    fn test_profile_falls_back_to_node_env() {
        let vars = env(&[
            ("NODE_ENV", "production"),
            ("GOOGLE_API_KEY_PROD", "prod-key"),
            ("GOOGLE_API_KEY_DEV", "dev-key"),
            ("FIREBASE_PROJECT_ID_PROD", "widgets-prod"),
            ("FIREBASE_PROJECT_ID_DEV", "widgets-dev"),
        ]);
        let mut cli = args(Environment::Development);
        cli.environment = None;

        let config = ServerConfig::from_sources(&cli, FileConfig::default(), &vars).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_key, "prod-key");
        assert_eq!(config.firebase_project_id, "widgets-prod");
    }

    #[test]
    fn test_profile_resolution_order() {
        let both = env(&[("WIDGETGEN_ENV", "development"), ("NODE_ENV", "production")]);
        assert_eq!(Environment::resolve(None, &both), Environment::Development);
        assert_eq!(
            Environment::resolve(Some("production"), &both),
            Environment::Production
        );

        let none = env(&[]);
        assert_eq!(Environment::resolve(None, &none), Environment::Development);
    }

    #[test]
    fn test_unrecognised_profile_is_development() {
        assert_eq!(Environment::from_name("staging"), Environment::Development);
        assert_eq!(Environment::from_name("Production"), Environment::Development);
        assert_eq!(Environment::from_name("production"), Environment::Production);

        let vars = env(&[
            ("WIDGETGEN_ENV", "staging"),
            ("GOOGLE_API_KEY_DEV", "dev-key"),
            ("FIREBASE_PROJECT_ID_DEV", "widgets-dev"),
        ]);
        let mut cli = args(Environment::Development);
        cli.environment = None;
        let config = ServerConfig::from_sources(&cli, FileConfig::default(), vars).unwrap();
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_cli_parse_accepts_any_profile_name() {
        let cli = CliArgs::try_parse_from(["widgetgen-server", "--environment", "staging"]).unwrap();
        assert_eq!(cli.environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_legacy_variable_names() {
        let vars = env(&[
            ("GOOGLE_API_KEY_DEV", "dev-key"),
            ("REACT_APP_DEV_FB_PROJECT_ID", "legacy-project"),
            ("REACT_APP_API_DEV_PORT", "5000"),
        ]);
        let config = ServerConfig::from_sources(
            &args(Environment::Development),
            FileConfig::default(),
            vars,
        )
        .unwrap();
        assert_eq!(config.firebase_project_id, "legacy-project");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars = env(&[("FIREBASE_PROJECT_ID_PROD", "p")]);
        let err =
            ServerConfig::from_sources(&args(Environment::Production), FileConfig::default(), vars)
                .unwrap_err();
        assert!(matches!(
            err,
            ServerError::MissingSetting { ref env_var, .. } if env_var == "GOOGLE_API_KEY_PROD"
        ));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let vars = env(&[
            ("GOOGLE_API_KEY_DEV", "k"),
            ("FIREBASE_PROJECT_ID_DEV", "p"),
            ("WIDGETGEN_PORT_DEV", "eighty"),
        ]);
        let err = ServerConfig::from_sources(
            &args(Environment::Development),
            FileConfig::default(),
            vars,
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::InvalidSetting { name: "port", .. }));
    }

    #[test]
    fn test_cli_overrides_env_and_file() {
        let vars = env(&[
            ("GOOGLE_API_KEY_DEV", "k"),
            ("FIREBASE_PROJECT_ID_DEV", "p"),
            ("WIDGETGEN_PORT_DEV", "3001"),
        ]);
        let mut cli = args(Environment::Development);
        cli.port = Some(7000);
        cli.host = Some("127.0.0.1".to_string());
        let file = FileConfig {
            port: Some(6000),
            host: Some("10.0.0.1".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::from_sources(&cli, file, vars).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
model = "gemini-1.5-pro"
cors_origins = ["https://editor.example.com"]
generation_timeout_secs = 45
enable_docs = false
"#
        )
        .unwrap();

        let loaded = FileConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.model.as_deref(), Some("gemini-1.5-pro"));

        let vars = env(&[("GOOGLE_API_KEY_DEV", "k"), ("FIREBASE_PROJECT_ID_DEV", "p")]);
        let config =
            ServerConfig::from_sources(&args(Environment::Development), loaded, vars).unwrap();
        let api = config.api_config();
        assert_eq!(api.cors_origins, vec!["https://editor.example.com"]);
        assert_eq!(api.generation_timeout_secs, 45);
        assert!(!api.enable_docs);
        assert_eq!(api.port, 8080);
        assert_eq!(config.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_unreadable_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(matches!(
            FileConfig::from_file(file.path()),
            Err(ServerError::ConfigParse { .. })
        ));
        assert!(matches!(
            FileConfig::from_file(Path::new("/nonexistent/widgetgen.toml")),
            Err(ServerError::ConfigRead { .. })
        ));
    }
}
