use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use url::Url;

/// Sandbox endpoint used when `EVALUATION_API_URL` is not set.
pub const DEFAULT_EVALUATION_URL: &str = "https://sandbox.alloy.co/v1/evaluations";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationServiceConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and the process environment.
    ///
    /// Missing evaluation credentials are reported here so the service refuses to start
    /// instead of failing every submission.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let endpoint =
            env::var("EVALUATION_API_URL").unwrap_or_else(|_| DEFAULT_EVALUATION_URL.to_string());
        let credentials = EvaluationCredentials::new(
            required_var("EXTERNAL_API_TOKEN")?,
            required_var("EXTERNAL_API_SECRET")?,
        );
        let evaluation = EvaluationServiceConfig::new(&endpoint, credentials, environment)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            evaluation,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential { name }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where evaluations are sent and how the service authenticates.
#[derive(Debug, Clone)]
pub struct EvaluationServiceConfig {
    pub endpoint: Url,
    pub credentials: EvaluationCredentials,
}

impl EvaluationServiceConfig {
    pub fn new(
        endpoint: &str,
        credentials: EvaluationCredentials,
        environment: AppEnvironment,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            value: endpoint.to_string(),
            source,
        })?;

        if environment == AppEnvironment::Production && endpoint.scheme() != "https" {
            return Err(ConfigError::InsecureEndpoint {
                value: endpoint.to_string(),
            });
        }

        Ok(Self {
            endpoint,
            credentials,
        })
    }
}

/// Identifier/secret pair issued by the evaluation provider.
#[derive(Clone, PartialEq, Eq)]
pub struct EvaluationCredentials {
    id: String,
    secret: String,
}

impl EvaluationCredentials {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for EvaluationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationCredentials")
            .field("id", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    MissingCredential {
        name: &'static str,
    },
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },
    InsecureEndpoint {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingCredential { name } => {
                write!(f, "{name} must be set to a non-empty value")
            }
            ConfigError::InvalidEndpoint { value, .. } => {
                write!(f, "EVALUATION_API_URL '{value}' is not a valid URL")
            }
            ConfigError::InsecureEndpoint { value } => {
                write!(f, "EVALUATION_API_URL '{value}' must use https in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidEndpoint { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingCredential { .. }
            | ConfigError::InsecureEndpoint { .. } => None,
        }
    }
}

/// Serializes tests that read or mutate process environment variables.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock, PoisonError};

    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
