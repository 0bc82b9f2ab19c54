//! Process configuration read from `APP_*` environment variables, with an optional
//! `.env` file loaded first.

use std::env;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage. Production is the only stage that withholds internal error text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    pub const fn exposes_error_details(self) -> bool {
        !matches!(self, Self::Production)
    }
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" | "local" => Ok(Self::Development),
            "test" | "ci" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::invalid("APP_ENV", value)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads the process environment after merging `.env`, when one exists.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            environment: vars.parsed("APP_ENV")?.unwrap_or_default(),
            server: ServerConfig {
                host: vars.text("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: vars.parsed("APP_PORT")?.unwrap_or(DEFAULT_PORT),
            },
            telemetry: TelemetryConfig {
                log_level: vars
                    .text("APP_LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                ansi: vars.flag("APP_LOG_ANSI")?.unwrap_or(false),
            },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn text(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parsed<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.text(name)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::invalid(name, &value))
            })
            .transpose()
    }

    fn flag(&self, name: &'static str) -> Result<Option<bool>, ConfigError> {
        self.text(name)
            .map(|value| match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::invalid(name, &value)),
            })
            .transpose()
    }
}

/// Listener address. `localhost` binds the IPv4 loopback.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match self.host.parse::<IpAddr>() {
            Ok(ip) => ip,
            Err(_) if self.host.eq_ignore_ascii_case("localhost") => {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            }
            Err(source) => {
                return Err(ConfigError::UnresolvableHost {
                    host: self.host.clone(),
                    source,
                })
            }
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an unusable value {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("host {host:?} is not an IP address or localhost")]
    UnresolvableHost {
        host: String,
        #[source]
        source: AddrParseError,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            name,
            value: value.to_string(),
        }
    }
}
