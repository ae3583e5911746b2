use std::{net::IpAddr, str::FromStr};

use tracing::level_filters::LevelFilter;

const DEFAULT_HOST: [u8; 4] = [127, 0, 0, 1];
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_TTL: i64 = 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
	/// PostgreSQL connection string. Without one, data lives in memory.
	pub database_url: Option<String>,
	pub host: IpAddr,
	pub port: u16,
	/// Secret used to sign access tokens.
	pub secret: String,
	/// How long an access token stays valid.
	pub token_ttl: chrono::Duration,
	pub log_level: LevelFilter,
	/// OTLP collector endpoint; telemetry export is disabled without one.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which maps a variable name to its value.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

		let secret = var("SECRET").ok_or(Error::Missing("SECRET"))?;
		let token_ttl = parse(&var, "TOKEN_TTL")?.unwrap_or(DEFAULT_TOKEN_TTL);
		let token_ttl = chrono::Duration::try_seconds(token_ttl)
			.filter(|ttl| *ttl > chrono::Duration::zero())
			.ok_or_else(|| Error::Invalid {
				name: "TOKEN_TTL",
				value: token_ttl.to_string(),
			})?;

		Ok(Self {
			database_url: var("DATABASE_URL"),
			host: parse(&var, "HOST")?.unwrap_or(IpAddr::from(DEFAULT_HOST)),
			port: parse(&var, "PORT")?.unwrap_or(DEFAULT_PORT),
			secret,
			token_ttl,
			log_level: parse(&var, "LOG_LEVEL")?.unwrap_or(LevelFilter::INFO),
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
		})
	}
}

fn parse<T: FromStr>(
	var: impl Fn(&str) -> Option<String>,
	name: &'static str,
) -> Result<Option<T>, Error> {
	var(name)
		.map(|value| value.parse().map_err(|_| Error::Invalid { name, value }))
		.transpose()
}
