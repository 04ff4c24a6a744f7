use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

pub const DEFAULT_PORT:u16 = 5000;
pub const DEFAULT_CONNECT_TIMEOUT_SEC:f64 = 1.0;
pub const DEFAULT_IO_TIMEOUT_SEC:f64 = 1.0;
pub const DEFAULT_QUIET_PERIOD_SEC:f64 = 1e-3;
pub const DEFAULT_RECEIVE_BUFFER_SIZE:usize = 1024;

/// Connection options, fixed when the session is opened.
///
/// Timeouts are kept in seconds so a JSON document can state them directly, e.g.
/// `{"address": "rp-f0a235.local", "quiet_period_secs": 0.005}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub address: String,
	pub port: u16,
	pub connect_timeout_secs: f64,
	pub io_timeout_secs: f64,
	pub quiet_period_secs: f64,
	pub receive_buffer_size: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			address: "127.0.0.1".to_owned(),
			port: DEFAULT_PORT,
			connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SEC,
			io_timeout_secs: DEFAULT_IO_TIMEOUT_SEC,
			quiet_period_secs: DEFAULT_QUIET_PERIOD_SEC,
			receive_buffer_size: DEFAULT_RECEIVE_BUFFER_SIZE,
		}
	}
}

fn secs(name:&str, x:f64) -> Result<Duration> {
	match Duration::try_from_secs_f64(x) {
		Ok(d) if x > 0.0 => Ok(d),
		_ => Err(Error::Config(format!("{} must be a positive number of seconds, got {}", name, x))),
	}
}

impl Config {

	pub fn new(address:&str) -> Self {
		Self{ address: address.to_owned(), ..Self::default() }
	}

	pub fn with_port(mut self, port:u16) -> Self { self.port = port; self }
	pub fn with_connect_timeout(mut self, t:Duration) -> Self { self.connect_timeout_secs = t.as_secs_f64(); self }
	pub fn with_io_timeout(mut self, t:Duration) -> Self { self.io_timeout_secs = t.as_secs_f64(); self }
	pub fn with_quiet_period(mut self, t:Duration) -> Self { self.quiet_period_secs = t.as_secs_f64(); self }
	pub fn with_receive_buffer_size(mut self, n:usize) -> Self { self.receive_buffer_size = n; self }

	pub fn from_json_str(s:&str) -> Result<Self> {
		let config:Self = serde_json::from_str(s)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_json_file<P: AsRef<Path>>(path:P) -> Result<Self> {
		let text = fs::read_to_string(path.as_ref())
			.map_err(|e| Error::Config(format!("unable to read {}: {}", path.as_ref().display(), e)))?;
		Self::from_json_str(&text)
	}

	pub fn validate(&self) -> Result<()> {
		if self.address.trim().is_empty() {
			return Err(Error::Config("address must not be empty".to_owned()));
		}
		if self.receive_buffer_size == 0 {
			return Err(Error::Config("receive_buffer_size must be at least one byte".to_owned()));
		}
		self.connect_timeout()?;
		self.io_timeout()?;
		self.quiet_period()?;
		Ok(())
	}

	pub fn connect_timeout(&self) -> Result<Duration> { secs("connect_timeout_secs", self.connect_timeout_secs) }
	pub fn io_timeout(&self)      -> Result<Duration> { secs("io_timeout_secs", self.io_timeout_secs) }
	pub fn quiet_period(&self)    -> Result<Duration> { secs("quiet_period_secs", self.quiet_period_secs) }

}
