//! Monitoring-loop configuration.

use std::time::Duration;

/// Bounds for the monitoring loop.
#[derive(Debug, Clone)]
pub struct SessionConfig {
	/// Number of poll cycles before the session completes normally.
	pub iteration_count: u32,
	/// Sleep duration per poll cycle.
	pub interval: Duration,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			iteration_count: 10,
			interval: Duration::from_secs(1),
		}
	}
}

impl SessionConfig {
	/// Creates the default 10-cycle, one-second-interval configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the number of poll cycles.
	pub fn with_iteration_count(mut self, iteration_count: u32) -> Self {
		self.iteration_count = iteration_count;
		self
	}

	/// Sets the sleep duration per poll cycle.
	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = interval;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_contract() {
		let config = SessionConfig::new();
		assert_eq!(config.iteration_count, 10);
		assert_eq!(config.interval, Duration::from_secs(1));
	}

	#[test]
	fn builders_override_fields() {
		let config = SessionConfig::new()
			.with_iteration_count(3)
			.with_interval(Duration::from_millis(50));
		assert_eq!(config.iteration_count, 3);
		assert_eq!(config.interval, Duration::from_millis(50));
	}
}
