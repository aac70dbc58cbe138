use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Root CLI: collect one bounded telemetry session from an E4 wristband.
#[derive(Parser, Debug)]
#[command(name = "e4link")]
#[command(about = "Session runner for the Empatica E4 streaming pipeline")]
#[command(version)]
pub struct Cli {
	/// BTLE hardware address of the wristband (e.g. 2C:11:65:5A:6F:33).
	#[arg(value_name = "ADDRESS")]
	pub address: String,

	/// Streaming server endpoint.
	#[arg(long, value_name = "HOST:PORT", default_value = "127.0.0.1:28000")]
	pub server: String,

	/// Number of monitoring poll cycles.
	#[arg(long, value_name = "N", default_value_t = 10)]
	pub iterations: u32,

	/// Sleep duration per poll cycle, in seconds.
	#[arg(long, value_name = "SECS", default_value_t = 1)]
	pub interval_secs: u64,

	/// File the collected readings are written to.
	#[arg(long, value_name = "FILE", default_value = "readings.txt")]
	pub readings_out: PathBuf,

	/// Output format for the outcome line.
	#[arg(short = 'f', long, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn address_alone_uses_defaults() {
		let cli = Cli::try_parse_from(["e4link", "2C:11:65:5A:6F:33"]).unwrap();
		assert_eq!(cli.address, "2C:11:65:5A:6F:33");
		assert_eq!(cli.server, "127.0.0.1:28000");
		assert_eq!(cli.iterations, 10);
		assert_eq!(cli.interval_secs, 1);
		assert_eq!(cli.readings_out, PathBuf::from("readings.txt"));
		assert_eq!(cli.format, OutputFormat::Text);
		assert_eq!(cli.verbose, 0);
	}

	#[test]
	fn flags_override_defaults() {
		let cli = Cli::try_parse_from([
			"e4link",
			"2C:11:65:5A:6F:33",
			"--server",
			"10.0.0.5:28000",
			"--iterations",
			"30",
			"--interval-secs",
			"2",
			"--readings-out",
			"/tmp/out.txt",
			"-f",
			"json",
			"-vv",
		])
		.unwrap();
		assert_eq!(cli.server, "10.0.0.5:28000");
		assert_eq!(cli.iterations, 30);
		assert_eq!(cli.interval_secs, 2);
		assert_eq!(cli.format, OutputFormat::Json);
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn missing_address_is_an_error() {
		assert!(Cli::try_parse_from(["e4link"]).is_err());
	}
}
