//! Outcome rendering for humans and for machine consumers.

use e4link::SessionOutcome;
use serde::Serialize;

/// Output format for the final outcome line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable line (default).
	#[default]
	Text,
	/// JSON envelope.
	Json,
}

/// Envelope emitted in JSON mode.
#[derive(Debug, Serialize)]
struct OutcomeReport<'a> {
	ok: bool,
	outcome: &'a str,
	message: String,
}

/// Prints the outcome to stdout in the requested format.
pub fn print_outcome(outcome: &SessionOutcome, format: OutputFormat) {
	match format {
		OutputFormat::Text => println!("{outcome}"),
		OutputFormat::Json => {
			let report = OutcomeReport {
				ok: outcome.is_success(),
				outcome: outcome.code(),
				message: outcome.to_string(),
			};
			match serde_json::to_string(&report) {
				Ok(line) => println!("{line}"),
				Err(err) => eprintln!("failed to encode outcome: {err}"),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn json_envelope_carries_code_and_message() {
		let outcome = SessionOutcome::NotWornAbort;
		let report = OutcomeReport {
			ok: outcome.is_success(),
			outcome: outcome.code(),
			message: outcome.to_string(),
		};
		let encoded = serde_json::to_string(&report).unwrap();
		assert!(encoded.contains("\"ok\":false"));
		assert!(encoded.contains("\"outcome\":\"not-worn-abort\""));
		assert!(encoded.contains("not on wrist"));
	}
}
