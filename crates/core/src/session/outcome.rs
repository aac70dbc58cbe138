//! Terminal session outcomes.

use std::fmt;

use crate::transport::ConnectFailure;

/// Terminal classification of one session.
///
/// Produced exactly once per session; [`fmt::Display`] renders the single
/// human-readable outcome line shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
	/// Every monitoring iteration completed with no abort condition.
	Success,
	/// The wireless transport could not produce a connected link.
	TransportConnectFailure { cause: String },
	/// The streaming server reported no connected devices.
	NoDeviceFound,
	/// The claimed device refused the upstream session.
	DeviceConnectFailure { device: String },
	/// The wristband left the wearer's wrist mid-session.
	NotWornAbort,
	/// The upstream client signaled an error mid-session.
	UpstreamErrorAbort { error: String },
	/// The vendor streaming server was not reachable.
	ServerUnreachable,
	/// An unclassified fault ended the session.
	UnexpectedFailure { cause: String },
}

impl SessionOutcome {
	/// Whether the session completed its full monitoring window.
	pub fn is_success(&self) -> bool {
		matches!(self, SessionOutcome::Success)
	}

	/// Stable machine-readable code for structured output.
	pub fn code(&self) -> &'static str {
		match self {
			SessionOutcome::Success => "success",
			SessionOutcome::TransportConnectFailure { .. } => "transport-connect-failure",
			SessionOutcome::NoDeviceFound => "no-device-found",
			SessionOutcome::DeviceConnectFailure { .. } => "device-connect-failure",
			SessionOutcome::NotWornAbort => "not-worn-abort",
			SessionOutcome::UpstreamErrorAbort { .. } => "upstream-error-abort",
			SessionOutcome::ServerUnreachable => "server-unreachable",
			SessionOutcome::UnexpectedFailure { .. } => "unexpected-failure",
		}
	}
}

impl fmt::Display for SessionOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SessionOutcome::Success => f.write_str("Data collection successful"),
			SessionOutcome::TransportConnectFailure { cause } => {
				write!(f, "Bluetooth connection failed: {cause}")
			}
			SessionOutcome::NoDeviceFound => f.write_str("No connected devices found"),
			SessionOutcome::DeviceConnectFailure { device } => {
				write!(f, "Could not connect to device: {device}")
			}
			SessionOutcome::NotWornAbort => f.write_str("Device is not on wrist, please put it on!"),
			SessionOutcome::UpstreamErrorAbort { error } => write!(f, "Error encountered: {error}"),
			SessionOutcome::ServerUnreachable => f.write_str(
				"Failed to connect to server, check that the streaming server is open and connected to the BLE dongle.",
			),
			SessionOutcome::UnexpectedFailure { cause } => {
				write!(f, "An unexpected error occurred: {cause}")
			}
		}
	}
}

impl From<ConnectFailure> for SessionOutcome {
	fn from(failure: ConnectFailure) -> Self {
		SessionOutcome::TransportConnectFailure {
			cause: failure.to_string(),
		}
	}
}
