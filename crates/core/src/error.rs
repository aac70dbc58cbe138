//! Error types for the e4link client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the transport and streaming capabilities.
#[derive(Debug, Error)]
pub enum Error {
	/// The vendor streaming server is not reachable.
	#[error("streaming server unreachable at {addr}: {reason}")]
	ServerUnreachable { addr: String, reason: String },

	/// The server replied with something the protocol layer cannot parse.
	#[error("protocol error: {0}")]
	Protocol(String),

	/// The server rejected a command.
	#[error("{command} rejected: {reason}")]
	Rejected { command: String, reason: String },

	/// The device or its radio link reported a fault.
	#[error("device error: {0}")]
	Device(String),

	/// The control connection closed while a session still needed it.
	#[error("connection closed unexpectedly")]
	ConnectionClosed,

	/// Malformed device address.
	#[error("invalid device address: {0}")]
	InvalidAddress(String),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true when the fault identifies an unreachable streaming server.
	pub fn is_server_unreachable(&self) -> bool {
		matches!(self, Error::ServerUnreachable { .. })
	}
}
