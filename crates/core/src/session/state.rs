//! Lifecycle states of one session.

use std::fmt;

/// Where the orchestrator currently is in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Idle,
	TransportConnecting,
	TransportConnected,
	DeviceDiscovering,
	DeviceConnecting,
	Subscribing,
	Streaming,
	ShuttingDown,
	Terminal,
}

impl fmt::Display for SessionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SessionState::Idle => "idle",
			SessionState::TransportConnecting => "transport-connecting",
			SessionState::TransportConnected => "transport-connected",
			SessionState::DeviceDiscovering => "device-discovering",
			SessionState::DeviceConnecting => "device-connecting",
			SessionState::Subscribing => "subscribing",
			SessionState::Streaming => "streaming",
			SessionState::ShuttingDown => "shutting-down",
			SessionState::Terminal => "terminal",
		};
		f.write_str(name)
	}
}
