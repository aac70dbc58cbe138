//! Wire types for the streaming server's newline-delimited command protocol.
//!
//! The server speaks plain text frames: one command or pushed message per
//! line. Command responses are prefixed with `R`; everything else is a
//! pushed event (samples, wrist status, connection notices).

use crate::channel::Channel;

/// Line announcing that the BTLE link to the device dropped.
pub const CONNECTION_LOST: &str = "connection lost to device";

/// Client-to-server command frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// List BTLE devices visible to the server's dongle.
	DiscoverList,
	/// Connect the dongle to a BTLE device by address.
	ConnectBtle { address: String },
	/// Drop the dongle's BTLE link to a device.
	DisconnectBtle { address: String },
	/// List devices currently connected to the server.
	DeviceList,
	/// Claim a connected device for this client.
	DeviceConnect { id: String },
	/// Release the claimed device.
	DeviceDisconnect,
	/// Toggle one telemetry channel subscription.
	Subscribe { channel: Channel, on: bool },
	/// Toggle sample delivery for the whole session.
	Pause { on: bool },
}

impl Command {
	/// Command keyword echoed back in responses.
	pub fn keyword(&self) -> &'static str {
		match self {
			Command::DiscoverList => "device_discover_list",
			Command::ConnectBtle { .. } => "device_connect_btle",
			Command::DisconnectBtle { .. } => "device_disconnect_btle",
			Command::DeviceList => "device_list",
			Command::DeviceConnect { .. } => "device_connect",
			Command::DeviceDisconnect => "device_disconnect",
			Command::Subscribe { .. } => "device_subscribe",
			Command::Pause { .. } => "pause",
		}
	}

	/// Serialized wire line, without the trailing newline.
	pub fn to_line(&self) -> String {
		match self {
			Command::DiscoverList | Command::DeviceList | Command::DeviceDisconnect => self.keyword().to_string(),
			Command::ConnectBtle { address } | Command::DisconnectBtle { address } => {
				format!("{} {}", self.keyword(), address)
			}
			Command::DeviceConnect { id } => format!("{} {}", self.keyword(), id),
			Command::Subscribe { channel, on } => {
				format!("{} {} {}", self.keyword(), channel.code(), toggle(*on))
			}
			Command::Pause { on } => format!("{} {}", self.keyword(), toggle(*on)),
		}
	}
}

fn toggle(on: bool) -> &'static str {
	if on { "ON" } else { "OFF" }
}

/// Device entry returned by the list commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
	/// Device identifier (BTLE address for discover results).
	pub id: String,
	/// Reported model name.
	pub model: String,
}

/// Parsed `R ...` response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
	/// Command acknowledged.
	Ok { command: String },
	/// Command rejected with a reason.
	Err { command: String, reason: String },
	/// Devices connected to the server.
	DeviceList { devices: Vec<DeviceEntry> },
	/// BTLE devices visible to the dongle.
	DiscoverList { devices: Vec<DeviceEntry> },
}

/// Any line pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
	/// Response to a previously sent command.
	Response(Response),
	/// Raw sample line for one subscribed channel.
	Sample { channel: Channel, line: String },
	/// Wear-state report from the device.
	WristStatus { on_wrist: bool },
	/// The BTLE link to the device dropped.
	ConnectionLost,
	/// Anything the codec does not recognize.
	Unknown(String),
}

/// Parses one server line into a typed message.
pub fn parse_line(line: &str) -> ServerMessage {
	let line = line.trim_end();

	if let Some(payload) = line.strip_prefix("R ") {
		return ServerMessage::Response(parse_response(payload));
	}
	if line == CONNECTION_LOST {
		return ServerMessage::ConnectionLost;
	}
	if let Some(payload) = line.strip_prefix("E4_Wrist ") {
		let on_wrist = payload.split_whitespace().next_back() == Some("1");
		return ServerMessage::WristStatus { on_wrist };
	}
	if let Some((prefix, _)) = line.split_once(' ') {
		if let Some(channel) = Channel::from_stream_prefix(prefix) {
			return ServerMessage::Sample {
				channel,
				line: line.to_string(),
			};
		}
	}

	ServerMessage::Unknown(line.to_string())
}

fn parse_response(payload: &str) -> Response {
	if let Some(list) = payload.strip_prefix("device_discover_list") {
		return Response::DiscoverList {
			devices: parse_device_entries(list),
		};
	}
	if let Some(list) = payload.strip_prefix("device_list") {
		return Response::DeviceList {
			devices: parse_device_entries(list),
		};
	}

	let mut tokens = payload.split_whitespace();
	let command = tokens.next().unwrap_or_default().to_string();
	let rest: Vec<&str> = tokens.collect();

	match rest.iter().position(|token| *token == "ERR") {
		Some(pos) => {
			let reason = rest[pos + 1..].join(" ");
			Response::Err {
				command,
				reason: if reason.is_empty() { "unspecified error".to_string() } else { reason },
			}
		}
		None => Response::Ok { command },
	}
}

/// Parses the `<count> | <id> <model> | ...` tail of a list response.
fn parse_device_entries(payload: &str) -> Vec<DeviceEntry> {
	let mut segments = payload.split('|').map(str::trim);
	// leading segment carries the advertised count; the entries are authoritative
	let _count = segments.next();

	segments
		.filter(|segment| !segment.is_empty())
		.filter_map(|segment| {
			let mut tokens = segment.split_whitespace();
			let id = tokens.next()?.to_string();
			let model = tokens.next().unwrap_or("unknown").to_string();
			Some(DeviceEntry { id, model })
		})
		.collect()
}
