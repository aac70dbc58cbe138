//! BTLE link management through the streaming server's dongle commands.
//!
//! The server owns the BTLE dongle; discovery and link setup go through its
//! `device_discover_list` / `device_connect_btle` command subset. Swapping in
//! a host radio stack only requires another [`Transport`] implementation.

use async_trait::async_trait;
use tracing::debug;

use super::control::ControlConnection;
use super::ok_or_rejected;
use crate::address::DeviceAddress;
use crate::error::{Error, Result};
use crate::protocol::{self, Command};
use crate::transport::{Transport, TransportPeer};

/// [`Transport`] implementation backed by the streaming server's dongle.
pub struct BtleLink {
	server_addr: String,
}

impl BtleLink {
	/// Creates a link manager against the server at `server_addr`.
	pub fn new(server_addr: impl Into<String>) -> Self {
		Self {
			server_addr: server_addr.into(),
		}
	}
}

#[async_trait]
impl Transport for BtleLink {
	async fn discover_by_address(&self, address: &DeviceAddress) -> Result<Option<Box<dyn TransportPeer>>> {
		let mut control = ControlConnection::open(&self.server_addr).await?;
		let devices = match control.round_trip(&Command::DiscoverList).await? {
			protocol::Response::DiscoverList { devices } => devices,
			protocol::Response::Err { command, reason } => return Err(Error::Rejected { command, reason }),
			other => {
				return Err(Error::Protocol(format!(
					"unexpected response to device_discover_list: {other:?}"
				)));
			}
		};

		debug!(target = "e4link.transport", count = devices.len(), "dongle discovery finished");
		let found = devices.iter().any(|entry| entry.id.eq_ignore_ascii_case(address.as_str()));
		if !found {
			return Ok(None);
		}

		Ok(Some(Box::new(BtlePeer {
			control,
			address: address.clone(),
		})))
	}
}

struct BtlePeer {
	control: ControlConnection,
	address: DeviceAddress,
}

#[async_trait]
impl TransportPeer for BtlePeer {
	async fn connect(&mut self) -> Result<()> {
		let response = self
			.control
			.round_trip(&Command::ConnectBtle {
				address: self.address.as_str().to_string(),
			})
			.await?;
		ok_or_rejected(response)
	}

	async fn disconnect(&mut self) -> Result<()> {
		let response = self
			.control
			.round_trip(&Command::DisconnectBtle {
				address: self.address.as_str().to_string(),
			})
			.await?;
		ok_or_rejected(response)
	}
}
