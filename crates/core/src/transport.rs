//! Wireless transport seam and the single-attempt connector.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::address::DeviceAddress;
use crate::error::{Error, Result};

/// Local wireless transport capability.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Performs one bounded discovery attempt for a device matching `address`.
	async fn discover_by_address(&self, address: &DeviceAddress) -> Result<Option<Box<dyn TransportPeer>>>;
}

/// A discovered, not-yet-connected transport peer.
#[async_trait]
pub trait TransportPeer: Send {
	/// Runs the connect handshake.
	async fn connect(&mut self) -> Result<()>;

	/// Tears the link down.
	async fn disconnect(&mut self) -> Result<()>;
}

/// Classified failure from a single connect attempt.
#[derive(Debug, Error)]
pub enum ConnectFailure {
	/// Discovery completed without finding the device.
	#[error("no device found at {address}")]
	NotFound { address: DeviceAddress },

	/// Discovery or the connect handshake faulted.
	#[error("failed to connect to {address}: {source}")]
	Connect {
		address: DeviceAddress,
		#[source]
		source: Error,
	},
}

/// Owned, connected transport link.
///
/// Consumed by [`TransportLink::release`]; the orchestrator releases it
/// exactly once on every exit path.
pub struct TransportLink {
	peer: Box<dyn TransportPeer>,
	address: DeviceAddress,
}

impl std::fmt::Debug for TransportLink {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransportLink").field("address", &self.address).finish_non_exhaustive()
	}
}

impl TransportLink {
	/// Address this link is connected to.
	pub fn address(&self) -> &DeviceAddress {
		&self.address
	}

	/// Disconnects the peer, consuming the link.
	pub async fn release(mut self) -> Result<()> {
		debug!(target = "e4link.transport", address = %self.address, "releasing transport link");
		self.peer.disconnect().await
	}
}

/// Single-attempt discovery + connect per the transport contract.
///
/// No retry: callers wanting another attempt call [`TransportConnector::connect`]
/// again.
pub struct TransportConnector<'a> {
	transport: &'a dyn Transport,
}

impl<'a> TransportConnector<'a> {
	/// Creates a connector over the given transport capability.
	pub fn new(transport: &'a dyn Transport) -> Self {
		Self { transport }
	}

	/// One discovery attempt and one connect handshake.
	pub async fn connect(&self, address: &DeviceAddress) -> std::result::Result<TransportLink, ConnectFailure> {
		let mut peer = match self.transport.discover_by_address(address).await {
			Ok(Some(peer)) => peer,
			Ok(None) => {
				return Err(ConnectFailure::NotFound {
					address: address.clone(),
				});
			}
			Err(source) => {
				return Err(ConnectFailure::Connect {
					address: address.clone(),
					source,
				});
			}
		};

		if let Err(source) = peer.connect().await {
			return Err(ConnectFailure::Connect {
				address: address.clone(),
				source,
			});
		}

		debug!(target = "e4link.transport", address = %address, "transport link established");
		Ok(TransportLink {
			peer,
			address: address.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	struct FakeTransport {
		present: bool,
		discover_fault: bool,
		connect_fault: bool,
		disconnects: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl Transport for FakeTransport {
		async fn discover_by_address(&self, _address: &DeviceAddress) -> Result<Option<Box<dyn TransportPeer>>> {
			if self.discover_fault {
				return Err(Error::Device("radio scan failed".into()));
			}
			if !self.present {
				return Ok(None);
			}
			Ok(Some(Box::new(FakePeer {
				connect_fault: self.connect_fault,
				disconnects: Arc::clone(&self.disconnects),
			})))
		}
	}

	struct FakePeer {
		connect_fault: bool,
		disconnects: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl TransportPeer for FakePeer {
		async fn connect(&mut self) -> Result<()> {
			if self.connect_fault {
				Err(Error::Device("handshake refused".into()))
			} else {
				Ok(())
			}
		}

		async fn disconnect(&mut self) -> Result<()> {
			self.disconnects.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	fn address() -> DeviceAddress {
		"2C:11:65:5A:6F:33".parse().unwrap()
	}

	#[tokio::test]
	async fn missing_device_classifies_as_not_found() {
		let transport = FakeTransport {
			present: false,
			discover_fault: false,
			connect_fault: false,
			disconnects: Arc::new(AtomicUsize::new(0)),
		};
		let failure = TransportConnector::new(&transport).connect(&address()).await.unwrap_err();
		assert!(matches!(failure, ConnectFailure::NotFound { .. }));
	}

	#[tokio::test]
	async fn handshake_fault_classifies_as_connect_with_cause() {
		let transport = FakeTransport {
			present: true,
			discover_fault: false,
			connect_fault: true,
			disconnects: Arc::new(AtomicUsize::new(0)),
		};
		let failure = TransportConnector::new(&transport).connect(&address()).await.unwrap_err();
		match failure {
			ConnectFailure::Connect { source, .. } => {
				assert!(source.to_string().contains("handshake refused"));
			}
			other => panic!("expected connect failure, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn discovery_fault_classifies_as_connect() {
		let transport = FakeTransport {
			present: true,
			discover_fault: true,
			connect_fault: false,
			disconnects: Arc::new(AtomicUsize::new(0)),
		};
		let failure = TransportConnector::new(&transport).connect(&address()).await.unwrap_err();
		assert!(matches!(failure, ConnectFailure::Connect { .. }));
	}

	#[tokio::test]
	async fn successful_connect_yields_releasable_link() {
		let disconnects = Arc::new(AtomicUsize::new(0));
		let transport = FakeTransport {
			present: true,
			discover_fault: false,
			connect_fault: false,
			disconnects: Arc::clone(&disconnects),
		};
		let link = TransportConnector::new(&transport).connect(&address()).await.unwrap();
		assert_eq!(link.address(), &address());
		link.release().await.unwrap();
		assert_eq!(disconnects.load(Ordering::SeqCst), 1);
	}
}
