//! Vendor device capability seams.
//!
//! The streaming server and its devices are external collaborators; the
//! orchestrator only sees these traits. [`crate::stream`] provides the
//! production implementation.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::channel::Channel;
use crate::error::Result;

/// One vendor device visible to the streaming server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRef {
	/// Server-assigned device identifier.
	pub id: String,
	/// Device model name as reported by the server.
	pub model: String,
}

impl fmt::Display for DeviceRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.id, self.model)
	}
}

/// Client-side view of the vendor streaming server.
#[async_trait]
pub trait DeviceClient: Send {
	/// Enumerates devices currently connected to the streaming server.
	async fn list_connected_devices(&mut self) -> Result<Vec<DeviceRef>>;

	/// Claims `device` and opens an upstream session for it.
	///
	/// A rejected claim is reported through the returned handle's
	/// [`DeviceSession::is_connected`], not as an `Err`.
	async fn open_device_session(&mut self, device: &DeviceRef) -> Result<Box<dyn DeviceSession>>;
}

/// One claimed vendor-stream device.
///
/// Invalid once its owning session has completed shutdown.
#[async_trait]
pub trait DeviceSession: Send {
	/// Whether the upstream claim succeeded.
	fn is_connected(&self) -> bool;

	/// Last reported wear state of the device.
	fn on_wrist(&self) -> bool;

	/// Last error signaled upstream, sticky once set.
	fn last_error(&self) -> Option<String>;

	/// Subscribes the session to one telemetry channel.
	async fn subscribe(&mut self, channel: Channel) -> Result<()>;

	/// Starts sample delivery for the subscribed channels.
	async fn start_streaming(&mut self) -> Result<()>;

	/// Suspends sample delivery.
	async fn suspend_streaming(&mut self) -> Result<()>;

	/// Releases the upstream device claim.
	async fn disconnect(&mut self) -> Result<()>;

	/// Invalidates the handle; observables stay readable for persistence.
	async fn close(&mut self) -> Result<()>;

	/// Persists the accumulated readings to `sink`.
	async fn save_readings(&mut self, sink: &Path) -> Result<()>;
}
