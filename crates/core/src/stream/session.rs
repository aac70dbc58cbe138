//! Claimed-device session handle over the streaming server.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;

use super::{CommandChannel, ok_or_rejected};
use crate::channel::Channel;
use crate::device::DeviceSession;
use crate::error::{Error, Result};
use crate::protocol::{self, Command};

/// Observable device state maintained by the reader task.
///
/// `last_error` is sticky: the first error reported upstream is kept until
/// the session ends, later ones are dropped.
pub(crate) struct DeviceState {
	pub(crate) connected: bool,
	pub(crate) on_wrist: bool,
	pub(crate) last_error: Option<String>,
	pub(crate) readings: Vec<String>,
}

impl DeviceState {
	pub(crate) fn new() -> Self {
		Self {
			connected: false,
			// assume worn until the device reports otherwise
			on_wrist: true,
			last_error: None,
			readings: Vec::new(),
		}
	}
}

/// One claimed vendor-stream device.
///
/// [`DeviceSession::close`] drops the command channel; the observable state
/// stays readable so readings can still be persisted afterwards.
pub struct StreamingSession {
	channel: Option<Arc<TokioMutex<CommandChannel>>>,
	state: Arc<Mutex<DeviceState>>,
}

impl StreamingSession {
	pub(crate) fn new(channel: Arc<TokioMutex<CommandChannel>>, state: Arc<Mutex<DeviceState>>) -> Self {
		Self {
			channel: Some(channel),
			state,
		}
	}

	async fn round_trip(&self, command: Command) -> Result<protocol::Response> {
		let channel = self.channel.as_ref().ok_or(Error::ConnectionClosed)?;
		channel.lock().await.round_trip(&command).await
	}

	async fn expect_ok(&self, command: Command) -> Result<()> {
		ok_or_rejected(self.round_trip(command).await?)
	}
}

#[async_trait]
impl DeviceSession for StreamingSession {
	fn is_connected(&self) -> bool {
		self.state.lock().connected
	}

	fn on_wrist(&self) -> bool {
		self.state.lock().on_wrist
	}

	fn last_error(&self) -> Option<String> {
		self.state.lock().last_error.clone()
	}

	async fn subscribe(&mut self, channel: Channel) -> Result<()> {
		self.expect_ok(Command::Subscribe { channel, on: true }).await
	}

	async fn start_streaming(&mut self) -> Result<()> {
		self.expect_ok(Command::Pause { on: false }).await
	}

	async fn suspend_streaming(&mut self) -> Result<()> {
		self.expect_ok(Command::Pause { on: true }).await
	}

	async fn disconnect(&mut self) -> Result<()> {
		let result = self.expect_ok(Command::DeviceDisconnect).await;
		self.state.lock().connected = false;
		result
	}

	async fn close(&mut self) -> Result<()> {
		self.channel = None;
		Ok(())
	}

	async fn save_readings(&mut self, sink: &Path) -> Result<()> {
		let contents = {
			let state = self.state.lock();
			let mut contents = state.readings.join("\n");
			if !contents.is_empty() {
				contents.push('\n');
			}
			contents
		};
		tokio::fs::write(sink, contents).await?;
		debug!(target = "e4link.stream", sink = %sink.display(), "readings persisted");
		Ok(())
	}
}
