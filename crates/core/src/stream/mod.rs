//! Client for the vendor streaming server.
//!
//! One TCP control connection per client, opened lazily on first use so a
//! dead server surfaces as [`Error::ServerUnreachable`] at device-discovery
//! time. A background reader task parses every pushed line: command
//! responses are forwarded to the in-flight round-trip, samples and status
//! events update the shared device state.

mod btle;
mod control;
mod session;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

pub use self::btle::BtleLink;
use self::session::DeviceState;
pub use self::session::StreamingSession;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use tracing::{debug, trace};

use crate::device::{DeviceClient, DeviceRef, DeviceSession};
use crate::error::{Error, Result};
use crate::protocol::{self, Command, ServerMessage};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client-side handle to the vendor streaming server.
pub struct StreamingClient {
	server_addr: String,
	inner: Option<ClientInner>,
}

impl StreamingClient {
	/// Creates a client for the server at `server_addr` without connecting.
	pub fn new(server_addr: impl Into<String>) -> Self {
		Self {
			server_addr: server_addr.into(),
			inner: None,
		}
	}

	async fn ensure_connected(&mut self) -> Result<()> {
		if self.inner.is_none() {
			self.inner = Some(ClientInner::connect(&self.server_addr).await?);
		}
		Ok(())
	}

	fn inner(&self) -> Result<&ClientInner> {
		self.inner.as_ref().ok_or(Error::ConnectionClosed)
	}
}

#[async_trait]
impl DeviceClient for StreamingClient {
	async fn list_connected_devices(&mut self) -> Result<Vec<DeviceRef>> {
		self.ensure_connected().await?;
		let inner = self.inner()?;
		let response = inner.channel.lock().await.round_trip(&Command::DeviceList).await?;
		match response {
			protocol::Response::DeviceList { devices } => Ok(devices
				.into_iter()
				.map(|entry| DeviceRef {
					id: entry.id,
					model: entry.model,
				})
				.collect()),
			protocol::Response::Err { command, reason } => Err(Error::Rejected { command, reason }),
			other => Err(Error::Protocol(format!("unexpected response to device_list: {other:?}"))),
		}
	}

	async fn open_device_session(&mut self, device: &DeviceRef) -> Result<Box<dyn DeviceSession>> {
		self.ensure_connected().await?;
		let inner = self.inner()?;
		let response = inner
			.channel
			.lock()
			.await
			.round_trip(&Command::DeviceConnect { id: device.id.clone() })
			.await?;

		// A rejected claim is observable through the handle, not an Err.
		let connected = matches!(response, protocol::Response::Ok { .. });
		inner.state.lock().connected = connected;
		debug!(target = "e4link.stream", device = %device, connected, "device claim answered");

		Ok(Box::new(StreamingSession::new(
			Arc::clone(&inner.channel),
			Arc::clone(&inner.state),
		)))
	}
}

/// Live connection state: command channel, shared device state, reader task.
struct ClientInner {
	channel: Arc<TokioMutex<CommandChannel>>,
	state: Arc<Mutex<DeviceState>>,
	reader: JoinHandle<()>,
}

impl ClientInner {
	async fn connect(addr: &str) -> Result<Self> {
		let stream = match timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
			Ok(Ok(stream)) => stream,
			Ok(Err(err)) => {
				return Err(Error::ServerUnreachable {
					addr: addr.to_string(),
					reason: err.to_string(),
				});
			}
			Err(_) => {
				return Err(Error::ServerUnreachable {
					addr: addr.to_string(),
					reason: "connect timed out".to_string(),
				});
			}
		};

		debug!(target = "e4link.stream", addr = %addr, "connected to streaming server");
		let (read, write) = stream.into_split();
		let (response_tx, responses) = mpsc::channel(32);
		let state = Arc::new(Mutex::new(DeviceState::new()));
		let reader = tokio::spawn(read_loop(read, response_tx, Arc::clone(&state)));

		Ok(Self {
			channel: Arc::new(TokioMutex::new(CommandChannel { write, responses })),
			state,
			reader,
		})
	}
}

impl Drop for ClientInner {
	fn drop(&mut self) {
		self.reader.abort();
	}
}

/// Write half plus the response queue fed by the reader task.
///
/// Commands are strictly sequential on one connection, so a plain queue is
/// enough to correlate responses.
pub(crate) struct CommandChannel {
	write: OwnedWriteHalf,
	responses: mpsc::Receiver<protocol::Response>,
}

impl CommandChannel {
	pub(crate) async fn round_trip(&mut self, command: &Command) -> Result<protocol::Response> {
		let line = command.to_line();
		debug!(target = "e4link.stream", command = %line, "sending command");
		self.write.write_all(line.as_bytes()).await?;
		self.write.write_all(b"\n").await?;

		match timeout(RESPONSE_TIMEOUT, self.responses.recv()).await {
			Ok(Some(response)) => Ok(response),
			Ok(None) => Err(Error::ConnectionClosed),
			Err(_) => Err(Error::Protocol(format!("no response to {}", command.keyword()))),
		}
	}
}

/// Maps an acknowledgement-style response to `Ok(())`.
pub(crate) fn ok_or_rejected(response: protocol::Response) -> Result<()> {
	match response {
		protocol::Response::Ok { .. } => Ok(()),
		protocol::Response::Err { command, reason } => Err(Error::Rejected { command, reason }),
		other => Err(Error::Protocol(format!("unexpected response: {other:?}"))),
	}
}

async fn read_loop(read: OwnedReadHalf, responses: mpsc::Sender<protocol::Response>, state: Arc<Mutex<DeviceState>>) {
	let mut lines = BufReader::new(read).lines();

	while let Ok(Some(line)) = lines.next_line().await {
		if line.trim().is_empty() {
			continue;
		}
		match protocol::parse_line(&line) {
			ServerMessage::Response(response) => {
				let _ = responses.send(response).await;
			}
			ServerMessage::Sample { line, .. } => {
				state.lock().readings.push(line);
			}
			ServerMessage::WristStatus { on_wrist } => {
				state.lock().on_wrist = on_wrist;
			}
			ServerMessage::ConnectionLost => {
				let mut state = state.lock();
				state.last_error.get_or_insert_with(|| protocol::CONNECTION_LOST.to_string());
				state.connected = false;
			}
			ServerMessage::Unknown(line) => {
				trace!(target = "e4link.stream", line = %line, "unrecognized server line");
			}
		}
	}

	// EOF or read fault: surface as a sticky error if a session is live
	let mut state = state.lock();
	if state.connected {
		state.last_error.get_or_insert_with(|| "connection closed by server".to_string());
		state.connected = false;
	}
}
