//! Short-lived sequential control connection to the streaming server.
//!
//! Unlike [`super::StreamingClient`] this reads inline instead of spawning a
//! reader task: BTLE management commands are strictly request/response and
//! pushed events can be skipped.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

use super::{CONNECT_TIMEOUT, RESPONSE_TIMEOUT};
use crate::error::{Error, Result};
use crate::protocol::{self, Command, ServerMessage};

pub(crate) struct ControlConnection {
	lines: Lines<BufReader<OwnedReadHalf>>,
	write: OwnedWriteHalf,
}

impl ControlConnection {
	pub(crate) async fn open(addr: &str) -> Result<Self> {
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

		let (read, write) = stream.into_split();
		Ok(Self {
			lines: BufReader::new(read).lines(),
			write,
		})
	}

	/// Sends one command and reads lines until its response arrives.
	pub(crate) async fn round_trip(&mut self, command: &Command) -> Result<protocol::Response> {
		let line = command.to_line();
		self.write.write_all(line.as_bytes()).await?;
		self.write.write_all(b"\n").await?;

		loop {
			let next = timeout(RESPONSE_TIMEOUT, self.lines.next_line())
				.await
				.map_err(|_| Error::Protocol(format!("no response to {}", command.keyword())))??;
			let Some(line) = next else {
				return Err(Error::ConnectionClosed);
			};
			if line.trim().is_empty() {
				continue;
			}
			match protocol::parse_line(&line) {
				ServerMessage::Response(response) => return Ok(response),
				// pushed events belong to the streaming connection
				_ => continue,
			}
		}
	}
}
