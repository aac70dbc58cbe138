//! Session lifecycle orchestration.
//!
//! Drives one full device session as an explicit state machine: transport
//! connect, upstream device discovery and claim, channel subscription, the
//! bounded monitoring loop, and ordered best-effort shutdown. Every fault is
//! mapped to exactly one [`SessionOutcome`] at this boundary; nothing
//! propagates past [`SessionOrchestrator::run`], and the transport link is
//! released exactly once on every exit path.

mod config;
mod outcome;
mod state;

use std::path::Path;

pub use config::SessionConfig;
pub use outcome::SessionOutcome;
pub use state::SessionState;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::address::DeviceAddress;
use crate::channel::Channel;
use crate::device::{DeviceClient, DeviceSession};
use crate::error::{Error, Result};
use crate::transport::{Transport, TransportConnector};

/// Orchestrates one session over the transport and device capabilities.
pub struct SessionOrchestrator<'a> {
	transport: &'a dyn Transport,
	client: &'a mut dyn DeviceClient,
	config: SessionConfig,
	cancel: Option<watch::Receiver<bool>>,
	state: SessionState,
}

/// How the monitoring loop ended.
enum LoopExit {
	Completed,
	NotWorn,
	UpstreamError(String),
	Cancelled,
}

impl LoopExit {
	fn into_outcome(self) -> SessionOutcome {
		match self {
			LoopExit::Completed => SessionOutcome::Success,
			LoopExit::NotWorn => SessionOutcome::NotWornAbort,
			LoopExit::UpstreamError(error) => SessionOutcome::UpstreamErrorAbort { error },
			LoopExit::Cancelled => SessionOutcome::UnexpectedFailure {
				cause: "session cancelled by caller".to_string(),
			},
		}
	}
}

impl<'a> SessionOrchestrator<'a> {
	/// Creates an orchestrator over the given capabilities.
	pub fn new(transport: &'a dyn Transport, client: &'a mut dyn DeviceClient, config: SessionConfig) -> Self {
		Self {
			transport,
			client,
			config,
			cancel: None,
			state: SessionState::Idle,
		}
	}

	/// Installs a cancellation signal, honored at the per-iteration sleep
	/// point. A cancelled session still runs the full shutdown sequence.
	pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
		self.cancel = Some(cancel);
		self
	}

	/// Runs one full session against `address`, persisting readings to `sink`.
	///
	/// Never returns an error: every fault is folded into the outcome.
	pub async fn run(mut self, address: &DeviceAddress, sink: &Path) -> SessionOutcome {
		self.transition(SessionState::TransportConnecting);
		let link = match TransportConnector::new(self.transport).connect(address).await {
			Ok(link) => link,
			Err(failure) => {
				// nothing acquired yet, nothing to clean up
				self.transition(SessionState::Terminal);
				return failure.into();
			}
		};
		self.transition(SessionState::TransportConnected);

		let outcome = self.drive(sink).await;

		if let Err(err) = link.release().await {
			warn!(target = "e4link.session", error = %err, "transport release failed");
		}
		self.transition(SessionState::Terminal);
		outcome
	}

	/// Discovery through shutdown; the caller owns the transport link.
	async fn drive(&mut self, sink: &Path) -> SessionOutcome {
		self.transition(SessionState::DeviceDiscovering);
		let devices = match self.client.list_connected_devices().await {
			Ok(devices) => devices,
			Err(err) => return fault_outcome(err),
		};
		let Some(device) = devices.into_iter().next() else {
			return SessionOutcome::NoDeviceFound;
		};

		self.transition(SessionState::DeviceConnecting);
		let mut session = match self.client.open_device_session(&device).await {
			Ok(session) => session,
			Err(err) => return fault_outcome(err),
		};
		if !session.is_connected() {
			if let Err(err) = session.close().await {
				warn!(target = "e4link.session", error = %err, "closing rejected device handle failed");
			}
			return SessionOutcome::DeviceConnectFailure {
				device: device.to_string(),
			};
		}

		let outcome = match self.stream(session.as_mut()).await {
			Ok(exit) => exit.into_outcome(),
			Err(err) => fault_outcome(err),
		};

		self.transition(SessionState::ShuttingDown);
		self.shutdown(session.as_mut(), sink).await;
		outcome
	}

	/// Subscribes every channel, starts streaming, and runs the bounded loop.
	async fn stream(&mut self, session: &mut dyn DeviceSession) -> Result<LoopExit> {
		self.transition(SessionState::Subscribing);
		for channel in Channel::ALL {
			session.subscribe(channel).await?;
		}
		session.start_streaming().await?;

		self.transition(SessionState::Streaming);
		for iteration in 1..=self.config.iteration_count {
			if !self.pause().await {
				debug!(target = "e4link.session", iteration, "cancelled at sleep point");
				return Ok(LoopExit::Cancelled);
			}
			// fixed check order every iteration: wear state before error state
			if !session.on_wrist() {
				debug!(target = "e4link.session", iteration, "device no longer worn");
				return Ok(LoopExit::NotWorn);
			}
			if let Some(error) = session.last_error() {
				debug!(target = "e4link.session", iteration, error = %error, "upstream error signaled");
				return Ok(LoopExit::UpstreamError(error));
			}
		}

		Ok(LoopExit::Completed)
	}

	/// Best-effort teardown: every step is attempted in fixed order and a
	/// fault in one step never blocks the rest.
	async fn shutdown(&mut self, session: &mut dyn DeviceSession, sink: &Path) {
		if let Err(err) = session.suspend_streaming().await {
			warn!(target = "e4link.session", error = %err, "suspend-streaming failed during shutdown");
		}
		if let Err(err) = session.disconnect().await {
			warn!(target = "e4link.session", error = %err, "device disconnect failed during shutdown");
		}
		if let Err(err) = session.close().await {
			warn!(target = "e4link.session", error = %err, "device handle close failed during shutdown");
		}
		if let Err(err) = session.save_readings(sink).await {
			warn!(target = "e4link.session", sink = %sink.display(), error = %err, "persisting readings failed");
		}
	}

	/// Sleeps one interval; returns false when cancellation fired first.
	async fn pause(&mut self) -> bool {
		let interval = self.config.interval;
		match self.cancel.as_mut() {
			Some(cancel) => {
				tokio::select! {
					_ = tokio::time::sleep(interval) => true,
					_ = cancelled(cancel) => false,
				}
			}
			None => {
				tokio::time::sleep(interval).await;
				true
			}
		}
	}

	fn transition(&mut self, next: SessionState) {
		debug!(target = "e4link.session", from = %self.state, to = %next, "state transition");
		self.state = next;
	}
}

/// Resolves once the cancellation flag flips to true; pends forever when no
/// sender is left.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
	loop {
		if *cancel.borrow() {
			return;
		}
		if cancel.changed().await.is_err() {
			std::future::pending::<()>().await;
		}
	}
}

fn fault_outcome(err: Error) -> SessionOutcome {
	if err.is_server_unreachable() {
		SessionOutcome::ServerUnreachable
	} else {
		SessionOutcome::UnexpectedFailure {
			cause: err.to_string(),
		}
	}
}
