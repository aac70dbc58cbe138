//! Session client for the Empatica E4 wearable streaming pipeline.
//!
//! Connects to a wristband over a two-hop path (the BTLE link, then the
//! vendor streaming server), subscribes its telemetry channels, monitors the
//! session for a bounded duration, and tears everything down
//! deterministically, reporting a single [`SessionOutcome`].
//!
//! The transport and device collaborators sit behind the [`Transport`] and
//! [`DeviceClient`] traits; [`stream`] provides the production
//! implementations over the streaming server's TCP protocol.

pub mod address;
pub mod channel;
pub mod device;
pub mod error;
pub mod protocol;
pub mod session;
pub mod stream;
pub mod transport;

pub use address::DeviceAddress;
pub use channel::Channel;
pub use device::{DeviceClient, DeviceRef, DeviceSession};
pub use error::{Error, Result};
pub use session::{SessionConfig, SessionOrchestrator, SessionOutcome, SessionState};
pub use stream::{BtleLink, StreamingClient, StreamingSession};
pub use transport::{ConnectFailure, Transport, TransportConnector, TransportLink, TransportPeer};
