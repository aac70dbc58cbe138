//! Streaming client and BTLE link behavior against an in-process fake server.

use std::net::SocketAddr;
use std::time::Duration;

use e4link::stream::BtleLink;
use e4link::{Channel, DeviceAddress, DeviceClient, DeviceSession, StreamingClient, TransportConnector};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

const DEVICE_ID: &str = "9ff167";
const DEVICE_ADDR: &str = "2C:11:65:5A:6F:33";

/// Minimal scripted stand-in for the vendor streaming server.
async fn spawn_server() -> SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		loop {
			let Ok((stream, _)) = listener.accept().await else {
				break;
			};
			tokio::spawn(serve_connection(stream));
		}
	});
	addr
}

async fn serve_connection(stream: TcpStream) {
	let (read, mut write) = stream.into_split();
	let mut lines = BufReader::new(read).lines();

	while let Ok(Some(line)) = lines.next_line().await {
		let reply = match line.trim() {
			"device_discover_list" => {
				format!("R device_discover_list 1 | {DEVICE_ADDR} Empatica_E4\n")
			}
			"device_list" => format!("R device_list 1 | {DEVICE_ID} Empatica_E4\n"),
			"device_disconnect" => "R device_disconnect OK\n".to_string(),
			"pause ON" => "R pause ON OK\n".to_string(),
			"pause OFF" => {
				// streaming resumes: ack, then push samples and a wrist report
				"R pause OFF OK\nE4_Gsr 1713000000.0 3.12\nE4_Acc 1713000000.0 12 -4 63\nE4_Wrist 1713000001.0 0\n".to_string()
			}
			other if other == format!("device_connect {DEVICE_ID}") => "R device_connect OK\n".to_string(),
			other if other == format!("device_connect_btle {DEVICE_ADDR}") => "R device_connect_btle OK\n".to_string(),
			other if other == format!("device_disconnect_btle {DEVICE_ADDR}") => {
				"R device_disconnect_btle OK\n".to_string()
			}
			other if other.starts_with("device_subscribe ") => {
				let stream_code = other.split_whitespace().nth(1).unwrap_or("?");
				format!("R device_subscribe {stream_code} OK\n")
			}
			other => format!("R {other} ERR unknown command\n"),
		};
		if write.write_all(reply.as_bytes()).await.is_err() {
			break;
		}
	}
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
	for _ in 0..200 {
		if condition() {
			return;
		}
		sleep(Duration::from_millis(5)).await;
	}
	panic!("condition not met within deadline");
}

#[tokio::test]
async fn refused_connection_surfaces_as_server_unreachable() {
	// grab a port that nothing is listening on
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let mut client = StreamingClient::new(addr.to_string());
	let err = client.list_connected_devices().await.unwrap_err();
	assert!(err.is_server_unreachable(), "got: {err}");
}

#[tokio::test]
async fn full_device_session_streams_and_persists_readings() {
	let addr = spawn_server().await;
	let mut client = StreamingClient::new(addr.to_string());

	let devices = client.list_connected_devices().await.unwrap();
	assert_eq!(devices.len(), 1);
	assert_eq!(devices[0].id, DEVICE_ID);

	let mut session = client.open_device_session(&devices[0]).await.unwrap();
	assert!(session.is_connected());
	assert!(session.on_wrist());

	for channel in Channel::ALL {
		session.subscribe(channel).await.unwrap();
	}
	session.start_streaming().await.unwrap();

	// pushed samples and the wrist report land via the reader task
	wait_for(|| !session.on_wrist()).await;

	session.suspend_streaming().await.unwrap();
	session.disconnect().await.unwrap();
	assert!(!session.is_connected());
	session.close().await.unwrap();

	let dir = tempfile::tempdir().unwrap();
	let sink = dir.path().join("readings.txt");
	session.save_readings(&sink).await.unwrap();

	let contents = std::fs::read_to_string(&sink).unwrap();
	assert!(contents.contains("E4_Gsr 1713000000.0 3.12"), "contents: {contents}");
	assert!(contents.contains("E4_Acc"), "contents: {contents}");
}

#[tokio::test]
async fn commands_after_close_are_rejected() {
	let addr = spawn_server().await;
	let mut client = StreamingClient::new(addr.to_string());

	let devices = client.list_connected_devices().await.unwrap();
	let mut session = client.open_device_session(&devices[0]).await.unwrap();
	session.close().await.unwrap();

	let err = session.start_streaming().await.unwrap_err();
	assert!(err.to_string().contains("connection closed"), "got: {err}");
}

#[tokio::test]
async fn btle_link_discovers_connects_and_releases() {
	let addr = spawn_server().await;
	let link = BtleLink::new(addr.to_string());
	let address: DeviceAddress = DEVICE_ADDR.parse().unwrap();

	let connected = TransportConnector::new(&link).connect(&address).await.unwrap();
	assert_eq!(connected.address(), &address);
	connected.release().await.unwrap();
}

#[tokio::test]
async fn btle_link_reports_unknown_address_as_not_found() {
	let addr = spawn_server().await;
	let link = BtleLink::new(addr.to_string());
	let address: DeviceAddress = "00:00:00:00:00:01".parse().unwrap();

	let failure = TransportConnector::new(&link).connect(&address).await.unwrap_err();
	assert!(matches!(failure, e4link::ConnectFailure::NotFound { .. }));
}
