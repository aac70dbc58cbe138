mod cli;
mod logging;
mod output;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use e4link::stream::{BtleLink, StreamingClient};
use e4link::{DeviceAddress, SessionConfig, SessionOrchestrator, SessionOutcome};
use tokio::sync::watch;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match run(cli).await {
		Ok(outcome) => {
			if !outcome.is_success() {
				std::process::exit(1);
			}
		}
		Err(err) => {
			eprintln!("error: {err:#}");
			std::process::exit(2);
		}
	}
}

async fn run(cli: Cli) -> anyhow::Result<SessionOutcome> {
	let address: DeviceAddress = cli.address.parse().context("invalid device address")?;

	let transport = BtleLink::new(cli.server.clone());
	let mut client = StreamingClient::new(cli.server.clone());
	let config = SessionConfig::new()
		.with_iteration_count(cli.iterations)
		.with_interval(Duration::from_secs(cli.interval_secs));

	// Ctrl-C flips the cancellation flag; the session still shuts down cleanly.
	let (cancel_tx, cancel_rx) = watch::channel(false);
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			let _ = cancel_tx.send(true);
		}
	});

	let outcome = SessionOrchestrator::new(&transport, &mut client, config)
		.with_cancellation(cancel_rx)
		.run(&address, &cli.readings_out)
		.await;

	output::print_outcome(&outcome, cli.format);
	Ok(outcome)
}
