//! d1-console binary entry point.

mod cli;

use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use d1_console::config::{resolve_endpoint, ConsoleConfig};
use d1_console::controller::Controller;
use d1_console::device::DeviceClient;
use d1_console::pin::Command;
use d1_console::ui::run_console;

use crate::cli::{Cli, ConsoleCommand};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load(&cli.config);
    let endpoint = resolve_endpoint(cli.endpoint.as_deref(), &config)?;
    let client = DeviceClient::new(endpoint);

    match cli.command.unwrap_or(ConsoleCommand::Console {
        latch_seconds: None,
        no_input: false,
    }) {
        ConsoleCommand::Console {
            latch_seconds,
            no_input,
        } => {
            let controller = Controller::new(client);
            run_console(controller, latch_seconds.or(config.latch_seconds), no_input)
        }
        ConsoleCommand::Status => {
            let report = client.status()?;
            println!("D1 is {}", report.pin.label());
            if let Some(seconds) = report.latch_seconds {
                println!("Device latch period: {seconds}s");
            }
            Ok(())
        }
        ConsoleCommand::On { latch_seconds } => {
            run_once(client, &config, Command::On, latch_seconds)
        }
        ConsoleCommand::Off { latch_seconds } => {
            run_once(client, &config, Command::Off, latch_seconds)
        }
        ConsoleCommand::Toggle { latch_seconds } => {
            run_once(client, &config, Command::Toggle, latch_seconds)
        }
    }
}

/// One-shot command path: resolve the action, apply it, and if a latch
/// was armed stay resident until the reversal has fired. The accumulated
/// debug log is echoed so scripts see the same trace the console shows.
fn run_once(
    client: DeviceClient,
    config: &ConsoleConfig,
    command: Command,
    latch_seconds: Option<u64>,
) -> anyhow::Result<()> {
    let latch_ms = latch_seconds
        .or(config.latch_seconds)
        .unwrap_or(0)
        .saturating_mul(1000);

    let mut controller = Controller::new(client);
    // Toggle resolves against the device's current state.
    controller.refresh();
    controller.set_state(command, latch_ms, Instant::now());

    while controller.latch_pending() {
        std::thread::sleep(Duration::from_millis(25));
        controller.tick(Instant::now());
    }

    for line in controller.log().lines() {
        println!("{line}");
    }
    Ok(())
}
