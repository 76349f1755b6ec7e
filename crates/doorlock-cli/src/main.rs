//! `doorlock`: runs the UI node and the actuator node in one process.

mod config;
mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use doorlock_actuator::{ActuatorDevices, ActuatorError, Dispatcher};
use doorlock_hardware::{
    HardwareError, TokioTickSource,
    mock::{MockEeprom, MockKeypad},
};
use doorlock_hmi::{Controller, HmiError};
use doorlock_link::{LinkError, duplex};
use doorlock_protocol::Opcode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::DeviceConfig;
use crate::console::{ConsoleAlarm, ConsoleDisplay, ConsoleMotor, forward_stdin};

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-node keypad door lock simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run both nodes with keys from stdin and the display on stdout.
    Simulate(SimulateArgs),
    /// Print the link opcode table.
    Opcodes,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// JSON file with device settings.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the timer tick length in milliseconds.
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => simulate(args).await,
        Command::Opcodes => {
            print_opcodes();
            Ok(())
        }
    }
}

async fn simulate(args: SimulateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DeviceConfig::load(path)?,
        None => DeviceConfig::default(),
    };
    if let Some(tick_ms) = args.tick_ms {
        config.tick_period_ms = tick_ms;
    }
    config.validate()?;

    let (ui_link, actuator_link) = duplex(config.link);
    let (keypad, keys) = MockKeypad::with_name("Console Keypad".to_string());
    let (eeprom, _eeprom) = MockEeprom::new();

    let mut ui = Controller::new(
        ui_link,
        keypad,
        ConsoleDisplay,
        TokioTickSource::new(config.tick_period()),
        config.hmi,
    )?;
    let mut actuator = Dispatcher::assemble(
        actuator_link,
        ActuatorDevices {
            eeprom,
            motor: ConsoleMotor::default(),
            alarm: ConsoleAlarm::default(),
            ticks: TokioTickSource::new(config.tick_period()),
        },
        &config.actuator,
    )?;

    info!(tick_ms = config.tick_period_ms, "Simulator started");
    let stdin = tokio::spawn(forward_stdin(keys));

    let ui_side = async move {
        let result = ui.run().await;
        drop(ui);
        result
    };

    let (ui_result, actuator_result) = tokio::select! {
        results = async { tokio::join!(ui_side, actuator.run()) } => results,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            return Ok(());
        }
    };

    stdin.abort();

    match ui_result {
        Err(HmiError::Hardware(HardwareError::Disconnected { .. })) => info!("Keypad closed"),
        other => other.context("UI node stopped")?,
    }
    match actuator_result {
        Err(ActuatorError::Link(LinkError::Disconnected)) => {
            info!("Actuator node stopped");
        }
        other => other.context("actuator node stopped")?,
    }
    Ok(())
}

fn print_opcodes() {
    println!("{:<6} {:<16} {:<9} payload", "code", "name", "class");
    for opcode in Opcode::ALL {
        println!(
            "0x{:02X}   {:<16} {:<9} {}",
            opcode.as_u8(),
            opcode.as_str(),
            opcode.class().to_string(),
            opcode.payload_len()
        );
    }
}
