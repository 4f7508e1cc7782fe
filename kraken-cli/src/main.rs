// kraken -- command-line tool for switching 433 MHz remote-controlled
// sockets through a transmitter module on a GPIO pin, or a mock line.
//
// Usage:
//   kraken list
//   kraken list --vendor intertechno
//   kraken codeword --vendor elro --model ab440sc --master 10000 --slave 11110 on
//   kraken --pin 17 send --vendor intertechno --model itr1500 --master A --slave 1 off
//   kraken --mock --repeat 3 sendcode 0FFFF0000F0F
//   kraken --protocol 2 --pulse-us 640 --timeout-ms 2000 sendcode 0FFF0FFF0F0F

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use kraken::gpio::DEFAULT_GPIO_ROOT;
use kraken::rf433::catalog::ALL;
use kraken::rf433::{Catalog, Rf433Switch, TransmitOptions, Transmitter, TransmitterBuilder};
use kraken::{Codeword, Protocol, RemoteSwitch, Status, TransmitReport};
use kraken_test_harness::{InstantTimer, MockLine};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// kraken -- switch 433 MHz sockets from the command line.
#[derive(Parser, Debug)]
#[command(name = "kraken", version, about)]
struct Cli {
    /// GPIO pin wired to the transmitter's data input.
    #[arg(long, env = "KRAKEN_PIN", default_value_t = 17, global = true)]
    pin: u32,

    /// sysfs GPIO root directory.
    #[arg(long, env = "KRAKEN_GPIO_ROOT", default_value = DEFAULT_GPIO_ROOT, global = true)]
    gpio_root: PathBuf,

    /// Protocol id (1, 2 or 3). Defaults to the device's protocol for
    /// `send`, and to 1 for `sendcode`.
    #[arg(long, global = true)]
    protocol: Option<u8>,

    /// Frames per transmission (default: 10).
    #[arg(long, global = true)]
    repeat: Option<u32>,

    /// Override the protocol's base pulse length, in microseconds.
    #[arg(long, global = true)]
    pulse_us: Option<u64>,

    /// Drive a mock line instead of a GPIO pin.
    /// Useful for checking codewords and timing without hardware.
    #[arg(long, global = true)]
    mock: bool,

    /// Abort a transmission that runs longer than this many milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the device catalog.
    List {
        /// Interface to list.
        #[arg(long, default_value = "433")]
        interface: String,

        /// Vendor to list, or `all`.
        #[arg(long, default_value = ALL)]
        vendor: String,
    },

    /// Print the codeword for a device command without sending it.
    Codeword(DeviceArgs),

    /// Encode and transmit a device command.
    Send(DeviceArgs),

    /// Transmit a raw tri-state codeword (e.g. 0FFFF0000F0F).
    Sendcode {
        /// Symbols over the alphabet 0, 1, F.
        codeword: String,
    },
}

#[derive(Args, Debug)]
struct DeviceArgs {
    /// Interface name.
    #[arg(long, default_value = "433")]
    interface: String,

    /// Vendor name from the catalog (e.g. elro, intertechno, dario).
    #[arg(long)]
    vendor: String,

    /// Model name from the catalog (e.g. ab440sc, itr1500).
    #[arg(long)]
    model: String,

    /// Master (system) code.
    #[arg(long)]
    master: String,

    /// Slave (unit) code.
    #[arg(long)]
    slave: String,

    /// `on` or `off`.
    status: String,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "kraken=info",
        1 => "kraken=debug",
        _ => "kraken=trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let json_logging = std::env::var("KRAKEN_LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(interface: &str, vendor: &str) -> Result<()> {
    let catalog = Catalog::builtin();
    let vendors = catalog
        .vendors(interface, vendor)
        .with_context(|| format!("cannot list vendor '{vendor}' on interface '{interface}'"))?;

    println!(
        "{:<12}  {:<10}  {:<12}  {:>8}  {:<16}  Actions",
        "Vendor", "Model", "Name", "Protocol", "Encoding"
    );
    println!(
        "{:<12}  {:<10}  {:<12}  {:>8}  {:<16}  -------",
        "-".repeat(12),
        "-".repeat(10),
        "-".repeat(12),
        "--------",
        "-".repeat(16)
    );
    for v in vendors {
        for m in &v.models {
            let actions: Vec<_> = m.actions.iter().map(|a| a.name).collect();
            println!(
                "{:<12}  {:<10}  {:<12}  {:>8}  {:<16}  {}",
                v.name,
                m.name,
                m.clear_name,
                m.protocol.id(),
                m.family.to_string(),
                actions.join(", ")
            );
        }
    }
    Ok(())
}

/// Look up the device, apply `--protocol`, and check the address by
/// encoding it once.
fn resolve_switch(
    cli: &Cli,
    args: &DeviceArgs,
) -> Result<(kraken::rf433::ResolvedDevice, Status)> {
    let mut device = Catalog::builtin()
        .resolve(&args.interface, &args.vendor, &args.model)
        .with_context(|| {
            format!(
                "unknown device {}/{}/{}",
                args.interface, args.vendor, args.model
            )
        })?;
    if let Some(id) = cli.protocol {
        device.protocol = Protocol::from_id(id)?;
    }
    let status: Status = args.status.parse()?;
    Ok((device, status))
}

fn cmd_codeword(cli: &Cli, args: &DeviceArgs) -> Result<()> {
    let (device, status) = resolve_switch(cli, args)?;
    let codeword = kraken::rf433::encode(device.family, &args.master, &args.slave, status)
        .context("cannot encode address")?;
    debug!(family = %device.family, protocol = device.protocol.id(), "resolved device");
    println!("{codeword}");
    Ok(())
}

fn build_transmitter(cli: &Cli, protocol: Protocol) -> Result<Transmitter> {
    let mut builder = TransmitterBuilder::new(protocol)
        .pin(cli.pin)
        .gpio_root(&cli.gpio_root);
    if let Some(n) = cli.repeat {
        builder = builder.repeat_count(n);
    }
    if let Some(us) = cli.pulse_us {
        builder = builder.pulse_length(Duration::from_micros(us));
    }

    if cli.mock {
        info!("using mock line");
        builder
            .build_with_line(MockLine::new(), InstantTimer::new())
            .context("failed to build transmitter with mock line")
    } else {
        builder
            .build()
            .with_context(|| format!("failed to build transmitter on GPIO {}", cli.pin))
    }
}

/// Options for an interactive transmission: Ctrl-C and `--timeout-ms`
/// both abort it.
fn operator_options(cli: &Cli, protocol: Protocol) -> TransmitOptions {
    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, aborting transmission");
            ctrl_c.cancel();
        }
    });

    let mut options = TransmitOptions::new()
        .with_protocol(protocol)
        .with_cancel(token);
    if let Some(ms) = cli.timeout_ms {
        options = options.with_abort_after(Duration::from_millis(ms));
    }
    options
}

fn print_report(codeword: &Codeword, report: &TransmitReport) {
    println!(
        "sent {codeword}: {} frames, {} segments, {} line writes in {:.1?}",
        report.frames, report.segments, report.writes, report.elapsed
    );
}

async fn run_transmission(
    transmitter: &Transmitter,
    codeword: &Codeword,
    options: TransmitOptions,
) -> Result<()> {
    let result = transmitter.transmit_with(codeword, options).await;
    transmitter.shutdown().await.ok();
    let report = result.with_context(|| format!("failed to send {codeword}"))?;
    print_report(codeword, &report);
    Ok(())
}

async fn cmd_send(cli: &Cli, args: &DeviceArgs) -> Result<()> {
    let (device, status) = resolve_switch(cli, args)?;
    let transmitter = Arc::new(build_transmitter(cli, device.protocol)?);
    let switch = Rf433Switch::from_device(&device, &args.master, &args.slave, transmitter.clone())
        .context("cannot encode address")?;
    let codeword = switch.codeword(status)?;
    info!(
        vendor = %switch.info().vendor,
        model = %switch.info().model,
        status = %status,
        "sending"
    );

    let options = operator_options(cli, switch.info().protocol);
    run_transmission(&transmitter, &codeword, options).await
}

async fn cmd_sendcode(cli: &Cli, text: &str) -> Result<()> {
    let codeword: Codeword = text
        .parse()
        .map_err(kraken::Error::from)
        .with_context(|| format!("invalid codeword '{text}'"))?;
    if codeword.is_empty() {
        bail!("codeword must not be empty");
    }
    let protocol = match cli.protocol {
        Some(id) => Protocol::from_id(id)?,
        None => Protocol::default(),
    };

    let transmitter = build_transmitter(cli, protocol)?;
    let options = operator_options(cli, protocol);
    run_transmission(&transmitter, &codeword, options).await
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::List { interface, vendor } => cmd_list(interface, vendor),
        Command::Codeword(args) => cmd_codeword(&cli, args),
        Command::Send(args) => cmd_send(&cli, args).await,
        Command::Sendcode { codeword } => cmd_sendcode(&cli, codeword).await,
    }
}
