use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

use xprobesim::config::RandomBounds;
use xprobesim::config_loader::{self, DefaultFileStatus};
use xprobesim::latency::{self, LatencyFormula};
use xprobesim::network::NetworkState;
use xprobesim::report;

/// Hierarchical tree network simulator with routing tables and XProbe RTT estimation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network configuration (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true, conflicts_with = "random")]
    config: Option<PathBuf>,

    /// Draw host counts at random instead of reading a configuration
    #[arg(long, global = true)]
    random: bool,

    /// Minimum hosts per edge switch in random mode
    #[arg(long, global = true, default_value_t = 1)]
    min_hosts: u32,

    /// Maximum hosts per edge switch in random mode
    #[arg(long, global = true, default_value_t = 3)]
    max_hosts: u32,

    /// Seed for link media, host counts and jitter
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default configuration file, replacing any existing one
    Init {
        #[arg(long, default_value_os_t = config_loader::default_config_path())]
        path: PathBuf,
    },
    /// List hosts and their addresses
    Hosts,
    /// Print the routing tables of the root and aggregation switches
    Routes,
    /// Print connection types and link capacities
    Links,
    /// Estimate the round-trip time between two nodes
    Probe {
        src: String,
        dst: String,
        /// Number of RTT samples (defaults to the configuration's probe settings)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
        samples: Option<u64>,
        /// Pause between printed samples, e.g. 500ms
        #[arg(long, value_parser = humantime_serde::re::humantime::parse_duration)]
        interval: Option<Duration>,
        /// Use the legacy flat per-hop formula
        #[arg(long)]
        legacy: bool,
    },
    /// Export the topology as GraphViz DOT
    Dot {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the full network state as JSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn build_network(args: &Args, rng: &mut StdRng) -> Result<NetworkState> {
    if args.random {
        let bounds = RandomBounds {
            min_hosts: args.min_hosts,
            max_hosts: args.max_hosts,
        };
        info!(
            "Generating random network with {}..={} hosts per edge switch",
            bounds.min_hosts, bounds.max_hosts
        );
        return NetworkState::random(&bounds, rng).wrap_err("Failed to generate random network");
    }

    let config = match &args.config {
        Some(path) => config_loader::load_config(path)
            .wrap_err_with(|| format!("Failed to load configuration '{}'", path.display()))?,
        None => {
            let path = config_loader::default_config_path();
            config_loader::load_or_create(&path)
                .wrap_err_with(|| format!("Failed to load configuration '{}'", path.display()))?
        }
    };

    NetworkState::from_config(config, rng).wrap_err("Failed to build network")
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    if let Command::Init { path } = &args.command {
        let status = config_loader::write_default_config(path)
            .wrap_err_with(|| format!("Failed to write default configuration '{}'", path.display()))?;
        match status {
            DefaultFileStatus::Created => println!("Created default configuration at {}", path.display()),
            DefaultFileStatus::Overwritten => {
                println!("Restored default configuration at {}", path.display())
            }
        }
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    info!("Using seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let state = build_network(&args, &mut rng)?;

    match &args.command {
        Command::Init { .. } => {}
        Command::Hosts => println!("{}", report::render_hosts(&state)),
        Command::Routes => println!("{}", report::render_routing_tables(&state)),
        Command::Links => println!("{}", report::render_link_inventory(&state)),
        Command::Probe {
            src,
            dst,
            samples,
            interval,
            legacy,
        } => {
            let settings = state.config().probe_settings();
            let mut model = state.config().latency_model();
            if *legacy {
                model.formula = LatencyFormula::HopCount;
            }
            let samples = samples.map(|n| n as usize).unwrap_or(settings.samples);
            let interval = interval.unwrap_or(settings.interval);

            let probe = latency::xprobe(&state, src, dst, samples, &model, &mut rng)
                .wrap_err_with(|| format!("XProbe from {} to {} failed", src, dst))?;

            for (index, rtt) in probe.samples.iter().enumerate() {
                if index > 0 && !interval.is_zero() {
                    std::thread::sleep(interval);
                }
                println!("{}", report::render_probe_sample(&probe, index, *rtt));
            }
            println!();
            println!("{}", report::render_probe_summary(&probe));
        }
        Command::Dot { output } => match output {
            Some(path) => report::write_dot(&state, path)?,
            None => print!("{}", report::generate_dot(&state)),
        },
        Command::Export { output } => match output {
            Some(path) => report::write_json_report(&state, path)?,
            None => println!(
                "{}",
                serde_json::to_string_pretty(&state).wrap_err("Failed to serialize network to JSON")?
            ),
        },
    }

    Ok(())
}
