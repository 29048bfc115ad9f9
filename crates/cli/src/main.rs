//! Trace-driven cache hierarchy simulator CLI.

use clap::{ArgAction, Parser};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{fs, process};

use cachesim::config::{LevelConfig, SimConfig};
use cachesim::sim;

const USAGE: &str = "<BLOCKSIZE> <L1_SIZE> <L1_ASSOC> <L2_SIZE> <L2_ASSOC> <REPLACEMENT_POLICY> <INCLUSION_PROPERTY> <TRACE_FILE>";

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven L1/L2 cache simulator",
    long_about = None,
    override_usage = "cachesim [OPTIONS] <BLOCKSIZE> <L1_SIZE> <L1_ASSOC> <L2_SIZE> <L2_ASSOC> <REPLACEMENT_POLICY> <INCLUSION_PROPERTY> <TRACE_FILE>\n       cachesim [OPTIONS] --config <FILE> <TRACE_FILE>",
)]
struct Cli {
    /// Geometry and trace file. REPLACEMENT_POLICY is 0 (LRU), 1 (PLRU) or
    /// 2 (Optimal); INCLUSION_PROPERTY is 0 (non-inclusive) or 1 (inclusive);
    /// L2_SIZE 0 disables L2.
    #[arg(value_name = "ARGS", num_args = 1..=8, required = true)]
    args: Vec<String>,

    /// JSON simulation config; only the trace file is then given positionally.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Width of trace addresses in bits.
    #[arg(long, value_name = "BITS")]
    address_bits: Option<u32>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (mut config, trace_file) = match &cli.config {
        Some(path) => config_from_file(path, &cli.args),
        None => config_from_args(&cli.args),
    };
    if let Some(bits) = cli.address_bits {
        config.address_bits = bits;
    }

    let report = sim::run_file(&config, &trace_file).unwrap_or_else(|e| fail(&e.to_string()));

    if cli.json {
        let json = report
            .to_json()
            .unwrap_or_else(|e| fail(&format!("could not serialize report: {}", e)));
        println!("{}", json);
    } else {
        report.print();
    }
    std::io::stdout().flush().ok();
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config_from_args(args: &[String]) -> (SimConfig, String) {
    if args.len() != 8 {
        fail(&format!(
            "expected 8 arguments, got {}\n\n\x1b[1;33mUsage:\x1b[0m cachesim {}",
            args.len(),
            USAGE
        ));
    }

    let block_size = parse_number(&args[0], "BLOCKSIZE");
    let l1 = LevelConfig::new(
        parse_number(&args[1], "L1_SIZE"),
        parse_number(&args[2], "L1_ASSOC"),
    );
    let l2 = LevelConfig::new(
        parse_number(&args[3], "L2_SIZE"),
        parse_number(&args[4], "L2_ASSOC"),
    );
    let policy: u32 = parse_number(&args[5], "REPLACEMENT_POLICY");
    let inclusion: u32 = parse_number(&args[6], "INCLUSION_PROPERTY");

    let config = SimConfig::from_codes(block_size, l1, l2, policy, inclusion)
        .unwrap_or_else(|e| fail(&format!("configuration error: {}", e)));
    (config, args[7].clone())
}

fn config_from_file(path: &Path, args: &[String]) -> (SimConfig, String) {
    if args.len() != 1 {
        fail("with --config, the only positional argument is the trace file");
    }

    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("could not read '{}': {}", path.display(), e)));
    let config: SimConfig = serde_json::from_str(&text)
        .unwrap_or_else(|e| fail(&format!("invalid config '{}': {}", path.display(), e)));
    log::info!("using configuration from {}", path.display());
    (config, args[0].clone())
}

fn parse_number<T: FromStr>(text: &str, name: &str) -> T {
    text.parse()
        .unwrap_or_else(|_| fail(&format!("{} must be a non-negative integer (got '{}')", name, text)))
}

fn fail(message: &str) -> ! {
    eprintln!("\n\x1b[1;31merror:\x1b[0m {}\n", message);
    process::exit(1);
}
