use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{LevelFilter, debug, info};
use pydepscan_deps::Config;
use std::io::BufWriter;
use std::process::ExitCode;
use std::time::Instant;

const EX_OK: u8 = 0;
const EX_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "pydepscan", version)]
#[command(about = "Dependency scanner for Python source code")]
#[command(
    long_about = "Dependency scanner for Python source code.\n\n\
    Lists the packages imported by Python modules. Optional dependencies are \
    the ones imported under some condition: inside an `if` statement, a \
    `try`/`except` block, a function or a class. A simple heuristic based on \
    nesting is used, so results may not be fully accurate.\n\n\
    Results are always sorted."
)]
struct Cli {
    /// Minimum level of log messages written to stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(flatten)]
    config: Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new().filter_level(cli.log_level).parse_default_env().init();
    debug!("Parsed CLI arguments: {:?}", cli.config);

    match run(&cli.config) {
        Ok(()) => ExitCode::from(EX_OK),
        Err(err) => {
            debug!("Scan failed: {:?}", err);
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(EX_FAILURE)
        }
    }
}

fn run(cfg: &Config) -> Result<()> {
    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    let mut stdout = BufWriter::new(std::io::stdout());

    let start = Instant::now();
    info!(
        "Scanning {} paths (using {} threads)",
        cfg.modules.len(),
        rayon::current_num_threads()
    );

    let result = pydepscan_deps::run_dependency_scan(cfg)?;
    pydepscan_deps::print_dependencies(&mut stdout, &result, cfg.format)?;

    info!("Finished in {}ms on {} modules", start.elapsed().as_millis(), result.modules_scanned);
    Ok(())
}
