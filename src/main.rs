use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use branch_mix::core::{read_roster_file, write_artifacts, MixPolicy};
use branch_mix::logging::setup_logging;
use branch_mix::{run_mix, AppConfig, AppError};

#[derive(Parser, Debug)]
#[command(
    name = "branch-mix",
    version,
    about = "Split a roster into groups mixed by the branch code in each roll number"
)]
struct Args {
    /// CSV roster with a header row
    input: PathBuf,

    /// Number of groups to build
    #[arg(short = 'n', long)]
    groups: Option<usize>,

    /// Column holding the identifier (default: Roll)
    #[arg(short = 'c', long)]
    column: Option<String>,

    /// Directory to write the output tables to (default: output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file. Without it, the platform config directory is checked.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a timestamped log file into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Run everything and print the summaries, but write no files
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    setup_logging(args.verbose, args.log_dir.as_deref())?;
    info!("Starting branch-mix");

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(groups) = args.groups {
        config.group_count = groups;
    }
    if let Some(column) = args.column {
        config.identifier_column = column;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    let options = config.mix_options()?;

    let roster = read_roster_file(&args.input)?;
    let outcome = run_mix(&roster, &options)?;
    let artifacts = outcome.artifacts()?;

    for policy in [MixPolicy::RoundRobin, MixPolicy::Uniform] {
        println!(
            "{} ({} groups of up to {})",
            policy.as_str(),
            outcome.groups(policy).len(),
            outcome.group_size
        );
        println!("{}", outcome.stats(policy));
    }

    if args.dry_run {
        info!("Dry run: {} tables not written", artifacts.len());
        return Ok(());
    }

    let manifest = outcome.manifest(&artifacts);
    let written = write_artifacts(&config.output_dir, &artifacts, &manifest)?;
    println!("Wrote {} files to {}", written.len(), config.output_dir.display());

    Ok(())
}
