use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pyrelease::cli::{ReleaseOutcome, ReleaseWorkflow};
use pyrelease::config;
use pyrelease::domain::ReleaseOptions;
use pyrelease::process::SystemExecutor;
use pyrelease::ui;

/// Environment variable holding the log filter
const LOG_ENV: &str = "RELEASE_LOG";

#[derive(clap::Parser)]
#[command(
    name = "release",
    version,
    about = "Bump the version, build, commit, tag and optionally publish a release"
)]
struct Args {
    #[arg(value_name = "VERSION", help = "Version string without the \"v\"")]
    version_string: String,

    #[arg(long, value_name = "BRANCH-NAME", help = "Refuse to release from any other branch")]
    only_on: Option<String>,

    #[arg(long, help = "Push the release commit and tag upstream")]
    push: bool,

    #[arg(long, help = "Upload the built distributions")]
    upload: bool,

    #[arg(short, long, value_name = "PATH", help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long = "repo",
        value_name = "DIR",
        default_value = ".",
        help = "Repository to release"
    )]
    repo: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging();

    match run(args) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            ui::display_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ReleaseOutcome> {
    // Children share the process group and see the interrupt too; nothing
    // created so far is undone.
    ctrlc::set_handler(|| std::process::exit(1))
        .context("failed to install interrupt handler")?;

    let config = config::load_config(args.config.as_deref(), &args.repo)?;

    let mut options = ReleaseOptions::new(args.version_string)
        .push(args.push)
        .upload(args.upload);
    if let Some(branch) = args.only_on {
        options = options.only_on(branch);
    }

    let executor = SystemExecutor::new(&args.repo);
    let workflow = ReleaseWorkflow::new(&executor, &args.repo, &config.tools);
    Ok(workflow.run(&options)?)
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| "pyrelease=warn".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
