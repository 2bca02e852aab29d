use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use release_range::cli::{
    emit_commit_outputs, run_commits_workflow, run_version_workflow, CommitsWorkflowArgs, Source,
};
use release_range::config::{self, Config};
use release_range::domain::Version;
use release_range::{telemetry, ui};

#[derive(clap::Parser)]
#[command(
    name = "release-range",
    version,
    about = "Resolve commits since the last release tag and format release versions"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List conventional commits on a branch since the previous release tag
    Commits {
        #[arg(short, long, help = "Release branch to inspect")]
        branch: String,

        #[arg(
            short,
            long,
            help = "Version of the previous release (e.g. 1.3.1 or v1.3.1-beta)"
        )]
        previous_version: Version,

        #[arg(long, help = "Default branch of the repository [default: --branch]")]
        default_branch: Option<String>,

        #[arg(long, value_enum, default_value = "github", help = "Where to read history from")]
        source: Source,

        #[arg(long, default_value = ".", help = "Checkout used with --source local")]
        repo_path: PathBuf,
    },

    /// Print the dotted version of the computed release; exits 1 when there is none
    Version {
        #[arg(short, long, help = "Release metadata file [default: release.json]")]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    telemetry::init();
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Command::Commits {
            branch,
            previous_version,
            default_branch,
            source,
            repo_path,
        } => commits(
            CommitsWorkflowArgs {
                branch,
                previous_version,
                default_branch,
                source,
                repo_path,
            },
            &config,
        ),
        Command::Version { file } => version(file, &config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn commits(args: CommitsWorkflowArgs, config: &Config) -> Result<ExitCode> {
    let range = run_commits_workflow(&args, config)?;
    let json = emit_commit_outputs(&range)?;

    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn version(file: Option<PathBuf>, config: &Config) -> Result<ExitCode> {
    let release_file = file.unwrap_or_else(|| PathBuf::from(&config.release_file));

    match run_version_workflow(&release_file)? {
        Some(version) => {
            println!("{}", version);
            Ok(ExitCode::SUCCESS)
        }
        // No release computed this run: exit 1 without output
        None => Ok(ExitCode::from(1)),
    }
}
