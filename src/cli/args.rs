use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "followsweep")]
#[command(about = "Work through your pending follow requests one profile at a time")]
#[command(long_about = "followsweep - pending follow request cleanup

Imports the list of follow requests you have sent (from your account data
export) and walks you through them oldest first. Each profile must be
opened before it can be marked completed or skipped. Progress is saved
after every step, so you can stop and resume at any time.

QUICK START:
  followsweep import pending_follow_requests.json
  followsweep walk                  Interactive walk through the queue
  followsweep status                How far along you are

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  followsweep <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to the `general.default_output` config setting, or 'pretty'.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Session file to use instead of ~/.followsweep/session.json
    #[arg(long, global = true, env = "FOLLOWSWEEP_SESSION")]
    pub session: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

/// How `walk` treats each new request.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowMode {
    /// Open each profile explicitly.
    #[default]
    Manual,
    /// Open the next profile automatically when it comes up.
    Guided,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import an export file and start a new session
    ///
    /// Reads the "pending follow requests" JSON file from your account data
    /// export. Records missing a username, URL or timestamp are skipped.
    /// Requests are queued oldest first.
    ///
    /// # Examples
    ///
    ///   followsweep import pending_follow_requests.json
    ///   followsweep import export.json --force    Replace an unfinished session
    Import {
        /// Path to the export file
        file: PathBuf,

        /// Replace an existing unfinished session
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show session progress
    ///
    /// Displays completed, skipped and pending counts and the current request.
    #[command(alias = "st")]
    Status,

    /// List the whole queue in processing order
    #[command(alias = "ls")]
    Queue,

    /// Show the current request and its profile URL
    Current,

    /// Open the current profile
    ///
    /// Records the open and launches the profile in your browser. Opening
    /// the same profile again within the cooldown window is refused.
    #[command(alias = "o")]
    Open {
        /// Only print the URL; do not launch a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Mark the current request completed
    ///
    /// Only allowed after the profile has been opened.
    #[command(alias = "c")]
    Complete,

    /// Skip the current request
    ///
    /// Only allowed after the profile has been opened.
    #[command(alias = "s")]
    Skip,

    /// Walk through the queue interactively
    ///
    /// Resumes from the saved position. Press 'o' to open, 'c' to complete,
    /// 's' to skip and 'p' to stop for now.
    ///
    /// # Examples
    ///
    ///   followsweep walk
    ///   followsweep walk --mode guided    Open each profile automatically
    #[command(alias = "w")]
    Walk {
        /// Workflow mode (defaults to the `workflow.mode` config setting)
        #[arg(long, short = 'm', value_enum)]
        mode: Option<WorkflowMode>,

        /// Only print URLs; do not launch a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Discard the saved session
    Reset,

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   followsweep completions zsh > ~/.zsh/completions/_followsweep
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
