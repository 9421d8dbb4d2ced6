//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for robot-pilot
#[derive(Parser, Debug)]
#[command(name = "robot-pilot")]
#[command(author, version, about = "Drive a humanoid robot from natural-language commands")]
#[command(long_about = r#"
robot-pilot turns a natural-language command into a plan of robot tool calls,
executes it step by step and re-plans when a step fails.

Tools: Propagate Action, Control Servo, Capture Image, Summarize Scene and
Pick Object (closed-loop visual servoing toward a described object).

Configuration files are loaded from (in priority order):
1. ROBOT_PILOT_<SECTION>__<KEY>        Environment
2. --config <path>                     Explicit config file
3. ./robot-pilot.toml                  Project-level config
4. ~/.config/robot-pilot/config.toml   Global config

Example:
  robot-pilot run "wave at me and then bow"
  robot-pilot pick "red ball"
  robot-pilot stats trials.jsonl
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to daily files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plan and execute one command
    Run {
        /// The command, e.g. "pick up the red ball"
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Interactive mode: one command per line
    Chat,

    /// Run the pick-object servo loop directly, without the planner
    Pick {
        /// Object to approach, e.g. "red ball"
        #[arg(required = true, num_args = 1..)]
        object: Vec<String>,

        /// Do not write an episode file
        #[arg(long)]
        no_episode: bool,
    },

    /// Check a planner output file against the tool schema
    Validate {
        /// JSON file holding a planner document (`{"response", "plan"}`)
        file: PathBuf,
    },

    /// Summarize a JSONL trial log
    Stats {
        file: PathBuf,
    },
}

impl Command {
    /// Joined free-text argument of `run` and `pick`
    pub fn text(words: &[String]) -> String {
        words.join(" ")
    }
}
