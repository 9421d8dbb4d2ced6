//! CLI entrypoint for robot-pilot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use pilot_application::{
    ExecutePlanUseCase, ExecutionProgressNotifier, NoProgress, PickObjectUseCase,
    RunCommandUseCase,
};
use pilot_domain::{
    ActionVocabulary, PlanCompliance, TrialStats, plan::extract_json_text, validate_plan_value,
};
use pilot_infrastructure::{
    ConfigLoader, FileConfig, HttpVisionClient, JsonEpisodeStore, JsonRpcActuatorClient,
    JsonlTrialLogger, OllamaPlannerGateway, RobotToolInvoker, read_trial_log,
};
use pilot_presentation::{ChatRepl, Cli, Command, ConsoleFormatter, ProgressReporter, SimpleProgress};
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

type Vision = HttpVisionClient;
type Actuator = JsonRpcActuatorClient;
type Runner = RunCommandUseCase<OllamaPlannerGateway, RobotToolInvoker<Vision, Actuator>, Vision>;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting robot-pilot");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let succeeded = match cli.command.clone() {
        Some(Command::Run { words }) => {
            let config = load_config(&cli)?;
            let token = cancel_on_ctrl_c();
            let progress: Arc<dyn ExecutionProgressNotifier> = if cli.quiet {
                Arc::new(NoProgress)
            } else {
                Arc::new(ProgressReporter::new())
            };
            let runner = build_runner(&config, Some(progress.clone()), Some(token))?;

            let command = Command::text(&words);
            let output = runner.execute_with_progress(&command, progress.as_ref()).await;
            if cli.quiet {
                print!("{}", ConsoleFormatter::format_plan(&output.planned.plan));
            }
            print!("{}", ConsoleFormatter::format_compliance(&output.compliance));
            print!("{}", ConsoleFormatter::format_report(&output.report));
            output.report.is_success()
        }
        Some(Command::Chat) => {
            let config = load_config(&cli)?;
            let runner = build_runner(&config, None, None)?;
            ChatRepl::new(runner)
                .with_progress(!cli.quiet)
                .run()
                .await?;
            true
        }
        Some(Command::Pick { object, no_episode }) => {
            let config = load_config(&cli)?;
            let token = cancel_on_ctrl_c();
            let (vision, actuator) = build_adapters(&config)?;
            let pick = build_pick(&config, vision, actuator, !no_episode).with_cancellation(token);

            let object = Command::text(&object);
            let outcome = if cli.quiet {
                pick.execute(&object).await?
            } else {
                pick.execute_with_progress(&object, &SimpleProgress).await?
            };
            print!("{}", ConsoleFormatter::format_pick(&outcome));
            outcome.success
        }
        Some(Command::Validate { file }) => {
            let compliance = validate_file(&file)?;
            print!("{}", ConsoleFormatter::format_compliance(&compliance));
            compliance.plan_compliant
        }
        Some(Command::Stats { file }) => {
            let records = read_trial_log(&file)
                .with_context(|| format!("Failed to read trial log {}", file.display()))?;
            if records.is_empty() {
                bail!("No trial records in {}", file.display());
            }
            let stats = TrialStats::from_records(&records);
            print!("{}", ConsoleFormatter::format_stats(&stats));
            true
        }
        None => bail!("A command is required. Try `robot-pilot run wave at me` or `robot-pilot chat`."),
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Console logging by verbosity, plus daily log files when `log_dir` is set
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "robot-pilot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Invalid configuration ({} problem(s))", errors.len());
    }
    Ok(config)
}

/// A token cancelled by the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current step");
            child.cancel();
        }
    });
    token
}

fn build_adapters(config: &FileConfig) -> Result<(Arc<Vision>, Arc<Actuator>)> {
    let vision = HttpVisionClient::from_config(&config.vision)?;
    let actuator = JsonRpcActuatorClient::from_config(&config.actuator)?;
    Ok((Arc::new(vision), Arc::new(actuator)))
}

fn build_pick(
    config: &FileConfig,
    vision: Arc<Vision>,
    actuator: Arc<Actuator>,
    save_episode: bool,
) -> PickObjectUseCase<Vision, Actuator> {
    let pick = PickObjectUseCase::new(vision, actuator, config.servo.clone());
    if save_episode && config.logging.save_episodes {
        pick.with_episode_store(Arc::new(JsonEpisodeStore::new(&config.logging.episodes_dir)))
    } else {
        pick
    }
}

fn build_runner(
    config: &FileConfig,
    pick_progress: Option<Arc<dyn ExecutionProgressNotifier>>,
    token: Option<CancellationToken>,
) -> Result<Runner> {
    let (vision, actuator) = build_adapters(config)?;
    let gateway = Arc::new(OllamaPlannerGateway::from_config(&config.planner)?);

    let mut pick = build_pick(config, vision.clone(), actuator.clone(), true);
    if let Some(token) = &token {
        pick = pick.with_cancellation(token.clone());
    }
    let mut invoker = RobotToolInvoker::new(vision.clone(), actuator, pick);
    if let Some(progress) = pick_progress {
        invoker = invoker.with_pick_progress(progress);
    }

    let mut executor =
        ExecutePlanUseCase::new(gateway, Arc::new(invoker), vision, ActionVocabulary::default())
            .with_params(config.executor.to_params());
    if let Some(token) = token {
        executor = executor.with_cancellation(token);
    }

    let mut runner = RunCommandUseCase::new(executor);
    if let Some(path) = &config.logging.trials_log {
        match JsonlTrialLogger::new(path) {
            Some(logger) => runner = runner.with_trial_log(Arc::new(logger)),
            None => warn!("Trial log {} could not be opened, trials will not be recorded", path),
        }
    }
    Ok(runner)
}

/// Compliance of a saved planner output (raw model text or a JSON document)
fn validate_file(path: &Path) -> Result<PlanCompliance> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let actions = ActionVocabulary::default();

    let document =
        extract_json_text(&text).and_then(|json| serde_json::from_str::<Value>(&json).ok());
    Ok(match document {
        Some(document) => validate_plan_value(&document, &actions),
        None => PlanCompliance::unparsed(),
    })
}
