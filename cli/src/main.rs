//! CLI entrypoint for anvil
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use anvil_application::{ArtifactFetcher, BuildSession, ExecutionParams, PlanListener};
use anvil_domain::{Plan, ToolCall, ToolFinder};
use anvil_infrastructure::{ConfigLoader, DefaultFetcher, FileConfig, dependency_resolver, tool_finder};
use anvil_presentation::{Cli, Command, ConsoleListener, formatter_for, parse_batch};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    let params = execution_params(&cli, &config);

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Run `anvil --help` for usage.");
    };
    info!(?command, parallel = params.parallel, "Starting anvil");

    // === Dependency Injection ===
    let config = Arc::new(config);
    let fetcher: Arc<dyn ArtifactFetcher> = Arc::new(DefaultFetcher::new());
    let formatter = formatter_for(cli.output);

    match command {
        Command::Tools => {
            let finder = build_finder(&config, fetcher).await?;
            print!("{}", formatter.format_tools(&finder.tools()));
        }
        Command::Run { tool, args } => {
            let finder = build_finder(&config, fetcher).await?;
            let session = BuildSession::new(finder, &params);
            let record = session.runner().run(&ToolCall::of(tool, args)).await?;
            print!("{}", formatter.format_record(&record));
            record.require_successful()?;
        }
        Command::Batch { file, parallel } => {
            let calls = read_batch(&file)?;
            let finder = build_finder(&config, fetcher).await?;

            let mut session = BuildSession::new(finder, &params);
            if !cli.quiet {
                let listener: Arc<dyn PlanListener> = Arc::new(ConsoleListener::stderr());
                session = session.with_listener(listener);
            }

            let title = file.display().to_string();
            let plan = if parallel {
                Plan::parallel(title)
            } else {
                Plan::sequence(title)
            };
            let plan = calls
                .into_iter()
                .fold(plan, |plan, call| plan.with_task(session.tool_task(call)));

            match session.run(&plan).await {
                Ok(summary) => {
                    print!("{}", formatter.format_summary(&summary));
                    summary.require_successful()?;
                }
                Err(failure) => {
                    print!("{}", formatter.format_summary(&failure.summary));
                    return Err(failure.into());
                }
            }
        }
        Command::Resolve => {
            let resolver = dependency_resolver(&config, &params, fetcher)?;
            let report = resolver.resolve_missing().await?;
            print!("{}", formatter.format_resolution(&report));
        }
    }

    Ok(())
}

/// Configured execution parameters with command-line overrides applied
fn execution_params(cli: &Cli, config: &FileConfig) -> ExecutionParams {
    let mut params = config.execution.to_params();
    if cli.no_parallel {
        params = params.with_parallel(false);
    }
    if cli.fail_fast {
        params = params.with_failure_policy(anvil_application::FailurePolicy::FailFast);
    }
    let levels = cli
        .active_levels()
        .fold(params.levels.clone(), |levels, name| levels.activate(name));
    params.with_levels(levels)
}

/// Assemble the finder chain off the async executor
///
/// Immediate installers download while the chain is built, through a
/// blocking HTTP client.
async fn build_finder(
    config: &Arc<FileConfig>,
    fetcher: Arc<dyn ArtifactFetcher>,
) -> Result<Arc<dyn ToolFinder>> {
    let config = Arc::clone(config);
    let finder = tokio::task::spawn_blocking(move || tool_finder(&config, fetcher)).await??;
    Ok(Arc::new(finder))
}

fn read_batch(file: &Path) -> Result<Vec<ToolCall>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Cannot read batch file {}", file.display()))?;
    Ok(parse_batch(&text)?)
}
