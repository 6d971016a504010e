// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use arxiv_watch::config::DEFAULT_CONFIG_PATH;
use arxiv_watch::utils::logging::{
    format_error, format_info, format_step, format_success, format_warning, init_logger,
};
use arxiv_watch::{
    Config, Notifier, NotifyOutcome, PipelineOrchestrator, SeenStore, render_console_report,
};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "arxiv_watch")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Fetch new arXiv papers, filter them with a local LLM and mail a digest", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, filter, remember and notify (the default)
    Run {
        /// Skip the email digest even when mail is configured
        #[arg(long)]
        no_notify: bool,

        /// Hide the topic progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show how many paper ids the seen cache holds
    Seen,

    /// Validate configuration and print the effective settings
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?;

    init_logger(cli.color, cli.verbose || config.verbose);

    if cli.config.exists() {
        info!("Loaded configuration from: {}", cli.config.display());
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
    }

    match cli.command.unwrap_or(Commands::Run {
        no_notify: false,
        no_progress: false,
    }) {
        Commands::Run {
            no_notify,
            no_progress,
        } => cmd_run(config, no_notify, no_progress).await?,
        Commands::Seen => cmd_seen(&config).await?,
        Commands::Check => cmd_check(&config)?,
    }

    Ok(())
}

async fn cmd_run(config: Config, no_notify: bool, no_progress: bool) -> Result<()> {
    let mut orchestrator = PipelineOrchestrator::from_config(config)
        .context("Failed to initialize pipeline")?
        .with_progress(!no_progress);

    if no_notify {
        info!("Email notification disabled for this run");
        orchestrator = orchestrator.with_notifier(Notifier::disabled());
    }

    let report = orchestrator
        .run()
        .await
        .context("Run aborted: seen cache could not be read or written")?;

    let config = orchestrator.config();
    println!(
        "{}",
        render_console_report(
            &report.papers,
            report.window_start,
            report.window_end,
            &config.llm.model,
            config.search.days_back,
        )
    );

    if report.stats.topics_failed > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} of {} topics could not be fetched",
                report.stats.topics_failed, report.stats.topics_processed
            ))
        );
    }

    match report.notification {
        NotifyOutcome::Sent => println!("{}", format_success("Digest email sent")),
        NotifyOutcome::Failed => println!(
            "{}",
            format_error("Digest email failed; papers remain marked as seen")
        ),
        NotifyOutcome::Skipped => {}
    }

    println!(
        "{}",
        format_success(&format!(
            "{} new relevant papers, {} checked",
            report.papers.len(),
            report.stats.model_calls
        ))
    );

    Ok(())
}

async fn cmd_seen(config: &Config) -> Result<()> {
    let store = SeenStore::new(config.cache.path.clone());
    let seen = store.load().await.context("Failed to read seen cache")?;

    println!(
        "{}",
        format_info(&format!(
            "{} paper ids in {}",
            seen.len(),
            store.path().display()
        ))
    );
    Ok(())
}

fn cmd_check(config: &Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    for (idx, topic) in config.search.topics.iter().enumerate() {
        println!(
            "{}",
            format_step(idx + 1, config.search.topics.len(), topic)
        );
    }

    if config.smtp_settings().is_some() {
        println!("{}", format_success("Email notification configured"));
    } else {
        println!(
            "{}",
            format_warning("Email notification disabled (no complete [email] section)")
        );
    }

    println!("{}", config.to_redacted_json()?);
    println!("{}", format_success("Configuration is valid"));
    Ok(())
}
