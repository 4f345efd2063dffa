//! CLI entrypoint for pr-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use review_application::{
    NoTranscriptLogger, PullRequestSource, ReviewPullRequestInput, ReviewPullRequestUseCase,
    RunReviewUseCase, TranscriptLogger,
};
use review_domain::PullRequest;
use review_infrastructure::{
    ConfigLoader, FileConfig, GitHubClient, JsonlTranscriptLogger, LocalDiffSource,
    OpenAiGateway, OpenAiSettings,
};
use review_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, ReviewResults, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        print!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        return Ok(());
    }

    // Configuration: files and environment, then CLI flags on top
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    let _guard = init_logging(cli.verbose, config.logging.log_file.as_deref())?;
    info!("Starting pr-quorum");

    for issue in config.check()? {
        warn!("{}", issue);
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    let (Some(repo), Some(number)) = (cli.target_repo.clone(), cli.pr_number) else {
        bail!("TARGET_REPO and PR_NUMBER are required");
    };
    let params = cli.apply_overrides(config.review_params())?;

    // === Dependency Injection ===
    let settings = OpenAiSettings::from_config(&config.provider);
    if settings.api_key.is_none() {
        bail!(
            "No model API key: set {} or [provider] api_key",
            settings.api_key_env
        );
    }
    let gateway = Arc::new(OpenAiGateway::new(settings)?);

    let github = Arc::new(
        GitHubClient::new(&config.github.api_url, config.github.resolve_token())
            .context("Failed to create GitHub client")?,
    );
    if !cli.dry_run && !github.has_token() {
        bail!(
            "No GitHub token: set {} or use --dry-run",
            config.github.token_env
        );
    }

    let source: Arc<dyn PullRequestSource> = match &cli.diff_file {
        Some(path) => {
            let mut local = LocalDiffSource::new(path);
            if let Some(title) = &cli.title {
                local = local.with_title(title.clone());
            }
            Arc::new(local)
        }
        None => github.clone(),
    };

    let logger = transcript_logger(&config, &PullRequest::new(repo.clone(), number));

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling review");
            ctrl_c.cancel();
        }
    });

    let review = RunReviewUseCase::new(gateway)
        .with_logger(logger)
        .with_cancellation(cancellation);
    let use_case = ReviewPullRequestUseCase::new(source, github, review);

    let input = ReviewPullRequestInput::new(repo, number, params).dry_run(cli.dry_run);
    let report = if cli.quiet {
        use_case.execute(input).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    };

    // Output results
    let format = cli.output.or(config.output.format).unwrap_or_default();
    println!("{}", ConsoleFormatter.render(&report, format));

    if let Some(path) = cli.results_file.as_ref().or(config.output.results_file.as_ref()) {
        std::fs::write(path, ReviewResults::from_report(&report).to_json())
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        info!("Results saved to {}", path.display());
    }

    Ok(())
}

/// Initialize logging based on verbosity level (or `RUST_LOG`)
///
/// With `[logging] log_file` set, output also goes to that file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(path) = log_file else {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    builder
        .with_ansi(false)
        .with_writer(std::io::stderr.and(file_writer))
        .init();
    Ok(Some(guard))
}

/// JSONL transcript for this run, or a no-op logger when disabled
fn transcript_logger(config: &FileConfig, pr: &PullRequest) -> Arc<dyn TranscriptLogger> {
    let Some(dir) = &config.logging.transcript_dir else {
        return Arc::new(NoTranscriptLogger);
    };
    match JsonlTranscriptLogger::for_review(dir, pr) {
        Some(logger) => {
            info!("Writing review transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoTranscriptLogger),
    }
}
