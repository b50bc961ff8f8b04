use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use commentpulse_core::{
    AnalysisClient, AnalysisError, ClientConfig, DEFAULT_LOG_FILTER, Mode, OutputFormat,
    RequestShape, Sentiment, Session, SubmissionState, format_result_readable,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for OutputFormat (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliFormat {
    #[default]
    Json,
    Csv,
}

impl From<CliFormat> for OutputFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliSentiment {
    #[default]
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl From<CliSentiment> for Sentiment {
    fn from(cli: CliSentiment) -> Self {
        match cli {
            CliSentiment::Positive => Sentiment::Positive,
            CliSentiment::Negative => Sentiment::Negative,
            CliSentiment::Neutral => Sentiment::Neutral,
            CliSentiment::Mixed => Sentiment::Mixed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl From<CliMode> for Mode {
    fn from(cli: CliMode) -> Self {
        match cli {
            CliMode::Development => Mode::Development,
            CliMode::Production => Mode::Production,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliShape {
    /// videoId + outputFormat query parameters
    Id,
    /// videoLink query parameter
    #[default]
    Link,
}

impl From<CliShape> for RequestShape {
    fn from(cli: CliShape) -> Self {
        match cli {
            CliShape::Id => RequestShape::VideoId,
            CliShape::Link => RequestShape::VideoLink,
        }
    }
}

#[derive(Parser)]
#[command(name = "commentpulse")]
#[command(about = "Run sentiment analysis on a YouTube video's comments and show the results")]
struct Cli {
    /// YouTube video ID or link
    video: String,

    /// Output format the backend should write (sent with `--shape id`)
    #[arg(short, long, default_value = "json")]
    format: CliFormat,

    /// Sentiment whose keywords are shown
    #[arg(short, long, default_value = "positive")]
    sentiment: CliSentiment,

    /// Backend environment. Defaults to COMMENTPULSE_MODE or development.
    #[arg(short, long)]
    mode: Option<CliMode>,

    /// Backend base URL, overriding the mode's configured URL
    #[arg(long)]
    base_url: Option<String>,

    /// Query parameters the backend expects
    #[arg(long, default_value = "link")]
    shape: CliShape,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the raw result as JSON instead of the readable report
    #[arg(long)]
    json: bool,
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, AnalysisError> {
    let mode = match cli.mode {
        Some(mode) => mode.into(),
        None => Mode::from_env()?,
    };
    let config = match &cli.base_url {
        Some(url) => ClientConfig::new(url.clone(), mode)?,
        None => ClientConfig::for_mode(mode)?,
    };
    Ok(config
        .with_shape(cli.shape.into())
        .with_timeout(cli.timeout.map(Duration::from_secs)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    // Validate configuration early
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{}  {}\n",
        style("commentpulse").cyan().bold(),
        style("Comment Sentiment Analysis").dim()
    );
    println!(
        "{} {} {}",
        style("Backend:").dim(),
        style(config.base_url()).cyan(),
        style(format!("({})", config.mode())).dim()
    );

    let client = AnalysisClient::new(config)?;

    let mut session = Session::new();
    session.input = cli.video.clone();
    session.format = cli.format.into();
    session.select_sentiment(cli.sentiment.into());

    let start = Instant::now();
    let spinner = create_spinner("Running ETL pipeline...")?;
    if let Err(e) = session.submit(&client).await {
        spinner.finish_and_clear();
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    let elapsed = style(format!("[{}]", format_duration(start.elapsed()))).dim();
    let message = session.result_message().unwrap_or_default();

    let SubmissionState::Succeeded(result) = session.state() else {
        spinner.finish_with_message(format!("{} {} {}", style("✗").red().bold(), message, elapsed));
        std::process::exit(1);
    };
    spinner.finish_with_message(format!("{} {} {}", style("✓").green().bold(), message, elapsed));

    println!("{}", style("─".repeat(60)).dim());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let readable = format_result_readable(result, session.selected_sentiment());
        println!("{}", readable);
    }

    Ok(())
}
