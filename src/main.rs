use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use seo_keyword_analyzer::{
    AnalysisRequest, Config, HttpInferenceClient, KeywordReport, KeywordService, KeywordSession,
    OutputFormat, SessionState,
};

#[derive(Parser, Debug)]
#[command(
    name = "seo-analyzer",
    version,
    about = "Rank seed keywords for a video and score their associated terms"
)]
struct Cli {
    /// Video file to analyze
    #[arg(short = 'f', long, value_name = "FILE")]
    video: PathBuf,

    /// Seed keywords, comma separated
    #[arg(short, long, value_name = "KEYWORDS")]
    keywords: String,

    /// Base URL of the inference service
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.service.base_url = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.service.timeout_seconds = timeout;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

fn default_directives(level: &str, verbose: bool) -> String {
    if verbose {
        "seo_keyword_analyzer=debug,seo_analyzer=debug,info".to_string()
    } else {
        format!("seo_keyword_analyzer={level},seo_analyzer={level},warn")
    }
}

fn log_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level, verbose)))
}

/// Install the subscriber before configuration is read, at `info`; the
/// returned handle narrows it to the configured level afterwards.
fn init_logging(verbose: bool) -> LogFilterHandle {
    let (filter, handle) = reload::Layer::new(log_filter("info", verbose));

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose).with_writer(std::io::stderr))
        .init();

    handle
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_handle = init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    if let Err(e) = log_handle.reload(log_filter(&config.output.log_level, cli.verbose)) {
        warn!("Could not apply log level {}: {}", config.output.log_level, e);
    }
    config.validate()?;

    info!("🚀 SEO Keyword Analyzer starting...");
    info!("🎬 Video: {}", cli.video.display());
    info!("🌐 Service: {}", config.endpoint_url()?);

    let request = AnalysisRequest::prepare(&cli.video, &cli.keywords, &config.upload).await?;

    let client = HttpInferenceClient::new(&config.service)?;
    if !client.is_available().await {
        warn!("⚠️  Inference service did not answer its health check; trying anyway");
    }

    let mut session = KeywordSession::new();
    let start_time = std::time::Instant::now();

    match session.run(&client, &request).await? {
        SessionState::Success(result) => {
            let report = KeywordReport::from_result(result);
            match config.output.format {
                OutputFormat::Text => print!("{}", report.render_text()),
                OutputFormat::Json => println!("{}", report.render_json()?),
            }
            info!("🎉 Analysis completed in {:.2}s", start_time.elapsed().as_secs_f64());
            Ok(())
        }
        SessionState::Failure(failure) => {
            error!("Analysis failed after {:.2}s", start_time.elapsed().as_secs_f64());
            bail!("{}", failure.message)
        }
        other => bail!("Session ended in unexpected stage: {}", other.stage()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_use_configured_level() {
        assert_eq!(
            default_directives("trace", false),
            "seo_keyword_analyzer=trace,seo_analyzer=trace,warn"
        );
        assert_eq!(
            default_directives("error", true),
            "seo_keyword_analyzer=debug,seo_analyzer=debug,info"
        );
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "seo-analyzer",
            "-f",
            "launch.mp4",
            "-k",
            "seo, traffic",
            "--endpoint",
            "http://inference:9000",
            "--timeout",
            "30",
            "--format",
            "json",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.service.base_url, "http://inference:9000");
        assert_eq!(config.service.timeout_seconds, 30);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.log_level, "info");
    }
}
