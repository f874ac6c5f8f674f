use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use seo_analyzer::{
    AnalysisRequest, Analyzer, AnalyzerConfig, ChromiumRenderer, ErrorResponse, HttpRenderer,
    PageRenderer,
};
use seo_storage::SeoStorage;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RendererKind {
    /// Headless Chromium, runs page scripts
    Chromium,
    /// Plain HTTP fetch, no script execution
    Http,
}

/// Analyze one page and print its SEO report as JSON
#[derive(Parser, Debug)]
#[command(name = "seo-audit", version, about, long_about = None)]
struct Args {
    /// Absolute http(s) URL to analyze
    url: String,

    /// JSON config file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RendererKind::Chromium)]
    renderer: RendererKind,

    /// Navigation timeout in seconds, overrides the config file
    #[arg(long)]
    timeout_secs: Option<u32>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish()
        .try_init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match AnalyzerConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not load config");
                return ExitCode::from(2);
            }
        },
        None => AnalyzerConfig::default(),
    };
    if let Some(timeout_secs) = args.timeout_secs {
        config.fetch.navigation_timeout_secs = timeout_secs;
    }

    match args.renderer {
        RendererKind::Chromium => {
            let renderer = ChromiumRenderer::new(&config.fetch);
            run(renderer, config, &args).await
        }
        RendererKind::Http => {
            let renderer = HttpRenderer::new(&config.fetch);
            run(renderer, config, &args).await
        }
    }
}

async fn run<R: PageRenderer>(renderer: R, config: AnalyzerConfig, args: &Args) -> ExitCode {
    let analyzer = Analyzer::new(renderer, SeoStorage::new(), config);

    match analyzer.analyze(&AnalysisRequest::new(args.url.clone())).await {
        Ok(outcome) => print_json(&outcome.report, args.compact),
        Err(e) => {
            let response: ErrorResponse = e.to_response();
            print_json(&response, args.compact);
            if response.status == 400 {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> ExitCode {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "could not serialize output");
            ExitCode::FAILURE
        }
    }
}
