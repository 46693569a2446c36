use anyhow::Context;
use bridge::server::AnalyzerBridge;
use clap::{Parser, ValueEnum};
use classify::{GeminiClassifier, UnconfiguredClassifier};
use generator::synthetic::SyntheticClassifier;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use vibecore::export::ExportFormat;
use vibecore::prelude::Classifier;
use vibecore::session::SessionController;
use workflow::config::AnalyzerConfig;
use workflow::runner::{load_input, Runner};

mod bridge;
mod classify;
mod generator;
mod workflow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportSelection {
    Json,
    Csv,
    Both,
    None,
}

impl ExportSelection {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            ExportSelection::Json => vec![ExportFormat::Json],
            ExportSelection::Csv => vec![ExportFormat::Csv],
            ExportSelection::Both => vec![ExportFormat::Json, ExportFormat::Csv],
            ExportSelection::None => Vec::new(),
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "VibeAnalytics sentiment analyzer and dashboard bridge")]
struct Args {
    /// Load analyzer settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Analyze a .txt or .md file once and print the summary
    #[arg(long)]
    input: Option<PathBuf>,
    /// Export formats written after a one-shot analysis
    #[arg(long, value_enum, default_value_t = ExportSelection::Both)]
    format: ExportSelection,
    #[arg(long)]
    export_dir: Option<PathBuf>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    bind: Option<String>,
    /// Use the offline synthetic classifier instead of the remote service
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the HTTP bridge alive for the dashboard
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.config.as_ref() {
        AnalyzerConfig::load(path)?
    } else {
        AnalyzerConfig::default()
    };
    if let Some(model) = args.model.clone() {
        config.model = model;
    }
    if let Some(bind) = args.bind.clone() {
        config.bind = bind;
    }
    if let Some(dir) = args.export_dir.clone() {
        config.export_dir = dir;
    }

    let (classifier, controller) = build_classifier(&config, &args);
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating analyzer runtime")?;

    let bridge = if args.serve {
        let addr = config.bind_address()?;
        Some(AnalyzerBridge::start(controller, classifier.clone(), addr))
    } else {
        None
    };

    if let Some(path) = args.input.as_ref() {
        let text = load_input(path)?;
        let runner = Runner::new(classifier.clone());
        let report = runtime.block_on(runner.analyze(&text))?;
        let summary = &report.summary;

        println!(
            "Analyzed {} sentences -> positive {:.1}% | negative {:.1}% | neutral {:.1}% | avg confidence {:.1}%",
            summary.total_analyzed,
            summary.positive_percentage,
            summary.negative_percentage,
            summary.neutral_percentage,
            summary.avg_confidence
        );
        for (point, result) in summary.recent_scores.iter().zip(&report.results) {
            println!(
                "  {:<8} {:<8} {:>5.1}%  {}",
                point.label, result.sentiment, point.confidence, result.text
            );
        }

        let written =
            runner.write_exports(&report.results, &args.format.formats(), &config.export_dir)?;
        for path in written {
            info!("wrote {}", path.display());
        }

        if let Some(bridge) = bridge.as_ref() {
            runtime.block_on(bridge.publish(report.results));
            bridge.publish_status("One-shot results ready.");
        }
    }

    if let Some(bridge) = bridge.as_ref() {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

/// Picks the classifier and the initial session. A missing credential puts the
/// session into the configuration-required state instead of failing startup.
fn build_classifier(
    config: &AnalyzerConfig,
    args: &Args,
) -> (Arc<dyn Classifier>, SessionController) {
    if args.synthetic {
        info!("using synthetic classifier (seed {})", args.seed);
        return (
            Arc::new(SyntheticClassifier::new(args.seed)),
            SessionController::new(),
        );
    }

    match GeminiClassifier::from_config(config) {
        Ok(classifier) => {
            info!("using {} via Gemini", config.model);
            (Arc::new(classifier), SessionController::new())
        }
        Err(err) => {
            let message = err.user_message();
            warn!("{}", message);
            (
                Arc::new(UnconfiguredClassifier::new(message.clone())),
                SessionController::configuration_required(message),
            )
        }
    }
}
