use anyhow::Context;
use clap::Parser;
use landsense_classifiers::sample;
use landsense_classifiers::{LandCoverClassifier, OnnxModelLoader};
use landsense_core::ClassificationResult;
use landsense_demo::cli::{Cli, Commands};
use landsense_demo::models::DemoConfig;
use landsense_demo::server::run_server;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            image,
            config,
            json,
            verbose,
        } => {
            init_logging(verbose);

            let config = DemoConfig::load(config.as_deref())?;
            let classifier = config.classifier.build_classifier();

            let loader = OnnxModelLoader::new();
            if let Err(e) = classifier
                .initialize(&loader, &config.classifier.to_model_source())
                .await
            {
                tracing::warn!("Model unavailable ({}), running in demo mode", e);
            }

            let result = classify_file(&classifier, &image).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&image, &result);
            }
        }

        Commands::Sample { kind, out, seed } => {
            let png = match seed {
                Some(seed) => sample::render_png(kind, &mut StdRng::seed_from_u64(seed))?,
                None => sample::render_png(kind, &mut rand::thread_rng())?,
            };
            std::fs::write(&out, png)
                .with_context(|| format!("failed to write {}", out.display()))?;

            println!("Wrote {} sample to {}", kind, out.display());
        }

        Commands::Serve {
            port,
            address,
            config,
            verbose,
        } => {
            init_logging(verbose);

            let mut config = DemoConfig::load(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(address) = address {
                config.server.address = address;
            }

            let addr: SocketAddr =
                format!("{}:{}", config.server.address, config.server.port).parse()?;

            println!();
            println!("  LandSense land-cover classification");
            println!();
            println!("  Model:    {}", config.classifier.to_model_source());
            println!("  Manifest: {}", config.classifier.manifest.display());
            println!();
            println!("  POST image bytes to http://{}/api/classify", addr);
            println!();

            run_server(config, addr).await?;
        }
    }

    Ok(())
}

async fn classify_file(
    classifier: &LandCoverClassifier,
    path: &Path,
) -> anyhow::Result<ClassificationResult> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    classifier
        .classify(&bytes)
        .await
        .with_context(|| format!("failed to classify {}", path.display()))
}

fn print_result(path: &Path, result: &ClassificationResult) {
    println!("{}", path.display());
    for (rank, prediction) in result.predictions.iter().enumerate() {
        println!(
            "  {:>2}. {:<22} {:>6.2}%",
            rank + 1,
            prediction.label,
            prediction.confidence * 100.0
        );
    }
    println!("  processed in {}ms", result.processing_time_ms);

    if !result.used_real_model {
        println!();
        println!("  Demo mode: model not available, showing sample predictions");
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "landsense_demo=debug,landsense_classifiers=debug,tower_http=debug"
    } else {
        "landsense_demo=info,landsense_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
