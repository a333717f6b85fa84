use clap::{Parser, Subcommand};
use landsense_classifiers::SampleKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "landsense-demo")]
#[command(
    author,
    version,
    about = "Land-cover classification of satellite image tiles"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one image file
    Classify {
        /// Image to classify (PNG, JPEG, GIF, BMP, TIFF or WebP)
        image: PathBuf,

        /// Config file path
        #[arg(short, long, env = "LANDSENSE_CONFIG")]
        config: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a synthetic sample image
    Sample {
        /// Landscape kind: forest, farm, city or water
        #[arg(value_parser = parse_kind)]
        kind: SampleKind,

        /// Output PNG path
        out: PathBuf,

        /// Seed for the texture speckles
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start the HTTP API server
    Serve {
        /// Listen port (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen address (overrides the config file)
        #[arg(short, long)]
        address: Option<String>,

        /// Config file path
        #[arg(short, long, env = "LANDSENSE_CONFIG")]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

fn parse_kind(s: &str) -> Result<SampleKind, String> {
    s.parse().map_err(|e: landsense_core::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from(["landsense-demo", "classify", "tile.png", "--json"]).unwrap();
        match cli.command {
            Commands::Classify { image, json, config, .. } => {
                assert_eq!(image, PathBuf::from("tile.png"));
                assert!(json);
                assert!(config.is_none() || std::env::var("LANDSENSE_CONFIG").is_ok());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sample() {
        let cli = Cli::try_parse_from(["landsense-demo", "sample", "water", "out.png"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sample { kind: SampleKind::Water, .. }
        ));

        assert!(Cli::try_parse_from(["landsense-demo", "sample", "desert", "out.png"]).is_err());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["landsense-demo", "serve", "--port", "8081"]).unwrap();
        match cli.command {
            Commands::Serve { port, address, .. } => {
                assert_eq!(port, Some(8081));
                assert!(address.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
