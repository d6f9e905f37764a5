//! Waterseg CLI - Water body segmentation service
//!
//! # Commands
//!
//! ```bash
//! waterseg serve                          # Start HTTP server (port 8000)
//! waterseg serve --static-dir dist        # ...and host the upload widget
//! waterseg segment lake.png               # Segment one local image
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use waterseg::{
    start_server, validate_upload, RemoteSegmenter, Segmenter, Settings, UploadedImage,
    DEFAULT_PORT,
};

#[derive(Parser)]
#[command(name = "waterseg")]
#[command(about = "Upload images and get water body segmentations back", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory with the built upload widget
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Segment a local image through the model service
    Segment {
        /// Input image (jpg, jpeg, png, tiff)
        input: PathBuf,

        /// Output file (default: segmented_<name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, static_dir } => cmd_serve(port, static_dir).await,
        Commands::Segment { input, output } => cmd_segment(&input, output.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(port: u16, static_dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    start_server(settings, port, static_dir).await
}

async fn cmd_segment(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid input path: {}", input.display()))?
        .to_string();

    let bytes = tokio::fs::read(input).await?;
    let format = validate_upload(Some(&file_name), bytes.len() as u64)?;

    eprintln!("📤 Segmenting {} ({} bytes)", file_name, bytes.len());

    let segmenter = RemoteSegmenter::from_settings(&settings);
    let segmented = segmenter
        .segment(UploadedImage {
            file_name: file_name.clone(),
            format,
            bytes,
        })
        .await?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_file_name(format!("segmented_{}", file_name)));
    tokio::fs::write(&output, &segmented).await?;

    eprintln!("💾 Saved to: {}", output.display());
    Ok(())
}
