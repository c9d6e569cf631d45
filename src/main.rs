//! imgview-ocr - Image viewer with OCR and selectable area
//!
//! Browse a folder of images, drag a rectangle over one to read its text
//! with Tesseract, and turn recognized dates into `yyyymmdd`.

mod analysis;
mod config;
mod display;
mod error;
mod raster;
mod shared;
mod storage;
mod viewer;
mod vision;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::display::Region;
use crate::raster::RasterImage;
use crate::shared::Session;
use crate::vision::{OcrWorker, TesseractOcr, TextBuffer};

/// Image viewer with OCR and selectable area
#[derive(Parser, Debug)]
#[command(name = "imgview-ocr", version)]
#[command(about = "Image viewer with OCR over a selectable area")]
struct Args {
    /// Configuration file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Open this image folder at startup
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the date-normalized form of TEXT and exit
    #[arg(long, value_name = "TEXT")]
    normalize: Option<String>,

    /// List the images of the folder and exit
    #[arg(long)]
    list_images: bool,

    /// Print the text Tesseract reads in IMAGE and exit
    #[arg(long, value_name = "IMAGE")]
    ocr: Option<PathBuf>,

    /// Limit --ocr to this pixel region, written WxH+X+Y
    #[arg(long, value_name = "GEOMETRY", requires = "ocr")]
    region: Option<Region>,
}

/// Recognize text in one image file without opening the viewer
fn ocr_file(session: &Session, path: &Path, region: Option<Region>) -> Result<String> {
    let image = RasterImage::open(path)?;
    let region = region.unwrap_or_else(|| Region::new(0, 0, image.width(), image.height()));

    let engine = Arc::new(TesseractOcr::from_settings(&session.config.ocr));
    let mut worker = OcrWorker::new(engine, session.config.ocr.timeout());
    let mut buffer = TextBuffer::new();

    vision::extract_text(Some(&image), Some(region), &mut worker, &mut buffer)
        .with_context(|| format!("OCR of {} failed", path.display()))?;
    Ok(buffer.as_str().to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = match args.config {
        Some(path) => path,
        None => storage::default_config_path()?,
    };
    let config = storage::load_or_default(&config_path);
    let mut session = Session::new(config, Some(config_path));

    if let Some(folder) = args.folder {
        session
            .set_folder(folder.clone())
            .with_context(|| format!("Cannot open image folder {}", folder.display()))?;
    }

    if let Some(text) = args.normalize {
        println!("{}", session.normalizer().normalize(&text));
        return Ok(());
    }

    if let Some(path) = args.ocr {
        print!("{}", ocr_file(&session, &path, args.region)?);
        return Ok(());
    }

    if args.list_images {
        match &session.folder {
            Some(folder) => {
                println!("Images in {}:", folder.display());
                for name in &session.images {
                    println!("  {}", name);
                }
            }
            None => println!("No image folder selected"),
        }
        return Ok(());
    }

    info!("imgview-ocr starting...");
    viewer::run_viewer(session).map_err(|e| anyhow::anyhow!("Viewer error: {}", e))?;
    info!("imgview-ocr shutdown complete");

    Ok(())
}
