// makechr - Main Entry Point
//
// Reads a pixel art image, works out its background palettes and prints the
// palette in text form. Optionally writes palette data and diagnostic views.

use clap::Parser;
use env_logger::Env;
use makechr::config::CONFIG_FILE;
use makechr::{
    collect_errors, collect_needs, load_png, parse_palette, render_colorization_view,
    render_error_view, render_grid_view, save_palette_view, save_png, MakechrConfig, Palette,
};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "makechr")]
#[command(about = "Make NES palettes and graphics data from pixel art")]
struct Cli {
    /// Pixel art image (PNG)
    input: PathBuf,

    /// Palette to use instead of guessing one, e.g. P/0f-00-10-30/
    #[arg(short = 'p', long)]
    palette: Option<String>,

    /// Write the 16 bytes of palette data to this file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write an image outlining the blocks that fail validation (PNG)
    #[arg(short = 'e', long)]
    error_view: Option<PathBuf>,

    /// Write a palette view image (PNG)
    #[arg(long)]
    palette_view: Option<PathBuf>,

    /// Write an image showing the palette chosen for each block (PNG)
    #[arg(long)]
    colorization_view: Option<PathBuf>,

    /// Write the image with its tile and block grid (PNG)
    #[arg(long)]
    grid_view: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Maximum RGB distance to the nearest hardware color
    #[arg(long)]
    tolerance: Option<u32>,

    /// Maximum merge strategies to examine (0 = unlimited)
    #[arg(long)]
    search_budget: Option<u64>,

    /// Log progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = run(cli) {
        eprintln!("makechr: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = MakechrConfig::load_or_default(&cli.config)?;
    if let Some(tolerance) = cli.tolerance {
        config.classifier.tolerance = tolerance;
    }
    if cli.search_budget.is_some() {
        config.engine.search_budget = cli.search_budget;
    }

    let image =
        load_png(&cli.input).map_err(|e| format!("{}: {}", cli.input.display(), e))?;
    log::info!(
        "Loaded {} ({}x{})",
        cli.input.display(),
        image.width(),
        image.height()
    );

    let scale = config.output.view_scale;
    if let Some(path) = &cli.grid_view {
        save_png(path, &render_grid_view(&image, scale))?;
        log::info!("Wrote grid view to {}", path.display());
    }

    let mut classifier = config.classifier.build();
    let manifest = match collect_needs(&image, &mut classifier) {
        Ok(manifest) => manifest,
        Err(e) => {
            if let Some(path) = &cli.error_view {
                let errors = collect_errors(&image, &mut classifier);
                save_png(path, &render_error_view(&image, &errors, scale))?;
                log::info!(
                    "Wrote error view with {} failing blocks to {}",
                    errors.len(),
                    path.display()
                );
            }
            return Err(e.into());
        }
    };

    let palette: Palette = match cli.palette.as_deref() {
        Some(text) => parse_palette(text)?,
        None => config.engine.build()?.make_palette(&manifest)?,
    };

    // Every block must land in some row, also for user-supplied palettes
    let assignment = palette.assign(&manifest)?;
    log::info!(
        "{} blocks assigned to {} palettes",
        assignment.len(),
        palette.len()
    );

    println!("{}", palette);

    if let Some(path) = &cli.output {
        fs::write(path, palette.to_bytes())?;
        log::info!("Wrote palette data to {}", path.display());
    }
    if let Some(path) = &cli.palette_view {
        save_palette_view(&palette, config.output.palette_view_scale, path)?;
    }
    if let Some(path) = &cli.colorization_view {
        let view = render_colorization_view(&image, &palette, &manifest, &assignment, scale);
        save_png(path, &view)?;
        log::info!("Wrote colorization view to {}", path.display());
    }

    Ok(())
}
