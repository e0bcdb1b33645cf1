use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use splitsheet::cli::{CliArgs, Command, CompressionLevel, ExportArgs, LayoutArgs, PaletteArgs};
use splitsheet::config::{LoadedConfig, SheetConfig, save_config};
use splitsheet::export::layout_json;
use splitsheet::geometry::Grid;
use splitsheet::registry::ZoneRegistry;
use splitsheet::session::Session;
use splitsheet::source::is_supported_image;
use splitsheet::zone::{PALETTE_SIZE, make_palette, to_hex};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match cli.command {
        Command::Export(args) => export(&args),
        Command::Layout(args) => layout(&args),
        Command::Palette(args) => palette(&args),
        Command::Init { path } => {
            save_config(&SheetConfig::default(), &path)?;
            init_logging(false);
            info!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn export(args: &ExportArgs) -> Result<()> {
    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(args)?;

    init_logging(args.verbose);

    info!("Splitsheet v{}", env!("CARGO_PKG_VERSION"));

    // Create output directory if it doesn't exist
    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    if !is_supported_image(&args.image) {
        warn!(
            "{} does not have a known image extension; trying anyway",
            args.image.display()
        );
    }

    let mut session = Session::new()
        .palette_size(merged.palette_size)
        .zone_defaults(merged.zone_defaults)
        .compress(merged.compress);

    session.open_image(&args.image)?;

    for spec in &args.zones {
        let params = spec.clone().into_params();
        session
            .add_zone(&params.name)
            .with_context(|| format!("failed to add zone '{}'", params.name))?;
        session.apply_zone_changes(params)?;
    }
    info!("Defined {} zones", session.zones().len());

    if let Some(background) = &merged.background {
        session.set_background_text(background.as_str());
        if session.background().is_none() {
            warn!(
                "Ignoring background '{}': expected #RRGGBB; keying disabled",
                background
            );
        }
    }

    session.set_sheet_name(merged.name);
    let summary = session.export(&merged.output)?;

    info!(
        "Wrote {} frames to {} ({} outside the image)",
        summary.entries.len(),
        summary.path.display(),
        summary.skipped
    );
    info!("Done!");

    Ok(())
}

#[allow(clippy::print_stdout)]
fn layout(args: &LayoutArgs) -> Result<()> {
    let mut registry = ZoneRegistry::new();
    for spec in &args.zones {
        let params = spec.clone().into_params();
        registry.add(&params.name, params.grid)?;
    }

    let json = layout_json(registry.zones(), args.name.as_deref(), args.pretty)
        .context("failed to serialize layout")?;
    println!("{}", json);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn palette(args: &PaletteArgs) -> Result<()> {
    for color in make_palette(args.count.unwrap_or(PALETTE_SIZE)) {
        println!("{} hue={}", to_hex(color.to_rgb()), color.hue);
    }
    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    output: PathBuf,
    name: String,
    background: Option<String>,
    compress: Option<CompressionLevel>,
    palette_size: usize,
    zone_defaults: Grid,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &ExportArgs) -> Result<MergedConfig> {
    // Load config if specified
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    // Determine name: CLI > config > image file stem
    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| {
                args.image
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
    });

    let background = args.background.clone().or_else(|| {
        loaded_config
            .as_ref()
            .and_then(|lc| lc.config.background.clone())
    });

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else {
        loaded_config
            .as_ref()
            .and_then(|lc| lc.config.compress.as_ref().map(|c| c.level()))
    };

    let (palette_size, zone_defaults) = match &loaded_config {
        Some(lc) => (lc.config.palette_size, lc.config.zone_defaults.grid()),
        None => (PALETTE_SIZE, Grid::default()),
    };

    Ok(MergedConfig {
        output,
        name,
        background,
        compress,
        palette_size,
        zone_defaults,
    })
}
