use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use zt_texture_extractor::{
    artifact::{ArtifactKind, PngDirectory},
    config::ExtractorConfig,
    extractor::Extractor,
    jobs::load_texture_jobs,
    palette::load_palette,
};
use ztx_gfx::ExtractionContext;
use ztx_rom::Rom;

const LOG_CONFIG_PATH: &str = "log4rs.yaml";

/// Extracts wall and object textures from a Zero Tolerance ROM image into PNG files.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file. Built-in defaults are used for anything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ROM image to extract from.
    #[arg(long, env = "ROM_PATH")]
    rom: Option<PathBuf>,

    /// Image whose first row holds the palette.
    #[arg(long, env = "PALETTE_PATH")]
    palette: Option<PathBuf>,

    /// JSON array of [offset, count] texture batches.
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Directory the PNG files are written to.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extract only one kind of artifact.
    #[arg(long, value_enum)]
    only: Option<ArtifactKind>,

    /// Log level used when there is no log4rs.yaml in the working directory.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    if Path::new(LOG_CONFIG_PATH).is_file() {
        return log4rs::init_file(LOG_CONFIG_PATH, Default::default()).context("Failed to initialize log4rs");
    }
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<ExtractorConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(rom) = &args.rom {
        config.rom_path = rom.clone();
    }
    if let Some(palette) = &args.palette {
        config.palette_path = palette.clone();
    }
    if let Some(jobs) = &args.jobs {
        config.texture_meta_path = jobs.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level)?;
    let config = load_config(&args)?;

    let rom = Rom::from_file(&config.rom_path).context("Error loading ROM")?;
    let palette = load_palette(&config.palette_path).context("Error loading palette")?;
    let ctx = ExtractionContext::new(rom, palette);

    let texture_jobs = match args.only {
        None | Some(ArtifactKind::Textures) => load_texture_jobs(&config.texture_meta_path)?,
        Some(_) => Vec::new(),
    };

    let sink = PngDirectory::create(&config.output_dir)?;
    let (report, _) =
        Extractor::new(&ctx, sink, config.grid_columns).only(args.only).run_all(&config, &texture_jobs);

    log::info!("Wrote {} of {} artifacts to {}", report.written.len(), report.total(), config.output_dir.display());
    report.into_result()?;
    Ok(())
}
