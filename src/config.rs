use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use ztx_gfx::{grid::DEFAULT_GRID_COLUMNS, meta_tile::WALL_TEXTURE_BASE};

use crate::jobs::{MetaTileBatchJob, TextureBatchJob};

// -------------------------------------------------------------------------------------------------

pub const DEFAULT_ROM_PATH: &str = "Zero Tolerance (USA, Europe).md";
pub const DEFAULT_PALETTE_PATH: &str = "palette.png";
pub const DEFAULT_TEXTURE_META_PATH: &str = "texture_meta.json";
pub const DEFAULT_OUTPUT_DIR: &str = "textures";

pub const SAMPLE_TEXTURE_OFFSET: usize = 0x10E9BE;
pub const WALL_TEXTURE_COUNT: usize = 255;
pub const SAMPLE_META_TEXTURE_OFFSET: usize = 0x15A52A;
pub const META_TEXTURE_BATCH_OFFSETS: [usize; 3] = [0x15A10A, 0x160424, 0x16602C];
pub const META_TEXTURE_BATCH_COUNT: usize = 256;

// -------------------------------------------------------------------------------------------------

/// What to extract and where from. Every field can be left out of the JSON file.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    pub rom_path:                   PathBuf,
    pub palette_path:               PathBuf,
    pub texture_meta_path:          PathBuf,
    pub output_dir:                 PathBuf,
    pub grid_columns:               usize,
    pub sample_texture_offset:      usize,
    pub wall_texture_batch:         TextureBatchJob,
    pub sample_meta_texture_offset: usize,
    pub meta_texture_batches:       Vec<MetaTileBatchJob>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rom_path:                   DEFAULT_ROM_PATH.into(),
            palette_path:               DEFAULT_PALETTE_PATH.into(),
            texture_meta_path:          DEFAULT_TEXTURE_META_PATH.into(),
            output_dir:                 DEFAULT_OUTPUT_DIR.into(),
            grid_columns:               DEFAULT_GRID_COLUMNS,
            sample_texture_offset:      SAMPLE_TEXTURE_OFFSET,
            wall_texture_batch:         TextureBatchJob::new(WALL_TEXTURE_BASE, WALL_TEXTURE_COUNT),
            sample_meta_texture_offset: SAMPLE_META_TEXTURE_OFFSET,
            meta_texture_batches:       META_TEXTURE_BATCH_OFFSETS
                .iter()
                .map(|&offset| MetaTileBatchJob::new(offset, META_TEXTURE_BATCH_COUNT))
                .collect(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Reading configuration from file: {}", path.display());
        let json = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
        let config = serde_json::from_str(&json).with_context(|| format!("Could not parse {}", path.display()))?;
        Ok(config)
    }
}

// -------------------------------------------------------------------------------------------------
