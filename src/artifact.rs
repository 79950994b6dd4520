use std::{
    fmt,
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::ValueEnum;
use image::{ImageFormat, RgbaImage};

// -------------------------------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, ValueEnum)]
pub enum ArtifactKind {
    /// A single tile
    Texture,
    /// A grid of consecutive tiles
    Textures,
    /// A single meta-tile
    MetaTexture,
    /// A grid of consecutive meta-tiles
    MetaTextures,
}

pub trait ArtifactSink {
    fn write(&mut self, name: &str, image: &RgbaImage) -> anyhow::Result<()>;
}

/// Writes every artifact as `<name>.png` into one directory.
#[derive(Debug)]
pub struct PngDirectory {
    dir: PathBuf,
}

/// Keeps artifacts in memory, in the order they were written.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<(String, RgbaImage)>,
}

// -------------------------------------------------------------------------------------------------

impl ArtifactKind {
    pub fn file_stem(self, offset: usize) -> String {
        use ArtifactKind::*;
        match self {
            Texture => format!("texture_{offset:08X}"),
            Textures => format!("textures_0x{offset:08X}"),
            MetaTexture => format!("metatexture_0x{offset:08X}"),
            MetaTextures => format!("metatextures_0x{offset:08X}"),
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use ArtifactKind::*;
        f.write_str(match self {
            Texture => "texture",
            Textures => "texture batch",
            MetaTexture => "meta-texture",
            MetaTextures => "meta-texture batch",
        })
    }
}

impl PngDirectory {
    /// Creates the directory if it does not exist yet.
    pub fn create<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            log::info!("Creating output directory: {}", dir.display());
            fs::create_dir_all(&dir).with_context(|| format!("Could not create {}", dir.display()))?;
        }
        Ok(Self { dir })
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.png"))
    }
}

impl ArtifactSink for PngDirectory {
    fn write(&mut self, name: &str, image: &RgbaImage) -> anyhow::Result<()> {
        let path = self.path_of(name);
        image
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Could not write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.artifacts.iter().find(|(n, _)| n == name).map(|(_, image)| image)
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, image: &RgbaImage) -> anyhow::Result<()> {
        self.artifacts.push((name.to_string(), image.clone()));
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
