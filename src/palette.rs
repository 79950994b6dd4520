use std::path::Path;

use anyhow::Context;
use ztx_gfx::Palette;

/// Reads a palette from the first row of an image, left to right.
pub fn load_palette<P: AsRef<Path>>(path: P) -> anyhow::Result<Palette> {
    let path = path.as_ref();
    log::info!("Reading palette from file: {}", path.display());
    let image = image::open(path).with_context(|| format!("Could not read {}", path.display()))?.to_rgba8();
    let colors = if image.height() > 0 {
        (0..image.width()).map(|x| *image.get_pixel(x, 0)).collect()
    } else {
        Vec::new()
    };
    let palette = Palette::new(colors).with_context(|| format!("Invalid palette in {}", path.display()))?;
    log::info!("Read {} colors", palette.len());
    Ok(palette)
}

// -------------------------------------------------------------------------------------------------
