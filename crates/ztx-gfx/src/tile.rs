use image::RgbaImage;
use ztx_rom::{RomError, RomSlice};

use crate::{
    color::Color,
    context::ExtractionContext,
    deinterleave::{DeinterleaveTable, N_PIXELS_IN_TILE, TILE_SIZE},
    error::GfxError,
};

/// Two 4-bit color indices per byte.
pub const TILE_BYTES: usize = N_PIXELS_IN_TILE / 2;

// -------------------------------------------------------------------------------------------------

pub fn tile_slice(offset: usize) -> RomSlice {
    RomSlice::new(offset, TILE_BYTES)
}

/// Splits every byte into its high and low nibble, in that order.
pub fn expand_nibbles(raw: &[u8]) -> impl Iterator<Item = u8> + '_ {
    raw.iter().flat_map(|&byte| [byte >> 4, byte & 0x0F])
}

/// Decodes the first 512 bytes of `raw` into 1024 colors in raster order (`y * 32 + x`).
pub fn decode(raw: &[u8], palette: &[Color], table: &DeinterleaveTable) -> Result<Vec<Color>, GfxError> {
    let raw = raw.get(..TILE_BYTES).ok_or(RomError::OutOfRange { slice: tile_slice(0), len: raw.len() })?;

    let raw_colors = expand_nibbles(raw)
        .enumerate()
        .map(|(pixel, index)| {
            palette.get(index as usize).copied().ok_or(GfxError::PaletteIndexInvalid {
                index,
                pixel,
                palette_len: palette.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(table.iter().map(|&source| raw_colors[source as usize]).collect())
}

pub fn decode_tile(ctx: &ExtractionContext, offset: usize) -> Result<Vec<Color>, GfxError> {
    ctx.rom()
        .slice(tile_slice(offset))
        .map_err(GfxError::from)
        .and_then(|raw| decode(raw, ctx.palette(), ctx.table()))
        .map_err(GfxError::tile(offset))
}

/// A single 32x32 tile. Pixels are written as decoded, without blending over a backdrop.
pub fn render_tile(ctx: &ExtractionContext, offset: usize) -> Result<RgbaImage, GfxError> {
    let colors = decode_tile(ctx, offset)?;
    let size = TILE_SIZE as u32;
    Ok(RgbaImage::from_fn(size, size, |x, y| colors[(y * size + x) as usize]))
}

// -------------------------------------------------------------------------------------------------
