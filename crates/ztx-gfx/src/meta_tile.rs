use image::{imageops, RgbaImage};
use nom::{combinator::map, multi::count as count_of, number::complete::be_u16};
use rayon::prelude::*;
use ztx_rom::{Rom, RomSlice};

use crate::{
    color::paste_masked,
    context::ExtractionContext,
    deinterleave::TILE_SIZE,
    error::GfxError,
    grid::GridLayout,
    tile::{render_tile, tile_slice},
};

/// Start of the wall tiles that meta-tile indices refer to.
pub const WALL_TEXTURE_BASE: usize = 0x12EF26;

pub const N_SUB_TILES: usize = 8;
/// One big-endian word per sub-tile.
pub const META_TILE_BYTES: usize = 2 * N_SUB_TILES;

pub const META_TILE_WIDTH: u32 = 4 * TILE_SIZE as u32;
pub const META_TILE_HEIGHT: u32 = 2 * TILE_SIZE as u32;

// -------------------------------------------------------------------------------------------------

pub fn meta_tile_slice(offset: usize) -> RomSlice {
    RomSlice::new(offset, META_TILE_BYTES)
}

/// Reads the wall tile index of every sub-tile.
///
/// Indices are stored as big-endian words, but only their low byte is used.
pub fn read_sub_tile_indices(rom: &Rom, offset: usize) -> Result<Vec<u8>, GfxError> {
    let index = map(be_u16, |word| (word & 0xFF) as u8);
    Ok(rom.parse(meta_tile_slice(offset), count_of(index, N_SUB_TILES))?)
}

pub fn sub_tile_offset(index: u8) -> usize {
    tile_slice(WALL_TEXTURE_BASE).skip_forward(index as usize).begin
}

/// Sub-tiles fill the meta-tile column by column, two per column.
pub fn sub_tile_origin(sub_index: usize) -> (u32, u32) {
    let size = TILE_SIZE as u32;
    ((sub_index / 2) as u32 * size, (sub_index % 2) as u32 * size)
}

fn draw_meta_tile(ctx: &ExtractionContext, offset: usize, canvas: &mut RgbaImage) -> Result<(), GfxError> {
    let indices = read_sub_tile_indices(ctx.rom(), offset)?;
    for (sub_index, index) in indices.into_iter().enumerate() {
        let tile = render_tile(ctx, sub_tile_offset(index))
            .map_err(|e| GfxError::SubTile { sub_index, index, cause: Box::new(e) })?;
        let (x, y) = sub_tile_origin(sub_index);
        paste_masked(canvas, &tile, x, y);
    }
    Ok(())
}

/// A 128x64 image of the 8 wall tiles listed at `offset`, over the palette backdrop.
pub fn decode_meta_tile(ctx: &ExtractionContext, offset: usize) -> Result<RgbaImage, GfxError> {
    let mut canvas = ctx.palette().canvas(META_TILE_WIDTH, META_TILE_HEIGHT);
    draw_meta_tile(ctx, offset, &mut canvas).map_err(GfxError::meta_tile(offset))?;
    Ok(canvas)
}

/// Lays out `count` consecutive meta-tiles starting at `offset`.
pub fn compose_meta_tiles(
    ctx: &ExtractionContext, offset: usize, count: usize, max_columns: usize,
) -> Result<RgbaImage, GfxError> {
    log::debug!("Composing {count} meta-textures from ${offset:06X}");
    let meta_tiles = (0..count)
        .into_par_iter()
        .map(|m| decode_meta_tile(ctx, meta_tile_slice(offset).skip_forward(m).begin))
        .collect::<Result<Vec<_>, _>>()?;

    let layout = GridLayout::for_batch(offset, count, max_columns, META_TILE_WIDTH, META_TILE_HEIGHT)?;
    // Every cell already holds its own backdrop
    let mut canvas = layout.canvas(ctx);
    for (m, meta_tile) in meta_tiles.iter().enumerate() {
        let (x, y) = layout.cell_origin(m);
        imageops::replace(&mut canvas, meta_tile, x as i64, y as i64);
    }
    Ok(canvas)
}

// -------------------------------------------------------------------------------------------------
