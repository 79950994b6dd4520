use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    color::paste_masked,
    context::ExtractionContext,
    deinterleave::TILE_SIZE,
    error::GfxError,
    tile::{render_tile, tile_slice},
};

/// Maximum number of cells in a row of a composed batch.
pub const DEFAULT_GRID_COLUMNS: usize = 16;

// -------------------------------------------------------------------------------------------------

/// Row-major placement of `count` equally sized cells.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GridLayout {
    pub columns:     u32,
    pub rows:        u32,
    pub cell_width:  u32,
    pub cell_height: u32,
}

impl GridLayout {
    /// Returns `None` for an empty batch, or when the canvas would not fit in `u32` pixels.
    pub fn new(count: usize, max_columns: usize, cell_width: u32, cell_height: u32) -> Option<Self> {
        let columns = count.min(max_columns.max(1));
        if columns == 0 {
            return None;
        }
        let rows = count / columns + usize::from(count % columns != 0);

        let columns = u32::try_from(columns).ok()?;
        let rows = u32::try_from(rows).ok()?;
        cell_width.checked_mul(columns)?;
        cell_height.checked_mul(rows)?;
        Some(Self { columns, rows, cell_width, cell_height })
    }

    pub(crate) fn for_batch(
        offset: usize, count: usize, max_columns: usize, cell_width: u32, cell_height: u32,
    ) -> Result<Self, GfxError> {
        Self::new(count, max_columns, cell_width, cell_height).ok_or(if count == 0 {
            GfxError::EmptyBatch { offset }
        } else {
            GfxError::GridTooLarge { offset, count }
        })
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.cell_width * self.columns, self.cell_height * self.rows)
    }

    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        let (column, row) = ((index % columns) as u32, (index / columns) as u32);
        (column * self.cell_width, row * self.cell_height)
    }

    pub fn canvas(&self, ctx: &ExtractionContext) -> RgbaImage {
        let (width, height) = self.canvas_size();
        ctx.palette().canvas(width, height)
    }
}

// -------------------------------------------------------------------------------------------------

/// Lays out `count` consecutive tiles starting at `offset`.
///
/// Tiles are decoded in parallel and pasted in index order. If any tile is out of range, no
/// image is produced. Decoding comes first, so a count reaching past the ROM fails with
/// `OutOfRange` before the layout is sized.
pub fn compose_textures(
    ctx: &ExtractionContext, offset: usize, count: usize, max_columns: usize,
) -> Result<RgbaImage, GfxError> {
    log::debug!("Composing {count} textures from ${offset:06X}");
    let tiles = (0..count)
        .into_par_iter()
        .map(|k| render_tile(ctx, tile_slice(offset).skip_forward(k).begin))
        .collect::<Result<Vec<_>, _>>()?;

    let layout = GridLayout::for_batch(offset, count, max_columns, TILE_SIZE as u32, TILE_SIZE as u32)?;
    let mut canvas = layout.canvas(ctx);
    for (k, tile) in tiles.iter().enumerate() {
        let (x, y) = layout.cell_origin(k);
        paste_masked(&mut canvas, tile, x, y);
    }
    Ok(canvas)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::tile::{
        tests::{counting_tile, test_context},
        TILE_BYTES,
    };

    #[test]
    fn test_layout() {
        let layout = GridLayout::new(17, DEFAULT_GRID_COLUMNS, 32, 32).unwrap();
        assert_eq!((layout.columns, layout.rows), (16, 2));
        assert_eq!(layout.canvas_size(), (512, 64));
        assert_eq!(layout.cell_origin(15), (480, 0));
        assert_eq!(layout.cell_origin(16), (0, 32));

        let layout = GridLayout::new(3, DEFAULT_GRID_COLUMNS, 128, 64).unwrap();
        assert_eq!((layout.columns, layout.rows), (3, 1));
        assert_eq!(layout.canvas_size(), (384, 64));

        let layout = GridLayout::new(255, DEFAULT_GRID_COLUMNS, 32, 32).unwrap();
        assert_eq!((layout.columns, layout.rows), (16, 16));
        assert_eq!(layout.cell_origin(254), (14 * 32, 15 * 32));

        assert_eq!(GridLayout::new(0, DEFAULT_GRID_COLUMNS, 32, 32), None);
    }

    #[test]
    fn test_layout_too_large() {
        assert_eq!(GridLayout::new(usize::MAX, DEFAULT_GRID_COLUMNS, 32, 32), None);
        assert_eq!(GridLayout::new(1 << 40, 1, 32, 32), None);
        assert_eq!(GridLayout::new(16, DEFAULT_GRID_COLUMNS, u32::MAX / 8, 32), None);
        assert!(GridLayout::new(usize::MAX, usize::MAX, 1, 1).is_none());
    }

    #[test]
    fn test_single_tile_grid_matches_render() {
        let ctx = test_context(counting_tile());
        let single = render_tile(&ctx, 0).unwrap();
        let grid = compose_textures(&ctx, 0, 1, DEFAULT_GRID_COLUMNS).unwrap();
        assert_eq!(grid, single);
    }

    #[test]
    fn test_tiles_placed_by_index() {
        // Tile k is filled with color index k % 16
        let rom = (0..17).flat_map(|k: u8| vec![(k % 16) * 0x11; TILE_BYTES]).collect();
        let ctx = test_context(rom);

        let grid = compose_textures(&ctx, 0, 17, DEFAULT_GRID_COLUMNS).unwrap();
        assert_eq!(grid.dimensions(), (512, 64));
        for k in 0..17u32 {
            let (x, y) = ((k % 16) * 32, (k / 16) * 32);
            let expected = ctx.palette()[(k % 16) as usize];
            assert_eq!(*grid.get_pixel(x, y), expected, "tile {k}");
            assert_eq!(*grid.get_pixel(x + 31, y + 31), expected, "tile {k}");
        }
        // The rest of the second row keeps the backdrop
        assert_eq!(*grid.get_pixel(32, 32), ctx.palette().backdrop());
        assert_eq!(*grid.get_pixel(511, 63), ctx.palette().backdrop());
    }

    #[test]
    fn test_transparent_pixels_keep_backdrop() {
        let mut colors = (0..16).map(|i| Rgba([i, i, i, 255])).collect::<Vec<_>>();
        colors[3] = Rgba([255, 255, 255, 0]);
        let palette = crate::color::Palette::new(colors).unwrap();
        let rom = ztx_rom::Rom::new(vec![0x33; TILE_BYTES]).unwrap();
        let ctx = ExtractionContext::new(rom, palette);

        let grid = compose_textures(&ctx, 0, 1, DEFAULT_GRID_COLUMNS).unwrap();
        assert!(grid.pixels().all(|&p| p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_out_of_range_aborts_batch() {
        let ctx = test_context(vec![0; TILE_BYTES * 3]);
        assert!(compose_textures(&ctx, 0, 3, DEFAULT_GRID_COLUMNS).is_ok());

        let err = compose_textures(&ctx, 0, 4, DEFAULT_GRID_COLUMNS).unwrap_err();
        assert!(err.is_out_of_range());
        assert!(matches!(err, GfxError::Tile { offset, .. } if offset == TILE_BYTES * 3));
    }

    #[test]
    fn test_huge_count_fails_job() {
        let ctx = test_context(vec![0; TILE_BYTES * 3]);
        let err = compose_textures(&ctx, 0, usize::MAX, DEFAULT_GRID_COLUMNS).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");

        let err = compose_textures(&ctx, usize::MAX - 8, 2, DEFAULT_GRID_COLUMNS).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");
    }

    #[test]
    fn test_batch_layout_errors() {
        assert!(matches!(
            GridLayout::for_batch(0x40, 0, DEFAULT_GRID_COLUMNS, 32, 32),
            Err(GfxError::EmptyBatch { offset: 0x40 })
        ));
        assert!(matches!(
            GridLayout::for_batch(0x40, usize::MAX, DEFAULT_GRID_COLUMNS, 32, 32),
            Err(GfxError::GridTooLarge { offset: 0x40, count: usize::MAX })
        ));
    }

    #[test]
    fn test_empty_batch() {
        let ctx = test_context(vec![0; TILE_BYTES]);
        assert!(matches!(
            compose_textures(&ctx, 0x40, 0, DEFAULT_GRID_COLUMNS),
            Err(GfxError::EmptyBatch { offset: 0x40 })
        ));
    }
}
