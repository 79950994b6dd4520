use std::sync::OnceLock;

use itertools::iproduct;
use shrinkwraprs::Shrinkwrap;

/// Width and height of a texture tile, in pixels.
pub const TILE_SIZE: usize = 32;
pub const N_PIXELS_IN_TILE: usize = TILE_SIZE * TILE_SIZE;

// -------------------------------------------------------------------------------------------------

/// Maps raster positions of a decoded tile to positions in its raw nibble stream.
///
/// The raw stream is made of 2-pixel-wide, 16-pixel-tall column strips, one strip per run of 32
/// nibbles, filled top to bottom. Even runs go to the top half of the tile and odd runs to the
/// bottom half, moving one strip to the right every two runs.
///
/// Entry `i` holds the stream position of the pixel shown at raster position `i`. Every value in
/// `0..1024` occurs exactly once.
#[derive(Clone, Debug, Eq, PartialEq, Shrinkwrap)]
pub struct DeinterleaveTable(pub(crate) [u16; N_PIXELS_IN_TILE]);

impl DeinterleaveTable {
    pub fn build() -> Self {
        let mut table = [0; N_PIXELS_IN_TILE];
        for (y, x) in iproduct!(0..TILE_SIZE, 0..TILE_SIZE) {
            table[destination_position(x, y)] = source_position(x, y) as u16;
        }
        Self(table)
    }

    /// The table of this process, built on first use.
    pub fn shared() -> &'static Self {
        static TABLE: OnceLock<DeinterleaveTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            log::debug!("Building tile deinterleave table");
            Self::build()
        })
    }
}

pub const fn source_position(x: usize, y: usize) -> usize {
    x + (TILE_SIZE * y)
}

#[rustfmt::skip]
pub const fn destination_position(x: usize, y: usize) -> usize {
    (512 * (y % 2)) +
    (x % 2) +
    (32 * (x / 2)) +
    (2 * (y / 2))
}

// -------------------------------------------------------------------------------------------------
