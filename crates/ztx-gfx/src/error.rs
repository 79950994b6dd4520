use thiserror::Error;
use ztx_rom::RomError;

use crate::color::MIN_PALETTE_LEN;

// -------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GfxError {
    #[error("Palette has {0} colors, at least {min} are required", min = MIN_PALETTE_LEN)]
    PaletteTooSmall(usize),
    #[error("Color index {index} of pixel {pixel} is outside of a {palette_len}-color palette")]
    PaletteIndexInvalid { index: u8, pixel: usize, palette_len: usize },
    #[error(transparent)]
    Rom(#[from] RomError),
    #[error("Batch at ${offset:06X} has no entries")]
    EmptyBatch { offset: usize },
    #[error("Batch at ${offset:06X} with {count} entries does not fit in one image")]
    GridTooLarge { offset: usize, count: usize },

    #[error("Decoding tile at ${offset:06X}:\n- {cause}")]
    Tile { offset: usize, cause: Box<GfxError> },
    #[error("Decoding meta-tile at ${offset:06X}:\n- {cause}")]
    MetaTile { offset: usize, cause: Box<GfxError> },
    #[error("Sub-tile {sub_index} (index {index:#04X}):\n- {cause}")]
    SubTile { sub_index: usize, index: u8, cause: Box<GfxError> },
}

// -------------------------------------------------------------------------------------------------

impl GfxError {
    pub(crate) fn tile(offset: usize) -> impl FnOnce(GfxError) -> GfxError {
        move |e| GfxError::Tile { offset, cause: Box::new(e) }
    }

    pub(crate) fn meta_tile(offset: usize) -> impl FnOnce(GfxError) -> GfxError {
        move |e| GfxError::MetaTile { offset, cause: Box::new(e) }
    }

    /// The innermost error, past the context added by tile and meta-tile decoding.
    pub fn root_cause(&self) -> &GfxError {
        match self {
            GfxError::Tile { cause, .. } | GfxError::MetaTile { cause, .. } | GfxError::SubTile { cause, .. } => {
                cause.root_cause()
            }
            e => e,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self.root_cause(), GfxError::Rom(RomError::OutOfRange { .. }))
    }

    pub fn is_palette_index_invalid(&self) -> bool {
        matches!(self.root_cause(), GfxError::PaletteIndexInvalid { .. })
    }
}

// -------------------------------------------------------------------------------------------------
