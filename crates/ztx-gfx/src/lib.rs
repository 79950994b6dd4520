pub mod color;
pub mod context;
pub mod deinterleave;
pub mod error;
pub mod grid;
pub mod meta_tile;
pub mod tile;

pub use crate::{
    color::{Color, Palette},
    context::ExtractionContext,
    error::GfxError,
};
