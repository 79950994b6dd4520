pub mod rom;
pub mod rom_slice;

pub use crate::{
    rom::{Rom, RomError},
    rom_slice::RomSlice,
};
