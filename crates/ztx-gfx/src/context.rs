use ztx_rom::Rom;

use crate::{color::Palette, deinterleave::DeinterleaveTable};

/// Everything a decode needs, read-only once constructed.
///
/// The context is shared by reference between jobs and between the threads decoding a grid.
#[derive(Clone, Debug)]
pub struct ExtractionContext {
    rom:     Rom,
    palette: Palette,
    table:   &'static DeinterleaveTable,
}

impl ExtractionContext {
    pub fn new(rom: Rom, palette: Palette) -> Self {
        Self { rom, palette, table: DeinterleaveTable::shared() }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn table(&self) -> &DeinterleaveTable {
        self.table
    }
}
