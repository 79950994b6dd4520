use std::{fs, path::Path, sync::Arc};

use thiserror::Error;

use crate::rom_slice::RomSlice;

// -------------------------------------------------------------------------------------------------

type ParseErr<'a> = nom::Err<nom::error::Error<&'a [u8]>>;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("Empty ROM file")]
    Empty,
    #[error("Could not read ROM file:\n- {0}")]
    Io(std::io::Error),
    #[error("{slice} is out of range (buffer size: {len} ({len:#x}))")]
    OutOfRange { slice: RomSlice, len: usize },
    #[error("Could not parse ROM slice: {0}")]
    Parse(RomSlice),
}

// -------------------------------------------------------------------------------------------------

/// Read-only ROM image, addressed by absolute byte offset.
///
/// Cloning is cheap: all clones share the same bytes.
#[derive(Clone)]
pub struct Rom(pub Arc<[u8]>);

impl Rom {
    pub fn new(data: Vec<u8>) -> Result<Self, RomError> {
        if data.is_empty() {
            Err(RomError::Empty)
        } else {
            Ok(Self(Arc::from(data)))
        }
    }

    /// A file that does not exist is reported the same way as an empty one.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        log::info!("Reading ROM from file: {}", path.display());
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::error!("ROM file not found: {}", path.display());
                return Err(RomError::Empty);
            }
            Err(e) => return Err(RomError::Io(e)),
        };
        let rom = Self::new(data)?;
        log::info!("Read {} ({:#x}) bytes of ROM", rom.len(), rom.len());
        Ok(rom)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slice(&self, slice: RomSlice) -> Result<&[u8], RomError> {
        slice
            .end()
            .and_then(|end| self.0.get(slice.begin..end))
            .ok_or(RomError::OutOfRange { slice, len: self.len() })
    }

    /// Runs a nom parser over the bytes of `slice`. The whole slice must be in range even if the
    /// parser consumes only part of it.
    pub fn parse<'r, Ret, Parser>(&'r self, slice: RomSlice, mut parser: Parser) -> Result<Ret, RomError>
    where
        Parser: nom::Parser<&'r [u8], Ret, nom::error::Error<&'r [u8]>>,
    {
        let bytes = self.slice(slice)?;
        let (_, ret) = parser.parse(bytes).map_err(|_: ParseErr| RomError::Parse(slice))?;
        Ok(ret)
    }
}

impl std::fmt::Debug for Rom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rom({} bytes)", self.len())
    }
}

// -------------------------------------------------------------------------------------------------
