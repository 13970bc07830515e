//! For handling Minecraft: Bedrock Edition's structure files, `.mcstructure`.
//!
//! These are what structure blocks export: a little-endian NBT document
//! holding the size of a region, one or more block palettes, a grid of
//! palette indices per layer, block entities and entities.
//!
//! * [`Structure`] is the document. It is created by [`Reader`] (or
//!   [`Structure::from_bytes`]) and turned back into bytes by [`Writer`].
//! * Block states are resolved to numeric IDs by a [`BlockStateCodec`], which
//!   is normally the host game's block registry. [`StateRegistry`] is a
//!   standalone implementation.
//! * [`filter`] has transforms over a layer, eg keeping only some blocks.
//!
//! Problems with individual palette entries or voxels do not fail a read or a
//! write. They are logged through the `log` crate and collected as
//! [`Diagnostic`]s on the reader or writer.
//!
//! ```no_run
//! use mcstructure::{BlockStateCodec, StateRegistry, Structure};
//!
//! let registry = StateRegistry::open();
//! let structure = Structure::read_file("house.mcstructure", &registry).unwrap();
//!
//! for (pos, state) in structure.blocks(0).unwrap() {
//!     if let Some(id) = state {
//!         println!("{} {}", pos, registry.serialize(id).unwrap());
//!     }
//! }
//! ```

pub mod filter;

mod diagnostic;
mod layer;
mod palette;
mod pos;
mod read;
mod registry;
mod state;
mod structure;
mod write;

pub use diagnostic::*;
pub use layer::*;
pub use palette::*;
pub use pos::*;
pub use read::*;
pub use registry::*;
pub use state::*;
pub use structure::*;
pub use write::*;

use std::path::PathBuf;

#[cfg(test)]
mod test;

/// The only `format_version` this crate reads and writes.
pub const FORMAT_VERSION: i32 = 1;

/// Name of the palette structure blocks write, and the one read by default.
pub const DEFAULT_PALETTE: &str = "default";

/// File extension of structure files, compared case-insensitively.
pub const EXTENSION: &str = "mcstructure";

#[derive(Debug)]
pub enum Error {
    /// A required tag is missing or malformed.
    Format { tag: String, msg: String },
    /// The path does not end in `.mcstructure`.
    Extension(PathBuf),
    /// The data is a Java Edition structure.
    JavaStructure,
    /// The data is not valid little-endian NBT.
    Nbt(mcstructure_nbt::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Validation(ValidationError),
    /// The codec could not resolve its own unknown-block state.
    UnknownState(StateError),
    NoSuchPalette(String),
    LayerOutOfRange(usize, usize),
    OutOfBounds(BlockPos, Size),
}

impl Error {
    pub(crate) fn format(tag: &str, msg: impl Into<String>) -> Self {
        Error::Format {
            tag: tag.to_owned(),
            msg: msg.into(),
        }
    }
}

impl From<mcstructure_nbt::Error> for Error {
    fn from(err: mcstructure_nbt::Error) -> Error {
        Error::Nbt(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Error {
        Error::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Format { tag, msg } => write!(f, "invalid structure: '{}': {}", tag, msg),
            Error::Extension(path) => write!(
                f,
                "file {} does not have the .{} extension",
                path.display(),
                EXTENSION
            ),
            Error::JavaStructure => f.write_str(
                "file is a Java Edition structure, only Bedrock .mcstructure files are supported",
            ),
            Error::Nbt(e) => write!(f, "invalid nbt: {}", e),
            Error::Io { path, source } => write!(f, "io error on {}: {}", path.display(), source),
            Error::Validation(e) => write!(f, "invalid structure: {}", e),
            Error::UnknownState(e) => write!(f, "codec cannot resolve the unknown block: {}", e),
            Error::NoSuchPalette(name) => write!(f, "no palette named '{}'", name),
            Error::LayerOutOfRange(layer, count) => write!(
                f,
                "layer {} out of range, structure has {} layers",
                layer, count
            ),
            Error::OutOfBounds(pos, size) => {
                write!(f, "position {} outside structure of size {}", pos, size)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Nbt(e) => Some(e),
            Error::Io { source, .. } => Some(source),
            Error::Validation(e) => Some(e),
            Error::UnknownState(e) => Some(e),
            _ => None,
        }
    }
}
