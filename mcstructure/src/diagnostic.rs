use std::fmt::Display;

use crate::pos::BlockPos;
use crate::state::StateError;

/// A problem that was worked around while reading or writing a structure.
///
/// Each one is also logged as a warning when it happens.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A palette entry could not be resolved and reads as the unknown block.
    StateResolution {
        palette: String,
        index: usize,
        reason: StateError,
    },
    /// A state could not be described by the codec. Voxels holding it were
    /// written as void.
    StateSerialization { state: u32, reason: StateError },
    /// A voxel referred past the end of the palette. It reads as the unknown
    /// block.
    DanglingIndex {
        layer: usize,
        offset: usize,
        index: i32,
    },
    /// An entry of `block_position_data` was ignored.
    PositionData {
        palette: String,
        key: String,
        reason: String,
    },
    /// A block entity outside the structure was not written.
    BlockEntityOutOfBounds { pos: BlockPos },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::StateResolution {
                palette,
                index,
                reason,
            } => write!(
                f,
                "palette '{}' entry {} is not a known block, using the unknown block: {}",
                palette, index, reason
            ),
            Diagnostic::StateSerialization { state, reason } => write!(
                f,
                "state {} cannot be serialized, its voxels are left void: {}",
                state, reason
            ),
            Diagnostic::DanglingIndex {
                layer,
                offset,
                index,
            } => write!(
                f,
                "layer {} voxel {} has palette index {} out of range",
                layer, offset, index
            ),
            Diagnostic::PositionData {
                palette,
                key,
                reason,
            } => write!(
                f,
                "ignoring block_position_data '{}' in palette '{}': {}",
                key, palette, reason
            ),
            Diagnostic::BlockEntityOutOfBounds { pos } => {
                write!(f, "block entity at {} is outside the structure", pos)
            }
        }
    }
}
