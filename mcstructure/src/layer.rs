use std::collections::BTreeSet;

use crate::palette::PaletteTable;
use crate::pos::{BlockPos, Size};
use crate::state::StateId;
use crate::{Error, Result};

/// Index meaning "no block" in a layer, and in a file's `block_indices`.
pub const VOID: i32 = -1;

/// One full voxel grid of a structure. Layer 0 holds blocks, layer 1 the
/// liquids sharing those voxels (water in a waterlogged fence, say).
///
/// Voxels store indices into the layer's own palette of state IDs, in the
/// order given by [`Size::offset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelLayer {
    size: Size,
    palette: PaletteTable<StateId>,
    indices: Vec<i32>,
}

impl VoxelLayer {
    /// A layer with every voxel void.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            palette: PaletteTable::new(),
            indices: vec![VOID; size.volume()],
        }
    }

    /// Assemble a layer from parts. The index array is not checked against
    /// the size or the palette; [`crate::Structure::check`] reports a wrong
    /// length.
    pub fn from_parts(size: Size, palette: PaletteTable<StateId>, indices: Vec<i32>) -> Self {
        Self {
            size,
            palette,
            indices,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn palette(&self) -> &PaletteTable<StateId> {
        &self.palette
    }

    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    /// The state at a voxel. `Ok(None)` for void voxels.
    pub fn get(&self, pos: BlockPos) -> Result<Option<StateId>> {
        let offset = self.offset(pos)?;
        Ok(self.state_at(offset))
    }

    /// Set the state of a voxel, `None` to make it void. New states are
    /// appended to the palette.
    pub fn set(&mut self, pos: BlockPos, state: Option<StateId>) -> Result<()> {
        let offset = self.offset(pos)?;
        let index = match state {
            Some(id) => self.palette.append(id) as i32,
            None => VOID,
        };

        match self.indices.get_mut(offset) {
            Some(slot) => {
                *slot = index;
                Ok(())
            }
            None => Err(Error::OutOfBounds(pos, self.size)),
        }
    }

    /// State stored at a linear offset. Void, dangling and out of range
    /// offsets all give `None`.
    pub fn state_at(&self, offset: usize) -> Option<StateId> {
        let index = *self.indices.get(offset)?;
        if index < 0 {
            return None;
        }
        self.palette.get(index as usize).copied()
    }

    /// Redirect every voxel holding `from` to `to`, or make them void if `to`
    /// is `None`. Does nothing if `from` is not in the palette.
    ///
    /// Works on the palette index rather than per state, so the cost is one
    /// pass over the voxels. The old palette entry stays behind until
    /// [`VoxelLayer::collect_garbage`].
    pub fn replace_all(&mut self, from: StateId, to: Option<StateId>) {
        let from_index = match self.palette.lookup(&from) {
            Some(i) => i as i32,
            None => return,
        };

        let to_index = match to {
            Some(id) if id == from => return,
            Some(id) => self.palette.append(id) as i32,
            None => VOID,
        };

        for index in self.indices.iter_mut() {
            if *index == from_index {
                *index = to_index;
            }
        }
    }

    /// Palette indices referenced by at least one voxel.
    pub fn used_indices(&self) -> BTreeSet<usize> {
        self.indices
            .iter()
            .filter(|&&i| i >= 0)
            .map(|&i| i as usize)
            .collect()
    }

    /// Drop palette entries no voxel refers to and renumber the voxels to
    /// match. Indices pointing past the palette end become void.
    pub fn collect_garbage(&mut self) {
        let used = self.used_indices();
        let remap = self.palette.collect_garbage(&used);

        for index in self.indices.iter_mut() {
            if *index < 0 {
                continue;
            }
            *index = match remap.get(*index as usize) {
                Some(Some(new)) => *new as i32,
                _ => VOID,
            };
        }
    }

    fn offset(&self, pos: BlockPos) -> Result<usize> {
        self.size
            .offset(pos)
            .ok_or(Error::OutOfBounds(pos, self.size))
    }
}
