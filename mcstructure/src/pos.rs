use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A position in blocks. Used both for voxels inside a structure, which are
/// never negative, and for world positions such as the structure's origin.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Pack the position into one integer, 26 bits of X, 26 bits of Z and 12
    /// bits of Y. Positions outside of those ranges wrap.
    pub fn pack(&self) -> i64 {
        ((self.x as i64 & 0x3FF_FFFF) << 38)
            | ((self.z as i64 & 0x3FF_FFFF) << 12)
            | (self.y as i64 & 0xFFF)
    }

    /// Inverse of [`BlockPos::pack`].
    pub fn unpack(packed: i64) -> Self {
        // Shifting left then arithmetic shifting right sign-extends each field.
        Self {
            x: (packed >> 38) as i32,
            y: ((packed << 52) >> 52) as i32,
            z: ((packed << 26) >> 38) as i32,
        }
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Dimensions of a structure in voxels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Size {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Number of voxels, ie the length of every layer's index array.
    /// Saturates rather than overflowing for absurd sizes.
    pub fn volume(&self) -> usize {
        (self.x as usize)
            .saturating_mul(self.y as usize)
            .saturating_mul(self.z as usize)
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        let inside = |v: i32, max: u32| v >= 0 && (v as u32) < max;
        inside(pos.x, self.x) && inside(pos.y, self.y) && inside(pos.z, self.z)
    }

    /// Linear offset of a voxel in the index arrays, or `None` if the
    /// position is outside the structure.
    ///
    /// Storage is X-major, then Y, with Z changing fastest:
    /// `x * (size.y * size.z) + y * size.z + z`. Every read and write of the
    /// index arrays goes through this function.
    pub fn offset(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }

        let (x, y, z) = (pos.x as usize, pos.y as usize, pos.z as usize);
        let (sy, sz) = (self.y as usize, self.z as usize);

        x.checked_mul(sy)?
            .checked_mul(sz)?
            .checked_add(y.checked_mul(sz)?)?
            .checked_add(z)
    }

    /// Inverse of [`Size::offset`]. Returns `None` for offsets past the end of
    /// the structure.
    pub fn position(&self, offset: usize) -> Option<BlockPos> {
        if offset >= self.volume() {
            return None;
        }

        let (sy, sz) = (self.y as usize, self.z as usize);
        let x = offset / (sy * sz);
        let y = (offset / sz) % sy;
        let z = offset % sz;

        Some(BlockPos::new(x as i32, y as i32, z as i32))
    }

    /// Every position in the structure, in storage order.
    pub fn positions(&self) -> Positions {
        Positions {
            size: *self,
            next: 0,
        }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Iterator over the positions of a structure, see [`Size::positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    size: Size,
    next: usize,
}

impl Iterator for Positions {
    type Item = BlockPos;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.size.position(self.next)?;
        self.next += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size.volume().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}
