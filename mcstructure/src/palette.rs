use std::collections::{BTreeMap, BTreeSet};

use mcstructure_nbt::Value;

use crate::state::BlockStateRef;

/// A deduplicated list of values in insertion order. The position of a value
/// is the index voxels store to refer to it.
///
/// Palettes hold tens, rarely hundreds, of entries so lookups are a linear
/// scan rather than a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable<T> {
    entries: Vec<T>,
}

impl<T> Default for PaletteTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: PartialEq> PaletteTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, if present.
    pub fn lookup(&self, value: &T) -> Option<usize> {
        self.entries.iter().position(|e| e == value)
    }

    /// Add `value` to the end of the palette, returning its index. If the
    /// value is already present the existing index is returned instead.
    pub fn append(&mut self, value: T) -> usize {
        match self.lookup(&value) {
            Some(i) => i,
            None => {
                self.entries.push(value);
                self.entries.len() - 1
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Remove every entry whose index is not in `used`. Remaining entries
    /// keep their relative order.
    ///
    /// Returns a map from old index to new index, `None` for removed
    /// entries. Indices in `used` past the end of the palette are ignored.
    pub fn collect_garbage(&mut self, used: &BTreeSet<usize>) -> Vec<Option<usize>> {
        let mut remap = Vec::with_capacity(self.entries.len());
        let mut next = 0;

        for i in 0..self.entries.len() {
            if used.contains(&i) {
                remap.push(Some(next));
                next += 1;
            } else {
                remap.push(None);
            }
        }

        let mut i = 0;
        self.entries.retain(|_| {
            let keep = remap[i].is_some();
            i += 1;
            keep
        });

        remap
    }
}

impl<T> FromIterator<T> for PaletteTable<T>
where
    T: PartialEq,
{
    /// Collects with deduplication, so the table can be shorter than the
    /// iterator.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = PaletteTable::new();
        for value in iter {
            table.append(value);
        }
        table
    }
}

impl<'a, T> IntoIterator for &'a PaletteTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One named palette of a structure, as found in the file.
///
/// `entries` are kept exactly as read, duplicates included, because the
/// file's block indices point into them. The writer never produces
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    pub entries: Vec<BlockStateRef>,

    /// Extra NBT for individual voxels keyed by linear offset. Each value is
    /// the whole `{ block_entity_data: ... }` compound.
    pub position_data: BTreeMap<u32, Value>,
}

impl Palette {
    pub fn new(entries: Vec<BlockStateRef>) -> Self {
        Self {
            entries,
            position_data: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
