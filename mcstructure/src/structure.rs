use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mcstructure_nbt::Value;

use crate::layer::VoxelLayer;
use crate::palette::Palette;
use crate::pos::{BlockPos, Size};
use crate::read::Reader;
use crate::state::{BlockStateCodec, StateId};
use crate::write::Writer;
use crate::{Error, Result, DEFAULT_PALETTE, EXTENSION, FORMAT_VERSION};

/// A Bedrock structure: a box of voxels with palettes, block entities and
/// entities.
///
/// Layer 0 holds blocks and layer 1, when present, liquids. Voxels of every
/// layer hold [`StateId`]s from whichever [`BlockStateCodec`] read the
/// structure, so writing it needs the same codec.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub format_version: i32,
    pub world_origin: BlockPos,

    /// Entity compounds, passed through untouched.
    pub entities: Vec<Value>,

    size: Size,
    palettes: IndexMap<String, Palette>,
    active_palette: usize,
    layers: Vec<VoxelLayer>,
    block_entities: BTreeMap<BlockPos, Value>,
}

/// Reasons [`Structure::check`] rejects a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    FormatVersion(i32),
    NoLayers,
    NoPalettes,
    LayerSize {
        layer: usize,
        expected: Size,
        actual: Size,
    },
    LayerLength {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    PaletteLength {
        first: String,
        first_len: usize,
        other: String,
        other_len: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::FormatVersion(v) => write!(
                f,
                "format version {} is not supported, expected {}",
                v, FORMAT_VERSION
            ),
            ValidationError::NoLayers => f.write_str("structure has no block layers"),
            ValidationError::NoPalettes => f.write_str("structure has no palettes"),
            ValidationError::LayerSize {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "layer {} has size {}, structure has size {}",
                layer, actual, expected
            ),
            ValidationError::LayerLength {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "layer {} has {} block indices, expected {}",
                layer, actual, expected
            ),
            ValidationError::PaletteLength {
                first,
                first_len,
                other,
                other_len,
            } => write!(
                f,
                "palette '{}' has {} entries but palette '{}' has {}",
                first, first_len, other, other_len
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

impl Structure {
    /// An empty structure of the given size: one void block layer and an
    /// empty default palette.
    pub fn new(size: Size) -> Self {
        let mut palettes = IndexMap::new();
        palettes.insert(DEFAULT_PALETTE.to_owned(), Palette::default());

        Self {
            format_version: FORMAT_VERSION,
            world_origin: BlockPos::default(),
            entities: Vec::new(),
            size,
            palettes,
            active_palette: 0,
            layers: vec![VoxelLayer::new(size)],
            block_entities: BTreeMap::new(),
        }
    }

    /// Assemble a structure from parts read out of a file. The result has
    /// not been checked.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        format_version: i32,
        size: Size,
        world_origin: BlockPos,
        palettes: IndexMap<String, Palette>,
        active_palette: usize,
        layers: Vec<VoxelLayer>,
        block_entities: BTreeMap<BlockPos, Value>,
        entities: Vec<Value>,
    ) -> Self {
        Self {
            format_version,
            world_origin,
            entities,
            size,
            palettes,
            active_palette,
            layers,
            block_entities,
        }
    }

    /// Read a structure from a `.mcstructure` file, resolving the default
    /// palette. Use [`Reader`] to pick another palette or to see what was
    /// worked around.
    pub fn read_file<C>(path: impl AsRef<Path>, codec: &C) -> Result<Self>
    where
        C: BlockStateCodec + ?Sized,
    {
        let path = path.as_ref();
        check_extension(path)?;

        let data = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Reader::new(codec).read(&data)
    }

    /// Write the structure to a `.mcstructure` file.
    pub fn write_file<C>(&self, path: impl AsRef<Path>, codec: &C) -> Result<()>
    where
        C: BlockStateCodec + ?Sized,
    {
        let path = path.as_ref();
        check_extension(path)?;

        let data = Writer::new(codec).write(self)?;
        std::fs::write(path, data).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_bytes<C: BlockStateCodec + ?Sized>(data: &[u8], codec: &C) -> Result<Self> {
        Reader::new(codec).read(data)
    }

    pub fn to_bytes<C: BlockStateCodec + ?Sized>(&self, codec: &C) -> Result<Vec<u8>> {
        Writer::new(codec).write(self)
    }

    /// Check the invariants a structure needs before it can be written.
    /// Every read runs this too.
    pub fn check(&self) -> std::result::Result<(), ValidationError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ValidationError::FormatVersion(self.format_version));
        }
        if self.layers.is_empty() {
            return Err(ValidationError::NoLayers);
        }
        if self.palettes.is_empty() {
            return Err(ValidationError::NoPalettes);
        }

        let volume = self.size.volume();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size() != self.size {
                return Err(ValidationError::LayerSize {
                    layer: i,
                    expected: self.size,
                    actual: layer.size(),
                });
            }
            if layer.indices().len() != volume {
                return Err(ValidationError::LayerLength {
                    layer: i,
                    expected: volume,
                    actual: layer.indices().len(),
                });
            }
        }

        let mut palettes = self.palettes.iter();
        if let Some((first, first_palette)) = palettes.next() {
            for (other, palette) in palettes {
                if palette.len() != first_palette.len() {
                    return Err(ValidationError::PaletteLength {
                        first: first.clone(),
                        first_len: first_palette.len(),
                        other: other.clone(),
                        other_len: palette.len(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn palettes(&self) -> &IndexMap<String, Palette> {
        &self.palettes
    }

    pub fn palette(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    /// Add or replace a named palette. A new palette does not become active.
    pub fn insert_palette(&mut self, name: impl Into<String>, palette: Palette) {
        self.palettes.insert(name.into(), palette);
    }

    /// Name and contents of the palette the voxels were resolved with. This
    /// is the palette a write emits.
    pub fn active_palette(&self) -> Option<(&str, &Palette)> {
        self.palettes
            .get_index(self.active_palette)
            .map(|(name, palette)| (name.as_str(), palette))
    }

    /// Make a named palette the active one.
    ///
    /// Only the choice changes. The voxels keep the states they were read
    /// with; read the file again through [`Reader::palette`] to resolve it
    /// with another palette.
    pub fn use_palette(&mut self, name: &str) -> Result<()> {
        match self.palettes.get_index_of(name) {
            Some(i) => {
                self.active_palette = i;
                Ok(())
            }
            None => Err(Error::NoSuchPalette(name.to_owned())),
        }
    }

    pub fn layers(&self) -> &[VoxelLayer] {
        &self.layers
    }

    pub fn layer(&self, layer: usize) -> Result<&VoxelLayer> {
        let count = self.layers.len();
        self.layers
            .get(layer)
            .ok_or(Error::LayerOutOfRange(layer, count))
    }

    pub fn layer_mut(&mut self, layer: usize) -> Result<&mut VoxelLayer> {
        let count = self.layers.len();
        self.layers
            .get_mut(layer)
            .ok_or(Error::LayerOutOfRange(layer, count))
    }

    /// Add a layer, eg a liquid layer. It is checked on the next
    /// [`Structure::check`].
    pub fn push_layer(&mut self, layer: VoxelLayer) {
        self.layers.push(layer);
    }

    /// Swap a layer for another, eg the result of a [`crate::filter`].
    pub fn replace_layer(&mut self, layer: usize, with: VoxelLayer) -> Result<VoxelLayer> {
        let slot = self.layer_mut(layer)?;
        Ok(std::mem::replace(slot, with))
    }

    pub fn block(&self, layer: usize, pos: BlockPos) -> Result<Option<StateId>> {
        self.layer(layer)?.get(pos)
    }

    pub fn set_block(&mut self, layer: usize, pos: BlockPos, state: Option<StateId>) -> Result<()> {
        self.layer_mut(layer)?.set(pos, state)
    }

    /// Every voxel of a layer with its state, `None` for void, in storage
    /// order.
    pub fn blocks(&self, layer: usize) -> Result<Blocks<'_>> {
        let layer = self.layer(layer)?;
        Ok(Blocks {
            layer,
            positions: self.size.positions(),
        })
    }

    pub fn block_entities(&self) -> &BTreeMap<BlockPos, Value> {
        &self.block_entities
    }

    /// The block entity compound stored at a position, as found in the file.
    pub fn block_entity_at(&self, pos: BlockPos) -> Option<&Value> {
        self.block_entities.get(&pos)
    }

    /// A copy of the block entity at `pos` moved to `world_pos`, ready to be
    /// placed in a world. The `x`, `y` and `z` tags are overwritten.
    pub fn block_entity_for_placement(&self, pos: BlockPos, world_pos: BlockPos) -> Option<Value> {
        let mut data = self.block_entities.get(&pos)?.clone();
        if let Some(compound) = data.as_compound_mut() {
            compound.insert("x".to_owned(), Value::Int(world_pos.x));
            compound.insert("y".to_owned(), Value::Int(world_pos.y));
            compound.insert("z".to_owned(), Value::Int(world_pos.z));
        }
        Some(data)
    }

    pub fn set_block_entity(&mut self, pos: BlockPos, data: Value) -> Result<Option<Value>> {
        if !self.size.contains(pos) {
            return Err(Error::OutOfBounds(pos, self.size));
        }
        Ok(self.block_entities.insert(pos, data))
    }

    pub fn remove_block_entity(&mut self, pos: BlockPos) -> Option<Value> {
        self.block_entities.remove(&pos)
    }
}

/// Iterator over the voxels of one layer, see [`Structure::blocks`].
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    layer: &'a VoxelLayer,
    positions: crate::pos::Positions,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = (BlockPos, Option<StateId>);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.positions.next()?;
        let state = self
            .layer
            .size()
            .offset(pos)
            .and_then(|offset| self.layer.state_at(offset));
        Some((pos, state))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a> ExactSizeIterator for Blocks<'a> {}

/// Check that `path` ends in `.mcstructure`, ignoring case. Tools reading or
/// writing structure files themselves call this before touching the file.
pub fn check_extension(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(EXTENSION))
        .unwrap_or(false);

    if ok {
        Ok(())
    } else {
        Err(Error::Extension(PathBuf::from(path)))
    }
}
