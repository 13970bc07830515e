use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, warn};
use mcstructure_nbt::{Compound, Tag, Value};

use crate::diagnostic::Diagnostic;
use crate::layer::{VoxelLayer, VOID};
use crate::palette::{Palette, PaletteTable};
use crate::pos::{BlockPos, Size};
use crate::state::{BlockStateCodec, BlockStateRef, StateError, StateId};
use crate::structure::Structure;
use crate::{Error, Result, DEFAULT_PALETTE, FORMAT_VERSION};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads structures, resolving block states through a [`BlockStateCodec`].
///
/// ```no_run
/// # use mcstructure::{Reader, StateRegistry};
/// let registry = StateRegistry::open();
/// let data = std::fs::read("house.mcstructure").unwrap();
///
/// let mut reader = Reader::new(&registry).palette("default");
/// let structure = reader.read(&data).unwrap();
/// for diagnostic in reader.diagnostics() {
///     println!("{}", diagnostic);
/// }
/// # let _ = structure;
/// ```
pub struct Reader<'a, C: BlockStateCodec + ?Sized> {
    codec: &'a C,
    palette: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, C: BlockStateCodec + ?Sized> Reader<'a, C> {
    pub fn new(codec: &'a C) -> Self {
        Self {
            codec,
            palette: DEFAULT_PALETTE.to_owned(),
            diagnostics: Vec::new(),
        }
    }

    /// Resolve voxels with the named palette rather than `"default"`.
    pub fn palette(mut self, name: impl Into<String>) -> Self {
        self.palette = name.into();
        self
    }

    /// Problems worked around by the reads so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn read(&mut self, data: &[u8]) -> Result<Structure> {
        if data.starts_with(&GZIP_MAGIC) {
            return Err(Error::JavaStructure);
        }

        let root = mcstructure_nbt::from_bytes(data)?;
        if root.contains_key("DataVersion") {
            return Err(Error::JavaStructure);
        }

        let format_version = match root.get("format_version") {
            Some(Value::Int(v)) => *v,
            Some(other) => {
                return Err(Error::format(
                    "format_version",
                    format!("expected int, found {}", other.tag()),
                ))
            }
            None => return Err(Error::format("format_version", "missing")),
        };
        if format_version != FORMAT_VERSION {
            return Err(Error::format(
                "format_version",
                format!(
                    "version {} is not supported, expected {}",
                    format_version, FORMAT_VERSION
                ),
            ));
        }

        let size = match root.get("size") {
            Some(value) => {
                let [x, y, z] = vec3("size", value)?;
                if x < 0 || y < 0 || z < 0 {
                    return Err(Error::format(
                        "size",
                        format!("negative size {}, {}, {}", x, y, z),
                    ));
                }
                Size::new(x as u32, y as u32, z as u32)
            }
            None => return Err(Error::format("size", "missing")),
        };

        let world_origin = match root.get("structure_world_origin") {
            Some(value) => {
                let [x, y, z] = vec3("structure_world_origin", value)?;
                BlockPos::new(x, y, z)
            }
            None => BlockPos::default(),
        };

        let structure = compound("structure", root.get("structure"))?;
        let raw_layers = block_indices(structure)?;
        let entities = entities(structure)?;
        let raw_palettes = compound("palette", structure.get("palette"))?;

        let mut palettes = IndexMap::new();
        let mut resolved = None;
        for (name, raw) in raw_palettes {
            let raw = compound(name, Some(raw))?;
            let entries = block_palette(name, raw)?;

            let decoded = if *name == self.palette {
                let (decoded, ids) = self.resolve_palette(name, entries)?;
                resolved = Some((palettes.len(), ids));
                decoded
            } else {
                entries.iter().map(|raw| self.describe(raw)).collect()
            };

            let mut palette = Palette::new(decoded);
            palette.position_data = self.position_data(name, raw, size)?;
            palettes.insert(name.clone(), palette);
        }

        let (active_palette, ids) = match resolved {
            Some(resolved) => resolved,
            // An empty palette compound is left for the check below.
            None if palettes.is_empty() => (0, Vec::new()),
            None => return Err(Error::NoSuchPalette(self.palette.clone())),
        };

        let layers = raw_layers
            .into_iter()
            .enumerate()
            .map(|(i, raw)| self.layer(i, size, raw, &ids))
            .collect::<Result<Vec<_>>>()?;

        let mut block_entities = BTreeMap::new();
        if let Some((name, palette)) = palettes.get_index(active_palette) {
            for (&offset, data) in &palette.position_data {
                let entity = data
                    .as_compound()
                    .and_then(|c| c.get("block_entity_data"));
                match (size.position(offset as usize), entity) {
                    (Some(pos), Some(entity)) => {
                        block_entities.insert(pos, entity.clone());
                    }
                    // Without a block entity the entry is not written back.
                    _ => self.report(Diagnostic::PositionData {
                        palette: name.clone(),
                        key: offset.to_string(),
                        reason: "no block_entity_data".to_owned(),
                    }),
                }
            }
        }

        debug!(
            "read structure of size {} with {} layers, {} palette entries, {} block entities",
            size,
            layers.len(),
            ids.len(),
            block_entities.len()
        );

        let structure = Structure::from_parts(
            format_version,
            size,
            world_origin,
            palettes,
            active_palette,
            layers,
            block_entities,
            entities,
        );
        structure.check()?;
        Ok(structure)
    }

    /// Resolve every entry of the palette voxels refer to.
    fn resolve_palette(
        &mut self,
        name: &str,
        entries: &[Value],
    ) -> Result<(Vec<BlockStateRef>, Vec<StateId>)> {
        let mut decoded = Vec::with_capacity(entries.len());
        let mut ids = Vec::with_capacity(entries.len());

        for (index, raw) in entries.iter().enumerate() {
            match self.resolve(raw) {
                Ok((state, id)) => {
                    decoded.push(state);
                    ids.push(id);
                }
                Err(reason) => {
                    self.report(Diagnostic::StateResolution {
                        palette: name.to_owned(),
                        index,
                        reason,
                    });
                    decoded.push(self.describe(raw));
                    ids.push(self.unknown_id()?);
                }
            }
        }

        Ok((decoded, ids))
    }

    /// Current encoding first, then whatever the codec can upgrade. Failures
    /// report the upgrade's error.
    fn resolve(&self, raw: &Value) -> std::result::Result<(BlockStateRef, StateId), StateError> {
        if let Ok(state) = BlockStateRef::from_nbt(raw) {
            if let Ok(id) = self.codec.deserialize(&state) {
                return Ok((state, id));
            }
        }

        let state = self.codec.upgrade(raw)?;
        let id = self.codec.deserialize(&state)?;
        Ok((state, id))
    }

    /// Decode an entry of a palette that is not being resolved. Nothing is
    /// registered with the codec.
    fn describe(&self, raw: &Value) -> BlockStateRef {
        BlockStateRef::from_nbt(raw)
            .or_else(|_| self.codec.upgrade(raw))
            .unwrap_or_else(|_| self.codec.unknown_state())
    }

    fn unknown_id(&self) -> Result<StateId> {
        self.codec
            .deserialize(&self.codec.unknown_state())
            .map_err(Error::UnknownState)
    }

    fn layer(
        &mut self,
        layer: usize,
        size: Size,
        raw: Vec<i32>,
        ids: &[StateId],
    ) -> Result<VoxelLayer> {
        let mut palette = PaletteTable::new();
        // File palette index to layer palette index, filled on first use.
        let mut remap: Vec<Option<i32>> = vec![None; ids.len()];
        let mut indices = Vec::with_capacity(raw.len());

        for (offset, index) in raw.into_iter().enumerate() {
            if index == VOID {
                indices.push(VOID);
                continue;
            }

            let known = usize::try_from(index)
                .ok()
                .and_then(|i| ids.get(i).map(|&id| (i, id)));

            let mapped = match known {
                Some((i, id)) => *remap[i].get_or_insert_with(|| palette.append(id) as i32),
                None => {
                    self.report(Diagnostic::DanglingIndex {
                        layer,
                        offset,
                        index,
                    });
                    palette.append(self.unknown_id()?) as i32
                }
            };
            indices.push(mapped);
        }

        Ok(VoxelLayer::from_parts(size, palette, indices))
    }

    fn position_data(
        &mut self,
        palette: &str,
        raw: &Compound,
        size: Size,
    ) -> Result<BTreeMap<u32, Value>> {
        let mut data = BTreeMap::new();
        let entries = match raw.get("block_position_data") {
            Some(Value::Compound(c)) => c,
            Some(other) => {
                return Err(Error::format(
                    "block_position_data",
                    format!("expected compound, found {}", other.tag()),
                ))
            }
            None => return Ok(data),
        };

        for (key, value) in entries {
            let reason = match key.parse::<u32>() {
                Ok(_) if value.tag() != Tag::Compound => {
                    format!("expected compound, found {}", value.tag())
                }
                Ok(offset) if (offset as usize) < size.volume() => {
                    data.insert(offset, value.clone());
                    continue;
                }
                Ok(_) => format!("offset outside structure of size {}", size),
                Err(_) => "key is not an offset".to_owned(),
            };

            self.report(Diagnostic::PositionData {
                palette: palette.to_owned(),
                key: key.clone(),
                reason,
            });
        }

        Ok(data)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

fn compound<'v>(tag: &str, value: Option<&'v Value>) -> Result<&'v Compound> {
    match value {
        Some(Value::Compound(c)) => Ok(c),
        Some(other) => Err(Error::format(
            tag,
            format!("expected compound, found {}", other.tag()),
        )),
        None => Err(Error::format(tag, "missing")),
    }
}

/// Elements of a list whose element tag must be `tag`. Empty lists written
/// with an `End` element tag are accepted too.
fn list_of<'v>(name: &str, value: &'v Value, tag: Tag) -> Result<&'v [Value]> {
    match value.as_list() {
        Some((t, items)) if t == tag || items.is_empty() => Ok(items),
        Some((t, _)) => Err(Error::format(
            name,
            format!("expected list of {}, found list of {}", tag, t),
        )),
        None => Err(Error::format(
            name,
            format!("expected list, found {}", value.tag()),
        )),
    }
}

fn int_list(name: &str, value: &Value) -> Result<Vec<i32>> {
    Ok(list_of(name, value, Tag::Int)?
        .iter()
        .filter_map(Value::as_int)
        .collect())
}

fn vec3(name: &str, value: &Value) -> Result<[i32; 3]> {
    let values = int_list(name, value)?;
    match values[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => Err(Error::format(
            name,
            format!("expected 3 entries, found {}", values.len()),
        )),
    }
}

fn block_indices(structure: &Compound) -> Result<Vec<Vec<i32>>> {
    let value = structure
        .get("block_indices")
        .ok_or_else(|| Error::format("block_indices", "missing"))?;

    list_of("block_indices", value, Tag::List)?
        .iter()
        .map(|layer| int_list("block_indices", layer))
        .collect()
}

fn entities(structure: &Compound) -> Result<Vec<Value>> {
    match structure.get("entities") {
        Some(value) => Ok(list_of("entities", value, Tag::Compound)?.to_vec()),
        None => Ok(Vec::new()),
    }
}

fn block_palette<'v>(name: &str, palette: &'v Compound) -> Result<&'v [Value]> {
    match palette.get("block_palette") {
        Some(value) => list_of("block_palette", value, Tag::Compound),
        None => Err(Error::format(
            "block_palette",
            format!("missing from palette '{}'", name),
        )),
    }
}
