use std::collections::HashMap;

use log::{debug, warn};
use mcstructure_nbt::{Compound, Tag, Value};

use crate::diagnostic::Diagnostic;
use crate::layer::VOID;
use crate::state::{BlockStateCodec, StateId};
use crate::structure::Structure;
use crate::{Result, DEFAULT_PALETTE};

/// Writes structures, describing block states through a [`BlockStateCodec`].
///
/// The output has a single palette, named after the structure's active
/// palette, holding only the states some voxel uses.
pub struct Writer<'a, C: BlockStateCodec + ?Sized> {
    codec: &'a C,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, C: BlockStateCodec + ?Sized> Writer<'a, C> {
    pub fn new(codec: &'a C) -> Self {
        Self {
            codec,
            diagnostics: Vec::new(),
        }
    }

    /// Problems worked around by the writes so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn write(&mut self, structure: &Structure) -> Result<Vec<u8>> {
        let root = self.to_nbt(structure)?;
        Ok(mcstructure_nbt::to_bytes(&root)?)
    }

    /// The root compound [`Writer::write`] would serialize.
    pub fn to_nbt(&mut self, structure: &Structure) -> Result<Compound> {
        structure.check()?;
        let size = structure.size();

        let mut block_palette = Vec::new();
        // State to output palette index, VOID for states that failed.
        let mut output: HashMap<StateId, i32> = HashMap::new();
        let mut block_indices = Vec::with_capacity(structure.layers().len());

        for layer in structure.layers() {
            let mut layer = layer.clone();
            layer.collect_garbage();

            let mut remap = Vec::with_capacity(layer.palette().len());
            for &id in layer.palette() {
                let index = match output.get(&id) {
                    Some(&index) => index,
                    None => {
                        let index = match self.codec.serialize(id) {
                            Ok(state) => {
                                block_palette.push(state.to_nbt());
                                block_palette.len() as i32 - 1
                            }
                            Err(reason) => {
                                self.report(Diagnostic::StateSerialization { state: id, reason });
                                VOID
                            }
                        };
                        output.insert(id, index);
                        index
                    }
                };
                remap.push(index);
            }

            let indices = size.positions().map(|pos| {
                let index = size
                    .offset(pos)
                    .and_then(|offset| layer.indices().get(offset))
                    .copied()
                    .unwrap_or(VOID);
                usize::try_from(index)
                    .ok()
                    .and_then(|i| remap.get(i))
                    .copied()
                    .unwrap_or(VOID)
            });
            block_indices.push(Value::int_list(indices));
        }

        let (palette_name, existing) = match structure.active_palette() {
            Some((name, palette)) => (name, Some(palette)),
            None => (DEFAULT_PALETTE, None),
        };

        let mut position_data = Compound::new();
        for (&pos, entity) in structure.block_entities() {
            let offset = match size.offset(pos) {
                Some(offset) => offset,
                None => {
                    self.report(Diagnostic::BlockEntityOutOfBounds { pos });
                    continue;
                }
            };

            // Keep whatever else the file had for this voxel.
            let mut data = existing
                .and_then(|p| p.position_data.get(&(offset as u32)))
                .and_then(Value::as_compound)
                .cloned()
                .unwrap_or_default();
            data.insert("block_entity_data".to_owned(), entity.clone());
            position_data.insert(offset.to_string(), Value::Compound(data));
        }

        debug!(
            "writing structure of size {} with {} layers, {} palette entries, {} block entities",
            size,
            block_indices.len(),
            block_palette.len(),
            position_data.len()
        );

        let mut palette = Compound::new();
        palette.insert(
            "block_palette".to_owned(),
            Value::List(Tag::Compound, block_palette),
        );
        palette.insert(
            "block_position_data".to_owned(),
            Value::Compound(position_data),
        );

        let mut palettes = Compound::new();
        palettes.insert(palette_name.to_owned(), Value::Compound(palette));

        let mut inner = Compound::new();
        inner.insert(
            "block_indices".to_owned(),
            Value::List(Tag::List, block_indices),
        );
        inner.insert(
            "entities".to_owned(),
            Value::List(Tag::Compound, structure.entities.clone()),
        );
        inner.insert("palette".to_owned(), Value::Compound(palettes));

        let origin = structure.world_origin;
        let mut root = Compound::new();
        root.insert(
            "format_version".to_owned(),
            Value::Int(structure.format_version),
        );
        root.insert(
            "size".to_owned(),
            Value::int_list([size.x as i32, size.y as i32, size.z as i32]),
        );
        root.insert("structure".to_owned(), Value::Compound(inner));
        root.insert(
            "structure_world_origin".to_owned(),
            Value::int_list([origin.x, origin.y, origin.z]),
        );

        Ok(root)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
