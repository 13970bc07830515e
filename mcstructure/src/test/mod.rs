use mcstructure_nbt::{Compound, Tag, Value};

use crate::{
    BlockStateCodec, BlockStateRef, Error, StateError, StateId, StateRegistry, ValidationError,
};

mod layer;
mod registry;

#[test]
fn format_error_names_tag() {
    let err = Error::format("size", "expected 3 entries, found 2");
    assert_eq!(
        err.to_string(),
        "invalid structure: 'size': expected 3 entries, found 2"
    );
}

#[test]
fn layer_error_names_layer() {
    let err = Error::from(ValidationError::LayerLength {
        layer: 1,
        expected: 8,
        actual: 7,
    });
    assert_eq!(
        err.to_string(),
        "invalid structure: layer 1 has 7 block indices, expected 8"
    );
}

/// Root compound of a structure file with one palette called `default`.
fn structure_nbt(size: [i32; 3], palette: Vec<Value>, layers: Vec<Vec<i32>>) -> Compound {
    let mut default = Compound::new();
    default.insert("block_palette".into(), Value::List(Tag::Compound, palette));
    default.insert("block_position_data".into(), Value::Compound(Compound::new()));

    let mut palettes = Compound::new();
    palettes.insert("default".into(), Value::Compound(default));

    let mut structure = Compound::new();
    structure.insert(
        "block_indices".into(),
        Value::List(Tag::List, layers.into_iter().map(Value::int_list).collect()),
    );
    structure.insert("entities".into(), Value::List(Tag::Compound, vec![]));
    structure.insert("palette".into(), Value::Compound(palettes));

    let mut root = Compound::new();
    root.insert("format_version".into(), Value::Int(1));
    root.insert("size".into(), Value::int_list(size));
    root.insert("structure".into(), Value::Compound(structure));
    root.insert("structure_world_origin".into(), Value::int_list([0, 0, 0]));
    root
}

fn block(name: &str) -> Value {
    BlockStateRef::new(name).to_nbt()
}

fn to_bytes(root: &Compound) -> Vec<u8> {
    mcstructure_nbt::to_bytes(root).unwrap()
}

/// Mutable access to a nested compound, for breaking files in tests.
fn compound_mut<'a>(root: &'a mut Compound, path: &[&str]) -> &'a mut Compound {
    let mut compound = root;
    for key in path {
        compound = compound.get_mut(*key).unwrap().as_compound_mut().unwrap();
    }
    compound
}

/// Registry that fails to read or to write some block names.
struct Picky {
    inner: StateRegistry,
    unreadable: Vec<&'static str>,
    unwritable: Vec<&'static str>,
}

impl Picky {
    fn unreadable(names: &[&'static str]) -> Self {
        Self {
            inner: StateRegistry::open(),
            unreadable: names.to_vec(),
            unwritable: vec![],
        }
    }

    fn unwritable(names: &[&'static str]) -> Self {
        Self {
            inner: StateRegistry::open(),
            unreadable: vec![],
            unwritable: names.to_vec(),
        }
    }
}

fn refuse(names: &[&str], state: &BlockStateRef) -> Result<(), StateError> {
    if names.contains(&state.name.as_str()) {
        Err(StateError::new(format!("{} refused", state.name)))
    } else {
        Ok(())
    }
}

impl BlockStateCodec for Picky {
    fn deserialize(&self, state: &BlockStateRef) -> Result<StateId, StateError> {
        refuse(&self.unreadable, state)?;
        self.inner.deserialize(state)
    }

    fn serialize(&self, id: StateId) -> Result<BlockStateRef, StateError> {
        let state = self.inner.serialize(id)?;
        refuse(&self.unwritable, &state)?;
        Ok(state)
    }

    fn upgrade(&self, raw: &Value) -> Result<BlockStateRef, StateError> {
        self.inner.upgrade(raw)
    }

    fn unknown_state(&self) -> BlockStateRef {
        self.inner.unknown_state()
    }
}
