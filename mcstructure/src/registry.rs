use std::cell::RefCell;

use indexmap::IndexMap;
use log::debug;
use mcstructure_nbt::Value;

use crate::palette::PaletteTable;
use crate::state::{BlockStateCodec, BlockStateRef, StateError, StateId, StateValue};

/// Name of the block Bedrock shows for states it does not know.
pub const UNKNOWN_BLOCK: &str = "minecraft:info_update";

/// A [`BlockStateCodec`] backed by an in-memory table. IDs are handed out in
/// registration order and [`UNKNOWN_BLOCK`] is always ID 0.
///
/// An *open* registry registers any well-formed state it is asked about,
/// which is what tools working on arbitrary files want. A *closed* registry
/// only knows the states it was built with, like a game server's block
/// registry does.
///
/// Not `Sync`: registration goes through a `RefCell`.
#[derive(Debug)]
pub struct StateRegistry {
    states: RefCell<PaletteTable<BlockStateRef>>,
    open: bool,
}

impl StateRegistry {
    /// A registry that accepts every well-formed state.
    pub fn open() -> Self {
        Self::with_mode(true)
    }

    /// A registry that only knows `states`, plus the unknown block.
    pub fn closed(states: impl IntoIterator<Item = BlockStateRef>) -> Self {
        let registry = Self::with_mode(false);
        for state in states {
            registry.register(state);
        }
        registry
    }

    fn with_mode(open: bool) -> Self {
        let mut table = PaletteTable::new();
        table.append(BlockStateRef::new(UNKNOWN_BLOCK));
        Self {
            states: RefCell::new(table),
            open,
        }
    }

    /// Register a state, returning its ID. Registering a state twice gives
    /// back the first ID, and the version it was first registered with is
    /// the one [`BlockStateCodec::serialize`] returns.
    pub fn register(&self, state: BlockStateRef) -> StateId {
        self.states.borrow_mut().append(state) as StateId
    }

    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::open()
    }
}

impl BlockStateCodec for StateRegistry {
    fn deserialize(&self, state: &BlockStateRef) -> Result<StateId, StateError> {
        if let Some(id) = self.states.borrow().lookup(state) {
            return Ok(id as StateId);
        }

        if !self.open {
            return Err(StateError::new(format!("unknown block state {}", state)));
        }
        if !state.name.contains(':') {
            return Err(StateError::new(format!(
                "block name '{}' has no namespace",
                state.name
            )));
        }

        let id = self.register(state.clone());
        debug!("registered block state {} as {}", state, id);
        Ok(id)
    }

    fn serialize(&self, id: StateId) -> Result<BlockStateRef, StateError> {
        self.states
            .borrow()
            .get(id as usize)
            .cloned()
            .ok_or_else(|| StateError::new(format!("no block state with id {}", id)))
    }

    /// Understands the encodings older releases wrote:
    ///
    /// * `{ name, val: Short }`, the pre-1.13 numeric data value. The data
    ///   value has no attribute mapping here, so it is dropped.
    /// * a missing `states` compound,
    /// * names without the `minecraft:` namespace.
    fn upgrade(&self, raw: &Value) -> Result<BlockStateRef, StateError> {
        let compound = raw
            .as_compound()
            .ok_or_else(|| StateError::new(format!("expected compound, found {}", raw.tag())))?;

        let name = compound
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| StateError::new("legacy block state without a name"))?;
        let name = if name.contains(':') {
            name.to_owned()
        } else {
            format!("minecraft:{}", name)
        };

        let mut states = IndexMap::new();
        if let Some(raw_states) = compound.get("states") {
            let raw_states = raw_states
                .as_compound()
                .ok_or_else(|| StateError::new(format!("{}: 'states' is not a compound", name)))?;
            for (key, value) in raw_states {
                let value = match value {
                    Value::Byte(b) => StateValue::Byte(*b),
                    Value::Short(s) => StateValue::Int(*s as i32),
                    Value::Int(i) => StateValue::Int(*i),
                    Value::String(s) => StateValue::String(s.clone()),
                    other => {
                        return Err(StateError::new(format!(
                            "{}: state '{}' has unsupported type {}",
                            name,
                            key,
                            other.tag()
                        )))
                    }
                };
                states.insert(key.clone(), value);
            }
        }

        Ok(BlockStateRef {
            name,
            states,
            version: None,
        })
    }

    fn unknown_state(&self) -> BlockStateRef {
        BlockStateRef::new(UNKNOWN_BLOCK)
    }
}
