//! Block states and the codec that turns them into numeric IDs.

use std::fmt::Display;

use indexmap::IndexMap;
use mcstructure_nbt::{Compound, Value};
use serde::Serialize;

/// Numeric identifier of a block state, as handed out by a
/// [`BlockStateCodec`]. Stable for the lifetime of the codec.
pub type StateId = u32;

/// Block state version written alongside states that don't carry their own,
/// Bedrock 1.18.10.
pub const BLOCK_STATE_VERSION: i32 = 17_959_425;

/// The value of one block state attribute. Bedrock only uses these three tag
/// types for block states.
///
/// Serializes as the bare value, so bytes and ints look alike in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Byte(i8),
    Int(i32),
    String(String),
}

impl StateValue {
    /// Whether both values are the same scalar type.
    pub fn same_type(&self, other: &StateValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StateValue::Byte(_) => "byte",
            StateValue::Int(_) => "int",
            StateValue::String(_) => "string",
        }
    }

    fn from_nbt(value: &Value) -> Option<Self> {
        match value {
            Value::Byte(b) => Some(StateValue::Byte(*b)),
            Value::Int(i) => Some(StateValue::Int(*i)),
            Value::String(s) => Some(StateValue::String(s.clone())),
            _ => None,
        }
    }

    fn to_nbt(&self) -> Value {
        match self {
            StateValue::Byte(b) => Value::Byte(*b),
            StateValue::Int(i) => Value::Int(*i),
            StateValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl Display for StateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateValue::Byte(b) => write!(f, "{}b", b),
            StateValue::Int(i) => write!(f, "{}", i),
            StateValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Byte(i8::from(b))
    }
}

impl From<i32> for StateValue {
    fn from(i: i32) -> Self {
        StateValue::Int(i)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::String(s.to_owned())
    }
}

/// A block state description: the block's name and its ordered attributes,
/// eg `minecraft:stone_slab` with `top_slot_bit = 0b`.
///
/// Equality compares name and states only; the version says which game
/// release wrote the description and does not make it a different block.
#[derive(Debug, Clone, Eq, Serialize)]
pub struct BlockStateRef {
    pub name: String,
    pub states: IndexMap<String, StateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

impl PartialEq for BlockStateRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.states == other.states
    }
}

impl BlockStateRef {
    /// A state with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: IndexMap::new(),
            version: None,
        }
    }

    /// Add or replace an attribute, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.states.insert(key.into(), value.into());
        self
    }

    pub fn state(&self, key: &str) -> Option<&StateValue> {
        self.states.get(key)
    }

    /// Parse the current encoding, `{ name: String, states: Compound,
    /// version: Int }`. `version` is optional. Anything older is left to
    /// [`BlockStateCodec::upgrade`].
    pub fn from_nbt(value: &Value) -> Result<Self, StateError> {
        let compound = value
            .as_compound()
            .ok_or_else(|| StateError::new(format!("expected compound, found {}", value.tag())))?;

        let name = compound
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| StateError::new("missing string tag 'name'"))?;

        let raw_states = compound
            .get("states")
            .and_then(Value::as_compound)
            .ok_or_else(|| StateError::new(format!("{}: missing compound tag 'states'", name)))?;

        let mut states = IndexMap::new();
        for (key, raw) in raw_states {
            let value = StateValue::from_nbt(raw).ok_or_else(|| {
                StateError::new(format!(
                    "{}: state '{}' has unsupported type {}",
                    name,
                    key,
                    raw.tag()
                ))
            })?;
            states.insert(key.clone(), value);
        }

        let version = match compound.get("version") {
            None => None,
            Some(v) => Some(v.as_int().ok_or_else(|| {
                StateError::new(format!("{}: 'version' must be an int", name))
            })?),
        };

        Ok(Self {
            name: name.to_owned(),
            states,
            version,
        })
    }

    /// The compound written into a structure's `block_palette`.
    pub fn to_nbt(&self) -> Value {
        let mut states = Compound::new();
        for (key, value) in &self.states {
            states.insert(key.clone(), value.to_nbt());
        }

        let mut compound = Compound::new();
        compound.insert("name".to_owned(), Value::String(self.name.clone()));
        compound.insert("states".to_owned(), Value::Compound(states));
        compound.insert(
            "version".to_owned(),
            Value::Int(self.version.unwrap_or(BLOCK_STATE_VERSION)),
        );
        Value::Compound(compound)
    }
}

impl Display for BlockStateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if !self.states.is_empty() {
            f.write_str("[")?;
            let mut sep = "";
            for (k, v) in &self.states {
                write!(f, "{}{}={}", sep, k, v)?;
                sep = ",";
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Failure to resolve, serialize or upgrade one block state. Always
/// recoverable from the structure's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateError(String);

impl StateError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::error::Error for StateError {}

impl Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Moves block states between their description and a numeric ID. This is
/// the host's block registry; [`crate::StateRegistry`] is a self-contained
/// implementation.
pub trait BlockStateCodec {
    /// Resolve a description to its ID.
    fn deserialize(&self, state: &BlockStateRef) -> Result<StateId, StateError>;

    /// Describe the state with the given ID.
    fn serialize(&self, id: StateId) -> Result<BlockStateRef, StateError>;

    /// Convert an older encoding of a block state into the current one.
    fn upgrade(&self, raw: &Value) -> Result<BlockStateRef, StateError>;

    /// The state substituted for anything that cannot be resolved.
    fn unknown_state(&self) -> BlockStateRef;
}
