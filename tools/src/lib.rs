use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use mcstructure::{BlockPos, BlockStateCodec, Diagnostic, Size, StateValue, Structure};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug)]
pub struct ErrorMessage(pub String);
impl std::error::Error for ErrorMessage {}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a block state attribute value as typed on the command line.
///
/// `true`/`false` and numbers with a `b` suffix are bytes, other numbers are
/// ints and anything else is a string.
pub fn parse_state_value(s: &str) -> StateValue {
    match s {
        "true" => return StateValue::Byte(1),
        "false" => return StateValue::Byte(0),
        _ => {}
    }

    if let Some(b) = s.strip_suffix('b').and_then(|b| b.parse::<i8>().ok()) {
        return StateValue::Byte(b);
    }

    match s.parse::<i32>() {
        Ok(i) => StateValue::Int(i),
        Err(_) => StateValue::String(s.to_owned()),
    }
}

/// Parse `key=value` into an attribute and its value.
pub fn parse_assignment(s: &str) -> Result<(String, StateValue)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| ErrorMessage(format!("expected key=value, got '{}'", s)))?;
    if key.is_empty() {
        return Err(Box::new(ErrorMessage(format!("empty key in '{}'", s))));
    }
    Ok((key.to_owned(), parse_state_value(value)))
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub size: Size,
    pub world_origin: BlockPos,
    pub palette: String,
    pub layers: Vec<LayerSummary>,
    pub block_entities: usize,
    pub entities: usize,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct LayerSummary {
    /// Voxel count per block state, keyed by the state's description.
    pub blocks: BTreeMap<String, usize>,
    pub void: usize,
}

/// Describe a structure for humans. States the codec cannot describe are
/// counted under their ID.
pub fn summarise<C>(structure: &Structure, codec: &C, diagnostics: &[Diagnostic]) -> Summary
where
    C: BlockStateCodec + ?Sized,
{
    let layers = (0..structure.layers().len())
        .filter_map(|i| structure.blocks(i).ok())
        .map(|blocks| {
            let mut layer = LayerSummary::default();
            for (_, state) in blocks {
                match state {
                    Some(id) => {
                        let name = match codec.serialize(id) {
                            Ok(state) => state.to_string(),
                            Err(_) => format!("#{}", id),
                        };
                        *layer.blocks.entry(name).or_default() += 1;
                    }
                    None => layer.void += 1,
                }
            }
            layer
        })
        .collect();

    Summary {
        size: structure.size(),
        world_origin: structure.world_origin,
        palette: structure
            .active_palette()
            .map(|(name, _)| name.to_owned())
            .unwrap_or_default(),
        layers,
        block_entities: structure.block_entities().len(),
        entities: structure.entities.len(),
        diagnostics: diagnostics.iter().map(|d| d.to_string()).collect(),
    }
}

#[cfg(test)]
mod test {
    use mcstructure::{BlockStateRef, StateRegistry};

    use super::*;

    #[test]
    fn state_values() {
        assert_eq!(parse_state_value("true"), StateValue::Byte(1));
        assert_eq!(parse_state_value("3b"), StateValue::Byte(3));
        assert_eq!(parse_state_value("-12"), StateValue::Int(-12));
        assert_eq!(parse_state_value("oak"), StateValue::String("oak".into()));
        assert_eq!(parse_state_value("300b"), StateValue::String("300b".into()));
    }

    #[test]
    fn assignments() {
        let (key, value) = parse_assignment("direction=2").unwrap();
        assert_eq!(key, "direction");
        assert_eq!(value, StateValue::Int(2));

        assert!(parse_assignment("direction").is_err());
        assert!(parse_assignment("=2").is_err());
    }

    #[test]
    fn summary_counts() {
        let registry = StateRegistry::open();
        let stone = registry
            .deserialize(&BlockStateRef::new("minecraft:stone"))
            .unwrap();
        let mut structure = Structure::new(Size::new(2, 1, 2));
        structure
            .set_block(0, BlockPos::new(0, 0, 0), Some(stone))
            .unwrap();
        structure
            .set_block(0, BlockPos::new(1, 0, 1), Some(stone))
            .unwrap();

        let summary = summarise(&structure, &registry, &[]);

        assert_eq!(summary.palette, "default");
        assert_eq!(summary.layers.len(), 1);
        assert_eq!(summary.layers[0].blocks["minecraft:stone"], 2);
        assert_eq!(summary.layers[0].void, 2);
    }
}
