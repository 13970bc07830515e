use mcstructure_nbt::{Compound, Value};

use crate::{BlockStateCodec, BlockStateRef, StateRegistry, StateValue, UNKNOWN_BLOCK};

#[test]
fn unknown_block_is_zero() {
    let registry = StateRegistry::open();
    let unknown = registry.unknown_state();

    assert_eq!(unknown.name, UNKNOWN_BLOCK);
    assert_eq!(registry.deserialize(&unknown), Ok(0));
}

#[test]
fn open_registry_registers_on_demand() {
    let registry = StateRegistry::open();
    let slab = BlockStateRef::new("minecraft:stone_slab").with("top_slot_bit", true);

    let id = registry.deserialize(&slab).unwrap();

    assert_eq!(id, 1);
    assert_eq!(registry.deserialize(&slab), Ok(1));
    assert_eq!(registry.serialize(id), Ok(slab));
    assert_eq!(registry.len(), 2);
}

#[test]
fn version_does_not_make_a_new_state() {
    let registry = StateRegistry::open();
    let mut old = BlockStateRef::new("minecraft:dirt");
    old.version = Some(17_825_808);

    let a = registry.deserialize(&old).unwrap();
    let b = registry.deserialize(&BlockStateRef::new("minecraft:dirt")).unwrap();

    assert_eq!(a, b);
}

#[test]
fn first_seen_version_is_kept() {
    let registry = StateRegistry::open();
    let mut newer = BlockStateRef::new("minecraft:dirt");
    newer.version = Some(18_100_737);

    let id = registry.deserialize(&newer).unwrap();
    registry
        .deserialize(&BlockStateRef::new("minecraft:dirt"))
        .unwrap();

    assert_eq!(registry.serialize(id).unwrap().version, Some(18_100_737));
    assert_eq!(
        registry.serialize(id).unwrap().to_nbt().as_compound().unwrap()["version"],
        18_100_737
    );
}

#[test]
fn open_registry_wants_namespace() {
    let registry = StateRegistry::open();

    assert!(registry.deserialize(&BlockStateRef::new("stone")).is_err());
}

#[test]
fn closed_registry_refuses_strangers() {
    let registry = StateRegistry::closed([BlockStateRef::new("minecraft:stone")]);

    assert_eq!(
        registry.deserialize(&BlockStateRef::new("minecraft:stone")),
        Ok(1)
    );
    assert!(registry
        .deserialize(&BlockStateRef::new("minecraft:dirt"))
        .is_err());
    assert_eq!(registry.len(), 2);
}

#[test]
fn serialize_unknown_id() {
    let registry = StateRegistry::open();

    assert!(registry.serialize(99).is_err());
}

#[test]
fn upgrade_legacy_data_value() {
    let registry = StateRegistry::open();
    let mut raw = Compound::new();
    raw.insert("name".into(), Value::String("wool".into()));
    raw.insert("val".into(), Value::Short(14));

    let state = registry.upgrade(&Value::Compound(raw)).unwrap();

    assert_eq!(state, BlockStateRef::new("minecraft:wool"));
}

#[test]
fn upgrade_widens_short_states() {
    let registry = StateRegistry::open();
    let mut states = Compound::new();
    states.insert("age".into(), Value::Short(3));
    let mut raw = Compound::new();
    raw.insert("name".into(), Value::String("minecraft:wheat".into()));
    raw.insert("states".into(), Value::Compound(states));

    let state = registry.upgrade(&Value::Compound(raw)).unwrap();

    assert_eq!(state.state("age"), Some(&StateValue::Int(3)));
}

#[test]
fn upgrade_rejects_nameless() {
    let registry = StateRegistry::open();

    assert!(registry.upgrade(&Value::Compound(Compound::new())).is_err());
    assert!(registry.upgrade(&Value::Int(1)).is_err());
}

#[test]
fn state_ref_nbt_shape() {
    let state = BlockStateRef::new("minecraft:stone_slab")
        .with("stone_slab_type", "smooth_stone")
        .with("top_slot_bit", false);

    let nbt = state.to_nbt();
    let compound = nbt.as_compound().unwrap();
    let keys: Vec<_> = compound.keys().map(String::as_str).collect();

    assert_eq!(keys, ["name", "states", "version"]);
    assert_eq!(compound["version"], crate::BLOCK_STATE_VERSION);
    assert_eq!(BlockStateRef::from_nbt(&nbt).unwrap(), state);
}

#[test]
fn state_ref_rejects_bad_state_type() {
    let mut states = Compound::new();
    states.insert("f".into(), Value::Float(1.0));
    let mut raw = Compound::new();
    raw.insert("name".into(), Value::String("minecraft:x".into()));
    raw.insert("states".into(), Value::Compound(states));

    assert!(BlockStateRef::from_nbt(&Value::Compound(raw)).is_err());
}

#[test]
fn state_ref_display() {
    let state = BlockStateRef::new("minecraft:wool")
        .with("color", "red")
        .with("lit", true);

    assert_eq!(state.to_string(), "minecraft:wool[color=\"red\",lit=1b]");
}

#[test]
fn state_ref_json() {
    let mut state = BlockStateRef::new("minecraft:wool")
        .with("color", "red")
        .with("age", 2)
        .with("lit", true);

    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(
        json,
        r#"{"name":"minecraft:wool","states":{"color":"red","age":2,"lit":1}}"#
    );

    state.version = Some(17_959_425);
    let json = serde_json::to_string(&state).unwrap();
    assert!(json.ends_with(r#","version":17959425}"#));
}
