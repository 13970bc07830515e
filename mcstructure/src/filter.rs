//! Transforms over a [`VoxelLayer`]. Each returns a new layer and leaves its
//! input alone.
//!
//! Filters look at palette entries, not voxels: removing a state from a layer
//! is one pass over the voxels however many voxels hold it. Removed states
//! leave void voxels behind.
//!
//! ```
//! # use mcstructure::{filter, BlockPos, BlockStateCodec, BlockStateRef, Size, StateRegistry, VoxelLayer};
//! let registry = StateRegistry::open();
//! let stone = registry.deserialize(&BlockStateRef::new("minecraft:stone")).unwrap();
//! let dirt = registry.deserialize(&BlockStateRef::new("minecraft:dirt")).unwrap();
//!
//! let mut layer = VoxelLayer::new(Size::new(2, 1, 1));
//! layer.set(BlockPos::new(0, 0, 0), Some(stone)).unwrap();
//! layer.set(BlockPos::new(1, 0, 0), Some(dirt)).unwrap();
//!
//! let only_stone = filter::with_block_ids(&layer, &registry, &["minecraft:stone"]);
//! assert_eq!(only_stone.get(BlockPos::new(0, 0, 0)).unwrap(), Some(stone));
//! assert_eq!(only_stone.get(BlockPos::new(1, 0, 0)).unwrap(), None);
//! ```

use log::warn;

use crate::layer::VoxelLayer;
use crate::state::{BlockStateCodec, BlockStateRef, StateId, StateValue};

/// Keep only voxels holding one of `ids`.
pub fn with_state_ids(layer: &VoxelLayer, ids: &[StateId]) -> VoxelLayer {
    retain(layer, |id| ids.contains(&id))
}

/// Make voxels holding any of `ids` void.
pub fn except_state_ids(layer: &VoxelLayer, ids: &[StateId]) -> VoxelLayer {
    retain(layer, |id| !ids.contains(&id))
}

/// Keep only voxels whose block is one of `names`, eg `minecraft:stone`.
/// States the codec cannot describe are removed.
pub fn with_block_ids<C>(layer: &VoxelLayer, codec: &C, names: &[&str]) -> VoxelLayer
where
    C: BlockStateCodec + ?Sized,
{
    retain_described(layer, codec, |state| names.contains(&state.name.as_str()))
}

/// Make voxels whose block is one of `names` void. States the codec cannot
/// describe are removed too.
pub fn except_block_ids<C>(layer: &VoxelLayer, codec: &C, names: &[&str]) -> VoxelLayer
where
    C: BlockStateCodec + ?Sized,
{
    retain_described(layer, codec, |state| !names.contains(&state.name.as_str()))
}

/// Keep only voxels whose state has at least one of the attributes `keys`,
/// whatever its value.
pub fn with_block_states<C>(layer: &VoxelLayer, codec: &C, keys: &[&str]) -> VoxelLayer
where
    C: BlockStateCodec + ?Sized,
{
    retain_described(layer, codec, |state| {
        keys.iter().any(|key| state.states.contains_key(*key))
    })
}

/// Keep only voxels whose state has at least one of the attributes with
/// exactly the given value. Values of another type never match.
pub fn with_block_states_and_values<C>(
    layer: &VoxelLayer,
    codec: &C,
    states: &[(&str, StateValue)],
) -> VoxelLayer
where
    C: BlockStateCodec + ?Sized,
{
    retain_described(layer, codec, |state| {
        states
            .iter()
            .any(|(key, value)| state.state(key) == Some(value))
    })
}

/// Swap states for others. Pairs apply in order, so `[(a, b), (b, c)]`
/// turns both `a` and `b` into `c`.
pub fn replace_state_ids(layer: &VoxelLayer, pairs: &[(StateId, StateId)]) -> VoxelLayer {
    let mut layer = layer.clone();
    for &(from, to) in pairs {
        layer.replace_all(from, Some(to));
    }
    layer
}

/// Overwrite attributes of every state that has them, eg set `direction` to
/// `2` on all stairs. States without any of the attributes are left alone,
/// as are states the codec cannot describe or resolve after the change.
///
/// A state whose attribute has a different type than the new value is left
/// alone as a whole; the other states are still rewritten.
pub fn replace_block_states<C>(
    layer: &VoxelLayer,
    codec: &C,
    states: &[(&str, StateValue)],
) -> VoxelLayer
where
    C: BlockStateCodec + ?Sized,
{
    let mut out = layer.clone();

    'palette: for &id in layer.palette() {
        let current = match codec.serialize(id) {
            Ok(state) => state,
            Err(e) => {
                warn!("cannot replace states of state {}: {}", id, e);
                continue;
            }
        };

        let mut changed = current.clone();
        for (key, value) in states {
            if let Some(old) = changed.states.get_mut(*key) {
                if !old.same_type(value) {
                    warn!(
                        "not replacing {}: '{}' is {}, cannot set it to {}",
                        current,
                        key,
                        old.type_name(),
                        value
                    );
                    continue 'palette;
                }
                *old = value.clone();
            }
        }

        if changed == current {
            continue;
        }

        match codec.deserialize(&changed) {
            Ok(new_id) => out.replace_all(id, Some(new_id)),
            Err(e) => warn!("cannot replace {} with {}: {}", current, changed, e),
        }
    }

    out
}

fn retain(layer: &VoxelLayer, mut keep: impl FnMut(StateId) -> bool) -> VoxelLayer {
    let mut out = layer.clone();
    for &id in layer.palette() {
        if !keep(id) {
            out.replace_all(id, None);
        }
    }
    out
}

fn retain_described<C>(
    layer: &VoxelLayer,
    codec: &C,
    mut keep: impl FnMut(&BlockStateRef) -> bool,
) -> VoxelLayer
where
    C: BlockStateCodec + ?Sized,
{
    retain(layer, |id| match codec.serialize(id) {
        Ok(state) => keep(&state),
        Err(e) => {
            warn!("filter removed state {}, it cannot be described: {}", id, e);
            false
        }
    })
}
