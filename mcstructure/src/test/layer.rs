use crate::{BlockPos, Error, Result, Size, VoxelLayer, VOID};

#[test]
fn new_layer_is_void() {
    let layer = VoxelLayer::new(Size::new(2, 2, 2));

    assert_eq!(layer.indices(), [VOID; 8]);
    assert!(layer.palette().is_empty());
    assert_eq!(layer.get(BlockPos::new(1, 1, 1)).unwrap(), None);
}

#[test]
fn set_get() -> Result<()> {
    let mut layer = VoxelLayer::new(Size::new(2, 2, 2));

    layer.set(BlockPos::new(1, 0, 1), Some(7))?;
    layer.set(BlockPos::new(0, 1, 0), Some(9))?;
    layer.set(BlockPos::new(1, 1, 1), Some(7))?;

    assert_eq!(layer.get(BlockPos::new(1, 0, 1))?, Some(7));
    assert_eq!(layer.get(BlockPos::new(0, 1, 0))?, Some(9));
    assert_eq!(layer.get(BlockPos::new(0, 0, 0))?, None);
    assert_eq!(layer.palette().len(), 2);
    Ok(())
}

#[test]
fn set_void() -> Result<()> {
    let mut layer = VoxelLayer::new(Size::new(1, 1, 1));

    layer.set(BlockPos::new(0, 0, 0), Some(3))?;
    layer.set(BlockPos::new(0, 0, 0), None)?;

    assert_eq!(layer.get(BlockPos::new(0, 0, 0))?, None);
    Ok(())
}

#[test]
fn out_of_bounds() {
    let mut layer = VoxelLayer::new(Size::new(2, 2, 2));

    assert!(matches!(
        layer.get(BlockPos::new(2, 0, 0)),
        Err(Error::OutOfBounds(..))
    ));
    assert!(matches!(
        layer.set(BlockPos::new(0, -1, 0), Some(1)),
        Err(Error::OutOfBounds(..))
    ));
}

#[test]
fn replace_all_redirects_every_voxel() -> Result<()> {
    let size = Size::new(2, 1, 2);
    let mut layer = VoxelLayer::new(size);
    for pos in size.positions() {
        layer.set(pos, Some(1))?;
    }
    layer.set(BlockPos::new(0, 0, 0), Some(2))?;

    layer.replace_all(1, Some(5));

    assert_eq!(layer.get(BlockPos::new(0, 0, 0))?, Some(2));
    assert_eq!(layer.get(BlockPos::new(1, 0, 1))?, Some(5));
    // The old entry lingers until garbage collection.
    assert_eq!(layer.palette().len(), 3);
    Ok(())
}

#[test]
fn replace_all_to_void() -> Result<()> {
    let mut layer = VoxelLayer::new(Size::new(2, 1, 1));
    layer.set(BlockPos::new(0, 0, 0), Some(1))?;
    layer.set(BlockPos::new(1, 0, 0), Some(2))?;

    layer.replace_all(1, None);

    assert_eq!(layer.get(BlockPos::new(0, 0, 0))?, None);
    assert_eq!(layer.get(BlockPos::new(1, 0, 0))?, Some(2));
    Ok(())
}

#[test]
fn replace_all_missing_state_does_nothing() -> Result<()> {
    let mut layer = VoxelLayer::new(Size::new(1, 1, 1));
    layer.set(BlockPos::new(0, 0, 0), Some(1))?;
    let before = layer.clone();

    layer.replace_all(42, Some(1));

    assert_eq!(layer, before);
    Ok(())
}

#[test]
fn collect_garbage_renumbers() -> Result<()> {
    let mut layer = VoxelLayer::new(Size::new(3, 1, 1));
    layer.set(BlockPos::new(0, 0, 0), Some(10))?;
    layer.set(BlockPos::new(1, 0, 0), Some(20))?;
    layer.set(BlockPos::new(2, 0, 0), Some(30))?;
    layer.set(BlockPos::new(1, 0, 0), None)?;

    layer.collect_garbage();

    assert_eq!(layer.palette().iter().copied().collect::<Vec<_>>(), [10, 30]);
    assert_eq!(layer.indices(), [0, VOID, 1]);
    assert_eq!(layer.get(BlockPos::new(2, 0, 0))?, Some(30));
    Ok(())
}

#[test]
fn collect_garbage_is_idempotent() -> Result<()> {
    let mut layer = VoxelLayer::new(Size::new(2, 1, 1));
    layer.set(BlockPos::new(0, 0, 0), Some(1))?;
    layer.set(BlockPos::new(0, 0, 0), Some(2))?;

    layer.collect_garbage();
    let once = layer.clone();
    layer.collect_garbage();

    assert_eq!(layer, once);
    Ok(())
}

#[test]
fn collect_garbage_voids_dangling_indices() {
    let size = Size::new(2, 1, 1);
    let mut layer = VoxelLayer::from_parts(size, [4].into_iter().collect(), vec![0, 5]);

    layer.collect_garbage();

    assert_eq!(layer.indices(), [0, VOID]);
}
