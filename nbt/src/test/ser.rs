use super::builder::Builder;
use crate::error::Result;
use crate::{from_bytes, to_bytes, Compound, Tag, Value};

#[test]
fn writes_little_endian_root() -> Result<()> {
    let mut root = Compound::new();
    root.insert("format_version".to_owned(), Value::Int(1));

    let expected = Builder::new()
        .start_compound("")
        .int("format_version", 1)
        .end_compound()
        .build();

    assert_eq!(to_bytes(&root)?, expected);
    Ok(())
}

#[test]
fn writes_lists_with_element_tag() -> Result<()> {
    let mut root = Compound::new();
    root.insert("size".to_owned(), Value::int_list([2, 2, 2]));
    root.insert("entities".to_owned(), Value::compound_list(vec![]));

    let expected = Builder::new()
        .start_compound("")
        .start_list("size", Tag::Int, 3)
        .int_payload(2)
        .int_payload(2)
        .int_payload(2)
        .start_list("entities", Tag::Compound, 0)
        .end_compound()
        .build();

    assert_eq!(to_bytes(&root)?, expected);
    Ok(())
}

#[test]
fn mixed_list_is_rejected() {
    let mut root = Compound::new();
    root.insert(
        "bad".to_owned(),
        Value::List(Tag::Int, vec![Value::Int(1), Value::Byte(2)]),
    );

    assert!(to_bytes(&root).is_err());
}

#[test]
fn overlong_string_is_rejected() {
    let mut root = Compound::new();
    root.insert("s".to_owned(), Value::String("x".repeat(70_000)));

    assert!(to_bytes(&root).is_err());
}

#[test]
fn bytes_survive_parse_and_write() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .int("format_version", 1)
        .start_list("size", Tag::Int, 3)
        .int_payload(1)
        .int_payload(2)
        .int_payload(3)
        .start_compound("structure")
        .start_list("block_indices", Tag::List, 1)
        .start_anon_list(Tag::Int, 2)
        .int_payload(0)
        .int_payload(-1)
        .long("l", -5)
        .short("s", 7)
        .float("f", 0.25)
        .int_array("ia", &[9, 8])
        .end_compound()
        .end_compound()
        .build();

    let root = from_bytes(&payload)?;
    assert_eq!(to_bytes(&root)?, payload);
    Ok(())
}
