use super::builder::Builder;
use crate::error::{ErrorKind, Result};
use crate::stream::{Name, Parser, Value};
use crate::Tag;

fn name(n: &str) -> Name {
    Some(n.to_owned())
}

#[test]
fn empty_payload() {
    let payload = Builder::new().build();
    let mut parser = Parser::new(payload.as_slice());

    let value = parser.next();
    assert!(value.unwrap_err().is_eof());
}

#[test]
fn simple_byte() -> Result<()> {
    let payload = Builder::new().byte("abc", 123).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::Byte(name("abc"), 123));
    Ok(())
}

#[test]
fn int_is_little_endian() -> Result<()> {
    let payload = Builder::new()
        .tag(Tag::Int)
        .name("format_version")
        .raw_bytes(&[0x01, 0x00, 0x00, 0x00])
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::Int(name("format_version"), 1));
    Ok(())
}

#[test]
fn name_length_is_little_endian() -> Result<()> {
    let payload = Builder::new()
        .tag(Tag::Short)
        .raw_bytes(&[0x02, 0x00, b'h', b'i'])
        .short_payload(-2)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::Short(name("hi"), -2));
    Ok(())
}

#[test]
fn simple_long_and_float() -> Result<()> {
    let payload = Builder::new()
        .long("l", i32::MAX as i64 + 1)
        .float("f", 1.5)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::Long(name("l"), i32::MAX as i64 + 1));
    assert_eq!(parser.next()?, Value::Float(name("f"), 1.5));
    Ok(())
}

#[test]
fn string_payload_is_utf8() -> Result<()> {
    let payload = Builder::new().string("name", "minecraft:stone§").build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(
        parser.next()?,
        Value::String(name("name"), "minecraft:stone§".to_owned())
    );
    Ok(())
}

#[test]
fn nonunicode_string() {
    let payload = Builder::new()
        .tag(Tag::String)
        .name("s")
        .raw_bytes(&[0x02, 0x00, 0xff, 0xfe])
        .build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.next().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Nonunicode(_)));
}

#[test]
fn compound_of_list() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .start_list("size", Tag::Int, 3)
        .int_payload(1)
        .int_payload(2)
        .int_payload(3)
        .end_compound()
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::Compound(name("")));
    assert_eq!(parser.next()?, Value::List(name("size"), Tag::Int, 3));
    assert_eq!(parser.next()?, Value::Int(None, 1));
    assert_eq!(parser.next()?, Value::Int(None, 2));
    assert_eq!(parser.next()?, Value::Int(None, 3));
    assert_eq!(parser.next()?, Value::ListEnd);
    assert_eq!(parser.next()?, Value::CompoundEnd);
    assert!(parser.next().unwrap_err().is_eof());
    Ok(())
}

#[test]
fn list_of_lists() -> Result<()> {
    let payload = Builder::new()
        .start_list("block_indices", Tag::List, 2)
        .start_anon_list(Tag::Int, 1)
        .int_payload(-1)
        .start_anon_list(Tag::Int, 0)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::List(name("block_indices"), Tag::List, 2));
    assert_eq!(parser.next()?, Value::List(None, Tag::Int, 1));
    assert_eq!(parser.next()?, Value::Int(None, -1));
    assert_eq!(parser.next()?, Value::ListEnd);
    assert_eq!(parser.next()?, Value::List(None, Tag::Int, 0));
    assert_eq!(parser.next()?, Value::ListEnd);
    assert_eq!(parser.next()?, Value::ListEnd);
    Ok(())
}

#[test]
fn list_of_compounds() -> Result<()> {
    let payload = Builder::new()
        .start_list("block_palette", Tag::Compound, 1)
        .start_anon_compound()
        .string("name", "minecraft:dirt")
        .end_compound()
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(
        parser.next()?,
        Value::List(name("block_palette"), Tag::Compound, 1)
    );
    assert_eq!(parser.next()?, Value::Compound(None));
    assert_eq!(
        parser.next()?,
        Value::String(name("name"), "minecraft:dirt".to_owned())
    );
    assert_eq!(parser.next()?, Value::CompoundEnd);
    assert_eq!(parser.next()?, Value::ListEnd);
    Ok(())
}

#[test]
fn int_array() -> Result<()> {
    let payload = Builder::new().int_array("arr", &[1, -1, 300]).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(parser.next()?, Value::IntArray(name("arr"), vec![1, -1, 300]));
    Ok(())
}

#[test]
fn negative_list_length() {
    let payload = Builder::new().start_list("l", Tag::Int, -1).build();
    let mut parser = Parser::new(payload.as_slice());

    assert!(parser.next().is_err());
}

#[test]
fn invalid_tag() {
    let payload = Builder::new().raw_bytes(&[13]).build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.next().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidTag);
}

#[test]
fn eof_inside_compound_is_unexpected() {
    let payload = Builder::new().start_compound("").build();
    let mut parser = Parser::new(payload.as_slice());

    parser.next().unwrap();
    let err = parser.next().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}

#[test]
fn truncated_payload_is_unexpected_eof() {
    let payload = Builder::new()
        .tag(Tag::Int)
        .name("x")
        .raw_bytes(&[1, 0])
        .build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.next().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}

#[test]
fn stray_end_tag() {
    let payload = Builder::new().end_compound().build();
    let mut parser = Parser::new(payload.as_slice());

    assert!(parser.next().is_err());
}
