//! mcstructure-nbt reads and writes the little-endian NBT used by *Minecraft:
//! Bedrock Edition* files such as `.mcstructure` exports and `level.dat`.
//!
//! * For a low level event parser see [`stream`].
//! * For an owned tree of tags see [`Value`], with [`from_bytes`] and
//!   [`to_bytes`] converting to and from the binary form.
//!
//! The encoding is the same tag set as the Java Edition format, but every
//! multi-byte number, including the `u16` string length prefixes, is little
//! endian and strings are plain UTF-8 rather than Java's modified UTF-8.
//!
//! # Quick example
//!
//! ```
//! use mcstructure_nbt::{from_bytes, to_bytes, Compound, Value};
//!
//! let mut root = Compound::new();
//! root.insert("format_version".to_owned(), Value::Int(1));
//!
//! let bytes = to_bytes(&root).unwrap();
//! let back = from_bytes(&bytes).unwrap();
//! assert_eq!(back["format_version"], 1);
//! ```

pub mod error;
pub mod ser;
pub mod stream;

mod value;

pub use error::{Error, ErrorKind, Result};
pub use ser::to_bytes;
pub use value::*;

#[cfg(test)]
mod test;

use std::convert::TryFrom;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all elements share one tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Written out by hand rather than pulling in a derive crate, the tags will
// very rarely change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tag::End => "End",
            Tag::Byte => "Byte",
            Tag::Short => "Short",
            Tag::Int => "Int",
            Tag::Long => "Long",
            Tag::Float => "Float",
            Tag::Double => "Double",
            Tag::ByteArray => "ByteArray",
            Tag::String => "String",
            Tag::List => "List",
            Tag::Compound => "Compound",
            Tag::IntArray => "IntArray",
            Tag::LongArray => "LongArray",
        };
        f.write_str(name)
    }
}

/// Parse a complete NBT document from `input`. The root must be a compound;
/// its name (empty in every Bedrock file seen so far) is discarded.
pub fn from_bytes(input: &[u8]) -> Result<Compound> {
    let mut parser = stream::Parser::new(input);
    let root = value::read_root(&mut parser)?;

    if !parser.get_ref().is_empty() {
        return Err(Error::bespoke(format!(
            "trailing data: {} bytes after root compound",
            parser.get_ref().len()
        )));
    }

    Ok(root)
}
