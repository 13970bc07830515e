//! Allows streaming of little-endian NBT data without prior knowledge of the
//! structure.

use super::Tag;
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::{convert::TryFrom, io::Read};

/// An optional `String`.
pub type Name = Option<String>;

/// A shallow NBT value.
///
/// For every value except compounds and lists, this contains the value of the tag. For example, a `Value::Byte` will
/// contain the name and the byte of that NBT tag.
///
/// The name part of each variant is optional, since elements in an NBT list do not have names. The end of lists do not
/// have a name in the binary format, so it isn't included here either.
///
/// See `Parser` for more information.
#[derive(Debug, PartialEq)]
pub enum Value {
    CompoundEnd,
    Byte(Name, i8),
    Short(Name, i16),
    Int(Name, i32),
    Long(Name, i64),
    Float(Name, f32),
    Double(Name, f64),
    ByteArray(Name, Vec<i8>),
    String(Name, String),
    List(Name, Tag, i32),
    ListEnd,
    Compound(Name),
    IntArray(Name, Vec<i32>),
    LongArray(Name, Vec<i64>),
}

/// Parser can take any reader and parse it as little-endian NBT data. Does not
/// do decompression, `.mcstructure` files are stored raw.
///
/// # Example
///
/// The following dumps a structure file in Rust's `Debug` format, with some
/// indentation to help see the structure.
///
/// ```no_run
/// use mcstructure_nbt::stream::{Parser, Value};
///
/// let file = std::fs::File::open("house.mcstructure").unwrap();
/// let mut parser = Parser::new(file);
/// let mut indent = 0;
///
/// loop {
///     match parser.next() {
///         Err(e) => {
///             println!("{:?}", e);
///             break;
///         }
///         Ok(value) => {
///             match value {
///                 Value::CompoundEnd => indent -= 4,
///                 Value::ListEnd => indent -= 4,
///                 _ => {}
///             }
///
///             println!("{:indent$}{:?}", "", value, indent = indent);
///
///             match value {
///                 Value::Compound(_) => indent += 4,
///                 Value::List(_, _, _) => indent += 4,
///                 _ => {}
///             }
///         }
///     }
/// }
/// ```
pub struct Parser<R: Read> {
    reader: R,
    layers: Vec<Layer>,
}

impl<R: Read> Parser<R> {
    /// Create new parser for the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            layers: Vec::new(),
        }
    }

    /// Parse the next value from the input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Value> {
        self.next_inner()
    }

    /// Gets a reference to the underlying value in this parser.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the underlying value in this parser.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this parser, returning the underlying value.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// How many compounds and lists the parser is currently inside.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Get the next value from the reader. Returns EOF if the stream ended sucessfully, and
    /// IO(err) for any other IO error.
    fn next_inner(&mut self) -> Result<Value> {
        if let Some(Layer::List(_, 0)) = self.layers.last() {
            self.layers.pop();
            return Ok(Value::ListEnd);
        }

        if let Some(Layer::List(tag, remainder)) = self.layers.last_mut() {
            *remainder -= 1;
            let tag = *tag;
            return self.read_payload(tag, None);
        }

        // If we get EOF reading a tag, it means we completed a tag to get here, so this is a
        // natural end of stream.
        let tag = match self.reader.read_u8() {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(if self.layers.is_empty() {
                    Error::eof()
                } else {
                    Error::unexpected_eof()
                });
            }
            Err(e) => return Err(e.into()),
        };

        let tag = u8_to_tag(tag)?;

        if tag == Tag::End {
            // End tags have no name or value.
            return match self.layers.last() {
                Some(Layer::Compound) => {
                    self.layers.pop();
                    Ok(Value::CompoundEnd)
                }
                _ => Err(Error::bespoke("end tag outside of compound")),
            };
        }

        let name = Some(self.read_size_prefixed_string()?);

        self.read_payload(tag, name)
    }

    fn read_size_prefixed_string(&mut self) -> Result<String> {
        let len = self.reader.read_u16::<LittleEndian>()? as usize;

        let mut buf = vec![0; len];
        self.reader.read_exact(&mut buf[..])?;

        String::from_utf8(buf).map_err(|e| Error::nonunicode(e.into_bytes()))
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.reader.read_i32::<LittleEndian>()?;
        usize::try_from(len).map_err(|_| Error::bespoke(format!("negative length: {}", len)))
    }

    fn read_payload(&mut self, tag: Tag, name: Name) -> Result<Value> {
        match tag {
            Tag::Byte => Ok(Value::Byte(name, self.reader.read_i8()?)),
            Tag::Short => Ok(Value::Short(name, self.reader.read_i16::<LittleEndian>()?)),
            Tag::Int => Ok(Value::Int(name, self.reader.read_i32::<LittleEndian>()?)),
            Tag::Long => Ok(Value::Long(name, self.reader.read_i64::<LittleEndian>()?)),
            Tag::Float => Ok(Value::Float(name, self.reader.read_f32::<LittleEndian>()?)),
            Tag::Double => Ok(Value::Double(name, self.reader.read_f64::<LittleEndian>()?)),
            Tag::Compound => {
                self.layers.push(Layer::Compound);
                Ok(Value::Compound(name))
            }
            Tag::End => Err(Error::bespoke("unexpected end tag payload")),
            Tag::List => {
                let element_tag = self.reader.read_u8()?;
                let element_tag = u8_to_tag(element_tag)?;
                let size = self.reader.read_i32::<LittleEndian>()?;
                if size < 0 {
                    return Err(Error::bespoke(format!("negative list length: {}", size)));
                }
                self.layers.push(Layer::List(element_tag, size));
                Ok(Value::List(name, element_tag, size))
            }
            Tag::String => Ok(Value::String(name, self.read_size_prefixed_string()?)),
            Tag::ByteArray => {
                let size = self.read_len()?;
                let mut buf = Vec::new();
                for _ in 0..size {
                    buf.push(self.reader.read_i8()?);
                }
                Ok(Value::ByteArray(name, buf))
            }
            Tag::IntArray => {
                let size = self.read_len()?;
                let mut buf = Vec::new();
                for _ in 0..size {
                    buf.push(self.reader.read_i32::<LittleEndian>()?);
                }
                Ok(Value::IntArray(name, buf))
            }
            Tag::LongArray => {
                let size = self.read_len()?;
                let mut buf = Vec::new();
                for _ in 0..size {
                    buf.push(self.reader.read_i64::<LittleEndian>()?);
                }
                Ok(Value::LongArray(name, buf))
            }
        }
    }
}

fn u8_to_tag(tag: u8) -> Result<Tag> {
    Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
}

#[derive(Clone)]
enum Layer {
    List(Tag, i32),
    Compound,
}
