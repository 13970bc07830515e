//! Writing of [`Value`] trees as little-endian NBT.

use std::convert::TryFrom;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::{Compound, Tag, Value};

/// Serialize a root compound into little-endian NBT. The root is written with
/// an empty name, as Bedrock does.
///
/// Fails if a list contains an element whose tag differs from the list's
/// element tag, or if a string or array is too long for its length prefix.
pub fn to_bytes(root: &Compound) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    to_writer(&mut out, root)?;
    Ok(out)
}

/// Serialize a root compound into the given writer.
pub fn to_writer<W: Write>(writer: W, root: &Compound) -> Result<()> {
    let mut w = NbtWriter { writer };
    w.write_tag(Tag::Compound)?;
    w.write_string("")?;
    w.write_compound(root)
}

struct NbtWriter<W: Write> {
    writer: W,
}

impl<W: Write> NbtWriter<W> {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.writer.write_u8(u8::from(tag))?;
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let len = u16::try_from(s.len())
            .map_err(|_| Error::bespoke(format!("string too long for nbt: {} bytes", s.len())))?;
        self.writer.write_u16::<LittleEndian>(len)?;
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| Error::bespoke(format!("sequence too long for nbt: {}", len)))?;
        self.writer.write_i32::<LittleEndian>(len)?;
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        for (name, value) in compound {
            self.write_tag(value.tag())?;
            self.write_string(name)?;
            self.write_payload(value)?;
        }
        self.write_tag(Tag::End)
    }

    fn write_payload(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Byte(v) => self.writer.write_i8(*v)?,
            Value::Short(v) => self.writer.write_i16::<LittleEndian>(*v)?,
            Value::Int(v) => self.writer.write_i32::<LittleEndian>(*v)?,
            Value::Long(v) => self.writer.write_i64::<LittleEndian>(*v)?,
            Value::Float(v) => self.writer.write_f32::<LittleEndian>(*v)?,
            Value::Double(v) => self.writer.write_f64::<LittleEndian>(*v)?,
            Value::String(v) => self.write_string(v)?,
            Value::ByteArray(v) => {
                self.write_len(v.len())?;
                for b in v {
                    self.writer.write_i8(*b)?;
                }
            }
            Value::IntArray(v) => {
                self.write_len(v.len())?;
                for i in v {
                    self.writer.write_i32::<LittleEndian>(*i)?;
                }
            }
            Value::LongArray(v) => {
                self.write_len(v.len())?;
                for l in v {
                    self.writer.write_i64::<LittleEndian>(*l)?;
                }
            }
            Value::List(tag, items) => {
                self.write_tag(*tag)?;
                self.write_len(items.len())?;
                for item in items {
                    if item.tag() != *tag {
                        return Err(Error::bespoke(format!(
                            "list of {} contains {} element",
                            tag,
                            item.tag()
                        )));
                    }
                    self.write_payload(item)?;
                }
            }
            Value::Compound(c) => self.write_compound(c)?,
        }
        Ok(())
    }
}
