use std::io::Read;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::stream::{self, Parser};
use crate::Tag;

/// A compound tag. Insertion order is kept so that a document read and
/// written back comes out in the same order it went in.
pub type Compound = IndexMap<String, Value>;

/// Value is a complete NBT value. It owns its data. Compounds and Lists are
/// recursively parsed. This type takes care to preserve all the information
/// from the original NBT, including the element tag of empty lists, with the
/// exception of the name of the root compound.
///
/// ```
/// # use mcstructure_nbt::{Tag, Value};
/// let size = Value::int_list([2, 3, 4]);
/// assert_eq!(size.tag(), Tag::List);
/// assert_eq!(size.as_list(), Some((Tag::Int, &[Value::Int(2), Value::Int(3), Value::Int(4)][..])));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    /// A list along with the tag of its elements. Every element must have
    /// that tag for the list to be written.
    List(Tag, Vec<Value>),
    Compound(Compound),
}

impl Value {
    /// The NBT tag this value is written with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
            Value::List(_, _) => Tag::List,
            Value::Compound(_) => Tag::Compound,
        }
    }

    /// Build a `List` of `Int` tags.
    pub fn int_list(values: impl IntoIterator<Item = i32>) -> Self {
        Value::List(Tag::Int, values.into_iter().map(Value::Int).collect())
    }

    /// Build a `List` of `Compound` tags. An empty iterator gives an empty
    /// list that still declares `Compound` as its element tag.
    pub fn compound_list(values: impl IntoIterator<Item = Compound>) -> Self {
        Value::List(
            Tag::Compound,
            values.into_iter().map(Value::Compound).collect(),
        )
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    /// The value of an `Int` tag. Unlike [`Value::as_i64`] this does not
    /// convert from other numeric tags.
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// The element tag and the elements of a `List`.
    pub fn as_list(&self) -> Option<(Tag, &[Value])> {
        match self {
            Value::List(tag, items) => Some((*tag, items.as_slice())),
            _ => None,
        }
    }
}

// ------------- Reading -------------

/// Nesting limit for compounds and lists, keeps hostile input from
/// exhausting the stack.
const MAX_DEPTH: usize = 512;

/// Read a named root compound from the parser.
pub(crate) fn read_root<R: Read>(parser: &mut Parser<R>) -> Result<Compound> {
    match parser.next() {
        Ok(stream::Value::Compound(_)) => read_compound_body(parser),
        Ok(_) => Err(Error::bespoke("invalid nbt: no root compound")),
        Err(e) if e.is_eof() => Err(Error::unexpected_eof()),
        Err(e) => Err(e),
    }
}

fn read_compound_body<R: Read>(parser: &mut Parser<R>) -> Result<Compound> {
    let mut compound = Compound::new();
    loop {
        let next = parser.next()?;
        if let stream::Value::CompoundEnd = next {
            return Ok(compound);
        }

        let (name, value) = convert(parser, next)?;
        let name = name.ok_or_else(|| Error::bespoke("unnamed tag inside compound"))?;
        compound.insert(name, value);
    }
}

fn read_list_body<R: Read>(parser: &mut Parser<R>, tag: Tag, size: i32) -> Result<Value> {
    let mut items = Vec::with_capacity(size.clamp(0, 1024) as usize);
    loop {
        let next = parser.next()?;
        if let stream::Value::ListEnd = next {
            return Ok(Value::List(tag, items));
        }
        let (_, value) = convert(parser, next)?;
        items.push(value);
    }
}

fn convert<R: Read>(
    parser: &mut Parser<R>,
    value: stream::Value,
) -> Result<(stream::Name, Value)> {
    use stream::Value as S;

    if parser.depth() > MAX_DEPTH {
        return Err(Error::bespoke(format!(
            "invalid nbt: nested deeper than {} levels",
            MAX_DEPTH
        )));
    }

    Ok(match value {
        S::Byte(n, v) => (n, Value::Byte(v)),
        S::Short(n, v) => (n, Value::Short(v)),
        S::Int(n, v) => (n, Value::Int(v)),
        S::Long(n, v) => (n, Value::Long(v)),
        S::Float(n, v) => (n, Value::Float(v)),
        S::Double(n, v) => (n, Value::Double(v)),
        S::ByteArray(n, v) => (n, Value::ByteArray(v)),
        S::String(n, v) => (n, Value::String(v)),
        S::IntArray(n, v) => (n, Value::IntArray(v)),
        S::LongArray(n, v) => (n, Value::LongArray(v)),
        S::Compound(n) => (n, Value::Compound(read_compound_body(parser)?)),
        S::List(n, tag, size) => (n, read_list_body(parser, tag, size)?),
        S::CompoundEnd | S::ListEnd => return Err(Error::bespoke("unbalanced end of nbt")),
    })
}

// ------------- Serialize (for dumping as JSON and the like) -------------

impl Serialize for Value {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Byte(v) => s.serialize_i8(*v),
            Value::Short(v) => s.serialize_i16(*v),
            Value::Int(v) => s.serialize_i32(*v),
            Value::Long(v) => s.serialize_i64(*v),
            Value::Float(v) => s.serialize_f32(*v),
            Value::Double(v) => s.serialize_f64(*v),
            Value::String(v) => s.serialize_str(v),
            Value::ByteArray(v) => v.serialize(s),
            Value::IntArray(v) => v.serialize(s),
            Value::LongArray(v) => v.serialize(s),
            Value::List(_, items) => {
                let mut seq = s.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Compound(c) => {
                let mut map = s.serialize_map(Some(c.len()))?;
                for (k, v) in c {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

// ------------- PartialEq with primitives -------------

fn eq_i64(value: &Value, other: i64) -> bool {
    value.as_i64().map_or(false, |i| i == other)
}

fn eq_f64(value: &Value, other: f64) -> bool {
    value.as_f64().map_or(false, |i| i == other)
}

fn eq_str(value: &Value, other: &str) -> bool {
    value.as_str().map_or(false, |i| i == other)
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        eq_str(self, other)
    }
}

impl<'a> PartialEq<&'a str> for Value {
    fn eq(&self, other: &&str) -> bool {
        eq_str(self, other)
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        eq_str(self, other.as_str())
    }
}

macro_rules! partialeq_numeric {
    ($($eq:ident [$($ty:ty)*])*) => {
        $($(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    $eq(self, *other as _)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    $eq(other, *self as _)
                }
            }
        )*)*
    }
}

partialeq_numeric! {
    eq_i64[i8 i16 i32 i64]
    eq_f64[f32 f64]
}
