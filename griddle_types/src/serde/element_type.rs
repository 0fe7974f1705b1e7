use crate::serde::Value;
use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;
use std::io::{self, Read};
use std::mem;

#[derive(From, Deref, Clone, Copy)]
pub struct ElementTypeInt(u8);
impl From<ElementType> for ElementTypeInt {
    fn from(etype: ElementType) -> Self {
        let int = etype.to_u8().unwrap();
        Self(int)
    }
}
impl ElementTypeInt {
    pub fn deser(r: &mut impl Read) -> Result<(usize, Self), io::Error> {
        let mut buf = [0u8; mem::size_of::<u8>()];
        r.read_exact(&mut buf)?;
        let int = u8::from_le_bytes(buf);
        Ok((buf.len(), Self(int)))
    }
}

/// The discriminants are the protocol's on-wire tag bytes, so they are pinned
/// manually rather than left to the compiler. Gaps in the sequence belong to
/// wire kinds this crate does not carry.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ElementType {
    F64 = 1,
    Str = 2,
    Binary = 5,
    ObjectId = 7,
    Bool = 8,
    Datetime = 9,
    Null = 10,
    Regex = 11,
    I32 = 16,
    I64 = 18,
}
impl TryFrom<ElementTypeInt> for ElementType {
    type Error = anyhow::Error;
    fn try_from(int: ElementTypeInt) -> Result<Self> {
        ElementType::from_u8(int.0).ok_or(anyhow!(
            "Unknown {} {}",
            any::type_name::<ElementTypeInt>(),
            int.0
        ))
    }
}
impl From<&Value> for ElementType {
    fn from(val: &Value) -> Self {
        match val {
            Value::F64(_) => ElementType::F64,
            Value::Str(_) => ElementType::Str,
            Value::Binary(_) => ElementType::Binary,
            Value::ObjectId(_) => ElementType::ObjectId,
            Value::Bool(_) => ElementType::Bool,
            Value::Datetime(_) => ElementType::Datetime,
            Value::Null => ElementType::Null,
            Value::Regex(_) => ElementType::Regex,
            Value::I32(_) => ElementType::I32,
            Value::I64(_) => ElementType::I64,
        }
    }
}
