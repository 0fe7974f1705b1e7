use crate::io_utils::read_until_nul;
use crate::serde::{regex_flags, BodyLen, CodecOptions, ElementType, Value, WireOutput, WriteLen};
use crate::types::{Binary, ObjectId, UtcDatetime, WireRegex, OBJECT_ID_LEN};
use anyhow::{anyhow, Result};
use std::any;
use std::io::Read;
use std::mem;

/// One codec per wire kind. Implementations are stateless and shared behind
/// `Arc` by any number of concurrent encode/decode calls.
pub trait ValueCodec: Send + Sync {
    /// The wire tag this codec is registered under.
    fn element_type(&self) -> ElementType;

    /// Encodes the value body (everything after the tag byte) into `w`.
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        opts: &CodecOptions,
    ) -> Result<WriteLen>;

    /// Decodes the value body from `r`, returning the consumed byte count
    /// alongside the value.
    fn decode_body(&self, r: &mut dyn Read, opts: &CodecOptions) -> Result<(usize, Value)>;
}

fn mismatch<C>(val: &Value) -> anyhow::Error {
    anyhow!(
        "{} cannot encode a {:?} value",
        any::type_name::<C>(),
        ElementType::from(val)
    )
}

fn write_cstr(w: &mut dyn WireOutput, s: &str) -> Result<WriteLen> {
    if s.as_bytes().contains(&0) {
        return Err(anyhow!("Embedded NUL in cstring {:?}", s));
    }
    let mut w_len = 0;
    w_len += *w.write(s.as_bytes())?;
    w_len += *w.write_u8(0)?;
    Ok(WriteLen(w_len))
}

fn read_cstr(r: &mut dyn Read, r_len: &mut usize) -> Result<String> {
    let mut buf = vec![];
    *r_len += read_until_nul(r, &mut buf)?;
    let s = String::from_utf8(buf)?;
    Ok(s)
}

pub struct F64Codec;
impl ValueCodec for F64Codec {
    fn element_type(&self) -> ElementType {
        ElementType::F64
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::F64(f) => w.write(&f.to_le_bytes()),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut buf = [0u8; mem::size_of::<f64>()];
        r.read_exact(&mut buf)?;
        let f = f64::from_le_bytes(buf);
        Ok((buf.len(), Value::F64(f)))
    }
}

pub struct StrCodec;
impl ValueCodec for StrCodec {
    fn element_type(&self) -> ElementType {
        ElementType::Str
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::Str(s) => {
                /* body_len counts the trailing NUL */
                let body_len = BodyLen::from_len(s.len() + 1)?;
                let mut w_len = 0;
                w_len += *w.write(&body_len.to_le_bytes())?;
                w_len += *w.write(s.as_bytes())?;
                w_len += *w.write_u8(0)?;
                Ok(WriteLen(w_len))
            }
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let (mut r_len, body_len) = BodyLen::deser(r)?;
        if *body_len < 1 {
            return Err(anyhow!("Str body length {} has no room for NUL", *body_len));
        }
        let mut buf = vec![0u8; *body_len as usize];
        r.read_exact(&mut buf)?;
        r_len += buf.len();
        match buf.pop() {
            Some(0) => {}
            term => return Err(anyhow!("Str body terminator is {:?}, not NUL", term)),
        }
        let s = String::from_utf8(buf)?;
        Ok((r_len, Value::Str(s)))
    }
}

pub struct BinaryCodec;
impl ValueCodec for BinaryCodec {
    fn element_type(&self) -> ElementType {
        ElementType::Binary
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::Binary(bin) => {
                let body_len = BodyLen::from_len(bin.bytes.len())?;
                let mut w_len = 0;
                w_len += *w.write(&body_len.to_le_bytes())?;
                w_len += *w.write_u8(bin.subtype)?;
                w_len += *w.write(&bin.bytes)?;
                Ok(WriteLen(w_len))
            }
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let (mut r_len, body_len) = BodyLen::deser(r)?;

        let mut subtype = [0u8; 1];
        r.read_exact(&mut subtype)?;
        r_len += subtype.len();

        let mut bytes = vec![0u8; *body_len as usize];
        r.read_exact(&mut bytes)?;
        r_len += bytes.len();

        let bin = Binary {
            subtype: subtype[0],
            bytes,
        };
        Ok((r_len, Value::Binary(bin)))
    }
}

pub struct ObjectIdCodec;
impl ValueCodec for ObjectIdCodec {
    fn element_type(&self) -> ElementType {
        ElementType::ObjectId
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::ObjectId(oid) => w.write(&oid[..]),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut buf = [0u8; OBJECT_ID_LEN];
        r.read_exact(&mut buf)?;
        Ok((buf.len(), Value::ObjectId(ObjectId::from(buf))))
    }
}

pub struct BoolCodec;
impl ValueCodec for BoolCodec {
    fn element_type(&self) -> ElementType {
        ElementType::Bool
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::Bool(false) => w.write_u8(0),
            Value::Bool(true) => w.write_u8(1),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut buf = [0u8; 1];
        r.read_exact(&mut buf)?;
        let b = match buf[0] {
            0 => false,
            1 => true,
            b => return Err(anyhow!("Bool body byte is {}, not 0 or 1", b)),
        };
        Ok((buf.len(), Value::Bool(b)))
    }
}

pub struct DatetimeCodec;
impl ValueCodec for DatetimeCodec {
    fn element_type(&self) -> ElementType {
        ElementType::Datetime
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::Datetime(dt) => w.write(&dt.to_le_bytes()),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut buf = [0u8; mem::size_of::<i64>()];
        r.read_exact(&mut buf)?;
        let millis = i64::from_le_bytes(buf);
        Ok((buf.len(), Value::Datetime(UtcDatetime::from(millis))))
    }
}

pub struct NullCodec;
impl ValueCodec for NullCodec {
    fn element_type(&self) -> ElementType {
        ElementType::Null
    }
    fn encode_body(
        &self,
        _w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::Null => Ok(WriteLen(0)),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, _r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        Ok((0, Value::Null))
    }
}

pub struct RegexCodec;
impl ValueCodec for RegexCodec {
    fn element_type(&self) -> ElementType {
        ElementType::Regex
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::Regex(re) => {
                let mut w_len = 0;
                w_len += *write_cstr(w, &re.pattern)?;
                w_len += *write_cstr(w, &re.options)?;
                Ok(WriteLen(w_len))
            }
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut r_len = 0;
        let pattern = read_cstr(r, &mut r_len)?;
        let options = read_cstr(r, &mut r_len)?;

        /* Reject junk flag characters at the wire boundary. */
        regex_flags::decode(&options)?;

        let re = WireRegex { pattern, options };
        Ok((r_len, Value::Regex(re)))
    }
}

pub struct I32Codec;
impl ValueCodec for I32Codec {
    fn element_type(&self) -> ElementType {
        ElementType::I32
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::I32(i) => w.write(&i.to_le_bytes()),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut buf = [0u8; mem::size_of::<i32>()];
        r.read_exact(&mut buf)?;
        let i = i32::from_le_bytes(buf);
        Ok((buf.len(), Value::I32(i)))
    }
}

pub struct I64Codec;
impl ValueCodec for I64Codec {
    fn element_type(&self) -> ElementType {
        ElementType::I64
    }
    fn encode_body(
        &self,
        w: &mut dyn WireOutput,
        val: &Value,
        _opts: &CodecOptions,
    ) -> Result<WriteLen> {
        match val {
            Value::I64(i) => w.write(&i.to_le_bytes()),
            _ => Err(mismatch::<Self>(val)),
        }
    }
    fn decode_body(&self, r: &mut dyn Read, _opts: &CodecOptions) -> Result<(usize, Value)> {
        let mut buf = [0u8; mem::size_of::<i64>()];
        r.read_exact(&mut buf)?;
        let i = i64::from_le_bytes(buf);
        Ok((buf.len(), Value::I64(i)))
    }
}
