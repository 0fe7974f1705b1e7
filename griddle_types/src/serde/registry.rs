use crate::serde::{
    BinaryCodec, BoolCodec, CodecOptions, DatetimeCodec, ElementType, ElementTypeInt, F64Codec,
    I32Codec, I64Codec, NullCodec, ObjectIdCodec, RegexCodec, StrCodec, Value, ValueCodec,
    WireOutput, WriteLen,
};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::sync::Arc;

#[derive(PartialEq, Debug)]
pub enum ReadResult<T> {
    EOF,
    Some(usize, T),
}

/// Holder for all the per-kind codec mappings.
///
/// Immutable once built; share one instance across any number of concurrent
/// encode/decode calls. The runtime-kind keyspace and the wire-tag keyspace
/// are the same closed [`ElementType`] enum, so a single map serves both
/// dispatch directions and the two can never drift apart.
pub struct PrimitiveCodecs {
    by_element_type: HashMap<ElementType, Arc<dyn ValueCodec>>,
}

impl PrimitiveCodecs {
    pub fn builder() -> Builder {
        Builder {
            by_element_type: HashMap::new(),
        }
    }

    /// A builder seeded with this registry's mappings, for selective
    /// override.
    pub fn to_builder(&self) -> Builder {
        Builder {
            by_element_type: self.by_element_type.clone(),
        }
    }

    /// The canonical codec per supported wire kind.
    pub fn default_set() -> Self {
        Self::builder()
            .with(Arc::new(ObjectIdCodec))
            .with(Arc::new(I32Codec))
            .with(Arc::new(I64Codec))
            .with(Arc::new(StrCodec))
            .with(Arc::new(F64Codec))
            .with(Arc::new(BinaryCodec))
            .with(Arc::new(DatetimeCodec))
            .with(Arc::new(BoolCodec))
            .with(Arc::new(RegexCodec))
            .with(Arc::new(NullCodec))
            .build()
    }

    /// Writes the tag byte and then the value body. On a dispatch miss the
    /// sink is untouched.
    pub fn encode(
        &self,
        w: &mut impl WireOutput,
        val: &Value,
        opts: &CodecOptions,
    ) -> Result<WriteLen> {
        let etype = ElementType::from(val);
        let codec = match self.by_element_type.get(&etype) {
            None => return Err(anyhow!("No codec registered for value kind {:?}", etype)),
            Some(codec) => codec,
        };

        let mut w_len = 0;
        w_len += *w.write(&ElementTypeInt::from(etype).to_le_bytes())?;
        w_len += *codec.encode_body(w, val, opts)?;
        Ok(WriteLen(w_len))
    }

    /// Reads the tag byte and delegates the value body. A clean EOF at the
    /// tag boundary yields [`ReadResult::EOF`]. On an unknown or
    /// unregistered tag, the reader is restored to the tag boundary before
    /// the error returns, so the source is not consumed.
    pub fn decode<R: Read + Seek>(
        &self,
        r: &mut R,
        opts: &CodecOptions,
    ) -> Result<ReadResult<Value>> {
        /* element_type */
        let (tag_len, etype_int) = match ElementTypeInt::deser(r) {
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(ReadResult::EOF),
            Err(e) => return Err(anyhow!(e)),
            Ok((r_len, etype_int)) => (r_len, etype_int),
        };
        let etype = match ElementType::try_from(etype_int) {
            Err(e) => {
                r.seek(SeekFrom::Current(-(tag_len as i64)))?;
                return Err(e);
            }
            Ok(etype) => etype,
        };
        let codec = match self.by_element_type.get(&etype) {
            None => {
                r.seek(SeekFrom::Current(-(tag_len as i64)))?;
                return Err(anyhow!("No codec registered for element type {:?}", etype));
            }
            Some(codec) => codec,
        };

        /* value body */
        let (body_len, val) = codec.decode_body(r, opts)?;
        Ok(ReadResult::Some(tag_len + body_len, val))
    }
}

pub struct Builder {
    by_element_type: HashMap<ElementType, Arc<dyn ValueCodec>>,
}

impl Builder {
    /// Registers `codec` under its declared element type. The last
    /// registration for a given element type wins; seeding a builder from an
    /// existing registry and re-registering one kind is how a consumer
    /// overrides part of the default set.
    pub fn with(mut self, codec: Arc<dyn ValueCodec>) -> Self {
        self.by_element_type.insert(codec.element_type(), codec);
        self
    }

    pub fn build(self) -> PrimitiveCodecs {
        PrimitiveCodecs {
            by_element_type: self.by_element_type,
        }
    }
}
