use derive_more::{Deref, From};
use std::fmt;

pub const OBJECT_ID_LEN: usize = 12;

/// A 12-byte document identifier, carried opaquely. Generation and
/// timestamp extraction belong to the driver layer, not the wire core.
#[derive(From, Deref, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ObjectId(pub [u8; OBJECT_ID_LEN]);

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
