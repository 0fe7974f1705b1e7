//! # Wire format
//!
//! The unit of serialization is a [`Value`]. Every serialized `Value` starts
//! with `element_type`, encoded in `u8`; the decode side dispatches on this
//! tag alone, so readers never need type context from outside the stream.
//! The tag's numeric assignments are fixed by the wire protocol and leave
//! room for kinds this crate does not carry.
//!
//! Fixed-width kinds encode their body directly after the tag. Dynamic-width
//! kinds encode a `u32` body length between the tag and the body, except
//! `Regex`, whose two fields are NUL-terminated instead.
//! All multi-byte integers are little-endian.
//!
//! ```text
//! struct Value::F64 {
//!     element_type:   u8 = 1,
//!     body:           [u8; 8],
//! }
//!
//! struct Value::Str {
//!     element_type:   u8 = 2,
//!     body_len:       u32,                // utf-8 len + 1
//!     body:           [u8; body_len],     // utf-8, then one NUL
//! }
//!
//! struct Value::Binary {
//!     element_type:   u8 = 5,
//!     body_len:       u32,                // payload len only
//!     subtype:        u8,
//!     body:           [u8; body_len],
//! }
//!
//! struct Value::ObjectId {
//!     element_type:   u8 = 7,
//!     body:           [u8; 12],
//! }
//!
//! struct Value::Bool {
//!     element_type:   u8 = 8,
//!     body:           u8,                 // strictly 0 or 1
//! }
//!
//! struct Value::Datetime {
//!     element_type:   u8 = 9,
//!     body:           i64,                // millis since unix epoch
//! }
//!
//! struct Value::Null {
//!     element_type:   u8 = 10,
//! }
//!
//! struct Value::Regex {
//!     element_type:   u8 = 11,
//!     pattern:        cstring,            // utf-8, NUL-terminated
//!     options:        cstring,            // canonical flag chars, NUL-terminated
//! }
//!
//! struct Value::I32 {
//!     element_type:   u8 = 16,
//!     body:           i32,
//! }
//!
//! struct Value::I64 {
//!     element_type:   u8 = 18,
//!     body:           i64,
//! }
//! ```

mod codec_options;
mod codecs;
mod element_type;
mod lengths;
mod output;
pub mod regex_flags;
mod registry;
mod value;

pub use codec_options::*;
pub use codecs::*;
pub use element_type::*;
use lengths::*;
pub use output::*;
pub use registry::*;
pub use value::*;
