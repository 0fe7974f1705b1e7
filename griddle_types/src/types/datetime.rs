use derive_more::{Deref, From};

/// Milliseconds since the unix epoch, UTC.
#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct UtcDatetime(pub i64);
