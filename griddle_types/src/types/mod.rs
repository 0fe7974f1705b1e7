mod binary;
mod datetime;
mod object_id;
mod wire_regex;

pub use binary::*;
pub use datetime::*;
pub use object_id::*;
pub use wire_regex::*;
