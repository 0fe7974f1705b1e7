//! Bidirectional table between the pattern engine's native option bits and
//! the canonical single-character flag alphabet used on the wire.
//!
//! One wire flag, `g` ("global"), has no native equivalent; it exists for
//! wire-format completeness only. Some native bits name features this
//! engine cannot honor; decoding such a flag is noted, not failed.

use anyhow::{anyhow, Result};
use bitflags::bitflags;

bitflags! {
    /// Native option bits of the pattern engine, as carried by
    /// [`Value::Regex`](crate::serde::Value) values in memory.
    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub struct PatternFlags: u32 {
        const CANON_EQ = 1 << 0;
        const UNIX_LINES = 1 << 1;
        const CASE_INSENSITIVE = 1 << 2;
        const MULTILINE = 1 << 3;
        const DOT_ALL = 1 << 4;
        const LITERAL = 1 << 5;
        const UNICODE_CASE = 1 << 6;
        const COMMENTS = 1 << 7;
    }
}

struct FlagSpec {
    /// `None` for wire-only flags with no native bit.
    bit: Option<PatternFlags>,
    wire_char: char,
    /// The feature name, for flags the native engine cannot honor.
    unsupported: Option<&'static str>,
}

/// Table order is the canonical encode order.
const FLAG_TABLE: [FlagSpec; 9] = [
    FlagSpec {
        bit: Some(PatternFlags::CANON_EQ),
        wire_char: 'c',
        unsupported: Some("canonical equivalence"),
    },
    FlagSpec {
        bit: Some(PatternFlags::UNIX_LINES),
        wire_char: 'd',
        unsupported: Some("unix-lines mode"),
    },
    FlagSpec {
        bit: None,
        wire_char: 'g',
        unsupported: None,
    },
    FlagSpec {
        bit: Some(PatternFlags::CASE_INSENSITIVE),
        wire_char: 'i',
        unsupported: None,
    },
    FlagSpec {
        bit: Some(PatternFlags::MULTILINE),
        wire_char: 'm',
        unsupported: None,
    },
    FlagSpec {
        bit: Some(PatternFlags::DOT_ALL),
        wire_char: 's',
        unsupported: None,
    },
    FlagSpec {
        bit: Some(PatternFlags::LITERAL),
        wire_char: 't',
        unsupported: Some("literal parsing"),
    },
    FlagSpec {
        bit: Some(PatternFlags::UNICODE_CASE),
        wire_char: 'u',
        unsupported: None,
    },
    FlagSpec {
        bit: Some(PatternFlags::COMMENTS),
        wire_char: 'x',
        unsupported: None,
    },
];

/// Encodes `flags` as the canonical wire flag string. Every set bit must be
/// consumed by the table; leftovers fail.
pub fn encode(flags: PatternFlags) -> Result<String> {
    let mut remaining = flags;
    let mut out = String::new();
    for spec in &FLAG_TABLE {
        if let Some(bit) = spec.bit {
            if flags.contains(bit) {
                out.push(spec.wire_char);
                remaining.remove(bit);
            }
        }
    }
    if !remaining.is_empty() {
        return Err(anyhow!(
            "Unrecognized pattern flag bits {:#010b}",
            remaining.bits()
        ));
    }
    Ok(out)
}

/// Decodes a wire flag string to native bits. Every character must resolve
/// in the table; characters naming features the engine cannot honor are
/// noted and skipped rather than failed.
pub fn decode(wire_flags: &str) -> Result<PatternFlags> {
    let wire_flags = wire_flags.to_lowercase();
    let mut flags = PatternFlags::empty();
    for ch in wire_flags.chars() {
        match FLAG_TABLE.iter().find(|spec| spec.wire_char == ch) {
            None => {
                return Err(anyhow!("Unrecognized pattern flag character [{}]", ch));
            }
            Some(spec) => {
                if let Some(feature) = spec.unsupported {
                    log::warn!(
                        "Pattern flag '{}' requests {}, which this engine does not support",
                        ch,
                        feature
                    );
                }
                if let Some(bit) = spec.bit {
                    flags |= bit;
                }
            }
        }
    }
    Ok(flags)
}
