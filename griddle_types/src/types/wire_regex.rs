use crate::serde::regex_flags::{self, PatternFlags};
use anyhow::Result;
use regex::{Regex, RegexBuilder};


/// A regular expression as it travels on the wire: the pattern source plus
/// the canonical single-character flag string.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct WireRegex {
    pub pattern: String,
    pub options: String,
}

impl WireRegex {
    pub fn from_flags(pattern: String, flags: PatternFlags) -> Result<Self> {
        let options = regex_flags::encode(flags)?;
        Ok(Self { pattern, options })
    }

    pub fn pattern_flags(&self) -> Result<PatternFlags> {
        regex_flags::decode(&self.options)
    }

    /// Compiles with the native engine. Flags the engine cannot honor were
    /// already noted during flag decoding; they are dropped here.
    /// `UNICODE_CASE` needs no toggle since the engine folds case
    /// unicode-aware by default.
    pub fn to_regex(&self) -> Result<Regex> {
        let flags = self.pattern_flags()?;
        let re = RegexBuilder::new(&self.pattern)
            .case_insensitive(flags.contains(PatternFlags::CASE_INSENSITIVE))
            .multi_line(flags.contains(PatternFlags::MULTILINE))
            .dot_matches_new_line(flags.contains(PatternFlags::DOT_ALL))
            .ignore_whitespace(flags.contains(PatternFlags::COMMENTS))
            .build()?;
        Ok(re)
    }
}
