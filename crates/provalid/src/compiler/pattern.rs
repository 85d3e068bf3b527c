//! Regex pattern primitive: modifier folding, policy-time compilation, and
//! control-escape handling for literal embedding.

use regex::Regex;

use provalid_options::PatternModifier;

/// A pattern compiled at policy time.
///
/// Compilation happens once, before any constraint fact is emitted, so an
/// invalid regex is rejected with a diagnostic instead of surfacing inside
/// generated code. The generator owns the compiled handle and declares it
/// exactly once per field as a prologue constant.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    modifier: PatternModifier,
    regex: Regex,
}

// The compiled handle is a pure function of source and modifier.
impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.modifier == other.modifier
    }
}

impl CompiledPattern {
    /// Compile `source` with the given modifiers.
    ///
    /// Modifiers other than `partial_match` fold into inline flags
    /// (`(?i)`, `(?s)`, `(?m)`, `(?u)`); `partial_match` switches the
    /// anchored full match to a substring search at generation time.
    pub fn compile(source: &str, modifier: Option<PatternModifier>) -> Result<Self, String> {
        let modifier = modifier.unwrap_or_default();
        let regex = Regex::new(&flagged_source(source, &modifier))
            .map_err(|e| format!("invalid regular expression: {e}"))?;
        Ok(Self {
            source: source.to_string(),
            modifier,
            regex,
        })
    }

    /// The pattern as the schema declared it.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The modifiers as the schema declared them.
    #[must_use]
    pub fn modifier(&self) -> &PatternModifier {
        &self.modifier
    }

    /// Whether a substring match suffices.
    #[must_use]
    pub fn partial_match(&self) -> bool {
        self.modifier.partial_match
    }

    /// The compiled handle. Exposed for hosts that evaluate constant
    /// operands at compile time.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The pattern source escaped for embedding as a string literal in
    /// generated code. See [`escape_for_literal`].
    #[must_use]
    pub fn literal_source(&self) -> String {
        escape_for_literal(&self.source)
    }
}

fn flagged_source(source: &str, modifier: &PatternModifier) -> String {
    let mut flags = String::new();
    if modifier.case_insensitive {
        flags.push('i');
    }
    if modifier.dot_all {
        flags.push('s');
    }
    if modifier.multiline {
        flags.push('m');
    }
    if modifier.unicode {
        flags.push('u');
    }
    if flags.is_empty() {
        source.to_string()
    } else {
        format!("(?{flags}){source}")
    }
}

/// Re-escape the ASCII control escapes a schema parser has already
/// unescaped, so the runtime string embeds as an equivalent source literal.
///
/// A schema literal `"[^\\/]"` reaches the compiler as the runtime string
/// `[^\/]`; embedding that verbatim would change the meaning, so `\` becomes
/// `\\` again (and likewise for the other control escapes). Only
/// `\a \b \f \n \r \t \v \\ ' "` are touched — Unicode, hex and octal
/// escapes were left alone by the parser and stay untouched here.
#[must_use]
pub(crate) fn escape_for_literal(runtime: &str) -> String {
    let mut out = String::with_capacity(runtime.len());
    for ch in runtime.chars() {
        match ch {
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0B' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

/// Undo [`escape_for_literal`]: what a target-language literal parser does
/// to the embedded form. Test-only; generated code relies on the target
/// parser instead.
#[cfg(test)]
pub(crate) fn unescape_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0C'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0B'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
