//! Line classification for the deb822 stanza grammar.
//!
//! A pure, stateless classifier applied independently to each physical line.
//! The stanza assembler in [`reader`](super::reader) interprets the resulting
//! [`LineClass`] values; nothing here looks at neighbouring lines.

use regex::Regex;
use std::sync::OnceLock;

/// Compiled pattern for header and continuation lines.
///
/// Alternatives are ordered: continuation, then the reserved `Meta-` header,
/// then the generic field header. `Meta-` is a reserved key prefix, so a
/// literal key of `Meta-Foo` is always captured as a meta field.
static LINE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn line_regex() -> &'static Regex {
    LINE_PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:[ \t](?P<cont>.*)|Meta-(?P<metakey>[^:\s]+)\s*:\s*(?P<metavalue>.*)|(?P<key>[^:\s]+)\s*:\s*(?P<value>.*))$",
        )
        .expect("Invalid deb822 line pattern")
    })
}

/// The classification of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// A `#`-prefixed line. Ignored everywhere, never preserved.
    Comment,
    /// An empty line: end of the current stanza.
    Blank,
    /// A line starting with SP or TAB, extending the preceding field header.
    /// The payload excludes the first whitespace character only.
    Continuation(&'a str),
    /// A `Meta-<key>: <value>` header. The key excludes the `Meta-` prefix
    /// and is reported exactly as written; lower-casing is the assembler's
    /// concern.
    MetaHeader { key: &'a str, value: &'a str },
    /// A `<key>: <value>` header.
    FieldHeader { key: &'a str, value: &'a str },
}

/// Classifies one line, without its trailing LF. A trailing CR is tolerated
/// and stripped. Returns `None` for a malformed line.
pub fn classify(line: &str) -> Option<LineClass<'_>> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.starts_with('#') {
        return Some(LineClass::Comment);
    }
    if line.is_empty() {
        return Some(LineClass::Blank);
    }

    let caps = line_regex().captures(line)?;
    if let Some(cont) = caps.name("cont") {
        Some(LineClass::Continuation(cont.as_str()))
    } else if let Some(key) = caps.name("metakey") {
        Some(LineClass::MetaHeader {
            key: key.as_str(),
            value: caps.name("metavalue").map(|m| m.as_str()).unwrap_or(""),
        })
    } else {
        let key = caps.name("key")?;
        Some(LineClass::FieldHeader {
            key: key.as_str(),
            value: caps.name("value").map(|m| m.as_str()).unwrap_or(""),
        })
    }
}
