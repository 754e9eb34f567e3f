//! Serialization of typed records back into stanza text.

use std::io::Write;

use log::debug;

use super::types::error::Result;
use super::types::fields::Deb822Record;

/// Writes a sequence of records as blank-line-separated stanzas.
///
/// Fields are emitted in declaration order. A field is omitted when it is
/// write-disabled or its encoded value is `None` (the format cannot represent
/// an explicitly empty value distinctly from absence). Multi-line encoded
/// text is emitted verbatim; producing continuation indentation is the encode
/// function's responsibility. Every record is terminated by one blank line,
/// even when none of its fields produced output. Meta fields are never
/// re-emitted.
pub fn write_stanzas<'a, R, I, W>(records: I, out: &mut W) -> Result<()>
where
    R: Deb822Record + 'a,
    I: IntoIterator<Item = &'a R>,
    W: Write,
{
    let schema = R::schema();
    let mut count = 0usize;

    for record in records {
        for field in schema.fields() {
            if let Some(text) = field.encode(record) {
                writeln!(out, "{}: {}", field.key(), text)?;
            }
        }
        out.write_all(b"\n")?;
        count += 1;
    }

    debug!("Wrote {} stanzas", count);
    Ok(())
}
