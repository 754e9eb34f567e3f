//! Stanza assembly: turning classified lines into typed records.
//!
//! [`StanzaReader`] is a lazy, finite, forward-only iterator. It pulls lines
//! from its source one at a time, accumulates them into a per-stanza state,
//! and yields one fully-decoded record per stanza. Consumers may stop pulling
//! at any point; nothing is buffered beyond the stanza in flight.

use std::io::{self, BufRead};
use std::marker::PhantomData;

use log::{debug, trace};

use super::grammar::{classify, LineClass};
use super::types::error::{Deb822Error, Result};
use super::types::fields::{Deb822Record, MetaMap};

/// Reads stanzas from a buffered input stream.
///
/// The core splits the stream into lines itself; use
/// [`StanzaReader::from_line_results`] when the input is already split.
pub fn read_stanzas<R: Deb822Record, B: BufRead>(input: B) -> StanzaReader<R, io::Lines<B>> {
    StanzaReader::new(input)
}

/// Iterator over the records of a stanza-formatted input.
///
/// Yields `Result<R>` in stanza order. The first error is fatal: it is
/// yielded once and the iterator then terminates, with no skip-to-the-next-
/// stanza recovery. Line numbers in errors are 1-based.
pub struct StanzaReader<R: Deb822Record, I> {
    lines: I,
    line_no: usize,
    /// Accumulated raw text per schema field, parallel to the field table.
    data: Vec<Option<String>>,
    meta: MetaMap,
    /// Index of the field the next continuation line extends.
    current: Option<usize>,
    done: bool,
    _record: PhantomData<R>,
}

impl<R: Deb822Record, B: BufRead> StanzaReader<R, io::Lines<B>> {
    /// Creates a reader that splits `input` into lines itself.
    pub fn new(input: B) -> Self {
        Self::from_line_results(input.lines())
    }
}

impl<R, I> StanzaReader<R, I>
where
    R: Deb822Record,
    I: Iterator<Item = io::Result<String>>,
{
    /// Creates a reader over an already-split line source.
    ///
    /// Lines must not carry their trailing LF; a trailing CR is tolerated.
    pub fn from_line_results(lines: I) -> Self {
        let schema = R::schema();
        debug!("Reading stanzas against {} declared fields", schema.len());
        Self {
            lines,
            line_no: 0,
            data: vec![None; schema.len()],
            meta: MetaMap::new(),
            current: None,
            done: false,
            _record: PhantomData,
        }
    }

    fn has_data(&self) -> bool {
        self.data.iter().any(Option::is_some)
    }

    /// Clears the accumulator for the next stanza.
    fn reset(&mut self) {
        self.data.iter_mut().for_each(|slot| *slot = None);
        self.meta.clear();
        self.current = None;
    }

    /// Converts the accumulated stanza into a record.
    ///
    /// Every collected raw text is passed through its field's resolved decode
    /// strategy; fields with no collected text fall back to their declared
    /// default, or fail as missing when they have none.
    fn finalize(&mut self) -> Result<R> {
        let schema = R::schema();
        let mut record = R::default();
        let mut decoded = 0usize;
        let line = self.line_no;

        for (field, slot) in schema.fields().iter().zip(self.data.iter_mut()) {
            match slot.take() {
                Some(raw) => {
                    field
                        .apply_text(&mut record, &raw)
                        .map_err(|message| Deb822Error::InvalidValue {
                            key: field.key(),
                            message,
                            line,
                        })?;
                    decoded += 1;
                }
                None => {
                    if !field.apply_default(&mut record) {
                        return Err(Deb822Error::MissingField { key: field.key() });
                    }
                }
            }
        }

        trace!(
            "Stanza finalized at line {}: {} fields, {} meta entries",
            self.line_no,
            decoded,
            self.meta.len()
        );
        record.set_meta(std::mem::take(&mut self.meta));
        Ok(record)
    }

    /// Finalizes, resets for the next stanza, and latches `done` on error.
    fn emit(&mut self) -> Result<R> {
        let result = self.finalize();
        self.reset();
        if result.is_err() {
            self.done = true;
        }
        result
    }

    fn fail(&mut self, error: Deb822Error) -> Option<Result<R>> {
        self.done = true;
        Some(Err(error))
    }
}

impl<R, I> Iterator for StanzaReader<R, I>
where
    R: Deb822Record,
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return self.fail(e.into()),
                None => {
                    // Input need not end with a blank line.
                    self.done = true;
                    if self.has_data() {
                        return Some(self.emit());
                    }
                    return None;
                }
            };
            self.line_no += 1;

            match classify(&line) {
                Some(LineClass::Comment) => {}
                Some(LineClass::Blank) => {
                    if self.has_data() {
                        return Some(self.emit());
                    }
                    // An accumulator with no field data never produces a
                    // record, but meta entries and the current field are
                    // still discarded at the stanza boundary.
                    self.reset();
                }
                Some(LineClass::Continuation(payload)) => {
                    let Some(idx) = self.current else {
                        return self.fail(Deb822Error::ContinuationBeforeHeader {
                            line: self.line_no,
                        });
                    };
                    let slot = self.data[idx].get_or_insert_with(String::new);
                    slot.push('\n');
                    slot.push_str(payload);
                }
                Some(LineClass::MetaHeader { key, value }) => {
                    self.meta.insert(key.to_lowercase(), value.to_string());
                    // Meta headers do not accept continuations.
                    self.current = None;
                }
                Some(LineClass::FieldHeader { key, value }) => match R::schema().lookup(key) {
                    Some(idx) => {
                        self.current = Some(idx);
                        self.data[idx] = Some(value.to_string());
                    }
                    None => {
                        return self.fail(Deb822Error::UnknownField {
                            key: key.to_string(),
                            line: self.line_no,
                        });
                    }
                },
                None => {
                    return self.fail(Deb822Error::MalformedLine { line: self.line_no });
                }
            }
        }
    }
}
