//! Core deb822 stanza codec module

pub mod grammar;
pub mod types;

mod reader;
mod writer;

pub use reader::{read_stanzas, StanzaReader};
pub use types::error::{Deb822Error, Result};
pub use writer::write_stanzas;
