//! # deb822-codec
//!
//! A reader and writer for deb822-style stanza files: blank-line-separated
//! paragraphs of `Key: value` fields, with whitespace-prefixed continuation
//! lines, `#` comments, and out-of-band `Meta-*` fields.
//!
//! Record types declare their field mapping once, in a [`Schema`], and the
//! same declaration drives both directions: decoding stanzas into typed
//! records and encoding records back into text.
//!
//! ```
//! use deb822_codec::{Deb822Record, FieldBuilder, MetaMap, Schema, StanzaReader};
//! use std::sync::OnceLock;
//!
//! #[derive(Debug, Default)]
//! struct Package {
//!     name: String,
//!     version: String,
//!     meta: MetaMap,
//! }
//!
//! static SCHEMA: OnceLock<Schema<Package>> = OnceLock::new();
//!
//! impl Deb822Record for Package {
//!     fn schema() -> &'static Schema<Self> {
//!         SCHEMA.get_or_init(|| {
//!             Schema::builder()
//!                 .field(FieldBuilder::new(
//!                     "Package",
//!                     |r: &Package| &r.name,
//!                     |r, v| r.name = v,
//!                 ))
//!                 .field(
//!                     FieldBuilder::new("Version", |r: &Package| &r.version, |r, v| r.version = v)
//!                         .default_with(String::new),
//!                 )
//!                 .build()
//!                 .expect("Invalid Package schema")
//!         })
//!     }
//!
//!     fn set_meta(&mut self, meta: MetaMap) {
//!         self.meta = meta;
//!     }
//! }
//!
//! let input = "Package: foo\nVersion: 1.0\n\nPackage: bar\n";
//! let packages: Vec<Package> = StanzaReader::new(input.as_bytes())
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(packages.len(), 2);
//! assert_eq!(packages[0].name, "foo");
//! assert_eq!(packages[1].version, "");
//! # Ok::<(), deb822_codec::Deb822Error>(())
//! ```

pub mod deb822;

// Re-export the main types for convenience
pub use deb822::{
    read_stanzas,
    types::fields::{
        Deb822Record, FieldBuilder, FieldDef, FieldValue, MetaMap, Schema, SchemaBuilder,
    },
    write_stanzas, Deb822Error, Result, StanzaReader,
};
