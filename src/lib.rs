//! Kemas - Declarative Packed Binary Record Codec
//!
//! Arsitektur:
//! - Schema: daftar field bertipe -> offset, ukuran, count (tanpa padding)
//! - Record: buffer zero-filled + get/set by name dalam endianness tetap
//! - Static variants: `record_type!` dengan layout ter-cache
//!
//! ```
//! use kemas::{Endian, FieldDef, FieldType, Layout, Record};
//!
//! let layout = Layout::compute(&[
//!     FieldDef::new("id", FieldType::U32),
//!     FieldDef::new("flag", FieldType::Bool),
//!     FieldDef::array("name", FieldType::U8, 4),
//! ])?;
//!
//! let mut rec = Record::new(layout, Endian::Little);
//! rec.set("id", 7u32)?;
//! rec.set("flag", true)?;
//! rec.set("name", b"abcd")?;
//!
//! assert_eq!(rec.to_bytes(), [7, 0, 0, 0, 1, b'a', b'b', b'c', b'd']);
//! # Ok::<(), kemas::Error>(())
//! ```

pub mod error;
pub mod record;
pub mod schema;

pub use error::{DefinitionError, Error, Result};
pub use record::{Codec, Record, RecordType, Scope, Value};
pub use schema::{Decode, Endian, FieldDef, FieldLayout, FieldType, Layout};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
