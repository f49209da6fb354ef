//! Schema layer: field definitions dan layout computation
//!
//! Prinsip desain:
//! - Packed: tidak ada padding, offset = running total
//! - Computed once: layout immutable, bisa di-cache dan di-share
//! - Strict: definisi tidak valid ditolak saat layout dihitung

mod field;
mod layout;

pub use field::{Endian, FieldDef, FieldType};
pub use layout::{Decode, FieldLayout, Layout};
