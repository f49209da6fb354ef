//! Record layer: typed field access di atas buffer packed
//!
//! Prinsip desain:
//! - Satu buffer per instance, dialokasi sekali (zero-filled)
//! - Checked: nilai di luar range ditolak, bukan di-truncate
//! - Atomic set: field yang gagal di-encode tidak mengubah buffer

mod codec;
#[allow(clippy::module_inception)]
mod record;
mod types;
mod value;

pub use codec::Codec;
pub use record::{Record, Scope};
pub use types::RecordType;
pub use value::Value;
