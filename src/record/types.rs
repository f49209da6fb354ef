//! Record variant statis
//!
//! Variant dideklarasikan sekali lewat `record_type!`; layout-nya dihitung
//! saat pertama dipakai lalu di-cache untuk semua instance.

use std::sync::Arc;

use crate::error::Result;
use crate::schema::{FieldDef, Layout};

/// Record variant dengan daftar field tetap
pub trait RecordType {
    /// Field dalam urutan deklarasi
    fn fields() -> Vec<FieldDef>;

    /// Layout ter-cache untuk variant ini
    fn layout() -> Result<Arc<Layout>>;
}

/// Deklarasi record variant.
///
/// ```
/// kemas::record_type! {
///     /// Header paket
///     pub struct Packet {
///         id: U32,
///         flag: Bool,
///         name: U8[4],
///     }
/// }
///
/// let rec = kemas::Record::of::<Packet>(kemas::Endian::Little).unwrap();
/// assert_eq!(rec.size(), 9);
/// ```
#[macro_export]
macro_rules! record_type {
    (@def $field:ident, $ty:ident) => {
        $crate::FieldDef::new(::std::stringify!($field), $crate::FieldType::$ty)
    };
    (@def $field:ident, $ty:ident, $count:expr) => {
        $crate::FieldDef::array(::std::stringify!($field), $crate::FieldType::$ty, $count)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field:ident : $ty:ident $([$count:expr])?),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::RecordType for $name {
            fn fields() -> ::std::vec::Vec<$crate::FieldDef> {
                ::std::vec![
                    $($crate::record_type!(@def $field, $ty $(, $count)?)),*
                ]
            }

            fn layout() -> $crate::Result<::std::sync::Arc<$crate::Layout>> {
                static LAYOUT: $crate::__private::Lazy<
                    ::std::result::Result<::std::sync::Arc<$crate::Layout>, $crate::DefinitionError>,
                > = $crate::__private::Lazy::new(|| {
                    $crate::Layout::compute(&<$name as $crate::RecordType>::fields())
                        .map(::std::sync::Arc::new)
                });
                LAYOUT.clone().map_err(::std::convert::Into::into)
            }
        }
    };
}
