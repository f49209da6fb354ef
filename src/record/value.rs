//! Dynamic value yang dibaca/ditulis lewat `Record::get` / `Record::set`

use std::fmt;

/// Nilai sebuah field.
///
/// Unsigned field selalu decode ke `UInt`, signed ke `Int`, float ke `Float`
/// (f32 di-widen), u8 array ke `Bytes`, array lain ke `List`.
///
/// Konversi dari u8: `&[u8]`, `&[u8; N]`, `Vec<u8>` dan `&str` menjadi `Bytes`,
/// sedangkan array by-value `[u8; N]` menjadi `List` seperti array lain.
/// Untuk field byte string pakai bentuk reference (`b"abcd"`, `&buf`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    /// Nama jenis value, dipakai di pesan error
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::UInt(_) => "unsigned integer",
            Self::Int(_) => "signed integer",
            Self::Float(_) => "float",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Integer apapun yang muat di u64
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::UInt(v) => Some(v),
            Self::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Integer apapun yang muat di i64
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bytes(v) => {
                f.write_str("b\"")?;
                for &b in v {
                    match b {
                        b'\\' => f.write_str("\\\\")?,
                        b'"' => f.write_str("\\\"")?,
                        0x20..=0x7e => write!(f, "{}", b as char)?,
                        _ => write!(f, "\\x{:02x}", b)?,
                    }
                }
                f.write_str("\"")
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($src:ty),+) => {
        $(
            impl From<$src> for Value {
                #[inline(always)]
                fn from(v: $src) -> Self {
                    Self::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from!(UInt as u64: u8, u16, u32, u64);
impl_from!(Int as i64: i8, i16, i32, i64);
impl_from!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(v: &[u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Bytes(v.as_bytes().to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

/// `[1u16, 2, 3]` -> `Value::List`, termasuk `[u8; N]`. Bytes lewat `From<&[u8; N]>`.
impl<T, const N: usize> From<[T; N]> for Value
where
    T: Into<Value>,
{
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
