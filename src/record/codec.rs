//! Element Encoder/Decoder
//!
//! Encode dan decode satu elemen primitif langsung ke/dari slot di buffer.
//! Semua konversi numerik di-check: nilai di luar range ditolak, tidak
//! pernah di-truncate.

use crate::error::{Error, Result};
use crate::schema::{Endian, FieldType};

use super::value::Value;

#[inline(always)]
fn take<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut raw = [0u8; N];
    raw.copy_from_slice(&bytes[..N]);
    raw
}

macro_rules! read_as {
    ($t:ty, $endian:expr, $bytes:expr) => {{
        let raw = take::<{ std::mem::size_of::<$t>() }>($bytes);
        match $endian {
            Endian::Little => <$t>::from_le_bytes(raw),
            Endian::Big => <$t>::from_be_bytes(raw),
        }
    }};
}

macro_rules! write_as {
    ($v:expr, $endian:expr, $out:expr) => {{
        let v = $v;
        let raw = match $endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        $out[..raw.len()].copy_from_slice(&raw);
    }};
}

/// Codec per-elemen untuk satu byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    endian: Endian,
}

impl Codec {
    #[inline(always)]
    pub fn new(endian: Endian) -> Self {
        Self { endian }
    }

    #[inline(always)]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Decode satu elemen `ty` dari awal `bytes`
    ///
    /// `bytes` minimal `ty.size()` panjangnya (dijamin oleh layout).
    #[inline(always)]
    pub fn read(&self, ty: FieldType, bytes: &[u8]) -> Value {
        let e = self.endian;
        match ty {
            FieldType::U8 => Value::UInt(bytes[0] as u64),
            FieldType::U16 => Value::UInt(read_as!(u16, e, bytes) as u64),
            FieldType::U32 => Value::UInt(read_as!(u32, e, bytes) as u64),
            FieldType::U64 => Value::UInt(read_as!(u64, e, bytes)),
            FieldType::I8 => Value::Int(bytes[0] as i8 as i64),
            FieldType::I16 => Value::Int(read_as!(i16, e, bytes) as i64),
            FieldType::I32 => Value::Int(read_as!(i32, e, bytes) as i64),
            FieldType::I64 => Value::Int(read_as!(i64, e, bytes)),
            FieldType::F32 => Value::Float(read_as!(f32, e, bytes) as f64),
            FieldType::F64 => Value::Float(read_as!(f64, e, bytes)),
            FieldType::Bool => Value::Bool(bytes[0] != 0),
        }
    }

    /// Encode satu elemen `ty` ke awal `out`
    ///
    /// `field` hanya dipakai untuk pesan error.
    pub fn write(&self, field: &str, ty: FieldType, value: &Value, out: &mut [u8]) -> Result<()> {
        let e = self.endian;
        match ty {
            FieldType::U8 => write_as!(integer::<u8>(field, ty, value)?, e, out),
            FieldType::U16 => write_as!(integer::<u16>(field, ty, value)?, e, out),
            FieldType::U32 => write_as!(integer::<u32>(field, ty, value)?, e, out),
            FieldType::U64 => write_as!(integer::<u64>(field, ty, value)?, e, out),
            FieldType::I8 => write_as!(integer::<i8>(field, ty, value)?, e, out),
            FieldType::I16 => write_as!(integer::<i16>(field, ty, value)?, e, out),
            FieldType::I32 => write_as!(integer::<i32>(field, ty, value)?, e, out),
            FieldType::I64 => write_as!(integer::<i64>(field, ty, value)?, e, out),
            FieldType::F32 => {
                let v = float(field, ty, value)?;
                // round ke nearest dulu; hanya overflow ke infinity yang ditolak
                let narrow = v as f32;
                if v.is_finite() && narrow.is_infinite() {
                    return Err(out_of_range(field, ty, value));
                }
                write_as!(narrow, e, out)
            }
            FieldType::F64 => write_as!(float(field, ty, value)?, e, out),
            FieldType::Bool => {
                let v = match *value {
                    Value::Bool(b) => b,
                    Value::UInt(n) => n != 0,
                    Value::Int(n) => n != 0,
                    _ => return Err(mismatch(field, ty, value)),
                };
                out[0] = v as u8;
            }
        }
        Ok(())
    }
}

/// Integer (atau bool sebagai 0/1) ke tipe target, dengan range check
fn integer<T: TryFrom<i128>>(field: &str, ty: FieldType, value: &Value) -> Result<T> {
    let wide = match *value {
        Value::UInt(n) => n as i128,
        Value::Int(n) => n as i128,
        Value::Bool(b) => b as i128,
        _ => return Err(mismatch(field, ty, value)),
    };
    T::try_from(wide).map_err(|_| out_of_range(field, ty, value))
}

fn float(field: &str, ty: FieldType, value: &Value) -> Result<f64> {
    match *value {
        Value::Float(v) => Ok(v),
        Value::UInt(n) => Ok(n as f64),
        Value::Int(n) => Ok(n as f64),
        Value::Bool(b) => Ok(b as u8 as f64),
        _ => Err(mismatch(field, ty, value)),
    }
}

fn out_of_range(field: &str, ty: FieldType, value: &Value) -> Error {
    Error::Range {
        field: field.to_string(),
        ty: ty.name(),
        value: value.to_string(),
    }
}

pub(crate) fn mismatch(field: &str, ty: FieldType, value: &Value) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        ty: ty.name(),
        kind: value.kind(),
    }
}
