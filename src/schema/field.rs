//! Primitive field types dan field definition
//!
//! Setiap tipe punya tag numerik tetap (0..=10) dan ukuran elemen tetap.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;

/// Byte order untuk semua field multi-byte
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    #[default]
    Little = 0,
    Big = 1,
}

impl Endian {
    #[inline(always)]
    pub fn from_tag(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Little),
            1 => Some(Self::Big),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl FromStr for Endian {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" | "<" | "0" => Ok(Self::Little),
            "big" | "be" | ">" | "1" => Ok(Self::Big),
            other => Err(format!("unknown endianness `{}`", other)),
        }
    }
}

/// Tipe primitif sebuah field
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    U8 = 0,
    U16 = 1,
    U32 = 2,
    U64 = 3,
    I8 = 4,
    I16 = 5,
    I32 = 6,
    I64 = 7,
    F32 = 8,
    F64 = 9,
    Bool = 10,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Bool,
    ];

    #[inline(always)]
    pub fn from_tag(v: u8) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    #[inline(always)]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Ukuran satu elemen dalam bytes
    #[inline(always)]
    pub const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Bool => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
        }
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = DefinitionError;

    /// Menerima nama pendek (`u32`), nama panjang (`uint32`, `UINT32`),
    /// atau tag numerik (`2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tag) = s.parse::<u8>() {
            return Self::from_tag(tag).ok_or_else(|| DefinitionError::UnknownType(s.to_string()));
        }

        let ty = match s.to_ascii_lowercase().as_str() {
            "u8" | "uint8" => Self::U8,
            "u16" | "uint16" => Self::U16,
            "u32" | "uint32" => Self::U32,
            "u64" | "uint64" => Self::U64,
            "i8" | "int8" => Self::I8,
            "i16" | "int16" => Self::I16,
            "i32" | "int32" => Self::I32,
            "i64" | "int64" => Self::I64,
            "f32" | "float32" | "float" => Self::F32,
            "f64" | "float64" | "double" => Self::F64,
            "bool" | "boolean" => Self::Bool,
            _ => return Err(DefinitionError::UnknownType(s.to_string())),
        };
        Ok(ty)
    }
}

/// Definisi satu field: nama, tipe, dan jumlah elemen (default 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: Cow<'static, str>,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

impl FieldDef {
    /// Field scalar (count = 1)
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name: Cow::Borrowed(name),
            ty,
            count: 1,
        }
    }

    /// Field array dengan `count` elemen
    pub const fn array(name: &'static str, ty: FieldType, count: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            ty,
            count,
        }
    }

    pub fn owned(name: impl Into<String>, ty: FieldType, count: usize) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            ty,
            count,
        }
    }

    /// Parse definisi positional: `[name, type]` atau `[name, type, count]`.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, DefinitionError> {
        let (name, ty, count) = match parts {
            [name, ty] => (name.as_ref(), ty.as_ref(), None),
            [name, ty, count] => (name.as_ref(), ty.as_ref(), Some(count.as_ref())),
            _ => return Err(DefinitionError::InvalidArity(parts.len())),
        };

        let ty = ty.parse::<FieldType>()?;
        let count = match count {
            None => 1,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    return Err(DefinitionError::InvalidCount {
                        field: name.to_string(),
                        count: raw.to_string(),
                    })
                }
            },
        };

        let def = Self::owned(name, ty, count);
        def.validate()?;
        Ok(def)
    }

    /// Total bytes yang dipakai field ini
    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        self.ty.size() * self.count
    }

    pub(crate) fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }
        if self.count == 0 {
            return Err(DefinitionError::InvalidCount {
                field: self.name.to_string(),
                count: "0".to_string(),
            });
        }
        Ok(())
    }
}
