//! Layout computation
//!
//! Layout:
//! ┌──────────┬──────────┬─────────────────┬─────┐
//! │ field 0  │ field 1  │ field 2 (array) │ ... │
//! └──────────┴──────────┴─────────────────┴─────┘
//!
//! Tanpa padding dan alignment: offset field ke-i adalah jumlah
//! `size * count` dari semua field sebelumnya.

use std::collections::HashMap;

use super::field::{FieldDef, FieldType};
use crate::error::DefinitionError;

/// Strategi decode/encode sebuah field, ditentukan sekali saat layout dihitung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// count == 1: satu nilai scalar
    Scalar,
    /// count > 1: sequence `count` nilai scalar
    ScalarArray,
    /// u8 dengan count > 1: satu byte string opaque sepanjang `count`
    OpaqueBytes,
}

impl Decode {
    fn for_field(ty: FieldType, count: usize) -> Self {
        match (ty, count) {
            (_, 1) => Self::Scalar,
            (FieldType::U8, _) => Self::OpaqueBytes,
            _ => Self::ScalarArray,
        }
    }
}

/// Posisi dan bentuk satu field di dalam buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub offset: usize,
    pub element_size: usize,
    pub count: usize,
    pub ty: FieldType,
    pub decode: Decode,
}

impl FieldLayout {
    /// Total bytes field ini
    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        self.element_size * self.count
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.offset + self.byte_len()
    }

    #[inline(always)]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}

/// Layout lengkap sebuah record variant.
///
/// Immutable setelah dibuat, aman di-share antar instance lewat `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    fields: Vec<(String, FieldLayout)>,
    lookup: HashMap<String, usize>,
    size: usize,
}

impl Layout {
    /// Hitung layout dari daftar field definition (urutan dipertahankan)
    pub fn compute(defs: &[FieldDef]) -> Result<Self, DefinitionError> {
        let mut fields = Vec::with_capacity(defs.len());
        let mut lookup = HashMap::with_capacity(defs.len());
        let mut size = 0usize;

        for def in defs {
            def.validate()?;

            if lookup.contains_key(def.name.as_ref()) {
                return Err(DefinitionError::DuplicateField(def.name.to_string()));
            }

            let field = FieldLayout {
                offset: size,
                element_size: def.ty.size(),
                count: def.count,
                ty: def.ty,
                decode: Decode::for_field(def.ty, def.count),
            };
            size += field.byte_len();

            lookup.insert(def.name.to_string(), fields.len());
            fields.push((def.name.to_string(), field));
        }

        Ok(Self {
            fields,
            lookup,
            size,
        })
    }

    /// Parse text schema, satu field per baris: `name type [count]`.
    ///
    /// Baris kosong dan komentar `#` di-skip.
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        let mut defs = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = match raw.split_once('#') {
                Some((before, _)) => before,
                None => raw,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|p| !p.is_empty())
                .collect();

            let def = FieldDef::from_parts(&parts).map_err(|e| DefinitionError::Line {
                line: idx + 1,
                source: Box::new(e),
            })?;
            defs.push(def);
        }

        Self::compute(&defs)
    }

    /// Total ukuran record dalam bytes
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, name: &str) -> Option<&FieldLayout> {
        self.lookup.get(name).map(|&i| &self.fields[i].1)
    }

    /// Iterasi field dalam urutan deklarasi
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldLayout)> {
        self.fields.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Kembalikan daftar definition yang menghasilkan layout ini
    pub fn definitions(&self) -> Vec<FieldDef> {
        self.fields
            .iter()
            .map(|(name, f)| FieldDef::owned(name.clone(), f.ty, f.count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FieldDef> {
        vec![
            FieldDef::new("id", FieldType::U32),
            FieldDef::new("flag", FieldType::Bool),
            FieldDef::array("name", FieldType::U8, 4),
        ]
    }

    #[test]
    fn test_offsets_and_size() {
        let layout = Layout::compute(&sample()).unwrap();

        assert_eq!(layout.size(), 9);
        assert_eq!(layout.get("id").unwrap().offset, 0);
        assert_eq!(layout.get("flag").unwrap().offset, 4);
        assert_eq!(layout.get("name").unwrap().offset, 5);
        assert!(layout.get("missing").is_none());
    }

    #[test]
    fn test_offsets_are_running_sum() {
        let defs = vec![
            FieldDef::new("a", FieldType::I8),
            FieldDef::array("b", FieldType::F64, 3),
            FieldDef::new("c", FieldType::U16),
            FieldDef::array("d", FieldType::I32, 2),
            FieldDef::new("e", FieldType::F32),
            FieldDef::new("f", FieldType::U64),
        ];
        let layout = Layout::compute(&defs).unwrap();

        let mut expected = 0;
        for (def, (name, field)) in defs.iter().zip(layout.iter()) {
            assert_eq!(name, def.name);
            assert_eq!(field.offset, expected);
            assert_eq!(field.element_size, def.ty.size());
            expected += def.byte_len();
        }
        assert_eq!(layout.size(), expected);
        assert_eq!(expected, 1 + 24 + 2 + 8 + 4 + 8);
    }

    #[test]
    fn test_decode_strategy() {
        let defs = vec![
            FieldDef::new("byte", FieldType::U8),
            FieldDef::array("raw", FieldType::U8, 3),
            FieldDef::array("signed", FieldType::I8, 3),
            FieldDef::array("words", FieldType::U16, 2),
        ];
        let layout = Layout::compute(&defs).unwrap();

        assert_eq!(layout.get("byte").unwrap().decode, Decode::Scalar);
        assert_eq!(layout.get("raw").unwrap().decode, Decode::OpaqueBytes);
        assert_eq!(layout.get("signed").unwrap().decode, Decode::ScalarArray);
        assert_eq!(layout.get("words").unwrap().decode, Decode::ScalarArray);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let a = Layout::compute(&sample()).unwrap();
        let b = Layout::compute(&sample()).unwrap();
        assert_eq!(a, b);
        assert_eq!(Layout::compute(&a.definitions()).unwrap(), a);
    }

    #[test]
    fn test_duplicate_field() {
        let defs = vec![
            FieldDef::new("id", FieldType::U32),
            FieldDef::new("id", FieldType::U8),
        ];
        assert_eq!(
            Layout::compute(&defs),
            Err(DefinitionError::DuplicateField("id".into()))
        );
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            Layout::compute(&[FieldDef::owned("", FieldType::U8, 1)]),
            Err(DefinitionError::EmptyName)
        );
        assert_eq!(
            FieldDef::from_parts(&["", "u8"]),
            Err(DefinitionError::EmptyName)
        );
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout::compute(&[]).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.size(), 0);
    }

    #[test]
    fn test_parse_text_schema() {
        let layout = Layout::parse(
            "# header\n\
             id    u32\n\
             flag  bool   # trailing comment\n\
             \n\
             name  uint8  4\n",
        )
        .unwrap();

        assert_eq!(layout, Layout::compute(&sample()).unwrap());
    }

    #[test]
    fn test_parse_reports_line() {
        let err = Layout::parse("id u32\nbroken\n").unwrap_err();
        assert_eq!(
            err,
            DefinitionError::Line {
                line: 2,
                source: Box::new(DefinitionError::InvalidArity(1)),
            }
        );

        let err = Layout::parse("id u32\nvalue u128\n").unwrap_err();
        assert!(matches!(err, DefinitionError::Line { line: 2, .. }));
    }
}
