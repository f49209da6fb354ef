//! Record instance: satu buffer + layout yang di-share
//!
//! Buffer dimiliki eksklusif oleh instance. Layout immutable dan di-share
//! lewat `Arc`, jadi membuat banyak record dari variant yang sama tidak
//! menghitung ulang offset.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::codec::{mismatch, Codec};
use super::types::RecordType;
use super::value::Value;
use crate::error::{Error, Result};
use crate::schema::{Decode, Endian, FieldLayout, Layout};

static EMPTY_LAYOUT: Lazy<Arc<Layout>> = Lazy::new(|| Arc::new(Layout::default()));

/// Record dengan buffer packed dan akses field by name
#[derive(Clone)]
pub struct Record {
    layout: Arc<Layout>,
    codec: Codec,
    buffer: Box<[u8]>,
}

impl Record {
    /// Membuat record baru dengan buffer zero-filled
    pub fn new(layout: impl Into<Arc<Layout>>, endian: Endian) -> Self {
        let mut record = Self {
            layout: layout.into(),
            codec: Codec::new(endian),
            buffer: Box::default(),
        };
        record.allocate();
        record
    }

    /// Membuat record dari bytes yang sudah ada
    ///
    /// Gagal dengan `SizeMismatch` jika panjang `data` != ukuran layout.
    pub fn from_bytes(layout: impl Into<Arc<Layout>>, data: &[u8], endian: Endian) -> Result<Self> {
        let mut record = Self::new(layout, endian);
        record.load_buffer(data)?;
        Ok(record)
    }

    /// Record zero-filled untuk variant statis `T` (layout di-cache)
    pub fn of<T: RecordType>(endian: Endian) -> Result<Self> {
        Ok(Self::new(T::layout()?, endian))
    }

    /// Record untuk variant statis `T`, buffer diisi dari `data`
    pub fn create<T: RecordType>(data: &[u8], endian: Endian) -> Result<Self> {
        Self::from_bytes(T::layout()?, data, endian)
    }

    /// Alokasi ulang buffer zero-filled sesuai ukuran layout
    pub fn allocate(&mut self) {
        self.buffer = vec![0u8; self.layout.size()].into_boxed_slice();
    }

    /// Ganti seluruh buffer. Tidak ada partial write jika ukuran salah.
    pub fn load_buffer(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.layout.size() {
            return Err(Error::SizeMismatch {
                expected: self.layout.size(),
                actual: data.len(),
            });
        }
        self.buffer = data.into();
        Ok(())
    }

    /// Raw overwrite mulai `offset`, tanpa melihat field lookup
    pub fn copy_into(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= self.buffer.len())
            .ok_or(Error::OutOfRange {
                offset,
                len: data.len(),
                size: self.buffer.len(),
            })?;

        self.buffer[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Snapshot isi buffer saat ini
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn endian(&self) -> Endian {
        self.codec.endian()
    }

    #[inline(always)]
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    fn field(&self, name: &str) -> Result<FieldLayout> {
        self.layout
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    /// Baca nilai field
    pub fn get(&self, name: &str) -> Result<Value> {
        let field = self.field(name)?;
        Ok(self.decode(&field))
    }

    fn decode(&self, field: &FieldLayout) -> Value {
        let bytes = &self.buffer[field.range()];
        match field.decode {
            Decode::Scalar => self.codec.read(field.ty, bytes),
            Decode::OpaqueBytes => Value::Bytes(bytes.to_vec()),
            Decode::ScalarArray => Value::List(
                bytes
                    .chunks_exact(field.element_size)
                    .map(|chunk| self.codec.read(field.ty, chunk))
                    .collect(),
            ),
        }
    }

    /// Tulis nilai field. Jika gagal, buffer tidak berubah.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?;
        let value = value.into();

        match field.decode {
            Decode::Scalar => {
                // [v] diterima untuk field scalar
                let scalar = match &value {
                    Value::List(items) if items.len() == 1 => &items[0],
                    Value::List(items) => {
                        return Err(Error::SizeMismatch {
                            expected: 1,
                            actual: items.len(),
                        })
                    }
                    other => other,
                };
                self.codec
                    .write(name, field.ty, scalar, &mut self.buffer[field.range()])
            }
            Decode::OpaqueBytes => match &value {
                Value::Bytes(bytes) if bytes.len() == field.count => {
                    self.buffer[field.range()].copy_from_slice(bytes);
                    Ok(())
                }
                Value::Bytes(bytes) => Err(Error::SizeMismatch {
                    expected: field.count,
                    actual: bytes.len(),
                }),
                other => Err(mismatch(name, field.ty, other)),
            },
            Decode::ScalarArray => {
                let items = match &value {
                    Value::List(items) => items,
                    Value::Bytes(_) => return Err(mismatch(name, field.ty, &value)),
                    _ => {
                        return Err(Error::SizeMismatch {
                            expected: field.count,
                            actual: 1,
                        })
                    }
                };
                if items.len() != field.count {
                    return Err(Error::SizeMismatch {
                        expected: field.count,
                        actual: items.len(),
                    });
                }

                // Encode ke scratch dulu supaya elemen yang gagal tidak
                // meninggalkan buffer setengah tertulis
                let mut scratch = vec![0u8; field.byte_len()];
                for (item, slot) in items.iter().zip(scratch.chunks_exact_mut(field.element_size)) {
                    self.codec.write(name, field.ty, item, slot)?;
                }
                self.buffer[field.range()].copy_from_slice(&scratch);
                Ok(())
            }
        }
    }

    /// Semua field dalam urutan deklarasi
    pub fn entries(&self) -> Vec<(&str, Value)> {
        self.layout
            .iter()
            .map(|(name, field)| (name, self.decode(field)))
            .collect()
    }

    /// Record baru dengan layout sama, semua field di-encode ulang ke `endian`
    pub fn reencode(&self, endian: Endian) -> Result<Self> {
        let mut out = Self::new(Arc::clone(&self.layout), endian);
        for (name, field) in self.layout.iter() {
            out.set(name, self.decode(field))?;
        }
        Ok(out)
    }

    /// Kembali ke state default: layout kosong, buffer kosong, little endian
    pub fn reset(&mut self) {
        self.layout = Arc::clone(&EMPTY_LAYOUT);
        self.codec = Codec::new(Endian::Little);
        self.buffer = Box::default();
    }

    /// Guard yang me-reset record saat keluar scope
    pub fn scope(&mut self) -> Scope<'_> {
        Scope { record: self }
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Record");
        s.field("endian", &self.endian()).field("size", &self.size());
        for (name, value) in self.entries() {
            s.field(name, &format_args!("{}", value));
        }
        s.finish()
    }
}

/// Scope guard dari `Record::scope`
pub struct Scope<'a> {
    record: &'a mut Record,
}

impl Deref for Scope<'_> {
    type Target = Record;

    fn deref(&self) -> &Record {
        self.record
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Record {
        self.record
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.record.reset();
    }
}
