//! Error taxonomy
//!
//! Semua error dikembalikan langsung ke caller, tidak ada yang di-log
//! atau ditelan di dalam library.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Field definition yang tidak valid. Fatal untuk konstruksi layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("field definition has {0} elements, expected 2 (name, type) or 3 (name, type, count)")]
    InvalidArity(usize),

    #[error("unknown field type `{0}`")]
    UnknownType(String),

    #[error("field `{field}` has invalid count `{count}`, must be a positive integer")]
    InvalidCount { field: String, count: String },

    #[error("duplicate field name `{0}`")]
    DuplicateField(String),

    #[error("field name must not be empty")]
    EmptyName,

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<DefinitionError>,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("value {value} out of range for field `{field}` ({ty})")]
    Range {
        field: String,
        ty: &'static str,
        value: String,
    },

    #[error("write of {len} bytes at offset {offset} exceeds buffer of {size} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("field `{field}` ({ty}) cannot hold a {kind} value")]
    TypeMismatch {
        field: String,
        ty: &'static str,
        kind: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_converts() {
        let err: Error = DefinitionError::InvalidArity(4).into();
        assert!(matches!(err, Error::Definition(DefinitionError::InvalidArity(4))));
    }

    #[test]
    fn test_display() {
        let err = Error::OutOfRange {
            offset: 8,
            len: 4,
            size: 9,
        };
        assert_eq!(
            err.to_string(),
            "write of 4 bytes at offset 8 exceeds buffer of 9 bytes"
        );

        let err = Error::Definition(DefinitionError::Line {
            line: 3,
            source: Box::new(DefinitionError::UnknownType("u128".into())),
        });
        assert_eq!(
            err.to_string(),
            "invalid definition: line 3: unknown field type `u128`"
        );
    }
}
