use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_format(name: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: name.into(),
                message: Default::default(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn unsupported_type(type_name: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnsupportedType {
                type_name: type_name.into(),
            }
            .into(),
        )
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        Error(
            ErrorKind::TypeMismatch {
                expected: expected.into(),
                actual: actual.into(),
            }
            .into(),
        )
    }

    pub fn invalid_decimal_width(width: u8) -> Error {
        Error(ErrorKind::InvalidDecimalWidth { width }.into())
    }

    pub fn invalid_enum_index(index: u32, dictionary_size: usize) -> Error {
        Error(
            ErrorKind::InvalidEnumIndex {
                index,
                dictionary_size,
            }
            .into(),
        )
    }

    pub fn invalid_discriminant(tag: u8, alternatives: usize) -> Error {
        Error(ErrorKind::InvalidDiscriminant { tag, alternatives }.into())
    }

    /// Returns `true` if the error reports a value the engine should never
    /// have produced, as opposed to a misuse by the caller.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidFormat { .. }
                | ErrorKind::InvalidDecimalWidth { .. }
                | ErrorKind::InvalidEnumIndex { .. }
                | ErrorKind::InvalidDiscriminant { .. }
                | ErrorKind::InvalidUtf8 { .. }
                | ErrorKind::NullMapEntry { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid vector data for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("unsupported logical type {type_name}")]
    UnsupportedType { type_name: String },

    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("invalid DECIMAL width {width}, expected 1..=38")]
    InvalidDecimalWidth { width: u8 },

    #[error("ENUM index {index} is out of range for a dictionary of {dictionary_size} values")]
    InvalidEnumIndex { index: u32, dictionary_size: usize },

    #[error("UNION tag {tag} is out of range for {alternatives} alternatives")]
    InvalidDiscriminant { tag: u8, alternatives: usize },

    #[error("VARCHAR value at row {row} is not valid UTF-8")]
    InvalidUtf8 {
        row: usize,
        source: std::str::Utf8Error,
    },

    #[error("MAP entry {entry} of row {row} is null")]
    NullMapEntry { row: usize, entry: usize },

    #[error("logical type nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::invalid_decimal_width(40);
        assert_eq!(err.to_string(), "invalid DECIMAL width 40, expected 1..=38");
        assert!(err.is_corruption());

        let err = Error::type_mismatch("VARCHAR", "INTEGER");
        assert_eq!(
            err.to_string(),
            "type mismatch: expected VARCHAR, found INTEGER"
        );
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_into_kind() {
        let err = Error::invalid_enum_index(7, 3);
        match err.into_kind() {
            ErrorKind::InvalidEnumIndex {
                index,
                dictionary_size,
            } => {
                assert_eq!(index, 7);
                assert_eq!(dictionary_size, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
