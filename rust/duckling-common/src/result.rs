pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns `InvalidArgument` from the enclosing function unless the
/// condition holds. Use for caller mistakes.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        if !$expr {
            return Err($crate::result::failed_arg_check(
                stringify!($name),
                stringify!($expr),
            ));
        }
    }};
}

/// Returns `InvalidFormat` from the enclosing function unless the
/// condition holds. Use for vector data that breaks the engine's layout
/// guarantees.
#[macro_export]
macro_rules! verify_data {
    ($name:expr, $expr:expr) => {{
        if !$expr {
            return Err($crate::result::failed_data_check(
                stringify!($name),
                stringify!($expr),
            ));
        }
    }};
}

#[doc(hidden)]
#[cold]
pub fn failed_arg_check(name: &str, condition: &str) -> crate::error::Error {
    crate::error::Error::invalid_arg(name, format!("expected {condition}"))
}

#[doc(hidden)]
#[cold]
pub fn failed_data_check(element: &str, condition: &str) -> crate::error::Error {
    crate::error::ErrorKind::InvalidFormat {
        element: element.to_string(),
        message: format!("vector data violates {condition}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    fn checked_half(value: usize) -> Result<usize> {
        verify_arg!(value, value % 2 == 0);
        Ok(value / 2)
    }

    fn checked_entry(offset: usize, len: usize, bound: usize) -> Result<()> {
        verify_data!(entry, offset + len <= bound);
        Ok(())
    }

    #[test]
    fn test_verify_arg() {
        assert_eq!(checked_half(4).unwrap(), 2);
        let err = checked_half(3).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidArgument { name, message } => {
                assert_eq!(name, "value");
                assert_eq!(message, "expected value % 2 == 0");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_verify_data() {
        checked_entry(2, 3, 5).unwrap();
        let err = checked_entry(2, 4, 5).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidFormat { element, message } => {
                assert_eq!(element, "entry");
                assert_eq!(message, "vector data violates offset + len <= bound");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.is_corruption());
    }
}
