use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Returns `InvalidArgument` from the enclosing function unless the condition holds.
///
/// The argument name and the condition text end up in the error message.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $cond:expr) => {{
        if !$cond {
            return Err($crate::result::unmet_arg(stringify!($name), stringify!($cond)).into());
        }
    }};
}

/// Returns `InvalidFormat` from the enclosing function unless the condition holds.
///
/// Used for checks on index data (offset tables, record layouts) rather than on
/// caller-supplied arguments.
#[macro_export]
macro_rules! verify_data {
    ($element:expr, $cond:expr) => {{
        if !$cond {
            return Err(
                $crate::result::inconsistent_data(stringify!($element), stringify!($cond)).into(),
            );
        }
    }};
}

#[cold]
pub fn unmet_arg(name: &str, condition: &str) -> Error {
    Error::invalid_arg(name, format!("requires `{condition}`"))
}

#[cold]
pub fn inconsistent_data(element: &str, condition: &str) -> Error {
    Error::invalid_format(element, format!("layout check `{condition}` failed"))
}

#[cfg(test)]
mod tests {
    use crate::{Result, error::ErrorKind};

    fn check_threads(num_threads: usize) -> Result<usize> {
        verify_arg!(num_threads, num_threads > 0);
        Ok(num_threads)
    }

    fn check_layout(fields: usize, columns: usize) -> Result<usize> {
        verify_data!(offsets, fields % columns == 0);
        Ok(fields / columns)
    }

    #[test]
    fn test_verify_arg() {
        assert_eq!(check_threads(4).unwrap(), 4);
        let err = check_threads(0).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidArgument { name, message } => {
                assert_eq!(name, "num_threads");
                assert_eq!(message, "requires `num_threads > 0`");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_verify_data() {
        assert_eq!(check_layout(6, 3).unwrap(), 2);
        let err = check_layout(7, 3).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("fields % columns == 0"), "{err}");
    }
}
