//! Conversion of field text into typed values.

use readidx_index::field::numeric_token;

/// Bit pattern of the floating-point missing value: a signaling NaN whose low word
/// is 1954, as used by R's `NA_real_`.
pub const NA_F64_BITS: u64 = 0x7FF0_0000_0000_07A2;

/// The floating-point missing value.
pub const NA_F64: f64 = f64::from_bits(NA_F64_BITS);

/// The 32-bit integer missing value.
pub const NA_I32: i32 = i32::MIN;

/// The 64-bit integer missing value.
pub const NA_I64: i64 = i64::MIN;

/// A value type a column can be materialized into.
///
/// Parsing is total: text that does not convert yields [`FieldValue::missing`].
/// It must also be deterministic, since single reads and full materialization
/// parse the same field independently and have to agree.
pub trait FieldValue: Copy + Send + Sync + 'static {
    const TYPE_NAME: &'static str;

    /// The sentinel standing for "not available".
    fn missing() -> Self;

    fn is_missing(&self) -> bool;

    /// Parses an already extracted token.
    fn parse_token(token: &[u8]) -> Self;

    /// Parses the raw span of a field as stored in the offset table.
    #[inline]
    fn parse_field(raw: &[u8]) -> Self {
        Self::parse_token(numeric_token(raw))
    }
}

fn token_str(token: &[u8]) -> Option<&str> {
    if token.is_empty() || token == b"NA" {
        return None;
    }
    std::str::from_utf8(token).ok()
}

impl FieldValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    #[inline]
    fn missing() -> f64 {
        NA_F64
    }

    #[inline]
    fn is_missing(&self) -> bool {
        self.to_bits() == NA_F64_BITS
    }

    fn parse_token(token: &[u8]) -> f64 {
        token_str(token)
            .and_then(|s| s.parse().ok())
            .unwrap_or(NA_F64)
    }
}

impl FieldValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    #[inline]
    fn missing() -> i32 {
        NA_I32
    }

    #[inline]
    fn is_missing(&self) -> bool {
        *self == NA_I32
    }

    fn parse_token(token: &[u8]) -> i32 {
        token_str(token)
            .and_then(|s| s.parse().ok())
            .unwrap_or(NA_I32)
    }
}

impl FieldValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    #[inline]
    fn missing() -> i64 {
        NA_I64
    }

    #[inline]
    fn is_missing(&self) -> bool {
        *self == NA_I64
    }

    fn parse_token(token: &[u8]) -> i64 {
        token_str(token)
            .and_then(|s| s.parse().ok())
            .unwrap_or(NA_I64)
    }
}
