//! Per-line lexer state packed into the host's `i32` slot.
//!
//! Each lexer that needs more than its style id to resume at a line boundary
//! describes that state as a struct implementing [`LineState`], with the bit
//! layout documented on the struct.

/// A lexer's resumable per-line state.
pub trait LineState: Sized {
    /// Encode into the persisted integer.
    fn pack(&self) -> i32;

    /// Decode a persisted integer.
    fn unpack(raw: i32) -> Self;
}

/// Clamp `value` into `bits` unsigned bits.
///
/// Debug builds assert that the value fits; release builds saturate so an
/// oversized value never spills into neighbouring fields.
pub fn fit_bits(value: u32, bits: u32, field: &'static str) -> u32 {
    let max = (1u32 << bits) - 1;
    debug_assert!(value <= max, "{field} overflows {bits} bits: {value}");
    if value > max {
        tracing::warn!(field, value, bits, "line state field saturated");
    }
    value.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_bits_in_range() {
        assert_eq!(fit_bits(0, 4, "mode"), 0);
        assert_eq!(fit_bits(15, 4, "mode"), 15);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_fit_bits_saturates() {
        assert_eq!(fit_bits(99, 4, "mode"), 15);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overflows")]
    fn test_fit_bits_asserts() {
        fit_bits(99, 4, "mode");
    }
}
