//! Grammar and range limits for EDM literals.
//!
//! These are wire-format constants: client and service must agree on them.

/// Maximum integer digits in an Edm.Decimal literal.
pub const MAX_DECIMAL_INTEGER_DIGITS: usize = 29;

/// Maximum fractional digits in an Edm.Decimal literal.
pub const MAX_DECIMAL_FRACTION_DIGITS: usize = 29;

/// Maximum mantissa digits (each side of the point) in an Edm.Double literal.
pub const MAX_DOUBLE_DIGITS: usize = 17;

/// Maximum exponent digits in an Edm.Double literal.
pub const MAX_DOUBLE_EXPONENT_DIGITS: usize = 3;

/// Maximum mantissa digits (each side of the point) in an Edm.Single literal.
pub const MAX_SINGLE_DIGITS: usize = 9;

/// Maximum exponent digits in an Edm.Single literal.
pub const MAX_SINGLE_EXPONENT_DIGITS: usize = 2;

/// Maximum fractional-second digits accepted by temporal literals.
pub const MAX_FRACTIONAL_SECONDS_DIGITS: usize = 12;

/// Fractional-second digits the host representations can hold (nanoseconds).
pub const HOST_FRACTIONAL_SECONDS_DIGITS: usize = 9;

/// Maximum depth of a base-type chain before it is treated as cyclic.
pub const MAX_BASE_TYPE_DEPTH: usize = 64;

/// Largest integer magnitude an f64 represents exactly (2^53).
pub const MAX_EXACT_F64_INTEGER: i64 = 1 << 53;

/// Largest integer magnitude an f32 represents exactly (2^24).
pub const MAX_EXACT_F32_INTEGER: i64 = 1 << 24;

/// Largest year magnitude the temporal host representations accept.
pub const MAX_YEAR_MAGNITUDE: i64 = 999_999;

/// Largest UTC offset magnitude in minutes (+/-24:00).
pub const MAX_OFFSET_MINUTES: i16 = 1440;
