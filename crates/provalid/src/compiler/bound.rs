//! Numeric bound and range primitives.
//!
//! Bounds are tagged by primitive kind. Unsigned kinds carry *signed bit
//! patterns* (the storage form of many target languages) and compare with
//! unsigned reinterpretation, never the native signed ordering.

use std::cmp::Ordering;
use std::fmt;

use prost_reflect::Kind;

/// The numeric primitive kinds a bound can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// 32-bit signed (covers `int32`, `sint32`, `sfixed32`).
    Int32,
    /// 64-bit signed (covers `int64`, `sint64`, `sfixed64`).
    Int64,
    /// 32-bit unsigned (covers `uint32`, `fixed32`).
    UInt32,
    /// 64-bit unsigned (covers `uint64`, `fixed64`).
    UInt64,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
}

impl NumericKind {
    /// Map a descriptor kind onto its bound kind, or `None` for
    /// non-numeric fields.
    #[must_use]
    pub fn of(kind: &Kind) -> Option<Self> {
        match kind {
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => Some(Self::Int32),
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => Some(Self::Int64),
            Kind::Uint32 | Kind::Fixed32 => Some(Self::UInt32),
            Kind::Uint64 | Kind::Fixed64 => Some(Self::UInt64),
            Kind::Float => Some(Self::Float),
            Kind::Double => Some(Self::Double),
            _ => None,
        }
    }

    /// Whether values of this kind are stored as signed bit patterns but
    /// compared with unsigned semantics.
    #[must_use]
    pub fn is_unsigned(self) -> bool {
        matches!(self, Self::UInt32 | Self::UInt64)
    }

    /// Printable kind name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// A numeric threshold tagged by its primitive kind.
///
/// `UInt32`/`UInt64` store the signed bit pattern; [`BoundValue::compare`]
/// reinterprets it unsigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundValue {
    /// 32-bit signed value.
    Int32(i32),
    /// 64-bit signed value.
    Int64(i64),
    /// 32-bit unsigned value, stored as its signed bit pattern.
    UInt32(i32),
    /// 64-bit unsigned value, stored as its signed bit pattern.
    UInt64(i64),
    /// 32-bit float value.
    Float(f32),
    /// 64-bit float value.
    Double(f64),
}

impl BoundValue {
    /// The primitive kind this value is tagged with.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Int32(_) => NumericKind::Int32,
            Self::Int64(_) => NumericKind::Int64,
            Self::UInt32(_) => NumericKind::UInt32,
            Self::UInt64(_) => NumericKind::UInt64,
            Self::Float(_) => NumericKind::Float,
            Self::Double(_) => NumericKind::Double,
        }
    }

    /// Parse a decimal literal for the given kind.
    ///
    /// Unsigned kinds parse the unsigned decimal form and store the bit
    /// pattern; `4294967295` therefore lands as signed `-1`.
    pub fn parse(kind: NumericKind, text: &str) -> Result<Self, String> {
        let text = text.trim();
        let invalid = || format!("`{text}` is not a valid {} literal", kind.name());
        #[allow(clippy::cast_possible_wrap)]
        let parsed = match kind {
            NumericKind::Int32 => text.parse::<i32>().ok().map(Self::Int32),
            NumericKind::Int64 => text.parse::<i64>().ok().map(Self::Int64),
            NumericKind::UInt32 => text.parse::<u32>().ok().map(|v| Self::UInt32(v as i32)),
            NumericKind::UInt64 => text.parse::<u64>().ok().map(|v| Self::UInt64(v as i64)),
            NumericKind::Float => text.parse::<f32>().ok().map(Self::Float),
            NumericKind::Double => text.parse::<f64>().ok().map(Self::Double),
        };
        parsed.ok_or_else(invalid)
    }

    /// Compare two values of the same kind.
    ///
    /// Unsigned kinds compare their bit patterns reinterpreted as unsigned;
    /// floats use their partial order. Mismatched kinds and NaN yield
    /// `None`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int32(a), Self::Int32(b)) => Some(a.cmp(b)),
            (Self::Int64(a), Self::Int64(b)) => Some(a.cmp(b)),
            #[allow(clippy::cast_sign_loss)]
            (Self::UInt32(a), Self::UInt32(b)) => Some((*a as u32).cmp(&(*b as u32))),
            #[allow(clippy::cast_sign_loss)]
            (Self::UInt64(a), Self::UInt64(b)) => Some((*a as u64).cmp(&(*b as u64))),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            #[allow(clippy::cast_sign_loss)]
            Self::UInt32(v) => write!(f, "{}", *v as u32),
            #[allow(clippy::cast_sign_loss)]
            Self::UInt64(v) => write!(f, "{}", *v as u64),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
        }
    }
}

/// A single threshold with an exclusivity flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    /// The threshold value.
    pub value: BoundValue,
    /// Whether the threshold itself is out of bounds.
    pub exclusive: bool,
}

impl Bound {
    /// Create a bound.
    #[must_use]
    pub fn new(value: BoundValue, exclusive: bool) -> Self {
        Self { value, exclusive }
    }

    /// Whether `value` falls below this bound, treating it as a lower bound:
    /// out of bounds when `value < bound` (inclusive) or `value <= bound`
    /// (exclusive). Incomparable values (kind mismatch, NaN) are out of
    /// bounds.
    #[must_use]
    pub fn is_out_of_bounds_low(&self, value: &BoundValue) -> bool {
        match value.compare(&self.value) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.exclusive,
            Some(Ordering::Greater) => false,
            None => true,
        }
    }

    /// Symmetric to [`Self::is_out_of_bounds_low`] for an upper bound.
    #[must_use]
    pub fn is_out_of_bounds_high(&self, value: &BoundValue) -> bool {
        match value.compare(&self.value) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.exclusive,
            Some(Ordering::Less) => false,
            None => true,
        }
    }
}

/// Two bounds combined: a value is invalid if it fails either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// The lower bound, if constrained below.
    pub lower: Option<Bound>,
    /// The upper bound, if constrained above.
    pub upper: Option<Bound>,
}

impl Range {
    /// A range constrained on one side only.
    #[must_use]
    pub fn at_least(bound: Bound) -> Self {
        Self {
            lower: Some(bound),
            upper: None,
        }
    }

    /// A range constrained on one side only.
    #[must_use]
    pub fn at_most(bound: Bound) -> Self {
        Self {
            lower: None,
            upper: Some(bound),
        }
    }

    /// Whether `value` violates either side.
    #[must_use]
    pub fn is_out_of_bounds(&self, value: &BoundValue) -> bool {
        self.lower
            .as_ref()
            .is_some_and(|bound| bound.is_out_of_bounds_low(value))
            || self
                .upper
                .as_ref()
                .is_some_and(|bound| bound.is_out_of_bounds_high(value))
    }

    /// Parse bracket notation, e.g. `[0..10)`: `[`/`]` make the adjacent
    /// bound inclusive, `(`/`)` exclusive, `..` separates the two decimal
    /// literals.
    ///
    /// The returned error is the human-readable detail for a
    /// `MalformedRangeNotation` diagnostic.
    pub fn parse(notation: &str, kind: NumericKind) -> Result<Self, String> {
        let notation = notation.trim();
        let mut chars = notation.chars();
        let open = chars.next().ok_or_else(|| "empty notation".to_string())?;
        let close = chars
            .next_back()
            .ok_or_else(|| "missing closing bracket".to_string())?;

        let lower_exclusive = match open {
            '[' => false,
            '(' => true,
            other => return Err(format!("expected `[` or `(`, found `{other}`")),
        };
        let upper_exclusive = match close {
            ']' => false,
            ')' => true,
            other => return Err(format!("expected `]` or `)`, found `{other}`")),
        };

        let inner = &notation[1..notation.len() - 1];
        let (low, high) = inner
            .split_once("..")
            .ok_or_else(|| "expected `..` between the bounds".to_string())?;

        let lower = BoundValue::parse(kind, low)?;
        let upper = BoundValue::parse(kind, high)?;

        if lower.compare(&upper) == Some(Ordering::Greater) {
            return Err(format!("lower bound {lower} exceeds upper bound {upper}"));
        }

        Ok(Self {
            lower: Some(Bound::new(lower, lower_exclusive)),
            upper: Some(Bound::new(upper, upper_exclusive)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use proptest::prelude::*;

    use super::{Bound, BoundValue, NumericKind, Range};

    #[test]
    fn uint32_bounds_compare_unsigned_not_signed() {
        // 4294967295 stored as the signed bit pattern -1.
        let bound = Bound::new(BoundValue::parse(NumericKind::UInt32, "4294967295").unwrap(), false);
        assert_eq!(bound.value, BoundValue::UInt32(-1));

        // A value with the same bit pattern equals the bound: in bounds on
        // both sides. A naive signed comparison would call -1 the minimum.
        let value = BoundValue::UInt32(-1);
        assert!(!bound.is_out_of_bounds_low(&value));
        assert!(!bound.is_out_of_bounds_high(&value));

        // And 0 is far *below* 4294967295 despite -1 < 0 signed.
        assert!(bound.is_out_of_bounds_low(&BoundValue::UInt32(0)));
    }

    #[test]
    fn uint64_max_is_greater_than_everything_else() {
        let max = BoundValue::parse(NumericKind::UInt64, "18446744073709551615").unwrap();
        assert_eq!(max, BoundValue::UInt64(-1));
        assert_eq!(
            max.compare(&BoundValue::UInt64(1)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn half_open_range_boundaries_are_exact() {
        // [0..10): inclusive lower, exclusive upper.
        let range = Range::parse("[0..10)", NumericKind::Int32).unwrap();

        assert!(!range.is_out_of_bounds(&BoundValue::Int32(0)));
        assert!(!range.is_out_of_bounds(&BoundValue::Int32(9)));
        assert!(range.is_out_of_bounds(&BoundValue::Int32(10)));
        assert!(range.is_out_of_bounds(&BoundValue::Int32(-1)));
    }

    #[test]
    fn open_range_excludes_both_ends() {
        let range = Range::parse("(0..10]", NumericKind::Int64).unwrap();
        assert!(range.is_out_of_bounds(&BoundValue::Int64(0)));
        assert!(!range.is_out_of_bounds(&BoundValue::Int64(1)));
        assert!(!range.is_out_of_bounds(&BoundValue::Int64(10)));
    }

    #[test]
    fn malformed_notations_name_the_failure() {
        let cases = [
            ("0..10", "expected `[` or `(`"),
            ("[0..10", "expected `]` or `)`"),
            ("[0-10]", "expected `..`"),
            ("[a..10]", "not a valid int32 literal"),
            ("[10..0]", "lower bound 10 exceeds upper bound 0"),
            ("", "empty notation"),
        ];
        for (notation, expected) in cases {
            let err = Range::parse(notation, NumericKind::Int32)
                .expect_err("notation should be rejected");
            assert!(
                err.contains(expected),
                "`{notation}` produced `{err}`, expected to contain `{expected}`"
            );
        }
    }

    #[test]
    fn float_bounds_respect_exclusivity_and_nan() {
        let bound = Bound::new(BoundValue::Double(1.5), true);
        assert!(bound.is_out_of_bounds_low(&BoundValue::Double(1.5)));
        assert!(!bound.is_out_of_bounds_low(&BoundValue::Double(1.6)));
        // NaN is incomparable, therefore never in bounds.
        assert!(bound.is_out_of_bounds_low(&BoundValue::Double(f64::NAN)));
    }

    #[test]
    fn unsigned_values_display_unsigned() {
        assert_eq!(BoundValue::UInt32(-1).to_string(), "4294967295");
        assert_eq!(BoundValue::Int32(-1).to_string(), "-1");
    }

    proptest! {
        #[test]
        fn parsed_uint32_bounds_agree_with_native_unsigned_order(a: u32, b: u32) {
            let left = BoundValue::parse(NumericKind::UInt32, &a.to_string()).unwrap();
            let right = BoundValue::parse(NumericKind::UInt32, &b.to_string()).unwrap();
            prop_assert_eq!(left.compare(&right), Some(a.cmp(&b)));
        }

        #[test]
        fn closed_int_ranges_contain_exactly_their_interval(
            lo in -1000_i32..1000,
            len in 0_i32..1000,
            probe in -2000_i32..2000,
        ) {
            let hi = lo + len;
            let range = Range::parse(&format!("[{lo}..{hi}]"), NumericKind::Int32).unwrap();
            let outside = probe < lo || probe > hi;
            prop_assert_eq!(range.is_out_of_bounds(&BoundValue::Int32(probe)), outside);
        }
    }
}
