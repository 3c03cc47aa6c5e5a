//! Fixed-point math utilities for deterministic simulation.
//!
//! Positions and ranges use fixed-point arithmetic so that two runs with
//! the same seed produce bit-identical worlds. Range checks compare squared
//! distances, which keeps the boundary case exact.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Values are written as decimals so RON rules and JSON snapshots stay
/// readable. A value with more significant bits than an `f64` mantissa
/// holds is written as its exact decimal string instead, so every value
/// round-trips bit for bit. Deserializing accepts either form and rejects
/// values outside the fixed-point range.
pub mod fixed_serde {
    use std::fmt;

    use super::Fixed;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let float = value.to_num::<f64>();
        if Fixed::checked_from_num(float) == Some(*value) {
            serializer.serialize_f64(float)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    /// Deserialize a fixed-point number from a decimal number or string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FixedVisitor)
    }

    struct FixedVisitor;

    impl<'de> Visitor<'de> for FixedVisitor {
        type Value = Fixed;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number within the fixed-point range")
        }

        fn visit_f64<E: de::Error>(self, raw: f64) -> Result<Fixed, E> {
            Fixed::checked_from_num(raw)
                .ok_or_else(|| E::custom(format!("{raw} is outside the fixed-point range")))
        }

        fn visit_i64<E: de::Error>(self, raw: i64) -> Result<Fixed, E> {
            Fixed::checked_from_num(raw)
                .ok_or_else(|| E::custom(format!("{raw} is outside the fixed-point range")))
        }

        fn visit_u64<E: de::Error>(self, raw: u64) -> Result<Fixed, E> {
            Fixed::checked_from_num(raw)
                .ok_or_else(|| E::custom(format!("{raw} is outside the fixed-point range")))
        }

        fn visit_str<E: de::Error>(self, raw: &str) -> Result<Fixed, E> {
            raw.parse::<Fixed>()
                .map_err(|err| E::custom(format!("invalid fixed-point value {raw:?}: {err}")))
        }
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Create a vector from integer coordinates.
    #[must_use]
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Whether `other` lies within `range` of this point (boundary inclusive).
    #[must_use]
    pub fn within_range(self, other: Self, range: Fixed) -> bool {
        self.distance_squared(other) <= range.saturating_mul(range)
    }
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_distance_squared() {
        let a = Vec2Fixed::from_ints(3, 0);
        let b = Vec2Fixed::from_ints(0, 4);
        // 3² + 4² = 25
        assert_eq!(a.distance_squared(b), Fixed::from_num(25));
    }

    #[test]
    fn test_within_range_is_boundary_inclusive() {
        let origin = Vec2Fixed::ZERO;
        let range = Fixed::from_num(5);

        assert!(origin.within_range(Vec2Fixed::from_ints(3, 4), range));
        assert!(origin.within_range(Vec2Fixed::from_ints(5, 0), range));

        let just_outside = Vec2Fixed::new(Fixed::from_num(5) + Fixed::DELTA, Fixed::ZERO);
        assert!(!origin.within_range(just_outside, range));
    }

    #[test]
    fn test_vec2_add_sub() {
        let a = Vec2Fixed::from_ints(10, 10);
        let offset = Vec2Fixed::from_ints(0, 2);
        assert_eq!(a + offset, Vec2Fixed::from_ints(10, 12));
        assert_eq!((a + offset) - offset, a);
    }

    #[test]
    fn test_fixed_serde_decimal() {
        let v = Vec2Fixed::new(Fixed::from_num(1.5), Fixed::from_num(-2));
        let text = ron::to_string(&v).unwrap();
        assert!(text.contains("1.5"), "expected decimal output, got {text}");
        let back: Vec2Fixed = ron::from_str(&text).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_fixed_serde_is_exact_for_large_fractions() {
        // 2^21 plus the smallest fraction needs more bits than an f64 keeps.
        let x = Fixed::from_bits((3_000_000_i64 << 32) + 1);
        let v = Vec2Fixed::new(x, Fixed::from_num(-7.25));
        let text = ron::to_string(&v).unwrap();
        assert!(text.contains("-7.25"), "small values stay plain decimals: {text}");

        let back: Vec2Fixed = ron::from_str(&text).unwrap();
        assert_eq!(back.x.to_bits(), x.to_bits());
        assert_eq!(back, v);
    }

    #[test]
    fn test_fixed_serde_accepts_integers_and_rejects_overflow() {
        let v: Vec2Fixed = ron::from_str("(x: 3, y: -4)").unwrap();
        assert_eq!(v, Vec2Fixed::from_ints(3, -4));
        assert!(ron::from_str::<Vec2Fixed>("(x: 1e30, y: 0)").is_err());
        assert!(ron::from_str::<Vec2Fixed>("(x: \"nope\", y: 0)").is_err());
    }
}
