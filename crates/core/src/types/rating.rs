//! Star ratings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating must be between 1 and 5 (got {0})")]
pub struct RatingError(pub u8);

/// A 1–5 star review rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: u8 = 1;
    /// Highest allowed rating.
    pub const MAX: u8 = 5;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `RatingError` if `stars` is outside `1..=5`.
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        if stars < Self::MIN || stars > Self::MAX {
            return Err(RatingError(stars));
        }
        Ok(Self(stars))
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }

    /// Mean of `ratings` rounded to one decimal place, or `0.0` when empty.
    #[must_use]
    pub fn average<I>(ratings: I) -> f64
    where
        I: IntoIterator<Item = Self>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_u32, 0_u32), |(sum, count), r| {
                (sum + u32::from(r.0), count + 1)
            });

        if count == 0 {
            return 0.0;
        }

        let mean = f64::from(sum) / f64::from(count);
        (mean * 10.0).round() / 10.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ratings(stars: &[u8]) -> Vec<Rating> {
        stars.iter().map(|s| Rating::new(*s).unwrap()).collect()
    }

    #[test]
    fn test_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert_eq!(Rating::new(6), Err(RatingError(6)));
    }

    #[test]
    fn test_average_empty_is_zero() {
        assert!((Rating::average(Vec::new()) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert!((Rating::average(ratings(&[5, 4])) - 4.5).abs() < f64::EPSILON);
        // 14 / 3 = 4.666.. -> 4.7
        assert!((Rating::average(ratings(&[5, 5, 4])) - 4.7).abs() < f64::EPSILON);
        // 17 / 4 = 4.25 -> 4.3
        assert!((Rating::average(ratings(&[5, 4, 4, 4])) - 4.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let rating: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(rating.stars(), 4);
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }
}
