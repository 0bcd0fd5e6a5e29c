//! Exact and estimated distinct counts, timed, for side-by-side comparison.
//!
//! Nothing here formats output. Callers receive plain numbers and durations and render them
//! however they like.

use crate::error::Result;
use crate::hyperloglog::CardinalityEstimator;
use log::debug;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// A counted value together with the time it took to produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement<T> {
    /// The count.
    pub value: T,
    /// Wall-clock time spent producing it.
    pub elapsed: Duration,
}

/// Counts the distinct items exactly by collecting them into a set.
///
/// # Examples
///
/// ```
/// use sketchbook::report::count_exact;
///
/// let measurement = count_exact(&["a", "b", "a"]);
/// assert_eq!(measurement.value, 2);
/// ```
pub fn count_exact<T>(items: &[T]) -> Measurement<usize>
where
    T: AsRef<[u8]>,
{
    let start = Instant::now();
    let value = items
        .iter()
        .map(|item| item.as_ref())
        .collect::<HashSet<&[u8]>>()
        .len();
    let elapsed = start.elapsed();
    debug!("exact count {} in {:?}", value, elapsed);
    Measurement { value, elapsed }
}

/// Estimates the distinct items with a [`CardinalityEstimator`] of the given precision.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `precision` is out of
/// range.
///
/// # Examples
///
/// ```
/// use sketchbook::report::count_estimated;
///
/// let measurement = count_estimated(&["a", "b", "a"], 14)?;
/// assert_eq!(measurement.value.round(), 2.0);
/// # Ok::<(), sketchbook::Error>(())
/// ```
pub fn count_estimated<T>(items: &[T], precision: u8) -> Result<Measurement<f64>>
where
    T: AsRef<[u8]>,
{
    let start = Instant::now();
    let mut estimator = CardinalityEstimator::new(precision)?;
    estimator.extend(items);
    let value = estimator.count();
    let elapsed = start.elapsed();
    debug!("estimated count {:.2} in {:?}", value, elapsed);
    Ok(Measurement { value, elapsed })
}

/// An exact count next to an estimate of the same stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    /// The exact distinct count.
    pub exact: Measurement<usize>,
    /// The estimated distinct count.
    pub estimated: Measurement<f64>,
}

impl Comparison {
    /// Pairs an exact count with an estimate.
    pub fn new(exact: Measurement<usize>, estimated: Measurement<f64>) -> Self {
        Comparison { exact, estimated }
    }

    /// Counts `items` both ways with an estimator of the given precision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `precision` is out
    /// of range.
    pub fn measure<T>(items: &[T], precision: u8) -> Result<Self>
    where
        T: AsRef<[u8]>,
    {
        let exact = count_exact(items);
        let estimated = count_estimated(items, precision)?;
        Ok(Comparison::new(exact, estimated))
    }

    /// Returns `|estimated - exact|`.
    pub fn absolute_error(&self) -> f64 {
        (self.estimated.value - self.exact.value as f64).abs()
    }

    /// Returns the absolute error as a percentage of the exact count, or `0` when the exact count
    /// is `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::report::{Comparison, Measurement};
    /// use std::time::Duration;
    ///
    /// let comparison = Comparison::new(
    ///     Measurement { value: 200, elapsed: Duration::from_millis(3) },
    ///     Measurement { value: 202.0, elapsed: Duration::from_millis(1) },
    /// );
    ///
    /// assert!((comparison.absolute_error() - 2.0).abs() < 1e-9);
    /// assert!((comparison.relative_error() - 1.0).abs() < 1e-9);
    /// ```
    pub fn relative_error(&self) -> f64 {
        if self.exact.value == 0 {
            return 0.0;
        }
        self.absolute_error() / self.exact.value as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::{count_estimated, count_exact, Comparison, Measurement};
    use std::time::Duration;

    #[test]
    fn test_count_exact() {
        let items = vec!["10.0.0.1", "10.0.0.2", "10.0.0.1", "10.0.0.3"];
        assert_eq!(count_exact(&items).value, 3);
        assert_eq!(count_exact::<&str>(&[]).value, 0);
    }

    #[test]
    fn test_count_estimated() {
        let items = (0..5000).map(|i| format!("user-{}", i % 1000)).collect::<Vec<_>>();
        let estimate = count_estimated(&items, 14).unwrap().value;
        assert!((estimate - 1000.0).abs() / 1000.0 < 0.05, "estimate: {}", estimate);

        assert!(count_estimated(&items, 0).is_err());
    }

    #[test]
    fn test_measure() {
        let items = (0..3000).map(|i| i.to_string()).collect::<Vec<_>>();
        let comparison = Comparison::measure(&items, 12).unwrap();

        assert_eq!(comparison.exact.value, 3000);
        assert!(comparison.relative_error() < 10.0);
    }

    #[test]
    fn test_relative_error_of_empty_stream() {
        let comparison = Comparison::new(
            Measurement {
                value: 0,
                elapsed: Duration::default(),
            },
            Measurement {
                value: 0.0,
                elapsed: Duration::default(),
            },
        );
        assert_eq!(comparison.absolute_error(), 0.0);
        assert_eq!(comparison.relative_error(), 0.0);
    }
}
