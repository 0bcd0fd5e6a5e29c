//! Space-efficient probabilistic data structure for estimating the number of distinct items in a
//! stream.

use crate::error::{Error, Result};
use crate::hash::hash32;
use log::debug;
use std::cmp;

/// Smallest accepted precision.
pub const MIN_PRECISION: u8 = 1;
/// Largest accepted precision. The register index and the rank share the 32-bit hash, so at least
/// one bit must be left for the rank.
pub const MAX_PRECISION: u8 = 31;
/// Largest precision [`CardinalityEstimator::from_error`] picks. At this precision the estimator
/// holds 2^20 registers.
pub const MAX_ERROR_PRECISION: u8 = 20;
/// Precision used by [`CardinalityEstimator::default`], giving a standard error of about 0.8%.
pub const DEFAULT_PRECISION: u8 = 14;

/// Width of the hash driving register updates.
const HASH_BITS: u32 = 32;

/// Seed shared by every estimator. Registers are only comparable, and mergeable, when they were
/// filled with the same hash function.
const SEED: u32 = 0x9e37_79b9;

/// A space-efficient probabilistic data structure to count the number of distinct items in a
/// stream.
///
/// A `CardinalityEstimator` hashes every item to 32 bits. The low `p` bits select one of
/// `m = 2^p` registers and the remaining `32 - p` bits give a rank: one plus the number of leading
/// zeros in those bits. Each register keeps the largest rank it has seen. The estimate is the
/// bias-corrected harmonic mean of `2^register` over all registers, falling back to linear
/// counting over the empty registers for small cardinalities.
///
/// The large-range correction of the original HyperLogLog paper is not applied. Estimates start
/// to undercount once the cardinality approaches `2^32 / 30`.
///
/// # Examples
///
/// ```
/// use sketchbook::hyperloglog::CardinalityEstimator;
///
/// let mut estimator = CardinalityEstimator::new(14)?;
///
/// assert!(estimator.is_empty());
///
/// for address in &["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.1", "10.0.0.2"] {
///     estimator.add(address);
/// }
///
/// assert_eq!(estimator.count().round(), 3.0);
/// # Ok::<(), sketchbook::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CardinalityEstimator {
    alpha: f64,
    precision: u8,
    registers: Vec<u8>,
}

impl CardinalityEstimator {
    fn get_alpha(register_count: usize) -> f64 {
        match register_count {
            16 => 0.673,
            32 => 0.697,
            64 => 0.709,
            m => 0.7213 / (1.0 + 1.079 / m as f64),
        }
    }

    /// Rank of the `32 - precision` bits left in `w` after the register index is shifted out.
    #[inline]
    fn rank(precision: u8, w: u32) -> u8 {
        // `w < 2^(32 - precision)`, so at least `precision` of its leading zeros are padding.
        debug_assert!(u64::from(w) < 1u64 << (HASH_BITS - u32::from(precision)));
        (w.leading_zeros() - u32::from(precision) + 1) as u8
    }

    fn with_precision(precision: u8) -> Self {
        let register_count = 1 << precision;
        let alpha = Self::get_alpha(register_count);
        debug!(
            "created cardinality estimator with precision {} ({} registers, alpha {:.6})",
            precision, register_count, alpha
        );
        CardinalityEstimator {
            alpha,
            precision,
            registers: vec![0; register_count],
        }
    }

    /// Constructs a new, empty `CardinalityEstimator` with `2^precision` registers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `precision` is not in
    /// `MIN_PRECISION..=MAX_PRECISION`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::hyperloglog::CardinalityEstimator;
    ///
    /// let estimator = CardinalityEstimator::new(14)?;
    /// assert_eq!(estimator.register_count(), 16384);
    ///
    /// assert!(CardinalityEstimator::new(0).is_err());
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn new(precision: u8) -> Result<Self> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::invalid_parameter(
                "precision",
                precision,
                "must be between 1 and 31",
            ));
        }
        Ok(Self::with_precision(precision))
    }

    /// Constructs a new, empty `CardinalityEstimator` with the smallest precision whose standard
    /// error `1.04 / sqrt(2^p)` is at most `relative_error`. The precision is clamped to
    /// `4..=MAX_ERROR_PRECISION`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `relative_error` is not in `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::hyperloglog::CardinalityEstimator;
    ///
    /// let estimator = CardinalityEstimator::from_error(0.01)?;
    /// assert_eq!(estimator.precision(), 14);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn from_error(relative_error: f64) -> Result<Self> {
        if !(relative_error > 0.0 && relative_error < 1.0) {
            return Err(Error::invalid_parameter(
                "relative_error",
                relative_error,
                "must be in the open interval (0, 1)",
            ));
        }
        let register_count = (1.04 / relative_error).powi(2);
        let precision = register_count.log2().ceil() as i64;
        let precision = cmp::min(cmp::max(precision, 4), i64::from(MAX_ERROR_PRECISION));
        Ok(Self::with_precision(precision as u8))
    }

    /// Inserts an item into the `CardinalityEstimator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::hyperloglog::CardinalityEstimator;
    ///
    /// let mut estimator = CardinalityEstimator::new(10)?;
    ///
    /// estimator.add("192.168.0.1");
    /// estimator.add(b"192.168.0.2");
    /// assert!(!estimator.is_empty());
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn add<T>(&mut self, item: &T)
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let hash = hash32(item.as_ref(), SEED);
        let index = (hash & (self.registers.len() as u32 - 1)) as usize;
        let rank = Self::rank(self.precision, hash >> self.precision);
        self.registers[index] = cmp::max(self.registers[index], rank);
    }

    /// Returns the estimated number of distinct items added so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::hyperloglog::CardinalityEstimator;
    ///
    /// let mut estimator = CardinalityEstimator::new(10)?;
    /// assert_eq!(estimator.count(), 0.0);
    ///
    /// estimator.add("foo");
    /// assert_eq!(estimator.count().round(), 1.0);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn count(&self) -> f64 {
        let len = self.registers.len() as f64;
        let sum = self
            .registers
            .iter()
            .map(|value| 2.0f64.powi(-i32::from(*value)))
            .sum::<f64>();
        let estimate = self.alpha * len * len / sum;

        if estimate <= 2.5 * len {
            let zeros = self.zero_registers();
            if zeros > 0 {
                return len * (len / zeros as f64).ln();
            }
        }
        estimate
    }

    /// Merges `other` into `self`. Afterwards `self` estimates the number of distinct items added
    /// to either estimator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrecisionMismatch`] if the precisions differ. `self` is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::hyperloglog::CardinalityEstimator;
    ///
    /// let mut first = CardinalityEstimator::new(14)?;
    /// first.add("a");
    /// first.add("b");
    ///
    /// let mut second = CardinalityEstimator::new(14)?;
    /// second.add("a");
    /// second.add("c");
    ///
    /// first.merge(&second)?;
    /// assert_eq!(first.count().round(), 3.0);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn merge(&mut self, other: &CardinalityEstimator) -> Result<()> {
        if self.precision != other.precision {
            return Err(Error::PrecisionMismatch {
                expected: self.precision,
                found: other.precision,
            });
        }

        for (value, other) in self.registers.iter_mut().zip(&other.registers) {
            *value = cmp::max(*value, *other);
        }
        debug!(
            "merged cardinality estimators with precision {}",
            self.precision
        );
        Ok(())
    }

    /// Returns the precision `p`.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the number of registers, `2^p`.
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Returns the bias correction constant used by [`count`](CardinalityEstimator::count).
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the registers.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns the number of registers that are still zero.
    pub fn zero_registers(&self) -> usize {
        self.registers.iter().filter(|value| **value == 0).count()
    }

    /// Returns `true` if no item has been added.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|value| *value == 0)
    }

    /// Returns the expected relative standard error, `1.04 / sqrt(2^p)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::hyperloglog::CardinalityEstimator;
    ///
    /// let estimator = CardinalityEstimator::new(14)?;
    /// assert!((estimator.standard_error() - 0.008125).abs() < 1e-9);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn standard_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }
}

impl Default for CardinalityEstimator {
    fn default() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }
}

impl<T> Extend<T> for CardinalityEstimator
where
    T: AsRef<[u8]>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(&item);
        }
    }
}
