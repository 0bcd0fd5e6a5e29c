use crate::bit_vec::BitVec;
use crate::error::{Error, Result};
use crate::hash::hash32;
use log::debug;
use std::convert::TryFrom;
use std::f64::consts::LN_2;

/// A value that can be offered to a [`MembershipFilter`] as an item.
///
/// Implemented for `&str`, `&String` and `Option<&str>`, so owned strings can be passed by
/// reference without converting them first.
pub trait Candidate<'a> {
    /// Converts `self` into an optional string item.
    fn into_candidate(self) -> Option<&'a str>;
}

impl<'a> Candidate<'a> for &'a str {
    #[inline]
    fn into_candidate(self) -> Option<&'a str> {
        Some(self)
    }
}

impl<'a> Candidate<'a> for &'a String {
    #[inline]
    fn into_candidate(self) -> Option<&'a str> {
        Some(self.as_str())
    }
}

impl<'a> Candidate<'a> for Option<&'a str> {
    #[inline]
    fn into_candidate(self) -> Option<&'a str> {
        self
    }
}

/// Returns the bytes of `item` if it can take part in the filter. Absent and empty items are
/// never stored and never reported as present.
#[inline]
pub(crate) fn accepted(item: Option<&str>) -> Option<&[u8]> {
    match item {
        Some(item) if !item.is_empty() => Some(item.as_bytes()),
        _ => None,
    }
}

/// A space-efficient probabilistic data structure to test for membership in a set.
///
/// A membership filter is a bit array of `M` bits, initially all unset. `K` seeded hash functions
/// map each item to `K` bits in the array: hash function `i` is [`hash32`] with seed `i`, and the
/// bit it selects is its output modulo `M`. An item is definitely absent if any of its `K` bits
/// are unset, and possibly present if all of them are set. Bits are never cleared, so an item that
/// was added is always reported as possibly present.
///
/// Absent (`None`) and empty items are ignored by [`add`](MembershipFilter::add) and always
/// reported as absent by [`contains`](MembershipFilter::contains).
///
/// # Examples
///
/// ```
/// use sketchbook::bloom::MembershipFilter;
///
/// let mut filter = MembershipFilter::new(1000, 3)?;
///
/// assert!(!filter.contains("password123"));
/// filter.add("password123");
/// assert!(filter.contains("password123"));
///
/// filter.add("");
/// filter.add(None);
/// assert!(!filter.contains(""));
/// assert!(!filter.contains(None));
///
/// assert_eq!(filter.len(), 1000);
/// assert_eq!(filter.hasher_count(), 3);
/// # Ok::<(), sketchbook::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipFilter {
    bit_vec: BitVec,
    hasher_count: u32,
}

impl MembershipFilter {
    /// Constructs a new, empty `MembershipFilter` with `bit_count` bits and `hasher_count` hash
    /// functions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if either argument is zero, or if `hasher_count` does
    /// not fit in 32 bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// assert!(MembershipFilter::new(1000, 3).is_ok());
    /// assert!(MembershipFilter::new(0, 3).is_err());
    /// assert!(MembershipFilter::new(1000, 0).is_err());
    /// ```
    pub fn new(bit_count: usize, hasher_count: usize) -> Result<Self> {
        if bit_count == 0 {
            return Err(Error::invalid_parameter(
                "bit_count",
                bit_count,
                "must be a positive integer",
            ));
        }
        if hasher_count == 0 {
            return Err(Error::invalid_parameter(
                "hasher_count",
                hasher_count,
                "must be a positive integer",
            ));
        }
        let hasher_count = u32::try_from(hasher_count).map_err(|_| {
            Error::invalid_parameter("hasher_count", hasher_count, "must fit in 32 bits")
        })?;

        debug!(
            "created membership filter with {} bits and {} hash functions",
            bit_count, hasher_count
        );
        Ok(MembershipFilter {
            bit_vec: BitVec::new(bit_count),
            hasher_count,
        })
    }

    /// Constructs a new, empty `MembershipFilter` sized for an expected `item_count` items and a
    /// target false positive probability of `fpp`.
    ///
    /// The bit count is `ceil(-n ln(fpp) / ln(2)^2)` and the hash function count is
    /// `ceil(bit_count / n * ln(2))`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `item_count` is zero or `fpp` is not in `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// let filter = MembershipFilter::from_fpp(10, 0.01)?;
    ///
    /// assert_eq!(filter.len(), 96);
    /// assert_eq!(filter.hasher_count(), 7);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn from_fpp(item_count: usize, fpp: f64) -> Result<Self> {
        if item_count == 0 {
            return Err(Error::invalid_parameter(
                "item_count",
                item_count,
                "must be a positive integer",
            ));
        }
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(Error::invalid_parameter(
                "fpp",
                fpp,
                "must be in the open interval (0, 1)",
            ));
        }
        let item_count = item_count as f64;
        let bit_count = (-item_count * fpp.ln() / (LN_2 * LN_2)).ceil() as usize;
        let hasher_count = ((bit_count as f64) / item_count * LN_2).ceil() as usize;
        Self::new(bit_count.max(1), hasher_count.max(1))
    }

    fn offsets<'a>(&'a self, item: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
        let len = self.bit_vec.len() as u64;
        (0..self.hasher_count).map(move |seed| (u64::from(hash32(item, seed)) % len) as usize)
    }

    /// Inserts an item into the filter. Absent and empty items are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new(100, 3)?;
    ///
    /// filter.add("admin123");
    /// filter.add(Some("qwerty123"));
    /// filter.add(None);
    ///
    /// let owned = String::from("letmein");
    /// filter.add(&owned);
    ///
    /// assert!(filter.contains("admin123"));
    /// assert!(filter.contains("qwerty123"));
    /// assert!(filter.contains(&owned));
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn add<'a>(&mut self, item: impl Candidate<'a>) {
        let item = match accepted(item.into_candidate()) {
            Some(item) => item,
            None => return,
        };
        let len = self.bit_vec.len() as u64;
        for seed in 0..self.hasher_count {
            let offset = u64::from(hash32(item, seed)) % len;
            self.bit_vec.set(offset as usize);
        }
    }

    /// Checks if an item is possibly in the filter.
    ///
    /// Returns `false` if the item was definitely never added, and `true` if it possibly was.
    /// Absent and empty items always return `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new(100, 3)?;
    ///
    /// assert!(!filter.contains("guest"));
    /// filter.add("guest");
    /// assert!(filter.contains("guest"));
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn contains<'a>(&self, item: impl Candidate<'a>) -> bool {
        match accepted(item.into_candidate()) {
            Some(item) => self.offsets(item).all(|offset| self.bit_vec[offset]),
            None => false,
        }
    }

    /// Returns the number of bits in the filter.
    pub fn len(&self) -> usize {
        self.bit_vec.len()
    }

    /// Returns `true` if no item has been added to the filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new(100, 3)?;
    /// assert!(filter.is_empty());
    ///
    /// filter.add("foo");
    /// assert!(!filter.is_empty());
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn is_empty(&self) -> bool {
        self.bit_vec.count_ones() == 0
    }

    /// Returns the number of hash functions used by the filter.
    pub fn hasher_count(&self) -> usize {
        self.hasher_count as usize
    }

    /// Returns the number of set bits in the filter.
    pub fn count_ones(&self) -> usize {
        self.bit_vec.count_ones()
    }

    /// Returns the number of unset bits in the filter.
    pub fn count_zeros(&self) -> usize {
        self.bit_vec.count_zeros()
    }

    /// Returns a read-only view of the underlying bits.
    pub fn bits(&self) -> &BitVec {
        &self.bit_vec
    }

    /// Returns the estimated false positive probability given the bits set so far. This value
    /// increases as more items are added.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new(1000, 3)?;
    /// assert!(filter.estimated_fpp() < std::f64::EPSILON);
    ///
    /// filter.add("foo");
    /// assert!(filter.estimated_fpp() > std::f64::EPSILON);
    /// assert!(filter.estimated_fpp() < 0.01);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn estimated_fpp(&self) -> f64 {
        let single_fpp = self.bit_vec.count_ones() as f64 / self.bit_vec.len() as f64;
        single_fpp.powi(self.hasher_count as i32)
    }

    /// Returns the expected false positive probability after `item_count` distinct items have
    /// been added: `(1 - e^(-K n / M))^K`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::MembershipFilter;
    ///
    /// let filter = MembershipFilter::new(1000, 3)?;
    ///
    /// assert!(filter.expected_fpp(0) < std::f64::EPSILON);
    /// assert!(filter.expected_fpp(100) < filter.expected_fpp(200));
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn expected_fpp(&self, item_count: usize) -> f64 {
        let k = f64::from(self.hasher_count);
        let exponent = -k * item_count as f64 / self.bit_vec.len() as f64;
        (1.0 - exponent.exp()).powi(self.hasher_count as i32)
    }
}

impl<'a, T: Candidate<'a>> Extend<T> for MembershipFilter {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MembershipFilter;
    use crate::error::Error;

    fn scenario_filter() -> MembershipFilter {
        let mut filter = MembershipFilter::new(1000, 3).unwrap();
        for password in &["password123", "admin123", "qwerty123"] {
            filter.add(*password);
        }
        filter
    }

    #[test]
    fn test_new() {
        let filter = MembershipFilter::new(1000, 3).unwrap();

        assert_eq!(filter.len(), 1000);
        assert_eq!(filter.hasher_count(), 3);
        assert_eq!(filter.count_ones(), 0);
        assert_eq!(filter.count_zeros(), 1000);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_new_rejects_zero_parameters() {
        match MembershipFilter::new(0, 3) {
            Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "bit_count"),
            other => panic!("unexpected result: {:?}", other),
        }
        match MembershipFilter::new(1000, 0) {
            Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "hasher_count"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_fpp() {
        let filter = MembershipFilter::from_fpp(10, 0.01).unwrap();
        assert_eq!(filter.len(), 96);
        assert_eq!(filter.hasher_count(), 7);

        assert!(MembershipFilter::from_fpp(0, 0.01).is_err());
        assert!(MembershipFilter::from_fpp(10, 0.0).is_err());
        assert!(MembershipFilter::from_fpp(10, 1.0).is_err());
        assert!(MembershipFilter::from_fpp(10, std::f64::NAN).is_err());
    }

    #[test]
    fn test_scenario() {
        let filter = scenario_filter();

        assert!(filter.contains("password123"));
        assert!(filter.contains("admin123"));
        assert!(filter.contains("qwerty123"));
        assert!(!filter.contains(""));
        assert!(!filter.contains(None));
    }

    #[test]
    fn test_add_sets_at_most_hasher_count_bits() {
        let mut filter = MembershipFilter::new(1000, 3).unwrap();
        filter.add("password123");
        assert!(filter.count_ones() >= 1 && filter.count_ones() <= 3);
    }

    #[test]
    fn test_invalid_items_leave_filter_unchanged() {
        let mut filter = scenario_filter();
        let before = filter.clone();

        filter.add("");
        filter.add(None);

        assert_eq!(filter, before);
    }

    #[test]
    fn test_no_false_negatives_and_monotonic_bits() {
        let mut filter = MembershipFilter::new(2048, 4).unwrap();
        let items = (0..500).map(|i| format!("item_{}", i)).collect::<Vec<_>>();

        let mut ones = 0;
        for (index, item) in items.iter().enumerate() {
            let before = filter.bits().clone();
            filter.add(item);

            assert!(filter.count_ones() >= ones);
            ones = filter.count_ones();
            for (old, new) in before.iter().zip(filter.bits().iter()) {
                assert!(!old || new);
            }
            for earlier in &items[..=index] {
                assert!(filter.contains(earlier));
            }
        }
    }

    #[test]
    fn test_false_positive_rate_tracks_expected() {
        let mut filter = MembershipFilter::from_fpp(1000, 0.01).unwrap();
        let items = (0..1000).map(|i| format!("item_{}", i)).collect::<Vec<_>>();
        filter.extend(&items);

        let false_positives = (0..10_000)
            .filter(|i| filter.contains(&format!("other_{}", i)))
            .count();
        let rate = false_positives as f64 / 10_000.0;
        assert!(rate < 0.03, "false positive rate too high: {}", rate);
        assert!(filter.expected_fpp(1000) < 0.011);
    }

    #[test]
    fn test_owned_strings_by_reference() {
        let passwords = vec![
            String::from("password123"),
            String::from("admin123"),
            String::new(),
        ];
        let mut filter = MembershipFilter::new(1000, 3).unwrap();
        filter.add(&passwords[0]);
        filter.extend(&passwords[1..]);

        let mut expected = MembershipFilter::new(1000, 3).unwrap();
        expected.extend(vec!["password123", "admin123"]);
        assert_eq!(filter, expected);

        for password in &passwords[..2] {
            assert!(filter.contains(password));
        }
        assert!(!filter.contains(&passwords[2]));
        assert!(filter.contains(Some("admin123")));
    }

    #[test]
    fn test_estimated_fpp() {
        let mut filter = MembershipFilter::new(1000, 3).unwrap();
        assert!(filter.estimated_fpp() < std::f64::EPSILON);

        filter.add("foo");

        let expected_fpp = (filter.count_ones() as f64 / 1000.0).powi(3);
        assert!((filter.estimated_fpp() - expected_fpp).abs() < std::f64::EPSILON);
    }

    #[test]
    fn test_deterministic() {
        let first = scenario_filter();
        let second = scenario_filter();
        assert_eq!(first, second);
        assert_eq!(first.contains("guest"), second.contains("guest"));
    }
}
