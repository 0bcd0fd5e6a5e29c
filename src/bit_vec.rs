//! Fixed-length list of bits that can only be raised.

use std::mem;
use std::ops::{Index, Range};

/// A fixed-length list of bits packed into a `Vec<u64>`.
///
/// Bits start unset and can be set but never cleared, so the number of set bits only grows.
///
/// # Examples
///
/// ```
/// use sketchbook::bit_vec::BitVec;
///
/// let mut bv = BitVec::new(5);
///
/// bv.set(0);
/// bv.set(3);
/// assert_eq!(
///     bv.iter().collect::<Vec<bool>>(),
///     vec![true, false, false, true, false],
/// );
/// assert_eq!(bv.count_ones(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BitVec {
    blocks: Vec<u64>,
    len: usize,
    one_count: usize,
}

const BLOCK_BIT_COUNT: usize = mem::size_of::<u64>() * 8;

impl BitVec {
    fn get_block_count(len: usize) -> usize {
        len / BLOCK_BIT_COUNT + usize::from(len % BLOCK_BIT_COUNT != 0)
    }

    /// Constructs a new `BitVec` with `len` bits, all unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bit_vec::BitVec;
    ///
    /// let bv = BitVec::new(130);
    /// assert_eq!(bv.len(), 130);
    /// assert_eq!(bv.count_zeros(), 130);
    /// ```
    pub fn new(len: usize) -> Self {
        BitVec {
            blocks: vec![0; Self::get_block_count(len)],
            len,
            one_count: 0,
        }
    }

    /// Sets the bit at `index`. Returns `true` if the bit was previously unset.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bit_vec::BitVec;
    ///
    /// let mut bv = BitVec::new(5);
    /// assert!(bv.set(1));
    /// assert!(!bv.set(1));
    /// ```
    pub fn set(&mut self, index: usize) -> bool {
        assert!(index < self.len);
        let block = &mut self.blocks[index / BLOCK_BIT_COUNT];
        let mask = 1 << (index % BLOCK_BIT_COUNT);
        if *block & mask != 0 {
            return false;
        }
        *block |= mask;
        self.one_count += 1;
        true
    }

    /// Returns the bit at `index`, or `None` if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bit_vec::BitVec;
    ///
    /// let mut bv = BitVec::new(5);
    /// bv.set(1);
    ///
    /// assert_eq!(bv.get(0), Some(false));
    /// assert_eq!(bv.get(1), Some(true));
    /// assert_eq!(bv.get(5), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        let block = self.blocks[index / BLOCK_BIT_COUNT];
        Some((block >> (index % BLOCK_BIT_COUNT)) & 1 != 0)
    }

    /// Returns an iterator over the bits in order.
    pub fn iter(&self) -> BitVecIter<'_> {
        BitVecIter {
            bit_vec: self,
            range: 0..self.len,
        }
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the `BitVec` holds no bits at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.one_count
    }

    /// Returns the number of unset bits.
    pub fn count_zeros(&self) -> usize {
        self.len - self.one_count
    }
}

/// An iterator over the bits of a `BitVec`.
pub struct BitVecIter<'a> {
    bit_vec: &'a BitVec,
    range: Range<usize>,
}

impl<'a> Iterator for BitVecIter<'a> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let index = self.range.next()?;
        self.bit_vec.get(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<'a> ExactSizeIterator for BitVecIter<'a> {}

impl<'a> IntoIterator for &'a BitVec {
    type IntoIter = BitVecIter<'a>;
    type Item = bool;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

static TRUE: bool = true;
static FALSE: bool = false;

impl Index<usize> for BitVec {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        match self.get(index) {
            Some(true) => &TRUE,
            Some(false) => &FALSE,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len, index
            ),
        }
    }
}
