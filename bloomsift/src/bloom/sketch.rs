// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::FilterShape;
use super::bits::BitArray;
use crate::error::Error;
use crate::hash::HashOracle;
use crate::hash::Murmur3X86_32;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (added keys always test positive)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Keys are byte strings. Each key selects `num_hashes` bit positions by hashing it with the
/// filter's [`HashOracle`] under seeds `0..num_hashes`.
///
/// Use [`super::BloomFilterBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter<H = Murmur3X86_32> {
    /// Number of hash functions to use (k)
    pub(super) num_hashes: u32,
    /// Count of bits set to 1 (for statistics)
    pub(super) num_bits_set: u64,
    /// Packed bits, m = bits.num_bits()
    pub(super) bits: BitArray,
    pub(super) oracle: H,
}

impl<H: HashOracle> BloomFilter<H> {
    pub(super) fn from_parts(shape: FilterShape, oracle: H) -> Self {
        BloomFilter {
            num_hashes: shape.num_hashes(),
            num_bits_set: 0,
            bits: BitArray::new(shape.num_bits()),
            oracle,
        }
    }

    pub(super) fn from_bits(num_hashes: u32, bits: BitArray, oracle: H) -> Self {
        let num_bits_set = bits.count_ones();
        BloomFilter {
            num_hashes,
            num_bits_set,
            bits,
            oracle,
        }
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Key was **possibly** added (or false positive)
    /// - `false`: Key was **definitely not** added
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// filter.add("apple");
    ///
    /// assert!(filter.check("apple")); // true - was added
    /// assert!(!filter.check("grape")); // false - never added (probably)
    /// ```
    pub fn check(&self, key: impl AsRef<[u8]>) -> bool {
        if self.is_empty() {
            return false;
        }

        let key = key.as_ref();
        (0..self.num_hashes).all(|seed| self.bits.get(self.bit_index(seed, key)))
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Adds a key to the filter.
    ///
    /// Returns whether the key was possibly already in the set before this call: `true` iff
    /// none of the key's bits changed from 0 to 1. A false positive is indistinguishable from
    /// a genuine repeat.
    ///
    /// After this call, `check(key)` will always return `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    ///
    /// let was_present = filter.add("apple");
    /// assert!(!was_present); // First insertion
    ///
    /// let was_present = filter.add("apple");
    /// assert!(was_present); // Now it's in the set
    /// ```
    pub fn add(&mut self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        let mut changed = false;
        for seed in 0..self.num_hashes {
            let index = self.bit_index(seed, key);
            if self.bits.set(index) {
                self.num_bits_set += 1;
                changed = true;
            }
        }
        !changed
    }

    // ========================================================================
    // Set Operations
    // ========================================================================

    /// Returns a new filter holding the union of this filter and `other`.
    ///
    /// The result recognizes every key recognized by either operand. Neither operand is
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns a `ShapeMismatch` error if the filters differ in bit count, hash count, or hash
    /// oracle. See [`is_compatible()`](Self::is_compatible).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// let mut f1 = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// let mut f2 = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    ///
    /// f1.add("a");
    /// f2.add("b");
    ///
    /// let merged = f1.merge(&f2).unwrap();
    /// assert!(merged.check("a"));
    /// assert!(merged.check("b"));
    /// ```
    pub fn merge(&self, other: &BloomFilter<H>) -> Result<BloomFilter<H>, Error>
    where
        H: Clone + PartialEq,
    {
        if self.shape() != other.shape() {
            return Err(Error::shape_mismatch("cannot merge filters of different shapes")
                .with_context("left", self.shape())
                .with_context("right", other.shape()));
        }
        if self.oracle != other.oracle {
            return Err(Error::shape_mismatch(
                "cannot merge filters built with different hash oracles",
            ));
        }

        let bits = self.bits.union(&other.bits);
        Ok(BloomFilter::from_bits(
            self.num_hashes,
            bits,
            self.oracle.clone(),
        ))
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether the filter is empty (no keys added).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter.
    pub fn num_bits(&self) -> u64 {
        self.bits.num_bits()
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the `(num_bits, num_hashes)` shape of the filter.
    pub fn shape(&self) -> FilterShape {
        FilterShape {
            num_hashes: self.num_hashes,
            num_bits: self.num_bits(),
        }
    }

    /// Returns the hash oracle.
    pub fn oracle(&self) -> &H {
        &self.oracle
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits() as f64
    }

    /// Estimates the current false positive probability as `load_factor ^ k`.
    ///
    /// This is approximate and assumes uniform bit distribution.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.num_hashes))
    }

    /// Checks if two filters are compatible for merging.
    ///
    /// Filters are compatible if they have the same:
    /// - Number of bits
    /// - Number of hash functions
    /// - Hash oracle
    pub fn is_compatible(&self, other: &BloomFilter<H>) -> bool
    where
        H: PartialEq,
    {
        self.shape() == other.shape() && self.oracle == other.oracle
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    #[inline]
    fn bit_index(&self, seed: u32, key: &[u8]) -> u64 {
        u64::from(self.oracle.hash(seed, key)) % self.bits.num_bits()
    }
}
