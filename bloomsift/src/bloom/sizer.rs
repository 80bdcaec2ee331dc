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

use std::fmt;

use super::bits::num_words;
use crate::error::Error;

/// Largest bit count a filter may have, about 4 GiB of bit storage.
pub const MAX_NUM_BITS: u64 = (1u64 << 35) - 64;

/// The sizing of a Bloom filter: how many hash functions it applies and how many bits it holds.
///
/// Two filters can only be merged when their shapes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterShape {
    pub(super) num_hashes: u32,
    pub(super) num_bits: u64,
}

impl FilterShape {
    /// Creates a shape from an explicit bit count and hash count.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if either value is zero, if `num_bits` exceeds
    /// [`MAX_NUM_BITS`], or if the bit array would not be addressable on this platform.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::FilterShape;
    /// let shape = FilterShape::new(1024, 5).unwrap();
    /// assert_eq!(shape.num_bits(), 1024);
    /// assert_eq!(shape.num_hashes(), 5);
    ///
    /// assert!(FilterShape::new(0, 5).is_err());
    /// ```
    pub fn new(num_bits: u64, num_hashes: u32) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(Error::config_invalid("num_bits must be greater than 0"));
        }
        if num_hashes == 0 {
            return Err(Error::config_invalid("num_hashes must be greater than 0"));
        }
        if num_bits > MAX_NUM_BITS {
            let err = Error::config_invalid(format!("num_bits must not exceed {MAX_NUM_BITS}"));
            return Err(err.with_context("num_bits", num_bits));
        }
        if usize::try_from(num_words(num_bits)).is_err() {
            return Err(
                Error::config_invalid("num_bits exceeds addressable memory")
                    .with_context("num_bits", num_bits),
            );
        }
        Ok(FilterShape {
            num_hashes,
            num_bits,
        })
    }

    /// Computes the shape for an expected number of items and a target false positive rate.
    ///
    /// - `num_hashes = ceil(-log2(fpp))`
    /// - `num_bits = ceil(num_hashes * max_items / ln(2))`
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if `max_items` is 0, if `fpp` is not strictly between
    /// 0.0 and 1.0, or if the resulting bit count is not representable.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::FilterShape;
    /// let shape = FilterShape::from_accuracy(10, 0.01).unwrap();
    /// assert_eq!(shape.num_hashes(), 7);
    /// assert_eq!(shape.num_bits(), 101);
    /// ```
    pub fn from_accuracy(max_items: u64, fpp: f64) -> Result<Self, Error> {
        if max_items == 0 {
            return Err(Error::config_invalid("max_items must be greater than 0"));
        }
        // NaN fails both comparisons.
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(
                Error::config_invalid("fpp must be between 0.0 and 1.0 (exclusive)")
                    .with_context("fpp", fpp),
            );
        }

        let num_hashes = Self::suggest_num_hashes(fpp);
        let num_bits = Self::suggest_num_bits(max_items, num_hashes).ok_or_else(|| {
            Error::config_invalid("filter size overflows")
                .with_context("max_items", max_items)
                .with_context("fpp", fpp)
        })?;
        Self::new(num_bits, num_hashes)
    }

    /// Same as [`from_accuracy`](Self::from_accuracy) with the rate given as its inverse,
    /// e.g. `100.0` for one false positive in a hundred.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::FilterShape;
    /// assert_eq!(
    ///     FilterShape::from_inverse_accuracy(10, 100.0).unwrap(),
    ///     FilterShape::from_accuracy(10, 0.01).unwrap(),
    /// );
    /// ```
    pub fn from_inverse_accuracy(max_items: u64, inverse_fpp: f64) -> Result<Self, Error> {
        Self::from_accuracy(max_items, 1.0 / inverse_fpp)
    }

    /// Suggests the number of hash functions for a target false positive rate.
    ///
    /// Formula: `k = ceil(-log2(p))`
    ///
    /// `fpp` must be in (0.0, 1.0).
    pub fn suggest_num_hashes(fpp: f64) -> u32 {
        // Ceil to avoid selecting too few hashes.
        (-fpp.log2()).ceil().max(1.0) as u32
    }

    /// Suggests the number of bits for `max_items` items hashed `num_hashes` times.
    ///
    /// Formula: `m = ceil(k * n / ln(2))`
    ///
    /// Returns `None` if the result does not fit in a `u64`.
    pub fn suggest_num_bits(max_items: u64, num_hashes: u32) -> Option<u64> {
        let bits = (f64::from(num_hashes) * max_items as f64 / std::f64::consts::LN_2).ceil();
        // u64::MAX as f64 rounds up to 2^64, which is itself out of range.
        if bits.is_finite() && bits < u64::MAX as f64 {
            Some(bits as u64)
        } else {
            None
        }
    }

    /// Returns the number of hash functions.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the number of bits.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of 64-bit words backing the bit array.
    pub fn num_words(&self) -> u64 {
        num_words(self.num_bits)
    }
}

impl fmt::Display for FilterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits x {} hashes", self.num_bits, self.num_hashes)
    }
}
