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

use super::BloomFilter;
use super::FilterShape;
use crate::error::Error;
use crate::hash::HashOracle;
use crate::hash::Murmur3X86_32;

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides three construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and false positive rate
///   (recommended)
/// - [`with_inverse_accuracy()`](Self::with_inverse_accuracy): Same, with the rate given as its
///   inverse
/// - [`with_shape()`](Self::with_shape): Specify an exact bit count and hash count (manual)
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    shape: FilterShape,
}

impl BloomFilterBuilder {
    /// Creates a builder sized for a target accuracy.
    ///
    /// # Arguments
    ///
    /// - `max_items`: Expected number of distinct keys
    /// - `fpp`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if `max_items` is 0 or `fpp` is not in (0.0, 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// // Sized for 10,000 keys with 1% FPP
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01).unwrap().build();
    /// assert_eq!(filter.num_hashes(), 7);
    ///
    /// assert!(BloomFilterBuilder::with_accuracy(0, 0.01).is_err());
    /// ```
    pub fn with_accuracy(max_items: u64, fpp: f64) -> Result<Self, Error> {
        FilterShape::from_accuracy(max_items, fpp).map(Self::with_shape)
    }

    /// Creates a builder sized for a target accuracy given as `1 / fpp`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if `max_items` is 0 or `inverse_fpp` is not greater than
    /// 1.0.
    pub fn with_inverse_accuracy(max_items: u64, inverse_fpp: f64) -> Result<Self, Error> {
        FilterShape::from_inverse_accuracy(max_items, inverse_fpp).map(Self::with_shape)
    }

    /// Creates a builder for an exact, already validated shape.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// # use bloomsift::bloom::FilterShape;
    /// let shape = FilterShape::new(10_000, 7).unwrap();
    /// let filter = BloomFilterBuilder::with_shape(shape).build();
    /// assert_eq!(filter.num_bits(), 10_000);
    /// ```
    pub fn with_shape(shape: FilterShape) -> Self {
        BloomFilterBuilder { shape }
    }

    /// Returns the shape the built filter will have.
    pub fn shape(&self) -> FilterShape {
        self.shape
    }

    /// Builds an empty filter hashing with the default [`Murmur3X86_32`] oracle.
    pub fn build(self) -> BloomFilter {
        self.build_with_oracle(Murmur3X86_32)
    }

    /// Builds an empty filter hashing with `oracle`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// # use bloomsift::hash::Murmur3X64_128;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01)
    ///     .unwrap()
    ///     .build_with_oracle(Murmur3X64_128);
    /// filter.add("apple");
    /// assert!(filter.check("apple"));
    /// ```
    pub fn build_with_oracle<H: HashOracle>(self, oracle: H) -> BloomFilter<H> {
        BloomFilter::from_parts(self.shape, oracle)
    }
}
