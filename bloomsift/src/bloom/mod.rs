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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! a key is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If a key was added, `check()` will always return `true`
//! - **Possible false positives**: `check()` may return `true` for keys never added
//! - **Fixed size**: The bit array is sized once and never grows
//! - **No removal**: Keys cannot be deleted and never expire
//!
//! # Usage
//!
//! ```rust
//! use bloomsift::bloom::BloomFilterBuilder;
//!
//! // Create a filter sized for 1000 keys with 1% false positive rate
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01).unwrap().build();
//!
//! // Add keys; the return value tells whether the key was (probably) seen before
//! assert!(!filter.add("apple"));
//! assert!(filter.add("apple"));
//! filter.add(b"\x00raw bytes");
//!
//! // Check membership
//! assert!(filter.check("apple"));
//! assert!(!filter.check("grape")); // never added (probably)
//! ```
//!
//! # Merging
//!
//! Filters of the same shape built with the same hash oracle can be merged. The result is a
//! new filter that recognizes the keys of both operands:
//!
//! ```rust
//! # use bloomsift::bloom::BloomFilterBuilder;
//! let mut filter1 = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
//! let mut filter2 = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
//!
//! filter1.add("a");
//! filter2.add("b");
//!
//! let union = filter1.merge(&filter2).unwrap();
//! assert!(union.check("a"));
//! assert!(union.check("b"));
//! ```
//!
//! # Implementation Details
//!
//! - The i-th bit position of a key is `oracle.hash(i, key) % num_bits` for `i` in
//!   `0..num_hashes`
//! - Bits are packed most-significant first into `u64` words, matching the file format
//! - See [`crate::codec`] for the serialized layout

mod bits;
mod builder;
mod serialization;
mod sizer;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::serialization::MAGIC;
pub use self::sizer::FilterShape;
pub use self::sizer::MAX_NUM_BITS;
pub use self::sketch::BloomFilter;
