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

//! Hash oracles that drive the bit selection of a [`BloomFilter`](crate::bloom::BloomFilter).
//!
//! A filter asks its oracle for `num_hashes` values per key, passing the hash index as the
//! seed. The same oracle must be used to build a filter and to query it after it has been
//! loaded from disk: the file format records the filter's shape but not the hash function, so a
//! mismatch silently produces wrong membership answers.

mod murmurhash;

pub use self::murmurhash::Murmur3X64_128;
pub use self::murmurhash::Murmur3X86_32;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A deterministic 32-bit hash function keyed by a seed.
///
/// Implementations must return the same value for the same `(seed, key)` pair and should
/// produce values that are decorrelated across seeds, since a filter derives each of its
/// `num_hashes` bit positions from a different seed.
pub trait HashOracle {
    /// Hashes `key` under `seed`.
    fn hash(&self, seed: u32, key: &[u8]) -> u32;
}

impl<H: HashOracle + ?Sized> HashOracle for &H {
    fn hash(&self, seed: u32, key: &[u8]) -> u32 {
        (**self).hash(seed, key)
    }
}

/// Names the hash oracles shipped with this crate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MurmurHash3, x86 32-bit variant.
    #[default]
    Murmur3X86_32,
    /// MurmurHash3, x64 128-bit variant truncated to its lowest 32 bits.
    Murmur3X64_128,
}

impl HashAlgorithm {
    /// Returns the canonical name used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Murmur3X86_32 => "murmur3-32",
            HashAlgorithm::Murmur3X64_128 => "murmur3-128",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "murmur3-32" => Ok(HashAlgorithm::Murmur3X86_32),
            "murmur3-128" => Ok(HashAlgorithm::Murmur3X64_128),
            _ => {
                let msg = format!("unknown hash algorithm: {s}");
                Err(Error::config_invalid(msg))
            }
        }
    }
}

/// An oracle selected at runtime from a [`HashAlgorithm`].
///
/// Two `DynOracle`s compare equal exactly when they name the same algorithm, so filters built
/// with different algorithms are refused by [`BloomFilter::merge`](crate::bloom::BloomFilter::merge).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynOracle {
    algorithm: HashAlgorithm,
}

impl DynOracle {
    /// Creates an oracle for `algorithm`.
    pub const fn new(algorithm: HashAlgorithm) -> Self {
        DynOracle { algorithm }
    }

    /// Returns the algorithm this oracle dispatches to.
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl From<HashAlgorithm> for DynOracle {
    fn from(algorithm: HashAlgorithm) -> Self {
        DynOracle::new(algorithm)
    }
}

impl HashOracle for DynOracle {
    fn hash(&self, seed: u32, key: &[u8]) -> u32 {
        match self.algorithm {
            HashAlgorithm::Murmur3X86_32 => Murmur3X86_32.hash(seed, key),
            HashAlgorithm::Murmur3X64_128 => Murmur3X64_128.hash(seed, key),
        }
    }
}
