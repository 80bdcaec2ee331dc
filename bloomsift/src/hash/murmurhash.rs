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

use super::HashOracle;

/// MurmurHash3, x86 32-bit variant, with the hash index used as the murmur seed.
///
/// This is the default oracle and the one filter files are expected to be built with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Murmur3X86_32;

impl HashOracle for Murmur3X86_32 {
    #[inline]
    fn hash(&self, seed: u32, key: &[u8]) -> u32 {
        mur3::murmurhash3_x86_32(key, seed)
    }
}

/// MurmurHash3, x64 128-bit variant, keeping the lowest 32 bits of the first half.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Murmur3X64_128;

impl HashOracle for Murmur3X64_128 {
    #[inline]
    fn hash(&self, seed: u32, key: &[u8]) -> u32 {
        let (h1, _) = mur3::murmurhash3_x64_128(key, seed);
        h1 as u32
    }
}
