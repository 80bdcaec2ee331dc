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

//! Stream primitives for the filter file format.
//!
//! Every multi-byte integer is big-endian on the wire, whatever the host byte order:
//!
//! ```text
//! offset 0:  u32  magic       0xB100F11E
//! offset 4:  u32  num_hashes
//! offset 8:  u64  num_bits
//! offset 16: u64  bit words, ceil(num_bits / 64) of them
//! ```
//!
//! Within each word, bit `i` of the filter sits at the most significant end: word `w` holds
//! bits `[64 * w, 64 * w + 64)` with the lowest index first. Padding bits past `num_bits` in
//! the last word are written as zero and ignored on read.
//!
//! The file does not record which hash oracle built the filter; readers must supply it.

mod decode;
mod encode;

pub(crate) use self::decode::FilterSource;
pub(crate) use self::encode::FilterSink;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 16;

/// Returns the encoded size in bytes of a filter of `num_bits` bits.
///
/// # Examples
///
/// ```
/// # use bloomsift::codec::encoded_len;
/// assert_eq!(encoded_len(1), 24);
/// assert_eq!(encoded_len(64), 24);
/// assert_eq!(encoded_len(65), 32);
/// ```
pub fn encoded_len(num_bits: u64) -> u64 {
    HEADER_LEN as u64 + num_bits.div_ceil(64) * 8
}
