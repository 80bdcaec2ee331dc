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

use std::io::Read;
use std::io::Write;

use super::BloomFilter;
use super::FilterShape;
use super::bits::BitArray;
use crate::codec::FilterSink;
use crate::codec::FilterSource;
use crate::codec::encoded_len;
use crate::error::Error;
use crate::hash::HashOracle;
use crate::hash::Murmur3X86_32;

/// Magic number opening every serialized filter.
pub const MAGIC: u32 = 0xB100F11E;

/// Upper bound on words reserved before they are actually read.
const MAX_PREALLOCATED_WORDS: usize = 1 << 16;

impl<H: HashOracle> BloomFilter<H> {
    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the filter to a byte vector.
    ///
    /// See [`crate::codec`] for the layout.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilter;
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// filter.add("test");
    ///
    /// let bytes = filter.serialize();
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert!(restored.check("test"));
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(encoded_len(self.num_bits()) as usize);
        bytes.extend_from_slice(&MAGIC.to_be_bytes());
        bytes.extend_from_slice(&self.num_hashes.to_be_bytes());
        bytes.extend_from_slice(&self.num_bits().to_be_bytes());
        for &word in self.bits.words() {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    /// Serializes the filter into `writer` and flushes it.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error naming the field being written if the writer fails or accepts
    /// fewer bytes than offered. The write is not retried.
    pub fn serialize_into<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut sink = FilterSink::new(writer);
        sink.write_u32_be("magic", MAGIC)?;
        sink.write_u32_be("num_hashes", self.num_hashes)?;
        sink.write_u64_be("num_bits", self.num_bits())?;
        for &word in self.bits.words() {
            sink.write_u64_be("bit words", word)?;
        }
        sink.flush()
    }

    /// Deserializes a filter from bytes, hashing with `oracle`.
    ///
    /// The oracle must be the one the filter was built with; this cannot be verified from the
    /// bytes alone. Bytes past the end of the filter body are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The magic number does not match, or the header declares zero bits or zero hashes
    ///   (`MalformedData`)
    /// - The data ends before the header or the bit words are complete (`InsufficientData`)
    pub fn deserialize_with_oracle(bytes: &[u8], oracle: H) -> Result<Self, Error> {
        Self::deserialize_from(bytes, oracle)
    }

    /// Deserializes a filter from a stream, hashing with `oracle`.
    ///
    /// Reads exactly the header and `ceil(num_bits / 64)` words, leaving anything after them
    /// unread. Padding bits past `num_bits` are cleared.
    ///
    /// # Errors
    ///
    /// Same as [`deserialize_with_oracle()`](Self::deserialize_with_oracle), plus `Io` errors
    /// from the reader.
    pub fn deserialize_from<R: Read>(reader: R, oracle: H) -> Result<Self, Error> {
        let mut source = FilterSource::new(reader);

        let magic = source.read_u32_be("magic")?;
        if magic != MAGIC {
            return Err(Error::invalid_magic(MAGIC, magic));
        }
        let num_hashes = source.read_u32_be("num_hashes")?;
        let num_bits = source.read_u64_be("num_bits")?;

        let shape = FilterShape::new(num_bits, num_hashes).map_err(|err| {
            Error::malformed(format!("invalid filter header: {}", err.message()))
                .with_context("num_hashes", num_hashes)
                .with_context("num_bits", num_bits)
        })?;

        // Grow with the data so a truncated file cannot make us reserve its claimed size.
        let num_words = shape.num_words() as usize;
        let mut words = Vec::with_capacity(num_words.min(MAX_PREALLOCATED_WORDS));
        for _ in 0..num_words {
            words.push(source.read_u64_be("bit words")?);
        }

        let bits = BitArray::from_words(num_bits, words);
        Ok(BloomFilter::from_bits(num_hashes, bits, oracle))
    }
}

impl BloomFilter<Murmur3X86_32> {
    /// Deserializes a filter built with the default [`Murmur3X86_32`] oracle.
    ///
    /// # Errors
    ///
    /// See [`deserialize_with_oracle()`](Self::deserialize_with_oracle).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomsift::bloom::BloomFilter;
    /// # use bloomsift::bloom::BloomFilterBuilder;
    /// let original = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// let bytes = original.serialize();
    ///
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(original, restored);
    /// ```
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Self::deserialize_with_oracle(bytes, Murmur3X86_32)
    }
}
