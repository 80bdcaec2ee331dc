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

/// Number of bits held by one storage word.
pub(crate) const WORD_BITS: u64 = 64;

/// Returns the number of words needed to hold `num_bits` bits.
pub(crate) fn num_words(num_bits: u64) -> u64 {
    num_bits.div_ceil(WORD_BITS)
}

/// Fixed-size packed bit storage.
///
/// Bit `i` lives in word `i / 64` at offset `i % 64` counted from the most significant end, so
/// the words are laid out exactly as they appear on the wire. Padding bits past `num_bits` in
/// the last word are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BitArray {
    num_bits: u64,
    words: Box<[u64]>,
}

impl BitArray {
    /// Allocates a zeroed array of `num_bits` bits.
    pub fn new(num_bits: u64) -> Self {
        let words = vec![0u64; num_words(num_bits) as usize].into_boxed_slice();
        BitArray { num_bits, words }
    }

    /// Wraps words read from storage, clearing any padding bits.
    ///
    /// `words.len()` must equal `num_words(num_bits)`.
    pub fn from_words(num_bits: u64, words: Vec<u64>) -> Self {
        debug_assert_eq!(words.len() as u64, num_words(num_bits));
        let mut words = words.into_boxed_slice();
        if let Some(last) = words.last_mut() {
            *last &= padding_mask(num_bits);
        }
        BitArray { num_bits, words }
    }

    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Gets the value of a single bit.
    #[inline]
    pub fn get(&self, index: u64) -> bool {
        let (word, mask) = locate(index);
        self.words[word] & mask != 0
    }

    /// Sets a single bit, returning `true` if it changed from 0 to 1.
    #[inline]
    pub fn set(&mut self, index: u64) -> bool {
        let (word, mask) = locate(index);
        let prev = self.words[word];
        self.words[word] = prev | mask;
        prev & mask == 0
    }

    pub fn count_ones(&self) -> u64 {
        self.words
            .iter()
            .map(|word| u64::from(word.count_ones()))
            .sum()
    }

    /// Returns the bitwise OR of two arrays of equal length.
    pub fn union(&self, other: &BitArray) -> BitArray {
        debug_assert_eq!(self.num_bits, other.num_bits);
        let words = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| a | b)
            .collect();
        BitArray {
            num_bits: self.num_bits,
            words,
        }
    }
}

#[inline]
fn locate(index: u64) -> (usize, u64) {
    let word = (index / WORD_BITS) as usize;
    let offset = index % WORD_BITS;
    (word, 1u64 << (WORD_BITS - 1 - offset))
}

/// Mask of the meaningful bits in the last word.
fn padding_mask(num_bits: u64) -> u64 {
    match num_bits % WORD_BITS {
        0 => u64::MAX,
        used => u64::MAX << (WORD_BITS - used),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(num_words(1), 1);
        assert_eq!(num_words(63), 1);
        assert_eq!(num_words(64), 1);
        assert_eq!(num_words(65), 2);
        assert_eq!(num_words(1000), 16);
        assert_eq!(BitArray::new(101).words().len(), 2);
    }

    #[test]
    fn test_set_reports_change() {
        let mut bits = BitArray::new(100);
        assert!(!bits.get(42));
        assert!(bits.set(42));
        assert!(bits.get(42));
        assert!(!bits.set(42));
        assert!(!bits.get(41));
        assert!(!bits.get(43));
        assert_eq!(bits.count_ones(), 1);
    }

    #[test]
    fn test_bits_are_msb_first() {
        let mut bits = BitArray::new(130);
        bits.set(0);
        bits.set(63);
        bits.set(64);
        bits.set(129);
        assert_eq!(
            bits.words(),
            &[
                0x8000_0000_0000_0001,
                0x8000_0000_0000_0000,
                0x4000_0000_0000_0000,
            ]
        );
    }

    #[test]
    fn test_from_words_clears_padding() {
        let bits = BitArray::new(65);
        let loaded = BitArray::from_words(65, vec![u64::MAX, u64::MAX]);
        assert_eq!(loaded.words(), &[u64::MAX, 0x8000_0000_0000_0000]);
        assert_eq!(loaded.count_ones(), 65);
        assert_eq!(bits.num_bits(), loaded.num_bits());

        let full = BitArray::from_words(128, vec![u64::MAX, u64::MAX]);
        assert_eq!(full.count_ones(), 128);
    }

    #[test]
    fn test_union() {
        let mut a = BitArray::new(70);
        let mut b = BitArray::new(70);
        a.set(1);
        b.set(69);
        let merged = a.union(&b);
        assert!(merged.get(1));
        assert!(merged.get(69));
        assert_eq!(merged.count_ones(), 2);
        assert_eq!(a.count_ones(), 1);
        assert_eq!(b.count_ones(), 1);
    }
}
