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

#![allow(dead_code)]

use bloomsift::bloom::BloomFilter;
use bloomsift::bloom::BloomFilterBuilder;

/// Keys `key_0`, `key_1`, ... used across the filter tests.
pub fn keys(range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|i| format!("key_{i}")).collect()
}

/// Builds a default-oracle filter sized for `max_items` at `fpp` holding `keys`.
pub fn filter_with(max_items: u64, fpp: f64, keys: &[String]) -> BloomFilter {
    let mut filter = BloomFilterBuilder::with_accuracy(max_items, fpp)
        .unwrap()
        .build();
    for key in keys {
        filter.add(key);
    }
    filter
}

/// Joins `lines` into a newline-terminated record stream.
pub fn records(lines: &[&str]) -> Vec<u8> {
    let mut input = Vec::new();
    for line in lines {
        input.extend_from_slice(line.as_bytes());
        input.push(b'\n');
    }
    input
}
