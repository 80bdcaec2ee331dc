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

//! Bloom-filter based deduplication and selection of newline-delimited records.
//!
//! The crate is layered bottom-up:
//!
//! - [`hash`]: seeded 32-bit hash oracles that drive bit selection.
//! - [`bloom`]: filter sizing, the packed bit array, and the [`BloomFilter`](bloom::BloomFilter)
//!   itself.
//! - [`codec`]: the big-endian file layout filters are saved in.
//! - [`pipeline`]: the load, create, stream and save workflow used by the `bloomsift` binary.
//!
//! # Example
//!
//! ```rust
//! use bloomsift::bloom::FilterShape;
//! use bloomsift::pipeline::FilterPipeline;
//! use bloomsift::pipeline::OutputPolicy;
//!
//! let mut pipeline = FilterPipeline::new();
//! pipeline
//!     .create_filter(FilterShape::from_accuracy(100, 0.001).unwrap())
//!     .unwrap();
//! pipeline.set_policy(OutputPolicy::OnlyDuplicates).unwrap();
//!
//! let mut output = vec![];
//! pipeline.run(&b"x\ny\nx\nx\n"[..], &mut output, true).unwrap();
//! assert_eq!(output, b"x\nx\n");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod codec;
pub mod error;
pub mod hash;
pub mod pipeline;
