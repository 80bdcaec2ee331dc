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

use std::num::NonZeroUsize;

use crate::hash::HashAlgorithm;

/// Runtime settings of a [`FilterPipeline`](super::FilterPipeline).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Longest record kept, in bytes. `None` means records may be any length.
    pub max_record_len: Option<NonZeroUsize>,
    /// Hash oracle used to create filters and to read filter files.
    pub hash: HashAlgorithm,
}

impl PipelineConfig {
    /// Caps records at `max_len` bytes; longer lines are truncated and their tails skipped.
    pub fn with_max_record_len(mut self, max_len: NonZeroUsize) -> Self {
        self.max_record_len = Some(max_len);
        self
    }

    /// Selects the hash oracle.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }
}
