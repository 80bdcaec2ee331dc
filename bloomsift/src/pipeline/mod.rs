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

//! Streams newline-delimited records through a Bloom filter.
//!
//! A [`FilterPipeline`] owns at most one filter. It starts [`Empty`](PipelineState::Empty),
//! becomes [`Ready`](PipelineState::Ready) once a filter is created or loaded (further loads
//! are merged into it), and ends [`Saved`](PipelineState::Saved) after
//! [`maybe_save()`](FilterPipeline::maybe_save) writes the queued save target.
//!
//! # Usage
//!
//! ```rust
//! use bloomsift::bloom::FilterShape;
//! use bloomsift::pipeline::FilterPipeline;
//! use bloomsift::pipeline::OutputPolicy;
//!
//! let mut pipeline = FilterPipeline::new();
//! pipeline
//!     .create_filter(FilterShape::from_accuracy(1000, 0.01).unwrap())
//!     .unwrap();
//! pipeline.set_policy(OutputPolicy::RemoveDuplicates).unwrap();
//!
//! let mut output = vec![];
//! let stats = pipeline.run(&b"a\nb\na\nc\n"[..], &mut output, true).unwrap();
//! assert_eq!(output, b"a\nb\nc\n");
//! assert_eq!(stats.records, 4);
//! assert_eq!(stats.emitted, 3);
//! ```

mod config;
mod records;

pub use self::config::PipelineConfig;

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;
use tracing::warn;

use self::records::RecordReader;
use crate::bloom::BloomFilter;
use crate::bloom::BloomFilterBuilder;
use crate::bloom::FilterShape;
use crate::error::Error;
use crate::hash::DynOracle;
use crate::hash::HashOracle;
use crate::hash::Murmur3X86_32;

/// Which records a run writes to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPolicy {
    /// Keep records that were not yet in the filter.
    RemoveDuplicates,
    /// Keep records that were already in the filter.
    OnlyDuplicates,
}

impl OutputPolicy {
    /// Decides whether a record whose membership test returned `present` is written.
    pub fn should_emit(self, present: bool) -> bool {
        match self {
            OutputPolicy::RemoveDuplicates => !present,
            OutputPolicy::OnlyDuplicates => present,
        }
    }
}

/// Lifecycle of a [`FilterPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// No filter yet.
    Empty,
    /// A filter is present.
    Ready,
    /// The filter was written to the save target; the pipeline accepts no further work.
    Saved,
}

/// Counters reported by [`FilterPipeline::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Records read from the input.
    pub records: u64,
    /// Records written to the output.
    pub emitted: u64,
    /// Records cut to the configured maximum length.
    pub truncated: u64,
}

/// Drives a Bloom filter against a record stream.
#[derive(Debug)]
pub struct FilterPipeline<H = Murmur3X86_32> {
    oracle: H,
    max_record_len: Option<NonZeroUsize>,
    filter: Option<BloomFilter<H>>,
    policy: Option<OutputPolicy>,
    save_target: Option<PathBuf>,
    saved: bool,
}

impl FilterPipeline<Murmur3X86_32> {
    /// Creates an empty pipeline using the default hash oracle and unbounded records.
    pub fn new() -> Self {
        Self::with_oracle(Murmur3X86_32)
    }
}

impl Default for FilterPipeline<Murmur3X86_32> {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPipeline<DynOracle> {
    /// Creates an empty pipeline from runtime settings.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::with_oracle(DynOracle::new(config.hash));
        pipeline.max_record_len = config.max_record_len;
        pipeline
    }
}

impl<H: HashOracle + Clone + PartialEq> FilterPipeline<H> {
    /// Creates an empty pipeline that builds and reads filters with `oracle`.
    pub fn with_oracle(oracle: H) -> Self {
        FilterPipeline {
            oracle,
            max_record_len: None,
            filter: None,
            policy: None,
            save_target: None,
            saved: false,
        }
    }

    /// Caps records at `max_len` bytes.
    pub fn with_max_record_len(mut self, max_len: NonZeroUsize) -> Self {
        self.max_record_len = Some(max_len);
        self
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> PipelineState {
        if self.saved {
            PipelineState::Saved
        } else if self.filter.is_some() {
            PipelineState::Ready
        } else {
            PipelineState::Empty
        }
    }

    /// Returns the current filter, if any.
    pub fn filter(&self) -> Option<&BloomFilter<H>> {
        self.filter.as_ref()
    }

    /// Consumes the pipeline, returning its filter.
    pub fn into_filter(self) -> Option<BloomFilter<H>> {
        self.filter
    }

    /// Returns the output policy, if set.
    pub fn policy(&self) -> Option<OutputPolicy> {
        self.policy
    }

    /// Returns the queued save target.
    pub fn save_target(&self) -> Option<&Path> {
        self.save_target.as_deref()
    }

    /// Creates an empty filter of the given shape.
    ///
    /// # Errors
    ///
    /// Returns a `UsageConflict` error if a filter was already created or loaded.
    pub fn create_filter(&mut self, shape: FilterShape) -> Result<(), Error> {
        self.ensure_not_saved()?;
        if let Some(current) = &self.filter {
            return Err(
                Error::usage_conflict("a filter was already created or loaded")
                    .with_context("current", current.shape()),
            );
        }

        debug!(%shape, "created filter");
        let filter = BloomFilterBuilder::with_shape(shape).build_with_oracle(self.oracle.clone());
        self.filter = Some(filter);
        Ok(())
    }

    /// Adopts `loaded` if the pipeline is empty, otherwise replaces the current filter with the
    /// union of both.
    ///
    /// # Errors
    ///
    /// Returns a `ShapeMismatch` error if the filters cannot be merged. The current filter is
    /// left unchanged.
    pub fn merge_filter(&mut self, loaded: BloomFilter<H>) -> Result<(), Error> {
        self.ensure_not_saved()?;
        match &self.filter {
            None => {
                debug!(shape = %loaded.shape(), "adopted filter");
                self.filter = Some(loaded);
            }
            Some(current) => {
                let merged = current.merge(&loaded)?;
                debug!(
                    shape = %merged.shape(),
                    bits_used = merged.bits_used(),
                    "merged filter"
                );
                self.filter = Some(merged);
            }
        }
        Ok(())
    }

    /// Decodes a filter from `reader` and merges it into the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the decode error, or a `ShapeMismatch` error if the loaded filter cannot be
    /// merged with the current one. The current filter is left unchanged either way.
    pub fn load_and_merge_from<R: Read>(&mut self, reader: R) -> Result<(), Error> {
        self.ensure_not_saved()?;
        let loaded = BloomFilter::deserialize_from(reader, self.oracle.clone())?;
        self.merge_filter(loaded)
    }

    /// Reads the filter file at `path` and merges it into the pipeline.
    ///
    /// # Errors
    ///
    /// Same as [`load_and_merge_from()`](Self::load_and_merge_from), plus an `Io` error if the
    /// file cannot be opened. Every error carries the path as context.
    pub fn load_and_merge(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            Error::io("failed to open filter file", err).with_context("path", path.display())
        })?;
        self.load_and_merge_from(BufReader::new(file))
            .map_err(|err| err.with_context("path", path.display()))?;
        debug!(path = %path.display(), "loaded filter file");
        Ok(())
    }

    /// Queues `path` as the file [`maybe_save()`](Self::maybe_save) writes the filter to.
    ///
    /// # Errors
    ///
    /// Returns a `UsageConflict` error if a save target was already queued.
    pub fn queue_save(&mut self, path: impl Into<PathBuf>) -> Result<(), Error> {
        self.ensure_not_saved()?;
        let path = path.into();
        if let Some(existing) = &self.save_target {
            return Err(Error::usage_conflict("save target already set")
                .with_context("existing", existing.display())
                .with_context("rejected", path.display()));
        }
        self.save_target = Some(path);
        Ok(())
    }

    /// Sets which records [`run()`](Self::run) writes.
    ///
    /// # Errors
    ///
    /// Returns a `UsageConflict` error if a policy was already set.
    pub fn set_policy(&mut self, policy: OutputPolicy) -> Result<(), Error> {
        self.ensure_not_saved()?;
        if let Some(existing) = self.policy {
            return Err(Error::usage_conflict("output policy already set")
                .with_context("existing", format!("{existing:?}"))
                .with_context("rejected", format!("{policy:?}")));
        }
        self.policy = Some(policy);
        Ok(())
    }

    /// Streams records from `input` to `output`.
    ///
    /// Each record is tested with [`BloomFilter::add`] when `update_filter` is set and with
    /// [`BloomFilter::check`] otherwise, and written back with a `\n` terminator when the output
    /// policy selects it. Does nothing unless both a filter and a policy are present.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if reading the input or writing the output fails. Records
    /// processed before the failure stay in the filter.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
        update_filter: bool,
    ) -> Result<RunStats, Error> {
        self.ensure_not_saved()?;
        let (Some(policy), Some(filter)) = (self.policy, self.filter.as_mut()) else {
            debug!("no filter or output policy, skipping run");
            return Ok(RunStats::default());
        };

        let mut stats = RunStats::default();
        let mut records = RecordReader::new(input, self.max_record_len);
        while let Some(record) = records
            .next_record()
            .map_err(|err| Error::io("failed to read input records", err))?
        {
            stats.records += 1;
            if record.truncated {
                stats.truncated += 1;
                debug!(record = stats.records, "record truncated");
            }

            let present = if update_filter {
                filter.add(record.bytes)
            } else {
                filter.check(record.bytes)
            };
            if policy.should_emit(present) {
                output
                    .write_all(record.bytes)
                    .and_then(|()| output.write_all(b"\n"))
                    .map_err(|err| Error::write_failed("output record", err))?;
                stats.emitted += 1;
            }
        }
        output
            .flush()
            .map_err(|err| Error::write_failed("output", err))?;

        if stats.truncated > 0 {
            warn!(
                truncated = stats.truncated,
                max_record_len = self.max_record_len.map_or(0, NonZeroUsize::get),
                "records exceeded the maximum length and were truncated"
            );
        }
        info!(
            records = stats.records,
            emitted = stats.emitted,
            bits_used = filter.bits_used(),
            ?policy,
            update_filter,
            "run complete"
        );
        Ok(stats)
    }

    /// Encodes the current filter into `writer`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if there is no filter, or an `Io` error if the write
    /// fails.
    pub fn save_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        let filter = self
            .filter
            .as_ref()
            .ok_or_else(|| Error::config_invalid("no filter to save"))?;
        filter.serialize_into(writer)
    }

    /// Writes the filter to the queued save target, if any.
    ///
    /// Returns `Ok(false)` when no target was queued. After a successful save the pipeline is
    /// [`Saved`](PipelineState::Saved).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if a target is queued but there is no filter, or an
    /// `Io` error if the file cannot be written. The filter is written to a temporary file in
    /// the target's directory and renamed over the target, so a failed save leaves any
    /// existing file untouched. Failed writes are not retried.
    pub fn maybe_save(&mut self) -> Result<bool, Error> {
        self.ensure_not_saved()?;
        let Some(path) = &self.save_target else {
            return Ok(false);
        };
        let Some(filter) = &self.filter else {
            let err = Error::config_invalid("no filter to save");
            return Err(err.with_context("path", path.display()));
        };

        persist_filter(path, filter).map_err(|err| err.with_context("path", path.display()))?;
        debug!(path = %path.display(), "saved filter");
        self.saved = true;
        Ok(true)
    }

    fn ensure_not_saved(&self) -> Result<(), Error> {
        if self.saved {
            return Err(Error::usage_conflict("filter was already saved"));
        }
        Ok(())
    }
}

/// Writes `filter` to a temporary file beside `path`, then renames it over `path`.
fn persist_filter<H: HashOracle>(path: &Path, filter: &BloomFilter<H>) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged =
        NamedTempFile::new_in(dir).map_err(|err| Error::io("failed to create filter file", err))?;
    filter.serialize_into(BufWriter::new(staged.as_file_mut()))?;
    staged
        .persist(path)
        .map_err(|err| Error::io("failed to replace filter file", err.error))?;
    Ok(())
}
