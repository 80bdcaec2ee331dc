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

mod common;

use std::fs;
use std::num::NonZeroUsize;

use bloomsift::bloom::BloomFilter;
use bloomsift::bloom::FilterShape;
use bloomsift::error::ErrorKind;
use bloomsift::hash::HashAlgorithm;
use bloomsift::pipeline::FilterPipeline;
use bloomsift::pipeline::OutputPolicy;
use bloomsift::pipeline::PipelineConfig;
use bloomsift::pipeline::PipelineState;
use common::filter_with;
use common::keys;
use common::records;
use googletest::assert_that;
use googletest::prelude::contains_substring;

fn pipeline_with(policy: OutputPolicy) -> FilterPipeline {
    let mut pipeline = FilterPipeline::new();
    pipeline
        .create_filter(FilterShape::from_accuracy(1000, 0.01).unwrap())
        .unwrap();
    pipeline.set_policy(policy).unwrap();
    pipeline
}

fn run(pipeline: &mut FilterPipeline, input: &[u8], update_filter: bool) -> Vec<u8> {
    let mut output = Vec::new();
    pipeline.run(input, &mut output, update_filter).unwrap();
    output
}

#[test]
fn test_remove_duplicates_end_to_end() {
    let mut pipeline = pipeline_with(OutputPolicy::RemoveDuplicates);
    let output = run(&mut pipeline, &records(&["a", "b", "a", "c"]), true);
    assert_eq!(output, records(&["a", "b", "c"]));
}

#[test]
fn test_only_duplicates_end_to_end() {
    let mut pipeline = pipeline_with(OutputPolicy::OnlyDuplicates);
    let output = run(&mut pipeline, &records(&["a", "b", "a", "c"]), true);
    assert_eq!(output, records(&["a"]));
}

#[test]
fn test_read_only_mode_leaves_filter_unchanged() {
    let mut pipeline = FilterPipeline::new();
    let seed = filter_with(1000, 0.01, &keys(0..10));
    pipeline.merge_filter(seed.clone()).unwrap();
    pipeline.set_policy(OutputPolicy::OnlyDuplicates).unwrap();

    let input = records(&["key_1", "other", "key_2", "other"]);
    let output = run(&mut pipeline, &input, false);

    assert_eq!(output, records(&["key_1", "key_2"]));
    assert_eq!(
        pipeline.filter().unwrap().serialize(),
        seed.serialize(),
        "read-only run must not touch the filter"
    );
}

#[test]
fn test_runs_accumulate_across_inputs() {
    let mut pipeline = pipeline_with(OutputPolicy::RemoveDuplicates);
    assert_eq!(
        run(&mut pipeline, &records(&["a", "b"]), true),
        records(&["a", "b"])
    );
    assert_eq!(
        run(&mut pipeline, &records(&["b", "c"]), true),
        records(&["c"])
    );
}

#[test]
fn test_truncation_cap() {
    let config = PipelineConfig::default().with_max_record_len(NonZeroUsize::new(4).unwrap());
    let mut pipeline = FilterPipeline::from_config(&config);
    pipeline
        .create_filter(FilterShape::from_accuracy(100, 0.01).unwrap())
        .unwrap();
    pipeline.set_policy(OutputPolicy::RemoveDuplicates).unwrap();

    let mut output = Vec::new();
    let stats = pipeline
        .run(&b"prefix-one\nprefix-two\npre\n"[..], &mut output, true)
        .unwrap();
    assert_eq!(output, b"pref\npre\n");
    assert_eq!(stats.records, 3);
    assert_eq!(stats.emitted, 2);
    assert_eq!(stats.truncated, 2);
}

#[test]
fn test_load_merges_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.bf");
    let second = dir.path().join("second.bf");
    fs::write(&first, filter_with(100, 0.01, &keys(0..50)).serialize()).unwrap();
    fs::write(&second, filter_with(100, 0.01, &keys(50..100)).serialize()).unwrap();

    let mut pipeline = FilterPipeline::new();
    pipeline.load_and_merge(&first).unwrap();
    assert_eq!(pipeline.state(), PipelineState::Ready);
    pipeline.load_and_merge(&second).unwrap();

    let filter = pipeline.filter().unwrap();
    for key in keys(0..100) {
        assert!(filter.check(&key));
    }
}

#[test]
fn test_load_failure_keeps_current_filter() {
    let dir = tempfile::tempdir().unwrap();
    let other_shape = dir.path().join("other.bf");
    fs::write(
        &other_shape,
        filter_with(200, 0.01, &keys(0..1)).serialize(),
    )
    .unwrap();
    let missing = dir.path().join("missing.bf");

    let mut pipeline = FilterPipeline::new();
    pipeline
        .merge_filter(filter_with(100, 0.01, &keys(0..10)))
        .unwrap();
    let before = pipeline.filter().unwrap().clone();

    let err = pipeline.load_and_merge(&other_shape).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    let rendered = err.to_string();
    assert_that!(rendered.as_str(), contains_substring("other.bf"));

    let err = pipeline.load_and_merge(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    assert_eq!(pipeline.filter(), Some(&before));
}

#[test]
fn test_create_after_load_conflicts() {
    let mut pipeline = FilterPipeline::new();
    pipeline
        .merge_filter(filter_with(100, 0.01, &keys(0..10)))
        .unwrap();
    let err = pipeline
        .create_filter(FilterShape::from_accuracy(100, 0.01).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UsageConflict);
}

#[test]
fn test_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.bf");

    let mut pipeline = pipeline_with(OutputPolicy::RemoveDuplicates);
    pipeline.queue_save(&path).unwrap();
    run(&mut pipeline, &records(&["x", "y"]), true);
    assert!(pipeline.maybe_save().unwrap());
    assert_eq!(pipeline.state(), PipelineState::Saved);

    let restored = BloomFilter::deserialize(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(Some(&restored), pipeline.filter());
    assert!(restored.check("x"));
    assert!(restored.check("y"));

    let err = pipeline.maybe_save().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UsageConflict);
    let err = pipeline
        .set_policy(OutputPolicy::OnlyDuplicates)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UsageConflict);
}

#[test]
fn test_save_without_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = FilterPipeline::new();
    pipeline.queue_save(dir.path().join("never.bf")).unwrap();

    let err = pipeline.maybe_save().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(!dir.path().join("never.bf").exists());
}

#[test]
fn test_failed_save_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kept.bf");
    let existing = filter_with(100, 0.01, &keys(0..10)).serialize();
    fs::write(&path, &existing).unwrap();

    let mut pipeline = FilterPipeline::new();
    pipeline.queue_save(&path).unwrap();
    let err = pipeline.maybe_save().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(fs::read(&path).unwrap(), existing);
}

#[test]
fn test_save_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replaced.bf");
    fs::write(&path, b"stale").unwrap();

    let mut pipeline = pipeline_with(OutputPolicy::RemoveDuplicates);
    pipeline.queue_save(&path).unwrap();
    assert!(pipeline.maybe_save().unwrap());

    let saved = fs::read(&path).unwrap();
    assert_eq!(Some(saved), pipeline.filter().map(BloomFilter::serialize));
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_save_to_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = pipeline_with(OutputPolicy::RemoveDuplicates);
    pipeline
        .queue_save(dir.path().join("no-such-dir").join("out.bf"))
        .unwrap();

    let err = pipeline.maybe_save().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(pipeline.state(), PipelineState::Ready);
}

#[test]
fn test_config_selects_oracle() {
    let config = PipelineConfig::default().with_hash(HashAlgorithm::Murmur3X64_128);
    let mut pipeline = FilterPipeline::from_config(&config);
    pipeline
        .create_filter(FilterShape::from_accuracy(100, 0.01).unwrap())
        .unwrap();
    assert_eq!(
        pipeline.filter().unwrap().oracle().algorithm(),
        HashAlgorithm::Murmur3X64_128
    );
}
