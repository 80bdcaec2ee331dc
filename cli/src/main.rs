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

//! `bloomsift`: filter newline-delimited records from stdin to stdout through a Bloom filter.

use std::io;
use std::io::BufWriter;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use bloomsift::bloom::FilterShape;
use bloomsift::hash::HashAlgorithm;
use bloomsift::pipeline::FilterPipeline;
use bloomsift::pipeline::OutputPolicy;
use bloomsift::pipeline::PipelineConfig;
use clap::ArgAction;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Deduplicate or select lines with a persistent Bloom filter.
///
/// Create a filter with -p and -n, or load one or more with -l. Pick -r or -d to stream stdin
/// to stdout through the filter.
#[derive(Debug, Parser)]
#[command(name = "bloomsift", version)]
struct Cli {
    /// False positive rate of a new filter, in (0, 1).
    #[arg(short = 'p', long = "false-positive", value_name = "RATE")]
    false_positive: Option<f64>,

    /// Expected number of keys of a new filter.
    #[arg(short = 'n', long = "elements", value_name = "N")]
    elements: Option<u64>,

    /// Load a filter file; repeat to merge several filters of the same shape.
    #[arg(short = 'l', long = "load", value_name = "FILE")]
    load: Vec<PathBuf>,

    /// Save the filter to FILE on exit. May be given once.
    #[arg(short = 's', long = "save", value_name = "FILE")]
    save: Vec<PathBuf>,

    /// Write only lines not seen before.
    #[arg(
        short = 'r',
        long = "remove-duplicates",
        action = ArgAction::Count
    )]
    remove_duplicates: u8,

    /// Write only lines seen before.
    #[arg(short = 'd', long = "only-duplicates", action = ArgAction::Count)]
    only_duplicates: u8,

    /// Test lines without inserting them into the filter.
    #[arg(short = 'u', long = "no-update-filter")]
    no_update_filter: bool,

    /// Truncate lines longer than BYTES; the rest of such a line is skipped.
    #[arg(long = "max-record-len", value_name = "BYTES")]
    max_record_len: Option<NonZeroUsize>,

    /// Hash function used to build and read filters.
    #[arg(
        long = "hash",
        value_name = "NAME",
        default_value_t = HashAlgorithm::Murmur3X86_32
    )]
    hash: HashAlgorithm,

    /// Log more to stderr; repeat for debug output. RUST_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// A failure tagged with the process exit code it maps to.
struct Failure {
    code: u8,
    error: anyhow::Error,
}

trait ExitCodeExt<T> {
    fn or_exit(self, code: u8) -> Result<T, Failure>;
}

impl<T, E: Into<anyhow::Error>> ExitCodeExt<T> for Result<T, E> {
    fn or_exit(self, code: u8) -> Result<T, Failure> {
        self.map_err(|err| Failure {
            code,
            error: err.into(),
        })
    }
}

const EXIT_IO: u8 = 1;
const EXIT_SAVE_CONFLICT: u8 = 2;
const EXIT_LOAD: u8 = 3;
const EXIT_POLICY_CONFLICT: u8 = 4;
const EXIT_CREATE: u8 = 5;
const EXIT_INCOMPLETE_SHAPE: u8 = 7;
const EXIT_SAVE: u8 = 8;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("bloomsift: {:#}", failure.error);
            ExitCode::from(failure.code)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Failure> {
    let mut config = PipelineConfig::default().with_hash(cli.hash);
    if let Some(max_len) = cli.max_record_len {
        config = config.with_max_record_len(max_len);
    }
    let mut pipeline = FilterPipeline::from_config(&config);

    for path in &cli.save {
        pipeline
            .queue_save(path)
            .context("--save may be given only once")
            .or_exit(EXIT_SAVE_CONFLICT)?;
    }

    for path in &cli.load {
        pipeline
            .load_and_merge(path)
            .with_context(|| format!("unable to load filter file {}", path.display()))
            .or_exit(EXIT_LOAD)?;
    }

    let policies = [
        (OutputPolicy::RemoveDuplicates, cli.remove_duplicates),
        (OutputPolicy::OnlyDuplicates, cli.only_duplicates),
    ];
    for (policy, count) in policies {
        for _ in 0..count {
            pipeline
                .set_policy(policy)
                .context("duplicate filtering mode already set")
                .or_exit(EXIT_POLICY_CONFLICT)?;
        }
    }

    match (cli.false_positive, cli.elements) {
        (Some(fpp), Some(elements)) => {
            let shape = FilterShape::from_accuracy(elements, fpp)
                .context("invalid filter parameters")
                .or_exit(EXIT_INCOMPLETE_SHAPE)?;
            pipeline
                .create_filter(shape)
                .context("cannot create a filter when one was loaded")
                .or_exit(EXIT_CREATE)?;
        }
        (None, None) => {}
        (fpp, elements) => {
            return Err(Failure {
                code: EXIT_INCOMPLETE_SHAPE,
                error: anyhow::anyhow!(
                    "--false-positive and --elements must be given together ({fpp:?}, {elements:?})"
                ),
            });
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = pipeline
        .run(
            stdin.lock(),
            BufWriter::new(stdout.lock()),
            !cli.no_update_filter,
        )
        .context("filtering stdin failed")
        .or_exit(EXIT_IO)?;
    debug!(?stats, "stream finished");

    pipeline
        .maybe_save()
        .context("error saving filter")
        .or_exit(EXIT_SAVE)?;
    Ok(())
}
