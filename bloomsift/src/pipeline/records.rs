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

use std::io;
use std::io::BufRead;
use std::num::NonZeroUsize;

/// One newline-delimited record, without its terminator.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Record<'a> {
    pub bytes: &'a [u8],
    /// Set when the line was longer than the cap and its tail was skipped.
    pub truncated: bool,
}

/// Splits a byte stream into records.
///
/// A trailing line without a terminator is still a record; an empty line is a zero-length
/// record. With a cap, bytes past the first `max_len` of a line are skipped up to and
/// including its terminator, so the next record starts on the next line.
pub(crate) struct RecordReader<R> {
    inner: R,
    max_len: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R, max_len: Option<NonZeroUsize>) -> Self {
        RecordReader {
            inner,
            max_len: max_len.map_or(usize::MAX, NonZeroUsize::get),
            buf: Vec::new(),
        }
    }

    pub fn next_record(&mut self) -> io::Result<Option<Record<'_>>> {
        let RecordReader {
            inner,
            max_len,
            buf,
        } = self;
        buf.clear();

        let mut read_any = false;
        let mut truncated = false;
        loop {
            let available = match inner.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                break;
            }
            read_any = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let line_end = newline.unwrap_or(available.len());
            if !truncated {
                let room = *max_len - buf.len();
                buf.extend_from_slice(&available[..line_end.min(room)]);
                truncated = line_end > room;
            }

            match newline {
                Some(pos) => {
                    inner.consume(pos + 1);
                    break;
                }
                None => {
                    let len = available.len();
                    inner.consume(len);
                }
            }
        }

        if !read_any {
            return Ok(None);
        }
        Ok(Some(Record {
            bytes: buf,
            truncated,
        }))
    }
}
