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

use std::io::Write;

use byteorder::BE;
use byteorder::WriteBytesExt;

use crate::error::Error;

/// Writes big-endian fields to a byte sink, naming the field on failure.
pub(crate) struct FilterSink<W> {
    inner: W,
}

impl<W: Write> FilterSink<W> {
    pub fn new(inner: W) -> Self {
        FilterSink { inner }
    }

    /// Writes a 32-bit unsigned integer in big-endian byte order.
    pub fn write_u32_be(&mut self, field: &'static str, n: u32) -> Result<(), Error> {
        self.inner
            .write_u32::<BE>(n)
            .map_err(|err| Error::write_failed(field, err))
    }

    /// Writes a 64-bit unsigned integer in big-endian byte order.
    pub fn write_u64_be(&mut self, field: &'static str, n: u64) -> Result<(), Error> {
        self.inner
            .write_u64::<BE>(n)
            .map_err(|err| Error::write_failed(field, err))
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner
            .flush()
            .map_err(|err| Error::write_failed("filter", err))
    }
}
