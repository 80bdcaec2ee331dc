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

use byteorder::BE;
use byteorder::ReadBytesExt;

use crate::error::Error;

/// Reads big-endian fields from a byte source, naming the field on failure.
///
/// An early end of stream is reported as `InsufficientData`, any other failure as `Io`.
pub(crate) struct FilterSource<R> {
    inner: R,
}

impl<R: Read> FilterSource<R> {
    pub fn new(inner: R) -> Self {
        FilterSource { inner }
    }

    /// Reads a 32-bit unsigned integer in big-endian byte order.
    pub fn read_u32_be(&mut self, field: &'static str) -> Result<u32, Error> {
        self.inner
            .read_u32::<BE>()
            .map_err(|err| Error::read_failed(field, err))
    }

    /// Reads a 64-bit unsigned integer in big-endian byte order.
    pub fn read_u64_be(&mut self, field: &'static str) -> Result<u64, Error> {
        self.inner
            .read_u64::<BE>()
            .map_err(|err| Error::read_failed(field, err))
    }
}
