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

//! Error types for bloomsift operations

use std::fmt;
use std::io;

/// ErrorKind is all kinds of Error of bloomsift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The sizing or construction parameters are invalid.
    ConfigInvalid,
    /// Two filters differ in shape or hash oracle and cannot be merged.
    ShapeMismatch,
    /// The serialized filter is malformed, e.g. the magic number does not match.
    MalformedData,
    /// The serialized filter ended before the header or body was complete.
    InsufficientData,
    /// Reading or writing the underlying stream failed.
    Io,
    /// A setting that may only be configured once was configured again.
    UsageConflict,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::ShapeMismatch => "ShapeMismatch",
            ErrorKind::MalformedData => "MalformedData",
            ErrorKind::InsufficientData => "InsufficientData",
            ErrorKind::Io => "Io",
            ErrorKind::UsageConflict => "UsageConflict",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all bloomsift functions.
///
/// # Examples
///
/// ```
/// # use bloomsift::error::Error;
/// # use bloomsift::error::ErrorKind;
/// let err = Error::new(ErrorKind::UsageConflict, "output policy already set");
/// assert_eq!(err.kind(), ErrorKind::UsageConflict);
/// assert_eq!(err.message(), "output policy already set");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use bloomsift::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::Io, "failed to write filter");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::other("disk full"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within bloomsift crate.
impl Error {
    pub(crate) fn config_invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, msg)
    }

    pub(crate) fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ShapeMismatch, msg)
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedData, msg)
    }

    pub(crate) fn usage_conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::UsageConflict, msg)
    }

    pub(crate) fn invalid_magic(expected: u32, actual: u32) -> Self {
        Self::malformed(format!(
            "invalid magic number: expected {expected:#010x}, got {actual:#010x}"
        ))
    }

    /// Classifies a failed read of `field`: an early end of stream is a truncation,
    /// anything else is an I/O failure.
    pub(crate) fn read_failed(field: &'static str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::new(
                ErrorKind::InsufficientData,
                format!("insufficient data: {field}"),
            )
        } else {
            Self::io(format!("failed to read {field}"), err)
        }
    }

    pub(crate) fn io(msg: impl Into<String>, err: io::Error) -> Self {
        Self::new(ErrorKind::Io, msg).set_source(err)
    }

    pub(crate) fn write_failed(what: &'static str, err: io::Error) -> Self {
        Self::io(format!("failed to write {what}"), err)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}: {v}")?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}
