// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model loading
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading an IFC model
#[derive(Error, Debug)]
pub enum Error {
    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Not a STEP file: missing ISO-10303-21 header")]
    NotStep,

    #[error("Missing DATA section")]
    MissingDataSection,

    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Duplicate entity #{0}")]
    DuplicateEntity(u32),

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),
}

impl Error {
    /// Create a parse error at a byte offset
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
