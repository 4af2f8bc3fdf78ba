// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: i64, vertex_count: usize },

    #[error("Unsupported representation item {0}")]
    UnsupportedItem(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    #[error("Error processing geometry for {product}: {source}")]
    ProductFailed {
        product: String,
        #[source]
        source: Box<Error>,
    },

    #[error("No faces could be extracted from the model")]
    NoGeometry,

    #[error("Core parser error: {0}")]
    CoreError(#[from] ifc_facets_core::Error),
}

impl Error {
    /// Create a geometry error
    pub fn geometry(message: impl Into<String>) -> Self {
        Error::Geometry(message.into())
    }
}
