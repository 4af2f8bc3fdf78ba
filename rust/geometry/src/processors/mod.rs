// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Processors
//!
//! - `tessellated`: TriangulatedFaceSet, PolygonalFaceSet (pre-tessellated meshes)
//! - `helpers`: Shared parse functions used by processors and placement

pub(crate) mod helpers;
mod tessellated;

#[cfg(test)]
mod tests;

pub use tessellated::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
