// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type definitions for API requests and responses.

mod request;
mod response;
mod scene;

pub use request::ViewQuery;
pub use response::{DiagnosticInfo, ModelMetadata, ProcessingStats, ViewResponse};
pub use scene::{Layout, MeshTrace, Scene, FACE_COLOR, FACE_OPACITY, TRACE_TYPE};
