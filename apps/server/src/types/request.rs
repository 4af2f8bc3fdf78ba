// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;

/// Query parameters of `POST /api/v1/view`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    /// `strict` or `tolerant`; the configured policy when absent.
    #[serde(default)]
    pub mode: Option<String>,
}
