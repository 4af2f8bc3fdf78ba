// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET / - Upload form and plot area.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
