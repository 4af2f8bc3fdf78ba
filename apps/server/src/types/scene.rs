// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plotly figure types for the rendered scene.

use serde::{Deserialize, Serialize};

/// Plotly trace type of every face.
pub const TRACE_TYPE: &str = "mesh3d";
/// Fill colour of every face.
pub const FACE_COLOR: &str = "blue";
/// Opacity of every face.
pub const FACE_OPACITY: f64 = 0.5;

/// One triangle rendered as its own mesh3d trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    /// X coordinates of the three vertices.
    pub x: [f64; 3],
    /// Y coordinates of the three vertices.
    pub y: [f64; 3],
    /// Z coordinates of the three vertices.
    pub z: [f64; 3],
    pub color: String,
    pub opacity: f64,
}

/// Axis settings; only the background plane is controlled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub showbackground: bool,
}

/// 3D scene settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAxes {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub scene: SceneAxes,
}

impl Default for Layout {
    fn default() -> Self {
        let hidden = Axis {
            showbackground: false,
        };
        Self {
            scene: SceneAxes {
                xaxis: hidden.clone(),
                yaxis: hidden.clone(),
                zaxis: hidden,
            },
        }
    }
}

/// Renderable figure: traces plus layout, ready for `Plotly.newPlot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub data: Vec<MeshTrace>,
    pub layout: Layout,
}

impl Scene {
    pub fn trace_count(&self) -> usize {
        self.data.len()
    }
}
