// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ifc-facets core
//!
//! STEP/IFC model loader built with [nom](https://docs.rs/nom).
//!
//! - **Tokenization**: zero-copy STEP tokens, string escapes resolved on decode
//! - **Entity scanning**: instance spans found with [memchr](https://docs.rs/memchr),
//!   quote- and comment-aware
//! - **Model graph**: [`IfcModel`] decodes the whole DATA section once and
//!   answers read-only queries (products in file order, reference resolution,
//!   length unit scale)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_facets_core::{IfcModel, IfcType};
//!
//! let model = IfcModel::from_bytes(&upload)?;
//! for product in model.products() {
//!     println!("#{} {}", product.id, product.ifc_type);
//! }
//! ```

pub mod decoded;
pub mod error;
pub mod header;
pub mod model;
pub mod parser;
pub mod schema;
pub mod units;

pub use decoded::{AttributeValue, DecodedEntity};
pub use error::{Error, Result};
pub use header::{SchemaVersion, StepHeader};
pub use model::{EntityIndex, IfcModel};
pub use parser::{decode_step_string, parse_entity, EntityScanner, Token};
pub use schema::IfcType;
pub use units::{extract_length_unit_scale, get_si_prefix_multiplier};
