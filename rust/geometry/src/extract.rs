// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face extraction
//!
//! Walks every product of a model in file order, tessellates its
//! `Tessellation` representations and flattens the meshes into a
//! [`FaceList`] of independent triangles.
//!
//! ```rust,ignore
//! use ifc_facets_geometry::{ErrorPolicy, ExtractOptions, FaceExtractor};
//!
//! let mut diagnostics = Vec::new();
//! let extraction = FaceExtractor::new(ExtractOptions::tolerant())
//!     .extract(&model, &mut diagnostics)?;
//! println!("{} faces, {} failures", extraction.faces.len(), diagnostics.len());
//! ```

use crate::representation::product_representations;
use crate::{Error, FaceList, GeometryRouter, Result};
use ifc_facets_core::{DecodedEntity, IfcModel};
use std::fmt;
use std::str::FromStr;

/// What happens when one product's geometry cannot be tessellated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort on the first failure
    Strict,
    /// Report the failure and keep going
    #[default]
    Tolerant,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Strict => "strict",
            ErrorPolicy::Tolerant => "tolerant",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised error policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error policy '{0}', expected 'strict' or 'tolerant'")]
pub struct ParsePolicyError(pub String);

impl FromStr for ErrorPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ErrorPolicy::Strict),
            "tolerant" => Ok(ErrorPolicy::Tolerant),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// A per-product failure reported in tolerant mode
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub product_id: u32,
    /// STEP type name as written in the file
    pub product_type: String,
    /// IfcRoot.Name when present
    pub product_name: Option<String>,
    pub message: String,
}

impl Diagnostic {
    fn new(model: &IfcModel, product: &DecodedEntity, error: &Error) -> Self {
        Self {
            product_id: product.id,
            product_type: product_type(model, product),
            product_name: product.get_string(2).map(str::to_string),
            message: error.to_string(),
        }
    }

    /// Human readable product label, e.g. `IfcWall #12 'Wall-01'`
    pub fn product_label(&self) -> String {
        match &self.product_name {
            Some(name) => format!("{} #{} '{}'", self.product_type, self.product_id, name),
            None => format!("{} #{}", self.product_type, self.product_id),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error processing geometry for {}: {}",
            self.product_label(),
            self.message
        )
    }
}

/// Receiver of tolerant-mode diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Extraction settings
///
/// The defaults place faces in world coordinates and metres. Turning off
/// `apply_placement` and `apply_unit_scale` yields the raw vertex buffers
/// of each item, in the representation's own frame and file units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub policy: ErrorPolicy,
    /// Apply each product's ObjectPlacement chain
    pub apply_placement: bool,
    /// Convert the project length unit to metres
    pub apply_unit_scale: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            policy: ErrorPolicy::default(),
            apply_placement: true,
            apply_unit_scale: true,
        }
    }
}

impl ExtractOptions {
    pub fn strict() -> Self {
        Self {
            policy: ErrorPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn tolerant() -> Self {
        Self {
            policy: ErrorPolicy::Tolerant,
            ..Self::default()
        }
    }
}

/// Counters gathered during one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub products: usize,
    pub products_with_representation: usize,
    pub tessellated_representations: usize,
    pub skipped_representations: usize,
    pub failures: usize,
    pub triangles: usize,
}

/// Faces of a model plus the counters of the run that produced them
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub faces: FaceList,
    pub stats: ExtractionStats,
}

/// Collects the tessellated faces of every product
pub struct FaceExtractor {
    options: ExtractOptions,
}

impl FaceExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the ordered face list of `model`
    ///
    /// Tolerant failures go to `sink`; strict mode never touches it. An
    /// empty result is [`Error::NoGeometry`] under either policy.
    pub fn extract(
        &self,
        model: &IfcModel,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Extraction> {
        let router = if self.options.apply_unit_scale {
            GeometryRouter::with_units(model)
        } else {
            GeometryRouter::new()
        };

        let mut extraction = Extraction::default();
        for product in model.products() {
            extraction.stats.products += 1;
            if let Err(error) = self.extract_product(model, &router, product, &mut extraction, sink) {
                return Err(Error::ProductFailed {
                    product: product_label(model, product),
                    source: Box::new(error),
                });
            }
        }

        if extraction.faces.is_empty() {
            return Err(Error::NoGeometry);
        }
        Ok(extraction)
    }

    /// Gather one product's faces
    ///
    /// Returns an error only when the failure must abort extraction.
    fn extract_product(
        &self,
        model: &IfcModel,
        router: &GeometryRouter,
        product: &DecodedEntity,
        extraction: &mut Extraction,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<()> {
        let representations = match product_representations(model, product) {
            Ok(representations) => representations,
            Err(error) => return self.fail(model, product, error, extraction, sink),
        };
        if representations.is_empty() {
            return Ok(());
        }
        extraction.stats.products_with_representation += 1;

        for representation in &representations {
            if !representation.kind.is_tessellated() {
                extraction.stats.skipped_representations += 1;
                continue;
            }
            extraction.stats.tessellated_representations += 1;

            let added = router
                .process_element(model, product, representation, self.options.apply_placement)
                .and_then(|mesh| extraction.faces.extend_from_mesh(&mesh));
            match added {
                Ok(count) => extraction.stats.triangles += count,
                Err(error) => self.fail(model, product, error, extraction, sink)?,
            }
        }
        Ok(())
    }

    fn fail(
        &self,
        model: &IfcModel,
        product: &DecodedEntity,
        error: Error,
        extraction: &mut Extraction,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<()> {
        extraction.stats.failures += 1;
        match self.options.policy {
            ErrorPolicy::Strict => Err(error),
            ErrorPolicy::Tolerant => {
                sink.report(Diagnostic::new(model, product, &error));
                Ok(())
            }
        }
    }
}

impl Default for FaceExtractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

fn product_type(model: &IfcModel, product: &DecodedEntity) -> String {
    model
        .type_name(product.id)
        .map(str::to_string)
        .unwrap_or_else(|| product.ifc_type.to_string())
}

fn product_label(model: &IfcModel, product: &DecodedEntity) -> String {
    let product_type = product_type(model, product);
    match product.get_string(2) {
        Some(name) => format!("{} #{} '{}'", product_type, product.id, name),
        None => format!("{} #{}", product_type, product.id),
    }
}
