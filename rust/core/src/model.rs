// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory model graph of one IFC file.
//!
//! [`IfcModel`] validates the STEP envelope, parses the header and decodes
//! every instance of the DATA section up front. A file that loads is
//! syntactically complete; geometry resolution later only follows
//! references.

use crate::decoded::{AttributeValue, DecodedEntity};
use crate::error::{Error, Result};
use crate::header::{parse_header, SchemaVersion, StepHeader};
use crate::parser::{is_blank, parse_entity, skip_blank, EntityScanner};
use crate::schema::IfcType;
use crate::units::extract_length_unit_scale;
use rustc_hash::FxHashMap;

/// Entity index: entity id -> byte span of the instance in the file
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

const MAGIC: &str = "ISO-10303-21;";
const HEADER_START: &str = "HEADER;";
const DATA_START: &str = "DATA;";
const SECTION_END: &str = "ENDSEC;";

/// IfcProduct.Representation
const PRODUCT_REPRESENTATION_ATTR: usize = 6;

/// Parsed IFC model (read-only once built)
pub struct IfcModel {
    content: String,
    header: StepHeader,
    index: EntityIndex,
    entities: FxHashMap<u32, DecodedEntity>,
    /// Entity ids in file order
    order: Vec<u32>,
}

impl std::fmt::Debug for IfcModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IfcModel")
            .field("schema", &self.schema_version())
            .field("entities", &self.order.len())
            .finish()
    }
}

/// Offset of `needle` at or after `from`, as an absolute index
#[inline]
fn find_from(content: &str, from: usize, needle: &str) -> Option<usize> {
    memchr::memmem::find(&content.as_bytes()[from..], needle.as_bytes()).map(|i| from + i)
}

impl IfcModel {
    /// Load a model from raw upload bytes (UTF-8 STEP text)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Self::parse(text)
    }

    /// Load a model from STEP text
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let content = text.to_string();

        let magic = content.len() - content.trim_start().len();
        if !content[magic..].starts_with(MAGIC) {
            return Err(Error::NotStep);
        }

        let (header, header_end) = match find_from(&content, magic, HEADER_START) {
            Some(start) => {
                let body = start + HEADER_START.len();
                let end = find_from(&content, body, SECTION_END)
                    .ok_or_else(|| Error::parse(body, "header section not terminated"))?;
                (parse_header(&content[body..end], body)?, end)
            }
            None => (StepHeader::default(), magic),
        };

        let data_start = find_from(&content, header_end, DATA_START)
            .map(|i| i + DATA_START.len())
            .ok_or(Error::MissingDataSection)?;

        let (index, entities, order) = Self::decode_data(&content, data_start)?;

        Ok(Self {
            content,
            header,
            index,
            entities,
            order,
        })
    }

    /// Decode every instance of the DATA section starting at `data_start`
    #[allow(clippy::type_complexity)]
    fn decode_data(
        content: &str,
        data_start: usize,
    ) -> Result<(EntityIndex, FxHashMap<u32, DecodedEntity>, Vec<u32>)> {
        let data = &content[data_start..];

        // Pre-allocate with estimated capacity (roughly 1 entity per 50 bytes)
        let estimated = data.len() / 50;
        let mut index = EntityIndex::with_capacity_and_hasher(estimated, Default::default());
        let mut entities = FxHashMap::with_capacity_and_hasher(estimated, Default::default());
        let mut order = Vec::with_capacity(estimated);

        let mut scanner = EntityScanner::new(data);
        let mut previous_end = 0;

        while let Some(span) = scanner.next_span() {
            let (start, end) = span.map_err(|e| shift_position(e, data_start))?;

            // Only whitespace and comments may sit between instances
            let gap = &data[previous_end..start];
            if data_section_ended(gap) {
                break;
            }
            if !is_blank(gap) {
                return Err(Error::parse(
                    data_start + previous_end,
                    format!("unexpected content '{}'", gap.trim().chars().take(40).collect::<String>()),
                ));
            }
            previous_end = end;

            let (id, type_name, tokens) = parse_entity(&data[start..end])
                .map_err(|e| shift_position(e, data_start + start))?;

            let attributes = tokens.iter().map(AttributeValue::from_token).collect();
            let entity = DecodedEntity::new(id, IfcType::from_name(type_name), attributes);

            if entities.insert(id, entity).is_some() {
                return Err(Error::DuplicateEntity(id));
            }
            index.insert(id, (data_start + start, data_start + end));
            order.push(id);
        }

        if !skip_blank(&data[previous_end..]).starts_with(SECTION_END) {
            return Err(Error::parse(
                data_start + previous_end,
                "data section not terminated by ENDSEC",
            ));
        }

        Ok((index, entities, order))
    }

    /// Parsed STEP header
    pub fn header(&self) -> &StepHeader {
        &self.header
    }

    /// Schema family declared in the header
    pub fn schema_version(&self) -> SchemaVersion {
        self.header.schema_version()
    }

    /// Number of entity instances in the DATA section
    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Get entity by id
    pub fn get(&self, id: u32) -> Option<&DecodedEntity> {
        self.entities.get(&id)
    }

    /// Get entity by id, failing when the reference dangles
    pub fn entity(&self, id: u32) -> Result<&DecodedEntity> {
        self.get(id).ok_or(Error::EntityNotFound(id))
    }

    /// Resolve an entity reference attribute
    ///
    /// Null and non-reference values resolve to `None`; a dangling reference is an error.
    pub fn resolve_ref(&self, attr: &AttributeValue) -> Result<Option<&DecodedEntity>> {
        match attr.as_entity_ref() {
            Some(id) => self.entity(id).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a list of entity references
    pub fn resolve_ref_list(&self, attr: &AttributeValue) -> Result<Vec<&DecodedEntity>> {
        match attr.as_list() {
            Some(items) => items
                .iter()
                .filter_map(|item| item.as_entity_ref())
                .map(|id| self.entity(id))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// All entities in file order
    pub fn iter(&self) -> impl Iterator<Item = &DecodedEntity> + '_ {
        self.order.iter().filter_map(move |id| self.entities.get(id))
    }

    /// Product entities (IfcProduct subtypes) in file order
    ///
    /// Types outside the schema table count as products when their
    /// Representation attribute points at an IfcProductDefinitionShape.
    pub fn products(&self) -> impl Iterator<Item = &DecodedEntity> + '_ {
        self.iter().filter(move |entity| self.is_product(entity))
    }

    fn is_product(&self, entity: &DecodedEntity) -> bool {
        match entity.ifc_type {
            IfcType::Unknown => entity
                .get_ref(PRODUCT_REPRESENTATION_ATTR)
                .and_then(|id| self.get(id))
                .is_some_and(|shape| shape.ifc_type == IfcType::IfcProductDefinitionShape),
            ty => ty.is_product(),
        }
    }

    /// Entities of one type in file order
    pub fn entities_of_type(&self, ifc_type: IfcType) -> impl Iterator<Item = &DecodedEntity> + '_ {
        self.iter().filter(move |entity| entity.ifc_type == ifc_type)
    }

    /// Raw STEP text of an instance, `#id` through `;`
    pub fn raw(&self, id: u32) -> Option<&str> {
        let (start, end) = self.index.get(&id).copied()?;
        self.content.get(start..end)
    }

    /// STEP type name as written in the file (keeps names of unknown types)
    pub fn type_name(&self, id: u32) -> Option<&str> {
        let entity = self.get(id)?;
        if entity.ifc_type != IfcType::Unknown {
            return Some(entity.ifc_type.name());
        }
        let raw = self.raw(id)?;
        let after_eq = raw[raw.find('=')? + 1..].trim_start();
        let len = after_eq
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after_eq.len());
        Some(&after_eq[..len])
    }

    /// Length unit scale to metres declared by the project (1.0 when absent)
    pub fn length_unit_scale(&self) -> f64 {
        self.entities_of_type(IfcType::IfcProject)
            .next()
            .and_then(|project| extract_length_unit_scale(self, project.id).ok())
            .unwrap_or(1.0)
    }
}

/// True when the gap before the next `#` opens with the end of the DATA section
fn data_section_ended(gap: &str) -> bool {
    skip_blank(gap).starts_with(SECTION_END)
}

fn shift_position(error: Error, offset: usize) -> Error {
    match error {
        Error::Parse { position, message } => Error::parse(position + offset, message),
        other => other,
    }
}
