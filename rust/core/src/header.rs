// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP header section (FILE_DESCRIPTION, FILE_NAME, FILE_SCHEMA)

use crate::decoded::AttributeValue;
use crate::error::{Error, Result};
use crate::parser::{find_instance_end, is_blank, parse_record};
use std::fmt;

/// IFC schema family declared in FILE_SCHEMA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    Ifc2x3,
    Ifc4,
    Ifc4x3,
    #[default]
    Unknown,
}

impl SchemaVersion {
    /// Classify a schema identifier such as `IFC4`, `IFC2X3` or `IFC4X3_ADD2`
    pub fn from_identifier(identifier: &str) -> Self {
        let upper = identifier.trim().to_ascii_uppercase();
        if upper.starts_with("IFC4X3") {
            SchemaVersion::Ifc4x3
        } else if upper.starts_with("IFC4") {
            SchemaVersion::Ifc4
        } else if upper.starts_with("IFC2X3") {
            SchemaVersion::Ifc2x3
        } else {
            SchemaVersion::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Ifc2x3 => "IFC2X3",
            SchemaVersion::Ifc4 => "IFC4",
            SchemaVersion::Ifc4x3 => "IFC4X3",
            SchemaVersion::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed STEP header
#[derive(Debug, Clone, Default)]
pub struct StepHeader {
    /// FILE_DESCRIPTION.description
    pub description: Vec<String>,
    /// FILE_NAME.name
    pub file_name: Option<String>,
    /// FILE_NAME.time_stamp
    pub time_stamp: Option<String>,
    /// FILE_NAME.originating_system
    pub originating_system: Option<String>,
    /// FILE_SCHEMA.schema_identifiers
    pub schema_identifiers: Vec<String>,
}

impl StepHeader {
    /// Schema family of the first declared identifier
    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_identifiers
            .first()
            .map(|id| SchemaVersion::from_identifier(id))
            .unwrap_or_default()
    }
}

fn string_list(value: Option<&AttributeValue>) -> Vec<String> {
    value
        .and_then(|v| v.as_list())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_string())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty_string(value: Option<&AttributeValue>) -> Option<String> {
    value
        .and_then(|v| v.as_string())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse the records between `HEADER;` and `ENDSEC;`
///
/// `base` is the byte offset of `section` in the file, used for error positions.
/// Unknown records are ignored.
pub fn parse_header(section: &str, base: usize) -> Result<StepHeader> {
    let bytes = section.as_bytes();
    let mut header = StepHeader::default();
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &section[pos..];
        if is_blank(rest) {
            break;
        }

        let end = find_instance_end(bytes, pos)
            .ok_or_else(|| Error::parse(base + pos, "unterminated header record"))?;
        let (name, tokens) = parse_record(&section[pos..end]).map_err(|e| match e {
            Error::Parse { message, .. } => Error::parse(base + pos, message),
            other => other,
        })?;
        let args: Vec<AttributeValue> = tokens.iter().map(AttributeValue::from_token).collect();

        match name {
            "FILE_DESCRIPTION" => {
                header.description = string_list(args.first());
            }
            "FILE_NAME" => {
                header.file_name = non_empty_string(args.first());
                header.time_stamp = non_empty_string(args.get(1));
                header.originating_system = non_empty_string(args.get(5));
            }
            "FILE_SCHEMA" => {
                header.schema_identifiers = string_list(args.first());
            }
            _ => {}
        }

        pos = end;
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let section = r#"
FILE_DESCRIPTION(('ViewDefinition [ReferenceView_V1.2]'),'2;1');
FILE_NAME('tower.ifc','2024-03-01T10:00:00',('Jo'),('ACME'),'pre','Modeller 9.1','');
FILE_SCHEMA(('IFC4'));
"#;
        let header = parse_header(section, 0).unwrap();
        assert_eq!(header.description, vec!["ViewDefinition [ReferenceView_V1.2]"]);
        assert_eq!(header.file_name.as_deref(), Some("tower.ifc"));
        assert_eq!(header.time_stamp.as_deref(), Some("2024-03-01T10:00:00"));
        assert_eq!(header.originating_system.as_deref(), Some("Modeller 9.1"));
        assert_eq!(header.schema_version(), SchemaVersion::Ifc4);
    }

    #[test]
    fn test_schema_identifiers() {
        assert_eq!(SchemaVersion::from_identifier("IFC2X3"), SchemaVersion::Ifc2x3);
        assert_eq!(SchemaVersion::from_identifier("ifc4"), SchemaVersion::Ifc4);
        assert_eq!(SchemaVersion::from_identifier("IFC4X3_ADD2"), SchemaVersion::Ifc4x3);
        assert_eq!(SchemaVersion::from_identifier("AP214"), SchemaVersion::Unknown);
    }

    #[test]
    fn test_malformed_header_record() {
        let err = parse_header("FILE_SCHEMA(('IFC4')", 10).unwrap_err();
        assert!(matches!(err, Error::Parse { position: 10, .. }));
    }
}
