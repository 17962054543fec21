//! JSON schema definitions for record layouts.
//!
//! ```json
//! {
//!   "mode": "auto",
//!   "fields": [
//!     { "name": "id",      "type": "u64" },
//!     { "name": "samples", "array": "f32" },
//!     { "name": "blob",    "size": 16, "align": 8 },
//!     { "name": "pixels",  "size": 4,  "align": 4, "variable": true }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::LayoutError;
use crate::layout::RecordLayout;
use crate::types::{FieldDescriptor, FieldKind, LayoutMode};

// ─── SchemaConfig ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub mode: LayoutMode,
    pub fields: Vec<FieldEntry>,
}

/// One field entry. Exactly one of `type`, `array` or `size` must be given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: SmolStr,
    /// Primitive type name of a fixed field.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SmolStr>,
    /// Primitive element type name of an array field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<SmolStr>,
    /// Raw size; element size when `variable` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<usize>,
    #[serde(default)]
    pub variable: bool,
}

/// Size and alignment of a primitive type name.
fn primitive(name: &str) -> Option<(usize, usize)> {
    Some(match name {
        "u8" => (size_of::<u8>(), align_of::<u8>()),
        "i8" => (size_of::<i8>(), align_of::<i8>()),
        "u16" => (size_of::<u16>(), align_of::<u16>()),
        "i16" => (size_of::<i16>(), align_of::<i16>()),
        "u32" => (size_of::<u32>(), align_of::<u32>()),
        "i32" => (size_of::<i32>(), align_of::<i32>()),
        "f32" => (size_of::<f32>(), align_of::<f32>()),
        "u64" => (size_of::<u64>(), align_of::<u64>()),
        "i64" => (size_of::<i64>(), align_of::<i64>()),
        "f64" => (size_of::<f64>(), align_of::<f64>()),
        "u128" => (size_of::<u128>(), align_of::<u128>()),
        "i128" => (size_of::<i128>(), align_of::<i128>()),
        "bool" => (size_of::<bool>(), align_of::<bool>()),
        _ => return None,
    })
}

impl FieldEntry {
    fn unsupported(&self, kind: impl Into<String>) -> LayoutError {
        LayoutError::UnsupportedKind {
            field: self.name.clone(),
            kind: kind.into(),
        }
    }

    /// Resolve to a field descriptor.
    pub fn to_descriptor(&self) -> Result<FieldDescriptor, LayoutError> {
        match (&self.ty, &self.array, self.size) {
            (Some(ty), None, None) => {
                let (size, align) = primitive(ty).ok_or_else(|| self.unsupported(ty.as_str()))?;
                Ok(FieldDescriptor::fixed(self.name.clone(), size, align))
            }
            (None, Some(elem), None) => {
                // bool arrays would let arbitrary bytes masquerade as bool
                if elem == "bool" {
                    return Err(self.unsupported("array of bool"));
                }
                let (size, align) =
                    primitive(elem).ok_or_else(|| self.unsupported(format!("array of {elem}")))?;
                Ok(FieldDescriptor::variable(self.name.clone(), size, align))
            }
            (None, None, Some(size)) => {
                let align = self.align.unwrap_or(1);
                Ok(if self.variable {
                    FieldDescriptor::variable(self.name.clone(), size, align)
                } else {
                    FieldDescriptor::fixed(self.name.clone(), size, align)
                })
            }
            (None, None, None) => Err(self.unsupported("missing type, array or size")),
            _ => Err(self.unsupported("more than one of type, array, size")),
        }
    }
}

impl From<&FieldDescriptor> for FieldEntry {
    fn from(field: &FieldDescriptor) -> Self {
        let (size, variable) = match field.kind {
            FieldKind::Fixed { size } => (size, false),
            FieldKind::Variable { elem_size } => (elem_size, true),
        };
        FieldEntry {
            name: field.name.clone(),
            size: Some(size),
            align: Some(field.align),
            variable,
            ..Default::default()
        }
    }
}

impl SchemaConfig {
    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate the schema and build its layout.
    pub fn build(&self) -> Result<RecordLayout, LayoutError> {
        let fields = self
            .fields
            .iter()
            .map(FieldEntry::to_descriptor)
            .collect::<Result<Vec<_>, _>>()?;
        RecordLayout::new(self.mode, fields)
    }
}

impl RecordLayout {
    /// Describe this layout as a schema config (raw sizes, memory order,
    /// declared mode), so it can be written out and rebuilt identically.
    pub fn to_schema(&self) -> SchemaConfig {
        SchemaConfig {
            mode: LayoutMode::Declared,
            fields: self.fields().iter().map(FieldEntry::from).collect(),
        }
    }
}
