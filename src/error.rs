// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

use crate::types::LayoutMode;

/// Schema definition errors. These are programming errors in the schema and
/// are reported once, when the layout is built.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Duplicate field name: {0}")]
    DuplicateField(SmolStr),
    #[error("Field {field}: alignment {align} is not a nonzero power of two")]
    InvalidAlignment { field: SmolStr, align: usize },
    #[error("Field {field}: size {size} is not a multiple of alignment {align}")]
    MalformedField {
        field: SmolStr,
        size: usize,
        align: usize,
    },
    #[error("Field {field}: unsupported kind {kind}")]
    UnsupportedKind { field: SmolStr, kind: String },
    #[error("Layout mode {0:?} forbids the reordering and padding resizable records need")]
    IncompatibleLayout(LayoutMode),
    #[error("schema exceeds the 32-field limit")]
    TooManyFields,
    #[error("Schema JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Schema IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by layout queries and record operations at runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Out of memory: failed to allocate {size} bytes aligned to {align}")]
    OutOfMemory { size: usize, align: usize },
    #[error("Record size overflows usize")]
    SizeOverflow,
    #[error("Field not found: {0}")]
    FieldNotFound(SmolStr),
    #[error("Field {0} is an array field")]
    NotFixed(SmolStr),
    #[error("Field {0} is a fixed-size field")]
    NotVariable(SmolStr),
    #[error("Type mismatch on {field}: field holds {expected_size}-byte items aligned to {field_align}, got {actual_size} bytes aligned to {actual_align}")]
    TypeMismatch {
        field: SmolStr,
        expected_size: usize,
        field_align: usize,
        actual_size: usize,
        actual_align: usize,
    },
    #[error("Length mismatch on {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        field: SmolStr,
        expected: usize,
        actual: usize,
    },
    #[error("Lengths were built for a different layout")]
    LayoutMismatch,
}
