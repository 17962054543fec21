use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

// ─── Limits ─────────────────────────────────────────────────────────────────

/// Maximum number of fields in one schema. Field tables live on the stack.
pub const MAX_FIELDS: usize = 32;

/// Round `value` up to the next multiple of `align` (a power of two).
/// Returns `None` on overflow.
#[inline]
pub const fn align_forward(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}

// ─── Layout Mode ────────────────────────────────────────────────────────────

/// How a schema's declared field order maps to the memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Stable sort by descending alignment. Never inserts padding.
    #[default]
    Auto,
    /// Keep declaration order; pad field starts where needed.
    Declared,
    /// No padding, no reordering. Rejected.
    Packed,
    /// C-compatible fixed layout. Rejected.
    Extern,
}

// ─── Field Descriptor ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single value of `size` bytes.
    Fixed { size: usize },
    /// A runtime-sized array of `elem_size`-byte elements.
    Variable { elem_size: usize },
}

/// Static metadata for one field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: SmolStr,
    /// Field alignment; the element alignment for array fields.
    pub align: usize,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn fixed(name: impl Into<SmolStr>, size: usize, align: usize) -> Self {
        Self {
            name: name.into(),
            align,
            kind: FieldKind::Fixed { size },
        }
    }

    pub fn variable(name: impl Into<SmolStr>, elem_size: usize, elem_align: usize) -> Self {
        Self {
            name: name.into(),
            align: elem_align,
            kind: FieldKind::Variable { elem_size },
        }
    }

    /// A fixed field holding one `T`.
    pub fn of<T>(name: impl Into<SmolStr>) -> Self {
        Self::fixed(name, size_of::<T>(), align_of::<T>())
    }

    /// An array field of `T` elements.
    pub fn array_of<T>(name: impl Into<SmolStr>) -> Self {
        Self::variable(name, size_of::<T>(), align_of::<T>())
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, FieldKind::Variable { .. })
    }

    /// Byte size for a fixed field, element size for an array field.
    #[inline]
    pub fn unit_size(&self) -> usize {
        match self.kind {
            FieldKind::Fixed { size } => size,
            FieldKind::Variable { elem_size } => elem_size,
        }
    }
}

// ─── FieldSpan ──────────────────────────────────────────────────────────────

/// Byte region of one field inside a record buffer, for a given `Lengths`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSpan {
    pub offset: usize,
    pub size: usize,
}

impl FieldSpan {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}
