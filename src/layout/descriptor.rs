use arrayvec::ArrayVec;
use smol_str::SmolStr;
use tracing::debug;
use xxhash_rust::xxh64::{Xxh64, xxh64};

use crate::error::{LayoutError, RecordError};
use crate::types::*;

/// One entry of the name lookup index. Sorted by `name_hash`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexEntry {
    pub name_hash: u64,
    pub pos: usize,
}

// ─── RecordLayout ───────────────────────────────────────────────────────────

/// Immutable field ordering and alignment for one record schema.
///
/// Built once per record type and shared by every record of that type.
/// Offsets are not stored: they depend on the array lengths of each record
/// and are recomputed on demand (see `query_op`).
#[derive(Debug, Clone)]
pub struct RecordLayout {
    /// Fields in memory order.
    pub(crate) fields: ArrayVec<FieldDescriptor, MAX_FIELDS>,
    pub(crate) index: ArrayVec<IndexEntry, MAX_FIELDS>,
    pub(crate) mode: LayoutMode,
    pub(crate) overall_align: usize,
    pub(crate) fingerprint: u64,
}

impl RecordLayout {
    // ════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════

    /// Build a layout from fields in declaration order.
    ///
    /// `Auto` stably sorts by descending alignment, `Declared` keeps the
    /// given order. `Packed` and `Extern` are rejected.
    pub fn new<I>(mode: LayoutMode, fields: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        if matches!(mode, LayoutMode::Packed | LayoutMode::Extern) {
            return Err(LayoutError::IncompatibleLayout(mode));
        }

        let mut ordered: ArrayVec<FieldDescriptor, MAX_FIELDS> = ArrayVec::new();
        for field in fields {
            validate_field(&field)?;
            if ordered.iter().any(|f| f.name == field.name) {
                return Err(LayoutError::DuplicateField(field.name));
            }
            ordered
                .try_push(field)
                .map_err(|_| LayoutError::TooManyFields)?;
        }

        if mode == LayoutMode::Auto {
            // slice::sort_by is stable: equal alignments keep declaration order
            ordered.sort_by(|a, b| b.align.cmp(&a.align));
        }

        let overall_align = ordered.iter().map(|f| f.align).max().unwrap_or(1);

        let mut index: ArrayVec<IndexEntry, MAX_FIELDS> = ordered
            .iter()
            .enumerate()
            .map(|(pos, f)| IndexEntry {
                name_hash: xxh64(f.name.as_bytes(), 0),
                pos,
            })
            .collect();
        index.sort_unstable_by_key(|e| e.name_hash);

        let fingerprint = fingerprint_of(&ordered);

        debug!(
            fields = ordered.len(),
            overall_align,
            ?mode,
            "built record layout"
        );

        Ok(Self {
            fields: ordered,
            index,
            mode,
            overall_align,
            fingerprint,
        })
    }

    /// `LayoutMode::Auto` shorthand.
    pub fn auto<I>(fields: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        Self::new(LayoutMode::Auto, fields)
    }

    /// `LayoutMode::Declared` shorthand.
    pub fn declared<I>(fields: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        Self::new(LayoutMode::Declared, fields)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Metadata
    // ════════════════════════════════════════════════════════════════════════

    /// Fields in memory order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Largest field alignment (1 for an empty schema). Record buffers are
    /// aligned to it and sized in multiples of it.
    #[inline]
    pub fn overall_align(&self) -> usize {
        self.overall_align
    }

    /// Hash of the ordered field list. Two layouts with equal fingerprints
    /// place every field identically.
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn field(&self, name: &str) -> Result<&FieldDescriptor, RecordError> {
        let pos = self.find_field(name)?;
        Ok(&self.fields[pos])
    }

    /// Position of `name` in memory order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.find_field(name).ok()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Lookup
    // ════════════════════════════════════════════════════════════════════════

    /// Find a field by name. Returns its position in memory order.
    pub(crate) fn find_field(&self, name: &str) -> Result<usize, RecordError> {
        let hash = xxh64(name.as_bytes(), 0);
        let n = self.index.len();

        let start = if n <= 4 {
            0
        } else {
            self.index.partition_point(|e| e.name_hash < hash)
        };

        for entry in &self.index[start..] {
            if n > 4 && entry.name_hash != hash {
                break;
            }
            if entry.name_hash == hash && self.fields[entry.pos].name == name {
                return Ok(entry.pos);
            }
        }
        Err(RecordError::FieldNotFound(SmolStr::new(name)))
    }
}

fn validate_field(field: &FieldDescriptor) -> Result<(), LayoutError> {
    if !field.align.is_power_of_two() {
        return Err(LayoutError::InvalidAlignment {
            field: field.name.clone(),
            align: field.align,
        });
    }
    if let FieldKind::Variable { elem_size: 0 } = field.kind {
        return Err(LayoutError::UnsupportedKind {
            field: field.name.clone(),
            kind: "array of zero-sized elements".into(),
        });
    }
    let size = field.unit_size();
    if size % field.align != 0 {
        return Err(LayoutError::MalformedField {
            field: field.name.clone(),
            size,
            align: field.align,
        });
    }
    Ok(())
}

fn fingerprint_of(fields: &[FieldDescriptor]) -> u64 {
    let mut hasher = Xxh64::new(0);
    for f in fields {
        hasher.update(f.name.as_bytes());
        hasher.update(&[0, f.is_variable() as u8]);
        hasher.update(&(f.unit_size() as u64).to_le_bytes());
        hasher.update(&(f.align as u64).to_le_bytes());
    }
    hasher.digest()
}
