use arrayvec::ArrayVec;

use super::{Lengths, RecordLayout};
use crate::error::RecordError;
use crate::types::*;

impl RecordLayout {
    // ════════════════════════════════════════════════════════════════════════
    // Per-field queries
    // ════════════════════════════════════════════════════════════════════════

    /// Byte size of field `pos` given its element count.
    #[inline]
    fn size_at(&self, pos: usize, count: usize) -> Result<usize, RecordError> {
        match self.fields[pos].kind {
            FieldKind::Fixed { size } => Ok(size),
            FieldKind::Variable { elem_size } => {
                elem_size.checked_mul(count).ok_or(RecordError::SizeOverflow)
            }
        }
    }

    /// Walk fields in memory order up to and including `last`, returning the
    /// span of `last`. Linear in `last`.
    pub(crate) fn span_at(&self, lengths: &Lengths, last: usize) -> Result<FieldSpan, RecordError> {
        let mut end = 0usize;
        for pos in 0..=last {
            let size = self.size_at(pos, lengths.counts[pos])?;
            let offset = align_forward(end, self.fields[pos].align).ok_or(RecordError::SizeOverflow)?;
            if pos == last {
                return Ok(FieldSpan { offset, size });
            }
            end = offset.checked_add(size).ok_or(RecordError::SizeOverflow)?;
        }
        unreachable!("span_at called with last >= field_count")
    }

    /// Offset and size of `name`.
    pub fn span_of(&self, lengths: &Lengths, name: &str) -> Result<FieldSpan, RecordError> {
        self.check(lengths)?;
        let pos = self.find_field(name)?;
        self.span_at(lengths, pos)
    }

    /// Byte offset of `name`: the end of the preceding field, aligned to the
    /// field's alignment. Under `LayoutMode::Auto` this is exactly the sum
    /// of the preceding sizes.
    pub fn offset_of(&self, lengths: &Lengths, name: &str) -> Result<usize, RecordError> {
        self.span_of(lengths, name).map(|s| s.offset)
    }

    /// Fixed size for fixed fields, `elem_size * count` for array fields.
    pub fn size_of(&self, lengths: &Lengths, name: &str) -> Result<usize, RecordError> {
        self.check(lengths)?;
        let pos = self.find_field(name)?;
        self.size_at(pos, lengths.counts[pos])
    }

    // ════════════════════════════════════════════════════════════════════════
    // Whole-record queries
    // ════════════════════════════════════════════════════════════════════════

    /// Spans of all fields in memory order, computed in one pass.
    ///
    /// Use this instead of repeated `span_of` calls when many offsets are
    /// needed for the same lengths.
    pub fn spans(&self, lengths: &Lengths) -> Result<ArrayVec<FieldSpan, MAX_FIELDS>, RecordError> {
        self.check(lengths)?;
        let mut spans = ArrayVec::new();
        let mut end = 0usize;
        for (pos, field) in self.fields.iter().enumerate() {
            let size = self.size_at(pos, lengths.counts[pos])?;
            let offset = align_forward(end, field.align).ok_or(RecordError::SizeOverflow)?;
            end = offset.checked_add(size).ok_or(RecordError::SizeOverflow)?;
            spans.push(FieldSpan { offset, size });
        }
        Ok(spans)
    }

    /// Total buffer size: end of the last field rounded up to the overall
    /// alignment.
    pub fn calc_size(&self, lengths: &Lengths) -> Result<usize, RecordError> {
        self.check(lengths)?;
        let end = match self.fields.len() {
            0 => 0,
            n => {
                let last = self.span_at(lengths, n - 1)?;
                last.offset
                    .checked_add(last.size)
                    .ok_or(RecordError::SizeOverflow)?
            }
        };
        align_forward(end, self.overall_align).ok_or(RecordError::SizeOverflow)
    }
}
