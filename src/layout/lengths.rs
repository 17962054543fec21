use arrayvec::ArrayVec;
use smol_str::SmolStr;

use super::RecordLayout;
use crate::error::RecordError;
use crate::types::MAX_FIELDS;

// ─── Lengths ────────────────────────────────────────────────────────────────

/// Element count of every array field of one record.
///
/// A `Lengths` is always a complete mapping: any array field that was not
/// set explicitly has length 0. Passing a `Lengths` that only names the
/// fields you want to change to `ResizableRecord::resize` truncates every
/// other array to zero. Start from `record.lengths().clone()` to change a
/// single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lengths {
    /// Indexed by field position in memory order. Always 0 for fixed fields.
    pub(crate) counts: ArrayVec<usize, MAX_FIELDS>,
    pub(crate) fingerprint: u64,
}

impl Lengths {
    /// Set the element count of array field `name`.
    pub fn set(
        &mut self,
        layout: &RecordLayout,
        name: &str,
        count: usize,
    ) -> Result<&mut Self, RecordError> {
        layout.check(self)?;
        let pos = layout.find_field(name)?;
        if !layout.fields[pos].is_variable() {
            return Err(RecordError::NotVariable(SmolStr::new(name)));
        }
        self.counts[pos] = count;
        Ok(self)
    }

    /// Element count of array field `name`.
    pub fn get(&self, layout: &RecordLayout, name: &str) -> Result<usize, RecordError> {
        layout.check(self)?;
        let pos = layout.find_field(name)?;
        if !layout.fields[pos].is_variable() {
            return Err(RecordError::NotVariable(SmolStr::new(name)));
        }
        Ok(self.counts[pos])
    }

    /// Counts in memory order, 0 for fixed fields.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.counts
    }
}

impl RecordLayout {
    /// All array fields at length 0.
    pub fn lengths(&self) -> Lengths {
        Lengths {
            counts: self.fields.iter().map(|_| 0).collect(),
            fingerprint: self.fingerprint,
        }
    }

    /// Build a complete `Lengths` from `(name, count)` pairs. Array fields
    /// not listed get length 0.
    pub fn lengths_from<'a, I>(&self, pairs: I) -> Result<Lengths, RecordError>
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut lengths = self.lengths();
        for (name, count) in pairs {
            lengths.set(self, name, count)?;
        }
        Ok(lengths)
    }

    #[inline]
    pub(crate) fn check(&self, lengths: &Lengths) -> Result<(), RecordError> {
        if lengths.fingerprint != self.fingerprint || lengths.counts.len() != self.fields.len() {
            return Err(RecordError::LayoutMismatch);
        }
        Ok(())
    }
}
