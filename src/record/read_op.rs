use smol_str::SmolStr;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use super::ResizableRecord;
use crate::allocator::RecordAllocator;
use crate::error::RecordError;
use crate::types::{FieldDescriptor, FieldSpan};

/// `T` can view a field (or one element of an array field) when its size
/// matches exactly and its alignment does not exceed the field's.
#[inline]
pub(crate) fn check_type<T>(field: &FieldDescriptor) -> Result<(), RecordError> {
    if size_of::<T>() != field.unit_size() || align_of::<T>() > field.align {
        return Err(type_mismatch::<T>(field));
    }
    Ok(())
}

#[cold]
pub(crate) fn type_mismatch<T>(field: &FieldDescriptor) -> RecordError {
    RecordError::TypeMismatch {
        field: field.name.clone(),
        expected_size: field.unit_size(),
        field_align: field.align,
        actual_size: size_of::<T>(),
        actual_align: align_of::<T>(),
    }
}

impl<'l, A: RecordAllocator> ResizableRecord<'l, A> {
    /// Look up `name` and compute its span for the current lengths.
    #[inline]
    pub(crate) fn resolve(&self, name: &str) -> Result<(&'l FieldDescriptor, FieldSpan), RecordError> {
        let layout = self.layout;
        let pos = layout.find_field(name)?;
        let span = layout.span_at(&self.lengths, pos)?;
        Ok((&layout.fields[pos], span))
    }

    #[inline]
    pub(crate) fn resolve_fixed<T>(&self, name: &str) -> Result<(&'l FieldDescriptor, FieldSpan), RecordError> {
        let (field, span) = self.resolve(name)?;
        if field.is_variable() {
            return Err(RecordError::NotFixed(SmolStr::new(name)));
        }
        check_type::<T>(field)?;
        Ok((field, span))
    }

    #[inline]
    pub(crate) fn resolve_array<T>(&self, name: &str) -> Result<(&'l FieldDescriptor, FieldSpan), RecordError> {
        let (field, span) = self.resolve(name)?;
        if !field.is_variable() {
            return Err(RecordError::NotVariable(SmolStr::new(name)));
        }
        check_type::<T>(field)?;
        Ok((field, span))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Read access (zero-copy views into the buffer)
    // ════════════════════════════════════════════════════════════════════════

    /// Raw bytes of any field.
    pub fn field_bytes(&self, name: &str) -> Result<&[u8], RecordError> {
        let (_, span) = self.resolve(name)?;
        Ok(&self.as_bytes()[span.range()])
    }

    /// View a fixed field as `T`.
    pub fn get<T>(&self, name: &str) -> Result<&T, RecordError>
    where
        T: FromBytes + Immutable + KnownLayout,
    {
        let (field, span) = self.resolve_fixed::<T>(name)?;
        T::ref_from_bytes(&self.as_bytes()[span.range()]).map_err(|_| type_mismatch::<T>(field))
    }

    /// View an array field as `[T]`.
    pub fn get_slice<T>(&self, name: &str) -> Result<&[T], RecordError>
    where
        T: FromBytes + Immutable,
    {
        let (field, span) = self.resolve_array::<T>(name)?;
        <[T]>::ref_from_bytes(&self.as_bytes()[span.range()]).map_err(|_| type_mismatch::<T>(field))
    }
}
