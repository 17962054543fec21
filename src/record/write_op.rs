use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::ResizableRecord;
use super::read_op::type_mismatch;
use crate::allocator::RecordAllocator;
use crate::error::RecordError;

impl<A: RecordAllocator> ResizableRecord<'_, A> {
    // ════════════════════════════════════════════════════════════════════════
    // Mutable views: in place, zero allocation
    // ════════════════════════════════════════════════════════════════════════

    pub fn field_bytes_mut(&mut self, name: &str) -> Result<&mut [u8], RecordError> {
        let (_, span) = self.resolve(name)?;
        Ok(&mut self.as_bytes_mut()[span.range()])
    }

    /// Mutable view of a fixed field as `T`.
    pub fn get_mut<T>(&mut self, name: &str) -> Result<&mut T, RecordError>
    where
        T: FromBytes + IntoBytes + KnownLayout,
    {
        let (field, span) = self.resolve_fixed::<T>(name)?;
        T::mut_from_bytes(&mut self.as_bytes_mut()[span.range()]).map_err(|_| type_mismatch::<T>(field))
    }

    /// Mutable view of an array field as `[T]`.
    pub fn get_slice_mut<T>(&mut self, name: &str) -> Result<&mut [T], RecordError>
    where
        T: FromBytes + IntoBytes,
    {
        let (field, span) = self.resolve_array::<T>(name)?;
        <[T]>::mut_from_bytes(&mut self.as_bytes_mut()[span.range()])
            .map_err(|_| type_mismatch::<T>(field))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Typed setters
    // ════════════════════════════════════════════════════════════════════════

    /// Overwrite a fixed field.
    #[inline]
    pub fn set<T>(&mut self, name: &str, value: T) -> Result<(), RecordError>
    where
        T: FromBytes + IntoBytes + KnownLayout,
    {
        *self.get_mut::<T>(name)? = value;
        Ok(())
    }

    /// Overwrite every element of an array field. `values.len()` must equal
    /// the field's current length; use `resize` first to change it.
    pub fn set_slice<T>(&mut self, name: &str, values: &[T]) -> Result<(), RecordError>
    where
        T: IntoBytes + Immutable,
    {
        let (field, span) = self.resolve_array::<T>(name)?;
        let src = values.as_bytes();
        if src.len() != span.size {
            return Err(RecordError::LengthMismatch {
                field: field.name.clone(),
                expected: span.size / field.unit_size(),
                actual: values.len(),
            });
        }
        self.as_bytes_mut()[span.range()].copy_from_slice(src);
        Ok(())
    }
}
