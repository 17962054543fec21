//! Heap records that pack fixed fields and runtime-sized arrays into one
//! aligned allocation.
//!
//! ```ignore
//! use resizable_record::{FieldDescriptor, RecordLayout, ResizableRecord};
//!
//! let layout = RecordLayout::auto([
//!     FieldDescriptor::of::<u32>("head"),
//!     FieldDescriptor::array_of::<u32>("first"),
//!     FieldDescriptor::array_of::<u8>("second"),
//! ])?;
//!
//! let mut rec = ResizableRecord::new(&layout, layout.lengths_from([("first", 2), ("second", 4)])?)?;
//! rec.set("head", 0xAAu32)?;
//! rec.set_slice::<u32>("first", &[0xC0FFEE, 0xBEEF])?;
//!
//! // Lengths are a complete replacement: start from the current ones.
//! let mut lengths = rec.lengths().clone();
//! lengths.set(&layout, "first", 3)?;
//! rec.resize(lengths)?;
//! assert_eq!(&rec.get_slice::<u32>("first")?[..2], &[0xC0FFEE, 0xBEEF]);
//! ```

pub mod allocator;
pub mod error;
pub mod layout;
pub mod record;
pub mod schema;
pub mod types;

pub use allocator::{AllocError, BudgetAllocator, Global, RecordAllocator};
pub use error::{LayoutError, RecordError};
pub use layout::{Lengths, RecordLayout};
pub use record::ResizableRecord;
pub use schema::{FieldEntry, SchemaConfig};
pub use types::{FieldDescriptor, FieldKind, FieldSpan, LayoutMode, MAX_FIELDS};
