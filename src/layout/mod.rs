//! Layout descriptor: field order, alignment and offset arithmetic for a
//! record schema whose array fields change length at runtime.
//!
//! ```text
//!  ┌───────────────┬──────────────────────┬───────────┬─────────────┬─────┐
//!  │ fixed (align8)│ array<u32> × n       │ fixed (4) │ array<u8>×m │ pad │
//!  └───────────────┴──────────────────────┴───────────┴─────────────┴─────┘
//!   offset 0        Σ sizes before          ...                       up to
//!                                                                 overall_align
//! ```

mod descriptor;
mod lengths;
mod query_op;

pub use descriptor::RecordLayout;
pub use lengths::Lengths;

#[cfg(test)]
mod tests;
