//! Dataset transformers
//!
//! Each transformer applies one structural edit. [`Cleaner`] chains the
//! fixed cleaning sequence used before a table is written back.

mod cleaner;
mod column_dropper;
mod column_renamer;
mod duplicate_dropper;
mod index_resetter;

pub use cleaner::Cleaner;
pub use column_dropper::ColumnDropper;
pub use column_renamer::ColumnRenamer;
pub use duplicate_dropper::DuplicateDropper;
pub use index_resetter::IndexResetter;
