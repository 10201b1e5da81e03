//! Dataset indexing for Statchat.
//!
//! Scans a storage directory of uploaded tabular files and builds a catalog
//! of filename -> column names, detecting the field delimiter and deciding
//! per file whether the first line is a header row.

pub mod scan;

pub use scan::{DatasetCatalog, DatasetIndex};
