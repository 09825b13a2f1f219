//! ClauseWise Report
//!
//! Saved analysis tables and the views built on them.
//!
//! Provides:
//! - CSV persistence with collision-free, timestamped file names
//! - Listing and reloading of saved analyses
//! - Risk-level counts and row filtering
//! - CSV export of filtered rows

pub mod persistence;
pub mod summary;

pub use persistence::{
    export_rows, list_saved, read_table, save_table, write_table, SavedReport, CSV_HEADER,
};
pub use summary::{truncate_text, RiskFilter, RiskSummary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::persistence::{export_rows, list_saved, read_table, save_table, SavedReport};
    pub use crate::summary::{RiskFilter, RiskSummary};
}
