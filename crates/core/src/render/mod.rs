pub mod citation;
pub mod format;
pub mod picks;
pub mod report;

pub use citation::{extract_citation, Citation};
pub use picks::{render_recommendations, PicksPanel};
pub use report::{render_report, Report};
