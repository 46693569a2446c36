pub mod filter;
pub mod stats;
pub mod summary;

pub use filter::{visible_results, FilterState};
pub use stats::StatsHelper;
pub use summary::{
    radar_axes, summarize, DashboardSummary, DistributionSlice, RadarAxis, ScorePoint,
};
