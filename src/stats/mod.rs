//! Incident statistics: the async provider the assistant queries, and the
//! dashboard summary printed by `minesafe stats`.

mod provider;
mod summary;

pub use provider::{IncidentStats, StatsError, StatsProvider, StoreStats, lookup};
pub use summary::DashboardSummary;
