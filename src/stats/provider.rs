use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::incident::{Incident, IncidentStore, IncidentType};
use crate::interpreter::Clock;

/// Figures the assistant can answer questions about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStats {
    /// Incidents dated at or after local midnight.
    pub today: usize,
    /// `None` when no incidents exist.
    pub most_common_type: Option<IncidentType>,
}

impl IncidentStats {
    /// Computes stats over `incidents`, counting "today" from the clock's midnight.
    pub fn compute(incidents: &[Incident], clock: &dyn Clock) -> Self {
        let now = clock.now();
        let midnight = clock.day_start(now).with_timezone(&Utc);
        let today = incidents.iter().filter(|i| i.date >= midnight).count();

        let mut best: Option<(IncidentType, usize)> = None;
        for incident_type in IncidentType::ALL {
            let count = incidents
                .iter()
                .filter(|i| i.incident_type == incident_type)
                .count();
            // Strictly greater keeps the earliest type on ties.
            if count > 0 && best.is_none_or(|(_, top)| count > top) {
                best = Some((incident_type, count));
            }
        }

        Self {
            today,
            most_common_type: best.map(|(incident_type, _)| incident_type),
        }
    }
}

/// Source of incident statistics. Lookups may be slow and may fail.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn incident_stats(&self) -> anyhow::Result<IncidentStats>;
}

/// Why a statistics question could not be answered.
#[derive(Debug, Error)]
pub enum StatsError {
    /// No provider was supplied to this session.
    #[error("statistics are not available")]
    Unavailable,
    /// The provider was asked and failed.
    #[error("statistics lookup failed")]
    LookupFailed(#[source] anyhow::Error),
}

/// Queries `provider`, folding a missing provider and a failed lookup into [`StatsError`].
pub async fn lookup(provider: Option<&dyn StatsProvider>) -> Result<IncidentStats, StatsError> {
    let provider = provider.ok_or(StatsError::Unavailable)?;
    provider
        .incident_stats()
        .await
        .map_err(StatsError::LookupFailed)
}

/// Statistics computed from the incident store on a blocking thread.
pub struct StoreStats {
    store: IncidentStore,
    clock: Arc<dyn Clock>,
}

impl StoreStats {
    pub fn new(store: IncidentStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl StatsProvider for StoreStats {
    async fn incident_stats(&self) -> anyhow::Result<IncidentStats> {
        let store = self.store.clone();
        let incidents = tokio::task::spawn_blocking(move || store.list())
            .await
            .context("Statistics task panicked")??;

        let stats = IncidentStats::compute(&incidents, self.clock.as_ref());
        tracing::debug!(today = stats.today, "computed incident stats");
        Ok(stats)
    }
}
