use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::MySqlPool;

use crate::db::{BranchZones, fetch_branch_zones};

/// Per-branch geofence zones, shared by every worker through app data.
/// Entries expire after the configured TTL so edits to branches and hotspots
/// show up without a restart.
#[derive(Clone)]
pub struct ZoneCache {
    zones: Cache<u64, Arc<BranchZones>>,
}

impl ZoneCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            zones: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn zones_for(
        &self,
        pool: &MySqlPool,
        branch_id: u64,
    ) -> Result<Arc<BranchZones>, sqlx::Error> {
        if let Some(zones) = self.zones.get(&branch_id).await {
            return Ok(zones);
        }

        let zones = Arc::new(fetch_branch_zones(pool, branch_id).await?);
        self.zones.insert(branch_id, zones.clone()).await;
        tracing::debug!(
            branch_id,
            count = zones.zones.len(),
            skipped = zones.skipped,
            "zone cache filled"
        );
        Ok(zones)
    }

    pub async fn invalidate(&self, branch_id: u64) {
        self.zones.invalidate(&branch_id).await;
    }
}
