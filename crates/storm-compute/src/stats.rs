//! Load monitoring.

use crate::client::ComputeClient;
use crate::operations::Operation;
use crate::servers::server_params;
use crate::Result;
use serde_json::Value;
use storm_core::{Params, UniqId};

impl ComputeClient {
    /// Current load statistics (CPU, memory, disk, uptime) of a server.
    pub async fn get_stats(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::GetStats, server_params(uniq_id)).await
    }

    /// Rendered load graph of a server. `options` may carry `duration`,
    /// `width`, `height` and `compact`.
    pub async fn get_stats_graph(&self, uniq_id: &UniqId, options: Params) -> Result<Value> {
        self.call(Operation::GetStatsGraph, options.with("uniq_id", uniq_id))
            .await
    }
}
