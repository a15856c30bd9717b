//! Firewall and saved ruleset operations.

use crate::client::ComputeClient;
use crate::models::{ListParams, Page};
use crate::operations::Operation;
use crate::servers::server_params;
use crate::Result;
use serde_json::Value;
use storm_core::{Params, UniqId};

impl ComputeClient {
    /// Firewall settings of a server.
    pub async fn get_firewall(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::GetFirewall, server_params(uniq_id))
            .await
    }

    /// Predefined firewall services (ssh, http, ...).
    pub async fn get_firewall_basic_options(&self) -> Result<Value> {
        self.call(Operation::GetFirewallBasicOptions, Params::new())
            .await
    }

    /// Effective firewall rules of a server.
    pub async fn get_firewall_rules(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::GetFirewallRules, server_params(uniq_id))
            .await
    }

    /// Switch a server's firewall to `firewall_type` (`basic`, `advanced`,
    /// `saved` or `none`). `options` carries `rules` or `ruleset`.
    pub async fn update_firewall(
        &self,
        uniq_id: &UniqId,
        firewall_type: &str,
        options: Params,
    ) -> Result<Value> {
        let params = options
            .with("uniq_id", uniq_id)
            .with("type", firewall_type);
        self.call(Operation::UpdateFirewall, params).await
    }

    /// Save `rules` as a reusable ruleset.
    pub async fn create_ruleset(&self, rules: Value, options: Params) -> Result<Value> {
        self.call(Operation::CreateRuleset, options.with("rules", rules))
            .await
    }

    /// Fetch a saved ruleset.
    pub async fn get_ruleset(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::GetRuleset, server_params(uniq_id))
            .await
    }

    /// List saved rulesets.
    pub async fn list_rulesets(&self, page: &ListParams) -> Result<Page<Value>> {
        self.call_as(Operation::ListRulesets, page.to_params()).await
    }

    /// Replace the rules of a saved ruleset.
    pub async fn update_ruleset(&self, uniq_id: &UniqId, rules: Value) -> Result<Value> {
        let params = server_params(uniq_id).with("rules", rules);
        self.call(Operation::UpdateRuleset, params).await
    }
}
