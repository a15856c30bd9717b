//! Public and private IP management.

use crate::client::ComputeClient;
use crate::models::{ListParams, Page};
use crate::operations::Operation;
use crate::servers::server_params;
use crate::Result;
use serde_json::Value;
use storm_core::{Params, UniqId};

impl ComputeClient {
    /// Private networks on the account.
    pub async fn list_private_ips(&self) -> Result<Value> {
        self.call(Operation::ListPrivateIps, Params::new()).await
    }

    /// Private IP of a server.
    pub async fn get_private_ip(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::GetPrivateIp, server_params(uniq_id))
            .await
    }

    /// Attach a server to the private network.
    pub async fn attach_server_to_private_ip(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::AttachServerToPrivateIp, server_params(uniq_id))
            .await
    }

    /// Detach a server from the private network.
    pub async fn detach_server_from_private_ip(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::DetachServerFromPrivateIp, server_params(uniq_id))
            .await
    }

    /// Whether a server is attached to the private network.
    pub async fn check_server_attached(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::CheckServerAttached, server_params(uniq_id))
            .await
    }

    /// Add `ip_count` public IPs to a server. Pass `reboot` in `options` to
    /// have the server configured immediately.
    pub async fn add_ip_to_server(
        &self,
        uniq_id: &UniqId,
        ip_count: u32,
        options: Params,
    ) -> Result<Value> {
        let params = options.with("uniq_id", uniq_id).with("ip_count", ip_count);
        self.call(Operation::AddIpToServer, params).await
    }

    /// Details of one IP.
    pub async fn get_ip_details(&self, ip: &str, options: Params) -> Result<Value> {
        self.call(Operation::GetIpDetails, options.with("ip", ip))
            .await
    }

    /// IPs assigned to a server.
    pub async fn list_network_ips(&self, uniq_id: &UniqId, page: &ListParams) -> Result<Page<Value>> {
        let params = page.to_params().with("uniq_id", uniq_id);
        self.call_as(Operation::ListNetworkIps, params).await
    }

    /// Public IPs across the account.
    pub async fn list_ip_public_accounts(&self, page: &ListParams) -> Result<Page<Value>> {
        self.call_as(Operation::ListIpPublicAccounts, page.to_params())
            .await
    }

    /// Public IPs of a server.
    pub async fn list_network_public_ips(
        &self,
        uniq_id: &UniqId,
        page: &ListParams,
    ) -> Result<Page<Value>> {
        let params = page.to_params().with("uniq_id", uniq_id);
        self.call_as(Operation::ListNetworkPublicIps, params).await
    }

    /// Release `ip` from a server.
    pub async fn remove_ip_from_server(
        &self,
        uniq_id: &UniqId,
        ip: &str,
        options: Params,
    ) -> Result<Value> {
        let params = options.with("uniq_id", uniq_id).with("ip", ip);
        self.call(Operation::RemoveIpFromServer, params).await
    }

    /// Ask for `ip_count` additional IPs beyond the self-service limit.
    pub async fn request_new_ips(
        &self,
        uniq_id: &UniqId,
        ip_count: u32,
        options: Params,
    ) -> Result<Value> {
        let params = options.with("uniq_id", uniq_id).with("ip_count", ip_count);
        self.call(Operation::RequestNewIps, params).await
    }
}
