//! Load balancer operations.

use crate::client::ComputeClient;
use crate::models::{Balancer, ListParams, Page};
use crate::operations::Operation;
use crate::servers::server_params;
use crate::Result;
use serde_json::Value;
use storm_core::{Params, UniqId};

impl ComputeClient {
    /// List load balancers.
    pub async fn list_balancers(&self, page: &ListParams) -> Result<Page<Balancer>> {
        self.call_as(Operation::ListBalancers, page.to_params()).await
    }

    /// Fetch a load balancer.
    pub async fn get_balancer_details(&self, uniq_id: &UniqId) -> Result<Balancer> {
        self.call_as(Operation::GetBalancerDetails, server_params(uniq_id))
            .await
    }

    /// Create a load balancer. `options` may carry `nodes`, `services`,
    /// `strategy` and `session_persistence`.
    pub async fn create_balancer(&self, name: &str, options: Params) -> Result<Balancer> {
        self.call_as(Operation::CreateBalancer, options.with("name", name))
            .await
    }

    /// Update a load balancer.
    pub async fn update_balancer(&self, uniq_id: &UniqId, options: Params) -> Result<Balancer> {
        self.call_as(Operation::UpdateBalancer, options.with("uniq_id", uniq_id))
            .await
    }

    /// Delete a load balancer.
    pub async fn delete_balancer(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::DeleteBalancer, server_params(uniq_id))
            .await
    }

    /// Whether `name` is still free.
    pub async fn check_balancer_available(&self, name: &str) -> Result<Value> {
        self.call(
            Operation::CheckBalancerAvailable,
            Params::new().with("name", name),
        )
        .await
    }

    /// Add the server with IP `node` to a balancer.
    pub async fn add_balancer_node(&self, uniq_id: &UniqId, node: &str) -> Result<Balancer> {
        let params = server_params(uniq_id).with("node", node);
        self.call_as(Operation::AddBalancerNode, params).await
    }

    /// Remove node `node` from a balancer.
    pub async fn remove_balancer_node(&self, uniq_id: &UniqId, node: &str) -> Result<Balancer> {
        let params = server_params(uniq_id).with("node", node);
        self.call_as(Operation::RemoveBalancerNode, params).await
    }

    /// Forward `src_port` on the balancer to `dest_port` on its nodes.
    pub async fn add_balancer_service(
        &self,
        uniq_id: &UniqId,
        src_port: u16,
        dest_port: u16,
    ) -> Result<Balancer> {
        let params = server_params(uniq_id)
            .with("src_port", src_port)
            .with("dest_port", dest_port);
        self.call_as(Operation::AddBalancerService, params).await
    }

    /// Stop forwarding `src_port`.
    pub async fn remove_balancer_service(&self, uniq_id: &UniqId, src_port: u16) -> Result<Balancer> {
        let params = server_params(uniq_id).with("src_port", src_port);
        self.call_as(Operation::RemoveBalancerService, params).await
    }

    /// Servers eligible as balancer nodes.
    pub async fn get_balancer_possible_nodes(&self, page: &ListParams) -> Result<Page<Value>> {
        self.call_as(Operation::GetBalancerPossibleNodes, page.to_params())
            .await
    }

    /// Supported balancing strategies.
    pub async fn get_balancer_strategies(&self) -> Result<Value> {
        self.call(Operation::GetBalancerStrategies, Params::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storm_core::StormConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ComputeClient {
        let config = StormConfig::new("u", "p")
            .unwrap()
            .with_auth_url(server.uri());
        ComputeClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn add_service_sends_ports() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Network/LoadBalancer/addService"))
            .and(body_json(json!({"params": {
                "uniq_id": "LB0001",
                "src_port": 80,
                "dest_port": 8080
            }})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uniq_id": "LB0001",
                "name": "front",
                "services": [{"src_port": 80, "dest_port": 8080}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let balancer = client
            .add_balancer_service(&UniqId::parse_str("LB0001").unwrap(), 80, 8080)
            .await
            .unwrap();
        assert_eq!(balancer.name, "front");
        assert_eq!(balancer.services.len(), 1);
        assert!(balancer.nodes.is_empty());
    }

    #[tokio::test]
    async fn strategies_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Network/LoadBalancer/strategies"))
            .and(body_json(json!({"params": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "strategies": [{"strategy": "roundrobin"}, {"strategy": "connections"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let body = client.get_balancer_strategies().await.unwrap();
        assert_eq!(body["strategies"][0]["strategy"], "roundrobin");
    }
}
