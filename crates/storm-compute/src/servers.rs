//! Server operations.

use crate::client::ComputeClient;
use crate::models::{ListParams, Page, Server, ServerStatus};
use crate::operations::Operation;
use crate::Result;
use serde_json::Value;
use storm_core::{Params, UniqId};

pub(crate) fn server_params(uniq_id: &UniqId) -> Params {
    Params::new().with("uniq_id", uniq_id)
}

impl ComputeClient {
    /// List servers on the account.
    pub async fn list_servers(&self, page: &ListParams) -> Result<Page<Server>> {
        self.call_as(Operation::ListServers, page.to_params()).await
    }

    /// Fetch a single server.
    pub async fn get_server(&self, uniq_id: &UniqId) -> Result<Server> {
        self.call_as(Operation::GetServer, server_params(uniq_id))
            .await
    }

    /// Provision a server. `options` carries `config_id`, `template`,
    /// `image_id`, `zone`, `ip_count` and similar settings.
    pub async fn create_server(
        &self,
        domain: &str,
        password: &str,
        options: Params,
    ) -> Result<Server> {
        let params = options.with("domain", domain).with("password", password);
        self.call_as(Operation::CreateServer, params).await
    }

    /// Clone a server under a new host name.
    pub async fn clone_server(
        &self,
        uniq_id: &UniqId,
        domain: &str,
        options: Params,
    ) -> Result<Server> {
        let params = options.with("uniq_id", uniq_id).with("domain", domain);
        self.call_as(Operation::CloneServer, params).await
    }

    /// Destroy a server.
    pub async fn delete_server(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::DeleteServer, server_params(uniq_id))
            .await
    }

    /// Reboot a server.
    pub async fn reboot_server(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::RebootServer, server_params(uniq_id))
            .await
    }

    /// Move a server to another config.
    pub async fn resize_server(
        &self,
        uniq_id: &UniqId,
        config_id: u64,
        options: Params,
    ) -> Result<Server> {
        let params = options.with("uniq_id", uniq_id).with("config_id", config_id);
        self.call_as(Operation::ResizeServer, params).await
    }

    /// Action history of a server.
    pub async fn server_history(&self, uniq_id: &UniqId, page: &ListParams) -> Result<Page<Value>> {
        let params = page.to_params().with("uniq_id", uniq_id);
        self.call_as(Operation::ServerHistory, params).await
    }

    /// Power a server off.
    pub async fn shutdown_server(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::ShutdownServer, server_params(uniq_id))
            .await
    }

    /// Power a server on.
    pub async fn start_server(&self, uniq_id: &UniqId) -> Result<Value> {
        self.call(Operation::StartServer, server_params(uniq_id))
            .await
    }

    /// Current status of a server.
    pub async fn server_status(&self, uniq_id: &UniqId) -> Result<ServerStatus> {
        self.call_as(Operation::ServerStatus, server_params(uniq_id))
            .await
    }

    /// Update server attributes such as `domain` or `backup_enabled`.
    pub async fn update_server(&self, uniq_id: &UniqId, options: Params) -> Result<Server> {
        let params = options.with("uniq_id", uniq_id);
        self.call_as(Operation::UpdateServer, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storm_core::{Error, StormConfig};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ComputeClient {
        let config = StormConfig::new("u", "p")
            .unwrap()
            .with_auth_url(server.uri());
        ComputeClient::new(&config).unwrap()
    }

    fn uniq_id() -> UniqId {
        UniqId::parse_str("8VGTDE").unwrap()
    }

    #[tokio::test]
    async fn list_servers_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/list"))
            .and(header("Authorization", "Basic dTpw"))
            .and(body_json(json!({"params": {"page_num": 1, "page_size": 10}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "item_count": 1,
                "item_total": 1,
                "page_num": 1,
                "page_size": 10,
                "page_total": 1,
                "items": [{"uniq_id": "8VGTDE", "domain": "web1.example.com", "active": 1}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let page = client.list_servers(&ListParams::page(1, 10)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].domain, "web1.example.com");
    }

    #[tokio::test]
    async fn get_server_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/details"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_server(&uniq_id()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn get_server_full_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/details"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error_class": "LW::Exception::RecordNotFound",
                "full_error": "Record 'Server' not found",
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_server(&uniq_id()).await.unwrap_err();
        assert!(err.is_application());
        assert_eq!(err.error_class(), Some("LW::Exception::RecordNotFound"));
    }

    #[tokio::test]
    async fn create_server_sends_required_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/create"))
            .and(body_json(json!({"params": {
                "domain": "db1.example.com",
                "password": "s3cret",
                "config_id": 3,
                "template": "UBUNTU_1404_UNMANAGED"
            }})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uniq_id": "ABC123",
                "domain": "db1.example.com",
                "config_id": 3
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = Params::new()
            .with("config_id", 3)
            .with("template", "UBUNTU_1404_UNMANAGED");
        let created = client
            .create_server("db1.example.com", "s3cret", options)
            .await
            .unwrap();
        assert_eq!(created.uniq_id, "ABC123");
        assert_eq!(created.config_id, Some(3));
    }

    #[tokio::test]
    async fn server_status_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Running"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let status = client.server_status(&uniq_id()).await.unwrap();
        assert_eq!(status.status, "Running");
        assert!(status.running.is_empty());
    }

    #[tokio::test]
    async fn delete_server_passes_body_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/destroy"))
            .and(body_json(json!({"params": {"uniq_id": "8VGTDE"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"destroyed": "8VGTDE"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let body = client.delete_server(&uniq_id()).await.unwrap();
        assert_eq!(body, json!({"destroyed": "8VGTDE"}));
    }

    #[tokio::test]
    async fn unexpected_status_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Server/reboot"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.reboot_server(&uniq_id()).await.unwrap_err();
        assert_eq!(
            err,
            Error::Status {
                status: 503,
                body: "maintenance".to_string()
            }
        );
    }
}
