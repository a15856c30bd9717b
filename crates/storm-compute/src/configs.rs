//! Server config (size) operations.

use crate::client::ComputeClient;
use crate::models::{Config, ListParams, Page};
use crate::operations::Operation;
use crate::Result;
use storm_core::Params;

impl ComputeClient {
    /// List server configs, optionally restricted to one `category`.
    pub async fn list_configs(
        &self,
        page: &ListParams,
        category: Option<&str>,
    ) -> Result<Page<Config>> {
        let params = page.to_params().with_opt("category", category);
        self.call_as(Operation::ListConfigs, params).await
    }

    /// Fetch a config.
    pub async fn get_config_details(&self, id: u64) -> Result<Config> {
        self.call_as(Operation::GetConfigDetails, Params::new().with("id", id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storm_core::{Error, StormConfig};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ComputeClient {
        let config = StormConfig::new("u", "p")
            .unwrap()
            .with_auth_url(server.uri());
        ComputeClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn list_configs_filters_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Storm/Config/list"))
            .and(body_json(json!({"params": {"category": "ssd"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "item_total": 1,
                "items": [{"id": 7, "description": "4GB SSD", "category": "ssd", "vcpu": 2}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let page = client
            .list_configs(&ListParams::default(), Some("ssd"))
            .await
            .unwrap();
        assert_eq!(page.items[0].id, 7);
        assert_eq!(page.items[0].vcpu, Some(2));
    }

    #[tokio::test]
    async fn malformed_config_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Storm/Config/details"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "seven"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_config_details(7).await.unwrap_err();
        assert!(matches!(err, Error::ParseError(msg) if msg.starts_with("unexpected get_config_details response")));
    }
}
