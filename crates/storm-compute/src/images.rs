//! Image and template operations.

use crate::client::ComputeClient;
use crate::models::{Image, ListParams, Page, Template};
use crate::operations::Operation;
use crate::servers::server_params;
use crate::Result;
use serde_json::Value;
use storm_core::{Params, UniqId};

fn image_params(id: u64) -> Params {
    Params::new().with("id", id)
}

impl ComputeClient {
    /// List saved images.
    pub async fn list_images(&self, page: &ListParams) -> Result<Page<Image>> {
        self.call_as(Operation::ListImages, page.to_params()).await
    }

    /// Image the server `uniq_id` under `name`.
    pub async fn create_image(&self, uniq_id: &UniqId, name: &str) -> Result<Value> {
        let params = server_params(uniq_id).with("name", name);
        self.call(Operation::CreateImage, params).await
    }

    /// Delete an image.
    pub async fn delete_image(&self, id: u64) -> Result<Value> {
        self.call(Operation::DeleteImage, image_params(id)).await
    }

    /// Fetch an image.
    pub async fn get_image_details(&self, id: u64) -> Result<Image> {
        self.call_as(Operation::GetImageDetails, image_params(id))
            .await
    }

    /// Rename an image.
    pub async fn update_image(&self, id: u64, name: &str) -> Result<Image> {
        let params = image_params(id).with("name", name);
        self.call_as(Operation::UpdateImage, params).await
    }

    /// Re-image server `uniq_id` from image `id`.
    pub async fn restore_image(&self, id: u64, uniq_id: &UniqId) -> Result<Value> {
        let params = image_params(id).with("uniq_id", uniq_id);
        self.call(Operation::RestoreImage, params).await
    }

    /// List OS templates.
    pub async fn list_templates(&self, page: &ListParams) -> Result<Page<Template>> {
        self.call_as(Operation::ListTemplates, page.to_params()).await
    }

    /// Fetch a template.
    pub async fn get_template_details(&self, id: u64) -> Result<Template> {
        self.call_as(Operation::GetTemplateDetails, Params::new().with("id", id))
            .await
    }

    /// Re-image server `uniq_id` from the named template.
    pub async fn restore_template(&self, uniq_id: &UniqId, template: &str) -> Result<Value> {
        let params = server_params(uniq_id).with("template", template);
        self.call(Operation::RestoreTemplate, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;
    use storm_core::StormConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn template_details_decode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/Storm/Template/details"))
            .and(body_json(json!({"params": {"id": 42}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "UBUNTU_1404_UNMANAGED",
                "os": "Ubuntu",
                "deprecated": 0
            })))
            .mount(&server)
            .await;

        let config = StormConfig::new("u", "p")
            .unwrap()
            .with_auth_url(server.uri());
        let client = ComputeClient::new(&config).unwrap();
        let template = client.get_template_details(42).await.unwrap();
        assert_eq!(template.name, "UBUNTU_1404_UNMANAGED");
        assert_eq!(template.deprecated, Some(0));
    }

    #[tokio::test]
    async fn image_roundtrip_in_memory() {
        let store = MemoryStore::new();
        let client = ComputeClient::in_memory(&store, "alice").unwrap();

        let created = client
            .create_server("web1.example.com", "pw", Params::new())
            .await
            .unwrap();
        let uniq_id = UniqId::parse_str(&created.uniq_id).unwrap();

        client.create_image(&uniq_id, "golden").await.unwrap();
        let images = client.list_images(&ListParams::default()).await.unwrap();
        assert_eq!(images.item_total, 1);

        let image = client.get_image_details(images.items[0].id).await.unwrap();
        assert_eq!(image.source_hostname.as_deref(), Some("web1.example.com"));

        let renamed = client.update_image(image.id, "silver").await.unwrap();
        assert_eq!(renamed.name, "silver");

        client.delete_image(image.id).await.unwrap();
        let err = client.get_image_details(image.id).await.unwrap_err();
        assert!(err.is_application());
    }

    #[tokio::test]
    async fn templates_are_not_simulated_in_memory() {
        let store = MemoryStore::new();
        let client = ComputeClient::in_memory(&store, "alice").unwrap();
        let err = client.list_templates(&ListParams::default()).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_IMPLEMENTED");
    }
}
