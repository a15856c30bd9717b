//! Storm compute models shared by the client and the in-memory store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storm_core::Params;

/// Default page size used by the API when none is requested.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Paged list envelope returned by every `list` operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default)]
    pub items: Vec<T>,
    /// Number of items on this page.
    #[serde(default)]
    pub item_count: u64,
    /// Number of items across all pages.
    #[serde(default)]
    pub item_total: u64,
    /// Current page, starting at 1.
    #[serde(default)]
    pub page_num: u64,
    /// Requested page size.
    #[serde(default)]
    pub page_size: u64,
    /// Number of pages.
    #[serde(default)]
    pub page_total: u64,
}

impl<T> Page<T> {
    /// Slice `all` into the requested page.
    #[must_use]
    pub fn paginate(all: Vec<T>, page_num: u64, page_size: u64) -> Self {
        let page_num = page_num.max(1);
        let page_size = page_size.max(1);
        let item_total = all.len() as u64;
        let page_total = item_total.div_ceil(page_size);

        let skip = usize::try_from((page_num - 1) * page_size).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        let items: Vec<T> = all.into_iter().skip(skip).take(take).collect();

        Self {
            item_count: items.len() as u64,
            items,
            item_total,
            page_num,
            page_size,
            page_total,
        }
    }
}

/// Paging parameters for `list` operations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    /// Page to fetch, starting at 1.
    pub page_num: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

impl ListParams {
    /// Request a specific page.
    #[must_use]
    pub const fn page(page_num: u64, page_size: u64) -> Self {
        Self {
            page_num: Some(page_num),
            page_size: Some(page_size),
        }
    }

    /// Convert to operation parameters.
    #[must_use]
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("page_num", self.page_num)
            .with_opt("page_size", self.page_size)
    }
}

/// A Storm server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    /// Six-character server identifier.
    pub uniq_id: String,
    /// Fully qualified host name.
    pub domain: String,
    /// Primary public IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Number of public IPs assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_count: Option<u64>,
    /// Server config (size) id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<u64>,
    /// Human readable config description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_description: Option<String>,
    /// Template the server was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Template description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_description: Option<String>,
    /// Image the server was built or restored from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<u64>,
    /// Whether the server is active (1) or not (0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<i64>,
    /// Whether backups are enabled (1) or not (0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_enabled: Option<i64>,
    /// Creation timestamp as reported by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    /// Zone details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Value>,
}

/// Result of `server_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerStatus {
    /// Overall status, e.g. `Running`, `Stopped`, `Provisioning`.
    pub status: String,
    /// Detailed status of the current step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_status: Option<String>,
    /// Percentage progress of a running action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u64>,
    /// Actions in progress.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub running: Vec<Value>,
}

/// A saved server image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    /// Image id.
    pub id: u64,
    /// Image name.
    pub name: String,
    /// Host name of the server the image was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hostname: Option<String>,
    /// `uniq_id` of the server the image was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uniq_id: Option<String>,
    /// Template of the source server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Template description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_description: Option<String>,
    /// When the image was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<String>,
    /// Image size in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// A server config (size/price point).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Config id.
    pub id: u64,
    /// Description, e.g. `2GB Storm Server`.
    pub description: String,
    /// Category such as `storm` or `ssd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpu: Option<u64>,
    /// Memory in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Disk in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Whether the config can currently be ordered (1) or not (0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,
}

/// An OS template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    /// Template id.
    pub id: u64,
    /// Template name, e.g. `UBUNTU_1404_UNMANAGED`.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operating system family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Whether the template is deprecated (1) or not (0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<i64>,
}

/// A load balancer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balancer {
    /// Balancer identifier.
    pub uniq_id: String,
    /// Balancer name.
    pub name: String,
    /// Virtual IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip: Option<String>,
    /// Balancing strategy, e.g. `roundrobin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Session persistence (1) or not (0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_persistence: Option<i64>,
    /// Backend nodes.
    #[serde(default)]
    pub nodes: Vec<Value>,
    /// Port mappings.
    #[serde(default)]
    pub services: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paginate_splits_pages() {
        let page = Page::paginate((1..=7).collect::<Vec<u32>>(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.item_count, 3);
        assert_eq!(page.item_total, 7);
        assert_eq!(page.page_total, 3);

        let past_end = Page::paginate(vec![1, 2], 5, 10);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.page_total, 1);
    }

    #[test]
    fn list_params_to_params() {
        let params = ListParams::page(2, 50).to_params();
        assert_eq!(params.into_body(), json!({"params": {"page_num": 2, "page_size": 50}}));
        assert!(ListParams::default().to_params().is_empty());
    }

    #[test]
    fn server_list_deserializes() {
        let page: Page<Server> = serde_json::from_value(json!({
            "item_count": 1,
            "item_total": 1,
            "page_num": 1,
            "page_size": 25,
            "page_total": 1,
            "items": [{
                "uniq_id": "8VGTDE",
                "domain": "web1.example.com",
                "ip": "203.0.113.10",
                "config_id": 3,
                "template": "UBUNTU_1404_UNMANAGED",
                "active": 1,
                "zone": {"id": 1, "name": "Zone A"}
            }]
        }))
        .unwrap();

        assert_eq!(page.items.len(), 1);
        let server = &page.items[0];
        assert_eq!(server.uniq_id, "8VGTDE");
        assert_eq!(server.config_id, Some(3));
        assert_eq!(server.zone.as_ref().unwrap()["name"], "Zone A");
    }

    #[test]
    fn page_tolerates_missing_counters() {
        let page: Page<Image> = serde_json::from_value(json!({"items": []})).unwrap();
        assert_eq!(page.item_total, 0);
    }

    #[test]
    fn page_of_models_without_default_tolerates_missing_items() {
        let servers: Page<Server> = serde_json::from_value(json!({"item_total": 0})).unwrap();
        assert!(servers.items.is_empty());

        let balancers: Page<Balancer> = serde_json::from_value(json!({})).unwrap();
        assert!(balancers.items.is_empty());
        assert_eq!(balancers.page_num, 0);
    }
}
