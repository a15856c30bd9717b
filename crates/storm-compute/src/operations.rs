//! Named compute operations.
//!
//! Each [`Operation`] maps to a fixed path under `/v1` and a list of
//! parameters the API refuses to run without. All of them are POSTs.

use std::fmt;
use std::str::FromStr;
use storm_core::Error;

/// Generate the operation enum together with its lookup table.
macro_rules! operations {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, $path:literal, [$($required:literal),*]; )*) => {
        /// A named Storm compute operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $( $(#[$meta])* $variant, )*
        }

        impl Operation {
            /// Every operation, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Snake-case operation name, e.g. `list_servers`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Path relative to the API version prefix, e.g. `/Server/list`.
            #[must_use]
            pub const fn path(self) -> &'static str {
                match self {
                    $( Self::$variant => $path, )*
                }
            }

            /// Parameters that must be present.
            #[must_use]
            pub const fn required_params(self) -> &'static [&'static str] {
                match self {
                    $( Self::$variant => &[$($required),*], )*
                }
            }
        }
    };
}

operations! {
    /// Clone a server.
    CloneServer => "clone_server", "/Server/clone", ["uniq_id", "domain"];
    /// Destroy a server.
    DeleteServer => "delete_server", "/Server/destroy", ["uniq_id"];
    /// Reboot a server.
    RebootServer => "reboot_server", "/Server/reboot", ["uniq_id"];
    /// List servers on the account.
    ListServers => "list_servers", "/Server/list", [];
    /// Fetch server details.
    GetServer => "get_server", "/Server/details", ["uniq_id"];
    /// Provision a new server.
    CreateServer => "create_server", "/Server/create", ["domain", "password"];
    /// Change a server's config.
    ResizeServer => "resize_server", "/Server/resize", ["uniq_id", "config_id"];
    /// Server action history.
    ServerHistory => "server_history", "/Server/history", ["uniq_id"];
    /// Power a server off.
    ShutdownServer => "shutdown_server", "/Server/shutdown", ["uniq_id"];
    /// Power a server on.
    StartServer => "start_server", "/Server/start", ["uniq_id"];
    /// Current server status.
    ServerStatus => "server_status", "/Server/status", ["uniq_id"];
    /// Update server attributes.
    UpdateServer => "update_server", "/Server/update", ["uniq_id"];

    /// Remove a node from a load balancer.
    RemoveBalancerNode => "remove_balancer_node", "/Network/LoadBalancer/removeNode", ["uniq_id", "node"];
    /// Add a node to a load balancer.
    AddBalancerNode => "add_balancer_node", "/Network/LoadBalancer/addNode", ["uniq_id", "node"];
    /// Add a port mapping to a load balancer.
    AddBalancerService => "add_balancer_service", "/Network/LoadBalancer/addService", ["uniq_id", "src_port", "dest_port"];
    /// Remove a port mapping from a load balancer.
    RemoveBalancerService => "remove_balancer_service", "/Network/LoadBalancer/removeService", ["uniq_id", "src_port"];
    /// Check whether a balancer name is free.
    CheckBalancerAvailable => "check_balancer_available", "/Network/LoadBalancer/available", ["name"];
    /// Create a load balancer.
    CreateBalancer => "create_balancer", "/Network/LoadBalancer/create", ["name"];
    /// Delete a load balancer.
    DeleteBalancer => "delete_balancer", "/Network/LoadBalancer/delete", ["uniq_id"];
    /// Update a load balancer.
    UpdateBalancer => "update_balancer", "/Network/LoadBalancer/update", ["uniq_id"];
    /// Fetch load balancer details.
    GetBalancerDetails => "get_balancer_details", "/Network/LoadBalancer/details", ["uniq_id"];
    /// List load balancers.
    ListBalancers => "list_balancers", "/Network/LoadBalancer/list", [];
    /// Servers that can be added as balancer nodes.
    GetBalancerPossibleNodes => "get_balancer_possible_nodes", "/Network/LoadBalancer/possibleNodes", [];
    /// Available balancing strategies.
    GetBalancerStrategies => "get_balancer_strategies", "/Network/LoadBalancer/strategies", [];

    /// List server configs.
    ListConfigs => "list_configs", "/Storm/Config/list", [];
    /// Fetch config details.
    GetConfigDetails => "get_config_details", "/Storm/Config/details", ["id"];

    /// List OS templates.
    ListTemplates => "list_templates", "/Storm/Template/list", [];
    /// Fetch template details.
    GetTemplateDetails => "get_template_details", "/Storm/Template/details", ["id"];
    /// Re-image a server from a template.
    RestoreTemplate => "restore_template", "/Storm/Template/restore", ["uniq_id", "template"];

    /// List saved images.
    ListImages => "list_images", "/Storm/Image/list", [];
    /// Image a server.
    CreateImage => "create_image", "/Storm/Image/create", ["name", "uniq_id"];
    /// Delete an image.
    DeleteImage => "delete_image", "/Storm/Image/delete", ["id"];
    /// Fetch image details.
    GetImageDetails => "get_image_details", "/Storm/Image/details", ["id"];
    /// Rename an image.
    UpdateImage => "update_image", "/Storm/Image/update", ["id", "name"];
    /// Re-image a server from a saved image.
    RestoreImage => "restore_image", "/Storm/Image/restore", ["id", "uniq_id"];

    /// Load statistics for a server.
    GetStats => "get_stats", "/Monitoring/Load/stats", ["uniq_id"];
    /// Load graph for a server.
    GetStatsGraph => "get_stats_graph", "/Monitoring/Load/graph", ["uniq_id"];

    /// Private networks on the account.
    ListPrivateIps => "list_private_ips", "/Network/Private/get", [];
    /// Private IP of a server.
    GetPrivateIp => "get_private_ip", "/Network/Private/getIP", ["uniq_id"];
    /// Attach a server to the private network.
    AttachServerToPrivateIp => "attach_server_to_private_ip", "/Network/Private/attach", ["uniq_id"];
    /// Detach a server from the private network.
    DetachServerFromPrivateIp => "detach_server_from_private_ip", "/Network/Private/detach", ["uniq_id"];
    /// Whether a server is attached to the private network.
    CheckServerAttached => "check_server_attached", "/Network/Private/isAttached", ["uniq_id"];

    /// Add public IPs to a server.
    AddIpToServer => "add_ip_to_server", "/Network/IP/add", ["uniq_id", "ip_count"];
    /// Fetch IP details.
    GetIpDetails => "get_ip_details", "/Network/IP/details", ["ip"];
    /// IPs assigned to a server.
    ListNetworkIps => "list_network_ips", "/Network/IP/list", ["uniq_id"];
    /// Public IPs across the account.
    ListIpPublicAccounts => "list_ip_public_accounts", "/Network/IP/listAccntPublic", [];
    /// Public IPs of a server.
    ListNetworkPublicIps => "list_network_public_ips", "/Network/IP/listPublic", ["uniq_id"];
    /// Remove an IP from a server.
    RemoveIpFromServer => "remove_ip_from_server", "/Network/IP/remove", ["uniq_id", "ip"];
    /// Request additional IPs for a server.
    RequestNewIps => "request_new_ips", "/Network/IP/request", ["uniq_id", "ip_count"];

    /// Firewall settings of a server.
    GetFirewall => "get_firewall", "/Network/Firewall/details", ["uniq_id"];
    /// Predefined firewall options.
    GetFirewallBasicOptions => "get_firewall_basic_options", "/Network/Firewall/getBasicOptions", [];
    /// Firewall rules of a server.
    GetFirewallRules => "get_firewall_rules", "/Network/Firewall/rules", ["uniq_id"];
    /// Change firewall settings of a server.
    UpdateFirewall => "update_firewall", "/Network/Firewall/update", ["uniq_id", "type"];

    /// Save a firewall ruleset.
    CreateRuleset => "create_ruleset", "/Network/Firewall/Ruleset/create", ["rules"];
    /// Fetch a ruleset.
    GetRuleset => "get_ruleset", "/Network/Firewall/Ruleset/details", ["uniq_id"];
    /// List saved rulesets.
    ListRulesets => "list_rulesets", "/Network/Firewall/Ruleset/list", [];
    /// Replace a ruleset's rules.
    UpdateRuleset => "update_ruleset", "/Network/Firewall/Ruleset/update", ["uniq_id", "rules"];
}

impl Operation {
    /// Look up the operation served at `path`.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.path() == path)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::NotImplemented(format!("unknown operation `{s}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_paths_are_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        let paths: HashSet<_> = Operation::ALL.iter().map(|op| op.path()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
        assert_eq!(paths.len(), Operation::ALL.len());
    }

    #[test]
    fn paths_are_rooted() {
        for op in Operation::ALL {
            assert!(op.path().starts_with('/'), "{op} has path {}", op.path());
        }
    }

    #[test]
    fn name_round_trips_through_from_str() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), *op);
        }
        assert!("launch_rocket".parse::<Operation>().is_err());
    }

    #[test]
    fn lookup_by_path() {
        assert_eq!(Operation::from_path("/Server/list"), Some(Operation::ListServers));
        assert_eq!(
            Operation::from_path("/Network/Firewall/Ruleset/update"),
            Some(Operation::UpdateRuleset)
        );
        assert_eq!(Operation::from_path("/Server/list_servers"), None);
    }

    #[test]
    fn required_params() {
        assert!(Operation::ListServers.required_params().is_empty());
        assert_eq!(Operation::ResizeServer.required_params(), ["uniq_id", "config_id"]);
        assert_eq!(Operation::CreateImage.required_params(), ["name", "uniq_id"]);
    }
}
