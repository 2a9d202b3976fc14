// Controller payload types
//
// Request bodies are modeled exactly; response objects keep the commonly
// used fields explicit and collect the rest in `extra`, because field
// presence varies across controller versions.

use serde::{Deserialize, Serialize};

// ── DHCP reservation (rest/user) ─────────────────────────────────────

/// A fixed-IP / local-DNS record for one client MAC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DhcpReservation {
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_fixedip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dns_record: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dns_record_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DhcpReservation {
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            ..Self::default()
        }
    }

    /// Turn on `use_fixedip` / `local_dns_record_enabled` when the
    /// corresponding value is set; the controller ignores the value otherwise.
    pub fn apply_implied_flags(&mut self) {
        if self.fixed_ip.is_some() {
            self.use_fixedip = Some(true);
        }
        if self.local_dns_record.is_some() {
            self.local_dns_record_enabled = Some(true);
        }
    }
}

// ── Network member groups ────────────────────────────────────────────

/// Group type used when none is given.
pub const DEFAULT_GROUP_TYPE: &str = "CLIENTS";

fn default_group_type() -> String {
    DEFAULT_GROUP_TYPE.to_owned()
}

/// A named list of client MACs usable in firewall policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMembersGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(rename = "type", default = "default_group_type")]
    pub group_type: String,
}

impl NetworkMembersGroup {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            members,
            group_type: default_group_type(),
        }
    }
}

// ── Firewall policies ────────────────────────────────────────────────

/// Source or destination matcher of a firewall policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_domains: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A zone-based firewall policy from `firewall-policies`.
///
/// Fetch, edit, and `PUT` back: unmodeled fields round-trip through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallPolicy {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub source: PolicyEndpoint,
    #[serde(default)]
    pub destination: PolicyEndpoint,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Devices and clients ──────────────────────────────────────────────

/// Adopted network device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Active or historical client entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEntry {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub fixed_ip: Option<String>,
    #[serde(default, rename = "type")]
    pub client_type: Option<String>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClientEntry {
    /// Best human-readable label: display name, name, hostname, then MAC.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.hostname.as_deref())
            .or(self.mac.as_deref())
            .unwrap_or("-")
    }
}

// ── Sites ────────────────────────────────────────────────────────────

/// Row of the paged `sites/overview` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteOverview {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Query parameters ─────────────────────────────────────────────────

/// Filters for `clients/history`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientHistoryQuery {
    pub only_non_blocked: bool,
    pub include_unifi_devices: bool,
    /// 0 means no time limit.
    pub within_hours: u32,
}

impl Default for ClientHistoryQuery {
    fn default() -> Self {
        Self {
            only_non_blocked: true,
            include_unifi_devices: true,
            within_hours: 0,
        }
    }
}

impl ClientHistoryQuery {
    pub(crate) fn to_pairs(self) -> [(&'static str, String); 3] {
        [
            ("onlyNonBlocked", self.only_non_blocked.to_string()),
            ("includeUnifiDevices", self.include_unifi_devices.to_string()),
            ("withinHours", self.within_hours.to_string()),
        ]
    }
}

/// Paging for `sites/overview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesOverviewQuery {
    pub page_size: u32,
    pub page_number: u32,
    pub search_text: String,
}

impl Default for SitesOverviewQuery {
    fn default() -> Self {
        Self {
            page_size: 1000,
            page_number: 0,
            search_text: String::new(),
        }
    }
}
