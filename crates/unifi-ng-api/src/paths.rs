// Path resolution
//
// Every controller endpoint lives under one of three family roots, optionally
// behind the UniFi OS proxy prefix, optionally followed by a site segment.

use url::Url;

use crate::topology::ControllerTopology;

/// The fixed path roots used by the different endpoint groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// `api/s` -- REST records such as `rest/user` (DHCP reservations).
    V1Site,
    /// `v2/api` -- controller-wide endpoints such as `sites/overview`.
    V2,
    /// `v2/api/site` -- devices, clients, firewall policies, member groups.
    V2Site,
}

impl ApiFamily {
    pub fn root(self) -> &'static str {
        match self {
            Self::V1Site => "api/s",
            Self::V2 => "v2/api",
            Self::V2Site => "v2/api/site",
        }
    }
}

/// Which site segment to put into a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteScope<'a> {
    /// The session's configured site.
    #[default]
    SessionDefault,
    /// No site segment at all (controller-wide path).
    Unscoped,
    /// An explicit site identifier, used literally.
    Site(&'a str),
}

impl<'a> From<Option<&'a str>> for SiteScope<'a> {
    /// `None` means the session default, `Some("")` means unscoped.
    fn from(value: Option<&'a str>) -> Self {
        match value {
            None => Self::SessionDefault,
            Some("") => Self::Unscoped,
            Some(site) => Self::Site(site),
        }
    }
}

/// Build `{base}{proxy}{root}{/site/ | /}` for a known topology.
///
/// `base_url` must end in `/`; the returned string always ends in `/` so an
/// endpoint suffix can be appended directly.
pub(crate) fn family_path(
    base_url: &Url,
    topology: ControllerTopology,
    family: ApiFamily,
    scope: SiteScope<'_>,
    default_site: &str,
) -> String {
    let site = match scope {
        SiteScope::SessionDefault => format!("/{default_site}/"),
        SiteScope::Unscoped => "/".to_owned(),
        SiteScope::Site(site) => format!("/{site}/"),
    };
    format!(
        "{base_url}{}{}{site}",
        topology.proxy_prefix(),
        family.root()
    )
}
