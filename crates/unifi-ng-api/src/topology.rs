/// The deployment flavor of the controller.
///
/// Determines the auth endpoint root and whether network API calls go
/// through the UniFi OS reverse proxy. Detected once per login by probing
/// the marker paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerTopology {
    /// Self-hosted Network Application -- auth under `api/`, no proxy prefix.
    Legacy,
    /// UniFi OS console / cloud gateway -- auth under `api/auth/`,
    /// network API behind `proxy/network/`.
    Unified,
}

impl ControllerTopology {
    /// Marker paths probed during detection, in probe order.
    pub const PROBE_ORDER: [Self; 2] = [Self::Legacy, Self::Unified];

    /// The unauthenticated path whose 200 response identifies this topology.
    pub fn marker_path(self) -> &'static str {
        match self {
            Self::Legacy => "api",
            Self::Unified => "network",
        }
    }

    /// Root of the login/logout endpoints, relative to the base URL.
    pub fn auth_root(self) -> &'static str {
        match self {
            Self::Legacy => "api",
            Self::Unified => "api/auth",
        }
    }

    /// Prefix placed in front of every API family root.
    pub fn proxy_prefix(self) -> &'static str {
        match self {
            Self::Legacy => "",
            Self::Unified => "proxy/network/",
        }
    }

    /// `api/login` or `api/auth/login`.
    pub fn login_path(self) -> String {
        format!("{}/login", self.auth_root())
    }

    /// `api/logout` or `api/auth/logout`.
    pub fn logout_path(self) -> String {
        format!("{}/logout", self.auth_root())
    }

    pub fn is_unified(self) -> bool {
        self == Self::Unified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_paths() {
        let t = ControllerTopology::Legacy;
        assert_eq!(t.login_path(), "api/login");
        assert_eq!(t.logout_path(), "api/logout");
        assert_eq!(t.proxy_prefix(), "");
        assert!(!t.is_unified());
    }

    #[test]
    fn unified_paths() {
        let t = ControllerTopology::Unified;
        assert_eq!(t.login_path(), "api/auth/login");
        assert_eq!(t.logout_path(), "api/auth/logout");
        assert_eq!(t.proxy_prefix(), "proxy/network/");
        assert!(t.is_unified());
    }

    #[test]
    fn api_marker_is_probed_first() {
        let markers: Vec<_> = ControllerTopology::PROBE_ORDER
            .iter()
            .map(|t| t.marker_path())
            .collect();
        assert_eq!(markers, ["api", "network"]);
    }
}
