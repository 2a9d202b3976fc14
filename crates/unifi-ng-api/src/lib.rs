// unifi-ng-api: Async client core for UniFi Network controllers (self-hosted + UniFi OS)

pub mod auth;
pub mod batch;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod models;
pub mod paths;
pub mod session;
pub mod topology;
pub mod transport;

pub use auth::detect_topology;
pub use batch::{BatchFailure, BatchReport};
pub use endpoints::firewall::firewall_policies_path;
pub use envelope::{decode, decode_as, decode_body};
pub use error::Error;
pub use models::{
    ClientEntry, ClientHistoryQuery, DhcpReservation, Device, FirewallPolicy, NetworkMembersGroup,
    PolicyEndpoint, SiteOverview, SitesOverviewQuery,
};
pub use paths::{ApiFamily, SiteScope};
pub use reqwest::Method;
pub use session::{RequestParams, Session, SessionConfig};
pub use topology::ControllerTopology;
pub use transport::{TlsMode, TransportConfig};
