// Integration tests for `Session` against a wiremock controller.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unifi_ng_api::{
    ApiFamily, ClientHistoryQuery, ControllerTopology, DhcpReservation, Error,
    NetworkMembersGroup, RequestParams, Session, SessionConfig, SiteScope, SitesOverviewQuery,
    detect_topology,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> SessionConfig {
    let base = Url::parse(&server.uri()).unwrap();
    SessionConfig::with_base_url("admin", SecretString::from("hunter2"), base)
}

/// Mount the marker path for `topology` so detection picks it.
async fn mount_marker(server: &MockServer, topology: ControllerTopology) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", topology.marker_path())))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, topology: ControllerTopology, token: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{}", topology.login_path())))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-CSRF-Token", token)
                .insert_header("Set-Cookie", "TOKEN=session-cookie; Path=/")
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .mount(server)
        .await;
}

async fn logged_in(topology: ControllerTopology) -> (MockServer, Session) {
    let server = MockServer::start().await;
    mount_marker(&server, topology).await;
    mount_login(&server, topology, "tok-1").await;

    let mut session = Session::new(config(&server));
    session.login().await.unwrap();
    (server, session)
}

fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "meta": { "rc": "ok" }, "data": data })
}

// ── Detection ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_detects_legacy_controller() {
    let server = MockServer::start().await;
    mount_marker(&server, ControllerTopology::Legacy).await;

    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let topology = detect_topology(&reqwest::Client::new(), &base).await.unwrap();
    assert_eq!(topology, ControllerTopology::Legacy);
}

#[tokio::test]
async fn test_detects_unified_controller() {
    let server = MockServer::start().await;
    mount_marker(&server, ControllerTopology::Unified).await;

    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let topology = detect_topology(&reqwest::Client::new(), &base).await.unwrap();
    assert_eq!(topology, ControllerTopology::Unified);
}

#[tokio::test]
async fn test_both_markers_answering_detects_legacy() {
    let server = MockServer::start().await;
    mount_marker(&server, ControllerTopology::Legacy).await;
    mount_marker(&server, ControllerTopology::Unified).await;

    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let topology = detect_topology(&reqwest::Client::new(), &base).await.unwrap();
    assert_eq!(topology, ControllerTopology::Legacy);
}

#[tokio::test]
async fn test_unreachable_host_fails_login_with_transport_error() {
    let base = Url::parse("http://127.0.0.1:1/").unwrap();
    let mut session =
        Session::new(SessionConfig::with_base_url("admin", SecretString::from("pw"), base));

    let result = session.login().await;

    assert!(matches!(result, Err(Error::Transport(_))));
    assert!(!session.is_logged_in());
    assert!(session.topology().is_none());
}

#[tokio::test]
async fn test_unknown_host_is_unsupported() {
    let server = MockServer::start().await;

    let mut session = Session::new(config(&server));
    let result = session.login().await;

    assert!(matches!(result, Err(Error::UnsupportedController { .. })));
    assert!(!session.is_logged_in());
    assert!(session.topology().is_none());
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_unified_login_uses_auth_root_and_stores_token() {
    let server = MockServer::start().await;
    mount_marker(&server, ControllerTopology::Unified).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).insert_header("X-CSRF-Token", "abc123"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(config(&server));
    session.login().await.unwrap();

    assert!(session.is_unified());
    assert_eq!(session.login_path().as_deref(), Some("api/auth/login"));
    assert_eq!(session.csrf_token(), Some("abc123"));
}

#[tokio::test]
async fn test_legacy_login_path() {
    let (_server, session) = logged_in(ControllerTopology::Legacy).await;

    assert!(!session.is_unified());
    assert_eq!(session.login_path().as_deref(), Some("api/login"));
    assert_eq!(session.csrf_token(), Some("tok-1"));
}

#[tokio::test]
async fn test_rejected_login_is_authentication_error() {
    let server = MockServer::start().await;
    mount_marker(&server, ControllerTopology::Legacy).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({ "meta": { "rc": "error", "msg": "api.err.Invalid" }, "data": [] }),
        ))
        .mount(&server)
        .await;

    let mut session = Session::new(config(&server));
    let result = session.login().await;

    assert!(matches!(result, Err(Error::Authentication { status: 400 })));
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_logout_posts_to_topology_path_with_token() {
    let (server, mut session) = logged_in(ControllerTopology::Unified).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("X-CSRF-Token", "tok-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    session.logout().await.unwrap();

    assert!(!session.is_logged_in());
    assert!(session.csrf_token().is_none());
    assert!(matches!(
        session.resolve(ApiFamily::V2Site, SiteScope::SessionDefault),
        Err(Error::NotLoggedIn)
    ));
}

#[tokio::test]
async fn test_logout_without_login_is_noop() {
    let server = MockServer::start().await;
    let mut session = Session::new(config(&server));
    session.logout().await.unwrap();
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Path resolution ─────────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_before_login_fails() {
    let server = MockServer::start().await;
    let session = Session::new(config(&server));
    assert!(matches!(
        session.resolve(ApiFamily::V1Site, SiteScope::SessionDefault),
        Err(Error::NotLoggedIn)
    ));
}

#[tokio::test]
async fn test_unified_paths_carry_proxy_prefix() {
    let (server, session) = logged_in(ControllerTopology::Unified).await;
    let base = server.uri();

    assert_eq!(
        session
            .resolve(ApiFamily::V1Site, SiteScope::SessionDefault)
            .unwrap(),
        format!("{base}/proxy/network/api/s/default/")
    );
    assert_eq!(
        session.resolve(ApiFamily::V2, SiteScope::Unscoped).unwrap(),
        format!("{base}/proxy/network/v2/api/")
    );
}

// ── Request execution ───────────────────────────────────────────────

#[tokio::test]
async fn test_requests_echo_token_and_cookie() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("GET"))
        .and(path("/v2/api/site/default/device"))
        .and(header("X-CSRF-Token", "tok-1"))
        .and(header("cookie", "TOKEN=session-cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "mac": "f4:e2:c6:00:00:01", "name": "USW-Lite-8", "model": "USL8LP", "state": 1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name.as_deref(), Some("USW-Lite-8"));
    assert_eq!(devices[0].state, Some(1));
}

#[tokio::test]
async fn test_token_rotates_between_calls() {
    let (server, mut session) = logged_in(ControllerTopology::Unified).await;

    Mock::given(method("GET"))
        .and(path("/proxy/network/v2/api/site/default/clients/active"))
        .and(header("X-CSRF-Token", "tok-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Updated-CSRF-Token", "tok-2")
                .set_body_json(json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/proxy/network/v2/api/site/default/clients/active"))
        .and(header("X-CSRF-Token", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    session.list_active_clients().await.unwrap();
    assert_eq!(session.csrf_token(), Some("tok-2"));
    session.list_active_clients().await.unwrap();
}

#[tokio::test]
async fn test_response_without_token_keeps_stored_token() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("GET"))
        .and(path("/v2/api/site/default/network-members-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    session.list_network_members_groups().await.unwrap();
    assert_eq!(session.csrf_token(), Some("tok-1"));
}

#[tokio::test]
async fn test_failed_response_still_rotates_token() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("GET"))
        .and(path("/v2/api/site/default/firewall-policies"))
        .and(header("X-CSRF-Token", "tok-1"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-CSRF-Token", "tok-2")
                .set_body_string("forbidden"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/api/site/default/firewall-policies"))
        .and(header("X-CSRF-Token", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let err = session.list_firewall_policies().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(session.csrf_token(), Some("tok-2"));

    let policies = session.list_firewall_policies().await.unwrap();
    assert!(policies.is_empty());
}

#[tokio::test]
async fn test_non_2xx_maps_to_http_error_with_status() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    for (suffix, status) in [("a", 401_u16), ("b", 403), ("c", 500)] {
        Mock::given(method("GET"))
            .and(path(format!("/v2/api/site/default/{suffix}")))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;

        let result = session
            .read(
                suffix,
                ApiFamily::V2Site,
                &RequestParams::none(),
                SiteScope::SessionDefault,
            )
            .await;

        match result {
            Err(Error::Http { status: got, body }) => {
                assert_eq!(got, status);
                assert_eq!(body, "nope");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_error_envelope_maps_to_api_error() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/rest/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "meta": { "rc": "error", "msg": "api.err.FixedIpAlreadyUsed" }, "data": [] }),
        ))
        .mount(&server)
        .await;

    let result = session
        .add_dhcp_reservation(&DhcpReservation::new("aa:bb:cc:dd:ee:ff"))
        .await;

    match result {
        Err(Error::Api { message }) => assert_eq!(message, "api.err.FixedIpAlreadyUsed"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

// ── Endpoints ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_grouped_device_listing() {
    let (server, mut session) = logged_in(ControllerTopology::Unified).await;

    Mock::given(method("GET"))
        .and(path("/proxy/network/v2/api/site/default/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "network_devices": [ { "mac": "aa:aa:aa:aa:aa:aa" }, { "mac": "bb:bb:bb:bb:bb:bb" } ],
            "protect_devices": []
        })))
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1].mac.as_deref(), Some("bb:bb:bb:bb:bb:bb"));
}

#[tokio::test]
async fn test_client_history_query_parameters() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("GET"))
        .and(path("/v2/api/site/default/clients/history"))
        .and(query_param("onlyNonBlocked", "false"))
        .and(query_param("includeUnifiDevices", "true"))
        .and(query_param("withinHours", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "mac": "aa:bb:cc:dd:ee:ff", "hostname": "laptop", "type": "WIRELESS" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let clients = session
        .client_history(ClientHistoryQuery {
            only_non_blocked: false,
            within_hours: 24,
            ..ClientHistoryQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].label(), "laptop");
    assert_eq!(clients[0].client_type.as_deref(), Some("WIRELESS"));
}

#[tokio::test]
async fn test_firewall_policy_paths() {
    let (server, mut session) = logged_in(ControllerTopology::Unified).await;

    let policy = json!({
        "_id": "p1",
        "name": "Allow partners",
        "description": "wl001",
        "source": { "matching_target": "IP", "ips": ["1.2.3.4"] },
        "destination": {}
    });

    Mock::given(method("GET"))
        .and(path("/proxy/network/v2/api/site/default/firewall-policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([policy])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/proxy/network/v2/api/site/default/firewall-policies/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(policy.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let all = session.list_firewall_policies().await.unwrap();
    assert_eq!(all.len(), 1);

    let one = session.get_firewall_policy("p1").await.unwrap();
    assert_eq!(one.id, "p1");
    assert_eq!(one.description.as_deref(), Some("wl001"));
}

#[tokio::test]
async fn test_firewall_policy_update_puts_whole_policy() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    let mut policy: unifi_ng_api::FirewallPolicy = serde_json::from_value(json!({
        "_id": "p1",
        "description": "wl001",
        "index": 10000,
        "source": { "matching_target": "IP", "ips": ["1.2.3.4"] },
        "destination": {}
    }))
    .unwrap();
    policy.source.ips = Some(vec!["93.184.215.14".into()]);

    Mock::given(method("PUT"))
        .and(path("/v2/api/site/default/firewall-policies/p1"))
        .and(header("X-CSRF-Token", "tok-1"))
        .and(body_partial_json(json!({
            "_id": "p1",
            "index": 10000,
            "source": { "matching_target": "IP", "ips": ["93.184.215.14"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "p1" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = session.update_firewall_policy("p1", &policy).await.unwrap();
    assert_eq!(resp["_id"], "p1");
}

#[tokio::test]
async fn test_group_add_and_update_post_same_endpoint() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("POST"))
        .and(path("/v2/api/site/default/network-members-group"))
        .and(body_json(json!({
            "name": "cameras",
            "members": ["aa:bb:cc:dd:ee:01"],
            "type": "CLIENTS"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "g1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/api/site/default/network-members-group"))
        .and(body_partial_json(json!({ "id": "g1", "name": "cameras" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "g1" })))
        .expect(1)
        .mount(&server)
        .await;

    let group = NetworkMembersGroup::new("cameras", vec!["aa:bb:cc:dd:ee:01".into()]);
    session.add_network_members_group(&group).await.unwrap();

    let mut updated = group.clone();
    updated.members.push("aa:bb:cc:dd:ee:02".into());
    session
        .update_network_members_group("g1", &updated)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sites_overview_is_unscoped() {
    let (server, mut session) = logged_in(ControllerTopology::Unified).await;

    Mock::given(method("POST"))
        .and(path("/proxy/network/v2/api/sites/overview"))
        .and(body_json(
            json!({ "pageSize": 1000, "pageNumber": 0, "searchText": "" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": "s1", "name": "default", "description": "Default" } ],
            "totalCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sites = session
        .sites_overview(&SitesOverviewQuery::default())
        .await
        .unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].description.as_deref(), Some("Default"));
}

#[tokio::test]
async fn test_explicit_site_scope() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("GET"))
        .and(path("/api/s/branch/rest/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    session
        .read(
            "rest/user",
            ApiFamily::V1Site,
            &RequestParams::none(),
            SiteScope::Site("branch"),
        )
        .await
        .unwrap();
}

// ── Batch upload ────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_records_failures_and_continues() {
    let (server, mut session) = logged_in(ControllerTopology::Legacy).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/rest/user"))
        .and(body_partial_json(json!({ "mac": "00:00:00:00:00:02" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({ "meta": { "rc": "error", "msg": "api.err.MacUsed" }, "data": [] }),
        ))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/rest/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!([{ "mac": "00:00:00:00:00:00", "_id": "u1" }]))),
        )
        .expect(2)
        .mount(&server)
        .await;

    let records: Vec<DhcpReservation> = (1..=3)
        .map(|i| {
            let mut r = DhcpReservation::new(format!("00:00:00:00:00:0{i}"));
            r.fixed_ip = Some(format!("192.168.1.{}", 10 + i));
            r.apply_implied_flags();
            r
        })
        .collect();

    let report = session.upload_reservations(records).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.n_failed(), 1);
    assert_eq!(report.failed[0].index, 1);
    assert_eq!(report.failed[0].record.mac, "00:00:00:00:00:02");
    assert_eq!(report.failed[0].error.status(), Some(400));
}

#[tokio::test]
async fn test_batch_before_login_aborts() {
    let server = MockServer::start().await;
    let mut session = Session::new(config(&server));

    let result = session
        .upload_reservations([DhcpReservation::new("aa:bb:cc:dd:ee:ff")])
        .await;
    assert!(matches!(result, Err(Error::NotLoggedIn)));
}
