#![allow(clippy::unwrap_used)]
// Integration tests for `BraviaClient` against a wiremock stand-in for the set.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::UdpSocket;
use url::Url;
use wiremock::matchers::{body_partial_json, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bravia_api::system::DEFAULT_POWER_CODE;
use bravia_api::wol::{WOL_REPEAT, magic_packet};
use bravia_api::{BraviaClient, Error, MacAddress, PowerStatus, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BraviaClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BraviaClient::with_client(
        reqwest::Client::new(),
        base_url,
        None,
        TransportConfig::default(),
    );
    (server, client)
}

/// Mount a JSON-channel answer for `rpc_method` on `service`.
async fn answer(server: &MockServer, service: &str, rpc_method: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/sony/{service}")))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Bodies of every JSON call the server received for `rpc_method`.
async fn calls(server: &MockServer, rpc_method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .filter(|body| body["method"] == rpc_method)
        .collect()
}

/// Mount `first` for one call on `service`/`rpc_method`, then `then` for
/// every later call.
async fn answer_twice(server: &MockServer, service: &str, rpc_method: &str, first: Value, then: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/sony/{service}")))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .up_to_n_times(1)
        .mount(server)
        .await;
    answer(server, service, rpc_method, then).await;
}

fn pin(raw: &str) -> SecretString {
    raw.to_owned().into()
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_success_stores_cookie_and_enables_wol() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/accessControl"))
        .and(header("authorization", "Basic OjEyMzQ="))
        .and(body_partial_json(json!({
            "method": "actRegister",
            "params": [
                { "clientid": "client-1", "nickname": "Living room", "level": "private" },
                [{ "value": "yes", "function": "WOL" }]
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "auth=abc123; Path=/; Max-Age=1209600")
                .set_body_json(json!({ "result": [], "id": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    answer(
        &server,
        "system",
        "getSystemInformation",
        json!({ "result": [{ "product": "TV", "macAddr": "FC:F1:52:AA:BB:CC", "cid": "TV-42" }] }),
    )
    .await;
    answer(&server, "system", "getWolMode", json!({ "result": [{ "enabled": false }] })).await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .and(header("cookie", "auth=abc123"))
        .and(body_partial_json(json!({ "method": "setWolMode", "params": [{ "enabled": true }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let ok = client
        .authenticate(&pin("1234"), "client-1", "Living room")
        .await
        .unwrap();

    assert!(ok);
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().cookies.get("auth"), Some("abc123"));
    assert_eq!(client.uid(), Some("TV-42"));
    assert_eq!(client.mac(), Some("fc:f1:52:aa:bb:cc".parse::<MacAddress>().unwrap()));
}

#[tokio::test]
async fn test_authenticate_skips_wol_when_already_enabled() {
    let (server, mut client) = setup().await;

    answer(&server, "accessControl", "actRegister", json!({ "result": [] })).await;
    answer(&server, "system", "getSystemInformation", json!({ "result": [{ "cid": "x" }] })).await;
    answer(&server, "system", "getWolMode", json!({ "result": [{ "enabled": true }] })).await;

    assert!(client.authenticate(&pin(""), "c", "n").await.unwrap());
    assert!(calls(&server, "setWolMode").await.is_empty());

    // An empty PIN still sends a Basic credential: base64(":")
    let register = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/sony/accessControl")
        .unwrap();
    assert_eq!(
        register.headers.get("authorization").unwrap().to_str().unwrap(),
        "Basic Og=="
    );
}

#[tokio::test]
async fn test_authenticate_false_on_error_object() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "accessControl",
        "actRegister",
        json!({ "error": [401, "Unauthorized"], "id": 1 }),
    )
    .await;

    let ok = client.authenticate(&pin("0000"), "c", "n").await.unwrap();

    assert!(!ok);
    assert!(calls(&server, "getSystemInformation").await.is_empty());
}

#[tokio::test]
async fn test_authenticate_false_on_error_object_with_http_error_status() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/accessControl"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": [401, "Unauthorized"] })),
        )
        .mount(&server)
        .await;

    assert!(!client.authenticate(&pin("0000"), "c", "n").await.unwrap());
}

#[tokio::test]
async fn test_authenticate_false_when_unreachable() {
    let mut client = BraviaClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1/").unwrap(),
        None,
        TransportConfig::default(),
    );

    assert!(!client.authenticate(&pin("1234"), "c", "n").await.unwrap());
}

// ── Transport behaviour ─────────────────────────────────────────────

#[tokio::test]
async fn test_not_found_is_no_ip_control() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.get_system_info().await;
    assert!(
        matches!(result, Err(Error::NoIpControl)),
        "expected NoIpControl, got: {result:?}"
    );
}

#[tokio::test]
async fn test_not_found_on_accesscontrol_is_no_ip_control() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/accessControl"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.authenticate(&pin("1234"), "c", "n").await;
    assert!(result.unwrap_err().is_unsupported());
}

#[tokio::test]
async fn test_malformed_body_is_soft_failure() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let info = client.get_system_info().await.unwrap();
    assert!(info.is_empty());
}

#[tokio::test]
async fn test_send_json_builds_envelope_and_posts_to_service() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .mount(&server)
        .await;

    client.turn_off().await.unwrap();

    let sent = calls(&server, "setPowerStatus").await;
    assert_eq!(
        sent,
        vec![json!({ "method": "setPowerStatus", "params": [{ "status": false }], "id": 1, "version": "1.0" })]
    );
}

#[tokio::test]
async fn test_later_cookies_merge_with_auth_cookie() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/accessControl"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "auth=abc123; Path=/")
                .set_body_json(json!({ "result": [] })),
        )
        .mount(&server)
        .await;
    answer(&server, "system", "getWolMode", json!({ "result": [{ "enabled": true }] })).await;
    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .and(body_partial_json(json!({ "method": "getSystemInformation" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "lang=en; Path=/")
                .set_body_json(json!({ "result": [{ "cid": "x" }] })),
        )
        .mount(&server)
        .await;

    assert!(client.authenticate(&pin("1234"), "c", "n").await.unwrap());

    assert_eq!(client.session().cookies.get("auth"), Some("abc123"));
    assert_eq!(client.session().cookies.get("lang"), Some("en"));

    let wol_read = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .rev()
        .find(|r| r.url.path() == "/sony/system")
        .unwrap();
    assert_eq!(
        wol_read.headers.get("cookie").unwrap().to_str().unwrap(),
        "auth=abc123; lang=en"
    );
}

// ── System ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_system_info_is_cached() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .and(body_partial_json(json!({ "method": "getSystemInformation" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "model": "KD-65XF9005", "macAddr": "01:02:03:04:05:06", "cid": "abc" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = client.get_system_info().await.unwrap();
    let second = client.get_system_info().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.model.as_deref(), Some("KD-65XF9005"));
}

#[tokio::test]
async fn test_system_info_does_not_override_configured_mac() {
    let server = MockServer::start().await;
    let configured: MacAddress = "aa:aa:aa:aa:aa:aa".parse().unwrap();
    let mut client = BraviaClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Some(configured),
        TransportConfig::default(),
    );

    answer(
        &server,
        "system",
        "getSystemInformation",
        json!({ "result": [{ "macAddr": "01:02:03:04:05:06" }] }),
    )
    .await;

    client.get_system_info().await.unwrap();
    assert_eq!(client.mac(), Some(configured));
}

#[tokio::test]
async fn test_system_info_mistyped_field_keeps_mac_backfill() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "system",
        "getSystemInformation",
        json!({ "result": [{ "model": 55, "macAddr": "01:02:03:04:05:06", "cid": "abc" }] }),
    )
    .await;

    let info = client.get_system_info().await.unwrap();

    assert_eq!(info.model, None);
    assert_eq!(client.mac().unwrap().to_string(), "01:02:03:04:05:06");
    assert_eq!(client.uid(), Some("abc"));
}

#[tokio::test]
async fn test_power_status_values() {
    let (server, mut client) = setup().await;

    answer(&server, "system", "getPowerStatus", json!({ "result": [{ "status": "standby" }] })).await;

    assert_eq!(client.get_power_status().await.unwrap(), PowerStatus::Standby);
}

#[tokio::test]
async fn test_power_status_without_answer_reads_off() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .respond_with(ResponseTemplate::new(503).set_body_string(""))
        .mount(&server)
        .await;

    assert_eq!(client.get_power_status().await.unwrap(), PowerStatus::Off);
    assert!(!client.is_connected().await.unwrap());
}

#[tokio::test]
async fn test_power_status_gives_up_after_short_timeout() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .and(body_partial_json(json!({ "method": "getPowerStatus" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": [{ "status": "active" }] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let status = client.get_power_status().await.unwrap();

    assert_eq!(status, PowerStatus::Off);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_turn_on_standby_sends_fallback_code_and_power_status() {
    let server = MockServer::start().await;
    let listener = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let mac: MacAddress = "01:02:03:04:05:06".parse().unwrap();
    let mut client = BraviaClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Some(mac),
        TransportConfig::default(),
    )
    .with_wol_target(listener.local_addr().unwrap());

    answer(&server, "system", "getPowerStatus", json!({ "result": [{ "status": "standby" }] })).await;
    answer(
        &server,
        "system",
        "getRemoteControllerInfo",
        json!({ "result": [{ "bundled": true }, []] }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/sony/IRCC"))
        .and(body_string_contains(format!("<IRCCCode>{DEFAULT_POWER_CODE}</IRCCCode>")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .and(body_partial_json(json!({ "method": "setPowerStatus", "params": [{ "status": true }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.turn_on().await.unwrap();

    let mut buf = [0u8; 256];
    for _ in 0..WOL_REPEAT {
        let (len, _) = listener.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], magic_packet(mac).as_slice());
    }
}

#[tokio::test]
async fn test_turn_on_active_skips_fallback() {
    let (server, mut client) = setup().await;

    answer(&server, "system", "getPowerStatus", json!({ "result": [{ "status": "active" }] })).await;
    Mock::given(method("POST"))
        .and(path("/sony/IRCC"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client.turn_on().await.unwrap();
    assert!(calls(&server, "setPowerStatus").await.is_empty());
}

#[tokio::test]
async fn test_wake_without_mac_is_an_error() {
    let (_server, client) = setup().await;
    assert!(matches!(client.wake().await, Err(Error::MissingMac)));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_media_play_sends_catalog_code_over_ircc() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/system"))
        .and(body_partial_json(json!({ "method": "getRemoteControllerInfo" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "bundled": true, "type": "RM-J1100" },
                [
                    { "name": "Play", "value": "AAAAAgAAAJcAAAAaAw==" },
                    { "name": "Pause", "value": "AAAAAgAAAJcAAAAZAw==" }
                ]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sony/IRCC"))
        .and(header_exists("soapaction"))
        .and(body_string_contains("<IRCCCode>AAAAAgAAAJcAAAAaAw==</IRCCCode>"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .expect(1)
        .mount(&server)
        .await;

    client.media_play().await.unwrap();

    // Catalog is cached: a second lookup doesn't refetch.
    assert_eq!(
        client.get_command_code("Pause").await.unwrap().as_deref(),
        Some("AAAAAgAAAJcAAAAZAw==")
    );
    assert_eq!(client.commands().len(), 2);
}

#[tokio::test]
async fn test_refresh_commands_replaces_catalog() {
    let (server, mut client) = setup().await;

    answer_twice(
        &server,
        "system",
        "getRemoteControllerInfo",
        json!({ "result": [{}, [
            { "name": "Play", "value": "AAAAAgAAAJcAAAAaAw==" },
            { "name": "Num1", "value": "AAAAAQAAAAEAAAAAAw==" }
        ]] }),
        json!({ "result": [{}, [{ "name": "Play", "value": "AAAAAgAAAJcAAAAaAw==" }]] }),
    )
    .await;

    assert_eq!(client.refresh_commands().await.unwrap().len(), 2);
    let reloaded: Vec<String> = client.refresh_commands().await.unwrap().keys().cloned().collect();

    assert_eq!(reloaded, vec!["Play".to_owned()]);
    assert_eq!(client.get_command_code("Num1").await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_command_is_silent_noop() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "system",
        "getRemoteControllerInfo",
        json!({ "result": [{}, [{ "name": "Play", "value": "AAAA" }]] }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/sony/IRCC"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client.media_previous_track().await.unwrap();
    assert_eq!(client.get_command_code("Nope").await.unwrap(), None);
}

#[tokio::test]
async fn test_control_code_returns_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/IRCC"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<s:Envelope/>"))
        .mount(&server)
        .await;

    let body = client.send_control_code("AAAAAQAAAAEAAAAvAw==").await.unwrap();
    assert_eq!(body.as_ref(), b"<s:Envelope/>");
}

// ── Audio ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_volume_level_sends_rounded_percent() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/audio"))
        .and(body_partial_json(json!({
            "method": "setAudioVolume",
            "params": [{ "target": "speaker", "volume": "37" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [0] })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_volume_level(0.37, "speaker").await.unwrap();
}

#[tokio::test]
async fn test_volume_steps() {
    let (server, mut client) = setup().await;

    answer(&server, "audio", "setAudioVolume", json!({ "result": [0] })).await;

    client.volume_up("speaker").await.unwrap();
    client.volume_down("headphone").await.unwrap();

    let sent: Vec<Value> = calls(&server, "setAudioVolume")
        .await
        .into_iter()
        .map(|b| b["params"][0].clone())
        .collect();
    assert_eq!(
        sent,
        vec![
            json!({ "target": "speaker", "volume": "+1" }),
            json!({ "target": "headphone", "volume": "-1" }),
        ]
    );
}

#[tokio::test]
async fn test_volume_info_selects_output() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "audio",
        "getVolumeInformation",
        json!({ "result": [[
            { "target": "headphone", "volume": 5, "mute": false, "maxVolume": 100, "minVolume": 0 },
            { "target": "speaker", "volume": 18, "mute": true, "maxVolume": 100, "minVolume": 0 }
        ]] }),
    )
    .await;

    let info = client.get_volume_info("speaker").await.unwrap();
    assert_eq!(info.volume, Some(18));
    assert_eq!(info.mute, Some(true));
    assert_eq!(client.get_volume_level("headphone").await.unwrap(), Some(0.05));
    assert!(client.get_volume_info("hdmi").await.unwrap().is_empty());

    let outputs: Vec<String> = client.get_audio_outputs().await.unwrap().into_iter().collect();
    assert_eq!(outputs, vec!["headphone".to_owned(), "speaker".to_owned()]);
}

#[tokio::test]
async fn test_mute_toggle_unmutes_when_muted() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "audio",
        "getVolumeInformation",
        json!({ "result": [[{ "target": "speaker", "volume": 10, "mute": true }]] }),
    )
    .await;
    answer(&server, "audio", "setAudioMute", json!({ "result": [0] })).await;

    client.mute_volume().await.unwrap();

    assert_eq!(calls(&server, "setAudioMute").await[0]["params"], json!([{ "status": false }]));
}

#[tokio::test]
async fn test_mute_toggle_reads_mute_despite_mistyped_volume() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "audio",
        "getVolumeInformation",
        json!({ "result": [[{ "target": "speaker", "volume": "loud", "mute": true }]] }),
    )
    .await;
    answer(&server, "audio", "setAudioMute", json!({ "result": [0] })).await;

    client.mute_volume().await.unwrap();

    assert_eq!(calls(&server, "setAudioMute").await[0]["params"], json!([{ "status": false }]));
}

/// With no volume information the toggle can't know the current state and
/// always mutes; it never unmutes in that case.
#[tokio::test]
async fn test_mute_toggle_without_volume_info_always_mutes() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/audio"))
        .and(body_partial_json(json!({ "method": "getVolumeInformation" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("not json"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sony/audio"))
        .and(body_partial_json(json!({ "method": "setAudioMute", "params": [{ "status": true }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [0] })))
        .expect(1)
        .mount(&server)
        .await;

    client.mute_volume().await.unwrap();
}

// ── Sources, apps, scenes ───────────────────────────────────────────

#[tokio::test]
async fn test_channel_pagination_pages_of_fifty() {
    let (server, mut client) = setup().await;

    answer(&server, "avContent", "getContentCount", json!({ "result": [{ "count": 120 }] })).await;
    answer(
        &server,
        "avContent",
        "getContentList",
        json!({ "result": [[{ "title": "Channel", "uri": "tv:dvbt?trip=1" }]] }),
    )
    .await;

    client.get_source("tv:dvbt").await.unwrap();

    let pages: Vec<(u64, u64)> = calls(&server, "getContentList")
        .await
        .iter()
        .map(|b| {
            let p = &b["params"][0];
            (p["stIdx"].as_u64().unwrap(), p["cnt"].as_u64().unwrap())
        })
        .collect();
    assert_eq!(pages, vec![(0, 50), (50, 50), (100, 20)]);
}

#[tokio::test]
async fn test_list_sources_merges_apps_last() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/avContent"))
        .and(body_partial_json(json!({ "method": "getSourceList", "params": [{ "scheme": "extInput" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [[{ "source": "extInput:hdmi" }]]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sony/avContent"))
        .and(body_partial_json(json!({ "method": "getSourceList", "params": [{ "scheme": "tv" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [[]] })))
        .mount(&server)
        .await;
    answer(&server, "avContent", "getContentCount", json!({ "result": [{ "count": 3 }] })).await;
    answer(
        &server,
        "avContent",
        "getContentList",
        json!({ "result": [[
            { "title": "  HDMI 1  ", "uri": "extInput:hdmi?port=1" },
            { "title": "Netflix", "uri": "extInput:hdmi?port=2" },
            { "title": "   ", "uri": "extInput:hdmi?port=3" }
        ]] }),
    )
    .await;
    answer(
        &server,
        "appControl",
        "getApplicationList",
        json!({ "result": [[
            { "title": "Netflix", "uri": "com.sony.dtv.com.netflix.ninja" },
            { "title": "YouTube", "uri": "com.sony.dtv.com.google.android.youtube.tv" }
        ]] }),
    )
    .await;

    let sources = client.list_sources().await.unwrap();

    let titles: Vec<&str> = sources.keys().map(String::as_str).collect();
    assert_eq!(titles, vec!["HDMI 1", "Netflix", "YouTube"]);
    assert_eq!(sources["Netflix"], "com.sony.dtv.com.netflix.ninja");
    assert_eq!(client.sources().len(), 3);
}

#[tokio::test]
async fn test_app_titles_trimmed_and_untitled_apps_skipped() {
    let (server, mut client) = setup().await;

    answer(&server, "avContent", "getSourceList", json!({ "result": [[]] })).await;
    answer(
        &server,
        "appControl",
        "getApplicationList",
        json!({ "result": [[
            { "title": "  Netflix ", "uri": "com.netflix" },
            { "title": "   ", "uri": "com.blank" },
            { "uri": "com.untitled" }
        ]] }),
    )
    .await;

    let sources = client.list_sources().await.unwrap();

    let titles: Vec<&str> = sources.keys().map(String::as_str).collect();
    assert_eq!(titles, vec!["Netflix"]);
    assert_eq!(client.apps().len(), 1);
    assert_eq!(client.apps()["Netflix"], "com.netflix");
}

#[tokio::test]
async fn test_list_apps_reload_drops_removed_apps() {
    let (server, mut client) = setup().await;

    answer_twice(
        &server,
        "appControl",
        "getApplicationList",
        json!({ "result": [[
            { "title": "Netflix", "uri": "com.netflix" },
            { "title": "YouTube", "uri": "com.youtube" }
        ]] }),
        json!({ "result": [[{ "title": "YouTube", "uri": "com.youtube" }]] }),
    )
    .await;

    assert_eq!(client.list_apps().await.unwrap().len(), 2);
    let reloaded = client.list_apps().await.unwrap();

    assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["YouTube"]);
    assert!(!client.apps().contains_key("Netflix"));
}

#[tokio::test]
async fn test_select_source_routes_apps_and_inputs() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "avContent",
        "getSourceList",
        json!({ "result": [[{ "source": "extInput:hdmi" }]] }),
    )
    .await;
    answer(&server, "avContent", "getContentCount", json!({ "result": [{ "count": 1 }] })).await;
    answer(
        &server,
        "avContent",
        "getContentList",
        json!({ "result": [[{ "title": "HDMI 2", "uri": "extInput:hdmi?port=2" }]] }),
    )
    .await;
    answer(
        &server,
        "appControl",
        "getApplicationList",
        json!({ "result": [[{ "title": "Netflix", "uri": "com.netflix" }]] }),
    )
    .await;
    answer(&server, "appControl", "setActiveApp", json!({ "result": [] })).await;
    answer(&server, "avContent", "setPlayContent", json!({ "result": [] })).await;

    client.select_source("Netflix").await.unwrap();
    client.select_source("HDMI 2").await.unwrap();
    client.select_source("Missing").await.unwrap();

    assert_eq!(
        calls(&server, "setActiveApp").await[0]["params"],
        json!([{ "uri": "com.netflix" }])
    );
    assert_eq!(
        calls(&server, "setPlayContent").await[0]["params"],
        json!([{ "uri": "extInput:hdmi?port=2" }])
    );
    // Lazy load happened once for both selections.
    assert_eq!(calls(&server, "getApplicationList").await.len(), 1);
}

#[tokio::test]
async fn test_start_app_loads_app_list_once() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sony/appControl"))
        .and(body_partial_json(json!({ "method": "getApplicationList" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [[{ "title": "YouTube", "uri": "com.youtube" }]]
        })))
        .expect(1)
        .mount(&server)
        .await;
    answer(&server, "appControl", "setActiveApp", json!({ "result": [] })).await;

    client.start_app("YouTube").await.unwrap();
    client.start_app("Unknown").await.unwrap();

    assert_eq!(calls(&server, "setActiveApp").await.len(), 1);
}

#[tokio::test]
async fn test_scenes_capitalized_and_selectable() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "videoScreen",
        "getSceneSetting",
        json!({ "result": [{
            "currentValue": "cinema",
            "candidate": [{ "value": "auto" }, { "value": "cinema" }, { "value": "sports" }]
        }] }),
    )
    .await;
    answer(&server, "videoScreen", "setSceneSetting", json!({ "result": [] })).await;

    let scenes = client.list_scenes().await.unwrap();
    let keys: Vec<&str> = scenes.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Auto", "Cinema", "Sports"]);
    assert_eq!(client.get_current_scene().await.unwrap().as_deref(), Some("cinema"));

    client.set_scene("Sports").await.unwrap();
    client.set_scene("sports").await.unwrap();

    let sent = calls(&server, "setSceneSetting").await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["params"], json!([{ "value": "sports" }]));
}

#[tokio::test]
async fn test_list_scenes_reload_drops_removed_scenes() {
    let (server, mut client) = setup().await;

    answer_twice(
        &server,
        "videoScreen",
        "getSceneSetting",
        json!({ "result": [{ "candidate": [{ "value": "auto" }, { "value": "game" }] }] }),
        json!({ "result": [{ "candidate": [{ "value": "cinema" }] }] }),
    )
    .await;

    client.list_scenes().await.unwrap();
    let reloaded = client.list_scenes().await.unwrap();

    assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["Cinema"]);
    assert_eq!(client.scenes().len(), 1);
}

#[tokio::test]
async fn test_playing_info() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "avContent",
        "getPlayingContentInfo",
        json!({ "result": [{
            "programTitle": "News",
            "title": "BBC One",
            "programMediaType": "tv",
            "dispNum": "001",
            "source": "tv:dvbt",
            "uri": "tv:dvbt?trip=9018.4164.4287",
            "durationSec": 1800,
            "startDateTime": "2024-03-01T18:00:00+0000"
        }] }),
    )
    .await;

    let playing = client.get_playing_info().await.unwrap();
    assert_eq!(playing.title.as_deref(), Some("BBC One"));
    assert_eq!(playing.disp_num.as_deref(), Some("001"));
    assert_eq!(playing.duration_sec, Some(1800));
    assert!(playing.start_time().is_some());
}

#[tokio::test]
async fn test_playing_info_empty_on_device_error() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "avContent",
        "getPlayingContentInfo",
        json!({ "error": [7, "Illegal State"] }),
    )
    .await;

    assert!(client.get_playing_info().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_playing_info_keeps_fields_around_a_mistyped_one() {
    let (server, mut client) = setup().await;

    answer(
        &server,
        "avContent",
        "getPlayingContentInfo",
        json!({ "result": [{ "title": "BBC One", "uri": "tv:dvbt?trip=1", "durationSec": -1 }] }),
    )
    .await;

    let playing = client.get_playing_info().await.unwrap();
    assert_eq!(playing.title.as_deref(), Some("BBC One"));
    assert_eq!(playing.uri.as_deref(), Some("tv:dvbt?trip=1"));
    assert_eq!(playing.duration_sec, None);
}
