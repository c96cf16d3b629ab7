//! Sign-in / action / sign-out bracket against a mock portal.

use adt_pulse::{ClientConfig, PortalClient};
use adt_pulse_cli::{run, Action, Credentials};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─────────────────────── helpers ───────────────────────

fn credentials() -> Credentials {
    Credentials {
        username: "alice".to_string(),
        password: "hunter2".to_string(),
    }
}

fn client(server: &MockServer) -> PortalClient {
    PortalClient::new(ClientConfig::with_base_url(server.uri())).unwrap()
}

async fn mount_sign_in(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/mobile/access/signin.jsp"))
        .respond_with(
            ResponseTemplate::new(status).insert_header("location", "/mobile/summary/summary.jsp"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_sign_out(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/mobile/access/signout.jsp"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/mobile/access/signin.jsp"),
        )
        .expect(times)
        .mount(server)
        .await;
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn test_modes_json_and_sign_out() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 302).await;
    mount_sign_out(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/mobile/quickcontrol/mode.jsp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<form><input type="hidden" name="shiftModeId" value="4"><input type="submit" value="Vacation"></form>"#,
        ))
        .mount(&server)
        .await;

    let out = run(&client(&server), &credentials(), &Action::Modes, true)
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["id"], 4);
    assert_eq!(parsed[0]["label"], "Vacation");
}

#[tokio::test]
async fn test_rejected_sign_in_stops_early() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 200).await;
    mount_sign_out(&server, 0).await;

    let err = run(&client(&server), &credentials(), &Action::Status, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("sign in failed"));
}

#[tokio::test]
async fn test_failed_action_still_signs_out() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 302).await;
    mount_sign_out(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/mobile/summary/summary.jsp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let err = run(&client(&server), &credentials(), &Action::Status, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("reading summary"));
}
