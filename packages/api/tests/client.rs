//! Auth client behaviour against a mock auth backend.

use std::time::Duration;

use api::{AuthClient, AuthError, ErrorKind, Provider, SocialProvider};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> Value {
    json!({
        "id": "u1",
        "email": "a@b.com",
        "name": "Ada",
        "image": null,
        "emailVerified": true
    })
}

fn session_json() -> Value {
    json!({
        "session": {
            "id": "s1",
            "userId": "u1",
            "expiresAt": "2099-01-01T00:00:00Z",
            "provider": "credential"
        },
        "user": user_json()
    })
}

async fn mount_session(server: &MockServer, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// A `get-session` answer that arrives late and only once; later calls fall through to
/// the mocks mounted after it.
async fn mount_slow_session_once(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_sign_in_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in/email"))
        .and(body_json(json!({"email": "a@b.com", "password": "secret123"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "t", "user": user_json()})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_credentials_never_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    for (email, password) in [("", "secret123"), ("a@b.com", ""), ("  ", " "), ("not-an-email", "x")] {
        let err = client.sign_in().password(email, password).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{email:?}/{password:?}");
    }
    let err = client.sign_up("a@b.com", "secret123", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_password_sign_in_notifies_every_observer_once() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;
    mount_session(&server, session_json(), 1).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let mut first = client.subscribe();
    let mut second = client.clone().subscribe();
    assert!(first.current().is_none());

    let session = client.sign_in().password("a@b.com", "secret123").await.unwrap();
    assert_eq!(session.user.email, "a@b.com");
    assert_eq!(session.provider, Some(Provider::Credential));

    for observer in [&mut first, &mut second] {
        assert!(observer.has_changed());
        let seen = observer.changed().await.unwrap();
        assert_eq!(seen.as_ref().map(|s| s.id.as_str()), Some("s1"));
        assert!(!observer.has_changed());
    }

    // Served from the fresh cache: no second get-session call.
    let cached = client.get_session().await.unwrap();
    assert_eq!(cached, Some(session));
    assert!(!first.has_changed());
}

#[tokio::test]
async fn test_unknown_user_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "INVALID_EMAIL_OR_PASSWORD",
            "message": "Invalid email or password"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_session(&server, session_json(), 0).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let observer = client.subscribe();

    let err = client
        .sign_in()
        .password("a@b.com", "secret123")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert!(!err.is_retryable());
    assert!(client.cached_session().is_none());
    assert!(!observer.has_changed());
}

#[tokio::test]
async fn test_sign_out_clears_session_when_signed_in() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;
    mount_session(&server, session_json(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-out"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    client.sign_in().password("a@b.com", "secret123").await.unwrap();
    let mut observer = client.subscribe();

    client.sign_out().await.unwrap();
    assert!(client.cached_session().is_none());
    assert_eq!(observer.changed().await.unwrap(), None);
}

#[tokio::test]
async fn test_sign_out_clears_session_even_when_request_fails() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;
    mount_session(&server, session_json(), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-out"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    client.sign_in().password("a@b.com", "secret123").await.unwrap();

    let err = client.sign_out().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert!(client.cached_session().is_none());
}

#[tokio::test]
async fn test_sign_out_wins_over_running_check() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_slow_session_once(&server, session_json()).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-out"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    client.sign_in().password("a@b.com", "secret123").await.unwrap();
    let mut observer = client.subscribe();

    // A background check that still sees the old session on the backend.
    let background = client.clone();
    let check = tokio::spawn(async move { background.refresh_session().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    client.sign_out().await.unwrap();
    assert!(client.cached_session().is_none());

    assert_eq!(check.await.unwrap().unwrap(), None);
    assert!(client.cached_session().is_none());
    assert_eq!(observer.changed().await.unwrap(), None);
    assert!(!observer.has_changed());
}

#[tokio::test]
async fn test_password_sign_in_during_running_check() {
    let server = MockServer::start().await;
    // The check started before sign-in answers "anonymous", late.
    mount_slow_session_once(&server, Value::Null).await;
    mount_session(&server, session_json(), 1).await;
    mount_sign_in_ok(&server).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let mut observer = client.subscribe();

    let background = client.clone();
    let check = tokio::spawn(async move { background.get_session().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let session = client.sign_in().password("a@b.com", "secret123").await.unwrap();
    assert_eq!(session.id, "s1");
    assert!(check.await.unwrap().is_ok());

    let seen = observer.changed().await.unwrap();
    assert_eq!(seen.map(|s| s.id), Some("s1".to_string()));
    assert!(!observer.has_changed());
    assert_eq!(client.cached_session().map(|s| s.id), Some("s1".to_string()));
}

#[tokio::test]
async fn test_sign_out_when_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-out"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let observer = client.subscribe();
    client.sign_out().await.unwrap();
    assert!(client.cached_session().is_none());
    assert!(!observer.has_changed());
}

#[tokio::test]
async fn test_oauth_initiation_yields_only_a_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in/social"))
        .and(body_json(json!({
            "provider": "github",
            "callbackURL": "/dashboard",
            "errorCallbackURL": "/login"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://github.com/login/oauth/authorize?client_id=gh-id&state=xyz",
            "redirect": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_session(&server, session_json(), 0).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let observer = client.subscribe();

    let redirect = client.sign_in().github().await.unwrap();
    assert_eq!(redirect.provider, SocialProvider::GitHub);
    assert_eq!(redirect.url.host_str(), Some("github.com"));
    assert!(client.cached_session().is_none());
    assert!(!observer.has_changed());
}

#[tokio::test]
async fn test_oauth_initiation_failure_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in/social"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PROVIDER_NOT_FOUND",
            "message": "Provider not found"
        })))
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri())
        .unwrap()
        .with_callback_urls("/home", "/login");
    let err = client.sign_in().google().await.unwrap_err();
    assert_eq!(err, AuthError::Provider("Provider not found".into()));
}

#[tokio::test]
async fn test_resume_after_redirect() {
    let server = MockServer::start().await;
    mount_session(&server, session_json(), 1).await;

    let client = AuthClient::new(&server.uri()).unwrap();

    let err = client
        .resume_after_redirect("?error=account_not_linked")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderError);

    let session = client.resume_after_redirect("").await.unwrap();
    assert_eq!(session.map(|s| s.user.id), Some("u1".to_string()));
}

#[tokio::test]
async fn test_anonymous_session_is_cached() {
    let server = MockServer::start().await;
    mount_session(&server, Value::Null, 1).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    assert_eq!(client.get_session().await.unwrap(), None);
    assert_eq!(client.get_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_reads_share_one_revalidation() {
    let server = MockServer::start().await;
    mount_session(&server, session_json(), 1).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let other = client.clone();
    let (a, b) = tokio::join!(client.get_session(), other.get_session());
    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_some());
}

#[tokio::test]
async fn test_unreachable_backend_is_retryable_network_error() {
    // Nothing listens on a port we just released.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = AuthClient::new(&uri).unwrap();
    let err = client.get_session().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rate_limited_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in/email"))
        .respond_with(ResponseTemplate::new(429).insert_header("X-Retry-After", "12"))
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let err = client
        .sign_in()
        .password("a@b.com", "secret123")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AuthError::RateLimited {
            retry_after_secs: Some(12)
        }
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_sign_up_signs_in_new_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-up/email"))
        .and(body_json(json!({"email": "a@b.com", "password": "secret123", "name": "Ada"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "t", "user": user_json()})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_session(&server, session_json(), 1).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let user = client.sign_up(" a@b.com ", "secret123", " Ada ").await.unwrap();
    assert_eq!(user.display_name(), "Ada");
    assert!(client.cached_session().is_some());
}

#[tokio::test]
async fn test_sign_up_succeeds_when_session_check_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-up/email"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": null, "user": user_json()})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-session"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let user = client.sign_up("a@b.com", "secret123", "Ada").await.unwrap();
    assert_eq!(user.id, "u1");
    assert!(client.cached_session().is_none());
}

#[tokio::test]
async fn test_sign_up_existing_user_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-up/email"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": "USER_ALREADY_EXISTS",
            "message": "User already exists"
        })))
        .mount(&server)
        .await;
    mount_session(&server, session_json(), 0).await;

    let client = AuthClient::new(&server.uri()).unwrap();
    let err = client.sign_up("a@b.com", "secret123", "Ada").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.user_message(), "User already exists");
}
