//! Registration, login, session and logout flows.

use serde_json::{Value, json};

use villagecraft_integration_tests::TestApp;

#[tokio::test]
async fn register_login_logout_roundtrip() {
    let app = TestApp::spawn().await;

    let body = app
        .register("Meera", "meera@example.com", "claypots123", "artisan")
        .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["name"], "Meera");
    assert_eq!(body["user"]["type"], "artisan");

    // Registration alone does not establish a session.
    let session: Value = app
        .client
        .get(app.url("/api/check-session"))
        .send()
        .await
        .expect("check-session")
        .json()
        .await
        .expect("body");
    assert_eq!(session["success"], false);

    let body = app.login("meera@example.com", "claypots123").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");

    let session: Value = app
        .client
        .get(app.url("/api/check-session"))
        .send()
        .await
        .expect("check-session")
        .json()
        .await
        .expect("body");
    assert_eq!(session["success"], true);
    assert_eq!(session["user"]["email"], "meera@example.com");

    let response = app
        .client
        .post(app.url("/logout"))
        .send()
        .await
        .expect("logout");
    assert!(response.status().is_success());

    let session: Value = app
        .client
        .get(app.url("/api/check-session"))
        .send()
        .await
        .expect("check-session")
        .json()
        .await
        .expect("body");
    assert_eq!(session["success"], false);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("Meera", "meera@example.com", "claypots123", "buyer")
        .await;

    let response = app
        .client
        .post(app.url("/register"))
        .json(&json!({
            "name": "Other Meera",
            "email": "meera@example.com",
            "password": "jutebags456",
            "type": "buyer",
        }))
        .send()
        .await
        .expect("register request");
    assert_eq!(response.status().as_u16(), 409);

    let body: Value = response.json().await.expect("body");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists with this email");
}

#[tokio::test]
async fn register_validation_failures_are_bad_requests() {
    let app = TestApp::spawn().await;

    for (payload, expected_status) in [
        // missing name
        (
            json!({"email": "a@b.c", "password": "claypots123", "type": "buyer"}),
            400,
        ),
        // invalid email
        (
            json!({"name": "Meera", "email": "not-an-email", "password": "claypots123", "type": "buyer"}),
            400,
        ),
        // short password
        (
            json!({"name": "Meera", "email": "a@b.c", "password": "short", "type": "buyer"}),
            400,
        ),
        // unknown role
        (
            json!({"name": "Meera", "email": "a@b.c", "password": "claypots123", "type": "admin"}),
            400,
        ),
    ] {
        let response = app
            .client
            .post(app.url("/register"))
            .json(&payload)
            .send()
            .await
            .expect("register request");
        assert_eq!(response.status().as_u16(), expected_status, "{payload}");

        let body: Value = response.json().await.expect("body");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() {
    let app = TestApp::spawn().await;
    app.register("Meera", "meera@example.com", "claypots123", "buyer")
        .await;

    for payload in [
        json!({"email": "meera@example.com", "password": "wrong-password"}),
        json!({"email": "nobody@example.com", "password": "claypots123"}),
    ] {
        let response = app
            .client
            .post(app.url("/login"))
            .json(&payload)
            .send()
            .await
            .expect("login request");
        assert_eq!(response.status().as_u16(), 401);

        let body: Value = response.json().await.expect("body");
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn auto_logout_destroys_session() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    let body: Value = app
        .client
        .post(app.url("/api/auto-logout"))
        .send()
        .await
        .expect("auto-logout")
        .json()
        .await
        .expect("body");
    assert_eq!(body["success"], true);

    let session: Value = app
        .client
        .get(app.url("/api/check-session"))
        .send()
        .await
        .expect("check-session")
        .json()
        .await
        .expect("body");
    assert_eq!(session["success"], false);
}
