mod common;

use anyhow::Result;
use axum::http::StatusCode;
use category_console::api::ApiClient;
use category_console::forms::{SubmissionStatus, SubmitOutcome};
use category_console::model::Credentials;
use category_console::route::Route;
use category_console::session::{SessionGate, SessionStorage};
use category_console::App;

#[tokio::test]
async fn invalid_credentials_never_reach_server() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let mut app = server.app()?;
    app.start().await;

    app.login_form().set_draft(Credentials::new("not-an-email", ""));
    let outcome = app.submit_login().await;

    let errors = match outcome {
        SubmitOutcome::Invalid(errors) => errors,
        other => panic!("expected validation errors, got {:?}", other),
    };
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "password"]);
    assert_eq!(errors.first("email"), Some("Invalid email format"));
    assert_eq!(errors.first("password"), Some("Password is required"));
    assert_eq!(server.hits(common::LOGIN), 0);
    assert_eq!(app.login_form().status(), SubmissionStatus::Idle);

    Ok(())
}

#[tokio::test]
async fn rejected_login_shows_server_message() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let mut app = server.app()?;
    app.start().await;

    app.login_form()
        .set_draft(Credentials::new(common::GOOD_EMAIL, "wrong-password"));
    let outcome = app.submit_login().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Invalid credentials".to_string()));
    assert_eq!(
        app.login_form().status(),
        SubmissionStatus::Failed("Invalid credentials".to_string())
    );
    assert!(!app.is_authenticated());
    assert_eq!(app.route(), Route::Login);
    assert_eq!(app.navigate(Route::Dashboard).await, Route::Login);
    assert_eq!(server.hits(common::LIST), 0);

    app.login_form().dismiss_error();
    assert_eq!(app.login_form().status(), SubmissionStatus::Idle);

    Ok(())
}

#[tokio::test]
async fn server_error_without_message_is_generic() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.fail(common::LOGIN, StatusCode::INTERNAL_SERVER_ERROR, "");
    let mut app = server.app()?;
    app.start().await;

    app.login_form()
        .set_draft(Credentials::new(common::GOOD_EMAIL, common::GOOD_PASSWORD));
    let outcome = app.submit_login().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(category_console::error::GENERIC_FAILURE_MESSAGE.to_string())
    );
    assert!(!app.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn retry_after_failure_succeeds() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.seed(&[("Books", "Paper")]);
    let mut app = server.app()?;
    app.start().await;

    app.login_form()
        .set_draft(Credentials::new(common::GOOD_EMAIL, "wrong-password"));
    app.submit_login().await;

    app.login_form().edit(|draft| draft.password = common::GOOD_PASSWORD.to_string());
    assert!(app.submit_login().await.is_success());
    assert_eq!(app.login_form().status(), SubmissionStatus::Succeeded);
    assert_eq!(app.route(), Route::Dashboard);
    assert_eq!(app.categories().len(), 1);
    assert_eq!(server.hits(common::LOGIN), 2);

    Ok(())
}

#[tokio::test]
async fn login_response_without_token_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.respond(
        common::LOGIN,
        StatusCode::OK,
        r#"{"user":{"email":"ada@example.com","id":1}}"#,
    );
    let mut app = server.app()?;
    app.start().await;

    app.login_form()
        .set_draft(Credentials::new(common::GOOD_EMAIL, common::GOOD_PASSWORD));
    let outcome = app.submit_login().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(category_console::error::GENERIC_FAILURE_MESSAGE.to_string())
    );
    assert!(!app.is_authenticated());
    assert_eq!(app.route(), Route::Login);

    Ok(())
}

#[tokio::test]
async fn unreachable_server_fails_login_generically() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let gate = SessionGate::new(SessionStorage::new(), "accessToken");
    let mut app = App::with_client(ApiClient::new(&common::closed_base_url()?)?, gate);
    app.start().await;

    app.login_form()
        .set_draft(Credentials::new(common::GOOD_EMAIL, common::GOOD_PASSWORD));
    let outcome = app.submit_login().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(category_console::error::GENERIC_FAILURE_MESSAGE.to_string())
    );
    assert!(!app.is_authenticated());
    assert_eq!(server.total_hits(), 0);

    Ok(())
}

#[tokio::test]
async fn password_whitespace_reaches_server_untouched() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let mut app = server.app()?;
    app.start().await;

    // the fixture only knows the exact password, so padding must survive
    app.login_form()
        .set_draft(Credentials::new(common::GOOD_EMAIL, format!(" {} ", common::GOOD_PASSWORD)));
    let outcome = app.submit_login().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Invalid credentials".to_string()));
    assert_eq!(server.hits(common::LOGIN), 1);

    Ok(())
}
