//! HTTP-level integration tests for the project lifecycle.
//!
//! Covers posting, listing, applying, accepting, confirming, withdrawing,
//! and deletion, including the authorization and state-machine edges.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_client, create_freelancer, delete_auth, expect_error, get, get_auth,
    patch_auth, post_auth, post_json, post_json_auth, token_for,
};
use sqlx::PgPool;
use worklane_db::models::user::User;

fn project_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Build a data pipeline",
        "budget_cents": 250_000,
        "category": "engineering",
        "skills_required": ["rust", "postgres"],
        "deadline": "2027-01-01T00:00:00Z",
    })
}

/// Post a project as the given client and return its id.
async fn post_project(app: Router, client_token: &str, title: &str) -> i64 {
    let response = post_json_auth(app, "/api/v1/projects", project_body(title), client_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_i64().expect("project id")
}

/// Full setup up to an accepted applicant: returns (client, freelancer,
/// project id). The freelancer has applied and been accepted.
async fn setup_accepted(pool: &PgPool, app: Router) -> (User, User, i64) {
    let client = create_client(pool, "client").await;
    let freelancer = create_freelancer(pool, "freelancer").await;
    let client_token = token_for(&client);
    let freelancer_token = token_for(&freelancer);

    let project_id = post_project(app.clone(), &client_token, "Pipeline work").await;

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/apply"),
        &freelancer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "freelancer_id": freelancer.id });
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/accept"),
        body,
        &client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    (client, freelancer, project_id)
}

// ---------------------------------------------------------------------------
// Creation and listing
// ---------------------------------------------------------------------------

/// A client can post a project; it starts Open and unconfirmed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project(pool: PgPool) {
    let client = create_client(&pool, "poster").await;
    let token = token_for(&client);
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/projects", project_body("New site"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["owner_id"], client.id);
    assert_eq!(json["status_id"], 1);
    assert_eq!(json["confirmed"], false);
    assert!(json["selected_freelancer_id"].is_null());
    assert!(json["chat_id"].is_null());
}

/// Freelancers cannot post projects.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_freelancer_forbidden(pool: PgPool) {
    let freelancer = create_freelancer(&pool, "notaclient").await;
    let token = token_for(&freelancer);
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/projects", project_body("Nope"), &token).await;
    expect_error(response, StatusCode::FORBIDDEN).await;
}

/// Empty required fields are rejected with 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_validation(pool: PgPool) {
    let client = create_client(&pool, "sloppy").await;
    let token = token_for(&client);
    let app = common::build_test_app(pool);

    let mut body = project_body("");
    body["skills_required"] = serde_json::json!([]);
    let response = post_json_auth(app, "/api/v1/projects", body, &token).await;
    expect_error(response, StatusCode::BAD_REQUEST).await;
}

/// Posting without a token is 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_unauthenticated(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/projects", project_body("Anon")).await;
    expect_error(response, StatusCode::UNAUTHORIZED).await;
}

/// The public listing defaults to Open projects and includes applicants.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_open_projects(pool: PgPool) {
    let client = create_client(&pool, "lister").await;
    let token = token_for(&client);
    let app = common::build_test_app(pool);

    post_project(app.clone(), &token, "First").await;
    post_project(app.clone(), &token, "Second").await;

    let response = get(app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json.as_array().expect("array body");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|p| p["status_id"] == 1));
    assert!(items.iter().all(|p| p["applicant_ids"].is_array()));
}

/// An unknown status filter is a 400, not an empty list.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_unknown_status(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/projects?status_id=99").await;
    expect_error(response, StatusCode::BAD_REQUEST).await;
}

/// Fetching an unknown project id is a 404 with the error envelope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_project(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/projects/9999").await;
    let json = expect_error(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// Applying adds the freelancer to the applicant set exactly once, no
/// matter how many times they apply.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_is_idempotent(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let freelancer = create_freelancer(&pool, "eager").await;
    let client_token = token_for(&client);
    let freelancer_token = token_for(&freelancer);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Popular gig").await;
    let apply_uri = format!("/api/v1/projects/{project_id}/apply");

    for _ in 0..3 {
        let response = post_auth(app.clone(), &apply_uri, &freelancer_token).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["applicant_ids"], serde_json::json!([freelancer.id]));
}

/// Clients cannot apply; their role is rejected before the state check.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_client_forbidden(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let other_client = create_client(&pool, "intruder").await;
    let client_token = token_for(&client);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Gig").await;

    let response = post_auth(
        app,
        &format!("/api/v1/projects/{project_id}/apply"),
        &token_for(&other_client),
    )
    .await;
    expect_error(response, StatusCode::FORBIDDEN).await;
}

/// Applying to a non-Open project is a 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_to_in_progress_project_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, _, project_id) = setup_accepted(&pool, app.clone()).await;
    let latecomer = create_freelancer(&pool, "latecomer").await;

    let response = post_auth(
        app,
        &format!("/api/v1/projects/{project_id}/apply"),
        &token_for(&latecomer),
    )
    .await;
    expect_error(response, StatusCode::CONFLICT).await;
}

/// Withdrawing an application removes it; withdrawing again is a 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_withdraw_application(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let freelancer = create_freelancer(&pool, "waverer").await;
    let client_token = token_for(&client);
    let freelancer_token = token_for(&freelancer);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Gig").await;
    let apply_uri = format!("/api/v1/projects/{project_id}/apply");

    let response = post_auth(app.clone(), &apply_uri, &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app.clone(), &apply_uri, &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app.clone(), &apply_uri, &freelancer_token).await;
    expect_error(response, StatusCode::NOT_FOUND).await;

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["applicant_ids"], serde_json::json!([]));
}

/// An accepted-but-unconfirmed freelancer who withdraws resets the
/// project to Open with no selection.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_withdraw_after_accept_resets_project(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/apply"),
        &token_for(&freelancer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["status_id"], 1);
    assert!(json["selected_freelancer_id"].is_null());
    assert_eq!(json["applicant_ids"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Accept / confirm
// ---------------------------------------------------------------------------

/// Accepting an applicant selects them and moves the project InProgress.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_applicant(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["status_id"], 3);
    assert_eq!(json["selected_freelancer_id"], freelancer.id);
    assert_eq!(json["confirmed"], false);
}

/// Only the owner can accept; a freelancer id outside the applicant set
/// is rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_requires_owner_and_applicant(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let freelancer = create_freelancer(&pool, "applicant").await;
    let outsider = create_freelancer(&pool, "outsider").await;
    let client_token = token_for(&client);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Gig").await;
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/apply"),
        &token_for(&freelancer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let accept_uri = format!("/api/v1/projects/{project_id}/accept");
    let body = serde_json::json!({ "freelancer_id": freelancer.id });

    // Not the owner.
    let response =
        post_json_auth(app.clone(), &accept_uri, body.clone(), &token_for(&freelancer)).await;
    expect_error(response, StatusCode::FORBIDDEN).await;

    // Not an applicant.
    let body = serde_json::json!({ "freelancer_id": outsider.id });
    let response = post_json_auth(app, &accept_uri, body, &client_token).await;
    expect_error(response, StatusCode::BAD_REQUEST).await;
}

/// The owner can re-accept a different applicant while unconfirmed; the
/// selection is overwritten. Late applications to the InProgress project
/// conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reaccept_overwrites_selection(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let first = create_freelancer(&pool, "first").await;
    let second = create_freelancer(&pool, "second").await;
    let client_token = token_for(&client);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Contested gig").await;
    let apply_uri = format!("/api/v1/projects/{project_id}/apply");
    let accept_uri = format!("/api/v1/projects/{project_id}/accept");

    for freelancer in [&first, &second] {
        let response = post_auth(app.clone(), &apply_uri, &token_for(freelancer)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let body = serde_json::json!({ "freelancer_id": first.id });
    let response = post_json_auth(app.clone(), &accept_uri, body, &client_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Applications are closed once the project leaves Open.
    let latecomer = token_for(&second);
    let response = post_auth(app.clone(), &apply_uri, &latecomer).await;
    expect_error(response, StatusCode::CONFLICT).await;

    let body = serde_json::json!({ "freelancer_id": second.id });
    let response = post_json_auth(app.clone(), &accept_uri, body, &client_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["selected_freelancer_id"], second.id);
    assert_eq!(json["confirmed"], false);
}

/// Confirmation flips the flag and creates the chat atomically.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_creates_chat(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (client, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/confirm"),
        &token_for(&freelancer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["project"]["confirmed"], true);
    let chat = &json["chat"];
    assert_eq!(chat["project_id"], project_id);
    assert_eq!(chat["client_id"], client.id);
    assert_eq!(chat["freelancer_id"], freelancer.id);
    assert_eq!(chat["status_id"], 1);

    // The project points back at its chat.
    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["chat_id"], chat["id"]);
}

/// Only the selected freelancer can confirm, and only once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_edges(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (client, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;
    let confirm_uri = format!("/api/v1/projects/{project_id}/confirm");

    let response = post_auth(app.clone(), &confirm_uri, &token_for(&client)).await;
    expect_error(response, StatusCode::FORBIDDEN).await;

    let response = post_auth(app.clone(), &confirm_uri, &token_for(&freelancer)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(app, &confirm_uri, &token_for(&freelancer)).await;
    expect_error(response, StatusCode::CONFLICT).await;
}

/// Withdrawing a confirmation resets the project to Open and closes the
/// chat, deleting nothing.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_withdraw_confirmation_resets_and_closes_chat(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;
    let freelancer_token = token_for(&freelancer);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/confirm"),
        &freelancer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let chat_id = body_json(response).await["chat"]["id"].as_i64().unwrap();

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/confirm"),
        &freelancer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status_id"], 1);
    assert_eq!(json["confirmed"], false);
    assert!(json["selected_freelancer_id"].is_null());

    // Chat survives but is Closed.
    let response = get_auth(app, &format!("/api/v1/chats/{chat_id}"), &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let chat = body_json(response).await;
    assert_eq!(chat["status_id"], 2);
}

/// After a withdrawn confirmation the project can go through the whole
/// accept/confirm cycle again, getting a fresh chat.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reconfirm_after_withdrawal(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (client, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;
    let client_token = token_for(&client);
    let freelancer_token = token_for(&freelancer);
    let confirm_uri = format!("/api/v1/projects/{project_id}/confirm");

    let response = post_auth(app.clone(), &confirm_uri, &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first_chat_id = body_json(response).await["chat"]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &confirm_uri, &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Second round: apply, accept, confirm again.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/apply"),
        &freelancer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "freelancer_id": freelancer.id });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/accept"),
        body,
        &client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(app, &confirm_uri, &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second_chat_id = body_json(response).await["chat"]["id"].as_i64().unwrap();
    assert_ne!(second_chat_id, first_chat_id, "a fresh chat is created");
}

/// Completed is terminal: once both parties have closed out the chat, the
/// freelancer can no longer withdraw the confirmation to reopen the
/// project.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_withdraw_confirmation_after_completion_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (client, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;
    let client_token = token_for(&client);
    let freelancer_token = token_for(&freelancer);
    let confirm_uri = format!("/api/v1/projects/{project_id}/confirm");

    let response = post_auth(app.clone(), &confirm_uri, &freelancer_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let chat_id = body_json(response).await["chat"]["id"].as_i64().unwrap();

    let close_uri = format!("/api/v1/chats/{chat_id}/close");
    patch_auth(app.clone(), &close_uri, &client_token).await;
    patch_auth(app.clone(), &close_uri, &freelancer_token).await;

    let response = delete_auth(app.clone(), &confirm_uri, &freelancer_token).await;
    expect_error(response, StatusCode::CONFLICT).await;

    // The project is still Completed with its timestamp intact.
    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["status_id"], 4);
    assert_eq!(json["confirmed"], true);
    assert!(json["completed_at"].is_string());
}

/// A confirmed freelancer cannot use the plain application withdrawal.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirmed_withdraw_must_use_confirmation_route(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;
    let freelancer_token = token_for(&freelancer);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/confirm"),
        &freelancer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{project_id}/apply"),
        &freelancer_token,
    )
    .await;
    expect_error(response, StatusCode::CONFLICT).await;
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// The owner can delete an unconfirmed project; once confirmed it is 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let client_token = token_for(&client);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Short-lived").await;

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}"),
        &client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    expect_error(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_confirmed_project_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (client, freelancer, project_id) = setup_accepted(&pool, app.clone()).await;

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/confirm"),
        &token_for(&freelancer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{project_id}"),
        &token_for(&client),
    )
    .await;
    expect_error(response, StatusCode::CONFLICT).await;
}

/// Deletion is owner-only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project_not_owner(pool: PgPool) {
    let client = create_client(&pool, "owner").await;
    let stranger = create_client(&pool, "stranger").await;
    let client_token = token_for(&client);
    let app = common::build_test_app(pool);

    let project_id = post_project(app.clone(), &client_token, "Mine").await;

    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{project_id}"),
        &token_for(&stranger),
    )
    .await;
    expect_error(response, StatusCode::FORBIDDEN).await;
}
