/// Integration tests for the CrewTask API
///
/// These tests verify the full system end-to-end:
/// - Authentication (signup, login, refresh)
/// - Membership-scoped task visibility and mutation
/// - Concurrent duplicate joins resolving to one active membership
/// - Team deletion severing memberships and removing tasks
/// - Title validation and status narrowing
///
/// Set `TEST_DATABASE_URL` to run against a real database; without it each
/// test returns early.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, TestContext};
use serde_json::json;
use tower::Service as _;

fn get(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, auth: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_signup_login_refresh_flow() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let email = format!("flow-{}@example.com", common::unique_suffix());

    // Signup
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "password": "SecureP@ss123",
                "name": "Flow Tester"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let signup = body_json(response).await;
    assert_eq!(signup["user"]["email"], email);
    assert!(signup["user"].get("password_hash").is_none());
    assert!(signup["access_token"].is_string());

    // Login
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "SecureP@ss123" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    // Wrong password is rejected
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "wrong-password" }).to_string(),
        ))
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Refresh
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/refresh")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "refresh_token": refresh_token }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    let access_token = refreshed["access_token"].as_str().unwrap();

    // The refreshed access token works against a protected route
    let response = ctx
        .app
        .clone()
        .call(get("/v1/users/me", &format!("Bearer {}", access_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["email"], email);

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_authentication_required() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_task_visibility_requires_active_membership() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let member = ctx.create_user("member").await.unwrap();
    let outsider = ctx.create_user("outsider").await.unwrap();
    let org = ctx.create_organization(&member).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();

    let member_auth = ctx.auth_header(&member);
    let outsider_auth = ctx.auth_header(&outsider);

    // Member joins the team
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &member_auth,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Member creates a task
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/tasks", team.id),
            &member_auth,
            json!({ "title": "Ship v1", "memo": "cut the branch" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    let task_id = task["id"].as_i64().unwrap();
    assert_eq!(task["status"], "unstarted");

    // Member sees the task
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks", &member_auth))
        .await
        .unwrap();
    let tasks = body_json(response).await;
    assert!(tasks
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"].as_i64() == Some(task_id)));

    // Outsider sees nothing
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks", &outsider_auth))
        .await
        .unwrap();
    let tasks = body_json(response).await;
    assert!(tasks
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["id"].as_i64() != Some(task_id)));

    // Fetching by id out of scope is a 404, same as a missing task
    let response = ctx
        .app
        .clone()
        .call(get(&format!("/v1/tasks/{}", task_id), &outsider_auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Creating in a team without membership is also a 404
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/tasks", team.id),
            &outsider_auth,
            json!({ "title": "intruder" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup(&[&member, &outsider], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_scoped_update_returns_404_and_leaves_row_untouched() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let member = ctx.create_user("upd-member").await.unwrap();
    let outsider = ctx.create_user("upd-outsider").await.unwrap();
    let org = ctx.create_organization(&member).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();

    let member_auth = ctx.auth_header(&member);
    let outsider_auth = ctx.auth_header(&outsider);

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &member_auth,
            json!({}),
        ))
        .await
        .unwrap();

    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/tasks", team.id),
            &member_auth,
            json!({ "title": "original" }),
        ))
        .await
        .unwrap();
    let task = body_json(response).await;
    let task_id = task["id"].as_i64().unwrap();

    // Out-of-scope update: 404, nothing modified
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "PUT",
            &format!("/v1/tasks/{}", task_id),
            &outsider_auth,
            json!({ "title": "hijacked", "status": "completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .call(get(&format!("/v1/tasks/{}", task_id), &member_auth))
        .await
        .unwrap();
    let task = body_json(response).await;
    assert_eq!(task["title"], "original");
    assert_eq!(task["status"], "unstarted");

    // Out-of-scope delete: 404, row still present
    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/tasks/{}", task_id))
                .header("authorization", &outsider_auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .call(get(&format!("/v1/tasks/{}", task_id), &member_auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup(&[&member, &outsider], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_duplicate_join_yields_single_active_membership() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let user = ctx.create_user("racer").await.unwrap();
    let org = ctx.create_organization(&user).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let auth = ctx.auth_header(&user);

    let uri = format!("/v1/teams/{}/members", team.id);
    let first = ctx.app.clone().call(send_json("POST", &uri, &auth, json!({})));
    let second = ctx.app.clone().call(send_json("POST", &uri, &auth, json!({})));

    let (first, second) = tokio::join!(first, second);
    let statuses = [first.unwrap().status(), second.unwrap().status()];

    assert!(statuses.contains(&StatusCode::OK));
    assert!(statuses.contains(&StatusCode::CONFLICT));

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM team_members WHERE team_id = $1 AND user_id = $2 AND delete_flg = FALSE",
    )
    .bind(team.id)
    .bind(user.id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(active, 1);

    ctx.cleanup(&[&user], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_join_racing_team_delete_leaves_no_active_membership() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let member = ctx.create_user("race-del").await.unwrap();
    let joiner = ctx.create_user("race-join").await.unwrap();
    let org = ctx.create_organization(&member).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let member_auth = ctx.auth_header(&member);
    let joiner_auth = ctx.auth_header(&joiner);

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &member_auth,
            json!({}),
        ))
        .await
        .unwrap();

    // Join and delete race; whichever wins, no active membership may point
    // at the deleted team afterwards
    let join = ctx.app.clone().call(send_json(
        "POST",
        &format!("/v1/teams/{}/members", team.id),
        &joiner_auth,
        json!({}),
    ));
    let delete = ctx.app.clone().call(
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/teams/{}", team.id))
            .header("authorization", &member_auth)
            .body(Body::empty())
            .unwrap(),
    );

    let (join, delete) = tokio::join!(join, delete);
    assert_eq!(delete.unwrap().status(), StatusCode::OK);
    let join_status = join.unwrap().status();
    assert!(
        join_status == StatusCode::OK || join_status == StatusCode::NOT_FOUND,
        "unexpected join status {}",
        join_status
    );

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM team_members WHERE team_id = $1 AND delete_flg = FALSE",
    )
    .bind(team.id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(active, 0);

    // A join after the deletion is a plain 404 and inserts nothing
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &joiner_auth,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup(&[&member, &joiner], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_create_task_after_leaving_is_404_without_row() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let user = ctx.create_user("leaver").await.unwrap();
    let org = ctx.create_organization(&user).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let auth = ctx.auth_header(&user);

    let members_uri = format!("/v1/teams/{}/members", team.id);
    ctx.app
        .clone()
        .call(send_json("POST", &members_uri, &auth, json!({})))
        .await
        .unwrap();
    ctx.app
        .clone()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&members_uri)
                .header("authorization", &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The task insert is gated on an active membership row, so a revoked
    // membership cannot create anything
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/tasks", team.id),
            &auth,
            json!({ "title": "too late" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE team_id = $1")
        .bind(team.id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    ctx.cleanup(&[&user], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_leave_then_rejoin_creates_distinct_active_row() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let user = ctx.create_user("rejoiner").await.unwrap();
    let org = ctx.create_organization(&user).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let auth = ctx.auth_header(&user);

    let members_uri = format!("/v1/teams/{}/members", team.id);

    let response = ctx
        .app
        .clone()
        .call(send_json("POST", &members_uri, &auth, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    let first_id = first["id"].as_i64().unwrap();

    // Leave
    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&members_uri)
                .header("authorization", &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Leaving twice is a 404: no active membership remains
    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&members_uri)
                .header("authorization", &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Rejoin creates a fresh row, the old one stays for audit
    let response = ctx
        .app
        .clone()
        .call(send_json("POST", &members_uri, &auth, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_ne!(second["id"].as_i64().unwrap(), first_id);

    let (total, active): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE delete_flg = FALSE)
        FROM team_members
        WHERE team_id = $1 AND user_id = $2
        "#,
    )
    .bind(team.id)
    .bind(user.id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(total, 2);
    assert_eq!(active, 1);

    ctx.cleanup(&[&user], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_delete_team_severs_memberships_and_removes_tasks() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let member = ctx.create_user("deleter").await.unwrap();
    let outsider = ctx.create_user("del-outsider").await.unwrap();
    let org = ctx.create_organization(&member).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let member_auth = ctx.auth_header(&member);
    let outsider_auth = ctx.auth_header(&outsider);

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &member_auth,
            json!({}),
        ))
        .await
        .unwrap();

    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/tasks", team.id),
            &member_auth,
            json!({ "title": "doomed" }),
        ))
        .await
        .unwrap();
    let task = body_json(response).await;
    let task_id = task["id"].as_i64().unwrap();

    // Outsiders cannot delete the team; 404 hides its existence
    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/teams/{}", team.id))
                .header("authorization", &outsider_auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A member deletes the team
    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/teams/{}", team.id))
                .header("authorization", &member_auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The member's joined list is empty and the task is gone
    let response = ctx
        .app
        .clone()
        .call(get("/v1/teams/joined", &member_auth))
        .await
        .unwrap();
    let joined = body_json(response).await;
    assert!(joined
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["id"].as_i64() != Some(team.id)));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    // The revoked membership row survives for audit
    let (total, active): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE delete_flg = FALSE)
        FROM team_members
        WHERE team_id = $1 AND user_id = $2
        "#,
    )
    .bind(team.id)
    .bind(member.id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(total, 1);
    assert_eq!(active, 0);

    ctx.cleanup(&[&member, &outsider], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_title_validation() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let user = ctx.create_user("titler").await.unwrap();
    let org = ctx.create_organization(&user).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let auth = ctx.auth_header(&user);

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &auth,
            json!({}),
        ))
        .await
        .unwrap();

    let tasks_uri = format!("/v1/teams/{}/tasks", team.id);

    // Eleven code points: rejected
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &tasks_uri,
            &auth,
            json!({ "title": "abcdefghijk" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Empty: rejected
    let response = ctx
        .app
        .clone()
        .call(send_json("POST", &tasks_uri, &auth, json!({ "title": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Ten multi-byte code points: accepted (the limit counts code points)
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &tasks_uri,
            &auth,
            json!({ "title": "済済済済済済済済済済" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup(&[&user], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_status_narrowing_and_search() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let user = ctx.create_user("searcher").await.unwrap();
    let org = ctx.create_organization(&user).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let auth = ctx.auth_header(&user);

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &auth,
            json!({}),
        ))
        .await
        .unwrap();

    let tasks_uri = format!("/v1/teams/{}/tasks", team.id);

    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &tasks_uri,
            &auth,
            json!({ "title": "Ship v1", "memo": "release work" }),
        ))
        .await
        .unwrap();
    let ship = body_json(response).await;
    let ship_id = ship["id"].as_i64().unwrap();

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &tasks_uri,
            &auth,
            json!({ "title": "Docs", "memo": "user guide" }),
        ))
        .await
        .unwrap();

    // Complete "Ship v1" through the status endpoint
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "PUT",
            &format!("/v1/tasks/{}/status", ship_id),
            &auth,
            json!({ "status": "completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "completed");

    // Narrow by status
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks/status?status=completed", &auth))
        .await
        .unwrap();
    let completed = body_json(response).await;
    assert!(completed
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"].as_i64() == Some(ship_id)));

    // Unknown status label is rejected for narrowing
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks/status?status=done", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Substring search matches title, case-sensitively
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks/search?keyword=Ship", &auth))
        .await
        .unwrap();
    let found = body_json(response).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks/search?keyword=ship", &auth))
        .await
        .unwrap();
    let found = body_json(response).await;
    assert!(found.as_array().unwrap().is_empty());

    // Search also matches memo text
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks/search?keyword=guide", &auth))
        .await
        .unwrap();
    let found = body_json(response).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    // An unknown status label drops the filter instead of failing
    let response = ctx
        .app
        .clone()
        .call(get("/v1/tasks/search?keyword=Ship&status=done", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let found = body_json(response).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    ctx.cleanup(&[&user], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_deadline_range_narrowing() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let user = ctx.create_user("planner").await.unwrap();
    let org = ctx.create_organization(&user).await.unwrap();
    let team = ctx.create_team(org.id).await.unwrap();
    let auth = ctx.auth_header(&user);

    ctx.app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team.id),
            &auth,
            json!({}),
        ))
        .await
        .unwrap();

    let tasks_uri = format!("/v1/teams/{}/tasks", team.id);

    for (title, deadline) in [
        ("early", "2025-04-01"),
        ("mid", "2025-04-15"),
        ("late", "2025-05-10"),
    ] {
        let response = ctx
            .app
            .clone()
            .call(send_json(
                "POST",
                &tasks_uri,
                &auth,
                json!({ "title": title, "deadline": deadline }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Range bounds are inclusive
    let response = ctx
        .app
        .clone()
        .call(get(
            "/v1/tasks/deadline?from=2025-04-01&to=2025-04-15",
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tasks = body_json(response).await;
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["early", "mid"]);

    // Inverted range is rejected
    let response = ctx
        .app
        .clone()
        .call(get(
            "/v1/tasks/deadline?from=2025-04-15&to=2025-04-01",
            &auth,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup(&[&user], &[&org]).await.unwrap();
}

#[tokio::test]
async fn test_team_workflow_across_users() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    // u1 founds the organization and team, u2 does the work, u3 never joins
    let u1 = ctx.create_user("founder").await.unwrap();
    let u2 = ctx.create_user("worker").await.unwrap();
    let u3 = ctx.create_user("bystander").await.unwrap();

    let u1_auth = ctx.auth_header(&u1);
    let u2_auth = ctx.auth_header(&u2);
    let u3_auth = ctx.auth_header(&u3);

    // u1 creates the organization over the API
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            "/v1/organizations",
            &u1_auth,
            json!({ "name": format!("wf-{}", common::unique_suffix()) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let org = body_json(response).await;
    let org_id = org["id"].as_i64().unwrap();

    // ...and it shows up under /organizations/created
    let response = ctx
        .app
        .clone()
        .call(get("/v1/organizations/created", &u1_auth))
        .await
        .unwrap();
    let created = body_json(response).await;
    assert!(created
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"].as_i64() == Some(org_id)));

    // u1 creates a team under it
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/organizations/{}/teams", org_id),
            &u1_auth,
            json!({ "name": "delivery" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let team = body_json(response).await;
    let team_id = team["id"].as_i64().unwrap();

    // u2 joins and creates the task
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/members", team_id),
            &u2_auth,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .call(send_json(
            "POST",
            &format!("/v1/teams/{}/tasks", team_id),
            &u2_auth,
            json!({ "title": "Ship v1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    let task_id = task["id"].as_i64().unwrap();

    // u2 completes it
    let response = ctx
        .app
        .clone()
        .call(send_json(
            "PUT",
            &format!("/v1/tasks/{}/status", task_id),
            &u2_auth,
            json!({ "status": "completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // u3, never a member, gets a 404 for the same task
    let response = ctx
        .app
        .clone()
        .call(get(&format!("/v1/tasks/{}", task_id), &u3_auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // u1 founded the org but never joined the team: also a 404
    let response = ctx
        .app
        .clone()
        .call(get(&format!("/v1/tasks/{}", task_id), &u1_auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(vec![u1.id, u2.id, u3.id])
        .execute(&ctx.db)
        .await
        .unwrap();
    sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(org_id)
        .execute(&ctx.db)
        .await
        .unwrap();
}
