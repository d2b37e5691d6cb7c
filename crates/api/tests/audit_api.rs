//! Audit log listing and hash-chain verification.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_changes_are_audited_without_secrets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Trail Parish").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    let user_id = common::create_user(&app, &org, "trail@parish.test", role_id).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/users/{user_id}"),
        &org.token,
        json!({ "full_name": "Renamed User" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/v1/audit-logs?entity_type=user", &org.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    let actions: Vec<&str> = items
        .iter()
        .map(|e| e["action_type"].as_str().unwrap())
        .collect();
    assert_eq!(actions, ["user_update", "user_create"]);
    assert!(!json.to_string().contains(common::TEST_PASSWORD));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_changes_roll_back_when_the_audit_entry_fails(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let org = common::register_org(&app, "Ledger Parish").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    let user_id = common::create_user(&app, &org, "ledger@parish.test", role_id).await;

    sqlx::query(
        "CREATE FUNCTION reject_user_audit() RETURNS trigger AS $$ \
         BEGIN RAISE EXCEPTION 'audit unavailable'; END $$ LANGUAGE plpgsql",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER reject_user_audit BEFORE INSERT ON audit_logs \
         FOR EACH ROW WHEN (NEW.entity_type = 'user') EXECUTE FUNCTION reject_user_audit()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let uri = format!("/api/v1/users/{user_id}");
    let response = put_json_auth(
        app.clone(),
        &uri,
        &org.token,
        json!({ "full_name": "Unaudited Name" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/users",
        &org.token,
        json!({
            "email": "ghost@parish.test",
            "password": common::TEST_PASSWORD,
            "full_name": "Ghost",
            "role_id": role_id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = delete_auth(app.clone(), &uri, &org.token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let (name,): (String,) = sqlx::query_as("SELECT full_name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(name, "Unaudited Name");
    let (ghosts,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = 'ghost@parish.test'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(ghosts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_permission_changes_record_before_and_after(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Grant Parish").await;
    let role_id = common::create_role(&app, &org, "editor", &["members.view"]).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/roles/{role_id}/permissions"),
        &org.token,
        json!({ "permissions": ["members.manage", "members.view"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = "/api/v1/audit-logs?action_type=role_permissions_change";
    let response = get_auth(app, uri, &org.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    let details = &json["data"]["items"][0]["details_json"];
    assert_eq!(details["before"], json!(["members.view"]));
    assert_eq!(details["after"], json!(["members.manage", "members.view"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn integrity_check_detects_tampering(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let org = common::register_org(&app, "Seal Parish").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    for n in 0..3 {
        common::create_user(&app, &org, &format!("seal{n}@parish.test"), role_id).await;
    }

    let response = get_auth(app.clone(), "/api/v1/audit-logs/integrity-check", &org.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["intact"], true);
    assert_eq!(json["data"]["verified"], 3);

    let second: i64 = sqlx::query_scalar(
        "SELECT id FROM audit_logs WHERE organization_id = $1 ORDER BY id ASC OFFSET 1 LIMIT 1",
    )
    .bind(org.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query("UPDATE audit_logs SET actor_id = actor_id + 1 WHERE id = $1")
        .bind(second)
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(app, "/api/v1/audit-logs/integrity-check", &org.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["intact"], false);
    assert_eq!(json["data"]["verified"], 1);
    assert_eq!(json["data"]["first_broken_id"], second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn audit_logs_are_tenant_scoped(pool: PgPool) {
    let app = common::build_test_app(pool);
    let busy = common::register_org(&app, "Busy Parish").await;
    let idle = common::register_org(&app, "Idle Parish").await;
    let role_id = common::create_role(&app, &busy, "clerk", &[]).await;
    common::create_user(&app, &busy, "busy@parish.test", role_id).await;

    let response = get_auth(app, "/api/v1/audit-logs", &idle.token).await;

    assert_eq!(body_json(response).await["data"]["total"], 0);
}
