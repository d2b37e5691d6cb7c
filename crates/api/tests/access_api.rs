//! Permission checks, tenant isolation and headquarters scoping.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_as_org, get_auth, post_json_auth, put_json_auth, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Role-based access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_without_permission_gets_403(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Anne").await;
    let token = common::user_with_permissions(&app, &org, &["members.view"]).await;

    let response = get_auth(app.clone(), "/api/v1/members", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/v1/departments", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json!({ "first_name": "Ann", "last_name": "Banda" });
    let response = post_json_auth(app, "/api/v1/members", &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permission_changes_apply_to_existing_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Agnes").await;
    let role_id = common::create_role(&app, &org, "helper", &[]).await;
    common::create_user(&app, &org, "helper@parish.test", role_id).await;
    let token = common::login_user(&app, "helper@parish.test").await;

    let response = get_auth(app.clone(), "/api/v1/departments", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/roles/{role_id}/permissions");
    let body = json!({ "permissions": ["departments.view"] });
    let response = put_json_auth(app.clone(), &uri, &org.token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!(["departments.view"]));

    let response = get_auth(app, "/api/v1/departments", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_replace_role_permissions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Clare").await;
    let token = common::user_with_permissions(&app, &org, &["roles.view", "roles.manage"]).await;
    let target = common::create_role(&app, &org, "target", &[]).await;

    let uri = format!("/api/v1/roles/{target}/permissions");
    let body = json!({ "permissions": ["audit.view"] });
    let response = put_json_auth(app.clone(), &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json!({ "name": "sneaky", "permissions": ["audit.view"] });
    let response = post_json_auth(app, "/api/v1/roles", &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_permission_names_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Denis").await;

    let body = json!({ "name": "odd", "permissions": ["members.view", "launch.rockets"] });
    let response = post_json_auth(app, "/api/v1/roles", &org.token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_role_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Basil").await;

    let response = get_auth(app.clone(), "/api/v1/roles", &org.token).await;
    let json = body_json(response).await;
    let admin = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "admin")
        .expect("registration seeds an admin role")["id"]
        .as_i64()
        .unwrap();

    let response = delete_auth(app, &format!("/api/v1/roles/{admin}"), &org.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_in_use_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Bede").await;
    let role_id = common::create_role(&app, &org, "usher", &[]).await;
    common::create_user(&app, &org, "usher@parish.test", role_id).await;

    let response = delete_auth(app, &format!("/api/v1/roles/{role_id}"), &org.token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "REFERENCE_CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_delete_themselves(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Mark").await;
    let role_id = common::create_role(&app, &org, "manager", &["users.view", "users.manage"]).await;
    let user_id = common::create_user(&app, &org, "manager@parish.test", role_id).await;
    let token = common::login_user(&app, "manager@parish.test").await;

    let response = delete_auth(app, &format!("/api/v1/users/{user_id}"), &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_password_replaces_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Ignatius").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    let user_id = common::create_user(&app, &org, "reset@parish.test", role_id).await;

    let uri = format!("/api/v1/users/{user_id}/reset-password");
    let body = json!({ "new_password": "a-brand-new-secret" });
    let response = post_json_auth(app.clone(), &uri, &org.token, body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let old = json!({ "email": "reset@parish.test", "password": TEST_PASSWORD });
    let response = common::post_json(app.clone(), "/api/v1/auth/login", old).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let new = json!({ "email": "reset@parish.test", "password": "a-brand-new-secret" });
    let response = common::post_json(app, "/api/v1/auth/login", new).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn admin_role_id(app: &axum::Router, org: &common::TestOrg) -> i64 {
    let response = get_auth(app.clone(), "/api/v1/roles", &org.token).await;
    let json = body_json(response).await;
    json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "admin")
        .expect("registration seeds an admin role")["id"]
        .as_i64()
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_promote_themselves(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Luke").await;
    let admin = admin_role_id(&app, &org).await;
    let hr = common::create_role(&app, &org, "hr", &["users.view", "users.manage"]).await;
    let reader = common::create_role(&app, &org, "reader", &["users.view"]).await;
    let user_id = common::create_user(&app, &org, "hr@parish.test", hr).await;
    let token = common::login_user(&app, "hr@parish.test").await;

    let uri = format!("/api/v1/users/{user_id}");
    let response = put_json_auth(app.clone(), &uri, &token, json!({ "role_id": admin })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(app.clone(), &uri, &token, json!({ "role_id": reader })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json!({ "full_name": "Hr Officer" });
    let response = put_json_auth(app.clone(), &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/v1/payroll", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_grant_roles_beyond_their_own(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Jude").await;
    let admin = admin_role_id(&app, &org).await;
    let hr = common::create_role(&app, &org, "hr", &["users.view", "users.manage"]).await;
    let treasurer = common::create_role(&app, &org, "treasurer", &["payroll.view"]).await;
    let clerk = common::create_role(&app, &org, "clerk", &["users.view"]).await;
    common::create_user(&app, &org, "hr@parish.test", hr).await;
    let token = common::login_user(&app, "hr@parish.test").await;

    for (email, role_id) in [("a@parish.test", admin), ("t@parish.test", treasurer)] {
        let body = json!({
            "full_name": "New User",
            "email": email,
            "password": TEST_PASSWORD,
            "role_id": role_id,
        });
        let response = post_json_auth(app.clone(), "/api/v1/users", &token, body).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{email}");
    }

    let body = json!({
        "full_name": "New Clerk",
        "email": "clerk@parish.test",
        "password": TEST_PASSWORD,
        "role_id": clerk,
    });
    let response = post_json_auth(app.clone(), "/api/v1/users", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let clerk_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/users/{clerk_id}");
    let response = put_json_auth(app.clone(), &uri, &token, json!({ "role_id": treasurer })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The organization account is not bounded.
    let response = put_json_auth(app, &uri, &org.token, json!({ "role_id": admin })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_manage_wider_accounts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Mary").await;
    let admin = admin_role_id(&app, &org).await;
    let admin_user = common::create_user(&app, &org, "boss@parish.test", admin).await;
    let token = common::user_with_permissions(&app, &org, &["users.view", "users.manage"]).await;

    let uri = format!("/api/v1/users/{admin_user}/reset-password");
    let body = json!({ "new_password": "taken-over-now" });
    let response = post_json_auth(app.clone(), &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/users/{admin_user}");
    let response = put_json_auth(app.clone(), &uri, &token, json!({ "is_active": false })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let boss_token = common::login_user(&app, "boss@parish.test").await;
    let response = get_auth(app, "/api/v1/payroll", &boss_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Tenant isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn records_of_another_tenant_are_invisible(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = common::register_org(&app, "First Parish").await;
    let second = common::register_org(&app, "Second Parish").await;

    let body = json!({ "name": "Choir" });
    let response = post_json_auth(app.clone(), "/api/v1/departments", &first.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let dept_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/departments/{dept_id}");
    let response = get_auth(app.clone(), &uri, &second.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &uri, &second.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/v1/departments", &second.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_department_reference_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = common::register_org(&app, "North Parish").await;
    let second = common::register_org(&app, "South Parish").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/departments",
        &first.token,
        json!({ "name": "Youth" }),
    )
    .await;
    let dept_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = json!({ "first_name": "Jo", "last_name": "Phiri", "department_id": dept_id });
    let response = post_json_auth(app, "/api/v1/staff", &second.token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Headquarters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn headquarters_must_select_an_organization(pool: PgPool) {
    let app = common::build_test_app(pool);
    let hq = common::register_headquarters(&app, "Archdiocese").await;

    let response = get_auth(app, "/api/v1/members", &hq).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ORGANIZATION_REQUIRED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn headquarters_manages_child_organizations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let hq = common::register_headquarters(&app, "Synod").await;

    let body = json!({
        "name": "Child Parish",
        "email": "child@parish.test",
        "password": TEST_PASSWORD,
    });
    let response =
        post_json_auth(app.clone(), "/api/v1/headquarters/organizations", &hq, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let child_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), "/api/v1/headquarters/organizations", &hq).await;
    assert_eq!(body_json(response).await["data"]["total"], 1);

    let response = get_as_org(app, "/api/v1/members", &hq, child_id).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn headquarters_cannot_select_foreign_organization(pool: PgPool) {
    let app = common::build_test_app(pool);
    let hq = common::register_headquarters(&app, "Conference").await;
    let stranger = common::register_org(&app, "Independent").await;

    let response = get_as_org(app, "/api/v1/members", &hq, stranger.id).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn organizations_cannot_use_headquarters_routes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Lone Parish").await;

    let response = get_auth(app, "/api/v1/headquarters/organizations", &org.token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
