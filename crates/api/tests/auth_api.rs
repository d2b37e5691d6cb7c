//! HTTP-level tests for registration, the three login flows, lockout and
//! `/auth/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, put_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn organization_register_returns_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "St. Mary's",
        "email": "Office@StMarys.test",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/organization/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["principal"]["type"], "organization");
    assert_eq!(json["principal"]["email"], "office@stmarys.test");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_organization_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register_org(&app, "Holy Cross").await;

    let body = json!({
        "name": "Another",
        "email": "holy-cross@parish.test",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/organization/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "name": "Tiny", "email": "tiny@parish.test", "password": "short" });
    let response = post_json(app, "/api/v1/auth/organization/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn organization_login_checks_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register_org(&app, "St Jude").await;

    let good = json!({ "email": "st-jude@parish.test", "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/organization/login", good).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bad = json!({ "email": "st-jude@parish.test", "password": "wrong-password" });
    let response = post_json(app, "/api/v1/auth/organization/login", bad).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_login_reports_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Luke").await;
    let role_id = common::create_role(&app, &org, "clerk", &["members.view"]).await;
    common::create_user(&app, &org, "clerk@parish.test", role_id).await;

    let body = json!({ "email": "CLERK@parish.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["principal"]["type"], "user");
    assert_eq!(json["principal"]["role"], "clerk");
    assert_eq!(json["principal"]["organization_id"], org.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_failures_lock_the_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Paul").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    common::create_user(&app, &org, "locked@parish.test", role_id).await;

    for _ in 0..5 {
        let body = json!({ "email": "locked@parish.test", "password": "wrong-password" });
        let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // The right password no longer helps while the lock holds.
    let body = json!({ "email": "locked@parish.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failures_after_an_expired_lock_count_afresh(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let org = common::register_org(&app, "St Silas").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    common::create_user(&app, &org, "silas@parish.test", role_id).await;
    let wrong = json!({ "email": "silas@parish.test", "password": "wrong-password" });

    for _ in 0..5 {
        let response = post_json(app.clone(), "/api/v1/auth/login", wrong.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    sqlx::query("UPDATE users SET locked_until = NOW() - INTERVAL '1 minute' WHERE email = $1")
        .bind("silas@parish.test")
        .execute(&pool)
        .await
        .unwrap();

    for _ in 0..4 {
        let response = post_json(app.clone(), "/api/v1/auth/login", wrong.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let body = json!({ "email": "silas@parish.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_user_gets_generic_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "ghost@parish.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_describes_the_caller(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "St Peter").await;

    let response = get_auth(app, "/api/v1/auth/me", &org.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "organization");
    assert_eq!(json["data"]["organization_id"], org.id);
    assert_eq!(json["data"]["full_access"], true);
    assert_eq!(json["data"]["organization"]["name"], "St Peter");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn headquarters_register_and_login(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::register_headquarters(&app, "Diocese").await;

    let body = json!({ "email": "diocese@hq.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/headquarters/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["principal"]["type"], "headquarters");
}

// ---------------------------------------------------------------------------
// Tokens outliving their principal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tokens_of_deleted_principals_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let org = common::register_org(&app, "St Cyril").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    let user_id = common::create_user(&app, &org, "cyril@parish.test", role_id).await;
    let user_token = common::login_user(&app, "cyril@parish.test").await;
    let empty_org = common::register_org(&app, "St Methodius").await;
    let hq_token = common::register_headquarters(&app, "Archdiocese").await;

    let uri = format!("/api/v1/users/{user_id}");
    let response = delete_auth(app.clone(), &uri, &org.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(empty_org.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM headquarters WHERE email = $1")
        .bind("archdiocese@hq.test")
        .execute(&pool)
        .await
        .unwrap();

    for token in [&user_token, &empty_org.token, &hq_token] {
        let response = get_auth(app.clone(), "/api/v1/auth/me", token).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tokens_of_deactivated_principals_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let org = common::register_org(&app, "St Clement").await;
    let role_id = common::create_role(&app, &org, "clerk", &[]).await;
    let user_id = common::create_user(&app, &org, "clement@parish.test", role_id).await;
    let user_token = common::login_user(&app, "clement@parish.test").await;

    let uri = format!("/api/v1/users/{user_id}");
    let body = json!({ "is_active": false });
    let response = put_json_auth(app.clone(), &uri, &org.token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app.clone(), "/api/v1/auth/me", &user_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A live user of a deactivated organization is shut out along with it.
    common::create_user(&app, &org, "active@parish.test", role_id).await;
    let other_token = common::login_user(&app, "active@parish.test").await;
    sqlx::query("UPDATE organizations SET is_active = FALSE WHERE id = $1")
        .bind(org.id)
        .execute(&pool)
        .await
        .unwrap();
    for token in [&org.token, &other_token] {
        let response = get_auth(app.clone(), "/api/v1/auth/me", token).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let hq_token = common::register_headquarters(&app, "Eparchy").await;
    sqlx::query("UPDATE headquarters SET is_active = FALSE WHERE email = $1")
        .bind("eparchy@hq.test")
        .execute(&pool)
        .await
        .unwrap();
    let response = get_auth(app, "/api/v1/auth/me", &hq_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
