//! CRUD behaviour of the tenant-scoped record resources.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, money, post_json_auth, put_json_auth, TestOrg};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(app: &axum::Router, org: &TestOrg, uri: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), uri, &org.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Departments and staff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn department_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Dept Parish").await;

    let dept = create(&app, &org, "/api/v1/departments", json!({ "name": "Music" })).await;
    let uri = format!("/api/v1/departments/{}", dept["id"]);

    let response = put_json_auth(
        app.clone(),
        &uri,
        &org.token,
        json!({ "description": "Choir and band" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["name"], "Music");
    assert_eq!(updated["data"]["description"], "Choir and band");

    let response = delete_auth(app.clone(), &uri, &org.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &org.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_department_name_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Twin Parish").await;
    create(&app, &org, "/api/v1/departments", json!({ "name": "Ushers" })).await;

    let response =
        post_json_auth(app, "/api/v1/departments", &org.token, json!({ "name": "Ushers" })).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_department_unlinks_its_staff(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Link Parish").await;
    let dept = create(&app, &org, "/api/v1/departments", json!({ "name": "Admin" })).await;
    let staff = create(
        &app,
        &org,
        "/api/v1/staff",
        json!({ "first_name": "Tom", "last_name": "Zulu", "department_id": dept["id"] }),
    )
    .await;
    assert_eq!(staff["department_id"], dept["id"]);

    let response =
        delete_auth(app.clone(), &format!("/api/v1/departments/{}", dept["id"]), &org.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/staff/{}", staff["id"]), &org.token).await;
    assert!(body_json(response).await["data"]["department_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_rejects_negative_salary_and_unknown_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Strict Parish").await;

    let body = json!({ "first_name": "Al", "last_name": "Ng", "basic_salary": "-1" });
    let response = post_json_auth(app.clone(), "/api/v1/staff", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "first_name": "Al", "last_name": "Ng", "status": "Retired" });
    let response = post_json_auth(app, "/api/v1/staff", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Members and visitors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn members_list_filters_and_paginates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Flock Parish").await;
    for (first, status) in [("Abel", "Active"), ("Beth", "Active"), ("Caleb", "Inactive")] {
        create(
            &app,
            &org,
            "/api/v1/members",
            json!({ "first_name": first, "last_name": "Tembo", "status": status }),
        )
        .await;
    }

    let response = get_auth(app.clone(), "/api/v1/members?status=Active", &org.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 2);

    let response = get_auth(app.clone(), "/api/v1/members?search=cal", &org.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["first_name"], "Caleb");

    let response = get_auth(app, "/api/v1/members?limit=1&offset=1", &org.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_are_checked_and_matched_literally(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Filter Parish").await;
    for first in ["Ann_x", "Annex"] {
        create(
            &app,
            &org,
            "/api/v1/members",
            json!({ "first_name": first, "last_name": "Phiri" }),
        )
        .await;
    }

    let response = get_auth(app.clone(), "/api/v1/members?search=n_x", &org.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["first_name"], "Ann_x");

    let response = get_auth(app.clone(), "/api/v1/members?search=%25", &org.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 0);

    for resource in ["members", "staff", "programs", "assets"] {
        let uri = format!("/api/v1/{resource}?status=Retired");
        let response = get_auth(app.clone(), &uri, &org.token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{resource}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_email_must_be_valid(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Mail Parish").await;

    let body = json!({ "first_name": "Eve", "last_name": "Lungu", "email": "not-an-email" });
    let response = post_json_auth(app, "/api/v1/members", &org.token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn visitors_list_rejects_inverted_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Guest Parish").await;
    create(
        &app,
        &org,
        "/api/v1/visitors",
        json!({ "full_name": "Sam Guest", "visit_date": "2026-02-01" }),
    )
    .await;

    let response = get_auth(
        app.clone(),
        "/api/v1/visitors?from=2026-01-01&to=2026-12-31",
        &org.token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["total"], 1);

    let response = get_auth(app, "/api/v1/visitors?from=2026-12-31&to=2026-01-01", &org.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Donors and donations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn donations_require_positive_amounts_and_known_donors(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Giving Parish").await;
    let donor = create(&app, &org, "/api/v1/donors", json!({ "full_name": "Ruth Daka" })).await;
    let purpose =
        create(&app, &org, "/api/v1/donation-purposes", json!({ "name": "Building" })).await;

    let donation = create(
        &app,
        &org,
        "/api/v1/donations",
        json!({
            "donor_id": donor["id"],
            "purpose_id": purpose["id"],
            "amount": "250.50",
            "donation_date": "2026-03-15",
        }),
    )
    .await;
    assert_eq!(money(&donation["amount"]), dec!(250.50));
    assert_eq!(donation["donor_name"], "Ruth Daka");

    let body = json!({ "donor_id": donor["id"], "amount": "0", "donation_date": "2026-03-15" });
    let response = post_json_auth(app.clone(), "/api/v1/donations", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "donor_id": 999_999, "amount": "10", "donation_date": "2026-03-15" });
    let response = post_json_auth(app.clone(), "/api/v1/donations", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A donor with donations stays.
    let response =
        delete_auth(app.clone(), &format!("/api/v1/donors/{}", donor["id"]), &org.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Deleting the purpose only unlinks the donation.
    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/donation-purposes/{}", purpose["id"]),
        &org.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response =
        get_auth(app, &format!("/api/v1/donations/{}", donation["id"]), &org.token).await;
    assert!(body_json(response).await["data"]["purpose_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_purpose_name_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Purpose Parish").await;
    create(&app, &org, "/api/v1/donation-purposes", json!({ "name": "Missions" })).await;

    let response = post_json_auth(
        app,
        "/api/v1/donation-purposes",
        &org.token,
        json!({ "name": "Missions" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Ledgers, programs and assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ledger_amounts_must_be_positive(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Ledger Parish").await;

    let body = json!({ "source": "Offering", "amount": "-5", "income_date": "2026-01-04" });
    let response = post_json_auth(app.clone(), "/api/v1/incomes", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "category": "Utilities", "amount": "0", "expense_date": "2026-01-04" });
    let response = post_json_auth(app.clone(), "/api/v1/expenses", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    create(
        &app,
        &org,
        "/api/v1/expenses",
        json!({ "category": "Utilities", "amount": "120.00", "expense_date": "2026-01-04" }),
    )
    .await;
    let response = get_auth(app, "/api/v1/expenses?search=util", &org.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn program_dates_must_be_ordered(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Event Parish").await;

    let body = json!({ "name": "Retreat", "start_date": "2026-05-10", "end_date": "2026-05-01" });
    let response = post_json_auth(app.clone(), "/api/v1/programs", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let program = create(
        &app,
        &org,
        "/api/v1/programs",
        json!({ "name": "Retreat", "start_date": "2026-05-01", "end_date": "2026-05-10" }),
    )
    .await;
    assert_eq!(program["status"], "Planned");

    // Checked against the stored start date.
    let response = put_json_auth(
        app,
        &format!("/api/v1/programs/{}", program["id"]),
        &org.token,
        json!({ "end_date": "2026-04-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assets_accept_known_statuses_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Asset Parish").await;

    let asset = create(
        &app,
        &org,
        "/api/v1/assets",
        json!({ "name": "Organ", "purchase_cost": "15000" }),
    )
    .await;
    let uri = format!("/api/v1/assets/{}", asset["id"]);

    let response =
        put_json_auth(app.clone(), &uri, &org.token, json!({ "status": "Disposed" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(app, &uri, &org.token, json!({ "status": "Lost" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
