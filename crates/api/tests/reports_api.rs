//! Finance, payroll and dashboard reports plus dataset export.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get_auth, money, post_json_auth, TestOrg};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(app: &axum::Router, org: &TestOrg, uri: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), uri, &org.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

async fn seed_ledgers(app: &axum::Router, org: &TestOrg) {
    let donor = create(app, org, "/api/v1/donors", json!({ "full_name": "Mary Banda" })).await;
    for (amount, date) in [("100.00", "2026-01-05"), ("50.00", "2026-02-10")] {
        create(
            app,
            org,
            "/api/v1/incomes",
            json!({ "source": "Offering", "amount": amount, "income_date": date }),
        )
        .await;
    }
    create(
        app,
        org,
        "/api/v1/donations",
        json!({ "donor_id": donor["id"], "amount": "200.00", "donation_date": "2026-01-20" }),
    )
    .await;
    create(
        app,
        org,
        "/api/v1/expenses",
        json!({ "category": "Fuel", "amount": "30.00", "expense_date": "2026-02-11" }),
    )
    .await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finance_report_totals_and_months(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Report Parish").await;
    seed_ledgers(&app, &org).await;

    let response = get_auth(app.clone(), "/api/v1/reports/finance", &org.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let totals = &json["data"]["totals"];
    assert_eq!(money(&totals["incomes"]), dec!(150));
    assert_eq!(money(&totals["donations"]), dec!(200));
    assert_eq!(money(&totals["expenses"]), dec!(30));
    assert_eq!(money(&totals["net"]), dec!(320));

    let monthly = json["data"]["monthly"].as_array().unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0]["month"], "2026-01");
    assert_eq!(money(&monthly[0]["net"]), dec!(300));
    assert_eq!(monthly[1]["month"], "2026-02");
    assert_eq!(money(&monthly[1]["net"]), dec!(20));

    // A range keeps only January.
    let response = get_auth(
        app,
        "/api/v1/reports/finance?from=2026-01-01&to=2026-01-31",
        &org.token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(money(&json["data"]["totals"]["net"]), dec!(300));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn payroll_report_sums_by_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Wage Parish").await;
    for name in ["Ada", "Ike"] {
        create(
            &app,
            &org,
            "/api/v1/staff",
            json!({ "first_name": name, "last_name": "Soko", "basic_salary": "3000" }),
        )
        .await;
    }
    let generated = post_json_auth(
        app.clone(),
        "/api/v1/payroll/generate",
        &org.token,
        json!({ "period_year": 2026, "period_month": 9 }),
    )
    .await;
    assert_eq!(generated.status(), StatusCode::CREATED);

    let response = get_auth(
        app.clone(),
        "/api/v1/reports/payroll?year=2026&month=9",
        &org.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(money(&json["data"]["gross_pay"]), dec!(6000));
    // NAPSA 150 each, no PAYE below the first band.
    assert_eq!(money(&json["data"]["napsa"]), dec!(300));
    assert_eq!(money(&json["data"]["net_pay"]), dec!(5700));
    assert_eq!(json["data"]["by_status"][0]["status"], "Pending");

    let response = get_auth(app, "/api/v1/reports/payroll?month=13", &org.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_counts_records(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Count Parish").await;
    create(
        &app,
        &org,
        "/api/v1/members",
        json!({ "first_name": "Lia", "last_name": "Chanda" }),
    )
    .await;
    create(
        &app,
        &org,
        "/api/v1/members",
        json!({ "first_name": "Max", "last_name": "Chanda", "status": "Inactive" }),
    )
    .await;

    let response = get_auth(app, "/api/v1/reports/dashboard", &org.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["members"], 2);
    assert_eq!(json["data"]["active_members"], 1);
    assert_eq!(json["data"]["staff"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_members_as_csv(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Export Parish").await;
    create(
        &app,
        &org,
        "/api/v1/members",
        json!({ "first_name": "Nina", "last_name": "Mumba, Jr", "email": "nina@parish.test" }),
    )
    .await;

    let response = get_auth(app, "/api/v1/reports/export/members", &org.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "text/csv; charset=utf-8");
    let disposition = headers
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"members-"));
    assert!(disposition.ends_with(".csv\""));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,first_name,last_name,email,phone,gender,date_of_birth,address,join_date,status"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"Mumba, Jr\""), "comma fields are quoted: {row}");
    assert!(row.ends_with(",Active"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_incomes_as_json_respects_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Json Parish").await;
    seed_ledgers(&app, &org).await;

    let response = get_auth(
        app,
        "/api/v1/reports/export/incomes?format=json&from=2026-02-01",
        &org.token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(money(&rows[0]["amount"]), dec!(50));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_unknown_dataset_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Odd Parish").await;

    let response = get_auth(app, "/api/v1/reports/export/hymns", &org.token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reports_need_reports_permission(pool: PgPool) {
    let app = common::build_test_app(pool);
    let org = common::register_org(&app, "Quiet Parish").await;
    let token = common::user_with_permissions(&app, &org, &["members.view"]).await;

    let response = get_auth(app, "/api/v1/reports/export/members", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
