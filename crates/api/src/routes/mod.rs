pub mod assets;
pub mod audit;
pub mod auth;
pub mod departments;
pub mod donations;
pub mod donors;
pub mod expenses;
pub mod headquarters;
pub mod health;
pub mod incomes;
pub mod members;
pub mod payroll;
pub mod programs;
pub mod reports;
pub mod roles;
pub mod staff;
pub mod users;
pub mod visitors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  user login (public)
/// /auth/organization/login                     organization login (public)
/// /auth/organization/register                  organization signup (public)
/// /auth/headquarters/login                     headquarters login (public)
/// /auth/headquarters/register                  headquarters signup (public)
/// /auth/me                                     resolved caller
///
/// /headquarters                                own profile (headquarters only)
/// /headquarters/organizations                  list, create child organizations
/// /headquarters/organizations/{id}             get, update
///
/// /departments                                 list, create
/// /departments/{id}                            get, update, delete
/// /staff                                       list, create
/// /staff/{id}                                  get, update, delete
/// /members                                     list, create
/// /members/{id}                                get, update, delete
/// /visitors                                    list, create
/// /visitors/{id}                               get, update, delete
/// /donors                                      list, create
/// /donors/{id}                                 get, update, delete
/// /donation-purposes                           list, create
/// /donation-purposes/{id}                      get, update, delete
/// /donations                                   list, create
/// /donations/{id}                              get, update, delete
/// /incomes                                     list, create
/// /incomes/{id}                                get, update, delete
/// /expenses                                    list, create
/// /expenses/{id}                               get, update, delete
/// /programs                                    list, create
/// /programs/{id}                               get, update, delete
/// /assets                                      list, create
/// /assets/{id}                                 get, update, delete
///
/// /payroll                                     list, create
/// /payroll/preview                             compute without saving (POST)
/// /payroll/generate                            generate a period (POST)
/// /payroll/{id}                                get, update, delete
/// /payroll/{id}/status                         Pending <-> Paid (PATCH)
///
/// /roles                                       list, create
/// /roles/{id}                                  get, update, delete
/// /roles/{id}/permissions                      replace grants (PUT, owner only)
/// /permissions                                 permission catalogue
/// /users                                       list, create
/// /users/{id}                                  get, update, delete
/// /users/{id}/reset-password                   set a new password (POST)
///
/// /reports/finance                             income/donation/expense totals
/// /reports/payroll                             payroll totals by status
/// /reports/dashboard                           headline counts
/// /reports/export/{dataset}                    CSV or JSON export
///
/// /audit-logs                                  list
/// /audit-logs/integrity-check                  verify the hash chain
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (public logins and registrations, plus /me).
        .nest("/auth", auth::router())
        // Headquarters management of child organizations.
        .nest("/headquarters", headquarters::router())
        // Tenant-scoped resources.
        .nest("/departments", departments::router())
        .nest("/staff", staff::router())
        .nest("/members", members::router())
        .nest("/visitors", visitors::router())
        .nest("/donors", donors::router())
        .nest("/donation-purposes", donors::purposes_router())
        .nest("/donations", donations::router())
        .nest("/incomes", incomes::router())
        .nest("/expenses", expenses::router())
        .nest("/programs", programs::router())
        .nest("/assets", assets::router())
        .nest("/payroll", payroll::router())
        // Access control.
        .nest("/roles", roles::router())
        .nest("/permissions", roles::permissions_router())
        .nest("/users", users::router())
        // Reporting and audit.
        .nest("/reports", reports::router())
        .nest("/audit-logs", audit::router())
}
