//! Permission catalogue.
//!
//! Permission names follow `<resource>.<action>` where action is `view` or
//! `manage`. The catalogue is seeded into the `permissions` table by
//! migration and must stay in sync with [`ALL_PERMISSIONS`].
//!
//! Each permission also gets a zero-sized marker type implementing
//! [`Permission`], so route handlers can require one at the type level.

/// A permission that can be demanded by a handler.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($ty:ident => $name:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $ty;

            impl Permission for $ty {
                const NAME: &'static str = $name;
            }
        )*

        /// Every permission name known to the system.
        pub const ALL_PERMISSIONS: &[&str] = &[$($name),*];
    };
}

permissions! {
    DepartmentsView => "departments.view",
    DepartmentsManage => "departments.manage",
    StaffView => "staff.view",
    StaffManage => "staff.manage",
    MembersView => "members.view",
    MembersManage => "members.manage",
    VisitorsView => "visitors.view",
    VisitorsManage => "visitors.manage",
    DonorsView => "donors.view",
    DonorsManage => "donors.manage",
    DonationsView => "donations.view",
    DonationsManage => "donations.manage",
    IncomesView => "incomes.view",
    IncomesManage => "incomes.manage",
    ExpensesView => "expenses.view",
    ExpensesManage => "expenses.manage",
    ProgramsView => "programs.view",
    ProgramsManage => "programs.manage",
    AssetsView => "assets.view",
    AssetsManage => "assets.manage",
    PayrollView => "payroll.view",
    PayrollManage => "payroll.manage",
    RolesView => "roles.view",
    RolesManage => "roles.manage",
    UsersView => "users.view",
    UsersManage => "users.manage",
    ReportsView => "reports.view",
    AuditView => "audit.view",
}

/// Whether `name` is part of the catalogue.
pub fn is_known(name: &str) -> bool {
    ALL_PERMISSIONS.contains(&name)
}

/// Return the names in `requested` that are not in the catalogue.
pub fn unknown_permissions<'a>(requested: &'a [String]) -> Vec<&'a str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|name| !is_known(name))
        .collect()
}
