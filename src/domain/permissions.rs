//! Permission catalog and the legacy role mapping.
//!
//! Permission names are dotted strings (`leaves.approve`). The catalog
//! drives seeding and the grouped display the role editor uses. The
//! legacy mapping is the static source (a) of the permission resolver;
//! the relational join and the denormalized JSON column are the other
//! two sources, unioned at resolution time.

use crate::domain::LegacyRole;
use serde::Serialize;

// Employee directory
pub const USERS_VIEW: &str = "users.view";
pub const USERS_CREATE: &str = "users.create";
pub const USERS_EDIT: &str = "users.edit";
pub const USERS_DEACTIVATE: &str = "users.deactivate";
pub const USERS_ASSIGN_ROLE: &str = "users.assign_role";

// Role administration
pub const ROLES_VIEW: &str = "roles.view";
pub const ROLES_MANAGE: &str = "roles.manage";

// Leave requests
pub const LEAVES_VIEW: &str = "leaves.view";
pub const LEAVES_CREATE: &str = "leaves.create";
pub const LEAVES_VIEW_TEAM: &str = "leaves.view_team";
pub const LEAVES_APPROVE: &str = "leaves.approve";

// Attendance
pub const ATTENDANCE_VIEW: &str = "attendance.view";
pub const ATTENDANCE_RECORD: &str = "attendance.record";
pub const ATTENDANCE_VIEW_TEAM: &str = "attendance.view_team";

// Expense reports
pub const EXPENSES_VIEW: &str = "expenses.view";
pub const EXPENSES_CREATE: &str = "expenses.create";
pub const EXPENSES_VIEW_TEAM: &str = "expenses.view_team";
pub const EXPENSES_APPROVE: &str = "expenses.approve";

// Announcements
pub const ANNOUNCEMENTS_VIEW: &str = "announcements.view";
pub const ANNOUNCEMENTS_MANAGE: &str = "announcements.manage";

// Projects and tasks
pub const PROJECTS_VIEW: &str = "projects.view";
pub const PROJECTS_MANAGE: &str = "projects.manage";
pub const TASKS_VIEW: &str = "tasks.view";
pub const TASKS_CREATE: &str = "tasks.create";
pub const TASKS_EDIT: &str = "tasks.edit";

// Performance reviews
pub const REVIEWS_VIEW: &str = "reviews.view";
pub const REVIEWS_VIEW_TEAM: &str = "reviews.view_team";
pub const REVIEWS_MANAGE: &str = "reviews.manage";

// Reporting
pub const REPORTS_VIEW: &str = "reports.view";
pub const REPORTS_CREATE: &str = "reports.create";

// System
pub const AUDIT_VIEW: &str = "audit.view";
pub const SETTINGS_MANAGE: &str = "settings.manage";

/// Wildcard held by super-admins. The permission guard never treats it
/// as a match for other names; callers wanting a blanket bypass must
/// check for it explicitly.
pub const SYSTEM_ADMIN: &str = "system.admin";

/// Catalog entry used for seeding and the grouped role-editor display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PermissionDef {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

/// Every permission the system ships with. Lazily created permissions
/// (unknown names submitted through the role editor) live outside this
/// table and get a derived label and category.
pub const CATALOG: &[PermissionDef] = &[
    PermissionDef { key: USERS_VIEW, label: "View employees", description: "Browse the employee directory", category: "users" },
    PermissionDef { key: USERS_CREATE, label: "Create employees", description: "Add accounts to the directory", category: "users" },
    PermissionDef { key: USERS_EDIT, label: "Edit employees", description: "Change profile fields of any employee", category: "users" },
    PermissionDef { key: USERS_DEACTIVATE, label: "Deactivate employees", description: "Disable accounts without deleting them", category: "users" },
    PermissionDef { key: USERS_ASSIGN_ROLE, label: "Assign roles", description: "Attach or detach a role on an employee", category: "users" },
    PermissionDef { key: ROLES_VIEW, label: "View roles", description: "Read roles and the permission catalog", category: "roles" },
    PermissionDef { key: ROLES_MANAGE, label: "Manage roles", description: "Create, edit and delete roles", category: "roles" },
    PermissionDef { key: LEAVES_VIEW, label: "View own leaves", description: "Read your own leave requests", category: "leaves" },
    PermissionDef { key: LEAVES_CREATE, label: "Request leave", description: "Submit leave requests", category: "leaves" },
    PermissionDef { key: LEAVES_VIEW_TEAM, label: "View team leaves", description: "Read leave requests across the team", category: "leaves" },
    PermissionDef { key: LEAVES_APPROVE, label: "Decide leaves", description: "Approve or reject pending leave requests", category: "leaves" },
    PermissionDef { key: ATTENDANCE_VIEW, label: "View own attendance", description: "Read your own attendance records", category: "attendance" },
    PermissionDef { key: ATTENDANCE_RECORD, label: "Record attendance", description: "Clock in and out", category: "attendance" },
    PermissionDef { key: ATTENDANCE_VIEW_TEAM, label: "View team attendance", description: "Read attendance across the team", category: "attendance" },
    PermissionDef { key: EXPENSES_VIEW, label: "View own expenses", description: "Read your own expense reports", category: "expenses" },
    PermissionDef { key: EXPENSES_CREATE, label: "Submit expenses", description: "File expense reports", category: "expenses" },
    PermissionDef { key: EXPENSES_VIEW_TEAM, label: "View team expenses", description: "Read expense reports across the team", category: "expenses" },
    PermissionDef { key: EXPENSES_APPROVE, label: "Decide expenses", description: "Approve or reject pending expense reports", category: "expenses" },
    PermissionDef { key: ANNOUNCEMENTS_VIEW, label: "View announcements", description: "Read company announcements", category: "announcements" },
    PermissionDef { key: ANNOUNCEMENTS_MANAGE, label: "Manage announcements", description: "Publish, pin, edit and delete announcements", category: "announcements" },
    PermissionDef { key: PROJECTS_VIEW, label: "View projects", description: "Read projects", category: "projects" },
    PermissionDef { key: PROJECTS_MANAGE, label: "Manage projects", description: "Create, edit and archive projects", category: "projects" },
    PermissionDef { key: TASKS_VIEW, label: "View tasks", description: "Read tasks", category: "tasks" },
    PermissionDef { key: TASKS_CREATE, label: "Create tasks", description: "Create and assign tasks", category: "tasks" },
    PermissionDef { key: TASKS_EDIT, label: "Edit tasks", description: "Edit any task, including status", category: "tasks" },
    PermissionDef { key: REVIEWS_VIEW, label: "View own reviews", description: "Read reviews about yourself", category: "reviews" },
    PermissionDef { key: REVIEWS_VIEW_TEAM, label: "View team reviews", description: "Read reviews across the team", category: "reviews" },
    PermissionDef { key: REVIEWS_MANAGE, label: "Manage reviews", description: "Write, edit and submit reviews", category: "reviews" },
    PermissionDef { key: REPORTS_VIEW, label: "View reports", description: "See org-wide dashboard aggregates", category: "reports" },
    PermissionDef { key: REPORTS_CREATE, label: "Create reports", description: "Export reporting data", category: "reports" },
    PermissionDef { key: AUDIT_VIEW, label: "View audit log", description: "Read the audit trail", category: "system" },
    PermissionDef { key: SETTINGS_MANAGE, label: "Manage settings", description: "Read and change server configuration", category: "system" },
    PermissionDef { key: SYSTEM_ADMIN, label: "System administrator", description: "Wildcard for explicit admin-only checks", category: "system" },
];

const EMPLOYEE_GRANTS: &[&str] = &[
    LEAVES_VIEW,
    LEAVES_CREATE,
    ATTENDANCE_VIEW,
    ATTENDANCE_RECORD,
    EXPENSES_VIEW,
    EXPENSES_CREATE,
    ANNOUNCEMENTS_VIEW,
    PROJECTS_VIEW,
    TASKS_VIEW,
    REVIEWS_VIEW,
];

const MANAGER_GRANTS: &[&str] = &[
    USERS_VIEW,
    LEAVES_VIEW_TEAM,
    LEAVES_APPROVE,
    ATTENDANCE_VIEW_TEAM,
    EXPENSES_VIEW_TEAM,
    TASKS_CREATE,
    TASKS_EDIT,
    REVIEWS_VIEW_TEAM,
    REVIEWS_MANAGE,
];

const RH_GRANTS: &[&str] = &[
    USERS_CREATE,
    USERS_EDIT,
    EXPENSES_APPROVE,
    ANNOUNCEMENTS_MANAGE,
    REPORTS_VIEW,
    REPORTS_CREATE,
];

const ADMIN_GRANTS: &[&str] = &[
    USERS_DEACTIVATE,
    USERS_ASSIGN_ROLE,
    ROLES_VIEW,
    ROLES_MANAGE,
    PROJECTS_MANAGE,
    AUDIT_VIEW,
    SETTINGS_MANAGE,
];

/// View-only fallback for users with neither a legacy role nor a
/// relational role.
pub const DEFAULT_PERMISSIONS: &[&str] = &[
    ANNOUNCEMENTS_VIEW,
    LEAVES_VIEW,
    ATTENDANCE_VIEW,
    EXPENSES_VIEW,
    TASKS_VIEW,
    REVIEWS_VIEW,
];

/// Static mapping from a legacy role to its fixed permission list.
///
/// Tiers are cumulative: every role carries everything the tier below
/// it has, matching how the legacy system escalated access.
#[must_use]
pub fn legacy_role_permissions(role: LegacyRole) -> Vec<&'static str> {
    match role {
        LegacyRole::Employee => EMPLOYEE_GRANTS.to_vec(),
        LegacyRole::Manager => [EMPLOYEE_GRANTS, MANAGER_GRANTS].concat(),
        LegacyRole::Rh => [EMPLOYEE_GRANTS, MANAGER_GRANTS, RH_GRANTS].concat(),
        LegacyRole::Admin => [EMPLOYEE_GRANTS, MANAGER_GRANTS, RH_GRANTS, ADMIN_GRANTS].concat(),
        LegacyRole::SuperAdmin => {
            let mut all = [EMPLOYEE_GRANTS, MANAGER_GRANTS, RH_GRANTS, ADMIN_GRANTS].concat();
            all.push(SYSTEM_ADMIN);
            all
        }
    }
}

/// Display category of a permission name: the segment before the first
/// dot, or "general" for un-dotted names.
#[must_use]
pub fn category_of(name: &str) -> &str {
    name.split_once('.').map_or("general", |(prefix, _)| prefix)
}

/// Human label derived from a permission name, used when a role submits
/// a name the catalog does not know and the row is created lazily.
#[must_use]
pub fn label_for(name: &str) -> String {
    if let Some(def) = CATALOG.iter().find(|d| d.key == name) {
        return def.label.to_string();
    }
    let mut label: String = name
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_keys_are_unique() {
        let mut seen = HashSet::new();
        for def in CATALOG {
            assert!(seen.insert(def.key), "duplicate catalog key {}", def.key);
        }
    }

    #[test]
    fn catalog_categories_match_name_prefixes() {
        for def in CATALOG {
            assert_eq!(def.category, category_of(def.key), "category mismatch for {}", def.key);
        }
    }

    #[test]
    fn legacy_tiers_are_cumulative() {
        let employee: HashSet<_> = legacy_role_permissions(LegacyRole::Employee).into_iter().collect();
        let manager: HashSet<_> = legacy_role_permissions(LegacyRole::Manager).into_iter().collect();
        let rh: HashSet<_> = legacy_role_permissions(LegacyRole::Rh).into_iter().collect();
        let admin: HashSet<_> = legacy_role_permissions(LegacyRole::Admin).into_iter().collect();
        let superadmin: HashSet<_> =
            legacy_role_permissions(LegacyRole::SuperAdmin).into_iter().collect();

        assert!(employee.is_subset(&manager));
        assert!(manager.is_subset(&rh));
        assert!(rh.is_subset(&admin));
        assert!(admin.is_subset(&superadmin));
        assert!(superadmin.contains(SYSTEM_ADMIN));
        assert!(!admin.contains(SYSTEM_ADMIN));
    }

    #[test]
    fn every_mapped_permission_is_in_the_catalog() {
        let catalog: HashSet<_> = CATALOG.iter().map(|d| d.key).collect();
        for role in LegacyRole::ALL {
            for perm in legacy_role_permissions(role) {
                assert!(catalog.contains(perm), "{perm} missing from catalog");
            }
        }
        for perm in DEFAULT_PERMISSIONS {
            assert!(catalog.contains(perm), "{perm} missing from catalog");
        }
    }

    #[test]
    fn derived_labels() {
        assert_eq!(label_for(LEAVES_APPROVE), "Decide leaves");
        assert_eq!(label_for("payroll.export_sepa"), "Payroll export sepa");
        assert_eq!(label_for(""), "");
    }

    #[test]
    fn categories() {
        assert_eq!(category_of("leaves.approve"), "leaves");
        assert_eq!(category_of("nodot"), "general");
    }
}
