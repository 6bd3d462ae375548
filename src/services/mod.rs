pub mod announcements;
pub use announcements::{AnnouncementError, AnnouncementService};

pub mod attendance;
pub use attendance::{AttendanceError, AttendanceService};

pub mod audit;
pub use audit::AuditService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod expenses;
pub use expenses::{ExpenseError, ExpenseService};

pub mod leaves;
pub use leaves::{LeaveError, LeaveService};

pub mod notifier;
pub use notifier::Notifier;

pub mod reviews;
pub use reviews::{ReviewError, ReviewService};

pub mod role_service;
pub mod role_service_impl;
pub use role_service::{CatalogEntry, CatalogGroup, RoleDto, RoleError, RoleService};
pub use role_service_impl::SeaOrmRoleService;

pub mod tasks;
pub use tasks::{TaskError, TaskService};
