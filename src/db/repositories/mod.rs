pub mod announcement;
pub mod attendance;
pub mod audit;
pub mod expense;
pub mod leave;
pub mod notification;
pub mod project;
pub mod review;
pub mod role;
pub mod user;
