pub mod auth;
pub mod invitation_service;
pub mod visit_plan_service;
pub mod visit_report_service;
