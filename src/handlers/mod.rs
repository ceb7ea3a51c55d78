pub mod articles;
pub mod auth;
pub mod customers;
pub mod health;
pub mod invitations;
pub mod visit_plans;
pub mod visit_reports;
