pub mod article;
pub mod auth;
pub mod customer;
pub mod invitation;
pub mod visit_plan;
pub mod visit_report;
