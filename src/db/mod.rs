pub mod article_repo;
pub mod customer_repo;
pub mod invitation_repo;
pub mod user_repo;
pub mod visit_plan_repo;
pub mod visit_report_repo;

pub use article_repo::ArticleRepository;
pub use customer_repo::CustomerRepository;
pub use invitation_repo::InvitationRepository;
pub use user_repo::UserRepository;
pub use visit_plan_repo::{PlanFilter, VisitPlanRepository};
pub use visit_report_repo::VisitReportRepository;
