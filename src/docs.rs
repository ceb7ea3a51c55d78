// src/docs.rs

use crate::handlers;
use crate::models;
use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Visit Plans ---
        handlers::visit_plans::list_visit_plans,
        handlers::visit_plans::get_visit_plan,
        handlers::visit_plans::create_visit_plan,
        handlers::visit_plans::update_visit_plan,
        handlers::visit_plans::delete_visit_plan,
        handlers::visit_plans::check_in_visit_plan,

        // --- Visit Reports ---
        handlers::visit_reports::list_visit_reports,
        handlers::visit_reports::get_visit_report,
        handlers::visit_reports::create_visit_report,
        handlers::visit_reports::update_visit_report,
        handlers::visit_reports::delete_visit_report,

        // --- Articles ---
        handlers::articles::list_articles,
        handlers::articles::get_article,
        handlers::articles::create_article,
        handlers::articles::update_article,
        handlers::articles::delete_article,

        // --- Invitations ---
        handlers::invitations::list_invitations,
        handlers::invitations::verify_invitation,
        handlers::invitations::create_invitation,
        handlers::invitations::delete_invitation,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Visit Plans ---
            models::visit_plan::VisitStatus,
            models::visit_plan::VisitPlan,
            models::visit_plan::VisitPlanWithCustomer,
            models::visit_plan::VisitPlanDetail,
            models::visit_plan::CreateVisitPlanPayload,
            models::visit_plan::UpdateVisitPlanPayload,
            models::visit_plan::CheckInPayload,

            // --- Visit Reports ---
            models::visit_report::VisitReport,
            models::visit_report::VisitReportWithRelations,
            models::visit_report::CreateVisitReportPayload,
            models::visit_report::UpdateVisitReportPayload,

            // --- Articles ---
            models::article::Article,
            models::article::CreateArticlePayload,
            models::article::UpdateArticlePayload,

            // --- Invitations ---
            models::invitation::Invitation,
            models::invitation::InviterSummary,
            models::invitation::InvitationWithInviter,
            models::invitation::CreateInvitationPayload,
            models::invitation::CreatedInvitation,
            models::invitation::VerifyInvitationResponse,
        )
    ),
    tags(
        (name = "Health", description = "Disponibilidade do serviço"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Customers", description = "Gestão de Clientes"),
        (name = "VisitPlans", description = "Planos de Visita e Check-in"),
        (name = "VisitReports", description = "Relatórios de Visita"),
        (name = "Articles", description = "Artigos Internos"),
        (name = "Invitations", description = "Convites de Registro")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components
            .add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
