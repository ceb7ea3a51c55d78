// src/main.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: registro/login públicos, /me protegido
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new().route("/me", get(handlers::auth::get_me)).layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_guard),
            ),
        );

    let customer_routes = Router::new()
        .route(
            "/",
            post(handlers::customers::create_customer).get(handlers::customers::list_customers),
        )
        .route(
            "/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let visit_plan_routes = Router::new()
        .route(
            "/",
            post(handlers::visit_plans::create_visit_plan)
                .get(handlers::visit_plans::list_visit_plans),
        )
        .route(
            "/{id}",
            get(handlers::visit_plans::get_visit_plan)
                .put(handlers::visit_plans::update_visit_plan)
                .delete(handlers::visit_plans::delete_visit_plan),
        )
        .route("/{id}/check-in", post(handlers::visit_plans::check_in_visit_plan))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let visit_report_routes = Router::new()
        .route(
            "/",
            post(handlers::visit_reports::create_visit_report)
                .get(handlers::visit_reports::list_visit_reports),
        )
        .route(
            "/{id}",
            get(handlers::visit_reports::get_visit_report)
                .put(handlers::visit_reports::update_visit_report)
                .delete(handlers::visit_reports::delete_visit_report),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let article_routes = Router::new()
        .route(
            "/",
            post(handlers::articles::create_article).get(handlers::articles::list_articles),
        )
        .route(
            "/{id}",
            get(handlers::articles::get_article)
                .put(handlers::articles::update_article)
                .delete(handlers::articles::delete_article),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // O verify é público (tela de cadastro consulta antes do login);
    // o restante é de admin, atrás do auth_guard.
    let invitation_routes = Router::new()
        .route("/verify/{token}", get(handlers::invitations::verify_invitation))
        .merge(
            Router::new()
                .route(
                    "/",
                    post(handlers::invitations::create_invitation)
                        .get(handlers::invitations::list_invitations),
                )
                .route("/{id}", delete(handlers::invitations::delete_invitation))
                .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    // CORS: allow-list das origens configuradas. Requisições sem Origin
    // (app nativo, curl) não passam pelo navegador e seguem normalmente.
    let allowed_origins = app_state.allowed_origins.clone();
    tracing::info!("🌐 Origens permitidas: {}", allowed_origins.join(", "));
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| allowed_origins.iter().any(|a| a == o))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/visit-plans", visit_plan_routes)
        .nest("/api/visit-reports", visit_report_routes)
        .nest("/api/articles", article_routes)
        .nest("/api/invitations", invitation_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Inicia o servidor
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener.local_addr().expect("endereço local indisponível")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Erro no servidor Axum");
}

// Encerra limpo em SIGINT/SIGTERM, devolvendo as conexões do pool.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Falha ao instalar o handler de Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Falha ao instalar o handler de SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("🛑 Sinal de encerramento recebido, fechando o servidor HTTP");
}
