use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod document;
pub mod export;
pub mod formatter;
pub mod handlers;
pub mod state;
pub mod surface;
pub mod task;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_job_types,
        crate::handlers::generate_task,
        crate::handlers::get_current_task,
        crate::handlers::preview_current_task,
        crate::handlers::export_png,
        crate::handlers::export_pdf
    ),
    components(
        schemas(
            task::JobCategory,
            task::JobTypeOption,
            task::TaskRecord,
            document::DocumentView,
            document::view::HeaderBlock,
            document::view::AccountBlock,
            document::view::JobDetailsBlock,
            document::view::JobDetailRow,
            document::view::TermsBlock,
            document::view::AttentionBlock,
            document::view::FooterBlock,
            handlers::GenerateTaskRequest,
            handlers::TaskResponse,
            handlers::PreviewResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Task Service", description = "Task generation, preview and export endpoints.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

/// Register every route under the configured base path.
pub fn routes(config: &AppConfig) -> impl Fn(&mut web::ServiceConfig) + Clone {
    let base_path = config.base_path.clone();
    let static_dir = config.static_dir.clone();
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(web::scope(&format!("{}/api", base_path)).configure(handlers::config))
            .service(
                SwaggerUi::new(format!("{}/swagger-ui/{{_:.*}}", base_path))
                    .url(format!("{}/api-doc/openapi.json", base_path), ApiDoc::openapi()),
            )
            .service(
                actix_files::Files::new(
                    if base_path.is_empty() { "/" } else { base_path.as_str() },
                    &static_dir,
                )
                .index_file("index.html"),
            );
    }
}

fn cors(config: &AppConfig) -> Cors {
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600)
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = web::Data::new(AppState::new(config.clone()));

    let prometheus = PrometheusMetricsBuilder::new("task_detail_server")
        .endpoint(&config.route("/metrics"))
        .build()
        .map_err(|e| anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!(
        "Starting server at http://{}:{}{}",
        config.host,
        config.port,
        config.base_path
    );

    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&config))
            .app_data(app_state.clone())
            .configure(routes(&config))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
