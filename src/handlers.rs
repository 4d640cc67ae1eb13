use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::DocumentView;
use crate::export::{ExportError, ExportedFile, FileKind};
use crate::state::AppState;
use crate::surface::paint::palette;
use crate::surface::{RasterOptions, Surface, ONSCREEN_WIDTH};
use crate::task::{JobCategory, JobTypeOption, TaskRecord};
use crate::ErrorResponse;

const PREVIEW_HEIGHT: u32 = 900;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTaskRequest {
    #[schema(example = "08123456789")]
    pub phone_number: String,
    /// Defaults to SINGLE.
    #[serde(default)]
    pub job_type: JobCategory,
    /// Price as typed into the form.
    #[schema(example = "150000")]
    pub product_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub record: TaskRecord,
    pub document: DocumentView,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// PNG of the document as a data URL.
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Task Service",
    get,
    path = "/job-types",
    responses(
        (status = 200, description = "Selectable job categories", body = [JobTypeOption])
    )
)]
pub async fn list_job_types() -> impl Responder {
    let options: Vec<JobTypeOption> = JobCategory::ALL.iter().copied().map(JobTypeOption::from).collect();
    HttpResponse::Ok().json(options)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Task Service",
    post,
    path = "/tasks",
    request_body = GenerateTaskRequest,
    responses(
        (status = 201, description = "Task generated", body = TaskResponse),
        (status = 400, description = "Invalid form input", body = ErrorResponse)
    )
)]
pub async fn generate_task(
    req: web::Json<GenerateTaskRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing generate_task handler");
    let req = req.into_inner();
    match data
        .submit(&req.phone_number, req.job_type, &req.product_price)
        .await
    {
        Ok((record, document)) => HttpResponse::Created().json(TaskResponse { record, document }),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse::new(
            "ValidationError",
            &e.to_user_message(),
        )),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Task Service",
    get,
    path = "/tasks/current",
    responses(
        (status = 200, description = "Current task", body = TaskResponse),
        (status = 404, description = "No task generated yet", body = ErrorResponse)
    )
)]
pub async fn get_current_task(data: web::Data<AppState>) -> impl Responder {
    match data.current().await {
        Some((record, document)) => HttpResponse::Ok().json(TaskResponse { record, document }),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("No task generated yet")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Task Service",
    get,
    path = "/tasks/current/preview",
    responses(
        (status = 200, description = "On-screen preview", body = PreviewResponse),
        (status = 404, description = "No task generated yet", body = ErrorResponse),
        (status = 500, description = "Preview failed", body = ErrorResponse)
    )
)]
pub async fn preview_current_task(data: web::Data<AppState>) -> impl Responder {
    let session = data.session.lock().await;
    let Some(session) = session.as_ref() else {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("No task generated yet"));
    };

    let options = RasterOptions {
        width: ONSCREEN_WIDTH,
        height: PREVIEW_HEIGHT,
        pixel_ratio: 1,
        background: palette::BLACK,
        cache_bust: false,
    };
    let encoded = session
        .surface
        .rasterize(&options)
        .and_then(|bitmap| Ok((bitmap.encode_png()?, bitmap.width(), bitmap.height())));

    match encoded {
        Ok((png, width, height)) => HttpResponse::Ok().json(PreviewResponse {
            data_url: FileKind::Png.data_url(&png),
            width,
            height,
        }),
        Err(e) => {
            error!("Preview failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Task Service",
    post,
    path = "/tasks/current/export/png",
    responses(
        (status = 200, description = "PNG download", content_type = "image/png"),
        (status = 204, description = "Nothing generated yet"),
        (status = 409, description = "Another export is running", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn export_png(data: web::Data<AppState>) -> impl Responder {
    let mut session = data.session.lock().await;
    let phone_number = session
        .as_ref()
        .map(|s| s.record.phone_number().to_string())
        .unwrap_or_default();
    let surface = session.as_mut().map(|s| &mut s.surface);
    export_response(data.pipeline.export_image(surface, &phone_number).await)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Task Service",
    post,
    path = "/tasks/current/export/pdf",
    responses(
        (status = 200, description = "PDF download", content_type = "application/pdf"),
        (status = 204, description = "Nothing generated yet"),
        (status = 409, description = "Another export is running", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn export_pdf(data: web::Data<AppState>) -> impl Responder {
    let mut session = data.session.lock().await;
    let phone_number = session
        .as_ref()
        .map(|s| s.record.phone_number().to_string())
        .unwrap_or_default();
    let surface = session.as_mut().map(|s| &mut s.surface);
    export_response(data.pipeline.export_document(surface, &phone_number).await)
}

fn export_response(result: Result<Option<ExportedFile>, ExportError>) -> HttpResponse {
    match result {
        Ok(Some(file)) => HttpResponse::Ok()
            .content_type(file.mime_type())
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file.filename)],
            })
            .body(file.bytes),
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(ExportError::InProgress) => HttpResponse::Conflict().json(ErrorResponse::new(
            "Conflict",
            &ExportError::InProgress.to_string(),
        )),
        Err(e) => {
            error!("Export failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/job-types").route(web::get().to(list_job_types)))
        .service(web::resource("/tasks").route(web::post().to(generate_task)))
        .service(web::resource("/tasks/current").route(web::get().to(get_current_task)))
        .service(
            web::resource("/tasks/current/preview").route(web::get().to(preview_current_task)),
        )
        .service(web::resource("/tasks/current/export/png").route(web::post().to(export_png)))
        .service(web::resource("/tasks/current/export/pdf").route(web::post().to(export_pdf)));
}
