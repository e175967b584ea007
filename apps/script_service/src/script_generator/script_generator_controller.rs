use axum::{
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use script_llm::GenerationConfig;
use serde::{Deserialize, Serialize};

use super::{
    form::{FormOptions, ScriptForm},
    script_generator_service::GeneratedScript,
};
use crate::{
    app_module::AppState,
    error::{AppError, AppResult},
    extract::AppJson,
};

#[derive(Debug, Deserialize)]
pub struct GenerateScriptRequest {
    pub form: ScriptForm,
    #[serde(default)]
    pub parameters: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    #[serde(flatten)]
    pub form: FormOptions,
    pub parameters: GenerationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "TXT")]
    Txt,
    Markdown,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportScriptRequest {
    #[serde(default)]
    pub name: String,
    pub script: String,
    pub format: ExportFormat,
}

pub fn script_generator_router() -> Router {
    Router::new()
        .route("/generate", post(generate_script))
        .route("/options", get(form_options))
        .route("/export", post(export_script))
}

pub async fn generate_script(
    Extension(ctx): Extension<AppState>,
    AppJson(request): AppJson<GenerateScriptRequest>,
) -> AppResult<Json<GeneratedScript>> {
    request.form.validate()?;
    request
        .parameters
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let generated = ctx
        .service
        .script_generator_service
        .generate(&request.form, &request.parameters)
        .await;

    Ok(Json(generated))
}

pub async fn form_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        form: FormOptions::all(),
        parameters: GenerationConfig::default(),
    })
}

/// Attachment file name; characters that would break the header are dropped.
fn export_file_name(name: &str, format: ExportFormat) -> String {
    let stem: String = name
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '/' | '\\'))
        .collect();
    let stem = if stem.trim().is_empty() {
        "script"
    } else {
        stem.trim()
    };
    format!("{}.{}", stem, format.extension())
}

pub async fn export_script(AppJson(request): AppJson<ExportScriptRequest>) -> impl IntoResponse {
    let file_name = export_file_name(&request.name, request.format);
    (
        [
            (header::CONTENT_TYPE, request.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        request.script,
    )
}
