//! Problem catalog endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::{IdPath, IdentifierPath, ListQuery, SearchQuery};
use crate::handlers::response::ApiResponse;
use crate::state::AppState;
use problemset_core::{Difficulty, NewProblem, ProblemPatch};

const NOT_FOUND: &str = "Problem not found";

/// GET /api/v1/problems
/// Pagina de problemas con filtros opcionales.
#[instrument(skip_all)]
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let (filter, pagination) = query.into_parts(state.api()).map_err(AppError::BadRequest)?;

    let page = state.service().get_page(&filter, pagination).await?;

    Ok(Json(ApiResponse::page(page.data, page.pagination)).into_response())
}

/// GET /api/v1/problems/{id}
/// Busca por id numerico o por slug.
#[instrument(skip_all, fields(id = %path.id))]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(path): Path<IdentifierPath>,
) -> Result<Response, AppError> {
    let identifier = path.identifier().map_err(AppError::BadRequest)?;

    match state.service().get_by_identifier(&identifier).await? {
        Some(problem) => Ok(Json(ApiResponse::ok(problem)).into_response()),
        None => Err(AppError::NotFound(NOT_FOUND.to_string())),
    }
}

/// GET /api/v1/problems/difficulty/{difficulty}
#[instrument(skip_all, fields(difficulty = %difficulty))]
pub async fn problems_by_difficulty(
    State(state): State<AppState>,
    Path(difficulty): Path<String>,
) -> Result<Response, AppError> {
    let difficulty = difficulty
        .parse::<Difficulty>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let problems = state.service().get_by_difficulty(difficulty).await?;

    Ok(Json(ApiResponse::list(problems)).into_response())
}

/// GET /api/v1/problems/topic/{topic}
#[instrument(skip_all, fields(topic = %topic))]
pub async fn problems_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Response, AppError> {
    let problems = state.service().get_by_topic(&topic).await?;

    Ok(Json(ApiResponse::list(problems)).into_response())
}

/// GET /api/v1/problems/search?q=
/// Hasta 50 resultados ordenados por likes.
#[instrument(skip_all)]
pub async fn search_problems(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let q = query.query().map_err(AppError::BadRequest)?;

    let problems = state.service().search(q).await?;

    Ok(Json(ApiResponse::list(problems)).into_response())
}

/// GET /api/v1/problems/stats
#[instrument(skip_all)]
pub async fn get_statistics(State(state): State<AppState>) -> Result<Response, AppError> {
    let stats = state.service().get_statistics().await?;

    Ok(Json(ApiResponse::ok(stats)).into_response())
}

/// POST /api/v1/problems
#[instrument(skip_all, fields(slug = %input.title_slug))]
pub async fn create_problem(
    State(state): State<AppState>,
    Json(input): Json<NewProblem>,
) -> Result<Response, AppError> {
    let problem = state.service().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(problem).with_message("Problem created successfully")),
    )
        .into_response())
}

/// PUT /api/v1/problems/{id}
/// Actualizacion parcial: solo se modifican los campos presentes.
#[instrument(skip_all, fields(id = %path.id))]
pub async fn update_problem(
    State(state): State<AppState>,
    Path(path): Path<IdPath>,
    Json(patch): Json<ProblemPatch>,
) -> Result<Response, AppError> {
    let id = path.id().map_err(AppError::BadRequest)?;

    match state.service().update(id, patch).await? {
        Some(problem) => Ok(Json(
            ApiResponse::ok(problem).with_message("Problem updated successfully"),
        )
        .into_response()),
        None => Err(AppError::NotFound(NOT_FOUND.to_string())),
    }
}

/// DELETE /api/v1/problems/{id}
#[instrument(skip_all, fields(id = %path.id))]
pub async fn delete_problem(
    State(state): State<AppState>,
    Path(path): Path<IdPath>,
) -> Result<Response, AppError> {
    let id = path.id().map_err(AppError::BadRequest)?;

    if state.service().delete(id).await? {
        Ok(Json(ApiResponse::message("Problem deleted successfully")).into_response())
    } else {
        Err(AppError::NotFound(NOT_FOUND.to_string()))
    }
}
