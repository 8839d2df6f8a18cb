use std::sync::Arc;

use asxtrade_core::export::{write_dataset, Dataset, DatasetFormat};
use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::task;

use super::shared::today;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// `/download/{dataset}.{format}`, e.g. `market_sentiment.csv`.
async fn download(
    Path(file): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let (name, extension) = file
        .rsplit_once('.')
        .ok_or_else(|| ApiError::NotFound(format!("Unknown dataset: {}", file)))?;
    let dataset: Dataset = name.parse()?;
    let format: DatasetFormat = extension.parse()?;

    let matrix = state.dashboard_service.dataset(dataset, today())?;
    // Spreadsheet and parquet writers are blocking; the temp file is removed
    // when it drops at the end of the task.
    let body = task::spawn_blocking(move || -> ApiResult<Vec<u8>> {
        let file = tempfile::NamedTempFile::new()
            .map_err(|e| ApiError::Internal(format!("Cannot create temp file: {}", e)))?;
        write_dataset(&matrix, format, file.path())?;
        std::fs::read(file.path())
            .map_err(|e| ApiError::Internal(format!("Cannot read dataset: {}", e)))
    })
    .await
    .map_err(|e| anyhow::anyhow!("Dataset export task failed: {}", e))??;

    tracing::info!(
        "Serving {} as {} ({} bytes)",
        name,
        format.as_str(),
        body.len()
    );
    let headers = [
        (CONTENT_TYPE, format.content_type().to_string()),
        (
            CONTENT_DISPOSITION,
            format!("inline; filename=temp.{}", format.as_str()),
        ),
    ];
    Ok((headers, body).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/download/{file}", get(download))
}
