use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use ordval_core::{
    validate_order as run_validation, Correction, OrderRecord, UnavailableCatalog,
    ValidationReport,
};
use ordval_extractor::ExtractorError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const MISSING_SUMMARY: &str = "Campo \"resumo\" é obrigatório";
pub(super) const BLANK_SUMMARY: &str = "Resumo não pode estar vazio";
const EXTRACT_FAILED: &str = "Falha ao extrair dados do resumo";
const VALIDATE_EXTRACT_FAILED: &str = "Falha ao extrair dados do resumo. Verifique o formato.";

#[derive(Debug, Deserialize)]
pub(super) struct OrderRequest {
    resumo: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ValidateOrderData {
    #[serde(rename = "pedido_valido")]
    pub is_valid: bool,
    #[serde(rename = "dados_extraidos")]
    pub order: OrderRecord,
    #[serde(rename = "validacao")]
    pub validation: ValidationDetails,
}

#[derive(Debug, Serialize)]
pub(super) struct ValidationDetails {
    #[serde(rename = "valor_total_informado", with = "rust_decimal::serde::float")]
    pub informed_total: Decimal,
    #[serde(rename = "valor_total_calculado", with = "rust_decimal::serde::float")]
    pub computed_total: Decimal,
    /// `calculado - informado`, rounded to cents.
    #[serde(rename = "diferenca", with = "rust_decimal::serde::float")]
    pub difference: Decimal,
    #[serde(rename = "erros")]
    pub errors: Vec<String>,
    #[serde(rename = "correcoes")]
    pub corrections: Vec<Correction>,
    #[serde(rename = "resumo")]
    pub summary: String,
}

impl ValidateOrderData {
    fn new(order: OrderRecord, report: ValidationReport) -> Self {
        let difference = report.difference();
        Self {
            is_valid: report.is_valid,
            order,
            validation: ValidationDetails {
                informed_total: report.informed_total,
                computed_total: report.computed_total,
                difference,
                errors: report.errors,
                corrections: report.corrections,
                summary: report.summary,
            },
        }
    }
}

/// Pulls a non-blank `resumo` out of the request body.
fn read_summary(
    req_id: &str,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let raw = match payload {
        Ok(Json(OrderRequest { resumo: Some(resumo) })) => resumo,
        Ok(_) => return Err(ApiError::new(req_id, "bad_request", MISSING_SUMMARY)),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "order request body rejected");
            return Err(ApiError::new(req_id, "bad_request", MISSING_SUMMARY));
        }
    };

    let summary = raw.trim();
    if summary.is_empty() {
        return Err(ApiError::new(req_id, "bad_request", BLANK_SUMMARY));
    }
    Ok(summary.to_owned())
}

fn map_extraction_error(request_id: String, error: &ExtractorError, message: &str) -> ApiError {
    tracing::error!(error = %error, "order extraction failed");
    ApiError::new(request_id, "extraction_failed", message)
}

pub(super) async fn extract_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<OrderRecord>>, ApiError> {
    let summary = read_summary(&req_id.0, payload)?;

    tracing::info!(request_id = %req_id.0, "extracting order without validation");
    let order = state
        .extractor
        .extract(&summary)
        .await
        .map_err(|e| map_extraction_error(req_id.0.clone(), &e, EXTRACT_FAILED))?;

    Ok(Json(ApiResponse {
        data: order,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn validate_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ValidateOrderData>>, ApiError> {
    let summary = read_summary(&req_id.0, payload)?;

    tracing::info!(request_id = %req_id.0, "validating order");
    let order = state
        .extractor
        .extract(&summary)
        .await
        .map_err(|e| map_extraction_error(req_id.0.clone(), &e, VALIDATE_EXTRACT_FAILED))?;

    let report = match ordval_db::load_catalog(&state.pool).await {
        Ok(snapshot) => run_validation(&snapshot, &order),
        Err(e) => {
            tracing::error!(
                error = %e,
                "catalog load failed; validating against unavailable catalog"
            );
            run_validation(&UnavailableCatalog::new(e.to_string()), &order)
        }
    };

    tracing::debug!(
        request_id = %req_id.0,
        valid = report.is_valid,
        "validation request completed"
    );

    Ok(Json(ApiResponse {
        data: ValidateOrderData::new(order, report),
        meta: ResponseMeta::new(req_id.0),
    }))
}
