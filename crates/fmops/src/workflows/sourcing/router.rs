use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    InvitationId, QuoteSubmission, RfqDraft, RfqId, RfqStatus, SupplierId,
};
use super::repository::{SourcingRepository, SupplierDirectory};
use super::service::{ErrorKind, SourcingError, SourcingService};

/// Router builder exposing the sourcing operations over HTTP.
pub fn sourcing_router<R, D>(service: Arc<SourcingService<R, D>>) -> Router
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/sourcing/rfqs",
            post(create_rfq_handler::<R, D>).get(list_rfqs_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id",
            get(overview_handler::<R, D>).delete(delete_rfq_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/invitations",
            post(invite_handler::<R, D>).get(invitations_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/send",
            post(send_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/status",
            post(stage_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/quotes",
            post(submit_quote_handler::<R, D>)
                .get(quotes_handler::<R, D>)
                .put(revise_quote_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/benchmarks",
            post(benchmarks_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/award",
            post(award_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/rfqs/:rfq_id/cancel",
            post(cancel_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/invitations/:invitation_id",
            delete(remove_invitation_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/invitations/:invitation_id/viewed",
            post(invitation_viewed_handler::<R, D>),
        )
        .route(
            "/api/v1/sourcing/invitations/:invitation_id/decline",
            post(decline_invitation_handler::<R, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct InviteRequest {
    pub(crate) supplier_id: SupplierId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StageRequest {
    pub(crate) status: RfqStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AwardRequest {
    pub(crate) supplier_id: SupplierId,
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeclineRequest {
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

pub(crate) fn error_response(error: SourcingError) -> Response {
    let status = match error.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation | ErrorKind::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}

fn ok_json<T: serde::Serialize>(value: T) -> Response {
    (StatusCode::OK, axum::Json(value)).into_response()
}

pub(crate) async fn create_rfq_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    axum::Json(draft): axum::Json<RfqDraft>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.create_rfq(draft) {
        Ok(rfq) => (StatusCode::CREATED, axum::Json(rfq)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_rfqs_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.list_rfqs() {
        Ok(rfqs) => ok_json(rfqs),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn overview_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.rfq_overview(&RfqId(rfq_id)) {
        Ok(overview) => ok_json(overview),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_rfq_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.delete_rfq(&RfqId(rfq_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn invite_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
    axum::Json(request): axum::Json<InviteRequest>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.invite_supplier(&RfqId(rfq_id), &request.supplier_id) {
        Ok(invitation) => (StatusCode::CREATED, axum::Json(invitation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn invitations_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.invitations(&RfqId(rfq_id)) {
        Ok(invitations) => ok_json(invitations),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn send_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.send(&RfqId(rfq_id)) {
        Ok(rfq) => ok_json(rfq),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stage_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
    axum::Json(request): axum::Json<StageRequest>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.update_stage(&RfqId(rfq_id), request.status) {
        Ok(rfq) => ok_json(rfq),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_quote_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
    axum::Json(submission): axum::Json<QuoteSubmission>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.submit_quote(&RfqId(rfq_id), submission) {
        Ok(quote) => (StatusCode::CREATED, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn revise_quote_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
    axum::Json(submission): axum::Json<QuoteSubmission>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.revise_quote(&RfqId(rfq_id), submission) {
        Ok(quote) => ok_json(quote),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quotes_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.quotes(&RfqId(rfq_id)) {
        Ok(quotes) => ok_json(quotes),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn benchmarks_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.calculate_benchmarks(&RfqId(rfq_id)) {
        Ok(quotes) => ok_json(quotes),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn award_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
    axum::Json(request): axum::Json<AwardRequest>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.award(&RfqId(rfq_id), &request.supplier_id, request.reason) {
        Ok(rfq) => ok_json(rfq),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(rfq_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.cancel(&RfqId(rfq_id)) {
        Ok(rfq) => ok_json(rfq),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_invitation_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(invitation_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.remove_invitation(&InvitationId(invitation_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn invitation_viewed_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(invitation_id): Path<String>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.mark_invitation_viewed(&InvitationId(invitation_id)) {
        Ok(invitation) => ok_json(invitation),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decline_invitation_handler<R, D>(
    State(service): State<Arc<SourcingService<R, D>>>,
    Path(invitation_id): Path<String>,
    axum::Json(request): axum::Json<DeclineRequest>,
) -> Response
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    match service.decline_invitation(&InvitationId(invitation_id), request.reason) {
        Ok(invitation) => ok_json(invitation),
        Err(error) => error_response(error),
    }
}
