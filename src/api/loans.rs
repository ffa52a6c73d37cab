//! Loan endpoints: borrowed listings and the lend/renew/return flow

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::copy::{BookCopy, LoanedCopy},
    services::loans::LOANS_PER_PAGE,
};

use super::{AuthenticatedUser, PaginatedResponse};

#[derive(Deserialize, IntoParams)]
pub struct LoanQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
}

/// Loan request: who borrows the copy, and optionally until when
#[derive(Deserialize, ToSchema)]
pub struct LoanRequest {
    pub borrower_id: i32,
    /// Due date; defaults to three weeks from today
    pub due_back: Option<NaiveDate>,
}

/// Renewal submission
#[derive(Deserialize, ToSchema)]
pub struct RenewRequest {
    pub renewal_date: NaiveDate,
}

/// Renewal form data: the copy under renewal and the proposed date
#[derive(Serialize, ToSchema)]
pub struct RenewalForm {
    pub copy: BookCopy,
    /// Pre-filled renewal date, three weeks from today
    pub proposed_renewal_date: NaiveDate,
}

/// Copies the authenticated user currently has on loan, due soonest first
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "Borrowed copies of the current user", body = PaginatedResponse<LoanedCopy>),
        (status = 303, description = "Not authenticated, redirected to login")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedCopy>>> {
    let page = query.page.unwrap_or(1);
    let (loans, total) = state
        .services
        .loans
        .borrowed_by_user(claims.user_id, page)
        .await?;

    Ok(Json(PaginatedResponse::new(loans, total, page, LOANS_PER_PAGE)))
}

/// All copies on loan across every borrower, due soonest first
#[utoipa::path(
    get,
    path = "/loans/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "All borrowed copies", body = PaginatedResponse<LoanedCopy>),
        (status = 403, description = "Missing return-marking permission")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedCopy>>> {
    claims.require_mark_returned()?;

    let page = query.page.unwrap_or(1);
    let (loans, total) = state.services.loans.all_borrowed(page).await?;

    Ok(Json(PaginatedResponse::new(loans, total, page, LOANS_PER_PAGE)))
}

/// Get copy details
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy details", body = BookCopy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookCopy>> {
    let copy = state.services.catalog.get_copy(id).await?;
    Ok(Json(copy))
}

/// Lend a copy to a borrower
#[utoipa::path(
    post,
    path = "/copies/{id}/loan",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Copy lent out", body = BookCopy),
        (status = 403, description = "Missing return-marking permission"),
        (status = 404, description = "Copy or borrower not found"),
        (status = 409, description = "Copy already on loan")
    )
)]
pub async fn loan_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<BookCopy>> {
    claims.require_mark_returned()?;

    let copy = state
        .services
        .loans
        .loan_copy(id, request.borrower_id, request.due_back)
        .await?;
    Ok(Json(copy))
}

/// Renewal form: the copy plus a proposed date three weeks out
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Renewal form data", body = RenewalForm),
        (status = 403, description = "Missing return-marking permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    claims.require_mark_returned()?;

    let (copy, proposed_renewal_date) = state.services.loans.renewal_form(id).await?;
    Ok(Json(RenewalForm {
        copy,
        proposed_renewal_date,
    }))
}

/// Renew a loan. A valid date moves the due date and sends the librarian
/// back to the all-borrowed listing; an out-of-window date is a 400 with
/// the offending field.
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = RenewRequest,
    responses(
        (status = 303, description = "Renewed, redirect to the all-borrowed listing"),
        (status = 400, description = "Renewal date outside the allowed window"),
        (status = 403, description = "Missing return-marking permission"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy is not on loan")
    )
)]
pub async fn renew_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewRequest>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;

    state.services.loans.renew(id, request.renewal_date).await?;
    Ok(Redirect::to("/api/v1/loans/borrowed").into_response())
}

/// Mark a copy returned: it becomes available and loses its borrower
#[utoipa::path(
    post,
    path = "/copies/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy returned", body = BookCopy),
        (status = 403, description = "Missing return-marking permission"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy is not on loan")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookCopy>> {
    claims.require_mark_returned()?;

    let copy = state.services.loans.mark_returned(id).await?;
    Ok(Json(copy))
}
