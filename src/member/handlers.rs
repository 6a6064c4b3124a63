use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{MemberDraft, MemberModel, ScoredMember},
    score::compute_score,
    service::RosterService,
    types::{ListMembersQuery, MemberResponse, RosterPageResponse, SortKey},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for the paged roster listing
///
/// GET /members?page=&pageSize=&sort=
/// Returns one page of members with display-rounded scores attached
#[instrument(name = "list_members", skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListMembersQuery>,
) -> Result<Json<RosterPageResponse>, AppError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(state.default_page_size);
    let sort = SortKey::parse(query.sort.as_deref());

    // Use injected repository and paging strategy from app state
    let service = RosterService::new(Arc::clone(&state.member_repository), state.paging);
    let pager = service.get_page(page, page_size, sort).await?;

    info!(
        page,
        page_size,
        total_count = pager.total_count,
        "Roster page served"
    );

    Ok(Json(pager.into()))
}

/// HTTP handler for fetching a single member
///
/// GET /members/{id}
#[instrument(name = "get_member", skip(state))]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MemberResponse>, AppError> {
    let service = RosterService::new(Arc::clone(&state.member_repository), state.paging);
    let scored = service.get_member(id).await?;

    Ok(Json(scored.into()))
}

/// HTTP handler for creating a member
///
/// POST /members (body = member minus identifier)
/// Returns 201 with the created member, identifier assigned by the store
#[instrument(name = "create_member", skip(state, draft))]
pub async fn create_member(
    State(state): State<AppState>,
    Json(draft): Json<MemberDraft>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    let service = RosterService::new(Arc::clone(&state.member_repository), state.paging);
    let created = service.create_member(draft).await?;

    info!(member_id = created.id, name = %created.name, "Member created");

    let scored = ScoredMember {
        score: compute_score(&created),
        member: created,
    };
    Ok((StatusCode::CREATED, Json(scored.into())))
}

/// HTTP handler for a full-record update
///
/// PUT /members/{id} (body = full member, identifier included)
/// The path and payload identifiers must match
#[instrument(name = "update_member", skip(state, member))]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(member): Json<MemberModel>,
) -> Result<StatusCode, AppError> {
    let service = RosterService::new(Arc::clone(&state.member_repository), state.paging);
    service.update_member(id, member).await?;

    info!(member_id = id, "Member updated");

    Ok(StatusCode::NO_CONTENT)
}

/// HTTP handler for deleting a member
///
/// DELETE /members/{id}
#[instrument(name = "delete_member", skip(state))]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = RosterService::new(Arc::clone(&state.member_repository), state.paging);
    service.delete_member(id).await?;

    info!(member_id = id, "Member deleted");

    Ok(StatusCode::NO_CONTENT)
}
