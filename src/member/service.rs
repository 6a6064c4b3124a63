use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{MemberDraft, MemberModel, ScoredMember};
use super::pager::Pager;
use super::repository::{MemberRepository, StoreOrder};
use super::score::compute_score;
use super::types::SortKey;
use crate::shared::AppError;

/// Which tier computes page boundaries. Exactly one strategy is the
/// configured source of truth for a deployment; both produce identical
/// paging semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingStrategy {
    /// Fetch the entire roster, score and sort in the service, then slice.
    /// The right choice while the roster stays bounded and small; the only
    /// strategy that can honor a global sort by the derived score.
    #[default]
    FullFetch,
    /// Count, then fetch exactly the requested page from the store.
    ServerSide,
}

/// Service for the roster query contract: paged, sorted, score-annotated
/// reads plus thin CRUD pass-through to the member store.
///
/// Read-only operations work on a private copy of fetched data and nothing
/// is cached across requests. Under `ServerSide` the count-then-fetch
/// sequence is not a consistent snapshot when writes race it; that is an
/// accepted weak-consistency trade-off, inherited from the store's own
/// guarantees. No store call is ever retried.
pub struct RosterService {
    repository: Arc<dyn MemberRepository + Send + Sync>,
    strategy: PagingStrategy,
}

impl RosterService {
    pub fn new(
        repository: Arc<dyn MemberRepository + Send + Sync>,
        strategy: PagingStrategy,
    ) -> Self {
        Self {
            repository,
            strategy,
        }
    }

    /// Returns one page of the scored roster.
    ///
    /// `page` is 1-based and must stay within `1..=total_pages` once the
    /// total is known; an empty roster accepts only page 1 and yields an
    /// empty page. Out-of-range pages are an error, never clamped.
    #[instrument(skip(self))]
    pub async fn get_page(
        &self,
        page: i64,
        page_size: i64,
        sort: SortKey,
    ) -> Result<Pager<ScoredMember>, AppError> {
        if page_size < 1 {
            return Err(AppError::Validation(
                "pageSize must be a positive integer".to_string(),
            ));
        }
        if page < 1 {
            return Err(AppError::InvalidPage(format!(
                "page {page} is out of range, pages start at 1"
            )));
        }

        match self.strategy {
            PagingStrategy::FullFetch => self.full_fetch_page(page, page_size, sort).await,
            PagingStrategy::ServerSide => match sort.store_order() {
                Some(order) => self.server_side_page(page, page_size, order).await,
                // The store cannot order by the derived score, and sorting
                // only within a fetched slice would break the global
                // ordering. Serve score sorts through the full fetch so the
                // page boundaries stay identical across strategies.
                None => self.full_fetch_page(page, page_size, sort).await,
            },
        }
    }

    async fn full_fetch_page(
        &self,
        page: i64,
        page_size: i64,
        sort: SortKey,
    ) -> Result<Pager<ScoredMember>, AppError> {
        let members = self.repository.get_all().await?;

        let mut scored: Vec<ScoredMember> = members
            .into_iter()
            .map(|member| ScoredMember {
                score: compute_score(&member),
                member,
            })
            .collect();
        sort_scored(&mut scored, sort);

        let total_count = scored.len() as i64;
        validate_page(page, total_count, page_size)?;

        let offset = (page - 1) * page_size;
        let items: Vec<ScoredMember> = scored
            .into_iter()
            .skip(offset as usize)
            .take(page_size as usize)
            .collect();

        debug!(total_count, page, returned = items.len(), "Roster page computed in service");
        Ok(Pager::new(total_count, page_size, page, items))
    }

    async fn server_side_page(
        &self,
        page: i64,
        page_size: i64,
        order: StoreOrder,
    ) -> Result<Pager<ScoredMember>, AppError> {
        let total_count = self.repository.count().await?;
        validate_page(page, total_count, page_size)?;

        let offset = (page - 1) * page_size;
        let members = self.repository.get_page(offset, page_size, order).await?;

        let items: Vec<ScoredMember> = members
            .into_iter()
            .map(|member| ScoredMember {
                score: compute_score(&member),
                member,
            })
            .collect();

        debug!(total_count, page, returned = items.len(), "Roster page computed by store");
        Ok(Pager::new(total_count, page_size, page, items))
    }

    /// Fetches one member with its score attached.
    #[instrument(skip(self))]
    pub async fn get_member(&self, id: i32) -> Result<ScoredMember, AppError> {
        let member = self
            .repository
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("member {id} not found")))?;

        Ok(ScoredMember {
            score: compute_score(&member),
            member,
        })
    }

    /// Validates and inserts a new member; the store assigns the identifier.
    #[instrument(skip(self, draft))]
    pub async fn create_member(&self, draft: MemberDraft) -> Result<MemberModel, AppError> {
        draft.validate()?;
        self.repository.insert_member(&draft).await
    }

    /// Full-record update. The path identifier must match the payload
    /// identifier; a mismatch is rejected before any store call.
    #[instrument(skip(self, member))]
    pub async fn update_member(&self, id: i32, member: MemberModel) -> Result<(), AppError> {
        if id != member.id {
            return Err(AppError::Validation(format!(
                "path id {id} does not match payload id {}",
                member.id
            )));
        }
        member.validate()?;
        self.repository.update_member(id, &member).await
    }

    #[instrument(skip(self))]
    pub async fn delete_member(&self, id: i32) -> Result<(), AppError> {
        self.repository.delete_member(id).await
    }
}

/// The requested page must exist once the total is known. An empty roster
/// still serves page 1 (as an empty page).
fn validate_page(page: i64, total_count: i64, page_size: i64) -> Result<(), AppError> {
    let total_pages = (total_count + page_size - 1) / page_size;
    let last_page = total_pages.max(1);
    if page > last_page {
        return Err(AppError::InvalidPage(format!(
            "page {page} is out of range, valid pages are 1..={last_page}"
        )));
    }
    Ok(())
}

/// Stable total order per sort key, ties broken by ascending identifier so
/// repeated requests page identically. Score comparisons use the unrounded
/// value.
fn sort_scored(scored: &mut [ScoredMember], sort: SortKey) {
    match sort {
        SortKey::Natural => {} // keep the store's natural order
        SortKey::Score => scored.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(a.member.id.cmp(&b.member.id))
        }),
        SortKey::ScoreDesc => scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.member.id.cmp(&b.member.id))
        }),
        SortKey::Id => scored.sort_by_key(|s| s.member.id),
        SortKey::IdDesc => scored.sort_by_key(|s| std::cmp::Reverse(s.member.id)),
        SortKey::Name => scored.sort_by(|a, b| {
            a.member
                .name
                .cmp(&b.member.name)
                .then(a.member.id.cmp(&b.member.id))
        }),
        SortKey::NameDesc => scored.sort_by(|a, b| {
            b.member
                .name
                .cmp(&a.member.name)
                .then(a.member.id.cmp(&b.member.id))
        }),
    }
}
