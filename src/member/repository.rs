use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{MemberDraft, MemberModel};
use crate::shared::AppError;

/// Orderings the store can compute from persisted columns. The derived
/// score is not persisted, so there is no store ordering for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrder {
    /// Insertion order, which for this store is ascending identifier.
    Natural,
    Id,
    IdDesc,
    Name,
    NameDesc,
}

/// Trait for member store operations
#[async_trait]
pub trait MemberRepository {
    async fn count(&self) -> Result<i64, AppError>;

    /// Returns the whole roster in natural (identifier) order.
    async fn get_all(&self) -> Result<Vec<MemberModel>, AppError>;

    /// Returns one store-computed page. Used by the server-side paging
    /// strategy only.
    async fn get_page(
        &self,
        offset: i64,
        limit: i64,
        order: StoreOrder,
    ) -> Result<Vec<MemberModel>, AppError>;

    async fn get_member(&self, id: i32) -> Result<Option<MemberModel>, AppError>;

    /// Inserts a new member. The store assigns the identifier.
    async fn insert_member(&self, draft: &MemberDraft) -> Result<MemberModel, AppError>;

    /// Full-record update keyed by identifier. `NotFound` when the id does
    /// not exist, `Conflict` when the store detects a concurrent
    /// modification.
    async fn update_member(&self, id: i32, member: &MemberModel) -> Result<(), AppError>;

    async fn delete_member(&self, id: i32) -> Result<(), AppError>;
}

fn apply_store_order(rows: &mut [MemberModel], order: StoreOrder) {
    match order {
        StoreOrder::Natural | StoreOrder::Id => rows.sort_by_key(|m| m.id),
        StoreOrder::IdDesc => rows.sort_by_key(|m| Reverse(m.id)),
        StoreOrder::Name => rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
        StoreOrder::NameDesc => rows.sort_by(|a, b| b.name.cmp(&a.name).then(a.id.cmp(&b.id))),
    }
}

/// In-memory implementation of MemberRepository for development and testing
///
/// This provides a realistic implementation that can be used in development
/// without requiring a real database connection. Data is stored in memory
/// and will be lost when the application restarts.
pub struct InMemoryMemberRepository {
    members: Mutex<BTreeMap<i32, MemberModel>>,
}

impl Default for InMemoryMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMemberRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            members: Mutex::new(BTreeMap::new()),
        }
    }

    /// Creates an in-memory repository with a pre-populated roster
    pub fn with_members(members: Vec<MemberModel>) -> Self {
        let member_map = members.into_iter().map(|m| (m.id, m)).collect();

        Self {
            members: Mutex::new(member_map),
        }
    }

    /// Returns the current number of members in the repository
    pub fn member_count(&self) -> usize {
        self.members.lock().unwrap().len()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    #[instrument(skip(self))]
    async fn count(&self) -> Result<i64, AppError> {
        let members = self.members.lock().unwrap();
        Ok(members.len() as i64)
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<MemberModel>, AppError> {
        let members = self.members.lock().unwrap();
        // BTreeMap iterates in ascending id order, which is the natural order
        Ok(members.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn get_page(
        &self,
        offset: i64,
        limit: i64,
        order: StoreOrder,
    ) -> Result<Vec<MemberModel>, AppError> {
        let members = self.members.lock().unwrap();
        let mut rows: Vec<MemberModel> = members.values().cloned().collect();
        apply_store_order(&mut rows, order);

        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_member(&self, id: i32) -> Result<Option<MemberModel>, AppError> {
        debug!(member_id = id, "Fetching member from memory");

        let members = self.members.lock().unwrap();
        Ok(members.get(&id).cloned())
    }

    #[instrument(skip(self, draft))]
    async fn insert_member(&self, draft: &MemberDraft) -> Result<MemberModel, AppError> {
        let mut members = self.members.lock().unwrap();
        let id = members.keys().next_back().map_or(1, |max| max + 1);
        let member = draft.clone().into_model(id);
        members.insert(id, member.clone());

        debug!(member_id = id, "Member created in memory");
        Ok(member)
    }

    #[instrument(skip(self, member))]
    async fn update_member(&self, id: i32, member: &MemberModel) -> Result<(), AppError> {
        let mut members = self.members.lock().unwrap();
        if !members.contains_key(&id) {
            warn!(member_id = id, "Member not found for update in memory");
            return Err(AppError::NotFound("member not found".to_string()));
        }
        members.insert(id, member.clone());

        debug!(member_id = id, "Member updated in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_member(&self, id: i32) -> Result<(), AppError> {
        let mut members = self.members.lock().unwrap();
        if members.remove(&id).is_none() {
            warn!(member_id = id, "Member not found for deletion in memory");
            return Err(AppError::NotFound("member not found".to_string()));
        }

        debug!(member_id = id, "Member deleted from memory");
        Ok(())
    }
}

/// PostgreSQL implementation of the member store, backed by a
/// `roster_members` table with one column per model field.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn member_from_row(row: &PgRow) -> MemberModel {
    MemberModel {
        id: row.get("id"),
        name: row.get("name"),
        position: row.get("position"),
        number: row.get("number"),
        matches_played: row.get("matches_played"),
        points_scored: row.get("points_scored"),
        medals_won: row.get("medals_won"),
    }
}

/// Translates a driver error into the store error taxonomy. Unique
/// violations and serialization failures surface as `Conflict`; everything
/// else is the store being unavailable. The raw driver error goes to the
/// log, not to the caller.
fn map_store_error(e: sqlx::Error, op: &'static str) -> AppError {
    warn!(error = %e, op, "Member store request failed");

    if let Some(db_error) = e.as_database_error() {
        if let Some(code) = db_error.code() {
            if matches!(code.as_ref(), "23505" | "40001") {
                return AppError::Conflict(
                    "concurrent modification detected by the store".to_string(),
                );
            }
        }
    }
    AppError::StoreUnavailable(format!("member store {op} failed"))
}

const MEMBER_COLUMNS: &str =
    "id, name, \"position\", number, matches_played, points_scored, medals_won";

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    #[instrument(skip(self))]
    async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM roster_members")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_store_error(e, "count"))?;

        Ok(row.get("total"))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<MemberModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM roster_members ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_store_error(e, "fetch"))?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn get_page(
        &self,
        offset: i64,
        limit: i64,
        order: StoreOrder,
    ) -> Result<Vec<MemberModel>, AppError> {
        let order_clause = match order {
            StoreOrder::Natural | StoreOrder::Id => "id",
            StoreOrder::IdDesc => "id DESC",
            StoreOrder::Name => "name, id",
            StoreOrder::NameDesc => "name DESC, id",
        };

        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM roster_members ORDER BY {order_clause} OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_store_error(e, "page fetch"))?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn get_member(&self, id: i32) -> Result<Option<MemberModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM roster_members WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_store_error(e, "fetch"))?;

        Ok(row.as_ref().map(member_from_row))
    }

    #[instrument(skip(self, draft))]
    async fn insert_member(&self, draft: &MemberDraft) -> Result<MemberModel, AppError> {
        let row = sqlx::query(
            "INSERT INTO roster_members (name, \"position\", number, matches_played, points_scored, medals_won) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.position)
        .bind(draft.number)
        .bind(draft.matches_played)
        .bind(draft.points_scored)
        .bind(draft.medals_won)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_store_error(e, "insert"))?;

        let id: i32 = row.get("id");
        debug!(member_id = id, "Member created in database");
        Ok(draft.clone().into_model(id))
    }

    #[instrument(skip(self, member))]
    async fn update_member(&self, id: i32, member: &MemberModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE roster_members SET name = $2, \"position\" = $3, number = $4, \
             matches_played = $5, points_scored = $6, medals_won = $7 WHERE id = $1",
        )
        .bind(id)
        .bind(&member.name)
        .bind(&member.position)
        .bind(member.number)
        .bind(member.matches_played)
        .bind(member.points_scored)
        .bind(member.medals_won)
        .execute(&self.pool)
        .await
        .map_err(|e| map_store_error(e, "update"))?;

        if result.rows_affected() == 0 {
            warn!(member_id = id, "Member not found for update");
            return Err(AppError::NotFound("member not found".to_string()));
        }

        debug!(member_id = id, "Member updated in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_member(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roster_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_store_error(e, "delete"))?;

        if result.rows_affected() == 0 {
            warn!(member_id = id, "Member not found for deletion");
            return Err(AppError::NotFound("member not found".to_string()));
        }

        debug!(member_id = id, "Member deleted from database");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Test helper functions for creating test data
    mod helpers {
        use super::*;

        pub fn draft(name: &str) -> MemberDraft {
            MemberDraft {
                name: name.to_string(),
                position: "Outside Hitter".to_string(),
                number: 11,
                matches_played: 5,
                points_scored: 30,
                medals_won: 0,
            }
        }

        pub fn member(id: i32, name: &str) -> MemberModel {
            draft(name).into_model(id)
        }
    }

    use helpers::*;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryMemberRepository::new();

        let first = repo.insert_member(&draft("Ana")).await.unwrap();
        let second = repo.insert_member(&draft("Beata")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.member_count(), 2);
    }

    #[tokio::test]
    async fn test_insert_after_delete_does_not_reuse_live_ids() {
        let repo =
            InMemoryMemberRepository::with_members(vec![member(1, "Ana"), member(5, "Beata")]);

        repo.delete_member(1).await.unwrap();
        let created = repo.insert_member(&draft("Celina")).await.unwrap();

        assert_eq!(created.id, 6);
    }

    #[tokio::test]
    async fn test_get_all_returns_natural_order() {
        let repo = InMemoryMemberRepository::with_members(vec![
            member(3, "Celina"),
            member(1, "Ana"),
            member(2, "Beata"),
        ]);

        let all = repo.get_all().await.unwrap();
        let ids: Vec<i32> = all.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_page_offset_and_limit() {
        let members = (1..=5).map(|i| member(i, &format!("member-{i}"))).collect();
        let repo = InMemoryMemberRepository::with_members(members);

        let page = repo.get_page(2, 2, StoreOrder::Natural).await.unwrap();
        let ids: Vec<i32> = page.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let tail = repo.get_page(4, 2, StoreOrder::Natural).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].id, 5);
    }

    #[tokio::test]
    async fn test_get_page_store_orderings() {
        let repo = InMemoryMemberRepository::with_members(vec![
            member(1, "Celina"),
            member(2, "Ana"),
            member(3, "Beata"),
        ]);

        let by_name = repo.get_page(0, 10, StoreOrder::Name).await.unwrap();
        let names: Vec<&str> = by_name.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beata", "Celina"]);

        let by_name_desc = repo.get_page(0, 10, StoreOrder::NameDesc).await.unwrap();
        let names: Vec<&str> = by_name_desc.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Celina", "Beata", "Ana"]);

        let by_id_desc = repo.get_page(0, 10, StoreOrder::IdDesc).await.unwrap();
        let ids: Vec<i32> = by_id_desc.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_name_ties_break_by_ascending_id() {
        let repo = InMemoryMemberRepository::with_members(vec![
            member(2, "Ana"),
            member(1, "Ana"),
            member(3, "Beata"),
        ]);

        let rows = repo.get_page(0, 10, StoreOrder::Name).await.unwrap();
        let ids: Vec<i32> = rows.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_nonexistent_member() {
        let repo = InMemoryMemberRepository::new();

        let result = repo.get_member(42).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_member() {
        let repo = InMemoryMemberRepository::with_members(vec![member(1, "Ana")]);

        let mut updated = member(1, "Ana");
        updated.points_scored = 99;
        repo.update_member(1, &updated).await.unwrap();

        let fetched = repo.get_member(1).await.unwrap().unwrap();
        assert_eq!(fetched.points_scored, 99);
    }

    #[tokio::test]
    async fn test_update_nonexistent_member() {
        let repo = InMemoryMemberRepository::new();

        let result = repo.update_member(7, &member(7, "Ana")).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_member() {
        let repo = InMemoryMemberRepository::with_members(vec![member(1, "Ana")]);

        repo.delete_member(1).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.get_member(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_member() {
        let repo = InMemoryMemberRepository::new();

        let result = repo.delete_member(1).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_count_tracks_roster_size() {
        let repo = InMemoryMemberRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.insert_member(&draft("Ana")).await.unwrap();
        repo.insert_member(&draft("Beata")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
