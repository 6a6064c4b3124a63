use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::AppError;

/// Database model for the roster members table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberModel {
    pub id: i32,
    pub name: String,
    pub position: String,
    pub number: i32, // Jersey number
    pub matches_played: i32,
    pub points_scored: i32,
    pub medals_won: i32,
}

impl MemberModel {
    /// Checks the field invariants: positive identifier, non-empty name and
    /// position, non-negative statistics. Called before any write reaches
    /// the store.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id < 1 {
            return Err(AppError::Validation(
                "member id must be a positive integer".to_string(),
            ));
        }
        validate_fields(
            &self.name,
            &self.position,
            self.matches_played,
            self.points_scored,
            self.medals_won,
        )
    }
}

/// A member as submitted for creation. The identifier is assigned by the
/// store, so the draft carries every field except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    pub name: String,
    pub position: String,
    pub number: i32,
    pub matches_played: i32,
    pub points_scored: i32,
    pub medals_won: i32,
}

impl MemberDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(
            &self.name,
            &self.position,
            self.matches_played,
            self.points_scored,
            self.medals_won,
        )
    }

    /// Builds the stored record once the store has assigned an identifier.
    pub fn into_model(self, id: i32) -> MemberModel {
        MemberModel {
            id,
            name: self.name,
            position: self.position,
            number: self.number,
            matches_played: self.matches_played,
            points_scored: self.points_scored,
            medals_won: self.medals_won,
        }
    }
}

/// A member paired with its derived ranking score. The score is recomputed
/// on every read and never persisted; it is kept unrounded here so that
/// sorting happens on the exact value. Rounding is a display concern.
#[derive(Debug, Clone)]
pub struct ScoredMember {
    pub member: MemberModel,
    pub score: f64,
}

fn validate_fields(
    name: &str,
    position: &str,
    matches_played: i32,
    points_scored: i32,
    medals_won: i32,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if position.trim().is_empty() {
        return Err(AppError::Validation(
            "position must not be empty".to_string(),
        ));
    }
    if matches_played < 0 || points_scored < 0 || medals_won < 0 {
        return Err(AppError::Validation(
            "matchesPlayed, pointsScored and medalsWon must not be negative".to_string(),
        ));
    }
    Ok(())
}
