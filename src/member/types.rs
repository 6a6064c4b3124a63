use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use super::models::ScoredMember;
use super::pager::Pager;
use super::repository::StoreOrder;
use super::score::round_for_display;

/// Query parameters for the roster listing endpoint. `page` defaults to 1
/// and `pageSize` to the configured default when absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

/// Requested ordering for the roster listing. Absent or unrecognized input
/// falls back to the store's natural order rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    #[default]
    Natural,
    Score,
    ScoreDesc,
    Id,
    IdDesc,
    Name,
    NameDesc,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// The equivalent store-computed ordering, when one exists. Score
    /// orderings return `None`: the score is derived per read and the store
    /// cannot order by it.
    pub fn store_order(&self) -> Option<StoreOrder> {
        match self {
            SortKey::Natural => Some(StoreOrder::Natural),
            SortKey::Id => Some(StoreOrder::Id),
            SortKey::IdDesc => Some(StoreOrder::IdDesc),
            SortKey::Name => Some(StoreOrder::Name),
            SortKey::NameDesc => Some(StoreOrder::NameDesc),
            SortKey::Score | SortKey::ScoreDesc => None,
        }
    }
}

/// One roster member on the wire, with the display-rounded score attached.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: i32,
    pub name: String,
    pub position: String,
    pub number: i32,
    pub matches_played: i32,
    pub points_scored: i32,
    pub medals_won: i32,
    pub score: f64,
}

impl From<ScoredMember> for MemberResponse {
    fn from(scored: ScoredMember) -> Self {
        let member = scored.member;
        Self {
            id: member.id,
            name: member.name,
            position: member.position,
            number: member.number,
            matches_played: member.matches_played,
            points_scored: member.points_scored,
            medals_won: member.medals_won,
            // Rounding happens here, after every sort decision has been made
            // on the unrounded value
            score: round_for_display(scored.score),
        }
    }
}

/// Response envelope for one page of the roster listing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPageResponse {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub items: Vec<MemberResponse>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<Pager<ScoredMember>> for RosterPageResponse {
    fn from(pager: Pager<ScoredMember>) -> Self {
        Self {
            total_count: pager.total_count,
            page_size: pager.page_size,
            current_page: pager.current_page,
            total_pages: pager.total_pages(),
            has_previous_page: pager.has_previous_page(),
            has_next_page: pager.has_next_page(),
            items: pager.items.into_iter().map(MemberResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::models::MemberModel;
    use rstest::rstest;

    #[rstest]
    #[case(None, SortKey::Natural)]
    #[case(Some("score"), SortKey::Score)]
    #[case(Some("score_desc"), SortKey::ScoreDesc)]
    #[case(Some("id"), SortKey::Id)]
    #[case(Some("id_desc"), SortKey::IdDesc)]
    #[case(Some("name"), SortKey::Name)]
    #[case(Some("name_desc"), SortKey::NameDesc)]
    #[case(Some("shirt_color"), SortKey::Natural)] // unrecognized falls back
    #[case(Some(""), SortKey::Natural)]
    fn test_sort_key_parsing(#[case] raw: Option<&str>, #[case] expected: SortKey) {
        assert_eq!(SortKey::parse(raw), expected);
    }

    #[test]
    fn test_score_keys_have_no_store_order() {
        assert_eq!(SortKey::Score.store_order(), None);
        assert_eq!(SortKey::ScoreDesc.store_order(), None);
        assert_eq!(SortKey::Name.store_order(), Some(StoreOrder::Name));
    }

    #[test]
    fn test_member_response_rounds_score_for_display() {
        let member = MemberModel {
            id: 1,
            name: "Ana".to_string(),
            position: "Setter".to_string(),
            number: 4,
            matches_played: 3,
            points_scored: 10,
            medals_won: 0,
        };
        let scored = ScoredMember {
            member,
            score: 50.0 / 3.0,
        };

        let response = MemberResponse::from(scored);
        assert_eq!(response.score, 16.67);
    }

    #[test]
    fn test_page_response_wire_shape() {
        let pager: Pager<ScoredMember> = Pager::new(3, 2, 2, vec![]);
        let response = RosterPageResponse::from(pager);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasPreviousPage"], true);
        assert_eq!(json["hasNextPage"], false);
    }
}
