// Public API - what other modules can use
pub use handlers::{create_member, delete_member, get_member, list_members, update_member};
pub use models::{MemberDraft, MemberModel, ScoredMember};
pub use pager::Pager;
pub use repository::{
    InMemoryMemberRepository, MemberRepository, PostgresMemberRepository, StoreOrder,
};
pub use score::{compute_score, round_for_display};
pub use service::{PagingStrategy, RosterService};
pub use types::{ListMembersQuery, MemberResponse, RosterPageResponse, SortKey};

// Internal modules
mod handlers;
pub mod models;
pub mod pager;
pub mod repository;
pub mod score;
mod service;
mod types;
