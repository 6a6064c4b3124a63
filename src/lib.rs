// Library crate for the roster query service
// This file exposes the public API for integration tests

pub mod config;
pub mod member;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use member::{
    compute_score, InMemoryMemberRepository, MemberDraft, MemberModel, MemberRepository, Pager,
    PagingStrategy, RosterService, SortKey,
};
pub use shared::{AppError, AppState};
