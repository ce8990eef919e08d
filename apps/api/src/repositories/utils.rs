//! Shared utility functions for repositories
//!
//! This module provides the column lists and error classification used
//! across repositories.

use crate::store::StoreError;

// ============================================================================
// SQL Column Constants
//
// These constants define the SELECT column lists for each entity type,
// reducing duplication and ensuring consistency across queries.
// ============================================================================

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, name, balance";

/// SQL columns for profile queries
pub const PROFILE_COLUMNS: &str = "id, user_id, is_male, year_of_birth, member_type_id";

/// SQL columns for post queries
pub const POST_COLUMNS: &str = "id, title, content, author_id";

/// SQL columns for member type queries
pub const MEMBER_TYPE_COLUMNS: &str = "id, discount, posts_limit_per_month";

/// SQL columns for subscription edge queries
pub const SUBSCRIPTION_COLUMNS: &str = "subscriber_id, author_id";

/// Classify a write failure into the store error taxonomy.
///
/// Unique and foreign key violations become their own variants so that
/// callers can tell constraint failures apart from connectivity problems.
pub fn classify_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        let constraint = db.constraint().unwrap_or_default().to_string();
        if db.is_unique_violation() {
            return StoreError::UniqueViolation(constraint);
        }
        if db.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation(constraint);
        }
    }
    StoreError::Database(err)
}
