//! GraphQL mutations for Feedgraph
//!
//! This module contains all mutation resolvers, organized by entity. Every
//! resolver applies its cache effect on the request's loaders after the
//! store write succeeds.

mod post;
mod profile;
mod subscription;
mod user;

pub use post::{ChangePostInput, CreatePostInput, PostMutation};
pub use profile::{ChangeProfileInput, CreateProfileInput, ProfileMutation};
pub use subscription::SubscriptionMutation;
pub use user::{ChangeUserInput, CreateUserInput, UserMutation};

use std::fmt;

use async_graphql::MergedObject;

use crate::store::{StoreError, StoreResult};

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, PostMutation, ProfileMutation, SubscriptionMutation);

/// Result of a delete-style write
#[derive(Debug)]
pub(crate) enum DeleteOutcome<T> {
    Deleted(T),
    Missing,
    Failed(StoreError),
}

impl<T> From<StoreResult<Option<T>>> for DeleteOutcome<T> {
    fn from(result: StoreResult<Option<T>>) -> Self {
        match result {
            Ok(Some(row)) => Self::Deleted(row),
            Ok(None) => Self::Missing,
            Err(err) => Self::Failed(err),
        }
    }
}

impl<T> DeleteOutcome<T> {
    /// The removed row, logging why nothing was removed otherwise.
    ///
    /// Deletes report a plain boolean, so a missing row and a failed write
    /// both end up as `None` here.
    pub(crate) fn into_deleted(self, entity: &'static str, id: impl fmt::Display) -> Option<T> {
        match self {
            Self::Deleted(row) => Some(row),
            Self::Missing => {
                tracing::debug!(entity, %id, "Nothing to delete");
                None
            }
            Self::Failed(err) => {
                tracing::warn!(entity, %id, error = %err, "Delete failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;
    use tracing_test::traced_test;

    #[test]
    fn test_outcome_from_store_result() {
        assert_matches!(DeleteOutcome::from(Ok(Some(1))), DeleteOutcome::Deleted(1));
        assert_matches!(DeleteOutcome::<i32>::from(Ok(None)), DeleteOutcome::Missing);
        assert_matches!(
            DeleteOutcome::<i32>::from(Err(StoreError::Unavailable("down".to_string()))),
            DeleteOutcome::Failed(_)
        );
    }

    #[test]
    fn test_only_deleted_rows_count() {
        let id = Uuid::new_v4();
        assert_eq!(DeleteOutcome::Deleted(3).into_deleted("post", id), Some(3));
        assert_eq!(DeleteOutcome::<i32>::Missing.into_deleted("post", id), None);
        assert_eq!(
            DeleteOutcome::<i32>::Failed(StoreError::not_found("post", id))
                .into_deleted("post", id),
            None
        );
    }

    #[traced_test]
    #[test]
    fn test_failed_delete_is_logged_as_warning() {
        let outcome = DeleteOutcome::<i32>::Failed(StoreError::Unavailable("down".to_string()));

        assert_eq!(outcome.into_deleted("profile", Uuid::nil()), None);
        assert!(logs_contain("Delete failed"));
        assert!(!logs_contain("Nothing to delete"));
    }
}
