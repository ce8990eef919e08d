//! Requested-field inspection for root resolvers

use crate::store::RelationSelection;

/// GraphQL field resolving the users subscribing to a user
pub const SUBSCRIBERS_FIELD: &str = "subscribedToUser";

/// GraphQL field resolving the authors a user subscribes to
pub const SUBSCRIBED_TO_FIELD: &str = "userSubscribedTo";

impl RelationSelection {
    /// Build a selection from the names of the requested child fields.
    ///
    /// Only field names are compared, so aliases do not matter.
    pub fn from_requested_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        fields
            .into_iter()
            .fold(Self::default(), |mut selection, field| {
                match field {
                    SUBSCRIBERS_FIELD => selection.subscribers = true,
                    SUBSCRIBED_TO_FIELD => selection.subscribed_to = true,
                    _ => {}
                }
                selection
            })
    }
}
