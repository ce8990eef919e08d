//! User model
//!
//! Users are the hub of the graph: they own at most one profile, author
//! posts and subscribe to other users.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record from the users table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Account balance
    pub balance: f64,
}

/// User creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub balance: f64,
}

/// Partial user update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

/// A user as returned by the eager root fetch.
///
/// Edge lists are `Some` only when the fetch was asked to include them, so
/// an absent list means "not loaded", never "no edges".
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithEdges {
    pub user: User,

    /// Ids of the authors this user subscribes to
    pub subscribed_to: Option<Vec<Uuid>>,

    /// Ids of the users subscribing to this user
    pub subscribers: Option<Vec<Uuid>>,
}

impl UserWithEdges {
    /// Wrap a user without any edge information
    pub fn bare(user: User) -> Self {
        Self {
            user,
            subscribed_to: None,
            subscribers: None,
        }
    }
}
