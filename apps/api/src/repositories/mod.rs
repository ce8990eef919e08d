//! Database repository layer for Feedgraph
//!
//! This module provides the data access layer, centralizing all database
//! operations into reusable repositories. [`crate::store::PgStore`] composes
//! them into the store adapter used by the loaders and mutations.

pub mod member_type;
pub mod post;
pub mod profile;
pub mod subscription;
pub mod user;
pub mod utils;

pub use member_type::MemberTypeRepository;
pub use post::PostRepository;
pub use profile::ProfileRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
