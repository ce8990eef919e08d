//! GraphQL type definitions for Feedgraph
//!
//! Each object wraps its database model and resolves relation fields through
//! the per-request loaders.

mod member_type;
mod post;
mod profile;
mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::Post;
pub use profile::Profile;
pub use user::User;
