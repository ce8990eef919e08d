//! Cache effects of mutations
//!
//! Every write that can change what a loader would return must evict the
//! affected entries here, so later reads in the same request observe the
//! new state. Creates prime instead, since nothing about a new row can be
//! cached yet.

use uuid::Uuid;

use super::loaders::Loaders;
use crate::models::{Post, Profile, User};

impl Loaders {
    /// A user was created; it has no posts or edges yet
    pub fn user_created(&self, user: &User) {
        self.users.prime(user.id, user.clone());
        self.posts.prime(user.id, Vec::new());
        self.subscribed_to.prime(user.id, Vec::new());
        self.subscribers.prime(user.id, Vec::new());
    }

    pub fn user_changed(&self, id: Uuid) {
        self.users.clear(&id);
    }

    /// A user was deleted along with its profile, posts and edges.
    ///
    /// The user may appear in any other user's edge list, so both edge
    /// loaders are emptied.
    pub fn user_deleted(&self, id: Uuid) {
        self.users.clear(&id);
        self.profiles.clear(&id);
        self.posts.clear(&id);
        self.subscribed_to.clear_all();
        self.subscribers.clear_all();
    }

    /// A post by `post.author_id` was created, changed or deleted
    pub fn post_written(&self, post: &Post) {
        self.posts.clear(&post.author_id);
    }

    pub fn profile_created(&self, profile: &Profile) {
        self.profiles.clear(&profile.user_id);
        self.profiles.prime(profile.user_id, profile.clone());
    }

    /// The profile owned by `profile.user_id` was changed or deleted
    pub fn profile_written(&self, profile: &Profile) {
        self.profiles.clear(&profile.user_id);
    }

    /// An edge between `subscriber_id` and `author_id` was added or removed
    pub fn subscription_changed(&self, subscriber_id: Uuid, author_id: Uuid) {
        self.users.clear(&subscriber_id);
        self.subscribed_to.clear(&subscriber_id);
        self.subscribers.clear(&author_id);
    }
}
