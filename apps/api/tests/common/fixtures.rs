//! Seeded graph fixtures

use feedgraph_api::models::{MemberTypeId, Post, Profile, User};
use feedgraph_api::MemoryStore;

/// A small social graph held in a [`MemoryStore`]
pub struct Graph {
    pub store: MemoryStore,
    /// ada, bob, cy (in name order)
    pub users: Vec<User>,
    /// Two posts per user, grouped by author in `users` order
    pub posts: Vec<Post>,
}

impl Graph {
    pub fn user(&self, index: usize) -> &User {
        &self.users[index]
    }
}

/// Three users, each with two posts and one outgoing subscription.
///
/// Edges form a ring: ada -> bob -> cy -> ada.
pub fn seeded_graph() -> Graph {
    let store = MemoryStore::new();
    let users: Vec<User> = ["ada", "bob", "cy"]
        .iter()
        .enumerate()
        .map(|(i, name)| store.insert_user(name, 100.0 * i as f64))
        .collect();

    let posts = users
        .iter()
        .flat_map(|user| {
            [
                store.insert_post(user.id, &format!("{} one", user.name)),
                store.insert_post(user.id, &format!("{} two", user.name)),
            ]
        })
        .collect();

    for (i, user) in users.iter().enumerate() {
        let author = &users[(i + 1) % users.len()];
        store.insert_subscription(user.id, author.id);
    }

    Graph {
        store,
        users,
        posts,
    }
}

/// [`seeded_graph`] plus a profile per user: ada and bob basic, cy business
pub fn seeded_graph_with_profiles() -> (Graph, Vec<Profile>) {
    let graph = seeded_graph();
    let profiles = graph
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let tier = if i == 2 {
                MemberTypeId::Business
            } else {
                MemberTypeId::Basic
            };
            graph.store.insert_profile(user.id, tier)
        })
        .collect();
    (graph, profiles)
}
