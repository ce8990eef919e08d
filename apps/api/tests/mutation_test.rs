//! Integration tests for mutations and their cache effects
//!
//! Operations sharing one request context share one loader set, which is
//! how a batched HTTP request executes.

mod common;

use common::*;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

const USER_NAME: &str = "query($id: UUID!) { user(id: $id) { name } }";

#[tokio::test]
async fn test_change_user_is_visible_to_later_reads_in_same_request() {
    let graph = seeded_graph();
    let ada = graph.user(0);
    let ctx = context(&graph.store);

    let before = execute_in(&ctx, USER_NAME, json!({ "id": ada.id })).await;
    assert_eq!(before["data"]["user"]["name"], "ada");

    let changed = execute_in(
        &ctx,
        r#"mutation($id: UUID!) { changeUser(id: $id, dto: { name: "X" }) { name balance } }"#,
        json!({ "id": ada.id }),
    )
    .await;
    assert_eq!(changed["data"]["changeUser"], json!({ "name": "X", "balance": 0.0 }));

    let after = execute_in(&ctx, USER_NAME, json!({ "id": ada.id })).await;
    assert_eq!(after["data"]["user"]["name"], "X");
    assert_eq!(graph.store.calls("users_by_ids"), 2);
}

#[tokio::test]
async fn test_batched_request_shares_loaders() {
    let graph = seeded_graph();
    let bob = graph.user(1);

    let responses = execute_batch(
        &graph.store,
        vec![
            (USER_NAME, json!({ "id": bob.id })),
            (
                r#"mutation($id: UUID!) { changeUser(id: $id, dto: { name: "X" }) { id } }"#,
                json!({ "id": bob.id }),
            ),
            (USER_NAME, json!({ "id": bob.id })),
        ],
    )
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["data"]["user"]["name"], "bob");
    assert_eq!(responses[2]["data"]["user"]["name"], "X");
}

#[tokio::test]
async fn test_unsubscribe_from_missing_edge_returns_false() {
    let graph = seeded_graph();
    let (ada, cy) = (graph.user(0), graph.user(2));

    let response = execute(
        &graph.store,
        "mutation($user: UUID!, $author: UUID!) { unsubscribeFrom(userId: $user, authorId: $author) }",
        json!({ "user": ada.id, "author": cy.id }),
    )
    .await;

    assert!(response.get("errors").is_none(), "{response}");
    assert_eq!(response["data"]["unsubscribeFrom"], json!(false));
    assert_eq!(graph.store.subscription_count(), 3);
    assert_eq!(graph.store.calls("delete_subscription"), 1);
}

#[tokio::test]
async fn test_subscription_changes_refresh_edge_lists() {
    let graph = seeded_graph();
    let (ada, bob, cy) = (graph.user(0), graph.user(1), graph.user(2));
    let ctx = context(&graph.store);
    let edges = "query($id: UUID!) { user(id: $id) { userSubscribedTo { name } } }";

    let before = execute_in(&ctx, edges, json!({ "id": ada.id })).await;
    assert_eq!(before["data"]["user"]["userSubscribedTo"], json!([{ "name": "bob" }]));

    let subscribed = execute_in(
        &ctx,
        "mutation($user: UUID!, $author: UUID!) { subscribeTo(userId: $user, authorId: $author) { userSubscribedTo { name } } }",
        json!({ "user": ada.id, "author": cy.id }),
    )
    .await;
    assert_eq!(
        subscribed["data"]["subscribeTo"]["userSubscribedTo"],
        json!([{ "name": "bob" }, { "name": "cy" }])
    );

    let removed = execute_in(
        &ctx,
        "mutation($user: UUID!, $author: UUID!) { unsubscribeFrom(userId: $user, authorId: $author) }",
        json!({ "user": ada.id, "author": bob.id }),
    )
    .await;
    assert_eq!(removed["data"]["unsubscribeFrom"], json!(true));

    let after = execute_in(&ctx, edges, json!({ "id": ada.id })).await;
    assert_eq!(after["data"]["user"]["userSubscribedTo"], json!([{ "name": "cy" }]));
    assert!(!graph.store.has_subscription(ada.id, bob.id));
}

#[tokio::test]
async fn test_duplicate_subscription_is_a_conflict() {
    let graph = seeded_graph();
    let (ada, bob) = (graph.user(0), graph.user(1));

    let response = execute(
        &graph.store,
        "mutation($user: UUID!, $author: UUID!) { subscribeTo(userId: $user, authorId: $author) { id } }",
        json!({ "user": ada.id, "author": bob.id }),
    )
    .await;

    assert_eq!(error_codes(&response), vec!["CONFLICT"]);
    assert_eq!(graph.store.subscription_count(), 3);
}

#[tokio::test]
async fn test_created_user_is_served_from_cache() {
    let graph = seeded_graph();
    let ctx = context(&graph.store);

    let created = execute_in(
        &ctx,
        r#"mutation { createUser(dto: { name: "dee", balance: 5.5 }) { id name } }"#,
        json!({}),
    )
    .await;
    let id = created["data"]["createUser"]["id"].clone();
    assert_eq!(created["data"]["createUser"]["name"], "dee");

    let read = execute_in(
        &ctx,
        "query($id: UUID!) { user(id: $id) { balance posts { id } subscribedToUser { id } } }",
        json!({ "id": id }),
    )
    .await;

    assert_eq!(
        read["data"]["user"],
        json!({ "balance": 5.5, "posts": [], "subscribedToUser": [] })
    );
    assert_eq!(graph.store.total_reads(), 0);
}

#[tokio::test]
async fn test_post_mutations_refresh_author_posts() {
    let graph = seeded_graph();
    let cy = graph.user(2);
    let ctx = context(&graph.store);
    let posts = "query($id: UUID!) { user(id: $id) { posts { title } } }";

    let before = execute_in(&ctx, posts, json!({ "id": cy.id })).await;
    assert_eq!(before["data"]["user"]["posts"].as_array().unwrap().len(), 2);

    let created = execute_in(
        &ctx,
        r#"mutation($author: UUID!) { createPost(dto: { title: "cy three", content: "...", authorId: $author }) { id authorId } }"#,
        json!({ "author": cy.id }),
    )
    .await;
    assert_eq!(created["data"]["createPost"]["authorId"], json!(cy.id));
    let after_create = execute_in(&ctx, posts, json!({ "id": cy.id })).await;
    assert_eq!(after_create["data"]["user"]["posts"].as_array().unwrap().len(), 3);

    let first_post = graph.posts[4].id;
    let deleted = execute_in(
        &ctx,
        "mutation($id: UUID!) { deletePost(id: $id) }",
        json!({ "id": first_post }),
    )
    .await;
    assert_eq!(deleted["data"]["deletePost"], json!(true));
    let after_delete = execute_in(&ctx, posts, json!({ "id": cy.id })).await;
    assert_eq!(after_delete["data"]["user"]["posts"].as_array().unwrap().len(), 2);

    assert_eq!(graph.store.calls("posts_by_author_ids"), 3);
}

#[tokio::test]
async fn test_create_post_for_missing_author_is_rejected() {
    let graph = seeded_graph();

    let response = execute(
        &graph.store,
        r#"mutation($author: UUID!) { createPost(dto: { title: "t", content: "c", authorId: $author }) { id } }"#,
        json!({ "author": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(error_codes(&response), vec!["VALIDATION_ERROR"]);
}

#[tokio::test]
async fn test_profile_lifecycle_within_one_request() {
    let graph = seeded_graph();
    let bob = graph.user(1);
    let ctx = context(&graph.store);
    let profile = "query($id: UUID!) { user(id: $id) { profile { yearOfBirth memberTypeId } } }";

    let none = execute_in(&ctx, profile, json!({ "id": bob.id })).await;
    assert_eq!(none["data"]["user"]["profile"], json!(null));

    let created = execute_in(
        &ctx,
        "mutation($user: UUID!) { createProfile(dto: { userId: $user, memberTypeId: BASIC, isMale: true, yearOfBirth: 1990 }) { id } }",
        json!({ "user": bob.id }),
    )
    .await;
    let profile_id = created["data"]["createProfile"]["id"].clone();
    let after_create = execute_in(&ctx, profile, json!({ "id": bob.id })).await;
    assert_eq!(
        after_create["data"]["user"]["profile"],
        json!({ "yearOfBirth": 1990, "memberTypeId": "BASIC" })
    );

    execute_in(
        &ctx,
        "mutation($id: UUID!) { changeProfile(id: $id, dto: { memberTypeId: BUSINESS }) { id } }",
        json!({ "id": profile_id }),
    )
    .await;
    let after_change = execute_in(&ctx, profile, json!({ "id": bob.id })).await;
    assert_eq!(
        after_change["data"]["user"]["profile"]["memberTypeId"],
        "BUSINESS"
    );

    let duplicate = execute_in(
        &ctx,
        "mutation($user: UUID!) { createProfile(dto: { userId: $user, memberTypeId: BASIC, isMale: false, yearOfBirth: 2000 }) { id } }",
        json!({ "user": bob.id }),
    )
    .await;
    assert_eq!(error_codes(&duplicate), vec!["CONFLICT"]);

    let deleted = execute_in(
        &ctx,
        "mutation($id: UUID!) { deleteProfile(id: $id) }",
        json!({ "id": profile_id }),
    )
    .await;
    assert_eq!(deleted["data"]["deleteProfile"], json!(true));
    let after_delete = execute_in(&ctx, profile, json!({ "id": bob.id })).await;
    assert_eq!(after_delete["data"]["user"]["profile"], json!(null));
}

#[tokio::test]
async fn test_delete_user_cascades_and_refreshes_edges() {
    let graph = seeded_graph();
    let (ada, bob) = (graph.user(0), graph.user(1));
    let ctx = context(&graph.store);
    let followers = "query($id: UUID!) { user(id: $id) { subscribedToUser { name } } }";

    let before = execute_in(&ctx, followers, json!({ "id": bob.id })).await;
    assert_eq!(before["data"]["user"]["subscribedToUser"], json!([{ "name": "ada" }]));

    let deleted = execute_in(
        &ctx,
        "mutation($id: UUID!) { deleteUser(id: $id) }",
        json!({ "id": ada.id }),
    )
    .await;
    assert_eq!(deleted["data"]["deleteUser"], json!(true));

    let gone = execute_in(&ctx, USER_NAME, json!({ "id": ada.id })).await;
    assert_eq!(gone["data"]["user"], json!(null));
    let after = execute_in(&ctx, followers, json!({ "id": bob.id })).await;
    assert_eq!(after["data"]["user"]["subscribedToUser"], json!([]));
    assert_eq!(graph.store.subscription_count(), 1);
}

#[rstest]
#[case::user("mutation($id: UUID!) { deleteUser(id: $id) }", "deleteUser")]
#[case::post("mutation($id: UUID!) { deletePost(id: $id) }", "deletePost")]
#[case::profile("mutation($id: UUID!) { deleteProfile(id: $id) }", "deleteProfile")]
#[tokio::test]
async fn test_deleting_missing_row_returns_false(#[case] mutation: &str, #[case] field: &str) {
    let graph = seeded_graph();

    let response = execute(&graph.store, mutation, json!({ "id": Uuid::new_v4() })).await;

    assert!(response.get("errors").is_none(), "{response}");
    assert_eq!(response["data"][field], json!(false));
}

#[tokio::test]
async fn test_change_missing_user_is_not_found() {
    let graph = seeded_graph();

    let response = execute(
        &graph.store,
        r#"mutation($id: UUID!) { changeUser(id: $id, dto: { balance: 1.0 }) { id } }"#,
        json!({ "id": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(error_codes(&response), vec!["NOT_FOUND"]);
}

#[tokio::test]
async fn test_blank_user_name_is_rejected() {
    let graph = seeded_graph();

    let response = execute(
        &graph.store,
        r#"mutation { createUser(dto: { name: "  ", balance: 0 }) { id } }"#,
        json!({}),
    )
    .await;

    assert_eq!(error_codes(&response), vec!["VALIDATION_ERROR"]);
    assert_eq!(graph.store.calls("create_user"), 0);
}
