//! Common test utilities for integration tests.
//!
//! Seed data and fixture builders shared by the integration tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{seeded_gateway, ash};
//!
//! let gateway = seeded_gateway();
//! let feed = FeedViewModel::new(gateway.clone());
//! feed.toggle_like("p-1", Some(&ash())).await?;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;

use pokesocial::models::{Table, UserIdentity};
use serde_json::{json, Value};

pub fn ash() -> UserIdentity {
    UserIdentity::new("u-ash", "ash@example.com")
}

pub fn misty() -> UserIdentity {
    UserIdentity::new("u-misty", "misty@example.com")
}

pub fn oak() -> UserIdentity {
    UserIdentity::new("u-oak", "oak@lab.io")
}

pub fn profile_row(user: &UserIdentity, first: &str, last: &str, special: bool, created_at: &str) -> Value {
    json!({
        "id": user.id,
        "first_name": first,
        "middle_name": null,
        "last_name": last,
        "date_of_birth": "1997-05-22",
        "country": "Japan",
        "city": "Kanto",
        "avatar_url": null,
        "is_special": special,
        "created_at": created_at
    })
}

pub fn pokemon_row(id: u32, name: &str, types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "types": types,
        "description": format!("{} description", name)
    })
}

pub fn pokemon_rows() -> Vec<Value> {
    vec![
        pokemon_row(25, "Pikachu", &["electric"]),
        pokemon_row(1, "Bulbasaur", &["grass", "poison"]),
        pokemon_row(7, "Squirtle", &["water"]),
        pokemon_row(4, "Charmander", &["fire"]),
    ]
}

/// A social gateway with three users, two posts, one like and one comment.
pub fn seeded_gateway() -> Arc<InMemoryGateway> {
    Arc::new(
        InMemoryGateway::social()
            .with_rows(
                Table::Profiles,
                vec![
                    profile_row(&oak(), "Samuel", "Oak", true, "2024-01-01T00:00:00Z"),
                    profile_row(&ash(), "Ash", "Ketchum", false, "2024-02-01T00:00:00Z"),
                    profile_row(&misty(), "Misty", "Waterflower", false, "2024-03-01T00:00:00Z"),
                ],
            )
            .with_rows(
                Table::Posts,
                vec![
                    json!({
                        "id": "p-1",
                        "user_id": ash().id,
                        "content": "Caught a Caterpie!",
                        "image_url": null,
                        "created_at": "2024-04-01T09:00:00Z"
                    }),
                    json!({
                        "id": "p-2",
                        "user_id": misty().id,
                        "content": "Gym is open today",
                        "image_url": null,
                        "created_at": "2024-04-02T09:00:00Z"
                    }),
                ],
            )
            .with_rows(
                Table::Likes,
                vec![json!({"id": "l-1", "post_id": "p-2", "user_id": ash().id})],
            )
            .with_rows(
                Table::Comments,
                vec![json!({
                    "id": "c-1",
                    "post_id": "p-2",
                    "user_id": ash().id,
                    "content": "On my way",
                    "created_at": "2024-04-02T10:00:00Z"
                })],
            )
            .with_rows(Table::Pokemon, pokemon_rows()),
    )
}

/// Every (post, user) pair appears at most once in the likes table.
pub fn likes_are_unique(gateway: &InMemoryGateway) -> bool {
    let rows = gateway.rows(Table::Likes);
    let mut seen = std::collections::HashSet::new();
    rows.iter().all(|row| {
        seen.insert((
            row["post_id"].as_str().unwrap_or_default().to_string(),
            row["user_id"].as_str().unwrap_or_default().to_string(),
        ))
    })
}
