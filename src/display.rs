//! Presentation helpers. Pure formatting; nothing here touches state.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;

use crate::models::{AuthorSnippet, Post, Profile};

pub const FALLBACK_TYPE_COLOR: &str = "#777777";

/// Avatar placeholder sizes used across the screens.
pub const AVATAR_SMALL: u32 = 32;
pub const AVATAR_MEDIUM: u32 = 40;
pub const AVATAR_LARGE: u32 = 128;

static TYPE_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("normal", "#A8A878"),
        ("fire", "#F08030"),
        ("water", "#6890F0"),
        ("electric", "#F8D030"),
        ("grass", "#78C850"),
        ("ice", "#98D8D8"),
        ("fighting", "#C03028"),
        ("poison", "#A040A0"),
        ("ground", "#E0C068"),
        ("flying", "#A890F0"),
        ("psychic", "#F85888"),
        ("bug", "#A8B820"),
        ("rock", "#B8A038"),
        ("ghost", "#705898"),
        ("dragon", "#7038F8"),
        ("dark", "#705848"),
        ("steel", "#B8B8D0"),
        ("fairy", "#EE99AC"),
    ])
});

/// Badge colour for a type tag, case-insensitive.
pub fn type_color(type_tag: &str) -> &'static str {
    TYPE_COLORS
        .get(type_tag.to_lowercase().as_str())
        .copied()
        .unwrap_or(FALLBACK_TYPE_COLOR)
}

/// `#001`, `#025`, `#1010`
pub fn dex_number(id: u32) -> String {
    format!("#{:03}", id)
}

/// `Jun 1, 2024`
pub fn short_date(at: &DateTime<Utc>) -> String {
    format!("{} {}, {}", at.format("%b"), at.day(), at.year())
}

pub fn short_day(date: &NaiveDate) -> String {
    format!("{} {}, {}", date.format("%b"), date.day(), date.year())
}

pub fn avatar_or_placeholder(url: Option<&str>, size: u32) -> String {
    match url {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("https://via.placeholder.com/{}", size),
    }
}

pub fn author_name(author: &AuthorSnippet) -> String {
    join_names([author.first_name.as_str(), author.last_name.as_str()])
}

/// First, middle (when present) and last name.
pub fn full_name(profile: &Profile) -> String {
    join_names([
        profile.first_name.as_str(),
        profile.middle_name.as_deref().unwrap_or(""),
        profile.last_name.as_str(),
    ])
}

fn join_names<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-post figures the feed shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub author: String,
    pub posted_on: String,
    pub likes: usize,
    pub comments: usize,
    pub liked_by_me: bool,
}

impl PostSummary {
    pub fn of(post: &Post, viewer_id: Option<&str>) -> Self {
        Self {
            author: author_name(&post.profiles),
            posted_on: short_date(&post.created_at),
            likes: post.like_count(),
            comments: post.comment_count(),
            liked_by_me: viewer_id.map(|id| post.is_liked_by(id)).unwrap_or(false),
        }
    }
}
