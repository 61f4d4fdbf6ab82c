//! Command runners. Each returns the text to print.

use std::fmt::Write as _;
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};

use crate::access_gate::{AccessState, DenyReason};
use crate::display::{author_name, dex_number, full_name, short_date, short_day, PostSummary};
use crate::models::{PokedexEntry, Post, Profile, Region, UserIdentity};
use crate::session::SessionProvider;
use crate::traits::DataGateway;
use crate::view_model::{
    FeedViewModel, LoadState, PokedexViewModel, ProfileView, ProfileViewModel, UsersPage,
    UsersView,
};

fn ready(state: LoadState) -> Result<()> {
    match state {
        LoadState::Failed(message) => Err(eyre!(message)),
        _ => Ok(()),
    }
}

pub async fn pokedex(
    gateway: Arc<dyn DataGateway>,
    region: Option<&str>,
    term: Option<&str>,
) -> Result<String> {
    let view = PokedexViewModel::new(gateway, Region::from_query(region));
    view.load().await;
    ready(view.load_state().await)?;
    if let Some(term) = term {
        view.set_search_term(term).await;
    }
    Ok(render_pokedex(view.region(), &view.filtered().await))
}

pub async fn feed(gateway: Arc<dyn DataGateway>, viewer: Option<&UserIdentity>) -> Result<String> {
    let view = FeedViewModel::new(gateway);
    view.load().await;
    ready(view.load_state().await)?;
    Ok(render_feed(&view.posts().await, viewer))
}

/// Sign in with `email` and `password`, returning the identity.
pub async fn sign_in(session: &SessionProvider, email: &str, password: &str) -> Result<UserIdentity> {
    session
        .sign_in(email, password)
        .await
        .map_err(|e| eyre!(e.user_message()))
}

pub async fn profile(gateway: Arc<dyn DataGateway>, user: &UserIdentity) -> Result<String> {
    let view = ProfileViewModel::new(gateway);
    view.load(Some(user)).await;
    match view.view().await {
        ProfileView::Ready(profile) => Ok(render_profile(&profile)),
        ProfileView::Failed(message) => Err(eyre!(message)),
        ProfileView::SignInRequired => Err(eyre!("Sign in to see your profile")),
        ProfileView::Loading => Err(eyre!("Profile did not load")),
    }
}

pub async fn users(gateway: Arc<dyn DataGateway>, user: &UserIdentity) -> Result<String> {
    let page = UsersPage::new(gateway);
    page.load(Some(user)).await;
    match page.view().await {
        UsersView::Ready(users) => Ok(render_users(&users)),
        UsersView::Failed(message) => Err(eyre!(message)),
        UsersView::Denied => Err(eyre!(match page.access().await {
            AccessState::Denied(DenyReason::LookupFailed(message)) => message,
            _ => "You don't have access to the user list".to_string(),
        })),
        UsersView::Checking | UsersView::Loading => Err(eyre!("User list did not load")),
    }
}

pub fn render_pokedex(region: &Region, entries: &[PokedexEntry]) -> String {
    let mut out = format!("{} Pokédex", region.display_name());
    if !region.is_known() {
        out.push_str(" (unknown region)");
    }
    out.push('\n');
    if entries.is_empty() {
        out.push_str("No Pokémon found\n");
    }
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>5}  {:<14} {}",
            dex_number(entry.id),
            entry.name,
            entry.types.join(", ")
        );
    }
    out
}

pub fn render_feed(posts: &[Post], viewer: Option<&UserIdentity>) -> String {
    if posts.is_empty() {
        return "No posts yet\n".to_string();
    }
    let viewer_id = viewer.map(|u| u.id.as_str());
    let mut out = String::new();
    for post in posts {
        let summary = PostSummary::of(post, viewer_id);
        let _ = writeln!(out, "{} · {}", summary.author, summary.posted_on);
        let _ = writeln!(out, "  {}", post.content);
        if let Some(url) = &post.image_url {
            let _ = writeln!(out, "  [image] {}", url);
        }
        let _ = writeln!(
            out,
            "  {} {} · {} comments",
            if summary.liked_by_me { "♥" } else { "♡" },
            summary.likes,
            summary.comments
        );
        for comment in &post.comments {
            let _ = writeln!(
                out,
                "    {} {}: {}",
                short_date(&comment.created_at),
                author_name(&comment.profiles),
                comment.content
            );
        }
    }
    out
}

pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", full_name(profile));
    let _ = writeln!(out, "  Born:     {}", short_day(&profile.date_of_birth));
    let _ = writeln!(out, "  Location: {}, {}", profile.city, profile.country);
    if profile.is_special {
        let _ = writeln!(out, "  Elevated access");
    }
    out
}

pub fn render_users(users: &[Profile]) -> String {
    let mut out = String::new();
    for user in users {
        let joined = user
            .created_at
            .as_ref()
            .map(short_date)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<30} {:<24} joined {}",
            full_name(user),
            format!("{}, {}", user.city, user.country),
            joined
        );
    }
    out
}
