//! Registration, sign-in and posting, end to end over the in-memory backend.

mod common;

use std::sync::Arc;

use common::*;
use pokesocial::access_gate::AccessGate;
use pokesocial::config::{ElevatedAccessPolicy, DEFAULT_ELEVATED_EMAIL};
use pokesocial::error::{AuthError, PokeError, QueryError, ValidationError};
use pokesocial::forms::{PostComposer, RegistrationFields, RegistrationForm, SubmitOutcome};
use pokesocial::models::{ImageFile, Table};
use pokesocial::session::SessionProvider;
use pokesocial::view_model::{FeedViewModel, LikeAction};

fn fields(email: &str) -> RegistrationFields {
    RegistrationFields {
        email: email.to_string(),
        password: "thunderbolt".to_string(),
        first_name: "Brock".to_string(),
        middle_name: "  ".to_string(),
        last_name: "Harrison".to_string(),
        date_of_birth: "1995-11-02".to_string(),
        country: "Japan".to_string(),
        city: "Pewter City".to_string(),
    }
}

fn form(auth: &Arc<InMemoryAuth>, gateway: &Arc<InMemoryGateway>) -> RegistrationForm {
    RegistrationForm::new(
        auth.clone(),
        gateway.clone(),
        ElevatedAccessPolicy::default(),
    )
}

#[tokio::test]
async fn test_register_sign_in_post_and_like() {
    let auth = Arc::new(InMemoryAuth::new());
    let gateway = seeded_gateway();
    let storage = Arc::new(InMemoryStorage::new());

    let registered = form(&auth, &gateway)
        .submit(&fields("brock@example.com"))
        .await
        .unwrap();
    assert!(!registered.profile.is_special);
    assert_eq!(registered.profile.middle_name, None);
    assert_eq!(gateway.rows(Table::Profiles).len(), 4);

    let session = SessionProvider::new(auth.clone());
    let mut changes = session.subscribe();
    let user = session
        .sign_in("brock@example.com", "thunderbolt")
        .await
        .unwrap();
    assert_eq!(user, registered.user);
    assert!(changes.has_changed().unwrap());
    assert_eq!(changes.borrow_and_update().as_ref(), Some(&user));

    let feed = FeedViewModel::new(gateway.clone());
    feed.load().await;
    let composer = PostComposer::new(gateway.clone(), storage.clone(), "post-images");
    composer.set_text("Rock-type gym, come visit").await;
    composer
        .attach_image(ImageFile::new("onix.jpg", "image/jpeg", vec![0xff, 0xd8]).unwrap())
        .await;

    let current = session.current();
    let outcome = composer.submit(current.as_ref(), &feed).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Posted);
    assert_eq!(storage.upload_count(), 1);

    let posts = feed.posts().await;
    assert_eq!(posts.len(), 3);
    let mine = posts.iter().find(|p| p.user_id == user.id).unwrap();
    assert_eq!(mine.profiles.first_name, "Brock");
    assert!(mine.image_url.as_deref().unwrap().ends_with(".jpg"));

    let post_id = mine.id.clone();
    assert_eq!(
        feed.toggle_like(&post_id, current.as_ref()).await.unwrap(),
        LikeAction::Liked
    );

    session.sign_out().await.unwrap();
    assert_eq!(session.current(), None);
    assert_eq!(
        feed.toggle_like(&post_id, session.current().as_ref())
            .await
            .unwrap(),
        LikeAction::Skipped
    );
}

#[tokio::test]
async fn test_reserved_email_is_elevated() {
    let auth = Arc::new(InMemoryAuth::new());
    let gateway = seeded_gateway();

    let registered = form(&auth, &gateway)
        .submit(&fields(DEFAULT_ELEVATED_EMAIL))
        .await
        .unwrap();
    assert!(registered.profile.is_special);

    let gate = AccessGate::new(gateway.clone());
    assert!(gate.resolve(Some(&registered.user)).await.is_granted());
}

#[tokio::test]
async fn test_other_emails_are_not_elevated() {
    let auth = Arc::new(InMemoryAuth::new());
    let gateway = seeded_gateway();
    let form = form(&auth, &gateway);

    let variants = [
        DEFAULT_ELEVATED_EMAIL.to_uppercase(),
        format!(" {}", DEFAULT_ELEVATED_EMAIL),
        "gary@example.com".to_string(),
    ];
    for email in &variants {
        let registered = form.submit(&fields(email)).await.unwrap();
        assert!(!registered.profile.is_special, "{} was elevated", email);
    }
}

#[tokio::test]
async fn test_custom_policy() {
    let auth = Arc::new(InMemoryAuth::new());
    let gateway = seeded_gateway();
    let form = RegistrationForm::new(
        auth,
        gateway,
        ElevatedAccessPolicy::parse("nurse@center.jp, joy@center.jp"),
    );

    assert!(form.submit(&fields("joy@center.jp")).await.unwrap().profile.is_special);
    assert!(!form
        .submit(&fields(DEFAULT_ELEVATED_EMAIL))
        .await
        .unwrap()
        .profile
        .is_special);
}

#[tokio::test]
async fn test_profile_failure_leaves_identity() {
    let auth = Arc::new(InMemoryAuth::new());
    let gateway = seeded_gateway();
    gateway.fail(
        Op::Insert,
        Table::Profiles,
        QueryError::Status {
            table: "profiles".to_string(),
            status: 403,
            message: "new row violates row-level security policy".to_string(),
        },
    );

    let err = form(&auth, &gateway)
        .submit(&fields("brock@example.com"))
        .await
        .unwrap_err();
    let user = auth.account("brock@example.com").unwrap();
    match err {
        PokeError::RegistrationIncomplete { user_id, .. } => assert_eq!(user_id, user.id),
        other => panic!("expected a partial registration, got {:?}", other),
    }
    assert_eq!(gateway.rows(Table::Profiles).len(), 3);
}

#[tokio::test]
async fn test_sign_up_failure_skips_profile() {
    let auth = Arc::new(InMemoryAuth::new().with_account("u-brock", "brock@example.com", "x"));
    let gateway = seeded_gateway();
    gateway.clear_calls();

    let err = form(&auth, &gateway)
        .submit(&fields("brock@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PokeError::Auth(AuthError::SignUpRejected { .. })
    ));
    assert_eq!(gateway.count(Op::Insert, Table::Profiles), 0);
}

#[tokio::test]
async fn test_invalid_fields_send_nothing() {
    let auth = Arc::new(InMemoryAuth::new());
    let gateway = seeded_gateway();
    gateway.clear_calls();

    let mut short = fields("brock@example.com");
    short.password = "onix".to_string();
    let err = form(&auth, &gateway).submit(&short).await.unwrap_err();
    assert_eq!(
        err,
        PokeError::Validation(ValidationError::PasswordTooShort { min: 6 })
    );

    let mut bad_date = fields("brock@example.com");
    bad_date.date_of_birth = "02/11/1995".to_string();
    let err = form(&auth, &gateway).submit(&bad_date).await.unwrap_err();
    assert!(matches!(
        err,
        PokeError::Validation(ValidationError::InvalidDate { .. })
    ));

    assert_eq!(auth.count(AuthOp::SignUp), 0);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_whitespace_post_sends_nothing() {
    let gateway = seeded_gateway();
    let storage = Arc::new(InMemoryStorage::new());
    let feed = FeedViewModel::new(gateway.clone());
    gateway.clear_calls();

    let composer = PostComposer::new(gateway.clone(), storage.clone(), "post-images");
    composer.set_text(" \t\n ").await;
    composer
        .attach_image(ImageFile::new("a.png", "image/png", vec![1u8]).unwrap())
        .await;

    let outcome = composer.submit(Some(&ash()), &feed).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Skipped);
    assert_eq!(storage.upload_count(), 0);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_restore_with_failing_provider_signs_out() {
    let auth = Arc::new(InMemoryAuth::new().signed_in_as(ash()));
    let session = SessionProvider::new(auth.clone());
    assert_eq!(session.restore().await.unwrap(), Some(ash()));
    assert_eq!(session.current(), Some(ash()));

    auth.fail(
        AuthOp::CurrentUser,
        AuthError::Connection {
            message: "offline".to_string(),
        },
    );
    assert!(session.restore().await.is_err());
    assert_eq!(session.current(), None);
}
