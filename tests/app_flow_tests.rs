mod common;

use common::ListingDown;
use music_playlist_client::api::mock::MockBackend;
use music_playlist_client::app::{PlaylistApp, View};
use music_playlist_client::models::AuthMode;
use music_playlist_client::ClientError;
use std::sync::Arc;

#[tokio::test]
async fn register_then_login_then_build_a_playlist() {
    let backend = Arc::new(MockBackend::demo());
    let mut app = PlaylistApp::new(backend.clone());

    let reg = app.authenticate("a@x.com", "pw", AuthMode::Register).await.unwrap();
    assert!(!reg.advance_to_dashboard);
    assert!(reg.refresh_error.is_none());
    assert!(app.session().is_authenticated());
    assert_eq!(app.view(), View::Auth);

    app.authenticate("a@x.com", "pw", AuthMode::Login).await.unwrap();
    assert_eq!(app.view(), View::Dashboard);
    assert!(app.store().playlists().is_empty());

    let store = app.store_mut();
    store.begin_create();
    store.set_name("Road Trip");
    store.set_description("");
    let created = app.save_edit().await.unwrap();
    assert_eq!(app.store().playlists().len(), 1);
    assert!(app.store().playlists()[0].songs.is_empty());

    app.select_view(View::Search).unwrap();
    assert_eq!(app.search("daft punk").await.unwrap().len(), 3);
    assert_eq!(app.attach_targets().len(), 1);
    let attached = app.attach_result(0, &created.id).await.unwrap();
    assert_eq!(attached.playlist_id, created.id);

    let songs = &app.refresh().await.unwrap()[0].songs;
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].name, "One More Time");
    assert_eq!(songs[0].artist, "Daft Punk");
}

#[tokio::test]
async fn login_refreshes_existing_playlists() {
    let backend = Arc::new(MockBackend::demo());
    let mut first = PlaylistApp::new(backend.clone());
    first.authenticate("a@x.com", "pw", AuthMode::Register).await.unwrap();
    first.store_mut().set_name("Kept");
    first.save_edit().await.unwrap();

    let mut second = PlaylistApp::new(backend.clone());
    second.authenticate("a@x.com", "pw", AuthMode::Login).await.unwrap();
    let names: Vec<_> = second.store().playlists().iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["Kept".to_string()]);
}

#[tokio::test]
async fn views_other_than_auth_need_a_token() {
    let backend = Arc::new(MockBackend::new());
    let mut app = PlaylistApp::new(backend.clone());
    assert!(app.select_view(View::Dashboard).unwrap_err().is_auth());
    assert!(app.select_view(View::Search).unwrap_err().is_auth());
    assert!(app.open_dashboard().await.unwrap_err().is_auth());
    app.select_view(View::Auth).unwrap();
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn rejected_token_resets_everything() {
    let backend = Arc::new(MockBackend::demo());
    let mut app = PlaylistApp::new(backend.clone());
    app.authenticate("a@x.com", "pw", AuthMode::Register).await.unwrap();
    app.authenticate("a@x.com", "pw", AuthMode::Login).await.unwrap();
    app.store_mut().set_name("Mine");
    app.save_edit().await.unwrap();
    app.search("daft").await.unwrap();

    backend.revoke_tokens().await;
    let err = app.refresh().await.unwrap_err();
    assert!(err.is_auth());
    assert!(!app.session().is_authenticated());
    assert_eq!(app.view(), View::Auth);
    assert!(app.store().playlists().is_empty());
    assert!(app.search_results().is_empty());

    // next call is refused locally
    let calls = backend.calls();
    assert!(app.search("daft").await.unwrap_err().is_auth());
    assert_eq!(backend.calls(), calls);
}

#[tokio::test]
async fn logout_is_local_only() {
    let backend = Arc::new(MockBackend::new());
    let mut app = PlaylistApp::new(backend.clone());
    app.authenticate("a@x.com", "pw", AuthMode::Register).await.unwrap();
    let calls = backend.calls();
    app.logout();
    assert!(!app.session().is_authenticated());
    assert_eq!(app.view(), View::Auth);
    assert_eq!(backend.calls(), calls);
}

#[tokio::test]
async fn failed_initial_refresh_does_not_fail_authentication() {
    let backend = Arc::new(ListingDown::new());
    let mut app = PlaylistApp::new(backend.clone());

    let reg = app.authenticate("a@x.com", "pw", AuthMode::Register).await.expect("register");
    assert_eq!(reg.refresh_error, Some(ClientError::Network("timeout".into())));
    assert!(app.session().is_authenticated());
    assert_eq!(app.view(), View::Auth);

    let login = app.authenticate("a@x.com", "pw", AuthMode::Login).await.expect("login");
    assert!(login.refresh_error.is_some());
    assert!(app.session().is_authenticated());
    assert_eq!(app.view(), View::Dashboard);

    // retrying from the dashboard reports the error again but keeps the session
    let err = app.open_dashboard().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(app.session().is_authenticated());
}
