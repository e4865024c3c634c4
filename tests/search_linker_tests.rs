use music_playlist_client::api::mock::MockBackend;
use music_playlist_client::linker::{AttachTarget, PlaylistSongLinker};
use music_playlist_client::models::{AuthMode, Song};
use music_playlist_client::search::SongSearch;
use music_playlist_client::session::{Session, SessionManager};
use music_playlist_client::store::PlaylistStore;
use std::sync::Arc;

async fn logged_in(backend: &Arc<MockBackend>) -> Session {
    let mut sm = SessionManager::new(backend.clone());
    sm.authenticate("a@x.com", "pw", AuthMode::Register).await.unwrap();
    sm.session().clone()
}

#[tokio::test]
async fn new_search_replaces_previous_results() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut search = SongSearch::new(backend.clone());

    let q1 = search.search(&session, "daft punk").await.unwrap().len();
    assert_eq!(q1, 3);
    search.search(&session, "m83").await.unwrap();
    assert_eq!(search.results().len(), 1);
    assert_eq!(search.results()[0].artist, "M83");
}

#[tokio::test]
async fn blank_query_is_sent_and_may_be_empty() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut search = SongSearch::new(backend.clone());
    let before = backend.calls();

    let res = search.search(&session, "   ").await.unwrap();
    assert!(res.is_empty());
    assert_eq!(backend.calls(), before + 1);
}

#[tokio::test]
async fn repeated_query_is_not_cached() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut search = SongSearch::new(backend.clone());
    let before = backend.calls();

    search.search(&session, "discovery").await.unwrap();
    search.search(&session, "discovery").await.unwrap();
    assert_eq!(backend.calls(), before + 2);
}

#[tokio::test]
async fn failed_search_keeps_previous_results() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut search = SongSearch::new(backend.clone());
    search.search(&session, "aphex").await.unwrap();

    backend.revoke_tokens().await;
    let err = search.search(&session, "daft").await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(search.results().len(), 1);
}

#[tokio::test]
async fn targets_come_from_local_collection_without_fetching() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut store = PlaylistStore::new(backend.clone());
    let a = store.create(&session, "Road Trip", "").await.unwrap();

    // created by another client; not visible until the next refresh
    let mut other = PlaylistStore::new(backend.clone());
    other.create(&session, "Elsewhere", "").await.unwrap();

    let calls = backend.calls();
    assert_eq!(PlaylistSongLinker::targets_of(&store).len(), 1);
    let linker = PlaylistSongLinker::new(&mut store);
    assert_eq!(
        linker.targets(),
        vec![AttachTarget {
            id: a.id.clone(),
            name: "Road Trip".into()
        }]
    );
    assert_eq!(backend.calls(), calls);
}

#[tokio::test]
async fn attach_first_result_to_road_trip() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut store = PlaylistStore::new(backend.clone());
    let mut search = SongSearch::new(backend.clone());
    let road_trip = store.create(&session, "Road Trip", "").await.unwrap();

    let first = search.search(&session, "daft punk").await.unwrap()[0].clone();
    let attached = PlaylistSongLinker::new(&mut store)
        .attach(&session, &road_trip.id, &first)
        .await
        .unwrap();

    assert_eq!(attached.playlist_name.as_deref(), Some("Road Trip"));
    assert!(attached.to_string().starts_with("Song added to playlist!"));
    let songs = &store.find(&road_trip.id).unwrap().songs;
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].name, first.name);
    assert_eq!(songs[0].artist, first.artist);
}

#[tokio::test]
async fn attach_without_session_makes_no_call() {
    let backend = Arc::new(MockBackend::demo());
    let mut store = PlaylistStore::new(backend.clone());
    let song = Song::new("Get Lucky", "Daft Punk", "Random Access Memories");

    let err = PlaylistSongLinker::new(&mut store)
        .attach(&Session::new(), "p1", &song)
        .await
        .unwrap_err();
    assert!(err.is_auth());

    let mut search = SongSearch::new(backend.clone());
    assert!(search.search(&Session::new(), "daft").await.unwrap_err().is_auth());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn attach_to_deleted_playlist_is_not_found() {
    let backend = Arc::new(MockBackend::demo());
    let session = logged_in(&backend).await;
    let mut store = PlaylistStore::new(backend.clone());
    let song = Song::new("Get Lucky", "Daft Punk", "Random Access Memories");

    let err = PlaylistSongLinker::new(&mut store)
        .attach(&session, "missing", &song)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
