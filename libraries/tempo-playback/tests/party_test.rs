//! Party mode and shuffle through the player

mod common;

use common::*;
use std::collections::HashSet;
use tempo_core::ids;
use tempo_playback::{NextContext, PlayerEvent, PlayerSettings, Shuffle};

fn party_library() -> MemoryLibrary {
    let mut library = MemoryLibrary::with_albums(vec![album(1, 3), album(2, 2), album(3, 2)]);
    library.genres = vec![10, 20];
    library.genre_albums.insert(10, vec![1]);
    library.genre_albums.insert(20, vec![2, 3]);
    library.genre_albums.insert(ids::POPULARS, vec![3]);
    library
}

#[test]
fn party_on_with_nothing_playing_starts_random_track() {
    let mut h = Harness::new(PlayerSettings::default(), party_library());

    h.player.set_party(true);

    assert!(h.player.is_party());
    assert!(h.player.is_playing());
    assert!(h.player.current_track().is_catalogued());
    assert_eq!(h.player.pool().albums().len(), 3);
    assert!(h
        .player
        .drain_events()
        .contains(&PlayerEvent::PartyChanged { enabled: true }));
}

#[test]
fn party_on_while_playing_keeps_current_track() {
    let mut h = Harness::new(PlayerSettings::default(), party_library());
    h.player.set_albums(vec![album(1, 3)]);
    h.start(100);

    h.player.set_party(true);

    assert_eq!(h.player.current_track().id, Some(100));
    assert!(h.player.next_track().is_some());
    assert_ne!(h.player.next_track().id, Some(100));
}

#[test]
fn party_on_replaces_radio() {
    let mut h = Harness::new(PlayerSettings::default(), party_library());
    h.player.load(radio("fip"));
    h.parser.answer(0, &["http://stream.example/fip.mp3"]);
    h.player.poll_radio();

    h.player.set_party(true);

    assert!(h.player.current_track().is_catalogued());
}

#[test]
fn party_filter_keeps_known_genres_and_sentinels() {
    let settings = PlayerSettings {
        party_ids: vec![20, 99, ids::POPULARS],
        ..PlayerSettings::default()
    };
    let mut h = Harness::new(settings, party_library());

    assert_eq!(h.player.party_genre_filter(), vec![20, ids::POPULARS]);

    h.player.set_party(true);
    let album_ids: HashSet<_> = h.player.pool().albums().iter().map(|a| a.id).collect();
    assert_eq!(album_ids, HashSet::from([2, 3]));
}

#[test]
fn party_off_keeps_current_album_in_pool() {
    let settings = PlayerSettings {
        party_ids: vec![10],
        ..PlayerSettings::default()
    };
    let mut h = Harness::new(settings, party_library());
    h.player.set_party(true);
    // User picks a track outside the party pool
    h.start(200);

    h.player.set_party(false);

    assert!(!h.player.is_party());
    assert_eq!(h.player.pool().albums()[0].id, 2);
    assert_eq!(h.player.next_track().id, Some(201));
    assert!(h
        .player
        .drain_events()
        .contains(&PlayerEvent::PartyChanged { enabled: false }));
}

#[test]
fn party_never_plays_blacklisted_tracks() {
    let mut library = MemoryLibrary::with_albums(vec![album(1, 4)]);
    library.playlists.insert(ids::NOPARTY, vec![101, 103]);
    let mut h = Harness::new(PlayerSettings::default(), library);

    h.player.set_party(true);
    let mut played = vec![h.player.current_track().id];
    h.stream_started();
    h.player.next();
    played.push(h.player.current_track().id);
    h.stream_started();

    played.sort_unstable();
    assert_eq!(played, vec![Some(100), Some(102)]);
    // Pool exhausted: nothing left, stop signaled
    assert!(h.player.next_track().is_none());
    assert_eq!(h.player.pool().next_context(), NextContext::Stop);
}

#[test]
fn radio_switches_party_off() {
    let mut h = Harness::new(PlayerSettings::default(), party_library());
    h.player.set_party(true);

    h.player.load(radio("fip"));

    assert!(!h.player.is_party());
}

#[test]
fn party_resets_playlist_pool() {
    let mut h = Harness::new(PlayerSettings::default(), party_library());
    h.player.set_playlist(vec![7], album(1, 3).tracks);

    h.player.set_party(true);

    assert!(h.player.pool().playlist_ids().is_empty());
    assert!(h.player.pool().playlist_tracks().is_empty());
}

#[test]
fn track_shuffle_plays_every_track_once() {
    let settings = PlayerSettings {
        shuffle: Shuffle::Tracks,
        ..PlayerSettings::default()
    };
    let albums = vec![album(1, 3), album(2, 2)];
    let mut h = Harness::new(settings, MemoryLibrary::with_albums(albums.clone()));
    h.player.set_albums(albums);
    h.start(100);

    let mut seen = HashSet::from([Some(100)]);
    while h.player.next_track().is_some() {
        h.player.next();
        assert!(seen.insert(h.player.current_track().id), "repeated track");
        h.stream_started();
    }

    assert_eq!(seen.len(), 5);
    assert_eq!(h.player.pool().next_context(), NextContext::Stop);
}

#[test]
fn shuffle_prev_walks_back_through_history() {
    let settings = PlayerSettings {
        shuffle: Shuffle::Tracks,
        ..PlayerSettings::default()
    };
    let albums = vec![album(1, 4), album(2, 4)];
    let mut h = Harness::new(settings, MemoryLibrary::with_albums(albums.clone()));
    h.player.set_albums(albums);
    h.start(100);
    h.player.next();
    let second = h.player.current_track().id;
    h.stream_started();

    assert_eq!(h.player.prev_track().id, Some(100));
    h.player.prev();
    h.stream_started();

    assert_eq!(h.player.current_track().id, Some(100));
    assert!(h.player.shuffle_engine().has_next());
    assert_eq!(h.player.next_track().id, second);
}

#[test]
fn shuffle_off_forgets_session_history() {
    let settings = PlayerSettings {
        shuffle: Shuffle::Tracks,
        ..PlayerSettings::default()
    };
    let albums = vec![album(1, 4), album(2, 4)];
    let mut h = Harness::new(settings, MemoryLibrary::with_albums(albums.clone()));
    h.player.set_albums(albums);
    h.start(100);
    h.player.next();
    h.stream_started();
    h.player.prev();
    h.stream_started();
    assert!(h.player.shuffle_engine().has_next());

    h.player.set_shuffle(Shuffle::None);

    assert!(h.player.shuffle_engine().history().is_empty());
    assert!(!h.player.shuffle_engine().has_next());
    assert_eq!(h.player.next_track().id, Some(101));
}

#[test]
fn last_shuffled_track_still_goes_back() {
    let settings = PlayerSettings {
        shuffle: Shuffle::Tracks,
        ..PlayerSettings::default()
    };
    let albums = vec![album(1, 3)];
    let mut h = Harness::new(settings, MemoryLibrary::with_albums(albums.clone()));
    h.player.set_albums(albums);
    h.start(100);

    let mut order = vec![Some(100)];
    while h.player.next_track().is_some() {
        h.player.next();
        order.push(h.player.current_track().id);
        h.stream_started();
    }

    assert_eq!(order.len(), 3);
    assert_eq!(h.player.pool().next_context(), NextContext::Stop);
    assert_eq!(h.player.prev_track().id, order[1]);
    assert!(h.player.shuffle_engine().has_prev());
}
