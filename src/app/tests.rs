use super::*;
use crate::audio::PlayerEvent;
use crate::library::Track;

fn t(id: i64, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: "A".into(),
        album: "B".into(),
        filename: format!("{id}.mp3"),
        file_path: std::path::PathBuf::from(format!("/store/{id}.mp3")),
        duration: 100.0,
        duration_str: "01:40".into(),
        file_size: 1,
        import_time: id,
        is_favorite: false,
    }
}

fn session() -> Session {
    Session::new(vec![t(3, "C"), t(2, "B"), t(1, "A")])
}

#[test]
fn next_and_prev_do_not_wrap() {
    let mut s = session();
    assert_eq!(s.next_index(), None, "nothing selected yet");

    assert!(s.select_id(3));
    assert_eq!(s.prev_index(), None);
    assert_eq!(s.select_next().map(|t| t.id), Some(2));
    assert_eq!(s.select_next().map(|t| t.id), Some(1));
    assert!(s.select_next().is_none());
    assert_eq!(s.selected_track().map(|t| t.id), Some(1));
    assert_eq!(s.select_prev().map(|t| t.id), Some(2));
}

#[test]
fn selected_or_first_falls_back_to_top_of_catalog() {
    let mut s = session();
    assert_eq!(s.selected_or_first().map(|t| t.id), Some(3));
    assert_eq!(s.selected, Some(0));

    let mut empty = Session::new(Vec::new());
    assert!(empty.selected_or_first().is_none());
    assert!(!empty.select_id(1));
}

#[test]
fn delete_needs_an_explicit_yes() {
    let mut s = session();
    assert!(!s.request_delete(), "nothing selected");
    assert_eq!(s.answer_delete(true), None);

    s.select_id(2);
    assert!(s.request_delete());
    assert_eq!(s.pending_delete, Some(2));
    assert_eq!(s.status, "Delete #2 (B)? [y/N]");

    assert_eq!(s.answer_delete(false), None);
    assert_eq!(s.pending_delete, None);
    assert_eq!(s.status, "Delete cancelled");
    assert_eq!(s.tracks.len(), 3);

    assert!(s.request_delete());
    assert_eq!(s.answer_delete(true), Some(2));
    assert_eq!(s.pending_delete, None);
    assert_eq!(s.answer_delete(true), None, "an answer is consumed once");
}

#[test]
fn remove_id_keeps_cursor_on_a_neighbour() {
    let mut s = session();
    s.select_id(2);
    s.remove_id(2);
    assert_eq!(s.selected_track().map(|t| t.id), Some(1));

    s.remove_id(3);
    assert_eq!(s.selected_track().map(|t| t.id), Some(1));
    assert_eq!(s.selected, Some(0));

    s.remove_id(1);
    assert!(s.tracks.is_empty());
    assert_eq!(s.selected, None);

    // Unknown ids are ignored.
    s.remove_id(99);
}

#[test]
fn removing_the_last_selected_row_moves_up() {
    let mut s = session();
    s.select_id(1);
    s.remove_id(1);
    assert_eq!(s.selected_track().map(|t| t.id), Some(2));
}

#[test]
fn apply_reflects_player_events() {
    let mut s = session();
    assert!(!s.apply(PlayerEvent::StatusChanged(true)));
    assert_eq!(s.playback, PlaybackState::Playing);

    s.apply(PlayerEvent::PositionUpdated(12));
    assert_eq!(s.position, 12);

    s.apply(PlayerEvent::StatusChanged(false));
    assert_eq!(s.playback, PlaybackState::Paused);

    assert!(s.apply(PlayerEvent::Ended));
    assert_eq!(s.playback, PlaybackState::Stopped);
    assert_eq!(s.position, 0);

    s.apply(PlayerEvent::StatusChanged(false));
    assert_eq!(s.playback, PlaybackState::Stopped);
}
