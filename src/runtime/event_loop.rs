use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, queue, style};
use tracing::info;

use crate::app::{PlaybackState, Session};
use crate::audio::{AudioBackend, PlayerEngine, PlayerEvent, PlayerState, Transport};
use crate::config::Settings;
use crate::library::{Catalog, format_duration};

/// Apply what the player queued before a stop, then rewind. An `Ended`
/// queued in that window is dropped: the stop wins.
fn settle_after_stop(rx: &Receiver<PlayerEvent>, session: &mut Session) {
    while let Ok(ev) = rx.try_recv() {
        session.apply(ev);
    }
    session.rewind();
}

/// Load the selected (or first) track and start it.
fn play_selected<B: AudioBackend>(
    player: &mut PlayerEngine<B>,
    session: &mut Session,
    rx: &Receiver<PlayerEvent>,
) -> bool {
    let Some(track) = session.selected_or_first().cloned() else {
        session.set_status("Library is empty");
        return false;
    };
    let loaded = player.load(&track);
    settle_after_stop(rx, session);
    if loaded && player.play() {
        session.set_status(format!("Playing: {} - {}", track.title, track.artist));
        true
    } else {
        session.set_status(format!("Cannot play #{} ({})", track.id, track.title));
        false
    }
}

fn play_next<B: AudioBackend>(
    player: &mut PlayerEngine<B>,
    session: &mut Session,
    rx: &Receiver<PlayerEvent>,
) {
    if session.select_next().is_some() {
        play_selected(player, session, rx);
    }
}

fn play_prev<B: AudioBackend>(
    player: &mut PlayerEngine<B>,
    session: &mut Session,
    rx: &Receiver<PlayerEvent>,
) {
    if session.select_prev().is_some() {
        play_selected(player, session, rx);
    }
}

fn stop<B: AudioBackend>(player: &mut PlayerEngine<B>, session: &mut Session, rx: &Receiver<PlayerEvent>) {
    player.stop();
    settle_after_stop(rx, session);
}

fn scrub<B: AudioBackend>(player: &mut PlayerEngine<B>, delta: i64) {
    let pos = player.snapshot().position;
    let target = pos.saturating_add_signed(delta);
    player.seek(target);
}

/// Delete track `id` from the catalog, stopping it first when it is the one
/// loaded in the player.
fn delete_track<B: AudioBackend>(
    player: &mut PlayerEngine<B>,
    session: &mut Session,
    rx: &Receiver<PlayerEvent>,
    catalog: &Catalog,
    id: i64,
) {
    if player.current_track().is_some_and(|t| t.id == id) {
        stop(player, session, rx);
    }
    let title = session
        .tracks
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.title.clone())
        .unwrap_or_default();
    if catalog.delete(id) {
        session.remove_id(id);
        session.set_status(format!("Deleted: {title}"));
    } else {
        session.set_status(format!("Delete failed: {title}"));
    }
}

/// Apply queued player notifications; advance on end-of-track when enabled.
fn drain_events<B: AudioBackend>(
    rx: &Receiver<PlayerEvent>,
    player: &mut PlayerEngine<B>,
    session: &mut Session,
    auto_advance: bool,
) {
    while let Ok(ev) = rx.try_recv() {
        if session.apply(ev) {
            if auto_advance && session.next_index().is_some() {
                play_next(player, session, rx);
            } else {
                session.set_status("Finished");
            }
        }
    }
}

fn status_line(session: &Session, player: &PlayerState) -> String {
    let icon = match session.playback {
        PlaybackState::Playing => ">",
        PlaybackState::Paused => "||",
        PlaybackState::Stopped => "[]",
    };
    let now = player
        .track
        .as_ref()
        .map(|t| format!("#{} {} - {}", t.id, t.title, t.artist))
        .unwrap_or_default();
    format!(
        "{icon} {now}  {} / {}  {}",
        format_duration(session.position as f64),
        format_duration(player.duration as f64),
        session.status
    )
}

fn draw(out: &mut impl Write, line: &str) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        style::Print(line)
    )?;
    out.flush()
}

/// Interactive transport loop over the whole catalog.
pub fn run(settings: &Settings, catalog: &Catalog, start_id: Option<i64>) -> Result<(), Box<dyn std::error::Error>> {
    if catalog.is_empty() {
        println!("Library is empty; try `cadenza import <path>`");
        return Ok(());
    }
    let mut session = Session::new(catalog.list_all());
    if let Some(id) = start_id {
        if !session.select_id(id) {
            return Err(format!("no track #{id}").into());
        }
    }

    let (tx, rx) = mpsc::channel::<PlayerEvent>();
    let mut player = PlayerEngine::open(settings.player.clone(), tx)?;
    info!("player session started with {} track(s)", session.tracks.len());

    println!("{} track(s). space: play/pause, s: stop, h/l: prev/next, H/L: scrub, d: delete, q: quit", session.tracks.len());
    play_selected(&mut player, &mut session, &rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let scrub_by = i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX);

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut last_line = String::new();
        loop {
            drain_events(&rx, &mut player, &mut session, settings.player.auto_advance);

            let line = status_line(&session, &player.snapshot());
            if line != last_line {
                draw(&mut stdout, &line)?;
                last_line = line;
            }

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if session.pending_delete.is_some() {
                let yes = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
                if let Some(id) = session.answer_delete(yes) {
                    delete_track(&mut player, &mut session, &rx, catalog, id);
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') | KeyCode::Char('p') => {
                    if player.transport() == Transport::Empty {
                        play_selected(&mut player, &mut session, &rx);
                    } else {
                        player.toggle_play_pause();
                    }
                }
                KeyCode::Char('s') => {
                    stop(&mut player, &mut session, &rx);
                    session.set_status("Stopped");
                }
                KeyCode::Char('l') | KeyCode::Char('n') => play_next(&mut player, &mut session, &rx),
                KeyCode::Char('h') | KeyCode::Char('b') => play_prev(&mut player, &mut session, &rx),
                KeyCode::Char('L') => scrub(&mut player, scrub_by),
                KeyCode::Char('H') => scrub(&mut player, -scrub_by),
                KeyCode::Char('d') => {
                    session.request_delete();
                }
                _ => {}
            }
        }
        Ok(())
    })();

    disable_raw_mode()?;
    println!();
    player.cleanup();

    run_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerSettings;
    use crate::library::Track;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::{TempDir, tempdir};

    fn t(id: i64) -> Track {
        Track {
            id,
            title: format!("Song {id}"),
            artist: "Band".into(),
            album: "LP".into(),
            filename: format!("{id}.mp3"),
            file_path: format!("/store/{id}.mp3").into(),
            duration: 200.0,
            duration_str: "03:20".into(),
            file_size: 1,
            import_time: 0,
            is_favorite: false,
        }
    }

    /// Records, for every `stop`, whether the loaded file was still on disk.
    #[derive(Clone, Default)]
    struct StubBackend {
        loaded: Arc<Mutex<Option<PathBuf>>>,
        stops_with_file: Arc<Mutex<Vec<bool>>>,
        busy: Arc<Mutex<bool>>,
    }

    impl AudioBackend for StubBackend {
        fn load(&mut self, path: &Path) -> Result<(), crate::audio::PlayerError> {
            *self.loaded.lock().unwrap() = Some(path.to_path_buf());
            Ok(())
        }
        fn play(&mut self) -> Result<(), crate::audio::PlayerError> {
            *self.busy.lock().unwrap() = true;
            Ok(())
        }
        fn pause(&mut self) {}
        fn unpause(&mut self) {}
        fn stop(&mut self) {
            *self.busy.lock().unwrap() = false;
            if let Some(p) = self.loaded.lock().unwrap().as_ref() {
                self.stops_with_file.lock().unwrap().push(p.exists());
            }
        }
        fn seek(&mut self, _position: Duration) -> Result<(), crate::audio::PlayerError> {
            Ok(())
        }
        fn is_busy(&self) -> bool {
            *self.busy.lock().unwrap()
        }
        fn position(&self) -> Duration {
            Duration::ZERO
        }
        fn release(&mut self) {}
    }

    struct Shell {
        _dir: TempDir,
        catalog: Catalog,
        backend: StubBackend,
        player: PlayerEngine<StubBackend>,
        session: Session,
        rx: Receiver<PlayerEvent>,
    }

    fn shell() -> Shell {
        let dir = tempdir().unwrap();
        let catalog = Catalog::at(dir.path().join("data"));
        catalog.initialize().unwrap();
        for (name, bytes) in [("a.mp3", "aaa"), ("b.mp3", "bbb"), ("c.mp3", "ccc")] {
            let p = dir.path().join(name);
            fs::write(&p, bytes).unwrap();
            assert_eq!(catalog.add(&[&p]).len(), 1);
        }

        let backend = StubBackend::default();
        let (tx, rx) = mpsc::channel();
        let settings = PlayerSettings {
            poll_interval_ms: 10,
            ..PlayerSettings::default()
        };
        let player = PlayerEngine::with_backend(backend.clone(), settings, tx);
        let session = Session::new(catalog.list_all());
        Shell {
            _dir: dir,
            catalog,
            backend,
            player,
            session,
            rx,
        }
    }

    #[test]
    fn status_line_names_the_loaded_track_not_the_selection() {
        let mut s = Session::new(vec![t(4), t(5)]);
        s.select_id(5);
        s.apply(PlayerEvent::StatusChanged(true));
        s.apply(PlayerEvent::PositionUpdated(65));
        s.set_status("ok");
        let player = PlayerState {
            track: Some(t(4)),
            playing: true,
            position: 65,
            duration: 200,
        };
        assert_eq!(status_line(&s, &player), "> #4 Song 4 - Band  01:05 / 03:20  ok");
    }

    #[test]
    fn status_line_with_nothing_loaded_is_still_rendered() {
        let s = Session::new(Vec::new());
        assert_eq!(status_line(&s, &PlayerState::default()), "[]   00:00 / 00:00  ");
    }

    #[test]
    fn stop_discards_progress_queued_before_it() {
        let (tx, rx) = mpsc::channel();
        let mut s = Session::new(vec![t(1)]);
        s.apply(PlayerEvent::StatusChanged(true));
        tx.send(PlayerEvent::PositionUpdated(42)).unwrap();
        tx.send(PlayerEvent::StatusChanged(false)).unwrap();

        settle_after_stop(&rx, &mut s);
        assert_eq!(s.playback, PlaybackState::Stopped);
        assert_eq!(s.position, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn deleting_the_playing_track_stops_it_before_removing_the_file() {
        let mut sh = shell();
        let playing = sh.session.tracks[1].clone();
        assert!(sh.session.select_id(playing.id));
        assert!(play_selected(&mut sh.player, &mut sh.session, &sh.rx));
        assert!(sh.player.is_playing());
        sh.backend.stops_with_file.lock().unwrap().clear();

        assert!(sh.session.request_delete());
        let id = sh.session.answer_delete(true).unwrap();
        delete_track(&mut sh.player, &mut sh.session, &sh.rx, &sh.catalog, id);

        assert!(!sh.player.is_playing());
        assert_eq!(*sh.backend.stops_with_file.lock().unwrap(), vec![true]);
        assert!(!playing.file_path.exists());
        assert_eq!(sh.catalog.get_by_id(playing.id), None);
        assert_eq!(sh.session.tracks.len(), 2);
        assert_eq!(sh.session.selected_track().map(|t| t.id), Some(sh.session.tracks[1].id));
        assert_eq!(sh.session.playback, PlaybackState::Stopped);
        assert_eq!(sh.session.status, format!("Deleted: {}", playing.title));

        sh.player.cleanup();
    }

    #[test]
    fn deleting_another_track_leaves_playback_alone() {
        let mut sh = shell();
        let first = sh.session.tracks[0].clone();
        let other = sh.session.tracks[2].clone();
        assert!(play_selected(&mut sh.player, &mut sh.session, &sh.rx));
        assert_eq!(sh.player.current_track().map(|t| t.id), Some(first.id));
        sh.backend.stops_with_file.lock().unwrap().clear();

        delete_track(&mut sh.player, &mut sh.session, &sh.rx, &sh.catalog, other.id);

        assert!(sh.player.is_playing());
        assert!(sh.backend.stops_with_file.lock().unwrap().is_empty());
        assert_eq!(sh.catalog.get_by_id(other.id), None);
        assert_eq!(sh.session.selected_track().map(|t| t.id), Some(first.id));

        sh.player.cleanup();
    }

    #[test]
    fn declined_delete_keeps_the_track() {
        let mut sh = shell();
        let target = sh.session.tracks[0].clone();
        sh.session.select_id(target.id);
        assert!(sh.session.request_delete());
        assert_eq!(sh.session.answer_delete(false), None);
        assert!(sh.catalog.get_by_id(target.id).is_some());
        assert!(target.file_path.exists());
    }
}
