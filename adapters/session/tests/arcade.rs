use std::{cell::RefCell, rc::Rc, time::Duration};

use snake_arcade_core::{
    CellCoord, Direction, Event, GameConfig, SessionSave, SessionState, StatsRecord,
};
use snake_arcade_session::{Arcade, SessionError};
use snake_arcade_storage::{FileStore, MemoryStore, Store, HIGH_SCORE_KEY, SAVE_KEY, STATS_KEY};

const FRAME: Duration = Duration::from_millis(200);

fn arcade() -> Arcade<MemoryStore> {
    Arcade::new(GameConfig::default(), MemoryStore::new()).expect("valid config")
}

fn doomed_save(score: u32) -> SessionSave {
    SessionSave {
        columns: 16,
        rows: 16,
        score,
        level: 1,
        snake: vec![CellCoord::new(15, 3), CellCoord::new(14, 3)],
        food: None,
    }
}

#[test]
fn starting_places_food_away_from_the_snake() {
    let mut arcade = arcade();
    arcade.request_start();

    let snapshot = arcade.snapshot();
    assert_eq!(snapshot.state, SessionState::Playing);
    let food = snapshot.food.expect("food placed on start").cell;
    assert!(!snapshot.snake.segments.contains(&food));
}

#[test]
fn direction_on_the_title_screen_starts_and_moves() {
    let mut arcade = arcade();
    arcade.request_direction(Direction::Up);
    let snapshot = arcade.frame(FRAME);

    assert_eq!(snapshot.state, SessionState::Playing);
    assert_eq!(snapshot.snake.head(), Some(CellCoord::new(8, 7)));
    assert_eq!(snapshot.steps, 1);
}

#[test]
fn listeners_observe_events_in_order() {
    let mut arcade = arcade();
    let cues = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&cues);
    arcade.on_event(move |event: &Event| {
        if let Some(cue) = event.cue() {
            sink.borrow_mut().push(cue);
        }
    });

    arcade.request_start();
    arcade.toggle_pause();
    arcade.toggle_pause();

    assert_eq!(cues.borrow().as_slice(), ["button", "pause", "resume"]);
}

#[test]
fn pause_freezes_frames() {
    let mut arcade = arcade();
    arcade.request_direction(Direction::Down);
    arcade.request_pause();
    let paused = arcade.frame(Duration::from_secs(3));
    assert_eq!(paused.state, SessionState::Paused);
    assert_eq!(paused.steps, 0);
    assert_eq!(paused.elapsed, Duration::ZERO);

    arcade.request_resume();
    assert_eq!(arcade.frame(FRAME).steps, 1);
}

#[test]
fn game_over_persists_high_score_and_statistics() {
    let mut arcade = arcade();
    assert!(arcade.restore(doomed_save(9)));
    arcade.request_direction(Direction::Right);
    let snapshot = arcade.frame(FRAME);

    assert_eq!(snapshot.state, SessionState::GameOver);
    assert_eq!(arcade.high_score(), 9);
    let store = arcade.store();
    assert_eq!(
        store.read(HIGH_SCORE_KEY).expect("memory read"),
        Some(String::from("9"))
    );
    let stats: StatsRecord = serde_json::from_str(
        &store
            .read(STATS_KEY)
            .expect("memory read")
            .expect("stats written"),
    )
    .expect("stats decode");
    assert_eq!(stats.high_score, 9);
    assert_eq!(arcade.statistics(), &stats);
}

#[test]
fn stored_records_seed_a_new_arcade() {
    let mut store = MemoryStore::new();
    store
        .write(HIGH_SCORE_KEY, String::from("25"))
        .expect("memory write");
    store
        .write(STATS_KEY, String::from("{\"games_played\": 11, \"high_score\": 30}"))
        .expect("memory write");

    let arcade = Arcade::new(GameConfig::default(), store).expect("valid config");

    assert_eq!(arcade.high_score(), 30);
    assert_eq!(arcade.statistics().games_played, 11);
    assert_eq!(arcade.state(), SessionState::StartScreen);
}

#[test]
fn saved_games_resume_in_a_later_arcade() {
    let mut arcade = arcade();
    assert!(matches!(arcade.save_game(), Err(SessionError::NothingToSave)));

    arcade.request_direction(Direction::Up);
    let _ = arcade.frame(FRAME);
    let _ = arcade.frame(FRAME);
    let saved = arcade.save_game().expect("session in progress");
    let store = arcade.into_store();
    assert!(store.read(SAVE_KEY).expect("memory read").is_some());

    let mut later = Arcade::new(GameConfig::default(), store).expect("valid config");
    assert!(later.load_game());

    let snapshot = later.snapshot();
    assert_eq!(snapshot.state, SessionState::Playing);
    assert_eq!(snapshot.snake.segments, saved.snake);
    assert_eq!(snapshot.score, saved.score);
    assert!(snapshot.food.is_some());
}

#[test]
fn unfinished_sessions_resume_from_a_reopened_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("arcade.json");

    let mut first = Arcade::new(
        GameConfig::default(),
        FileStore::open(&path).expect("open store"),
    )
    .expect("valid config");
    assert!(!first.load_game());
    first.request_direction(Direction::Down);
    let _ = first.frame(FRAME);
    let saved = first.save_game().expect("session in progress");
    drop(first);

    let mut second = Arcade::new(
        GameConfig::default(),
        FileStore::open(&path).expect("reopen store"),
    )
    .expect("valid config");
    assert!(second.load_game());
    let snapshot = second.snapshot();
    assert_eq!(snapshot.state, SessionState::Playing);
    assert_eq!(snapshot.snake.segments, saved.snake);
    assert_eq!(snapshot.snake.direction, None);
}

#[test]
fn mismatched_checkpoints_are_refused() {
    let mut arcade = arcade();
    let mut save = doomed_save(3);
    save.rows = 40;
    assert!(!arcade.restore(save));
    assert_eq!(arcade.state(), SessionState::StartScreen);
    assert!(!arcade.load_game());
}

#[test]
fn game_over_discards_the_checkpoint() {
    let mut arcade = arcade();
    assert!(arcade.restore(doomed_save(1)));
    let _ = arcade.save_game().expect("session in progress");
    arcade.request_direction(Direction::Right);
    let _ = arcade.frame(FRAME);

    assert_eq!(arcade.state(), SessionState::GameOver);
    assert_eq!(arcade.store().read(SAVE_KEY).expect("memory read"), None);

    arcade.request_title();
    assert_eq!(arcade.state(), SessionState::StartScreen);
}
