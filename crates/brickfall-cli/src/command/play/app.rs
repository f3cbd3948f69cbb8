use std::time::{Duration, Instant};

use brickfall_engine::{GameEvent, GameSession, GameSummary, RotationDirection, SessionState};
use crossterm::event::{Event, KeyCode, KeyEvent};
use log::{debug, info, warn};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    store::ScoreStore,
    tui::{App, Tui},
    ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const FPS: f64 = 60.0;

const RUNNING_KEYS: &[KeyBinding<'static>] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑", "Z"], "Rotate"),
    (&["X"], "Rotate Left"),
    (&["Space"], "Hard Drop"),
    (&["C"], "Hold"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding<'static>] = &[
    (&["Enter", "P"], "Resume"),
    (&["R"], "Reset"),
    (&["Q"], "Quit"),
];
const STOPPED_KEYS: &[KeyBinding<'static>] = &[(&["Enter"], "Start"), (&["Q"], "Quit")];

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    store: ScoreStore,
    started_at: Instant,
    saved_high_score: usize,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, store: ScoreStore, autostart: bool) -> Self {
        let saved_high_score = session.stats().high_score();
        let mut app = Self {
            session,
            store,
            started_at: Instant::now(),
            saved_high_score,
            is_exiting: false,
        };
        if autostart {
            app.session.start(app.now());
        }
        app
    }

    /// Time since the app was created, the clock fed to the session.
    fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let now = self.now();
        let state = self.session.state();
        let is_running = state.is_running();

        // Rejected actions leave the session unchanged, so their errors are dropped.
        match key.code {
            KeyCode::Left if is_running => _ = self.session.move_piece(-1, 0),
            KeyCode::Right if is_running => _ = self.session.move_piece(1, 0),
            KeyCode::Down if is_running => _ = self.session.soft_drop(),
            KeyCode::Up | KeyCode::Char('z' | 'Z') if is_running => {
                _ = self.session.rotate(RotationDirection::Clockwise);
            }
            KeyCode::Char('x' | 'X') if is_running => {
                _ = self.session.rotate(RotationDirection::CounterClockwise);
            }
            KeyCode::Char(' ') if is_running => _ = self.session.hard_drop(),
            KeyCode::Char('c' | 'C') if is_running => _ = self.session.hold(),
            KeyCode::Char('p' | 'P') | KeyCode::Esc => self.session.toggle_pause(now),
            KeyCode::Enter => match state {
                SessionState::Idle | SessionState::GameOver => self.session.start(now),
                SessionState::Paused => self.session.toggle_pause(now),
                SessionState::Running => {}
            },
            KeyCode::Char('r' | 'R') if !is_running => self.session.reset(),
            KeyCode::Char('q' | 'Q') => {
                self.save_high_score();
                self.is_exiting = true;
            }
            _ => {}
        }
    }

    fn process_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GameEvent::LinesCleared {
                    count,
                    combo,
                    points,
                } => debug!("cleared {count} lines (combo {combo}) for {points} points"),
                GameEvent::LevelUp { level } => debug!("reached level {level}"),
                GameEvent::GameOver { summary } => self.finish_game(&summary),
                GameEvent::PieceMoved
                | GameEvent::PieceRotated
                | GameEvent::HardDropped { .. }
                | GameEvent::HoldUsed
                | GameEvent::Paused
                | GameEvent::Resumed => {}
            }
        }
    }

    fn finish_game(&mut self, summary: &GameSummary) {
        info!(
            "game over: score {}, lines {}, level {}",
            summary.score, summary.lines, summary.level
        );
        if let Err(e) = self.store.save_game(summary) {
            warn!("failed to save game record: {e:#}");
        }
        self.save_high_score();
    }

    fn save_high_score(&mut self) {
        let high_score = self.session.stats().high_score();
        if high_score <= self.saved_high_score {
            return;
        }
        match self.store.save_high_score(high_score) {
            Ok(()) => self.saved_high_score = high_score,
            Err(e) => warn!("failed to save high score: {e:#}"),
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            Event::FocusLost => self.session.focus_lost(),
            _ => {}
        }
        self.process_events();
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = match self.session.state() {
            SessionState::Running => RUNNING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::Idle | SessionState::GameOver => STOPPED_KEYS,
        };
        let session_display = SessionDisplay::new(&self.session);
        let help = KeyBindingDisplay::new(bindings);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(session_display.height()), Constraint::Length(1)])
                .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        let now = self.now();
        self.session.tick(now);
        self.process_events();
    }
}
