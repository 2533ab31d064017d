use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use typemeter::config::Config;
use typemeter::generator::presets::{self, PRESETS};
use typemeter::session::{Session, SessionReport, SessionResult};
use typemeter::store::HistoryStore;

use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    PresetSelect,
    TextEntry,
    Typing,
    Result,
    History,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Session,
    /// What the user has typed; forwarded whole to the session on each change.
    pub buffer: String,
    pub target: String,
    pub target_name: Option<String>,
    pub last_report: Option<SessionReport>,
    pub history: Vec<SessionResult>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub text_input: LineInput,
    pub preset_selected: usize,
    pub status: Option<String>,
    pub should_quit: bool,
    store: Box<dyn HistoryStore>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, store: Box<dyn HistoryStore>) -> Self {
        let history = store.load_history();
        Self {
            screen: AppScreen::Menu,
            session: Session::new(),
            buffer: String::new(),
            target: String::new(),
            target_name: None,
            last_report: None,
            history,
            menu: Menu::new(theme),
            theme,
            config,
            text_input: LineInput::new(""),
            preset_selected: 0,
            status: None,
            should_quit: false,
            store,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn run_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::RandomPreset => self.start_default_preset(),
            MenuAction::PickPreset => {
                self.status = None;
                self.screen = AppScreen::PresetSelect;
            }
            MenuAction::CustomText => self.open_text_entry(),
            MenuAction::PracticeDrill => self.start_practice(),
            MenuAction::History => self.go_to_history(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    /// Configured preset if there is one, otherwise a random pick.
    pub fn start_default_preset(&mut self) {
        let preset = match self.config.default_preset.and_then(presets::preset) {
            Some(p) => p,
            None => presets::random_preset(&mut self.rng),
        };
        self.start_with_text(preset.text, Some(preset.name));
    }

    pub fn start_preset(&mut self, index: usize) {
        if let Some(preset) = presets::preset(index) {
            self.start_with_text(preset.text, Some(preset.name));
        }
    }

    pub fn preset_next(&mut self) {
        self.preset_selected = (self.preset_selected + 1) % PRESETS.len();
    }

    pub fn preset_prev(&mut self) {
        self.preset_selected = self
            .preset_selected
            .checked_sub(1)
            .unwrap_or(PRESETS.len() - 1);
    }

    pub fn open_text_entry(&mut self) {
        self.text_input = LineInput::new("");
        self.status = None;
        self.screen = AppScreen::TextEntry;
    }

    pub fn handle_text_entry(&mut self, key: KeyEvent) {
        match self.text_input.handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.go_to_menu(),
            InputResult::Submit => {
                let text = self.text_input.value().to_string();
                self.start_with_text(&text, None);
            }
        }
    }

    /// Load the last practice drill as the new target.
    pub fn start_practice(&mut self) {
        match self.last_report.as_ref().filter(|r| r.has_practice()) {
            Some(report) => {
                let practice = report.practice.clone();
                self.start_with_text(&practice, Some("Practice drill"));
            }
            None => {
                self.status = Some("No generated practice yet. Run a test first.".to_string());
            }
        }
    }

    pub fn start_with_text(&mut self, text: &str, name: Option<&str>) {
        self.target = text.to_string();
        self.target_name = name.map(str::to_string);
        self.begin_session();
    }

    /// Start (or restart) a session on the current target.
    pub fn begin_session(&mut self) {
        match self.session.start(&self.target) {
            Ok(()) => {
                self.buffer.clear();
                self.status = None;
                self.screen = AppScreen::Typing;
                info!(name = ?self.target_name, "test started");
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn handle_typing_key(&mut self, key: KeyEvent, now: Instant) {
        let chord = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => self.finish_early(now),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_session()
            }
            // Shortcut chords are not typing.
            KeyCode::Char(_) if chord => {}
            KeyCode::Backspace => self.backspace(now),
            KeyCode::Enter => self.type_char('\n', now),
            KeyCode::Tab => self.type_char('\t', now),
            KeyCode::Char(ch) => self.type_char(ch, now),
            _ => {}
        }
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        if !self.session.is_running() {
            return;
        }
        self.buffer.push(ch);
        self.forward_buffer(now);
    }

    pub fn paste(&mut self, text: &str, now: Instant) {
        if !self.session.is_running() || text.is_empty() {
            return;
        }
        self.buffer.push_str(text);
        self.forward_buffer(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if !self.session.is_running() {
            return;
        }
        if self.buffer.pop().is_some() {
            self.forward_buffer(now);
        }
    }

    fn forward_buffer(&mut self, now: Instant) {
        if let Some(report) = self.session.on_character_event(&self.buffer, now) {
            self.complete(report);
        }
    }

    /// Esc while typing: finish early once typing began, otherwise abandon.
    pub fn finish_early(&mut self, now: Instant) {
        if !self.session.has_started_typing() {
            self.reset_session();
            return;
        }
        if let Some(report) = self.session.finish(now) {
            self.complete(report);
        }
    }

    fn complete(&mut self, report: SessionReport) {
        if let Err(e) = self.store.append_history(report.result.clone()) {
            warn!(error = %e, "could not save session");
            self.status = Some(format!("Could not save history: {e}"));
        }
        self.history = self.store.load_history();
        self.last_report = Some(report);
        self.screen = AppScreen::Result;
    }

    pub fn reset_session(&mut self) {
        self.session.reset();
        self.buffer.clear();
        self.go_to_menu();
    }

    pub fn go_to_menu(&mut self) {
        if self.session.is_running() {
            self.session.reset();
            self.buffer.clear();
        }
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_history(&mut self) {
        self.history = self.store.load_history();
        self.status = None;
        self.screen = AppScreen::History;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use typemeter::engine::Issue;
    use typemeter::session::SessionState;
    use typemeter::store::MemoryStore;

    use super::*;

    fn test_app() -> App {
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        App::new(Config::default(), theme, Box::new(MemoryStore::default()))
    }

    fn type_str(app: &mut App, s: &str, t0: Instant, step_ms: u64) {
        for (i, ch) in s.chars().enumerate() {
            app.type_char(ch, t0 + Duration::from_millis(step_ms * i as u64));
        }
    }

    #[test]
    fn test_blank_custom_text_is_rejected() {
        let mut app = test_app();
        app.open_text_entry();
        app.start_with_text("   ", None);
        assert_eq!(app.screen, AppScreen::TextEntry);
        assert!(app.status.as_deref().unwrap().contains("empty"));
        assert_eq!(app.session.state(), SessionState::Idle);
    }

    #[test]
    fn test_full_run_records_history() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.start_with_text("cat", None);
        assert_eq!(app.screen, AppScreen::Typing);
        app.type_char('c', t0);
        app.type_char('o', t0 + Duration::from_millis(300));
        app.type_char('t', t0 + Duration::from_millis(900));

        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.history.len(), 1);
        let report = app.last_report.as_ref().unwrap();
        assert_eq!(report.result.accuracy, 67);
        assert!(report.issues.contains(&Issue::LowAccuracy));
    }

    #[test]
    fn test_backspace_forwards_shrunk_buffer() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.start_with_text("abc", None);
        type_str(&mut app, "ax", t0, 100);
        app.backspace(t0 + Duration::from_millis(300));
        assert_eq!(app.session.typed_text(), "a");
        type_str(&mut app, "bc", t0 + Duration::from_millis(400), 100);
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.last_report.as_ref().unwrap().result.accuracy, 100);
    }

    #[test]
    fn test_finish_early_before_typing_abandons() {
        let mut app = test_app();
        app.start_with_text("hello", None);
        app.finish_early(Instant::now());
        assert_eq!(app.screen, AppScreen::Menu);
        assert_eq!(app.session.state(), SessionState::Idle);
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_finish_early_after_typing_reports() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.start_with_text("hello world", None);
        type_str(&mut app, "hel", t0, 150);
        app.finish_early(t0 + Duration::from_millis(1000));
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn test_practice_requires_a_report() {
        let mut app = test_app();
        app.start_practice();
        assert_eq!(app.screen, AppScreen::Menu);
        assert!(app.status.is_some());
    }

    #[test]
    fn test_practice_loads_drill_as_target() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.start_with_text("dog", None);
        type_str(&mut app, "dig", t0, 200);
        app.start_practice();
        assert_eq!(app.screen, AppScreen::Typing);
        assert!(app.target.contains("Triple-key drill: iii"));
        assert_eq!(app.session.expected_text(), app.target);
    }

    #[test]
    fn test_paste_counts_once() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.start_with_text("abcdef", None);
        app.paste("abc", t0);
        assert_eq!(app.session.typed_text(), "abc");
        assert_eq!(app.session.key_stats().stats.len(), 1);
    }

    #[test]
    fn test_default_preset_from_config() {
        let mut app = test_app();
        app.config.default_preset = Some(0);
        app.start_default_preset();
        assert_eq!(app.target, PRESETS[0].text);
        assert_eq!(app.target_name.as_deref(), Some(PRESETS[0].name));
    }

    #[test]
    fn test_leaving_mid_test_resets_session() {
        let mut app = test_app();
        app.start_with_text("abc", None);
        app.type_char('a', Instant::now());
        app.go_to_menu();
        assert_eq!(app.session.state(), SessionState::Idle);
        assert!(app.buffer.is_empty());
    }

    #[test]
    fn test_modified_chars_are_not_typed() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.start_with_text("abc", None);
        app.handle_typing_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL), t0);
        app.handle_typing_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT), t0);
        assert!(app.buffer.is_empty());
        assert!(app.session.key_stats().is_empty());

        app.handle_typing_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT), t0);
        assert_eq!(app.session.typed_text(), "A");
    }

    #[test]
    fn test_ctrl_r_resets_typing() {
        let mut app = test_app();
        app.start_with_text("abc", None);
        app.type_char('a', Instant::now());
        app.handle_typing_key(
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert_eq!(app.screen, AppScreen::Menu);
        assert_eq!(app.session.state(), SessionState::Idle);
    }

    #[test]
    fn test_preset_cursor_wraps() {
        let mut app = test_app();
        app.preset_prev();
        assert_eq!(app.preset_selected, PRESETS.len() - 1);
        app.preset_next();
        assert_eq!(app.preset_selected, 0);
    }
}
