//! Test harness: a full `App` drawn into a `TestBackend` buffer, with bare
//! channels in place of the API worker so tests control every completion.

use std::sync::mpsc::{channel, Receiver};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use tempfile::TempDir;

use petal::app::App;
use petal::config::Config;
use petal::services::api::{ApiEvent, ApiJob};

pub struct PetalTestHarness {
    terminal: Terminal<TestBackend>,
    pub app: App,
    pub jobs: Receiver<ApiJob>,
    _dir: TempDir,
}

impl PetalTestHarness {
    pub fn new(width: u16, height: u16) -> std::io::Result<Self> {
        Self::with_config(width, height, Config::default())
    }

    pub fn with_config(width: u16, height: u16, config: Config) -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        let (jobs_tx, jobs_rx) = channel();
        let app = App::new(
            config,
            dir.path().join("config.json"),
            jobs_tx,
            dir.path().join("session.json"),
        );
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        Ok(Self {
            terminal,
            app,
            jobs: jobs_rx,
            _dir: dir,
        })
    }

    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.app.handle_key(KeyEvent::new(code, modifiers));
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    pub fn apply(&mut self, event: ApiEvent) {
        self.app.apply_event(event);
    }

    /// Drain every job the app has queued for the worker so far.
    pub fn drain_jobs(&self) -> Vec<ApiJob> {
        let mut jobs = Vec::new();
        while let Ok(job) = self.jobs.try_recv() {
            jobs.push(job);
        }
        jobs
    }

    pub fn render(&mut self) -> std::io::Result<()> {
        let Self { terminal, app, .. } = self;
        terminal.draw(|frame| app.render(frame))?;
        Ok(())
    }

    pub fn screen_to_string(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    pub fn assert_screen_contains(&self, needle: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(needle),
            "expected screen to contain {needle:?}, screen:\n{screen}"
        );
    }

    pub fn assert_screen_not_contains(&self, needle: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(needle),
            "expected screen not to contain {needle:?}, screen:\n{screen}"
        );
    }
}
