use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use log::{error, info, warn};

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::{InputSource, InputState};
use crate::types::Vector2D;

// --- Held-state tracking ---

/// One button's level within a frame. A press and release that both land in the
/// same frame still read as held for that frame so the edge is not lost.
#[derive(Clone, Copy, Debug, Default)]
struct Level {
    down: bool,
    fresh: bool,
    release_pending: bool,
}

impl Level {
    fn press(&mut self) {
        self.down = true;
        self.fresh = true;
        self.release_pending = false;
    }

    fn release(&mut self) {
        if self.fresh {
            self.release_pending = true;
        } else {
            self.down = false;
        }
    }

    fn set(&mut self, down: bool) {
        if down { self.press() } else { self.release() }
    }

    fn begin_frame(&mut self, auto_release: bool) {
        if self.release_pending || auto_release {
            self.down = false;
        }
        self.fresh = false;
        self.release_pending = false;
    }
}

pub struct InputTracker {
    columns: u16,
    rows: u16,
    key_release_events: bool,
    aim: Vector2D,
    thrust: Level,
    shoot_button: Level,
    shoot_key: Level,
    pause: Level,
    high_scores: Level,
    restart: Level,
    quit: bool,
    resized: Option<(u16, u16)>,
}

impl InputTracker {
    /// `key_release_events` says whether the terminal reports key releases. Without
    /// them a key only counts as held in the frame its press or repeat arrived.
    pub fn new(columns: u16, rows: u16, key_release_events: bool) -> Self {
        InputTracker {
            columns: columns.max(1),
            rows: rows.max(1),
            key_release_events,
            aim: InputState::default().aim,
            thrust: Level::default(),
            shoot_button: Level::default(),
            shoot_key: Level::default(),
            pause: Level::default(),
            high_scores: Level::default(),
            restart: Level::default(),
            quit: false,
            resized: None,
        }
    }

    pub fn begin_frame(&mut self) {
        let auto_release = !self.key_release_events;
        self.thrust.begin_frame(false);
        self.shoot_button.begin_frame(false);
        for key in [&mut self.shoot_key, &mut self.pause, &mut self.high_scores, &mut self.restart] {
            key.begin_frame(auto_release);
        }
        self.resized = None;
    }

    pub fn cell_to_field(&self, column: u16, row: u16) -> Vector2D {
        Vector2D::new(
            (column as f64 + 0.5) * SCREEN_WIDTH / self.columns as f64,
            (row as f64 + 0.5) * SCREEN_HEIGHT / self.rows as f64,
        )
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Key(key_event) => self.apply_key(key_event),
            Event::Mouse(mouse_event) => self.apply_mouse(mouse_event),
            Event::Resize(columns, rows) => {
                self.columns = (*columns).max(1);
                self.rows = (*rows).max(1);
                self.resized = Some((self.columns, self.rows));
            }
            _ => {}
        }
    }

    fn apply_key(&mut self, key_event: &KeyEvent) {
        let down = key_event.kind != KeyEventKind::Release;
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit |= down;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit |= down,
            KeyCode::Char(' ') => self.shoot_key.set(down),
            KeyCode::Enter => self.pause.set(down),
            KeyCode::Char('h') | KeyCode::Char('H') => self.high_scores.set(down),
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart.set(down),
            _ => {}
        }
    }

    fn apply_mouse(&mut self, mouse_event: &MouseEvent) {
        self.aim = self.cell_to_field(mouse_event.column, mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.thrust.press(),
            MouseEventKind::Up(MouseButton::Left) => self.thrust.release(),
            MouseEventKind::Down(MouseButton::Right) => self.shoot_button.press(),
            MouseEventKind::Up(MouseButton::Right) => self.shoot_button.release(),
            _ => {}
        }
    }

    pub fn snapshot(&self) -> InputState {
        InputState {
            aim: self.aim,
            thrust: self.thrust.down,
            shoot_button: self.shoot_button.down,
            shoot_key: self.shoot_key.down,
            pause: self.pause.down,
            high_scores: self.high_scores.down,
            restart: self.restart.down,
            quit: self.quit,
            resized: self.resized,
        }
    }
}

// --- Live terminal input ---

pub struct TerminalInput {
    tracker: InputTracker,
}

impl TerminalInput {
    pub fn new(columns: u16, rows: u16, key_release_events: bool) -> Self {
        TerminalInput { tracker: InputTracker::new(columns, rows, key_release_events) }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, _frame: u64) -> io::Result<InputState> {
        self.tracker.begin_frame();
        while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
            let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
            self.tracker.apply(&event);
        }
        Ok(self.tracker.snapshot())
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
    tracker: InputTracker,
}

impl SimulatedInput {
    pub fn new(columns: u16, rows: u16, events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events, tracker: InputTracker::new(columns, rows, true) }
    }

    pub fn demo(columns: u16, rows: u16) -> Self {
        let (right, middle) = (columns.saturating_sub(2), rows / 2);
        let mouse = |kind: MouseEventKind| Event::Mouse(MouseEvent { kind, column: right, row: middle, modifiers: KeyModifiers::NONE });
        let key = |code: KeyCode, kind: KeyEventKind| Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind));

        let mut events: HashMap<u64, Vec<Event>> = HashMap::new();
        events.insert(1, vec![mouse(MouseEventKind::Moved)]);
        events.insert(10, vec![mouse(MouseEventKind::Down(MouseButton::Left))]);
        events.insert(40, vec![mouse(MouseEventKind::Up(MouseButton::Left))]);
        for frame in [50, 70, 90] {
            events.insert(frame, vec![key(KeyCode::Char(' '), KeyEventKind::Press)]);
            events.insert(frame + 5, vec![key(KeyCode::Char(' '), KeyEventKind::Release)]);
        }
        events.insert(120, vec![
            mouse(MouseEventKind::Down(MouseButton::Right)),
            mouse(MouseEventKind::Up(MouseButton::Right)),
        ]);
        events.insert(150, vec![key(KeyCode::Enter, KeyEventKind::Press), key(KeyCode::Enter, KeyEventKind::Release)]);
        events.insert(180, vec![key(KeyCode::Enter, KeyEventKind::Press), key(KeyCode::Enter, KeyEventKind::Release)]);
        events.insert(200, vec![key(KeyCode::Char('h'), KeyEventKind::Press), key(KeyCode::Char('h'), KeyEventKind::Release)]);
        events.insert(230, vec![key(KeyCode::Char('h'), KeyEventKind::Press), key(KeyCode::Char('h'), KeyEventKind::Release)]);
        events.insert(300, vec![key(KeyCode::Char('q'), KeyEventKind::Press)]); // Quit after 300 frames
        SimulatedInput::new(columns, rows, events)
    }
}

impl InputSource for SimulatedInput {
    fn poll(&mut self, frame: u64) -> io::Result<InputState> {
        self.tracker.begin_frame();
        if let Some(events) = self.events.remove(&frame) {
            for event in &events {
                self.tracker.apply(event);
            }
        }
        Ok(self.tracker.snapshot())
    }
}

// --- Terminal session ---

pub struct TerminalSession {
    key_release_events: bool,
}

impl TerminalSession {
    pub fn start() -> io::Result<Self> {
        info!("Attempting to enable raw mode.");
        enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)
            .map_err(|e| { error!("Failed to prepare terminal: {}", e); e })?;

        let key_release_events = supports_keyboard_enhancement().unwrap_or(false);
        if key_release_events {
            execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
            info!("Terminal reports key releases.");
        } else {
            warn!("Terminal does not report key releases; held keys repeat at the keyboard rate.");
        }
        stdout.flush()?;
        Ok(TerminalSession { key_release_events })
    }

    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.key_release_events {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        if let Err(e) = execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen) {
            error!("Failed to restore terminal: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
        info!("Terminal restored.");
    }
}
