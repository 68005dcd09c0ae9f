//! Tabbed form application: one tab per registered converter
//!
//! Conversions run on a worker thread per execution. The event loop polls
//! their channels every 100 ms, so the UI never blocks on `convert`.

use std::io::{stdout, Stdout};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use super::model::{Form, FormAction};
use super::picker::{FilePicker, PickerAction};
use super::render;
use crate::core::{execute, Converter, ConverterError, Output, Registry};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const RESULT_PAGE: u16 = 10;

/// What the result pane of a tab shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPane {
    Empty,
    Running,
    Success(String),
    Failure(String),
}

impl ResultPane {
    fn from_result(result: Result<Output, ConverterError>) -> Self {
        match result {
            Ok(output) => ResultPane::Success(output.to_string()),
            Err(err) => ResultPane::Failure(format!("Error: {}", err)),
        }
    }
}

struct Pending {
    receiver: Receiver<Result<Output, ConverterError>>,
    // Kept so cancellation can join or detach explicitly
    _handle: JoinHandle<()>,
}

pub struct Tab {
    pub name: String,
    pub help: String,
    pub form: Form,
    pub result: ResultPane,
    /// First visible row of the result pane, clamped when drawn
    pub result_scroll: u16,
    converter: Arc<dyn Converter>,
    pending: Option<Pending>,
}

impl Tab {
    /// Capitalized converter name for the tab bar.
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }
}

/// Open file picker and the save field it writes back to.
pub struct PickerOverlay {
    pub picker: FilePicker,
    pub field: String,
}

pub struct App {
    pub tabs: Vec<Tab>,
    pub active: usize,
    pub show_quit_confirm: bool,
    pub picker: Option<PickerOverlay>,
    pub should_quit: bool,
}

impl App {
    pub fn new(registry: &Registry) -> Result<Self> {
        let mut tabs = Vec::new();
        for entry in registry.lookup_all() {
            let converter: Arc<dyn Converter> = Arc::from(entry.instantiate());
            match Form::new(converter.as_ref()) {
                Ok(form) => tabs.push(Tab {
                    name: entry.name().to_string(),
                    help: converter.help().to_string(),
                    form,
                    result: ResultPane::Empty,
                    result_scroll: 0,
                    converter,
                    pending: None,
                }),
                Err(err) => error!(
                    converter = entry.name(),
                    "Skipping converter with invalid interface: {}", err
                ),
            }
        }

        if tabs.is_empty() {
            bail!("No converters available");
        }

        Ok(Self {
            tabs,
            active: 0,
            show_quit_confirm: false,
            picker: None,
            should_quit: false,
        })
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    fn active_tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active]
    }

    /// Switch to the tab of converter `name`.
    pub fn select_tab(&mut self, name: &str) -> bool {
        match self.tabs.iter().position(|tab| tab.name == name) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    pub fn next_tab(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    pub fn prev_tab(&mut self) {
        self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    }

    pub fn scroll_result_up(&mut self, rows: u16) {
        let tab = self.active_tab_mut();
        tab.result_scroll = tab.result_scroll.saturating_sub(rows);
    }

    pub fn scroll_result_down(&mut self, rows: u16) {
        let tab = self.active_tab_mut();
        tab.result_scroll = tab.result_scroll.saturating_add(rows);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if self.show_quit_confirm {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.should_quit = true,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.show_quit_confirm = false
                }
                _ => {}
            }
            return;
        }

        if let Some(overlay) = &mut self.picker {
            match overlay.picker.handle_key(key) {
                PickerAction::Selected(path) => {
                    let field = overlay.field.clone();
                    self.picker = None;
                    self.active_tab_mut()
                        .form
                        .set_text(&field, path.display().to_string());
                }
                PickerAction::Cancelled => self.picker = None,
                PickerAction::None => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.show_quit_confirm = true;
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.show_quit_confirm = true;
                return;
            }
            KeyCode::Up if shift => return self.scroll_result_up(1),
            KeyCode::Down if shift => return self.scroll_result_down(1),
            KeyCode::PageUp if shift => return self.scroll_result_up(RESULT_PAGE),
            KeyCode::PageDown if shift => return self.scroll_result_down(RESULT_PAGE),
            KeyCode::PageDown => return self.next_tab(),
            KeyCode::PageUp => return self.prev_tab(),
            KeyCode::Char('n') if ctrl => return self.next_tab(),
            KeyCode::Char('p') if ctrl => return self.prev_tab(),
            _ => {}
        }

        if self.active_tab().is_running() {
            return;
        }

        match self.active_tab_mut().form.handle_key(key) {
            FormAction::Execute => self.execute_active(),
            FormAction::OpenPicker(field) => {
                let current = self
                    .active_tab()
                    .form
                    .focused_field()
                    .map(|f| f.text.clone())
                    .unwrap_or_default();
                self.picker = Some(PickerOverlay {
                    picker: FilePicker::for_field(&current),
                    field,
                });
            }
            FormAction::None => {}
        }
    }

    /// Start converting the active tab's values on a worker thread.
    pub fn execute_active(&mut self) {
        let tab = self.active_tab_mut();
        if tab.pending.is_some() {
            return;
        }

        let values = tab.form.collect();
        let converter = Arc::clone(&tab.converter);
        let (sender, receiver) = mpsc::channel();

        info!(converter = %tab.name, "Executing from form");
        let handle = thread::spawn(move || {
            let result = execute(converter.as_ref(), &values);
            // The receiver is gone only if the app already quit
            let _ = sender.send(result);
        });

        tab.result = ResultPane::Running;
        tab.result_scroll = 0;
        tab.pending = Some(Pending {
            receiver,
            _handle: handle,
        });
    }

    /// Collect finished conversions into their result panes.
    pub fn poll_results(&mut self) {
        for tab in &mut self.tabs {
            let Some(pending) = &tab.pending else {
                continue;
            };
            match pending.receiver.try_recv() {
                Ok(result) => {
                    debug!(converter = %tab.name, ok = result.is_ok(), "Conversion finished");
                    tab.result = ResultPane::from_result(result);
                    tab.result_scroll = 0;
                    tab.pending = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    error!(converter = %tab.name, "Conversion worker stopped without a result");
                    tab.result =
                        ResultPane::Failure("Error: conversion stopped unexpectedly".to_string());
                    tab.pending = None;
                }
            }
        }
    }
}

/// Setup terminal for TUI rendering with panic-safe cleanup
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // Conversion workers may panic while the UI keeps running, so only a
    // panic on this thread restores the terminal
    let ui_thread = thread::current().id();
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if is_ui_thread(ui_thread) {
            teardown_terminal();
        }
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn is_ui_thread(ui_thread: ThreadId) -> bool {
    thread::current().id() == ui_thread
}

/// Restore terminal to normal state
pub fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

/// Run the form until the user quits.
pub fn run(app: &mut App) -> Result<()> {
    let mut terminal = setup_terminal().context("Failed to set up the terminal")?;
    let result = run_loop(&mut terminal, app);
    teardown_terminal();
    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.poll_results();
        terminal.draw(|f| render::draw(f, &mut *app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not release
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}
