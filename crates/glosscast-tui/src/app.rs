use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent};
use glosscast_core::{DisplayState, UiCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Call,
    Logs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    None,
    Quit,
    Command(UiCommand),
}

pub struct App {
    pub tab: Tab,
    pub state: DisplayState,
    pub should_quit: bool,
    pub logs: Arc<Mutex<VecDeque<String>>>,
    pub log_scroll: usize,
    pub log_auto_scroll: bool,
}

impl App {
    pub fn new(logs: Arc<Mutex<VecDeque<String>>>) -> Self {
        Self {
            tab: Tab::Call,
            state: DisplayState::default(),
            should_quit: false,
            logs,
            log_scroll: 0,
            log_auto_scroll: true,
        }
    }

    pub fn update_state(&mut self, new_state: DisplayState) {
        self.state = new_state;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Global keys
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return AppAction::Quit;
            }
            KeyCode::Char('1') => {
                self.tab = Tab::Call;
                return AppAction::None;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Logs;
                return AppAction::None;
            }
            KeyCode::Char('l') => {
                return AppAction::Command(UiCommand::ToggleListening);
            }
            _ => {}
        }

        // Tab-specific keys
        match self.tab {
            Tab::Logs => self.handle_logs_key(key),
            Tab::Call => AppAction::None,
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                self.log_scroll = self.log_scroll.saturating_add(1);
                self.log_auto_scroll = false;
                AppAction::None
            }
            KeyCode::Down => {
                self.log_scroll = self.log_scroll.saturating_sub(1);
                AppAction::None
            }
            KeyCode::Char('G') => {
                self.log_scroll = 0;
                self.log_auto_scroll = true;
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}
