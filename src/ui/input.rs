//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::MoveSelectionLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::MoveSelectionRight),
            KeyCode::Char('[') | KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char(']') | KeyCode::Char('n') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('v') => Some(Action::ToggleViewMode),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('/') | KeyCode::Char('s') => Some(Action::StartSearch),
            KeyCode::Char('g') => Some(Action::StartPickGenre),
            KeyCode::Char('o') => Some(Action::OpenSelected),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        AppMode::Searching => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::PickingGenre => match key {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            _ => None,
        },
        AppMode::Detail => match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::Cancel),
            KeyCode::Char('o') => Some(Action::OpenSelected),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(action) = get_action(&app.mode, key.code) {
        app.dispatch(action)
    } else {
        false
    }
}
