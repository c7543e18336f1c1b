use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a terminal focus change
pub fn handle_focus_event(app: &mut App, focused: bool) {
    app.set_focused(focused);
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Detail overlay: allow scrolling through monitors while open
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        }
        return;
    }

    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Status),
        KeyCode::Char('2') => app.set_view(View::Maintenance),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.activate(),
        KeyCode::Char(' ') => {
            if app.current_view == View::Status {
                app.toggle_selected_group();
            }
        }

        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('r') => {
            if app.force_reload() {
                app.set_status_message("Reloaded".to_string());
            } else if let Some(err) = app.load_error.clone() {
                app.set_status_message(format!("Reload failed: {}", err));
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        // Filters
        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('f') => app.cycle_status_filter(),
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        KeyCode::Char('e') => {
            let export_path = app.export_path.clone();
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Keep text but exit input mode
        KeyCode::Esc => {
            app.cancel_filter();
        }

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows below the list header
            if clicked_row > content_start_row && app.current_view == View::Status {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if item_row < app.visible_items().len() {
                    app.selected_index = item_row;
                }
            }

            // Tab bar
            if clicked_row == 1 {
                // Approximate tab positions: Status (0-10), Maintenance (11-27)
                if mouse.column < 11 {
                    app.set_view(View::Status);
                } else if mouse.column < 28 {
                    app.set_view(View::Maintenance);
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MonitorTarget, PageConfig};
    use crate::source::ChannelSource;
    use crate::viewstate::MemoryViewStore;
    use crate::data::StatusFilter;
    use crossterm::event::KeyEventKind;
    use upwatch_types::MonitorState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let config = PageConfig {
            monitors: vec![MonitorTarget::new("api", "API"), MonitorTarget::new("web", "Web")],
            ..PageConfig::default()
        };
        let (tx, source) = ChannelSource::create("test");
        tx.send(MonitorState::builder().monitor("api", |m| m).monitor("web", |m| m).build())
            .unwrap();
        let mut app = App::new(Box::new(source), config, Box::new(MemoryViewStore::new()), 1_000);
        app.tick(1_000);
        app
    }

    #[test]
    fn test_search_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        assert!(app.filter_active);
        handle_key_event(&mut app, key(KeyCode::Char('w')));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(!app.filter_active);
        assert_eq!(app.filter_text, "w");
        assert_eq!(app.visible_items().len(), 1);
    }

    #[test]
    fn test_filter_and_view_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.status_filter, StatusFilter::Issues);

        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Maintenance);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.current_view, View::Status);
    }

    #[test]
    fn test_detail_overlay_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.show_detail_overlay);
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
        handle_key_event(&mut app, KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Press));
        assert!(!app.running);
    }

    #[test]
    fn test_focus_events() {
        let mut app = app();
        handle_focus_event(&mut app, false);
        assert!(!app.focused);
        handle_focus_event(&mut app, true);
        assert!(app.focused);
    }
}
