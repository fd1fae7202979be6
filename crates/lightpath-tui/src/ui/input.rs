//! Keyboard input handling for the TUI.
//!
//! Overlays take input first, then the login form, then the current view.

use crossterm::event::{KeyCode, KeyEvent};

use lightpath_core::Route;

use crate::app::{can_add_email_char, can_add_password_char, can_add_path_char, App, AppState, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => return handle_quit_input(app, key),
        AppState::EnteringPath => {
            handle_path_input(app, key);
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    match app.current_route() {
        Some(Route::Login) | None => handle_login_input(app, key),
        Some(Route::Dashboard) => {
            handle_dashboard_input(app, key);
            false
        }
        Some(Route::Trips { .. }) => {
            handle_trips_input(app, key);
            false
        }
    }
}

fn handle_quit_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.state = AppState::Quitting;
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            false
        }
        _ => false,
    }
}

fn handle_path_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.path_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            let path = std::mem::take(&mut app.path_input);
            app.state = AppState::Normal;
            if !path.is_empty() {
                app.navigate(&path);
            }
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_path_char(app.path_input.chars().count(), c) {
                app.path_input.push(c);
            }
        }
        _ => {}
    }
}

/// Keys shared by the protected views.
fn handle_common_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('g') | KeyCode::Char('/') => {
            app.path_input = if key.code == KeyCode::Char('/') {
                "/".to_string()
            } else {
                String::new()
            };
            app.state = AppState::EnteringPath;
        }
        KeyCode::Char('r') => app.reload(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        _ => return false,
    }
    true
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) {
    if handle_common_key(app, key) {
        return;
    }
    let count = app.bus_count();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.bus_selection = app.bus_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.bus_selection + 1 < count {
                app.bus_selection += 1;
            }
        }
        KeyCode::Home => app.bus_selection = 0,
        KeyCode::End => app.bus_selection = count.saturating_sub(1),
        KeyCode::Enter => app.view_selected_bus_trips(),
        _ => {}
    }
}

fn handle_trips_input(app: &mut App, key: KeyEvent) {
    if handle_common_key(app, key) {
        return;
    }
    let count = app.trip_count();
    let before = app.trip_selection;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.trip_selection = app.trip_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.trip_selection + 1 < count {
                app.trip_selection += 1;
            }
        }
        KeyCode::Home => app.trip_selection = 0,
        KeyCode::End => app.trip_selection = count.saturating_sub(1),
        KeyCode::Enter => app.open_selected_trip(),
        _ => {}
    }
    if app.trip_selection != before {
        app.trip_detail = None;
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.attempt_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.chars().count(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use lightpath_core::{Config, SessionStore};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn login_app() -> App {
        let session = Arc::new(SessionStore::in_memory());
        let mut app =
            App::with_session(Config::with_base_url("http://127.0.0.1:1"), session).unwrap();
        app.login_email.clear();
        app.navigate("/login");
        app
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_login_form_typing_and_focus() {
        let mut app = login_app();
        assert_eq!(app.login_focus, LoginFocus::Email);

        type_str(&mut app, "ama@example.com");
        handle_input(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "pa ss");

        assert_eq!(app.login_email, "ama@example.com");
        assert_eq!(app.login_password, "pa ss");
        assert_eq!(app.login_focus, LoginFocus::Password);

        handle_input(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.login_password, "pa s");

        handle_input(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.login_focus, LoginFocus::Email);
    }

    #[tokio::test]
    async fn test_submit_with_empty_password_shows_error() {
        let mut app = login_app();
        type_str(&mut app, "ama@example.com");
        handle_input(&mut app, key(KeyCode::Enter));
        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.login_error.as_deref(), Some("Email and password required"));
    }

    #[tokio::test]
    async fn test_esc_on_login_quits() {
        let mut app = login_app();
        assert!(handle_input(&mut app, key(KeyCode::Esc)));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_go_to_path_prompt() {
        let session = Arc::new(SessionStore::in_memory());
        session.save_session("tok", "ref").unwrap();
        let mut app =
            App::with_session(Config::with_base_url("http://127.0.0.1:1"), session).unwrap();
        app.navigate("/dashboard");

        handle_input(&mut app, key(KeyCode::Char('g')));
        assert_eq!(app.state, AppState::EnteringPath);
        type_str(&mut app, "/trips/5");
        handle_input(&mut app, key(KeyCode::Enter));

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.current_route(), Some(&Route::Trips { bus_id: "5".to_string() }));

        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.current_route(), Some(&Route::Dashboard));
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let session = Arc::new(SessionStore::in_memory());
        session.save_session("tok", "ref").unwrap();
        let mut app =
            App::with_session(Config::with_base_url("http://127.0.0.1:1"), session).unwrap();
        app.navigate("/dashboard");

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
    }
}
