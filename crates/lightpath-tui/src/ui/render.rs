use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use lightpath_core::Route;

use crate::app::{App, AppState, LoginFocus};

use super::styles;
use super::views::{dashboard, trips};

/// Width of the login form and confirmation dialogs
const DIALOG_WIDTH: u16 = 50;

/// Visible width of the login text fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Location
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_location(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EnteringPath => render_path_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  LightPath";
    let session_hint = if app.is_authenticated() {
        "Signed in"
    } else {
        "Signed out"
    };
    let help_hint = "[?] Help";
    let used = title.len() + session_hint.len() + help_hint.len() + 7;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(session_hint, styles::muted_style()),
        Span::styled(" | ", styles::muted_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_location(frame: &mut Frame, app: &App, area: Rect) {
    let path = app.navigator.current_path().unwrap_or("/");
    let line = Line::from(vec![
        Span::styled(" Location: ", styles::muted_style()),
        Span::styled(path.to_string(), styles::highlight_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_route() {
        Some(Route::Login) | None => render_login(frame, app, area),
        Some(Route::Dashboard) => dashboard::render(frame, app, area),
        Some(Route::Trips { bus_id }) => trips::render(frame, app, bus_id, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_route() {
        Some(Route::Dashboard) => "[Enter] trips | [r]eload | [g]o to | [q]uit",
        Some(Route::Trips { .. }) => "[Enter] details | [Esc] back | [r]eload | [g]o to | [q]uit",
        _ => "[Tab] next field | [Enter] submit | [Esc] quit",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => String::from(" "),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

// ============================================================================
// Login page
// ============================================================================

fn text_field<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { " " };
    // Show the tail of long input so the cursor stays visible.
    let shown: String = {
        let count = value.chars().count();
        value.chars().skip(count.saturating_sub(FIELD_WIDTH)).collect()
    };

    Line::from(vec![
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 12 } else { 10 };
    let form = centered_rect_fixed(DIALOG_WIDTH, height, area);

    let mut lines = vec![
        Line::from(Span::styled("  Sign in to LightPath", styles::title_style())),
        Line::from(""),
        text_field(
            "  Email:    ",
            app.login_email.clone(),
            app.login_focus == LoginFocus::Email,
        ),
        text_field(
            "  Password: ",
            "*".repeat(app.login_password.chars().count()),
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
    ];

    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = match (app.login_pending, button_focused) {
        (true, _) => " Logging in... ",
        (false, true) => "  ▶ Login ◀   ",
        (false, false) => "    Login     ",
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(" Login ");

    frame.render_widget(Paragraph::new(lines).block(block), form);
}

// ============================================================================
// Overlays
// ============================================================================

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(DIALOG_WIDTH, 21, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  LightPath", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓", "Move selection"),
        help_line("Enter", "Open trips / trip details"),
        help_line("Esc", "Go back"),
        help_line("g", "Go to a path"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("r", "Reload current view"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Login", styles::highlight_style())),
        help_line("Tab/↓", "Next field"),
        help_line("Shift+Tab", "Previous field"),
        help_line("Enter", "Submit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_path_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(DIALOG_WIDTH, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("  Go to path", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", styles::muted_style()),
            Span::styled(format!("{}▌", app.path_input), styles::input_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(DIALOG_WIDTH, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect_fixed(50, 10, outer);
        assert_eq!(inner, Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn test_centered_rect_clamped_to_area() {
        let outer = Rect::new(2, 2, 30, 5);
        let inner = centered_rect_fixed(50, 10, outer);
        assert_eq!(inner.width, 30);
        assert_eq!(inner.height, 5);
        assert_eq!((inner.x, inner.y), (2, 2));
    }
}
