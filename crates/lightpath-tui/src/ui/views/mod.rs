//! Content for the protected routes.

pub mod dashboard;
pub mod trips;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::styles;

/// Placeholder shown while a view's data is in flight.
pub(crate) fn render_loading(frame: &mut Frame, message: &str, area: Rect) {
    let line = Line::from(Span::styled(message, styles::muted_style()));
    frame.render_widget(Paragraph::new(line), padded(area));
}

/// A failed load shows its message and nothing else.
pub(crate) fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(message.to_string(), styles::error_style())),
        Line::from(""),
        Line::from(Span::styled("Press [r] to retry", styles::muted_style())),
    ];
    frame.render_widget(Paragraph::new(lines), padded(area));
}

fn padded(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(2),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(1),
    }
}
