use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use lightpath_core::utils::{or_na, truncate_string};
use lightpath_core::{DashboardData, LoadState};

use crate::app::App;
use crate::ui::styles;

use super::{render_error, render_loading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match &app.dashboard {
        LoadState::Loading => render_loading(frame, "Loading dashboard...", area),
        LoadState::Failed(message) => render_error(frame, message, area),
        LoadState::Ready(data) => render_ready(frame, app, data, area),
    }
}

fn render_ready(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(6),    // Buses and weather
        ])
        .split(area);

    render_summary_cards(frame, data, chunks[0]);

    if data.weather.is_empty() {
        render_bus_table(frame, app, data, chunks[1]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[1]);
        render_bus_table(frame, app, data, body[0]);
        render_weather(frame, data, body[1]);
    }
}

fn render_summary_cards(frame: &mut Frame, data: &DashboardData, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let figures = [
        ("Total Trips Today", data.stats.trips_today.to_string()),
        ("Bookings", data.stats.bookings.to_string()),
        ("Available Seats", data.stats.available_seats.to_string()),
    ];

    for ((label, value), card) in figures.into_iter().zip(cards.iter()) {
        let lines = vec![
            Line::from(Span::styled(label, styles::muted_style())),
            Line::from(Span::styled(value, styles::stat_value_style())),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, *card);
    }
}

fn render_bus_table(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let header = Row::new([
        Cell::from("Registration"),
        Cell::from("Capacity"),
        Cell::from("Conductor"),
        Cell::from("Route"),
    ])
    .style(styles::header_style())
    .height(1);

    let rows: Vec<Row> = data
        .buses
        .iter()
        .enumerate()
        .map(|(i, bus)| {
            let style = if i == app.bus_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let capacity = bus
                .capacity
                .map(|c| c.to_string())
                .unwrap_or_else(|| or_na(None));

            Row::new(vec![
                Cell::from(or_na(bus.registration_number.as_deref())),
                Cell::from(format!("{:>8}", capacity)),
                Cell::from(truncate_string(&bus.conductor_display(), 24)),
                Cell::from(bus.route_display()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(24),
        Constraint::Fill(1),
    ];

    let title = format!(" Available Buses ({}) - [Enter] view trips ", data.buses.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !data.buses.is_empty() {
        state.select(Some(app.bus_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_weather(frame: &mut Frame, data: &DashboardData, area: Rect) {
    let mut lines = vec![];

    for sample in &data.weather {
        lines.push(Line::from(Span::styled(
            or_na(sample.location.as_deref()),
            styles::highlight_style(),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", sample.summary()),
            styles::list_item_style(),
        )));
    }

    let block = Block::default()
        .title(" Weather Overview ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
