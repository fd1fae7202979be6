use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use lightpath_core::models::Trip;
use lightpath_core::utils::{format_datetime, format_fare, or_na, NOT_AVAILABLE};
use lightpath_core::{LoadState, TripCard};

use crate::app::App;
use crate::ui::styles;

use super::{render_error, render_loading};

pub fn render(frame: &mut Frame, app: &App, bus_id: &str, area: Rect) {
    match &app.trips {
        LoadState::Loading => render_loading(frame, "Loading trips...", area),
        LoadState::Failed(message) => render_error(frame, message, area),
        LoadState::Ready(cards) if cards.is_empty() => {
            let lines = vec![
                Line::from(Span::styled(format!("Trips for Bus {}", bus_id), styles::title_style())),
                Line::from(""),
                Line::from(Span::styled("No trips available for this bus.", styles::muted_style())),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false));
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
        LoadState::Ready(cards) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            render_trip_table(frame, app, bus_id, cards, chunks[0]);
            render_trip_detail(frame, app, cards, chunks[1]);
        }
    }
}

fn render_trip_table(frame: &mut Frame, app: &App, bus_id: &str, cards: &[TripCard], area: Rect) {
    let header = Row::new([
        Cell::from("Route"),
        Cell::from("From"),
        Cell::from("To"),
        Cell::from("Departure"),
        Cell::from("Fare"),
        Cell::from("Seats"),
    ])
    .style(styles::header_style())
    .height(1);

    let rows: Vec<Row> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let style = if i == app.trip_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(card.route_name.clone()),
                Cell::from(card.from.clone()),
                Cell::from(card.to.clone()),
                Cell::from(departure(card.departure_time.as_deref())),
                Cell::from(format_fare(card.fare.as_deref())),
                Cell::from(seats(card.available_seats)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Trips for Bus {} ({}) ", bus_id, cards.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.trip_selection));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_trip_detail(frame: &mut Frame, app: &App, cards: &[TripCard], area: Rect) {
    let block = Block::default()
        .title(" Trip ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let lines = match &app.trip_detail {
        Some((_, LoadState::Loading)) => vec![Line::from(Span::styled(
            "Loading trip details...",
            styles::muted_style(),
        ))],
        Some((_, LoadState::Failed(message))) => vec![Line::from(Span::styled(
            message.clone(),
            styles::error_style(),
        ))],
        Some((_, LoadState::Ready(trip))) => trip_lines(trip),
        // Nothing fetched yet: show what the list already knows.
        None => match cards.get(app.trip_selection) {
            Some(card) => card_lines(card),
            None => vec![],
        },
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<16}", label), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}

fn card_lines(card: &TripCard) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(card.route_name.clone(), styles::highlight_style())),
        Line::from(""),
        field("From:", card.from.clone()),
        field("To:", card.to.clone()),
        field("Departure:", departure(card.departure_time.as_deref())),
        field("Fare:", format_fare(card.fare.as_deref())),
        field("Available Seats:", seats(card.available_seats)),
        Line::from(""),
        Line::from(Span::styled("[Enter] fetch details", styles::muted_style())),
    ]
}

fn trip_lines(trip: &Trip) -> Vec<Line<'static>> {
    let mut lines = card_lines(&TripCard::from(trip));
    lines.truncate(lines.len() - 2);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Trip #{}", or_na(trip.id.as_deref())),
        styles::success_style(),
    )));
    lines
}

fn departure(time: Option<&str>) -> String {
    time.map(format_datetime)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn seats(available: Option<i64>) -> String {
    available
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
