use crate::photo::Photo;
use crate::tui::app::{grid_rows, App, Focus, GRID_COLUMNS};
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use throbber_widgets_tui::Throbber;

const CARD_HEIGHT: u16 = 5;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // search bar
            Constraint::Length(1),           // results heading
            Constraint::Min(CARD_HEIGHT),    // photo grid
            Constraint::Length(1),           // pagination indicator
            Constraint::Length(1),           // status bar
        ])
        .split(frame.area());

    draw_search_bar(frame, app, chunks[0]);
    draw_heading(frame, app, chunks[1]);
    draw_grid(frame, app, chunks[2]);
    draw_pagination_indicator(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(app.input.text()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search for images "),
    );
    frame.render_widget(input, area);

    if focused {
        let cursor_x = area.x + 1 + app.input.width_before_cursor() as u16;
        frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_heading(frame: &mut Frame, app: &App, area: Rect) {
    if app.session.photos().is_empty() {
        return;
    }

    let line = Line::from(vec![
        Span::styled(
            format!("{} Images", capitalize(app.session.query())),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC | Modifier::UNDERLINED),
        ),
        Span::styled(
            format!("  {} matches", app.session.total_results()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    app.visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

    // First page still on its way: one big centered spinner.
    if app.session.is_initial_loading() {
        let line = Line::from(vec![
            Throbber::default()
                .throbber_style(Style::default().fg(Color::Magenta))
                .to_symbol_span(&app.throbber),
            Span::styled("Searching…", Style::default().fg(Color::Magenta)),
        ]);
        let center = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), center);
        return;
    }

    let photos = app.session.photos();
    if photos.is_empty() {
        return;
    }

    let total_rows = grid_rows(photos.len());
    let first_index = app.scroll_row * GRID_COLUMNS;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); app.visible_rows])
        .split(area);

    for (row_offset, row_area) in rows.iter().enumerate() {
        if app.scroll_row + row_offset >= total_rows {
            break;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, GRID_COLUMNS as u32);
                GRID_COLUMNS
            ])
            .split(*row_area);

        for (column, cell) in columns.iter().enumerate() {
            let index = first_index + row_offset * GRID_COLUMNS + column;
            if let Some(photo) = photos.get(index) {
                draw_card(frame, app, photo, index, *cell);
            }
        }
    }
}

fn draw_card(frame: &mut Frame, app: &App, photo: &Photo, index: usize, area: Rect) {
    let selected = app.focus == Focus::Grid && index == app.selected;
    let border_style = if selected {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let alt = match photo.alt_text() {
        "" => "Untitled",
        alt => alt,
    };

    let text = vec![
        Line::from(Span::raw(alt)),
        Line::from(Span::styled(
            format!("by {}", photo.photographer),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            photo.src.medium.as_str(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let card = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" #{} ", photo.id)),
    );
    frame.render_widget(card, area);
}

fn draw_pagination_indicator(frame: &mut Frame, app: &App, area: Rect) {
    if !app.session.is_paginating() {
        return;
    }

    let line = Line::from(vec![
        Throbber::default()
            .throbber_style(Style::default().fg(Color::Magenta))
            .to_symbol_span(&app.throbber),
        Span::styled("Loading more…", Style::default().fg(Color::Magenta)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Input => "Enter search · Tab grid · Esc quit",
        Focus::Grid => "arrows select · Enter open · Tab search · q quit",
    };

    let line = Line::from(vec![
        Span::raw(app.status.as_str()),
        Span::styled(
            format!("  ·  {}", hints),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
