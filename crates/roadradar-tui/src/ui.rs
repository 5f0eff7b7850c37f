//! Frame drawing. Pure layout and text assembly; all state comes in
//! through [`App`] and nothing here mutates it except the radar pane,
//! which adopts its inner size so the rasterizer and the mouse handler
//! agree on the drawable region.

use ratatui::{prelude::*, widgets::*};
use roadradar_core::radar::{self, Grid};
use roadradar_core::{geo, ManeuverKind, ManeuverModifier, NavSummary};

use crate::app::App;

const KEYS_HINT: &str =
    " q quit · d destination · r refresh · t track · c clear · n/p step · arrows pan · 0 center";

/// Road names longer than this are cut with an ellipsis in the panels.
const NAME_LIMIT: usize = 19;
/// Upcoming maneuvers shown in the turn list.
const TURN_LIST_LEN: usize = 5;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(outer[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(6),
        ])
        .split(main[0]);

    let summary = app
        .tracker
        .summary(app.position.as_ref().map(|s| s.point));

    draw_direction(frame, left[0], app, &summary);
    draw_turn_list(frame, left[1], app);
    draw_route_info(frame, left[2], app, &summary);
    draw_position(frame, left[3], app);
    draw_radar(frame, main[1], app);
    draw_status_bar(frame, outer[1], app);

    if app.search_open {
        draw_search(frame, frame.area(), app);
    }
}

fn draw_radar(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().borders(Borders::ALL).title(" Radar ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // The mouse handler and the projector both need the post-layout size.
    app.radar_area = inner;
    app.view.resize(inner.width, inner.height);

    let grid = radar::render(&app.view, &app.theme, &app.scene(), app.settings.radar_scale);
    frame.render_widget(Paragraph::new(grid_lines(&grid)), inner);
}

/// Convert a rendered grid into styled lines, coalescing runs of
/// same-colored cells into single spans.
fn grid_lines(grid: &Grid) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(usize::from(grid.height()));
    for row in grid.rows() {
        let mut spans: Vec<Span> = Vec::new();
        let mut run = String::new();
        let mut run_color = None;
        for cell in row {
            if run_color != Some(cell.color) && !run.is_empty() {
                let color = run_color.unwrap_or(roadradar_core::Color::White);
                spans.push(Span::styled(
                    std::mem::take(&mut run),
                    Style::default().fg(term_color(color)),
                ));
            }
            run_color = Some(cell.color);
            run.push(cell.glyph);
        }
        if let Some(color) = run_color {
            spans.push(Span::styled(run, Style::default().fg(term_color(color))));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn draw_direction(frame: &mut Frame, area: Rect, app: &App, summary: &NavSummary) {
    let block = Block::default().borders(Borders::ALL).title(" Direction ");

    let lines: Vec<Line> = if summary.arrived {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "  ⚑ ARRIVED",
                Style::default().bold().fg(Color::Green),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", app.destination_name.as_deref().unwrap_or("")),
                Style::default().fg(Color::Gray),
            )),
        ]
    } else if let Some(step) = app.tracker.current_step() {
        let distance = summary
            .distance_to_turn_m
            .map(geo::format_distance)
            .unwrap_or_default();
        vec![
            Line::from(Span::styled(
                format!("   {}", turn_glyph(step.kind, step.modifier)),
                Style::default().bold(),
            )),
            Line::from(format!("  {}", turn_arrow(step.modifier))),
            Line::from(Span::styled(
                format!("  {}", distance),
                Style::default().bold().fg(Color::Yellow),
            )),
            Line::from(format!("  {}", truncate(&step.name, NAME_LIMIT + 8))),
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", step.instruction),
                Style::default().fg(Color::Gray),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from("  No route"),
            Line::from(""),
            Line::from(Span::styled(
                "  Press d to set a destination",
                Style::default().fg(Color::Gray),
            )),
        ]
    };

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn draw_turn_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Next turns ");

    let lines: Vec<Line> = match (app.tracker.route(), app.tracker.arrived()) {
        (Some(route), false) => {
            let first = app.tracker.current_step_index();
            route
                .steps
                .iter()
                .enumerate()
                .skip(first)
                .take(TURN_LIST_LEN)
                .map(|(i, step)| {
                    let text = format!(
                        " {} {:<w$} {:>7}",
                        turn_glyph(step.kind, step.modifier),
                        truncate(&step.name, NAME_LIMIT),
                        geo::format_distance_compact(step.distance_m),
                        w = NAME_LIMIT,
                    );
                    if i == first {
                        Line::from(Span::styled(text, Style::default().bold()))
                    } else {
                        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
                    }
                })
                .collect()
        }
        _ => vec![Line::from(Span::styled(
            "  (no upcoming turns)",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_route_info(frame: &mut Frame, area: Rect, app: &App, summary: &NavSummary) {
    let block = Block::default().borders(Borders::ALL).title(" Route ");

    let lines: Vec<Line> = if app.tracker.route().is_some() {
        let arrival = chrono::Local::now() + chrono::Duration::seconds(summary.eta_s as i64);
        vec![
            Line::from(format!(
                " To    {}",
                app.destination_name.as_deref().unwrap_or("?")
            )),
            Line::from(format!(
                " Left  {}",
                geo::format_distance(summary.remaining_distance_m)
            )),
            Line::from(format!(
                " ETA   {} ({})",
                geo::format_duration(summary.eta_s),
                arrival.format("%H:%M")
            )),
            Line::from(format!(" Steps {}", summary.steps_remaining)),
        ]
    } else if app.fetching_route {
        vec![Line::from(" Fetching route...")]
    } else {
        vec![Line::from(Span::styled(
            " No route installed",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_position(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Position ");

    let mut lines: Vec<Line> = match &app.position {
        Some(sample) => vec![
            Line::from(format!(" Lat {:>10.5}", sample.point.lat)),
            Line::from(format!(" Lon {:>10.5}", sample.point.lon)),
            Line::from(format!(" Fix {}", sample.label)),
        ],
        None => vec![
            Line::from(" No fix yet"),
            Line::from(Span::styled(
                " Press r to locate",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
        ],
    };
    lines.push(if app.tracking {
        Line::from(Span::styled(
            format!(" TRACKING every {}s", app.settings.policy.poll_interval_s),
            Style::default().bold().fg(Color::Green),
        ))
    } else {
        Line::from(Span::styled(
            " Press t to track",
            Style::default().fg(Color::DarkGray),
        ))
    });

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match app.active_notice() {
        Some(notice) => (
            format!(" {}", notice),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        None => (
            KEYS_HINT.to_string(),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Destination ");

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(Color::Cyan)),
            Span::raw(app.search_input.clone()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
    ];

    if app.searching {
        lines.push(Line::from(Span::styled(
            "   Searching...",
            Style::default().fg(Color::Gray),
        )));
    } else if app.suggestions.is_empty() {
        let hint = if app.search_input.trim().len() < 2 {
            "   Type a place name or \"lat, lon\""
        } else {
            "   No matches"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (i, place) in app.suggestions.iter().enumerate() {
            if i == app.selected_suggestion {
                lines.push(Line::from(Span::styled(
                    format!(" ▶ {}", place.name),
                    Style::default().bold(),
                )));
            } else {
                lines.push(Line::from(format!("   {}", place.name)));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        popup,
    );
}

/// Centered sub-rectangle taking the given percentage of each dimension.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Glyph summarizing one maneuver for the direction and turn panes.
fn turn_glyph(kind: ManeuverKind, modifier: ManeuverModifier) -> &'static str {
    match kind {
        ManeuverKind::Arrive => "⚑",
        ManeuverKind::Depart => "◉",
        ManeuverKind::Roundabout => "↻",
        ManeuverKind::Merge => "»",
        _ => match modifier {
            ManeuverModifier::Left => "←",
            ManeuverModifier::SlightLeft => "↖",
            ManeuverModifier::SharpLeft => "↙",
            ManeuverModifier::Right => "→",
            ManeuverModifier::SlightRight => "↗",
            ManeuverModifier::SharpRight => "↘",
            ManeuverModifier::Straight => "↑",
            ManeuverModifier::UTurn => "↩",
            ManeuverModifier::Unspecified => "•",
        },
    }
}

/// Wide arrow under the big glyph in the direction pane.
fn turn_arrow(modifier: ManeuverModifier) -> &'static str {
    match modifier {
        ManeuverModifier::Left | ManeuverModifier::SlightLeft | ManeuverModifier::SharpLeft => {
            "◀──"
        }
        ManeuverModifier::Right | ManeuverModifier::SlightRight | ManeuverModifier::SharpRight => {
            "──▶"
        }
        ManeuverModifier::Straight => " ▲ ",
        ManeuverModifier::UTurn => "◀─┐",
        ManeuverModifier::Unspecified => "───",
    }
}

fn term_color(color: roadradar_core::Color) -> Color {
    use roadradar_core::Color as C;
    match color {
        C::Black => Color::Black,
        C::Red => Color::Red,
        C::Green => Color::Green,
        C::Yellow => Color::Yellow,
        C::Blue => Color::Blue,
        C::Magenta => Color::Magenta,
        C::Cyan => Color::Cyan,
        C::White => Color::White,
        C::Gray => Color::Gray,
        C::DarkGray => Color::DarkGray,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
