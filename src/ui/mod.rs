pub mod sky_widget;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    domain::sky::weather_description,
    host::{freshness::FreshnessState, state::AppState},
};

use sky_widget::SkyWidget;

pub const MIN_WIDTH: u16 = 10;
pub const MIN_HEIGHT: u16 = 4;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        frame.render_widget(Paragraph::new("Too small"), area);
        return;
    }

    if let Some(framebuffer) = state.sky.renderer().surface() {
        frame.render_widget(SkyWidget { framebuffer }, area);
    } else if state.freshness == FreshnessState::Offline {
        render_offline_panel(frame, area, state);
    } else {
        let waiting = Paragraph::new("Waiting for sky input...")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("mirror-sky"));
        frame.render_widget(waiting, centered_rect(60, 40, area));
    }

    if state.show_status {
        render_status_line(frame, area, state);
    }
}

#[must_use]
pub fn status_text(state: &AppState) -> String {
    let freshness = state.freshness.label();
    match state.current_input() {
        Some(input) => format!(
            "{} · {} · {:.1} mm · {freshness}",
            weather_description(input.weather_code),
            if input.is_day { "day" } else { "night" },
            input.precipitation_mm,
        ),
        None => format!("waiting for sky input · {freshness}"),
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let color = match state.freshness {
        FreshnessState::Fresh => Color::White,
        FreshnessState::Stale => Color::Yellow,
        FreshnessState::Offline => Color::LightRed,
    };
    let line_area = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(1),
        width: area.width,
        height: 1,
    };
    let status = Paragraph::new(Line::from(format!(" {} ", status_text(state))))
        .style(Style::default().fg(color).bg(Color::Black));
    frame.render_widget(Clear, line_area);
    frame.render_widget(status, line_area);
}

fn render_offline_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![
        Line::from("Sky input offline").style(
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(err) = &state.last_error {
        lines.push(Line::from(err.as_str()).style(Style::default().fg(Color::Gray)));
    }
    lines.push(Line::from("press r to retry, q to quit"));

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("mirror-sky"));
    let panel_area = centered_rect(70, 50, area);
    frame.render_widget(Clear, panel_area);
    frame.render_widget(panel, panel_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
