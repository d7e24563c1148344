use std::f64::consts::TAU;

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::state::{AppMode, AppState},
    cli::IconMode,
    domain::weather::HourlyRow,
};

use super::palette::{ACCENT, BORDER, ColorCapability, DANGER, MUTED, TEXT};

const HOURLY_PER_COLUMN: usize = 6;
const CLOCK_ARROWS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];

pub fn render(
    frame: &mut Frame,
    state: &AppState,
    capability: ColorCapability,
    icons: IconMode,
) {
    let card = state.layout.card;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(capability.fg(BORDER));
    let inner = block.inner(card);
    frame.render_widget(block, card);
    if inner.is_empty() {
        return;
    }

    let lines = card_lines(state, capability, icons);
    frame.render_widget(Paragraph::new(lines), inner);

    render_search(frame, state, capability);
    render_clock(frame, state, capability);
}

fn card_lines(
    state: &AppState,
    capability: ColorCapability,
    icons: IconMode,
) -> Vec<Line<'static>> {
    let view = &state.card;
    let bold = |rgb| capability.fg(rgb).add_modifier(Modifier::BOLD);
    let headline = if state.mode == AppMode::Error { DANGER } else { TEXT };

    let description = if state.mode == AppMode::Loading {
        "Loading…".to_string()
    } else {
        view.description.clone()
    };

    let mut lines = vec![
        Line::from(Span::styled(view.location.clone(), bold(headline))),
        Line::from(vec![
            Span::styled(format!("{} ", view.icon.glyph(icons)), capability.fg(ACCENT)),
            Span::styled(view.temperature.clone(), bold(TEXT)),
        ]),
        Line::from(Span::styled(description, capability.fg(TEXT))),
        Line::from(vec![
            Span::styled("Feels like ", capability.fg(MUTED)),
            Span::styled(view.feels_like.clone(), capability.fg(TEXT)),
            Span::styled("  UV ", capability.fg(MUTED)),
            Span::styled(view.uv_index.clone(), capability.fg(TEXT)),
        ]),
        Line::default(),
    ];

    if let Some(note) = &view.hourly_note {
        lines.push(Line::from(Span::styled(note.clone(), capability.fg(MUTED))));
        return lines;
    }
    if view.hourly.is_empty() {
        return lines;
    }

    lines.push(Line::from(Span::styled("Next hours", capability.fg(MUTED))));
    let (left, right) = view
        .hourly
        .split_at(view.hourly.len().min(HOURLY_PER_COLUMN));
    for (idx, row) in left.iter().enumerate() {
        let mut spans = vec![Span::styled(hourly_cell(row, icons), capability.fg(TEXT))];
        if let Some(other) = right.get(idx) {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(hourly_cell(other, icons), capability.fg(TEXT)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// `HH:00 icon T°C`, padded so two columns line up.
#[must_use]
pub fn hourly_cell(row: &HourlyRow, icons: IconMode) -> String {
    format!(
        "{:02}:00 {:<5} {:>4}",
        row.hour,
        row.icon.glyph(icons),
        format!("{}°C", row.temperature)
    )
}

fn render_search(frame: &mut Frame, state: &AppState, capability: ColorCapability) {
    let area = state.layout.search;
    if area.is_empty() {
        return;
    }
    let search = &state.search;
    let line = if search.focused {
        Line::from(vec![
            Span::styled("Search: ", capability.fg(ACCENT)),
            Span::styled(format!("{}_", search.buffer), capability.fg(TEXT)),
        ])
    } else if search.buffer.is_empty() {
        Line::from(Span::styled("/ search city   g locate   q quit", capability.fg(MUTED)))
    } else {
        Line::from(vec![
            Span::styled("Search: ", capability.fg(MUTED)),
            Span::styled(search.buffer.clone(), capability.fg(MUTED)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_clock(frame: &mut Frame, state: &AppState, capability: ColorCapability) {
    let area: Rect = state.layout.clock;
    if area.width < 3 || area.height < 3 {
        return;
    }
    let dragging = state.scene.is_dragging_clock();
    let border = if dragging {
        capability.active(ACCENT)
    } else {
        capability.fg(BORDER)
    };
    let time = state.scene.time();
    let (_, minute) = time.hand_angles();
    let text = format!("{} {}", time.hh_mm(), minute_arrow(minute));

    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Span::styled(text, capability.fg(TEXT))),
        inner,
    );
}

/// Arrow nearest to a clockwise angle from twelve.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn minute_arrow(angle: f64) -> &'static str {
    let octant = (angle.rem_euclid(TAU) / TAU * 8.0).round() as usize % CLOCK_ARROWS.len();
    CLOCK_ARROWS[octant]
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::domain::weather::WeatherIcon;

    #[test]
    fn minute_arrow_points_at_nearest_octant() {
        assert_eq!(minute_arrow(0.0), "↑");
        assert_eq!(minute_arrow(PI / 2.0), "→");
        assert_eq!(minute_arrow(PI), "↓");
        assert_eq!(minute_arrow(TAU - 0.1), "↑");
    }

    #[test]
    fn hourly_cell_pads_hour_and_temperature() {
        let row = HourlyRow {
            hour: 7,
            temperature: -3,
            icon: WeatherIcon::Snow,
        };
        let cell = hourly_cell(&row, IconMode::Ascii);
        assert!(cell.starts_with("07:00 "));
        assert!(cell.ends_with("-3°C"));
    }
}
