//! Tool bar and theme tester buttons under the card.

use ratatui::{Frame, text::Span, widgets::Paragraph};

use crate::app::state::AppState;

use super::{
    layout::{tester_label, tool_label},
    palette::{ACCENT, ColorCapability, MUTED, TEXT},
};

pub fn render(frame: &mut Frame, state: &AppState, capability: ColorCapability) {
    let tools = state.scene.tools();
    for &(tool, area) in &state.layout.tools {
        let style = if tools.is_active(tool) {
            capability.active(ACCENT)
        } else {
            capability.fg(TEXT)
        };
        frame.render_widget(Paragraph::new(Span::styled(tool_label(tool), style)), area);
    }

    let current = state.scene.theme().current();
    for &(theme, area) in &state.layout.tester {
        let style = if theme == current {
            capability.active(TEXT)
        } else {
            capability.fg(MUTED)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(tester_label(theme), style)),
            area,
        );
    }
}
