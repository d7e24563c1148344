pub mod card;
pub mod controls;
pub mod layout;
pub mod palette;
pub mod scene_view;

use ratatui::{
    Frame,
    widgets::{Block, Borders, Paragraph},
};

use crate::{app::state::AppState, cli::Cli};

use self::{palette::detect_color_capability, scene_view::SceneView};

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, state: &AppState, cli: &Cli) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small. Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}."
        ))
        .block(Block::default().borders(Borders::ALL).title("terminal-skies"));
        frame.render_widget(warning, area);
        return;
    }

    let capability = detect_color_capability(cli.effective_color_mode());
    frame.render_widget(
        SceneView {
            scene: &state.scene,
            card: state.layout.card,
            capability,
        },
        area,
    );
    card::render(frame, state, capability, crate::icon_mode(cli));
    controls::render(frame, state, capability);
}
