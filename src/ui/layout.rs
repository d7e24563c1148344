use ratatui::layout::{Position, Rect};

use crate::scene::{
    geom::{CardRect, Point, Viewport},
    theme::Theme,
    tools::Tool,
};

const CARD_WIDTH: u16 = 52;
const CARD_HEIGHT: u16 = 17;
const CLOCK_WIDTH: u16 = 9;
const CLOCK_HEIGHT: u16 = 3;
/// Rows below the card: tool bar then tester row.
const CONTROL_ROWS: u16 = 2;

/// Where every interactive element sits for a given terminal size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    pub area: Rect,
    pub card: Rect,
    pub clock: Rect,
    pub search: Rect,
    pub tools: Vec<(Tool, Rect)>,
    pub tester: Vec<(Theme, Rect)>,
}

impl ScreenLayout {
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let width = CARD_WIDTH.min(area.width.saturating_sub(2));
        let height = CARD_HEIGHT.min(area.height.saturating_sub(CONTROL_ROWS));
        let card = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height + CONTROL_ROWS) / 2,
            width,
            height,
        };

        let clock = Rect {
            x: card.right().saturating_sub(CLOCK_WIDTH + 1).max(card.x),
            y: card.y + 1,
            width: CLOCK_WIDTH.min(card.width),
            height: CLOCK_HEIGHT.min(card.height),
        }
        .intersection(card);

        let search = Rect {
            x: card.x + 1,
            y: card.bottom().saturating_sub(2),
            width: card.width.saturating_sub(2),
            height: 1,
        }
        .intersection(card);

        let tools = button_row(
            area,
            card.bottom(),
            Tool::ALL.iter().map(|&tool| (tool, tool_label(tool))),
        );
        let tester = button_row(
            area,
            card.bottom() + 1,
            Theme::ALL.iter().map(|&theme| (theme, tester_label(theme))),
        );

        Self {
            area,
            card,
            clock,
            search,
            tools,
            tester,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::from_cells(self.area.width, self.area.height)
    }

    #[must_use]
    pub fn card_rect(&self) -> CardRect {
        CardRect::from_cells(self.card.x, self.card.y, self.card.width, self.card.height)
    }

    #[must_use]
    pub fn clock_center(&self) -> Point {
        Point::from_cell(
            self.clock.x + self.clock.width / 2,
            self.clock.y + self.clock.height / 2,
        )
    }

    #[must_use]
    pub fn clock_contains(&self, column: u16, row: u16) -> bool {
        self.clock.contains(Position::new(column, row))
    }

    #[must_use]
    pub fn search_contains(&self, column: u16, row: u16) -> bool {
        self.search.contains(Position::new(column, row))
    }

    #[must_use]
    pub fn tool_at(&self, column: u16, row: u16) -> Option<Tool> {
        hit(&self.tools, column, row)
    }

    #[must_use]
    pub fn theme_at(&self, column: u16, row: u16) -> Option<Theme> {
        hit(&self.tester, column, row)
    }
}

#[must_use]
pub fn tool_label(tool: Tool) -> String {
    format!(" {} {} ", tool.hotkey(), tool.label())
}

#[must_use]
pub fn tester_label(theme: Theme) -> String {
    format!(" {} {} ", theme.hotkey(), theme.name())
}

fn button_row<T: Copy>(
    area: Rect,
    y: u16,
    buttons: impl Iterator<Item = (T, String)>,
) -> Vec<(T, Rect)> {
    if y >= area.bottom() {
        return Vec::new();
    }
    let buttons: Vec<(T, u16)> = buttons
        .map(|(item, label)| (item, u16::try_from(label.chars().count()).unwrap_or(u16::MAX)))
        .collect();
    let gap = 1;
    let total = buttons
        .iter()
        .map(|(_, w)| *w)
        .sum::<u16>()
        .saturating_add(gap * u16::try_from(buttons.len().saturating_sub(1)).unwrap_or(0));

    let mut x = area.x + area.width.saturating_sub(total) / 2;
    let mut placed = Vec::with_capacity(buttons.len());
    for (item, width) in buttons {
        let rect = Rect {
            x,
            y,
            width,
            height: 1,
        }
        .intersection(area);
        if !rect.is_empty() {
            placed.push((item, rect));
        }
        x = x.saturating_add(width + gap);
    }
    placed
}

fn hit<T: Copy>(buttons: &[(T, Rect)], column: u16, row: u16) -> Option<T> {
    buttons
        .iter()
        .find(|(_, rect)| rect.contains(Position::new(column, row)))
        .map(|(item, _)| *item)
}
