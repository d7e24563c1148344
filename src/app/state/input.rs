use super::*;

/// Shifted digits on a US layout, used for instant tester switches.
const SHIFTED_DIGITS: [char; 7] = ['!', '@', '#', '$', '%', '^', '&'];

pub(crate) fn is_city_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '\'' | '’' | ',' | '.')
}

/// Maps a tester key to its theme and whether the switch is instant.
pub(crate) fn tester_key(ch: char) -> Option<(Theme, bool)> {
    Theme::from_hotkey(ch).map(|theme| (theme, false)).or_else(|| {
        SHIFTED_DIGITS
            .iter()
            .position(|&shifted| shifted == ch)
            .map(|idx| (Theme::ALL[idx], true))
    })
}

fn has_command_modifier(key: KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

impl AppState {
    pub(crate) async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(key, tx, cli).await?;
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(Rect::new(0, 0, width, height)),
            _ => {}
        }
        Ok(())
    }

    async fn handle_key(
        &mut self,
        key: KeyEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            tx.send(AppEvent::Quit).await?;
            return Ok(());
        }

        if self.search.focused {
            match key.code {
                KeyCode::Char(ch) if !has_command_modifier(key) && is_city_char(ch) => {
                    self.search.buffer.push(ch);
                }
                KeyCode::Backspace => {
                    self.search.buffer.pop();
                }
                KeyCode::Enter => {
                    self.search.focused = false;
                    self.submit_search(tx, cli).await?;
                }
                KeyCode::Esc => self.search.focused = false,
                _ => {}
            }
            return Ok(());
        }

        if has_command_modifier(key) {
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                tx.send(AppEvent::Quit).await?;
            }
            KeyCode::Char('/') => self.search.focused = true,
            KeyCode::Enter => self.submit_search(tx, cli).await?,
            KeyCode::Char('g') => {
                self.start_lookup(LookupRequest::Geolocate, tx, cli).await?;
            }
            KeyCode::Char(ch) => {
                if let Some(tool) = Tool::from_hotkey(ch.to_ascii_lowercase()) {
                    self.scene.toggle_tool(tool);
                } else if let Some((theme, instant)) = tester_key(ch) {
                    self.scene.set_theme(theme, ThemeChange::manual(instant));
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = Point::from_cell(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => self.scene.pointer_moved(point),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.scene.pointer_moved(point);
                if self.scene.is_dragging_clock() {
                    self.scene
                        .drag_clock(dial_angle(self.layout.clock_center(), point));
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.scene.pointer_moved(point);
                let instant = mouse.modifiers.contains(KeyModifiers::SHIFT);
                self.click(mouse.column, mouse.row, instant);
            }
            MouseEventKind::Up(MouseButton::Left) => self.scene.end_clock_drag(),
            _ => {}
        }
    }

    fn click(&mut self, column: u16, row: u16, instant: bool) {
        if self.layout.clock_contains(column, row) {
            self.scene.begin_clock_drag();
        } else if let Some(tool) = self.layout.tool_at(column, row) {
            self.scene.toggle_tool(tool);
        } else if let Some(theme) = self.layout.theme_at(column, row) {
            self.scene.set_theme(theme, ThemeChange::manual(instant));
        } else {
            self.search.focused = self.layout.search_contains(column, row);
        }
    }
}
