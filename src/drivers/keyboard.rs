use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over terminal differences before events reach the shell:
/// Shift+Tab arrives as BackTab, and only presses are delivered.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                match key.kind {
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Esc {
                            self.esc_down = false;
                        }
                        return None;
                    }
                    // Windows consoles repeat Esc while held; one Escape per
                    // physical press
                    KeyEventKind::Repeat if key.code == KeyCode::Esc => return None,
                    KeyEventKind::Repeat | KeyEventKind::Press => {}
                }
                if key.code == KeyCode::Esc {
                    if cfg!(windows) && self.esc_down {
                        return None;
                    }
                    self.esc_down = true;
                } else {
                    self.esc_down = false;
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}
