//! Status bar at the bottom of the TUI.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

pub struct StatusBarComponent {
    /// Current status message.
    pub message: String,
}

impl StatusBarComponent {
    pub fn new() -> Self {
        Self {
            message: "Select an attachment and press Enter to edit its caption.".to_string(),
        }
    }
}

impl Component for StatusBarComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::SetStatus(msg) => {
                self.message = msg.clone();
                None
            }
            Action::ClearStatus => {
                self.message.clear();
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;

        // Right side: compact key hints
        let hints = "q\u{b7}?\u{b7}e";
        let hints_len = hints.chars().count() + 1; // +1 for trailing space

        // Truncate message to remaining space, on char boundaries.
        let msg_budget = width.saturating_sub(hints_len).saturating_sub(3);

        let msg = if self.message.chars().count() > msg_budget {
            if msg_budget > 3 {
                let kept: String = self.message.chars().take(msg_budget - 3).collect();
                format!("{}...", kept)
            } else {
                String::new()
            }
        } else {
            self.message.clone()
        };

        // Pad to push hints to the right edge
        let pad = width.saturating_sub(msg.chars().count() + 1 + hints_len);

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(msg, Theme::dim()),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multibyte_status_truncates_without_panicking() {
        let mut bar = StatusBarComponent::new();
        bar.handle_action(&Action::SetStatus("café ".repeat(20)));

        let backend = ratatui::backend::TestBackend::new(24, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                bar.render(frame, area);
            })
            .unwrap();
    }

    #[test]
    fn set_and_clear_status() {
        let mut bar = StatusBarComponent::new();
        bar.handle_action(&Action::SetStatus("Loading 2 attachments...".to_string()));
        assert_eq!(bar.message, "Loading 2 attachments...");
        bar.handle_action(&Action::ClearStatus);
        assert!(bar.message.is_empty());
    }
}
