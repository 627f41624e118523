//! Failure toast — transient, non-blocking notification shown when a
//! caption update resolves to failure. Success is silent.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

const FAILURE_MESSAGE: &str = "Failed to update caption";

pub struct ToastComponent {
    /// Message currently on screen, if any.
    message: Option<String>,
    /// Ticks remaining before the toast disappears.
    ttl: u16,
    /// Configured lifetime in ticks.
    lifetime: u16,
}

impl ToastComponent {
    pub fn new(lifetime: u16) -> Self {
        Self {
            message: None,
            ttl: 0,
            lifetime: lifetime.max(1),
        }
    }

    pub fn visible(&self) -> bool {
        self.message.is_some()
    }

    fn show(&mut self, message: &str) {
        self.message = Some(message.to_string());
        self.ttl = self.lifetime;
    }
}

impl Component for ToastComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::CaptionUpdateFailed => {
                self.show(FAILURE_MESSAGE);
                None
            }
            Action::Tick => {
                if self.message.is_some() {
                    self.ttl = self.ttl.saturating_sub(1);
                    if self.ttl == 0 {
                        self.message = None;
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref message) = self.message else {
            return;
        };

        let width = (message.len() as u16 + 4).min(area.width);
        let height = 3u16.min(area.height);
        let toast_area = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y + area.height.saturating_sub(height + 1),
            width,
            height,
        );

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::error()));
        let body = Paragraph::new(Line::from(Span::styled(message.as_str(), Theme::toast())))
            .centered()
            .block(block);
        frame.render_widget(body, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_shows_the_toast_once() {
        let mut toast = ToastComponent::new(3);
        assert!(!toast.visible());
        toast.handle_action(&Action::CaptionUpdateFailed);
        assert!(toast.visible());
    }

    #[test]
    fn success_never_shows_a_toast() {
        let mut toast = ToastComponent::new(3);
        // Silent success: no action is even dispatched for the toast, but a
        // CaptionUpdated refresh passing through must not trigger it either.
        toast.handle_action(&Action::CaptionUpdated(Box::new(
            alted_core::attachment::MediaAttachment {
                id: "1".to_string(),
                kind: alted_core::attachment::AttachmentKind::Image,
                url: None,
                preview_url: None,
                description: Some("A cat".to_string()),
            },
        )));
        assert!(!toast.visible());
    }

    #[test]
    fn toast_expires_after_its_lifetime() {
        let mut toast = ToastComponent::new(2);
        toast.handle_action(&Action::CaptionUpdateFailed);
        toast.handle_action(&Action::Tick);
        assert!(toast.visible());
        toast.handle_action(&Action::Tick);
        assert!(!toast.visible());
    }

    #[test]
    fn second_failure_restarts_the_lifetime() {
        let mut toast = ToastComponent::new(2);
        toast.handle_action(&Action::CaptionUpdateFailed);
        toast.handle_action(&Action::Tick);
        toast.handle_action(&Action::CaptionUpdateFailed);
        toast.handle_action(&Action::Tick);
        assert!(toast.visible());
    }
}
