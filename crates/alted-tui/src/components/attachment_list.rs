//! Attachment list — the screen behind the dialog.
//!
//! Shows every attachment named on the command line with its caption status,
//! and lets the user pick one to edit. Attachments arrive asynchronously as
//! the startup fetches resolve.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use alted_core::attachment::MediaAttachment;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

pub struct AttachmentListComponent {
    /// Attachments fetched so far.
    pub attachments: Vec<MediaAttachment>,
    /// Index of the selected attachment.
    pub selected: usize,
    /// How many startup fetches are still outstanding.
    pub pending: usize,
    /// Errors from fetches that failed, kept for display.
    pub errors: Vec<String>,
}

impl AttachmentListComponent {
    pub fn new(expected: usize) -> Self {
        Self {
            attachments: Vec::new(),
            selected: 0,
            pending: expected,
            errors: Vec::new(),
        }
    }

    /// The attachment currently under the cursor.
    pub fn selected_attachment(&self) -> Option<&MediaAttachment> {
        self.attachments.get(self.selected)
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.attachments.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Once the last startup fetch settles, clear the "Loading..." status.
    fn fetch_settled(&self) -> Option<Action> {
        if self.pending == 0 {
            Some(Action::ClearStatus)
        } else {
            None
        }
    }

    /// Replace the stored copy of an attachment after a successful update.
    fn refresh(&mut self, updated: &MediaAttachment) {
        if let Some(existing) = self.attachments.iter_mut().find(|a| a.id == updated.id) {
            *existing = updated.clone();
        }
    }
}

impl Component for AttachmentListComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::AttachmentLoaded(attachment) => {
                self.pending = self.pending.saturating_sub(1);
                self.attachments.push(*attachment.clone());
                self.fetch_settled()
            }
            Action::AttachmentLoadFailed { id, error } => {
                self.pending = self.pending.saturating_sub(1);
                self.errors.push(format!("{}: {}", id, error));
                self.fetch_settled()
            }
            Action::ScrollDown => {
                self.select_next();
                None
            }
            Action::ScrollUp => {
                self.select_prev();
                None
            }
            Action::Confirm => {
                if self.selected_attachment().is_some() {
                    Some(Action::OpenCaptionDialog)
                } else {
                    None
                }
            }
            Action::CaptionUpdated(attachment) => {
                self.refresh(attachment);
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let error_height = if self.errors.is_empty() {
            0
        } else {
            (self.errors.len() as u16 + 2).min(6)
        };

        let chunks = Layout::vertical([
            Constraint::Min(4),                // Attachment list
            Constraint::Length(error_height),  // Fetch errors
            Constraint::Length(1),             // Instructions
        ])
        .split(area);

        let title = if self.pending > 0 {
            format!(
                " Attachments ({} loaded, {} loading) ",
                self.attachments.len(),
                self.pending
            )
        } else {
            format!(" Attachments ({}) ", self.attachments.len())
        };

        let block = Block::default()
            .title(title)
            .title_style(Theme::header())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        if self.attachments.is_empty() {
            let text = if self.pending > 0 {
                "Loading attachments..."
            } else {
                "No attachments loaded."
            };
            let placeholder = Paragraph::new(Span::styled(text, Theme::dim())).block(block);
            frame.render_widget(placeholder, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .attachments
                .iter()
                .enumerate()
                .map(|(i, attachment)| {
                    let is_selected = i == self.selected;

                    let (marker, marker_style) = if attachment.has_caption() {
                        ("\u{2713}", Style::default().fg(Theme::success()))
                    } else {
                        ("\u{2717}", Style::default().fg(Theme::warning()))
                    };

                    let caption = attachment
                        .description
                        .as_deref()
                        .filter(|d| !d.trim().is_empty())
                        .unwrap_or("(no alt text)");
                    let caption_summary: String = caption.chars().take(60).collect();

                    let row_style = if is_selected {
                        Theme::selection()
                    } else {
                        Style::default()
                    };

                    ListItem::new(Line::from(vec![
                        Span::styled(format!(" {} ", marker), marker_style),
                        Span::styled(
                            format!("{:<6}", attachment.kind.label()),
                            if is_selected {
                                Theme::selected()
                            } else {
                                Theme::muted()
                            },
                        ),
                        Span::styled(format!(" {} ", attachment.id), Theme::dim()),
                        Span::styled(caption_summary, Theme::normal()),
                    ]))
                    .style(row_style)
                })
                .collect();

            frame.render_widget(List::new(items).block(block), chunks[0]);
        }

        if !self.errors.is_empty() {
            let error_block = Block::default()
                .title(" Fetch errors ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::error()));
            let lines: Vec<Line> = self
                .errors
                .iter()
                .map(|e| Line::from(Span::styled(e.as_str(), Style::default().fg(Theme::error()))))
                .collect();
            let errors = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(error_block);
            frame.render_widget(errors, chunks[1]);
        }

        let instructions = Paragraph::new(Line::from(vec![
            Span::styled("  \u{2191}\u{2193}/jk", Theme::key_hint()),
            Span::styled(" select  ", Theme::dim()),
            Span::styled("enter/e", Theme::key_hint()),
            Span::styled(" edit caption  ", Theme::dim()),
            Span::styled("q", Theme::key_hint()),
            Span::styled(" quit", Theme::dim()),
        ]));
        frame.render_widget(instructions, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alted_core::attachment::AttachmentKind;

    fn attachment(id: &str, description: Option<&str>) -> MediaAttachment {
        MediaAttachment {
            id: id.to_string(),
            kind: AttachmentKind::Image,
            url: None,
            preview_url: None,
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn loaded_attachments_accumulate() {
        let mut list = AttachmentListComponent::new(2);
        list.handle_action(&Action::AttachmentLoaded(Box::new(attachment("1", None))));
        list.handle_action(&Action::AttachmentLoaded(Box::new(attachment(
            "2",
            Some("A cat"),
        ))));
        assert_eq!(list.attachments.len(), 2);
        assert_eq!(list.pending, 0);
    }

    #[test]
    fn failed_fetch_is_recorded() {
        let mut list = AttachmentListComponent::new(1);
        list.handle_action(&Action::AttachmentLoadFailed {
            id: "9".to_string(),
            error: "404".to_string(),
        });
        assert_eq!(list.pending, 0);
        assert_eq!(list.errors.len(), 1);
    }

    #[test]
    fn last_fetch_clears_the_loading_status() {
        let mut list = AttachmentListComponent::new(2);
        assert!(list
            .handle_action(&Action::AttachmentLoaded(Box::new(attachment("1", None))))
            .is_none());
        assert!(matches!(
            list.handle_action(&Action::AttachmentLoadFailed {
                id: "2".to_string(),
                error: "404".to_string(),
            }),
            Some(Action::ClearStatus)
        ));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut list = AttachmentListComponent::new(2);
        list.handle_action(&Action::AttachmentLoaded(Box::new(attachment("1", None))));
        list.handle_action(&Action::AttachmentLoaded(Box::new(attachment("2", None))));
        list.handle_action(&Action::ScrollUp);
        assert_eq!(list.selected, 0);
        list.handle_action(&Action::ScrollDown);
        list.handle_action(&Action::ScrollDown);
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn confirm_opens_dialog_only_with_a_selection() {
        let mut list = AttachmentListComponent::new(0);
        assert!(list.handle_action(&Action::Confirm).is_none());

        list.handle_action(&Action::AttachmentLoaded(Box::new(attachment("1", None))));
        assert!(matches!(
            list.handle_action(&Action::Confirm),
            Some(Action::OpenCaptionDialog)
        ));
    }

    #[test]
    fn caption_updated_refreshes_local_copy() {
        let mut list = AttachmentListComponent::new(1);
        list.handle_action(&Action::AttachmentLoaded(Box::new(attachment("1", None))));
        list.handle_action(&Action::CaptionUpdated(Box::new(attachment(
            "1",
            Some("A grey cat"),
        ))));
        assert_eq!(
            list.attachments[0].description.as_deref(),
            Some("A grey cat")
        );
    }
}
