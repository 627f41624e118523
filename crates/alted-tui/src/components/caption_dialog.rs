//! Caption dialog — modal overlay for editing an attachment's alt text.
//!
//! The dialog shows a preview of the attachment above a multi-line caption
//! field seeded from the existing description. Confirming hides the dialog
//! immediately and emits a single SubmitCaption action; the submission
//! itself runs in the background and any failure surfaces later as a toast.
//! Cancelling emits nothing.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use alted_core::attachment::MediaAttachment;
use alted_core::{CaptionBuffer, MAX_CAPTION_CHARS};

use crate::action::Action;
use crate::components::preview::{self, PreviewState};
use crate::components::Component;
use crate::theme::Theme;

/// Placeholder shown while the caption field is empty, parameterized by the
/// character limit.
fn caption_hint(limit: usize) -> String {
    format!(
        "Describe the media for people who are visually impaired (max {} characters)",
        limit
    )
}

pub struct CaptionDialogComponent {
    /// Whether the dialog is visible.
    pub visible: bool,
    /// Attachment the dialog was opened for.
    attachment_id: Option<String>,
    /// The caption being edited.
    buffer: CaptionBuffer,
    /// State of the preview region.
    pub preview: PreviewState,
    /// Scroll offset of the caption field (first visible line).
    scroll: usize,
}

impl CaptionDialogComponent {
    pub fn new() -> Self {
        Self {
            visible: false,
            attachment_id: None,
            buffer: CaptionBuffer::new(None),
            preview: PreviewState::Unavailable,
            scroll: 0,
        }
    }

    /// Open the dialog for an attachment, seeding the field from its
    /// existing description. The preview starts in Loading when a fetch is
    /// about to begin, or Unavailable otherwise.
    pub fn open(&mut self, attachment: &MediaAttachment, fetching_preview: bool) {
        self.visible = true;
        self.attachment_id = Some(attachment.id.clone());
        self.buffer = CaptionBuffer::new(attachment.description.as_deref());
        self.preview = if fetching_preview {
            PreviewState::Loading
        } else {
            PreviewState::Unavailable
        };
        self.scroll = 0;
    }

    /// Current field content (exposed for the list's status line).
    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    fn close(&mut self) {
        self.visible = false;
        self.attachment_id = None;
        self.preview = PreviewState::Unavailable;
    }

    /// Confirm: hide the dialog right away and hand the current text to the
    /// submission spawner. Dismissal does not wait for the submission.
    fn confirm(&mut self) -> Option<Action> {
        let attachment_id = self.attachment_id.take()?;
        let text = self.buffer.as_str().to_string();
        self.close();
        Some(Action::SubmitCaption {
            attachment_id,
            text,
        })
    }

    fn keep_cursor_visible(&mut self, viewport: usize) {
        let (line, _) = self.buffer.cursor_line_col();
        if line < self.scroll {
            self.scroll = line;
        }
        if viewport > 0 && line >= self.scroll + viewport {
            self.scroll = line - viewport + 1;
        }
    }

    /// Center a rectangle inside another.
    fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
        let vertical = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(area);

        let horizontal = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(vertical[1]);

        horizontal[1]
    }

    /// Render the caption field with a block cursor at the edit position.
    fn render_caption_field(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Caption ({}/{} chars) ",
            self.buffer.char_count(),
            MAX_CAPTION_CHARS
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()));
        let inner = block.inner(area);

        if self.buffer.is_empty() {
            let hint = Paragraph::new(Span::styled(caption_hint(MAX_CAPTION_CHARS), Theme::dim()))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let text = self.buffer.as_str();
        let cursor = self.buffer.cursor();
        let (cursor_line, _) = self.buffer.cursor_line_col();
        let viewport = inner.height as usize;

        let scroll = {
            let mut s = self.scroll;
            if cursor_line < s {
                s = cursor_line;
            }
            if viewport > 0 && cursor_line >= s + viewport {
                s = cursor_line - viewport + 1;
            }
            s
        };

        let mut rendered: Vec<Line> = Vec::new();
        let mut offset = 0usize;
        for (i, line_text) in text.split('\n').enumerate() {
            let line_end = offset + line_text.len();
            if i >= scroll && rendered.len() < viewport.max(1) {
                if cursor >= offset && cursor <= line_end && i == cursor_line {
                    let col = cursor - offset;
                    let (before, after) = line_text.split_at(col.min(line_text.len()));
                    let cursor_char = after.chars().next().map(|c| c.to_string());
                    let rest = match &cursor_char {
                        Some(c) => &after[c.len()..],
                        None => "",
                    };
                    rendered.push(Line::from(vec![
                        Span::styled(before.to_string(), Theme::normal()),
                        Span::styled(
                            cursor_char.unwrap_or_else(|| " ".to_string()),
                            Style::default().fg(Theme::bg()).bg(Theme::accent()),
                        ),
                        Span::styled(rest.to_string(), Theme::normal()),
                    ]));
                } else {
                    rendered.push(Line::from(Span::styled(
                        line_text.to_string(),
                        Theme::normal(),
                    )));
                }
            }
            offset = line_end + 1;
        }

        frame.render_widget(Paragraph::new(rendered).block(block), area);
    }
}

impl Component for CaptionDialogComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        if !self.visible {
            return None;
        }

        match action {
            // ── Text input ──────────────────────────────────────
            Action::CharInput(c) => {
                // Insertion past the limit is rejected by the buffer.
                self.buffer.insert_char(*c);
                None
            }
            Action::BackspaceInput => {
                self.buffer.delete_char();
                None
            }
            Action::DeleteWord => {
                self.buffer.delete_word();
                None
            }
            Action::NewlineInput => {
                self.buffer.insert_newline();
                self.keep_cursor_visible(6);
                None
            }
            Action::PasteInput => {
                // Try to read from clipboard via pbpaste (macOS fallback).
                if let Ok(output) = std::process::Command::new("pbpaste").output() {
                    if let Ok(text) = String::from_utf8(output.stdout) {
                        if !text.is_empty() {
                            self.buffer.insert_str(&text);
                        }
                    }
                }
                None
            }
            Action::PasteBulk(text) => {
                // Bracketed paste — truncated by the buffer if it would
                // push the caption past the limit.
                if !text.is_empty() {
                    self.buffer.insert_str(text);
                }
                None
            }

            // ── Cursor movement ─────────────────────────────────
            Action::ScrollUp => {
                self.buffer.cursor_up();
                self.keep_cursor_visible(6);
                None
            }
            Action::ScrollDown => {
                self.buffer.cursor_down();
                self.keep_cursor_visible(6);
                None
            }

            // ── Confirm / cancel ────────────────────────────────
            Action::SubmitForm => self.confirm(),
            Action::CloseCaptionDialog => {
                self.close();
                None
            }

            // ── Preview resolution ──────────────────────────────
            Action::PreviewLoaded {
                attachment_id,
                image,
            } => {
                if self.attachment_id.as_deref() == Some(attachment_id.as_str()) {
                    self.preview = PreviewState::Ready(image.clone());
                }
                None
            }
            Action::PreviewCleared { attachment_id } => {
                if self.attachment_id.as_deref() == Some(attachment_id.as_str()) {
                    self.preview = PreviewState::Unavailable;
                }
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let width = (area.width.saturating_sub(4)).min(72);
        let height = (area.height.saturating_sub(2)).min(28);
        let dialog_area = Self::centered_rect(area, width, height);

        // Clear the background.
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Edit Caption ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::vertical([
            Constraint::Min(4),    // Preview region
            Constraint::Length(8), // Caption field
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

        preview::render(&self.preview, frame, chunks[0]);
        self.render_caption_field(frame, chunks[1]);

        let instructions = Paragraph::new(Line::from(vec![
            Span::styled("[Ctrl+S]", Theme::key_hint()),
            Span::styled(" save  ", Theme::dim()),
            Span::styled("[Enter]", Theme::key_hint()),
            Span::styled(" newline  ", Theme::dim()),
            Span::styled("[Esc]", Theme::key_hint()),
            Span::styled(" cancel", Theme::dim()),
        ]));
        frame.render_widget(instructions, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::preview::PreviewImage;

    fn attachment(description: Option<&str>) -> MediaAttachment {
        MediaAttachment {
            id: "42".to_string(),
            kind: alted_core::attachment::AttachmentKind::Image,
            url: None,
            preview_url: Some("https://files.example/s.png".to_string()),
            description: description.map(str::to_string),
        }
    }

    fn submit(dialog: &mut CaptionDialogComponent) -> Option<Action> {
        dialog.handle_action(&Action::SubmitForm)
    }

    #[test]
    fn seeds_field_from_existing_caption() {
        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(Some("A cat")), true);
        assert_eq!(dialog.text(), "A cat");
        assert!(matches!(dialog.preview, PreviewState::Loading));
    }

    #[test]
    fn seeds_empty_field_when_caption_absent() {
        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(None), false);
        assert_eq!(dialog.text(), "");
        assert!(matches!(dialog.preview, PreviewState::Unavailable));
    }

    #[test]
    fn confirm_emits_submit_once_with_current_text_and_hides() {
        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(Some("A cat")), false);
        for c in " naps".chars() {
            dialog.handle_action(&Action::CharInput(c));
        }

        let action = submit(&mut dialog);
        match action {
            Some(Action::SubmitCaption {
                attachment_id,
                text,
            }) => {
                assert_eq!(attachment_id, "42");
                assert_eq!(text, "A cat naps");
            }
            other => panic!("expected SubmitCaption, got {:?}", other),
        }
        // Dismissed synchronously, before any submission result exists.
        assert!(!dialog.visible);
        // A second confirm on the closed dialog emits nothing.
        assert!(submit(&mut dialog).is_none());
    }

    #[test]
    fn cancel_emits_nothing() {
        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(Some("A cat")), false);
        assert!(dialog.handle_action(&Action::CloseCaptionDialog).is_none());
        assert!(!dialog.visible);
        // No SubmitCaption can follow a cancel.
        assert!(submit(&mut dialog).is_none());
    }

    #[test]
    fn typed_input_clamps_at_limit() {
        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(Some("A cat")), false);
        for _ in 0..1600 {
            dialog.handle_action(&Action::CharInput('x'));
        }
        assert_eq!(dialog.text().chars().count(), MAX_CAPTION_CHARS);

        match submit(&mut dialog) {
            Some(Action::SubmitCaption { text, .. }) => {
                assert_eq!(text.chars().count(), MAX_CAPTION_CHARS);
            }
            other => panic!("expected SubmitCaption, got {:?}", other),
        }
    }

    #[test]
    fn bulk_paste_clamps_at_limit() {
        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(None), false);
        dialog.handle_action(&Action::PasteBulk("y".repeat(2000)));
        assert_eq!(dialog.text().chars().count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn preview_resolution_is_pushed_into_the_region() {
        let png = {
            let img = image::RgbImage::new(2, 2);
            let mut bytes = std::io::Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut bytes, image::ImageFormat::Png)
                .unwrap();
            bytes.into_inner()
        };
        let image = PreviewImage::decode(&png).unwrap();

        let mut dialog = CaptionDialogComponent::new();
        dialog.open(&attachment(None), true);

        // A resolution for a different attachment is ignored.
        dialog.handle_action(&Action::PreviewLoaded {
            attachment_id: "other".to_string(),
            image: image.clone(),
        });
        assert!(matches!(dialog.preview, PreviewState::Loading));

        dialog.handle_action(&Action::PreviewLoaded {
            attachment_id: "42".to_string(),
            image,
        });
        assert!(matches!(dialog.preview, PreviewState::Ready(_)));

        // Clearing replaces the image with the placeholder.
        dialog.handle_action(&Action::PreviewCleared {
            attachment_id: "42".to_string(),
        });
        assert!(matches!(dialog.preview, PreviewState::Unavailable));
    }

    #[test]
    fn hidden_dialog_ignores_input() {
        let mut dialog = CaptionDialogComponent::new();
        assert!(dialog.handle_action(&Action::CharInput('x')).is_none());
        assert_eq!(dialog.text(), "");
    }

    #[test]
    fn hint_names_the_limit() {
        assert!(caption_hint(MAX_CAPTION_CHARS).contains("1500"));
    }
}
