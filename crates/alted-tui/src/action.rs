//! Action enum — the central message bus for the TUI.
//! All user interactions and async results flow through here.

use alted_core::attachment::MediaAttachment;

use crate::components::preview::PreviewImage;

/// Every possible action that can occur in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Display a status message in the status bar.
    SetStatus(String),
    /// Clear the status message.
    ClearStatus,
    /// A tick event for animations and timers.
    Tick,

    // ── Attachment loading ──────────────────────────────────
    /// An attachment was fetched from the server.
    AttachmentLoaded(Box<MediaAttachment>),
    /// Fetching an attachment failed.
    AttachmentLoadFailed {
        id: String,
        error: String,
    },

    // ── Caption dialog ──────────────────────────────────────
    /// Open the caption dialog for the selected attachment.
    OpenCaptionDialog,
    /// Dismiss the caption dialog without submitting.
    CloseCaptionDialog,
    /// The dialog was confirmed: submit this text for this attachment.
    SubmitCaption {
        attachment_id: String,
        text: String,
    },
    /// The server accepted the caption update.
    CaptionUpdated(Box<MediaAttachment>),
    /// The caption update failed; show the failure toast.
    CaptionUpdateFailed,

    // ── Preview ─────────────────────────────────────────────
    /// A preview image resolved for an attachment.
    PreviewLoaded {
        attachment_id: String,
        image: PreviewImage,
    },
    /// The preview could not be resolved; show the placeholder.
    PreviewCleared {
        attachment_id: String,
    },

    // ── Text input ──────────────────────────────────────────
    /// A character was typed (only sent when in input mode).
    CharInput(char),
    /// Backspace pressed (only sent when in input mode).
    BackspaceInput,
    /// Delete word (Ctrl+Backspace or Ctrl+W).
    DeleteWord,
    /// Insert a newline in the caption field.
    NewlineInput,
    /// Paste text from clipboard (Ctrl+V in editing mode).
    PasteInput,
    /// Bulk paste from bracketed paste mode (terminal sends entire text at once).
    PasteBulk(String),
    /// Confirm the dialog (Ctrl+S / Ctrl+Enter in editing mode).
    SubmitForm,

    // ── Scrolling / Selection ───────────────────────────────
    ScrollUp,
    ScrollDown,
    Confirm,
}

/// Whether the app is in a text-input mode where raw keys should
/// be forwarded to the caption field instead of interpreted as
/// global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal mode — keys are global shortcuts.
    Normal,
    /// Text input mode — keys go to the caption field.
    Editing,
}
