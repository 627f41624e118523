//! Main application state and render loop.

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::Terminal;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use alted_api::ApiClient;
use alted_core::AltedConfig;

use crate::action::{Action, InputMode};
use crate::components::attachment_list::AttachmentListComponent;
use crate::components::caption_dialog::CaptionDialogComponent;
use crate::components::help::HelpComponent;
use crate::components::preview::PreviewImage;
use crate::components::status_bar::StatusBarComponent;
use crate::components::toast::ToastComponent;
use crate::components::Component;
use crate::event::{self, EventHandler, InputModeFlag};
use crate::lifecycle::ScreenLifecycle;

/// Main application state.
pub struct App {
    /// Whether the app should exit.
    should_quit: bool,
    /// Shared flag to tell the EventHandler which key-mapping to use.
    input_mode_flag: InputModeFlag,
    /// Marks the screen as alive for pending submission continuations.
    lifecycle: ScreenLifecycle,

    /// HTTP client for the server API (shared across async tasks).
    client: Arc<ApiClient>,
    /// Attachment IDs named on the command line.
    media_ids: Vec<String>,
    /// Loaded configuration.
    config: AltedConfig,

    // Components
    attachment_list: AttachmentListComponent,
    caption_dialog: CaptionDialogComponent,
    toast: ToastComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
}

impl App {
    pub fn new(client: Arc<ApiClient>, media_ids: Vec<String>, config: AltedConfig) -> Self {
        let expected = media_ids.len();
        let toast_ticks = config.ui.toast_ticks;
        Self {
            should_quit: false,
            input_mode_flag: event::new_input_mode_flag(),
            lifecycle: ScreenLifecycle::new(),
            client,
            media_ids,
            config,
            attachment_list: AttachmentListComponent::new(expected),
            caption_dialog: CaptionDialogComponent::new(),
            toast: ToastComponent::new(toast_ticks),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
        }
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        // Start the event handler with the shared input mode flag.
        let event_tx = tx.clone();
        let mode_flag = self.input_mode_flag.clone();
        let event_handler = EventHandler::new(event_tx, Duration::from_millis(100), mode_flag);
        tokio::spawn(async move {
            event_handler.run().await;
        });

        // Fetch the attachments named on the command line in the background.
        self.spawn_fetch_attachments(tx.clone());
        self.sync_input_mode();

        // Main loop.
        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;

            if let Some(action) = rx.recv().await {
                self.handle_action(&action, &tx);

                if self.should_quit {
                    break;
                }
            }
        }

        // The screen is going away: pending submission results must not
        // produce notifications against a dead UI.
        self.lifecycle.retire();

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Determine and set the correct input mode based on component state.
    /// Called after every action.
    fn sync_input_mode(&self) {
        let mode = if self.caption_dialog.visible && !self.help.visible {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
        event::set_input_mode(&self.input_mode_flag, mode);
    }

    /// Dispatch an action to all relevant components.
    fn handle_action(&mut self, action: &Action, tx: &mpsc::UnboundedSender<Action>) {
        // Global actions first.
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::OpenCaptionDialog => {
                self.open_caption_dialog(tx);
            }
            Action::SubmitCaption {
                attachment_id,
                text,
            } => {
                self.spawn_caption_update(attachment_id.clone(), text.clone(), tx);
            }
            _ => {}
        }

        // Route input to the dialog while it is open, to the list otherwise.
        let result = if self.caption_dialog.visible {
            self.caption_dialog.handle_action(action)
        } else {
            self.attachment_list.handle_action(action)
        };

        // Overlays and the status bar always see the action stream.
        self.toast.handle_action(action);
        self.help.handle_action(action);
        self.status_bar.handle_action(action);

        // Keep the list's copy fresh after a silent successful update, even
        // while the dialog is open for another attachment.
        if let Action::CaptionUpdated(attachment) = action {
            if self.caption_dialog.visible {
                self.attachment_list
                    .handle_action(&Action::CaptionUpdated(attachment.clone()));
            }
        }

        self.sync_input_mode();

        // Handle chained actions from components.
        if let Some(chained) = result {
            self.handle_action(&chained, tx);
        }
    }

    /// Open the dialog for the selected attachment and kick off its preview.
    fn open_caption_dialog(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        let Some(attachment) = self.attachment_list.selected_attachment() else {
            return;
        };
        let attachment = attachment.clone();

        let preview_url = if self.config.ui.show_previews {
            attachment.preview_source().map(str::to_string)
        } else {
            None
        };

        self.caption_dialog.open(&attachment, preview_url.is_some());

        if let Some(url) = preview_url {
            self.spawn_preview_fetch(attachment.id.clone(), url, tx.clone());
        }
    }

    // ── Async task spawners ─────────────────────────────────────

    /// Spawn one fetch task per attachment ID given on the command line.
    fn spawn_fetch_attachments(&self, tx: mpsc::UnboundedSender<Action>) {
        if self.media_ids.is_empty() {
            return;
        }
        let _ = tx.send(Action::SetStatus(format!(
            "Loading {} attachment{}...",
            self.media_ids.len(),
            if self.media_ids.len() == 1 { "" } else { "s" }
        )));

        for id in &self.media_ids {
            let client = self.client.clone();
            let tx = tx.clone();
            let id = id.clone();

            tokio::spawn(async move {
                match client.get_media(&id).await {
                    Ok(attachment) => {
                        info!(id = %attachment.id, "Attachment loaded");
                        let _ = tx.send(Action::AttachmentLoaded(Box::new(attachment)));
                    }
                    Err(e) => {
                        warn!(id = %id, "Attachment fetch failed: {}", e);
                        let _ = tx.send(Action::AttachmentLoadFailed {
                            id,
                            error: format!("{}", e),
                        });
                    }
                }
            });
        }
    }

    /// Spawn a task that resolves the preview image for the dialog. On any
    /// failure the preview region falls back to the placeholder.
    fn spawn_preview_fetch(
        &self,
        attachment_id: String,
        url: String,
        tx: mpsc::UnboundedSender<Action>,
    ) {
        let client = self.client.clone();

        tokio::spawn(async move {
            let resolved = match client.fetch_preview(&url).await {
                Ok(bytes) => PreviewImage::decode(&bytes).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match resolved {
                Ok(image) => {
                    let _ = tx.send(Action::PreviewLoaded {
                        attachment_id,
                        image,
                    });
                }
                Err(e) => {
                    warn!(id = %attachment_id, "Preview unavailable: {}", e);
                    let _ = tx.send(Action::PreviewCleared { attachment_id });
                }
            }
        });
    }

    /// Spawn the caption submission for a confirmed dialog. The dialog has
    /// already been dismissed; only a failure produces UI feedback, later,
    /// through the toast.
    fn spawn_caption_update(
        &self,
        attachment_id: String,
        text: String,
        tx: &mpsc::UnboundedSender<Action>,
    ) {
        let client = self.client.clone();
        let result_tx = tx.clone();

        let submit = async move {
            match client.update_media_description(&attachment_id, text).await {
                Ok(attachment) => {
                    info!(id = %attachment.id, "Caption updated");
                    let _ = result_tx.send(Action::CaptionUpdated(Box::new(attachment)));
                    true
                }
                Err(e) => {
                    error!(id = %attachment_id, "Caption update failed: {}", e);
                    false
                }
            }
        };

        spawn_submission(submit, self.lifecycle.clone(), tx.clone());
    }

    /// Render the full UI.
    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Min(10),   // Attachment list
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.attachment_list.render(frame, chunks[0]);
        self.status_bar.render(frame, chunks[1]);

        // Overlays (rendered on top)
        self.caption_dialog.render(frame, area);
        self.help.render(frame, area);
        self.toast.render(frame, area);
    }
}

/// Await a caption submission and report failure, once, through the action
/// channel. Success stays silent. If the screen has been retired before the
/// submission resolves, the outcome is discarded without any side effect.
pub(crate) fn spawn_submission<F>(
    submit: F,
    lifecycle: ScreenLifecycle,
    tx: mpsc::UnboundedSender<Action>,
) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = bool> + Send + 'static,
{
    tokio::spawn(async move {
        let ok = submit.await;
        if ok {
            return;
        }
        if lifecycle.is_active() {
            let _ = tx.send(Action::CaptionUpdateFailed);
        } else {
            debug!("Screen torn down before caption update resolved; dropping failure notice");
        }
    })
}
