//! Main application module
//!
//! Elm-style shell: terminal events become [`Message`]s, `update` mutates the
//! state and `view` draws it. One loop iteration per frame.

mod message;
mod state;
mod update;
mod view;

use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use crate::audio::{AudioEventReceiver, AudioHandle, AudioThreadHandle};
use crate::features::Settings;
use crate::features::lyrics::sync::{ScrollSyncController, StripAnimator};
use crate::features::media::{FoundLyrics, TrackInfo};

pub use message::Message;
pub use state::App;
use state::{CoreState, LyricsState, UiState};

/// How long shutdown waits for the audio thread
const AUDIO_JOIN_TIMEOUT: Duration = Duration::from_millis(500);

/// What is being played
#[derive(Debug, Clone)]
pub struct Session {
    pub audio_path: PathBuf,
    pub track: TrackInfo,
    pub lyrics: Option<FoundLyrics>,
}

impl App {
    /// Create the application and start loading the track
    pub fn new(settings: Settings, session: Session, mut audio_thread: AudioThreadHandle) -> Self {
        let events = audio_thread.take_event_rx();
        let audio = audio_thread.handle.clone();
        let autoplay = settings.playback.autoplay;

        let mut app = Self::with_handle(settings, session, audio, events);
        app.core
            .audio
            .load(app.core.audio_path.clone(), autoplay);
        app.core.audio_thread = Some(audio_thread);
        app
    }

    fn with_handle(
        settings: Settings,
        session: Session,
        audio: AudioHandle,
        audio_events: Option<AudioEventReceiver>,
    ) -> Self {
        let mut controller =
            ScrollSyncController::new(settings.sync.to_config(), StripAnimator::new());

        let origin = session.lyrics.as_ref().map(|found| found.origin.clone());
        match session.lyrics {
            Some(found) => {
                tracing::info!("Lyrics from {:?}: {} tokens", found.origin, found.tokens.len());
                controller.load_tokens(found.tokens);
            }
            None => tracing::info!("No lyrics for {:?}", session.audio_path),
        }

        Self {
            core: CoreState {
                settings,
                settings_dirty: false,
                audio,
                audio_thread: None,
                audio_events,
                audio_path: session.audio_path,
                track: session.track,
            },
            lyrics: LyricsState {
                controller,
                origin,
                drag: None,
            },
            ui: UiState::new(),
        }
    }

    /// Run the event loop until quit
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let size = terminal.size().context("Failed to query terminal size")?;
        self.update(Message::Resized(Rect::new(0, 0, size.width, size.height)));

        let frame_interval = self.core.settings.display.frame_interval();
        let poll_interval = self.core.settings.sync.poll_interval();

        while !self.ui.should_quit {
            terminal
                .draw(|frame| self.view(frame))
                .context("Failed to draw")?;

            // Input until the next frame is due
            let deadline = Instant::now() + frame_interval;
            let mut timeout = frame_interval;
            while event::poll(timeout).context("Failed to poll terminal events")? {
                let event = event::read().context("Failed to read terminal event")?;
                if let Some(message) = Message::from_event(event) {
                    self.update(message);
                }
                timeout = deadline.saturating_duration_since(Instant::now());
                if timeout.is_zero() {
                    break;
                }
            }

            self.drain_audio_events();

            let now = Instant::now();
            let poll_due = self
                .ui
                .last_poll
                .is_none_or(|last| now.duration_since(last) >= poll_interval);
            if self.ui.polling && poll_due {
                self.update(Message::PollPlayback);
            }
            self.update(Message::AnimationTick(now));
        }
        Ok(())
    }

    fn drain_audio_events(&mut self) {
        let events: Vec<_> = match self.core.audio_events.as_mut() {
            Some(rx) => std::iter::from_fn(|| rx.try_recv().ok()).collect(),
            None => return,
        };
        for event in events {
            self.update(Message::Audio(event));
        }
    }

    /// Save changed settings and stop the audio thread
    pub fn shutdown(mut self) {
        if self.core.settings_dirty {
            match self.core.settings.save() {
                Ok(()) => tracing::info!("Settings saved"),
                Err(e) => tracing::warn!("Failed to save settings: {}", e),
            }
        }
        if let Some(audio_thread) = self.core.audio_thread.take() {
            if let Err(e) = audio_thread.join(AUDIO_JOIN_TIMEOUT) {
                tracing::warn!("{}", e);
            }
        }
    }
}

/// Enter the alternate screen with mouse and focus reporting
pub fn setup_terminal() -> Result<DefaultTerminal> {
    let terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture, EnableFocusChange)
        .context("Failed to enable mouse capture")?;
    Ok(terminal)
}

/// Leave the alternate screen and restore the shell
pub fn restore_terminal() {
    if let Err(e) = execute!(stdout(), DisableMouseCapture, DisableFocusChange) {
        tracing::warn!("Failed to disable mouse capture: {}", e);
    }
    ratatui::restore();
}
