// src/app/view.rs
//! Application view rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use super::App;
use crate::audio::PlaybackStatus;
use crate::features::lyrics::LyricToken;
use crate::features::lyrics::sync::{SyncMode, active_token_index};
use crate::features::media::LyricsOrigin;
use crate::utils::format_time;

const NOTE_MARKER: &str = "♪";

/// Screen regions, recomputed on resize and used for mouse hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellLayout {
    pub title: Rect,
    pub status: Rect,
    pub strip: Rect,
    pub note: Rect,
    pub slider: Rect,
    pub help: Rect,
}

impl ShellLayout {
    pub fn new(area: Rect) -> Self {
        let [title, status, _, strip, note, _, slider, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let inset = Margin::new(2, 0);
        Self {
            title: title.inner(inset),
            status: status.inner(inset),
            strip: strip.inner(inset),
            note: note.inner(inset),
            slider: slider.inner(inset),
            help: help.inner(inset),
        }
    }
}

/// Width of a token on the strip, trailing gap included
pub fn token_width(token: &LyricToken, gap: u16) -> f32 {
    Span::raw(token.text.as_str()).width() as f32 + gap as f32
}

/// Whether a cell lies inside `rect`
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

impl App {
    /// Render the whole screen
    pub fn view(&self, frame: &mut Frame) {
        let layout = self.ui.layout;

        frame.render_widget(self.title_line(), layout.title);
        frame.render_widget(self.status_line(), layout.status);
        self.render_strip(frame, layout);
        frame.render_widget(self.slider(), layout.slider);
        frame.render_widget(
            Paragraph::new(self.core.settings.keybindings.help_line()).dark_gray(),
            layout.help,
        );
    }

    /// Position the view reflects: slider preview, else the last clock reading
    pub fn display_position(&self) -> f64 {
        self.ui.seek_preview.unwrap_or_else(|| {
            self.lyrics
                .controller
                .last_state()
                .map(|s| s.position_seconds)
                .unwrap_or(0.0)
        })
    }

    pub fn display_duration(&self) -> f64 {
        self.lyrics
            .controller
            .last_state()
            .map(|s| s.duration_seconds)
            .filter(|d| *d > 0.0)
            .or(self.core.track.duration_secs)
            .unwrap_or(0.0)
    }

    /// Scroll offset to draw; a live drag follows the pointer
    pub fn display_scroll(&self) -> f32 {
        let controller = &self.lyrics.controller;
        match self.lyrics.drag {
            Some(drag) => {
                let max = (controller.scroll_extent_px() - controller.viewport_width()).max(0.0);
                drag.offset.clamp(0.0, max)
            }
            None => controller.driver().scroll_offset(),
        }
    }

    fn title_line(&self) -> Line<'_> {
        let track = &self.core.track;
        let mut spans = vec![Span::styled(
            track.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(artist) = &track.artist {
            spans.push(Span::raw(" - "));
            spans.push(Span::styled(artist.clone(), Style::default().fg(Color::Gray)));
        }
        Line::from(spans)
    }

    fn status_line(&self) -> Line<'_> {
        let info = self.core.audio.get_info();
        let state = match info.status {
            _ if info.finished => "finished",
            _ if self.core.audio.is_empty() => "loading",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Stopped => "stopped",
        };
        let mode = match self.lyrics.controller.mode() {
            SyncMode::Auto => "auto",
            SyncMode::UserDragging => "dragging",
        };

        let source = match &self.lyrics.origin {
            Some(LyricsOrigin::File(path)) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string()),
            Some(LyricsOrigin::Embedded) => "embedded".to_string(),
            Some(LyricsOrigin::EmbeddedPlain) => "embedded, untimed".to_string(),
            None => "none".to_string(),
        };

        let mut spans = vec![
            Span::styled(state, Style::default().fg(Color::Cyan)),
            Span::raw(format!("  vol {:.0}%", info.volume * 100.0)),
            Span::raw(format!("  sync {}", mode)),
            Span::raw(format!("  lyrics {}", source)),
        ];
        if let Some(message) = &self.ui.status_message {
            spans.push(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }

    fn render_strip(&self, frame: &mut Frame, layout: ShellLayout) {
        let tokens = self.lyrics.controller.tokens();
        if tokens.is_empty() {
            frame.render_widget(
                Paragraph::new("No lyrics found").centered().dark_gray(),
                layout.strip,
            );
            return;
        }

        let gap = self.core.settings.display.token_gap;
        let position = self.display_position();
        let active = active_token_index(tokens, position).unwrap_or(0);
        let before_first = position < tokens[0].start_time;

        let gap_text = " ".repeat(gap as usize);
        let mut spans = Vec::with_capacity(tokens.len() * 2);
        for (index, token) in tokens.iter().enumerate() {
            let style = if index == active && !before_first {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if index < active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(token.text.as_str(), style));
            if gap > 0 {
                spans.push(Span::raw(gap_text.clone()));
            }
        }

        let scroll = self.display_scroll();
        let scroll_columns = scroll.round().clamp(0.0, u16::MAX as f32) as u16;
        frame.render_widget(
            Paragraph::new(Line::from(spans)).scroll((0, scroll_columns)),
            layout.strip,
        );

        if !self.core.settings.display.show_note {
            return;
        }
        // Marker stays put while the strip follows a drag
        let note = self.lyrics.controller.driver().note_offset();
        let column = (note - scroll).round();
        if column >= 0.0 && column < layout.note.width as f32 {
            let area = Rect::new(layout.note.x + column as u16, layout.note.y, 1, 1);
            frame.render_widget(Span::styled(NOTE_MARKER, Style::default().fg(Color::Yellow)), area);
        }
    }

    fn slider(&self) -> Gauge<'_> {
        let position = self.display_position();
        let duration = self.display_duration();
        let ratio = if duration > 0.0 {
            (position / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let color = if self.ui.seek_preview.is_some() {
            Color::Yellow
        } else {
            Color::Cyan
        };

        Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .use_unicode(true)
            .ratio(ratio)
            .label(format!("{} / {}", format_time(position), format_time(duration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rows() {
        let layout = ShellLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.title.y, 0);
        assert_eq!(layout.status.y, 1);
        assert_eq!(layout.note.y, layout.strip.y + 1);
        assert_eq!(layout.help.y, 23);
        assert_eq!(layout.slider.y, 22);
        assert_eq!(layout.strip.x, 2);
        assert_eq!(layout.strip.width, 76);
    }

    #[test]
    fn test_token_width_counts_columns() {
        assert_eq!(token_width(&LyricToken::new(0.0, "want"), 1), 5.0);
        // Wide glyphs take two columns each
        assert_eq!(token_width(&LyricToken::new(0.0, "歌词"), 0), 4.0);
    }

    #[test]
    fn test_hit() {
        let rect = Rect::new(2, 5, 10, 1);
        assert!(hit(rect, 2, 5));
        assert!(hit(rect, 11, 5));
        assert!(!hit(rect, 12, 5));
        assert!(!hit(rect, 5, 6));
        assert!(!hit(rect, 1, 5));
    }
}
