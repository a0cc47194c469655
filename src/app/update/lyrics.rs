// src/app/update/lyrics.rs
//! Lyric strip message handlers
//!
//! Mouse input is hit-tested against the last layout and turned into strip
//! gestures or seek slider messages. Strip drags hand raw offsets to the sync
//! controller and forward whatever seeks its throttle lets through.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::message::Message;
use crate::app::state::{App, StripDrag};
use crate::app::view::{ShellLayout, hit, token_width};
use crate::features::lyrics::sync::{SeekRequest, dispatch_seek};

/// Columns moved by one wheel notch
const WHEEL_STEP_COLUMNS: f32 = 4.0;

impl App {
    /// Handle lyric strip related messages
    pub fn handle_lyrics(&mut self, message: &Message) -> bool {
        match message {
            Message::Mouse(mouse) => {
                self.route_mouse(mouse);
                true
            }

            &Message::AnimationTick(now) => {
                let dt = now.saturating_duration_since(self.ui.last_frame);
                self.ui.last_frame = now;
                self.lyrics.controller.driver_mut().update(dt);
                if let Some(request) = self.lyrics.controller.poll_pending_seek(now) {
                    self.forward_seek(request);
                }
                true
            }

            &Message::StripPressed { column } => {
                if self.lyrics.drag.is_some() {
                    return true;
                }
                let anchor = self.lyrics.controller.driver().scroll_offset();
                self.lyrics.controller.gesture_start();
                self.lyrics.drag = Some(StripDrag::new(anchor, column));
                true
            }

            &Message::StripDragged { column } => {
                let Some(drag) = self.lyrics.drag.as_mut() else {
                    return true;
                };
                let offset = drag.move_to(column);
                if let Some(request) = self.lyrics.controller.scroll_delta(offset, Instant::now()) {
                    self.forward_seek(request);
                }
                true
            }

            Message::StripReleased => {
                self.finish_strip_drag(false);
                true
            }

            &Message::StripWheel(direction) => {
                self.wheel_step(direction);
                true
            }

            Message::GestureCancel | Message::FocusLost => {
                self.finish_strip_drag(true);
                if self.ui.seek_preview.take().is_some() {
                    tracing::debug!("Seek preview discarded");
                    self.ui.polling = true;
                }
                true
            }

            _ => false,
        }
    }

    /// Recompute the layout and measure tokens for the new strip width
    pub fn relayout(&mut self, area: Rect) {
        self.ui.layout = ShellLayout::new(area);
        self.lyrics
            .controller
            .set_viewport_width(self.ui.layout.strip.width as f32);
        self.measure_tokens();
    }

    /// Layout pass: report each token's width in columns
    pub fn measure_tokens(&mut self) {
        let gap = self.core.settings.display.token_gap;
        let widths: Vec<f32> = self
            .lyrics
            .controller
            .tokens()
            .iter()
            .map(|token| token_width(token, gap))
            .collect();
        for (index, width) in widths.into_iter().enumerate() {
            self.lyrics.controller.word_measured(index, width);
        }
    }

    fn route_mouse(&mut self, mouse: &MouseEvent) {
        let layout = self.ui.layout;
        let on_strip =
            hit(layout.strip, mouse.column, mouse.row) || hit(layout.note, mouse.column, mouse.row);
        let on_slider = hit(layout.slider, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if on_strip => {
                self.update(Message::StripPressed {
                    column: mouse.column,
                });
            }
            MouseEventKind::Down(MouseButton::Left) if on_slider => {
                if let Some(time) = self.slider_time(mouse.column) {
                    self.update(Message::SeekPreview(time));
                }
            }
            // Drags keep following the pointer outside the widget they started on
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.lyrics.drag.is_some() {
                    self.update(Message::StripDragged {
                        column: mouse.column,
                    });
                } else if self.ui.seek_preview.is_some() {
                    if let Some(time) = self.slider_time(mouse.column) {
                        self.update(Message::SeekPreview(time));
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.lyrics.drag.is_some() {
                    self.update(Message::StripReleased);
                } else if self.ui.seek_preview.is_some() {
                    self.update(Message::SeekReleased);
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if on_strip => {
                self.update(Message::StripWheel(1));
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if on_strip => {
                self.update(Message::StripWheel(-1));
            }
            _ => {}
        }
    }

    /// Track time under a slider column, clamped to the slider
    fn slider_time(&self, column: u16) -> Option<f64> {
        let slider = self.ui.layout.slider;
        let duration = self.display_duration();
        if duration <= 0.0 || slider.width == 0 {
            return None;
        }
        let span = slider.width.saturating_sub(1).max(1) as f64;
        let offset = column.saturating_sub(slider.x).min(slider.width - 1) as f64;
        Some((offset / span).clamp(0.0, 1.0) * duration)
    }

    /// End (or cancel) a strip drag, keeping the strip where it was dropped
    fn finish_strip_drag(&mut self, cancelled: bool) {
        if self.lyrics.drag.is_none() {
            return;
        }
        let dropped_at = self.display_scroll();
        self.lyrics.drag = None;

        let now = Instant::now();
        let request = if cancelled {
            self.lyrics.controller.gesture_cancel(now)
        } else {
            self.lyrics.controller.gesture_end(now)
        };
        if let Some(request) = request {
            self.forward_seek(request);
        }
        self.lyrics
            .controller
            .driver_mut()
            .set_scroll_offset(dropped_at);
        self.ui.polling = true;
    }

    /// One wheel notch: a complete gesture of a single step
    fn wheel_step(&mut self, direction: i8) {
        if self.lyrics.drag.is_some() || self.ui.seek_preview.is_some() {
            return;
        }
        let controller = &mut self.lyrics.controller;
        let offset = (controller.driver().scroll_offset() + direction as f32 * WHEEL_STEP_COLUMNS)
            .clamp(0.0, controller.scroll_extent_px());

        let now = Instant::now();
        controller.gesture_start();
        let first = controller.scroll_delta(offset, now);
        let last = controller.gesture_end(now);
        for request in first.into_iter().chain(last) {
            self.forward_seek(request);
        }

        // Successive notches accumulate before the next clock reading
        let controller = &mut self.lyrics.controller;
        let max = (controller.scroll_extent_px() - controller.viewport_width()).max(0.0);
        controller.driver_mut().set_scroll_offset(offset.min(max));
        self.ui.polling = true;
    }

    fn forward_seek(&mut self, request: SeekRequest) {
        if !dispatch_seek(&self.core.audio, request) {
            self.ui.status_message = Some("Seek failed".to_string());
        }
    }
}
