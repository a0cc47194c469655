//! Audio thread implementation
//!
//! This module runs the AudioPlayer in a dedicated thread, processing
//! commands from the UI thread and sending events back.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::PlaybackStatus;
use super::events::{
    AudioCommand, AudioCommandReceiver, AudioEvent, AudioEventReceiver, AudioEventSender,
    SharedPlaybackState, audio_command_channel, audio_event_channel,
};
use super::handle::AudioHandle;
use super::player::AudioPlayer;

pub struct AudioThreadHandle {
    pub handle: AudioHandle,
    event_rx: Option<AudioEventReceiver>,
    thread_handle: Option<JoinHandle<()>>,
}

impl AudioThreadHandle {
    pub fn take_event_rx(&mut self) -> Option<AudioEventReceiver> {
        self.event_rx.take()
    }

    /// Stop playback and wait for the thread to exit
    pub fn join(mut self, timeout: Duration) -> Result<(), String> {
        if let Some(handle) = self.thread_handle.take() {
            self.handle.stop();

            let start = std::time::Instant::now();
            loop {
                if handle.is_finished() {
                    let _ = handle.join();
                    return Ok(());
                }
                if start.elapsed() > timeout {
                    return Err("Audio thread did not exit in time".to_string());
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
        Ok(())
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        self.handle.stop();
    }
}

/// Spawn the audio thread
///
/// Creates an AudioPlayer in a dedicated thread and returns handles for
/// communication. The player is created on the thread because the output
/// stream cannot move between threads.
pub fn spawn_audio_thread(
    device_name: Option<&str>,
    volume: f32,
) -> Result<AudioThreadHandle, String> {
    let (command_tx, command_rx) = audio_command_channel();
    let (event_tx, event_rx) = audio_event_channel();

    let state = SharedPlaybackState::new();
    state.set_volume(volume);
    let state_clone = state.clone();

    let handle = AudioHandle::new(command_tx, state);

    let device_name_owned = device_name.map(|s| s.to_string());

    let thread_handle = thread::Builder::new()
        .name("audio-player".to_string())
        .spawn(move || match AudioPlayer::with_device(device_name_owned.as_deref()) {
            Ok(mut player) => {
                player.set_volume(volume);
                audio_thread_main(player, command_rx, event_tx, state_clone);
            }
            Err(e) => {
                tracing::error!("Failed to create audio player: {}", e);
                let _ = event_tx.send(AudioEvent::Error { message: e });
            }
        })
        .map_err(|e| format!("Failed to spawn audio thread: {}", e))?;

    Ok(AudioThreadHandle {
        handle,
        event_rx: Some(event_rx),
        thread_handle: Some(thread_handle),
    })
}

/// Main loop for the audio thread
///
/// Blocks on `command_rx.blocking_recv()` and exits once every sender is gone.
fn audio_thread_main(
    mut player: AudioPlayer,
    mut command_rx: AudioCommandReceiver,
    event_tx: AudioEventSender,
    state: SharedPlaybackState,
) {
    tracing::info!("Audio thread started");

    while let Some(cmd) = command_rx.blocking_recv() {
        match cmd {
            AudioCommand::Load { path, autoplay } => {
                handle_load(&mut player, &event_tx, &state, path, autoplay);
            }

            AudioCommand::Play => match player.resume() {
                Ok(()) => {
                    update_state_from_player(&player, &state);
                    let _ = event_tx.send(AudioEvent::Resumed);
                }
                Err(e) => {
                    tracing::debug!("Play ignored: {}", e);
                }
            },

            AudioCommand::Pause => {
                player.pause();
                update_state_from_player(&player, &state);
                let pos = player.get_info().position;
                let _ = event_tx.send(AudioEvent::Paused { position: pos });
            }

            AudioCommand::Stop => {
                player.stop();
                update_state_from_player(&player, &state);
                state.set_current_path(None);
                let _ = event_tx.send(AudioEvent::Stopped);
            }

            AudioCommand::Seek { position } => {
                handle_seek(&mut player, &event_tx, &state, position);
            }

            AudioCommand::SetVolume { volume } => {
                player.set_volume(volume);
                state.set_volume(volume.clamp(0.0, 1.0));
            }

            AudioCommand::Tick => {
                update_state_from_player(&player, &state);
            }
        }

        check_playback_finished(&mut player, &event_tx, &state);
    }

    tracing::info!("Audio thread exiting (command channel closed)");
}

fn handle_load(
    player: &mut AudioPlayer,
    event_tx: &AudioEventSender,
    state: &SharedPlaybackState,
    path: PathBuf,
    autoplay: bool,
) {
    match player.load(path.clone(), autoplay) {
        Ok(duration) => {
            state.set_current_path(Some(path.clone()));
            update_state_from_player(player, state);
            let _ = event_tx.send(AudioEvent::Loaded { path, duration });
        }
        Err(e) => {
            tracing::error!("Failed to load {:?}: {}", path, e);
            state.set_current_path(None);
            update_state_from_player(player, state);
            let _ = event_tx.send(AudioEvent::Error { message: e });
        }
    }
}

fn handle_seek(
    player: &mut AudioPlayer,
    event_tx: &AudioEventSender,
    state: &SharedPlaybackState,
    position: Duration,
) {
    match player.seek(position) {
        Ok(()) => {
            update_state_from_player(player, state);
            let _ = event_tx.send(AudioEvent::SeekComplete { position });
        }
        Err(e) => {
            tracing::warn!("Seek to {:?} failed: {}", position, e);
            // Drop the optimistic position the handle wrote
            update_state_from_player(player, state);
            let _ = event_tx.send(AudioEvent::SeekFailed { error: e });
        }
    }
}

/// Publish the track end once
fn check_playback_finished(
    player: &mut AudioPlayer,
    event_tx: &AudioEventSender,
    state: &SharedPlaybackState,
) {
    if player.poll_finished() {
        update_state_from_player(player, state);
        let _ = event_tx.send(AudioEvent::Finished);
    }
}

fn update_state_from_player(player: &AudioPlayer, state: &SharedPlaybackState) {
    let info = player.get_info();
    debug_assert!(!info.finished || info.status == PlaybackStatus::Stopped);
    state.update_from_info(&info);
}
