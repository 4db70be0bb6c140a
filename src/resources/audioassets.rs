//! Audio asset catalogue.
//!
//! Decoding and mixing belong to the host. The catalogue caches sound effect
//! and music names, tracks the single music slot and queues [`AudioCmd`]s
//! that a host backend drains once per frame with
//! [`AudioAssets::take_commands`].

use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::events::audio::AudioCmd;

/// Unread commands kept when no backend drains the queue.
const MAX_PENDING_COMMANDS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The music slot: at most one track plays at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MusicState {
    pub track: Option<String>,
    pub looped: bool,
    pub status: MusicStatus,
}

#[derive(Debug, Default)]
pub struct AudioAssets {
    sound_effects: FxHashSet<String>,
    music: FxHashSet<String>,
    state: MusicState,
    commands: Vec<AudioCmd>,
    fx_played: u64,
}

impl AudioAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches a sound effect; loading a cached one is a no-op.
    pub fn load_sound_effect(&mut self, name: &str) {
        if self.sound_effects.insert(name.to_string()) {
            debug!("loading sound effect '{name}'");
            self.commands.push(AudioCmd::LoadFx { id: name.to_string() });
        }
    }

    /// Plays a sound effect once, loading it first if needed.
    pub fn play_sound_effect(&mut self, name: &str) {
        self.load_sound_effect(name);
        self.fx_played += 1;
        self.commands.push(AudioCmd::PlayFx { id: name.to_string() });
    }

    pub fn load_music(&mut self, name: &str) {
        if self.music.insert(name.to_string()) {
            debug!("loading music '{name}'");
            self.commands.push(AudioCmd::LoadMusic { id: name.to_string() });
        }
    }

    /// Starts `name` in the music slot, replacing whatever was there.
    pub fn play_music(&mut self, name: &str, looped: bool) {
        self.load_music(name);
        self.state = MusicState {
            track: Some(name.to_string()),
            looped,
            status: MusicStatus::Playing,
        };
        self.commands.push(AudioCmd::PlayMusic {
            id: name.to_string(),
            looped,
        });
    }

    pub fn stop_music(&mut self) {
        if let Some(track) = self.state.track.take() {
            self.commands.push(AudioCmd::StopMusic { id: track });
        }
        self.state.status = MusicStatus::Stopped;
    }

    /// Pauses playing music. Returns false when nothing is playing.
    pub fn pause_music(&mut self) -> bool {
        match (&self.state.track, self.state.status) {
            (Some(track), MusicStatus::Playing) => {
                self.commands.push(AudioCmd::PauseMusic { id: track.clone() });
                self.state.status = MusicStatus::Paused;
                true
            }
            _ => false,
        }
    }

    /// Resumes paused music. Returns false when nothing is paused.
    pub fn resume_music(&mut self) -> bool {
        match (&self.state.track, self.state.status) {
            (Some(track), MusicStatus::Paused) => {
                self.commands.push(AudioCmd::ResumeMusic { id: track.clone() });
                self.state.status = MusicStatus::Playing;
                true
            }
            _ => false,
        }
    }

    pub fn music_state(&self) -> &MusicState {
        &self.state
    }

    pub fn contains_sound_effect(&self, name: &str) -> bool {
        self.sound_effects.contains(name)
    }

    pub fn contains_music(&self, name: &str) -> bool {
        self.music.contains(name)
    }

    /// Sound effects played since creation.
    pub fn sound_effects_played(&self) -> u64 {
        self.fx_played
    }

    /// Forgets a sound effect or music track. Unloading the track in the
    /// music slot stops it. Returns whether anything was removed.
    pub fn unload(&mut self, name: &str) -> bool {
        let mut removed = false;
        if self.sound_effects.remove(name) {
            self.commands.push(AudioCmd::UnloadFx { id: name.to_string() });
            removed = true;
        }
        if self.music.remove(name) {
            if self.state.track.as_deref() == Some(name) {
                self.stop_music();
            }
            self.commands.push(AudioCmd::UnloadMusic { id: name.to_string() });
            removed = true;
        }
        removed
    }

    /// Stops music and empties both caches.
    pub fn clear(&mut self) {
        if self.sound_effects.is_empty() && self.music.is_empty() {
            return;
        }
        self.stop_music();
        self.sound_effects.clear();
        self.music.clear();
        self.commands.push(AudioCmd::UnloadAll);
        debug!("audio cache cleared");
    }

    /// Commands queued since the last call, oldest first.
    pub fn take_commands(&mut self) -> Vec<AudioCmd> {
        std::mem::take(&mut self.commands)
    }

    /// Drops the queue once it outgrows [`MAX_PENDING_COMMANDS`].
    pub(crate) fn trim_commands(&mut self) {
        if self.commands.len() > MAX_PENDING_COMMANDS {
            warn!("discarding {} unread audio commands", self.commands.len());
            self.commands.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_is_cached() {
        let mut audio = AudioAssets::new();
        audio.load_sound_effect("hit");
        audio.load_sound_effect("hit");
        assert!(audio.contains_sound_effect("hit"));
        assert_eq!(audio.take_commands(), vec![AudioCmd::LoadFx { id: "hit".into() }]);
    }

    #[test]
    fn playing_an_effect_loads_it_first() {
        let mut audio = AudioAssets::new();
        audio.play_sound_effect("hit");
        audio.play_sound_effect("hit");
        assert_eq!(audio.sound_effects_played(), 2);
        assert_eq!(
            audio.take_commands(),
            vec![
                AudioCmd::LoadFx { id: "hit".into() },
                AudioCmd::PlayFx { id: "hit".into() },
                AudioCmd::PlayFx { id: "hit".into() },
            ]
        );
    }

    #[test]
    fn pause_and_resume_music() {
        let mut audio = AudioAssets::new();
        assert!(!audio.pause_music());
        audio.play_music("theme", true);
        assert_eq!(audio.music_state().status, MusicStatus::Playing);
        assert!(!audio.resume_music());

        assert!(audio.pause_music());
        assert_eq!(audio.music_state().status, MusicStatus::Paused);
        assert!(audio.resume_music());
        assert_eq!(audio.music_state().status, MusicStatus::Playing);
        assert!(audio.music_state().looped);

        audio.stop_music();
        assert_eq!(audio.music_state().track, None);
        assert_eq!(audio.music_state().status, MusicStatus::Stopped);
    }

    #[test]
    fn new_track_replaces_the_old_one() {
        let mut audio = AudioAssets::new();
        audio.play_music("menu", true);
        audio.play_music("boss", false);
        assert_eq!(audio.music_state().track.as_deref(), Some("boss"));
        assert!(!audio.music_state().looped);
        assert!(audio.contains_music("menu"));
    }

    #[test]
    fn unloading_the_current_track_stops_it() {
        let mut audio = AudioAssets::new();
        audio.play_music("theme", true);
        audio.take_commands();

        assert!(audio.unload("theme"));
        assert!(!audio.unload("theme"));
        assert_eq!(audio.music_state().status, MusicStatus::Stopped);
        assert_eq!(
            audio.take_commands(),
            vec![
                AudioCmd::StopMusic { id: "theme".into() },
                AudioCmd::UnloadMusic { id: "theme".into() },
            ]
        );
    }

    #[test]
    fn clear_empties_both_caches() {
        let mut audio = AudioAssets::new();
        audio.load_sound_effect("hit");
        audio.play_music("theme", true);
        audio.clear();
        assert!(!audio.contains_sound_effect("hit"));
        assert!(!audio.contains_music("theme"));
        assert_eq!(audio.music_state(), &MusicState::default());
        assert_eq!(audio.take_commands().last(), Some(&AudioCmd::UnloadAll));
    }

    #[test]
    fn undrained_queue_is_bounded() {
        let mut audio = AudioAssets::new();
        for _ in 0..=MAX_PENDING_COMMANDS {
            audio.play_sound_effect("hit");
        }
        audio.trim_commands();
        assert!(audio.take_commands().is_empty());
        assert!(audio.contains_sound_effect("hit"));
    }
}
