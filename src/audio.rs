//! Audio using HTML media elements
//!
//! Break sounds are short sampled clips, one fresh element per play so
//! overlapping breaks don't cut each other off. The playback music lives in
//! a page element (`#ah-audio`).

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::settings::Settings;
use crate::sim::{BreakSound, MusicCue};

/// Page element holding the playback music
const MUSIC_ELEMENT_ID: &str = "ah-audio";

/// Audio manager for the game
pub struct AudioManager {
    music: Option<HtmlAudioElement>,
    sfx_gain: f32,
    music_gain: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let music = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(MUSIC_ELEMENT_ID))
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
        if music.is_none() {
            log::warn!("No #{} audio element - music disabled", MUSIC_ELEMENT_ID);
        }

        Self {
            music,
            sfx_gain: settings.sfx_gain(),
            music_gain: settings.music_gain(),
        }
    }

    /// Pick up changed volume or mute preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_gain = settings.sfx_gain();
        self.music_gain = settings.music_gain();
        if let Some(music) = &self.music {
            music.set_volume(self.music_gain as f64);
        }
    }

    /// Play a break clip at its randomized rate
    pub fn play_break(&self, sound: &BreakSound) {
        if self.sfx_gain <= 0.0 {
            return;
        }

        let path = sound.asset_path();
        let audio = match HtmlAudioElement::new_with_src(&path) {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Cannot create audio for {}: {:?}", path, e);
                return;
            }
        };
        audio.set_volume(self.sfx_gain as f64);
        audio.set_playback_rate(sound.playback_rate as f64);
        start_playback(&audio, path);
    }

    pub fn music(&self, cue: MusicCue) {
        let Some(music) = &self.music else { return };
        match cue {
            MusicCue::Restart => {
                music.set_current_time(0.0);
                music.set_volume(self.music_gain as f64);
                start_playback(music, MUSIC_ELEMENT_ID.to_string());
            }
            MusicCue::Stop => {
                if let Err(e) = music.pause() {
                    log::warn!("Music pause failed: {:?}", e);
                }
                music.set_current_time(0.0);
            }
        }
    }
}

/// Start an element; autoplay rejections only get logged
fn start_playback(audio: &HtmlAudioElement, what: String) {
    let promise = match audio.play() {
        Ok(promise) => promise,
        Err(e) => {
            log::warn!("Playback of {} failed: {:?}", what, e);
            return;
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("Playback of {} blocked: {:?}", what, e);
        }
    });
}
