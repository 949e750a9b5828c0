//! Per-frame update
//!
//! Input gathered since the last animation frame is applied first, then
//! every timer advances by the frame's elapsed time.

use glam::Vec2;

use super::dialogue::{DialogueEvent, Script, ScriptKind};
use super::picking::{Camera, PRIMARY_BUTTON, PointerDown, pick};
use super::playback::{PlaybackError, PlaybackEvent, TextSurface};
use super::state::{BreakSound, GameEvent, GameState, MusicCue};
use super::voxel::VoxelId;
use crate::consts::SCENE_SPIN;

/// One DOM input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse press on the canvas
    Pointer(PointerDown),
    /// Legacy key code from a keydown
    Key(u32),
    /// Dialogue action button clicked
    ActionButton,
}

/// Input collected between two animation frames
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Events in arrival order
    pub events: Vec<InputEvent>,
    /// Canvas size in client pixels
    pub viewport: Vec2,
}

impl TickInput {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

/// Advance the game by one animation frame.
///
/// `dt_ms` drives the dialogue and playback timers, `now` (seconds) the
/// particle clock. `surface` receives playback frames.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    camera: &Camera,
    dt_ms: f64,
    now: f64,
    surface: &mut dyn TextSurface,
) {
    for event in &input.events {
        match event {
            InputEvent::Pointer(pointer) => {
                state.pointer_down(pointer, input.viewport, camera, now);
            }
            InputEvent::Key(code) => {
                state.key_down(*code);
            }
            InputEvent::ActionButton => {
                state.press_action_button();
            }
        }
    }
    state.advance(dt_ms, now, surface);
}

impl GameState {
    /// Handle a mouse press: pick and remove the nearest voxel under the
    /// pointer. Returns the removed voxel.
    pub fn pointer_down(
        &mut self,
        pointer: &PointerDown,
        viewport: Vec2,
        camera: &Camera,
        now: f64,
    ) -> Option<VoxelId> {
        if pointer.button != PRIMARY_BUTTON {
            return None;
        }
        if self.is_suspended() {
            log::debug!("Pick ignored during playback");
            return None;
        }
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }

        let ndc = pointer.to_ndc(viewport.x, viewport.y);
        let ray = camera.ray_from_ndc(ndc);
        match pick(&ray, &self.world, self.scene_yaw) {
            Some(hit) => self.break_voxel(hit.id, now),
            None => {
                self.streak.record_miss();
                None
            }
        }
    }

    /// Remove a voxel with debris and sound, then check the streak
    pub fn break_voxel(&mut self, id: VoxelId, now: f64) -> Option<VoxelId> {
        let cell = self.world.remove(id)?;

        if self.particles_enabled {
            self.particles
                .spawn(cell.position, cell.color, now, &mut self.rng);
        }
        let sound = BreakSound::random(&mut self.rng);
        self.events.push(GameEvent::VoxelBroken { id, sound });

        if self.streak.record_hit() && self.dialogue.escalation_eligible() {
            log::info!("Destruction streak of {}: escalating", self.streak.count());
            self.play_script(Script::escalation());
            self.streak.reset();
            self.events.push(GameEvent::Escalated);
        }
        Some(id)
    }

    /// Feed one key code to the secret detector. Returns true if it started
    /// a playback session.
    pub fn key_down(&mut self, code: u32) -> bool {
        if !self.secret.push(code) {
            return false;
        }
        log::info!("Secret sequence entered");
        if self.is_suspended() {
            log::warn!("Secret sequence ignored: playback already running");
            return false;
        }
        self.recolor_scene();
        self.trigger_rickroll()
    }

    /// The dialogue action button was clicked
    pub fn press_action_button(&mut self) -> bool {
        if !self.action_button_visible {
            log::debug!("Action button press ignored while hidden");
            return false;
        }
        self.trigger_rickroll()
    }

    /// Start a playback session: taunt, hide the button, cue the music and
    /// ask the platform to fetch the asset.
    pub fn trigger_rickroll(&mut self) -> bool {
        if let Err(e) = self.playback.request() {
            log::warn!("Rickroll ignored: {}", e);
            return false;
        }
        self.dialogue.show(Script::gotcha());
        self.set_action_button(false);
        self.events.push(GameEvent::Music(MusicCue::Restart));
        self.events.push(GameEvent::FetchAsset);
        true
    }

    /// Deliver the fetched asset (or the fetch failure)
    pub fn asset_loaded(&mut self, body: Result<String, PlaybackError>) {
        match self.playback.finish_loading(body) {
            Ok(frames) => {
                log::info!("ASCII asset loaded: {} frames", frames);
                self.events.push(GameEvent::PlaybackStarted { frames });
            }
            Err(PlaybackError::NotLoading) => {
                log::warn!("Asset delivered with no load pending; dropped");
            }
            Err(e) => {
                log::error!("ASCII playback failed: {}", e);
                self.end_session();
                self.events.push(GameEvent::PlaybackFailed(e));
            }
        }
    }

    /// Advance timers by one animation frame
    pub fn advance(&mut self, dt_ms: f64, now: f64, surface: &mut dyn TextSurface) {
        if self.spin_enabled && !self.is_suspended() {
            self.scene_yaw = (self.scene_yaw + SCENE_SPIN).rem_euclid(std::f32::consts::TAU);
        }

        self.particles.tick(now);

        if let Some(event) = self.dialogue.advance(dt_ms) {
            self.on_dialogue_event(event);
        }

        if let Some(PlaybackEvent::Finished { frames_shown }) = self.playback.advance(dt_ms, surface)
        {
            log::info!("Playback finished after {} frames", frames_shown);
            self.end_session();
            self.events.push(GameEvent::PlaybackFinished);
        }
    }

    /// Start a script, settling whatever it cut off
    pub(super) fn play_script(&mut self, script: Script) {
        for event in self.dialogue.play(script) {
            self.on_dialogue_event(event);
        }
    }

    /// The intro ending, whether typed out or cut off by an escalation,
    /// reveals the action button
    fn on_dialogue_event(&mut self, event: DialogueEvent) {
        let kind = match event {
            DialogueEvent::ScriptComplete(kind) => {
                log::debug!("Dialogue script complete: {:?}", kind);
                kind
            }
            DialogueEvent::ScriptInterrupted(kind) => {
                log::debug!("Dialogue script interrupted: {:?}", kind);
                kind
            }
        };
        if kind == ScriptKind::Intro && !self.is_suspended() {
            self.set_action_button(true);
        }
    }

    /// Scene comes back: button revealed, music stopped
    fn end_session(&mut self) {
        self.set_action_button(true);
        self.events.push(GameEvent::Music(MusicCue::Stop));
    }
}
