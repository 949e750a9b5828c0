//! Game state and the events it reports to the platform layer

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::dialogue::{DialogueSequencer, Script};
use super::noise::SimplexField;
use super::particles::ParticleEmitter;
use super::playback::{PlaybackEngine, PlaybackError};
use super::secret::SecretDetector;
use super::streak::StreakCounter;
use super::terrain::{TerrainParams, build_terrain};
use super::voxel::{VoxelId, VoxelWorld};
use crate::Hsl;
use crate::settings::Settings;

/// Break sound family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFamily {
    Glass,
    Select,
}

impl SoundFamily {
    pub const ALL: [SoundFamily; 2] = [SoundFamily::Glass, SoundFamily::Select];

    pub fn name(&self) -> &'static str {
        match self {
            SoundFamily::Glass => "glass",
            SoundFamily::Select => "select",
        }
    }

    /// Number of recorded variants (files are numbered from 1)
    pub fn variants(&self) -> u8 {
        match self {
            SoundFamily::Glass => 6,
            SoundFamily::Select => 8,
        }
    }
}

/// A randomized break sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakSound {
    pub family: SoundFamily,
    pub variant: u8,
    pub playback_rate: f32,
}

impl BreakSound {
    pub fn random(rng: &mut impl Rng) -> Self {
        let family = SoundFamily::ALL[rng.random_range(0..SoundFamily::ALL.len())];
        Self {
            family,
            variant: rng.random_range(1..=family.variants()),
            playback_rate: rng.random_range(0.85..1.15),
        }
    }

    pub fn asset_path(&self) -> String {
        format!("assets/breaks/{}_{:03}.ogg", self.family.name(), self.variant)
    }
}

/// Cue for the music element that accompanies playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    /// Rewind to 0 and play
    Restart,
    /// Pause and rewind
    Stop,
}

/// Side effects for the platform layer, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A voxel was removed; play its sound
    VoxelBroken { id: VoxelId, sound: BreakSound },
    /// The NPC switched to the escalation script
    Escalated,
    /// Show/hide the dialogue action button
    ActionButton { visible: bool },
    Music(MusicCue),
    /// Fetch the ASCII asset and hand it to `asset_loaded`
    FetchAsset,
    PlaybackStarted { frames: usize },
    PlaybackFinished,
    PlaybackFailed(PlaybackError),
    /// Background and every surface got a random color
    SceneRecolored,
}

/// Everything the core owns
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed (terrain and effects)
    pub seed: u64,
    pub world: VoxelWorld,
    pub particles: ParticleEmitter,
    pub dialogue: DialogueSequencer,
    pub streak: StreakCounter,
    pub secret: SecretDetector,
    /// Playback session; while active the scene is suspended
    pub playback: PlaybackEngine,
    /// Scene rotation about +Y (radians)
    pub scene_yaw: f32,
    /// Clear color (sRGB)
    pub background: [f32; 3],
    /// Idle spin enabled by settings
    pub spin_enabled: bool,
    /// Debris enabled by settings
    pub particles_enabled: bool,
    /// Dialogue action button shown
    pub action_button_visible: bool,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
}

/// Fold a 64-bit run seed into the noise seed
pub fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

impl GameState {
    /// New run: terrain from seeded simplex noise, intro dialogue started
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let field = SimplexField::new(noise_seed(seed));
        let world = build_terrain(&TerrainParams::default(), &field);
        log::info!("Terrain built: {} voxels (seed {})", world.len(), seed);
        Self::with_world(seed, world, settings)
    }

    /// New run over a prepared world
    pub fn with_world(seed: u64, world: VoxelWorld, settings: &Settings) -> Self {
        let mut state = Self {
            seed,
            world,
            particles: ParticleEmitter::new(settings.particle_motion),
            dialogue: DialogueSequencer::new(),
            streak: StreakCounter::default(),
            secret: SecretDetector::default(),
            playback: PlaybackEngine::default(),
            scene_yaw: 0.0,
            background: [0.0, 0.0, 0.0],
            spin_enabled: settings.effective_scene_spin(),
            particles_enabled: settings.particles,
            action_button_visible: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.play_script(Script::intro());
        state
    }

    /// Apply changed preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.spin_enabled = settings.effective_scene_spin();
        self.particles_enabled = settings.particles;
        self.particles.motion = settings.particle_motion;
        if !self.particles_enabled {
            self.particles.clear();
        }
    }

    /// A playback session is running (loading included)
    pub fn is_suspended(&self) -> bool {
        self.playback.is_active()
    }

    /// Voxels are drawn and pickable
    pub fn voxels_visible(&self) -> bool {
        !self.is_suspended()
    }

    /// ASCII billboard is drawn
    pub fn billboard_visible(&self) -> bool {
        self.is_suspended()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn set_action_button(&mut self, visible: bool) {
        if self.action_button_visible != visible {
            self.action_button_visible = visible;
            self.events.push(GameEvent::ActionButton { visible });
        }
    }

    /// Random background and a random hue on every voxel and particle
    pub fn recolor_scene(&mut self) {
        let bg: u32 = self.rng.random_range(0..0x00ff_ffff);
        self.background = [
            ((bg >> 16) & 0xff) as f32 / 255.0,
            ((bg >> 8) & 0xff) as f32 / 255.0,
            (bg & 0xff) as f32 / 255.0,
        ];

        let rng = &mut self.rng;
        for cell in self.world.iter_mut() {
            cell.color = Hsl::new(rng.random::<f32>() * 360.0, 1.0, 0.5);
        }
        self.particles
            .recolor(|| Hsl::new(rng.random::<f32>() * 360.0, 1.0, 0.5));
        self.events.push(GameEvent::SceneRecolored);
    }
}
