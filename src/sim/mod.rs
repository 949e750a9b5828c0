//! Platform-independent game core
//!
//! Everything here runs natively and in tests:
//! - Seeded RNG only (terrain, debris, sounds, recolors)
//! - Timers advance only through explicit `dt`, never a wall clock
//! - Stable iteration order (voxels in generation order)
//! - No rendering, DOM, or audio dependencies

pub mod dialogue;
pub mod noise;
pub mod particles;
pub mod picking;
pub mod playback;
pub mod secret;
pub mod state;
pub mod streak;
pub mod terrain;
pub mod tick;
pub mod voxel;

pub use dialogue::{DialogueEvent, DialogueSequencer, DialogueState, Script, ScriptKind, ScriptLine};
pub use self::noise::{NoiseSample, SimplexField};
pub use particles::{Particle, ParticleEmitter};
pub use picking::{Camera, PRIMARY_BUTTON, PickHit, PointerDown, Ray, pick};
pub use playback::{
    AsciiFrameSet, PlaybackEngine, PlaybackError, PlaybackEvent, PlaybackPhase, TextBuffer,
    TextSurface,
};
pub use secret::SecretDetector;
pub use state::{BreakSound, GameEvent, GameState, MusicCue, SoundFamily};
pub use streak::StreakCounter;
pub use terrain::{TerrainParams, build_terrain, height_map};
pub use tick::{InputEvent, TickInput, tick};
pub use voxel::{VoxelCell, VoxelId, VoxelWorld};
