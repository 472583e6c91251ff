//! Device configuration and constants
//!
//! Central values used across the controller. Timing, capacity and resource
//! names should reference these constants rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "Story Box";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Storage layout ───────────────────────────────────────────────────────────

/// Mount point of the removable medium.
pub const SD_ROOT: &str = "/sdcard";

/// Root folders whose selection or entry triggers the section announcement
/// (compared case-insensitively).
pub const SECTION_FOLDERS: [&str; 2] = ["01", "stories"];

/// Folder preferred as the default selection after `01`.
pub const FALLBACK_DEFAULT_FOLDER: &str = "audios";

/// Section announcement resource.
pub const SECTION_RESOURCE: &str = "stories.wav";

/// Announced when returning to the home screen.
pub const HOME_RESOURCE: &str = "home.wav";

/// First boot greeting resource.
pub const WELCOME_RESOURCE: &str = "welcome.wav";

/// Story announcements are `story<digit>.wav`.
pub const STORY_RESOURCE_PREFIX: &str = "story";

/// Extension of playable tracks (compared case-insensitively).
pub const TRACK_EXTENSION: &str = ".wav";

// ── Capacities ───────────────────────────────────────────────────────────────

/// Maximum root folders kept in the catalog; extra entries are dropped.
pub const MAX_FOLDERS: usize = 32;

/// Maximum tracks kept for the open folder; extra entries are dropped.
pub const MAX_TRACKS: usize = 64;

/// Longest path the controller builds.
pub const RESOURCE_PATH_MAX: usize = 256;

/// Longest folder or track name kept in the catalog.
pub const ENTRY_NAME_MAX: usize = 64;

/// Depth of the interrupt-to-task encoder event queue.
pub const INPUT_QUEUE_DEPTH: usize = 16;

// ── Timing ───────────────────────────────────────────────────────────────────

/// Minimum interval between accepted button presses and encoder switch edges.
pub const SWITCH_DEBOUNCE_MS: u64 = 50;

/// Minimum interval between accepted encoder steps.
pub const STEP_DEBOUNCE_MS: u64 = 60;

/// Main control loop tick.
pub const POLL_TICK_MS: u64 = 10;

/// Upper bound on one paused wait before the engine re-checks its flags.
pub const PAUSE_POLL_MS: u64 = 50;

/// Bound on a single output write.
pub const WRITE_TIMEOUT_MS: u64 = 1000;

// ── Audio ────────────────────────────────────────────────────────────────────

/// Frames per streaming chunk. Interruption latency is bounded by one chunk.
pub const CHUNK_FRAMES: usize = 1024;

/// Largest channel count the output accepts.
pub const MAX_CHANNELS: u8 = 2;

/// Only supported PCM bit depth.
pub const PCM_BITS: u16 = 16;

/// Largest chunk in bytes (`CHUNK_FRAMES` stereo 16-bit frames).
pub const CHUNK_BYTES_MAX: usize = CHUNK_FRAMES * 2 * MAX_CHANNELS as usize;

/// Volume at boot, percent.
pub const VOLUME_DEFAULT: u8 = 100;

/// Upper end of the volume range, percent.
pub const VOLUME_MAX: u8 = 200;

/// Change applied by one volume button press, percent.
pub const VOLUME_STEP: i32 = 10;
