//! Simulation constants and tuning parameters.

/// Simulation tick rate used by the host loop (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Arena ---

/// Arena radius in meters. Spawn points sit on this ring.
pub const ARENA_RADIUS: f64 = 25.0;

/// Number of default spawn points around the arena perimeter.
pub const SPAWN_POINT_COUNT: u32 = 3;

// --- Wave spawner defaults ---

/// Delay before the first wave of a round (seconds).
pub const INITIAL_SPAWN_DELAY: f64 = 1.0;

/// Minimum interval between successive spawns (seconds). Also the re-poll
/// interval while blocked on the population cap.
pub const MINIMUM_SPAWN_INTERVAL: f64 = 1.0;

/// Delay between waves within a round (seconds).
pub const MINIMUM_WAVE_DELAY: f64 = 5.0;

/// Number of spawns attempted per wave.
pub const SPAWNS_PER_WAVE: u32 = 5;

/// Maximum simultaneously-live enemies. -1 disables the cap.
pub const MAX_ACTIVE_ENEMIES: i32 = 30;

// --- Match flow ---

/// Warmup countdown before a round starts (seconds).
pub const WARMUP_DELAY: f64 = 1.0;

/// Countdown before the match ends once the end condition holds (seconds).
pub const END_DELAY: f64 = 1.0;

/// Delay in the End state before a restart is requested (seconds).
pub const RESTART_DELAY: f64 = 3.0;

// --- Participants ---

/// Health a participant starts the match with.
pub const PLAYER_STARTING_HEALTH: i32 = 100;

/// Per-round max-health boost as a fraction of base health.
pub const HEALTH_BOOST_PER_ROUND: f64 = 0.1;

/// Cap on the cumulative max-health multiplier.
pub const MAX_HEALTH_MULTIPLIER: f64 = 3.0;

// --- Enemy archetypes ---

/// Shambler walk speed (m/s).
pub const SHAMBLER_SPEED: f64 = 3.0;

/// Shambler starting health.
pub const SHAMBLER_HEALTH: i32 = 100;

/// Shambler score value.
pub const SHAMBLER_SCORE: u32 = 10;

/// Lurker walk speed (m/s).
pub const LURKER_SPEED: f64 = 4.5;

/// Lurker starting health.
pub const LURKER_HEALTH: i32 = 150;

/// Lurker score value.
pub const LURKER_SCORE: u32 = 20;

/// Brute walk speed (m/s).
pub const BRUTE_SPEED: f64 = 2.0;

/// Brute starting health.
pub const BRUTE_HEALTH: i32 = 600;

/// Brute score value.
pub const BRUTE_SCORE: u32 = 50;

// --- Enemy combat ---

/// Range at which an enemy can strike its target (meters).
pub const ENEMY_ATTACK_RANGE: f64 = 1.5;

/// Interval between enemy strikes (seconds).
pub const ENEMY_ATTACK_INTERVAL: f64 = 0.5;

/// Damage dealt per strike by a Shambler.
pub const SHAMBLER_ATTACK_DAMAGE: i32 = 10;

/// Damage dealt per strike by a Lurker.
pub const LURKER_ATTACK_DAMAGE: i32 = 20;

/// Damage dealt per strike by a Brute.
pub const BRUTE_ATTACK_DAMAGE: i32 = 30;

/// Brute strike reach (meters); longer arms than the small archetypes.
pub const BRUTE_ATTACK_RANGE: f64 = 2.0;

// --- Cleanup ---

/// Time a dead enemy lingers (sinking) before despawn (seconds).
pub const ENEMY_SINK_DURATION: f64 = 2.0;
