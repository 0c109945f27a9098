#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Outbreak survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Geometry lives here as well so that the navigation engine, the world and
//! every system agree on a single definition of points and boxes.

use std::{
    ops::{Add, Mul, Sub},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Outbreak.";

/// Side length of a regular walker, in world units.
pub const BASE_AGENT_SIZE: f32 = 30.0;
/// World units a regular walker covers per tick.
pub const BASE_AGENT_SPEED: f32 = 2.5;
/// Side length of the player's collision box, in world units.
pub const PLAYER_SIZE: f32 = 30.0;
/// World units the player covers per tick.
pub const PLAYER_SPEED: f32 = 5.0;
/// Health the player starts with.
pub const PLAYER_MAX_HEALTH: Health = Health::new(100);
/// Ammunition the player starts with.
pub const PLAYER_START_AMMO: u32 = 50;
/// Duration the player ignores further damage after being hit.
pub const PLAYER_INVULNERABILITY: Duration = Duration::from_millis(1000);

/// A position (or displacement) on the world plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate. Grows downwards, as on screen.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean length when the point is interpreted as a vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        (other - self).length()
    }

    /// Unit vector pointing the same way, or `None` for a zero-length vector.
    #[must_use]
    pub fn normalized(self) -> Option<WorldPoint> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Some(Self::new(self.x / length, self.y / length))
        } else {
            None
        }
    }

    /// Linear interpolation between `self` (at `t = 0`) and `other` (at `t = 1`).
    #[must_use]
    pub fn lerp(self, other: WorldPoint, t: f32) -> WorldPoint {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Angle in radians of the vector from `self` to `other`, measured from
    /// the positive x axis.
    #[must_use]
    pub fn heading_to(self, other: WorldPoint) -> f32 {
        let delta = other - self;
        delta.y.atan2(delta.x)
    }

    /// Reports whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for WorldPoint {
    type Output = WorldPoint;

    fn add(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for WorldPoint {
    type Output = WorldPoint;

    fn sub(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = WorldPoint;

    fn mul(self, rhs: f32) -> WorldPoint {
        WorldPoint::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box stored as a center and half extents.
///
/// Overlap is strict: boxes that merely share an edge do not overlap, so an
/// agent may slide flush along a wall.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    center: WorldPoint,
    half_width: f32,
    half_height: f32,
}

impl Aabb {
    /// Creates a box from its center and half extents.
    #[must_use]
    pub const fn new(center: WorldPoint, half_width: f32, half_height: f32) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    /// Creates a square box with side `size` centered on `center`.
    #[must_use]
    pub fn square(center: WorldPoint, size: f32) -> Self {
        Self::new(center, size / 2.0, size / 2.0)
    }

    /// Creates a box from its top-left corner and full dimensions.
    #[must_use]
    pub fn from_corner(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(
            WorldPoint::new(left + width / 2.0, top + height / 2.0),
            width / 2.0,
            height / 2.0,
        )
    }

    /// Center of the box.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Half of the box width.
    #[must_use]
    pub const fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Half of the box height.
    #[must_use]
    pub const fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Smallest x coordinate covered by the box.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_width
    }

    /// Largest x coordinate covered by the box.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_width
    }

    /// Smallest y coordinate covered by the box.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center.y - self.half_height
    }

    /// Largest y coordinate covered by the box.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_height
    }

    /// Reports whether the interiors of the two boxes intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Reports whether the point lies inside the box or on its boundary.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Returns the box moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: WorldPoint) -> Aabb {
        Self::new(self.center + delta, self.half_width, self.half_height)
    }
}

/// Static obstacle supplied by the map.
///
/// The navigation engine only reads the geometry. The harmful tag is consumed
/// by combat, which damages the player while they overlap such an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    bounds: Aabb,
    harmful: bool,
}

impl Obstacle {
    /// Creates an inert obstacle.
    #[must_use]
    pub const fn solid(bounds: Aabb) -> Self {
        Self {
            bounds,
            harmful: false,
        }
    }

    /// Creates an obstacle that hurts the player on contact.
    #[must_use]
    pub const fn harmful(bounds: Aabb) -> Self {
        Self {
            bounds,
            harmful: true,
        }
    }

    /// Geometry of the obstacle.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Whether the obstacle damages the player on contact.
    #[must_use]
    pub const fn is_harmful(&self) -> bool {
        self.harmful
    }
}

/// Dimensions of the navigation grid built around a reference point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    cell_size: f32,
    region_size: f32,
}

impl GridSettings {
    /// Upper bound on cells per grid edge.
    pub const MAX_CELLS_PER_EDGE: u32 = 256;

    /// Creates grid settings without validating them.
    #[must_use]
    pub const fn new(cell_size: f32, region_size: f32) -> Self {
        Self {
            cell_size,
            region_size,
        }
    }

    /// Side length of a single cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Side length of the square region covered by the grid.
    #[must_use]
    pub const fn region_size(&self) -> f32 {
        self.region_size
    }

    /// Validates the settings and returns the number of cells along each edge.
    pub fn cells_per_edge(&self) -> Result<u32, GridError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(self.cell_size));
        }
        if !self.region_size.is_finite() || self.region_size <= 0.0 {
            return Err(GridError::InvalidRegionSize(self.region_size));
        }

        let ratio = self.region_size / self.cell_size;
        let cells = ratio.round();
        if cells < 1.0 || (ratio - cells).abs() > 1e-4 {
            return Err(GridError::UnevenDivision {
                cell_size: self.cell_size,
                region_size: self.region_size,
            });
        }
        if cells > Self::MAX_CELLS_PER_EDGE as f32 {
            return Err(GridError::TooManyCells(cells as u32));
        }

        Ok(cells as u32)
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::new(200.0, 2000.0)
    }
}

/// Reasons grid construction can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Error, Serialize, Deserialize)]
pub enum GridError {
    /// The cell size was zero, negative, or not finite.
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
    /// The region size was zero, negative, or not finite.
    #[error("region size must be a positive finite number, got {0}")]
    InvalidRegionSize(f32),
    /// The cell size does not evenly divide the region size.
    #[error("cell size {cell_size} does not evenly divide region size {region_size}")]
    UnevenDivision {
        /// Requested cell size.
        cell_size: f32,
        /// Requested region size.
        region_size: f32,
    },
    /// The grid would exceed [`GridSettings::MAX_CELLS_PER_EDGE`] cells per edge.
    #[error("grid of {0} cells per edge exceeds the supported maximum")]
    TooManyCells(u32),
    /// The reference point had a non-finite coordinate.
    #[error("reference point must be finite")]
    InvalidReference,
}

/// Integer hit points carried by the player and by agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage, saturating at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Unique identifier assigned to a pursuing agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a lingering hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HazardId(u32);

impl HazardId {
    /// Creates a new hazard identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Variants of pursuing agents.
///
/// Variants differ only in data: every kind runs the same pursuit logic and
/// the special behaviours are flags on the [`KindProfile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentKind {
    /// Regular shambling enemy.
    Walker,
    /// Small, heavily armoured enemy.
    Brute,
    /// Large enemy that lies dormant after spawning and bursts near the player.
    Stalker,
    /// Slow, durable enemy that lobs toxic hazards at the player.
    Boss,
}

impl AgentKind {
    /// Every agent kind, in declaration order.
    pub const ALL: [AgentKind; 4] = [Self::Walker, Self::Brute, Self::Stalker, Self::Boss];

    /// Tuning data associated with the kind.
    #[must_use]
    pub const fn profile(self) -> KindProfile {
        match self {
            Self::Walker => KindProfile {
                size_multiplier: 1.0,
                speed_multiplier: 1.0,
                health: Health::new(100),
                contact_damage: 10,
                dormant_for: Duration::ZERO,
                detonation: None,
                ranged_attack: None,
            },
            Self::Brute => KindProfile {
                size_multiplier: 0.75,
                speed_multiplier: 1.0,
                health: Health::new(312),
                contact_damage: 10,
                dormant_for: Duration::ZERO,
                detonation: None,
                ranged_attack: None,
            },
            Self::Stalker => KindProfile {
                size_multiplier: 2.0,
                speed_multiplier: 1.2,
                health: Health::new(200),
                contact_damage: 10,
                dormant_for: Duration::from_millis(3000),
                detonation: Some(Detonation {
                    trigger_radius: 150.0,
                    brood: 8,
                    brood_radius: 30.0,
                }),
                ranged_attack: None,
            },
            Self::Boss => KindProfile {
                size_multiplier: 1.5,
                speed_multiplier: 1.0,
                health: Health::new(1000),
                contact_damage: 20,
                dormant_for: Duration::ZERO,
                detonation: None,
                ranged_attack: Some(RangedAttack {
                    range: 400.0,
                    cooldown: Duration::from_millis(3000),
                }),
            },
        }
    }

    /// Side length of the agent's collision box.
    #[must_use]
    pub fn size(self) -> f32 {
        BASE_AGENT_SIZE * self.profile().size_multiplier
    }

    /// Distance covered per tick before spawn-time multipliers.
    #[must_use]
    pub fn base_speed(self) -> f32 {
        BASE_AGENT_SPEED * self.profile().speed_multiplier
    }
}

/// Kind-specific constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindProfile {
    /// Collision box size relative to [`BASE_AGENT_SIZE`].
    pub size_multiplier: f32,
    /// Speed relative to [`BASE_AGENT_SPEED`].
    pub speed_multiplier: f32,
    /// Starting hit points.
    pub health: Health,
    /// Damage dealt to the player on contact.
    pub contact_damage: u32,
    /// Time after spawning during which the agent does not move.
    pub dormant_for: Duration,
    /// Burst behaviour triggered by proximity to the player.
    pub detonation: Option<Detonation>,
    /// Periodic ranged attack.
    pub ranged_attack: Option<RangedAttack>,
}

/// Proximity burst parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detonation {
    /// Player distance at which the agent bursts.
    pub trigger_radius: f32,
    /// Number of walkers released by the burst.
    pub brood: u32,
    /// Radius of the ring on which released walkers appear.
    pub brood_radius: f32,
}

/// Periodic ranged attack parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangedAttack {
    /// Maximum player distance for the attack.
    pub range: f32,
    /// Minimum time between attacks.
    pub cooldown: Duration,
}

/// Directional input polled from the player's controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveInput {
    /// Move towards decreasing x.
    pub left: bool,
    /// Move towards increasing x.
    pub right: bool,
    /// Move towards decreasing y.
    pub up: bool,
    /// Move towards increasing y.
    pub down: bool,
}

impl MoveInput {
    /// Unit direction requested by the input, or `None` when the held keys
    /// cancel out or nothing is held.
    #[must_use]
    pub fn direction(&self) -> Option<WorldPoint> {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.left {
            x -= 1.0;
        }
        if self.right {
            x += 1.0;
        }
        if self.up {
            y -= 1.0;
        }
        if self.down {
            y += 1.0;
        }
        WorldPoint::new(x, y).normalized()
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the obstacle set and builds a navigation grid around `reference`.
    ConfigureArena {
        /// Static obstacles making up the map.
        obstacles: Vec<Obstacle>,
        /// Point the navigation grid is centered on.
        reference: WorldPoint,
        /// Grid dimensions.
        settings: GridSettings,
    },
    /// Rebuilds the navigation grid around a new reference point.
    RecenterGrid {
        /// Point the rebuilt grid is centered on.
        reference: WorldPoint,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player according to directional input.
    MovePlayer {
        /// Held directions.
        input: MoveInput,
    },
    /// Creates a new agent.
    SpawnAgent {
        /// Variant of the agent.
        kind: AgentKind,
        /// Initial center of the agent.
        position: WorldPoint,
        /// Multiplier applied on top of the kind's speed.
        speed_multiplier: f32,
    },
    /// Requests that an agent move to `destination` and face `facing`.
    SteerAgent {
        /// Agent being steered.
        agent: AgentId,
        /// Proposed new center.
        destination: WorldPoint,
        /// Heading in radians the agent should face.
        facing: f32,
    },
    /// Fires a projectile from the player towards a world position.
    FireProjectile {
        /// Aim point.
        toward: WorldPoint,
    },
    /// Applies a projectile hit to an agent and retires the projectile.
    ResolveProjectileHit {
        /// Projectile that connected.
        projectile: ProjectileId,
        /// Agent that was struck.
        agent: AgentId,
    },
    /// Deals damage to an agent.
    DamageAgent {
        /// Agent receiving damage.
        agent: AgentId,
        /// Hit points removed.
        amount: u32,
    },
    /// Deals damage to the player.
    DamagePlayer {
        /// Hit points removed.
        amount: u32,
    },
    /// Creates a toxic hazard at the provided position.
    CreateHazard {
        /// Center of the hazard.
        center: WorldPoint,
    },
    /// Bursts an agent, removing it and releasing its brood.
    DetonateAgent {
        /// Agent bursting.
        agent: AgentId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The obstacle set was replaced and a grid built.
    ArenaConfigured {
        /// Number of obstacles in the new arena.
        obstacle_count: usize,
        /// Number of cells per grid edge.
        cells_per_edge: u32,
    },
    /// The navigation grid was rebuilt around a new reference point.
    GridRebuilt {
        /// Center of the rebuilt grid.
        reference: WorldPoint,
        /// Number of cells per grid edge.
        cells_per_edge: u32,
    },
    /// Grid construction failed; the previous grid, if any, is kept.
    GridRejected {
        /// Reason construction was refused.
        reason: GridError,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The player moved.
    PlayerMoved {
        /// Previous center.
        from: WorldPoint,
        /// New center.
        to: WorldPoint,
    },
    /// The player's requested move collided with an obstacle.
    PlayerBlocked,
    /// A new agent entered the arena.
    AgentSpawned {
        /// Identifier assigned to the agent.
        agent: AgentId,
        /// Variant of the agent.
        kind: AgentKind,
        /// Initial center.
        position: WorldPoint,
    },
    /// An agent moved.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Previous center.
        from: WorldPoint,
        /// New center.
        to: WorldPoint,
    },
    /// An agent's requested move collided with an obstacle.
    AgentBlocked {
        /// Agent that stayed in place.
        agent: AgentId,
    },
    /// An agent lost hit points and survived.
    AgentDamaged {
        /// Agent that was hurt.
        agent: AgentId,
        /// Hit points remaining.
        remaining: Health,
    },
    /// An agent was destroyed and removed.
    AgentDestroyed {
        /// Agent that was removed.
        agent: AgentId,
        /// Variant of the removed agent.
        kind: AgentKind,
        /// Final center.
        position: WorldPoint,
    },
    /// An agent burst and was removed without counting as a kill by the player.
    AgentDetonated {
        /// Agent that burst.
        agent: AgentId,
        /// Center of the burst.
        position: WorldPoint,
    },
    /// The player lost hit points.
    PlayerDamaged {
        /// Hit points remaining.
        remaining: Health,
    },
    /// The player's hit points reached zero.
    PlayerDied,
    /// A projectile left the player's weapon.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Ammunition left after firing.
        ammo_left: u32,
    },
    /// A projectile reached its range or struck an agent.
    ProjectileExpired {
        /// Projectile removed from the arena.
        projectile: ProjectileId,
    },
    /// The player attempted to fire without ammunition or a usable aim.
    FireRejected,
    /// A toxic hazard appeared.
    HazardCreated {
        /// Identifier assigned to the hazard.
        hazard: HazardId,
        /// Center of the hazard.
        center: WorldPoint,
    },
    /// A toxic hazard dissipated.
    HazardExpired {
        /// Hazard that dissipated.
        hazard: HazardId,
    },
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Variant of the agent.
    pub kind: AgentKind,
    /// Collision box of the agent; its center is the agent's position.
    pub bounds: Aabb,
    /// Distance covered per tick.
    pub speed: f32,
    /// Hit points remaining.
    pub health: Health,
    /// Heading in radians.
    pub facing: f32,
    /// Simulated time at which the agent spawned.
    pub spawned_at: Duration,
}

impl AgentSnapshot {
    /// Center of the agent.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.bounds.center()
    }
}

/// Read-only snapshot describing all agents within the arena.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured agent snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of agents captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up a single agent by identifier.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player's state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Collision box of the player; its center is the player's position.
    pub bounds: Aabb,
    /// Hit points remaining.
    pub health: Health,
    /// Ammunition remaining.
    pub ammo: u32,
    /// Whether the player currently ignores damage.
    pub invulnerable: bool,
}

impl PlayerSnapshot {
    /// Center of the player.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.bounds.center()
    }

    /// Whether the player has run out of hit points.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: WorldPoint,
    /// Damage dealt on impact.
    pub damage: u32,
}

/// Immutable representation of a toxic hazard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardSnapshot {
    /// Identifier assigned to the hazard.
    pub id: HazardId,
    /// Center of the hazard.
    pub center: WorldPoint,
    /// Radius within which the player is hurt.
    pub radius: f32,
    /// Damage dealt per tick of contact.
    pub damage: u32,
}
