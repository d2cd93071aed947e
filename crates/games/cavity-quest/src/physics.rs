use serde::{Deserialize, Serialize};

use cavity_core::InputState;

use crate::geometry::Rect;
use crate::level::World;

/// Map width in pixels.
pub const MAP_WIDTH: f32 = 2400.0;
/// Ground height used wherever no ground segment covers an x.
pub const DEFAULT_GROUND_Y: f32 = 400.0;
/// Gravity added to vertical velocity every frame (pixels/frame^2, downward).
pub const GRAVITY: f32 = 0.7;
/// Vertical velocity set by a jump (negative is up).
pub const JUMP_VELOCITY: f32 = -12.0;
/// Player horizontal speed in pixels/frame.
pub const MOVE_SPEED: f32 = 5.0;
/// Player width for AABB collision.
pub const PLAYER_WIDTH: f32 = 40.0;
/// Player height for AABB collision.
pub const PLAYER_HEIGHT: f32 = 40.0;
/// Where the player appears at the start of every level.
pub const PLAYER_START_X: f32 = 100.0;
pub const PLAYER_START_Y: f32 = 350.0;
/// Jumps allowed before the player has to touch a surface again.
pub const MAX_JUMPS: u8 = 2;
/// Starting and maximum health.
pub const MAX_HEALTH: u8 = 3;
/// Walk frames toggle once the counter exceeds this many moving frames.
const WALK_FRAME_HOLD: u32 = 8;

/// Horizontal facing, also used as a patrol direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Two-frame walk cycle shared by the player and enemies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WalkCycle {
    pub facing: Facing,
    /// Sprite frame index, 0 or 1.
    pub frame: u8,
    pub counter: u32,
    pub walking: bool,
}

impl WalkCycle {
    pub fn starting_right() -> Self {
        Self {
            facing: Facing::Right,
            ..Self::default()
        }
    }

    /// Count one moving frame, toggling the sprite frame when the hold expires.
    pub fn step(&mut self) {
        self.counter += 1;
        if self.counter > WALK_FRAME_HOLD {
            self.frame = 1 - self.frame;
            self.counter = 0;
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.counter = 0;
    }
}

/// State of the player character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vy: f32,
    /// Bottom edge before this frame's vertical integration.
    pub prev_bottom: f32,
    /// Vertical velocity after this frame's collision resolution, before any jump.
    pub fall_vy: f32,
    pub grounded: bool,
    pub health: u8,
    /// Frames of damage immunity left.
    pub invincible: u32,
    /// Frames of hit flash left.
    pub flash: u32,
    pub jump_count: u8,
    /// Jump input as sampled last frame, for edge detection.
    pub jump_held: bool,
    pub walk: WalkCycle,
    pub last_x: f32,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            x: PLAYER_START_X,
            y: PLAYER_START_Y,
            w: PLAYER_WIDTH,
            h: PLAYER_HEIGHT,
            vy: 0.0,
            prev_bottom: PLAYER_START_Y + PLAYER_HEIGHT,
            fall_vy: 0.0,
            grounded: false,
            health: MAX_HEALTH,
            invincible: 0,
            flash: 0,
            jump_count: 0,
            jump_held: false,
            walk: WalkCycle::starting_right(),
            last_x: PLAYER_START_X,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible > 0
    }

    /// Put the player back at the level start. Health and timers carry over.
    pub fn reset_to_start(&mut self) {
        self.x = PLAYER_START_X;
        self.y = PLAYER_START_Y;
        self.vy = 0.0;
        self.fall_vy = 0.0;
        self.prev_bottom = self.bottom();
    }

    /// Keep the player inside `[0, MAP_WIDTH - w]`.
    pub fn clamp_to_map(&mut self) {
        self.x = self.x.clamp(0.0, MAP_WIDTH - self.w);
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance the player by one frame: walk, fall, collide, then jump.
pub fn tick_player(player: &mut PlayerState, input: &InputState, world: &World) {
    player.x += input.horizontal() * MOVE_SPEED;
    player.clamp_to_map();

    player.prev_bottom = player.bottom();
    player.vy += GRAVITY;
    player.y += player.vy;

    player.grounded = resolve_collisions(player, world);
    if player.grounded {
        player.jump_count = 0;
    }
    player.fall_vy = player.vy;

    handle_jump(player, input);
}

/// Whether a surface catches an entity that moved from `prev_bottom` to `rect`'s bottom.
///
/// Swept test: the bottom edge must cross (or touch) the surface top this frame while
/// descending, so fast falls cannot tunnel through thin platforms.
pub fn lands_on(rect: &Rect, prev_bottom: f32, vy: f32, surface: &Rect) -> bool {
    vy >= 0.0 && prev_bottom <= surface.y && rect.bottom() >= surface.y && rect.overlaps_x(surface)
}

/// Resolve the player against platforms, solid obstacles and terrain.
///
/// Returns whether the player ended the frame standing on something.
pub(crate) fn resolve_collisions(player: &mut PlayerState, world: &World) -> bool {
    let mut supported = false;

    // Platforms only stop descent
    for platform in &world.platforms {
        if lands_on(&player.rect(), player.prev_bottom, player.vy, platform) {
            player.y = platform.y - player.h;
            player.vy = 0.0;
            supported = true;
        }
    }

    // Solid obstacles: land on top, then get pushed out of the sides
    for obstacle in &world.ground_obstacles {
        if lands_on(&player.rect(), player.prev_bottom, player.vy, obstacle) {
            player.y = obstacle.y - player.h;
            player.vy = 0.0;
            supported = true;
        }
        push_out_of_sides(player, obstacle);
    }

    let ground = world.terrain.height_at(player.x + player.w / 2.0);
    if player.bottom() >= ground {
        player.y = ground - player.h;
        player.vy = 0.0;
        supported = true;
    }

    supported
}

fn push_out_of_sides(player: &mut PlayerState, obstacle: &Rect) {
    let vertical_overlap = player.bottom() > obstacle.y && player.y < obstacle.bottom();
    if !vertical_overlap {
        return;
    }
    if player.x + player.w > obstacle.x && player.x < obstacle.x {
        player.x = obstacle.x - player.w;
    }
    if player.x < obstacle.right() && player.x + player.w > obstacle.right() {
        player.x = obstacle.right();
    }
}

/// Edge-triggered jump with a two-jump allowance between groundings.
pub(crate) fn handle_jump(player: &mut PlayerState, input: &InputState) {
    let pressed = input.jump && !player.jump_held;
    if pressed && (player.grounded || player.jump_count < MAX_JUMPS) {
        player.vy = JUMP_VELOCITY;
        player.grounded = false;
        player.jump_count += 1;
    }
    player.jump_held = input.jump;
}

/// Update facing and the walk cycle from this frame's input and movement.
pub fn update_player_animation(player: &mut PlayerState, input: &InputState) {
    let moved = player.x != player.last_x;
    match input.horizontal() {
        dir if dir < 0.0 => {
            player.walk.facing = Facing::Left;
            player.walk.walking = moved;
            if moved {
                player.walk.step();
            }
        },
        dir if dir > 0.0 => {
            player.walk.facing = Facing::Right;
            player.walk.walking = moved;
            if moved {
                player.walk.step();
            }
        },
        _ => {
            player.walk.walking = false;
            player.walk.reset();
        },
    }
    player.last_x = player.x;
}
