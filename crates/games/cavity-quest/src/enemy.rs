use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::level::World;
use crate::physics::{Facing, GRAVITY, MAP_WIDTH, WalkCycle};

/// Enemy width and height.
pub const ENEMY_SIZE: f32 = 40.0;
/// Patrol speed in pixels/frame.
pub const ENEMY_SPEED: f32 = 2.0;
/// Feet within this distance of an obstacle top count as already standing on it.
const STANDING_TOLERANCE: f32 = 6.0;
/// How far below an obstacle top a falling enemy's feet may be and still land on it.
const LANDING_TOLERANCE: f32 = 10.0;
/// Inset from each side of an obstacle at which a patrolling enemy turns around.
const EDGE_MARGIN: f32 = 2.0;
/// Height kept per frame while being flattened.
const FLATTEN_RATIO: f32 = 0.85;
/// Width growth per frame while being flattened.
const FLATTEN_WIDEN: f32 = 1.05;
/// Below this height a flattened enemy is gone.
const FLATTEN_MIN_HEIGHT: f32 = 8.0;

/// A patrolling enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vy: f32,
    pub dir: Facing,
    pub alive: bool,
    /// Stomped and playing the defeat animation.
    pub flattening: bool,
    pub flatten_frame: u32,
    /// Index into the level's platform list while walking on a platform.
    pub platform: Option<usize>,
    pub walk: WalkCycle,
    pub last_x: f32,
}

impl EnemyState {
    pub fn new(x: f32, y: f32, platform: Option<usize>) -> Self {
        Self {
            x,
            y,
            w: ENEMY_SIZE,
            h: ENEMY_SIZE,
            vy: 0.0,
            dir: Facing::Left,
            alive: true,
            flattening: false,
            flatten_frame: 0,
            platform,
            walk: WalkCycle::default(),
            last_x: x,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    fn feet_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Alive and not mid-defeat: can hurt the player and moves.
    pub fn is_active(&self) -> bool {
        self.alive && !self.flattening
    }

    pub fn start_flatten(&mut self) {
        self.flattening = true;
        self.flatten_frame = 0;
    }
}

/// Advance one enemy's patrol by a frame.
///
/// Support is re-derived every frame: a bound platform first, then an obstacle
/// top under the feet, otherwise gravity with terrain and obstacle landing.
pub fn tick_enemy(enemy: &mut EnemyState, world: &World) {
    if !enemy.is_active() {
        return;
    }

    if let Some(platform) = enemy.platform.and_then(|i| world.platforms.get(i)) {
        patrol_platform(enemy, platform);
        return;
    }
    enemy.platform = None;

    let feet_x = enemy.feet_x();
    let standing_on = world.ground_obstacles.iter().find(|ob| {
        feet_x >= ob.x && feet_x <= ob.right() && (enemy.bottom() - ob.y).abs() < STANDING_TOLERANCE
    });

    match standing_on {
        Some(obstacle) => patrol_obstacle(enemy, obstacle),
        None => walk_and_fall(enemy, world),
    }
}

fn patrol_platform(enemy: &mut EnemyState, platform: &Rect) {
    let next_x = enemy.x + enemy.dir.sign() * ENEMY_SPEED;
    if next_x < platform.x || next_x + enemy.w > platform.right() {
        enemy.dir = enemy.dir.reversed();
    } else {
        enemy.x = next_x;
    }

    let feet_x = enemy.feet_x();
    if enemy.bottom() < platform.y || feet_x < platform.x || feet_x > platform.right() {
        enemy.platform = None;
    }
}

fn patrol_obstacle(enemy: &mut EnemyState, obstacle: &Rect) {
    let next_x = enemy.x + enemy.dir.sign() * ENEMY_SPEED;
    let next_left = next_x + EDGE_MARGIN;
    let next_right = next_x + enemy.w - EDGE_MARGIN;
    if next_left < obstacle.x || next_right > obstacle.right() {
        enemy.dir = enemy.dir.reversed();
    } else {
        enemy.x = next_x;
    }
    enemy.y = obstacle.y - enemy.h;
    enemy.vy = 0.0;
}

fn walk_and_fall(enemy: &mut EnemyState, world: &World) {
    let next_x = enemy.x + enemy.dir.sign() * ENEMY_SPEED;
    let hit_edge = next_x < 0.0 || next_x + enemy.w > MAP_WIDTH;
    let hit_obstacle = world.ground_obstacles.iter().any(|ob| {
        next_x + enemy.w > ob.x
            && next_x < ob.right()
            && enemy.bottom() > ob.y
            && enemy.y < ob.bottom()
    });
    if hit_edge || hit_obstacle {
        enemy.dir = enemy.dir.reversed();
    } else {
        enemy.x = next_x;
    }

    enemy.vy += GRAVITY;
    enemy.y += enemy.vy;

    let feet_x = enemy.feet_x();
    let ground = world.terrain.height_at(feet_x);
    let landing_on = world.ground_obstacles.iter().find(|ob| {
        feet_x >= ob.x
            && feet_x <= ob.right()
            && enemy.bottom() <= ob.y + LANDING_TOLERANCE
            && enemy.bottom() + enemy.vy >= ob.y
    });
    if let Some(obstacle) = landing_on {
        enemy.y = obstacle.y - enemy.h;
        enemy.vy = 0.0;
    } else if enemy.bottom() >= ground {
        enemy.y = ground - enemy.h;
        enemy.vy = 0.0;
    }
}

/// One frame of the defeat animation: squash, widen, keep the feet planted.
///
/// Marks the enemy dead once it is flat enough.
pub fn advance_flatten(enemy: &mut EnemyState) {
    if !enemy.flattening {
        return;
    }
    let bottom = enemy.bottom();
    enemy.flatten_frame += 1;
    enemy.h *= FLATTEN_RATIO;
    enemy.w *= FLATTEN_WIDEN;
    enemy.y = bottom - enemy.h;
    if enemy.h < FLATTEN_MIN_HEIGHT {
        enemy.alive = false;
        enemy.flattening = false;
    }
}

/// Facing follows actual movement; standing still resets the walk cycle.
pub fn update_enemy_animation(enemy: &mut EnemyState) {
    if !enemy.is_active() {
        return;
    }
    let moved = if enemy.x > enemy.last_x {
        enemy.walk.facing = Facing::Right;
        true
    } else if enemy.x < enemy.last_x {
        enemy.walk.facing = Facing::Left;
        true
    } else {
        false
    };
    enemy.walk.walking = moved;
    if moved {
        enemy.walk.step();
    } else {
        enemy.walk.reset();
    }
    enemy.last_x = enemy.x;
}
