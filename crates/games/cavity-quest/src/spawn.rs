//! Level-start materialisation of authored spawns into live entities.
//!
//! Filtering runs once per level start and is never re-evaluated.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::enemy::{ENEMY_SIZE, EnemyState};
use crate::geometry::Rect;
use crate::level::{LevelDescriptor, Point, World};
use crate::physics::PLAYER_START_X;

/// Footprint used when deciding whether a health pickup spawn is blocked.
const PICKUP_PROBE_SIZE: f32 = 24.0;
/// Drawn size of a live health pickup.
pub const PICKUP_SIZE: f32 = 48.0;
/// Drawn size of a tooth collectible.
pub const TOOTH_SIZE: f32 = 32.0;
/// Spawns within this horizontal distance of either door edge are dropped.
const DOOR_CLEARANCE: f32 = 100.0;
/// A pickup whose centre is closer than this to a tooth's centre is dropped.
const TOOTH_CLEARANCE: f32 = 48.0;
/// Enemies never spawn closer than this to the player's start x.
const PLAYER_CLEARANCE: f32 = 200.0;
/// Extra horizontal clearance kept between an enemy spawn and an obstacle's half-width.
const OBSTACLE_CLEARANCE: f32 = 30.0;
/// Vertical distance within which a spawn belongs to a platform.
const PLATFORM_SNAP: f32 = 40.0;

/// A one-shot pickup or collectible. `collected` is a latch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub collected: bool,
}

impl Item {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            w: size,
            h: size,
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Live entities of a level, freshly built at level start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spawned {
    pub enemies: Vec<EnemyState>,
    pub health_pickups: Vec<Item>,
    pub teeth: Vec<Item>,
}

/// Build the live entity lists for a level.
pub fn spawn_level(descriptor: &LevelDescriptor, world: &World) -> Spawned {
    let health_pickups = descriptor
        .health_pickups
        .iter()
        .filter(|p| pickup_allowed(p, descriptor, world))
        .map(|p| Item::new(p.x, p.y, PICKUP_SIZE))
        .collect();

    let enemies = descriptor
        .enemy_spawns
        .iter()
        .filter(|p| enemy_allowed(p, world))
        .map(|p| place_enemy(p, world))
        .collect();

    let teeth = descriptor
        .teeth
        .iter()
        .map(|p| Item::new(p.x, p.y, TOOTH_SIZE))
        .collect();

    Spawned {
        enemies,
        health_pickups,
        teeth,
    }
}

fn near_door(x: f32, door: &Rect) -> bool {
    x > door.x - DOOR_CLEARANCE && x < door.right() + DOOR_CLEARANCE
}

fn pickup_allowed(spawn: &Point, descriptor: &LevelDescriptor, world: &World) -> bool {
    if near_door(spawn.x, &world.door) {
        trace!(x = spawn.x, y = spawn.y, "Pickup spawn dropped: near door");
        return false;
    }

    let probe = Rect::new(spawn.x, spawn.y, PICKUP_PROBE_SIZE, PICKUP_PROBE_SIZE);
    let blocked = world
        .platforms
        .iter()
        .chain(&world.ground_obstacles)
        .any(|r| probe.overlaps(r));
    if blocked {
        trace!(x = spawn.x, y = spawn.y, "Pickup spawn dropped: inside geometry");
        return false;
    }

    let probe_cx = spawn.x + PICKUP_PROBE_SIZE / 2.0;
    let probe_cy = spawn.y + PICKUP_PROBE_SIZE / 2.0;
    let near_tooth = descriptor.teeth.iter().any(|t| {
        let dx = probe_cx - (t.x + TOOTH_SIZE / 2.0);
        let dy = probe_cy - (t.y + TOOTH_SIZE / 2.0);
        dx.hypot(dy) < TOOTH_CLEARANCE
    });
    if near_tooth {
        trace!(x = spawn.x, y = spawn.y, "Pickup spawn dropped: near tooth");
        return false;
    }
    true
}

fn enemy_allowed(spawn: &Point, world: &World) -> bool {
    if (spawn.x - PLAYER_START_X).abs() < PLAYER_CLEARANCE {
        trace!(x = spawn.x, "Enemy spawn dropped: near player start");
        return false;
    }
    if near_door(spawn.x, &world.door) {
        trace!(x = spawn.x, "Enemy spawn dropped: near door");
        return false;
    }
    let near_obstacle = world
        .ground_obstacles
        .iter()
        .any(|ob| (spawn.x - ob.center_x()).abs() < ob.w / 2.0 + OBSTACLE_CLEARANCE);
    if near_obstacle {
        trace!(x = spawn.x, "Enemy spawn dropped: near obstacle");
        return false;
    }
    true
}

/// Stand a surviving spawn on its platform, or on the terrain below it.
fn place_enemy(spawn: &Point, world: &World) -> EnemyState {
    let platform = world.platforms.iter().position(|p| {
        spawn.x >= p.x && spawn.x <= p.right() && (spawn.y - p.y).abs() < PLATFORM_SNAP
    });
    let support_y = match platform {
        Some(i) => world.platforms[i].y,
        None => world.terrain.height_at(spawn.x),
    };
    EnemyState::new(spawn.x, support_y - ENEMY_SIZE, platform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelSet;

    fn spawn_builtin(level: u32) -> Spawned {
        let set = LevelSet::builtin().unwrap();
        let desc = set.descriptor(level);
        spawn_level(desc, &World::from_descriptor(desc))
    }

    fn flat_descriptor() -> LevelDescriptor {
        LevelDescriptor::from_toml(1, "ground = [ { x1 = 0.0, x2 = 2400.0, y = 400.0 } ]").unwrap()
    }

    #[test]
    fn level_one_materialises_filtered_spawns() {
        let spawned = spawn_builtin(1);
        let xs: Vec<f32> = spawned.enemies.iter().map(|e| e.x).collect();
        assert_eq!(xs, vec![1600.0, 2200.0], "x=1200 sits beside an obstacle");
        assert!(spawned.enemies.iter().all(|e| e.y == 360.0 && e.platform.is_none()));

        assert_eq!(spawned.health_pickups, vec![Item::new(2038.0, 216.0, PICKUP_SIZE)]);
        assert_eq!(spawned.teeth.len(), 2);
        assert!(spawned.teeth.iter().all(|t| t.w == TOOTH_SIZE && !t.collected));
    }

    #[test]
    fn level_two_drops_enemies_beside_obstacles() {
        let spawned = spawn_builtin(2);
        let xs: Vec<f32> = spawned.enemies.iter().map(|e| e.x).collect();
        assert_eq!(xs, vec![600.0, 1000.0, 2000.0, 1600.0]);
        assert_eq!(spawned.health_pickups.len(), 1);
    }

    #[test]
    fn pickup_near_door_is_dropped() {
        let mut desc = flat_descriptor();
        desc.health_pickups = vec![Point { x: 2250.0, y: 200.0 }, Point { x: 2000.0, y: 200.0 }];
        let spawned = spawn_level(&desc, &World::from_descriptor(&desc));
        assert_eq!(spawned.health_pickups.len(), 1);
        assert_eq!(spawned.health_pickups[0].x, 2000.0);
    }

    #[test]
    fn pickup_inside_platform_is_dropped() {
        let mut desc = flat_descriptor();
        desc.platforms = vec![Rect::new(500.0, 200.0, 100.0, 16.0)];
        desc.health_pickups = vec![Point { x: 520.0, y: 190.0 }, Point { x: 520.0, y: 170.0 }];
        let spawned = spawn_level(&desc, &World::from_descriptor(&desc));
        // 170 + 24 = 194 stays clear of the platform top
        assert_eq!(spawned.health_pickups.len(), 1);
        assert_eq!(spawned.health_pickups[0].y, 170.0);
    }

    #[test]
    fn pickup_near_tooth_is_dropped() {
        let mut desc = flat_descriptor();
        desc.teeth = vec![Point { x: 1000.0, y: 100.0 }];
        desc.health_pickups = vec![Point { x: 1020.0, y: 110.0 }, Point { x: 1100.0, y: 110.0 }];
        let spawned = spawn_level(&desc, &World::from_descriptor(&desc));
        assert_eq!(spawned.health_pickups.len(), 1);
        assert_eq!(spawned.health_pickups[0].x, 1100.0);
        assert_eq!(spawned.teeth.len(), 1, "Teeth always materialise");
    }

    #[test]
    fn enemy_near_start_or_door_is_dropped() {
        let mut desc = flat_descriptor();
        desc.enemy_spawns = vec![
            Point { x: 250.0, y: 360.0 },
            Point { x: 2300.0, y: 360.0 },
            Point { x: 800.0, y: 360.0 },
        ];
        let spawned = spawn_level(&desc, &World::from_descriptor(&desc));
        assert_eq!(spawned.enemies.len(), 1);
        assert_eq!(spawned.enemies[0].x, 800.0);
    }

    #[test]
    fn enemy_binds_to_nearby_platform() {
        let mut desc = flat_descriptor();
        desc.platforms = vec![
            Rect::new(400.0, 300.0, 100.0, 16.0),
            Rect::new(800.0, 200.0, 150.0, 16.0),
        ];
        desc.enemy_spawns = vec![Point { x: 820.0, y: 170.0 }, Point { x: 820.0, y: 100.0 }];
        let spawned = spawn_level(&desc, &World::from_descriptor(&desc));
        assert_eq!(spawned.enemies[0].platform, Some(1));
        assert_eq!(spawned.enemies[0].y, 160.0);
        assert_eq!(spawned.enemies[1].platform, None, "Too far above the platform");
        assert_eq!(spawned.enemies[1].y, 360.0);
    }

    #[test]
    fn enemy_stands_on_raised_terrain() {
        let src = r#"
            ground = [
                { x1 = 0.0, x2 = 1000.0, y = 400.0 },
                { x1 = 1000.0, x2 = 2400.0, y = 300.0 },
            ]
            enemy_spawns = [ { x = 1500.0, y = 0.0 } ]
        "#;
        let desc = LevelDescriptor::from_toml(1, src).unwrap();
        let spawned = spawn_level(&desc, &World::from_descriptor(&desc));
        assert_eq!(spawned.enemies[0].y, 260.0);
    }
}
