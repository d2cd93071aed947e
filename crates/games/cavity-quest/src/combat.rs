//! Player contact resolution: stomps, damage, pickups and collectibles.

use tracing::debug;

use crate::enemy::EnemyState;
use crate::geometry::{HitboxKind, Rect, hitbox_overlaps};
use crate::physics::{JUMP_VELOCITY, MAX_HEALTH, PlayerState};
use crate::spawn::Item;

/// Fraction of the jump impulse given back on a stomp.
pub const STOMP_BOUNCE: f32 = 0.7;
/// How far below an enemy's top the player's previous bottom may be and still stomp.
pub const STOMP_TOLERANCE: f32 = 5.0;
/// Score awarded per stomp.
pub const STOMP_SCORE: u32 = 20;
/// Frames of invincibility (and hit flash) after taking damage.
pub const INVINCIBILITY_FRAMES: u32 = 40;
/// Horizontal knockback on damage.
pub const DAMAGE_PUSHBACK: f32 = 40.0;

/// What a single player/enemy contact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Stomped { enemy: usize },
    Damaged { health: u8 },
}

/// Resolve the player against every active enemy, in list order.
///
/// Stomps are judged on the frame's descent velocity, so a jump pressed on the
/// landing frame still stomps. Damage knockback stops flush against `obstacles`.
/// Stops early once health reaches zero so nothing else lands on a dead player.
pub fn resolve_enemy_contacts(
    player: &mut PlayerState,
    enemies: &mut [EnemyState],
    obstacles: &[Rect],
    score: &mut u32,
) -> Vec<ContactOutcome> {
    let mut outcomes = Vec::new();
    for (index, enemy) in enemies.iter_mut().enumerate() {
        if !enemy.is_active() {
            continue;
        }
        if !hitbox_overlaps(&player.rect(), HitboxKind::Player, &enemy.rect(), HitboxKind::Enemy) {
            continue;
        }

        if player.fall_vy > 0.0 && player.prev_bottom <= enemy.y + STOMP_TOLERANCE {
            enemy.start_flatten();
            player.vy = JUMP_VELOCITY * STOMP_BOUNCE;
            *score += STOMP_SCORE;
            debug!(enemy = index, score = *score, "Enemy stomped");
            outcomes.push(ContactOutcome::Stomped { enemy: index });
        } else if !player.is_invincible() {
            player.health = player.health.saturating_sub(1);
            player.invincible = INVINCIBILITY_FRAMES;
            player.flash = INVINCIBILITY_FRAMES;
            let away = if player.x < enemy.x { -1.0 } else { 1.0 };
            push_player(player, away * DAMAGE_PUSHBACK, obstacles);
            debug!(enemy = index, health = player.health, "Player damaged");
            outcomes.push(ContactOutcome::Damaged { health: player.health });
            if player.health == 0 {
                break;
            }
        }
    }
    outcomes
}

/// Knock the player `dx` sideways, stopping at the first obstacle side in the way.
fn push_player(player: &mut PlayerState, dx: f32, obstacles: &[Rect]) {
    let mut x = player.x + dx;
    let beside = obstacles
        .iter()
        .filter(|ob| player.bottom() > ob.y && player.y < ob.bottom());
    for ob in beside {
        if dx < 0.0 && ob.right() <= player.x {
            x = x.max(ob.right());
        } else if dx > 0.0 && ob.x >= player.x + player.w {
            x = x.min(ob.x - player.w);
        }
    }
    player.x = x;
    player.clamp_to_map();
}

/// Count both damage timers down by one frame.
pub fn tick_timers(player: &mut PlayerState) {
    player.invincible = player.invincible.saturating_sub(1);
    player.flash = player.flash.saturating_sub(1);
}

/// Latch every health pickup the player touches. Returns how many were collected.
pub fn collect_health(player: &mut PlayerState, pickups: &mut [Item]) -> usize {
    let mut collected = 0;
    for pickup in pickups.iter_mut().filter(|p| !p.collected) {
        if hitbox_overlaps(
            &player.rect(),
            HitboxKind::Player,
            &pickup.rect(),
            HitboxKind::HealthPickup,
        ) {
            pickup.collected = true;
            player.health = (player.health + 1).min(MAX_HEALTH);
            debug!(health = player.health, "Health restored");
            collected += 1;
        }
    }
    collected
}

/// Latch every tooth the player touches, adding to the run's tally.
pub fn collect_teeth(player: &PlayerState, teeth: &mut [Item], tally: &mut u32) -> usize {
    let mut collected = 0;
    for tooth in teeth.iter_mut().filter(|t| !t.collected) {
        if hitbox_overlaps(&player.rect(), HitboxKind::Player, &tooth.rect(), HitboxKind::Tooth) {
            tooth.collected = true;
            *tally += 1;
            debug!(tally = *tally, "Tooth collected");
            collected += 1;
        }
    }
    collected
}
