pub mod combat;
pub mod config;
pub mod effects;
pub mod enemy;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod run_state;
pub mod spawn;
pub mod terrain;

use serde::{Deserialize, Serialize};
use tracing::info;

use cavity_core::game_trait::{FrameGame, GameMetadata};
use cavity_core::input::InputState;

use combat::{
    ContactOutcome, collect_health, collect_teeth, resolve_enemy_contacts, tick_timers,
};
use config::CavityQuestConfig;
use effects::{CandyBean, CandyRain};
use enemy::{EnemyState, advance_flatten, tick_enemy, update_enemy_animation};
use level::{FINAL_LEVEL, LevelError, LevelSet, World};
use physics::{MAP_WIDTH, PlayerState, tick_player, update_player_animation};
use run_state::{DoorOutcome, EndingOutcome, RunPhase, RunState};
use spawn::{Item, Spawned, spawn_level};

/// Discrete things that happened during a frame, for sounds and toasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    EnemyStomped { enemy: usize },
    PlayerDamaged { health: u8 },
    HealthRestored { health: u8 },
    ToothCollected { total: u32 },
    GameOver,
    EndingReached { outcome: EndingOutcome },
}

/// Everything the renderer draws for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub level: u32,
    pub score: u32,
    pub health: u8,
    pub teeth_collected: u32,
    pub phase: RunPhase,
    pub camera_x: f32,
    pub player: PlayerState,
    pub enemies: Vec<EnemyState>,
    pub health_pickups: Vec<Item>,
    pub teeth: Vec<Item>,
    pub beans: Vec<CandyBean>,
}

/// The CavityQuest simulation: four levels, one player, fixed frame order.
pub struct CavityQuest {
    levels: LevelSet,
    config: CavityQuestConfig,
    world: World,
    player: PlayerState,
    enemies: Vec<EnemyState>,
    health_pickups: Vec<Item>,
    teeth: Vec<Item>,
    run: RunState,
    camera_x: f32,
    rain: CandyRain,
    frame: u64,
}

impl CavityQuest {
    /// A game over the given levels, already at the start of a run.
    pub fn new(levels: LevelSet, config: CavityQuestConfig) -> Self {
        let world = World::from_descriptor(levels.descriptor(1));
        let rain = CandyRain::new(config.rain_seed);
        let mut game = Self {
            levels,
            config,
            world,
            player: PlayerState::new(),
            enemies: Vec::new(),
            health_pickups: Vec::new(),
            teeth: Vec::new(),
            run: RunState::new(),
            camera_x: 0.0,
            rain,
            frame: 0,
        };
        game.start_run();
        game
    }

    /// A game over the shipped levels.
    pub fn with_builtin_levels(config: CavityQuestConfig) -> Result<Self, LevelError> {
        Ok(Self::new(LevelSet::builtin()?, config))
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn enemies(&self) -> &[EnemyState] {
        &self.enemies
    }

    pub fn health_pickups(&self) -> &[Item] {
        &self.health_pickups
    }

    pub fn teeth(&self) -> &[Item] {
        &self.teeth
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    pub fn config(&self) -> &CavityQuestConfig {
        &self.config
    }

    /// Rebuild the world and live entities for the current level and put the
    /// player back at the start. Health, score and the tooth tally carry over.
    fn start_level(&mut self) {
        let descriptor = self.levels.descriptor(self.run.level);
        self.world = World::from_descriptor(descriptor);
        let Spawned {
            enemies,
            health_pickups,
            teeth,
        } = spawn_level(descriptor, &self.world);
        self.enemies = enemies;
        self.health_pickups = health_pickups;
        self.teeth = teeth;
        self.player.reset_to_start();
        self.update_camera();
        info!(
            level = self.run.level,
            enemies = self.enemies.len(),
            health_pickups = self.health_pickups.len(),
            teeth = self.teeth.len(),
            "Level started"
        );
    }

    fn update_camera(&mut self) {
        let max_x = (MAP_WIDTH - self.config.viewport_width).max(0.0);
        let centred = self.player.x + self.player.w / 2.0 - self.config.viewport_width / 2.0;
        self.camera_x = centred.clamp(0.0, max_x);
    }

    /// One frame in the fixed order: player, contacts, timers, pickups, door,
    /// enemies, animation. A terminal state ends the frame where it happens.
    fn step(&mut self, input: &InputState, events: &mut Vec<GameEvent>) {
        tick_player(&mut self.player, input, &self.world);

        let outcomes = resolve_enemy_contacts(
            &mut self.player,
            &mut self.enemies,
            &self.world.ground_obstacles,
            &mut self.run.score,
        );
        for outcome in outcomes {
            events.push(match outcome {
                ContactOutcome::Stomped { enemy } => GameEvent::EnemyStomped { enemy },
                ContactOutcome::Damaged { health } => GameEvent::PlayerDamaged { health },
            });
        }
        if self.player.health == 0 {
            self.run.game_over();
            info!(level = self.run.level, score = self.run.score, "Game over");
            events.push(GameEvent::GameOver);
            return;
        }

        for enemy in &mut self.enemies {
            advance_flatten(enemy);
        }
        tick_timers(&mut self.player);

        if collect_health(&mut self.player, &mut self.health_pickups) > 0 {
            events.push(GameEvent::HealthRestored {
                health: self.player.health,
            });
        }
        let before = self.run.teeth_collected;
        collect_teeth(&self.player, &mut self.teeth, &mut self.run.teeth_collected);
        let total = self.run.teeth_collected;
        events.extend((before + 1..=total).map(|total| GameEvent::ToothCollected { total }));

        if self.player.rect().overlaps(&self.world.door) {
            match self.run.enter_door() {
                Some(DoorOutcome::NextLevel(level)) => {
                    self.start_level();
                    events.push(GameEvent::LevelStarted { level });
                },
                Some(DoorOutcome::Ending(outcome)) => {
                    info!(
                        ?outcome,
                        teeth = self.run.teeth_collected,
                        score = self.run.score,
                        "Ending reached"
                    );
                    events.push(GameEvent::EndingReached { outcome });
                    return;
                },
                None => {},
            }
        }

        for enemy in &mut self.enemies {
            tick_enemy(enemy, &self.world);
            update_enemy_animation(enemy);
        }
        update_player_animation(&mut self.player, input);

        self.update_camera();
        if self.config.rain_enabled {
            self.rain
                .update(self.camera_x, self.config.viewport_width, self.config.viewport_height);
        }
    }
}

impl FrameGame for CavityQuest {
    type Event = GameEvent;
    type Snapshot = RenderSnapshot;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "CavityQuest".to_string(),
            description: "Stomp the cavity monsters and bring every tooth home!".to_string(),
            level_count: FINAL_LEVEL,
        }
    }

    fn start_run(&mut self) {
        self.player = PlayerState::new();
        self.run = RunState::new();
        self.rain.reset();
        self.frame = 0;
        self.start_level();
    }

    fn advance_frame(&mut self, input: &InputState) -> Vec<GameEvent> {
        if self.run.is_terminal() {
            return Vec::new();
        }
        let mut events = Vec::new();
        self.step(input, &mut events);
        self.frame += 1;
        events
    }

    fn is_finished(&self) -> bool {
        self.run.is_terminal()
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }

    fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            frame: self.frame,
            level: self.run.level,
            score: self.run.score,
            health: self.player.health,
            teeth_collected: self.run.teeth_collected,
            phase: self.run.phase,
            camera_x: self.camera_x,
            player: self.player.clone(),
            enemies: self.enemies.clone(),
            health_pickups: self.health_pickups.clone(),
            teeth: self.teeth.clone(),
            beans: self.rain.beans().to_vec(),
        }
    }
}
