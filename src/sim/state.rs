//! Game state and the contact handlers wired into the space

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::{Character, Walls};
use super::contact::ContactResolver;
use super::platforms::PlatformPool;
use super::progression::{Biome, ProgressionTracker};
use super::scroll::ScrollController;
use super::space::{CollisionHandlers, CollisionType, ContactEvent, Space};
use crate::config::Config;
use crate::highscores::HighScoreStore;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Run ended; the world is already reset and waits for a restart
    GameOver,
}

/// Something the frontend may want to react to (sound, log, UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameOver { score: i64 },
    NewHighScore { score: i64 },
    Restarted,
    AutoScrollStarted,
    BiomeChanged(Biome),
}

/// Everything the contact handlers may touch during a step
#[derive(Debug)]
pub struct World {
    pub character: Character,
    pub platforms: PlatformPool,
    pub contacts: ContactResolver,
    pub scroll: ScrollController,
    pub progression: ProgressionTracker,
}

fn character_platform_begin(world: &mut World, event: &ContactEvent) -> bool {
    world.contacts.on_character_platform_contact(event)
}

fn sensor_platform_begin(world: &mut World, event: &ContactEvent) -> bool {
    let World {
        contacts, platforms, ..
    } = world;
    contacts.on_sensor_platform_contact(event, platforms)
}

/// Handlers for the one-way platform and pass-counting rules
pub fn contact_handlers() -> CollisionHandlers<World> {
    let mut handlers = CollisionHandlers::new();
    handlers.add(
        CollisionType::Character,
        CollisionType::Platform,
        character_platform_begin,
    );
    handlers.add(
        CollisionType::CharacterSensor,
        CollisionType::Platform,
        sensor_platform_begin,
    );
    handlers
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: Config,
    pub space: Space,
    pub world: World,
    pub walls: Walls,
    pub handlers: CollisionHandlers<World>,
    pub phase: GamePhase,
    /// Simulation ticks since start-up
    pub time_ticks: u64,
    /// Seconds since auto-scroll switched on this run (0 while off)
    pub auto_scroll_seconds: f32,
    pub biome: Biome,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: &Config, seed: u64, store: Box<dyn HighScoreStore>) -> Self {
        let mut space = Space::new(config.physics.gravity, config.physics.damping);
        let walls = Walls::build(&config.walls, &mut space);
        let character = Character::spawn(config, &mut space);
        let platforms = PlatformPool::generate(config, &mut space, Pcg32::seed_from_u64(seed));

        log::info!(
            "New game: seed={seed}, {} bodies, {} shapes",
            space.body_count(),
            space.shape_count()
        );

        Self {
            seed,
            config: config.clone(),
            space,
            world: World {
                character,
                platforms,
                contacts: ContactResolver::new(&config.contacts),
                scroll: ScrollController::new(config),
                progression: ProgressionTracker::new(config, store),
            },
            walls,
            handlers: contact_handlers(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            auto_scroll_seconds: 0.0,
            biome: Biome::default(),
            events: Vec::new(),
        }
    }

    /// Put every component back to its start-of-run state
    pub fn reset_world(&mut self) {
        let world = &mut self.world;
        world.character.reset(&mut self.space);
        world.platforms.reset(&mut self.space);
        world.contacts.reset_counter();
        world.scroll.reset();
        self.space.clear_contacts();
        self.auto_scroll_seconds = 0.0;
        self.biome = Biome::default();
    }

    /// Begin a fresh run on a new layout, keeping the store and high score
    pub fn start_run(&mut self, seed: u64) {
        self.seed = seed;
        self.world.platforms.reseed(Pcg32::seed_from_u64(seed));
        self.reset_world();
        self.world.progression.new_run();
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.events.clear();
        log::info!("New run: seed={seed}");
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> i64 {
        self.world.progression.score()
    }

    pub fn high_score(&self) -> i64 {
        self.world.progression.high_score()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn on_ground(&self) -> bool {
        self.world.contacts.on_ground()
    }
}
