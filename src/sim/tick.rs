//! Fixed timestep simulation tick
//!
//! One call advances one frame: input, physics, scroll, recycling, biome,
//! then score and game over.

use super::progression::Biome;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump while playing, restart while game over
    pub jump: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        if state.world.progression.restart(input.jump) {
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::Restarted);
        }
        return;
    }

    state.time_ticks += 1;
    let dt = state.config.physics.timestep;
    let now = state.time_ticks;
    let progression_cfg = state.config.progression;
    let mut events = Vec::new();

    let GameState {
        space,
        world,
        handlers,
        ..
    } = &mut *state;

    // Input
    let character = world.character.body;
    world.character.apply_movement(space, input.left, input.right);
    world.contacts.check_in_air(space.velocity(character));
    if input.jump && world.contacts.on_ground() {
        world.character.jump(space);
    }
    world.character.limit_velocity(space);

    // Physics (contact handlers run inside)
    space.step(dt, handlers, world);

    // Scroll
    world.scroll.move_camera(space, character, &world.platforms);
    let was_scrolling = world.scroll.is_auto_scrolling();
    let elapsed = world
        .scroll
        .update_auto_scroll(space, world.contacts.counter(), now, dt);
    if !was_scrolling && elapsed.is_some() {
        events.push(GameEvent::AutoScrollStarted);
    }

    // Recycle and biome
    world.platforms.recycle_all(space);
    if world.platforms.wrap_counter(
        progression_cfg.biome_ceiling(),
        progression_cfg.biome_wrap_reset,
    ) {
        log::debug!("Biome cycle complete");
    }
    let biome = world.progression.biome(world.platforms.platform_counter());

    // Progression
    world.progression.get_score(world.contacts.counter());
    let fell = world
        .progression
        .check_game_status(space.position(character).y);

    state.auto_scroll_seconds = elapsed.unwrap_or(0.0);
    if biome != state.biome {
        state.biome = biome;
        events.push(GameEvent::BiomeChanged(biome));
    }
    for event in events {
        state.push_event(event);
    }
    if fell {
        enter_game_over(state);
    }
}

fn enter_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let score = state.world.progression.score();
    state.push_event(GameEvent::GameOver { score });
    if state.world.progression.record_high_score() {
        state.push_event(GameEvent::NewHighScore { score });
    }
    state.reset_world();
    state.biome = Biome::default();
}
