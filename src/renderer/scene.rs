//! Frame composition
//!
//! Turns game state into draw calls. Positions are world pixels; the HUD and
//! menu layouts are fractions of the screen so they follow the configured
//! resolution.

use glam::Vec2;

use super::{Renderer, Sprite, TextStyle};
use crate::sim::GameState;
use crate::ui::Menu;

/// Draw one frame of the running game
pub fn draw_game(renderer: &mut impl Renderer, state: &GameState) {
    let screen = state.config.screen.size();
    renderer.clear();

    let background = state.world.scroll.background();
    for (layer, y) in background.layers().into_iter().enumerate() {
        renderer.draw_sprite(
            Sprite::Background(layer as u8),
            Vec2::new(0.0, y),
            Vec2::new(screen.x, background.height()),
        );
    }

    let sprite = Sprite::Platform(state.biome);
    for platform in state.world.platforms.iter() {
        let center = state.space.position(platform.body);
        let half = Vec2::new(platform.half_width, platform.thickness);
        if center.y + half.y < 0.0 || center.y - half.y > screen.y {
            continue;
        }
        renderer.draw_sprite(sprite, center - half, half * 2.0);
    }

    let character = &state.world.character;
    let size = character.size();
    let sprite = if state.on_ground() {
        Sprite::Character
    } else {
        Sprite::CharacterJump
    };
    renderer.draw_sprite(sprite, character.position(&state.space) - size / 2.0, size);

    draw_walls(renderer, state, screen);
    draw_hud(renderer, state, screen);
}

fn draw_walls(renderer: &mut impl Renderer, state: &GameState, screen: Vec2) {
    let t = state.walls.thickness;
    let size = Vec2::new(2.0 * t, screen.y);
    renderer.draw_sprite(Sprite::Wall, Vec2::new(-t, 0.0), size);
    renderer.draw_sprite(Sprite::Wall, Vec2::new(screen.x - t, 0.0), size);
}

fn draw_hud(renderer: &mut impl Renderer, state: &GameState, screen: Vec2) {
    let x = screen.x * 0.01;
    renderer.draw_text(
        &format!("Time: {:.2}s", state.auto_scroll_seconds),
        Vec2::new(x, screen.y * 0.02),
        TextStyle::Normal,
    );
    renderer.draw_text(
        &format!("Score: {}", state.score()),
        Vec2::new(x, screen.y * 0.07),
        TextStyle::Normal,
    );
    renderer.draw_text(
        &format!("High score: {}", state.high_score()),
        Vec2::new(x, screen.y * 0.12),
        TextStyle::Dim,
    );
    renderer.draw_text(
        state.biome.as_str(),
        Vec2::new(screen.x * 0.85, screen.y * 0.02),
        TextStyle::Dim,
    );
}

/// Draw the game over screen with the final score
pub fn draw_game_over(renderer: &mut impl Renderer, state: &GameState) {
    let screen = state.config.screen.size();
    renderer.clear();
    renderer.draw_sprite(Sprite::MenuBackground, Vec2::ZERO, screen);

    let size = state.world.character.size() * 2.0;
    renderer.draw_sprite(
        Sprite::CharacterGameOver,
        Vec2::new(screen.x * 0.36, screen.y * 0.2),
        size,
    );

    renderer.draw_text(
        &format!("Game over! Score: {}", state.score()),
        Vec2::new(screen.x * 0.25, screen.y * 0.5),
        TextStyle::Title,
    );
    let best = if state.score() >= state.high_score() && state.score() > 0 {
        format!("New high score: {}", state.high_score())
    } else {
        format!("High score: {}", state.high_score())
    };
    renderer.draw_text(&best, Vec2::new(screen.x * 0.25, screen.y * 0.55), TextStyle::Highlight);
    renderer.draw_text(
        "Press SPACE to restart, ESC for menu",
        Vec2::new(screen.x * 0.25, screen.y * 0.62),
        TextStyle::Dim,
    );
}

/// Draw the main menu
pub fn draw_menu(renderer: &mut impl Renderer, menu: &Menu, screen: Vec2) {
    renderer.clear();
    renderer.draw_sprite(Sprite::MenuBackground, Vec2::ZERO, screen);
    renderer.draw_text(
        "P A R K O U R",
        Vec2::new(screen.x * 0.12, screen.y * 0.3),
        TextStyle::Title,
    );

    for (i, item) in menu.items().iter().enumerate() {
        let selected = i == menu.selected_index();
        let (text, style) = if selected {
            (format!("> {}", item.label()), TextStyle::Highlight)
        } else {
            (format!("  {}", item.label()), TextStyle::Normal)
        };
        renderer.draw_text(
            &text,
            Vec2::new(screen.x * 0.2, screen.y * 0.5 + i as f32 * 50.0),
            style,
        );
    }

    renderer.draw_text(
        "arrows/WASD move, SPACE jump, ENTER select, M sound",
        Vec2::new(screen.x * 0.12, screen.y * 0.8),
        TextStyle::Dim,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::highscores::InMemoryHighScores;
    use crate::sim::{Biome, GameState};
    use std::io;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Sprite(Sprite, Vec2, Vec2),
        Text(String, Vec2, TextStyle),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
    }

    impl RecordingRenderer {
        fn sprites(&self, wanted: impl Fn(Sprite) -> bool) -> Vec<(Vec2, Vec2)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Sprite(s, pos, size) if wanted(*s) => Some((*pos, *size)),
                    _ => None,
                })
                .collect()
        }

        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(t, _, _) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn draw_sprite(&mut self, sprite: Sprite, top_left: Vec2, size: Vec2) {
            self.calls.push(Call::Sprite(sprite, top_left, size));
        }

        fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
            self.calls.push(Call::Text(text.to_string(), pos, style));
        }

        fn present(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn new_state() -> GameState {
        GameState::new(&Config::default(), 11, Box::new(InMemoryHighScores::with_best(70)))
    }

    #[test]
    fn test_game_frame_layers() {
        let state = new_state();
        let mut r = RecordingRenderer::default();
        draw_game(&mut r, &state);

        assert_eq!(r.calls.first(), Some(&Call::Clear));
        let backgrounds = r.sprites(|s| matches!(s, Sprite::Background(_)));
        assert_eq!(backgrounds.len(), 2);
        assert!(backgrounds.iter().all(|(_, size)| *size == Vec2::new(1280.0, 800.0)));

        let walls = r.sprites(|s| s == Sprite::Wall);
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].0, Vec2::new(-128.0, 0.0));
        assert_eq!(walls[1].0, Vec2::new(1280.0 - 128.0, 0.0));
    }

    #[test]
    fn test_platforms_scaled_to_collision_size() {
        let state = new_state();
        let mut r = RecordingRenderer::default();
        draw_game(&mut r, &state);

        let drawn = r.sprites(|s| s == Sprite::Platform(Biome::Earth));
        assert!(!drawn.is_empty());
        let visible = state
            .world
            .platforms
            .iter()
            .filter(|p| {
                let y = state.space.position(p.body).y;
                (-p.thickness..=800.0 + p.thickness).contains(&y)
            })
            .count();
        assert_eq!(drawn.len(), visible);

        let first = state.world.platforms.get(0).expect("platform 0");
        let center = state.space.position(first.body);
        let expected_size = Vec2::new(first.width(), 2.0 * first.thickness);
        assert!(drawn.contains(&(center - expected_size / 2.0, expected_size)));
    }

    #[test]
    fn test_character_sprite_follows_ground_state() {
        let mut state = new_state();
        let mut r = RecordingRenderer::default();
        draw_game(&mut r, &state);
        assert_eq!(r.sprites(|s| s == Sprite::Character).len(), 1);

        let velocity = glam::Vec2::new(0.0, -300.0);
        state.world.contacts.check_in_air(velocity);
        let mut r = RecordingRenderer::default();
        draw_game(&mut r, &state);
        assert_eq!(r.sprites(|s| s == Sprite::CharacterJump).len(), 1);
        assert!(r.sprites(|s| s == Sprite::Character).is_empty());
    }

    #[test]
    fn test_hud_text() {
        let mut state = new_state();
        state.auto_scroll_seconds = 3.14159;
        let mut r = RecordingRenderer::default();
        draw_game(&mut r, &state);
        let texts = r.texts();
        assert!(texts.contains(&"Time: 3.14s"));
        assert!(texts.contains(&"Score: 0"));
        assert!(texts.contains(&"High score: 70"));
        assert!(texts.contains(&"Earth"));
    }

    #[test]
    fn test_game_over_screen() {
        let state = new_state();
        let mut r = RecordingRenderer::default();
        draw_game_over(&mut r, &state);
        assert_eq!(r.sprites(|s| s == Sprite::CharacterGameOver).len(), 1);
        let texts = r.texts();
        assert!(texts.contains(&"Game over! Score: 0"));
        assert!(texts.contains(&"High score: 70"));
    }

    #[test]
    fn test_menu_highlights_selection() {
        let menu = Menu::new();
        let mut r = RecordingRenderer::default();
        draw_menu(&mut r, &menu, Vec2::new(1280.0, 800.0));
        let highlighted: Vec<_> = r
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(t, pos, TextStyle::Highlight) => Some((t.clone(), *pos)),
                _ => None,
            })
            .collect();
        assert_eq!(highlighted, [("> start".to_string(), Vec2::new(256.0, 400.0))]);
        assert!(r.texts().contains(&"  exit"));
    }
}
