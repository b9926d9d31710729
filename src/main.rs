//! Parkour entry point
//!
//! Loads settings, sets up the terminal and runs the menu and game loops.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use rand::Rng;

use parkour::audio::AudioManager;
use parkour::highscores::InMemoryHighScores;
use parkour::platform::{FrameClock, KeyboardState, TerminalSession};
use parkour::renderer::{Renderer, TerminalRenderer, scene};
use parkour::sim::{GameState, tick};
use parkour::ui::{Menu, MenuItem};
use parkour::{Config, ConfigError, FileHighScoreStore, HighScoreStore, Settings};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// What the main loop is showing
enum Screen {
    Menu(Menu),
    Playing,
}

/// Everything the frontend owns for one session
struct Game {
    config: Config,
    settings: Settings,
    settings_path: PathBuf,
    /// Built once so the high score is read once per session
    state: GameState,
    session: TerminalSession,
    keyboard: KeyboardState,
    renderer: TerminalRenderer,
    clock: FrameClock,
    audio: AudioManager,
}

impl Game {
    fn new(config: Config, settings: Settings, settings_path: PathBuf) -> Result<Self, AppError> {
        let state = GameState::new(&config, pick_seed(&config), open_store(&config));
        let session = TerminalSession::enter()?;
        let keyboard = KeyboardState::new(session.reports_release(), config.key_hold_frames);
        let renderer = TerminalRenderer::new(config.screen.size())?;
        let clock = FrameClock::new(config.physics.timestep, config.frame_rate);
        let audio = AudioManager::new(config.sound);
        Ok(Self {
            config,
            settings,
            settings_path,
            state,
            session,
            keyboard,
            renderer,
            clock,
            audio,
        })
    }

    /// Flip sound on or off and remember the choice in the settings file
    fn toggle_sound(&mut self) {
        self.audio.set_muted(!self.audio.is_muted());
        self.settings.sound = !self.audio.is_muted();
        log::info!("Sound {}", if self.settings.sound { "on" } else { "off" });
        if let Err(e) = self.settings.save(&self.settings_path) {
            log::warn!("Sound setting not saved: {e}");
        }
    }

    fn run(&mut self) -> Result<(), AppError> {
        let mut screen = Screen::Menu(Menu::new());

        loop {
            self.session.poll_input(&mut self.keyboard)?;
            let input = self.keyboard.frame();
            if input.pressed.mute {
                self.toggle_sound();
            }

            screen = match screen {
                Screen::Menu(mut menu) => {
                    if input.pressed.escape {
                        return Ok(());
                    }
                    menu.handle_input(&input.pressed);
                    match menu.handle_return(&input.pressed) {
                        Some(MenuItem::Exit) => return Ok(()),
                        Some(MenuItem::Start) => {
                            self.clock.reset();
                            self.state.start_run(pick_seed(&self.config));
                            Screen::Playing
                        }
                        None => {
                            scene::draw_menu(&mut self.renderer, &menu, self.config.screen.size());
                            self.renderer.present()?;
                            Screen::Menu(menu)
                        }
                    }
                }
                Screen::Playing => {
                    let state = &mut self.state;
                    if input.pressed.escape {
                        log::info!("Run abandoned at score {}", state.score());
                        Screen::Menu(Menu::new())
                    } else {
                        // Restart needs a fresh press so a held jump doesn't skip the screen
                        let tick_input = if state.is_game_over() {
                            input.pressed.tick_input()
                        } else {
                            input.held.tick_input()
                        };
                        for _ in 0..self.clock.tick() {
                            tick(state, &tick_input);
                        }

                        let events = state.drain_events();
                        for event in &events {
                            log::debug!("{event:?}");
                        }
                        self.audio.play_events(&events, self.renderer.output())?;

                        if state.is_game_over() {
                            scene::draw_game_over(&mut self.renderer, state);
                        } else {
                            scene::draw_game(&mut self.renderer, state);
                        }
                        self.renderer.present()?;
                        Screen::Playing
                    }
                }
            };

            self.clock.wait_for_next_frame();
        }
    }
}

/// The configured seed, or a fresh one from entropy
fn pick_seed(config: &Config) -> u64 {
    config.seed.unwrap_or_else(|| rand::rng().random())
}

/// The file store, or an in-memory one when the file can't be used
fn open_store(config: &Config) -> Box<dyn HighScoreStore> {
    match FileHighScoreStore::open(&config.high_score_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("High scores won't be saved: {e}");
            Box::new(InMemoryHighScores::default())
        }
    }
}

fn run() -> Result<(), AppError> {
    let path = Settings::default_path();
    let settings = Settings::load(&path)?;
    log::info!("Settings loaded from {}", path.display());

    let config = Config::from_settings(&settings);
    config.validate()?;

    let mut game = Game::new(config, settings, path)?;
    game.run()
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Parkour starting...");

    // The terminal session is dropped inside run(), so errors print to a
    // restored screen
    match run() {
        Ok(()) => {
            log::info!("Parkour exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("parkour: {e}");
            ExitCode::FAILURE
        }
    }
}
