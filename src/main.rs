//! Math Racers entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::Document;

    use math_racers::audio::AudioManager;
    use math_racers::consts::*;
    use math_racers::game::{GameState, Screen, TickInput, tick};
    use math_racers::settings::Settings;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        audio: AudioManager,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed),
                input: TickInput::default(),
                audio,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, &mut self.audio);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // All inputs are one-shot; clear after processing
                self.input = TickInput::default();
            }
        }

        /// Reflect the game state into the DOM
        fn update_dom(&self, document: &Document) {
            let screen = self.state.screen;
            set_hidden(document, "welcome-screen", screen != Screen::Welcome);
            set_hidden(document, "playing-screen", screen != Screen::Playing);
            set_hidden(document, "game-over-screen", screen != Screen::GameOver);

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                let hearts = if self.state.lives > 0 {
                    "\u{2764}".repeat(self.state.lives as usize)
                } else {
                    "(0)".to_string()
                };
                el.set_text_content(Some(&hearts));
            }

            if let Some(el) = document.get_element_by_id("question") {
                let text = self
                    .state
                    .question
                    .as_ref()
                    .map(|q| format!("{} = ?", q.text))
                    .unwrap_or_default();
                el.set_text_content(Some(&text));
            }

            // Lane buttons: option labels plus result highlighting
            for lane in 0..LANE_COUNT {
                let Some(el) = document.get_element_by_id(&format!("lane-{lane}")) else {
                    continue;
                };
                if let Some(q) = &self.state.question {
                    el.set_text_content(Some(&q.options[lane].to_string()));
                }

                let mut class = String::from("lane-btn");
                if self.state.is_animating() {
                    class.push_str(" disabled");
                }
                if let Some(status) = self.state.last_answer {
                    if status.lane == lane {
                        if status.correct {
                            class.push_str(" correct");
                        } else {
                            class.push_str(" incorrect");
                            if !self.settings.reduced_motion {
                                class.push_str(" shake");
                            }
                        }
                    }
                }
                let _ = el.set_attribute("class", &class);
            }

            // Car slides to its lane via a CSS transition on `left`
            if let Some(el) = document.get_element_by_id("car") {
                let left = self.state.car_lane as f32 * 100.0 / LANE_COUNT as f32;
                let _ = el.set_attribute("style", &format!("left: {left:.3}%"));
            }
        }
    }

    /// Toggle an element's `hidden` class
    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Math Racers starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        setup_buttons(&document, game.clone());
        setup_blur_mute(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Math Racers running!");
    }

    /// Attach a click listener that mutates the game
    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        action: impl Fn(&mut Game) + 'static,
    ) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                // Browsers only allow audio after a user gesture
                g.audio.resume();
                action(&mut g);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing element #{id}");
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "start-btn", game.clone(), |g| {
            g.input.start = true;
        });
        on_click(document, "restart-btn", game.clone(), |g| {
            g.input.restart_round = true;
        });
        on_click(document, "exit-btn", game.clone(), |g| {
            g.input.exit_to_welcome = true;
        });
        on_click(document, "play-again-btn", game.clone(), |g| {
            g.input.play_again = true;
        });
        on_click(document, "quit-btn", game.clone(), |g| {
            g.input.exit_to_welcome = true;
        });

        for lane in 0..LANE_COUNT {
            on_click(document, &format!("lane-{lane}"), game.clone(), move |g| {
                g.input.select_lane = Some(lane);
            });
        }
    }

    /// Mute while the window is unfocused (if the preference is on)
    fn setup_blur_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);

            let document = web_sys::window().unwrap().document().unwrap();
            g.update_dom(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Math Racers (native) starting...");
    log::info!("The game UI is web-only - run with `trunk serve` for the playable version");

    println!("\nRunning generator self-check...");
    generator_self_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn generator_self_check() {
    use math_racers::game::Question;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
    for _ in 0..1000 {
        let q = Question::generate(&mut rng);
        assert_eq!(
            q.options.iter().filter(|&&o| o == q.answer).count(),
            1,
            "bad question: {q:?}"
        );
        assert!(q.options.iter().all(|&o| o >= 0), "bad question: {q:?}");
    }
    println!("\u{2713} Generator self-check passed!");
}
