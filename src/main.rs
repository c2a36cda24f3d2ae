//! Fly Smasher entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use fly_smasher::audio::{AudioManager, SoundEffect};
    use fly_smasher::consts::*;
    use fly_smasher::frame;
    use fly_smasher::haptics::Haptics;
    use fly_smasher::settings::Settings;
    use fly_smasher::sim::{GamePhase, SessionState, advance};

    /// Game instance holding all state
    struct Game {
        state: SessionState,
        audio: AudioManager,
        haptics: Haptics,
        settings: Settings,
        player_name: Option<String>,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Transition detection for one-shot cues
        last_phase: GamePhase,
        last_time_left: u32,
        // Guards the simulated mint against double-submission
        minting: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            let haptics = Haptics::new(settings.haptics);

            Self {
                state: SessionState::new(seed),
                audio,
                haptics,
                settings,
                player_name: frame::display_name(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Idle,
                last_time_left: SESSION_SECS,
                minting: false,
            }
        }

        /// Begin a fresh session from the UI
        fn begin_session(&mut self) {
            self.audio.resume();
            self.state.start();
            self.audio.play(SoundEffect::Start);
            self.minting = false;
        }

        /// Advance the simulation and fire one-shot cues on transitions
        fn update(&mut self, dt: f32, time: f64) {
            advance(&mut self.state, dt.min(0.1));

            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::Finished {
                    self.audio.play(SoundEffect::TimeUp);
                }
                self.last_phase = phase;
            }
            if self.state.time_left != self.last_time_left {
                if phase == GamePhase::Playing
                    && self.state.time_left > 0
                    && self.state.time_left <= BEEP_FINAL_SECS
                {
                    self.audio.play(SoundEffect::CountdownBeep);
                }
                self.last_time_left = self.state.time_left;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current state to the DOM
        fn render(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            self.render_screens(&document);
            self.render_hud(&document);
            self.render_entities(&document);
        }

        fn render_screens(&self, document: &Document) {
            let phase = self.state.phase;
            set_visible(document, "start-screen", phase == GamePhase::Idle);
            set_visible(document, "game-screen", phase == GamePhase::Playing);
            set_visible(document, "end-screen", phase == GamePhase::Finished);

            if phase == GamePhase::Finished {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&format!(
                        "Final Score: {} points",
                        self.state.score
                    )));
                }
                if let Some(el) = document.get_element_by_id("final-summary") {
                    let name = self.player_name.as_deref().unwrap_or("there");
                    el.set_text_content(Some(&format!(
                        "Great job {}! You smashed {} flies in 60 seconds!",
                        name,
                        self.state.flies_smashed()
                    )));
                }
            }
        }

        fn render_hud(&self, document: &Document) {
            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document
                .query_selector("#hud-time .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&format!("{}s", self.state.time_left)));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document
                        .query_selector("#hud-fps .hud-value")
                        .ok()
                        .flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }

        /// Reconcile fly and splatter elements inside the play area
        fn render_entities(&self, document: &Document) {
            let Some(area) = document.get_element_by_id("game-area") else {
                return;
            };

            remove_stale(&area, "[data-fly]", "data-fly", &|id| {
                self.state.flies.iter().any(|f| f.id == id)
            });
            remove_stale(&area, "[data-splat]", "data-splat", &|id| {
                self.state.splatters.iter().any(|s| s.id == id)
            });

            for fly in &self.state.flies {
                let sel = format!("[data-fly=\"{}\"]", fly.id);
                let el = match area.query_selector(&sel).ok().flatten() {
                    Some(el) => el,
                    None => {
                        let Ok(el) = document.create_element("button") else {
                            continue;
                        };
                        let _ = el.set_attribute("class", "fly");
                        let _ = el.set_attribute("data-fly", &fly.id.to_string());
                        el.set_text_content(Some("🪰"));
                        let _ = area.append_child(&el);
                        el
                    }
                };
                let _ = el.set_attribute(
                    "style",
                    &format!(
                        "left:{:.2}%;top:{:.2}%;width:{:.0}px;height:{:.0}px;font-size:{:.0}px;",
                        fly.pos.x,
                        fly.pos.y,
                        fly.size,
                        fly.size,
                        fly.size * 0.8
                    ),
                );
            }

            for splat in &self.state.splatters {
                let sel = format!("[data-splat=\"{}\"]", splat.id);
                if area.query_selector(&sel).ok().flatten().is_none() {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    let class = if self.settings.reduced_motion {
                        "splatter still"
                    } else {
                        "splatter"
                    };
                    let _ = el.set_attribute("class", class);
                    let _ = el.set_attribute("data-splat", &splat.id.to_string());
                    el.set_text_content(Some("💥"));
                    let _ = el.set_attribute(
                        "style",
                        &format!("left:{:.2}%;top:{:.2}%;", splat.pos.x, splat.pos.y),
                    );
                    let _ = area.append_child(&el);
                }
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute(
                "class",
                if visible { "screen" } else { "screen hidden" },
            );
        }
    }

    /// Remove child elements whose tagged entity is no longer live
    fn remove_stale(area: &Element, selector: &str, attr: &str, live: &dyn Fn(u32) -> bool) {
        let Ok(nodes) = area.query_selector_all(selector) else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i) else { continue };
            let Ok(el) = node.dyn_into::<Element>() else {
                continue;
            };
            let keep = el
                .get_attribute(attr)
                .and_then(|v| v.parse::<u32>().ok())
                .is_some_and(live);
            if !keep {
                el.remove();
            }
        }
    }

    /// Restore the mint button and status to their pre-mint state
    fn reset_mint_ui(document: &Document) {
        if let Some(btn) = document.get_element_by_id("mint-btn") {
            btn.set_text_content(Some("MINT SCORE NFT"));
            let _ = btn.remove_attribute("disabled");
        }
        if let Some(status) = document.get_element_by_id("mint-status") {
            status.set_text_content(None);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fly Smasher starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Session seeded with {}", seed);

        // Greet with the frame context name right away; the auth fid is the
        // fallback once the endpoint answers. Gameplay never waits on it.
        if let Some(el) = document.get_element_by_id("greeting") {
            let name = game.borrow().player_name.clone();
            el.set_text_content(Some(&frame::greeting(name.as_deref())));
        }
        {
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match frame::fetch_auth().await {
                    Ok(auth) => {
                        log::info!(
                            "auth ok (fid {:?})",
                            auth.user.as_ref().map(|u| u.fid)
                        );
                        let name =
                            frame::greeting_name(frame::display_name().as_deref(), Some(&auth));
                        if let Some(name) = name {
                            game.borrow_mut().player_name = Some(name.clone());
                            if let Some(el) = web_sys::window()
                                .and_then(|w| w.document())
                                .and_then(|d| d.get_element_by_id("greeting"))
                            {
                                el.set_text_content(Some(&frame::greeting(Some(&name))));
                            }
                        }
                    }
                    Err(e) => log::warn!("auth fetch failed: {:?}", e),
                }
            });
        }

        setup_session_buttons(&document, game.clone());
        setup_game_area(&document, game.clone());
        setup_share_button(&document, game.clone());
        setup_mint_button(&document, game.clone());
        setup_keyboard(game.clone());
        setup_blur_mute(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Fly Smasher running!");
    }

    fn setup_session_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Start button
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().begin_session();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    reset_mint_ui(&document);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play-again returns to the idle screen, matching reset semantics
        if let Some(btn) = document.get_element_by_id("again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.reset();
                g.minting = false;
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    reset_mint_ui(&document);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_game_area(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(area) = document.get_element_by_id("game-area") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target() else { return };
            let Ok(el) = target.dyn_into::<Element>() else {
                return;
            };
            let Ok(Some(fly_el)) = el.closest("[data-fly]") else {
                return;
            };
            let Some(id) = fly_el
                .get_attribute("data-fly")
                .and_then(|v| v.parse::<u32>().ok())
            else {
                return;
            };

            let mut g = game.borrow_mut();
            if g.state.smash(id) {
                g.audio.play(SoundEffect::Smash);
                g.haptics.pulse();
            }
        });
        let _ = area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_share_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let score = game.borrow().state.score;
                frame::share_cast(&frame::share_text(score));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mint_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("mint-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let score = {
                let mut g = game.borrow_mut();
                if g.minting {
                    return;
                }
                g.minting = true;
                g.state.score
            };

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Some(btn) = document.get_element_by_id("mint-btn") {
                    btn.set_text_content(Some("MINTING..."));
                    let _ = btn.set_attribute("disabled", "");
                }
            }

            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = frame::mint(&[score]).await;
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                match result {
                    Ok(tx) => {
                        if let Some(btn) = document.get_element_by_id("mint-btn") {
                            btn.set_text_content(Some("MINTED"));
                        }
                        if let Some(status) = document.get_element_by_id("mint-status") {
                            let short = format!("Minted: {}…{}", &tx[..6], &tx[tx.len() - 4..]);
                            status.set_text_content(Some(&short));
                        }
                    }
                    Err(e) => {
                        // Revert to the pre-mint state; the session itself is untouched
                        log::warn!("mint failed: {:?}", e);
                        reset_mint_ui(&document);
                        game.borrow_mut().minting = false;
                    }
                }
            });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            match event.key().as_str() {
                " " | "Enter" => {
                    let mut g = game.borrow_mut();
                    if g.state.phase != GamePhase::Playing {
                        g.begin_session();
                        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                            reset_mint_ui(&document);
                        }
                    }
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_blur_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(false);
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
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
    use fly_smasher::consts::SESSION_SECS;
    use fly_smasher::frame;
    use fly_smasher::sim::{GamePhase, SessionState, advance};

    env_logger::init();
    log::info!("Fly Smasher (native) starting...");

    // Headless demo: run one full session at 60 fps, smashing the oldest fly
    // once a second, then print the outcome the frame would share.
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = SessionState::new(seed);
    state.start();

    let dt = 1.0 / 60.0;
    let max_frames = SESSION_SECS * 60 * 2;
    for frame_no in 0..max_frames {
        if state.phase != GamePhase::Playing {
            break;
        }
        advance(&mut state, dt);
        if frame_no % 60 == 59 {
            if let Some(id) = state.flies.first().map(|f| f.id) {
                state.smash(id);
            }
        }
    }

    println!(
        "Final score: {} ({} flies in {} seconds, seed {})",
        state.score,
        state.flies_smashed(),
        SESSION_SECS,
        seed
    );
    frame::share_cast(&frame::share_text(state.score));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
