//! Jump and Run entry point
//!
//! Handles platform-specific initialization and wires the engine to the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use jump_and_run::consts::*;
    use jump_and_run::highscores::{PersistentScoreStore, ScoreStore, format_age};
    use jump_and_run::persistence::{LocalStorage, MemoryStorage, Storage};
    use jump_and_run::platform::now_ms;
    use jump_and_run::platform::web::{RafScheduler, copy_to_clipboard, page_base_url, paint};
    use jump_and_run::render::draw_list;
    use jump_and_run::sim::KeyBindings;
    use jump_and_run::ui::Hud;
    use jump_and_run::{Engine, Settings};

    /// Presentation-side state living next to the engine
    struct App {
        hud: Hud,
        store: PersistentScoreStore<Box<dyn Storage>>,
    }

    /// LocalStorage when the browser allows it, otherwise scores last for the session
    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{e}; scores will not persist");
                Box::new(MemoryStorage::new())
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(app: &App) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let hud = &app.hud;

        set_text(&document, "current-score", &hud.current_score.to_string());
        set_text(&document, "highscore", &hud.highscore.to_string());
        set_visible(&document, "start-btn", !hud.game_started);
        set_visible(&document, "game-over", hud.game_over);

        if hud.game_over {
            set_text(&document, "final-score", &hud.current_score.to_string());
            set_text(&document, "share-url", hud.share_url.as_deref().unwrap_or(""));
        }
    }

    /// Rebuild the top-10 list
    fn update_score_list(app: &App) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(list) = document.get_element_by_id("score-list") else {
            return;
        };
        let entries = match app.store.top_scores() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not read scores: {e}");
                return;
            }
        };

        let now = now_ms();
        let html: String = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                format!(
                    "<li><span class=\"rank\">{}</span> {} <span class=\"age\">{}</span></li>",
                    i + 1,
                    e.score,
                    format_age(now, e.timestamp)
                )
            })
            .collect();
        list.set_inner_html(&html);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Jump and Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load(&open_storage());

        // Engine plus its frame callback, which ticks it through a weak handle
        let (scheduler, frame_slot) = RafScheduler::new(window.clone());
        let engine = Rc::new(RefCell::new(Engine::new(scheduler, settings.bindings)));
        {
            let weak = Rc::downgrade(&engine);
            *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                if let Some(engine) = weak.upgrade() {
                    engine.borrow_mut().tick();
                }
            }));
        }

        let app = Rc::new(RefCell::new(App {
            hud: Hud::new(),
            store: PersistentScoreStore::load(open_storage()),
        }));
        {
            let mut a = app.borrow_mut();
            let App { hud, store } = &mut *a;
            hud.refresh_highscore(store);
            update_hud(&a);
            update_score_list(&a);
        }

        // Render every snapshot and watch for the game-over edge
        {
            let app = app.clone();
            let ctx = ctx.clone();
            engine.borrow_mut().subscribe(move |state| {
                paint(&ctx, &draw_list(state));

                let mut a = app.borrow_mut();
                let App { hud, store } = &mut *a;
                if let Some(score) = hud.observe(state) {
                    hud.record_game_over(score, now_ms(), store, &page_base_url());
                    update_score_list(&a);
                }
                update_hud(&a);
            });
        }

        // Idle frame behind the start button
        paint(&ctx, &draw_list(engine.borrow().current_state()));

        setup_keyboard(engine.clone());
        setup_start_button(engine.clone(), app.clone());
        setup_copy_button(app);
        setup_blur(engine);

        log::info!("Jump and Run ready");
    }

    fn setup_keyboard(engine: Rc<RefCell<Engine>>) {
        let window = web_sys::window().expect("no window");

        {
            let engine = engine.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                if KeyBindings::prevents_default(&key) {
                    event.prevent_default();
                }
                engine.borrow_mut().key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                engine.borrow_mut().key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(engine: Rc<RefCell<Engine>>, app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        for id in ["start-btn", "restart-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let engine = engine.clone();
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                // The HUD borrow must end before start() emits into the listener
                app.borrow_mut().hud.start();
                engine.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_copy_button(app: Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        if let Some(btn) = document.get_element_by_id("copy-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(url) = app.borrow().hud.share_url.clone() {
                    copy_to_clipboard(url);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Keys released while the window is unfocused never send keyup
    fn setup_blur(engine: Rc<RefCell<Engine>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            engine.borrow_mut().release_keys();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
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
    log::info!("Jump and Run (native) starting...");
    log::info!("Native mode runs a scripted headless demo - serve the wasm build to play");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use jump_and_run::highscores::{PersistentScoreStore, ScoreStore};
    use jump_and_run::platform::now_ms;
    use jump_and_run::sim::GameState;
    use jump_and_run::ui::Hud;
    use jump_and_run::{Engine, ManualScheduler, MemoryStorage, Settings};

    /// Keys held for a number of frames
    pub type Script<'a> = Vec<(Vec<&'a str>, u32)>;

    pub struct DemoRun {
        pub state: GameState,
        pub hud: Hud,
        pub store: PersistentScoreStore<MemoryStorage>,
    }

    pub fn default_script() -> Script<'static> {
        vec![
            (vec![], 20),
            (vec!["ArrowRight"], 20),
            (vec!["ArrowRight", " "], 30),
            (vec!["ArrowRight"], 38),
            (vec![" "], 30),
            (vec!["ArrowLeft"], 40),
        ]
    }

    /// Play `script` against a hand-pumped scheduler
    pub fn play(script: Script<'_>) -> DemoRun {
        let scheduler = ManualScheduler::new();
        let mut store = PersistentScoreStore::load(MemoryStorage::new());
        let settings = Settings::load(store.storage());
        let mut engine = Engine::new(scheduler.clone(), settings.bindings);

        let hud = Rc::new(RefCell::new(Hud::new()));
        let finished = Rc::new(RefCell::new(None));
        {
            let hud = hud.clone();
            let finished = finished.clone();
            engine.subscribe(move |state| {
                if let Some(score) = hud.borrow_mut().observe(state) {
                    *finished.borrow_mut() = Some(score);
                }
            });
        }

        hud.borrow_mut().start();
        engine.start();

        'script: for (keys, frames) in script {
            engine.release_keys();
            for key in keys {
                engine.key_down(key);
            }
            for _ in 0..frames {
                if !scheduler.fire() {
                    break 'script;
                }
                engine.tick();
            }
        }
        engine.pause();

        // Only a finished run counts; a paused one is not scored
        let finished = *finished.borrow();
        match finished {
            Some(score) => {
                hud.borrow_mut()
                    .record_game_over(score, now_ms(), &mut store, "http://localhost/");
            }
            None => log::info!("Run did not end in a fall, no score recorded"),
        }

        let hud = hud.borrow().clone();
        DemoRun {
            state: engine.snapshot(),
            hud,
            store,
        }
    }

    pub fn run() {
        let run = play(default_script());
        let state = &run.state;
        log::info!(
            "Demo finished after {} ticks: score {}, {} coins left",
            state.ticks,
            state.score,
            state.remaining_coins()
        );

        match run.store.top_scores() {
            Ok(top) => {
                for (rank, entry) in top.iter().enumerate() {
                    println!("{:>2}. {:>6}", rank + 1, entry.score);
                }
            }
            Err(e) => log::warn!("Could not read scores: {e}"),
        }
        if let Some(url) = run.hud.share_url.as_deref() {
            println!("Share: {url}");
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_paused_demo_records_nothing() {
            let run = play(default_script());
            assert!(!run.state.game_over);
            assert!(!run.state.running);
            assert!(run.state.ticks > 0);
            assert!(run.store.log().is_empty());
            assert_eq!(run.hud.share_url, None);
        }
    }
}
