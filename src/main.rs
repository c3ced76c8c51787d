//! Torchlit entry point
//!
//! On the web: loads the level pack, wires keyboard input and runs the
//! frame loop. Natively: validates a level pack and runs a headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, Response};

    use torchlit::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use torchlit::renderer::{FramePresenter, PixelBuffer, Renderer, TextRun};
    use torchlit::{Game, GameEvent, LevelPack, Settings, Theme};

    const LEVELS_URL: &str = "data/levels.json";

    /// Session state shared with the browser callbacks
    struct App {
        game: Game,
        renderer: Renderer,
        frame: PixelBuffer,
        presenter: Option<FramePresenter>,
        /// Set on `pagehide`; the frame loop stops rescheduling
        detached: bool,
    }

    impl App {
        /// One displayed frame: timer and simulation, then drawing
        fn frame(&mut self, now: f64) {
            self.game.frame(now);
            self.handle_events();
            self.renderer.render(&mut self.frame, &self.game);
            self.present();
            update_hud(self.frame.text_runs());
        }

        fn handle_events(&mut self) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::GameComplete { elapsed_secs } => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&format!(
                                "You won! Total time: {} seconds",
                                elapsed_secs
                            ));
                        }
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        fn present(&mut self) {
            if let Some(ref mut presenter) = self.presenter {
                match presenter.present(&self.frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        presenter.resize(presenter.size.0, presenter.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Present error: {:?}", e),
                }
            }
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_default()
    }

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    async fn fetch_levels(window: &web_sys::Window) -> Result<LevelPack, JsValue> {
        let response: Response = JsFuture::from(window.fetch_with_str(LEVELS_URL))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(js_error(format!(
                "HTTP {} fetching {}",
                response.status(),
                LEVELS_URL
            )));
        }
        let text = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .ok_or_else(|| js_error("level pack is not text"))?;
        LevelPack::from_json(&text).map_err(js_error)
    }

    /// Mirror HUD text runs into absolutely positioned overlay elements
    fn update_hud(runs: &[TextRun]) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(hud) = document.get_element_by_id("hud") else {
            return;
        };

        // Field units to CSS pixels at the overlay's displayed width
        let scale = match hud.client_width() {
            w if w > 0 => w as f32 / FIELD_WIDTH,
            _ => 1.0,
        };

        for (i, run) in runs.iter().enumerate() {
            let id = format!("hud-text-{}", i);
            let el = match document.get_element_by_id(&id) {
                Some(el) => el,
                None => {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    el.set_id(&id);
                    let _ = hud.append_child(&el);
                    el
                }
            };
            el.set_text_content(Some(&run.text));

            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let style = el.style();
                let left = run.pos.x / FIELD_WIDTH * 100.0;
                // Runs are anchored at the baseline
                let top = (run.pos.y - run.font.size_px) / FIELD_HEIGHT * 100.0;
                let _ = style.set_property("left", &format!("{:.2}%", left));
                let _ = style.set_property("top", &format!("{:.2}%", top));
                let _ = style.set_property("font", &run.font.scaled(scale).css());
                let _ = style.set_property("color", &run.color.to_string());
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Torchlit starting...");

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("no canvas"))?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let levels = match fetch_levels(&window).await {
            Ok(levels) => levels,
            Err(e) => {
                log::error!("Failed to load {}: {:?}", LEVELS_URL, e);
                LevelPack::default()
            }
        };
        for problem in levels.problems() {
            log::warn!("{}", problem);
        }

        let settings = Settings::load();
        let theme = Theme::default();
        let seed = settings
            .flicker_seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let renderer = Renderer::new(theme.clone(), settings.lighting.clone(), seed);
        let mut game = Game::new(levels, theme, settings);
        log::info!("Game initialized with {} levels", game.level_count());

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_error)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_error)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let frame_size = (FIELD_WIDTH as u32, FIELD_HEIGHT as u32);
        let presenter = match FramePresenter::new(surface, &adapter, frame_size, width, height).await
        {
            Ok(presenter) => Some(presenter),
            Err(e) => {
                log::error!("Presenter unavailable: {}", e);
                None
            }
        };

        // No loop or input handlers for a pack that cannot start
        game.start(now()).map_err(js_error)?;

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            frame: PixelBuffer::new(frame_size.0, frame_size.1),
            presenter,
            detached: false,
        }));

        setup_input_handlers(&window, app.clone());
        setup_page_hide(&window, app.clone());

        request_animation_frame(app);

        log::info!("Torchlit running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                let mut a = app.borrow_mut();
                if a.game.settings().keys.resolve(&code).is_some() {
                    event.prevent_default();
                }
                a.game.key_down(&code, now());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_page_hide(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().detached = true;
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if a.detached {
                log::info!("Page hidden, stopping frame loop");
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use torchlit::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use torchlit::renderer::{PixelBuffer, Renderer};
    use torchlit::{Game, GameEvent, LevelPack, Settings, Theme};

    const DEFAULT_LEVELS: &str = "data/levels.json";
    const DEFAULT_FRAMES: u64 = 600;
    const FRAME_TIME: Duration = Duration::from_micros(16_667);

    /// Flicker seed when none is configured
    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }

    /// `torchlit [levels.json] [frames]`
    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let path = args.next().unwrap_or_else(|| DEFAULT_LEVELS.to_string());
        let frames = match args.next() {
            Some(n) => n.parse::<u64>()?,
            None => DEFAULT_FRAMES,
        };

        let json = std::fs::read_to_string(&path)?;
        let levels = LevelPack::from_json(&json)?;
        log::info!("Loaded {} levels from {}", levels.len(), path);
        for (i, level) in levels.levels.iter().enumerate() {
            log::info!(
                "  {} - {}: {} obstacles, {} torches",
                i + 1,
                level.name,
                level.obstacles.len(),
                level.torches.len()
            );
        }
        let problems = levels.problems();
        for problem in &problems {
            log::warn!("{}", problem);
        }

        let settings = Settings::load();
        let theme = Theme::default();
        let mut renderer = Renderer::new(
            theme.clone(),
            settings.lighting.clone(),
            settings.flicker_seed.unwrap_or_else(clock_seed),
        );
        let mut frame = PixelBuffer::new(FIELD_WIDTH as u32, FIELD_HEIGHT as u32);
        let mut game = Game::new(levels, theme, settings);

        let clock = Instant::now();
        let now = || clock.elapsed().as_secs_f64() * 1000.0;

        game.start(now())?;

        for _ in 0..frames {
            game.frame(now());
            renderer.render(&mut frame, &game);
            for event in game.drain_events() {
                match event {
                    GameEvent::GameComplete { elapsed_secs } => {
                        log::info!("You won! Total time: {} seconds", elapsed_secs)
                    }
                    other => log::info!("{:?}", other),
                }
            }
            std::thread::sleep(FRAME_TIME);
        }

        log::info!(
            "Stopped after {} frames: level {} ({:?}), {}s elapsed",
            frames,
            game.current_level() + 1,
            game.phase(),
            game.timer().elapsed_secs()
        );
        if !problems.is_empty() {
            return Err(format!("{} level(s) cannot be played", problems.len()).into());
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_clock_seed_varies_with_time() {
            let first = clock_seed();
            assert!(first > 0);
            std::thread::sleep(Duration::from_millis(5));
            assert_ne!(clock_seed(), first);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Torchlit (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
