//! Voxel Dare entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use voxel_dare::Settings;
    use voxel_dare::audio::AudioManager;
    use voxel_dare::platform::{self, CanvasTextSurface};
    use voxel_dare::renderer::SceneRenderState;
    use voxel_dare::sim::{
        Camera, GameEvent, GameState, InputEvent, PointerDown, TextBuffer, TickInput, tick,
    };

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SceneRenderState>,
        /// Canvas raster for ASCII frames; `scratch` stands in if it can't be made
        raster: Option<CanvasTextSurface>,
        scratch: TextBuffer,
        audio: AudioManager,
        camera: Camera,
        input: TickInput,
        /// Canvas size in CSS pixels
        viewport: Vec2,
        last_time: f64,
        shown_text: String,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let raster = match CanvasTextSurface::new() {
                Ok(surface) => Some(surface),
                Err(e) => {
                    log::error!("ASCII raster unavailable: {:?}", e);
                    None
                }
            };
            Self {
                state: GameState::new(seed, &settings),
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                raster,
                scratch: TextBuffer::default(),
                camera: Camera::new(1.0),
                input: TickInput::default(),
                viewport: Vec2::ZERO,
                last_time: 0.0,
                shown_text: String::new(),
            }
        }

        fn set_viewport(&mut self, css_w: f32, css_h: f32) {
            self.viewport = Vec2::new(css_w, css_h);
            self.camera.set_aspect(css_w, css_h);
        }

        /// Run one animation frame of simulation. Returns true when the
        /// ASCII asset must be fetched.
        fn update(&mut self, time: f64) -> bool {
            let dt_ms = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;

            let mut input = std::mem::take(&mut self.input);
            input.viewport = self.viewport;
            let now = platform::now_secs();

            match self.raster.as_mut() {
                Some(raster) => tick(&mut self.state, &input, &self.camera, dt_ms, now, raster),
                None => tick(
                    &mut self.state,
                    &input,
                    &self.camera,
                    dt_ms,
                    now,
                    &mut self.scratch,
                ),
            }

            self.handle_events()
        }

        /// Dispatch side effects. Returns true if a fetch was requested.
        fn handle_events(&mut self) -> bool {
            let mut fetch = false;
            for event in self.state.drain_events() {
                match event {
                    GameEvent::VoxelBroken { sound, .. } => self.audio.play_break(&sound),
                    GameEvent::Music(cue) => self.audio.music(cue),
                    GameEvent::ActionButton { visible } => set_action_button(visible),
                    GameEvent::FetchAsset => fetch = true,
                    GameEvent::Escalated => log::debug!("NPC escalated"),
                    GameEvent::PlaybackStarted { frames } => {
                        log::debug!("Playing {} ASCII frames", frames)
                    }
                    GameEvent::PlaybackFinished
                    | GameEvent::PlaybackFailed(_)
                    | GameEvent::SceneRecolored => {}
                }
            }
            fetch
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            if let Some(raster) = self.raster.as_mut() {
                if raster.take_dirty() {
                    if let Some(pixels) = raster.pixels() {
                        render_state.upload_raster(&pixels);
                    }
                }
            }

            match render_state.render(&self.state, &self.camera) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Mirror the dialogue text into the NPC box
        fn update_dialogue(&mut self) {
            let text = self.state.dialogue.text();
            if text == self.shown_text {
                return;
            }
            self.shown_text = text.to_string();
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("npc-text"))
            {
                el.set_text_content(Some(text));
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.settings.save();
            self.audio.apply_settings(&self.settings);
            self.state.apply_settings(&self.settings);
            log::info!("Muted: {}", self.settings.muted);
        }
    }

    fn set_action_button(visible: bool) {
        let button = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("ah-button"));
        if let Some(button) = button {
            if let Err(e) = button.class_list().toggle_with_force("hidden", !visible) {
                log::warn!("Cannot toggle #ah-button: {:?}", e);
            }
        }
    }

    /// Size the canvas backing store to its CSS box
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32, f32, f32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height, client_w as f32, client_h as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Voxel Dare starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height, css_w, css_h) = fit_canvas(&canvas);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        game.borrow_mut().set_viewport(css_w, css_h);
        set_action_button(false);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SceneRenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_action_button(game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Voxel Dare running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press picks a voxel
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                game.borrow_mut().input.push(InputEvent::Pointer(PointerDown {
                    button: event.button(),
                    client_x: event.client_x() as f32 - rect.left() as f32,
                    client_y: event.client_y() as f32 - rect.top() as f32,
                }));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: secret sequence, M toggles mute
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.input.push(InputEvent::Key(event.key_code()));
                if matches!(event.key().as_str(), "m" | "M") {
                    g.toggle_mute();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_action_button(game: Rc<RefCell<Game>>) {
        let Some(button) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("ah-button"))
        else {
            log::warn!("No #ah-button element");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().input.push(InputEvent::ActionButton);
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height, css_w, css_h) = fit_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.set_viewport(css_w, css_h);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        for event in ["resize", "orientationchange"] {
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let fetch = {
            let mut g = game.borrow_mut();
            let fetch = g.update(time);
            g.render();
            g.update_dialogue();
            fetch
        };

        if fetch {
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let url = platform::page_asset_url();
                log::info!("Fetching {}", url);
                let result = platform::fetch_text(&url).await;
                game.borrow_mut().state.asset_loaded(result);
            });
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use voxel_dare::sim::state::noise_seed;
    use voxel_dare::sim::{SimplexField, TerrainParams, build_terrain, height_map};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_millis() as u64)
        });
    log::info!("Voxel Dare (native) terrain preview, seed {}", seed);
    log::info!("The game itself runs in the browser - build for wasm32");

    let params = TerrainParams::default();
    let field = SimplexField::new(noise_seed(seed));

    println!("Column heights (rows = x, columns = z):");
    for row in height_map(&params, &field) {
        let line: String = row
            .iter()
            .map(|&h| match h {
                0 => '.',
                h => char::from_digit(h.min(9), 10).unwrap_or('#'),
            })
            .collect();
        println!("  {}", line);
    }

    let world = build_terrain(&params, &field);
    println!("{} voxels", world.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
