//! Pink Runner -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. The loop sleeps until
//! the frame clock's next deadline (`ControlFlow::WaitUntil`) and requests a
//! redraw once a tick is due. Each `RedrawRequested`:
//!
//!   1. `clock.poll()` -- at most one simulation tick, late ticks are dropped
//!   2. `world.advance()` with the tick's `FrameInput`
//!   3. compose the canvas, present it, draw the egui HUD on top
//!   4. scroll the camera and clear edge-triggered input
//!
//! When the game ends the frozen frame stays on screen under a "Game Over"
//! banner for `game_over_delay_ms`, then the loop exits.

mod assets;
mod camera;
mod collision;
mod entities;
mod level;
mod player;
#[cfg(test)]
mod replay;
mod world;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::IVec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{background_tiles, AssetRegistry};
use level::{load_level_or_default, LevelLayout};
use plat_core::animation::directional_name;
use plat_core::config::{load_config_or_default, GameConfig};
use plat_core::input::{InputState, Key};
use plat_core::sprite::Sprite;
use plat_core::time::FrameClock;
use plat_overlay::{HudOverlay, HudStats};
use plat_platform::window::PlatformConfig;
use plat_render::{Canvas, FrameRenderer, GpuContext};
use world::{FrameInput, GameStatus, World};

const CONFIG_PATH: &str = "assets/config/game.json";
const LEVEL_PATH: &str = "assets/levels/level1.json";
const CLEAR_COLOR: [u8; 4] = [255, 255, 255, 255];

const LEFT_KEYS: [Key; 2] = [Key::Left, Key::A];
const RIGHT_KEYS: [Key; 2] = [Key::Right, Key::D];
const JUMP_KEYS: [Key; 3] = [Key::Space, Key::Up, Key::W];

/// All mutable game state. Constructed in `ApplicationHandler::resumed` once
/// the window and GPU surface exist.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    frame_renderer: FrameRenderer,
    overlay: HudOverlay,
    clock: FrameClock,
    input: InputState,
    world: World,
    canvas: Canvas,
    background: Sprite,
    background_tiles: Vec<IVec2>,
    game_over_at: Option<Instant>,
    game_over_delay: Duration,
}

impl GameState {
    fn new(window: Arc<Window>, config: &GameConfig, level: &LevelLayout) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let frame_renderer =
            FrameRenderer::new(&gpu.device, gpu.surface_format(), config.width, config.height);
        let overlay = HudOverlay::new(&gpu.device, gpu.surface_format(), &window);

        let assets = AssetRegistry::load(config);
        let world = World::from_level(config, level, &assets);
        let background_tiles = background_tiles(
            assets.background.width(),
            assets.background.height(),
            config.width,
            config.height,
        );

        Ok(Self {
            window,
            gpu,
            frame_renderer,
            overlay,
            clock: FrameClock::new(config.fps, Instant::now()),
            input: InputState::new(),
            world,
            canvas: Canvas::new(config.width, config.height),
            background: assets.background.clone(),
            background_tiles,
            game_over_at: None,
            game_over_delay: Duration::from_millis(config.game_over_delay_ms),
        })
    }

    fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.input.any_held(&LEFT_KEYS),
            right: self.input.any_held(&RIGHT_KEYS),
            jump: self.input.any_just_pressed(&JUMP_KEYS),
        }
    }

    fn hud_stats(&self) -> HudStats {
        let player = &self.world.player;
        HudStats {
            lives: player.lives,
            game_over: self.world.status().is_over(),
            animation: directional_name(player.animation_state().name(), player.direction),
            position: (player.rect.x, player.rect.y),
            velocity: (player.velocity.x, player.velocity.y),
            jump_count: player.jump_count,
            camera_offset: self.world.camera.offset_x,
            object_count: self.world.objects.len(),
        }
    }

    fn render(&mut self) {
        self.canvas.clear(CLEAR_COLOR);
        self.world
            .draw(&mut self.canvas, &self.background, &self.background_tiles);
        self.frame_renderer.upload(&self.gpu.queue, &self.canvas);

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.hud_stats();
        let (egui_primitives, egui_textures_delta) =
            self.overlay.prepare(&self.window, &self.clock, &stats);
        let (width, height) = self.gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            self.frame_renderer.draw(&mut render_pass);
        }

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: GameConfig,
    level: LevelLayout,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig, level: LevelLayout) -> Self {
        Self {
            config,
            level,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = PlatformConfig {
            title: self.config.window_title.clone(),
            width: self.config.width,
            height: self.config.height,
            resizable: false,
        };
        let window = match plat_platform::window::create_window(event_loop, &platform) {
            Ok(window) => window,
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };
        match GameState::new(window, &self.config, &self.level) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Failed to initialize renderer: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            event_loop.set_control_flow(ControlFlow::WaitUntil(state.clock.next_deadline()));
            if state.clock.is_due(Instant::now()) {
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let size = state.window.inner_size();
                if size.width == 0 || size.height == 0 {
                    return;
                }

                let now = Instant::now();
                let ticked = state.clock.poll(now);
                if ticked {
                    if state.input.is_just_pressed(Key::Escape) {
                        log::info!("Escape pressed, exiting.");
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.overlay.toggle_debug();
                    }

                    let input = state.frame_input();
                    if let GameStatus::GameOver(reason) = state.world.advance(input) {
                        if state.game_over_at.is_none() {
                            log::info!(
                                "Game over after {} ticks: {}",
                                state.world.tick_count(),
                                reason
                            );
                            state.game_over_at = Some(now);
                        }
                    }
                }

                state.render();

                // Camera follows the frame that was just drawn; edge-triggered
                // input is cleared only once a tick has consumed it.
                if ticked {
                    state.world.scroll_camera();
                    state.input.end_frame();
                }

                if let Some(at) = state.game_over_at {
                    if now.duration_since(at) >= state.game_over_delay {
                        log::info!("Game over screen elapsed, exiting.");
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Pink Runner starting...");

    let config = load_config_or_default(Path::new(CONFIG_PATH))
        .unwrap_or_else(|err| panic!("Failed to load config '{}': {}", CONFIG_PATH, err));
    let level = load_level_or_default(Path::new(LEVEL_PATH), &config)
        .unwrap_or_else(|err| panic!("Failed to load level '{}': {}", LEVEL_PATH, err));

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, level);
    event_loop.run_app(&mut app).expect("Event loop error");
    log::info!("Exited.");
}
