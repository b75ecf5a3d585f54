use eframe::egui;
use tps_lanes_core::views::lane_overlay::{format_count, render_lane_overlay};
use tps_lanes_core::{ChainTable, EngineConfig, LaneEngine, SimulationConfig, TickStats};
use tps_lanes_protocol::{RenderCommand, Viewport};

use crate::renderer;
use crate::theme::ThemeMode;

/// Main application state.
pub struct LanesApp {
    engine: LaneEngine,
    engine_config: EngineConfig,
    /// Command buffer reused across frames.
    commands: Vec<RenderCommand>,
    last_stats: TickStats,
    paused: bool,
    theme_mode: ThemeMode,
    /// Error message to display.
    error: Option<String>,
}

impl LanesApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: SimulationConfig) -> Self {
        // Use dark theme by default
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut error = None;
        let chains = config.chain_table();
        let mut engine_config = config.engine;
        if engine_config.seed == 0 {
            engine_config.seed = clock_seed();
        }
        let engine = match chains {
            Ok(chains) => LaneEngine::new(chains, &engine_config),
            Err(e) => {
                error = Some(format!("Invalid chain table, using built-in: {e}"));
                LaneEngine::new(ChainTable::builtin(), &engine_config)
            }
        };
        tracing::info!(
            lanes = engine.lanes().len(),
            pool = engine.capacity(),
            "simulation started"
        );

        Self {
            engine,
            engine_config,
            commands: Vec::new(),
            last_stats: TickStats::default(),
            paused: false,
            theme_mode: ThemeMode::Dark,
            error,
        }
    }

    /// Swap in a new config. Same engine settings reload chains in place;
    /// anything else rebuilds the engine and its pool.
    #[cfg(not(target_arch = "wasm32"))]
    fn apply_config(&mut self, config: SimulationConfig) {
        let chains = match config.chain_table() {
            Ok(chains) => chains,
            Err(e) => {
                self.error = Some(format!("Invalid chain table: {e}"));
                return;
            }
        };
        let mut engine_config = config.engine;
        if engine_config.seed == 0 {
            engine_config.seed = self.engine_config.seed;
        }
        if engine_config == self.engine_config {
            self.engine.reload_chains(chains);
        } else {
            self.engine = LaneEngine::new(chains, &engine_config);
            self.engine_config = engine_config;
        }
        self.error = None;
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Config", &["json"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read(&path) {
            Ok(data) => match SimulationConfig::from_json(&data) {
                Ok(config) => self.apply_config(config),
                Err(e) => self.error = Some(format!("Failed to load config: {e}")),
            },
            Err(e) => {
                self.error = Some(format!("Failed to read file: {e}"));
            }
        }
    }
}

impl eframe::App for LanesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("tps-lanes");
                ui.separator();

                #[cfg(not(target_arch = "wasm32"))]
                {
                    if ui.button("Open config").clicked() {
                        self.open_config();
                    }
                }

                let pause_label = if self.paused { "Resume" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    self.paused = !self.paused;
                }

                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "Dark",
                    ThemeMode::Light => "Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = self.theme_mode.toggled();
                    ctx.set_visuals(self.theme_mode.visuals());
                }
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.separator();
                }
                let total: u64 = self.engine.lanes().iter().map(|l| l.total_tx).sum();
                let chains = self.engine.chains();
                ui.label(format!(
                    "Chains: {} / {} | Particles: {} / {} | Spawned: {} | Dropped: {} | Total tx: {}",
                    chains.enabled().count(),
                    chains.len(),
                    self.last_stats.active,
                    self.engine.capacity(),
                    self.last_stats.spawned,
                    self.last_stats.dropped,
                    format_count(total),
                ));
            });
        });

        // Central panel: the simulation canvas
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_rect_before_wrap();
                let (response, painter) =
                    ui.allocate_painter(available.size(), egui::Sense::hover());
                let canvas = response.rect;
                let viewport =
                    Viewport::sized(f64::from(canvas.width()), f64::from(canvas.height()));

                let elapsed = if self.paused {
                    0.0
                } else {
                    f64::from(ctx.input(|i| i.stable_dt))
                };

                // Step first so the overlay sees this frame's lane geometry.
                self.last_stats = self.engine.step(elapsed, viewport.width, viewport.height);
                self.commands.clear();
                if viewport.is_drawable() {
                    self.commands
                        .extend(render_lane_overlay(self.engine.lanes(), &viewport));
                    self.engine.draw(&mut self.commands);
                }
                renderer::render_commands(&painter, &self.commands, canvas.min, self.theme_mode);
            });

        ctx.request_repaint();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}
