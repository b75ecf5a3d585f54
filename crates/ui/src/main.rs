#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::path::PathBuf;

    use anyhow::{Context, anyhow};
    use tps_lanes_core::SimulationConfig;
    use tps_lanes_ui::LanesApp;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let data = std::fs::read(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimulationConfig::from_json(&data)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("tps-lanes")
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "tps-lanes",
        options,
        Box::new(|cc| Ok(Box::new(LanesApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("failed to start window: {e}"))
}

// The web build starts from `tps_lanes_ui::start` instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
