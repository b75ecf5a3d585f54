use tps_lanes_protocol::{Paint, ThemeToken};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        }
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

/// Chain colors are the same in both themes.
pub fn resolve_paint(paint: Paint, mode: ThemeMode) -> egui::Color32 {
    match paint {
        Paint::Theme(token) => resolve(token, mode),
        Paint::Chain(hex) => egui::Color32::from_rgb(hex.r, hex.g, hex.b),
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust
        LaneBorder => ResolvedColor::rgb(0x31, 0x32, 0x44), // Surface0
        LaneHeaderText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4), // Text
        TextSecondary => ResolvedColor::rgb(0xba, 0xc2, 0xde), // Subtext1
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(250, 250, 252),
        LaneBorder => ResolvedColor::rgb(210, 210, 220),
        LaneHeaderText => ResolvedColor::rgb(40, 40, 50),
        TextSecondary => ResolvedColor::rgb(80, 80, 100),
    }
}
