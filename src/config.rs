//! Scene configuration (assets/scene.json)
//!
//! Every value has a default, so the file is optional and may be partial.
//! Colours are written as sRGB hex strings and converted to linear on use.

use serde::{Deserialize, Serialize};

use crate::resources::load_string;

pub const CONFIG_FILE: &str = "scene.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub wave: WaveConfig,
    pub fish: FishConfig,
    pub pyramids: PyramidConfig,
    pub labels: LabelConfig,
    pub camera: CameraConfig,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub amount_x: u32,
    pub amount_y: u32,
    pub spacing: f32,
    pub highlight_cap: usize,
    pub radius: f32,
    /// Highlighted radius range, upper bound exclusive.
    pub highlight_radius: [u32; 2],
    pub color: String,
    pub highlight_color: String,
    /// Phase advance per rendered frame.
    pub step: f32,
    /// Width and height segments of the sphere mesh.
    pub sphere_segments: [u32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub count: u32,
    pub palette: Vec<String>,
    pub point_size: f32,
    /// Vertical band `[min, max]` the fish swim in.
    pub depth: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    pub count: u32,
    pub radius: f32,
    pub height: f32,
    pub sides: u32,
    pub y: f32,
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub storage_key: String,
    pub marker: String,
    pub fonts: Vec<String>,
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub color: String,
    pub x_offset: f32,
    pub max_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub smoothing: f32,
    pub initial_target: [f32; 2],
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amount_x: 80,
            amount_y: 80,
            spacing: 100.0,
            highlight_cap: 40,
            radius: 5.0,
            highlight_radius: [100, 150],
            color: "#5ABDE1".to_string(),
            highlight_color: "#FFE254".to_string(),
            step: 0.1,
            sphere_segments: [32, 32],
        }
    }
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            count: 15,
            palette: vec!["#5ABDE1".to_string(), "#98EDE2".to_string()],
            point_size: 10.0,
            depth: [-1250.0, -1000.0],
        }
    }
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            count: 12,
            radius: 300.0,
            height: 300.0,
            sides: 4,
            y: 1200.0,
            palette: vec![
                "#FFA500".to_string(),
                "#F2A3AD".to_string(),
                "#FFA500".to_string(),
                "#F2A3AD".to_string(),
            ],
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            storage_key: "messages".to_string(),
            marker: "#".to_string(),
            fonts: vec!["HelveticaNeueLT Std Med Ext_Bold".to_string(); 3],
            size: 100.0,
            depth: 50.0,
            curve_segments: 12,
            color: "#E5E5E5".to_string(),
            x_offset: 100.0,
            max_height: 300.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 1000.0],
            fovy: 75.0,
            znear: 1.0,
            zfar: 10000.0,
            smoothing: 0.05,
            initial_target: [220.0, -487.0],
        }
    }
}

impl WaveConfig {
    pub fn particle_count(&self) -> usize {
        self.amount_x as usize * self.amount_y as usize
    }

    /// Width and depth of the grid in world units.
    pub fn extent(&self) -> [f32; 2] {
        [
            self.amount_x as f32 * self.spacing,
            self.amount_y as f32 * self.spacing,
        ]
    }

    /// Map two unit randoms onto the grid's horizontal footprint, centred on the origin.
    pub fn scatter(&self, rx: f32, rz: f32) -> [f32; 2] {
        let [w, d] = self.extent();
        [rx * w - w / 2.0, rz * d - d / 2.0]
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn background_colour(&self) -> wgpu::Color {
        if self.background.is_empty() {
            return wgpu::Color::BLACK;
        }
        let [r, g, b, a] = color_or_default(&self.background);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }

    /// Load `assets/scene.json`, falling back to the defaults.
    pub async fn load() -> Self {
        match load_string(CONFIG_FILE).await {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded {}", CONFIG_FILE);
                    config
                }
                Err(e) => {
                    log::warn!("{} is malformed, using defaults: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        }
    }
}

/// Parse `#RRGGBB` (or `#RRGGBBAA`) into a linear RGBA colour.
pub fn parse_hex_color(hex: &str) -> anyhow::Result<[f32; 4]> {
    let digits = hex.trim().trim_start_matches('#');
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        anyhow::bail!("Expected #RRGGBB, got {:?}", hex);
    }
    let channel = |i: usize| -> anyhow::Result<f32> {
        Ok(u8::from_str_radix(&digits[i..i + 2], 16)? as f32 / 255.0)
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Ok([
        srgb_to_linear(channel(0)?),
        srgb_to_linear(channel(2)?),
        srgb_to_linear(channel(4)?),
        alpha,
    ])
}

/// Like [`parse_hex_color`], but logs and falls back to white.
pub fn color_or_default(hex: &str) -> [f32; 4] {
    parse_hex_color(hex).unwrap_or_else(|e| {
        log::warn!("Invalid colour: {}", e);
        [1.0; 4]
    })
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
