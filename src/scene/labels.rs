//! User labels: typed text extruded into 3D and scattered over the ocean.
//!
//! New labels are persisted before they are built, stored labels are rebuilt
//! on startup. Building needs the label's font, which is fetched once and then
//! cached.

use std::sync::Arc;

use rand::Rng;

use crate::{
    config::{LabelConfig, WaveConfig},
    geometry::{Geometry, extrude::extrude},
    resources::font::{FontCache, Typeface},
    scene::{SceneMutation, SceneState},
    storage::{Label, LabelStore, StoreError},
};

/// A label with its place decided, waiting for the font.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLabel {
    pub label: Label,
    pub position: [f32; 3],
}

/// A label ready for the GPU.
#[derive(Debug, Clone)]
pub struct PlacedLabel {
    pub label: Label,
    pub geometry: Geometry,
    pub position: [f32; 3],
}

pub struct LabelManager {
    store: Arc<LabelStore>,
    fonts: FontCache,
    config: LabelConfig,
    wave: WaveConfig,
}

impl LabelManager {
    pub fn new(store: Arc<LabelStore>, fonts: FontCache, config: LabelConfig, wave: WaveConfig) -> Self {
        Self {
            store,
            fonts,
            config,
            wave,
        }
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Stored labels, each with a fresh random place.
    pub fn load_at_startup<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PendingLabel> {
        let labels = self.store.load();
        log::info!("Restoring {} labels", labels.len());
        labels
            .into_iter()
            .map(|label| self.place(label, rng))
            .collect()
    }

    /// Persist a new label for `text` and place it.
    ///
    /// Empty input is ignored. Whitespace is a valid message: it is stored,
    /// though it renders no glyphs. `on_stored` runs once the label is persisted and
    /// not at all if storing failed, in which case nothing is placed either.
    pub fn add_new<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
        on_stored: impl FnOnce(),
    ) -> Result<Option<PendingLabel>, StoreError> {
        if text.is_empty() {
            return Ok(None);
        }
        let font = self.pick_font(rng);
        let label = Label {
            message: format!("{}{}", self.config.marker, text),
            font,
        };
        let count = self.store.append(label.clone())?;
        log::info!("Stored label {:?}, {} labels in total", label.message, count);
        on_stored();
        Ok(Some(self.place(label, rng)))
    }

    fn pick_font<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        if self.config.fonts.is_empty() {
            return String::new();
        }
        let idx = rng.gen_range(0..self.config.fonts.len());
        self.config.fonts[idx].clone()
    }

    fn place<R: Rng + ?Sized>(&self, label: Label, rng: &mut R) -> PendingLabel {
        let [x, z] = self
            .wave
            .scatter(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
        let y = rng.gen_range(0.0..1.0) * self.config.max_height;
        PendingLabel {
            label,
            position: [x + self.config.x_offset, y, z],
        }
    }

    /// Fetch the font, build the text and queue it in the scene. Failures only log.
    pub fn build(&self, pending: PendingLabel) -> Box<dyn Future<Output = SceneMutation>> {
        let fonts = self.fonts.clone();
        let config = self.config.clone();
        Box::new(async move {
            let placed = match fonts.get_or_load(&pending.label.font).await {
                Ok(typeface) => build_label_geometry(&typeface, &pending.label.message, &config)
                    .map(|geometry| PlacedLabel {
                        label: pending.label,
                        geometry,
                        position: pending.position,
                    }),
                Err(e) => Err(e),
            };
            let mutation: SceneMutation = match placed {
                Ok(placed) => Box::new(move |state: &mut SceneState| {
                    state.pending_labels.push(placed)
                }),
                Err(e) => {
                    log::warn!("Label could not be built: {}", e);
                    Box::new(|_: &mut SceneState| {})
                }
            };
            mutation
        })
    }
}

/// Outline `message` with `typeface` and extrude it into a solid.
pub fn build_label_geometry(
    typeface: &Typeface,
    message: &str,
    config: &LabelConfig,
) -> anyhow::Result<Geometry> {
    let shapes = typeface.shapes(message, config.size, config.curve_segments)?;
    let geometry = extrude(&shapes, config.depth);
    if geometry.indices.is_empty() {
        anyhow::bail!("{:?} has no visible glyphs", message);
    }
    Ok(geometry)
}
