//! Tropical fish drifting below the ocean, drawn as point clouds.

use rand::Rng;

use crate::{
    config::{FishConfig, WaveConfig},
    resources::load_obj_positions,
    scene::{SceneMutation, SceneState},
};

/// Asset path of fish number `n`, counting from 1.
pub fn asset_name(n: u32) -> String {
    format!("models/TropicalFish{:02}.obj", n)
}

/// Where a fish ends up and which palette entry colours it. Decided before loading.
#[derive(Debug, Clone, PartialEq)]
pub struct FishPlacement {
    pub asset: String,
    pub offset: [f32; 3],
    pub palette_index: usize,
}

impl FishPlacement {
    pub fn random<R: Rng + ?Sized>(
        n: u32,
        fish: &FishConfig,
        wave: &WaveConfig,
        rng: &mut R,
    ) -> Self {
        let [x, z] = wave.scatter(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
        let [low, high] = fish.depth;
        // -1000 - rand * 250 for the default band
        let y = high - rng.gen_range(0.0..1.0) * (high - low);
        let palette_index = if fish.palette.is_empty() {
            0
        } else {
            rng.gen_range(0..fish.palette.len())
        };
        Self {
            asset: asset_name(n),
            offset: [x, y, z],
            palette_index,
        }
    }
}

/// One placement per configured fish, in asset order.
pub fn placements<R: Rng + ?Sized>(
    fish: &FishConfig,
    wave: &WaveConfig,
    rng: &mut R,
) -> Vec<FishPlacement> {
    (1..=fish.count)
        .map(|n| FishPlacement::random(n, fish, wave, rng))
        .collect()
}

/// A loaded fish waiting for its GPU upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FishCloud {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex colours, always zero; the material colours the whole cloud.
    pub colors: Vec<[u8; 3]>,
    pub offset: [f32; 3],
    pub palette_index: usize,
}

impl FishCloud {
    pub fn new(placement: &FishPlacement, positions: Vec<[f32; 3]>) -> Self {
        let colors = vec![[0u8; 3]; positions.len()];
        Self {
            name: placement.asset.clone(),
            positions,
            colors,
            offset: placement.offset,
            palette_index: placement.palette_index,
        }
    }

    /// Model positions moved to the fish's place in the world.
    pub fn world_positions(&self) -> Vec<[f32; 3]> {
        self.positions
            .iter()
            .map(|p| {
                [
                    p[0] + self.offset[0],
                    p[1] + self.offset[1],
                    p[2] + self.offset[2],
                ]
            })
            .collect()
    }
}

/// Load a fish and queue it in the scene. A failed load only logs.
pub fn load(placement: FishPlacement) -> Box<dyn Future<Output = SceneMutation>> {
    Box::new(async move {
        let mutation: SceneMutation = match load_obj_positions(&placement.asset).await {
            Ok(positions) => {
                log::info!("Loaded {} with {} points", placement.asset, positions.len());
                let cloud = FishCloud::new(&placement, positions);
                Box::new(move |state: &mut SceneState| state.pending_fish.push(cloud))
            }
            Err(e) => {
                log::warn!("Skipping fish {}: {}", placement.asset, e);
                Box::new(|_: &mut SceneState| {})
            }
        };
        mutation
    })
}
