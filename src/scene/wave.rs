//! The particle ocean: a grid of spheres riding two crossing sine waves.
//!
//! A handful of grid cells is highlighted once at startup. Highlighted spheres
//! are large, gold and keep their size; every other sphere pulses with the wave.

use rand::{Rng, seq::SliceRandom};

use crate::config::WaveConfig;

/// Vertical displacement of grid cell `(x, y)` at phase `step`.
pub fn wave_height(x: f32, y: f32, step: f32) -> f32 {
    ((x + step) * 0.3).sin() * 50.0 + ((y + step) * 0.5).sin() * 50.0
}

/// Pulse factor of an ordinary sphere at grid cell `(x, y)` and phase `step`.
pub fn wave_scale(x: f32, y: f32, step: f32) -> f32 {
    (((x + step) * 0.3).sin() + 1.0) * 2.0 + (((y + step) * 0.5).sin() + 1.0) * 2.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridParticle {
    /// Row-major index, `x * amount_y + y`.
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub position: [f32; 3],
    pub radius: f32,
    /// Pulse factor, only ever changed for ordinary particles.
    pub scale: f32,
    pub highlighted: bool,
}

impl GridParticle {
    /// World-space size of the unit sphere drawn for this particle.
    pub fn render_scale(&self) -> f32 {
        if self.highlighted {
            self.radius
        } else {
            self.radius * self.scale
        }
    }
}

/// The grid cells picked to be highlighted, fixed for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSelection {
    indices: Vec<usize>,
}

impl HighlightSelection {
    /// Pick up to `cap` distinct indices out of `0..total` by shuffling the whole range.
    pub fn choose<R: Rng + ?Sized>(total: usize, cap: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..total).collect();
        indices.shuffle(rng);
        indices.truncate(cap.min(total));
        Self { indices }
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Counts handed out highlights so no more than `cap` particles are ever enlarged.
#[derive(Debug, Clone, Copy)]
pub struct HighlightBudget {
    cap: usize,
    used: usize,
}

impl HighlightBudget {
    pub fn new(cap: usize) -> Self {
        Self { cap, used: 0 }
    }

    pub fn try_take(&mut self) -> bool {
        if self.used >= self.cap {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

#[derive(Debug, Clone)]
pub struct WaveField {
    particles: Vec<GridParticle>,
    selection: HighlightSelection,
    amount_y: u32,
    step: f32,
    step_size: f32,
}

impl WaveField {
    pub fn generate<R: Rng + ?Sized>(config: &WaveConfig, rng: &mut R) -> Self {
        let selection =
            HighlightSelection::choose(config.particle_count(), config.highlight_cap, rng);
        Self::with_selection(config, selection, rng)
    }

    /// Build the grid around an existing selection. Indices outside the grid are ignored.
    pub fn with_selection<R: Rng + ?Sized>(
        config: &WaveConfig,
        selection: HighlightSelection,
        rng: &mut R,
    ) -> Self {
        let [half_x, half_z] = {
            let [w, d] = config.extent();
            [w / 2.0, d / 2.0]
        };
        let [min_radius, max_radius] = config.highlight_radius;
        let mut budget = HighlightBudget::new(config.highlight_cap);
        let mut particles = Vec::with_capacity(config.particle_count());

        for x in 0..config.amount_x {
            for y in 0..config.amount_y {
                let index = x as usize * config.amount_y as usize + y as usize;
                let highlighted = selection.contains(index) && budget.try_take();
                let radius = if highlighted {
                    if max_radius > min_radius {
                        rng.gen_range(min_radius..max_radius) as f32
                    } else {
                        min_radius as f32
                    }
                } else {
                    config.radius
                };
                particles.push(GridParticle {
                    index,
                    x,
                    y,
                    position: [
                        x as f32 * config.spacing - half_x,
                        0.0,
                        y as f32 * config.spacing - half_z,
                    ],
                    radius,
                    scale: 1.0,
                    highlighted,
                });
            }
        }
        log::debug!(
            "Generated {} particles, {} highlighted",
            particles.len(),
            budget.used()
        );

        Self {
            particles,
            selection,
            amount_y: config.amount_y,
            step: 0.0,
            step_size: config.step,
        }
    }

    pub fn particles(&self) -> &[GridParticle] {
        &self.particles
    }

    pub fn selection(&self) -> &HighlightSelection {
        &self.selection
    }

    /// Current phase, the value the next [`WaveField::step`] animates with.
    pub fn phase(&self) -> f32 {
        self.step
    }

    pub fn particle(&self, x: u32, y: u32) -> Option<&GridParticle> {
        self.particles
            .get(x as usize * self.amount_y as usize + y as usize)
    }

    /// Animate every particle with the current phase, then advance the phase.
    pub fn step(&mut self) {
        let step = self.step;
        for particle in self.particles.iter_mut() {
            let (x, y) = (particle.x as f32, particle.y as f32);
            particle.position[1] = wave_height(x, y, step);
            if !particle.highlighted {
                particle.scale = wave_scale(x, y, step);
            }
        }
        self.step += self.step_size;
    }
}
