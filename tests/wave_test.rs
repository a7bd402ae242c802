use std::collections::HashSet;

use particle_ocean::{
    config::WaveConfig,
    scene::wave::{HighlightBudget, HighlightSelection, WaveField, wave_height, wave_scale},
};
use rand::{SeedableRng, rngs::StdRng};

fn grid(amount_x: u32, amount_y: u32) -> WaveConfig {
    WaveConfig {
        amount_x,
        amount_y,
        ..Default::default()
    }
}

#[test]
fn should_generate_one_particle_per_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    for (x, y) in [(1, 1), (3, 5), (10, 2), (80, 80)] {
        let field = WaveField::generate(&grid(x, y), &mut rng);
        let particles = field.particles();
        assert_eq!(particles.len(), (x * y) as usize);

        let indices: HashSet<usize> = particles.iter().map(|p| p.index).collect();
        assert_eq!(indices.len(), particles.len());
        for p in particles {
            assert_eq!(p.index, (p.x * y + p.y) as usize);
        }
        assert!(particles.iter().filter(|p| p.highlighted).count() <= 40);
    }
}

#[test]
fn should_place_particles_centred_on_origin() {
    let mut rng = StdRng::seed_from_u64(1);
    let field = WaveField::generate(&WaveConfig::default(), &mut rng);
    let first = field.particle(0, 0).unwrap();
    assert_eq!(first.position, [-4000.0, 0.0, -4000.0]);
    let last = field.particle(79, 79).unwrap();
    assert_eq!(last.position, [3900.0, 0.0, 3900.0]);
    let cell = field.particle(2, 3).unwrap();
    assert_eq!(cell.index, 2 * 80 + 3);
}

#[test]
fn should_select_at_most_forty_unique_indices_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    for total in [0usize, 1, 39, 40, 41, 6400] {
        let selection = HighlightSelection::choose(total, 40, &mut rng);
        assert_eq!(selection.len(), total.min(40));
        let unique: HashSet<usize> = selection.indices().iter().copied().collect();
        assert_eq!(unique.len(), selection.len());
        assert!(selection.indices().iter().all(|i| *i < total));
    }
}

#[test]
fn should_mark_exactly_the_selected_particles() {
    let mut rng = StdRng::seed_from_u64(3);
    let field = WaveField::generate(&WaveConfig::default(), &mut rng);
    let highlighted: HashSet<usize> = field
        .particles()
        .iter()
        .filter(|p| p.highlighted)
        .map(|p| p.index)
        .collect();
    let selected: HashSet<usize> = field.selection().indices().iter().copied().collect();
    assert_eq!(highlighted, selected);
    assert_eq!(highlighted.len(), 40);

    for p in field.particles() {
        if p.highlighted {
            assert!((100.0..150.0).contains(&p.radius), "radius {}", p.radius);
            assert_eq!(p.radius.fract(), 0.0);
        } else {
            assert_eq!(p.radius, 5.0);
        }
    }
}

#[test]
fn should_cap_highlights_even_for_oversized_selection() {
    let mut rng = StdRng::seed_from_u64(9);
    let config = grid(10, 10);
    let selection = HighlightSelection::from_indices((0..100).collect());
    let field = WaveField::with_selection(&config, selection, &mut rng);
    assert_eq!(field.particles().iter().filter(|p| p.highlighted).count(), 40);
}

#[test]
fn should_exhaust_budget() {
    let mut budget = HighlightBudget::new(2);
    assert!(budget.try_take());
    assert!(budget.try_take());
    assert!(!budget.try_take());
    assert_eq!(budget.used(), 2);
}

#[test]
fn should_compute_wave_deterministically() {
    for (x, y, step) in [(0.0, 0.0, 0.0), (3.0, 7.0, 1.3), (79.0, 12.0, 250.7)] {
        assert_eq!(wave_height(x, y, step), wave_height(x, y, step));
        assert_eq!(wave_scale(x, y, step), wave_scale(x, y, step));
    }
    assert_eq!(wave_height(0.0, 0.0, 0.0), 0.0);
    assert_eq!(wave_scale(0.0, 0.0, 0.0), 4.0);
    let expected = (0.3f32).sin() * 50.0 + (0.5f32).sin() * 50.0;
    assert!((wave_height(1.0, 1.0, 0.0) - expected).abs() < 1e-4);
}

#[test]
fn should_step_with_previous_phase_then_advance() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = WaveField::generate(&grid(10, 10), &mut rng);
    assert_eq!(field.phase(), 0.0);

    field.step();
    assert!((field.phase() - 0.1).abs() < 1e-6);
    for p in field.particles() {
        assert_eq!(p.position[1], wave_height(p.x as f32, p.y as f32, 0.0));
    }

    field.step();
    for p in field.particles() {
        assert_eq!(p.position[1], wave_height(p.x as f32, p.y as f32, 0.1));
        if !p.highlighted {
            assert_eq!(p.scale, wave_scale(p.x as f32, p.y as f32, 0.1));
        }
    }
}

#[test]
fn should_never_scale_highlighted_particles() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut field = WaveField::generate(&grid(8, 8), &mut rng);
    let before: Vec<(usize, f32, f32)> = field
        .particles()
        .iter()
        .filter(|p| p.highlighted)
        .map(|p| (p.index, p.scale, p.render_scale()))
        .collect();
    assert!(!before.is_empty());

    for _ in 0..100 {
        field.step();
    }
    for (index, scale, render_scale) in before {
        let p = &field.particles()[index];
        assert_eq!(p.scale, scale);
        assert_eq!(p.render_scale(), render_scale);
        assert_eq!(p.render_scale(), p.radius);
    }
}

#[test]
fn should_scale_ordinary_particles_by_radius() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut field = WaveField::generate(&grid(10, 10), &mut rng);
    field.step();
    field.step();
    for p in field.particles().iter().filter(|p| !p.highlighted) {
        assert_eq!(p.render_scale(), 5.0 * p.scale);
    }
}
