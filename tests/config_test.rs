use particle_ocean::config::{SceneConfig, parse_hex_color, srgb_to_linear};

#[test]
fn should_fill_missing_sections_with_defaults() {
    let config = SceneConfig::from_json(
        r##"{
            "wave": { "amount_x": 20, "highlight_cap": 5 },
            "labels": { "fonts": ["Other"] },
            "background": "#000000"
        }"##,
    )
    .unwrap();
    assert_eq!(config.wave.amount_x, 20);
    assert_eq!(config.wave.amount_y, 80);
    assert_eq!(config.wave.highlight_cap, 5);
    assert_eq!(config.wave.spacing, 100.0);
    assert_eq!(config.labels.fonts, vec!["Other".to_string()]);
    assert_eq!(config.labels.storage_key, "messages");
    assert_eq!(config.fish.count, 15);
    assert_eq!(config.pyramids.count, 12);
    assert_eq!(config.camera.initial_target, [220.0, -487.0]);
}

#[test]
fn should_use_documented_defaults() {
    let config = SceneConfig::default();
    assert_eq!(config.wave.particle_count(), 6400);
    assert_eq!(config.wave.extent(), [8000.0, 8000.0]);
    assert_eq!(config.wave.scatter(0.0, 1.0), [-4000.0, 4000.0]);
    assert_eq!(config.wave.highlight_radius, [100, 150]);
    assert_eq!(config.fish.depth, [-1250.0, -1000.0]);
    assert_eq!(config.pyramids.y, 1200.0);
    assert_eq!(config.labels.marker, "#");
    assert_eq!(config.background_colour(), wgpu::Color::BLACK);
}

#[test]
fn should_reject_malformed_config() {
    assert!(SceneConfig::from_json("{ \"wave\": { \"amount_x\": \"many\" } }").is_err());
}

#[test]
fn should_parse_hex_colours_to_linear() {
    assert_eq!(parse_hex_color("#000000").unwrap(), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(parse_hex_color("#FFFFFF").unwrap(), [1.0, 1.0, 1.0, 1.0]);
    let [r, g, b, a] = parse_hex_color("#ffe25480").unwrap();
    assert_eq!(r, 1.0);
    assert!(g > b && b > 0.0);
    assert!((a - 128.0 / 255.0).abs() < 1e-6);

    assert!(parse_hex_color("#FFF").is_err());
    assert!(parse_hex_color("#GGGGGG").is_err());
    assert!(parse_hex_color("").is_err());
}

#[test]
fn should_convert_srgb_to_linear() {
    assert_eq!(srgb_to_linear(0.0), 0.0);
    assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    assert!((srgb_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-7);
    assert!((srgb_to_linear(0.5) - 0.214_041).abs() < 1e-4);
}
