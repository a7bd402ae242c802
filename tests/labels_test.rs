use std::{cell::Cell, sync::Arc};

use particle_ocean::{
    config::{LabelConfig, WaveConfig},
    resources::font::{FontCache, Typeface},
    scene::{
        SceneState,
        labels::{LabelManager, build_label_geometry},
    },
    storage::{KeyValueStore, Label, LabelStore, MemoryStore, StoreError},
};
use rand::{SeedableRng, rngs::StdRng};

const TYPEFACE: &str = r#"{
    "glyphs": {
        "o": { "ha": 120, "o": "m 0 0 l 0 100 l 100 100 l 100 0 m 25 25 l 75 25 l 75 75 l 25 75 " },
        "?": { "ha": 60, "o": "m 0 0 l 0 50 l 50 50 l 50 0 " },
        " ": { "ha": 40 }
    },
    "familyName": "Test Sans",
    "underlineThickness": 5,
    "boundingBox": { "yMin": -10, "xMin": 0, "yMax": 95, "xMax": 120 },
    "resolution": 100
}"#;

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

fn config() -> LabelConfig {
    LabelConfig {
        fonts: vec!["Test Sans".to_string()],
        ..Default::default()
    }
}

fn manager(backend: Arc<dyn KeyValueStore>) -> LabelManager {
    let fonts = FontCache::new();
    fonts.insert("Test Sans", Typeface::from_json(TYPEFACE).unwrap());
    let store = Arc::new(LabelStore::new(backend, "messages"));
    LabelManager::new(store, fonts, config(), WaveConfig::default())
}

#[test]
fn should_store_new_label_with_marker() {
    let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let labels = manager(backend.clone());
    let mut rng = StdRng::seed_from_u64(1);
    let stored = Cell::new(false);

    let pending = labels
        .add_new("hello", &mut rng, || stored.set(true))
        .unwrap()
        .unwrap();
    assert!(stored.get());
    assert_eq!(pending.label.message, "#hello");
    assert_eq!(pending.label.font, "Test Sans");
    assert_eq!(labels.store().load(), vec![pending.label.clone()]);

    // a second store over the same backend sees the label, as after a restart
    let reloaded = LabelStore::new(backend, "messages");
    assert_eq!(reloaded.load().len(), 1);
}

#[test]
fn should_keep_labels_in_insertion_order() {
    let labels = manager(Arc::new(MemoryStore::new()));
    let mut rng = StdRng::seed_from_u64(2);
    labels.add_new("a", &mut rng, || ()).unwrap();
    labels.add_new("b", &mut rng, || ()).unwrap();

    let messages: Vec<String> = labels
        .store()
        .load()
        .into_iter()
        .map(|l| l.message)
        .collect();
    assert_eq!(messages, vec!["#a", "#b"]);
}

#[test]
fn should_place_labels_above_the_grid() {
    let labels = manager(Arc::new(MemoryStore::new()));
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let pending = labels.add_new("x", &mut rng, || ()).unwrap().unwrap();
        let [x, y, z] = pending.position;
        assert!((-3900.0..4100.0).contains(&x), "x {}", x);
        assert!((0.0..300.0).contains(&y), "y {}", y);
        assert!((-4000.0..4000.0).contains(&z), "z {}", z);
    }
}

#[test]
fn should_ignore_empty_input() {
    let labels = manager(Arc::new(MemoryStore::new()));
    let mut rng = StdRng::seed_from_u64(4);
    let called = Cell::new(false);
    assert_eq!(labels.add_new("", &mut rng, || called.set(true)).unwrap(), None);
    assert!(!called.get());
    assert!(labels.store().load().is_empty());
}

#[test]
fn should_store_whitespace_message() {
    let labels = manager(Arc::new(MemoryStore::new()));
    let mut rng = StdRng::seed_from_u64(4);
    let called = Cell::new(false);
    let pending = labels
        .add_new("  ", &mut rng, || called.set(true))
        .unwrap()
        .unwrap();
    assert!(called.get());
    assert_eq!(pending.label.message, "#  ");
    assert_eq!(labels.store().load().len(), 1);
}

#[test]
fn should_not_confirm_failed_write() {
    let labels = manager(Arc::new(BrokenStore));
    let mut rng = StdRng::seed_from_u64(5);
    let called = Cell::new(false);
    let result = labels.add_new("lost", &mut rng, || called.set(true));
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    assert!(!called.get());
}

struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unplugged")))
    }

    fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
        panic!("an unreadable store must not be overwritten");
    }
}

#[test]
fn should_not_overwrite_unreadable_labels() {
    let labels = manager(Arc::new(UnreadableStore));
    let mut rng = StdRng::seed_from_u64(5);
    let called = Cell::new(false);
    let result = labels.add_new("kept", &mut rng, || called.set(true));
    assert!(matches!(result, Err(StoreError::Io(_))));
    assert!(!called.get());
}

#[test]
fn should_read_corrupted_value_as_empty() {
    let backend = Arc::new(MemoryStore::new());
    backend.set("messages", "{ not json").unwrap();
    let store = LabelStore::new(backend.clone(), "messages");
    assert!(store.load().is_empty());

    // appending replaces the broken value with a valid list
    let count = store
        .append(Label {
            message: "#fresh".to_string(),
            font: "Test Sans".to_string(),
        })
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(store.load()[0].message, "#fresh");
}

#[test]
fn should_restore_stored_labels_at_startup() {
    let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = LabelStore::new(backend.clone(), "messages");
    for message in ["#one", "#two", "#three"] {
        store
            .append(Label {
                message: message.to_string(),
                font: "Test Sans".to_string(),
            })
            .unwrap();
    }

    let labels = manager(backend);
    let mut rng = StdRng::seed_from_u64(6);
    let pending = labels.load_at_startup(&mut rng);
    let messages: Vec<&str> = pending.iter().map(|p| p.label.message.as_str()).collect();
    assert_eq!(messages, vec!["#one", "#two", "#three"]);
}

#[test]
fn should_build_label_into_scene_state() {
    let labels = manager(Arc::new(MemoryStore::new()));
    let mut rng = StdRng::seed_from_u64(7);
    let pending = labels.add_new("o o", &mut rng, || ()).unwrap().unwrap();

    let mutation = futures::executor::block_on(Box::into_pin(labels.build(pending.clone())));
    let mut state = SceneState::default();
    mutation(&mut state);

    assert_eq!(state.pending_labels.len(), 1);
    let placed = &state.pending_labels[0];
    assert_eq!(placed.label, pending.label);
    assert_eq!(placed.position, pending.position);
    assert!(placed.geometry.triangle_count() > 0);
}

#[test]
fn should_skip_label_with_unknown_font() {
    let labels = manager(Arc::new(MemoryStore::new()));
    let mut rng = StdRng::seed_from_u64(8);
    let mut pending = labels.add_new("o", &mut rng, || ()).unwrap().unwrap();
    pending.label.font = "No Such Font".to_string();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mutation = runtime.block_on(Box::into_pin(labels.build(pending)));
    let mut state = SceneState::default();
    mutation(&mut state);
    assert!(state.pending_labels.is_empty());
}

#[test]
fn should_extrude_label_to_configured_depth() {
    let typeface = Typeface::from_json(TYPEFACE).unwrap();
    let geometry = build_label_geometry(&typeface, "#o", &config()).unwrap();
    assert!(geometry.positions.iter().all(|p| p[2] == 0.0 || p[2] == 50.0));
    assert!(build_label_geometry(&typeface, "   ", &config()).is_err());
}
