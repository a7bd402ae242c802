use particle_ocean::scene::input::{InputAction, LabelInput};
use winit::keyboard::{Key, NamedKey, SmolStr};

fn character(c: &str) -> Key {
    Key::Character(SmolStr::new(c))
}

#[test]
fn should_collect_typed_text() {
    let mut input = LabelInput::new();
    for c in ["h", "i", "!"] {
        assert_eq!(input.apply_key(&character(c), Some(c)), InputAction::None);
    }
    assert_eq!(input.text(), "hi!");
}

#[test]
fn should_commit_without_clearing() {
    let mut input = LabelInput::new();
    input.push_text("ahoy");
    let action = input.apply_key(&Key::Named(NamedKey::Enter), Some("\r"));
    assert_eq!(action, InputAction::Commit("ahoy".to_string()));
    assert_eq!(input.text(), "ahoy");

    input.clear();
    assert_eq!(input.text(), "");
}

#[test]
fn should_not_commit_empty_buffer() {
    let mut input = LabelInput::new();
    assert_eq!(input.apply_key(&Key::Named(NamedKey::Enter), None), InputAction::None);
}

#[test]
fn should_edit_with_backspace() {
    let mut input = LabelInput::new();
    input.push_text("sea");
    input.apply_key(&Key::Named(NamedKey::Backspace), None);
    assert_eq!(input.text(), "se");
    input.backspace();
    input.backspace();
    input.backspace();
    assert_eq!(input.text(), "");
}

#[test]
fn should_drop_control_characters() {
    let mut input = LabelInput::new();
    input.push_text("a\tb\u{7f}c\n");
    assert_eq!(input.text(), "abc");
    input.apply_key(&Key::Named(NamedKey::Shift), None);
    assert_eq!(input.text(), "abc");
}
