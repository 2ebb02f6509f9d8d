use super::*;

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Default::default() }.command());
}

#[test]
fn key_matches_case_insensitively() {
    assert!(Key::new("Z").is("z"));
    assert!(Key::new("Delete").is("delete"));
    assert!(!Key::new("x").is("z"));
}

#[test]
fn default_gesture_is_idle() {
    let g = GestureState::default();
    assert!(g.is_idle());
    assert_eq!(g.name(), "idle");
}

#[test]
fn gesture_names() {
    let panning = GestureState::Panning { start_screen: Point::default(), start_pan: Point::default() };
    assert_eq!(panning.name(), "panning");
    assert!(!panning.is_idle());

    let selecting = GestureState::Selecting { start_screen: Point::default(), current_screen: Point::default() };
    assert_eq!(selecting.name(), "selecting");
}

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert!(ui.selection.is_empty());
    assert!(ui.guides.is_empty());
    assert!(ui.marquee.is_none());
    assert!(!ui.batch_mode && !ui.deselect_mode && !ui.alt_held);
}
