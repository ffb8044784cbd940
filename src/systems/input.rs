//! Input snapshot plumbing.
//!
//! The interaction core reads two resources each frame: `PointerInput` and a
//! `ButtonInput<A>` of application actions. Real devices feed them through
//! `ActionBindings` and `mirror_mouse_button`; tests and playback write them
//! directly.
use crate::systems::ui::context::UiAction;
use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    pub left_down: bool,
}

/// Keyboard bindings for application actions.
#[derive(Resource, Debug, Clone)]
pub struct ActionBindings<A: UiAction> {
    pub bindings: Vec<(KeyCode, A)>,
}

impl<A: UiAction> ActionBindings<A> {
    pub fn new(bindings: impl IntoIterator<Item = (KeyCode, A)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn with(mut self, key: KeyCode, action: A) -> Self {
        self.bindings.push((key, action));
        self
    }
}

pub fn map_keys_to_actions<A: UiAction>(
    bindings: Res<ActionBindings<A>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut actions: ResMut<ButtonInput<A>>,
) {
    for &(key, action) in &bindings.bindings {
        if keys.just_pressed(key) {
            actions.press(action);
        } else if keys.just_released(key) {
            actions.release(action);
        }
    }
}

pub fn mirror_mouse_button(
    buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerInput>,
) {
    pointer.left_down = buttons.pressed(MouseButton::Left);
}

/// Drops last frame's press and release edges so that a press is reported
/// for exactly one frame.
pub fn clear_action_edges<A: UiAction>(mut actions: ResMut<ButtonInput<A>>) {
    actions.clear();
}
