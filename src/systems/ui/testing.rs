use super::{
    context::{UiAction, UiContext},
    widget::{UiElement, UiRoot},
    UiPlugin,
};
use crate::systems::input::PointerInput;
use bevy::prelude::*;
use enum_map::Enum;
use serde::Deserialize;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TestAction {
    Next,
    Back,
    Mod,
    Press,
    Up,
    Down,
}

impl UiAction for TestAction {
    const WIDGET_NEXT: Self = Self::Next;
    const WIDGET_BACK: Self = Self::Back;
    const WIDGET_MOD: Self = Self::Mod;
    const WIDGET_PRESS: Self = Self::Press;
    const VALUE_UP: Self = Self::Up;
    const VALUE_DOWN: Self = Self::Down;
}

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

pub fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(UiPlugin::<TestAction>::default());
    app
}

pub fn spawn_root(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            UiRoot,
            UiElement::new(rect(0.0, 0.0, 1280.0, 720.0)),
            UiContext::<TestAction>::new(),
        ))
        .id()
}

pub fn context(app: &App, root: Entity) -> &UiContext<TestAction> {
    app.world()
        .get::<UiContext<TestAction>>(root)
        .expect("root carries a context")
}

pub fn set_pointer(app: &mut App, x: f32, y: f32, left_down: bool) {
    let mut pointer = app.world_mut().resource_mut::<PointerInput>();
    pointer.position = Vec2::new(x, y);
    pointer.left_down = left_down;
}

/// Presses `action` for exactly one frame.
pub fn tap(app: &mut App, action: TestAction) {
    app.world_mut()
        .resource_mut::<ButtonInput<TestAction>>()
        .press(action);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<TestAction>>()
        .release(action);
}

/// Moves the pointer, presses, and releases at the same spot over two frames.
pub fn click_at(app: &mut App, x: f32, y: f32) {
    set_pointer(app, x, y, true);
    app.update();
    set_pointer(app, x, y, false);
    app.update();
}
