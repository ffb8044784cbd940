//! Retained widget bundles. Spawn them under a `UiRoot` (or any widget) with
//! `ChildOf`.
use super::{
    dropdown::{toggle_dropdown, DataProvider, DropdownState},
    widget::{
        CheckboxState, ColorUsage, OnClick, OnDrag, SkipTabbing, SliderHandle, SliderState,
        UiElement, WidgetColor, WidgetLabel,
    },
};
use crate::systems::input::PointerInput;
use bevy::prelude::*;

pub const BUTTON_SIZE: Vec2 = Vec2::new(100.0, 50.0);
const HANDLE_FRACTION: f32 = 0.25;

pub fn button(
    rect: Rect,
    label: impl Into<String>,
    on_click: impl Fn(&mut World, Entity) + Send + Sync + 'static,
) -> impl Bundle {
    (
        Name::new("button"),
        UiElement::new(rect),
        WidgetColor(ColorUsage::Primary),
        WidgetLabel::new(label),
        OnClick::new(on_click),
    )
}

pub fn toggle_checkbox(world: &mut World, entity: Entity) {
    let Some(mut state) = world.get_mut::<CheckboxState>(entity) else {
        return;
    };
    state.on = !state.on;
    let mark = state.mark();
    if let Some(mut label) = world.get_mut::<WidgetLabel>(entity) {
        label.0 = mark.to_string();
    }
}

pub fn checkbox(rect: Rect, on: bool) -> impl Bundle {
    let state = CheckboxState { on };
    (
        Name::new("checkbox"),
        UiElement::new(rect),
        WidgetColor(ColorUsage::Primary),
        WidgetLabel::new(state.mark()),
        state,
        OnClick::new(toggle_checkbox),
    )
}

/// Handle position for `value` inside `track`.
pub fn handle_rect(track: Rect, value: f32) -> Rect {
    let width = track.width() * HANDLE_FRACTION;
    let left = track.min.x + value.clamp(0.0, 1.0) * (track.width() - width);
    Rect::new(left, track.min.y, left + width, track.max.y)
}

/// Drag behavior of a slider: the pointer's horizontal offset within the
/// track becomes the value.
pub fn drag_slider(world: &mut World, entity: Entity) {
    let Some(pointer) = world.get_resource::<PointerInput>().map(|p| p.position) else {
        return;
    };
    let Some(track) = world.get::<UiElement>(entity).map(|element| element.rect) else {
        return;
    };
    let value = if track.width() > 0.0 {
        ((pointer.x - track.min.x) / track.width()).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let Some(mut state) = world.get_mut::<SliderState>(entity) else {
        return;
    };
    if state.value == value {
        return;
    }
    state.value = value;
    state.changed_since = true;
    move_slider_handles(world, entity, value);
}

/// Places every `SliderHandle` child of `slider` at `value`.
pub fn move_slider_handles(world: &mut World, slider: Entity, value: f32) {
    let Some(track) = world.get::<UiElement>(slider).map(|element| element.rect) else {
        return;
    };
    let handles: Vec<Entity> = world
        .get::<Children>(slider)
        .map(|children| {
            children
                .iter()
                .filter(|child| world.get::<SliderHandle>(*child).is_some())
                .collect()
        })
        .unwrap_or_default();
    for handle in handles {
        if let Some(mut element) = world.get_mut::<UiElement>(handle) {
            element.rect = handle_rect(track, value);
        }
    }
}

pub fn slider(rect: Rect, value: f32) -> impl Bundle {
    let state = SliderState::new(value);
    (
        Name::new("slider"),
        UiElement::new(rect),
        WidgetColor(ColorUsage::Secondary),
        state,
        OnDrag::new(drag_slider),
        children![(
            Name::new("slider_handle"),
            UiElement::new(handle_rect(rect, state.value)),
            WidgetColor(ColorUsage::Accent),
            SliderHandle,
            SkipTabbing,
        )],
    )
}

pub fn dropdown(rect: Rect, state: DropdownState) -> impl Bundle {
    (
        Name::new("dropdown"),
        UiElement::new(rect),
        WidgetColor(ColorUsage::Primary),
        state,
        OnClick::new(toggle_dropdown),
    )
}

pub fn provider_dropdown<P: DataProvider>(rect: Rect) -> impl Bundle {
    dropdown(rect, DropdownState::with_provider::<P>())
}
