use crate::systems::{input::ActionBindings, ui::context::UiAction};
use bevy::prelude::*;
use enum_map::Enum;
use serde::Deserialize;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum InputAction {
    WidgetNext,
    WidgetBack,
    WidgetMod,
    WidgetPress,
    ValueDown,
    ValueUp,
}

impl UiAction for InputAction {
    const WIDGET_NEXT: Self = Self::WidgetNext;
    const WIDGET_BACK: Self = Self::WidgetBack;
    const WIDGET_MOD: Self = Self::WidgetMod;
    const WIDGET_PRESS: Self = Self::WidgetPress;
    const VALUE_UP: Self = Self::ValueUp;
    const VALUE_DOWN: Self = Self::ValueDown;
}

pub fn default_bindings() -> ActionBindings<InputAction> {
    ActionBindings::new([
        (KeyCode::Tab, InputAction::WidgetNext),
        (KeyCode::Enter, InputAction::WidgetPress),
        (KeyCode::ArrowUp, InputAction::ValueUp),
        (KeyCode::ArrowDown, InputAction::ValueDown),
        (KeyCode::ShiftLeft, InputAction::WidgetMod),
    ])
}
