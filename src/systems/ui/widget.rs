//! Widget components shared by the interaction systems.
use bevy::prelude::*;
use std::{fmt, sync::Arc};

/// Callback run against the world with the id of the widget that fired it.
///
/// Widgets never hold references to each other; a callback that needs
/// another widget looks it up through the world when it runs.
pub type WidgetCallback = Arc<dyn Fn(&mut World, Entity) + Send + Sync>;

pub fn callback(f: impl Fn(&mut World, Entity) + Send + Sync + 'static) -> WidgetCallback {
    Arc::new(f)
}

/// Marks the top of a widget tree. Interaction state for the tree lives in a
/// `UiContext` on the same entity.
#[derive(Component, Debug, Default, Clone, Copy)]
#[require(UiTraversal)]
pub struct UiRoot;

/// Widgets of a root in traversal order, rebuilt every frame.
#[derive(Component, Debug, Default, Clone)]
pub struct UiTraversal(pub Vec<Entity>);

/// Core tag of every widget: its layout rectangle, already computed.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct UiElement {
    pub rect: Rect,
}

impl UiElement {
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

/// Excludes the widget and its subtree from traversal, hit-testing, and
/// drawing.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ShouldHide;

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SkipTabbing;

#[derive(Component, Clone)]
pub struct OnClick(pub WidgetCallback);

impl OnClick {
    pub fn new(f: impl Fn(&mut World, Entity) + Send + Sync + 'static) -> Self {
        Self(callback(f))
    }
}

impl fmt::Debug for OnClick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnClick(..)")
    }
}

#[derive(Component, Clone)]
pub struct OnDrag(pub WidgetCallback);

impl OnDrag {
    pub fn new(f: impl Fn(&mut World, Entity) + Send + Sync + 'static) -> Self {
        Self(callback(f))
    }
}

impl fmt::Debug for OnDrag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnDrag(..)")
    }
}

#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
pub struct WidgetLabel(pub String);

impl WidgetLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

/// Palette slot a widget is drawn with; the `Theme` resolves it to a color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
pub enum ColorUsage {
    #[default]
    Primary,
    Secondary,
    Accent,
    Background,
    Error,
}

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WidgetColor(pub ColorUsage);

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxState {
    pub on: bool,
}

impl CheckboxState {
    pub fn mark(&self) -> &'static str {
        if self.on {
            "X"
        } else {
            " "
        }
    }
}

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct SliderState {
    pub value: f32,
    /// Set when a drag moved the value; cleared by whoever reads it.
    pub changed_since: bool,
}

impl SliderState {
    pub fn new(value: f32) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            changed_since: false,
        }
    }
}

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SliderHandle;

/// Records clicks for immediate-mode readers that poll once per frame.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ClickLatch {
    pub clicked: bool,
}

impl ClickLatch {
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }
}

/// Walks `ChildOf` links upward to the nearest `UiRoot`.
pub fn root_of(world: &World, entity: Entity) -> Option<Entity> {
    let mut current = entity;
    loop {
        if world.get::<UiRoot>(current).is_some() {
            return Some(current);
        }
        current = world.get::<ChildOf>(current)?.parent();
    }
}
