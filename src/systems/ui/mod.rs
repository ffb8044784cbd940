//! UI interaction core.
//!
//! Each frame runs as a fixed pipeline over every `UiRoot`:
//! - `Begin`: reset hot, snapshot pointer and actions into the `UiContext`
//! - `Sync`: rebuild dropdown options, compute traversal order
//! - `Input`: tabbing, then clicks, then drags
//! - `End`: drop stale focus, roll the active gesture over
//! - `Declare`/`Sweep`: application immediate-mode declarations
//! - `Render`: fill the `DrawList`
pub mod context;
pub mod dropdown;
pub mod frame;
pub mod immediate;
pub mod pointer;
pub mod render;
pub mod tabbing;
pub mod widget;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;


use crate::systems::input::{
    clear_action_edges, map_keys_to_actions, mirror_mouse_button, ActionBindings, PointerInput,
};
use bevy::prelude::*;
use context::UiAction;
use std::marker::PhantomData;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum UiSystems {
    Begin,
    Sync,
    Input,
    End,
    Declare,
    Sweep,
    Render,
}

pub struct UiPlugin<A: UiAction> {
    _action: PhantomData<A>,
}

impl<A: UiAction> Default for UiPlugin<A> {
    fn default() -> Self {
        Self {
            _action: PhantomData,
        }
    }
}

impl<A: UiAction> Plugin for UiPlugin<A> {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>()
            .init_resource::<ButtonInput<A>>()
            .init_resource::<immediate::ImmediateRegistry>()
            .init_resource::<render::Theme>()
            .init_resource::<render::DrawList>()
            .configure_sets(
                Update,
                (
                    UiSystems::Begin,
                    UiSystems::Sync,
                    UiSystems::Input,
                    UiSystems::End,
                    UiSystems::Declare,
                    UiSystems::Sweep,
                    UiSystems::Render,
                )
                    .chain(),
            )
            .add_systems(
                PreUpdate,
                (
                    map_keys_to_actions::<A>.run_if(
                        resource_exists::<ActionBindings<A>>
                            .and(resource_exists::<ButtonInput<KeyCode>>),
                    ),
                    mirror_mouse_button.run_if(resource_exists::<ButtonInput<MouseButton>>),
                ),
            )
            .add_systems(
                Update,
                (
                    frame::begin_ui_context::<A>.in_set(UiSystems::Begin),
                    (dropdown::sync_dropdown_options::<A>, frame::collect_traversal_order)
                        .chain()
                        .in_set(UiSystems::Sync),
                    (
                        tabbing::handle_tabbing::<A>,
                        pointer::handle_clicks::<A>,
                        pointer::handle_drags::<A>,
                    )
                        .chain()
                        .in_set(UiSystems::Input),
                    frame::end_ui_context::<A>.in_set(UiSystems::End),
                    immediate::sweep_undeclared_widgets.in_set(UiSystems::Sweep),
                    render::collect_draw_commands::<A>.in_set(UiSystems::Render),
                ),
            )
            .add_systems(Last, clear_action_edges::<A>);
    }
}
