use super::{
    context::{UiAction, UiContext},
    widget::{ShouldHide, SkipTabbing, UiElement, UiTraversal},
};
use bevy::prelude::*;

type Tabbable = (With<UiElement>, Without<SkipTabbing>, Without<ShouldHide>);

/// Keyboard focus traversal over each root's widgets in traversal order.
pub fn handle_tabbing<A: UiAction>(
    mut roots: Query<(&mut UiContext<A>, &UiTraversal)>,
    widgets: Query<(), Tabbable>,
) {
    for (mut context, traversal) in &mut roots {
        for &entity in &traversal.0 {
            if !widgets.contains(entity) {
                continue;
            }
            context.try_to_grab(entity);
            context.process_tabbing(entity);
        }
    }
}
