//! Click and drag dispatch.
use super::{
    context::{UiAction, UiContext},
    widget::{OnClick, OnDrag, ShouldHide, UiElement, UiTraversal, WidgetCallback},
};
use bevy::prelude::*;

fn queue_callback(commands: &mut Commands, callback: &WidgetCallback, entity: Entity) {
    let callback = callback.clone();
    commands.queue(move |world: &mut World| {
        if world.get_entity(entity).is_err() {
            warn!("widget {entity} despawned before its callback ran");
            return;
        }
        callback(world, entity);
    });
}

pub fn handle_clicks<A: UiAction>(
    mut commands: Commands,
    mut roots: Query<(&mut UiContext<A>, &UiTraversal)>,
    widgets: Query<(&UiElement, &OnClick), Without<ShouldHide>>,
) {
    for (mut context, traversal) in &mut roots {
        for &entity in &traversal.0 {
            let Ok((element, on_click)) = widgets.get(entity) else {
                continue;
            };
            context.active_if_mouse_inside(entity, element.rect);

            let confirmed = context.has_focus(entity) && context.pressed(A::WIDGET_PRESS);
            if confirmed || context.is_mouse_click(entity) {
                debug!("click on {entity}");
                context.set_focus(entity);
                queue_callback(&mut commands, &on_click.0, entity);
            }
        }
    }
}

pub fn handle_drags<A: UiAction>(
    mut commands: Commands,
    mut roots: Query<(&mut UiContext<A>, &UiTraversal)>,
    widgets: Query<(&UiElement, &OnDrag), Without<ShouldHide>>,
) {
    for (mut context, traversal) in &mut roots {
        for &entity in &traversal.0 {
            let Ok((element, on_drag)) = widgets.get(entity) else {
                continue;
            };
            context.active_if_mouse_inside(entity, element.rect);

            let confirmed = context.has_focus(entity) && context.pressed(A::WIDGET_PRESS);
            if confirmed || context.is_active(entity) {
                context.set_focus(entity);
                queue_callback(&mut commands, &on_drag.0, entity);
            }
        }
    }
}
