//! Frame boundary systems: seed the context, order the widgets, close the
//! frame.
use super::{
    context::{PointerSnapshot, UiAction, UiContext},
    widget::{ShouldHide, UiElement, UiRoot, UiTraversal},
};
use crate::systems::input::PointerInput;
use bevy::prelude::*;

pub fn begin_ui_context<A: UiAction>(
    pointer: Res<PointerInput>,
    actions: Res<ButtonInput<A>>,
    mut contexts: Query<&mut UiContext<A>>,
) {
    let snapshot = PointerSnapshot {
        position: pointer.position,
        left_down: pointer.left_down,
    };
    for mut context in &mut contexts {
        context.begin_frame(
            snapshot,
            actions.get_just_pressed().copied(),
            actions.get_pressed().copied(),
        );
    }
}

pub fn end_ui_context<A: UiAction>(mut contexts: Query<&mut UiContext<A>>) {
    for mut context in &mut contexts {
        let previous_focus = context.focus_id;
        context.end_frame();
        if previous_focus != context.focus_id {
            debug!(
                "focus {:?} -> {:?}",
                previous_focus, context.focus_id
            );
        }
    }
}

/// Depth-first pre-order walk of the visible widgets below `entity`.
///
/// Children without a `UiElement` are not widgets and are skipped together
/// with their subtrees, as are hidden widgets.
pub fn push_visible_subtree(
    entity: Entity,
    children: &Query<&Children>,
    nodes: &Query<Has<ShouldHide>, With<UiElement>>,
    out: &mut Vec<Entity>,
) {
    let Ok(kids) = children.get(entity) else {
        return;
    };
    for child in kids.iter() {
        if let Ok(false) = nodes.get(child) {
            out.push(child);
            push_visible_subtree(child, children, nodes, out);
        }
    }
}

pub fn collect_traversal_order(
    mut roots: Query<(Entity, &mut UiTraversal), With<UiRoot>>,
    children: Query<&Children>,
    nodes: Query<Has<ShouldHide>, With<UiElement>>,
) {
    for (root, mut traversal) in &mut roots {
        traversal.0.clear();
        push_visible_subtree(root, &children, &nodes, &mut traversal.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ui::{
        context::ActiveWidget,
        testing::{context, rect, spawn_root, test_app},
    };

    #[test]
    fn traversal_is_preorder_and_skips_hidden_subtrees() {
        let mut app = test_app();
        let root = spawn_root(&mut app);
        let world = app.world_mut();

        let a = world
            .spawn((UiElement::new(rect(0.0, 0.0, 10.0, 10.0)), ChildOf(root)))
            .id();
        let a_child = world
            .spawn((UiElement::new(rect(0.0, 0.0, 5.0, 5.0)), ChildOf(a)))
            .id();
        let hidden = world
            .spawn((
                UiElement::new(rect(20.0, 0.0, 10.0, 10.0)),
                ShouldHide,
                ChildOf(root),
            ))
            .id();
        world.spawn((UiElement::new(rect(20.0, 0.0, 5.0, 5.0)), ChildOf(hidden)));
        let plain = world.spawn(ChildOf(root)).id();
        world.spawn((UiElement::new(rect(40.0, 0.0, 5.0, 5.0)), ChildOf(plain)));
        let b = world
            .spawn((UiElement::new(rect(60.0, 0.0, 10.0, 10.0)), ChildOf(root)))
            .id();

        app.update();

        let traversal = app.world().get::<UiTraversal>(root).unwrap();
        assert_eq!(traversal.0, vec![a, a_child, b]);
    }

    #[test]
    fn begin_seeds_the_snapshot_and_end_rolls_active_over() {
        let mut app = test_app();
        let root = spawn_root(&mut app);
        {
            let mut pointer = app.world_mut().resource_mut::<PointerInput>();
            pointer.position = Vec2::new(3.0, 4.0);
            pointer.left_down = true;
        }
        app.update();

        let context = context(&app, root);
        assert_eq!(context.mouse_pos, Vec2::new(3.0, 4.0));
        assert_eq!(context.active_id, ActiveWidget::Blocked);
    }
}
