//! Per-root interaction state.
//!
//! `UiContext` is the single authority for which widget is hot (under the
//! pointer this frame), active (owns the current press gesture) and focused
//! (receives keyboard confirm). It also carries the frame's input snapshot so
//! that every query against it is consistent for the whole frame.
use super::widget::root_of;
use bevy::prelude::*;
use enum_map::{Enum, EnumArray, EnumMap};
use std::{collections::HashSet, fmt::Debug, hash::Hash};

/// Discrete input actions understood by the interaction core.
///
/// Applications define their own action enum and name which variants play
/// each navigation role. Per-frame pressed and held flags are kept in an
/// `EnumMap` over the enum, so it may have any number of variants.
pub trait UiAction:
    Enum + EnumArray<bool, Array: Send + Sync> + Copy + Eq + Hash + Debug + Send + Sync + 'static
{
    const WIDGET_NEXT: Self;
    const WIDGET_BACK: Self;
    const WIDGET_MOD: Self;
    const WIDGET_PRESS: Self;
    const VALUE_UP: Self;
    const VALUE_DOWN: Self;
}

/// Owner of the current pointer gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveWidget {
    #[default]
    Idle,
    Widget(Entity),
    /// The button went down over nothing; no widget may claim the gesture
    /// until it is released.
    Blocked,
}

/// Pointer half of the frame snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSnapshot {
    pub position: Vec2,
    pub left_down: bool,
}

#[derive(Component, Debug)]
pub struct UiContext<A: UiAction> {
    pub hot_id: Option<Entity>,
    pub active_id: ActiveWidget,
    pub focus_id: Option<Entity>,
    pub focused_ids: HashSet<Entity>,
    pub last_processed: Option<Entity>,
    pub mouse_pos: Vec2,
    pub mouse_left_down: bool,
    pressed: EnumMap<A, bool>,
    held: EnumMap<A, bool>,
}

impl<A: UiAction> Default for UiContext<A> {
    fn default() -> Self {
        Self {
            hot_id: None,
            active_id: ActiveWidget::Idle,
            focus_id: None,
            focused_ids: HashSet::new(),
            last_processed: None,
            mouse_pos: Vec2::ZERO,
            mouse_left_down: false,
            pressed: EnumMap::default(),
            held: EnumMap::default(),
        }
    }
}

/// Half-open containment: the right and bottom edges belong to the
/// neighbouring rectangle.
pub fn rect_contains(rect: Rect, point: Vec2) -> bool {
    point.x >= rect.min.x && point.x < rect.max.x && point.y >= rect.min.y && point.y < rect.max.y
}

impl<A: UiAction> UiContext<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the frame: hot and the focus registry start empty, and the input
    /// snapshot replaces whatever was left unconsumed last frame.
    pub fn begin_frame(
        &mut self,
        pointer: PointerSnapshot,
        pressed: impl IntoIterator<Item = A>,
        held: impl IntoIterator<Item = A>,
    ) {
        self.hot_id = None;
        self.focused_ids.clear();
        self.mouse_pos = pointer.position;
        self.mouse_left_down = pointer.left_down;
        self.pressed = EnumMap::default();
        for action in pressed {
            self.pressed[action] = true;
        }
        self.held = EnumMap::default();
        for action in held {
            self.held[action] = true;
        }
    }

    pub fn end_frame(&mut self) {
        if self
            .focus_id
            .is_some_and(|focus| !self.focused_ids.contains(&focus))
        {
            self.focus_id = None;
        }

        if self.mouse_left_down {
            if self.active_id == ActiveWidget::Idle {
                self.active_id = ActiveWidget::Blocked;
            }
        } else {
            self.active_id = ActiveWidget::Idle;
        }
    }

    pub fn is_hot(&self, id: Entity) -> bool {
        self.hot_id == Some(id)
    }

    pub fn is_active(&self, id: Entity) -> bool {
        self.active_id == ActiveWidget::Widget(id)
    }

    pub fn has_focus(&self, id: Entity) -> bool {
        self.focus_id == Some(id)
    }

    pub fn set_hot(&mut self, id: Entity) {
        self.hot_id = Some(id);
    }

    pub fn set_active(&mut self, id: Entity) {
        self.active_id = ActiveWidget::Widget(id);
    }

    pub fn set_focus(&mut self, id: Entity) {
        self.focus_id = Some(id);
    }

    pub fn is_mouse_inside(&self, rect: Rect) -> bool {
        rect_contains(rect, self.mouse_pos)
    }

    pub fn active_if_mouse_inside(&mut self, id: Entity, rect: Rect) {
        if !self.is_mouse_inside(rect) {
            return;
        }
        self.set_hot(id);
        if self.active_id == ActiveWidget::Idle && self.mouse_left_down {
            self.set_active(id);
        }
    }

    pub fn is_mouse_click(&self, id: Entity) -> bool {
        !self.mouse_left_down && self.is_hot(id) && self.is_active(id)
    }

    /// Registers `id` as focusable this frame and hands it focus when nobody
    /// holds it.
    pub fn try_to_grab(&mut self, id: Entity) {
        self.focused_ids.insert(id);
        if self.focus_id.is_none() {
            self.focus_id = Some(id);
        }
    }

    pub fn process_tabbing(&mut self, id: Entity) {
        if self.has_focus(id) {
            if self.pressed(A::WIDGET_NEXT) || self.pressed(A::VALUE_DOWN) {
                self.focus_id = if self.is_held_down(A::WIDGET_MOD) {
                    self.last_processed
                } else {
                    None
                };
            } else if self.pressed(A::VALUE_UP) || self.pressed(A::WIDGET_BACK) {
                self.focus_id = self.last_processed;
            }
        }
        self.last_processed = Some(id);
    }

    /// True once per frame for an action pressed this frame.
    pub fn pressed(&mut self, action: A) -> bool {
        std::mem::take(&mut self.pressed[action])
    }

    /// True once per frame for an action held this frame.
    pub fn is_held_down(&mut self, action: A) -> bool {
        std::mem::take(&mut self.held[action])
    }
}

/// Gives focus to `widget` in the context of the tree it belongs to.
pub fn focus_widget<A: UiAction>(world: &mut World, widget: Entity) {
    let Some(root) = root_of(world, widget) else {
        warn!("widget {widget} is not attached to a ui root");
        return;
    };
    if let Some(mut context) = world.get_mut::<UiContext<A>>(root) {
        context.set_focus(widget);
    }
}
