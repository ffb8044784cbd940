//! Immediate-mode declaration layer.
//!
//! Application code declares its widgets every frame through `Imm`, keyed by
//! `mk(parent, index)`. A key maps to the same entity for as long as it keeps
//! being declared, so interaction state survives between frames; widgets that
//! were not declared in a frame are despawned by `sweep_undeclared_widgets`.
//!
//! Declarations run after the interaction systems, so a widget declared for
//! the first time takes part in hit-testing and tabbing from the next frame.
use super::{
    context::UiAction,
    dropdown::{apply_presentation, clamp_selection, toggle_dropdown, DropdownState},
    widget::{
        CheckboxState, ClickLatch, ColorUsage, OnClick, OnDrag, ShouldHide, SkipTabbing,
        SliderHandle, SliderState, UiElement, WidgetColor, WidgetLabel,
    },
    widgets::{drag_slider, move_slider_handles, toggle_checkbox},
};
use bevy::prelude::*;
use std::{
    collections::{HashMap, HashSet},
    marker::PhantomData,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetKey {
    pub parent: Entity,
    pub index: usize,
}

pub const fn mk(parent: Entity, index: usize) -> WidgetKey {
    WidgetKey { parent, index }
}

#[derive(Resource, Debug, Default)]
pub struct ImmediateRegistry {
    widgets: HashMap<WidgetKey, Entity>,
    declared: HashSet<Entity>,
}

impl ImmediateRegistry {
    pub fn get(&self, key: WidgetKey) -> Option<Entity> {
        self.widgets.get(&key).copied()
    }
}

/// Marks widgets owned by the immediate layer.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Immediate;

/// Options handed to an immediate dropdown this frame.
#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
pub struct ImmediateOptions(pub Vec<String>);

/// Option picked since the declaration last looked.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SelectionLatch(pub Option<usize>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentConfig {
    pub label: Option<String>,
    pub rect: Option<Rect>,
    pub color: Option<ColorUsage>,
    pub debug_name: Option<String>,
    pub skip_tabbing: bool,
    pub hidden: bool,
}

impl ComponentConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_color_usage(mut self, color: ColorUsage) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_debug_name(mut self, name: impl Into<String>) -> Self {
        self.debug_name = Some(name.into());
        self
    }

    pub fn with_skip_tabbing(mut self, skip_tabbing: bool) -> Self {
        self.skip_tabbing = skip_tabbing;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

fn latch_click(world: &mut World, entity: Entity) {
    if let Some(mut latch) = world.get_mut::<ClickLatch>(entity) {
        latch.clicked = true;
    }
}

fn click_checkbox(world: &mut World, entity: Entity) {
    toggle_checkbox(world, entity);
    latch_click(world, entity);
}

fn checkbox_label(base: Option<&str>, state: CheckboxState) -> String {
    match base {
        Some(base) => format!("{base} [{}]", state.mark()),
        None => state.mark().to_string(),
    }
}

fn immediate_options(world: &mut World, dropdown: Entity) -> Vec<String> {
    world
        .get::<ImmediateOptions>(dropdown)
        .map(|options| options.0.clone())
        .unwrap_or_default()
}

pub struct Imm<'w, A: UiAction> {
    world: &'w mut World,
    _action: PhantomData<A>,
}

impl<'w, A: UiAction> Imm<'w, A> {
    pub fn new(world: &'w mut World) -> Self {
        world.init_resource::<ImmediateRegistry>();
        Self {
            world,
            _action: PhantomData,
        }
    }

    fn declare(
        &mut self,
        key: WidgetKey,
        kind: &'static str,
        config: &ComponentConfig,
        create: impl FnOnce(&mut World, Entity),
    ) -> Entity {
        let existing = self
            .world
            .resource::<ImmediateRegistry>()
            .get(key)
            .filter(|entity| self.world.get_entity(*entity).is_ok());

        let entity = match existing {
            Some(entity) => entity,
            None => {
                let name = config
                    .debug_name
                    .clone()
                    .unwrap_or_else(|| kind.to_string());
                let entity = self
                    .world
                    .spawn((Immediate, Name::new(name), UiElement::default(), ChildOf(key.parent)))
                    .id();
                create(self.world, entity);
                self.world
                    .resource_mut::<ImmediateRegistry>()
                    .widgets
                    .insert(key, entity);
                debug!("declared {kind} {entity}");
                entity
            }
        };

        self.world
            .resource_mut::<ImmediateRegistry>()
            .declared
            .insert(entity);
        self.apply_config(entity, config);
        entity
    }

    fn apply_config(&mut self, entity: Entity, config: &ComponentConfig) {
        let mut widget = self.world.entity_mut(entity);
        if let Some(rect) = config.rect {
            widget.insert(UiElement::new(rect));
        }
        if let Some(label) = &config.label {
            widget.insert(WidgetLabel::new(label.clone()));
        }
        if let Some(color) = config.color {
            widget.insert(WidgetColor(color));
        }
        if config.skip_tabbing {
            widget.insert(SkipTabbing);
        } else {
            widget.remove::<SkipTabbing>();
        }
        if config.hidden {
            widget.insert(ShouldHide);
        } else {
            widget.remove::<ShouldHide>();
        }
    }

    fn take_click(&mut self, entity: Entity) -> bool {
        self.world
            .get_mut::<ClickLatch>(entity)
            .is_some_and(|mut latch| latch.take())
    }

    /// A container. Containers are never tab stops.
    pub fn div(&mut self, key: WidgetKey, config: ComponentConfig) -> Entity {
        let config = config.with_skip_tabbing(true);
        self.declare(key, "div", &config, |_, _| {})
    }

    /// Returns true on the frame the button was clicked.
    pub fn button(&mut self, key: WidgetKey, config: ComponentConfig) -> bool {
        let entity = self.declare(key, "button", &config, |world, entity| {
            world.entity_mut(entity).insert((
                WidgetColor(ColorUsage::Primary),
                ClickLatch::default(),
                OnClick::new(latch_click),
            ));
        });
        self.take_click(entity)
    }

    /// Mirrors `value`; returns true when a click changed it.
    pub fn checkbox(&mut self, key: WidgetKey, value: &mut bool, config: ComponentConfig) -> bool {
        let entity = self.declare(key, "checkbox", &config, |world, entity| {
            world.entity_mut(entity).insert((
                WidgetColor(ColorUsage::Primary),
                CheckboxState::default(),
                ClickLatch::default(),
                OnClick::new(click_checkbox),
            ));
        });
        let clicked = self.take_click(entity);

        let Some(mut state) = self.world.get_mut::<CheckboxState>(entity) else {
            return false;
        };
        if clicked {
            *value = state.on;
        } else {
            state.on = *value;
        }
        let label = checkbox_label(config.label.as_deref(), *state);
        self.world.entity_mut(entity).insert(WidgetLabel(label));
        clicked
    }

    /// Mirrors `value` in `0.0..=1.0`; returns true when a drag changed it.
    pub fn slider(&mut self, key: WidgetKey, value: &mut f32, config: ComponentConfig) -> bool {
        let initial = *value;
        let entity = self.declare(key, "slider", &config, |world, entity| {
            world.entity_mut(entity).insert((
                WidgetColor(ColorUsage::Secondary),
                SliderState::new(initial),
                OnDrag::new(drag_slider),
            ));
            world.spawn((
                Name::new("slider_handle"),
                UiElement::default(),
                WidgetColor(ColorUsage::Accent),
                SliderHandle,
                SkipTabbing,
                ChildOf(entity),
            ));
        });

        let Some(mut state) = self.world.get_mut::<SliderState>(entity) else {
            return false;
        };
        let changed = std::mem::take(&mut state.changed_since);
        if changed {
            *value = state.value;
        } else {
            state.value = value.clamp(0.0, 1.0);
        }
        let current = state.value;
        move_slider_handles(self.world, entity, current);
        changed
    }

    /// Mirrors the selected index; returns true when an option was picked.
    pub fn dropdown(
        &mut self,
        key: WidgetKey,
        options: &[String],
        selected: &mut usize,
        config: ComponentConfig,
    ) -> bool {
        let entity = self.declare(key, "dropdown", &config, |world, entity| {
            let state = DropdownState::new(immediate_options).with_on_option_changed(
                move |world, index| {
                    if let Some(mut latch) = world.get_mut::<SelectionLatch>(entity) {
                        latch.0 = Some(index);
                    }
                },
            );
            world.entity_mut(entity).insert((
                WidgetColor(ColorUsage::Primary),
                ImmediateOptions::default(),
                SelectionLatch::default(),
                state,
                OnClick::new(toggle_dropdown),
            ));
        });

        if let Some(mut current) = self.world.get_mut::<ImmediateOptions>(entity) {
            if current.0 != options {
                current.0 = options.to_vec();
            }
        }

        let picked = self
            .world
            .get_mut::<SelectionLatch>(entity)
            .and_then(|mut latch| latch.0.take());
        if let Some(index) = picked {
            *selected = index;
            return true;
        }

        let Some(mut state) = self.world.get_mut::<DropdownState>(entity) else {
            return false;
        };
        *selected = clamp_selection(*selected, options.len());
        if state.last_option_clicked != *selected {
            state.last_option_clicked = *selected;
            apply_presentation(self.world, entity);
        }
        false
    }

    /// A row of page buttons; the current page is drawn with the accent color.
    pub fn navigation_bar(
        &mut self,
        key: WidgetKey,
        pages: &[String],
        current: &mut usize,
        config: ComponentConfig,
    ) -> bool {
        let bar_rect = config.rect;
        let bar = self.div(key, config);
        let mut changed = false;
        let count = pages.len().max(1) as f32;

        for (index, page) in pages.iter().enumerate() {
            let color = if index == *current {
                ColorUsage::Accent
            } else {
                ColorUsage::Primary
            };
            let mut page_config = ComponentConfig::default()
                .with_label(page.clone())
                .with_color_usage(color);
            if let Some(bar_rect) = bar_rect {
                let width = bar_rect.width() / count;
                let left = bar_rect.min.x + width * index as f32;
                page_config =
                    page_config.with_rect(Rect::new(left, bar_rect.min.y, left + width, bar_rect.max.y));
            }
            if self.button(mk(bar, index), page_config) {
                *current = index;
                changed = true;
            }
        }
        changed
    }
}

/// Despawns immediate widgets that were not declared since the last sweep.
pub fn sweep_undeclared_widgets(world: &mut World) {
    let stale: Vec<Entity> = {
        let Some(mut registry) = world.get_resource_mut::<ImmediateRegistry>() else {
            return;
        };
        let ImmediateRegistry { widgets, declared } = &mut *registry;
        let mut stale = Vec::new();
        widgets.retain(|_, entity| {
            let keep = declared.contains(entity);
            if !keep {
                stale.push(*entity);
            }
            keep
        });
        declared.clear();
        stale
    };

    for entity in stale {
        if let Ok(widget) = world.get_entity_mut(entity) {
            debug!("sweeping undeclared widget {entity}");
            widget.despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ui::{
        testing::{click_at, context, rect, spawn_root, tap, test_app, TestAction},
        UiSystems,
    };

    #[derive(Resource, Default)]
    struct Screen {
        root: Option<Entity>,
        show_extra: bool,
        clicks: u32,
        checked: bool,
        volume: f32,
        choice: usize,
    }

    fn declare_screen(world: &mut World) {
        let Some(root) = world.resource::<Screen>().root else {
            return;
        };
        let (show_extra, mut checked, mut volume, mut choice) = {
            let screen = world.resource::<Screen>();
            (screen.show_extra, screen.checked, screen.volume, screen.choice)
        };
        let options = vec!["default".to_string(), "option1".to_string()];

        let mut imm = Imm::<TestAction>::new(world);
        let clicked = imm.button(
            mk(root, 0),
            ComponentConfig::default()
                .with_label("go")
                .with_rect(rect(0.0, 0.0, 100.0, 50.0)),
        );
        imm.checkbox(
            mk(root, 1),
            &mut checked,
            ComponentConfig::default().with_rect(rect(0.0, 60.0, 50.0, 50.0)),
        );
        imm.slider(
            mk(root, 2),
            &mut volume,
            ComponentConfig::default().with_rect(rect(0.0, 120.0, 200.0, 20.0)),
        );
        imm.dropdown(
            mk(root, 3),
            &options,
            &mut choice,
            ComponentConfig::default().with_rect(rect(300.0, 0.0, 100.0, 30.0)),
        );
        if show_extra {
            imm.button(
                mk(root, 4),
                ComponentConfig::default().with_rect(rect(500.0, 0.0, 100.0, 50.0)),
            );
        }

        let mut screen = world.resource_mut::<Screen>();
        screen.clicks += u32::from(clicked);
        screen.checked = checked;
        screen.volume = volume;
        screen.choice = choice;
    }

    fn immediate_app() -> (App, Entity) {
        let mut app = test_app();
        app.init_resource::<Screen>()
            .add_systems(Update, declare_screen.in_set(UiSystems::Declare));
        let root = spawn_root(&mut app);
        app.world_mut().resource_mut::<Screen>().root = Some(root);
        (app, root)
    }

    fn widget(app: &App, root: Entity, index: usize) -> Option<Entity> {
        app.world()
            .resource::<ImmediateRegistry>()
            .get(mk(root, index))
    }

    #[test]
    fn declared_widgets_keep_their_entity_between_frames() {
        let (mut app, root) = immediate_app();
        app.update();
        let button = widget(&app, root, 0).unwrap();
        app.update();
        app.update();
        assert_eq!(widget(&app, root, 0), Some(button));
        assert_eq!(app.world().get::<WidgetLabel>(button).unwrap().0, "go");
    }

    #[test]
    fn button_reports_the_click_once() {
        let (mut app, _) = immediate_app();
        app.update();
        click_at(&mut app, 10.0, 10.0);
        assert_eq!(app.world().resource::<Screen>().clicks, 1);
        app.update();
        assert_eq!(app.world().resource::<Screen>().clicks, 1);
    }

    #[test]
    fn widgets_no_longer_declared_are_swept() {
        let (mut app, root) = immediate_app();
        app.world_mut().resource_mut::<Screen>().show_extra = true;
        app.update();
        let extra = widget(&app, root, 4).unwrap();

        app.world_mut().resource_mut::<Screen>().show_extra = false;
        app.update();
        assert!(app.world().get_entity(extra).is_err());
        assert_eq!(widget(&app, root, 4), None);
    }

    #[test]
    fn checkbox_mirrors_the_bound_value_both_ways() {
        let (mut app, root) = immediate_app();
        app.update();
        let check = widget(&app, root, 1).unwrap();

        app.world_mut().resource_mut::<Screen>().checked = true;
        app.update();
        assert!(app.world().get::<CheckboxState>(check).unwrap().on);
        assert_eq!(app.world().get::<WidgetLabel>(check).unwrap().0, "X");

        click_at(&mut app, 10.0, 70.0);
        assert!(!app.world().resource::<Screen>().checked);
        assert_eq!(app.world().get::<WidgetLabel>(check).unwrap().0, " ");
    }

    #[test]
    fn slider_writes_dragged_values_back() {
        let (mut app, _) = immediate_app();
        app.update();
        click_at(&mut app, 100.0, 125.0);
        assert!((app.world().resource::<Screen>().volume - 0.5).abs() < 1e-6);
    }

    #[test]
    fn dropdown_reports_the_picked_option() {
        let (mut app, root) = immediate_app();
        app.update();
        app.update();
        let dropdown = widget(&app, root, 3).unwrap();
        assert_eq!(
            app.world().get::<DropdownState>(dropdown).unwrap().options.len(),
            2
        );

        click_at(&mut app, 310.0, 10.0);
        click_at(&mut app, 310.0, 75.0);
        assert_eq!(app.world().resource::<Screen>().choice, 1);
        assert_eq!(context(&app, root).focus_id, Some(dropdown));
    }

    #[test]
    fn new_widgets_join_tabbing_on_the_next_frame() {
        let (mut app, root) = immediate_app();
        tap(&mut app, TestAction::Next);
        assert_eq!(context(&app, root).focus_id, None);
        app.update();
        assert_eq!(context(&app, root).focus_id, widget(&app, root, 0));
    }
}
