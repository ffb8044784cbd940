//! Dropdowns: a root widget that toggles open and a child per option, kept in
//! step with a data source every frame.
//!
//! Option children are owned by the dropdown through `ChildOf`. Whether an
//! option takes part in traversal while the dropdown is closed is decided by
//! its `DropdownPresentation`, which toggles `ShouldHide` on the children.
use super::{
    context::{focus_widget, UiAction},
    widget::{callback, OnClick, ShouldHide, UiElement, WidgetCallback, WidgetColor, WidgetLabel},
};
use bevy::{ecs::component::Mutable, prelude::*};
use std::{fmt, sync::Arc};

pub type FetchOptions = Arc<dyn Fn(&mut World, Entity) -> Vec<String> + Send + Sync>;
pub type OptionChanged = Arc<dyn Fn(&mut World, usize) + Send + Sync>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DropdownPresentation {
    /// A closed dropdown keeps its selected option visible.
    #[default]
    ShowSelected,
    /// A closed dropdown hides every option.
    HideAll,
}

#[derive(Component)]
#[require(UiElement)]
pub struct DropdownState {
    pub on: bool,
    /// Options the children were last built from.
    pub options: Vec<String>,
    pub last_option_clicked: usize,
    pub presentation: DropdownPresentation,
    fetch_options: FetchOptions,
    on_option_changed: Option<OptionChanged>,
    write_back: Option<OptionChanged>,
}

impl DropdownState {
    pub fn new(
        fetch_options: impl Fn(&mut World, Entity) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            on: false,
            options: Vec::new(),
            last_option_clicked: 0,
            presentation: DropdownPresentation::default(),
            fetch_options: Arc::new(fetch_options),
            on_option_changed: None,
            write_back: None,
        }
    }

    /// A dropdown over a fixed list.
    pub fn from_options<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        Self::new(move |_, _| options.clone())
    }

    /// A dropdown reading from and writing back to the first `P` in the world.
    pub fn with_provider<P: DataProvider>() -> Self {
        let mut state = Self::new(fetch_from_provider::<P>);
        state.write_back = Some(Arc::new(write_to_provider::<P>));
        state
    }

    pub fn with_on_option_changed(
        mut self,
        on_option_changed: impl Fn(&mut World, usize) + Send + Sync + 'static,
    ) -> Self {
        self.on_option_changed = Some(Arc::new(on_option_changed));
        self
    }

    pub const fn with_presentation(mut self, presentation: DropdownPresentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub const fn with_selected(mut self, index: usize) -> Self {
        self.last_option_clicked = index;
        self
    }

    pub fn selected(&self) -> Option<&str> {
        self.options
            .get(self.last_option_clicked)
            .map(String::as_str)
    }

    fn is_option_visible(&self, index: usize) -> bool {
        self.on
            || (self.presentation == DropdownPresentation::ShowSelected
                && index == self.last_option_clicked)
    }
}

impl fmt::Debug for DropdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownState")
            .field("on", &self.on)
            .field("options", &self.options)
            .field("last_option_clicked", &self.last_option_clicked)
            .field("presentation", &self.presentation)
            .finish_non_exhaustive()
    }
}

/// Marks a child built from `DropdownState::options[index]`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownOption {
    pub dropdown: Entity,
    pub index: usize,
}

/// A component that can back a dropdown.
pub trait DataProvider: Component<Mutability = Mutable> {
    type Item: fmt::Display;

    fn fetch_data(&self) -> Vec<Self::Item>;

    fn on_data_changed(&mut self, index: usize);
}

fn fetch_from_provider<P: DataProvider>(world: &mut World, _dropdown: Entity) -> Vec<String> {
    let mut providers = world.query::<&P>();
    providers
        .iter(world)
        .next()
        .map(|provider| {
            provider
                .fetch_data()
                .iter()
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn write_to_provider<P: DataProvider>(world: &mut World, index: usize) {
    let mut providers = world.query::<&mut P>();
    match providers.iter_mut(world).next() {
        Some(mut provider) => provider.on_data_changed(index),
        None => warn!(
            "no {} to receive dropdown selection {index}",
            std::any::type_name::<P>()
        ),
    }
}

pub fn clamp_selection(last_option_clicked: usize, option_count: usize) -> usize {
    last_option_clicked.min(option_count.saturating_sub(1))
}

/// Stacks option `index` directly below the dropdown's own rectangle.
pub fn option_rect(dropdown: Rect, index: usize) -> Rect {
    let height = dropdown.height();
    let top = dropdown.max.y + height * index as f32;
    Rect::new(dropdown.min.x, top, dropdown.max.x, top + height)
}

fn option_children(world: &World, dropdown: Entity) -> Vec<(Entity, usize)> {
    world
        .get::<Children>(dropdown)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| {
                    world
                        .get::<DropdownOption>(child)
                        .map(|option| (child, option.index))
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn apply_presentation(world: &mut World, dropdown: Entity) {
    let Some(state) = world.get::<DropdownState>(dropdown) else {
        return;
    };
    let visibility: Vec<(Entity, bool)> = option_children(world, dropdown)
        .into_iter()
        .map(|(child, index)| (child, state.is_option_visible(index)))
        .collect();

    for (child, visible) in visibility {
        let Ok(mut option) = world.get_entity_mut(child) else {
            continue;
        };
        if visible {
            option.remove::<ShouldHide>();
        } else {
            option.insert(ShouldHide);
        }
    }
}

/// Default click behavior of a dropdown root. Closing hands the selection to
/// the provider, if there is one.
pub fn toggle_dropdown(world: &mut World, dropdown: Entity) {
    let Some(mut state) = world.get_mut::<DropdownState>(dropdown) else {
        return;
    };
    state.on = !state.on;
    let closing = !state.on;
    let selected = state.last_option_clicked;
    let write_back = state.write_back.clone();

    apply_presentation(world, dropdown);
    if closing {
        if let Some(write_back) = write_back {
            write_back(world, selected);
        }
    }
}

fn option_click<A: UiAction>(dropdown: Entity, index: usize) -> WidgetCallback {
    callback(move |world, _option| {
        let Some(state) = world.get::<DropdownState>(dropdown) else {
            warn!("option {index} outlived dropdown {dropdown}");
            return;
        };
        let on_option_changed = state.on_option_changed.clone();
        if let Some(on_option_changed) = on_option_changed {
            on_option_changed(world, index);
        }
        if let Some(mut state) = world.get_mut::<DropdownState>(dropdown) {
            state.last_option_clicked = index;
        }
        let toggle = world.get::<OnClick>(dropdown).map(|on_click| on_click.0.clone());
        if let Some(toggle) = toggle {
            toggle(world, dropdown);
        }
        focus_widget::<A>(world, dropdown);
    })
}

/// Keeps existing option children stacked under the dropdown's current rect.
fn place_options(world: &mut World, dropdown: Entity) {
    let Some(rect) = world.get::<UiElement>(dropdown).map(|element| element.rect) else {
        return;
    };
    for (child, index) in option_children(world, dropdown) {
        let placed = option_rect(rect, index);
        if let Some(mut element) = world.get_mut::<UiElement>(child) {
            if element.rect != placed {
                element.rect = placed;
            }
        }
    }
}

/// Rebuilds the option children of `dropdown` when its data changed, and
/// re-places them otherwise.
pub fn sync_dropdown<A: UiAction>(world: &mut World, dropdown: Entity) {
    let Some(fetch) = world
        .get::<DropdownState>(dropdown)
        .map(|state| state.fetch_options.clone())
    else {
        return;
    };
    let options = fetch(world, dropdown);
    if world
        .get::<DropdownState>(dropdown)
        .is_none_or(|state| state.options == options)
    {
        place_options(world, dropdown);
        return;
    }

    for (child, _) in option_children(world, dropdown) {
        if let Ok(option) = world.get_entity_mut(child) {
            option.despawn();
        }
    }

    let rect = world
        .get::<UiElement>(dropdown)
        .map(|element| element.rect)
        .unwrap_or_default();
    let color = world
        .get::<WidgetColor>(dropdown)
        .copied()
        .unwrap_or_default();
    for (index, label) in options.iter().enumerate() {
        world.spawn((
            UiElement::new(option_rect(rect, index)),
            WidgetLabel::new(label.clone()),
            color,
            DropdownOption { dropdown, index },
            OnClick(option_click::<A>(dropdown, index)),
            ChildOf(dropdown),
        ));
    }

    debug!("dropdown {dropdown} rebuilt with {} options", options.len());
    if let Some(mut state) = world.get_mut::<DropdownState>(dropdown) {
        state.last_option_clicked = clamp_selection(state.last_option_clicked, options.len());
        state.options = options;
    }
    apply_presentation(world, dropdown);
}

pub fn sync_dropdown_options<A: UiAction>(world: &mut World) {
    let mut dropdowns = world.query_filtered::<Entity, With<DropdownState>>();
    let dropdowns: Vec<Entity> = dropdowns.iter(world).collect();
    for dropdown in dropdowns {
        sync_dropdown::<A>(world, dropdown);
    }
}
