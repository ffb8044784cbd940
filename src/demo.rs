//! Widget gallery wired to the keyboard and to scripted playback.
pub mod actions;
pub mod gallery;
pub mod resolutions;

use crate::{
    io::playback::PlaybackConfig,
    systems::ui::{
        context::UiContext,
        widget::{UiElement, UiRoot},
        widgets::provider_dropdown,
        UiPlugin, UiSystems,
    },
};
use actions::{default_bindings, InputAction};
use bevy::prelude::*;
use gallery::{declare_gallery, rect, ButtonStyle, DemoState, BUTTONS_PAGE, SCREEN};
use resolutions::AvailableResolutions;

pub struct DemoPlugin;

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(UiPlugin::<InputAction>::default())
            .insert_resource(default_bindings())
            .init_resource::<DemoState>()
            .add_systems(Startup, spawn_demo)
            .add_systems(Update, declare_gallery.in_set(UiSystems::Declare));
    }
}

fn spawn_demo(
    mut commands: Commands,
    mut state: ResMut<DemoState>,
    playback: Option<Res<PlaybackConfig<InputAction>>>,
) {
    commands.spawn((Name::new("settings"), AvailableResolutions::default()));

    let root = commands
        .spawn((
            Name::new("root"),
            UiRoot,
            UiElement::new(SCREEN),
            UiContext::<InputAction>::new(),
        ))
        .id();
    commands
        .spawn((
            provider_dropdown::<AvailableResolutions>(rect(1080.0, 60.0, 160.0, 30.0)),
            ChildOf(root),
        ))
        .insert(Name::new("resolution"));

    state.root = Some(root);
    if playback.is_some_and(|config| ButtonStyle::is_customized(&config)) {
        state.page = BUTTONS_PAGE;
    }
}
