//! The demo screen, declared every frame through the immediate layer.
use super::actions::InputAction;
use crate::{
    io::playback::PlaybackConfig,
    systems::ui::{
        immediate::{mk, ComponentConfig, Imm},
        widget::ColorUsage,
    },
};
use bevy::prelude::*;

pub const PAGES: [&str; 3] = ["Home", "Buttons", "Layout"];

pub const BUTTONS_PAGE: usize = 1;

// Key ranges per page, so a key never changes widget kind.
pub const NAV_KEY: usize = 0;
pub const HOME_KEY: usize = 10;
pub const BUTTONS_KEY: usize = 20;
pub const LAYOUT_KEY: usize = 30;
pub const EXAMPLES_KEY: usize = 40;

pub const SCREEN: Rect = Rect {
    min: Vec2::ZERO,
    max: Vec2::new(1280.0, 720.0),
};

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DemoState {
    pub root: Option<Entity>,
    pub page: usize,
    pub show_examples: bool,
    pub enabled: bool,
    pub volume: f32,
    pub choice: usize,
    pub presses: u32,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            root: None,
            page: 0,
            show_examples: false,
            enabled: false,
            volume: 0.5,
            choice: 0,
            presses: 0,
        }
    }
}

/// How the single button on the Buttons page looks, taken from playback
/// parameters when a scenario provides them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub has_label: bool,
    pub color: ColorUsage,
    pub disabled: bool,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            has_label: true,
            color: ColorUsage::Primary,
            disabled: false,
        }
    }
}

impl ButtonStyle {
    pub fn from_playback(config: Option<&PlaybackConfig<InputAction>>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };
        Self {
            has_label: config.button_has_label.unwrap_or(defaults.has_label),
            color: config.button_color.unwrap_or(defaults.color),
            disabled: config.button_disabled.unwrap_or(defaults.disabled),
        }
    }

    pub fn is_customized(config: &PlaybackConfig<InputAction>) -> bool {
        config.button_has_label.is_some()
            || config.button_color.is_some()
            || config.button_disabled.is_some()
    }
}

fn declare_home(imm: &mut Imm<InputAction>, root: Entity, state: &mut DemoState) {
    if imm.button(
        mk(root, HOME_KEY),
        ComponentConfig::default()
            .with_label("Open examples")
            .with_rect(rect(40.0, 80.0, 200.0, 50.0))
            .with_debug_name("open_examples"),
    ) {
        state.show_examples = true;
    }
    if imm.checkbox(
        mk(root, HOME_KEY + 1),
        &mut state.enabled,
        ComponentConfig::default()
            .with_label("Enabled")
            .with_rect(rect(40.0, 150.0, 50.0, 50.0)),
    ) {
        info!("enabled: {}", state.enabled);
    }
    imm.slider(
        mk(root, HOME_KEY + 2),
        &mut state.volume,
        ComponentConfig::default()
            .with_rect(rect(40.0, 220.0, 300.0, 20.0))
            .with_debug_name("volume"),
    );

    let options = ["default", "option1", "option2"].map(String::from);
    if imm.dropdown(
        mk(root, HOME_KEY + 3),
        &options,
        &mut state.choice,
        ComponentConfig::default()
            .with_rect(rect(40.0, 260.0, 150.0, 30.0))
            .with_debug_name("choice"),
    ) {
        info!("picked {}", options[state.choice]);
    }
}

fn declare_buttons(imm: &mut Imm<InputAction>, root: Entity, state: &mut DemoState, style: ButtonStyle) {
    let mut config = ComponentConfig::default()
        .with_rect(rect(40.0, 80.0, 100.0, 50.0))
        .with_color_usage(style.color)
        .with_debug_name("single_button");
    if style.has_label {
        config = config.with_label("Press me");
    }

    if style.disabled {
        imm.div(
            mk(root, BUTTONS_KEY + 1),
            config.with_color_usage(ColorUsage::Background),
        );
    } else if imm.button(mk(root, BUTTONS_KEY), config) {
        state.presses += 1;
        info!("single button pressed {} times", state.presses);
    }
}

fn declare_layout(imm: &mut Imm<InputAction>, root: Entity) {
    let panel = imm.div(
        mk(root, LAYOUT_KEY),
        ComponentConfig::default()
            .with_rect(rect(40.0, 80.0, 600.0, 300.0))
            .with_color_usage(ColorUsage::Background)
            .with_debug_name("panel"),
    );
    let swatches = [
        ("Red", ColorUsage::Error),
        ("Green", ColorUsage::Secondary),
        ("Blue", ColorUsage::Primary),
    ];
    for (index, (label, color)) in swatches.into_iter().enumerate() {
        let left = 60.0 + index as f32 * 190.0;
        imm.div(
            mk(panel, index),
            ComponentConfig::default()
                .with_label(label)
                .with_rect(rect(left, 100.0, 170.0, 260.0))
                .with_color_usage(color)
                .with_debug_name(label.to_lowercase()),
        );
    }
}

fn declare_examples(imm: &mut Imm<InputAction>, root: Entity, state: &mut DemoState) {
    let overlay = imm.div(
        mk(root, EXAMPLES_KEY),
        ComponentConfig::default()
            .with_rect(rect(200.0, 100.0, 600.0, 400.0))
            .with_color_usage(ColorUsage::Background)
            .with_debug_name("examples"),
    );
    if imm.button(
        mk(overlay, 0),
        ComponentConfig::default()
            .with_label("Close")
            .with_rect(rect(220.0, 120.0, 100.0, 50.0))
            .with_debug_name("close_examples"),
    ) {
        state.show_examples = false;
    }
    imm.checkbox(
        mk(overlay, 1),
        &mut state.enabled,
        ComponentConfig::default()
            .with_label("Enabled")
            .with_rect(rect(220.0, 190.0, 50.0, 50.0)),
    );
}

/// Navigation bar on top, then either the examples overlay or the current page.
pub fn declare_gallery(world: &mut World) {
    let Some(root) = world.resource::<DemoState>().root else {
        return;
    };
    let style = ButtonStyle::from_playback(world.get_resource::<PlaybackConfig<InputAction>>());
    let mut state = world.resource::<DemoState>().clone();
    let pages = PAGES.map(String::from);

    let mut imm = Imm::<InputAction>::new(world);
    if imm.navigation_bar(
        mk(root, NAV_KEY),
        &pages,
        &mut state.page,
        ComponentConfig::default()
            .with_rect(rect(0.0, 0.0, SCREEN.width(), 40.0))
            .with_debug_name("navigation"),
    ) {
        info!("page: {}", pages[state.page]);
    }

    if state.show_examples {
        declare_examples(&mut imm, root, &mut state);
    } else {
        match state.page {
            0 => declare_home(&mut imm, root, &mut state),
            BUTTONS_PAGE => declare_buttons(&mut imm, root, &mut state, style),
            _ => declare_layout(&mut imm, root),
        }
    }

    world.insert_resource(state);
}
