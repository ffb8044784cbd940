//! Scripted input playback.
//!
//! A scenario is a list of steps. Each step lasts `frames_per_step` frames:
//! its `pressed` actions fire on the first frame only, its `held` actions are
//! held for the whole step without counting as presses.
use crate::systems::{
    input::{map_keys_to_actions, PointerInput},
    ui::{context::UiAction, widget::ColorUsage},
};
use bevy::prelude::*;
use serde::{de::DeserializeOwned, Deserialize};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct PlaybackStep<A> {
    #[serde(default)]
    pub pressed: Vec<A>,
    #[serde(default)]
    pub held: Vec<A>,
    /// Moves the pointer at the start of the step.
    #[serde(default)]
    pub pointer: Option<[f32; 2]>,
    #[serde(default)]
    pub left_down: Option<bool>,
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct PlaybackConfig<A> {
    #[serde(default)]
    pub scenario_name: String,
    #[serde(default)]
    pub auto_quit: bool,
    #[serde(default = "default_dump_path")]
    pub dump_path: PathBuf,
    #[serde(default = "default_frames_per_step")]
    pub frames_per_step: usize,
    #[serde(default)]
    pub steps: Vec<PlaybackStep<A>>,
    #[serde(default)]
    pub button_has_label: Option<bool>,
    #[serde(default)]
    pub button_color: Option<ColorUsage>,
    #[serde(default)]
    pub button_disabled: Option<bool>,
}

fn default_dump_path() -> PathBuf {
    PathBuf::from("ui_tree.json")
}

fn default_frames_per_step() -> usize {
    2
}

#[derive(Debug)]
pub enum PlaybackError {
    Read { path: PathBuf, source: io::Error },
    Parse(toml::de::Error),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read playback file {}: {source}", path.display())
            }
            Self::Parse(error) => write!(f, "failed to parse playback config: {error}"),
        }
    }
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(error) => Some(error),
        }
    }
}

impl<A: DeserializeOwned> PlaybackConfig<A> {
    pub fn from_toml_str(source: &str) -> Result<Self, PlaybackError> {
        toml::from_str(source).map_err(PlaybackError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlaybackError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| PlaybackError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

impl<A> PlaybackConfig<A> {
    pub fn total_frames(&self) -> usize {
        self.steps.len() * self.frames_per_step.max(1)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PlaybackDriver<A> {
    steps: Vec<PlaybackStep<A>>,
    frames_per_step: usize,
    step: usize,
    frame_in_step: usize,
    /// Actions the driver pressed last frame; released before the next one.
    pressing: Vec<A>,
}

impl<A: UiAction> PlaybackDriver<A> {
    pub fn new(config: &PlaybackConfig<A>) -> Self {
        Self {
            steps: config.steps.clone(),
            frames_per_step: config.frames_per_step.max(1),
            step: 0,
            frame_in_step: 0,
            pressing: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps.len()
    }
}

pub fn drive_playback<A: UiAction>(
    mut driver: ResMut<PlaybackDriver<A>>,
    mut actions: ResMut<ButtonInput<A>>,
    mut pointer: ResMut<PointerInput>,
) {
    for action in std::mem::take(&mut driver.pressing) {
        actions.release(action);
    }
    let Some(step) = driver.steps.get(driver.step).cloned() else {
        return;
    };

    if driver.frame_in_step == 0 {
        info!(
            "playback step {}/{}: pressed {:?} held {:?}",
            driver.step + 1,
            driver.steps.len(),
            step.pressed,
            step.held
        );
        for &action in &step.pressed {
            actions.press(action);
        }
        driver.pressing.extend(step.pressed.iter().copied());
        if let Some([x, y]) = step.pointer {
            pointer.position = Vec2::new(x, y);
        }
        if let Some(left_down) = step.left_down {
            pointer.left_down = left_down;
        }
    }

    for &action in &step.held {
        if actions.pressed(action) {
            continue;
        }
        actions.press(action);
        actions.clear_just_pressed(action);
        driver.pressing.push(action);
    }

    driver.frame_in_step += 1;
    if driver.frame_in_step >= driver.frames_per_step {
        driver.frame_in_step = 0;
        driver.step += 1;
    }
}

/// Plays a scenario into `ButtonInput<A>` and `PointerInput` before the UI
/// systems run. Keyboard-mapped actions are applied first and are left alone,
/// apart from actions the scenario itself presses.
pub struct PlaybackPlugin<A> {
    config: PlaybackConfig<A>,
}

impl<A> PlaybackPlugin<A> {
    pub fn new(config: PlaybackConfig<A>) -> Self {
        Self { config }
    }
}

impl<A: UiAction> Plugin for PlaybackPlugin<A> {
    fn build(&self, app: &mut App) {
        info!(
            "playing scenario '{}' ({} steps)",
            self.config.scenario_name,
            self.config.steps.len()
        );
        app.insert_resource(PlaybackDriver::new(&self.config))
            .insert_resource(self.config.clone())
            .add_systems(
                PreUpdate,
                drive_playback::<A>.after(map_keys_to_actions::<A>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{input::ActionBindings, ui::testing::TestAction};

    const SCENARIO: &str = r#"
scenario_name = "tab_then_confirm"
auto_quit = true
frames_per_step = 3
button_color = "Accent"

[[steps]]
pressed = ["Next"]

[[steps]]
pressed = ["Press"]
held = ["Mod"]
pointer = [10.0, 20.0]
left_down = true
"#;

    #[test]
    fn parses_steps_and_defaults() {
        let config = PlaybackConfig::<TestAction>::from_toml_str(SCENARIO).unwrap();
        assert_eq!(config.scenario_name, "tab_then_confirm");
        assert!(config.auto_quit);
        assert_eq!(config.dump_path, PathBuf::from("ui_tree.json"));
        assert_eq!(config.button_color, Some(ColorUsage::Accent));
        assert_eq!(config.button_has_label, None);
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.steps[1].held, vec![TestAction::Mod]);
        assert_eq!(config.steps[1].pointer, Some([10.0, 20.0]));
        assert_eq!(config.total_frames(), 6);
    }

    #[test]
    fn unknown_actions_are_rejected() {
        let error = PlaybackConfig::<TestAction>::from_toml_str(
            "[[steps]]\npressed = [\"Jump\"]\n",
        )
        .unwrap_err();
        assert!(matches!(error, PlaybackError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = PlaybackConfig::<TestAction>::load("does/not/exist.toml").unwrap_err();
        assert!(error.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn driver_presses_once_and_holds_for_the_whole_step() {
        let config = PlaybackConfig::<TestAction>::from_toml_str(SCENARIO).unwrap();
        let mut app = App::new();
        app.init_resource::<ButtonInput<TestAction>>()
            .init_resource::<PointerInput>()
            .add_plugins(PlaybackPlugin::new(config))
            .add_systems(Last, crate::systems::input::clear_action_edges::<TestAction>);

        let just_pressed = |app: &App, action| {
            app.world()
                .resource::<ButtonInput<TestAction>>()
                .just_pressed(action)
        };
        let snapshot = |app: &mut App| {
            // Observe what the UI systems would see this frame.
            app.world_mut().run_schedule(PreUpdate);
        };

        snapshot(&mut app);
        assert!(just_pressed(&app, TestAction::Next));
        app.world_mut().run_schedule(Last);

        snapshot(&mut app);
        assert!(!just_pressed(&app, TestAction::Next));
        app.world_mut().run_schedule(Last);
        snapshot(&mut app);
        app.world_mut().run_schedule(Last);

        snapshot(&mut app);
        let actions = app.world().resource::<ButtonInput<TestAction>>();
        assert!(actions.just_pressed(TestAction::Press));
        assert!(actions.pressed(TestAction::Mod));
        assert!(!actions.just_pressed(TestAction::Mod));
        let pointer = *app.world().resource::<PointerInput>();
        assert_eq!(pointer.position, Vec2::new(10.0, 20.0));
        assert!(pointer.left_down);
        app.world_mut().run_schedule(Last);

        snapshot(&mut app);
        app.world_mut().run_schedule(Last);
        snapshot(&mut app);
        assert!(!app
            .world()
            .resource::<ButtonInput<TestAction>>()
            .just_pressed(TestAction::Press));
        assert!(app.world().resource::<PlaybackDriver<TestAction>>().is_finished());
    }

    #[test]
    fn finished_playback_leaves_keyboard_actions_alone() {
        let config = PlaybackConfig::<TestAction>::from_toml_str(
            "frames_per_step = 1\n[[steps]]\npressed = [\"Press\"]\n",
        )
        .unwrap();
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<TestAction>>()
            .init_resource::<PointerInput>()
            .insert_resource(ActionBindings::new([(KeyCode::Tab, TestAction::Next)]))
            .add_systems(PreUpdate, map_keys_to_actions::<TestAction>)
            .add_plugins(PlaybackPlugin::new(config));

        app.world_mut().run_schedule(PreUpdate);
        assert!(app
            .world()
            .resource::<ButtonInput<TestAction>>()
            .just_pressed(TestAction::Press));
        app.world_mut()
            .resource_mut::<ButtonInput<TestAction>>()
            .clear();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Tab);
        app.world_mut().run_schedule(PreUpdate);

        let actions = app.world().resource::<ButtonInput<TestAction>>();
        assert!(actions.just_pressed(TestAction::Next));
        assert!(actions.pressed(TestAction::Next));
        assert!(!actions.pressed(TestAction::Press));
        assert!(app.world().resource::<PlaybackDriver<TestAction>>().is_finished());
    }
}
