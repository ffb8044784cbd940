use bevy::{log::LogPlugin, prelude::*};
use clap::Parser;
use hotfocus::{
    demo::{actions::InputAction, gallery::DemoState, DemoPlugin},
    io::{
        dump::{dump_ui_tree, write_ui_tree_json},
        playback::{PlaybackConfig, PlaybackDriver, PlaybackPlugin},
    },
    systems::ui::render::DrawList,
};
use std::path::PathBuf;

/// Runs the widget gallery headless and writes the resulting widget tree.
#[derive(Parser, Debug)]
#[command(name = "hotfocus", version)]
struct Args {
    /// Scripted input scenario (TOML).
    #[arg(long)]
    playback: Option<PathBuf>,

    /// Frames to run. With a scenario, defaults to the scenario length.
    #[arg(long)]
    frames: Option<usize>,

    /// Where to write the JSON tree dump. Overrides the scenario's dump_path.
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let playback = args
        .playback
        .as_ref()
        .map(PlaybackConfig::<InputAction>::load)
        .transpose()?;

    let mut app = App::new();
    app.add_plugins((LogPlugin::default(), DemoPlugin));
    if let Some(config) = playback.clone() {
        app.add_plugins(PlaybackPlugin::new(config));
    }

    // One extra frame lets the last step's commands land in the tree.
    let frames = args.frames.unwrap_or_else(|| {
        playback
            .as_ref()
            .map_or(1, |config| config.total_frames() + 1)
    });
    let auto_quit = playback.as_ref().is_some_and(|config| config.auto_quit);
    for _ in 0..frames {
        app.update();
        let finished = app
            .world()
            .get_resource::<PlaybackDriver<InputAction>>()
            .is_some_and(PlaybackDriver::is_finished);
        if auto_quit && finished {
            break;
        }
    }

    let Some(root) = app.world().resource::<DemoState>().root else {
        return Err("demo root was never spawned".into());
    };
    let dump_path = args
        .dump
        .or_else(|| playback.map(|config| config.dump_path))
        .unwrap_or_else(|| PathBuf::from("ui_tree.json"));
    let dump = dump_ui_tree::<InputAction>(app.world(), root);
    write_ui_tree_json(&dump, &dump_path)?;
    info!("wrote ui tree to {}", dump_path.display());

    for command in &app.world().resource::<DrawList>().0 {
        debug!(
            "draw {} {:?} hot={} focused={} label={:?}",
            command.entity, command.rect, command.hot, command.focused, command.label
        );
    }
    Ok(())
}
