//! JSON snapshot of a widget tree, for golden tests of layout and focus.
use crate::systems::ui::{
    context::{UiAction, UiContext},
    widget::UiElement,
};
use bevy::prelude::*;
use serde::Serialize;
use std::{fmt, fs, io, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DumpRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl From<Rect> for DumpRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            w: rect.width(),
            h: rect.height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpNode {
    pub id: u64,
    pub name: String,
    pub rect: DumpRect,
    pub children: Vec<DumpNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiTreeDump {
    pub root: DumpNode,
    pub focus: Option<u64>,
}

#[derive(Debug)]
pub enum DumpError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "failed to write ui tree dump: {error}"),
            Self::Serialize(error) => write!(f, "failed to serialize ui tree: {error}"),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Serialize(error) => Some(error),
        }
    }
}

impl From<io::Error> for DumpError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for DumpError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialize(error)
    }
}

fn dump_node(world: &World, entity: Entity) -> DumpNode {
    let Ok(node) = world.get_entity(entity) else {
        return DumpNode {
            id: entity.to_bits(),
            name: "missing".to_string(),
            rect: DumpRect::from(Rect::default()),
            children: Vec::new(),
        };
    };

    // A node outside the widget model is a leaf in the dump.
    let Some(element) = node.get::<UiElement>() else {
        return DumpNode {
            id: entity.to_bits(),
            name: "no_element".to_string(),
            rect: DumpRect::from(Rect::default()),
            children: Vec::new(),
        };
    };
    let name = node
        .get::<Name>()
        .map_or_else(|| "unknown".to_string(), |name| name.as_str().to_string());
    let children = node
        .get::<Children>()
        .map(|children| {
            children
                .iter()
                .map(|child| dump_node(world, child))
                .collect()
        })
        .unwrap_or_default();

    DumpNode {
        id: entity.to_bits(),
        name,
        rect: DumpRect::from(element.rect),
        children,
    }
}

/// Every node below `root`, hidden ones included, plus the focused widget.
pub fn dump_ui_tree<A: UiAction>(world: &World, root: Entity) -> UiTreeDump {
    UiTreeDump {
        root: dump_node(world, root),
        focus: world
            .get::<UiContext<A>>(root)
            .and_then(|context| context.focus_id)
            .map(Entity::to_bits),
    }
}

pub fn to_json(dump: &UiTreeDump) -> Result<String, DumpError> {
    Ok(serde_json::to_string_pretty(dump)?)
}

pub fn write_ui_tree_json(dump: &UiTreeDump, path: impl AsRef<Path>) -> Result<(), DumpError> {
    fs::write(path, to_json(dump)?)?;
    Ok(())
}
