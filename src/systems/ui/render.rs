//! Draw-call surface. The core decides what each visible widget looks like;
//! a backend turns the `DrawList` into pixels.
use super::{
    context::{UiAction, UiContext},
    frame::push_visible_subtree,
    widget::{ColorUsage, ShouldHide, UiElement, UiRoot, WidgetColor, WidgetLabel},
};
use bevy::prelude::*;

pub const PRIMARY_COLOR: Color = Color::srgb(0.29, 0.435, 0.647);
pub const SECONDARY_COLOR: Color = Color::srgb(0.184, 0.243, 0.275);
pub const ACCENT_COLOR: Color = Color::srgb(0.949, 0.647, 0.255);
pub const BACKGROUND_COLOR: Color = Color::Srgba(Srgba::new(0.07, 0.07, 0.07, 0.9));
pub const DANGER_COLOR: Color = Color::srgb(0.753, 0.224, 0.169);
pub const HOVERED_COLOR: Color = Color::srgb(0.902, 0.224, 0.275);

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub error: Color,
    pub hot: Color,
    pub focus_ring: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: PRIMARY_COLOR,
            secondary: SECONDARY_COLOR,
            accent: ACCENT_COLOR,
            background: BACKGROUND_COLOR,
            error: DANGER_COLOR,
            hot: HOVERED_COLOR,
            focus_ring: Color::WHITE,
        }
    }
}

impl Theme {
    pub fn resolve(&self, usage: ColorUsage) -> Color {
        match usage {
            ColorUsage::Primary => self.primary,
            ColorUsage::Secondary => self.secondary,
            ColorUsage::Accent => self.accent,
            ColorUsage::Background => self.background,
            ColorUsage::Error => self.error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub entity: Entity,
    pub rect: Rect,
    /// Fill color; `None` for unpainted containers.
    pub color: Option<Color>,
    pub label: Option<String>,
    pub hot: bool,
    pub focused: bool,
}

/// Visible widgets of every root in back-to-front order.
#[derive(Resource, Debug, Default, Clone)]
pub struct DrawList(pub Vec<DrawCommand>);

impl DrawList {
    pub fn get(&self, entity: Entity) -> Option<&DrawCommand> {
        self.0.iter().find(|command| command.entity == entity)
    }
}

pub fn collect_draw_commands<A: UiAction>(
    mut draw_list: ResMut<DrawList>,
    theme: Res<Theme>,
    roots: Query<(Entity, &UiContext<A>), With<UiRoot>>,
    children: Query<&Children>,
    nodes: Query<Has<ShouldHide>, With<UiElement>>,
    widgets: Query<(&UiElement, Option<&WidgetColor>, Option<&WidgetLabel>)>,
) {
    draw_list.0.clear();
    let mut visible = Vec::new();
    for (root, context) in &roots {
        visible.clear();
        push_visible_subtree(root, &children, &nodes, &mut visible);
        for &entity in &visible {
            let Ok((element, color, label)) = widgets.get(entity) else {
                continue;
            };
            let hot = context.is_hot(entity);
            let color = if hot {
                Some(theme.hot)
            } else {
                color.map(|color| theme.resolve(color.0))
            };
            draw_list.0.push(DrawCommand {
                entity,
                rect: element.rect,
                color,
                label: label.map(|label| label.0.clone()),
                hot,
                focused: context.has_focus(entity),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ui::{
        testing::{rect, set_pointer, spawn_root, test_app},
        widget::OnClick,
    };

    #[test]
    fn draw_list_reflects_hot_focus_and_visibility() {
        let mut app = test_app();
        let root = spawn_root(&mut app);
        let world = app.world_mut();
        let first = world
            .spawn((
                UiElement::new(rect(0.0, 0.0, 100.0, 50.0)),
                WidgetColor(ColorUsage::Secondary),
                WidgetLabel::new("first"),
                OnClick::new(|_, _| {}),
                ChildOf(root),
            ))
            .id();
        let second = world
            .spawn((
                UiElement::new(rect(200.0, 0.0, 100.0, 50.0)),
                WidgetColor(ColorUsage::Accent),
                OnClick::new(|_, _| {}),
                ChildOf(root),
            ))
            .id();
        let hidden = world
            .spawn((
                UiElement::new(rect(400.0, 0.0, 100.0, 50.0)),
                ShouldHide,
                ChildOf(root),
            ))
            .id();

        set_pointer(&mut app, 210.0, 10.0, false);
        app.update();

        let theme = Theme::default();
        let draw_list = app.world().resource::<DrawList>();
        assert_eq!(draw_list.0.len(), 2);

        let first = draw_list.get(first).unwrap();
        assert_eq!(first.color, Some(theme.secondary));
        assert_eq!(first.label.as_deref(), Some("first"));
        assert!(first.focused);
        assert!(!first.hot);

        let second = draw_list.get(second).unwrap();
        assert!(second.hot);
        assert_eq!(second.color, Some(theme.hot));
        assert!(draw_list.get(hidden).is_none());
    }
}
