//! Display resolutions, exposed to a dropdown through `DataProvider`.
use crate::systems::ui::dropdown::DataProvider;
use bevy::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Component, Debug, Clone)]
pub struct AvailableResolutions {
    pub resolutions: Vec<Resolution>,
    pub current: usize,
}

impl Default for AvailableResolutions {
    fn default() -> Self {
        Self {
            resolutions: [(1280, 720), (1600, 900), (1920, 1080), (2560, 1440)]
                .into_iter()
                .map(|(width, height)| Resolution { width, height })
                .collect(),
            current: 0,
        }
    }
}

impl AvailableResolutions {
    pub fn current(&self) -> Option<Resolution> {
        self.resolutions.get(self.current).copied()
    }
}

impl DataProvider for AvailableResolutions {
    type Item = Resolution;

    fn fetch_data(&self) -> Vec<Resolution> {
        self.resolutions.clone()
    }

    fn on_data_changed(&mut self, index: usize) {
        if index >= self.resolutions.len() {
            warn!("resolution index {index} out of range");
            return;
        }
        self.current = index;
        info!("resolution set to {}", self.resolutions[index]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_changes_are_ignored() {
        let mut resolutions = AvailableResolutions::default();
        resolutions.on_data_changed(2);
        assert_eq!(resolutions.current().map(|r| r.to_string()).as_deref(), Some("1920x1080"));
        resolutions.on_data_changed(9);
        assert_eq!(resolutions.current, 2);
    }
}
