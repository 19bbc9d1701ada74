use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: f64 = 0.6;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// User preferences. Missing fields in a stored document fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub zoom: f64,
    pub rich_text: bool,
    /// Show the live verse metric next to the editor.
    pub metric: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            zoom: 1.0,
            rich_text: false,
            metric: false,
        }
    }
}

impl Settings {
    /// Step the zoom up by 0.1. Returns `false` when already at the maximum.
    pub fn zoom_in(&mut self) -> bool {
        if self.zoom >= ZOOM_MAX {
            return false;
        }
        self.zoom = round_tenth(self.zoom + ZOOM_STEP).min(ZOOM_MAX);
        true
    }

    /// Step the zoom down by 0.1. Returns `false` when already at the minimum.
    pub fn zoom_out(&mut self) -> bool {
        if self.zoom <= ZOOM_MIN {
            return false;
        }
        self.zoom = round_tenth(self.zoom - ZOOM_STEP).max(ZOOM_MIN);
        true
    }

    /// Set an explicit zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = round_tenth(zoom.clamp(ZOOM_MIN, ZOOM_MAX));
        }
    }

    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        // zoom is clamped to [0.6, 2.0]
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.zoom * 100.0).round() as u32;
        pct
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch() {
        let s = Settings::default();
        assert_eq!(s.theme, Theme::Dark);
        assert!((s.zoom - 1.0).abs() < f64::EPSILON);
        assert!(!s.rich_text);
        assert!(!s.metric);
    }

    #[test]
    fn zoom_is_stepped_and_clamped() {
        let mut s = Settings::default();
        for _ in 0..20 {
            s.zoom_in();
        }
        assert_eq!(s.zoom_percent(), 200);
        assert!(!s.zoom_in());

        for _ in 0..20 {
            s.zoom_out();
        }
        assert_eq!(s.zoom_percent(), 60);
        assert!(!s.zoom_out());

        s.zoom_in();
        assert_eq!(s.zoom_percent(), 70);
    }

    #[test]
    fn explicit_zoom_is_clamped() {
        let mut s = Settings::default();
        s.set_zoom(3.7);
        assert_eq!(s.zoom_percent(), 200);
        s.set_zoom(1.234);
        assert_eq!(s.zoom_percent(), 120);
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let s: Settings = serde_json::from_str(r#"{"theme":"light","richText":true}"#).unwrap();
        assert_eq!(s.theme, Theme::Light);
        assert!(s.rich_text);
        assert!((s.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn theme_toggles() {
        let mut s = Settings::default();
        s.toggle_theme();
        assert_eq!(s.theme, Theme::Light);
        s.toggle_theme();
        assert_eq!(s.theme, Theme::Dark);
    }
}
