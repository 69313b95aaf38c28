use snap_platform::WindowConfig;

/// Built-in Dear ImGui color schemes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Classic,
}

/// Application configuration
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Background color cleared before every frame, RGBA in `0.0..=1.0`
    pub clear_color: [f32; 4],
    /// Applied once, on the first rendered frame
    pub theme: Theme,
    /// Initial value of the MSAA samples setting, `1..=16`
    pub msaa_samples: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default().with_title("Snap Tools - Cross Platform"),
            clear_color: [0.45, 0.55, 0.60, 1.0],
            theme: Theme::Dark,
            msaa_samples: 4,
        }
    }
}

impl AppConfig {
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the initial MSAA samples, clamped to `1..=16`
    pub fn with_msaa_samples(mut self, samples: i32) -> Self {
        self.msaa_samples = samples.clamp(1, 16);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_application() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Snap Tools - Cross Platform");
        assert_eq!((config.window.width, config.window.height), (1200, 800));
        assert!(config.window.vsync);
        assert_eq!(config.clear_color, [0.45, 0.55, 0.60, 1.0]);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.msaa_samples, 4);
    }

    #[test]
    fn msaa_samples_are_clamped() {
        assert_eq!(AppConfig::default().with_msaa_samples(0).msaa_samples, 1);
        assert_eq!(AppConfig::default().with_msaa_samples(64).msaa_samples, 16);
        assert_eq!(AppConfig::default().with_msaa_samples(8).msaa_samples, 8);
    }
}
