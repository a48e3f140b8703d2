use std::{fmt, str::FromStr};

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors for one theme. The three accents belong to the three totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub muted_text: &'static str,
    pub panel_background: &'static str,
    pub border: &'static str,
    pub purchase_accent: &'static str,
    pub profit_accent: &'static str,
    pub valuation_accent: &'static str,
    pub chart_background: &'static str,
    pub candle_up: &'static str,
    pub candle_down: &'static str,
    pub error: &'static str,
}

const LIGHT: Palette = Palette {
    background: "#ffffff",
    text: "#1f2328",
    muted_text: "#57606a",
    panel_background: "#f0f8ff",
    border: "#d0d7de",
    purchase_accent: "#2e8b57",
    profit_accent: "#1e90ff",
    valuation_accent: "#daa520",
    chart_background: "#ffffff",
    candle_up: "#26a69a",
    candle_down: "#ef5350",
    error: "#cf222e",
};

const DARK: Palette = Palette {
    background: "#0e1117",
    text: "#e6edf3",
    muted_text: "#8b949e",
    panel_background: "#161b22",
    border: "#30363d",
    purchase_accent: "#3fb950",
    profit_accent: "#58a6ff",
    valuation_accent: "#e3b341",
    chart_background: "#0d1117",
    candle_up: "#26a69a",
    candle_down: "#f85149",
    error: "#ff7b72",
};

impl Theme {
    pub fn palette(&self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow!("Unknown theme '{}', expected 'light' or 'dark'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_palettes_differ_only_cosmetically() {
        let light = Theme::Light.palette();
        let dark = Theme::Dark.palette();
        assert_ne!(light.background, dark.background);
        assert_ne!(light.text, dark.text);
        assert_ne!(light.chart_background, dark.chart_background);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
