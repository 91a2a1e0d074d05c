//! Terminal colors for themes, color tokens and backgrounds

use ratatui::style::Color;

use crate::classify::ColorToken;
use crate::data::Background;
use crate::prefs::Theme;

/// Base colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Screen background
    pub background: Color,
    /// Primary text
    pub primary: Color,
    /// Secondary/dimmed text
    pub secondary: Color,
    /// Section headers and borders
    pub header: Color,
    /// Key hints and highlights
    pub highlight: Color,
    /// Error messages
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                primary: Color::White,
                secondary: Color::Gray,
                header: Color::Cyan,
                highlight: Color::Yellow,
                error: Color::LightRed,
            },
            Theme::Light => Self {
                background: Color::Rgb(245, 245, 240),
                primary: Color::Black,
                secondary: Color::DarkGray,
                header: Color::Blue,
                highlight: Color::Rgb(176, 112, 0),
                error: Color::Red,
            },
        }
    }
}

/// Concrete color for a classification token
pub fn token_color(token: ColorToken) -> Color {
    match token {
        ColorToken::AqiGood | ColorToken::AccentGreen => Color::Green,
        ColorToken::AqiModerate | ColorToken::AccentYellow => Color::Yellow,
        ColorToken::AqiUnhealthySensitive => Color::Rgb(255, 126, 0),
        ColorToken::AqiUnhealthy | ColorToken::AccentRed => Color::Red,
        ColorToken::AqiVeryUnhealthy => Color::Rgb(143, 63, 151),
        ColorToken::AqiHazardous => Color::Rgb(126, 0, 35),
        ColorToken::AccentPink => Color::LightMagenta,
    }
}

/// Accent color of the header for the current conditions
pub fn background_accent(background: Background) -> Color {
    match background {
        Background::Stormy => Color::Magenta,
        Background::Rainy => Color::Blue,
        Background::Snowy => Color::White,
        Background::Cloudy => Color::Gray,
        Background::ClearDay => Color::Yellow,
        Background::ClearNight => Color::LightBlue,
        Background::Plain => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_differ() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_ne!(dark.primary, light.primary);
        assert_ne!(dark.background, light.background);
    }

    #[test]
    fn test_aqi_tokens_have_distinct_colors() {
        let tokens = [
            ColorToken::AqiGood,
            ColorToken::AqiModerate,
            ColorToken::AqiUnhealthySensitive,
            ColorToken::AqiUnhealthy,
            ColorToken::AqiVeryUnhealthy,
            ColorToken::AqiHazardous,
        ];
        for (i, a) in tokens.iter().enumerate() {
            for b in &tokens[i + 1..] {
                assert_ne!(token_color(*a), token_color(*b), "{:?} vs {:?}", a, b);
            }
        }
    }
}
