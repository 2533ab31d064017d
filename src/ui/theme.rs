use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_incorrect_bg: String,
    pub text_pending: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// A user theme from `<config_dir>/typemeter/themes/<name>.toml`, or one
    /// of the built-in palettes.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("typemeter")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path)
                && let Ok(theme) = toml::from_str::<Theme>(&content)
            {
                return Some(theme);
            }
        }

        Self::builtin(name)
    }

    fn builtin(name: &str) -> Option<Self> {
        let colors = match name {
            "catppuccin-mocha" => ThemeColors::default(),
            "terminal-default" => ThemeColors {
                bg: "reset".to_string(),
                fg: "reset".to_string(),
                text_correct: "green".to_string(),
                text_incorrect: "red".to_string(),
                text_incorrect_bg: "reset".to_string(),
                text_pending: "darkgray".to_string(),
                text_cursor_bg: "white".to_string(),
                text_cursor_fg: "black".to_string(),
                accent: "cyan".to_string(),
                border: "darkgray".to_string(),
                header_bg: "reset".to_string(),
                header_fg: "reset".to_string(),
                error: "red".to_string(),
                warning: "yellow".to_string(),
                success: "green".to_string(),
            },
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            colors,
        })
    }

    pub fn available_themes() -> Vec<String> {
        vec!["catppuccin-mocha".to_string(), "terminal-default".to_string()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "catppuccin-mocha".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_correct: "#a6e3a1".to_string(),
            text_incorrect: "#f38ba8".to_string(),
            text_incorrect_bg: "#45273a".to_string(),
            text_pending: "#585b70".to_string(),
            text_cursor_bg: "#f5e0dc".to_string(),
            text_cursor_fg: "#1e1e2e".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    /// `#rrggbb`, or a named terminal color such as `red` or `reset`.
    pub fn parse_color(value: &str) -> Color {
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() == 6
                && hex.is_ascii()
                && let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                )
            {
                return Color::Rgb(r, g, b);
            }
            return Color::White;
        }
        value.parse().unwrap_or(Color::White)
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_correct(&self) -> Color { Self::parse_color(&self.text_correct) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_incorrect_bg(&self) -> Color { Self::parse_color(&self.text_incorrect_bg) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(ThemeColors::parse_color("#89b4fa"), Color::Rgb(0x89, 0xb4, 0xfa));
        assert_eq!(ThemeColors::parse_color("#zzz"), Color::White);
    }

    #[test]
    fn test_parse_multibyte_hex_falls_back() {
        // Six bytes but not six hex digits.
        assert_eq!(ThemeColors::parse_color("#a\u{e9}\u{e9}b"), Color::White);
    }

    #[test]
    fn test_parse_named_color() {
        assert_eq!(ThemeColors::parse_color("red"), Color::Red);
        assert_eq!(ThemeColors::parse_color("reset"), Color::Reset);
    }

    #[test]
    fn test_builtin_themes_resolve() {
        for name in Theme::available_themes() {
            assert!(Theme::builtin(&name).is_some(), "{name} missing");
        }
        assert!(Theme::builtin("no-such-theme").is_none());
    }
}
