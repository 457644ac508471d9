//! Theme and style definitions.

use ratatui::style::{Color, Modifier, Style};

/// Colors of the admin console.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary accent color (highlights, active elements)
    pub accent: Color,
    /// Approved records, success messages
    pub success: Color,
    /// Pending records, in-flight work
    pub warning: Color,
    /// Rejected records, errors
    pub error: Color,
    /// Cancelled records, secondary info
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Style for focused/active borders.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn bold(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Color of a status cell (`approved`, `pending`, ...), if it is one.
    pub fn status_color(&self, text: &str) -> Option<Color> {
        match text.trim().to_ascii_lowercase().as_str() {
            "approved" | "confirmed" | "completed" => Some(self.success),
            "pending" => Some(self.warning),
            "rejected" => Some(self.error),
            "cancelled" | "canceled" => Some(self.muted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        let theme = Theme::default();
        assert_eq!(theme.status_color("APPROVED"), Some(Color::Green));
        assert_eq!(theme.status_color("pending "), Some(Color::Yellow));
        assert_eq!(theme.status_color("Greenfield High"), None);
    }
}
