//! Dialog widgets for confirmations and forms.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::form::Form;

/// Create a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// A yes/no confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: &'a str,
    theme: Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            theme: Theme::default(),
        }
    }

    /// Message width plus borders and padding, at least 40 columns.
    fn width(&self) -> u16 {
        u16::try_from(self.message.chars().count())
            .unwrap_or(u16::MAX)
            .saturating_add(6)
            .max(40)
    }

    pub fn render(self, frame: &mut Frame) {
        let area = centered_rect(self.width(), 7, frame.area());

        frame.render_widget(Clear, area);

        let lines = vec![
            Line::from(""),
            Line::from(self.message),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[Y]",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("es  "),
                Span::styled(
                    "[N]",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("o"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(self.theme.focused_border()),
            )
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
    }
}

/// A form with one labelled input line per field.
#[derive(Debug, Clone)]
pub struct FormDialog<'a> {
    form: &'a Form,
    /// Error shown under the fields.
    error: Option<&'a str>,
    theme: Theme,
}

impl<'a> FormDialog<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self {
            form,
            error: None,
            theme: Theme::default(),
        }
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn render(self, frame: &mut Frame) {
        let height = self.form.fields.len() as u16 + 6;
        let area = centered_rect(60, height, frame.area());

        frame.render_widget(Clear, area);

        let label_width = self
            .form
            .fields
            .iter()
            .map(|f| f.label.len())
            .max()
            .unwrap_or(0);

        let mut lines = vec![Line::from("")];
        for (i, field) in self.form.fields.iter().enumerate() {
            let focused = i == self.form.focus;
            let label = Span::styled(
                format!("  {:>width$}: ", field.label, width = label_width),
                if focused {
                    self.theme.bold()
                } else {
                    Style::default()
                },
            );
            let value = if field.value.is_empty() && !focused {
                Span::styled(field.placeholder.to_string(), self.theme.muted_style())
            } else if focused {
                Span::styled(
                    format!("{}|", field.display()),
                    Style::default().bg(Color::DarkGray),
                )
            } else {
                Span::raw(field.display())
            };
            lines.push(Line::from(vec![label, value]));
        }

        lines.push(Line::from(""));
        match self.error {
            Some(error) => lines.push(Line::from(Span::styled(
                format!("  {}", error),
                self.theme.error_style(),
            ))),
            None => lines.push(Line::from("")),
        }
        lines.push(Line::from(Span::styled(
            "  [Enter] Next/Submit  [Tab] Next field  [Esc] Cancel",
            self.theme.muted_style(),
        )));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.focused_border())
                .title(format!(" {} ", self.form.kind.title())),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(60, 10, area), Rect::new(20, 15, 60, 10));

        let small = Rect::new(0, 0, 30, 5);
        let rect = centered_rect(60, 10, small);
        assert_eq!((rect.width, rect.height), (30, 5));
    }

    #[test]
    fn test_confirm_width_saturates() {
        assert_eq!(ConfirmDialog::new("Approve", "Approve user 3?").width(), 40);

        let long = "x".repeat(70_000);
        assert_eq!(ConfirmDialog::new("Approve", &long).width(), u16::MAX);

        let near_limit = "x".repeat(usize::from(u16::MAX) - 2);
        assert_eq!(ConfirmDialog::new("Approve", &near_limit).width(), u16::MAX);
    }

    #[test]
    fn test_long_confirmation_renders_inside_frame() {
        use ratatui::backend::TestBackend;
        use ratatui::Terminal;

        let long = "y".repeat(70_000);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| ConfirmDialog::new("Reject", &long).render(frame))
            .unwrap();
        assert_eq!(terminal.backend().buffer().area, Rect::new(0, 0, 80, 24));
    }
}
