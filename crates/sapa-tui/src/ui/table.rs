//! Table widget rendering a [`DataGrid`].

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use sapa_core::{CellValue, DataGrid};

use super::theme::Theme;

/// Widest a column is allowed to grow.
const MAX_COLUMN_WIDTH: u16 = 40;

/// Table widget for a data grid, with status cells colored.
#[derive(Debug)]
pub struct GridTable<'a> {
    grid: &'a DataGrid,
    title: Option<String>,
    /// Shown on the bottom border.
    footer: Option<String>,
    /// Text shown instead of rows when the grid is empty.
    empty_message: &'a str,
    focused: bool,
    theme: Theme,
}

impl<'a> GridTable<'a> {
    pub fn new(grid: &'a DataGrid) -> Self {
        Self {
            grid,
            title: None,
            footer: None,
            empty_message: "No records found",
            focused: true,
            theme: Theme::default(),
        }
    }

    /// Set the table title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn footer(mut self, footer: Option<String>) -> Self {
        self.footer = footer;
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Column widths from the header and cell contents.
    fn widths(&self) -> Vec<Constraint> {
        self.grid
            .columns()
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let widest = self
                    .grid
                    .rows()
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.to_string().chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(header.chars().count());
                let width = u16::try_from(widest).unwrap_or(MAX_COLUMN_WIDTH);
                Constraint::Min(width.min(MAX_COLUMN_WIDTH))
            })
            .collect()
    }

    fn cell(&self, value: &CellValue) -> Cell<'static> {
        let text = value.to_string();
        let style = match value {
            CellValue::Text(s) => self
                .theme
                .status_color(s)
                .map(|c| Style::default().fg(c))
                .unwrap_or_default(),
            CellValue::Null => self.theme.muted_style(),
            _ => Style::default(),
        };
        Cell::from(text).style(style)
    }

    /// Render the table.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            self.grid
                .columns()
                .iter()
                .map(|c| Cell::from(c.clone()))
                .collect::<Vec<_>>(),
        )
        .style(self.theme.bold())
        .height(1);

        let rows: Vec<Row> = if self.grid.is_empty() {
            vec![Row::new(vec![Cell::from(self.empty_message.to_string())
                .style(self.theme.muted_style())])]
        } else {
            self.grid
                .rows()
                .iter()
                .map(|row| Row::new(row.iter().map(|v| self.cell(v)).collect::<Vec<_>>()))
                .collect()
        };

        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!(" {} items ", self.grid.row_count()));

        let border = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let mut block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border);
        if let Some(footer) = &self.footer {
            block = block.title_bottom(format!(" {} ", footer));
        }

        let table = Table::new(rows, self.widths())
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default();
        if !self.grid.is_empty() {
            state.select(self.grid.selected());
        }

        frame.render_stateful_widget(table, area, &mut state);
    }
}
