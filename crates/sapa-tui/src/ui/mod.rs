//! Main render function for the TUI.

mod dialogs;
mod table;
mod theme;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

use crate::state::{AdminState, HospitalTab, Screen, View};

use dialogs::{ConfirmDialog, FormDialog};
use table::GridTable;
use theme::Theme;

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &AdminState) {
    match state.screen {
        Screen::Login => render_login(frame, state),
        Screen::Console => render_console(frame, state),
    }
}

fn render_login(frame: &mut Frame, state: &AdminState) {
    let theme = Theme::default();
    let area = frame.area();

    let banner = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "SAPA Admin Console",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("backend: {}", state.backend),
            theme.muted_style(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(banner, Rect::new(area.x, area.y, area.width, 4.min(area.height)));

    if let Some(form) = &state.form {
        let error = state.last_error.as_deref().or(state.progress.as_deref());
        FormDialog::new(form).error(error).render(frame);
    }
}

fn render_console(frame: &mut Frame, state: &AdminState) {
    let area = frame.area();

    // Create main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area, state);
    render_body(frame, body_area, state);
    render_footer(frame, footer_area, state);

    if let Some(form) = &state.form {
        FormDialog::new(form).error(state.last_error.as_deref()).render(frame);
    } else if let Some(action) = &state.confirm {
        let question = action.question();
        ConfirmDialog::new(action.title(), &question).render(frame);
    }
}

/// Render the header with navigation tabs.
fn render_header(frame: &mut Frame, area: Rect, state: &AdminState) {
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| format!("[{}] {}", i + 1, v.title()))
        .collect();

    let who = state
        .admin
        .as_ref()
        .and_then(|a| a.user_id)
        .map(|id| format!(" admin #{} ", id))
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" SAPA Admin ({}) ", state.backend))
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .title_bottom(Line::from(who).right_aligned()),
        )
        .select(state.view.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Render the main body content.
fn render_body(frame: &mut Frame, area: Rect, state: &AdminState) {
    // The drill-down pane takes the lower half while open.
    let (main, detail) = match &state.detail_title {
        Some(_) => {
            let [top, bottom] =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
            (top, Some(bottom))
        }
        None => (area, None),
    };
    let main_focused = detail.is_none();

    match state.view {
        View::Dashboard => render_dashboard(frame, main, state),
        View::Users => {
            let title = if state.show_approved_users {
                " Approved users (p: show pending, Enter: schools) "
            } else {
                " Pending users (p: show approved, Enter: schools) "
            };
            GridTable::new(&state.users)
                .title(title)
                .focused(main_focused)
                .render(frame, main);
        }
        View::Schools => render_schools(frame, main, state, main_focused),
        View::Hospitals => render_hospitals(frame, main, state, main_focused),
        View::Bookings => {
            GridTable::new(&state.bookings)
                .title(format!(" Bookings ({}) ", state.bookings.row_count()))
                .empty_message("No bookings found")
                .focused(main_focused)
                .render(frame, main);
        }
    }

    if let (Some(area), Some(title)) = (detail, &state.detail_title) {
        let empty = if state.detail_department.is_some() {
            "No schools have bookings in this department yet"
        } else {
            "No records found"
        };
        let hint = if state.detail_department.is_some() {
            "Enter: students, Esc: close"
        } else {
            "Esc: close"
        };
        GridTable::new(&state.detail)
            .title(format!(" {} ({}) ", title, hint))
            .footer(state.detail_info.clone())
            .empty_message(empty)
            .render(frame, area);
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AdminState) {
    let theme = Theme::default();
    let counts = &state.dashboard;

    let stat = |label: &str, value: usize, color: Color| {
        Line::from(vec![
            Span::raw(format!("  {:<18}", label)),
            Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("  Overview", theme.bold().fg(theme.accent))),
        Line::from(""),
        stat("Pending users", counts.pending_users, theme.warning),
        stat("Pending schools", counts.pending_schools, theme.warning),
        stat("Hospitals", counts.hospitals, theme.success),
        stat("Bookings", counts.bookings, theme.success),
        Line::from(""),
        Line::from(Span::styled(
            "  r: refresh | 2-5: open a view",
            theme.muted_style(),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Dashboard ")
            .border_style(theme.focused_border()),
    );
    frame.render_widget(paragraph, area);
}

fn render_schools(frame: &mut Frame, area: Rect, state: &AdminState, focused: bool) {
    let theme = Theme::default();
    let [table_area, stats_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    GridTable::new(&state.schools)
        .title(" Schools (a: approve, x: reject, Enter: students) ")
        .empty_message("No schools found")
        .focused(focused)
        .render(frame, table_area);

    let stats = &state.school_stats;
    let line = Line::from(vec![
        Span::raw(format!(" Total: {} schools | ", stats.total)),
        Span::styled(format!("Approved: {}", stats.approved), theme.success_style()),
        Span::raw(" | "),
        Span::styled(format!("Pending: {}", stats.pending), theme.warning_style()),
        Span::raw(" | "),
        Span::styled(format!("Rejected: {}", stats.rejected), theme.error_style()),
    ]);
    frame.render_widget(Paragraph::new(line), stats_area);
}

fn render_hospitals(frame: &mut Frame, area: Rect, state: &AdminState, focused: bool) {
    let [tabs_area, table_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

    let titles: Vec<&str> = HospitalTab::ALL.iter().map(|t| t.title()).collect();
    let selected = HospitalTab::ALL
        .iter()
        .position(|t| *t == state.hospital_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, tabs_area);

    let (grid, hint) = match state.hospital_tab {
        HospitalTab::Hospitals => (&state.hospitals, " Hospitals (n: add) "),
        HospitalTab::Departments => (&state.departments, " Departments (n: add, Enter: schools) "),
        HospitalTab::SlotDates => (&state.slot_dates, " Slot dates (n: add) "),
        HospitalTab::Timeslots => (&state.timeslots, " Time slots (n: add, Enter: students) "),
    };
    GridTable::new(grid)
        .title(hint)
        .focused(focused)
        .render(frame, table_area);
}

/// Render the footer with status, progress or error.
fn render_footer(frame: &mut Frame, area: Rect, state: &AdminState) {
    let theme = Theme::default();

    let status = if let Some(progress) = &state.progress {
        Span::styled(format!("⏳ {}", progress), theme.warning_style())
    } else if let Some(error) = &state.last_error {
        Span::styled(error.clone(), theme.error_style())
    } else {
        Span::styled(
            state.status_message.clone().unwrap_or_else(|| "Ready".to_string()),
            theme.success_style(),
        )
    };

    let help = " q: quit | Tab: next view | r: refresh | j/k: move ";

    let footer = Line::from(vec![
        status,
        Span::raw(" | "),
        Span::styled(help, theme.muted_style()),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}
