//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tracing::{debug, info, warn};

use sapa_core::{AppointmentId, CellValue, DepartmentId, SchoolId, TimeslotId, UserId};
use sapa_runtime::{MessageSurface, UiContext};

use crate::actions::Console;
use crate::form::{Form, FormKind, FormOutcome};
use crate::state::{AdminState, HospitalTab, PendingAction, Screen, View};
use crate::ui;

/// Main application: UI state, the UI context draining runner callbacks,
/// and the console issuing work.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: AdminState,

    /// Jobs posted by the task runner, run on this thread only.
    ui: UiContext<AdminState>,

    console: Console,
}

impl App {
    pub fn new(state: AdminState, mut ui: UiContext<AdminState>, console: Console) -> Self {
        ui.set_panic_handler(|state: &mut AdminState, message| {
            state.show_error(format!("Internal error: {}", message));
        });
        Self { state, ui, console }
    }

    /// Start on the login form.
    pub fn start_with_login(&mut self) {
        self.state.screen = Screen::Login;
        self.state.form = Some(Form::login());
    }

    /// Skip the login form with credentials given on the command line.
    pub fn start_logged_in(&mut self, email: String, password: String) {
        self.start_with_login();
        self.console.login(email, password);
    }

    /// Run the main event loop.
    ///
    /// This runs on the main thread and handles:
    /// - Drawing the UI
    /// - Processing keyboard input
    /// - Running callbacks posted by background tasks
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            // Poll terminal events (non-blocking with short timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Run callbacks delivered by workers (non-blocking)
            let ran = self.ui.run_pending(&mut self.state);
            if ran > 0 {
                debug!(jobs = ran, "Ran UI jobs");
            }

            if self.state.should_quit {
                break;
            }
        }

        info!(jobs = self.ui.executed(), "Event loop finished");
        Ok(())
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return;
        }

        if self.state.form.is_some() {
            self.handle_form_key(key.code);
            return;
        }

        if let Some(action) = self.state.confirm.take() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.perform(action),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.set_status("Cancelled");
                }
                _ => self.state.confirm = Some(action),
            }
            return;
        }

        self.handle_console_key(key.code);
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };

        match form.handle_key(code) {
            FormOutcome::Editing => {}
            FormOutcome::Cancel => {
                if form.kind == FormKind::Login {
                    self.state.should_quit = true;
                } else {
                    self.state.form = None;
                    self.state.last_error = None;
                }
            }
            FormOutcome::Submit => {
                let form = form.clone();
                self.submit(&form);
            }
        }
    }

    /// Validate a submitted form and run it; invalid input keeps it open.
    fn submit(&mut self, form: &Form) {
        let result = match form.kind {
            FormKind::Login => {
                let (email, password) = form.credentials();
                if email.is_empty() || password.is_empty() {
                    self.state.show_error("Please enter both email and password".to_string());
                    return;
                }
                self.state.last_error = None;
                self.console.login(email, password);
                return;
            }
            FormKind::Hospital => form.to_hospital().map(|h| self.console.add_hospital(h)),
            FormKind::Department => form.to_department().map(|d| self.console.add_department(d)),
            FormKind::SlotDate => form
                .to_slot_date()
                .map(|(department, date)| self.console.add_slot_date(department, date)),
            FormKind::Timeslot => form.to_timeslot().map(|t| self.console.add_timeslot(t)),
        };

        match result {
            Ok(()) => {
                self.state.form = None;
                self.state.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, form = form.kind.title(), "Rejected form input");
                self.state.show_error(e.to_string());
            }
        }
    }

    fn handle_console_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.state.should_quit = true;
            }

            // Escape closes the drill-down pane first
            KeyCode::Esc => {
                if self.state.detail_title.is_some() {
                    self.state.close_detail();
                } else {
                    self.state.should_quit = true;
                }
            }

            // View switching with number keys
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.switch_view(View::ALL[index]);
            }
            KeyCode::Tab => self.switch_view(self.state.view.next()),
            KeyCode::BackTab => self.switch_view(self.state.view.prev()),

            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(grid) = self.state.focused_grid_mut() {
                    grid.select_prev();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(grid) = self.state.focused_grid_mut() {
                    grid.select_next();
                }
            }

            // Hospital sub-tabs
            KeyCode::Left | KeyCode::Char('[') if self.state.view == View::Hospitals => {
                self.switch_hospital_tab(self.state.hospital_tab.prev());
            }
            KeyCode::Right | KeyCode::Char(']') if self.state.view == View::Hospitals => {
                self.switch_hospital_tab(self.state.hospital_tab.next());
            }

            KeyCode::Char('r') => {
                self.state.last_error = None;
                self.console.refresh(&self.state);
            }

            KeyCode::Char('p') if self.state.view == View::Users => {
                self.state.show_approved_users = !self.state.show_approved_users;
                self.console.load_users(self.state.show_approved_users);
            }

            KeyCode::Char('a') => self.request_approve(),
            KeyCode::Char('x') if self.state.view == View::Schools => self.request_reject(),
            KeyCode::Char('n') if self.state.view == View::Hospitals => self.open_add_form(),
            KeyCode::Enter => self.drill_down(),

            _ => {}
        }
    }

    fn switch_view(&mut self, view: View) {
        if self.state.view != view {
            self.state.close_detail();
            self.state.view = view;
            self.console.refresh(&self.state);
        }
    }

    fn switch_hospital_tab(&mut self, tab: HospitalTab) {
        self.state.close_detail();
        self.state.hospital_tab = tab;
        self.console.load_hospital_tab(tab);
    }

    /// Ask to approve the selected user, school or booking.
    fn request_approve(&mut self) {
        if self.state.detail_title.is_some() {
            return;
        }
        let action = match self.state.view {
            View::Users if !self.state.show_approved_users => {
                selected(&self.state.users, 1).map(|(id, name)| PendingAction::ApproveUser { id, name })
            }
            View::Schools => {
                selected(&self.state.schools, 1).map(|(id, name)| PendingAction::ApproveSchool { id, name })
            }
            View::Bookings => selected(&self.state.bookings, 1)
                .map(|(id, school)| PendingAction::ApproveBooking { id, school }),
            _ => None,
        };
        self.ask(action);
    }

    fn request_reject(&mut self) {
        if self.state.detail_title.is_some() {
            return;
        }
        let action = selected(&self.state.schools, 1).map(|(id, name)| PendingAction::RejectSchool { id, name });
        self.ask(action);
    }

    fn ask(&mut self, action: Option<PendingAction>) {
        match action {
            Some(action) => self.state.confirm = Some(action),
            None => self.state.show_error("Select a row first".to_string()),
        }
    }

    /// Run a confirmed mutation.
    fn perform(&mut self, action: PendingAction) {
        info!(action = ?action, "Confirmed");
        match action {
            PendingAction::ApproveUser { id, .. } => self.console.approve_user(UserId::new(id)),
            PendingAction::ApproveSchool { id, .. } => self.console.approve_school(SchoolId::new(id)),
            PendingAction::RejectSchool { id, .. } => self.console.reject_school(SchoolId::new(id)),
            PendingAction::ApproveBooking { id, .. } => {
                self.console.approve_booking(AppointmentId::new(id))
            }
        }
    }

    /// Open the add form of the current hospitals sub-tab.
    ///
    /// The parent id is prefilled from the selected row of the parent tab.
    fn open_add_form(&mut self) {
        let selected_id = |grid: &sapa_core::DataGrid| selected(grid, 0).map(|(id, _)| id);
        let form = match self.state.hospital_tab {
            HospitalTab::Hospitals => Form::hospital(),
            HospitalTab::Departments => Form::department(selected_id(&self.state.hospitals)),
            HospitalTab::SlotDates => Form::slot_date(selected_id(&self.state.departments)),
            HospitalTab::Timeslots => Form::timeslot(selected_id(&self.state.slot_dates)),
        };
        self.state.last_error = None;
        self.state.form = Some(form);
    }

    /// Open the drill-down pane for the selected row.
    ///
    /// Inside a department's school list, Enter goes one level further to
    /// the students that school booked there.
    fn drill_down(&mut self) {
        if self.state.detail_title.is_some() {
            if let Some(department) = self.state.detail_department {
                if let Some((id, name)) = selected(&self.state.detail, 1) {
                    self.console.show_department_school_students(
                        &mut self.state,
                        SchoolId::new(id),
                        &name,
                        department,
                    );
                }
            }
            return;
        }
        match self.state.view {
            View::Users => {
                if let Some((id, name)) = selected(&self.state.users, 1) {
                    self.console
                        .show_user_schools(&mut self.state, UserId::new(id), &name);
                }
            }
            View::Schools => {
                if let Some((id, name)) = selected(&self.state.schools, 1) {
                    self.console
                        .show_school_students(&mut self.state, SchoolId::new(id), &name);
                }
            }
            View::Hospitals if self.state.hospital_tab == HospitalTab::Departments => {
                if let Some((id, _)) = selected(&self.state.departments, 0) {
                    self.console
                        .show_department_schools(&mut self.state, DepartmentId::new(id));
                }
            }
            View::Hospitals if self.state.hospital_tab == HospitalTab::Timeslots => {
                if let Some((id, _)) = selected(&self.state.timeslots, 0) {
                    self.console
                        .show_timeslot_students(&mut self.state, TimeslotId::new(id));
                }
            }
            View::Bookings => {
                if let Some((id, _)) = selected(&self.state.bookings, 0) {
                    self.console
                        .show_booking_students(&mut self.state, AppointmentId::new(id));
                }
            }
            _ => {}
        }
    }
}

/// Id (first column) and a label column of the selected row.
///
/// Placeholder rows without a numeric id select nothing.
fn selected(grid: &sapa_core::DataGrid, label_column: usize) -> Option<(i64, String)> {
    let id = grid.selected_cell(0).and_then(CellValue::as_i64)?;
    let label = grid
        .selected_cell(label_column)
        .map(|c| c.to_string())
        .unwrap_or_default();
    Some((id, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sapa_db::{AdminStore, InMemoryStore};
    use sapa_runtime::{ui_channel, TaskRunner, UiHandle};
    use tokio::runtime::Handle;

    fn app_with_handle() -> (App, UiHandle<AdminState>) {
        let (handle, ctx) = ui_channel();
        let runner = TaskRunner::new(Handle::current(), handle.clone());
        let store: Arc<dyn AdminStore> = Arc::new(InMemoryStore::seeded());
        let app = App::new(AdminState::new("demo"), ctx, Console::new(runner, store));
        (app, handle)
    }

    fn app() -> App {
        app_with_handle().0
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn settle(app: &mut App) {
        loop {
            if app.ui.run_pending(&mut app.state) > 0 {
                continue;
            }
            if !app.state.is_busy() {
                break;
            }
            if !app.ui.run_next(&mut app.state).await {
                break;
            }
        }
    }

    async fn logged_in() -> App {
        let mut app = app();
        app.start_with_login();
        type_text(&mut app, "admin@sapa.test");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "admin123");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;
        app
    }

    #[tokio::test]
    async fn test_login_form_flow() {
        let app = logged_in().await;
        assert_eq!(app.state.screen, Screen::Console);
        assert!(app.state.form.is_none());
        assert_eq!(app.state.dashboard.bookings, 2);
    }

    #[tokio::test]
    async fn test_empty_login_is_rejected_locally() {
        let mut app = app();
        app.start_with_login();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(app.state.last_error.is_some());
        assert!(!app.state.is_busy());
    }

    #[tokio::test]
    async fn test_approve_pending_user_with_confirmation() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('2'));
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(
            app.state.confirm,
            Some(PendingAction::ApproveUser { id: 4, .. })
        ));

        press(&mut app, KeyCode::Char('y'));
        settle(&mut app).await;
        assert_eq!(app.state.status_message.as_deref(), Some("User 4 approved"));
        assert_eq!(app.state.users.row_count(), 1);
        assert_eq!(app.state.dashboard.pending_users, 1);
    }

    #[tokio::test]
    async fn test_cancelled_confirmation_changes_nothing() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('3'));
        settle(&mut app).await;
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('n'));
        settle(&mut app).await;

        assert!(app.state.confirm.is_none());
        assert_eq!(app.state.school_stats.rejected, 1);
    }

    #[tokio::test]
    async fn test_drill_down_and_close() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('5'));
        settle(&mut app).await;

        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;
        assert_eq!(app.state.detail.row_count(), 3);

        press(&mut app, KeyCode::Esc);
        assert!(app.state.detail_title.is_none());
        assert!(!app.state.should_quit);
    }

    #[tokio::test]
    async fn test_enter_on_user_lists_their_schools() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('2'));
        settle(&mut app).await;
        press(&mut app, KeyCode::Down);

        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;
        assert_eq!(app.state.detail_title.as_deref(), Some("Schools submitted by Thabo Mokoena"));
        assert_eq!(app.state.detail.row_count(), 2);
        assert_eq!(app.state.detail.columns()[1], "Code");
    }

    #[tokio::test]
    async fn test_department_drill_down_to_students() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('4'));
        settle(&mut app).await;
        press(&mut app, KeyCode::Right);
        settle(&mut app).await;
        assert_eq!(app.state.hospital_tab, HospitalTab::Departments);

        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;
        assert_eq!(app.state.detail_department, Some(DepartmentId::new(1)));
        assert_eq!(app.state.detail_info.as_deref(), Some("City General Hospital - Cardiology"));
        assert_eq!(app.state.detail.rows()[0][1], CellValue::from("Greenfield High"));

        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;
        assert_eq!(
            app.state.detail_title.as_deref(),
            Some("Students of Greenfield High in department #1")
        );
        assert_eq!(app.state.detail.row_count(), 3);
        assert_eq!(app.state.detail.rows()[0][1], CellValue::from("Lerato Khumalo"));

        // Students are a leaf; Enter does nothing more.
        press(&mut app, KeyCode::Enter);
        assert!(!app.state.is_busy());

        press(&mut app, KeyCode::Esc);
        assert!(app.state.detail_title.is_none());
    }

    #[tokio::test]
    async fn test_add_department_form_prefills_selected_hospital() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('4'));
        settle(&mut app).await;
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('n'));
        let form = app.state.form.clone().unwrap();
        assert_eq!(form.kind, FormKind::Department);
        assert_eq!(form.fields[0].value, "2");

        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Oncology");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "80");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert!(app.state.form.is_none());
        assert_eq!(app.state.departments.row_count(), 4);
        assert_eq!(app.state.status_message.as_deref(), Some("Department 'Oncology' added"));
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let mut app = logged_in().await;
        press(&mut app, KeyCode::Char('4'));
        settle(&mut app).await;
        press(&mut app, KeyCode::Char('n'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Enter);
        }
        assert!(app.state.form.is_some());
        assert!(app.state.last_error.as_deref().unwrap().contains("must not be empty"));
    }

    #[tokio::test]
    async fn test_panicking_job_is_reported() {
        let (mut app, handle) = app_with_handle();
        handle.post(|_state: &mut AdminState| panic!("boom")).unwrap();
        settle(&mut app).await;
        assert_eq!(app.state.last_error.as_deref(), Some("Internal error: boom"));
    }
}
