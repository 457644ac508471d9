//! Loads and mutations, each run through the task runner.
//!
//! Nothing here touches [`AdminState`] directly: workers only talk to the
//! store, and every state change happens in a callback on the UI context.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use sapa_core::{
    AppointmentId, DataGrid, DepartmentId, SchoolId, SchoolStats, TableResult, TimeslotId, UserId,
};
use sapa_db::columns::{self, ColumnSpec};
use sapa_db::{
    AdminStore, DashboardCounts, DbError, LoginOutcome, NewDepartment, NewHospital, NewTimeslot,
};
use sapa_runtime::{Callbacks, MessageSurface, TableCallbacks, Task, TaskRunner};

use crate::state::{AdminState, HospitalTab, Screen, View};

type GridFn = fn(&mut AdminState) -> &mut DataGrid;

/// Handle to the store plus the runner that delivers results to the UI.
#[derive(Clone)]
pub struct Console {
    runner: TaskRunner<AdminState>,
    store: Arc<dyn AdminStore>,
}

impl Console {
    pub fn new(runner: TaskRunner<AdminState>, store: Arc<dyn AdminStore>) -> Self {
        Self { runner, store }
    }

    fn store(&self) -> Arc<dyn AdminStore> {
        Arc::clone(&self.store)
    }

    // === Authentication ===

    pub fn login(&self, email: String, password: String) {
        let store = self.store();
        let console = self.clone();
        let callbacks = Callbacks::with_default_error(move |state: &mut AdminState, outcome: LoginOutcome| {
            if outcome.authenticated {
                info!(user_id = ?outcome.user_id, "Administrator logged in");
                state.set_status(format!("Welcome! {}", outcome.message));
                state.screen = Screen::Console;
                state.form = None;
                state.admin = Some(outcome);
                console.refresh_all(state);
            } else {
                let message = if outcome.message.is_empty() {
                    "Invalid email or password".to_string()
                } else {
                    outcome.message
                };
                state.show_error(format!("Login failed: {}", message));
            }
        })
        .with_progress("Signing in...");

        self.runner
            .run_async(async move { store.login_admin(&email, &password).await }, callbacks);
    }

    // === Loading ===

    /// Reload the data behind the current view.
    pub fn refresh(&self, state: &AdminState) {
        match state.view {
            View::Dashboard => self.load_dashboard(),
            View::Users => self.load_users(state.show_approved_users),
            View::Schools => self.load_schools(),
            View::Hospitals => self.load_hospital_tab(state.hospital_tab),
            View::Bookings => self.load_bookings(),
        }
    }

    /// Reload every view.
    pub fn refresh_all(&self, state: &AdminState) {
        self.load_dashboard();
        self.load_users(state.show_approved_users);
        self.load_schools();
        for tab in HospitalTab::ALL {
            self.load_hospital_tab(tab);
        }
        self.load_bookings();
    }

    pub fn load_dashboard(&self) {
        let store = self.store();
        let callbacks = Callbacks::with_default_error(|state: &mut AdminState, counts: DashboardCounts| {
            state.dashboard = counts;
        })
        .with_progress("Loading dashboard...");
        self.runner
            .run_async(async move { store.dashboard().await }, callbacks);
    }

    pub fn load_users(&self, approved: bool) {
        let store = self.store();
        let what = if approved { "approved users" } else { "pending users" };
        self.load_table(what, AdminState::users_grid, async move {
            store.fetch_users(approved).await
        });
    }

    /// Load schools and recompute the status statistics.
    pub fn load_schools(&self) {
        let store = self.store();
        let hooks = progress_hooks("schools").on_finish(|state: &mut AdminState| {
            state.school_stats = SchoolStats::from_rows(state.schools.rows(), columns::SCHOOL_STATUS);
            state.hide_progress();
        });
        self.runner.run_for_table_result(
            Task::future(async move { store.fetch_schools().await }),
            AdminState::schools_grid,
            hooks,
        );
    }

    pub fn load_hospital_tab(&self, tab: HospitalTab) {
        let store = self.store();
        let grid = AdminState::hospital_tab_grid(tab);
        match tab {
            HospitalTab::Hospitals => {
                self.load_table("hospitals", grid, async move { store.fetch_hospitals().await })
            }
            HospitalTab::Departments => {
                self.load_table("departments", grid, async move { store.fetch_departments().await })
            }
            HospitalTab::SlotDates => {
                self.load_table("slot dates", grid, async move { store.fetch_slot_dates().await })
            }
            HospitalTab::Timeslots => {
                self.load_table("time slots", grid, async move { store.fetch_timeslots().await })
            }
        }
    }

    pub fn load_bookings(&self) {
        let store = self.store();
        self.load_table("bookings", AdminState::bookings_grid, async move {
            store.fetch_bookings().await
        });
    }

    fn load_table<Fut>(&self, what: &'static str, grid: GridFn, fetch: Fut)
    where
        Fut: Future<Output = Result<TableResult, DbError>> + Send + 'static,
    {
        let hooks = progress_hooks(what).on_finish(|state: &mut AdminState| state.hide_progress());
        self.runner
            .run_for_table_result(Task::future(fetch), grid, hooks);
    }

    // === Drill-down ===

    pub fn show_user_schools(&self, state: &mut AdminState, id: UserId, name: &str) {
        let store = self.store();
        let title = format!("Schools submitted by {}", name);
        self.open_detail(state, "schools", title, columns::USER_SCHOOLS, async move {
            store.fetch_schools_for_user(id).await
        });
    }

    pub fn show_school_students(&self, state: &mut AdminState, id: SchoolId, name: &str) {
        let store = self.store();
        self.open_detail(state, "students", format!("Students of {}", name), columns::SCHOOL_STUDENTS, async move {
            store.fetch_students_for_school(id).await
        });
    }

    /// Schools with bookings in a department; Enter on one lists its students.
    pub fn show_department_schools(&self, state: &mut AdminState, id: DepartmentId) {
        let store = self.store();
        let title = format!("Schools with bookings in department #{}", id);
        self.open_detail(state, "schools", title.clone(), columns::DEPARTMENT_SCHOOLS, async move {
            store.fetch_schools_by_department(id).await
        });
        state.detail_department = Some(id);
        self.describe_department(title, id);
    }

    pub fn show_department_school_students(
        &self,
        state: &mut AdminState,
        school: SchoolId,
        name: &str,
        department: DepartmentId,
    ) {
        let store = self.store();
        let title = format!("Students of {} in department #{}", name, department);
        self.open_detail(state, "students", title.clone(), columns::DEPARTMENT_STUDENTS, async move {
            store.fetch_students_by_school_and_department(school, department).await
        });
        self.describe_department(title, department);
    }

    pub fn show_timeslot_students(&self, state: &mut AdminState, id: TimeslotId) {
        let store = self.store();
        let title = format!("Students in time slot #{}", id);
        self.open_detail(state, "students", title.clone(), columns::TIMESLOT_STUDENTS, async move {
            store.fetch_students_by_timeslot(id).await
        });

        let store = self.store();
        self.load_detail_info(title, "Unknown Timeslot", async move {
            store
                .fetch_timeslot_details(id)
                .await
                .map(|details| details.map(|d| d.to_string()))
        });
    }

    pub fn show_booking_students(&self, state: &mut AdminState, id: AppointmentId) {
        let store = self.store();
        self.open_detail(state, "students", format!("Students in booking #{}", id), columns::BOOKING_STUDENTS, async move {
            store.fetch_students_by_booking(id).await
        });
    }

    fn describe_department(&self, title: String, id: DepartmentId) {
        let store = self.store();
        self.load_detail_info(title, "Unknown Department", async move {
            store.fetch_department_name(id).await
        });
    }

    /// Open the drill-down pane and fill it with the `spec` columns of the result.
    fn open_detail<Fut>(
        &self,
        state: &mut AdminState,
        what: &'static str,
        title: String,
        spec: &[ColumnSpec],
        fetch: Fut,
    ) where
        Fut: Future<Output = Result<TableResult, DbError>> + Send + 'static,
    {
        state.open_detail(title, spec);
        let columns = columns::labels(spec).map(String::from).collect();
        let hooks = progress_hooks(what).on_finish(|state: &mut AdminState| state.hide_progress());
        self.runner.run_for_table(
            Task::future(async move { fetch.await.map(|table| table.into_parts().1) }),
            AdminState::detail_grid,
            columns,
            hooks,
        );
    }

    /// Fetch the info line of the pane titled `title`.
    fn load_detail_info<Fut>(&self, title: String, fallback: &'static str, fetch: Fut)
    where
        Fut: Future<Output = Result<Option<String>, DbError>> + Send + 'static,
    {
        let callbacks = Callbacks::new(
            move |state: &mut AdminState, info: Option<String>| {
                let info = info.unwrap_or_else(|| fallback.to_string());
                state.set_detail_info(&title, info);
            },
            |_: &mut AdminState, e| warn!(error = %e, "Could not load drill-down details"),
        )
        .with_progress("Loading details...");
        self.runner.run_async(fetch, callbacks);
    }

    // === Mutations ===

    pub fn approve_user(&self, id: UserId) {
        let store = self.store();
        self.mutate("Approving user...", async move { store.approve_user(id).await }, move |state, changed| {
            report_change(state, changed, format!("User {} approved", id));
        });
    }

    pub fn approve_school(&self, id: SchoolId) {
        let store = self.store();
        self.mutate("Approving school...", async move { store.approve_school(id).await }, move |state, changed| {
            report_change(state, changed, format!("School {} approved", id));
        });
    }

    pub fn reject_school(&self, id: SchoolId) {
        let store = self.store();
        self.mutate("Rejecting school...", async move { store.reject_school(id).await }, move |state, changed| {
            report_change(state, changed, format!("School {} rejected", id));
        });
    }

    pub fn approve_booking(&self, id: AppointmentId) {
        let store = self.store();
        self.mutate("Approving booking...", async move { store.approve_booking(id).await }, move |state, changed| {
            report_change(state, changed, format!("Booking {} approved", id));
        });
    }

    pub fn add_hospital(&self, hospital: NewHospital) {
        let store = self.store();
        let name = hospital.name.clone();
        self.mutate("Adding hospital...", async move { store.add_hospital(&hospital).await }, move |state, ()| {
            state.set_status(format!("Hospital '{}' added", name));
        });
    }

    pub fn add_department(&self, department: NewDepartment) {
        let store = self.store();
        let section = department.section_name.clone();
        self.mutate("Adding department...", async move { store.add_department(&department).await }, move |state, ()| {
            state.set_status(format!("Department '{}' added", section));
        });
    }

    pub fn add_slot_date(&self, department: DepartmentId, date: NaiveDate) {
        let store = self.store();
        self.mutate("Adding slot date...", async move { store.add_slot_date(department, date).await }, move |state, ()| {
            state.set_status(format!("Slot date {} added", date));
        });
    }

    pub fn add_timeslot(&self, timeslot: NewTimeslot) {
        let store = self.store();
        let label = format!("{}-{}", timeslot.start.format("%H:%M"), timeslot.end.format("%H:%M"));
        self.mutate("Adding time slot...", async move { store.add_timeslot(&timeslot).await }, move |state, ()| {
            state.set_status(format!("Time slot {} added", label));
        });
    }

    /// Run a mutation, report it, then reload the affected view.
    fn mutate<T, Fut, F>(&self, progress: &'static str, fut: Fut, on_done: F)
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, DbError>> + Send + 'static,
        F: FnOnce(&mut AdminState, T) + Send + 'static,
    {
        let console = self.clone();
        let callbacks = Callbacks::with_default_error(move |state: &mut AdminState, value: T| {
            on_done(state, value);
            if state.refresh_after_mutation {
                console.refresh(state);
                if state.view != View::Dashboard {
                    console.load_dashboard();
                }
            }
        })
        .with_progress(progress);
        self.runner.run_async(fut, callbacks);
    }
}

fn progress_hooks(what: &'static str) -> TableCallbacks<AdminState> {
    TableCallbacks::new().on_start(move |state: &mut AdminState| {
        state.show_progress(&format!("Loading {}...", what));
    })
}

fn report_change(state: &mut AdminState, changed: bool, message: String) {
    if changed {
        state.set_status(message);
    } else {
        state.show_error("No rows were updated; the record may no longer exist".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapa_core::CellValue;
    use sapa_db::InMemoryStore;
    use sapa_runtime::{ui_channel, UiContext};
    use tokio::runtime::Handle;

    fn setup() -> (Console, UiContext<AdminState>, AdminState) {
        let (handle, ctx) = ui_channel();
        let runner = TaskRunner::new(Handle::current(), handle);
        let store: Arc<dyn AdminStore> = Arc::new(InMemoryStore::seeded());
        (Console::new(runner, store), ctx, AdminState::new("demo"))
    }

    /// Run UI jobs until nothing is queued or in flight.
    async fn settle(ctx: &mut UiContext<AdminState>, state: &mut AdminState) {
        loop {
            if ctx.run_pending(state) > 0 {
                continue;
            }
            if !state.is_busy() {
                break;
            }
            if !ctx.run_next(state).await {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_login_switches_to_console_and_loads() {
        let (console, mut ctx, mut state) = setup();
        console.login("admin@sapa.test".into(), "admin123".into());
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.screen, Screen::Console);
        assert!(state.admin.is_some());
        assert_eq!(state.dashboard.pending_schools, 2);
        assert_eq!(state.users.row_count(), 2);
        assert_eq!(state.timeslots.row_count(), 4);
        assert_eq!(state.school_stats.total, 5);
        assert!(state.progress.is_none());
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_login_screen() {
        let (console, mut ctx, mut state) = setup();
        console.login("admin@sapa.test".into(), "wrong".into());
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.last_error.as_deref(), Some("Login failed: Incorrect password"));
    }

    #[tokio::test]
    async fn test_approve_school_refreshes_view_and_stats() {
        let (console, mut ctx, mut state) = setup();
        state.view = View::Schools;
        console.load_schools();
        settle(&mut ctx, &mut state).await;
        assert_eq!(state.school_stats.pending, 2);

        console.approve_school(SchoolId::new(3));
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.status_message.as_deref(), Some("School 3 approved"));
        assert_eq!(state.school_stats.pending, 1);
        assert_eq!(state.schools.rows()[2][3], CellValue::from("approved"));
        assert_eq!(state.dashboard.pending_schools, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_reports_error() {
        let (console, mut ctx, mut state) = setup();
        state.refresh_after_mutation = false;
        console.approve_booking(AppointmentId::new(404));
        settle(&mut ctx, &mut state).await;

        assert!(state.last_error.as_deref().unwrap().starts_with("No rows were updated"));
    }

    #[tokio::test]
    async fn test_store_error_goes_to_default_surface() {
        let (console, mut ctx, mut state) = setup();
        state.refresh_after_mutation = false;
        console.add_department(NewDepartment {
            hospital_id: sapa_core::HospitalId::new(99),
            section_name: "Oncology".into(),
            price_per_student: 10.0,
        });
        settle(&mut ctx, &mut state).await;

        let error = state.last_error.unwrap();
        assert!(error.starts_with("Database operation failed: "), "{}", error);
        assert!(error.contains("hospital 99"));
    }

    #[tokio::test]
    async fn test_drill_down_fills_detail_grid() {
        let (console, mut ctx, mut state) = setup();
        console.show_booking_students(&mut state, AppointmentId::new(1));
        assert_eq!(state.detail_title.as_deref(), Some("Students in booking #1"));
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.detail.row_count(), 3);
        assert_eq!(state.detail.columns().len(), columns::BOOKING_STUDENTS.len());
    }

    #[tokio::test]
    async fn test_user_schools_drill_down() {
        let (console, mut ctx, mut state) = setup();
        console.show_user_schools(&mut state, UserId::new(5), "Thabo Mokoena");
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.detail_title.as_deref(), Some("Schools submitted by Thabo Mokoena"));
        assert_eq!(state.detail.columns()[1], "Code");
        assert_eq!(state.detail.row_count(), 2);
        assert_eq!(state.detail.rows()[1][2], CellValue::from("Lakeside Prep"));
    }

    #[tokio::test]
    async fn test_department_drill_down_two_levels() {
        let (console, mut ctx, mut state) = setup();
        console.show_department_schools(&mut state, DepartmentId::new(2));
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.detail_department, Some(DepartmentId::new(2)));
        assert_eq!(state.detail_info.as_deref(), Some("City General Hospital - Pediatrics"));
        assert_eq!(state.detail.rows()[0][1], CellValue::from("Hillcrest College"));
        assert_eq!(state.detail.rows()[0][3], CellValue::Int(2));

        console.show_department_school_students(
            &mut state,
            SchoolId::new(2),
            "Hillcrest College",
            DepartmentId::new(2),
        );
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.detail_department, None);
        assert_eq!(state.detail.columns().len(), columns::DEPARTMENT_STUDENTS.len());
        assert_eq!(state.detail.row_count(), 2);
        assert_eq!(state.detail_info.as_deref(), Some("City General Hospital - Pediatrics"));
    }

    #[tokio::test]
    async fn test_unknown_department_gets_fallback_name() {
        let (console, mut ctx, mut state) = setup();
        console.show_department_schools(&mut state, DepartmentId::new(77));
        settle(&mut ctx, &mut state).await;

        assert!(state.detail.is_empty());
        assert_eq!(state.detail_info.as_deref(), Some("Unknown Department"));
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_timeslot_drill_down_shows_details() {
        let (console, mut ctx, mut state) = setup();
        console.show_timeslot_students(&mut state, TimeslotId::new(3));
        settle(&mut ctx, &mut state).await;

        assert_eq!(state.detail.row_count(), 2);
        assert_eq!(
            state.detail_info.as_deref(),
            Some("City General Hospital - Pediatrics | 2025-03-12 | 09:00 - 11:00 (Capacity: 12)")
        );
    }
}
