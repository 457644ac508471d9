//! UI state for rendering.
//!
//! Everything here is owned by the event loop and only mutated on the UI
//! context, either directly by key handling or by jobs the task runner posts.

use sapa_core::{DataGrid, DepartmentId, SchoolStats};
use sapa_db::columns::{self, ColumnSpec};
use sapa_db::{DashboardCounts, LoginOutcome};
use sapa_runtime::MessageSurface;

use crate::form::Form;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Console,
}

/// Available views in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Users,
    Schools,
    Hospitals,
    Bookings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Users,
        View::Schools,
        View::Hospitals,
        View::Bookings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Users => "Users",
            View::Schools => "Schools",
            View::Hospitals => "Hospitals",
            View::Bookings => "Bookings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Sub-tabs of the hospitals view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HospitalTab {
    #[default]
    Hospitals,
    Departments,
    SlotDates,
    Timeslots,
}

impl HospitalTab {
    pub const ALL: [HospitalTab; 4] = [
        HospitalTab::Hospitals,
        HospitalTab::Departments,
        HospitalTab::SlotDates,
        HospitalTab::Timeslots,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            HospitalTab::Hospitals => "Hospitals",
            HospitalTab::Departments => "Departments",
            HospitalTab::SlotDates => "Slot Dates",
            HospitalTab::Timeslots => "Time Slots",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            HospitalTab::Hospitals => HospitalTab::Departments,
            HospitalTab::Departments => HospitalTab::SlotDates,
            HospitalTab::SlotDates => HospitalTab::Timeslots,
            HospitalTab::Timeslots => HospitalTab::Hospitals,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            HospitalTab::Hospitals => HospitalTab::Timeslots,
            HospitalTab::Departments => HospitalTab::Hospitals,
            HospitalTab::SlotDates => HospitalTab::Departments,
            HospitalTab::Timeslots => HospitalTab::SlotDates,
        }
    }
}

/// A mutation waiting for the administrator to confirm.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    ApproveUser { id: i64, name: String },
    ApproveSchool { id: i64, name: String },
    RejectSchool { id: i64, name: String },
    ApproveBooking { id: i64, school: String },
}

impl PendingAction {
    pub fn title(&self) -> &'static str {
        match self {
            PendingAction::ApproveUser { .. } => "Approve User",
            PendingAction::ApproveSchool { .. } => "Approve School",
            PendingAction::RejectSchool { .. } => "Reject School",
            PendingAction::ApproveBooking { .. } => "Approve Booking",
        }
    }

    pub fn question(&self) -> String {
        match self {
            PendingAction::ApproveUser { name, .. } => format!("Approve user '{}'?", name),
            PendingAction::ApproveSchool { name, .. } => format!("Approve school '{}'?", name),
            PendingAction::RejectSchool { name, .. } => format!("Reject school '{}'?", name),
            PendingAction::ApproveBooking { id, school } => {
                format!("Approve booking #{} for '{}'?", id, school)
            }
        }
    }
}

fn grid(spec: &[ColumnSpec]) -> DataGrid {
    DataGrid::new(columns::labels(spec))
}

/// Snapshot of data for rendering (no async, no locks).
pub struct AdminState {
    pub screen: Screen,
    pub view: View,
    pub hospital_tab: HospitalTab,

    /// Users view lists approved users instead of pending ones.
    pub show_approved_users: bool,

    pub users: DataGrid,
    pub schools: DataGrid,
    pub hospitals: DataGrid,
    pub departments: DataGrid,
    pub slot_dates: DataGrid,
    pub timeslots: DataGrid,
    pub bookings: DataGrid,

    /// Drill-down pane; open while `detail_title` is set.
    pub detail: DataGrid,
    pub detail_title: Option<String>,
    /// Extra line under the pane, such as where a time slot takes place.
    pub detail_info: Option<String>,
    /// Set while the pane lists a department's schools, so Enter on a
    /// school lists its students in that department.
    pub detail_department: Option<DepartmentId>,

    pub school_stats: SchoolStats,
    pub dashboard: DashboardCounts,

    /// Open input form (login, or adding a record).
    pub form: Option<Form>,

    /// Mutation waiting for confirmation.
    pub confirm: Option<PendingAction>,

    /// Logged-in administrator.
    pub admin: Option<LoginOutcome>,

    /// Name of the data backend, shown in the header.
    pub backend: &'static str,

    /// Reload the current view after every mutation.
    pub refresh_after_mutation: bool,

    /// Status message to display in footer.
    pub status_message: Option<String>,

    /// Last error message (if any).
    pub last_error: Option<String>,

    /// Message of the most recent operation still in flight.
    pub progress: Option<String>,

    /// Number of operations in flight.
    pub in_flight: usize,

    pub should_quit: bool,
}

impl AdminState {
    pub fn new(backend: &'static str) -> Self {
        Self {
            screen: Screen::default(),
            view: View::default(),
            hospital_tab: HospitalTab::default(),
            show_approved_users: false,
            users: grid(columns::USERS),
            schools: grid(columns::SCHOOLS),
            hospitals: grid(columns::HOSPITALS),
            departments: grid(columns::DEPARTMENTS),
            slot_dates: grid(columns::SLOT_DATES),
            timeslots: grid(columns::TIMESLOTS),
            bookings: grid(columns::BOOKINGS),
            detail: DataGrid::default(),
            detail_title: None,
            detail_info: None,
            detail_department: None,
            school_stats: SchoolStats::default(),
            dashboard: DashboardCounts::default(),
            form: None,
            confirm: None,
            admin: None,
            backend,
            refresh_after_mutation: true,
            status_message: None,
            last_error: None,
            progress: None,
            in_flight: 0,
            should_quit: false,
        }
    }

    pub fn users_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.users
    }

    pub fn schools_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.schools
    }

    pub fn hospitals_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.hospitals
    }

    pub fn departments_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.departments
    }

    pub fn slot_dates_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.slot_dates
    }

    pub fn timeslots_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.timeslots
    }

    pub fn bookings_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.bookings
    }

    pub fn detail_grid(state: &mut Self) -> &mut DataGrid {
        &mut state.detail
    }

    /// Grid accessor of a hospitals sub-tab.
    pub fn hospital_tab_grid(tab: HospitalTab) -> fn(&mut Self) -> &mut DataGrid {
        match tab {
            HospitalTab::Hospitals => Self::hospitals_grid,
            HospitalTab::Departments => Self::departments_grid,
            HospitalTab::SlotDates => Self::slot_dates_grid,
            HospitalTab::Timeslots => Self::timeslots_grid,
        }
    }

    /// The grid the cursor keys move in, if the view has one.
    pub fn focused_grid_mut(&mut self) -> Option<&mut DataGrid> {
        if self.detail_title.is_some() {
            return Some(&mut self.detail);
        }
        match self.view {
            View::Dashboard => None,
            View::Users => Some(&mut self.users),
            View::Schools => Some(&mut self.schools),
            View::Hospitals => Some(Self::hospital_tab_grid(self.hospital_tab)(self)),
            View::Bookings => Some(&mut self.bookings),
        }
    }

    /// Open the drill-down pane with an empty grid until rows arrive.
    pub fn open_detail(&mut self, title: String, spec: &[ColumnSpec]) {
        self.detail = grid(spec);
        self.detail_title = Some(title);
        self.detail_info = None;
        self.detail_department = None;
    }

    pub fn close_detail(&mut self) {
        self.detail_title = None;
        self.detail_info = None;
        self.detail_department = None;
        self.detail = DataGrid::default();
    }

    /// Set the pane's info line if it still shows `title`.
    pub fn set_detail_info(&mut self, title: &str, info: String) {
        if self.detail_title.as_deref() == Some(title) {
            self.detail_info = Some(info);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Show a success message and clear the last error.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.last_error = None;
    }
}

impl MessageSurface for AdminState {
    fn show_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    fn show_progress(&mut self, message: &str) {
        self.in_flight += 1;
        self.progress = Some(message.to_string());
    }

    fn hide_progress(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.progress = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_cycle() {
        let mut view = View::Dashboard;
        for _ in 0..View::ALL.len() {
            view = view.next();
        }
        assert_eq!(view, View::Dashboard);
        assert_eq!(View::Dashboard.prev(), View::Bookings);
    }

    #[test]
    fn test_progress_counts_overlapping_operations() {
        let mut state = AdminState::new("demo");
        state.show_progress("Loading users...");
        state.show_progress("Loading schools...");
        state.hide_progress();
        assert!(state.is_busy());
        assert_eq!(state.progress.as_deref(), Some("Loading schools..."));

        state.hide_progress();
        assert!(!state.is_busy());
        assert!(state.progress.is_none());

        state.hide_progress();
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_detail_pane_takes_focus() {
        let mut state = AdminState::new("demo");
        state.view = View::Users;
        state.open_detail("Students".into(), columns::SCHOOL_STUDENTS);
        let focused = state.focused_grid_mut().map(|g| g.column_count());
        assert_eq!(focused, Some(columns::SCHOOL_STUDENTS.len()));

        state.close_detail();
        let focused = state.focused_grid_mut().map(|g| g.column_count());
        assert_eq!(focused, Some(columns::USERS.len()));
    }

    #[test]
    fn test_detail_info_ignores_replaced_pane() {
        let mut state = AdminState::new("demo");
        state.open_detail("Students in time slot #1".into(), columns::TIMESLOT_STUDENTS);
        state.open_detail("Students in booking #2".into(), columns::BOOKING_STUDENTS);

        state.set_detail_info("Students in time slot #1", "stale".into());
        assert!(state.detail_info.is_none());

        state.set_detail_info("Students in booking #2", "current".into());
        assert_eq!(state.detail_info.as_deref(), Some("current"));

        state.detail_department = Some(DepartmentId::new(1));
        state.close_detail();
        assert!(state.detail_info.is_none());
        assert!(state.detail_department.is_none());
    }

    #[test]
    fn test_grids_start_with_view_columns() {
        let state = AdminState::new("demo");
        assert_eq!(state.schools.columns()[3], "Status");
        assert!(state.bookings.is_empty());
    }
}
