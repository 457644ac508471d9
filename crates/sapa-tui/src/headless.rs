//! Non-interactive subcommands.
//!
//! These go through the same [`Console`] as the TUI. The UI context is
//! drained on the calling thread until no operation is in flight, then the
//! resulting state is printed.

use serde_json::{Map, Value};
use tracing::info;

use sapa_core::{
    AppointmentId, CoreError, DataGrid, DepartmentId, SchoolId, SlotDateId, TimeslotId, UserId,
};
use sapa_db::models::parse_time;
use sapa_db::{NewDepartment, NewHospital, NewTimeslot};
use sapa_runtime::UiContext;

use crate::actions::Console;
use crate::cli::{Commands, ExportView};
use crate::error::AppError;
use crate::form::parse_date;
use crate::state::{AdminState, HospitalTab};

/// Run one subcommand to completion and return what to print.
pub fn run_command(
    command: Commands,
    console: &Console,
    ui: &mut UiContext<AdminState>,
    state: &mut AdminState,
) -> Result<String, AppError> {
    state.refresh_after_mutation = false;

    match command {
        Commands::Console { .. } => {
            return Err(AppError::Operation("the console is interactive".to_string()))
        }
        Commands::Export { view, id, json } => {
            let grid = export(view, id, console, ui, state)?;
            return if json { to_json(grid) } else { Ok(to_text(grid)) };
        }
        Commands::AddHospital {
            name,
            address,
            contact,
            description,
        } => {
            let hospital = NewHospital {
                name,
                address,
                contact,
                description,
            };
            hospital.validate()?;
            console.add_hospital(hospital);
        }
        Commands::AddDepartment {
            hospital_id,
            section,
            price,
        } => {
            let department = NewDepartment {
                hospital_id: hospital_id.into(),
                section_name: section,
                price_per_student: price,
            };
            department.validate()?;
            console.add_department(department);
        }
        Commands::AddSlotDate {
            department_id,
            date,
        } => {
            console.add_slot_date(department_id.into(), parse_date(&date)?);
        }
        Commands::AddTimeslot {
            slot_date_id,
            start,
            end,
            capacity,
        } => {
            let timeslot = NewTimeslot {
                slot_date_id: SlotDateId::new(slot_date_id),
                start: parse_time(&start)?,
                end: parse_time(&end)?,
                capacity,
            };
            timeslot.validate()?;
            console.add_timeslot(timeslot);
        }
        Commands::ApproveUser { id } => console.approve_user(UserId::new(id)),
        Commands::ApproveSchool { id } => console.approve_school(SchoolId::new(id)),
        Commands::RejectSchool { id } => console.reject_school(SchoolId::new(id)),
        Commands::ApproveBooking { id } => console.approve_booking(AppointmentId::new(id)),
    }

    drain(ui, state)?;
    Ok(state.status_message.clone().unwrap_or_default())
}

fn export<'s>(
    view: ExportView,
    id: Option<i64>,
    console: &Console,
    ui: &mut UiContext<AdminState>,
    state: &'s mut AdminState,
) -> Result<&'s DataGrid, AppError> {
    let require_id = || {
        id.ok_or_else(|| CoreError::InvalidInput(format!("--id is required for {:?}", view)))
    };

    match view {
        ExportView::PendingUsers => console.load_users(false),
        ExportView::ApprovedUsers => console.load_users(true),
        ExportView::Schools => console.load_schools(),
        ExportView::Hospitals => console.load_hospital_tab(HospitalTab::Hospitals),
        ExportView::Departments => console.load_hospital_tab(HospitalTab::Departments),
        ExportView::SlotDates => console.load_hospital_tab(HospitalTab::SlotDates),
        ExportView::Timeslots => console.load_hospital_tab(HospitalTab::Timeslots),
        ExportView::Bookings => console.load_bookings(),
        ExportView::SchoolStudents => {
            console.show_school_students(state, SchoolId::new(require_id()?), "school")
        }
        ExportView::TimeslotStudents => {
            console.show_timeslot_students(state, TimeslotId::new(require_id()?))
        }
        ExportView::BookingStudents => {
            console.show_booking_students(state, AppointmentId::new(require_id()?))
        }
        ExportView::UserSchools => {
            let id = require_id()?;
            console.show_user_schools(state, UserId::new(id), &format!("user {}", id))
        }
        ExportView::DepartmentSchools => {
            console.show_department_schools(state, DepartmentId::new(require_id()?))
        }
    }

    drain(ui, state)?;
    info!(view = ?view, "Exported");

    let grid = match view {
        ExportView::PendingUsers | ExportView::ApprovedUsers => &state.users,
        ExportView::Schools => &state.schools,
        ExportView::Hospitals => &state.hospitals,
        ExportView::Departments => &state.departments,
        ExportView::SlotDates => &state.slot_dates,
        ExportView::Timeslots => &state.timeslots,
        ExportView::Bookings => &state.bookings,
        ExportView::SchoolStudents
        | ExportView::TimeslotStudents
        | ExportView::BookingStudents
        | ExportView::UserSchools
        | ExportView::DepartmentSchools => &state.detail,
    };
    Ok(grid)
}

/// Run UI jobs on this thread until nothing is queued or in flight.
///
/// Must not be called from inside the async runtime.
fn drain(ui: &mut UiContext<AdminState>, state: &mut AdminState) -> Result<(), AppError> {
    loop {
        if ui.run_pending(state) > 0 {
            continue;
        }
        if !state.is_busy() || !ui.blocking_run_next(state) {
            break;
        }
    }

    match state.last_error.take() {
        Some(error) => Err(AppError::Operation(error)),
        None => Ok(()),
    }
}

/// Plain-text table with padded columns.
pub fn to_text(grid: &DataGrid) -> String {
    let cells: Vec<Vec<String>> = grid
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();

    let widths: Vec<usize> = grid
        .columns()
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|s| s.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(cells.len() + 2);
    out.push(line(grid.columns()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        out.push(line(row));
    }
    out.join("\n")
}

/// JSON array with one object per row, keyed by column label.
pub fn to_json(grid: &DataGrid) -> Result<String, AppError> {
    let rows = grid
        .rows()
        .iter()
        .map(|row| {
            let object = grid
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| Ok((column.clone(), serde_json::to_value(cell)?)))
                .collect::<Result<Map<String, Value>, serde_json::Error>>()?;
            Ok(Value::Object(object))
        })
        .collect::<Result<Vec<Value>, serde_json::Error>>()?;
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sapa_db::{AdminStore, InMemoryStore};
    use sapa_runtime::{ui_channel, TaskRunner};
    use tokio::runtime::Runtime;

    /// A multi-threaded runtime plus a UI context drained on the test thread,
    /// the same arrangement `main` uses.
    struct Harness {
        _runtime: Runtime,
        console: Console,
        ui: UiContext<AdminState>,
        state: AdminState,
    }

    impl Harness {
        fn new() -> Self {
            let runtime = Runtime::new().unwrap();
            let (handle, ui) = ui_channel();
            let runner = TaskRunner::new(runtime.handle().clone(), handle);
            let store: Arc<dyn AdminStore> = Arc::new(InMemoryStore::seeded());
            Self {
                _runtime: runtime,
                console: Console::new(runner, store),
                ui,
                state: AdminState::new("demo"),
            }
        }

        fn run(&mut self, command: Commands) -> Result<String, AppError> {
            run_command(command, &self.console, &mut self.ui, &mut self.state)
        }
    }

    fn export(view: ExportView, id: Option<i64>, json: bool) -> Commands {
        Commands::Export { view, id, json }
    }

    #[test]
    fn test_export_text() {
        let mut h = Harness::new();
        let out = h.run(export(ExportView::Hospitals, None, false)).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("ID  Hospital"));
        assert!(lines[1].starts_with("--"));
        assert_eq!(lines.len(), 4);
        assert!(lines[3].contains("St Mary's Clinic"));
    }

    #[test]
    fn test_export_json() {
        let mut h = Harness::new();
        let out = h.run(export(ExportView::BookingStudents, Some(2), true)).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["First Name"], "Johan");
        assert_eq!(rows[0]["ID"], 4);
    }

    #[test]
    fn test_export_department_schools() {
        let mut h = Harness::new();
        let out = h.run(export(ExportView::DepartmentSchools, Some(1), true)).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["School"], "Greenfield High");
        assert_eq!(value[0]["Students"], 3);
    }

    #[test]
    fn test_export_user_schools() {
        let mut h = Harness::new();
        let out = h.run(export(ExportView::UserSchools, Some(2), false)).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("ID  Code"));
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("GFH001"));
    }

    #[test]
    fn test_student_export_requires_id() {
        let mut h = Harness::new();
        let err = h.run(export(ExportView::SchoolStudents, None, false)).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_approve_then_export() {
        let mut h = Harness::new();
        let out = h.run(Commands::RejectSchool { id: 4 }).unwrap();
        assert_eq!(out, "School 4 rejected");

        let schools = h.run(export(ExportView::Schools, None, true)).unwrap();
        let value: Value = serde_json::from_str(&schools).unwrap();
        assert_eq!(value[3]["Status"], "rejected");
        assert_eq!(h.state.school_stats.rejected, 2);
    }

    #[test]
    fn test_store_errors_become_operation_errors() {
        let mut h = Harness::new();
        let err = h
            .run(Commands::AddSlotDate {
                department_id: 42,
                date: "2025-05-01".into(),
            })
            .unwrap_err();
        match err {
            AppError::Operation(message) => {
                assert!(message.starts_with("Database operation failed: "))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_arguments_never_reach_the_store() {
        let mut h = Harness::new();
        let err = h
            .run(Commands::AddTimeslot {
                slot_date_id: 1,
                start: "12:00".into(),
                end: "11:00".into(),
                capacity: 3,
            })
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert!(h.ui.executed() == 0);
    }

    #[test]
    fn test_add_hospital() {
        let mut h = Harness::new();
        let out = h
            .run(Commands::AddHospital {
                name: "Hope Clinic".into(),
                address: "9 Hill Road".into(),
                contact: "011 555 0300".into(),
                description: String::new(),
            })
            .unwrap();
        assert_eq!(out, "Hospital 'Hope Clinic' added");
    }

    #[test]
    fn test_to_text_handles_empty_grid() {
        let grid = DataGrid::new(["ID", "Name"]);
        assert_eq!(to_text(&grid), "ID  Name\n--  ----");
    }
}
