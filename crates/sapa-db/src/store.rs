//! The admin data-access trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use sapa_core::{
    AppointmentId, DepartmentId, SchoolId, SchoolStats, TableResult, TimeslotId, UserId,
};

use crate::columns;
use crate::error::DbError;
use crate::models::{
    DashboardCounts, LoginOutcome, NewDepartment, NewHospital, NewTimeslot, TimeslotDetails,
};

/// Every operation the admin console performs against the booking database.
///
/// Approval operations return `Ok(false)` when no row was changed, which
/// usually means the id does not exist.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Short backend name for logs and the status bar.
    fn backend_name(&self) -> &'static str;

    // === Authentication ===

    async fn login_admin(&self, email: &str, password: &str) -> Result<LoginOutcome, DbError>;

    // === Users ===

    async fn fetch_users(&self, approved: bool) -> Result<TableResult, DbError>;
    async fn approve_user(&self, id: UserId) -> Result<bool, DbError>;
    /// Schools registered by one user.
    async fn fetch_schools_for_user(&self, id: UserId) -> Result<TableResult, DbError>;

    // === Schools ===

    async fn fetch_schools(&self) -> Result<TableResult, DbError>;
    async fn approve_school(&self, id: SchoolId) -> Result<bool, DbError>;
    async fn reject_school(&self, id: SchoolId) -> Result<bool, DbError>;
    async fn fetch_students_for_school(&self, id: SchoolId) -> Result<TableResult, DbError>;

    // === Hospitals, departments, dates and slots ===

    async fn fetch_hospitals(&self) -> Result<TableResult, DbError>;
    async fn add_hospital(&self, hospital: &NewHospital) -> Result<(), DbError>;
    async fn fetch_departments(&self) -> Result<TableResult, DbError>;
    async fn add_department(&self, department: &NewDepartment) -> Result<(), DbError>;
    /// "Hospital - Section", or `None` for an unknown department.
    async fn fetch_department_name(&self, id: DepartmentId) -> Result<Option<String>, DbError>;
    /// Schools with at least one booking in the department, with totals.
    async fn fetch_schools_by_department(&self, id: DepartmentId) -> Result<TableResult, DbError>;
    async fn fetch_students_by_school_and_department(
        &self,
        school: SchoolId,
        department: DepartmentId,
    ) -> Result<TableResult, DbError>;
    async fn fetch_slot_dates(&self) -> Result<TableResult, DbError>;
    async fn add_slot_date(&self, department: DepartmentId, date: NaiveDate) -> Result<(), DbError>;
    async fn fetch_timeslots(&self) -> Result<TableResult, DbError>;
    async fn add_timeslot(&self, timeslot: &NewTimeslot) -> Result<(), DbError>;
    async fn fetch_timeslot_details(&self, id: TimeslotId) -> Result<Option<TimeslotDetails>, DbError>;
    async fn fetch_students_by_timeslot(&self, id: TimeslotId) -> Result<TableResult, DbError>;

    // === Bookings ===

    async fn fetch_bookings(&self) -> Result<TableResult, DbError>;
    async fn approve_booking(&self, id: AppointmentId) -> Result<bool, DbError>;
    async fn fetch_students_by_booking(&self, id: AppointmentId) -> Result<TableResult, DbError>;

    /// Counts for the dashboard, composed from the list queries.
    async fn dashboard(&self) -> Result<DashboardCounts, DbError> {
        let pending_users = self.fetch_users(false).await?.len();
        let schools = self.fetch_schools().await?;
        let pending_schools = SchoolStats::from_rows(schools.rows(), columns::SCHOOL_STATUS).pending;
        let hospitals = self.fetch_hospitals().await?.len();
        let bookings = self.fetch_bookings().await?.len();

        Ok(DashboardCounts {
            pending_users,
            pending_schools,
            hospitals,
            bookings,
        })
    }
}
