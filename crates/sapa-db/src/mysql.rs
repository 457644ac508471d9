//! MySQL backend calling the booking database's procedures and views.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo};
use tracing::{debug, info, warn};

use sapa_core::{
    AppointmentId, CellValue, DepartmentId, SchoolId, TableResult, TimeslotId, UserId,
};

use crate::columns::{self, ColumnSpec};
use crate::config::DbConfig;
use crate::error::DbError;
use crate::models::{LoginOutcome, NewDepartment, NewHospital, NewTimeslot, TimeslotDetails};
use crate::store::AdminStore;

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Store backed by a MySQL connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect a pool using `config`.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(database = %config, "Connecting to database");

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        info!("Connected to database");
        Ok(Self { pool })
    }

    async fn fetch_table(
        &self,
        query: MySqlQuery<'_>,
        spec: &[ColumnSpec],
    ) -> Result<TableResult, DbError> {
        let rows = query.fetch_all(&self.pool).await?;
        let mut table = TableResult::new(columns::labels(spec));
        for row in &rows {
            table.push_row(read_row(row, spec)?)?;
        }
        debug!(rows = table.len(), "Fetched table");
        Ok(table)
    }

    async fn execute(&self, query: MySqlQuery<'_>) -> Result<u64, DbError> {
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn read_row(row: &MySqlRow, spec: &[ColumnSpec]) -> Result<Vec<CellValue>, DbError> {
    spec.iter()
        .map(|c| {
            let index = row.try_column(c.source)?.ordinal();
            read_cell(row, index)
        })
        .collect()
}

/// Decode one cell according to its MySQL column type.
fn read_cell(row: &MySqlRow, index: usize) -> Result<CellValue, DbError> {
    let column = row.column(index);
    let type_name = column.type_info().name().to_ascii_uppercase();
    let unsigned = type_name.ends_with("UNSIGNED");
    let base = type_name.trim_end_matches(" UNSIGNED");

    let cell = match base {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.into(),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" if unsigned => row
            .try_get::<Option<u64>, _>(index)?
            .map(|v| CellValue::Int(i64::try_from(v).unwrap_or(i64::MAX)))
            .unwrap_or(CellValue::Null),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<Option<i64>, _>(index)?.into()
        }
        "FLOAT" => row.try_get::<Option<f32>, _>(index)?.map(f64::from).into(),
        "DOUBLE" => row.try_get::<Option<f64>, _>(index)?.into(),
        "DECIMAL" => {
            let raw = row.try_get_unchecked::<Option<String>, _>(index)?;
            match raw {
                Some(text) => text
                    .parse::<f64>()
                    .map(CellValue::Float)
                    .unwrap_or(CellValue::Text(text)),
                None => CellValue::Null,
            }
        }
        "DATE" => row.try_get::<Option<NaiveDate>, _>(index)?.into(),
        "TIME" => row.try_get::<Option<NaiveTime>, _>(index)?.into(),
        "DATETIME" | "TIMESTAMP" => row.try_get::<Option<NaiveDateTime>, _>(index)?.into(),
        _ => match row.try_get_unchecked::<Option<String>, _>(index) {
            Ok(text) => text.into(),
            Err(e) => {
                warn!(column = column.name(), type_name = %type_name, error = %e, "Cannot decode column");
                return Err(DbError::UnsupportedType {
                    column: column.name().to_string(),
                    type_name,
                });
            }
        },
    };
    Ok(cell)
}

#[async_trait]
impl AdminStore for MySqlStore {
    fn backend_name(&self) -> &'static str {
        "mysql"
    }

    async fn login_admin(&self, email: &str, password: &str) -> Result<LoginOutcome, DbError> {
        debug!(email = %email, "Calling LoginAdmin");

        // OUT parameters live in session variables, so both statements must
        // share one connection.
        let mut conn = self.pool.acquire().await?;
        sqlx::query("CALL LoginAdmin(?, ?, @login_status, @login_message, @login_user_id)")
            .bind(email)
            .bind(password)
            .execute(&mut *conn)
            .await?;

        let row = sqlx::query(
            "SELECT CAST(@login_status AS CHAR) AS status, \
                    CAST(@login_message AS CHAR) AS message, \
                    CAST(@login_user_id AS SIGNED) AS user_id",
        )
        .fetch_one(&mut *conn)
        .await?;

        let outcome = LoginOutcome::from_procedure(
            row.try_get("status")?,
            row.try_get("message")?,
            row.try_get("user_id")?,
        );
        info!(status = %outcome.status, authenticated = outcome.authenticated, "Login attempt");
        Ok(outcome)
    }

    async fn fetch_users(&self, approved: bool) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL FetchUsersByApproval(?)").bind(approved),
            columns::USERS,
        )
        .await
    }

    async fn approve_user(&self, id: UserId) -> Result<bool, DbError> {
        let updated = self
            .execute(sqlx::query("CALL ApproveUser(?)").bind(id.get()))
            .await?;
        if updated == 0 {
            warn!(user_id = %id, "No rows updated, user might not exist");
        }
        Ok(updated > 0)
    }

    async fn fetch_schools_for_user(&self, id: UserId) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL FetchSchoolsForUser(?)").bind(id.get()),
            columns::USER_SCHOOLS,
        )
        .await
    }

    async fn fetch_schools(&self) -> Result<TableResult, DbError> {
        self.fetch_table(sqlx::query("SELECT * FROM AdminSchoolView"), columns::SCHOOLS)
            .await
    }

    async fn approve_school(&self, id: SchoolId) -> Result<bool, DbError> {
        let updated = self
            .execute(sqlx::query("CALL ApproveSchool(?)").bind(id.get()))
            .await?;
        Ok(updated > 0)
    }

    async fn reject_school(&self, id: SchoolId) -> Result<bool, DbError> {
        let updated = self
            .execute(sqlx::query("CALL RejectSchool(?)").bind(id.get()))
            .await?;
        Ok(updated > 0)
    }

    async fn fetch_students_for_school(&self, id: SchoolId) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL AdminGetStudentsBySchool(?)").bind(id.get()),
            columns::SCHOOL_STUDENTS,
        )
        .await
    }

    async fn fetch_hospitals(&self) -> Result<TableResult, DbError> {
        self.fetch_table(sqlx::query("SELECT * FROM Admin_view_hospitals"), columns::HOSPITALS)
            .await
    }

    async fn add_hospital(&self, hospital: &NewHospital) -> Result<(), DbError> {
        hospital.validate()?;
        self.execute(
            sqlx::query("CALL add_hospital(?, ?, ?, ?)")
                .bind(hospital.name.trim())
                .bind(hospital.address.trim())
                .bind(hospital.contact.trim())
                .bind(hospital.description.trim()),
        )
        .await?;
        info!(name = %hospital.name, "Hospital added");
        Ok(())
    }

    async fn fetch_departments(&self) -> Result<TableResult, DbError> {
        self.fetch_table(sqlx::query("SELECT * FROM view_departments"), columns::DEPARTMENTS)
            .await
    }

    async fn add_department(&self, department: &NewDepartment) -> Result<(), DbError> {
        department.validate()?;
        self.execute(
            sqlx::query("CALL Add_Department(?, ?, ?)")
                .bind(department.hospital_id.get())
                .bind(department.section_name.trim())
                .bind(department.price_per_student),
        )
        .await?;
        info!(hospital_id = %department.hospital_id, section = %department.section_name, "Department added");
        Ok(())
    }

    async fn fetch_department_name(&self, id: DepartmentId) -> Result<Option<String>, DbError> {
        let row = sqlx::query("CALL Admin_Get_Department_Name(?)")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>("department_full_name")?),
            None => Ok(None),
        }
    }

    async fn fetch_schools_by_department(&self, id: DepartmentId) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL admin_Get_Schools_By_Department(?)").bind(id.get()),
            columns::DEPARTMENT_SCHOOLS,
        )
        .await
    }

    async fn fetch_students_by_school_and_department(
        &self,
        school: SchoolId,
        department: DepartmentId,
    ) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL Admin_Fetch_Students_By_School_And_Department(?, ?)")
                .bind(school.get())
                .bind(department.get()),
            columns::DEPARTMENT_STUDENTS,
        )
        .await
    }

    async fn fetch_slot_dates(&self) -> Result<TableResult, DbError> {
        self.fetch_table(sqlx::query("SELECT * FROM admin_view_slot_dates"), columns::SLOT_DATES)
            .await
    }

    async fn add_slot_date(&self, department: DepartmentId, date: NaiveDate) -> Result<(), DbError> {
        self.execute(
            sqlx::query("CALL AddAvailableDate(?, ?)")
                .bind(department.get())
                .bind(date),
        )
        .await?;
        info!(department_id = %department, date = %date, "Slot date added");
        Ok(())
    }

    async fn fetch_timeslots(&self) -> Result<TableResult, DbError> {
        self.fetch_table(sqlx::query("SELECT * FROM admin_view_time_slots"), columns::TIMESLOTS)
            .await
    }

    async fn add_timeslot(&self, timeslot: &NewTimeslot) -> Result<(), DbError> {
        timeslot.validate()?;
        self.execute(
            sqlx::query("CALL AddTimeSlot(?, ?, ?, ?)")
                .bind(timeslot.slot_date_id.get())
                .bind(timeslot.start)
                .bind(timeslot.end)
                .bind(timeslot.capacity),
        )
        .await?;
        info!(slot_date_id = %timeslot.slot_date_id, "Time slot added");
        Ok(())
    }

    async fn fetch_timeslot_details(&self, id: TimeslotId) -> Result<Option<TimeslotDetails>, DbError> {
        let Some(row) = sqlx::query("CALL GetTimeslotDetails(?)")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let capacity = match read_cell(&row, row.try_column("capacity")?.ordinal())? {
            CellValue::Int(n) => u32::try_from(n).unwrap_or(0),
            _ => 0,
        };
        Ok(Some(TimeslotDetails {
            hospital_name: row.try_get("hospital_name")?,
            section_name: row.try_get("section_name")?,
            date: row.try_get("slot_date")?,
            start: row.try_get("start_time")?,
            end: row.try_get("end_time")?,
            capacity,
        }))
    }

    async fn fetch_students_by_timeslot(&self, id: TimeslotId) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL FetchStudentsByTimeslot(?)").bind(id.get()),
            columns::TIMESLOT_STUDENTS,
        )
        .await
    }

    async fn fetch_bookings(&self) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("SELECT * FROM Admin_BookingOverviewView"),
            columns::BOOKINGS,
        )
        .await
    }

    async fn approve_booking(&self, id: AppointmentId) -> Result<bool, DbError> {
        let updated = self
            .execute(sqlx::query("CALL ApproveBooking(?)").bind(id.get()))
            .await?;
        Ok(updated > 0)
    }

    async fn fetch_students_by_booking(&self, id: AppointmentId) -> Result<TableResult, DbError> {
        self.fetch_table(
            sqlx::query("CALL Admin_GetStudentsByAppointment(?)").bind(id.get()),
            columns::BOOKING_STUDENTS,
        )
        .await
    }
}
