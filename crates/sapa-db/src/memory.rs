//! In-memory store with seeded demo data.
//!
//! Mirrors the rows and column labels the MySQL views produce, so the console
//! can run without a database server (`--demo`) and tests have a fake.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::sync::RwLock;
use tracing::{debug, info};

use sapa_core::{
    AppointmentId, AppointmentStatus, CellValue, DepartmentId, HospitalId, Row, SchoolId,
    SchoolStatus, SlotDateId, TableResult, TimeslotId, UserId,
};

use crate::columns::{self, ColumnSpec};
use crate::error::DbError;
use crate::models::{LoginOutcome, NewDepartment, NewHospital, NewTimeslot, TimeslotDetails};
use crate::store::AdminStore;

struct UserRecord {
    id: UserId,
    full_name: String,
    email: String,
    added_at: NaiveDateTime,
    approved: bool,
}

struct AdminRecord {
    email: String,
    password: String,
    user_id: UserId,
}

struct SchoolRecord {
    id: SchoolId,
    code: String,
    name: String,
    address: String,
    contact: String,
    owner_id: UserId,
    status: SchoolStatus,
    created_at: NaiveDateTime,
    approved_at: Option<NaiveDateTime>,
}

struct StudentRecord {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    school_id: SchoolId,
    added_at: NaiveDateTime,
}

struct HospitalRecord {
    id: HospitalId,
    name: String,
    address: String,
    contact: String,
    description: String,
}

struct DepartmentRecord {
    id: DepartmentId,
    hospital_id: HospitalId,
    section_name: String,
    price_per_student: f64,
}

struct SlotDateRecord {
    id: SlotDateId,
    department_id: DepartmentId,
    date: NaiveDate,
}

struct TimeslotRecord {
    id: TimeslotId,
    slot_date_id: SlotDateId,
    start: NaiveTime,
    end: NaiveTime,
    capacity: u32,
}

struct AppointmentRecord {
    id: AppointmentId,
    school_id: SchoolId,
    timeslot_id: TimeslotId,
    requested: NaiveDate,
    status: AppointmentStatus,
    students: Vec<i64>,
}

#[derive(Default)]
struct Data {
    admins: Vec<AdminRecord>,
    users: Vec<UserRecord>,
    schools: Vec<SchoolRecord>,
    students: Vec<StudentRecord>,
    hospitals: Vec<HospitalRecord>,
    departments: Vec<DepartmentRecord>,
    slot_dates: Vec<SlotDateRecord>,
    timeslots: Vec<TimeslotRecord>,
    appointments: Vec<AppointmentRecord>,
}

/// A self-contained store for demos and tests.
///
/// Clones share the same data.
#[derive(Clone)]
pub struct InMemoryStore {
    data: Arc<RwLock<Data>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl InMemoryStore {
    /// A store populated with a small, consistent demo dataset.
    ///
    /// The demo administrator is `admin@sapa.test` / `admin123`.
    pub fn seeded() -> Self {
        Self {
            data: Arc::new(RwLock::new(Data::seed())),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    d.and_time(time(h, m))
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn table(spec: &[ColumnSpec], rows: Vec<Row>) -> Result<TableResult, DbError> {
    Ok(TableResult::from_rows(columns::labels(spec), rows)?)
}

impl Data {
    fn seed() -> Self {
        let mut data = Self::default();

        data.admins.push(AdminRecord {
            email: "admin@sapa.test".to_string(),
            password: "admin123".to_string(),
            user_id: UserId::new(1),
        });

        let users = [
            (1, "Site Administrator", "admin@sapa.test", true),
            (2, "Nomvula Dlamini", "nomvula@greenfield.test", true),
            (3, "Pieter van Wyk", "pieter@hillcrest.test", true),
            (4, "Aisha Patel", "aisha@riverside.test", false),
            (5, "Thabo Mokoena", "thabo@northview.test", false),
        ];
        for (i, (id, name, email, approved)) in users.into_iter().enumerate() {
            data.users.push(UserRecord {
                id: UserId::new(id),
                full_name: name.to_string(),
                email: email.to_string(),
                added_at: at(date(2025, 1, 6 + i as u32), 9, 15),
                approved,
            });
        }

        let schools = [
            (1, "GFH001", "Greenfield High", "3 Oak Avenue", 2, SchoolStatus::Approved),
            (2, "HCC002", "Hillcrest College", "18 Ridge Road", 3, SchoolStatus::Approved),
            (3, "RVA003", "Riverside Academy", "7 River Lane", 4, SchoolStatus::Pending),
            (4, "NVS004", "Northview Secondary", "55 North Street", 5, SchoolStatus::Pending),
            (5, "LKP005", "Lakeside Prep", "2 Shore Drive", 5, SchoolStatus::Rejected),
        ];
        for (id, code, name, address, owner, status) in schools {
            let created_at = at(date(2025, 1, 10 + id as u32), 11, 30);
            data.schools.push(SchoolRecord {
                id: SchoolId::new(id),
                code: code.to_string(),
                name: name.to_string(),
                address: address.to_string(),
                contact: format!("011 555 {:04}", 1000 + id),
                owner_id: UserId::new(owner),
                status,
                created_at,
                approved_at: (status == SchoolStatus::Approved).then(|| at(date(2025, 1, 20), 8, 0)),
            });
        }

        let students = [
            (1, "Lerato", "Khumalo", 1),
            (2, "Sipho", "Ndlovu", 1),
            (3, "Emma", "Botha", 1),
            (4, "Johan", "Steyn", 2),
            (5, "Zanele", "Mthembu", 2),
            (6, "Priya", "Naidoo", 3),
        ];
        for (id, first, last, school) in students {
            data.students.push(StudentRecord {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}.{}@students.test", first.to_lowercase(), last.to_lowercase()),
                school_id: SchoolId::new(school),
                added_at: at(date(2025, 2, id as u32), 10, 0),
            });
        }

        data.hospitals.push(HospitalRecord {
            id: HospitalId::new(1),
            name: "City General Hospital".to_string(),
            address: "12 Main Road".to_string(),
            contact: "011 555 0100".to_string(),
            description: "Teaching hospital".to_string(),
        });
        data.hospitals.push(HospitalRecord {
            id: HospitalId::new(2),
            name: "St Mary's Clinic".to_string(),
            address: "4 Church Street".to_string(),
            contact: "011 555 0200".to_string(),
            description: String::new(),
        });

        let departments = [(1, 1, "Cardiology", 150.0), (2, 1, "Pediatrics", 120.0), (3, 2, "Radiology", 90.5)];
        for (id, hospital, section, price) in departments {
            data.departments.push(DepartmentRecord {
                id: DepartmentId::new(id),
                hospital_id: HospitalId::new(hospital),
                section_name: section.to_string(),
                price_per_student: price,
            });
        }

        let slot_dates = [(1, 1, date(2025, 3, 10)), (2, 2, date(2025, 3, 12)), (3, 3, date(2025, 3, 14))];
        for (id, department, d) in slot_dates {
            data.slot_dates.push(SlotDateRecord {
                id: SlotDateId::new(id),
                department_id: DepartmentId::new(department),
                date: d,
            });
        }

        let timeslots = [(1, 1, 8, 10, 10), (2, 1, 13, 15, 8), (3, 2, 9, 11, 12), (4, 3, 10, 12, 6)];
        for (id, slot_date, start, end, capacity) in timeslots {
            data.timeslots.push(TimeslotRecord {
                id: TimeslotId::new(id),
                slot_date_id: SlotDateId::new(slot_date),
                start: time(start, 0),
                end: time(end, 0),
                capacity,
            });
        }

        data.appointments.push(AppointmentRecord {
            id: AppointmentId::new(1),
            school_id: SchoolId::new(1),
            timeslot_id: TimeslotId::new(1),
            requested: date(2025, 2, 20),
            status: AppointmentStatus::Pending,
            students: vec![1, 2, 3],
        });
        data.appointments.push(AppointmentRecord {
            id: AppointmentId::new(2),
            school_id: SchoolId::new(2),
            timeslot_id: TimeslotId::new(3),
            requested: date(2025, 2, 22),
            status: AppointmentStatus::Approved,
            students: vec![4, 5],
        });

        data
    }

    fn school(&self, id: SchoolId) -> Option<&SchoolRecord> {
        self.schools.iter().find(|s| s.id == id)
    }

    fn hospital(&self, id: HospitalId) -> Option<&HospitalRecord> {
        self.hospitals.iter().find(|h| h.id == id)
    }

    fn department(&self, id: DepartmentId) -> Option<&DepartmentRecord> {
        self.departments.iter().find(|d| d.id == id)
    }

    fn slot_date(&self, id: SlotDateId) -> Option<&SlotDateRecord> {
        self.slot_dates.iter().find(|d| d.id == id)
    }

    fn timeslot(&self, id: TimeslotId) -> Option<&TimeslotRecord> {
        self.timeslots.iter().find(|t| t.id == id)
    }

    fn student(&self, id: i64) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Hospital name and section of a department, blank if dangling.
    fn department_labels(&self, id: DepartmentId) -> (String, String) {
        match self.department(id) {
            Some(dept) => (
                self.hospital(dept.hospital_id)
                    .map(|h| h.name.clone())
                    .unwrap_or_default(),
                dept.section_name.clone(),
            ),
            None => (String::new(), String::new()),
        }
    }

    fn school_name(&self, id: SchoolId) -> String {
        self.school(id).map(|s| s.name.clone()).unwrap_or_default()
    }

    fn owner_name(&self, id: UserId) -> &str {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.full_name.as_str())
            .unwrap_or("")
    }

    /// Slot date and time slot an appointment was booked into.
    fn booked_slot(&self, appointment: &AppointmentRecord) -> Option<(&SlotDateRecord, &TimeslotRecord)> {
        let slot = self.timeslot(appointment.timeslot_id)?;
        let slot_date = self.slot_date(slot.slot_date_id)?;
        Some((slot_date, slot))
    }

    fn appointments_in(&self, department: DepartmentId) -> impl Iterator<Item = &AppointmentRecord> + '_ {
        self.appointments.iter().filter(move |a| {
            self.booked_slot(a)
                .is_some_and(|(slot_date, _)| slot_date.department_id == department)
        })
    }
}

#[async_trait]
impl AdminStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "demo"
    }

    async fn login_admin(&self, email: &str, password: &str) -> Result<LoginOutcome, DbError> {
        let data = self.data.read().await;
        let outcome = match data.admins.iter().find(|a| a.email.eq_ignore_ascii_case(email.trim())) {
            None => LoginOutcome::from_procedure(
                Some("error".to_string()),
                Some("Admin account not found".to_string()),
                None,
            ),
            Some(admin) if admin.password != password => LoginOutcome::from_procedure(
                Some("error".to_string()),
                Some("Incorrect password".to_string()),
                None,
            ),
            Some(admin) => LoginOutcome::from_procedure(
                Some("success".to_string()),
                Some("Login successful".to_string()),
                Some(admin.user_id.get()),
            ),
        };
        info!(email = %email, authenticated = outcome.authenticated, "Login attempt");
        Ok(outcome)
    }

    async fn fetch_users(&self, approved: bool) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .users
            .iter()
            .filter(|u| u.approved == approved)
            .map(|u| {
                vec![
                    u.id.get().into(),
                    u.full_name.as_str().into(),
                    u.email.as_str().into(),
                    u.added_at.into(),
                ]
            })
            .collect();
        table(columns::USERS, rows)
    }

    async fn approve_user(&self, id: UserId) -> Result<bool, DbError> {
        let mut data = self.data.write().await;
        match data.users.iter_mut().find(|u| u.id == id && !u.approved) {
            Some(user) => {
                user.approved = true;
                debug!(user_id = %id, "User approved");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn fetch_schools(&self) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .schools
            .iter()
            .map(|s| {
                let students = data.students.iter().filter(|st| st.school_id == s.id).count();
                vec![
                    s.id.get().into(),
                    s.name.as_str().into(),
                    data.owner_name(s.owner_id).into(),
                    s.status.as_str().into(),
                    CellValue::Int(students as i64),
                ]
            })
            .collect();
        table(columns::SCHOOLS, rows)
    }

    async fn approve_school(&self, id: SchoolId) -> Result<bool, DbError> {
        set_school_status(&self.data, id, SchoolStatus::Approved).await
    }

    async fn reject_school(&self, id: SchoolId) -> Result<bool, DbError> {
        set_school_status(&self.data, id, SchoolStatus::Rejected).await
    }

    async fn fetch_schools_for_user(&self, id: UserId) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .schools
            .iter()
            .filter(|s| s.owner_id == id)
            .map(|s| {
                vec![
                    s.id.get().into(),
                    s.code.as_str().into(),
                    s.name.as_str().into(),
                    s.address.as_str().into(),
                    s.contact.as_str().into(),
                    s.status.as_str().into(),
                    s.created_at.into(),
                    s.approved_at.into(),
                ]
            })
            .collect();
        table(columns::USER_SCHOOLS, rows)
    }

    async fn fetch_students_for_school(&self, id: SchoolId) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .students
            .iter()
            .filter(|s| s.school_id == id)
            .map(|s| {
                vec![
                    s.id.into(),
                    format!("{} {}", s.first_name, s.last_name).into(),
                    s.email.as_str().into(),
                    s.added_at.into(),
                ]
            })
            .collect();
        table(columns::SCHOOL_STUDENTS, rows)
    }

    async fn fetch_hospitals(&self) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .hospitals
            .iter()
            .map(|h| {
                vec![
                    h.id.get().into(),
                    h.name.as_str().into(),
                    h.address.as_str().into(),
                    h.contact.as_str().into(),
                    h.description.as_str().into(),
                ]
            })
            .collect();
        table(columns::HOSPITALS, rows)
    }

    async fn add_hospital(&self, hospital: &NewHospital) -> Result<(), DbError> {
        hospital.validate()?;
        let mut data = self.data.write().await;
        let id = HospitalId::new(next_id(data.hospitals.iter().map(|h| h.id.get())));
        data.hospitals.push(HospitalRecord {
            id,
            name: hospital.name.trim().to_string(),
            address: hospital.address.trim().to_string(),
            contact: hospital.contact.trim().to_string(),
            description: hospital.description.trim().to_string(),
        });
        info!(hospital_id = %id, name = %hospital.name, "Hospital added");
        Ok(())
    }

    async fn fetch_departments(&self) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .departments
            .iter()
            .map(|d| {
                let hospital = data.hospital(d.hospital_id).map(|h| h.name.as_str()).unwrap_or("");
                vec![
                    d.id.get().into(),
                    hospital.into(),
                    d.section_name.as_str().into(),
                    d.price_per_student.into(),
                ]
            })
            .collect();
        table(columns::DEPARTMENTS, rows)
    }

    async fn add_department(&self, department: &NewDepartment) -> Result<(), DbError> {
        department.validate()?;
        let mut data = self.data.write().await;
        if data.hospital(department.hospital_id).is_none() {
            return Err(DbError::NotFound(format!("hospital {}", department.hospital_id)));
        }
        let id = DepartmentId::new(next_id(data.departments.iter().map(|d| d.id.get())));
        data.departments.push(DepartmentRecord {
            id,
            hospital_id: department.hospital_id,
            section_name: department.section_name.trim().to_string(),
            price_per_student: department.price_per_student,
        });
        info!(department_id = %id, hospital_id = %department.hospital_id, "Department added");
        Ok(())
    }

    async fn fetch_department_name(&self, id: DepartmentId) -> Result<Option<String>, DbError> {
        let data = self.data.read().await;
        if data.department(id).is_none() {
            return Ok(None);
        }
        let (hospital, section) = data.department_labels(id);
        Ok(Some(format!("{} - {}", hospital, section)))
    }

    async fn fetch_schools_by_department(&self, id: DepartmentId) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let mut totals: BTreeMap<SchoolId, (i64, i64)> = BTreeMap::new();
        for appointment in data.appointments_in(id) {
            let entry = totals.entry(appointment.school_id).or_default();
            entry.0 += 1;
            entry.1 += appointment.students.len() as i64;
        }
        let rows: Vec<Row> = totals
            .into_iter()
            .map(|(school, (bookings, students))| {
                vec![
                    school.get().into(),
                    data.school_name(school).into(),
                    CellValue::Int(bookings),
                    CellValue::Int(students),
                ]
            })
            .collect();
        table(columns::DEPARTMENT_SCHOOLS, rows)
    }

    async fn fetch_students_by_school_and_department(
        &self,
        school: SchoolId,
        department: DepartmentId,
    ) -> Result<TableResult, DbError> {
        let guard = self.data.read().await;
        let data: &Data = &guard;
        let rows: Vec<Row> = data
            .appointments_in(department)
            .filter(|a| a.school_id == school)
            .flat_map(|a| {
                a.students.iter().filter_map(move |sid| {
                    let s = data.student(*sid)?;
                    let (slot_date, slot) = data.booked_slot(a)?;
                    Some(vec![
                        s.id.into(),
                        format!("{} {}", s.first_name, s.last_name).into(),
                        s.email.as_str().into(),
                        a.id.get().into(),
                        slot_date.date.into(),
                        slot.start.into(),
                        slot.end.into(),
                        a.status.as_str().into(),
                        a.requested.into(),
                    ])
                })
            })
            .collect();
        table(columns::DEPARTMENT_STUDENTS, rows)
    }

    async fn fetch_slot_dates(&self) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .slot_dates
            .iter()
            .map(|sd| {
                let (hospital, section) = data.department_labels(sd.department_id);
                vec![sd.id.get().into(), hospital.into(), section.into(), sd.date.into()]
            })
            .collect();
        table(columns::SLOT_DATES, rows)
    }

    async fn add_slot_date(&self, department: DepartmentId, date: NaiveDate) -> Result<(), DbError> {
        let mut data = self.data.write().await;
        if data.department(department).is_none() {
            return Err(DbError::NotFound(format!("department {}", department)));
        }
        let id = SlotDateId::new(next_id(data.slot_dates.iter().map(|d| d.id.get())));
        data.slot_dates.push(SlotDateRecord {
            id,
            department_id: department,
            date,
        });
        info!(slot_date_id = %id, department_id = %department, date = %date, "Slot date added");
        Ok(())
    }

    async fn fetch_timeslots(&self) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .timeslots
            .iter()
            .map(|t| {
                let slot_date = data.slot_date(t.slot_date_id);
                let (hospital, section) = slot_date
                    .map(|sd| data.department_labels(sd.department_id))
                    .unwrap_or_default();
                vec![
                    t.id.get().into(),
                    hospital.into(),
                    section.into(),
                    slot_date.map(|sd| sd.date).into(),
                    t.start.into(),
                    t.end.into(),
                    CellValue::Int(i64::from(t.capacity)),
                ]
            })
            .collect();
        table(columns::TIMESLOTS, rows)
    }

    async fn add_timeslot(&self, timeslot: &NewTimeslot) -> Result<(), DbError> {
        timeslot.validate()?;
        let mut data = self.data.write().await;
        if data.slot_date(timeslot.slot_date_id).is_none() {
            return Err(DbError::NotFound(format!("slot date {}", timeslot.slot_date_id)));
        }
        let id = TimeslotId::new(next_id(data.timeslots.iter().map(|t| t.id.get())));
        data.timeslots.push(TimeslotRecord {
            id,
            slot_date_id: timeslot.slot_date_id,
            start: timeslot.start,
            end: timeslot.end,
            capacity: timeslot.capacity,
        });
        info!(timeslot_id = %id, slot_date_id = %timeslot.slot_date_id, "Time slot added");
        Ok(())
    }

    async fn fetch_timeslot_details(&self, id: TimeslotId) -> Result<Option<TimeslotDetails>, DbError> {
        let data = self.data.read().await;
        let Some(slot) = data.timeslot(id) else {
            return Ok(None);
        };
        let Some(slot_date) = data.slot_date(slot.slot_date_id) else {
            return Ok(None);
        };
        let (hospital_name, section_name) = data.department_labels(slot_date.department_id);
        Ok(Some(TimeslotDetails {
            hospital_name,
            section_name,
            date: slot_date.date,
            start: slot.start,
            end: slot.end,
            capacity: slot.capacity,
        }))
    }

    async fn fetch_students_by_timeslot(&self, id: TimeslotId) -> Result<TableResult, DbError> {
        let guard = self.data.read().await;
        let data: &Data = &guard;
        let rows: Vec<Row> = data
            .appointments
            .iter()
            .filter(|a| a.timeslot_id == id)
            .flat_map(|a| {
                a.students.iter().filter_map(move |sid| {
                    let s = data.student(*sid)?;
                    Some(vec![
                        s.id.into(),
                        s.first_name.as_str().into(),
                        s.last_name.as_str().into(),
                        s.email.as_str().into(),
                        data.school_name(s.school_id).into(),
                        a.requested.into(),
                        a.status.as_str().into(),
                    ])
                })
            })
            .collect();
        table(columns::TIMESLOT_STUDENTS, rows)
    }

    async fn fetch_bookings(&self) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let rows: Vec<Row> = data
            .appointments
            .iter()
            .map(|a| {
                let slot = data.timeslot(a.timeslot_id);
                let slot_date = slot.and_then(|t| data.slot_date(t.slot_date_id));
                let (hospital, department) = slot_date
                    .map(|sd| data.department_labels(sd.department_id))
                    .unwrap_or_default();
                let time_range = slot
                    .map(|t| format!("{} - {}", t.start.format("%H:%M"), t.end.format("%H:%M")))
                    .unwrap_or_default();
                vec![
                    a.id.get().into(),
                    data.school_name(a.school_id).into(),
                    hospital.into(),
                    department.into(),
                    slot_date.map(|sd| sd.date).into(),
                    time_range.into(),
                    CellValue::Int(a.students.len() as i64),
                    a.status.as_str().into(),
                ]
            })
            .collect();
        table(columns::BOOKINGS, rows)
    }

    async fn approve_booking(&self, id: AppointmentId) -> Result<bool, DbError> {
        let mut data = self.data.write().await;
        match data.appointments.iter_mut().find(|a| a.id == id) {
            Some(appointment) if appointment.status.is_actionable() => {
                appointment.status = AppointmentStatus::Approved;
                debug!(appointment_id = %id, "Booking approved");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn fetch_students_by_booking(&self, id: AppointmentId) -> Result<TableResult, DbError> {
        let data = self.data.read().await;
        let Some(appointment) = data.appointments.iter().find(|a| a.id == id) else {
            return table(columns::BOOKING_STUDENTS, Vec::new());
        };
        let rows: Vec<Row> = appointment
            .students
            .iter()
            .filter_map(|sid| data.student(*sid))
            .map(|s| {
                vec![
                    s.id.into(),
                    s.first_name.as_str().into(),
                    s.last_name.as_str().into(),
                    s.email.as_str().into(),
                    data.school_name(s.school_id).into(),
                ]
            })
            .collect();
        table(columns::BOOKING_STUDENTS, rows)
    }
}

async fn set_school_status(
    data: &RwLock<Data>,
    id: SchoolId,
    status: SchoolStatus,
) -> Result<bool, DbError> {
    let mut data = data.write().await;
    match data.schools.iter_mut().find(|s| s.id == id) {
        Some(school) => {
            school.status = status;
            if status == SchoolStatus::Approved {
                school.approved_at = Some(Local::now().naive_local());
            }
            debug!(school_id = %id, status = %status, "School status changed");
            Ok(true)
        }
        None => Ok(false),
    }
}
