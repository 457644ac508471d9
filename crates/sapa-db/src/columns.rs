//! Display columns of every query, shared by all backends.

/// A display label and the result-set column it is read from.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub source: &'static str,
}

const fn col(label: &'static str, source: &'static str) -> ColumnSpec {
    ColumnSpec { label, source }
}

/// Labels of a column set, in order.
pub fn labels(spec: &[ColumnSpec]) -> impl Iterator<Item = &'static str> + '_ {
    spec.iter().map(|c| c.label)
}

pub const USERS: &[ColumnSpec] = &[
    col("ID", "user_id"),
    col("Full Name", "fullname"),
    col("Email", "email"),
    col("Added At", "added_at"),
];

pub const SCHOOLS: &[ColumnSpec] = &[
    col("ID", "school_id"),
    col("School", "school_name"),
    col("Owner", "full_name"),
    col("Status", "status"),
    col("Students", "student_count"),
];

/// Position of the status column in [`SCHOOLS`].
pub const SCHOOL_STATUS: usize = 3;

/// Schools submitted by one user.
pub const USER_SCHOOLS: &[ColumnSpec] = &[
    col("ID", "school_id"),
    col("Code", "school_code"),
    col("Name", "school_name"),
    col("Address", "school_address"),
    col("Contact", "contact_info"),
    col("Status", "status"),
    col("Created At", "created_at"),
    col("Approved At", "approved_at"),
];

pub const SCHOOL_STUDENTS: &[ColumnSpec] = &[
    col("ID", "student_id"),
    col("Full Name", "full_name"),
    col("Email", "email"),
    col("Added At", "added_at"),
];

pub const HOSPITALS: &[ColumnSpec] = &[
    col("ID", "hospital_id"),
    col("Hospital", "hospital_name"),
    col("Address", "hospital_address"),
    col("Contact", "contact_info"),
    col("Description", "descriptions"),
];

pub const DEPARTMENTS: &[ColumnSpec] = &[
    col("ID", "department_id"),
    col("Hospital", "hospital_name"),
    col("Section", "section_name"),
    col("Price/Student", "price_per_student"),
];

/// Schools with bookings in one department.
pub const DEPARTMENT_SCHOOLS: &[ColumnSpec] = &[
    col("ID", "school_id"),
    col("School", "school_name"),
    col("Bookings", "total_appointments"),
    col("Students", "total_students"),
];

/// Students one school booked into one department.
pub const DEPARTMENT_STUDENTS: &[ColumnSpec] = &[
    col("ID", "student_id"),
    col("Student", "student_name"),
    col("Email", "email"),
    col("Booking", "appointment_id"),
    col("Date", "slot_date"),
    col("Start", "start_time"),
    col("End", "end_time"),
    col("Status", "appointment_status"),
    col("Booked", "booking_date"),
];

pub const SLOT_DATES: &[ColumnSpec] = &[
    col("ID", "slot_date_id"),
    col("Hospital", "hospital_name"),
    col("Section", "section_name"),
    col("Date", "slot_date"),
];

pub const TIMESLOTS: &[ColumnSpec] = &[
    col("ID", "time_slot_id"),
    col("Hospital", "hospital_name"),
    col("Section", "section_name"),
    col("Date", "slot_date"),
    col("Start", "start_time"),
    col("End", "end_time"),
    col("Capacity", "capacity"),
];

pub const TIMESLOT_STUDENTS: &[ColumnSpec] = &[
    col("ID", "student_id"),
    col("First Name", "firstname"),
    col("Last Name", "lastname"),
    col("Email", "email"),
    col("School", "school_name"),
    col("Requested", "request_date"),
    col("Status", "appointment_status"),
];

pub const BOOKINGS: &[ColumnSpec] = &[
    col("ID", "booking_id"),
    col("School", "school_name"),
    col("Hospital", "hospital_name"),
    col("Department", "department"),
    col("Date", "slot_date"),
    col("Time", "time_range"),
    col("Students", "student_count"),
    col("Status", "appointment_status"),
];

pub const BOOKING_STUDENTS: &[ColumnSpec] = &[
    col("ID", "student_id"),
    col("First Name", "firstname"),
    col("Last Name", "lastname"),
    col("Email", "email"),
    col("School", "school_name"),
];
