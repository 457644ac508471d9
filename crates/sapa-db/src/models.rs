//! Inputs and outcomes of store operations.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use sapa_core::{CoreError, HospitalId, SlotDateId, UserId};

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// A hospital to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHospital {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub description: String,
}

impl NewHospital {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("hospital name", &self.name)?;
        require("hospital address", &self.address)?;
        require("contact info", &self.contact)
    }
}

/// A department (section) to add to a hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub hospital_id: HospitalId,
    pub section_name: String,
    pub price_per_student: f64,
}

impl NewDepartment {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("section name", &self.section_name)?;
        if !self.price_per_student.is_finite() || self.price_per_student < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "price per student must be a non-negative amount, got {}",
                self.price_per_student
            )));
        }
        Ok(())
    }
}

/// A time slot to open on a slot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeslot {
    pub slot_date_id: SlotDateId,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub capacity: u32,
}

impl NewTimeslot {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end <= self.start {
            return Err(CoreError::InvalidInput(format!(
                "end time {} must be after start time {}",
                self.end.format("%H:%M"),
                self.start.format("%H:%M")
            )));
        }
        if self.capacity == 0 {
            return Err(CoreError::InvalidInput("capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Result of the administrator login procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub authenticated: bool,
    pub status: String,
    pub message: String,
    pub user_id: Option<UserId>,
}

impl LoginOutcome {
    /// Build from the procedure's output parameters.
    ///
    /// Only a status of `success` (any case) authenticates.
    pub fn from_procedure(status: Option<String>, message: Option<String>, user_id: Option<i64>) -> Self {
        let status = status.unwrap_or_default();
        let authenticated = status.eq_ignore_ascii_case("success");
        Self {
            authenticated,
            status,
            message: message.unwrap_or_default(),
            user_id: user_id.filter(|id| *id > 0).map(UserId::new),
        }
    }
}

/// Where and when a time slot takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeslotDetails {
    pub hospital_name: String,
    pub section_name: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub capacity: u32,
}

impl fmt::Display for TimeslotDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | {} | {} - {} (Capacity: {})",
            self.hospital_name,
            self.section_name,
            self.date,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.capacity
        )
    }
}

/// Summary numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub pending_users: usize,
    pub pending_schools: usize,
    pub hospitals: usize,
    pub bookings: usize,
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<NaiveTime, CoreError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CoreError::InvalidInput(format!("'{}' is not a time (HH:MM)", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_hospital_requires_name() {
        let hospital = NewHospital {
            name: "  ".into(),
            address: "1 Main St".into(),
            contact: "555".into(),
            description: String::new(),
        };
        assert!(hospital.validate().is_err());
    }

    #[test]
    fn test_department_price_must_be_non_negative() {
        let dept = NewDepartment {
            hospital_id: HospitalId::new(1),
            section_name: "Cardiology".into(),
            price_per_student: -1.0,
        };
        assert!(dept.validate().is_err());
    }

    #[test]
    fn test_timeslot_bounds() {
        let slot = NewTimeslot {
            slot_date_id: SlotDateId::new(1),
            start: hm(10, 0),
            end: hm(9, 0),
            capacity: 5,
        };
        assert!(slot.validate().is_err());

        let slot = NewTimeslot { end: hm(11, 0), ..slot };
        assert!(slot.validate().is_ok());

        let slot = NewTimeslot { capacity: 0, ..slot };
        assert!(slot.validate().is_err());
    }

    #[test]
    fn test_login_outcome() {
        let ok = LoginOutcome::from_procedure(Some("SUCCESS".into()), None, Some(4));
        assert!(ok.authenticated);
        assert_eq!(ok.user_id, Some(UserId::new(4)));

        let denied = LoginOutcome::from_procedure(Some("error".into()), Some("Wrong password".into()), Some(-1));
        assert!(!denied.authenticated);
        assert_eq!(denied.user_id, None);
        assert_eq!(denied.message, "Wrong password");
    }

    #[test]
    fn test_timeslot_details_summary() {
        let details = TimeslotDetails {
            hospital_name: "City General Hospital".into(),
            section_name: "Cardiology".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start: hm(8, 0),
            end: hm(10, 0),
            capacity: 10,
        };
        assert_eq!(
            details.to_string(),
            "City General Hospital - Cardiology | 2025-03-10 | 08:00 - 10:00 (Capacity: 10)"
        );
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:30").unwrap(), hm(8, 30));
        assert_eq!(parse_time("08:30:00").unwrap(), hm(8, 30));
        assert!(parse_time("8h30").is_err());
    }
}
