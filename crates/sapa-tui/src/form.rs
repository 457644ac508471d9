//! Input forms: the login screen and the "add" dialogs of the hospitals view.

use chrono::NaiveDate;
use crossterm::event::KeyCode;

use sapa_core::{CoreError, DepartmentId, HospitalId, SlotDateId};
use sapa_db::models::parse_time;
use sapa_db::{NewDepartment, NewHospital, NewTimeslot};

/// What a form creates when submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Hospital,
    Department,
    SlotDate,
    Timeslot,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Login => "Administrator Login",
            FormKind::Hospital => "Add Hospital",
            FormKind::Department => "Add Department",
            FormKind::SlotDate => "Add Slot Date",
            FormKind::Timeslot => "Add Time Slot",
        }
    }
}

/// One labelled text field.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    /// Rendered masked.
    pub secret: bool,
}

impl FormField {
    fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            placeholder,
            secret: false,
        }
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Text to show for the field.
    pub fn display(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Result of feeding a key to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Editing,
    Submit,
    Cancel,
}

/// A form: fields plus focus.
#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn login() -> Self {
        Self::with_fields(
            FormKind::Login,
            vec![
                FormField::new("Email", "admin@example.com"),
                FormField::new("Password", "").secret(),
            ],
        )
    }

    pub fn hospital() -> Self {
        Self::with_fields(
            FormKind::Hospital,
            vec![
                FormField::new("Name", "City General Hospital"),
                FormField::new("Address", "12 Main Road"),
                FormField::new("Contact", "011 555 0100"),
                FormField::new("Description", "optional"),
            ],
        )
    }

    /// Department form, prefilled with the selected hospital if any.
    pub fn department(hospital: Option<i64>) -> Self {
        Self::with_fields(
            FormKind::Department,
            vec![
                FormField::new("Hospital ID", "1").with_value(prefill(hospital)),
                FormField::new("Section", "Cardiology"),
                FormField::new("Price/Student", "150.00"),
            ],
        )
    }

    pub fn slot_date(department: Option<i64>) -> Self {
        Self::with_fields(
            FormKind::SlotDate,
            vec![
                FormField::new("Department ID", "1").with_value(prefill(department)),
                FormField::new("Date", "YYYY-MM-DD"),
            ],
        )
    }

    pub fn timeslot(slot_date: Option<i64>) -> Self {
        Self::with_fields(
            FormKind::Timeslot,
            vec![
                FormField::new("Slot Date ID", "1").with_value(prefill(slot_date)),
                FormField::new("Start", "HH:MM"),
                FormField::new("End", "HH:MM"),
                FormField::new("Capacity", "10"),
            ],
        )
    }

    fn with_fields(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, code: KeyCode) -> FormOutcome {
        match code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            }
            KeyCode::Enter => {
                // Enter moves on until the last field, then submits.
                if self.focus + 1 < self.fields.len() {
                    self.focus += 1;
                } else {
                    return FormOutcome::Submit;
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(c);
                }
            }
            _ => {}
        }
        FormOutcome::Editing
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.trim()).unwrap_or("")
    }

    /// Email and password of the login form.
    pub fn credentials(&self) -> (String, String) {
        (self.value(0).to_string(), self.fields.get(1).map(|f| f.value.clone()).unwrap_or_default())
    }

    pub fn to_hospital(&self) -> Result<NewHospital, CoreError> {
        let hospital = NewHospital {
            name: self.value(0).to_string(),
            address: self.value(1).to_string(),
            contact: self.value(2).to_string(),
            description: self.value(3).to_string(),
        };
        hospital.validate()?;
        Ok(hospital)
    }

    pub fn to_department(&self) -> Result<NewDepartment, CoreError> {
        let department = NewDepartment {
            hospital_id: HospitalId::new(parse_id("hospital id", self.value(0))?),
            section_name: self.value(1).to_string(),
            price_per_student: parse_price(self.value(2))?,
        };
        department.validate()?;
        Ok(department)
    }

    pub fn to_slot_date(&self) -> Result<(DepartmentId, NaiveDate), CoreError> {
        let department = DepartmentId::new(parse_id("department id", self.value(0))?);
        Ok((department, parse_date(self.value(1))?))
    }

    pub fn to_timeslot(&self) -> Result<NewTimeslot, CoreError> {
        let timeslot = NewTimeslot {
            slot_date_id: SlotDateId::new(parse_id("slot date id", self.value(0))?),
            start: parse_time(self.value(1))?,
            end: parse_time(self.value(2))?,
            capacity: parse_capacity(self.value(3))?,
        };
        timeslot.validate()?;
        Ok(timeslot)
    }
}

fn prefill(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn parse_id(field: &str, value: &str) -> Result<i64, CoreError> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::InvalidInput(format!("{} must be a positive number", field)))
}

pub fn parse_price(value: &str) -> Result<f64, CoreError> {
    value
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidInput(format!("'{}' is not a valid price", value)))
}

pub fn parse_capacity(value: &str) -> Result<u32, CoreError> {
    value
        .parse::<u32>()
        .map_err(|_| CoreError::InvalidInput(format!("'{}' is not a valid capacity", value)))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidInput(format!("'{}' is not a date (YYYY-MM-DD)", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_advances_then_submits() {
        let mut form = Form::login();
        type_into(&mut form, "admin@sapa.test");
        assert_eq!(form.handle_key(KeyCode::Enter), FormOutcome::Editing);
        type_into(&mut form, "pw");
        assert_eq!(form.handle_key(KeyCode::Enter), FormOutcome::Submit);

        let (email, password) = form.credentials();
        assert_eq!(email, "admin@sapa.test");
        assert_eq!(password, "pw");
        assert_eq!(form.fields[1].display(), "**");
    }

    #[test]
    fn test_backspace_and_cancel() {
        let mut form = Form::hospital();
        type_into(&mut form, "abc");
        form.handle_key(KeyCode::Backspace);
        assert_eq!(form.fields[0].value, "ab");
        assert_eq!(form.handle_key(KeyCode::Esc), FormOutcome::Cancel);
    }

    #[test]
    fn test_department_prefill_and_parse() {
        let mut form = Form::department(Some(2));
        assert_eq!(form.fields[0].value, "2");
        form.focus = 1;
        type_into(&mut form, "Radiology");
        form.focus = 2;
        type_into(&mut form, "99.50");

        let dept = form.to_department().unwrap();
        assert_eq!(dept.hospital_id, HospitalId::new(2));
        assert_eq!(dept.price_per_student, 99.5);
    }

    #[test]
    fn test_timeslot_rejects_bad_input() {
        let mut form = Form::timeslot(Some(1));
        form.focus = 1;
        type_into(&mut form, "10:00");
        form.focus = 2;
        type_into(&mut form, "09:00");
        form.focus = 3;
        type_into(&mut form, "5");
        assert!(form.to_timeslot().is_err());

        form.fields[2].value = "11:30".into();
        let slot = form.to_timeslot().unwrap();
        assert_eq!(slot.capacity, 5);
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_id("id", "0").is_err());
        assert!(parse_id("id", "x").is_err());
        assert_eq!(parse_id("id", "12").unwrap(), 12);
        assert!(parse_date("2025-13-01").is_err());
        assert_eq!(parse_date("2025-03-10").unwrap().to_string(), "2025-03-10");
    }
}
