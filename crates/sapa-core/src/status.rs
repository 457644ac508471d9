//! Status values for Schools and Appointments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Row};

/// Registration status of a School.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolStatus {
    /// Registered, waiting for an administrator.
    #[default]
    Pending,
    /// Approved; students may book.
    Approved,
    /// Rejected by an administrator.
    Rejected,
}

impl SchoolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SchoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Status of a booking (appointment).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns true if an administrator can still act on the booking.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "confirmed" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Per-status school counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchoolStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

impl SchoolStats {
    /// Count statuses found in `status_column` of `rows`.
    ///
    /// Rows with an unrecognised status only count towards the total.
    pub fn from_rows(rows: &[Row], status_column: usize) -> Self {
        rows.iter().fold(
            Self {
                total: rows.len(),
                ..Self::default()
            },
            |mut stats, row| {
                let status = row
                    .get(status_column)
                    .map(|cell| cell.to_string())
                    .and_then(|s| s.parse::<SchoolStatus>().ok());
                match status {
                    Some(SchoolStatus::Approved) => stats.approved += 1,
                    Some(SchoolStatus::Pending) => stats.pending += 1,
                    Some(SchoolStatus::Rejected) => stats.rejected += 1,
                    None => {}
                }
                stats
            },
        )
    }

    /// One-line summary for status bars.
    pub fn summary(&self) -> String {
        format!(
            "Total: {} schools | Approved: {} | Pending: {} | Rejected: {}",
            self.total, self.approved, self.pending, self.rejected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellValue;

    #[test]
    fn test_school_status_parse() {
        assert_eq!("Approved".parse::<SchoolStatus>().unwrap(), SchoolStatus::Approved);
        assert!("archived".parse::<SchoolStatus>().is_err());
    }

    #[test]
    fn test_school_stats_from_rows() {
        let rows: Vec<Row> = ["approved", "PENDING", "rejected", "approved", "unknown"]
            .iter()
            .map(|s| vec![CellValue::Int(1), CellValue::from(*s)])
            .collect();

        let stats = SchoolStats::from_rows(&rows, 1);
        assert_eq!(
            stats,
            SchoolStats {
                total: 5,
                approved: 2,
                pending: 1,
                rejected: 1
            }
        );
        assert!(stats.summary().starts_with("Total: 5 schools"));
    }
}
