//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sapa_db::DbConfig;

#[derive(Parser)]
#[command(name = "sapa-admin")]
#[command(about = "Admin console for the SAPA hospital booking system")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub db: DbArgs,

    /// Use built-in demo data instead of the database
    #[arg(long)]
    pub demo: bool,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, env = "SAPA_LOG_FILE", default_value = "/tmp/sapa-admin.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Database connection flags.
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long, env = "SAPA_DB_HOST", default_value = "127.0.0.1")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "SAPA_DB_PORT", default_value = "3306")]
    pub db_port: u16,

    /// Database (schema) name
    #[arg(long, env = "SAPA_DB_NAME", default_value = "sapa_app_db")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "SAPA_DB_USER", default_value = "admin")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "SAPA_DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Maximum pooled connections
    #[arg(long, default_value = "5")]
    pub db_max_connections: u32,

    /// Seconds to wait for a free pooled connection
    #[arg(long, env = "SAPA_DB_ACQUIRE_TIMEOUT", default_value = "10")]
    pub db_acquire_timeout: u64,
}

impl DbArgs {
    pub fn to_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout_secs: self.db_acquire_timeout,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive console (default)
    Console {
        /// Log in with this email instead of showing the login form
        #[arg(long, env = "SAPA_ADMIN_EMAIL", requires = "password")]
        email: Option<String>,

        /// Password for --email
        #[arg(long, env = "SAPA_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Print a table
    Export {
        view: ExportView,

        /// Record id for the drill-down views (school, time slot, booking, user or department)
        #[arg(long)]
        id: Option<i64>,

        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Register a hospital
    AddHospital {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        contact: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Add a department (section) to a hospital
    AddDepartment {
        #[arg(long)]
        hospital_id: i64,
        #[arg(long)]
        section: String,
        #[arg(long)]
        price: f64,
    },

    /// Open a date for a department
    AddSlotDate {
        #[arg(long)]
        department_id: i64,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },

    /// Open a time slot on a slot date
    AddTimeslot {
        #[arg(long)]
        slot_date_id: i64,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        capacity: u32,
    },

    /// Approve a pending user
    ApproveUser { id: i64 },

    /// Approve a school
    ApproveSchool { id: i64 },

    /// Reject a school
    RejectSchool { id: i64 },

    /// Approve a booking
    ApproveBooking { id: i64 },
}

/// Tables that `export` can print.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportView {
    PendingUsers,
    ApprovedUsers,
    Schools,
    Hospitals,
    Departments,
    SlotDates,
    Timeslots,
    Bookings,
    SchoolStudents,
    TimeslotStudents,
    BookingStudents,
    UserSchools,
    DepartmentSchools,
}
