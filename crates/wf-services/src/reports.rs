//! Reports over the whole data set
//!
//! A report is loaded into a [`Report`] table, which the console shows and
//! the CSV export writes. Every export goes to its own file under the
//! configured directory, named `<kind>_<YYYYmmdd_HHMMSS>.csv`. The header
//! row is always present, even when there are no rows.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use wf_auth::Action;
use wf_core::error::{ValidationErrors, WfError};
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_db::{
    AssignmentRepository, DepartmentRepository, EmployeeRepository, ProjectRepository, Repository,
    TimeRecordRepository,
};
use wf_models::validate::DATE_FORMAT;

use crate::context::ServiceContext;

/// Reports read every row, not a page
const ALL_ROWS: i64 = i64::MAX;

/// Label of the closing row of the time record report
pub const TOTAL_HOURS_LABEL: &str = "TOTAL HOURS";

/// A single exportable report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Employees,
    Departments,
    Projects,
    TimeRecords,
    Assignments,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        Self::Employees,
        Self::Departments,
        Self::Projects,
        Self::TimeRecords,
        Self::Assignments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::Projects => "projects",
            Self::TimeRecords => "time_records",
            Self::Assignments => "assignments",
        }
    }

    fn legacy_name(&self) -> &'static str {
        match self {
            Self::Employees => "empleados",
            Self::Departments => "departamentos",
            Self::Projects => "proyectos",
            Self::TimeRecords => "registros_tiempo",
            Self::Assignments => "asignaciones",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name || kind.legacy_name() == name)
            .ok_or_else(|| ValidationErrors::single("report", format!("is not a known report: {}", s.trim())))
    }
}

/// One report or every report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    One(ReportKind),
    All,
}

impl FromStr for ReportTarget {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" => Ok(Self::All),
            _ => s.parse().map(Self::One),
        }
    }
}

impl ReportTarget {
    /// Reports covered by the target, in `ReportKind::ALL` order
    pub fn kinds(&self) -> Vec<ReportKind> {
        match self {
            Self::One(kind) => vec![*kind],
            Self::All => ReportKind::ALL.to_vec(),
        }
    }
}

/// A loaded report: header, one row of cells per line, and for time
/// records the hours total
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    kind: ReportKind,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
    total_hours: Option<f64>,
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn headers(&self) -> &[&'static str] {
        self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn total_hours(&self) -> Option<f64> {
        self.total_hours
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

const EMPLOYEE_HEADERS: &[&str] = &[
    "ID",
    "First Name",
    "Last Name",
    "Job Title",
    "Salary",
    "Department ID",
    "Department",
];
const DEPARTMENT_HEADERS: &[&str] = &["ID", "Name", "Manager", "Description"];
const PROJECT_HEADERS: &[&str] = &["ID", "Name", "Start Date", "Status", "Description"];
const TIME_RECORD_HEADERS: &[&str] = &["ID", "Employee ID", "Date", "Hours", "Project", "Description"];
const ASSIGNMENT_HEADERS: &[&str] = &["Employee ID", "Name", "Assigned Projects"];

/// Report export for one session
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
    directory: PathBuf,
}

impl<'a> ReportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            directory: ctx.config().reports.directory.clone(),
        }
    }

    /// Write to another directory than the configured one
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Read the rows of one report
    pub async fn load(&self, kind: ReportKind) -> WfResult<Report> {
        self.ctx.require(Action::ViewReports)?;
        match kind {
            ReportKind::Employees => self.employees().await,
            ReportKind::Departments => self.departments().await,
            ReportKind::Projects => self.projects().await,
            ReportKind::TimeRecords => self.time_records().await,
            ReportKind::Assignments => self.assignments().await,
        }
    }

    /// Write a loaded report to a new CSV file and return its path
    pub fn export(&self, report: &Report) -> WfResult<PathBuf> {
        self.ctx.require(Action::ViewReports)?;
        fs::create_dir_all(&self.directory)?;

        let path = self.file_name(report.kind);
        write_csv(&path, report)?;

        tracing::info!(report = %report.kind, rows = report.rows.len(), path = %path.display(), "Report exported");
        Ok(path)
    }

    /// Export one report and return its path
    pub async fn generate(&self, kind: ReportKind) -> WfResult<PathBuf> {
        let report = self.load(kind).await?;
        self.export(&report)
    }

    /// Export every report, in `ReportKind::ALL` order
    pub async fn generate_all(&self) -> WfResult<Vec<PathBuf>> {
        self.run(ReportTarget::All).await
    }

    pub async fn run(&self, target: ReportTarget) -> WfResult<Vec<PathBuf>> {
        let kinds = target.kinds();
        let mut paths = Vec::with_capacity(kinds.len());
        for kind in kinds {
            paths.push(self.generate(kind).await?);
        }
        Ok(paths)
    }

    fn file_name(&self, kind: ReportKind) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.directory.join(format!("{kind}_{stamp}.csv"))
    }

    async fn employees(&self) -> WfResult<Report> {
        let pool = self.ctx.database().pool().clone();
        let employees = EmployeeRepository::new(pool.clone()).find_all(ALL_ROWS).await?;
        let departments: HashMap<Id, String> = DepartmentRepository::new(pool)
            .find_all(ALL_ROWS)
            .await?
            .into_iter()
            .filter_map(|d| d.id().map(|id| (id, d.name().to_string())))
            .collect();

        let rows = employees
            .iter()
            .map(|employee| {
                let department = match employee.department_id() {
                    Some(id) => departments.get(&id).map(String::as_str).unwrap_or("N/A"),
                    None => "",
                };
                vec![
                    employee.id().to_string(),
                    employee.first_name().to_string(),
                    employee.last_name().to_string(),
                    employee.job_title().to_string(),
                    employee.salary().to_string(),
                    optional(employee.department_id()),
                    department.to_string(),
                ]
            })
            .collect();

        Ok(Report {
            kind: ReportKind::Employees,
            headers: EMPLOYEE_HEADERS,
            rows,
            total_hours: None,
        })
    }

    async fn departments(&self) -> WfResult<Report> {
        let departments = DepartmentRepository::new(self.ctx.database().pool().clone())
            .find_all(ALL_ROWS)
            .await?;

        let rows = departments
            .iter()
            .map(|department| {
                vec![
                    optional(department.id()),
                    department.name().to_string(),
                    department.manager().to_string(),
                    optional(department.description()),
                ]
            })
            .collect();

        Ok(Report {
            kind: ReportKind::Departments,
            headers: DEPARTMENT_HEADERS,
            rows,
            total_hours: None,
        })
    }

    async fn projects(&self) -> WfResult<Report> {
        let projects = ProjectRepository::new(self.ctx.database().pool().clone())
            .find_all(ALL_ROWS)
            .await?;

        let rows = projects
            .iter()
            .map(|project| {
                vec![
                    optional(project.id()),
                    project.name().to_string(),
                    project.start_date().format(DATE_FORMAT).to_string(),
                    project.status().as_str().to_string(),
                    optional(project.description()),
                ]
            })
            .collect();

        Ok(Report {
            kind: ReportKind::Projects,
            headers: PROJECT_HEADERS,
            rows,
            total_hours: None,
        })
    }

    async fn time_records(&self) -> WfResult<Report> {
        let records = TimeRecordRepository::new(self.ctx.database().pool().clone())
            .find_all(ALL_ROWS)
            .await?;

        let total: f64 = records.iter().map(|r| r.hours()).sum();
        let rows = records
            .iter()
            .map(|record| {
                vec![
                    optional(record.id()),
                    record.employee_id().to_string(),
                    record.work_date().format(DATE_FORMAT).to_string(),
                    record.hours().to_string(),
                    record.project().to_string(),
                    optional(record.description()),
                ]
            })
            .collect();

        Ok(Report {
            kind: ReportKind::TimeRecords,
            headers: TIME_RECORD_HEADERS,
            rows,
            total_hours: Some(total),
        })
    }

    /// Employees without projects are left out
    async fn assignments(&self) -> WfResult<Report> {
        let pool = self.ctx.database().pool().clone();
        let employees = EmployeeRepository::new(pool.clone()).find_all(ALL_ROWS).await?;
        let assignments = AssignmentRepository::new(pool);

        let mut rows = Vec::new();
        for employee in &employees {
            let projects = assignments.projects_of_employee(employee.id()).await?;
            if projects.is_empty() {
                continue;
            }
            let projects = projects
                .iter()
                .map(|p| format!("{} ({})", p.name(), p.status()))
                .collect::<Vec<_>>()
                .join(", ");
            rows.push(vec![employee.id().to_string(), employee.full_name(), projects]);
        }

        Ok(Report {
            kind: ReportKind::Assignments,
            headers: ASSIGNMENT_HEADERS,
            rows,
            total_hours: None,
        })
    }
}

fn optional(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_csv(path: &Path, report: &Report) -> WfResult<()> {
    let mut writer = open(path)?;
    writer.write_record(report.headers).map_err(csv_error)?;
    for row in &report.rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    if let Some(total) = report.total_hours {
        let total = total.to_string();
        writer
            .write_record(vec![""; report.headers.len()])
            .map_err(csv_error)?;
        writer
            .write_record([TOTAL_HOURS_LABEL, total.as_str()])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Headers are written explicitly so empty reports still carry them
fn open(path: &Path) -> WfResult<csv::Writer<fs::File>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)
}

fn csv_error(err: csv::Error) -> WfError {
    WfError::Io(err.into())
}
