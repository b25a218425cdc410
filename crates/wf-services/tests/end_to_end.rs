//! Full workflow against an in-memory database

use std::fs;

use tempfile::TempDir;
use wf_auth::PasswordService;
use wf_core::config::AppConfig;
use wf_core::error::{ReferenceProblem, WfError};
use wf_db::Database;
use wf_models::{Department, Employee, Project, ProjectStatus, Role, TimeRecord};
use wf_services::{
    App, DepartmentService, EmployeeService, ProjectService, ReportKind, ReportService,
    ServiceContext, TimeRecordService, UserService,
};

async fn setup() -> (App, TempDir) {
    let reports = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.reports.directory = reports.path().join("informes");

    let db = Database::in_memory().await.unwrap();
    let app = App::new(db, config).with_password_service(PasswordService::minimal());
    assert!(app.initialize().await.unwrap());
    (app, reports)
}

async fn admin(app: &App) -> ServiceContext {
    app.login("admin", "admin123").await.unwrap().expect("admin login")
}

async fn seed(ctx: &ServiceContext) -> (Department, Employee, Project) {
    let tech = DepartmentService::new(ctx)
        .create(&Department::new("Tech", "Alice", None).unwrap())
        .await
        .unwrap();
    let bob = EmployeeService::new(ctx)
        .create(&Employee::new("11111111-1", "Bob", "Lee", "Engineer", 1_000_000, tech.id()).unwrap())
        .await
        .unwrap();
    let launch = ProjectService::new(ctx)
        .create(&Project::new("Launch", Some("desc"), "2025-01-01").unwrap())
        .await
        .unwrap();
    (tech, bob, launch)
}

#[tokio::test]
async fn test_assignment_lifecycle() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let (_, bob, launch) = seed(&ctx).await;
    let projects = ProjectService::new(&ctx);

    let assignment = projects.assign_by_name(bob.id(), "Launch").await.unwrap();
    assert_eq!(assignment.employee_id(), "11111111-1");
    assert_eq!(Some(assignment.project_id()), launch.id());

    let err = projects.assign_by_name(bob.id(), "Launch").await.unwrap_err();
    assert!(matches!(err, WfError::DuplicateKey { .. }));
    assert_eq!(projects.team(assignment.project_id()).await.unwrap().len(), 1);

    let err = projects.assign_by_name(bob.id(), "Unknown").await.unwrap_err();
    assert!(matches!(err, WfError::NotFound { .. }));

    // assignments go with the project
    projects.delete(assignment.project_id()).await.unwrap();
    assert!(projects.projects_of(bob.id()).await.unwrap().is_empty());
    assert!(projects.get(assignment.project_id()).await.unwrap().is_none());

    let err = projects.unassign(bob.id(), assignment.project_id()).await.unwrap_err();
    assert!(matches!(err, WfError::NotFound { .. } | WfError::Referential { .. }));
}

#[tokio::test]
async fn test_project_lookups_ignore_case() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let (_, bob, launch) = seed(&ctx).await;
    let projects = ProjectService::new(&ctx);

    assert_eq!(projects.find_by_name("launch").await.unwrap(), Some(launch.clone()));
    let assignment = projects.assign_by_name(bob.id(), "LAUNCH").await.unwrap();
    assert_eq!(Some(assignment.project_id()), launch.id());

    let records = TimeRecordService::new(&ctx);
    records
        .log(&TimeRecord::new(bob.id(), "2025-03-10", 6, "Launch", None).unwrap())
        .await
        .unwrap();
    assert_eq!(records.by_project_label("LAUNCH").await.unwrap().len(), 1);
    assert_eq!(records.by_project_label("launch").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unassign_missing_pair() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let (_, bob, launch) = seed(&ctx).await;
    let projects = ProjectService::new(&ctx);
    let project_id = launch.id().unwrap();

    let err = projects.unassign(bob.id(), project_id).await.unwrap_err();
    assert!(matches!(err, WfError::NotFound { .. }));

    projects.assign(bob.id(), project_id).await.unwrap();
    projects.unassign(bob.id(), project_id).await.unwrap();
    assert!(projects.team(project_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_department_keeps_first() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let departments = DepartmentService::new(&ctx);

    let first = departments
        .create(&Department::new("Tech", "Alice", Some("R&D")).unwrap())
        .await
        .unwrap();
    let err = departments
        .create(&Department::new("Tech", "Carol", None).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WfError::DuplicateKey { .. }));

    let stored = departments.find_by_name("Tech").await.unwrap().unwrap();
    assert_eq!(stored, first);
    assert_eq!(stored.manager(), "Alice");
    assert_eq!(departments.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_referential_checks() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let (tech, bob, _) = seed(&ctx).await;
    let times = TimeRecordService::new(&ctx);

    let orphan = TimeRecord::new("99999999-9", "2025-02-01", 8, "Launch", None).unwrap();
    let err = times.log(&orphan).await.unwrap_err();
    assert!(matches!(
        err,
        WfError::Referential { problem: ReferenceProblem::Missing, .. }
    ));
    assert!(times.list().await.unwrap().is_empty());

    times
        .log(&TimeRecord::new(bob.id(), "2025-02-01", 7.5, "Launch", Some("setup")).unwrap())
        .await
        .unwrap();

    let err = DepartmentService::new(&ctx).delete(tech.id().unwrap()).await.unwrap_err();
    assert!(matches!(
        err,
        WfError::Referential { problem: ReferenceProblem::StillReferencedBy(_), .. }
    ));
    let err = EmployeeService::new(&ctx).delete(bob.id()).await.unwrap_err();
    assert!(matches!(err, WfError::Referential { .. }));
}

#[tokio::test]
async fn test_update_after_read() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let (_, bob, launch) = seed(&ctx).await;
    let employees = EmployeeService::new(&ctx);

    let mut stored = employees.get(bob.id()).await.unwrap().unwrap();
    assert_eq!(stored, bob);
    stored.set_salary(1_200_000).unwrap();
    employees.update(&stored).await.unwrap();
    assert_eq!(employees.get(bob.id()).await.unwrap().unwrap().salary(), 1_200_000.0);

    employees.set_department(bob.id(), None).await.unwrap();
    assert_eq!(employees.get(bob.id()).await.unwrap().unwrap().department_id(), None);

    let projects = ProjectService::new(&ctx);
    let paused = projects
        .set_status(launch.id().unwrap(), ProjectStatus::Paused)
        .await
        .unwrap();
    assert_eq!(paused.status(), ProjectStatus::Paused);
    assert_eq!(projects.by_status(ProjectStatus::Active).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_failed_login_counter() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let admin_id = ctx.identity().id;
    let credentials = app.credentials();

    assert!(app.login("admin", "wrong").await.unwrap().is_none());
    let user = credentials.find_user(admin_id).await.unwrap().unwrap();
    assert_eq!(user.failed_attempts(), 1);

    let ctx = admin(&app).await;
    assert_eq!(ctx.identity().role, Role::Admin);
    let user = credentials.find_user(admin_id).await.unwrap().unwrap();
    assert_eq!(user.failed_attempts(), 0);
    assert!(user.last_login().is_some());
}

#[tokio::test]
async fn test_role_restrictions() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let (tech, bob, _) = seed(&ctx).await;

    let users = UserService::new(&ctx);
    users.create_user("maria", "secret1", Role::Employee, None).await.unwrap();
    users
        .create_user("sam", "secret2", Role::Supervisor, Some("sam@empresa.com"))
        .await
        .unwrap();
    assert_eq!(users.list_users().await.unwrap().len(), 3);

    let employee = app.login("maria", "secret1").await.unwrap().unwrap();
    let err = EmployeeService::new(&employee).delete(bob.id()).await.unwrap_err();
    assert!(matches!(err, WfError::Forbidden { .. }));
    assert_eq!(err.to_string(), "Forbidden: role 'employee' may not delete_employee");
    assert!(DepartmentService::new(&employee).list().await.is_err());
    assert!(UserService::new(&employee).list_users().await.is_err());
    assert!(ReportService::new(&employee).generate(ReportKind::Employees).await.is_err());

    assert_eq!(EmployeeService::new(&employee).list().await.unwrap().len(), 1);
    TimeRecordService::new(&employee)
        .log(&TimeRecord::new(bob.id(), "2025-03-03", 4, "Launch", None).unwrap())
        .await
        .unwrap();

    let supervisor = app.login("sam", "secret2").await.unwrap().unwrap();
    assert_eq!(TimeRecordService::new(&supervisor).total_hours().await.unwrap(), 4.0);
    let err = DepartmentService::new(&supervisor)
        .delete(tech.id().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WfError::Forbidden { .. }));
}

#[tokio::test]
async fn test_change_own_password() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    UserService::new(&ctx)
        .create_user("maria", "secret1", Role::Employee, None)
        .await
        .unwrap();

    let session = app.login("maria", "secret1").await.unwrap().unwrap();
    let users = UserService::new(&session);
    let err = users.change_password("wrong", "secret9").await.unwrap_err();
    assert!(matches!(err, WfError::Auth { .. }));
    let err = users.change_password("secret1", "abc").await.unwrap_err();
    assert!(matches!(err, WfError::Validation(_)));

    users.change_password("secret1", "secret9").await.unwrap();
    assert!(app.login("maria", "secret1").await.unwrap().is_none());
    assert!(app.login("maria", "secret9").await.unwrap().is_some());
}

#[tokio::test]
async fn test_deactivated_user_cannot_log_in() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;
    let users = UserService::new(&ctx);
    let maria = users
        .create_user("maria", "secret1", Role::Employee, None)
        .await
        .unwrap();

    users.deactivate(maria.id().unwrap()).await.unwrap();
    assert!(app.login("maria", "secret1").await.unwrap().is_none());

    users.unlock(maria.id().unwrap()).await.unwrap();
    assert!(app.login("maria", "secret1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_reports() {
    let (app, reports) = setup().await;
    let ctx = admin(&app).await;
    let (_, bob, launch) = seed(&ctx).await;
    ProjectService::new(&ctx)
        .assign(bob.id(), launch.id().unwrap())
        .await
        .unwrap();
    let times = TimeRecordService::new(&ctx);
    times
        .log(&TimeRecord::new(bob.id(), "2025-02-01", 7.5, "Launch", None).unwrap())
        .await
        .unwrap();
    times
        .log(&TimeRecord::new(bob.id(), "2025-02-02", 8, "Launch", Some("review")).unwrap())
        .await
        .unwrap();

    let service = ReportService::new(&ctx);
    let paths = service.generate_all().await.unwrap();
    assert_eq!(paths.len(), ReportKind::ALL.len());
    for (path, kind) in paths.iter().zip(ReportKind::ALL) {
        assert!(path.starts_with(reports.path().join("informes")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(&format!("{kind}_")));
        assert!(name.ends_with(".csv"));
    }

    let employees = fs::read_to_string(&paths[0]).unwrap();
    let mut lines = employees.lines();
    assert_eq!(
        lines.next(),
        Some("ID,First Name,Last Name,Job Title,Salary,Department ID,Department")
    );
    assert!(lines.next().unwrap().starts_with("11111111-1,Bob,Lee,Engineer,"));

    let time_records = fs::read_to_string(&paths[3]).unwrap();
    let lines: Vec<&str> = time_records.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], ",,,,,");
    assert_eq!(lines[4], "TOTAL HOURS,15.5");

    let assignments = fs::read_to_string(&paths[4]).unwrap();
    assert!(assignments.contains("11111111-1,Bob Lee,Launch (Active)"));

    let loaded = service.load(ReportKind::TimeRecords).await.unwrap();
    assert_eq!(loaded.headers()[3], "Hours");
    assert_eq!(loaded.rows().len(), 2);
    assert_eq!(loaded.total_hours(), Some(15.5));
    let loaded = service.load(ReportKind::Assignments).await.unwrap();
    assert_eq!(loaded.rows(), &[vec![
        "11111111-1".to_string(),
        "Bob Lee".to_string(),
        "Launch (Active)".to_string(),
    ]]);
    assert_eq!(service.load(ReportKind::Employees).await.unwrap().total_hours(), None);
}

#[tokio::test]
async fn test_empty_report_has_header() {
    let (app, _reports) = setup().await;
    let ctx = admin(&app).await;

    let path = ReportService::new(&ctx)
        .generate(ReportKind::Departments)
        .await
        .unwrap();
    let content = fs::read_to_string(path).unwrap();
    assert_eq!(content.trim_end(), "ID,Name,Manager,Description");
}
