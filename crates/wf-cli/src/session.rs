//! Login screen and the interactive session loop

use std::io::{BufRead, Write};

use wf_core::result::WfResult;
use wf_services::{App, ServiceContext};

use crate::console::Prompt;
use crate::screens;

/// Failed logins allowed before the console exits
pub const MAX_LOGIN_ATTEMPTS: usize = 3;

/// Ask for credentials until they verify or the attempts run out
pub async fn login<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    app: &App,
) -> WfResult<Option<ServiceContext>> {
    prompt.heading("LOGIN")?;

    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let username = prompt.ask("Username")?;
        let password = prompt.ask("Password")?;

        if let Some(ctx) = app.login(&username, &password).await? {
            let identity = ctx.identity();
            prompt.ok(format!("Welcome, {} ({})", identity.username, identity.role))?;
            return Ok(Some(ctx));
        }

        let left = MAX_LOGIN_ATTEMPTS - attempt;
        prompt.say(format!("[ERROR] Invalid username or password. Attempts left: {left}"))?;
    }

    Ok(None)
}

/// Login, main menu, and back to login until the user leaves
pub async fn interactive<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, app: &App) -> WfResult<()> {
    if app.initialize().await? {
        prompt.say(format!(
            "Default administrator '{}' created. Change its password after the first login.",
            wf_auth::credentials::ADMIN_USERNAME
        ))?;
    }

    loop {
        let Some(ctx) = login(prompt, app).await? else {
            prompt.say("Too many failed attempts. Exiting.")?;
            return Ok(());
        };

        screens::main_menu(prompt, &ctx).await?;
        prompt.say("Logged out.")?;

        if !prompt.confirm("Log in as another user?")? {
            prompt.say("Goodbye.")?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wf_auth::PasswordService;
    use wf_core::config::AppConfig;
    use wf_db::Database;
    use wf_models::Role;

    async fn app() -> App {
        let db = Database::in_memory().await.unwrap();
        App::new(db, AppConfig::default()).with_password_service(PasswordService::minimal())
    }

    async fn run_script(app: &App, script: &str) -> String {
        let mut prompt = Prompt::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        interactive(&mut prompt, app).await.unwrap();
        String::from_utf8(prompt.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_admin_session() {
        let app = app().await;
        let output = run_script(&app, "admin\nadmin123\n0\nn\n").await;

        assert!(output.contains("Default administrator 'admin' created"));
        assert!(output.contains("WORKFORCE - admin (ADMIN)"));
        assert!(output.contains("Users"));
        assert!(output.contains("Goodbye."));
    }

    #[tokio::test]
    async fn test_three_failed_logins_exit() {
        let app = app().await;
        let output = run_script(&app, "admin\nx\nadmin\ny\nadmin\nz\n").await;

        assert!(output.contains("Attempts left: 0"));
        assert!(output.contains("Too many failed attempts"));
        assert!(!output.contains("WORKFORCE -"));
    }

    #[tokio::test]
    async fn test_employee_menu_is_filtered() {
        let app = app().await;
        app.initialize().await.unwrap();
        app.credentials()
            .create_user("maria", "secret1", Role::Employee, None)
            .await
            .unwrap();

        let output = run_script(&app, "maria\nsecret1\n0\nn\n").await;
        assert!(output.contains("WORKFORCE - maria (EMPLOYEE)"));
        assert!(output.contains("Employees"));
        assert!(output.contains("Change password"));
        assert!(!output.contains("Departments"));
        assert!(!output.contains("Reports"));
        assert!(!output.contains("Users"));
    }

    #[tokio::test]
    async fn test_create_department_from_menu() {
        let app = app().await;
        // main menu 2 = Departments, submenu 1 = Create
        let script = "admin\nadmin123\n2\n1\nTech\nAlice\n\n0\n0\nn\n";
        let output = run_script(&app, script).await;
        assert!(output.contains("[OK] Department 'Tech' created with ID 1"));

        let script = "admin\nadmin123\n2\n1\nTech\nBob\n\n0\n0\nn\n";
        let output = run_script(&app, script).await;
        assert!(output.contains("[ERROR] Duplicate key"));
    }

    #[tokio::test]
    async fn test_reports_are_shown_and_exported() {
        use wf_models::{Employee, Project, TimeRecord};
        use wf_services::{EmployeeService, ProjectService, TimeRecordService};

        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.reports.directory = dir.path().to_path_buf();
        let db = Database::in_memory().await.unwrap();
        let app = App::new(db, config).with_password_service(PasswordService::minimal());
        app.initialize().await.unwrap();

        let ctx = app.login("admin", "admin123").await.unwrap().unwrap();
        EmployeeService::new(&ctx)
            .create(&Employee::new("11111111-1", "Bob", "Lee", "Engineer", 1000, None).unwrap())
            .await
            .unwrap();
        ProjectService::new(&ctx)
            .create(&Project::new("Launch", None, "2025-01-01").unwrap())
            .await
            .unwrap();
        ProjectService::new(&ctx).assign_by_name("11111111-1", "Launch").await.unwrap();
        TimeRecordService::new(&ctx)
            .log(&TimeRecord::new("11111111-1", "2025-02-01", 7.5, "Launch", None).unwrap())
            .await
            .unwrap();

        // main menu 5 = Reports, then 4 = Time records and 5 = Assignments
        let output = run_script(&app, "admin\nadmin123\n5\n4\n5\n0\n0\nn\n").await;
        assert!(output.contains("TIME RECORDS REPORT"));
        assert!(output.contains("2025-02-01"));
        assert!(output.contains("Total hours: 7.5"));
        assert!(output.contains("ASSIGNMENTS REPORT"));
        assert!(output.contains("Bob Lee"));
        assert!(output.contains("Launch (Active)"));
        assert_eq!(output.matches("[OK] Report exported to").count(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_closed_input_is_reported() {
        let app = app().await;
        let mut prompt = Prompt::new(Cursor::new(Vec::new()), Vec::new());
        let err = interactive(&mut prompt, &app).await.unwrap_err();
        assert!(crate::console::is_end_of_input(&err));
    }
}
