//! Console screens, one module per area of the main menu

pub mod departments;
pub mod employees;
pub mod projects;
pub mod reports;
pub mod time_records;
pub mod users;

use std::io::{BufRead, Write};

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_services::ServiceContext;

use crate::console::Prompt;
use crate::menu::{self, Entry};

#[derive(Debug, Clone, Copy)]
enum Area {
    Employees,
    Departments,
    Projects,
    TimeRecords,
    Reports,
    Users,
    ChangePassword,
}

const MAIN_MENU: [Entry<Area>; 7] = [
    Entry::new("Employees", Action::ListEmployees, Area::Employees),
    Entry::new("Departments", Action::ListDepartments, Area::Departments),
    Entry::new("Projects and assignments", Action::ViewProjects, Area::Projects),
    Entry::new("Time records", Action::LogTime, Area::TimeRecords),
    Entry::new("Reports", Action::ViewReports, Area::Reports),
    Entry::new("Users", Action::ManageUsers, Area::Users),
    Entry::new("Change password", Action::ChangePassword, Area::ChangePassword),
];

/// Main menu of a logged-in session; returns on logout
pub async fn main_menu<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let identity = ctx.identity();
    let title = format!(
        "WORKFORCE - {} ({})",
        identity.username,
        identity.role.as_str().to_uppercase()
    );

    loop {
        let Some(area) = menu::choose(prompt, ctx, &title, "Log out", &MAIN_MENU)? else {
            return Ok(());
        };

        let outcome = match area {
            Area::Employees => employees::run(prompt, ctx).await,
            Area::Departments => departments::run(prompt, ctx).await,
            Area::Projects => projects::run(prompt, ctx).await,
            Area::TimeRecords => time_records::run(prompt, ctx).await,
            Area::Reports => reports::run(prompt, ctx).await,
            Area::Users => users::run(prompt, ctx).await,
            Area::ChangePassword => users::change_password(prompt, ctx).await,
        };
        menu::settle(prompt, outcome)?;
    }
}
