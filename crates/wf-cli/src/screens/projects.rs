//! Project and assignment screens

use std::io::{self, BufRead, Write};

use wf_auth::Action;
use wf_core::result::{OrNotFound, WfResult};
use wf_core::traits::Id;
use wf_models::validate::DATE_FORMAT;
use wf_models::{Project, ProjectStatus};
use wf_services::{ProjectService, ServiceContext};

use crate::console::Prompt;
use crate::menu::{self, Entry};
use crate::screens::employees::print_employees;

#[derive(Debug, Clone, Copy)]
enum Choice {
    Create,
    FindById,
    FindByName,
    List,
    ListByStatus,
    Update,
    Delete,
    Assign,
    Unassign,
    Team,
    ProjectsOf,
}

const MENU: [Entry<Choice>; 11] = [
    Entry::new("Create project", Action::CreateProject, Choice::Create),
    Entry::new("Find project by ID", Action::ViewProjects, Choice::FindById),
    Entry::new("Find project by name", Action::ViewProjects, Choice::FindByName),
    Entry::new("List projects", Action::ListProjects, Choice::List),
    Entry::new("List projects by status", Action::ListProjects, Choice::ListByStatus),
    Entry::new("Update project", Action::UpdateProject, Choice::Update),
    Entry::new("Delete project", Action::DeleteProject, Choice::Delete),
    Entry::new("Assign employee to project", Action::AssignEmployee, Choice::Assign),
    Entry::new("Remove employee from project", Action::UnassignEmployee, Choice::Unassign),
    Entry::new("Employees of a project", Action::ViewProjects, Choice::Team),
    Entry::new("Projects of an employee", Action::ViewProjects, Choice::ProjectsOf),
];

pub async fn run<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    loop {
        let Some(choice) = menu::choose(prompt, ctx, "PROJECTS", "Back", &MENU)? else {
            return Ok(());
        };

        let outcome = match choice {
            Choice::Create => create(prompt, ctx).await,
            Choice::FindById => find_by_id(prompt, ctx).await,
            Choice::FindByName => find_by_name(prompt, ctx).await,
            Choice::List => list(prompt, ctx).await,
            Choice::ListByStatus => list_by_status(prompt, ctx).await,
            Choice::Update => update(prompt, ctx).await,
            Choice::Delete => delete(prompt, ctx).await,
            Choice::Assign => assign(prompt, ctx).await,
            Choice::Unassign => unassign(prompt, ctx).await,
            Choice::Team => team(prompt, ctx).await,
            Choice::ProjectsOf => projects_of(prompt, ctx).await,
        };
        menu::settle(prompt, outcome)?;
    }
}

async fn create<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let name = prompt.ask("Name")?;
    let description = prompt.ask_optional("Description (optional)")?;
    let start_date = prompt.ask("Start date (YYYY-MM-DD)")?;

    let project = Project::new(&name, description.as_deref(), start_date.as_str())?;
    let created = ProjectService::new(ctx).create(&project).await?;
    prompt.ok(format!(
        "Project '{}' created with ID {}",
        created.name(),
        created.id().unwrap_or_default()
    ))?;
    Ok(())
}

async fn find_by_id<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("Project ID", "id")?;
    match ProjectService::new(ctx).get(id).await? {
        Some(project) => print_project(prompt, &project)?,
        None => prompt.say("Project not found.")?,
    }
    Ok(())
}

async fn find_by_name<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let name = prompt.ask("Name")?;
    match ProjectService::new(ctx).find_by_name(&name).await? {
        Some(project) => print_project(prompt, &project)?,
        None => prompt.say("Project not found.")?,
    }
    Ok(())
}

async fn list<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let projects = ProjectService::new(ctx).list().await?;
    print_projects(prompt, &projects)?;
    Ok(())
}

async fn list_by_status<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let status = ask_status(prompt)?;
    let projects = ProjectService::new(ctx).by_status(status).await?;
    print_projects(prompt, &projects)?;
    Ok(())
}

async fn update<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let service = ProjectService::new(ctx);
    let id: Id = prompt.ask_parsed("Project ID", "id")?;
    let mut project = service
        .get(id)
        .await?
        .or_not_found("Project", "id", id)?;

    prompt.say("Leave a field empty to keep its value.")?;
    let name = prompt.ask_or_keep("Name", project.name())?;
    project.set_name(&name)?;
    let description = prompt.ask_or_keep("Description", project.description().unwrap_or(""))?;
    project.set_description(Some(description.as_str()));
    let start_date = prompt.ask_or_keep(
        "Start date",
        &project.start_date().format(DATE_FORMAT).to_string(),
    )?;
    project.set_start_date(start_date.as_str())?;
    let status = prompt.ask_or_keep("Status (Active/Paused/Finished)", project.status().as_str())?;
    project.set_status_text(&status)?;

    service.update(&project).await?;
    prompt.ok("Project updated")?;
    Ok(())
}

async fn delete<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("Project ID", "id")?;
    if !prompt.confirm("Delete this project and its assignments?")? {
        prompt.say("Cancelled.")?;
        return Ok(());
    }
    ProjectService::new(ctx).delete(id).await?;
    prompt.ok("Project deleted")?;
    Ok(())
}

async fn assign<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let employee_id = prompt.ask("Employee ID")?;
    let project_name = prompt.ask("Project name")?;
    ProjectService::new(ctx)
        .assign_by_name(&employee_id, &project_name)
        .await?;
    prompt.ok(format!("Employee {employee_id} assigned to '{project_name}'"))?;
    Ok(())
}

async fn unassign<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let employee_id = prompt.ask("Employee ID")?;
    let project_id: Id = prompt.ask_parsed("Project ID", "project_id")?;
    ProjectService::new(ctx).unassign(&employee_id, project_id).await?;
    prompt.ok("Employee removed from project")?;
    Ok(())
}

async fn team<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let project_id: Id = prompt.ask_parsed("Project ID", "project_id")?;
    let employees = ProjectService::new(ctx).team(project_id).await?;
    print_employees(prompt, &employees)?;
    Ok(())
}

async fn projects_of<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let employee_id = prompt.ask("Employee ID")?;
    let projects = ProjectService::new(ctx).projects_of(&employee_id).await?;
    print_projects(prompt, &projects)?;
    Ok(())
}

fn ask_status<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>) -> WfResult<ProjectStatus> {
    let answer = prompt.ask("Status (Active/Paused/Finished)")?;
    Ok(answer.parse()?)
}

fn print_project<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, project: &Project) -> io::Result<()> {
    prompt.say(format!("ID:          {}", project.id().unwrap_or_default()))?;
    prompt.say(format!("Name:        {}", project.name()))?;
    prompt.say(format!("Start date:  {}", project.start_date().format(DATE_FORMAT)))?;
    prompt.say(format!("Status:      {}", project.status()))?;
    prompt.say(format!("Description: {}", project.description().unwrap_or("-")))
}

fn print_projects<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, projects: &[Project]) -> io::Result<()> {
    if projects.is_empty() {
        return prompt.say("No projects found.");
    }
    prompt.say(format!("{:<6} {:<30} {:<12} {:<10}", "ID", "NAME", "START", "STATUS"))?;
    for p in projects {
        prompt.say(format!(
            "{:<6} {:<30} {:<12} {:<10}",
            p.id().unwrap_or_default(),
            p.name(),
            p.start_date().format(DATE_FORMAT).to_string(),
            p.status().as_str()
        ))?;
    }
    Ok(())
}
