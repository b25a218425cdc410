//! Department screens

use std::io::{BufRead, Write};

use wf_auth::Action;
use wf_core::error::WfError;
use wf_core::result::{OrNotFound, WfResult};
use wf_core::traits::Id;
use wf_models::Department;
use wf_services::{DepartmentService, ServiceContext};

use crate::console::Prompt;
use crate::menu::{self, Entry};
use crate::screens::employees::print_employees;

#[derive(Debug, Clone, Copy)]
enum Choice {
    Create,
    FindById,
    FindByName,
    List,
    Members,
    Update,
    Delete,
}

const MENU: [Entry<Choice>; 7] = [
    Entry::new("Create department", Action::CreateDepartment, Choice::Create),
    Entry::new("Find department by ID", Action::ListDepartments, Choice::FindById),
    Entry::new("Find department by name", Action::ListDepartments, Choice::FindByName),
    Entry::new("List departments", Action::ListDepartments, Choice::List),
    Entry::new("List department employees", Action::ListEmployees, Choice::Members),
    Entry::new("Update department", Action::UpdateDepartment, Choice::Update),
    Entry::new("Delete department", Action::DeleteDepartment, Choice::Delete),
];

pub async fn run<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    loop {
        let Some(choice) = menu::choose(prompt, ctx, "DEPARTMENTS", "Back", &MENU)? else {
            return Ok(());
        };

        let outcome = match choice {
            Choice::Create => create(prompt, ctx).await,
            Choice::FindById => find_by_id(prompt, ctx).await,
            Choice::FindByName => find_by_name(prompt, ctx).await,
            Choice::List => list(prompt, ctx).await,
            Choice::Members => members(prompt, ctx).await,
            Choice::Update => update(prompt, ctx).await,
            Choice::Delete => delete(prompt, ctx).await,
        };
        menu::settle(prompt, outcome)?;
    }
}

async fn create<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let name = prompt.ask("Name")?;
    let manager = prompt.ask("Manager")?;
    let description = prompt.ask_optional("Description (optional)")?;

    let department = Department::new(&name, &manager, description.as_deref())?;
    let created = DepartmentService::new(ctx).create(&department).await?;
    prompt.ok(format!(
        "Department '{}' created with ID {}",
        created.name(),
        created.id().unwrap_or_default()
    ))?;
    Ok(())
}

async fn find_by_id<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("Department ID", "id")?;
    match DepartmentService::new(ctx).get(id).await? {
        Some(department) => print_department(prompt, &department)?,
        None => prompt.say("Department not found.")?,
    }
    Ok(())
}

async fn find_by_name<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let name = prompt.ask("Name")?;
    match DepartmentService::new(ctx).find_by_name(&name).await? {
        Some(department) => print_department(prompt, &department)?,
        None => prompt.say("Department not found.")?,
    }
    Ok(())
}

async fn list<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let departments = DepartmentService::new(ctx).list().await?;
    print_departments(prompt, &departments)?;
    Ok(())
}

async fn members<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("Department ID", "id")?;
    let employees = DepartmentService::new(ctx).members(id).await?;
    print_employees(prompt, &employees)?;
    Ok(())
}

async fn update<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let service = DepartmentService::new(ctx);
    let id: Id = prompt.ask_parsed("Department ID", "id")?;
    let mut department = service
        .get(id)
        .await?
        .or_not_found("Department", "id", id)?;

    prompt.say("Leave a field empty to keep its value.")?;
    let name = prompt.ask_or_keep("Name", department.name())?;
    department.set_name(&name)?;
    let manager = prompt.ask_or_keep("Manager", department.manager())?;
    department.set_manager(&manager)?;
    let description = prompt.ask_or_keep("Description", department.description().unwrap_or(""))?;
    department.set_description(Some(description.as_str()));

    service.update(&department).await?;
    prompt.ok("Department updated")?;
    Ok(())
}

async fn delete<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("Department ID", "id")?;
    if !prompt.confirm("Delete this department?")? {
        prompt.say("Cancelled.")?;
        return Ok(());
    }
    DepartmentService::new(ctx).delete(id).await?;
    prompt.ok("Department deleted")?;
    Ok(())
}

/// Let the user pick a department; an empty answer means none
///
/// The department list is only shown to sessions that may see it.
pub(crate) async fn pick<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    ctx: &ServiceContext,
) -> WfResult<Option<Id>> {
    if ctx.can(Action::ListDepartments) {
        let departments = DepartmentService::new(ctx).list().await?;
        for department in &departments {
            prompt.say(format!(
                "  {} - {}",
                department.id().unwrap_or_default(),
                department.name()
            ))?;
        }
    }

    match prompt.ask_optional("Department ID (empty for none)")? {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| WfError::invalid("department_id", format!("is not valid: '{raw}'"))),
        None => Ok(None),
    }
}

fn print_department<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, department: &Department) -> std::io::Result<()> {
    prompt.say(format!("ID:          {}", department.id().unwrap_or_default()))?;
    prompt.say(format!("Name:        {}", department.name()))?;
    prompt.say(format!("Manager:     {}", department.manager()))?;
    prompt.say(format!("Description: {}", department.description().unwrap_or("-")))
}

fn print_departments<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, departments: &[Department]) -> std::io::Result<()> {
    if departments.is_empty() {
        return prompt.say("No departments registered.");
    }
    prompt.say(format!("{:<6} {:<25} {:<25} {}", "ID", "NAME", "MANAGER", "DESCRIPTION"))?;
    for d in departments {
        prompt.say(format!(
            "{:<6} {:<25} {:<25} {}",
            d.id().unwrap_or_default(),
            d.name(),
            d.manager(),
            d.description().unwrap_or("")
        ))?;
    }
    Ok(())
}
