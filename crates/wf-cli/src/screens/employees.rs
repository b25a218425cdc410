//! Employee screens

use std::io::{self, BufRead, Write};

use wf_auth::Action;
use wf_core::result::{OrNotFound, WfResult};
use wf_models::Employee;
use wf_services::{EmployeeService, ServiceContext};

use crate::console::Prompt;
use crate::menu::{self, Entry};
use crate::screens::departments;

#[derive(Debug, Clone, Copy)]
enum Choice {
    Create,
    Search,
    List,
    Update,
    Reassign,
    Delete,
}

const MENU: [Entry<Choice>; 6] = [
    Entry::new("Create employee", Action::CreateEmployee, Choice::Create),
    Entry::new("Find employee by ID", Action::SearchEmployee, Choice::Search),
    Entry::new("List employees", Action::ListEmployees, Choice::List),
    Entry::new("Update employee", Action::UpdateEmployee, Choice::Update),
    Entry::new("Move employee to another department", Action::UpdateEmployee, Choice::Reassign),
    Entry::new("Delete employee", Action::DeleteEmployee, Choice::Delete),
];

pub async fn run<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    loop {
        let Some(choice) = menu::choose(prompt, ctx, "EMPLOYEES", "Back", &MENU)? else {
            return Ok(());
        };

        let outcome = match choice {
            Choice::Create => create(prompt, ctx).await,
            Choice::Search => search(prompt, ctx).await,
            Choice::List => list(prompt, ctx).await,
            Choice::Update => update(prompt, ctx).await,
            Choice::Reassign => reassign(prompt, ctx).await,
            Choice::Delete => delete(prompt, ctx).await,
        };
        menu::settle(prompt, outcome)?;
    }
}

async fn create<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id = prompt.ask("Employee ID (RUT)")?;
    let first_name = prompt.ask("First name")?;
    let last_name = prompt.ask("Last name")?;
    let job_title = prompt.ask("Job title")?;
    let salary = prompt.ask("Salary")?;
    let department_id = departments::pick(prompt, ctx).await?;

    let employee = Employee::new(
        &id,
        &first_name,
        &last_name,
        &job_title,
        salary.as_str(),
        department_id,
    )?;
    let created = EmployeeService::new(ctx).create(&employee).await?;
    prompt.ok(format!("Employee {} ({}) created", created.full_name(), created.id()))?;
    Ok(())
}

async fn search<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id = prompt.ask("Employee ID")?;
    match EmployeeService::new(ctx).get(&id).await? {
        Some(employee) => print_employee(prompt, &employee)?,
        None => prompt.say("Employee not found.")?,
    }
    Ok(())
}

async fn list<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let employees = EmployeeService::new(ctx).list().await?;
    print_employees(prompt, &employees)?;
    Ok(())
}

async fn update<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let service = EmployeeService::new(ctx);
    let id = prompt.ask("Employee ID")?;
    let mut employee = service
        .get(&id)
        .await?
        .or_not_found("Employee", "id", &id)?;

    prompt.say("Leave a field empty to keep its value.")?;
    let first_name = prompt.ask_or_keep("First name", employee.first_name())?;
    employee.set_first_name(&first_name)?;
    let last_name = prompt.ask_or_keep("Last name", employee.last_name())?;
    employee.set_last_name(&last_name)?;
    let job_title = prompt.ask_or_keep("Job title", employee.job_title())?;
    employee.set_job_title(&job_title)?;
    let salary = prompt.ask_or_keep("Salary", &employee.salary().to_string())?;
    employee.set_salary(salary.as_str())?;

    service.update(&employee).await?;
    prompt.ok("Employee updated")?;
    Ok(())
}

async fn reassign<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id = prompt.ask("Employee ID")?;
    let department_id = departments::pick(prompt, ctx).await?;
    EmployeeService::new(ctx).set_department(&id, department_id).await?;
    match department_id {
        Some(department_id) => prompt.ok(format!("Employee moved to department {department_id}"))?,
        None => prompt.ok("Employee removed from its department")?,
    }
    Ok(())
}

async fn delete<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id = prompt.ask("Employee ID")?;
    if !prompt.confirm("Delete this employee?")? {
        prompt.say("Cancelled.")?;
        return Ok(());
    }
    EmployeeService::new(ctx).delete(&id).await?;
    prompt.ok("Employee deleted")?;
    Ok(())
}

fn print_employee<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, employee: &Employee) -> io::Result<()> {
    prompt.say(format!("ID:         {}", employee.id()))?;
    prompt.say(format!("Name:       {}", employee.full_name()))?;
    prompt.say(format!("Job title:  {}", employee.job_title()))?;
    prompt.say(format!("Salary:     {:.0}", employee.salary()))?;
    match employee.department_id() {
        Some(id) => prompt.say(format!("Department: {id}")),
        None => prompt.say("Department: -"),
    }
}

pub(crate) fn print_employees<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, employees: &[Employee]) -> io::Result<()> {
    if employees.is_empty() {
        return prompt.say("No employees registered.");
    }
    prompt.say(format!(
        "{:<13} {:<30} {:<20} {:>12} {}",
        "ID", "NAME", "JOB TITLE", "SALARY", "DEPT"
    ))?;
    for e in employees {
        prompt.say(format!(
            "{:<13} {:<30} {:<20} {:>12.0} {}",
            e.id(),
            e.full_name(),
            e.job_title(),
            e.salary(),
            e.department_id().map(|id| id.to_string()).unwrap_or_default()
        ))?;
    }
    Ok(())
}
