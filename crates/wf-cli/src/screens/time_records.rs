//! Time tracking screens

use std::io::{self, BufRead, Write};

use wf_auth::Action;
use wf_core::result::{OrNotFound, WfResult};
use wf_core::traits::Id;
use wf_models::validate::DATE_FORMAT;
use wf_models::TimeRecord;
use wf_services::{ServiceContext, TimeRecordService};

use crate::console::Prompt;
use crate::menu::{self, Entry};

#[derive(Debug, Clone, Copy)]
enum Choice {
    Log,
    List,
    ByEmployee,
    ByProject,
    Total,
    Update,
    Delete,
}

const MENU: [Entry<Choice>; 7] = [
    Entry::new("Log worked time", Action::LogTime, Choice::Log),
    Entry::new("List time records", Action::ViewTimeRecords, Choice::List),
    Entry::new("Time records of an employee", Action::ViewTimeRecords, Choice::ByEmployee),
    Entry::new("Time records of a project", Action::ViewTimeRecords, Choice::ByProject),
    Entry::new("Total hours", Action::ViewTimeRecords, Choice::Total),
    Entry::new("Update time record", Action::UpdateTimeRecord, Choice::Update),
    Entry::new("Delete time record", Action::DeleteTimeRecord, Choice::Delete),
];

pub async fn run<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    loop {
        let Some(choice) = menu::choose(prompt, ctx, "TIME RECORDS", "Back", &MENU)? else {
            return Ok(());
        };

        let outcome = match choice {
            Choice::Log => log(prompt, ctx).await,
            Choice::List => list(prompt, ctx).await,
            Choice::ByEmployee => by_employee(prompt, ctx).await,
            Choice::ByProject => by_project(prompt, ctx).await,
            Choice::Total => total(prompt, ctx).await,
            Choice::Update => update(prompt, ctx).await,
            Choice::Delete => delete(prompt, ctx).await,
        };
        menu::settle(prompt, outcome)?;
    }
}

async fn log<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let employee_id = prompt.ask("Employee ID")?;
    let date = prompt.ask("Date (YYYY-MM-DD)")?;
    let hours = prompt.ask("Hours worked")?;
    let project = prompt.ask("Project")?;
    let description = prompt.ask_optional("Description (optional)")?;

    let record = TimeRecord::new(
        &employee_id,
        date.as_str(),
        hours.as_str(),
        &project,
        description.as_deref(),
    )?;
    let created = TimeRecordService::new(ctx).log(&record).await?;
    prompt.ok(format!(
        "{} hours logged with record ID {}",
        created.hours(),
        created.id().unwrap_or_default()
    ))?;
    Ok(())
}

async fn list<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let records = TimeRecordService::new(ctx).list().await?;
    print_records(prompt, &records)?;
    Ok(())
}

async fn by_employee<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let employee_id = prompt.ask("Employee ID")?;
    let records = TimeRecordService::new(ctx).by_employee(&employee_id).await?;
    print_records(prompt, &records)?;
    Ok(())
}

async fn by_project<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let project = prompt.ask("Project")?;
    let records = TimeRecordService::new(ctx).by_project_label(&project).await?;
    print_records(prompt, &records)?;
    Ok(())
}

async fn total<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let total = TimeRecordService::new(ctx).total_hours().await?;
    prompt.say(format!("Total hours: {total}"))?;
    Ok(())
}

async fn update<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let service = TimeRecordService::new(ctx);
    let id: Id = prompt.ask_parsed("Record ID", "id")?;
    let mut record = service
        .get(id)
        .await?
        .or_not_found("TimeRecord", "id", id)?;

    prompt.say("Leave a field empty to keep its value.")?;
    let date = prompt.ask_or_keep("Date", &record.work_date().format(DATE_FORMAT).to_string())?;
    record.set_work_date(date.as_str())?;
    let hours = prompt.ask_or_keep("Hours worked", &record.hours().to_string())?;
    record.set_hours(hours.as_str())?;
    let project = prompt.ask_or_keep("Project", record.project())?;
    record.set_project(&project)?;
    let description = prompt.ask_or_keep("Description", record.description().unwrap_or(""))?;
    record.set_description(Some(description.as_str()));

    service.update(&record).await?;
    prompt.ok("Time record updated")?;
    Ok(())
}

async fn delete<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("Record ID", "id")?;
    if !prompt.confirm("Delete this time record?")? {
        prompt.say("Cancelled.")?;
        return Ok(());
    }
    TimeRecordService::new(ctx).delete(id).await?;
    prompt.ok("Time record deleted")?;
    Ok(())
}

fn print_records<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, records: &[TimeRecord]) -> io::Result<()> {
    if records.is_empty() {
        return prompt.say("No time records found.");
    }
    prompt.say(format!(
        "{:<6} {:<13} {:<12} {:>6}  {:<20} {}",
        "ID", "EMPLOYEE", "DATE", "HOURS", "PROJECT", "DESCRIPTION"
    ))?;
    let mut total = 0.0;
    for r in records {
        total += r.hours();
        prompt.say(format!(
            "{:<6} {:<13} {:<12} {:>6.2}  {:<20} {}",
            r.id().unwrap_or_default(),
            r.employee_id(),
            r.work_date().format(DATE_FORMAT).to_string(),
            r.hours(),
            r.project(),
            r.description().unwrap_or("")
        ))?;
    }
    prompt.say(format!("Total: {total:.2} hours"))
}
