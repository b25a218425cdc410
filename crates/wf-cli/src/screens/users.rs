//! Account administration and password change screens

use std::io::{self, BufRead, Write};

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_models::{Role, User};
use wf_services::{ServiceContext, UserService};

use crate::console::Prompt;
use crate::menu::{self, Entry};

#[derive(Debug, Clone, Copy)]
enum Choice {
    Create,
    List,
    Deactivate,
    Unlock,
}

const MENU: [Entry<Choice>; 4] = [
    Entry::new("Create user", Action::ManageUsers, Choice::Create),
    Entry::new("List users", Action::ManageUsers, Choice::List),
    Entry::new("Deactivate user", Action::ManageUsers, Choice::Deactivate),
    Entry::new("Reactivate and unlock user", Action::ManageUsers, Choice::Unlock),
];

pub async fn run<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    loop {
        let Some(choice) = menu::choose(prompt, ctx, "USERS", "Back", &MENU)? else {
            return Ok(());
        };

        let outcome = match choice {
            Choice::Create => create(prompt, ctx).await,
            Choice::List => list(prompt, ctx).await,
            Choice::Deactivate => deactivate(prompt, ctx).await,
            Choice::Unlock => unlock(prompt, ctx).await,
        };
        menu::settle(prompt, outcome)?;
    }
}

async fn create<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let username = prompt.ask("Username")?;
    let password = prompt.ask("Password")?;
    let role: Role = prompt.ask("Role (admin/supervisor/employee)")?.parse()?;
    let email = prompt.ask_optional("Email (optional)")?;

    let user = UserService::new(ctx)
        .create_user(&username, &password, role, email.as_deref())
        .await?;
    prompt.ok(format!("User '{}' created as {}", user.username(), user.role()))?;
    Ok(())
}

async fn list<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let users = UserService::new(ctx).list_users().await?;
    print_users(prompt, &users)?;
    Ok(())
}

async fn deactivate<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("User ID", "id")?;
    if id == ctx.access().user_id() {
        prompt.say("You cannot deactivate your own account.")?;
        return Ok(());
    }
    UserService::new(ctx).deactivate(id).await?;
    prompt.ok("User deactivated")?;
    Ok(())
}

async fn unlock<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    let id: Id = prompt.ask_parsed("User ID", "id")?;
    UserService::new(ctx).unlock(id).await?;
    prompt.ok("User reactivated")?;
    Ok(())
}

/// Change the logged-in user's own password
pub async fn change_password<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    ctx: &ServiceContext,
) -> WfResult<()> {
    prompt.heading("CHANGE PASSWORD")?;
    let current = prompt.ask("Current password")?;
    let new = prompt.ask("New password")?;
    let repeated = prompt.ask("Repeat new password")?;
    if new != repeated {
        prompt.say("[ERROR] Passwords do not match.")?;
        return Ok(());
    }

    UserService::new(ctx).change_password(&current, &new).await?;
    prompt.ok("Password changed")?;
    Ok(())
}

fn print_users<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, users: &[User]) -> io::Result<()> {
    prompt.say(format!(
        "{:<5} {:<20} {:<11} {:<8} {:>6}  {}",
        "ID", "USERNAME", "ROLE", "ACTIVE", "FAILED", "LAST LOGIN"
    ))?;
    for u in users {
        prompt.say(format!(
            "{:<5} {:<20} {:<11} {:<8} {:>6}  {}",
            u.id().unwrap_or_default(),
            u.username(),
            u.role().as_str(),
            if u.is_active() { "yes" } else { "no" },
            u.failed_attempts(),
            u.last_login()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string())
        ))?;
    }
    Ok(())
}
