//! Role-filtered numbered menus

use std::io::{self, BufRead, Write};

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_services::ServiceContext;

use crate::console::{is_end_of_input, Prompt};

/// One menu line; hidden unless the session may perform `action`
pub struct Entry<T> {
    pub label: &'static str,
    pub action: Action,
    pub value: T,
}

impl<T> Entry<T> {
    pub const fn new(label: &'static str, action: Action, value: T) -> Self {
        Self { label, action, value }
    }
}

/// Entries the session may use, in order
pub fn visible<'e, T>(ctx: &ServiceContext, entries: &'e [Entry<T>]) -> Vec<&'e Entry<T>> {
    entries.iter().filter(|e| ctx.can(e.action)).collect()
}

/// Show the menu until a valid choice is made
///
/// Returns `None` when the user picks `0`.
pub fn choose<R: BufRead, W: Write, T: Copy>(
    prompt: &mut Prompt<R, W>,
    ctx: &ServiceContext,
    title: &str,
    back_label: &str,
    entries: &[Entry<T>],
) -> io::Result<Option<T>> {
    let shown = visible(ctx, entries);
    loop {
        prompt.heading(title)?;
        for (number, entry) in shown.iter().enumerate() {
            prompt.say(format!("{}. {}", number + 1, entry.label))?;
        }
        prompt.say(format!("0. {back_label}"))?;

        let answer = prompt.ask("Select an option")?;
        match answer.parse::<usize>() {
            Ok(0) => return Ok(None),
            Ok(n) if n <= shown.len() => return Ok(Some(shown[n - 1].value)),
            _ => prompt.say("[ERROR] Invalid option, try again.")?,
        }
    }
}

/// Print a failed operation and carry on; only a closed input stops the loop
pub fn settle<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, outcome: WfResult<()>) -> WfResult<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(err) if is_end_of_input(&err) => Err(err),
        Err(err) => {
            tracing::debug!(code = err.error_code(), "Operation failed");
            prompt.error(&err)?;
            Ok(())
        }
    }
}
