//! Report screen: shows each report and exports it to CSV

use std::io::{self, BufRead, Write};

use wf_auth::Action;
use wf_core::result::WfResult;
use wf_services::{Report, ReportKind, ReportService, ReportTarget, ServiceContext};

use crate::console::Prompt;
use crate::menu::{self, Entry};

/// Longer cells are cut and end in `...`
const MAX_COLUMN_WIDTH: usize = 40;

const MENU: [Entry<ReportTarget>; 6] = [
    Entry::new("Employees", Action::ViewReports, ReportTarget::One(ReportKind::Employees)),
    Entry::new("Departments", Action::ViewReports, ReportTarget::One(ReportKind::Departments)),
    Entry::new("Projects", Action::ViewReports, ReportTarget::One(ReportKind::Projects)),
    Entry::new("Time records", Action::ViewReports, ReportTarget::One(ReportKind::TimeRecords)),
    Entry::new(
        "Employee project assignments",
        Action::ViewReports,
        ReportTarget::One(ReportKind::Assignments),
    ),
    Entry::new("All reports", Action::ViewReports, ReportTarget::All),
];

pub async fn run<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, ctx: &ServiceContext) -> WfResult<()> {
    loop {
        let Some(target) = menu::choose(prompt, ctx, "REPORTS", "Back", &MENU)? else {
            return Ok(());
        };
        let outcome = show_and_export(prompt, ctx, target).await;
        menu::settle(prompt, outcome)?;
    }
}

async fn show_and_export<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    ctx: &ServiceContext,
    target: ReportTarget,
) -> WfResult<()> {
    let service = ReportService::new(ctx);
    for kind in target.kinds() {
        let report = service.load(kind).await?;
        print_report(prompt, &report)?;
        let path = service.export(&report)?;
        prompt.ok(format!("Report exported to {}", path.display()))?;
    }
    Ok(())
}

fn print_report<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, report: &Report) -> io::Result<()> {
    let title = format!("{} REPORT", report.kind().as_str().replace('_', " ").to_uppercase());
    prompt.heading(&title)?;

    if report.is_empty() {
        prompt.say("No rows to show.")?;
    } else {
        let widths = column_widths(report);
        prompt.say(line(report.headers().iter().copied(), &widths))?;
        prompt.say("-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1)))?;
        for row in report.rows() {
            prompt.say(line(row.iter().map(String::as_str), &widths))?;
        }
    }

    if let Some(total) = report.total_hours() {
        prompt.blank()?;
        prompt.say(format!("Total hours: {total}"))?;
    }
    Ok(())
}

fn column_widths(report: &Report) -> Vec<usize> {
    report
        .headers()
        .iter()
        .enumerate()
        .map(|(i, header)| {
            report
                .rows()
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn line<'c>(cells: impl Iterator<Item = &'c str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", fit(cell, width)))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

fn fit(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let kept: String = cell.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_cuts_long_cells() {
        assert_eq!(fit("Launch", 10), "Launch");
        assert_eq!(fit("Quarterly planning review", 10), "Quarter...");
        assert_eq!(fit("Ñandú", 5), "Ñandú");
    }

    #[test]
    fn test_line_pads_columns() {
        let widths = [4, 6];
        assert_eq!(line(["ID", "Name"].into_iter(), &widths), "ID   Name");
        assert_eq!(line(["1", "Launch"].into_iter(), &widths), "1    Launch");
    }
}
