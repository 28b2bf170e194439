use anyhow::Result;

use crate::commands::open_workspace;

pub fn execute(limit: usize) -> Result<()> {
    let workspace = open_workspace()?;
    let items = workspace.history.recent(None, Some(limit));
    if items.is_empty() {
        println!("No history.");
        return Ok(());
    }
    for item in items {
        let context = item.project_name.as_deref().unwrap_or("-");
        let took = match item.completion_time_secs {
            Some(secs) => format!(", took {secs}s"),
            None => String::new(),
        };
        println!(
            "{}  {:?} '{}' in {}{}",
            item.completed_date.date(),
            item.kind,
            item.name,
            context,
            took
        );
    }
    Ok(())
}
