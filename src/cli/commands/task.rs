//! Task list command implementations.
//!
//! Every mutation loads the list, applies one change, saves it, and
//! prints the updated list.

use serde::Serialize;
use std::io::{self, BufRead, Read};
use tracing::{debug, info};

use super::{block_on, read_line};
use crate::agent::{extract_json_array, BoxedAgent};
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::tasklist::{render_tasks, require_content, Task, TaskList};

#[derive(Serialize)]
struct ListOutput<'a> {
    tasks: &'a [Task],
    count: usize,
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    tasks: &'a [Task],
    count: usize,
    summary: &'a str,
}

fn print_list(ctx: &AppContext, list: &TaskList) -> Result<()> {
    if ctx.json {
        let output = ListOutput {
            tasks: list.tasks(),
            count: list.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    if list.is_empty() {
        println!("No tasks found.");
    } else {
        print!("{}", render_tasks(list.tasks()));
    }
    Ok(())
}

fn mutate(ctx: &AppContext, op: impl FnOnce(&mut TaskList) -> Result<()>) -> Result<()> {
    let mut list = TaskList::load(&ctx.task_file)?;
    op(&mut list)?;
    list.save()?;
    print_list(ctx, &list)
}

// ── add ───────────────────────────────────────────────────────

/// Add tasks from free-form text.
///
/// With an agent configured (and `plain` unset) the text is turned into a
/// task list by the model and confirmed before saving. Otherwise the text
/// becomes a single task.
///
/// # Errors
///
/// Returns `InvalidArgument` for blank input, `Error::Llm` if the agent fails
/// or answers with something other than a task array, or a storage error.
pub fn execute_add(ctx: &AppContext, text: &[String], plain: bool, yes: bool) -> Result<()> {
    let note = if text.is_empty() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        text.join(" ")
    };
    let note = require_content(&note)?;

    let tasks = match ctx.agent.as_ref().filter(|_| !plain) {
        Some(agent) => {
            let proposal = block_on(async {
                let mut input = io::stdin().lock();
                propose_tasks(agent, &note, yes, &mut input).await
            })?;
            let Some(tasks) = proposal else {
                if !ctx.quiet {
                    eprintln!("Cancelled, no tasks added.");
                }
                return Ok(());
            };
            tasks
        }
        None => vec![Task::new(note)],
    };

    let count = tasks.len();
    mutate(ctx, |list| {
        for task in tasks {
            list.add(task);
        }
        Ok(())
    })?;
    info!(count, "Added tasks");
    Ok(())
}

fn generate_prompt(note: &str) -> String {
    format!(
        "Please turn the following note into a JSON array of tasks.\n\
         Each task must have \"content\" (string) and \"done\" (boolean) fields.\n\
         No extra keys. No explanation.\n\n\
         Note: \"{note}\""
    )
}

fn refine_prompt(note: &str, feedback: &str) -> String {
    format!(
        "User declined the generated tasks.\n\n\
         Original note: \"{note}\"\n\n\
         User feedback: \"{feedback}\"\n\n\
         With the user feedback, please revise the task list to better reflect the note. \
         Return a JSON array of tasks with \"content\" and \"done\" only, no extra keys, no explanation."
    )
}

/// Decode the agent's answer into tasks, dropping entries with blank content.
fn parse_tasks(answer: &str) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(extract_json_array(answer))
        .map_err(|e| Error::Llm(format!("agent did not return a task list: {e}")))?;
    Ok(tasks
        .into_iter()
        .filter(|t| !t.content.trim().is_empty())
        .map(|t| Task {
            content: t.content.trim().to_string(),
            ..t
        })
        .collect())
}

/// Ask the agent for tasks until the user accepts a proposal.
///
/// Any answer other than yes is sent back as feedback for a revision.
/// Returns `None` when input ends before the user accepts.
async fn propose_tasks(
    agent: &BoxedAgent,
    note: &str,
    auto_accept: bool,
    input: &mut impl BufRead,
) -> Result<Option<Vec<Task>>> {
    let mut prompt = generate_prompt(note);
    loop {
        let answer = agent.prompt(&prompt).await?.text();
        debug!(answer = %answer, "Agent proposal");
        let tasks = parse_tasks(&answer)?;

        eprintln!("Generated tasks:");
        eprintln!("{}", serde_json::to_string_pretty(&tasks)?);
        if auto_accept {
            return Ok(Some(tasks));
        }

        eprint!("Confirm adding these tasks? (yes/no). If no, say how to make them better: ");
        let Some(reply) = read_line(input)? else {
            return Ok(None);
        };
        let reply = reply.trim();
        if matches!(reply.to_lowercase().as_str(), "y" | "yes") {
            return Ok(Some(tasks));
        }

        prompt = refine_prompt(note, reply);
    }
}

// ── list ──────────────────────────────────────────────────────

/// Print the task list, optionally followed by an agent-written summary.
///
/// # Errors
///
/// Returns `Error::Config` when a summary is requested without an agent,
/// or a storage/agent error.
pub fn execute_list(ctx: &AppContext, summary: bool) -> Result<()> {
    let agent = if summary { Some(ctx.require_agent()?) } else { None };
    let list = TaskList::load(&ctx.task_file)?;

    let Some(agent) = agent.filter(|_| !list.is_empty()) else {
        return print_list(ctx, &list);
    };

    let prompt = format!(
        "Here is the list of tasks in JSON:\n{}\nSummarize the above list in one concise sentence.",
        serde_json::to_string(list.tasks())?
    );
    let text = block_on(async { Ok(agent.prompt(&prompt).await?.text()) })?;

    if ctx.json {
        let output = SummaryOutput {
            tasks: list.tasks(),
            count: list.len(),
            summary: &text,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    print_list(ctx, &list)?;
    println!("\nSummary: {text}");
    Ok(())
}

// ── single-task mutations ─────────────────────────────────────

/// # Errors
///
/// Returns an index error or a storage error.
pub fn execute_remove(ctx: &AppContext, index: usize) -> Result<()> {
    mutate(ctx, |list| {
        let removed = list.remove(index)?;
        info!(index, content = %removed.content, "Removed task");
        Ok(())
    })
}

/// # Errors
///
/// Returns an index error or a storage error.
pub fn execute_set_done(ctx: &AppContext, index: usize, done: bool) -> Result<()> {
    mutate(ctx, |list| {
        list.set_done(index, done)?;
        info!(index, done, "Updated task status");
        Ok(())
    })
}

/// # Errors
///
/// Returns `InvalidArgument` for blank content, an index error, or a storage error.
pub fn execute_edit(ctx: &AppContext, index: usize, content: &str) -> Result<()> {
    mutate(ctx, |list| list.edit(index, content))
}

/// # Errors
///
/// Returns `InvalidArgument` for a blank comment, an index error, or a storage error.
pub fn execute_comment(ctx: &AppContext, index: usize, comment: &str) -> Result<()> {
    mutate(ctx, |list| list.add_comment(index, comment))
}
