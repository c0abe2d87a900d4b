//! Built-in task tracker schema used by `verbline demo`.

use std::str::FromStr;

use serde::Serialize;
use verbline_core::{
    ArgKind, MultiValueArg, OptionArg, Parser, ParserSettings, SchemaError, SwitchArg, ValueArg,
    Verb, forbidden_if, from_str, required_if, text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Done,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "done" => Ok(Self::Done),
            _ => Err("expected 'open' or 'done'".to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct AddTask {
    pub title: String,
    pub priority: u8,
    pub remind: Option<String>,
    pub notify: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ListTasks {
    pub limit: Option<usize>,
    pub all: bool,
    pub status: Option<Status>,
}

#[derive(Debug, Default, Serialize)]
pub struct CompleteTasks {
    pub ids: Vec<u32>,
    pub force: bool,
}

/// A parsed demo command, tagged by verb in JSON output.
#[derive(Debug, Serialize)]
#[serde(tag = "verb", rename_all = "lowercase")]
pub enum TaskCommand {
    Add(AddTask),
    List(ListTasks),
    Done(CompleteTasks),
}

fn add_verb() -> Result<Verb<AddTask>, SchemaError> {
    Verb::builder("add")
        .alias("new")
        .describe("Create a task")
        .value(
            ValueArg::new("title", text(), |t: &mut AddTask, v| t.title = v)
                .describe("Task title")
                .required(),
        )
        .option(
            OptionArg::new(Some("-p"), Some("--priority"), "priority", from_str(), |t: &mut AddTask, v| {
                t.priority = v
            })
            .describe("Priority from 0 (lowest) to 255")
            .default_value(3),
        )
        .option(
            OptionArg::new(Some("-r"), Some("--remind"), "remind", text(), |t: &mut AddTask, v| {
                t.remind = Some(v)
            })
            .describe("When to send a reminder")
            .depends(required_if(ArgKind::Option, "--remind", |t: &AddTask| t.notify)),
        )
        .switch(
            SwitchArg::flag(None, Some("--notify"), "notify", |t: &mut AddTask, v| t.notify = v)
                .describe("Send a notification at the reminder time"),
        )
        .build()
}

fn list_verb() -> Result<Verb<ListTasks>, SchemaError> {
    Verb::builder("list")
        .alias("ls")
        .describe("Show tasks")
        .option(
            OptionArg::new(Some("-l"), Some("--limit"), "limit", from_str(), |t: &mut ListTasks, v| {
                t.limit = Some(v)
            })
            .describe("Maximum number of tasks"),
        )
        .option(
            OptionArg::new(Some("-s"), Some("--status"), "status", from_str(), |t: &mut ListTasks, v| {
                t.status = Some(v)
            })
            .describe("Only tasks with this status (open or done)"),
        )
        .switch(
            SwitchArg::flag(Some("-a"), Some("--all"), "all", |t: &mut ListTasks, v| t.all = v)
                .describe("Include every status")
                .depends(forbidden_if(ArgKind::Switch, "--all", |t: &ListTasks| {
                    t.status.is_some()
                })),
        )
        .build()
}

fn done_verb() -> Result<Verb<CompleteTasks>, SchemaError> {
    Verb::builder("done")
        .describe("Mark tasks as done")
        .multi_value(
            MultiValueArg::new("ids", from_str(), |t: &mut CompleteTasks, v| t.ids = v)
                .describe("Task ids")
                .required(),
        )
        .switch(
            SwitchArg::flag(Some("-f"), Some("--force"), "force", |t: &mut CompleteTasks, v| {
                t.force = v
            })
            .describe("Complete tasks that have open subtasks"),
        )
        .build()
}

/// Builds the task tracker parser under `settings`.
pub fn task_parser(settings: ParserSettings) -> Result<Parser<TaskCommand>, SchemaError> {
    Parser::builder()
        .settings(settings)
        .verb(add_verb()?, TaskCommand::Add)
        .verb(list_verb()?, TaskCommand::List)
        .verb(done_verb()?, TaskCommand::Done)
        .build()
}

#[cfg(test)]
mod tests {
    use verbline_core::ErrorCode;

    use super::*;

    fn parser() -> Parser<TaskCommand> {
        task_parser(ParserSettings::default()).unwrap()
    }

    #[test]
    fn test_add_with_reminder() {
        let parser = parser();
        match parser.parse_line("add 'water plants' --notify -r tomorrow").unwrap() {
            TaskCommand::Add(add) => {
                assert_eq!(add.title, "water plants");
                assert_eq!(add.priority, 3);
                assert_eq!(add.remind.as_deref(), Some("tomorrow"));
                assert!(add.notify);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_notify_requires_remind() {
        let parser = parser();
        let failure = parser.parse_line("add call --notify").unwrap_err();
        assert_eq!(failure.errors()[0].code, ErrorCode::MissingRequiredOption);
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        let parser = parser();
        match parser.parse_line("ls --status DONE").unwrap() {
            TaskCommand::List(list) => assert_eq!(list.status, Some(Status::Done)),
            other => panic!("unexpected command: {other:?}"),
        }
        let failure = parser.parse_line("ls --status later").unwrap_err();
        assert_eq!(failure.errors()[0].code, ErrorCode::OptionConversionFailure);
    }

    #[test]
    fn test_all_conflicts_with_status() {
        let parser = parser();
        let failure = parser.parse_line("list --all -s open").unwrap_err();
        assert_eq!(failure.errors()[0].code, ErrorCode::SwitchMustNotBeProvided);
    }

    #[test]
    fn test_done_collects_ids() {
        let parser = parser();
        match parser.parse_line("done 4 8 15 --force").unwrap() {
            TaskCommand::Done(done) => {
                assert_eq!(done.ids, [4, 8, 15]);
                assert!(done.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_command_json_is_tagged_by_verb() {
        let parser = parser();
        let command = parser.parse_line("done 1").unwrap();
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["verb"], "done");
        assert_eq!(json["ids"], serde_json::json!([1]));
    }
}
