//! `planner` command-line entry point.
//!
//! # Responsibility
//! - Parse process configuration (database, logging, output format).
//! - Open the planner database and dispatch one command to the core
//!   services.
//! - Render results as coloured text or, with `--json`, as JSON on stdout.
//!
//! # Invariants
//! - Every command opens the database exactly once and runs migrations
//!   before touching data.
//! - Domain faults surface as `anyhow` errors with a non-zero exit code.

mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::error;
use planner_core::db::open_db;
use planner_core::{
    default_log_level, init_logging, CyclePosition, LessonId, LessonItemService, LessonService,
    LessonUpdate, LogLevel, NewLesson, NewNote, NewResource, NewTodo, NoteId, ResourceId,
    SettingsService, SettingsUpdate, SqliteLessonItemRepository, SqliteLessonRepository,
    SqliteSettingsRepository, SqliteSubjectRepository, Subject, SubjectId, SubjectListQuery,
    SubjectService, SubjectUpdate, TodoId,
};
use rusqlite::Connection;
use serde::Serialize;

/// Teacher planner: subjects, lessons and the Week A/B teaching cycle.
#[derive(Parser, Debug)]
#[command(name = "planner", version, about)]
struct Cli {
    /// Path to the planner SQLite database
    #[arg(long, global = true, default_value = "planner.sqlite3")]
    db: PathBuf,

    /// Directory for rotating log files (relative paths resolve against the
    /// current directory)
    #[arg(long, global = true, default_value = ".planner/logs")]
    log_dir: PathBuf,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or change planner settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Manage subjects
    #[command(subcommand)]
    Subject(SubjectCommand),
    /// Manage lessons
    #[command(subcommand)]
    Lesson(LessonCommand),
    /// Manage notes attached to a lesson
    #[command(subcommand)]
    Note(NoteCommand),
    /// Manage resources attached to a lesson
    #[command(subcommand)]
    Resource(ResourceCommand),
    /// Manage todos attached to a lesson
    #[command(subcommand)]
    Todo(TodoCommand),
    /// Show the Monday-Friday week containing a date
    Week {
        /// Any date in the week (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the cycle day and week label of a date
    CycleDay {
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print current settings
    Show,
    /// Change one or more settings
    Set(SettingsArgs),
    /// Set the number of periods per day (1-12)
    Periods { periods: u32 },
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    semester: Option<u8>,
    #[arg(long)]
    cycle_length: Option<u32>,
    /// First day (day 1) of the teaching cycle
    #[arg(long, conflicts_with = "clear_cycle_start")]
    cycle_start: Option<NaiveDate>,
    /// Remove the cycle start date
    #[arg(long)]
    clear_cycle_start: bool,
}

#[derive(Subcommand, Debug)]
enum SubjectCommand {
    /// Add a subject (term defaults to the current settings)
    Add(SubjectAddArgs),
    /// List subjects
    List(SubjectListArgs),
    Show { id: SubjectId },
    /// Update a subject; pass an empty string to clear a text field
    Update(SubjectUpdateArgs),
    /// Remove a subject and all its lessons
    Remove { id: SubjectId },
}

#[derive(Args, Debug)]
struct SubjectAddArgs {
    name: String,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    year_level: Option<u8>,
    #[arg(long)]
    academic_year: Option<i32>,
    #[arg(long)]
    semester: Option<u8>,
    #[arg(long)]
    room: Option<String>,
    /// Hex colour such as #3B82F6
    #[arg(long)]
    colour: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct SubjectListArgs {
    #[arg(long)]
    academic_year: Option<i32>,
    #[arg(long)]
    semester: Option<u8>,
    #[arg(long)]
    year_level: Option<u8>,
    /// Only active subjects
    #[arg(long, conflicts_with = "inactive")]
    active: bool,
    /// Only inactive subjects
    #[arg(long)]
    inactive: bool,
}

#[derive(Args, Debug)]
struct SubjectUpdateArgs {
    id: SubjectId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    year_level: Option<u8>,
    #[arg(long)]
    academic_year: Option<i32>,
    #[arg(long)]
    semester: Option<u8>,
    #[arg(long)]
    room: Option<String>,
    #[arg(long)]
    colour: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    active: Option<bool>,
}

#[derive(Subcommand, Debug)]
enum LessonCommand {
    /// Schedule a lesson in a free (date, period) slot
    Add(LessonAddArgs),
    /// List lessons between two dates (inclusive)
    List {
        #[arg(long)]
        from: NaiveDate,
        /// Last day to include; defaults to --from
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show a lesson with its notes, resources and todos
    Show { id: LessonId },
    /// Update a lesson; pass an empty title to clear it
    Update(LessonUpdateArgs),
    /// Remove a lesson and everything attached to it
    Remove { id: LessonId },
}

#[derive(Args, Debug)]
struct LessonAddArgs {
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    period: u32,
    #[arg(long)]
    subject: SubjectId,
    /// Override the computed cycle day
    #[arg(long)]
    cycle_day: Option<u32>,
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct LessonUpdateArgs {
    id: LessonId,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    period: Option<u32>,
    #[arg(long)]
    subject: Option<SubjectId>,
    #[arg(long, conflicts_with = "clear_cycle_day")]
    cycle_day: Option<u32>,
    #[arg(long)]
    clear_cycle_day: bool,
    #[arg(long)]
    title: Option<String>,
}

#[derive(Subcommand, Debug)]
enum NoteCommand {
    Add {
        lesson: LessonId,
        content: String,
        #[arg(long)]
        title: Option<String>,
    },
    List {
        lesson: LessonId,
    },
    Remove {
        lesson: LessonId,
        note: NoteId,
    },
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    Add {
        lesson: LessonId,
        title: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long = "type")]
        resource_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    List {
        lesson: LessonId,
    },
    Remove {
        lesson: LessonId,
        resource: ResourceId,
    },
}

#[derive(Subcommand, Debug)]
enum TodoCommand {
    Add {
        lesson: LessonId,
        content: String,
        /// 1 (high) to 3 (low)
        #[arg(long)]
        priority: Option<u8>,
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Create the todo already completed
        #[arg(long)]
        done: bool,
    },
    List {
        lesson: LessonId,
    },
    /// Flip a todo between open and completed
    Toggle {
        lesson: LessonId,
        todo: TodoId,
    },
    Remove {
        lesson: LessonId,
        todo: TodoId,
    },
}

#[derive(Serialize)]
struct CycleDayReport {
    date: NaiveDate,
    #[serde(flatten)]
    position: CyclePosition,
}

#[derive(Serialize)]
struct Removed {
    removed: String,
    id: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = absolute_dir(&cli.log_dir)?;
    let level = cli.log_level.unwrap_or_else(default_log_level);
    init_logging(level, &log_dir)
        .with_context(|| format!("Failed to initialize logging in '{}'", log_dir.display()))?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("Failed to open database '{}'", cli.db.display()))?;
    let output = Output { json: cli.json };

    let result = run(&conn, cli.command, &output);
    if let Err(err) = &result {
        error!(
            "event=cli_command module=cli status=error error_kind={}",
            error_kind(err)
        );
    }
    result
}

fn run(conn: &Connection, command: Command, output: &Output) -> Result<()> {
    match command {
        Command::Settings(command) => run_settings(conn, command, output),
        Command::Subject(command) => run_subject(conn, command, output),
        Command::Lesson(command) => run_lesson(conn, command, output),
        Command::Note(command) => run_note(conn, command, output),
        Command::Resource(command) => run_resource(conn, command, output),
        Command::Todo(command) => run_todo(conn, command, output),
        Command::Week { date } => {
            let requested = date.unwrap_or_else(|| Local::now().date_naive());
            let config = settings_service(conn)?.cycle_config()?;
            let week = lesson_service(conn)?.week_view(requested, &config)?;
            output.emit(&week, display::print_week)
        }
        Command::CycleDay { date } => {
            let config = settings_service(conn)?.cycle_config()?;
            let report = CycleDayReport {
                date,
                position: lesson_service(conn)?.cycle_day(date, &config),
            };
            output.emit(&report, |report| {
                display::print_cycle_position(report.date, &report.position);
            })
        }
    }
}

fn run_settings(conn: &Connection, command: SettingsCommand, output: &Output) -> Result<()> {
    let service = settings_service(conn)?;
    let settings = match command {
        SettingsCommand::Show => service.get_or_create()?,
        SettingsCommand::Set(args) => {
            let cycle_start_date = if args.clear_cycle_start {
                Some(None)
            } else {
                args.cycle_start.map(Some)
            };
            service.update(SettingsUpdate {
                periods_per_day: None,
                current_year: args.year,
                current_semester: args.semester,
                cycle_length: args.cycle_length,
                cycle_start_date,
            })?
        }
        SettingsCommand::Periods { periods } => service.set_periods_per_day(periods)?,
    };
    output.emit(&settings, display::print_settings)
}

fn run_subject(conn: &Connection, command: SubjectCommand, output: &Output) -> Result<()> {
    let service = subject_service(conn)?;
    match command {
        SubjectCommand::Add(args) => {
            let settings = settings_service(conn)?.get_or_create()?;
            let mut subject = Subject::new(
                args.name,
                args.academic_year.unwrap_or(settings.current_year),
                args.semester.unwrap_or(settings.current_semester),
            );
            subject.code = args.code;
            subject.year_level = args.year_level;
            subject.room = args.room;
            subject.colour = args.colour;
            subject.notes = args.notes;
            let created = service.create_subject(&subject)?;
            output.emit(&created, display::print_subject)
        }
        SubjectCommand::List(args) => {
            let is_active = match (args.active, args.inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let subjects = service.list_subjects(&SubjectListQuery {
                academic_year: args.academic_year,
                semester: args.semester,
                is_active,
                year_level: args.year_level,
            })?;
            output.emit(&subjects, |subjects| display::print_subjects(subjects))
        }
        SubjectCommand::Show { id } => {
            output.emit(&service.get_subject(id)?, display::print_subject)
        }
        SubjectCommand::Update(args) => {
            let updated = service.update_subject(
                args.id,
                SubjectUpdate {
                    name: args.name,
                    code: args.code.map(clearable),
                    year_level: args.year_level.map(Some),
                    academic_year: args.academic_year,
                    semester: args.semester,
                    room: args.room.map(clearable),
                    colour: args.colour.map(clearable),
                    notes: args.notes.map(clearable),
                    is_active: args.active,
                },
            )?;
            output.emit(&updated, display::print_subject)
        }
        SubjectCommand::Remove { id } => {
            service.delete_subject(id)?;
            output.removed("subject", id)
        }
    }
}

fn run_lesson(conn: &Connection, command: LessonCommand, output: &Output) -> Result<()> {
    let service = lesson_service(conn)?;
    match command {
        LessonCommand::Add(args) => {
            let config = settings_service(conn)?.cycle_config()?;
            let record = service.create_lesson(
                NewLesson {
                    date: args.date,
                    period: args.period,
                    subject_id: args.subject,
                    cycle_day: args.cycle_day,
                    title: args.title,
                },
                &config,
            )?;
            output.emit(&record, display::print_lesson)
        }
        LessonCommand::List { from, to } => {
            let lessons = service.list_lessons(from, to.unwrap_or(from))?;
            output.emit(&lessons, |lessons| display::print_lessons(lessons))
        }
        LessonCommand::Show { id } => {
            output.emit(&service.get_lesson(id)?, display::print_lesson)
        }
        LessonCommand::Update(args) => {
            let cycle_day = if args.clear_cycle_day {
                Some(None)
            } else {
                args.cycle_day.map(Some)
            };
            let record = service.update_lesson(
                args.id,
                LessonUpdate {
                    date: args.date,
                    period: args.period,
                    subject_id: args.subject,
                    cycle_day,
                    title: args.title.map(clearable),
                },
            )?;
            output.emit(&record, display::print_lesson)
        }
        LessonCommand::Remove { id } => {
            service.delete_lesson(id)?;
            output.removed("lesson", id)
        }
    }
}

fn run_note(conn: &Connection, command: NoteCommand, output: &Output) -> Result<()> {
    let service = item_service(conn)?;
    match command {
        NoteCommand::Add {
            lesson,
            content,
            title,
        } => {
            let note = service.add_note(lesson, NewNote { title, content })?;
            output.emit(&note, |note| display::print_notes(std::slice::from_ref(note)))
        }
        NoteCommand::List { lesson } => {
            output.emit(&service.list_notes(lesson)?, |notes| display::print_notes(notes))
        }
        NoteCommand::Remove { lesson, note } => {
            service.delete_note(lesson, note)?;
            output.removed("note", note)
        }
    }
}

fn run_resource(conn: &Connection, command: ResourceCommand, output: &Output) -> Result<()> {
    let service = item_service(conn)?;
    match command {
        ResourceCommand::Add {
            lesson,
            title,
            url,
            file,
            resource_type,
            description,
        } => {
            let resource = service.add_resource(
                lesson,
                NewResource {
                    title,
                    url,
                    file_path: file,
                    resource_type,
                    description,
                },
            )?;
            output.emit(&resource, |resource| {
                display::print_resources(std::slice::from_ref(resource));
            })
        }
        ResourceCommand::List { lesson } => output.emit(&service.list_resources(lesson)?, |list| {
            display::print_resources(list);
        }),
        ResourceCommand::Remove { lesson, resource } => {
            service.delete_resource(lesson, resource)?;
            output.removed("resource", resource)
        }
    }
}

fn run_todo(conn: &Connection, command: TodoCommand, output: &Output) -> Result<()> {
    let service = item_service(conn)?;
    match command {
        TodoCommand::Add {
            lesson,
            content,
            priority,
            due,
            done,
        } => {
            let todo = service.add_todo(
                lesson,
                NewTodo {
                    content,
                    is_completed: done,
                    priority,
                    due_date: due,
                },
            )?;
            output.emit(&todo, |todo| display::print_todos(std::slice::from_ref(todo)))
        }
        TodoCommand::List { lesson } => {
            output.emit(&service.list_todos(lesson)?, |todos| display::print_todos(todos))
        }
        TodoCommand::Toggle { lesson, todo } => {
            let todo = service.toggle_todo(lesson, todo)?;
            output.emit(&todo, |todo| display::print_todos(std::slice::from_ref(todo)))
        }
        TodoCommand::Remove { lesson, todo } => {
            service.delete_todo(lesson, todo)?;
            output.removed("todo", todo)
        }
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(&self, value: &T, render: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            let text = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
            println!("{text}");
        } else {
            render(value);
        }
        Ok(())
    }

    fn removed(&self, kind: &str, id: uuid::Uuid) -> Result<()> {
        let report = Removed {
            removed: kind.to_string(),
            id: id.to_string(),
        };
        self.emit(&report, |_| display::print_removed(kind, &id))
    }
}

fn settings_service(conn: &Connection) -> Result<SettingsService<SqliteSettingsRepository<'_>>> {
    let repo = SqliteSettingsRepository::try_new(conn).context("Settings storage unavailable")?;
    Ok(SettingsService::new(repo))
}

fn subject_service(conn: &Connection) -> Result<SubjectService<SqliteSubjectRepository<'_>>> {
    let repo = SqliteSubjectRepository::try_new(conn).context("Subject storage unavailable")?;
    Ok(SubjectService::new(repo))
}

fn lesson_service(conn: &Connection) -> Result<LessonService<SqliteLessonRepository<'_>>> {
    let repo = SqliteLessonRepository::try_new(conn).context("Lesson storage unavailable")?;
    Ok(LessonService::new(repo))
}

fn item_service(conn: &Connection) -> Result<LessonItemService<SqliteLessonItemRepository<'_>>> {
    let repo =
        SqliteLessonItemRepository::try_new(conn).context("Lesson item storage unavailable")?;
    Ok(LessonItemService::new(repo))
}

/// Maps an empty argument to "clear this field".
fn clearable(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(dir))
}

/// Error type name without user content, for metadata-only logging.
fn error_kind(err: &anyhow::Error) -> &'static str {
    use planner_core::{
        LessonItemServiceError, LessonServiceError, SettingsServiceError, SubjectServiceError,
    };

    if let Some(err) = err.downcast_ref::<LessonServiceError>() {
        return match err {
            LessonServiceError::InvalidLesson(_) => "invalid_lesson",
            LessonServiceError::LessonNotFound(_) => "lesson_not_found",
            LessonServiceError::SubjectNotFound(_) => "subject_not_found",
            LessonServiceError::SlotTaken { .. } => "slot_taken",
            LessonServiceError::Repo(_) | LessonServiceError::InconsistentState(_) => "storage",
        };
    }
    if err.downcast_ref::<SubjectServiceError>().is_some() {
        return "subject";
    }
    if err.downcast_ref::<LessonItemServiceError>().is_some() {
        return "lesson_item";
    }
    if err.downcast_ref::<SettingsServiceError>().is_some() {
        return "settings";
    }
    "other"
}
