//! Text rendering for planner records.
//!
//! All human-readable output goes to stdout; `--json` bypasses this module.

use chrono::NaiveDate;
use colored::Colorize;
use planner_core::cycle::{FIRST_HALF_LABEL, SECOND_HALF_LABEL};
use planner_core::{
    CyclePosition, DayView, LessonRecord, Note, Resource, Settings, Subject, Todo, WeekView,
};

pub fn print_settings(settings: &Settings) {
    println!("{}", "Settings".bold().cyan());
    println!("  {:<18}{}", "periods per day".dimmed(), settings.periods_per_day);
    println!("  {:<18}{}", "academic year".dimmed(), settings.current_year);
    println!("  {:<18}{}", "semester".dimmed(), settings.current_semester);
    println!("  {:<18}{}", "cycle length".dimmed(), settings.cycle_length);
    let anchor = settings
        .cycle_start_date
        .map_or_else(|| "not set".yellow().to_string(), |date| date.to_string());
    println!("  {:<18}{}", "cycle start".dimmed(), anchor);
}

pub fn print_subject(subject: &Subject) {
    println!("{}", subject_heading(subject));
    println!("  {:<14}{}", "id".dimmed(), subject.uuid);
    println!(
        "  {:<14}{} semester {}",
        "term".dimmed(),
        subject.academic_year,
        subject.semester
    );
    if let Some(year_level) = subject.year_level {
        println!("  {:<14}{}", "year level".dimmed(), year_level);
    }
    print_optional("room", subject.room.as_deref());
    print_optional("colour", subject.colour.as_deref());
    print_optional("notes", subject.notes.as_deref());
    if !subject.is_active {
        println!("  {}", "inactive".yellow());
    }
}

pub fn print_subjects(subjects: &[Subject]) {
    if subjects.is_empty() {
        println!("{}", "No subjects.".dimmed());
        return;
    }
    for subject in subjects {
        let year_level = subject
            .year_level
            .map_or_else(|| "-".to_string(), |level| format!("Y{level}"));
        let status = if subject.is_active {
            String::new()
        } else {
            " (inactive)".yellow().to_string()
        };
        println!(
            "{}  {:<4} {}{}",
            subject.uuid.to_string().dimmed(),
            year_level,
            subject_heading(subject),
            status
        );
    }
}

pub fn print_lesson(record: &LessonRecord) {
    let lesson = &record.lesson;
    println!(
        "{} {} period {}",
        "Lesson".bold().cyan(),
        lesson.date,
        lesson.period
    );
    println!("  {:<14}{}", "id".dimmed(), lesson.uuid);
    let subject = record
        .subject
        .as_ref()
        .map_or_else(|| lesson.subject_id.to_string(), subject_heading);
    println!("  {:<14}{}", "subject".dimmed(), subject);
    if let Some(cycle_day) = lesson.cycle_day {
        println!("  {:<14}{}", "cycle day".dimmed(), cycle_day);
    }
    print_optional("title", lesson.title.as_deref());

    if !record.notes.is_empty() {
        println!("  {}", "Notes".bold());
        print_notes_indented(&record.notes, "    ");
    }
    if !record.resources.is_empty() {
        println!("  {}", "Resources".bold());
        print_resources_indented(&record.resources, "    ");
    }
    if !record.todos.is_empty() {
        println!("  {}", "Todos".bold());
        print_todos_indented(&record.todos, "    ");
    }
}

pub fn print_lessons(lessons: &[LessonRecord]) {
    if lessons.is_empty() {
        println!("{}", "No lessons.".dimmed());
        return;
    }
    for record in lessons {
        println!(
            "{} {}  P{:<3}{}",
            record.lesson.uuid.to_string().dimmed(),
            record.date(),
            record.period(),
            lesson_line(record)
        );
    }
}

pub fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("{}", "No notes.".dimmed());
        return;
    }
    print_notes_indented(notes, "");
}

pub fn print_resources(resources: &[Resource]) {
    if resources.is_empty() {
        println!("{}", "No resources.".dimmed());
        return;
    }
    print_resources_indented(resources, "");
}

pub fn print_todos(todos: &[Todo]) {
    if todos.is_empty() {
        println!("{}", "No todos.".dimmed());
        return;
    }
    print_todos_indented(todos, "");
}

pub fn print_week(week: &WeekView) {
    println!(
        "{} {} to {}  {}",
        "Week".bold().cyan(),
        week.week_start,
        week.week_end,
        label(week.primary_week_label)
    );
    for day in &week.days {
        print_day(day, week.periods_per_day);
    }
}

pub fn print_cycle_position(date: NaiveDate, position: &CyclePosition) {
    if position.is_configured() {
        println!(
            "{}  cycle day {}  {}",
            date,
            position.cycle_day.to_string().bold(),
            label(position.week_label)
        );
    } else {
        println!("{}  {}", date, label(position.week_label));
    }
}

pub fn print_removed(kind: &str, id: &impl std::fmt::Display) {
    println!("{} {kind} {id}", "Removed".green());
}

fn print_day(day: &DayView, periods_per_day: u32) {
    let cycle = if day.cycle_day == 0 {
        String::new()
    } else {
        format!("  day {}", day.cycle_day)
    };
    println!(
        "\n{} {}{}  {}",
        day.weekday_name.bold(),
        day.date.to_string().dimmed(),
        cycle,
        label(day.week_label)
    );

    for period in 1..=periods_per_day {
        let in_period: Vec<&LessonRecord> =
            day.lessons.iter().filter(|l| l.period() == period).collect();
        if in_period.is_empty() {
            println!("  P{period:<3}{}", "free".dimmed());
        }
        for record in in_period {
            println!("  P{period:<3}{}", lesson_line(record));
        }
    }
    for record in day.lessons.iter().filter(|l| l.period() > periods_per_day) {
        println!("  P{:<3}{}", record.period(), lesson_line(record));
    }
}

fn lesson_line(record: &LessonRecord) -> String {
    let subject = record
        .subject
        .as_ref()
        .map_or_else(|| "unknown subject".red().to_string(), subject_heading);
    let title = record
        .lesson
        .title
        .as_deref()
        .map(|title| format!("  {}", title.italic()))
        .unwrap_or_default();
    let open_todos = record.todos.iter().filter(|t| !t.is_completed).count();
    let todos = if open_todos > 0 {
        format!("  [{open_todos} todo]").yellow().to_string()
    } else {
        String::new()
    };
    format!("{subject}{title}{todos}")
}

fn subject_heading(subject: &Subject) -> String {
    match subject.code.as_deref() {
        Some(code) => format!("{} ({code})", subject.name.bold()),
        None => subject.name.bold().to_string(),
    }
}

fn label(week_label: &str) -> String {
    if week_label == FIRST_HALF_LABEL {
        week_label.blue().bold().to_string()
    } else if week_label == SECOND_HALF_LABEL {
        week_label.magenta().bold().to_string()
    } else {
        week_label.yellow().to_string()
    }
}

fn print_optional(name: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("  {:<14}{}", name.dimmed(), value);
    }
}

fn print_notes_indented(notes: &[Note], indent: &str) {
    for note in notes {
        match note.title.as_deref() {
            Some(title) => println!(
                "{indent}{} {}: {}",
                short_id(note.uuid),
                title.bold(),
                note.content
            ),
            None => println!("{indent}{} {}", short_id(note.uuid), note.content),
        }
    }
}

fn print_resources_indented(resources: &[Resource], indent: &str) {
    for resource in resources {
        let location = resource
            .url
            .as_deref()
            .or(resource.file_path.as_deref())
            .unwrap_or("");
        println!(
            "{indent}{} {} {}",
            short_id(resource.uuid),
            resource.title.bold(),
            location.underline()
        );
    }
}

fn print_todos_indented(todos: &[Todo], indent: &str) {
    for todo in todos {
        let mark = if todo.is_completed {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let priority = todo
            .priority
            .map(|p| format!(" p{p}"))
            .unwrap_or_default();
        let due = todo
            .due_date
            .map(|date| format!(" due {date}"))
            .unwrap_or_default();
        println!(
            "{indent}{} {mark} {}{}{}",
            short_id(todo.uuid),
            todo.content,
            priority.yellow(),
            due.dimmed()
        );
    }
}

fn short_id(id: uuid::Uuid) -> colored::ColoredString {
    id.to_string().dimmed()
}
