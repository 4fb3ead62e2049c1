use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use unicode_width::UnicodeWidthStr;
use vitae::commands::{CmdMessage, MessageLevel};
use vitae::display::format_date;
use vitae::error::VitaeError;
use vitae::model::{Document, Entry, Profile};
use vitae::settings::Settings;

const TIME_WIDTH: usize = 14;

pub(crate) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(crate) fn print_error(err: &VitaeError) {
    if err.is_rejection() {
        eprintln!("{}", err.to_string().red());
    } else {
        eprintln!("Error: {}", err);
    }
}

pub(crate) fn print_profile(profile: &Profile) {
    if profile.is_blank() {
        println!("{}", "No personal details set.".dimmed());
        return;
    }

    let name = if profile.name.is_empty() {
        "Your Name"
    } else {
        profile.name.as_str()
    };
    println!("{}", name.bold());

    let mut contact: Vec<String> = [&profile.email, &profile.phone, &profile.address]
        .into_iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect();
    if !profile.date_of_birth.is_empty() {
        contact.push(format!("DOB: {}", format_date(&profile.date_of_birth)));
    }
    if !contact.is_empty() {
        println!("{}", contact.join(" | "));
    }
    if !profile.summary.is_empty() {
        println!("{}", profile.summary);
    }
    if let Some(updated) = profile.updated_at {
        println!("{}", format!("updated {}", updated).dimmed());
    }
}

pub(crate) fn print_settings(settings: &Settings) {
    println!("columns:   {}", settings.columns.count());
    println!(
        "separator: {}",
        if settings.separator { "on" } else { "off" }
    );
}

pub(crate) fn print_categories(names: &[String]) {
    if names.is_empty() {
        println!("No categories yet.");
        return;
    }
    for name in names {
        println!("{}", name);
    }
}

pub(crate) fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("    {}", "(empty)".dimmed());
        return;
    }

    let name_width = entries.iter().map(|e| e.name.width()).max().unwrap_or(0);
    for (i, entry) in entries.iter().enumerate() {
        let idx = format!("{}. ", i + 1);
        let padding = name_width.saturating_sub(entry.name.width());
        let mut line = format!(
            "    {}{}{}  {}",
            idx.yellow(),
            entry.name.bold(),
            " ".repeat(padding),
            format_date(&entry.date)
        );
        if let Some(link) = &entry.link {
            line.push_str(&format!("  {}", link.blue()));
        }
        match entry.created_at {
            Some(created_at) => println!("{}  {}", line, format_time_ago(created_at).dimmed()),
            None => println!("{}", line),
        }
    }
}

pub(crate) fn print_document(doc: &Document) {
    print_profile(&doc.profile);

    let mut first = true;
    for (name, entries) in doc.categories.iter() {
        if !first && doc.settings.separator {
            println!("{}", "────────────────────".dimmed());
        } else {
            println!();
        }
        first = false;
        println!("{}", name.bold().underline());
        print_entries(entries);
    }
}

fn format_time_ago(created_at: NaiveDateTime) -> String {
    let duration = Local::now()
        .naive_local()
        .signed_duration_since(created_at);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
