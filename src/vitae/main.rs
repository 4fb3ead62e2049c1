use clap::Parser;
use serde_json::Value;
use vitae::api::VitaeApi;
use vitae::commands::entries::NewEntry;
use vitae::commands::profile::ProfileUpdate;
use vitae::config::VitaeConfig;
use vitae::error::Result;
use vitae::logging;
use vitae::settings::SettingsUpdate;
use vitae::store::fs::FileStore;

mod args;
mod print;

use args::{CategoryCommand, Cli, Commands, EntryCommand, ProfileCommand, SettingsCommand};
use print::{
    print_categories, print_document, print_entries, print_error, print_messages,
    print_profile, print_settings,
};

fn main() {
    if let Err(e) = run() {
        print_error(&e);
        std::process::exit(1);
    }
}

type Api = VitaeApi<FileStore>;

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let api = init_api(&cli)?;

    match cli.command {
        Some(Commands::Show) | None => handle_show(&api),
        Some(Commands::Profile(cmd)) => handle_profile(&api, cmd),
        Some(Commands::Category(cmd)) => handle_category(&api, cmd),
        Some(Commands::Entry(cmd)) => handle_entry(&api, cmd),
        Some(Commands::Settings(cmd)) => handle_settings(&api, cmd),
    }
}

fn init_api(cli: &Cli) -> Result<Api> {
    let config_file = cli
        .config
        .clone()
        .or_else(VitaeConfig::default_config_file);
    let config = VitaeConfig::load(config_file.as_deref())?;

    let path = cli.file.clone().unwrap_or_else(|| config.data_file());
    tracing::debug!(path = %path.display(), "using data file");

    let store = FileStore::new(path).with_policy(config.store_policy());
    Ok(VitaeApi::new(store))
}

fn handle_show(api: &Api) -> Result<()> {
    print_document(&api.document()?);
    Ok(())
}

fn handle_profile(api: &Api, cmd: ProfileCommand) -> Result<()> {
    match cmd {
        ProfileCommand::Show => print_profile(&api.get_profile()?),
        ProfileCommand::Set {
            name,
            email,
            phone,
            address,
            dob,
            summary,
        } => {
            // The service replaces the whole profile; keep what wasn't given.
            let current = api.get_profile()?;
            let update = ProfileUpdate {
                name: name.or(Some(current.name)),
                email: email.or(Some(current.email)),
                phone: phone.or(Some(current.phone)),
                address: address.or(Some(current.address)),
                date_of_birth: dob.or(Some(current.date_of_birth)),
                summary: summary.or(Some(current.summary)),
            };
            print_messages(&api.set_profile(update)?.messages);
        }
    }
    Ok(())
}

fn handle_category(api: &Api, cmd: CategoryCommand) -> Result<()> {
    match cmd {
        CategoryCommand::List => print_categories(&api.list_categories()?),
        CategoryCommand::Add { name } => print_messages(&api.add_category(&name)?.messages),
        CategoryCommand::Delete { name } => {
            print_messages(&api.delete_category(&name)?.messages)
        }
    }
    Ok(())
}

fn handle_entry(api: &Api, cmd: EntryCommand) -> Result<()> {
    match cmd {
        EntryCommand::List { category } => print_entries(&api.entries(&category)?),
        EntryCommand::Add {
            category,
            name,
            link,
            date,
        } => {
            let entry = NewEntry {
                category,
                name,
                link,
                date,
            };
            print_messages(&api.add_entry(entry)?.messages);
        }
        EntryCommand::Delete { category, index } => {
            // Users count from 1; clap already rejected 0.
            let index = usize::try_from(index - 1).unwrap_or(usize::MAX);
            print_messages(&api.delete_entry(&category, index)?.messages);
        }
    }
    Ok(())
}

fn handle_settings(api: &Api, cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show => print_settings(&api.get_settings()?),
        SettingsCommand::Set { columns, separator } => {
            let update = SettingsUpdate {
                columns: columns.map(Value::String),
                separator: separator.map(Value::String),
            };
            let (stored, result) = api.set_settings(&update)?;
            print_messages(&result.messages);
            print_settings(&stored);
        }
    }
    Ok(())
}
