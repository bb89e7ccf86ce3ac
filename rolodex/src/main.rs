use std::{path::PathBuf, time::Duration};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rolodex_frontend::settings::Settings;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Initialization error")]
    Initialization,
}

#[tokio::main]
async fn main() {
    let logpath = match get_logging_path() {
        Ok(it) => it,
        Err(_) => return,
    };

    let logfile = tracing_appender::rolling::daily(logpath, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_writer(logfile)
        .init();

    debug!("starting application");

    let mut settings = Settings::default();
    map_args_to_settings(&cli().get_matches(), &mut settings);

    match rolodex_frontend::run(settings).await {
        Ok(()) => {
            debug!("closing application");
        }
        Err(err) => {
            error!("closing application with error: {:?}", err);
            eprintln!("rolodex: {}", err);
        }
    }
}

fn cli() -> Command {
    Command::new("rolodex")
        .about("rolodex - an address book whose regions follow the session history")
        .args([
            // NOTE: arguments
            Arg::new("location")
                .action(ArgAction::Set)
                .help("location to open on startup, e.g. /contacts/1?q=al"),
            // NOTE: options
            Arg::new("origin")
                .long("origin")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Url))
                .help("origin links are resolved against, others are left alone"),
            Arg::new("api-url")
                .long("api-url")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Url))
                .help("base url of the contact resource"),
            Arg::new("debounce-ms")
                .long("debounce-ms")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u64))
                .help("delay before a typed search is submitted"),
            Arg::new("demo")
                .long("demo")
                .action(ArgAction::SetTrue)
                .default_value("false")
                .help("serve contacts from memory instead of the api"),
            Arg::new("state")
                .long("state")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("json file holding the history state of the first entry"),
            Arg::new("templates")
                .long("templates")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("html file with templates replacing the built in markup"),
            Arg::new("ignore")
                .long("ignore")
                .action(ArgAction::Append)
                .help("path prefix whose links are left to the browser, repeatable"),
        ])
}

fn map_args_to_settings(args: &ArgMatches, settings: &mut Settings) {
    settings.demo = args.get_flag("demo");
    settings.initial_state = args.get_one("state").cloned();
    settings.templates = args.get_one("templates").cloned();

    if let Some(location) = args.get_one::<String>("location") {
        settings.location = location.clone();
    }

    if let Some(origin) = args.get_one::<Url>("origin") {
        settings.origin = origin.to_string();
    }

    if let Some(api_url) = args.get_one::<Url>("api-url") {
        settings.api_url = api_url.to_string();
    }

    if let Some(debounce) = args.get_one::<u64>("debounce-ms") {
        settings.debounce = Duration::from_millis(*debounce);
    }

    if let Some(ignored) = args.get_many::<String>("ignore") {
        settings.ignored_paths.extend(ignored.cloned());
    }
}

fn get_logging_path() -> Result<String, Error> {
    let cache_dir = match dirs::cache_dir() {
        Some(cache_dir) => match cache_dir.to_str() {
            Some(cache_dir_string) => cache_dir_string.to_string(),
            None => return Err(Error::Initialization),
        },
        None => return Err(Error::Initialization),
    };

    Ok(format!("{}{}", cache_dir, "/rolodex/logs"))
}
