//! `sitekit` command-line interface

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sitekit::{FormData, Site, SiteConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("sitekit")
        .version(sitekit::VERSION)
        .about("Local form capture, favourites and avatars for static sites")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Site config file (TOML); built-in defaults when omitted"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Store file, overriding the config"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit a form")
                .arg(Arg::new("form").required(true).help("Form name"))
                .arg(
                    Arg::new("field")
                        .long("field")
                        .short('f')
                        .action(ArgAction::Append)
                        .value_name("NAME=VALUE")
                        .help("Submitted field; repeat for more"),
                )
                .arg(
                    Arg::new("query")
                        .long("query")
                        .conflicts_with("field")
                        .help("Submission as a URL query string"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export a form's records as CSV")
                .arg(Arg::new("form").required(true).help("Form name"))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to write <storageKey>.csv into; stdout when omitted"),
                ),
        )
        .subcommand(
            Command::new("favorite")
                .about("Toggle or show the favourite player")
                .arg(
                    Arg::new("id")
                        .value_parser(value_parser!(u32))
                        .help("Member id to toggle; shows the current favourite when omitted"),
                )
                .arg(
                    Arg::new("clear")
                        .long("clear")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("id")
                        .help("Clear the favourite"),
                ),
        )
        .subcommand(
            Command::new("avatar")
                .about("Print an avatar data URI")
                .arg(Arg::new("identity").help("Initials; default identity when omitted"))
                .arg(Arg::new("style").long("style").short('s').help("Background hex color")),
        )
        .subcommand(Command::new("forms").about("List configured forms"))
        .subcommand(Command::new("config").about("Print the effective config as TOML"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<SiteConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    if let Some(store) = matches.get_one::<PathBuf>("store") {
        config = config.with_storage_path(store);
    }
    Ok(config)
}

fn form_data(args: &ArgMatches) -> anyhow::Result<FormData> {
    if let Some(query) = args.get_one::<String>("query") {
        return Ok(FormData::from_query(query));
    }
    let mut data = FormData::new();
    for field in args.get_many::<String>("field").into_iter().flatten() {
        let Some((name, value)) = field.split_once('=') else {
            bail!("field '{field}' is not NAME=VALUE");
        };
        data.push(name, value);
    }
    Ok(data)
}

fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("config", _)) => {
            print!("{}", config.to_toml_string()?);
            return Ok(ExitCode::SUCCESS);
        }
        Some(("forms", _)) => {
            for form in &config.forms {
                println!("{}\t{}", form.name, form.spec.storage_key);
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let site = Site::open(config);

    match matches.subcommand() {
        Some(("submit", args)) => {
            let form = args.get_one::<String>("form").context("form is required")?;
            let notice = site.submit(form, &form_data(args)?);
            println!("{notice}");
            if notice.level.is_problem() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(("export", args)) => {
            let form = args.get_one::<String>("form").context("form is required")?;
            let export = site.export_csv(form)?;
            match args.get_one::<PathBuf>("out") {
                Some(dir) => {
                    let path = export
                        .write_to(dir)
                        .with_context(|| format!("writing export into {}", dir.display()))?;
                    println!("{}", path.display());
                }
                None => println!("{}", export.content),
            }
        }
        Some(("favorite", args)) => {
            if args.get_flag("clear") {
                let removed = site.favorites().deselect()?;
                println!("{}", if removed { "Favourite cleared." } else { "No favourite set." });
            } else if let Some(id) = args.get_one::<u32>("id") {
                let notice = site.toggle_favorite(*id);
                println!("{notice}");
                if notice.level.is_problem() {
                    return Ok(ExitCode::FAILURE);
                }
            } else {
                println!("{}", site.favorite_summary().message());
            }
        }
        Some(("avatar", args)) => {
            let identity = args.get_one::<String>("identity").map(String::as_str);
            let style = args.get_one::<String>("style").map(String::as_str);
            let id = match site.avatars().register(identity, style) {
                sitekit::avatar::Registration::Resolved(asset) => {
                    println!("{asset}");
                    return Ok(ExitCode::SUCCESS);
                }
                sitekit::avatar::Registration::Pending(id) => id,
            };
            // a terminal has no viewport: the slot is visible as soon as it is printed
            let asset = site.avatars().notify_visible(id).context("avatar was not pending")?;
            println!("{asset}");
        }
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }

    Ok(ExitCode::SUCCESS)
}
