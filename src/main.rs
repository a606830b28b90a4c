use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use sitemeta::check::check_posts;
use sitemeta::config::Config;
use sitemeta::head::{read_template, render_template};
use sitemeta::post::parse_post_in;
use sitemeta::seo::Seo;
use std::error::Error;
use std::path::Path;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let matches = App::new("sitemeta")
        .about("Canonical URLs and social-preview metadata for a blog")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .value_name("DIR")
                .default_value(".")
                .help("The directory to start looking for sitemeta.yaml in"),
        )
        .arg(
            Arg::with_name("mode")
                .long("mode")
                .value_name("MODE")
                .possible_values(&["production", "development"])
                .help("Overrides the mode from the project file"),
        )
        .subcommand(
            SubCommand::with_name("head")
                .about("Prints the <head> metadata for a post")
                .arg(
                    Arg::with_name("POST")
                        .required(true)
                        .help("The post's source file"),
                )
                .arg(
                    Arg::with_name("template")
                        .long("template")
                        .value_name("FILE")
                        .help("Renders the metadata with a template file"),
                ),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Reports posts whose metadata falls back to defaults"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        let mut source = e.source();
        let mut message = e.to_string();
        while let Some(err) = source {
            message.push_str(&format!("\n  caused by: {}", err));
            source = err.source();
        }
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let mut config = Config::from_directory(project)?;
    config.override_mode(matches.value_of("mode"))?;
    log::info!("building metadata in {} mode", config.mode);

    match matches.subcommand() {
        ("head", Some(sub)) => head(&config, sub),
        ("check", Some(_)) => check(&config),
        _ => Ok(()),
    }
}

fn head(config: &Config, matches: &ArgMatches) -> Result<()> {
    let path = Path::new(matches.value_of("POST").unwrap_or_default());
    let post = parse_post_in(config, path)?;
    let head = Seo::for_post(&post).assemble(config, &config.resolver());

    let out = match matches.value_of("template") {
        Some(template) => {
            render_template(&read_template(Path::new(template))?, &head)?
        }
        None => head.to_html()?,
    };
    print!("{}", out);
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let posts = sitemeta::post::parse_posts(&config.posts_directory)?;
    let findings = check_posts(&posts, config, &config.resolver());
    for finding in &findings {
        println!("{}", finding);
    }
    println!(
        "checked {} posts: {} findings",
        posts.len(),
        findings.len()
    );
    Ok(())
}
