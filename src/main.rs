use clap::Parser;
use marknote::{Cli, Command, Config, Workspace};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> marknote::Result<()> {
    let config = Config::resolve(cli.home.as_deref())?;
    let mut ws = Workspace::open(config);

    match cli.command {
        Command::Category(cmd) => cmd::category::run(&mut ws, cli.json, cmd),
        Command::Note(cmd) => cmd::note::run(&mut ws, cli.json, cmd),
        Command::Marker(cmd) => cmd::marker::run(&mut ws, cli.json, cmd),
        Command::Link(cmd) => cmd::link::run(&mut ws, cli.json, cmd),
        Command::Bookmark(cmd) => cmd::bookmark::run(&mut ws, cli.json, cmd),
        Command::Session { note, position } => cmd::session::run(&mut ws, note, position),
    }
}

mod cmd {
    pub mod bookmark;
    pub mod category;
    pub mod link;
    pub mod marker;
    pub mod note;
    pub mod output;
    pub mod session;
}
