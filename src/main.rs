//! roci-search binary entry point.

use std::io::{self, BufRead, Write};

use clap::Parser;
use roci_search::cli::{AskArgs, ChatArgs, Cli, Commands};
use roci_search::config::SearchConfig;
use roci_search::error::Result;
use roci_search::shell::{ChatShell, ShellOptions, TerminalView};

fn main() {
    roci_search::logging::init(roci_search::logging::DEFAULT_FILTER);
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(args) => run_chat(args),
        Commands::Ask(args) => run_ask(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(model: Option<String>) -> Result<SearchConfig> {
    let config = SearchConfig::load()?;
    Ok(match model {
        Some(model) => config.with_model(model),
        None => config,
    })
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let config = load_config(args.model)?;
    let view = TerminalView::new(io::stdout()).with_clear_screen(!args.no_clear);
    let options = ShellOptions {
        show_session: args.show_session,
    };
    let mut shell = ChatShell::start(config, options, view)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => shell.reset()?,
            _ => {
                shell.submit(&line)?;
            }
        }
    }
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    let config = load_config(args.model)?;
    let mut shell = ChatShell::start(config, ShellOptions::default(), TerminalView::new(io::sink()))?;
    if let Some(reply) = shell.submit(&args.prompt)? {
        println!("{}", reply.content);
    }
    Ok(())
}
