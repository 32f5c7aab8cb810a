use clap::Parser;
use miette::Result;
use seamline::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Restore default SIGPIPE handling so `seamline ... | head` exits
    // quietly instead of panicking on the closed pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Miette renders all errors that bubble up out of the command handlers
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => seamline::cli::commands::init::run(args, &global),
        Commands::User(cmd) => seamline::cli::commands::user::run(cmd, &global),
        Commands::Product(cmd) => seamline::cli::commands::product::run(cmd, &global),
        Commands::Inspect(cmd) => seamline::cli::commands::inspect::run(cmd, &global),
        Commands::Work(cmd) => seamline::cli::commands::work::run(cmd, &global),
        Commands::Activity(args) => seamline::cli::commands::activity::run(args, &global),
        Commands::Completions(args) => seamline::cli::commands::completions::run(args),
    }
}
