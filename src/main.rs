use anyhow::Result;
use clap::Parser;
use gitprompt::areas::repository::Repository;
use gitprompt::artifacts::{moon, prompt};

#[derive(Parser)]
#[command(
    name = "gitprompt",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A fast git status segment for the shell prompt",
    long_about = "Renders a single-line, colorized summary of the enclosing git \
    repository's state (branch, divergence, staged/unstaged changes) as zsh \
    prompt markup. Prints nothing when no repository encloses the working \
    directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(index = 1, help = "Directory to start the repository search from")]
    path: Option<String>,
    #[arg(long, help = "Append the current moon phase to the line")]
    moon: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let start = match &cli.path {
        Some(path) => std::path::PathBuf::from(path),
        None => std::env::current_dir()?,
    };

    let mut line = String::new();

    if let Some(repository) = Repository::discover(&start)? {
        let bare = repository.is_bare();
        line.push_str(&prompt::compose(&repository, bare)?);
    }

    if cli.moon {
        let today = chrono::Local::now().date_naive();
        let mut rng = fake::rand::rng();
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&moon::segment(today, &mut rng));
    }

    if !line.is_empty() {
        print!(" {}", line);
    }

    Ok(())
}
