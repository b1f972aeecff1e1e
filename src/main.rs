use std::io::{self, BufRead, Write};

use dotenvy::dotenv;
use fork_chain::shell::{self, Command, Outcome, Shell};
use fork_chain::{Config, Result, SimError};
use log::{info, warn};

fn main() -> Result<()> {
    let _ = dotenv();
    env_logger::init();
    let config = Config::from_env();

    info!(
        "starting simulation (difficulty={}, fork mining={:?})",
        config.difficulty, config.fork_mining
    );
    println!("⛓️ Fork simulation, difficulty {}", config.difficulty);

    let mut shell = Shell::new(config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}", shell.execute(Command::Show, |_| Ok(String::new()))?);
    println!("\n{}", shell::menu());

    loop {
        print!("\nEnter your choice: ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(c) => c,
            Err(e) => {
                warn!("{e}");
                println!("{e}. Type 'help' for the menu.");
                continue;
            }
        };

        let prompt = |question: &str| -> Result<String> {
            print!("{question}");
            io::stdout().flush()?;
            match lines.next() {
                Some(answer) => Ok(answer?.trim().to_string()),
                None => Err(SimError::Io(io::ErrorKind::UnexpectedEof.into())),
            }
        };

        match shell.execute(command, prompt) {
            Ok(Outcome::Exit) => {
                println!("{}", Outcome::Exit);
                break;
            }
            Ok(outcome) => println!("{outcome}"),
            Err(SimError::Io(e)) => return Err(SimError::Io(e)),
            Err(e) => {
                warn!("{e}");
                println!("{e}");
            }
        }
    }

    Ok(())
}
