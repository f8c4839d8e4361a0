//! Interactive session command module

use std::io::{self, BufRead, IsTerminal, Write};

use marknote::{session, Reply, Session, Workspace};

pub fn run(ws: &mut Workspace, note: Option<String>, position: usize) -> marknote::Result<()> {
    let interactive = io::stdin().is_terminal();
    let mut session = Session::new(ws);

    if let Some(note) = note {
        println!("{}", session.open(&note, position)?);
    }
    if interactive {
        eprintln!("{}", session::HELP);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match session.execute(&line) {
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => println!("{}", text),
            Ok(Reply::Quit) => break,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}
