//! Line commands read from stdin by the terminal driver.

use std::str::FromStr;

use shared::domain::CellCoord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Click(CellCoord),
    PointerDown(CellCoord),
    PointerMove(CellCoord),
    PointerUp,
    Add,
    Remove(String),
    Hint,
    Show,
    Submit,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  click R C | down R C | move R C | up
  add                 commit the current selection
  remove WORD         remove a found word
  hint                show or hide the word list
  show                print the grid
  submit              send found words to the server
  quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err("empty command".into());
        };
        let args: Vec<&str> = parts.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "click" | "c" => Command::Click(coord(&args)?),
            "down" | "d" => Command::PointerDown(coord(&args)?),
            "move" | "m" => Command::PointerMove(coord(&args)?),
            "up" | "u" => Command::PointerUp,
            "add" | "a" => Command::Add,
            "remove" | "rm" => match args.as_slice() {
                [word] => Command::Remove((*word).to_string()),
                _ => return Err("usage: remove WORD".into()),
            },
            "hint" => Command::Hint,
            "show" | "s" => Command::Show,
            "submit" => Command::Submit,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(command)
    }
}

/// Accepts `R C` or the `R-C` cell id.
fn coord(args: &[&str]) -> Result<CellCoord, String> {
    match args {
        [id] => id.parse().map_err(|err| format!("{err}")),
        [row, col] => {
            let row = row.parse().map_err(|_| format!("invalid row '{row}'"))?;
            let col = col.parse().map_err(|_| format!("invalid column '{col}'"))?;
            Ok(CellCoord::new(row, col))
        }
        _ => Err("expected a cell as 'R C' or 'R-C'".into()),
    }
}
