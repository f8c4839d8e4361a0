//! Shared output helpers for command modules

use serde::Serialize;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> marknote::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one line per item, or a placeholder when there are none
pub fn print_lines<I>(lines: I, empty: &str)
where
    I: IntoIterator<Item = String>,
{
    let mut any = false;
    for line in lines {
        println!("{}", line);
        any = true;
    }
    if !any {
        println!("{}", empty);
    }
}
