//! Terminal rendering. Everything writes to a `Write` so output can be
//! captured in tests.

use colored::Colorize;
use std::io::{self, Write};

pub fn header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "AI Anime Recommender".bold())?;
    writeln!(out, "{}", "Get personalized anime recommendations powered by AI".dimmed())
}

pub fn online(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "API is online".green())
}

pub fn offline(out: &mut impl Write, base_url: &str) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("API at {base_url} is offline. Start the backend server first.").red()
    )?;
    writeln!(out, "    cargo run -p anime_api")
}

pub fn prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "What kind of anime are you looking for? (type 'quit' to exit)")?;
    write!(
        out,
        "{} ",
        "e.g. Action anime with a strong protagonist and epic fights >".dimmed()
    )?;
    out.flush()
}

pub fn waiting(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "Finding recommendations...".dimmed())?;
    out.flush()
}

pub fn warning(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.yellow())
}

pub fn error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.red())
}

pub fn recommendations(out: &mut impl Write, answer: &str) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "{}", "Recommendations".bold().cyan())?;
    writeln!(out)?;
    writeln!(out, "{}", answer.trim_end())
}
