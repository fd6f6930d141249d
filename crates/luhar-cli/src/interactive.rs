//! Line-based pager over a movie list.

use std::io::Write;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use luhar_core::models::Category;
use luhar_runtime::{ListPage, Runtime, RuntimeError};

use crate::commands::{show_list, show_movie, CliError, Output};

const HELP: &str = "\
n            next page
p            previous page
<number>     jump to page
s <query>    search
g <id>       browse a genre
m <id>       movie details
r            retry
h            home
q            quit";

/// What a line of input asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Next,
    Prev,
    Page(u32),
    Search(String),
    Genre(String),
    Movie(u64),
    Reload,
    Home,
    Quit,
    Help,
}

fn parse(line: &str) -> Input {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head {
        "n" | "next" => Input::Next,
        "p" | "prev" => Input::Prev,
        "r" | "reload" => Input::Reload,
        "h" | "home" => Input::Home,
        "q" | "quit" | "exit" => Input::Quit,
        "s" | "search" => Input::Search(rest.to_string()),
        "g" | "genre" => Input::Genre(rest.to_string()),
        "m" | "movie" => rest.parse().map(Input::Movie).unwrap_or(Input::Help),
        other => other.parse().map(Input::Page).unwrap_or(Input::Help),
    }
}

pub async fn run(rt: &mut Runtime, category: Category) -> Result<ExitCode, CliError> {
    let out = Output { json: false };
    let first = rt.controller.set_category(category, "").await;
    show(rt, &out, first)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let result = match parse(&line) {
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Next => rt.controller.next_page().await,
            Input::Prev => rt.controller.prev_page().await,
            Input::Page(n) => rt.controller.go_to_page(n).await,
            Input::Search(query) => rt.controller.search(&query).await.map(Some),
            Input::Genre(id) => rt.controller.select_genre(&id).await.map(Some),
            Input::Reload => rt.controller.reload().await.map(Some),
            Input::Home => rt.controller.go_home().await.map(Some),
            Input::Movie(id) => {
                show_movie(rt, &out, id).await?;
                continue;
            }
        };

        match result {
            Ok(Some(page)) => show(rt, &out, Ok(page))?,
            Ok(None) => println!("No such page."),
            Err(e) => show(rt, &out, Err(e))?,
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn show(rt: &Runtime, out: &Output, page: Result<ListPage, RuntimeError>) -> Result<(), CliError> {
    show_list(rt, out, page)?;
    Ok(())
}
