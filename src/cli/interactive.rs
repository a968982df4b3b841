// commands accepted on stdin in --interactive mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputCommand {
    Next,
    Previous,
    GoTo(u64),
    Search(String),
    Redraw,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "commands:
  n, next          next page
  p, prev          previous page
  g N, goto N      jump to page N
  / TEXT           filter rows by street (no text clears the filter)
  (empty line)     redraw
  h, help          this help
  q, quit          exit
";

pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputCommand::Redraw;
    }
    if let Some(rest) = line.trim_start().strip_prefix('/') {
        return InputCommand::Search(rest.trim().to_string());
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };
    match verb.to_lowercase().as_str() {
        "n" | "next" => InputCommand::Next,
        "p" | "prev" | "previous" => InputCommand::Previous,
        "g" | "goto" => match rest.parse::<u64>() {
            Ok(page) if page > 0 => InputCommand::GoTo(page),
            _ => InputCommand::Invalid(format!("expected a page number, got '{rest}'")),
        },
        "s" | "search" => InputCommand::Search(rest.to_string()),
        "h" | "help" | "?" => InputCommand::Help,
        "q" | "quit" | "exit" => InputCommand::Quit,
        _ => InputCommand::Invalid(format!("unknown command '{verb}'")),
    }
}
