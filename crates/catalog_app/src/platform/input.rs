use catalog_core::Filters;

/// One line typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Search(String),
    Category(String),
    PriceType(String),
    ClearFilters,
    LoadMore,
    Reload,
    Cancel,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  /search <text>     filter by name, description or tag
  /category <name>   filter by category (All to clear)
  /price <type>      filter by price type (All to clear; see price-types)
  /clear             drop every filter
  more               load the next page
  reload             start the listing over
  cancel             abort in-flight requests
  quit";

pub fn parse_command(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "/search" | "/s" => InputCommand::Search(rest.to_string()),
        "/category" | "/c" => InputCommand::Category(rest.to_string()),
        "/price" | "/p" => InputCommand::PriceType(rest.to_string()),
        "/clear" => InputCommand::ClearFilters,
        "more" | "m" => InputCommand::LoadMore,
        "reload" | "r" => InputCommand::Reload,
        "cancel" => InputCommand::Cancel,
        "help" | "?" => InputCommand::Help,
        "quit" | "q" | "exit" => InputCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// Applies a filter edit to the draft filters; `None` for non-filter commands.
pub fn edit_filters(draft: &Filters, command: &InputCommand) -> Option<Filters> {
    let next = match command {
        InputCommand::Search(text) => draft.clone().with_search(text.as_str()),
        InputCommand::Category(name) => draft.clone().with_category(name.as_str()),
        InputCommand::PriceType(kind) => draft.clone().with_price_type(kind.as_str()),
        InputCommand::ClearFilters => Filters::default(),
        _ => return None,
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_commands_with_arguments() {
        assert_eq!(
            parse_command("/search  image gen "),
            Some(InputCommand::Search("image gen".to_string()))
        );
        assert_eq!(
            parse_command("/category Chatbot"),
            Some(InputCommand::Category("Chatbot".to_string()))
        );
        assert_eq!(
            parse_command("/search"),
            Some(InputCommand::Search(String::new()))
        );
        assert_eq!(parse_command("MORE"), Some(InputCommand::LoadMore));
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn filter_edits_build_on_the_draft() {
        let draft = Filters::default().with_search("chat");
        let next = edit_filters(&draft, &InputCommand::PriceType("Free".into())).unwrap();
        assert_eq!(next, Filters::new("chat", "", "Free"));

        let cleared = edit_filters(&next, &InputCommand::ClearFilters).unwrap();
        assert!(cleared.is_empty());

        assert_eq!(edit_filters(&draft, &InputCommand::LoadMore), None);
    }
}
