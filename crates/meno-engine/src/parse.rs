//! Command string parsing: `name` or `name:argument`, one separator,
//! with the trigger prefix stripped from the name.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCmd<'a> {
    /// The user typed only the trigger (or left the panel seed
    /// untouched): entry is abandoned, no lookup occurs.
    Cancelled,
    Command {
        name: &'a str,
        argument: Option<&'a str>,
    },
}

/// The pre-seeded content of the panel input: trigger plus one
/// placeholder space.
pub fn panel_seed(prompt_char: char) -> String {
    format!("{prompt_char} ")
}

/// Parse an inline command captured from the document, e.g. `$i:hello`.
pub fn parse_inline(full: &str, prompt_char: char) -> ParsedCmd<'_> {
    if is_bare_prompt(full, prompt_char) {
        return ParsedCmd::Cancelled;
    }
    let (head, argument) = split_first_colon(full);
    let name = head.strip_prefix(prompt_char).unwrap_or(head);
    ParsedCmd::Command { name, argument }
}

/// Parse a panel command, e.g. `# cb:h1`. The two-character
/// trigger-plus-placeholder prefix is stripped from the name.
pub fn parse_panel(full: &str, prompt_char: char) -> ParsedCmd<'_> {
    if is_bare_prompt(full, prompt_char) || full == panel_seed(prompt_char) {
        return ParsedCmd::Cancelled;
    }
    let (head, argument) = split_first_colon(full);
    ParsedCmd::Command {
        name: strip_prefix_chars(head, 2),
        argument,
    }
}

/// Split on the first `:`; everything after it is the argument, even
/// if it contains further colons. No `:` means no argument.
fn split_first_colon(s: &str) -> (&str, Option<&str>) {
    match s.split_once(':') {
        Some((head, argument)) => (head, Some(argument)),
        None => (s, None),
    }
}

fn is_bare_prompt(s: &str, prompt_char: char) -> bool {
    s.len() == prompt_char.len_utf8() && s.starts_with(prompt_char)
}

fn strip_prefix_chars(s: &str, count: usize) -> &str {
    match s.char_indices().nth(count) {
        Some((ix, _)) => &s[ix..],
        None => "",
    }
}
