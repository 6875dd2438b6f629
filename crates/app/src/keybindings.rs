#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartPause,
    Reset,
    ToggleAmbient,
    StepUp,
    StepDown,
    PrintSnapshot,
    Help,
    Quit,
}

pub fn keybindings() -> Vec<(char, Action, &'static str)> {
    vec![
        ('s', Action::StartPause, "start / pause"),
        ('r', Action::Reset, "reset"),
        ('j', Action::ToggleAmbient, "ambient tones on / off"),
        ('+', Action::StepUp, "longer"),
        ('-', Action::StepDown, "shorter"),
        ('?', Action::PrintSnapshot, "print state as JSON"),
        ('h', Action::Help, "help"),
        ('q', Action::Quit, "quit"),
    ]
}

/// Every bound key in `line`, in order. Unknown characters are ignored.
pub fn parse_line(line: &str) -> Vec<Action> {
    let bindings = keybindings();
    line.chars()
        .filter_map(|c| {
            let c = c.to_ascii_lowercase();
            bindings
                .iter()
                .find(|(key, _, _)| *key == c)
                .map(|(_, action, _)| *action)
        })
        .collect()
}

pub fn help_text() -> String {
    keybindings()
        .iter()
        .map(|(key, _, description)| format!("  {key}  {description}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("s"), vec![Action::StartPause]);
        assert_eq!(parse_line(" J \n"), vec![Action::ToggleAmbient]);
        assert_eq!(
            parse_line("++-q"),
            vec![Action::StepUp, Action::StepUp, Action::StepDown, Action::Quit]
        );
        assert!(parse_line("xyz").is_empty());
    }

    #[test]
    fn test_keys_are_unique() {
        let bindings = keybindings();
        for (i, (key, _, _)) in bindings.iter().enumerate() {
            assert!(bindings[i + 1..].iter().all(|(other, _, _)| other != key), "{key}");
        }
    }
}
