use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    NextField,
    PrevField,
    /// Next ticker/frequency, or one day later.
    StepUp,
    StepDown,
    /// One month later on a date field.
    PageUp,
    PageDown,
    ScrollRawUp,
    ScrollRawDown,
    Rerun,
    Quit,
}

pub fn parse_form_command(key_code: &KeyCode) -> Option<FormCommand> {
    match key_code {
        KeyCode::Tab | KeyCode::Right => Some(FormCommand::NextField),
        KeyCode::BackTab | KeyCode::Left => Some(FormCommand::PrevField),
        KeyCode::Up => Some(FormCommand::StepUp),
        KeyCode::Down => Some(FormCommand::StepDown),
        KeyCode::PageUp => Some(FormCommand::PageUp),
        KeyCode::PageDown => Some(FormCommand::PageDown),
        KeyCode::Esc => Some(FormCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            '+' | '=' => Some(FormCommand::StepUp),
            '-' => Some(FormCommand::StepDown),
            'k' => Some(FormCommand::ScrollRawUp),
            'j' => Some(FormCommand::ScrollRawDown),
            'r' => Some(FormCommand::Rerun),
            'q' => Some(FormCommand::Quit),
            _ => None,
        },
        _ => None,
    }
}
