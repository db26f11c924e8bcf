use crossterm::event::KeyCode;
use ma_signal_board::input::{parse_form_command, FormCommand};

#[test]
fn parse_form_command_maps_navigation_keys() {
    assert_eq!(parse_form_command(&KeyCode::Tab), Some(FormCommand::NextField));
    assert_eq!(parse_form_command(&KeyCode::Right), Some(FormCommand::NextField));
    assert_eq!(parse_form_command(&KeyCode::BackTab), Some(FormCommand::PrevField));
    assert_eq!(parse_form_command(&KeyCode::Left), Some(FormCommand::PrevField));
}

#[test]
fn parse_form_command_maps_step_keys() {
    assert_eq!(parse_form_command(&KeyCode::Up), Some(FormCommand::StepUp));
    assert_eq!(parse_form_command(&KeyCode::Down), Some(FormCommand::StepDown));
    assert_eq!(parse_form_command(&KeyCode::Char('+')), Some(FormCommand::StepUp));
    assert_eq!(parse_form_command(&KeyCode::Char('-')), Some(FormCommand::StepDown));
    assert_eq!(parse_form_command(&KeyCode::PageUp), Some(FormCommand::PageUp));
    assert_eq!(parse_form_command(&KeyCode::PageDown), Some(FormCommand::PageDown));
}

#[test]
fn parse_form_command_maps_case_insensitive_char_keys() {
    assert_eq!(parse_form_command(&KeyCode::Char('q')), Some(FormCommand::Quit));
    assert_eq!(parse_form_command(&KeyCode::Char('Q')), Some(FormCommand::Quit));
    assert_eq!(parse_form_command(&KeyCode::Char('R')), Some(FormCommand::Rerun));
    assert_eq!(parse_form_command(&KeyCode::Char('j')), Some(FormCommand::ScrollRawDown));
    assert_eq!(parse_form_command(&KeyCode::Char('K')), Some(FormCommand::ScrollRawUp));
    assert_eq!(parse_form_command(&KeyCode::Esc), Some(FormCommand::Quit));
}

#[test]
fn parse_form_command_ignores_unbound_keys() {
    assert_eq!(parse_form_command(&KeyCode::Char('x')), None);
    assert_eq!(parse_form_command(&KeyCode::Enter), None);
    assert_eq!(parse_form_command(&KeyCode::F(1)), None);
}
