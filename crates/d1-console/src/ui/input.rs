use super::*;

pub(super) fn handle_key(key: KeyEvent, state: &mut ConsoleState) -> anyhow::Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if state.no_input {
        return Ok(matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')));
    }

    if state.latch_input.editing {
        return handle_latch_key(key, state);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Char('o') | KeyCode::Char('O') => {
            let latch_ms = state.latch_input.millis();
            state.controller.set_state(Command::On, latch_ms, Instant::now());
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            let latch_ms = state.latch_input.millis();
            state
                .controller
                .set_state(Command::Off, latch_ms, Instant::now());
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            let latch_ms = state.latch_input.millis();
            state
                .controller
                .set_state(Command::Toggle, latch_ms, Instant::now());
        }
        KeyCode::Char('r') | KeyCode::Char('R') => state.controller.refresh(),
        KeyCode::Char('l') | KeyCode::Char('L') => state.latch_input.begin_edit(),
        _ => {}
    }
    Ok(false)
}

fn handle_latch_key(key: KeyEvent, state: &mut ConsoleState) -> anyhow::Result<bool> {
    match key.code {
        KeyCode::Esc => state.latch_input.cancel(),
        KeyCode::Enter => state.latch_input.commit(),
        KeyCode::Backspace => state.latch_input.backspace(),
        KeyCode::Char(ch) => state.latch_input.push_char(ch),
        _ => {}
    }
    Ok(false)
}
