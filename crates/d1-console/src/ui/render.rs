use super::*;

pub(super) fn render_console(area: Rect, frame: &mut ratatui::Frame<'_>, state: &ConsoleState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    render_status_panel(layout[0], frame, state);
    render_controls_panel(layout[1], frame, state);
    render_log_panel(layout[2], frame, state);
    render_hint_line(layout[3], frame, state);
}

fn render_status_panel(area: Rect, frame: &mut ratatui::Frame<'_>, state: &ConsoleState) {
    let controller = &state.controller;
    let chip = status_chip(controller.status());
    let mut lines = vec![Line::from(vec![
        Span::styled(chip.0, chip.1),
        Span::raw(" "),
        Span::styled(controller.status().text(), value_style()),
    ])];
    lines.push(Line::from(vec![
        Span::styled("Device   ", label_style()),
        Span::styled(controller.endpoint_base().to_string(), value_style()),
    ]));
    if let Some(remaining) = controller.latch_remaining(Instant::now()) {
        lines.push(Line::from(vec![
            Span::styled("Latch    ", label_style()),
            Span::styled(
                format!("reverts in {}s", remaining.as_secs().max(1)),
                Style::default().fg(COLOR_AMBER),
            ),
        ]));
    } else if let Some(seconds) = controller.device_latch_seconds() {
        lines.push(Line::from(vec![
            Span::styled("Latch    ", label_style()),
            Span::styled(format!("device period {seconds}s"), value_style()),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(panel_block("Status")), area);
}

fn render_controls_panel(area: Rect, frame: &mut ratatui::Frame<'_>, state: &ConsoleState) {
    let controller = &state.controller;
    let synced = controller.synced();
    let buttons = Line::from(vec![
        button_cell("On", synced && controller.last_state() == PinState::On),
        Span::raw("   "),
        button_cell("Off", synced && controller.last_state() == PinState::Off),
    ]);
    let mut latch_spans = vec![
        Span::styled("Latch seconds: ", label_style()),
        Span::styled(state.latch_input.display().to_string(), value_style()),
    ];
    if state.latch_input.editing {
        latch_spans.push(Span::styled(
            "_",
            Style::default().fg(COLOR_TEAL).add_modifier(Modifier::BOLD),
        ));
        latch_spans.push(Span::styled(
            "  (Enter to apply, Esc to cancel)",
            Style::default().fg(COLOR_INFO),
        ));
    }
    frame.render_widget(
        Paragraph::new(vec![buttons, Line::from(latch_spans)]).block(panel_block("Controls")),
        area,
    );
}

fn render_log_panel(area: Rect, frame: &mut ratatui::Frame<'_>, state: &ConsoleState) {
    let block = panel_block("Debug log");
    let inner_height = area.height.saturating_sub(2) as usize;
    let log = state.controller.log();
    let lines: Vec<Line<'_>> = if log.is_empty() {
        vec![Line::from(Span::styled(
            LOG_PLACEHOLDER,
            Style::default().fg(COLOR_INFO).add_modifier(Modifier::DIM),
        ))]
    } else {
        log.tail(inner_height)
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), value_style())))
            .collect()
    };
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_hint_line(area: Rect, frame: &mut ratatui::Frame<'_>, state: &ConsoleState) {
    let hint = if state.no_input {
        "Read-only mode  q quit"
    } else if state.latch_input.editing {
        "Type digits  Enter apply  Esc cancel"
    } else {
        "o On  f Off  t Toggle  r Refresh  l Latch  q Quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(COLOR_INFO).add_modifier(Modifier::DIM),
        ))),
        area,
    );
}
