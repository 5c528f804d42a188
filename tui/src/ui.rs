//! Drawing the record screen.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use moodping_engine::moodping_core::{DEFAULT_EMOTIONS, ResultPanel, Section};
use moodping_engine::moodping_types::{Intensity, NOTE_MAX_CHARS};

use crate::labels::{Labels, emotion_label, labels};
use crate::markup::markup_to_lines;
use crate::screen::{Focus, Screen};
use crate::theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

const NOTE_HEIGHT: u16 = 7;

pub fn draw(frame: &mut Frame, screen: &Screen) {
    let options = screen.options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let labels = labels(screen.locale());

    let bg_block = Block::default().style(Style::default().bg(palette.bg));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),           // Emotions
            Constraint::Length(4),           // Intensity
            Constraint::Length(NOTE_HEIGHT), // Note + submit
            Constraint::Min(4),              // Result
            Constraint::Length(1),           // Key hints
        ])
        .split(frame.area());

    draw_emotions(frame, screen, chunks[0], &palette, &glyphs, labels);
    draw_intensity(frame, screen, chunks[1], &palette, &glyphs, labels);
    draw_note(frame, screen, chunks[2], &palette, labels);
    draw_result(frame, screen, chunks[3], &palette, labels);
    draw_hints(frame, chunks[4], &palette, labels);

    if let Some(message) = screen.alert() {
        draw_alert(frame, message, &palette, labels);
    }
}

fn section_block<'a>(title: &'a str, active: bool, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::section_border(palette, active))
        .style(Style::default().bg(palette.bg_panel))
        .title(Line::from(Span::styled(
            format!(" {title} "),
            styles::section_title(palette, active),
        )))
}

fn cursor_span(focused: bool, glyphs: &Glyphs) -> Span<'static> {
    if focused {
        Span::raw(glyphs.cursor)
    } else {
        Span::raw(" ".repeat(glyphs.cursor.width()))
    }
}

fn draw_emotions(
    frame: &mut Frame,
    screen: &Screen,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    labels: &Labels,
) {
    let snapshot = screen.snapshot();
    let active = snapshot.is_active(Section::Emoji);
    let row_focused = screen.focus() == Focus::Emotion;
    let selected_code = snapshot.selected_emotion.as_ref().map(|e| e.as_str());

    let mut spans = Vec::new();
    for (idx, option) in DEFAULT_EMOTIONS.iter().enumerate() {
        let focused = row_focused && idx == screen.emotion_cursor();
        let selected = selected_code == Some(option.code);
        let marker = if selected {
            glyphs.selected
        } else {
            glyphs.unselected
        };
        let label = emotion_label(option, screen.locale());
        let text = if glyphs.show_emoji {
            format!("{marker} {} {label}", option.emoji)
        } else {
            format!("{marker} {label}")
        };

        spans.push(cursor_span(focused, glyphs));
        spans.push(Span::styled(
            text,
            styles::option(palette, active, selected, focused),
        ));
        spans.push(Span::raw("  "));
    }

    let row = Paragraph::new(Line::from(spans))
        .block(section_block(labels.emotion_title, active, palette));
    frame.render_widget(row, area);
}

fn draw_intensity(
    frame: &mut Frame,
    screen: &Screen,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    labels: &Labels,
) {
    let snapshot = screen.snapshot();
    let active = snapshot.is_active(Section::Intensity);
    let row_focused = active && screen.focus() == Focus::Intensity;

    let mut spans = Vec::new();
    for (idx, level) in Intensity::all().enumerate() {
        let focused = row_focused && idx == screen.intensity_cursor();
        let filled = snapshot
            .selected_intensity
            .is_some_and(|chosen| level <= chosen);
        let marker = if filled {
            glyphs.level_filled
        } else {
            glyphs.level_empty
        };
        let selected = snapshot.selected_intensity == Some(level);

        spans.push(cursor_span(focused, glyphs));
        spans.push(Span::styled(
            format!("{marker} {level}"),
            styles::option(palette, active, selected, focused),
        ));
        spans.push(Span::raw("   "));
    }

    let scale_style = if active {
        Style::default().fg(palette.text_muted)
    } else {
        Style::default().fg(palette.text_disabled)
    };
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!("1 = {}  5 = {}", labels.intensity_low, labels.intensity_high),
            scale_style,
        )),
    ];

    let row = Paragraph::new(lines).block(section_block(labels.intensity_title, active, palette));
    frame.render_widget(row, area);
}

fn draw_note(frame: &mut Frame, screen: &Screen, area: Rect, palette: &Palette, labels: &Labels) {
    let snapshot = screen.snapshot();
    let active = snapshot.is_active(Section::Note);
    let note_focused = active && screen.focus() == Focus::Note;

    let block = section_block(labels.note_title, active, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let text_style = if active {
        Style::default().fg(palette.text_primary)
    } else {
        Style::default().fg(palette.text_disabled)
    };

    let mut lines: Vec<Line> = if screen.note().is_empty() && !note_focused {
        vec![Line::from(Span::styled(
            labels.note_placeholder,
            Style::default()
                .fg(palette.text_disabled)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        screen
            .note()
            .split('\n')
            .map(|line| Line::from(Span::styled(line.to_string(), text_style)))
            .collect()
    };
    if note_focused && let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled("_", Style::default().fg(palette.accent)));
    }

    // Keep the end of long notes in view.
    let visible = usize::from(parts[0].height.max(1));
    let skip = lines.len().saturating_sub(visible);
    let note = Paragraph::new(lines.split_off(skip)).wrap(Wrap { trim: false });
    frame.render_widget(note, parts[0]);

    let submit_enabled = active && screen.submit_available();
    let submit_focused = active && screen.focus() == Focus::Submit;
    let counter = format!("{}/{NOTE_MAX_CHARS}", screen.note().chars().count());
    let submit = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("[ {} ]", labels.submit),
            styles::button(palette, submit_enabled, submit_focused),
        ),
        Span::raw("  "),
        Span::styled(counter, Style::default().fg(palette.text_muted)),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(submit, parts[1]);
}

fn draw_result(frame: &mut Frame, screen: &Screen, area: Rect, palette: &Palette, labels: &Labels) {
    let snapshot = screen.snapshot();
    let visible = snapshot.result.is_visible();
    let block = section_block(labels.result_title, visible, palette);

    let lines: Vec<Line> = match &snapshot.result {
        ResultPanel::Hidden => Vec::new(),
        ResultPanel::Loading => vec![Line::from(vec![
            Span::styled(
                spinner_frame(screen.tick(), screen.options()),
                Style::default().fg(palette.accent),
            ),
            Span::raw(" "),
            Span::styled(labels.loading, Style::default().fg(palette.text_muted)),
        ])],
        ResultPanel::Ready { markup } => {
            let mut lines = markup_to_lines(markup, Style::default().fg(palette.text_primary));
            lines.push(Line::from(""));
            lines.push(
                Line::from(Span::styled(
                    format!("[ {} ]", labels.confirm),
                    styles::button(palette, true, screen.focus() == Focus::Confirm),
                ))
                .alignment(Alignment::Right),
            );
            lines
        }
    };

    let result = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(result, area);
}

fn draw_hints(frame: &mut Frame, area: Rect, palette: &Palette, labels: &Labels) {
    let key = styles::key_highlight(palette);
    let hint = styles::key_hint(palette);
    let line = Line::from(vec![
        Span::styled("Tab", key),
        Span::styled(format!(" {}  ", labels.hint_move), hint),
        Span::styled("Enter", key),
        Span::styled(format!(" {}  ", labels.hint_select), hint),
        Span::styled("Esc", key),
        Span::styled(format!(" {}", labels.hint_quit), hint),
        Span::styled(format!("   {}", labels.app_title), hint),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_alert(frame: &mut Frame, message: &str, palette: &Palette, labels: &Labels) {
    let area = frame.area();
    let content_width = message.width().max(labels.alert_dismiss.width()) as u16;
    let width = (content_width + 6).min(area.width.saturating_sub(4)).max(10);
    let height = 6.min(area.height);

    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.error))
        .style(Style::default().bg(palette.bg_popup))
        .title(Line::from(Span::styled(
            format!(" {} ", labels.alert_title),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        Line::from(Span::styled(
            labels.alert_dismiss,
            Style::default().fg(palette.text_muted),
        )),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rect,
    );
}
