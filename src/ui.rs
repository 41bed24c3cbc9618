use crate::diary_entry::{DiaryEntry, EntryDraft};
use crate::diary_state::DiaryState;
use crate::mindfulness::Mindfulness;
use crate::photo::{self, PendingPick, Photo};
use crate::text_input::TextInput;
use crate::time_capsule::{describe_remaining, CapsuleDraft, CapsuleState};
use chrono::{DateTime, Local, NaiveDate};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use directories::BaseDirs;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::{
    fmt::Write as _,
    io::{stdout, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::warn;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const DEFAULT_DATE_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Diary,
    Mindfulness,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::Diary => 0,
            Tab::Mindfulness => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            Tab::Diary => Tab::Mindfulness,
            Tab::Mindfulness => Tab::Diary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwitchTab,
    PreviousDay,
    NextDay,
    PreviousWeek,
    NextWeek,
    Today,
    SelectDay(NaiveDate),
    AddEntry,
    ViewEntries,
    DeleteEntry,
    Tap,
    Speak,
    NewCapsule,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryField {
    Emotion,
    Text,
    Photo,
}

impl EntryField {
    fn next(self) -> Self {
        match self {
            EntryField::Emotion => EntryField::Text,
            EntryField::Text => EntryField::Photo,
            EntryField::Photo => EntryField::Emotion,
        }
    }

    fn previous(self) -> Self {
        self.next().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CapsuleField {
    Message,
    Photo,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tab: Tab,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            tab: Tab::Diary,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    pub fn switch_tab(&mut self) {
        self.tab = self.tab.other();
    }

    pub fn display(
        &mut self,
        diary: &DiaryState,
        mind: &Mindfulness,
        date_format: &str,
        now: DateTime<Local>,
    ) -> Result<()> {
        let tab = self.tab;
        self.terminal
            .draw(|f| draw_screen(f, tab, diary, mind, date_format, now))?;
        Ok(())
    }

    /// Waits briefly for a key so capsule countdowns keep refreshing.
    pub fn handle_input(&self, diary: &DiaryState) -> Result<Option<Action>> {
        if !event::poll(Duration::from_millis(250))? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        Ok(action_for(self.tab, &key, diary))
    }

    fn blink(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_cursor_update) >= Duration::from_millis(500) {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_update = now;
        }
    }

    /// Runs the "add entry" form. `None` means the form was cancelled.
    pub fn get_new_entry(&mut self, date: NaiveDate, date_format: &str) -> Result<Option<EntryDraft>> {
        let mut draft = EntryDraft::new(date);
        let mut focus = EntryField::Text;
        let mut pending: Option<PendingPick> = None;

        loop {
            settle_pending(&mut pending, &mut draft.photo);
            self.blink();
            let cursor_visible = self.cursor_visible;
            let loading = pending.is_some();
            self.terminal.draw(|f| {
                draw_entry_form(f, &draft, focus, cursor_visible, loading, date_format)
            })?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_done_key(&key) {
                finish_pending(pending.take(), &mut draft.photo);
                return Ok(Some(draft));
            }

            match (focus, key.code) {
                (_, KeyCode::Esc) => return Ok(None),
                (_, KeyCode::Tab) => focus = focus.next(),
                (_, KeyCode::BackTab) => focus = focus.previous(),
                (EntryField::Emotion, KeyCode::Left) => draft.emotion = draft.emotion.previous(),
                (EntryField::Emotion, KeyCode::Right) => draft.emotion = draft.emotion.next(),
                (EntryField::Text, _) => edit_text(&mut draft.text, &key),
                (EntryField::Photo, KeyCode::Enter | KeyCode::Char('p')) if !loading => {
                    let choice = self.prompt_photo_path()?;
                    pending = Some(photo::pick_photo(choice));
                }
                (EntryField::Photo, KeyCode::Backspace | KeyCode::Delete) => draft.photo = None,
                _ => {}
            }
        }
    }

    /// Runs the time-capsule form. `None` means the form was cancelled.
    pub fn get_new_capsule(&mut self) -> Result<Option<CapsuleDraft>> {
        let mut draft = CapsuleDraft::new();
        let mut focus = CapsuleField::Message;
        let mut pending: Option<PendingPick> = None;

        loop {
            settle_pending(&mut pending, &mut draft.photo);
            self.blink();
            let cursor_visible = self.cursor_visible;
            let loading = pending.is_some();
            self.terminal
                .draw(|f| draw_capsule_form(f, &draft, focus, cursor_visible, loading))?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_done_key(&key) {
                finish_pending(pending.take(), &mut draft.photo);
                return Ok(Some(draft));
            }

            match (focus, key.code) {
                (_, KeyCode::Esc) => return Ok(None),
                (CapsuleField::Message, KeyCode::Tab) => focus = CapsuleField::Photo,
                (CapsuleField::Photo, KeyCode::Tab | KeyCode::BackTab) => {
                    focus = CapsuleField::Message
                }
                (CapsuleField::Message, _) => edit_text(&mut draft.message, &key),
                (CapsuleField::Photo, KeyCode::Enter | KeyCode::Char('p')) if !loading => {
                    let choice = self.prompt_photo_path()?;
                    pending = Some(photo::pick_photo(choice));
                }
                (CapsuleField::Photo, KeyCode::Backspace | KeyCode::Delete) => draft.photo = None,
                _ => {}
            }
        }
    }

    /// Asks for an image path. Esc or an empty answer cancels the pick.
    fn prompt_photo_path(&mut self) -> Result<Option<PathBuf>> {
        let mut path = String::new();

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(1),
                    ])
                    .split(f.area());

                f.render_widget(title("Select Photo"), chunks[0]);

                let input = Paragraph::new(path.clone())
                    .block(Block::default().borders(Borders::ALL).title("Image path"));
                f.render_widget(input, chunks[1]);

                f.render_widget(instructions("Enter: Select, Esc: Cancel"), chunks[2]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Char(c) if is_typed(&key) => path.push(c),
                    KeyCode::Backspace => {
                        path.pop();
                    }
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }

        Ok(expand_home(path.trim()))
    }

    pub fn view_entries(&mut self, entries: &[DiaryEntry], date_format: &str) -> Result<()> {
        while let Some(index) = self.select_entry(
            entries,
            "View Entries",
            "Up/Down: Navigate, Enter: View full entry, Esc: Back",
            date_format,
        )? {
            self.view_full_entry(&entries[index], date_format)?;
        }
        Ok(())
    }

    pub fn select_entry_to_delete(
        &mut self,
        entries: &[DiaryEntry],
        date_format: &str,
    ) -> Result<Option<usize>> {
        self.select_entry(
            entries,
            "Select Entry to Delete",
            "Up/Down: Navigate, Enter: Delete, Esc: Cancel",
            date_format,
        )
    }

    fn select_entry(
        &mut self,
        entries: &[DiaryEntry],
        heading: &str,
        help: &str,
        date_format: &str,
    ) -> Result<Option<usize>> {
        if entries.is_empty() {
            return Ok(None);
        }
        let mut selected_index = 0;

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title(heading), chunks[0]);

                let width = chunks[1].width.saturating_sub(4) as usize;
                let items: Vec<ListItem> = entries
                    .iter()
                    .map(|e| entry_card(e, date_format, width))
                    .collect();
                let entries_list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("Entries"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");

                f.render_stateful_widget(
                    entries_list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                f.render_widget(instructions(help), chunks[2]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < entries.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter => return Ok(Some(selected_index)),
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }

    fn view_full_entry(&mut self, entry: &DiaryEntry, date_format: &str) -> Result<()> {
        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(
                    title(&format!(
                        "{} {} · {}",
                        entry.emotion.icon(),
                        entry.emotion,
                        format_date(entry.date, date_format)
                    )),
                    chunks[0],
                );

                let mut lines: Vec<Line> = entry.text.lines().map(Line::from).collect();
                if let Some(photo) = &entry.photo {
                    lines.push(Line::from(""));
                    lines.push(photo_line(photo));
                }
                let content = Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title("Entry"));
                f.render_widget(content, chunks[1]);

                f.render_widget(instructions("Esc: Back"), chunks[2]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    break;
                }
            }
        }

        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "failed to disable raw mode");
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            warn!(error = %e, "failed to leave alternate screen");
        }
    }
}

fn action_for(tab: Tab, key: &KeyEvent, diary: &DiaryState) -> Option<Action> {
    if !is_typed(key) {
        return None;
    }
    let has_entries = diary.has_entries(diary.selected_day());

    match (tab, key.code) {
        (_, KeyCode::Tab) => Some(Action::SwitchTab),
        (_, KeyCode::Char('q')) => Some(Action::Quit),
        (Tab::Diary, KeyCode::Left | KeyCode::Char('h')) => Some(Action::PreviousDay),
        (Tab::Diary, KeyCode::Right | KeyCode::Char('l')) => Some(Action::NextDay),
        (Tab::Diary, KeyCode::Up | KeyCode::Char('[')) => Some(Action::PreviousWeek),
        (Tab::Diary, KeyCode::Down | KeyCode::Char(']')) => Some(Action::NextWeek),
        (Tab::Diary, KeyCode::Char('t')) => Some(Action::Today),
        (Tab::Diary, KeyCode::Char(c @ '1'..='7')) => {
            let column = usize::from(c as u8 - b'1');
            Some(Action::SelectDay(diary.current_week().days()[column]))
        }
        (Tab::Diary, KeyCode::Char('a')) => Some(Action::AddEntry),
        (Tab::Diary, KeyCode::Char('v')) if has_entries => Some(Action::ViewEntries),
        (Tab::Diary, KeyCode::Char('d')) if has_entries => Some(Action::DeleteEntry),
        (Tab::Mindfulness, KeyCode::Char(' ') | KeyCode::Enter) => Some(Action::Tap),
        (Tab::Mindfulness, KeyCode::Char('s')) => Some(Action::Speak),
        (Tab::Mindfulness, KeyCode::Char('c')) => Some(Action::NewCapsule),
        _ => None,
    }
}

fn is_done_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::F(2))
        || (key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Plain or shifted keys. Ctrl and Alt chords are commands, never text.
fn is_typed(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn edit_text(input: &mut TextInput, key: &KeyEvent) {
    match key.code {
        KeyCode::Char(c) if is_typed(key) => input.insert(c),
        KeyCode::Enter => input.newline(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Up => input.up(),
        KeyCode::Down => input.down(),
        _ => {}
    }
}

fn settle_pending(pending: &mut Option<PendingPick>, slot: &mut Option<Photo>) {
    if let Some(result) = pending.as_mut().and_then(PendingPick::poll_ready) {
        *pending = None;
        photo::settle(result, slot);
    }
}

/// Blocks until an in-flight pick answers so a form closed mid-load keeps its photo.
fn finish_pending(pending: Option<PendingPick>, slot: &mut Option<Photo>) {
    if let Some(pick) = pending {
        photo::settle(futures::executor::block_on(pick.wait()), slot);
    }
}

/// `~/pics/a.png` → `$HOME/pics/a.png`. Empty input means no choice.
fn expand_home(path: &str) -> Option<PathBuf> {
    if path.is_empty() {
        return None;
    }
    match (path.strip_prefix("~/"), BaseDirs::new()) {
        (Some(rest), Some(base)) => Some(base.home_dir().join(rest)),
        _ => Some(PathBuf::from(path)),
    }
}

/// Formats with the user's pattern, falling back to the default on a bad pattern.
fn format_date(date: NaiveDate, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Cuts `s` to at most `max` terminal columns, marking the cut with `…`.
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn title(text: &str) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn instructions(text: &str) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn key_hint(parts: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("Press ")];
    for (i, (key, what)) in parts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {what}")));
    }
    Line::from(spans)
}

fn photo_line(photo: &Photo) -> Line<'static> {
    Line::from(Span::styled(
        format!("📷 {}", photo.describe()),
        Style::default().fg(Color::Gray),
    ))
}

fn entry_card(entry: &DiaryEntry, date_format: &str, width: usize) -> ListItem<'static> {
    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", entry.emotion.icon())),
            Span::styled(
                format_date(entry.date, date_format),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" · {}", entry.emotion)),
        ]),
        Line::from(truncate_to_width(entry.headline(), width)),
    ];
    if let Some(photo) = &entry.photo {
        lines.push(photo_line(photo));
    }
    lines.push(Line::from(""));
    ListItem::new(lines).style(Style::default().fg(Color::White).bg(Color::Magenta))
}

fn draw_screen(
    f: &mut Frame,
    tab: Tab,
    diary: &DiaryState,
    mind: &Mindfulness,
    date_format: &str,
    now: DateTime<Local>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.area());

    let tabs = Tabs::new(vec!["✎ Diary", "🧠 Mindfulness"])
        .select(tab.index())
        .block(Block::default().borders(Borders::ALL).title("Mindful Diary"))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    match tab {
        Tab::Diary => draw_diary(f, chunks[1], diary, date_format),
        Tab::Mindfulness => draw_mindfulness(f, chunks[1], mind, date_format, now),
    }
}

fn draw_diary(f: &mut Frame, area: Rect, diary: &DiaryState, date_format: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    f.render_widget(title(&format_date(diary.selected_day(), date_format)), chunks[0]);

    let week = diary.current_week();
    let columns = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(chunks[1]);
    for ((day, label), column) in week.days().iter().zip(week.labels()).zip(columns.iter()) {
        let selected = *day == diary.selected_day();
        let number_style = if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let marker = if diary.has_entries(*day) { "•" } else { " " };
        let cell = Paragraph::new(vec![
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(Span::styled(format!(" {} ", day.format("%-d")), number_style)),
            Line::from(marker),
        ])
        .alignment(Alignment::Center);
        f.render_widget(cell, *column);
    }

    let entries = diary.entries_on(diary.selected_day());
    if entries.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No entries for this day.",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(Block::default().borders(Borders::ALL).title("Entries"));
        f.render_widget(empty, chunks[2]);
    } else {
        let width = chunks[2].width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = entries
            .iter()
            .map(|e| entry_card(e, date_format, width))
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Entries ({})", entries.len())),
        );
        f.render_widget(list, chunks[2]);
    }

    let controls = if entries.is_empty() {
        key_hint(&[
            ("←/→", "day"),
            ("↑/↓", "week"),
            ("1-7", "pick"),
            ("t", "today"),
            ("a", "add"),
            ("q", "quit"),
        ])
    } else {
        key_hint(&[
            ("←/→", "day"),
            ("↑/↓", "week"),
            ("1-7", "pick"),
            ("t", "today"),
            ("a", "add"),
            ("v", "view"),
            ("d", "delete"),
            ("q", "quit"),
        ])
    };
    f.render_widget(
        Paragraph::new(controls)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center),
        chunks[3],
    );
}

fn draw_mindfulness(
    f: &mut Frame,
    area: Rect,
    mind: &Mindfulness,
    date_format: &str,
    now: DateTime<Local>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    let breathe = Paragraph::new(vec![
        Line::from(""),
        Line::from("( ◡‿◡ )"),
        Line::from(""),
        Line::from(Span::styled(
            "press space and breathe",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(breathe, chunks[0]);

    if let Some(message) = mind.message() {
        let message = Paragraph::new(Span::styled(
            message,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        f.render_widget(message, chunks[1]);
    }

    let mut lines: Vec<Line> = Vec::new();
    for (capsule, state) in mind.capsules.states(&now) {
        match state {
            CapsuleState::Locked { remaining } => {
                lines.push(Line::from(Span::styled(
                    "🔒 Time capsule locked",
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!(
                    "   Unlocks {} ({})",
                    format_date(capsule.unlock_at.date_naive(), date_format),
                    describe_remaining(remaining)
                )));
            }
            CapsuleState::Unlocked => {
                lines.push(Line::from(Span::styled(
                    "🔓 Time capsule unlocked!",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.extend(capsule.message.lines().map(|l| Line::from(format!("   {l}"))));
                if let Some(photo) = &capsule.photo {
                    lines.push(photo_line(photo));
                }
            }
        }
        lines.push(Line::from(""));
    }
    if mind.capsules.is_empty() {
        lines.push(Line::from(Span::styled(
            "No time capsules yet.",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    let capsules = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Time capsules ({})", mind.capsules.len())),
        );
    f.render_widget(capsules, chunks[2]);

    let controls = if mind.can_speak() {
        key_hint(&[("space", "for a message"), ("s", "to hear it"), ("c", "for a time capsule"), ("q", "to quit")])
    } else {
        key_hint(&[("space", "for a message"), ("c", "for a time capsule"), ("q", "to quit")])
    };
    f.render_widget(
        Paragraph::new(controls)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center),
        chunks[3],
    );
}

fn field_block(name: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(name.to_string())
}

fn photo_field(photo: Option<&Photo>, loading: bool, focused: bool, label: &str) -> Paragraph<'static> {
    let text = match (photo, loading) {
        (_, true) => "Loading photo…".to_string(),
        (Some(p), false) => format!("📷 {}", p.describe()),
        (None, false) => format!("Press Enter to {label}"),
    };
    Paragraph::new(text).block(field_block("Photo", focused))
}

fn draw_entry_form(
    f: &mut Frame,
    draft: &EntryDraft,
    focus: EntryField,
    cursor_visible: bool,
    loading: bool,
    date_format: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    f.render_widget(
        title(&format!("Add Entry for {}", format_date(draft.date(), date_format))),
        chunks[0],
    );

    let mut emotions = Vec::new();
    for emotion in crate::emotion::Emotion::ALL {
        let style = if emotion == draft.emotion {
            Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        emotions.push(Span::styled(format!(" {} {} ", emotion.icon(), emotion), style));
        emotions.push(Span::raw(" "));
    }
    f.render_widget(
        Paragraph::new(Line::from(emotions))
            .alignment(Alignment::Center)
            .block(field_block("Emotion (←/→)", focus == EntryField::Emotion)),
        chunks[1],
    );

    let text = draft
        .text
        .with_cursor(cursor_visible && focus == EntryField::Text);
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(field_block("Text", focus == EntryField::Text)),
        chunks[2],
    );

    f.render_widget(
        photo_field(draft.photo.as_ref(), loading, focus == EntryField::Photo, "select a photo"),
        chunks[3],
    );

    f.render_widget(
        instructions("Tab: Next field, Ctrl+S/F2: Done, Esc: Cancel"),
        chunks[4],
    );
}

fn draw_capsule_form(
    f: &mut Frame,
    draft: &CapsuleDraft,
    focus: CapsuleField,
    cursor_visible: bool,
    loading: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    f.render_widget(title("Time capsule · opens in one year"), chunks[0]);

    let message = draft
        .message
        .with_cursor(cursor_visible && focus == CapsuleField::Message);
    f.render_widget(
        Paragraph::new(message)
            .wrap(Wrap { trim: false })
            .block(field_block("Message to your future self", focus == CapsuleField::Message)),
        chunks[1],
    );

    f.render_widget(
        photo_field(draft.photo.as_ref(), loading, focus == CapsuleField::Photo, "add a picture"),
        chunks[2],
    );

    f.render_widget(
        instructions("Tab: Next field, Ctrl+S/F2: Done, Esc: Cancel"),
        chunks[3],
    );
}
