//! TUI module - full-screen training dashboard with ratatui
//!
//! One screen: day tabs on top, the day's exercises on the left, the
//! selected exercise (history + input form) on the right. Overlays for
//! weekly volume and the three AI coach surfaces. Coach requests run on a
//! background thread and report back over a channel; everything else is
//! synchronous against the in-memory state.

pub mod confirm;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::{Stdout, stdout};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::ai::{AiError, Alternative, CoachClient, Tutorial, WarmupPlan};
use crate::catalog::{self, Exercise};
use crate::entry::{self, EntryError, Field, LogEntry, LogMode, SetData};
use crate::ordering::Direction as MoveDir;
use crate::state::AppState;
use confirm::Confirm;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Which overlay sits on top of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    Volume,
    Warmup,
    Tutorial,
    Alternatives,
}

/// Lifecycle of one coach surface: a failure is terminal until the user
/// triggers the request again
enum Request<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Request<T> {
    fn is_loading(&self) -> bool {
        matches!(self, Request::Loading)
    }
}

fn into_request<T>(result: std::result::Result<T, AiError>) -> Request<T> {
    match result {
        Ok(value) => Request::Ready(value),
        Err(e) => Request::Failed(e.to_string()),
    }
}

/// Outcome of a background coach request, tagged with its target so a
/// stale completion can be dropped
enum CoachEvent {
    Alternatives(String, std::result::Result<Vec<Alternative>, AiError>),
    Tutorial(String, std::result::Result<Tutorial, AiError>),
    Warmup(String, std::result::Result<WarmupPlan, AiError>),
}

/// In-progress input for the selected exercise card
struct Editor {
    mode: LogMode,
    sets_field: String,
    reps_field: String,
    kg_field: String,
    dynamic: Vec<SetData>,
    note: String,
    focus: usize,
    custom_name: Option<String>,
}

impl Editor {
    /// Fresh editor; a prior entry decides the starting mode
    fn for_exercise(last: Option<&LogEntry>) -> Self {
        Self {
            mode: last.map(|e| e.mode).unwrap_or_default(),
            sets_field: String::new(),
            reps_field: String::new(),
            kg_field: String::new(),
            dynamic: vec![SetData::default()],
            note: String::new(),
            focus: 0,
            custom_name: None,
        }
    }

    /// Switching granularity discards the other mode's unsaved input
    fn toggle_mode(&mut self) {
        match self.mode {
            LogMode::Standard => {
                self.sets_field.clear();
                self.reps_field.clear();
                self.kg_field.clear();
                self.mode = LogMode::Dynamic;
            }
            LogMode::Dynamic => {
                self.dynamic = vec![SetData::default()];
                self.mode = LogMode::Standard;
            }
        }
        self.focus = 0;
    }

    fn field_count(&self) -> usize {
        match self.mode {
            LogMode::Standard => 4,
            LogMode::Dynamic => self.dynamic.len() * 2 + 1,
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.field_count();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + self.field_count() - 1) % self.field_count();
    }

    fn note_focused(&self) -> bool {
        self.focus == self.field_count() - 1
    }

    /// Set row the focus sits on (dynamic mode)
    fn focused_set(&self) -> Option<usize> {
        if self.mode == LogMode::Dynamic && !self.note_focused() {
            Some(self.focus / 2)
        } else {
            None
        }
    }

    fn focused_buffer(&mut self) -> &mut String {
        match self.mode {
            LogMode::Standard => match self.focus {
                0 => &mut self.sets_field,
                1 => &mut self.reps_field,
                2 => &mut self.kg_field,
                _ => &mut self.note,
            },
            LogMode::Dynamic => {
                if self.note_focused() {
                    &mut self.note
                } else {
                    let set = &mut self.dynamic[self.focus / 2];
                    if self.focus % 2 == 0 { &mut set.reps } else { &mut set.kg }
                }
            }
        }
    }

    /// New row prefilled from the one above it
    fn add_set(&mut self) {
        if self.mode != LogMode::Dynamic {
            return;
        }
        let template = self.dynamic.last().cloned().unwrap_or_default();
        self.dynamic.push(template);
        self.focus = (self.dynamic.len() - 1) * 2;
    }

    /// Drop the focused row; the last row always stays
    fn remove_set(&mut self) {
        if self.mode != LogMode::Dynamic || self.dynamic.len() <= 1 {
            return;
        }
        let row = self.focused_set().unwrap_or(self.dynamic.len() - 1);
        self.dynamic.remove(row.min(self.dynamic.len() - 1));
        self.focus = self.focus.min(self.field_count() - 1);
    }

    fn build(&self) -> std::result::Result<LogEntry, EntryError> {
        match self.mode {
            LogMode::Standard => entry::build_standard(
                &self.sets_field,
                &self.reps_field,
                &self.kg_field,
                &self.note,
            ),
            LogMode::Dynamic => entry::build_dynamic(&self.dynamic, &self.note),
        }
    }
}

/// App state for the TUI
pub struct App {
    state: AppState,
    selected: usize,
    reordering: bool,
    editing: bool,
    editor: Editor,
    overlay: Overlay,

    // Alternatives search
    query: String,
    alt_cursor: Option<usize>,
    alternatives: Request<Vec<Alternative>>,
    alternatives_for: Option<String>,

    // Tutorial (cached per exercise until the selection changes)
    tutorial: Request<Tutorial>,
    tutorial_for: Option<String>,

    // Warm-up plan (refetched on every open)
    warmup: Request<WarmupPlan>,
    warmup_for: Option<String>,

    delete_confirm: Confirm,
    reset_confirm: Confirm,
    status: Option<String>,

    events_tx: mpsc::Sender<CoachEvent>,
    events_rx: mpsc::Receiver<CoachEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(state: AppState) -> Result<Self> {
        let (events_tx, events_rx) = mpsc::channel();
        Ok(Self {
            state,
            selected: 0,
            reordering: false,
            editing: false,
            editor: Editor::for_exercise(None),
            overlay: Overlay::None,
            query: String::new(),
            alt_cursor: None,
            alternatives: Request::Idle,
            alternatives_for: None,
            tutorial: Request::Idle,
            tutorial_for: None,
            warmup: Request::Idle,
            warmup_for: None,
            delete_confirm: Confirm::new(),
            reset_confirm: Confirm::new(),
            status: None,
            events_tx,
            events_rx,
            should_quit: false,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            self.tick();
        }

        restore_terminal()?;
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.status = None;
            if self.overlay != Overlay::None {
                self.handle_overlay_key(key);
            } else if self.editing {
                self.handle_editor_key(key);
            } else {
                self.handle_browse_key(key);
            }
        }
        Ok(())
    }

    /// Expire stale confirmations and drain finished coach requests
    fn tick(&mut self) {
        let now = Instant::now();
        self.delete_confirm.tick(now);
        self.reset_confirm.tick(now);

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                CoachEvent::Alternatives(id, result) => {
                    if self.alternatives_for.as_deref() == Some(&id) {
                        self.alternatives = into_request(result);
                        self.alt_cursor = None;
                    }
                }
                CoachEvent::Tutorial(id, result) => {
                    if self.tutorial_for.as_deref() == Some(&id) {
                        self.tutorial = into_request(result);
                    }
                }
                CoachEvent::Warmup(day, result) => {
                    if self.warmup_for.as_deref() == Some(&day) {
                        self.warmup = into_request(result);
                    }
                }
            }
        }
    }

    fn selected_exercise(&self) -> Option<&'static Exercise> {
        self.state.active_exercises().get(self.selected).copied()
    }

    fn day_index(&self) -> usize {
        catalog::WEEK_DAYS
            .iter()
            .position(|d| d.id == self.state.active_day)
            .unwrap_or(0)
    }

    /// Day switch: leaves reorder mode and drops per-card UI state
    fn select_day_at(&mut self, index: usize) {
        let day = &catalog::WEEK_DAYS[index % catalog::WEEK_DAYS.len()];
        self.state.select_day(day.id);
        self.selected = 0;
        self.reordering = false;
        self.editing = false;
        self.delete_confirm.disarm();
        self.tutorial = Request::Idle;
        self.tutorial_for = None;
        self.alternatives = Request::Idle;
        self.alternatives_for = None;
        self.alt_cursor = None;
        self.query.clear();
        self.warmup = Request::Idle;
        self.warmup_for = None;
    }

    fn shift_day(&mut self, delta: isize) {
        let len = catalog::WEEK_DAYS.len() as isize;
        let next = (self.day_index() as isize + delta + len) % len;
        self.select_day_at(next as usize);
    }

    // -----------------------------------------------------------------------
    // Key handling
    // -----------------------------------------------------------------------

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let exercises = self.state.active_exercises();
        let is_rest = exercises.is_empty();

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::BackTab => self.shift_day(-1),
            KeyCode::Right | KeyCode::Tab => self.shift_day(1),
            KeyCode::Char(c @ '1'..='7') => {
                let index = c as usize - '1' as usize;
                self.select_day_at(index);
            }
            KeyCode::Up => {
                if self.reordering {
                    if self.state.move_exercise(self.selected, MoveDir::Up) {
                        self.selected -= 1;
                    }
                } else if self.selected > 0 {
                    self.selected -= 1;
                    self.on_selection_changed();
                }
            }
            KeyCode::Down => {
                if self.reordering {
                    if self.state.move_exercise(self.selected, MoveDir::Down) {
                        self.selected += 1;
                    }
                } else if self.selected + 1 < exercises.len() {
                    self.selected += 1;
                    self.on_selection_changed();
                }
            }
            KeyCode::Char('r') if !is_rest => {
                self.reordering = !self.reordering;
                self.delete_confirm.disarm();
            }
            KeyCode::Char('v') => self.overlay = Overlay::Volume,
            KeyCode::Char('w') if !is_rest => self.open_warmup(),
            KeyCode::Char('t') if !is_rest => self.open_tutorial(),
            KeyCode::Char('a') if !is_rest => self.open_alternatives(),
            KeyCode::Char('d') if !is_rest => self.quick_undo(),
            KeyCode::Char('x') => {
                if self.reset_confirm.trigger(Instant::now()) {
                    self.state.reset_all();
                    self.selected = 0;
                    self.reordering = false;
                    self.status = Some("Dati azzerati.".to_string());
                } else {
                    self.status =
                        Some("Premere di nuovo 'x' per azzerare TUTTI i dati.".to_string());
                }
            }
            KeyCode::Enter | KeyCode::Char('e') if !is_rest && !self.reordering => {
                self.open_editor();
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('t') => self.editor.toggle_mode(),
                KeyCode::Char('a') => self.editor.add_set(),
                KeyCode::Char('x') => self.editor.remove_set(),
                KeyCode::Char('r') => self.revert_swap(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.editing = false,
            KeyCode::Tab | KeyCode::Down => self.editor.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.editor.prev_field(),
            KeyCode::Enter => self.save_entry(),
            KeyCode::Backspace => {
                let _ = self.editor.focused_buffer().pop();
            }
            KeyCode::Char(c) => self.editor.focused_buffer().push(c),
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        if self.overlay != Overlay::Alternatives {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
                self.overlay = Overlay::None;
            }
            return;
        }

        // Alternatives: a query line plus a selectable result list
        match key.code {
            KeyCode::Esc => {
                if self.alt_cursor.is_some() {
                    self.alt_cursor = None;
                } else {
                    self.overlay = Overlay::None;
                }
            }
            KeyCode::Enter => match self.alt_cursor {
                Some(i) => {
                    if let Request::Ready(alts) = &self.alternatives
                        && let Some(alt) = alts.get(i).cloned()
                    {
                        self.apply_alternative(alt);
                    }
                }
                None => self.spawn_alternatives(),
            },
            KeyCode::Down => {
                if let Request::Ready(alts) = &self.alternatives
                    && !alts.is_empty()
                {
                    self.alt_cursor = Some(match self.alt_cursor {
                        Some(i) => (i + 1).min(alts.len() - 1),
                        None => 0,
                    });
                }
            }
            KeyCode::Up => {
                self.alt_cursor = match self.alt_cursor {
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                };
            }
            KeyCode::Backspace => {
                if self.alt_cursor.is_none() {
                    let _ = self.query.pop();
                }
            }
            KeyCode::Char(c) => {
                if self.alt_cursor.is_none() {
                    self.query.push(c);
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    fn on_selection_changed(&mut self) {
        self.editing = false;
        self.delete_confirm.disarm();
        self.tutorial = Request::Idle;
        self.tutorial_for = None;
        self.alternatives = Request::Idle;
        self.alternatives_for = None;
        self.alt_cursor = None;
        self.query.clear();
    }

    fn open_editor(&mut self) {
        let Some(exercise) = self.selected_exercise() else {
            return;
        };
        self.editor = Editor::for_exercise(self.state.log_for(exercise.id));
        self.editing = true;
    }

    fn save_entry(&mut self) {
        let Some(exercise) = self.selected_exercise() else {
            return;
        };
        match self.editor.build() {
            Ok(entry) => {
                self.state.save_log(exercise.id, entry);
                self.editing = false;
                self.status = Some("Sessione salvata.".to_string());
            }
            Err(EntryError::IncompleteInput) => {
                self.status =
                    Some("Inserisci Serie, Ripetizioni e Carico per salvare.".to_string());
            }
            Err(EntryError::NoValidSets) => {
                self.status = Some("Inserisci almeno una serie valida.".to_string());
            }
        }
    }

    /// Same-day quick-undo behind the two-phase confirmation
    fn quick_undo(&mut self) {
        let Some(exercise) = self.selected_exercise() else {
            return;
        };
        let Some(log) = self.state.log_for(exercise.id) else {
            return;
        };
        if !log.logged_today() {
            self.status = Some("Solo la sessione di oggi può essere annullata.".to_string());
            return;
        }
        if self.delete_confirm.trigger(Instant::now()) {
            self.state.remove_log(exercise.id);
            self.status = Some("Sessione di oggi eliminata.".to_string());
        } else {
            self.status = Some("Sicuro? Premere di nuovo 'd' per eliminare.".to_string());
        }
    }

    fn open_tutorial(&mut self) {
        let Some(exercise) = self.selected_exercise() else {
            return;
        };
        self.overlay = Overlay::Tutorial;

        // cached guide for this exercise: just show it again
        if self.tutorial_for.as_deref() == Some(exercise.id)
            && matches!(self.tutorial, Request::Ready(_) | Request::Loading)
        {
            return;
        }

        let id = exercise.id.to_string();
        let name = exercise.name.to_string();
        self.tutorial_for = Some(id.clone());
        match CoachClient::from_env() {
            Err(e) => self.tutorial = Request::Failed(e.to_string()),
            Ok(client) => {
                self.tutorial = Request::Loading;
                let tx = self.events_tx.clone();
                std::thread::spawn(move || {
                    let result = client.tutorial(&name);
                    let _ = tx.send(CoachEvent::Tutorial(id, result));
                });
            }
        }
    }

    fn open_alternatives(&mut self) {
        let Some(exercise) = self.selected_exercise() else {
            return;
        };
        self.overlay = Overlay::Alternatives;
        if self.alternatives_for.as_deref() != Some(exercise.id) {
            self.alternatives = Request::Idle;
            self.alternatives_for = Some(exercise.id.to_string());
            self.query = format!("Alternativa a {}", exercise.name);
            self.alt_cursor = None;
        }
    }

    fn spawn_alternatives(&mut self) {
        if self.alternatives.is_loading() || self.query.is_empty() {
            return;
        }
        let Some(exercise) = self.selected_exercise() else {
            return;
        };

        let id = exercise.id.to_string();
        self.alternatives_for = Some(id.clone());
        match CoachClient::from_env() {
            Err(e) => self.alternatives = Request::Failed(e.to_string()),
            Ok(client) => {
                self.alternatives = Request::Loading;
                self.alt_cursor = None;
                let tx = self.events_tx.clone();
                let name = exercise.name.to_string();
                let muscle = exercise.muscle.to_string();
                let function = exercise.function.map(str::to_string);
                let query = self.query.clone();
                std::thread::spawn(move || {
                    let result = client.alternatives(&name, &muscle, function.as_deref(), &query);
                    let _ = tx.send(CoachEvent::Alternatives(id, result));
                });
            }
        }
    }

    /// Rename the card for this session and leave a swap marker in the note
    fn apply_alternative(&mut self, alt: Alternative) {
        if !self.editing {
            self.open_editor();
        }
        if !self.editor.note.is_empty() {
            self.editor.note.push('\n');
        }
        self.editor.note.push_str(&format!("[Swap: {}]", alt.name));
        self.editor.custom_name = Some(alt.name);
        self.overlay = Overlay::None;
    }

    fn revert_swap(&mut self) {
        if let Some(name) = self.editor.custom_name.take() {
            let marker = format!("[Swap: {}]", name);
            self.editor.note = self.editor.note.replace(&marker, "").trim().to_string();
        }
    }

    /// Warm-up plans are session-specific: refetch on every open
    fn open_warmup(&mut self) {
        self.overlay = Overlay::Warmup;
        if self.warmup.is_loading() {
            return;
        }

        let day = self.state.active_day_info();
        let day_id = day.id.to_string();
        self.warmup_for = Some(day_id.clone());
        match CoachClient::from_env() {
            Err(e) => self.warmup = Request::Failed(e.to_string()),
            Ok(client) => {
                self.warmup = Request::Loading;
                let focus = day.focus.to_string();
                let names: Vec<String> = self
                    .state
                    .active_exercises()
                    .iter()
                    .map(|ex| ex.name.to_string())
                    .collect();
                let tx = self.events_tx.clone();
                std::thread::spawn(move || {
                    let result = client.warmup_plan(&focus, &names);
                    let _ = tx.send(CoachEvent::Warmup(day_id, result));
                });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_day_tabs(frame, chunks[1]);
        self.render_body(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);

        match self.overlay {
            Overlay::None => {}
            Overlay::Volume => self.render_volume(frame),
            Overlay::Warmup => self.render_warmup(frame),
            Overlay::Tutorial => self.render_tutorial(frame),
            Overlay::Alternatives => self.render_alternatives(frame),
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let day = self.state.active_day_info();
        let header = Paragraph::new(Line::from(vec![
            Span::styled("GHISA ", Style::default().fg(Color::Cyan).bold()),
            Span::raw("diario di allenamento  -  "),
            Span::styled(day.full_name, Style::default().bold()),
            Span::raw("  "),
            Span::styled(day.focus, Style::default().fg(Color::Green)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn render_day_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> =
            catalog::WEEK_DAYS.iter().map(|d| Line::from(d.label)).collect();
        let tabs = Tabs::new(titles)
            .select(self.day_index())
            .highlight_style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL).title("Settimana"));
        frame.render_widget(tabs, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let exercises = self.state.active_exercises();
        if exercises.is_empty() {
            let rest = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Rest Day", Style::default().bold())),
                Line::from(""),
                Line::from("Recupero: stretching, mobilità o semplice relax."),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(rest, area);
            return;
        }

        let columns = Layout::default()
            .direction(ratatui::layout::Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.render_exercise_list(frame, columns[0], &exercises);
        self.render_detail(frame, columns[1], &exercises);
    }

    fn render_exercise_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        exercises: &[&'static Exercise],
    ) {
        let items: Vec<ListItem> = exercises
            .iter()
            .map(|ex| {
                let mut spans = vec![Span::raw(ex.name)];
                if let Some(log) = self.state.log_for(ex.id) {
                    let marker = if log.logged_today() { " ● oggi" } else { " ✓" };
                    spans.push(Span::styled(marker, Style::default().fg(Color::Green)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let title = if self.reordering { "Esercizi (riordino)" } else { "Esercizi" };
        let highlight = if self.reordering {
            Style::default().fg(Color::Black).bg(Color::Yellow).bold()
        } else {
            Style::default().bg(Color::DarkGray).bold()
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(highlight)
            .highlight_symbol("> ");

        let mut list_state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, exercises: &[&'static Exercise]) {
        let Some(exercise) = exercises.get(self.selected) else {
            return;
        };
        let last = self.state.log_for(exercise.id);
        let mut lines: Vec<Line> = Vec::new();

        let shown_name = if self.editing {
            self.editor.custom_name.as_deref().unwrap_or(exercise.name)
        } else {
            exercise.name
        };
        let mut title_spans =
            vec![Span::styled(shown_name.to_string(), Style::default().bold())];
        if self.editing && self.editor.custom_name.is_some() {
            title_spans.push(Span::styled(
                "  AI ALTERNATIVE",
                Style::default().fg(Color::Magenta).bold(),
            ));
        }
        lines.push(Line::from(title_spans));

        let mut info = vec![Span::styled(exercise.muscle, Style::default().fg(Color::Cyan))];
        if let Some(function) = exercise.function {
            info.push(Span::raw("  ·  "));
            info.push(Span::styled(function, Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(info));
        lines.push(Line::from(""));

        match last {
            Some(log) => {
                lines.push(Line::from(Span::styled(
                    "ULTIMA SESSIONE",
                    Style::default().fg(Color::Green).bold(),
                )));
                match log.mode {
                    LogMode::Dynamic => {
                        if let Some(sets) = log.dynamic_sets.as_deref() {
                            for (i, set) in sets.iter().enumerate() {
                                lines.push(Line::from(format!(
                                    "  #{}  {} reps @ {} kg",
                                    i + 1,
                                    set.reps,
                                    set.kg
                                )));
                            }
                        }
                    }
                    LogMode::Standard => {
                        lines.push(Line::from(format!("  {}", log.summary())));
                    }
                }
                lines.push(Line::from(Span::styled(
                    format!("  {}", log.date),
                    Style::default().fg(Color::DarkGray),
                )));
                if let Some(note) = &log.note {
                    for note_line in note.lines() {
                        lines.push(Line::from(Span::styled(
                            format!("  \"{}\"", note_line),
                            Style::default().fg(Color::DarkGray).italic(),
                        )));
                    }
                }
                if log.logged_today() {
                    let hint = if self.delete_confirm.is_armed() {
                        Span::styled("  [d] Sicuro?", Style::default().fg(Color::Red).bold())
                    } else {
                        Span::styled("  [d] annulla", Style::default().fg(Color::Red))
                    };
                    lines.push(Line::from(hint));
                }
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "Nessuna sessione registrata.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::from(""));

        if self.editing {
            self.render_editor_lines(&mut lines, last);
        } else {
            lines.push(Line::from(Span::styled(
                "Invio per registrare la sessione.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Scheda"));
        frame.render_widget(detail, area);
    }

    fn render_editor_lines(&self, lines: &mut Vec<Line<'static>>, last: Option<&LogEntry>) {
        let mode_label = match self.editor.mode {
            LogMode::Standard => "Standard",
            LogMode::Dynamic => "Serie Singole",
        };
        lines.push(Line::from(vec![
            Span::styled("REGISTRA  ", Style::default().fg(Color::Yellow).bold()),
            Span::styled(format!("[{}]", mode_label), Style::default().fg(Color::Cyan)),
        ]));

        match self.editor.mode {
            LogMode::Standard => {
                lines.push(input_line(
                    "Serie",
                    &self.editor.sets_field,
                    entry::previous_value(last, Field::Sets, 0),
                    self.editor.focus == 0,
                ));
                lines.push(input_line(
                    "Ripetizioni",
                    &self.editor.reps_field,
                    entry::previous_value(last, Field::Reps, 0),
                    self.editor.focus == 1,
                ));
                lines.push(input_line(
                    "Carico kg",
                    &self.editor.kg_field,
                    entry::previous_value(last, Field::Kg, 0),
                    self.editor.focus == 2,
                ));
            }
            LogMode::Dynamic => {
                for (i, set) in self.editor.dynamic.iter().enumerate() {
                    let reps_focused = self.editor.focus == i * 2;
                    let kg_focused = self.editor.focus == i * 2 + 1;
                    let mut spans = vec![Span::styled(
                        format!("  #{}  ", i + 1),
                        Style::default().fg(Color::DarkGray),
                    )];
                    spans.extend(input_spans(
                        &set.reps,
                        entry::previous_value(last, Field::Reps, i),
                        reps_focused,
                    ));
                    spans.push(Span::raw(" reps  "));
                    spans.extend(input_spans(
                        &set.kg,
                        entry::previous_value(last, Field::Kg, i),
                        kg_focused,
                    ));
                    spans.push(Span::raw(" kg"));
                    lines.push(Line::from(spans));
                }
                lines.push(Line::from(Span::styled(
                    "  Ctrl+A aggiungi serie · Ctrl+X rimuovi",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        lines.push(input_line(
            "Note",
            &self.editor.note,
            String::new(),
            self.editor.note_focused(),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Invio salva · Esc annulla · Tab campo · Ctrl+T modalità",
            Style::default().fg(Color::DarkGray),
        )));
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let text = if let Some(status) = &self.status {
            Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow).bold(),
            ))
        } else if self.reordering {
            Line::from("↑/↓ sposta esercizio · r fine riordino · ←/→ giorno · q esci")
        } else if self.editing {
            Line::from("Invio salva · Esc annulla · Tab campo · Ctrl+T modalità · Ctrl+R nome originale")
        } else {
            Line::from(
                "←/→ giorno · ↑/↓ seleziona · Invio registra · r riordina · v volume · w warm-up · t tutorial · a alternative · d annulla · x azzera · q esci",
            )
        };
        let footer = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }

    fn render_volume(&self, frame: &mut Frame) {
        let area = popup_area(frame.area(), 60, 70);
        frame.render_widget(Clear, area);

        let stats = crate::volume::weekly_volume(&self.state.logs);
        let mut lines: Vec<Line> = Vec::new();
        if stats.is_empty() {
            lines.push(Line::from("Nessun dato registrato."));
            lines.push(Line::from(Span::styled(
                "Completa gli allenamenti per vedere le statistiche.",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for (group, count) in &stats {
                // gauge scaled against the 20-set weekly target
                let filled = (*count).min(20) as usize;
                let bar: String = "#".repeat(filled) + &".".repeat(20 - filled);
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14}", group), Style::default().bold()),
                    Span::styled(
                        format!("{:>3} sets  ", count),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(bar, Style::default().fg(Color::Green)),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Sets per gruppo muscolare (target ~10-20)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let popup = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Volume settimanale"));
        frame.render_widget(popup, area);
    }

    fn render_warmup(&self, frame: &mut Frame) {
        let area = popup_area(frame.area(), 70, 80);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = Vec::new();
        match &self.warmup {
            Request::Idle | Request::Loading => {
                lines.push(Line::from("Analisi biomeccanica della sessione..."));
            }
            Request::Failed(message) => {
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            Request::Ready(plan) => {
                lines.push(Line::from(Span::styled(
                    "1. MOBILITÀ ARTICOLARE",
                    Style::default().fg(Color::Cyan).bold(),
                )));
                for step in &plan.mobility {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", step.name),
                        Style::default().bold(),
                    )));
                    lines.push(Line::from(format!("    {}", step.instruction)));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "2. ATTIVAZIONE SPECIFICA",
                    Style::default().fg(Color::Cyan).bold(),
                )));
                for step in &plan.activation {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", step.name),
                        Style::default().bold(),
                    )));
                    lines.push(Line::from(format!("    {}", step.instruction)));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "3. AVVICINAMENTO AL CARICO",
                    Style::default().fg(Color::Cyan).bold(),
                )));
                lines.push(Line::from(format!("  {}", plan.potentiation)));
            }
        }

        let popup = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Smart Warm-up"));
        frame.render_widget(popup, area);
    }

    fn render_tutorial(&self, frame: &mut Frame) {
        let area = popup_area(frame.area(), 70, 80);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = Vec::new();
        match &self.tutorial {
            Request::Idle | Request::Loading => {
                lines.push(Line::from("L'AI sta scrivendo la guida..."));
            }
            Request::Failed(message) => {
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            Request::Ready(tutorial) => {
                lines.push(Line::from(Span::styled(
                    "ESECUZIONE",
                    Style::default().fg(Color::Cyan).bold(),
                )));
                for (i, step) in tutorial.execution.iter().enumerate() {
                    lines.push(Line::from(format!("  {}. {}", i + 1, step)));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "ERRORI COMUNI",
                    Style::default().fg(Color::Red).bold(),
                )));
                for mistake in &tutorial.mistakes {
                    lines.push(Line::from(format!("  - {}", mistake)));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "PRO TIP",
                    Style::default().fg(Color::Green).bold(),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", tutorial.tips),
                    Style::default().italic(),
                )));
            }
        }

        let popup = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Guida Esecuzione"));
        frame.render_widget(popup, area);
    }

    fn render_alternatives(&self, frame: &mut Frame) {
        let area = popup_area(frame.area(), 70, 70);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = Vec::new();
        let query_style = if self.alt_cursor.is_none() {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw("Cerca: "),
            Span::styled(format!("{}▏", self.query), query_style),
        ]));
        lines.push(Line::from(""));

        match &self.alternatives {
            Request::Idle => {
                lines.push(Line::from(Span::styled(
                    "Invio per cercare alternative.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Request::Loading => {
                lines.push(Line::from("Ricerca in corso..."));
            }
            Request::Failed(message) => {
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            Request::Ready(alts) => {
                lines.push(Line::from(Span::styled(
                    "SUGGERIMENTI AI",
                    Style::default().fg(Color::Cyan).bold(),
                )));
                for (i, alt) in alts.iter().enumerate() {
                    let selected = self.alt_cursor == Some(i);
                    let name_style = if selected {
                        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
                    } else {
                        Style::default().bold()
                    };
                    lines.push(Line::from(Span::styled(format!("  {}", alt.name), name_style)));
                    lines.push(Line::from(Span::styled(
                        format!("    {}", alt.reason),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Invio cerca · ↓ risultati · Invio seleziona · Esc chiudi",
            Style::default().fg(Color::DarkGray),
        )));

        let popup = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Trova alternative"));
        frame.render_widget(popup, area);
    }
}

/// Labelled single-line input, placeholder shown dim when the value is empty
fn input_line(label: &str, value: &str, placeholder: String, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("  {:<12} ", label),
        Style::default().fg(Color::DarkGray),
    )];
    spans.extend(input_spans(value, placeholder, focused));
    Line::from(spans)
}

fn input_spans(value: &str, placeholder: String, focused: bool) -> Vec<Span<'static>> {
    let style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };
    if value.is_empty() {
        let mut spans = vec![Span::styled(
            format!("prev {}", placeholder),
            Style::default().fg(Color::DarkGray).italic(),
        )];
        if focused {
            spans.push(Span::styled("▏", style));
        }
        spans
    } else {
        let cursor = if focused { "▏" } else { "" };
        vec![Span::styled(format!("{}{}", value, cursor), style)]
    }
}

/// Centered popup rect
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::build_dynamic;

    fn editor_with_dynamic_history() -> Editor {
        let last = build_dynamic(
            &[
                SetData { reps: "10".into(), kg: "50".into() },
                SetData { reps: "8".into(), kg: "55".into() },
            ],
            "",
        )
        .unwrap();
        Editor::for_exercise(Some(&last))
    }

    #[test]
    fn test_editor_adopts_previous_mode() {
        let editor = editor_with_dynamic_history();
        assert_eq!(editor.mode, LogMode::Dynamic);
        assert_eq!(editor.dynamic.len(), 1);

        let editor = Editor::for_exercise(None);
        assert_eq!(editor.mode, LogMode::Standard);
    }

    #[test]
    fn test_toggle_mode_discards_other_mode_input() {
        let mut editor = Editor::for_exercise(None);
        editor.sets_field = "3".to_string();
        editor.reps_field = "10".to_string();

        editor.toggle_mode();
        assert_eq!(editor.mode, LogMode::Dynamic);
        assert!(editor.sets_field.is_empty());

        editor.dynamic[0] = SetData { reps: "10".into(), kg: "50".into() };
        editor.toggle_mode();
        assert_eq!(editor.mode, LogMode::Standard);
        assert_eq!(editor.dynamic, vec![SetData::default()]);
    }

    #[test]
    fn test_add_set_clones_previous_row() {
        let mut editor = editor_with_dynamic_history();
        editor.dynamic[0] = SetData { reps: "10".into(), kg: "50".into() };
        editor.add_set();
        assert_eq!(editor.dynamic.len(), 2);
        assert_eq!(editor.dynamic[1], editor.dynamic[0]);
        // focus landed on the new row's reps field
        assert_eq!(editor.focus, 2);
    }

    #[test]
    fn test_remove_set_keeps_last_row() {
        let mut editor = editor_with_dynamic_history();
        editor.remove_set();
        assert_eq!(editor.dynamic.len(), 1);

        editor.add_set();
        editor.remove_set();
        assert_eq!(editor.dynamic.len(), 1);
    }

    #[test]
    fn test_field_cycle_wraps() {
        let mut editor = Editor::for_exercise(None);
        assert_eq!(editor.field_count(), 4);
        for _ in 0..4 {
            editor.next_field();
        }
        assert_eq!(editor.focus, 0);
        editor.prev_field();
        assert!(editor.note_focused());
    }

    #[test]
    fn test_editor_builds_entry() {
        let mut editor = Editor::for_exercise(None);
        editor.sets_field = "3".to_string();
        editor.reps_field = "10".to_string();
        editor.kg_field = "50".to_string();
        let entry = editor.build().unwrap();
        assert_eq!(entry.mode, LogMode::Standard);

        editor.kg_field.clear();
        assert_eq!(editor.build(), Err(EntryError::IncompleteInput));
    }
}
