//! Retro-style numbered menu for day-to-day task handling.
//!
//! The nine entries mirror the CLI subcommands. Forms only accept valid values:
//! the title is re-prompted until non-empty and enumerated fields are chosen from
//! selectors. Every state-changing action persists the active set straight away.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mockable::Clock;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::error::TaskError;
use crate::fields::Priority;
use crate::report::{format_duration, format_timestamp, ReportRow};
use crate::session::Session;
use crate::storage::TaskRepository;
use crate::task::Task;
use crate::tui::colors::{priority_color, status_color};
use crate::tui::enums::{MenuItem, MenuState, ReportKind, TaskAction};
use crate::tui::task_form::{TaskForm, DESCRIPTION_FIELD, ORIGIN_FIELD, PRIORITY_FIELD, TITLE_FIELD};
use crate::tui::utils::centered_rect;

/// Initialise the terminal, run the menu until the user exits, then restore it.
pub fn run_menu<R: TaskRepository, C: Clock>(session: &mut Session<R, C>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = MenuApp::new(session);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Menu application state.
pub struct MenuApp<'a, R: TaskRepository, C: Clock> {
    session: &'a mut Session<R, C>,
    state: MenuState,
    list_state: ListState,
    form: TaskForm,
    /// Snapshot of active tasks shown by the task picker.
    picker: Vec<Task>,
    picked: Option<u64>,
    report: Vec<ReportRow>,
    status_message: String,
    should_exit: bool,
}

impl<'a, R: TaskRepository, C: Clock> MenuApp<'a, R, C> {
    pub fn new(session: &'a mut Session<R, C>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            session,
            state: MenuState::MainMenu,
            list_state,
            form: TaskForm::new(),
            picker: Vec::new(),
            picked: None,
            report: Vec::new(),
            status_message: String::new(),
            should_exit: false,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn report_rows(&self) -> &[ReportRow] {
        &self.report
    }

    fn back_to_main(&mut self) {
        self.state = MenuState::MainMenu;
        self.picked = None;
        self.list_state.select(Some(0));
    }

    /// Show an operation's outcome in the status bar.
    fn show_outcome(&mut self, result: Result<String, TaskError>) {
        self.status_message = match result {
            Ok(msg) => msg,
            Err(e) if e.is_informational() => e.to_string(),
            Err(e) => format!("Error: {e}"),
        };
    }

    /// Persist after a state change, reporting failures without leaving the menu.
    fn persist(&mut self) {
        if let Err(e) = self.session.save() {
            self.status_message = format!("{} (save failed: {e})", self.status_message);
        }
    }

    fn move_selection(&mut self, len: usize, down: bool) {
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down { (current + 1).min(len - 1) } else { current.saturating_sub(1) };
        self.list_state.select(Some(next));
    }

    /// Handle one key press for the current screen.
    pub fn handle_key(&mut self, key: KeyCode) {
        self.status_message.clear();
        match self.state {
            MenuState::MainMenu => self.handle_main_menu_input(key),
            MenuState::CreateTask => self.handle_create_input(key),
            MenuState::PickTask(action) => self.handle_pick_task_input(key, action),
            MenuState::PickPriority => self.handle_pick_priority_input(key),
            MenuState::ConfirmDelete => self.handle_confirm_delete_input(key),
            MenuState::Report(_) => self.handle_report_input(key),
        }
    }

    fn handle_main_menu_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.move_selection(MenuItem::ALL.len(), false),
            KeyCode::Down => self.move_selection(MenuItem::ALL.len(), true),
            KeyCode::Enter => {
                let selected = self.list_state.selected().unwrap_or(0);
                if let Some(item) = MenuItem::ALL.get(selected).copied() {
                    self.activate(item);
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => match MenuItem::from_digit(c) {
                Some(item) => {
                    self.list_state.select(MenuItem::ALL.iter().position(|i| *i == item));
                    self.activate(item);
                }
                None => self.status_message = "Invalid option. Try again.".to_string(),
            },
            KeyCode::Esc | KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
    }

    /// Run a main menu entry.
    fn activate(&mut self, item: MenuItem) {
        debug!(?item, "menu action");
        match item {
            MenuItem::CreateTask => {
                self.form = TaskForm::new();
                self.state = MenuState::CreateTask;
            }
            MenuItem::SelectNext => {
                let result = self.session.engine().select_next().map(|t| {
                    format!("Selected for execution: {} '{}' ({})", t.id, t.title, t.priority)
                });
                let changed = result.is_ok();
                self.show_outcome(result);
                if changed {
                    self.persist();
                }
            }
            MenuItem::UpdatePriority => self.open_picker(TaskAction::UpdatePriority),
            MenuItem::CompleteTask => {
                let result = self.session.engine().complete().map(|t| {
                    let took = t.execution_time().map(format_duration).unwrap_or_default();
                    format!("Task '{}' completed in {took}.", t.title)
                });
                let changed = result.is_ok();
                self.show_outcome(result);
                if changed {
                    self.persist();
                }
            }
            MenuItem::ArchiveStale => {
                let result = self.session.archive_stale().map(|n| match n {
                    0 => "No tasks to archive.".to_string(),
                    n => format!("{n} task(s) archived."),
                });
                self.show_outcome(result);
                // Tasks archived before a failed write are already out of the store.
                self.persist();
            }
            MenuItem::DeleteTask => self.open_picker(TaskAction::Delete),
            MenuItem::ActiveReport => {
                self.report = self.session.active_rows();
                if self.report.is_empty() {
                    self.status_message = "No tasks registered.".to_string();
                } else {
                    self.state = MenuState::Report(ReportKind::Active);
                    self.list_state.select(Some(0));
                }
            }
            MenuItem::ArchivedReport => match self.session.archived_rows() {
                Ok(rows) if rows.is_empty() => self.status_message = "No archived tasks.".to_string(),
                Ok(rows) => {
                    self.report = rows;
                    self.state = MenuState::Report(ReportKind::Archived);
                    self.list_state.select(Some(0));
                }
                Err(e) => self.status_message = format!("Error loading archived tasks: {e}"),
            },
            MenuItem::Exit => self.should_exit = true,
        }
    }

    fn open_picker(&mut self, action: TaskAction) {
        self.picker = self.session.store().all().to_vec();
        if self.picker.is_empty() {
            self.status_message = "No tasks registered.".to_string();
            return;
        }
        self.state = MenuState::PickTask(action);
        self.list_state.select(Some(0));
    }

    fn handle_create_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.back_to_main(),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Enter => match self.form.build() {
                Ok(new) => {
                    let result = self
                        .session
                        .engine()
                        .create(new)
                        .map(|t| format!("Task {} created.", t.id));
                    self.show_outcome(result);
                    self.persist();
                    self.back_to_main();
                }
                Err(e) => {
                    // Stay on the form so the user can fix the input.
                    self.form.current_field = TITLE_FIELD;
                    self.show_outcome(Err(e));
                }
            },
            KeyCode::Left | KeyCode::Right
                if matches!(self.form.current_field, PRIORITY_FIELD | ORIGIN_FIELD) =>
            {
                self.form.cycle(key == KeyCode::Right);
            }
            KeyCode::Char(' ') if matches!(self.form.current_field, PRIORITY_FIELD | ORIGIN_FIELD) => {
                self.form.cycle(true);
            }
            other => {
                if let Some(input) = self.form.active_input() {
                    match other {
                        KeyCode::Char(c) => input.handle_char(c),
                        KeyCode::Backspace => input.handle_backspace(),
                        KeyCode::Delete => input.handle_delete(),
                        KeyCode::Left => input.move_cursor_left(),
                        KeyCode::Right => input.move_cursor_right(),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_pick_task_input(&mut self, key: KeyCode, action: TaskAction) {
        match key {
            KeyCode::Up => self.move_selection(self.picker.len(), false),
            KeyCode::Down => self.move_selection(self.picker.len(), true),
            KeyCode::Enter => {
                let selected = self.list_state.selected().unwrap_or(0);
                let Some(task) = self.picker.get(selected) else {
                    return;
                };
                self.picked = Some(task.id);
                match action {
                    TaskAction::UpdatePriority => {
                        let current = Priority::ALL.iter().position(|p| *p == task.priority);
                        self.state = MenuState::PickPriority;
                        self.list_state.select(current.or(Some(0)));
                    }
                    TaskAction::Delete => self.state = MenuState::ConfirmDelete,
                }
            }
            KeyCode::Esc => self.back_to_main(),
            _ => {}
        }
    }

    fn handle_pick_priority_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.move_selection(Priority::ALL.len(), false),
            KeyCode::Down => self.move_selection(Priority::ALL.len(), true),
            KeyCode::Enter => {
                let priority = Priority::ALL[self.list_state.selected().unwrap_or(0).min(Priority::ALL.len() - 1)];
                if let Some(id) = self.picked {
                    let result = self
                        .session
                        .engine()
                        .update_priority(id, priority)
                        .map(|t| format!("Task {} priority set to {}.", t.id, t.priority));
                    self.show_outcome(result);
                    self.persist();
                }
                self.back_to_main();
            }
            KeyCode::Esc => self.back_to_main(),
            _ => {}
        }
    }

    fn handle_confirm_delete_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.picked {
                    let result = self
                        .session
                        .engine()
                        .delete_task(id)
                        .map(|t| format!("Task {} '{}' deleted.", t.id, t.title));
                    self.show_outcome(result);
                    self.persist();
                }
                self.back_to_main();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.back_to_main(),
            _ => {}
        }
    }

    fn handle_report_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.move_selection(self.report.len(), false),
            KeyCode::Down => self.move_selection(self.report.len(), true),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.report.clear();
                self.back_to_main();
            }
            _ => {}
        }
    }

    /// Main render function that dispatches to state-specific renderers.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.state {
            MenuState::MainMenu => self.render_main_menu(f, chunks[1]),
            MenuState::CreateTask => self.render_create_form(f, chunks[1]),
            MenuState::PickTask(action) => self.render_task_picker(f, chunks[1], action),
            MenuState::PickPriority => self.render_priority_picker(f, chunks[1]),
            MenuState::ConfirmDelete => self.render_delete_confirmation(f, chunks[1]),
            MenuState::Report(kind) => self.render_report(f, chunks[1], kind),
        }
        self.render_status_bar(f, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let store = self.session.store();
        let current = store
            .in_progress()
            .map(|t| format!("In progress: {} {}", t.id, t.title))
            .unwrap_or_else(|| "Nothing in progress".to_string());
        let header = Paragraph::new(Line::from(vec![
            Span::styled("TASK QUEUE", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  |  {} active  |  {current}", store.len())),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
        f.render_widget(header, area);
    }

    fn render_main_menu(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(i, item)| ListItem::new(Line::from(format!("  {} - {}", i + 1, item.label()))))
            .collect();

        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Operations Menu"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(menu, area, &mut self.list_state);
    }

    fn render_create_form(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let border = |field: usize| {
            if self.form.current_field == field {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }
        };

        let title = Paragraph::new(self.form.title.value.as_str()).block(
            Block::default().borders(Borders::ALL).title("Title (required)").border_style(border(TITLE_FIELD)),
        );
        let description = Paragraph::new(self.form.description.value.as_str()).block(
            Block::default().borders(Borders::ALL).title("Description").border_style(border(DESCRIPTION_FIELD)),
        );
        let priority = self.form.selected_priority();
        let priority_widget = Paragraph::new(Line::from(Span::styled(
            format!("◄ {priority} ►"),
            Style::default().fg(priority_color(priority)),
        )))
        .block(Block::default().borders(Borders::ALL).title("Priority").border_style(border(PRIORITY_FIELD)));
        let origin = Paragraph::new(format!("◄ {} ►", self.form.selected_origin()))
            .block(Block::default().borders(Borders::ALL).title("Origin").border_style(border(ORIGIN_FIELD)));

        f.render_widget(title, chunks[0]);
        f.render_widget(description, chunks[1]);
        f.render_widget(priority_widget, chunks[2]);
        f.render_widget(origin, chunks[3]);

        let cursor_target = match self.form.current_field {
            TITLE_FIELD => Some((chunks[0], self.form.title.cursor)),
            DESCRIPTION_FIELD => Some((chunks[1], self.form.description.cursor)),
            _ => None,
        };
        if let Some((rect, cursor)) = cursor_target {
            f.set_cursor_position((rect.x + cursor as u16 + 1, rect.y + 1));
        }
    }

    fn render_task_picker(&mut self, f: &mut Frame, area: Rect, action: TaskAction) {
        let items: Vec<ListItem> = self
            .picker
            .iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("  {:<4} {:<40} ", t.id, t.title)),
                    Span::styled(format!("{:<8}", t.priority.label()), Style::default().fg(priority_color(t.priority))),
                    Span::styled(t.status.label(), Style::default().fg(status_color(t.status))),
                ]))
            })
            .collect();

        let (title, highlight) = match action {
            TaskAction::UpdatePriority => ("Select Task to Re-prioritise", Style::default().bg(Color::Gray).fg(Color::Black)),
            TaskAction::Delete => ("Select Task to Delete", Style::default().bg(Color::Red).fg(Color::White)),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(highlight)
            .highlight_symbol("► ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_priority_picker(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(40, 50, area);
        f.render_widget(Clear, area);

        let items: Vec<ListItem> = Priority::ALL
            .iter()
            .map(|p| ListItem::new(Span::styled(format!("  {p}"), Style::default().fg(priority_color(*p)))))
            .collect();
        let title = match self.picked {
            Some(id) => format!("New Priority for Task {id}"),
            None => "New Priority".to_string(),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_delete_confirmation(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 40, area);
        f.render_widget(Clear, area);

        let task_name = self
            .picked
            .and_then(|id| self.session.store().find(id))
            .map(|t| format!("{} '{}'", t.id, t.title))
            .unwrap_or_else(|| "Unknown".to_string());

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure?",
                Style::default().add_modifier(Modifier::BOLD).fg(Color::Red),
            )),
            Line::from(""),
            Line::from(format!("This will delete task {task_name}.")),
            Line::from("A copy is kept in the archive file."),
            Line::from(""),
            Line::from("Press Y to confirm deletion, N or Esc to cancel"),
        ];

        let confirmation = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Delete Task")
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(confirmation, area);
    }

    fn render_report(&mut self, f: &mut Frame, area: Rect, kind: ReportKind) {
        let items: Vec<ListItem> = self
            .report
            .iter()
            .map(|r| {
                let mut spans = vec![
                    Span::raw(format!("  {:<4} ", r.id)),
                    Span::styled(format!("{:<8}", r.priority.label()), Style::default().fg(priority_color(r.priority))),
                    Span::styled(format!("{:<12}", r.status.label()), Style::default().fg(status_color(r.status))),
                    Span::raw(format!("{:<14} {}  {}", r.origin.label(), format_timestamp(r.created_at), r.title)),
                ];
                if !r.description.is_empty() {
                    spans.push(Span::styled(format!("  ({})", r.description), Style::default().fg(Color::DarkGray)));
                }
                if let Some(took) = r.execution_time {
                    spans.push(Span::styled(format!("  took {}", format_duration(took)), Style::default().fg(Color::Cyan)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let title = match kind {
            ReportKind::Active => format!("Task Report ({})", self.report.len()),
            ReportKind::Archived => format!("Archived Tasks ({})", self.report.len()),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    /// Render the status bar with context-appropriate help text.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                MenuState::MainMenu => "Press 1-9 or use ↑↓ and Enter, q/Esc to quit".to_string(),
                MenuState::CreateTask => "Tab/↑↓ to move, ←→ to change selectors, Enter to create, Esc to cancel".to_string(),
                MenuState::PickTask(_) | MenuState::PickPriority => {
                    "Use ↑↓ to navigate, Enter to select, Esc to go back".to_string()
                }
                MenuState::ConfirmDelete => "Press Y to confirm, N or Esc to cancel".to_string(),
                MenuState::Report(_) => "Use ↑↓ to scroll, Esc to return".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main event loop for the menu application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_exit {
                break;
            }
        }
        Ok(())
    }
}
