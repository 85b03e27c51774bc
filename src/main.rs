use std::io;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use matchday_terminal::config::{AppConfig, CodecSource, FormSource};
use matchday_terminal::dataset::MatchOutcome;
use matchday_terminal::engine::PredictionEngine;
use matchday_terminal::state::{AppState, FormField};

struct App {
    engine: PredictionEngine,
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(engine: PredictionEngine) -> Self {
        let state = AppState::new(
            engine.teams().to_vec(),
            engine.codecs().opponent.values().to_vec(),
            engine.codecs().venue.values().to_vec(),
        );
        let mut app = Self {
            engine,
            state,
            should_quit: false,
        };
        app.state.push_log(format!(
            "[INFO] Corpus: {} matches ({} train)",
            app.engine.corpus_len(),
            app.engine.train_len()
        ));
        let metrics = app.engine.metrics();
        app.state.push_log(format!(
            "[INFO] Holdout: {} matches, accuracy {:.0}%, win precision {:.0}%",
            metrics.samples,
            metrics.accuracy * 100.0,
            metrics.precision * 100.0
        ));
        app.refresh_prediction();
        app
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc if self.state.help_overlay => self.state.help_overlay = false,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.state.focus_next(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.state.focus_prev(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => {
                if self.state.cycle_value(1) {
                    self.refresh_prediction();
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if self.state.cycle_value(-1) {
                    self.refresh_prediction();
                }
            }
            _ => {}
        }
    }

    // Every selection change runs the whole pipeline synchronously.
    fn refresh_prediction(&mut self) {
        let selection = self.state.selection();
        match self.engine.predict(&selection) {
            Ok(prediction) => {
                self.state.prediction = Some(self.engine.display(prediction));
                self.state.warning = None;
            }
            Err(err) => {
                self.state.prediction = None;
                self.state.warning = Some(err.to_string());
                self.state.push_log(format!("[WARN] {err}"));
            }
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env()?;
    // Fatal if the corpus or artifacts are unusable; there is nothing to
    // serve without a fitted codec/model pair.
    let engine = PredictionEngine::build(config).context("build prediction engine")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(engine);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.on_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_main(frame, chunks[1], app);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let metrics = app.engine.metrics();
    let codec_source = match app.engine.config().codec_source {
        CodecSource::FitAtStartup => "FIT",
        CodecSource::LoadArtifacts => "ARTIFACTS",
    };
    format!(
        "MATCHDAY TERMINAL | cutoff {} | codecs {} | holdout acc {:.0}% prec {:.0}%",
        app.engine.config().cutoff,
        codec_source,
        metrics.accuracy * 100.0,
        metrics.precision * 100.0
    )
}

fn footer_text() -> &'static str {
    "j/k/↑/↓ Field | h/l/←/→ Change value | Enter Cycle | ? Help | q Quit"
}

fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_form(frame, cols[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(5),
        ])
        .split(cols[1]);

    render_prediction(frame, right[0], app);
    render_form_chart(frame, right[1], app);
    render_console(frame, right[2], app);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Match setup").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(FormField::ALL.len());
    for (idx, field) in FormField::ALL.iter().enumerate() {
        let focused = idx == app.state.focus;
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!(
                "{marker}{:<13} {}",
                field.label(),
                app.state.field_value(*field)
            ),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_prediction(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Prediction").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if let Some(warning) = &app.state.warning {
        let text = Paragraph::new(format!("! {warning}"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(text, inner);
        return;
    }

    let Some(display) = &app.state.prediction else {
        frame.render_widget(Paragraph::new("No prediction yet"), inner);
        return;
    };

    let color = if display.outcome_text == "Win" {
        Color::Green
    } else {
        Color::Red
    };
    let mut lines = vec![Line::styled(
        format!("Predicted: {}", display.outcome_text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(prob) = &display.probability_text {
        lines.push(Line::raw(format!("Confidence: {prob}")));
    }
    lines.push(Line::raw(format!(
        "{} vs {} ({})",
        app.state.field_value(FormField::Team),
        app.state.field_value(FormField::Opponent),
        app.state.field_value(FormField::Venue)
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_form_chart(frame: &mut Frame, area: Rect, app: &App) {
    let source = match app.engine.config().form_source {
        FormSource::FullCorpus => "corpus",
        FormSource::TrainOnly => "train",
    };
    let title = format!("Recent form ({source})");
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let team = app.state.field_value(FormField::Team);
    let form = app.engine.recent_form(&team);
    if form.is_empty() {
        let empty = Paragraph::new("No matches for this team")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let bars: Vec<Bar> = form
        .iter()
        .map(|m| {
            let (value, color) = match m.result {
                MatchOutcome::Win => (3u64, Color::Green),
                MatchOutcome::Draw => (2u64, Color::Yellow),
                MatchOutcome::Loss => (1u64, Color::Red),
            };
            Bar::default()
                .value(value)
                .text_value(m.result.letter().to_string())
                .label(Line::from(m.date.format("%m-%d").to_string()))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .max(3);
    frame.render_widget(chart, inner);
}

fn render_console(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let text = if app.state.logs.is_empty() {
        "No alerts yet".to_string()
    } else {
        let take = inner.height as usize;
        let start = app.state.logs.len().saturating_sub(take);
        app.state
            .logs
            .iter()
            .skip(start)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    };
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday Terminal - Help",
        "",
        "Form:",
        "  j/k or ↑/↓   Move between fields",
        "  h/l or ←/→   Change the focused value",
        "  Enter        Cycle value forward",
        "",
        "Every change re-runs the pipeline and",
        "updates the prediction immediately.",
        "",
        "Global:",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
