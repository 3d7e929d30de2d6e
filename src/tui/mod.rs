pub mod app;
pub mod event;
pub mod logging;
pub mod markdown;
pub mod ui;

use std::io;
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use psdocs::chat::ChatSession;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::tui::app::App;
use crate::tui::event::{AppEvent, Event};
use crate::tui::ui::draw;

const WELCOME: &str = "# ドキュメントチャット\n\n* 質問を入力して Enter で送信してください。\n* Esc または Ctrl+C で終了します。\n* ↑↓ キーで履歴をスクロールできます。";

/// Run the chat TUI over the given session
pub async fn run(session: ChatSession) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new();
    app.add_message("ui", WELCOME);

    // Questions flow to a background task; answers come back as app events.
    // The session resolves every failure internally, so each question
    // produces exactly one Answer event.
    let (question_tx, mut question_rx) = mpsc::unbounded_channel::<String>();
    let event_sender = app.event_sender();

    let session = Arc::new(session);
    tokio::spawn({
        let session = Arc::clone(&session);
        async move {
            while let Some(question) = question_rx.recv().await {
                let answer = session.answer(&question).await;
                let _ = event_sender.send(Event::App(AppEvent::Answer(answer)));
            }
        }
    });

    // Run the application
    terminal.clear()?;

    // Main event loop
    while !app.should_quit {
        // Draw the current state
        terminal.draw(|f| draw(f, &app))?;

        // Process the next event
        if let Some(event) = app.next_event().await {
            match event {
                Event::App(AppEvent::Submit(input)) => {
                    let _ = question_tx.send(input);
                }
                Event::App(AppEvent::Quit) => {
                    app.should_quit = true;
                }
                _ => {} // Other events are handled by the App
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
