use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::Context;
use client_logging::{client_debug, client_error, client_info};
use tubeport_core::{update, AppState, Msg, TaskStatus, UrlValidity};

use crate::config::{self, Cli};
use crate::effects::EffectRunner;
use crate::ui::render::render;

const EXIT_FAILED: u8 = 1;
const EXIT_INVALID_URL: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = config::client_settings(&cli, |key| std::env::var(key).ok())?;
    client_info!(
        "Service {} polled every {:?}",
        settings.base_url,
        settings.poll_interval
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(settings, msg_tx.clone()).context("starting engine")?;

    // Ctrl-C is the reset intent: cancel the chain, then leave.
    let interrupt_tx = msg_tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(Msg::ResetClicked);
    })
    .context("installing Ctrl-C handler")?;
    drop(msg_tx);

    let mut session = Session::new(runner);
    session.dispatch(Msg::UrlChanged(cli.url.clone()));
    if let Some(cookies) = cli.cookies.clone() {
        session.dispatch(Msg::CookiesChanged(cookies));
    }

    // The service must hold the cookies before the task that needs them is created.
    let mut interrupted = false;
    if let Some(path) = cli.cookie_file.clone() {
        session.dispatch(Msg::CookieFileChosen(path));
        interrupted = session.pump(&msg_rx, |state| state.uploads_in_flight() > 0)?;
    }
    if !interrupted {
        session.dispatch(Msg::SubmitClicked);
        interrupted = session.pump(&msg_rx, |state| {
            state.is_busy() || state.uploads_in_flight() > 0
        })?;
    }

    let code = session.exit_code(interrupted);
    session.runner.shutdown();
    Ok(code)
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    last_frame: Vec<String>,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            last_frame: Vec::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        client_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() {
            self.paint();
        }
    }

    /// Applies inbox messages while `waiting` holds. Returns `true` when
    /// Ctrl-C arrived first.
    fn pump(
        &mut self,
        inbox: &mpsc::Receiver<Msg>,
        waiting: impl Fn(&AppState) -> bool,
    ) -> anyhow::Result<bool> {
        while waiting(&self.state) {
            let msg = inbox.recv().map_err(|_| {
                client_error!("Engine closed its result channel mid-session");
                anyhow::anyhow!("engine stopped unexpectedly")
            })?;
            let interrupted = msg == Msg::ResetClicked;
            self.dispatch(msg);
            if interrupted {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Prints the frame when it differs from the last one. Notifications are
    /// shown once, then dismissed.
    fn paint(&mut self) {
        let view = self.state.view();
        let frame = render(&view);
        if frame != self.last_frame && !frame.is_empty() {
            for line in &frame {
                println!("{line}");
            }
        }
        self.last_frame = frame;

        if view.notification.is_some() {
            let state = std::mem::take(&mut self.state);
            let (mut state, _) = update(state, Msg::NotificationDismissed);
            state.consume_dirty();
            self.state = state;
        }
    }

    fn exit_code(&self, interrupted: bool) -> ExitCode {
        if interrupted {
            println!("Cancelled.");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
        match self.state.task().map(|task| task.status()) {
            Some(TaskStatus::Completed) => ExitCode::SUCCESS,
            Some(_) => ExitCode::from(EXIT_FAILED),
            None => match self.state.view().url_validity {
                UrlValidity::Valid => ExitCode::from(EXIT_FAILED),
                UrlValidity::Invalid => ExitCode::from(EXIT_INVALID_URL),
                UrlValidity::Unknown => {
                    println!("Please enter a YouTube URL");
                    ExitCode::from(EXIT_INVALID_URL)
                }
            },
        }
    }
}
