use crate::ui;
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use std::time::Duration;
use tokio::time::{
    self,
    Instant,
    MissedTickBehavior,
};
use tracing::{
    debug,
    warn,
};
use treasure_box::{
    Phase,
    RevealTicket,
    RewardSource,
    RngSource,
    SessionController,
    config::AppConfig,
};

const ANIMATION_TICK: Duration = Duration::from_millis(120);

type DynSource = Box<dyn RewardSource>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSnapshot {
    pub phase: Phase,
    pub selected_box: Option<usize>,
    pub current_reward: &'static str,
    pub used_boxes: Vec<usize>,
    pub frame: u64,
    pub status: String,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        AppSnapshot {
            phase: Phase::Menu,
            selected_box: None,
            current_reward: "",
            used_boxes: Vec::new(),
            frame: 0,
            status: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingReveal {
    ticket: RevealTicket,
    deadline: Instant,
}

pub struct AppController<R = DynSource> {
    game: SessionController<R>,
    reveal_delay: Duration,
    pending: Option<PendingReveal>,
    frame: u64,
    status: String,
}

impl AppController<DynSource> {
    pub fn new(config: &AppConfig) -> Self {
        let source: DynSource = match config.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::thread()),
        };
        Self::with_source(source, config.reveal_delay)
    }
}

impl<R: RewardSource> AppController<R> {
    pub fn with_source(source: R, reveal_delay: Duration) -> Self {
        AppController {
            game: SessionController::new(source),
            reveal_delay,
            pending: None,
            frame: 0,
            status: String::new(),
        }
    }

    pub fn reveal_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            phase: self.game.session().phase(),
            selected_box: self.game.session().selected_box(),
            current_reward: self.game.session().current_reward(),
            used_boxes: self.game.session().used_boxes().to_vec(),
            frame: self.frame,
            status: self.status.clone(),
        }
    }

    pub fn start_new_game(&mut self) {
        if self.game.start_new_game() {
            self.set_status("Nuovo gioco iniziato");
        }
    }

    pub fn select_box(&mut self, box_index: usize) {
        let Some(ticket) = self.game.select_box(box_index) else {
            return;
        };
        self.pending = Some(PendingReveal {
            ticket,
            deadline: Instant::now() + self.reveal_delay,
        });
        self.frame = 0;
        self.set_status(format!("Box {} selezionata", box_index + 1));
    }

    /// Redeems the pending ticket. Called once the reveal deadline passes.
    pub fn finish_reveal(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match self.game.complete_reveal(pending.ticket) {
            Some(_) => {
                let remaining = self.game.session().remaining_boxes();
                self.set_status(format!(
                    "Box {} aperta | rimaste {}",
                    pending.ticket.box_index() + 1,
                    remaining
                ));
            }
            None => warn!(
                box_index = pending.ticket.box_index(),
                "reveal timer fired for a selection that is no longer current"
            ),
        }
    }

    pub fn play_again(&mut self) {
        if self.game.play_again() {
            match self.game.session().phase() {
                Phase::Menu => self.set_status("Tutte le box sono state aperte, si ricomincia"),
                _ => self.set_status(format!(
                    "Scegli la prossima box ({} rimaste)",
                    self.game.session().remaining_boxes()
                )),
            }
        }
    }

    pub fn reset(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(
                box_index = pending.ticket.box_index(),
                "dropping pending reveal on reset"
            );
        }
        self.game.reset_game();
        self.frame = 0;
        self.set_status("Gioco ricominciato da capo");
    }

    pub fn tick_animation(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn is_revealing(&self) -> bool {
        self.pending.is_some()
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let controller = AppController::new(&config);
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    tracing::info!("Starting UI");
    ui::terminal_enter(&mut ui_state)?;
    tracing::info!("UI ready");
    let res = run_loop(controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn wait_for_reveal(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

async fn run_loop(
    mut controller: AppController,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    tracing::info!("Running app loop");
    let mut ticker = time::interval(ANIMATION_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ui::draw(ui_state, &controller.snapshot()).wrap_err("initial draw failed")?;

    loop {
        let reveal_deadline = controller.reveal_deadline();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                break;
            }
            _ = wait_for_reveal(reveal_deadline) => {
                controller.finish_reveal();
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw after reveal failed")?;
            }
            _ = ticker.tick(), if controller.is_revealing() => {
                controller.tick_animation();
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw during reveal animation failed")?;
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let snapshot = controller.snapshot();
                let Some(ev) = ui::interpret_event(ui_state, &snapshot, event) else {
                    continue;
                };
                match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::StartNewGame => controller.start_new_game(),
                    ui::UserEvent::SelectBox(box_index) => controller.select_box(box_index),
                    ui::UserEvent::PlayAgain => controller.play_again(),
                    ui::UserEvent::Reset => controller.reset(),
                    ui::UserEvent::Redraw => {}
                }
                ui::draw(ui_state, &controller.snapshot())
                    .wrap_err("draw after user input failed")?;
            }
        }
    }

    tracing::info!("Leaving app loop");
    Ok(())
}
