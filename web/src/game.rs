use crate::utils::*;
use clap::Args;
use exitwalk_core as game;
use game::{CellKind, Coord2, GameOutcome, Move, QueuedMove, ReplayEvent, ReplayProgress};
use gloo::timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

/// Forwards engine notifications into the component message queue.
#[derive(Debug)]
pub(crate) struct ViewObserver {
    callback: Callback<ReplayEvent>,
}

impl game::ReplayObserver for ViewObserver {
    fn on_event(&mut self, event: &ReplayEvent) {
        self.callback.emit(event.clone());
    }
}

/// What the page shows, rebuilt purely from engine notifications.
#[derive(Clone, Debug, PartialEq)]
struct ReplayView {
    start: Coord2,
    moves: Vec<QueuedMove>,
    active: Option<usize>,
    player: Coord2,
    message: Option<GameOutcome>,
}

impl ReplayView {
    fn new(start: Coord2) -> Self {
        Self {
            start,
            moves: Vec::new(),
            active: None,
            player: start,
            message: None,
        }
    }

    fn apply(&mut self, event: &ReplayEvent) -> bool {
        use ReplayEvent::*;

        match event {
            MoveQueued { entry, .. } => {
                self.moves.push(entry.clone());
                true
            }
            StepStarted { index } => self.active.replace(*index) != Some(*index),
            Moved { position, .. } => {
                self.player = *position;
                true
            }
            MoveSkipped { .. } => false,
            Outcome(outcome) => {
                self.message = Some(*outcome);
                true
            }
            Reset => {
                self.moves.clear();
                self.active = None;
                self.player = self.start;
                true
            }
        }
    }
}

fn field_class(kind: CellKind, has_player: bool) -> Classes {
    let modifier = match (kind, has_player) {
        (_, true) => Some("game__field--player"),
        (CellKind::Wall, false) => Some("game__field--wall"),
        (CellKind::Exit, false) => Some("game__field--exit"),
        (CellKind::Empty | CellKind::Start, false) => None,
    };
    classes!("game__field", modifier)
}

/// The move icon is an up arrow, other directions rotate it.
fn arrow_class(entry: &QueuedMove) -> Option<String> {
    match entry.as_move() {
        Some(Move::Up) | None => None,
        Some(mv) => Some(format!("arrow--{}", mv)),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Msg {
    Queue(Move),
    Play,
    Advance,
    NewGame,
    DismissMessage,
    Replay(ReplayEvent),
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Board size, between 2 and 16
    #[arg(long, default_value_t = game::GameConfig::DEFAULT_SIZE)]
    size: game::Coord,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<String>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    game: game::Game<ViewObserver>,
    view: ReplayView,
    step_timer: Option<Timeout>,
}

impl GameView {
    fn create_step_timer(ctx: &Context<Self>) -> Timeout {
        let link = ctx.link().clone();
        let millis = game::STEP_DELAY.as_millis().try_into().unwrap_or(u32::MAX);
        Timeout::new(millis, move || link.send_message(Msg::Advance))
    }

    fn on_progress(&mut self, ctx: &Context<Self>, progress: game::Result<ReplayProgress>) {
        match progress {
            Ok(ReplayProgress::Pending(index)) => {
                log::trace!("waiting on step {}", index);
                self.step_timer = Some(GameView::create_step_timer(ctx));
            }
            Ok(ReplayProgress::Resolved(outcome)) => {
                log::info!("replay finished: {:?}", outcome);
                self.step_timer = None;
            }
            Err(err) => log::warn!("replay step rejected: {}", err),
        }
    }

    fn is_replaying(&self) -> bool {
        self.game.engine().state().is_replaying()
    }

    fn view_controls(&self, ctx: &Context<Self>) -> Html {
        let replaying = self.is_replaying();
        let cb_play = ctx.link().callback(|_| Msg::Play);
        let cb_new_game = ctx.link().callback(|_| Msg::NewGame);

        html! {
            <nav class="controls">
                <ul class="controls__list">
                    {
                        for Move::ALL.into_iter().map(|mv| {
                            let onclick = ctx.link().callback(move |_| Msg::Queue(mv));
                            let arrow = arrow_class(&QueuedMove::Step(mv));
                            html! {
                                <li class="controls__item">
                                    <button class="controls__link" data-move={mv.token()} disabled={replaying} {onclick}>
                                        <span class={classes!("icon-svg", arrow)}/>
                                    </button>
                                </li>
                            }
                        })
                    }
                    <li class="controls__item">
                        <button id="play-button" class="controls__link" disabled={replaying} onclick={cb_play}>{"Play"}</button>
                    </li>
                    <li class="controls__item">
                        <button class="controls__link" onclick={cb_new_game}>{"New game"}</button>
                    </li>
                </ul>
            </nav>
        }
    }

    fn view_board(&self) -> Html {
        let board = self.game.board();
        let size = board.size();
        let grid_style = format!(
            "grid-template-columns: repeat({0}, 10rem); grid-template-rows: repeat({0}, 10rem);",
            size
        );

        html! {
            <div class="game__board" style={grid_style}>
                {
                    for board.iter_cells().map(|(pos, kind)| html! {
                        <div class={field_class(kind, pos == self.view.player)}/>
                    })
                }
            </div>
        }
    }

    fn view_moves(&self) -> Html {
        html! {
            <div class="game__moves-navigation">
                <nav class="controls controls--in-game">
                    <ul class="controls__list">
                        {
                            for self.view.moves.iter().enumerate().map(|(index, entry)| {
                                let active = self.view.active == Some(index);
                                html! {
                                    <li class="controls__item">
                                        <span class={classes!("controls__link", active.then_some("controls__link--active"))}>
                                            <span class={classes!("icon-svg", arrow_class(entry))}/>
                                        </span>
                                    </li>
                                }
                            })
                        }
                    </ul>
                </nav>
            </div>
        }
    }

    fn view_message(&self, ctx: &Context<Self>) -> Html {
        let Some(outcome) = self.view.message else {
            return html! {};
        };
        let cb_dismiss = ctx.link().callback(|_| Msg::DismissMessage);

        html! {
            <Modal>
                <div class="message">
                    <p class="message__text">{outcome.message()}</p>
                    <button onclick={cb_dismiss}>{"OK"}</button>
                </div>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props
            .seed
            .as_deref()
            .map_or_else(js_random_seed, seed_from_str);
        let observer = || ViewObserver {
            callback: ctx.link().callback(Msg::Replay),
        };

        let game = game::Game::with_size(props.size, seed, observer()).unwrap_or_else(|err| {
            log::error!("{}, using default size", err);
            game::Game::new(game::GameConfig::default(), seed, observer())
        });
        let view = ReplayView::new(game.board().start());
        Self {
            game,
            view,
            step_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Queue(mv) => {
                match self.game.engine_mut().enqueue(mv) {
                    Ok(index) => log::debug!("queued {} at {}", mv, index),
                    Err(err) => log::warn!("cannot queue {}: {}", mv, err),
                }
                false
            }
            Play => {
                let progress = self.game.engine_mut().begin_replay();
                self.on_progress(ctx, progress);
                true
            }
            Advance => {
                self.step_timer = None;
                let progress = self.game.engine_mut().advance();
                self.on_progress(ctx, progress);
                false
            }
            NewGame => {
                // dropping the timeout cancels the pending step
                self.step_timer = None;
                if let Err(err) = self.game.new_game(js_random_seed()) {
                    log::error!("could not start a new game: {}", err);
                }
                self.view = ReplayView::new(self.game.board().start());
                true
            }
            DismissMessage => self.view.message.take().is_some(),
            Replay(event) => {
                log::trace!("replay event: {:?}", event);
                self.view.apply(&event)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="application">
                <header class="application__header">
                    {self.view_controls(ctx)}
                </header>
                <main class="game">
                    {self.view_board()}
                    {self.view_moves()}
                </main>
                {self.view_message(ctx)}
            </div>
        }
    }
}
