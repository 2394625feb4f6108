use crate::connections::Connections;
use crate::context::HandContext;
use crate::event::Event;
use crate::message::{RelayedSignal, ServerMessage};
use crate::protocol::{Protocol, Viewer};
use crate::timer::Timer;
use pokerd_core::{Chips, ID};
use pokerd_gameplay::{ActionKind, HandResult, Outcome, Table};
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender, UnboundedSender};
use tokio_postgres::Client;

/// One message delivered to a room, already tagged by the session
/// multiplexer with whatever identity it has resolved the connection to.
/// Matches spec.md §4.4's operation list one-to-one, plus the WebRTC
/// pass-through and disconnect notice from the ambient session-multiplexer
/// section.
#[derive(Debug)]
pub enum Command {
    Spectate { sender: UnboundedSender<ServerMessage> },
    Join { name: String, seat: usize, buy_in: Chips, sender: UnboundedSender<ServerMessage> },
    Leave { seat: usize },
    StartGame { requested_by: Option<usize> },
    Action { seat: usize, kind: ActionKind },
    SitOut { seat: usize, sitting_out: bool },
    Chat { name: String, text: String },
    RunTwiceChoice { seat: usize, run_it_twice: bool },
    Signal { kind: SignalKind, from: usize, to: usize, payload: serde_json::Map<String, serde_json::Value> },
    Disconnected { seat: usize },
}

#[derive(Debug, Clone, Copy)]
pub enum SignalKind {
    Offer,
    Answer,
    Ice,
}

/// A lightweight, cloneable reference to a running room's inbound queue.
/// This is what the registry and session multiplexer hold onto; the `Room`
/// itself is moved into its own task and never touched from outside it.
#[derive(Clone)]
pub struct RoomHandle {
    id: ID<Table>,
    inbox: Sender<Command>,
}

impl RoomHandle {
    pub fn id(&self) -> ID<Table> {
        self.id
    }

    pub async fn send(&self, command: Command) -> Result<(), Command> {
        self.inbox.send(command).await.map_err(|e| e.0)
    }
}

const QUEUE_CAPACITY: usize = 256;

/// Consecutive persistence failures a room tolerates before treating its
/// store as unreachable and shutting itself down, per spec.md §7's
/// "repeated threshold of failures escalates to fatal room shutdown".
const MAX_CONSECUTIVE_PERSIST_FAILURES: u32 = 5;

/// Owns exactly one `Table` and runs as a single cooperative task, serving
/// its bounded inbound queue one command at a time. No suspension happens
/// mid-mutation: each command's `Table` call runs to completion before any
/// broadcast or persistence write is awaited, so the state a broadcast
/// describes is always the state the next command will see.
pub struct Room {
    table: Table,
    connections: Connections,
    context: Option<HandContext>,
    timer: Timer,
    db: Arc<Client>,
    consecutive_persist_failures: u32,
    fatal: bool,
}

impl Room {
    pub fn new(table: Table, db: Arc<Client>) -> (Self, RoomHandle, Receiver<Command>) {
        let id = table.id();
        let (tx, rx) = tokio::sync::mpsc::channel(QUEUE_CAPACITY);
        let room = Self {
            connections: Connections::new(pokerd_core::SEATS),
            table,
            context: None,
            timer: Timer::with_defaults(),
            db,
            consecutive_persist_failures: 0,
            fatal: false,
        };
        (room, RoomHandle { id, inbox: tx }, rx)
    }

    pub async fn run(mut self, mut inbox: Receiver<Command>) {
        let room_id = self.table.id().to_string();
        log::info!("room {room_id} starting");
        let mut tick = tokio::time::interval(self.timer.persist_interval());
        tick.tick().await; // first tick fires immediately; consume it
        loop {
            tokio::select! {
                command = inbox.recv() => {
                    match command {
                        Some(command) => self.handle(command).await,
                        None => break,
                    }
                }
                _ = tick.tick() => {
                    if self.timer.needs_persist() {
                        self.persist().await;
                    }
                }
            }
            if self.consecutive_persist_failures >= MAX_CONSECUTIVE_PERSIST_FAILURES {
                log::error!("room {room_id} hit {MAX_CONSECUTIVE_PERSIST_FAILURES} consecutive persist failures, treating store as unreachable");
                self.report_error(None, "room store unreachable, closing room".into());
                break;
            }
            if self.fatal {
                break;
            }
        }
        self.persist().await;
        log::info!("room {room_id} shutting down");
    }

    async fn handle(&mut self, command: Command) {
        self.timer.mark_active();
        match command {
            Command::Spectate { sender } => self.on_spectate(sender),
            Command::Join { name, seat, buy_in, sender } => self.on_join(name, seat, buy_in, sender).await,
            Command::Leave { seat } => self.on_leave(seat).await,
            Command::StartGame { requested_by } => self.on_start_game(requested_by).await,
            Command::Action { seat, kind } => self.on_action(seat, kind).await,
            Command::SitOut { seat, sitting_out } => self.on_sit_out(seat, sitting_out).await,
            Command::Chat { name, text } => self.emit(Event::Chat { from: name, text }),
            Command::RunTwiceChoice { seat, run_it_twice } => self.on_run_twice_choice(seat, run_it_twice).await,
            Command::Signal { kind, from, to, payload } => self.on_signal(kind, from, to, payload),
            Command::Disconnected { seat } => {
                self.connections.disconnect(seat);
                self.emit(Event::PlayerDisconnected { seat });
            }
        }
        if !self.table.check_invariants() {
            log::error!("room {} failed its post-mutation invariant check", self.table.id());
            self.report_error(None, "internal invariant violation, closing room".into());
            self.fatal = true;
        }
    }

    fn on_spectate(&mut self, sender: UnboundedSender<ServerMessage>) {
        self.connections.watch(sender.clone());
        let _ = sender.send(ServerMessage::Spectating);
        let view = Protocol::game_state(&self.table, &self.table.id().to_string(), Viewer::Spectator);
        let _ = sender.send(ServerMessage::GameState(view));
    }

    async fn on_join(&mut self, name: String, seat: usize, buy_in: Chips, sender: UnboundedSender<ServerMessage>) {
        match self.table.join(seat, &name, buy_in) {
            Ok(()) => {
                self.connections.sit(seat, sender.clone());
                let _ = sender.send(ServerMessage::Joined { seat });
                self.emit(Event::PlayerJoined { name, seat });
                self.broadcast_state();
                self.persist().await;
            }
            Err(e) => {
                let _ = sender.send(ServerMessage::Error { message: e.to_string() });
            }
        }
    }

    async fn on_leave(&mut self, seat: usize) {
        if self.table.leave(seat).is_ok() {
            self.connections.vacate(seat);
            self.emit(Event::PlayerLeft { seat });
            self.broadcast_state();
            self.persist().await;
        }
    }

    async fn on_start_game(&mut self, requested_by: Option<usize>) {
        match self.table.start_hand() {
            Ok(()) => {
                self.open_hand_context();
                self.emit(Event::HandStarted { hand_number: self.table.hand_number() });
                self.broadcast_state();
                self.persist().await;
            }
            Err(e) => self.report_error(requested_by, e.to_string()),
        }
    }

    async fn on_action(&mut self, seat: usize, kind: ActionKind) {
        if Some(seat) != self.table.acting() {
            self.unicast_error(seat, "it is not your turn to act".into());
            return;
        }
        let valid = match self.table.valid_actions(seat) {
            Ok(v) => v,
            Err(e) => return self.unicast_error(seat, e.to_string()),
        };
        let kind = match Protocol::validate(kind, &valid) {
            Ok(k) => k,
            Err(e) => return self.unicast_error(seat, e.to_string()),
        };
        let name = self.table.seat(seat).map(|p| p.name().to_string()).unwrap_or_default();
        if let Some(ctx) = &mut self.context {
            ctx.record_action(seat, &name, kind, self.table.phase());
        }
        match self.table.apply_action(seat, kind) {
            Ok(outcome) => {
                self.emit(Event::PlayerActed { seat, name, kind });
                self.handle_outcome(outcome).await;
                self.persist().await;
            }
            Err(e) => self.unicast_error(seat, e.to_string()),
        }
    }

    async fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Continues { .. } | Outcome::StreetAdvanced { .. } => self.broadcast_state(),
            Outcome::AwaitingRunItTwice => {
                let players = self
                    .table
                    .run_it_twice_eligible_seats()
                    .into_iter()
                    .filter_map(|s| self.table.seat(s).map(|p| p.name().to_string()))
                    .collect();
                self.emit(Event::AwaitingRunItTwice { players });
                self.broadcast_state();
            }
            Outcome::HandEnded(result) => self.conclude_hand(result).await,
        }
    }

    async fn on_run_twice_choice(&mut self, seat: usize, run_it_twice: bool) {
        if !self.table.is_awaiting_run_it_twice() || !self.table.run_it_twice_eligible_seats().contains(&seat) {
            return;
        }
        let result = self.table.decide_run_it_twice(run_it_twice);
        self.conclude_hand(result).await;
        self.persist().await;
    }

    async fn on_sit_out(&mut self, seat: usize, sitting_out: bool) {
        if self.table.sit_out(seat, sitting_out).is_ok() {
            self.broadcast_state();
            self.persist().await;
        }
    }

    fn on_signal(&mut self, kind: SignalKind, from: usize, to: usize, payload: serde_json::Map<String, serde_json::Value>) {
        let relayed = RelayedSignal { from, payload };
        let message = match kind {
            SignalKind::Offer => ServerMessage::WebrtcOffer(relayed),
            SignalKind::Answer => ServerMessage::WebrtcAnswer(relayed),
            SignalKind::Ice => ServerMessage::Ice(relayed),
        };
        self.connections.unicast(to, message);
    }

    /// Runs after a hand concludes by any path (showdown, uncontested
    /// award, or a run-it-twice decision): persists the hand's record,
    /// returns the table to `Waiting` via `Table::conclude_hand`, and — per
    /// the phase diagram's "hand-over -> pre-flop (next hand) or waiting
    /// (too few players)" — immediately tries to deal the next hand rather
    /// than waiting on another `start_game`. `start_hand` is a no-op
    /// rejection if too few eligible players remain, which leaves the room
    /// sitting in `Waiting` for a fresh `start_game`.
    async fn conclude_hand(&mut self, result: HandResult) {
        self.emit(Event::HandEnded(result.clone()));
        self.flush_hand(&result).await;
        self.table.conclude_hand();
        if self.table.start_hand().is_ok() {
            self.open_hand_context();
            self.emit(Event::HandStarted { hand_number: self.table.hand_number() });
        }
        self.broadcast_state();
    }

    fn open_hand_context(&mut self) {
        let stacks = self
            .table
            .seats()
            .map(|(seat, p)| (seat, p.name().to_string(), p.stack()))
            .collect();
        let mut context = HandContext::new(self.table.hand_number(), self.table.dealer(), stacks);
        for (seat, p) in self.table.seats() {
            if let Some((a, b)) = p.hole() {
                context.record_hole(seat, a, b);
            }
        }
        self.context = Some(context);
    }

    async fn flush_hand(&mut self, result: &HandResult) {
        let Some(context) = self.context.take() else { return };
        let hand_id = uuid::Uuid::new_v4();
        let room_id = self.table.id().uuid();
        let winning_hand = result.hand_results.first().map(|(_, description)| description.clone());
        let row = pokerd_database::HandRow {
            id: hand_id,
            room_id,
            hand_number: context.hand_number() as i64,
            pot_size: result.pot,
            winner_names: result.winners.clone(),
            winning_hand,
        };
        if let Err(e) = pokerd_database::insert_hand(&self.db, &row).await {
            log::error!("failed to persist hand {hand_id}: {e}");
        }

        let action_rows: Vec<_> = context
            .actions()
            .iter()
            .map(|a| pokerd_database::ActionRow {
                player_name: a.player_name.clone(),
                action: a.action.to_string(),
                amount: match a.action {
                    ActionKind::Raise { to } => Some(to),
                    _ => None,
                },
                phase: a.phase.to_string(),
                sequence: a.sequence as i32,
            })
            .collect();
        if let Err(e) = pokerd_database::insert_actions(&self.db, hand_id, &action_rows).await {
            log::error!("failed to persist action log for hand {hand_id}: {e}");
        }

        for (name, stack) in &result.player_stacks {
            let starting = context
                .starting_stacks()
                .iter()
                .find(|(_, n, _)| n == name)
                .map(|&(_, _, s)| s)
                .unwrap_or(*stack);
            let won = result.winners.contains(name);
            let profit = *stack - starting;
            if let Err(e) = pokerd_database::record_hand(&self.db, name, won, profit, result.pot).await {
                log::error!("failed to update player_stats for {name}: {e}");
            }
        }
    }

    async fn persist(&mut self) {
        let room_id = self.table.id().uuid();
        let state_json = serde_json::to_value(&self.table).expect("Table always serializes");
        match pokerd_database::save_snapshot(&self.db, room_id, &state_json).await {
            Ok(()) => {
                self.timer.mark_persisted();
                self.consecutive_persist_failures = 0;
            }
            Err(e) => {
                self.consecutive_persist_failures += 1;
                log::error!(
                    "failed to persist room {room_id} ({}/{} consecutive failures): {e}",
                    self.consecutive_persist_failures,
                    MAX_CONSECUTIVE_PERSIST_FAILURES
                );
            }
        }
    }

    fn emit(&self, event: Event) {
        log::debug!("room {}: {}", self.table.id(), event);
        if let Some(message) = Protocol::encode(&event) {
            self.connections.broadcast(message);
        }
    }

    fn broadcast_state(&self) {
        let room_id = self.table.id().to_string();
        for (seat, _) in self.table.seats() {
            if !self.connections.is_disconnected(seat) {
                let view = Protocol::game_state(&self.table, &room_id, Viewer::Seat(seat));
                self.connections.unicast(seat, ServerMessage::GameState(view));
            }
        }
        let view = Protocol::game_state(&self.table, &room_id, Viewer::Spectator);
        self.connections.broadcast_spectators(ServerMessage::GameState(view));
    }

    fn unicast_error(&self, seat: usize, message: String) {
        self.connections.unicast(seat, ServerMessage::Error { message });
    }

    fn report_error(&self, seat: Option<usize>, message: String) {
        match seat {
            Some(seat) => self.unicast_error(seat, message),
            None => self.connections.broadcast(ServerMessage::Error { message }),
        }
    }
}
