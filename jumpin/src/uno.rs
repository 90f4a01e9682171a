use std::{collections::BTreeMap, mem};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::card::{Card, CardColor, CardFace};
use crate::config::{RulesConfig, StartingSeat};
use crate::constants::{DEFAULT_NAMES, TOTAL_CARDS_IN_DECK, UNKNOWN_NAME, UNO_MAX_HAND_SIZE};
use crate::deck::Deck;
use crate::error::{Result, UnoError};
use crate::event::{ClientInfo, Event, Outbound, SwappedHand};
use crate::player::{Player, PlayerState};
use crate::rules;
use crate::scheduler::{Scheduler, TurnDirection};
use crate::turn::Action;
use crate::PlayerId;

/// The authoritative table: every connected player, and the match they are playing.
///
/// All mutation goes through `&mut self`, so a host serializes actions simply by owning one
/// `Uno` per match. Every action is validated completely before anything changes; a rejected
/// action returns `Err` and leaves the table exactly as it was.
#[derive(Debug)]
pub struct Uno {
    config: RulesConfig,
    rng: StdRng,
    players: BTreeMap<PlayerId, Player>,
    join_order: Vec<PlayerId>,
    deck: Deck,
    scheduler: Option<Scheduler>,
}

/// A play that passed validation and only needs committing.
struct PlannedPlay {
    index: usize,
    card: Card,
    jump_in: bool,
    swap: Option<(PlayerId, PlayerId)>,
}

impl Uno {
    pub fn new(config: RulesConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            rng,
            players: BTreeMap::new(),
            join_order: Vec::new(),
            deck: Deck::new(),
            scheduler: None,
        }
    }

    /// Seats `player_ids` (in order) and starts a match right away.
    pub fn new_with_ids(
        config: RulesConfig,
        player_ids: impl IntoIterator<Item = PlayerId>,
    ) -> Result<Self> {
        let mut uno = Self::new(config);
        for player_id in player_ids {
            uno.join(player_id)?;
        }
        uno.restart()?;
        Ok(uno)
    }

    pub fn apply(&mut self, actor: PlayerId, action: Action) -> Result<Vec<Outbound>> {
        let result = match action {
            Action::Rename { name } => self.rename(actor, &name),
            Action::Restart => self.restart(),
            Action::PlayCard {
                card,
                color,
                targets,
            } => self.play_card(actor, card, color, &targets),
            Action::DrawCard => self.draw_card(actor),
            Action::SayUno => self.say_uno(actor),
            Action::ReportMissedUno { target } => self.report_missed_uno(actor, target),
        };

        if let Err(error) = &result {
            debug!(actor, kind = %error.kind(), "Rejected action: {error}");
        }

        result
    }

    /// Registers a new connection as a player. Mid-match joiners watch until the next restart
    /// and get the current table replayed to them, with every hand hidden.
    pub fn join(&mut self, player_id: PlayerId) -> Result<Vec<Outbound>> {
        if self.players.contains_key(&player_id) {
            return Err(UnoError::AlreadyJoined(player_id));
        }

        let name = self.random_name();
        info!("Player {player_id} joined as {name}");
        self.players.insert(player_id, Player::new(player_id, name));
        self.join_order.push(player_id);

        let mut events = vec![self.client_list()];
        events.extend(self.catch_up(player_id));
        Ok(events)
    }

    /// Current table for a connection that watches without playing, with every hand hidden.
    pub fn observe(&self, viewer: PlayerId) -> Vec<Outbound> {
        let mut events = vec![Outbound::only(viewer, self.client_list().event)];
        events.extend(self.catch_up(viewer));
        events
    }

    /// Drops a player whose connection went away. A seated player's cards go under the draw
    /// pile and their seat is out for good; if it was their turn, the turn moves on.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<Vec<Outbound>> {
        let player = self
            .players
            .remove(&player_id)
            .ok_or(UnoError::UnknownPlayer(player_id))?;
        self.join_order.retain(|id| *id != player_id);
        info!("Player {player_id} left");

        let mut events = vec![self.client_list()];

        let Some(scheduler) = self.scheduler.as_mut() else {
            return Ok(events);
        };
        if !scheduler.is_seated(player_id) {
            return Ok(events);
        }

        self.deck.return_to_bottom(player.hand);
        if !scheduler.is_ended() && !player.state.is_out() {
            events.push(Outbound::everyone(Event::PlayerOut(player_id)));
            if scheduler.current_player() == Some(player_id) {
                scheduler.advance(&mut self.players, &mut events);
            }
        }

        Ok(events)
    }

    pub fn rename(&mut self, actor: PlayerId, name: &str) -> Result<Vec<Outbound>> {
        let max = self.config.max_name_len;
        let player = self
            .players
            .get_mut(&actor)
            .ok_or(UnoError::UnknownPlayer(actor))?;

        let name = name.trim();
        if name.is_empty() || name.chars().count() > max {
            return Err(UnoError::InvalidName { max });
        }

        debug!("Player {actor} renamed from {} to {name}", player.name);
        player.name = name.to_string();
        Ok(vec![self.client_list()])
    }

    /// Throws the current match away and deals a new one to everyone connected.
    pub fn restart(&mut self) -> Result<Vec<Outbound>> {
        let seats = self.join_order.clone();
        let hand_size = self.config.hand_size;
        if seats.len() < self.config.min_players {
            return Err(UnoError::NotEnoughPlayers);
        }
        if seats.len() > self.config.max_players || seats.len() * hand_size >= TOTAL_CARDS_IN_DECK
        {
            return Err(UnoError::TooManyPlayers);
        }

        let mut deck = Deck::new();
        deck.fill(&mut self.rng)?;

        let mut hands = vec![Vec::with_capacity(hand_size); seats.len()];
        let mut dealt = Vec::with_capacity(seats.len() * hand_size);
        for _ in 0..hand_size {
            for (seat, player_id) in seats.iter().enumerate() {
                for card in deck.draw_top(1, &mut self.rng)?.cards {
                    hands[seat].push(card);
                    dealt.push(Outbound::everyone(Event::CardDealt {
                        owner: *player_id,
                        card,
                    }));
                }
            }
        }

        let starter = deck.select_starter_card()?;
        let first = match self.config.starting_seat {
            StartingSeat::Random => self.rng.gen_range(0..seats.len()),
            StartingSeat::First => 0,
        };

        info!(players = seats.len(), "Restarting match, {starter} starts");
        for player in self.players.values_mut() {
            player.sit_out();
        }
        for (player_id, hand) in seats.iter().zip(hands) {
            if let Some(player) = self.players.get_mut(player_id) {
                player.deal_in();
                player.hand = hand;
            }
        }
        self.deck = deck;
        self.scheduler = Some(Scheduler::new(seats.clone(), first));

        let mut events = vec![Outbound::everyone(Event::GameRestarted)];
        events.extend(dealt);
        events.push(Outbound::everyone(Event::CardPlayed {
            owner: None,
            card: starter,
        }));
        events.push(Outbound::everyone(Event::CurrentPlayer(seats[first])));
        Ok(events)
    }

    pub fn play_card(
        &mut self,
        actor: PlayerId,
        card: Card,
        color: Option<CardColor>,
        targets: &[PlayerId],
    ) -> Result<Vec<Outbound>> {
        let plan = self.plan_play(actor, card, color, targets)?;

        let Self {
            players,
            deck,
            scheduler,
            ..
        } = self;
        let scheduler = scheduler.as_mut().ok_or(UnoError::MatchNotRunning)?;
        let mut events = Vec::new();

        if plan.jump_in {
            debug!("Player {actor} jumps in with {}", plan.card);
            // Walk the turn over to the actor so skipped seats and closing callback windows
            // resolve exactly as if play had reached them normally.
            for _ in 0..scheduler.seats().len() {
                if scheduler.current_player() == Some(actor) {
                    break;
                }
                scheduler.advance(players, &mut events);
            }
        }

        if let Some(player) = players.get_mut(&actor) {
            player.remove_card(plan.index);
        }
        deck.discard(plan.card);
        info!("Player {actor} played {}", plan.card);
        events.push(Outbound::everyone(Event::CardPlayed {
            owner: Some(actor),
            card: plan.card,
        }));

        match plan.card.face {
            CardFace::Reverse => {
                let direction = scheduler.reverse();
                events.push(Outbound::everyone(Event::TurnDirectionChanged(direction)));
            }
            CardFace::Skip => {
                scheduler.advance(players, &mut events);
            }
            face => {
                if let Some(penalty) = face.draw_penalty() {
                    scheduler.add_pending_draw(penalty);
                }
            }
        }

        if let Some((first, second)) = plan.swap {
            events.push(swap_hands(players, first, second));
        }

        if let Some(player) = players.get_mut(&actor) {
            if player.hand.is_empty() && player.transition(PlayerState::emptied_hand) {
                debug!("Player {actor} is {}", player.state);
                events.push(Outbound::everyone(Event::Callbackable(actor)));
            }
        }

        scheduler.advance(players, &mut events);
        Ok(events)
    }

    pub fn draw_card(&mut self, actor: PlayerId) -> Result<Vec<Outbound>> {
        let scheduler = self.running()?;
        if !self.players.contains_key(&actor) {
            return Err(UnoError::UnknownPlayer(actor));
        }
        if !scheduler.is_seated(actor) {
            return Err(UnoError::NotSeated(actor));
        }
        if scheduler.current_player() != Some(actor) {
            return Err(UnoError::NotYourTurn(actor));
        }

        let count = scheduler.pending_draw().max(1);
        let mut events = Vec::new();
        if !self.deck.can_supply(count) {
            self.exhaust(count, &mut events);
            return Ok(events);
        }

        debug!("Player {actor} draws {count} card(s)");
        self.give_cards(actor, count, &mut events)?;

        let Self {
            players, scheduler, ..
        } = self;
        if let Some(scheduler) = scheduler.as_mut() {
            scheduler.take_pending_draw();
            scheduler.advance(players, &mut events);
        }
        Ok(events)
    }

    /// Records an UNO call. With two cards left the call only counts once the next play
    /// brings the hand down to one, and the client is expected to call again then.
    pub fn say_uno(&mut self, actor: PlayerId) -> Result<Vec<Outbound>> {
        let seated = self.running()?.is_seated(actor);
        let player = self
            .players
            .get_mut(&actor)
            .ok_or(UnoError::UnknownPlayer(actor))?;
        if !seated {
            return Err(UnoError::NotSeated(actor));
        }
        if player.state.is_out() {
            return Err(UnoError::PlayerOut(actor));
        }
        if player.state.has_said_uno() {
            return Err(UnoError::AlreadySaidUno(actor));
        }

        let cards = player.cards_count();
        if cards > UNO_MAX_HAND_SIZE {
            return Err(UnoError::TooManyCardsForUno(cards));
        }
        if cards == UNO_MAX_HAND_SIZE {
            debug!("Player {actor} calls UNO ahead of their last-but-one play");
            return Ok(Vec::new());
        }

        player.transition(PlayerState::said_uno);
        info!("Player {actor} said UNO");
        Ok(vec![Outbound::everyone(Event::SaidUno(actor))])
    }

    pub fn report_missed_uno(
        &mut self,
        reporter: PlayerId,
        target: PlayerId,
    ) -> Result<Vec<Outbound>> {
        let seated = self.running()?.is_seated(target);
        if !self.players.contains_key(&reporter) {
            return Err(UnoError::UnknownPlayer(reporter));
        }
        if reporter == target {
            return Err(UnoError::SelfTarget(reporter));
        }

        let player = self
            .players
            .get(&target)
            .ok_or(UnoError::UnknownPlayer(target))?;
        if !seated {
            return Err(UnoError::NotSeated(target));
        }
        if player.state.is_out() {
            return Err(UnoError::TargetNotEligible(target));
        }
        if player.cards_count() > 1 {
            return Err(UnoError::TargetHasTooManyCards {
                target,
                cards: player.cards_count(),
            });
        }

        if player.state.has_said_uno() {
            debug!("Player {reporter} reported {target}, who did say UNO");
            return Ok(vec![Outbound::only(
                reporter,
                Event::AlreadySaidUno(target),
            )]);
        }

        let penalty = self.config.missed_uno_penalty;
        let mut events = Vec::new();
        if !self.deck.can_supply(penalty) {
            self.exhaust(penalty, &mut events);
            return Ok(events);
        }

        info!("Player {reporter} busted {target} for a missed UNO");
        events.push(Outbound::everyone(Event::MissedUnoBusted {
            buster: reporter,
            busted: target,
        }));
        self.give_cards(target, penalty, &mut events)?;
        Ok(events)
    }

    pub fn get_player_ids(&self) -> Vec<PlayerId> {
        self.join_order.clone()
    }

    pub fn get_player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn get_player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub fn get_current_turn_player_id(&self) -> Option<PlayerId> {
        self.scheduler.as_ref()?.current_player()
    }

    pub fn get_last_played_card(&self) -> Option<&Card> {
        self.deck.top()
    }

    pub fn seat_order(&self) -> &[PlayerId] {
        self.scheduler
            .as_ref()
            .map(Scheduler::seats)
            .unwrap_or_default()
    }

    pub fn turn_direction(&self) -> TurnDirection {
        self.scheduler
            .as_ref()
            .map(Scheduler::direction)
            .unwrap_or_default()
    }

    pub fn pending_draw_count(&self) -> usize {
        self.scheduler
            .as_ref()
            .map(Scheduler::pending_draw)
            .unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.running().is_ok()
    }

    pub fn draw_pile_count(&self) -> usize {
        self.deck.draw_pile_count()
    }

    /// Cards in both piles and every hand; a full deck once a match has started.
    pub fn cards_in_play(&self) -> usize {
        self.deck.cards_count()
            + self
                .players
                .values()
                .map(Player::cards_count)
                .sum::<usize>()
    }

    fn running(&self) -> Result<&Scheduler> {
        self.scheduler
            .as_ref()
            .filter(|scheduler| !scheduler.is_ended())
            .ok_or(UnoError::MatchNotRunning)
    }

    fn plan_play(
        &self,
        actor: PlayerId,
        card: Card,
        color: Option<CardColor>,
        targets: &[PlayerId],
    ) -> Result<PlannedPlay> {
        let scheduler = self.running()?;
        let top = *self.deck.top().ok_or(UnoError::MatchNotRunning)?;
        let player = self
            .players
            .get(&actor)
            .ok_or(UnoError::UnknownPlayer(actor))?;
        if !scheduler.is_seated(actor) {
            return Err(UnoError::NotSeated(actor));
        }
        if player.state.is_out() {
            return Err(UnoError::PlayerOut(actor));
        }

        let index = player
            .card_index(&card)
            .ok_or(UnoError::CardNotInHand(card))?;

        let jump_in = scheduler.current_player() != Some(actor);
        if jump_in && !rules::async_legal_play(&card, &top) {
            return Err(UnoError::NotYourTurn(actor));
        }

        let pending = scheduler.pending_draw();
        if pending > 0 && card.face.draw_penalty().is_none() {
            return Err(UnoError::DrawPending(pending));
        }

        if !jump_in && !rules::legal_play(&card, &top) {
            return Err(UnoError::IllegalPlay { card, top });
        }

        let card = rules::resolve_color(card, color)?;
        let swap = if card.face == CardFace::Number(0) {
            Some(self.plan_swap(actor, player.cards_count() - 1, targets)?)
        } else {
            None
        };

        Ok(PlannedPlay {
            index,
            card,
            jump_in,
            swap,
        })
    }

    /// A zero swaps the actor's hand with one other player, or, when it was the actor's last
    /// card, the hands of two other players with each other.
    fn plan_swap(
        &self,
        actor: PlayerId,
        remaining: usize,
        targets: &[PlayerId],
    ) -> Result<(PlayerId, PlayerId)> {
        let expected = if remaining == 0 { 2 } else { 1 };
        if targets.len() != expected {
            return Err(UnoError::InvalidSwapTargets {
                expected,
                given: targets.len(),
            });
        }

        let scheduler = self.running()?;
        for (position, target) in targets.iter().enumerate() {
            if *target == actor {
                return Err(UnoError::SelfTarget(actor));
            }
            if targets[..position].contains(target) {
                return Err(UnoError::DuplicateTarget(*target));
            }

            let player = self
                .players
                .get(target)
                .ok_or(UnoError::UnknownPlayer(*target))?;
            if !scheduler.is_seated(*target) || !player.state.can_be_swap_target() {
                return Err(UnoError::TargetNotEligible(*target));
            }
        }

        Ok(match targets {
            [first, second] => (*first, *second),
            _ => (actor, targets[0]),
        })
    }

    fn give_cards(
        &mut self,
        player_id: PlayerId,
        count: usize,
        events: &mut Vec<Outbound>,
    ) -> Result<()> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(UnoError::UnknownPlayer(player_id))?;
        let drawn = self.deck.draw_top(count, &mut self.rng)?;

        if drawn.reshuffled {
            events.push(Outbound::everyone(Event::DeckReshuffled));
        }
        for card in &drawn.cards {
            events.push(Outbound::everyone(Event::CardDealt {
                owner: player_id,
                card: *card,
            }));
        }

        player.add_cards(drawn.cards);
        Ok(())
    }

    /// The piles cannot cover a draw: the round is over.
    fn exhaust(&mut self, requested: usize, events: &mut Vec<Outbound>) {
        warn!(
            requested,
            available = self.deck.available(),
            "{}",
            UnoError::UnshuffleableDeck {
                requested,
                available: self.deck.available(),
            }
        );
        events.push(Outbound::everyone(Event::DeckExhausted));
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.end(events);
        }
    }

    fn random_name(&mut self) -> String {
        let taken = |name: &str| self.players.values().any(|player| player.name == name);
        let free = DEFAULT_NAMES
            .iter()
            .filter(|name| !taken(**name))
            .collect::<Vec<_>>();

        free.choose(&mut self.rng)
            .map(|name| name.to_string())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    fn client_list(&self) -> Outbound {
        let clients = self
            .join_order
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|player| ClientInfo {
                id: player.id,
                name: player.name.clone(),
            })
            .collect();

        Outbound::everyone(Event::ClientList(clients))
    }

    fn catch_up(&self, viewer: PlayerId) -> Vec<Outbound> {
        let Some(scheduler) = &self.scheduler else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for seat in scheduler.seats() {
            if let Some(player) = self.players.get(seat) {
                for card in &player.hand {
                    events.push(Outbound::only(
                        viewer,
                        Event::CardDealt {
                            owner: *seat,
                            card: *card,
                        },
                    ));
                }
            }
        }

        // Seats whose player left count as out.
        for seat in scheduler.seats() {
            let state = self
                .players
                .get(seat)
                .map_or(PlayerState::Out, |player| player.state);
            if state == PlayerState::Out {
                events.push(Outbound::only(viewer, Event::PlayerOut(*seat)));
            }
            if state.is_callbackable() {
                events.push(Outbound::only(viewer, Event::Callbackable(*seat)));
            }
            if state.has_said_uno() {
                events.push(Outbound::only(viewer, Event::SaidUno(*seat)));
            }
        }

        if let Some(top) = self.deck.top() {
            events.push(Outbound::only(
                viewer,
                Event::CardPlayed {
                    owner: None,
                    card: *top,
                },
            ));
        }

        if scheduler.direction() != TurnDirection::default() {
            events.push(Outbound::only(
                viewer,
                Event::TurnDirectionChanged(scheduler.direction()),
            ));
        }

        match scheduler.current_player() {
            Some(current) => events.push(Outbound::only(viewer, Event::CurrentPlayer(current))),
            None => events.push(Outbound::only(viewer, Event::EndGame)),
        }

        events
    }
}

fn swap_hands(
    players: &mut BTreeMap<PlayerId, Player>,
    first: PlayerId,
    second: PlayerId,
) -> Outbound {
    let mut carried = players
        .get_mut(&first)
        .map(|player| mem::take(&mut player.hand))
        .unwrap_or_default();

    if let Some(player) = players.get_mut(&second) {
        mem::swap(&mut player.hand, &mut carried);
        player.transition(PlayerState::hand_swapped);
    }
    if let Some(player) = players.get_mut(&first) {
        player.hand = carried;
        player.transition(PlayerState::hand_swapped);
    }

    debug!("Swapped hands of players {first} and {second}");
    let hand_of = |owner: PlayerId| SwappedHand {
        owner,
        hand: players
            .get(&owner)
            .map(|player| player.hand.clone())
            .unwrap_or_default(),
    };

    Outbound::everyone(Event::DeckSwap([hand_of(first), hand_of(second)]))
}
