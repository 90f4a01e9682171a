use std::collections::BTreeMap;

use strum_macros::Display;
use tracing::{debug, info};

use crate::{
    event::{Event, Outbound},
    player::{Player, PlayerState},
    PlayerId,
};

#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum TurnDirection {
    #[default]
    Forward,
    Backward,
}

impl TurnDirection {
    pub fn step(self) -> isize {
        match self {
            TurnDirection::Forward => 1,
            TurnDirection::Backward => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            TurnDirection::Forward => TurnDirection::Backward,
            TurnDirection::Backward => TurnDirection::Forward,
        }
    }
}

/// Seat order, whose turn it is, which way play goes and how many cards are stacked up.
#[derive(Debug)]
pub struct Scheduler {
    seats: Vec<PlayerId>,
    current: usize,
    direction: TurnDirection,
    pending_draw: usize,
    ended: bool,
}

impl Scheduler {
    pub fn new(seats: Vec<PlayerId>, current: usize) -> Self {
        Self {
            seats,
            current,
            direction: TurnDirection::default(),
            pending_draw: 0,
            ended: false,
        }
    }

    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|id| *id == player_id)
    }

    pub fn is_seated(&self, player_id: PlayerId) -> bool {
        self.seat_of(player_id).is_some()
    }

    /// `None` once the match has ended.
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.ended {
            None
        } else {
            self.seats.get(self.current).copied()
        }
    }

    pub fn direction(&self) -> TurnDirection {
        self.direction
    }

    pub fn reverse(&mut self) -> TurnDirection {
        self.direction = self.direction.flipped();
        self.direction
    }

    pub fn pending_draw(&self) -> usize {
        self.pending_draw
    }

    pub fn add_pending_draw(&mut self, count: usize) {
        self.pending_draw += count;
    }

    /// Clears the stacked draw count and returns it.
    pub fn take_pending_draw(&mut self) -> usize {
        std::mem::take(&mut self.pending_draw)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn end(&mut self, events: &mut Vec<Outbound>) {
        if !self.ended {
            self.ended = true;
            info!("Match ended");
            events.push(Outbound::everyone(Event::EndGame));
        }
    }

    fn remaining(&self, players: &BTreeMap<PlayerId, Player>) -> usize {
        self.seats
            .iter()
            .filter(|id| matches!(players.get(id), Some(player) if player.state != PlayerState::Out))
            .count()
    }

    fn next_seat(&self, seat: usize) -> usize {
        let count = self.seats.len() as isize;
        (seat as isize + self.direction.step()).rem_euclid(count) as usize
    }

    /// Moves the turn to the next seat that can still play.
    ///
    /// Seats that are out (or whose player left) are passed over. A callbackable player whose
    /// callback window was not used is finalized as out on the way, unless a draw chain is
    /// still pending. Visits each seat at most once. The match ends when no seat can take the
    /// turn, or when the seat found is the only one left that is not out.
    pub fn advance(
        &mut self,
        players: &mut BTreeMap<PlayerId, Player>,
        events: &mut Vec<Outbound>,
    ) -> Option<PlayerId> {
        if self.ended || self.seats.is_empty() {
            return None;
        }

        let mut seat = self.current;
        for _ in 0..self.seats.len() {
            seat = self.next_seat(seat);
            let id = self.seats[seat];
            let Some(player) = players.get_mut(&id) else {
                continue;
            };

            let state = player.state;
            match state {
                PlayerState::Out => continue,
                state if state.is_callbackable() && self.pending_draw == 0 => {
                    player.transition(PlayerState::callback_closed);
                    debug!("Callback window of player {id} closed");
                    events.push(Outbound::everyone(Event::PlayerOut(id)));
                }
                _ if self.remaining(players) < 2 => break,
                _ => {
                    self.current = seat;
                    events.push(Outbound::everyone(Event::CurrentPlayer(id)));
                    return Some(id);
                }
            }
        }

        self.end(events);
        None
    }
}
