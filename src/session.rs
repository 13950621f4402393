//! The treasure box state machine.
//!
//! A [`SessionController`] owns one [`Session`] and moves it through
//! `Menu -> Playing -> Result`. Opening a box is split in two steps: the
//! selection hands back a [`RevealTicket`], and whoever owns the timer returns
//! that ticket once the reveal pause has elapsed. Every action is total;
//! anything not allowed in the current state is ignored.

use crate::catalog::{
    BOX_COUNT,
    RewardCatalog,
    RewardSource,
};
use tracing::{
    debug,
    info,
    trace,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Menu,
    Playing,
    Result,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    selected_box: Option<usize>,
    current_reward: &'static str,
    // opening order; never holds duplicates
    used_boxes: Vec<usize>,
}

impl Session {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_box(&self) -> Option<usize> {
        self.selected_box
    }

    /// Empty until the first reveal of the round.
    pub fn current_reward(&self) -> &'static str {
        self.current_reward
    }

    pub fn used_boxes(&self) -> &[usize] {
        &self.used_boxes
    }

    pub fn is_box_used(&self, box_index: usize) -> bool {
        self.used_boxes.contains(&box_index)
    }

    pub fn remaining_boxes(&self) -> usize {
        BOX_COUNT - self.used_boxes.len()
    }

    pub fn all_boxes_used(&self) -> bool {
        self.used_boxes.len() >= BOX_COUNT
    }
}

/// Proof that a box selection was accepted.
///
/// Redeemable once, and only until the session is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTicket {
    box_index: usize,
    generation: u64,
}

impl RevealTicket {
    pub fn box_index(&self) -> usize {
        self.box_index
    }
}

#[derive(Debug)]
pub struct SessionController<R> {
    session: Session,
    catalog: RewardCatalog,
    source: R,
    generation: u64,
}

impl<R: RewardSource> SessionController<R> {
    pub fn new(source: R) -> Self {
        Self {
            session: Session::default(),
            catalog: RewardCatalog::standard(),
            source,
            generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &RewardCatalog {
        &self.catalog
    }

    /// A box has been picked and its reward is not out yet.
    pub fn is_revealing(&self) -> bool {
        self.session.phase == Phase::Playing && self.session.selected_box.is_some()
    }

    /// Menu -> Playing. Returns whether the transition happened.
    pub fn start_new_game(&mut self) -> bool {
        if self.session.phase != Phase::Menu {
            trace!(phase = ?self.session.phase, "start ignored outside the menu");
            return false;
        }
        self.session = Session {
            phase: Phase::Playing,
            ..Session::default()
        };
        info!(generation = self.generation, "new game started");
        true
    }

    pub fn select_box(&mut self, box_index: usize) -> Option<RevealTicket> {
        let reason = if self.session.phase != Phase::Playing {
            Some("not playing")
        } else if box_index >= BOX_COUNT {
            Some("out of range")
        } else if self.session.selected_box.is_some() {
            Some("reveal in progress")
        } else if self.session.is_box_used(box_index) {
            Some("already used")
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(box_index, reason, "box selection ignored");
            return None;
        }

        self.session.selected_box = Some(box_index);
        debug!(box_index, "box selected, reveal pending");
        Some(RevealTicket {
            box_index,
            generation: self.generation,
        })
    }

    /// Draws the reward for a pending selection and moves to Result.
    ///
    /// Stale tickets (issued before a reset, or for a selection that is no
    /// longer current) are ignored and yield `None`.
    pub fn complete_reveal(&mut self, ticket: RevealTicket) -> Option<&'static str> {
        let current = ticket.generation == self.generation
            && self.session.phase == Phase::Playing
            && self.session.selected_box == Some(ticket.box_index)
            && !self.session.is_box_used(ticket.box_index);
        if !current {
            debug!(
                box_index = ticket.box_index,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "stale reveal ignored"
            );
            return None;
        }

        let reward = self.catalog.draw(&mut self.source);
        self.session.current_reward = reward;
        self.session.used_boxes.push(ticket.box_index);
        self.session.phase = Phase::Result;
        info!(
            box_index = ticket.box_index,
            used = self.session.used_boxes.len(),
            reward,
            "box opened"
        );
        Some(reward)
    }

    /// Result -> Playing, or a full reset once every box has been opened.
    pub fn play_again(&mut self) -> bool {
        if self.session.phase != Phase::Result {
            trace!(phase = ?self.session.phase, "play again ignored outside the result screen");
            return false;
        }
        if self.session.all_boxes_used() {
            info!("all boxes used, starting over");
            self.reset_game();
            return true;
        }
        self.session.phase = Phase::Playing;
        self.session.selected_box = None;
        self.session.current_reward = "";
        debug!(remaining = self.session.remaining_boxes(), "next round");
        true
    }

    pub fn reset_game(&mut self) {
        self.session = Session::default();
        self.generation = self.generation.wrapping_add(1);
        info!(generation = self.generation, "session reset");
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::test_helpers::ScriptedSource;

    fn playing() -> SessionController<ScriptedSource> {
        let mut controller = SessionController::new(ScriptedSource::repeating(0));
        controller.start_new_game();
        controller
    }

    #[test]
    fn new__starts_in_menu_with_nothing_used() {
        let controller = SessionController::new(ScriptedSource::repeating(0));

        assert_eq!(controller.session(), &Session::default());
        assert_eq!(controller.session().phase(), Phase::Menu);
        assert_eq!(controller.session().current_reward(), "");
        assert!(!controller.is_revealing());
    }

    #[test]
    fn start_new_game__moves_menu_to_playing() {
        // given
        let mut controller = SessionController::new(ScriptedSource::repeating(0));

        // when
        let started = controller.start_new_game();

        // then
        assert!(started);
        assert_eq!(controller.session().phase(), Phase::Playing);
        assert!(controller.session().used_boxes().is_empty());
        assert_eq!(controller.session().selected_box(), None);
    }

    #[test]
    fn start_new_game__is_ignored_outside_menu() {
        // given
        let mut controller = playing();
        let ticket = controller.select_box(1).unwrap();
        controller.complete_reveal(ticket).unwrap();
        let before = controller.session().clone();

        // when
        let started = controller.start_new_game();

        // then
        assert!(!started);
        assert_eq!(controller.session(), &before);
    }

    #[test]
    fn select_box__sets_selection_and_issues_ticket() {
        // given
        let mut controller = playing();

        // when
        let ticket = controller.select_box(3);

        // then
        assert_eq!(ticket.map(|t| t.box_index()), Some(3));
        assert_eq!(controller.session().selected_box(), Some(3));
        assert!(controller.is_revealing());
        assert!(controller.session().used_boxes().is_empty());
    }

    #[test]
    fn select_box__ignores_out_of_range_index() {
        // given
        let mut controller = playing();

        // when
        let ticket = controller.select_box(BOX_COUNT);

        // then
        assert!(ticket.is_none());
        assert_eq!(controller.session().selected_box(), None);
    }

    #[test]
    fn select_box__ignores_used_box() {
        // given
        let mut controller = playing();
        let ticket = controller.select_box(2).unwrap();
        controller.complete_reveal(ticket);
        controller.play_again();
        let before = controller.session().clone();

        // when
        let ticket = controller.select_box(2);

        // then
        assert!(ticket.is_none());
        assert_eq!(controller.session(), &before);
    }

    #[test]
    fn select_box__ignores_second_pick_while_revealing() {
        // given
        let mut controller = playing();
        controller.select_box(0).unwrap();

        // when
        let ticket = controller.select_box(1);

        // then
        assert!(ticket.is_none());
        assert_eq!(controller.session().selected_box(), Some(0));
    }

    #[test]
    fn select_box__ignored_in_menu_and_result() {
        let mut controller = SessionController::new(ScriptedSource::repeating(0));
        assert!(controller.select_box(0).is_none());

        controller.start_new_game();
        let ticket = controller.select_box(0).unwrap();
        controller.complete_reveal(ticket);
        assert!(controller.select_box(1).is_none());
        assert_eq!(controller.session().phase(), Phase::Result);
    }

    #[test]
    fn complete_reveal__draws_reward_and_marks_box_used() {
        // given
        let mut controller = SessionController::new(ScriptedSource::new([5]));
        controller.start_new_game();
        let ticket = controller.select_box(4).unwrap();

        // when
        let reward = controller.complete_reveal(ticket);

        // then
        assert_eq!(reward, Some("fai un balletto 💃"));
        assert_eq!(controller.session().current_reward(), "fai un balletto 💃");
        assert_eq!(controller.session().used_boxes(), &[4]);
        assert_eq!(controller.session().phase(), Phase::Result);
        assert!(!controller.is_revealing());
    }

    #[test]
    fn complete_reveal__ticket_cannot_be_redeemed_twice() {
        // given
        let mut controller = playing();
        let ticket = controller.select_box(1).unwrap();
        controller.complete_reveal(ticket).unwrap();

        // when
        let second = controller.complete_reveal(ticket);

        // then
        assert!(second.is_none());
        assert_eq!(controller.session().used_boxes(), &[1]);
    }

    #[test]
    fn complete_reveal__rejects_ticket_issued_before_reset() {
        // given
        let mut controller = playing();
        let ticket = controller.select_box(1).unwrap();
        controller.reset_game();
        controller.start_new_game();

        // when
        let reward = controller.complete_reveal(ticket);

        // then
        assert!(reward.is_none());
        assert_eq!(controller.session().phase(), Phase::Playing);
        assert!(controller.session().used_boxes().is_empty());
    }

    #[test]
    fn play_again__keeps_used_boxes_when_some_remain() {
        // given
        let mut controller = playing();
        let ticket = controller.select_box(2).unwrap();
        controller.complete_reveal(ticket);

        // when
        let moved = controller.play_again();

        // then
        assert!(moved);
        assert_eq!(controller.session().phase(), Phase::Playing);
        assert_eq!(controller.session().used_boxes(), &[2]);
        assert_eq!(controller.session().selected_box(), None);
        assert_eq!(controller.session().current_reward(), "");
    }

    #[test]
    fn play_again__resets_after_sixth_box() {
        // given
        let mut controller = playing();
        for i in 0..BOX_COUNT {
            let ticket = controller.select_box(i).unwrap();
            controller.complete_reveal(ticket).unwrap();
            if i + 1 < BOX_COUNT {
                controller.play_again();
            }
        }
        assert_eq!(controller.session().remaining_boxes(), 0);

        // when
        controller.play_again();

        // then
        assert_eq!(controller.session(), &Session::default());
    }

    #[test]
    fn play_again__ignored_outside_result() {
        let mut controller = playing();
        assert!(!controller.play_again());
        assert_eq!(controller.session().phase(), Phase::Playing);
    }

    #[test]
    fn reset_game__from_every_phase_returns_to_fresh_menu() {
        let mut controller = SessionController::new(ScriptedSource::repeating(3));
        controller.reset_game();
        assert_eq!(controller.session(), &Session::default());

        controller.start_new_game();
        controller.select_box(5).unwrap();
        controller.reset_game();
        assert_eq!(controller.session(), &Session::default());

        controller.start_new_game();
        let ticket = controller.select_box(5).unwrap();
        controller.complete_reveal(ticket);
        controller.reset_game();
        assert_eq!(controller.session(), &Session::default());
    }
}
