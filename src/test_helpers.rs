use crate::{
    catalog::RewardSource,
    session::SessionController,
};
use std::collections::VecDeque;

/// Replays a fixed list of picks, then keeps returning the fallback.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    picks: VecDeque<usize>,
    fallback: usize,
    requested: Vec<usize>,
}

impl ScriptedSource {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            fallback: 0,
            requested: Vec::new(),
        }
    }

    pub fn repeating(pick: usize) -> Self {
        Self {
            picks: VecDeque::new(),
            fallback: pick,
            requested: Vec::new(),
        }
    }

    /// The `len` argument of every draw so far.
    pub fn requested(&self) -> &[usize] {
        &self.requested
    }
}

impl RewardSource for ScriptedSource {
    fn pick_index(&mut self, len: usize) -> usize {
        self.requested.push(len);
        self.picks.pop_front().unwrap_or(self.fallback) % len
    }
}

/// Selects `box_index` and completes the reveal immediately, as if the
/// pause had elapsed.
pub fn open_box<R: RewardSource>(
    controller: &mut SessionController<R>,
    box_index: usize,
) -> Option<&'static str> {
    let ticket = controller.select_box(box_index)?;
    controller.complete_reveal(ticket)
}

/// Opens every box in `order`, calling `play_again` between rounds but not
/// after the last one.
pub fn open_boxes<R: RewardSource>(
    controller: &mut SessionController<R>,
    order: &[usize],
) -> Vec<&'static str> {
    let mut rewards = Vec::new();
    for (i, box_index) in order.iter().enumerate() {
        if let Some(reward) = open_box(controller, *box_index) {
            rewards.push(reward);
        }
        if i + 1 < order.len() {
            controller.play_again();
        }
    }
    rewards
}
