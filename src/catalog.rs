use rand::{
    Rng,
    SeedableRng,
    rngs::{
        StdRng,
        ThreadRng,
    },
};

/// Number of treasure boxes on the board.
pub const BOX_COUNT: usize = 6;

pub const REWARDS: [&str; 15] = [
    "sub x5 🎉",
    "mangia qualcosa 🍕",
    "bevi qualcosa 🥤",
    "fai 10 flessioni 💪",
    "fai 10 squat 🦵",
    "fai un balletto 💃",
    "parla con un accento diverso 🗣️",
    "canta una canzone cringe 🎵",
    "racconta un segreto imbarazzante 🤫",
    "imita un animale 🐶",
    "leggi un messaggio con voce sexy 😏",
    "indossa un accessorio buffo 🎭",
    "fai il contrario di quello che dice la chat ↩️",
    "metti una foto imbarazzante 📸",
    "parla solo a gesti per 1 minuto 🤐",
];

/// Source of uniformly distributed indices used to draw rewards.
pub trait RewardSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<S: RewardSource + ?Sized> RewardSource for Box<S> {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

#[derive(Clone, Debug)]
pub struct RngSource<G> {
    rng: G,
}

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self { rng: rand::rng() }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<G: Rng> RewardSource for RngSource<G> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// The fixed pool of challenges. Draws are independent and may repeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardCatalog {
    rewards: &'static [&'static str],
}

impl RewardCatalog {
    pub const fn standard() -> Self {
        Self { rewards: &REWARDS }
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn contains(&self, reward: &str) -> bool {
        self.rewards.iter().any(|r| *r == reward)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rewards.iter().copied()
    }

    pub fn draw(&self, source: &mut impl RewardSource) -> &'static str {
        let idx = source.pick_index(self.rewards.len());
        // an out-of-range pick from a misbehaving source wraps instead of panicking
        self.rewards[idx % self.rewards.len()]
    }
}
