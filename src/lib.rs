pub use catalog::{
    BOX_COUNT,
    REWARDS,
    RewardCatalog,
    RewardSource,
    RngSource,
};
pub use session::{
    Phase,
    RevealTicket,
    Session,
    SessionController,
};

pub mod catalog;
pub mod config;
pub mod logging;
pub mod session;

pub mod test_helpers;
