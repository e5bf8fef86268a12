pub mod events;
pub use events::*;

pub mod global_config;
pub use global_config::*;

pub mod staking_pool;
pub use staking_pool::*;

pub mod position;
pub use position::*;

pub mod boost;
pub use boost::*;

pub mod boost_claim;
pub use boost_claim::*;
