pub mod initialise_configs;
pub use initialise_configs::*;

pub mod update_configs;
pub use update_configs::*;

pub mod create_pool;
pub use create_pool::*;

pub mod update_pool;
pub use update_pool::*;

pub mod add_pool_rewards;
pub use add_pool_rewards::*;

pub mod withdraw_pool_rewards;
pub use withdraw_pool_rewards::*;

pub mod stake;
pub use stake::*;

pub mod claim_rewards;
pub use claim_rewards::*;

pub mod withdraw;
pub use withdraw::*;

pub mod create_boost;
pub use create_boost::*;

pub mod top_up_boost;
pub use top_up_boost::*;

pub mod claim_boost_rewards;
pub use claim_boost_rewards::*;

pub mod recover_stray_tokens;
pub use recover_stray_tokens::*;
