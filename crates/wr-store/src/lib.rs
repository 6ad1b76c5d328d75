pub mod store;

pub use store::RewardStore;
