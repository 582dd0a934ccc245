pub mod distance;
pub mod place_filter;
pub mod providers;
pub mod quest_builder;
pub mod quest_generator;
pub mod quest_search;
pub mod ranking;

pub use quest_generator::{QuestGenerator, RankingPolicy};
pub use quest_search::QuestSearch;
