//! Crawler: robots/sitemap probing, budgeted BFS page discovery, and
//! internal-link reachability verification (§4.2, §4.4, §4.5).

mod budgets;
mod engine;
mod fetch;
mod robots;

pub use budgets::{Budgets, Profile};
pub use engine::crawl;
