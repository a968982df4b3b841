pub mod app;
pub mod cli;
pub mod config;
pub mod filter;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod pager;
pub mod session;
pub mod source;
pub mod window;

#[cfg(test)]
mod tests;
