pub mod app;
mod check;
mod completions;
mod list;
mod pull;
