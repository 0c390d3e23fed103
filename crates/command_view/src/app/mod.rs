mod bootstrap;
mod input_bridge;
mod loop_runner;
mod renderer;
mod store;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
