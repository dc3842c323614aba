mod action;
mod command;
mod finite;
mod paths;
mod record;
mod writer;

pub use {
    action::Action,
    command::{
        Command, DEFAULT_SESSION_MINUTES, DEFAULT_SESSION_TYPE, NlCommandParams, SessionParams,
    },
    paths::{default_queue_path, queue_path_in},
    record::CommandRecord,
    writer::{CommandQueue, NO_PARAMS},
};
