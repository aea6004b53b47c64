//! One module per service: Lobby, Ranch, Race, Messenger. Each owns a
//! [`crate::dispatch::HandlerTable`] keyed to its own state and a
//! [`alicia_net::ClientRegistry`] tracking its own listener's
//! connections; none of the four ever reaches into another's state
//! directly, only through the shared [`crate::instance::ServerInstance`].

pub mod lobby;
pub mod messenger;
pub mod race;
pub mod ranch;
