//! Hyprland IPC event socket
//!
//! Hyprland exposes two Unix sockets per instance under
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/`. `.socket.sock`
//! accepts commands; `.socket2.sock` emits one line per compositor event in
//! the form `EVENT>>DATA`. Only the event socket is used here.
//!
//! ## Architecture
//!
//! - `get_socket_path`: socket discovery from the environment
//! - `HyprEventStream`: line reader over the event socket
//! - `Event` / `parse_event`: turning a raw line into a typed event
//! - `HyprError`: error types for socket operations

mod error;
mod events;
mod socket;

pub use error::HyprError;
pub use events::{parse_event, Event, HyprEventStream};
pub use socket::get_socket_path;
