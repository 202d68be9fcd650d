//! Command dispatcher trait
//!
//! Command registration itself is host glue (see [`crate::command`] for
//! the command table); the core only needs a channel for user-visible
//! informational messages.

/// Trait for the host command interface
pub trait CommandDispatcher {
    /// Emit a user-visible informational message
    fn respond_info(&mut self, msg: core::fmt::Arguments<'_>);
}
