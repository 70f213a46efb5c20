//! # Periodic participants

/// Something that must be serviced once per scheduler tick.
pub trait Periodic {
    /// Called once per tick by the host scheduler.
    fn periodic(&mut self);
}
