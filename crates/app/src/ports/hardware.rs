//! Hardware ports: raw reads from GPIO and ADC pins.
//!
//! Reads are synchronous: they are single register or file reads, and the
//! engine calls them from its own task.

use smartnode_domain::error::SmartNodeError;

/// A digital input pin.
pub trait DigitalInput: Send {
    /// Read the current level (`true` when high).
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::AdapterUnavailable`] when the pin cannot be
    /// read.
    fn read(&mut self) -> Result<bool, SmartNodeError>;
}

/// An analog input channel backed by a 10-bit ADC.
pub trait AnalogInput: Send {
    /// Read a raw sample in `0..=1023`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::AdapterUnavailable`] when the channel cannot
    /// be read.
    fn read(&mut self) -> Result<u16, SmartNodeError>;
}
