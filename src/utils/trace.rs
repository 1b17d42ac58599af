/// Emit a `tracing` event at trace level when the `tracing` feature is on.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}
