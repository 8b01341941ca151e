//! Logging shim.
//!
//! Forwards to the `log` facade when the `log` feature is enabled and
//! compiles to nothing otherwise. Never call these from inside a tick.

#![allow(unused_macros)]

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            ::log::debug!($($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = core::format_args!($($arg)*);
        }
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            ::log::warn!($($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = core::format_args!($($arg)*);
        }
    }};
}
