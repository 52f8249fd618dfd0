//! Pokeview Platform Abstraction
//!
//! The motion layer never talks to a windowing system directly. It consumes
//! two narrow host services defined here:
//!
//! - [`FrameHost`] - "run this callback before the next repaint"
//! - [`MotionPreference`] - the "reduce motion" accessibility flag
//!
//! # Hosts
//!
//! - [`ManualFrameHost`] - stepped by the caller, deterministic
//! - [`IntervalFrameHost`] - fixed-rate background tick thread
//! - [`HeadlessFrameHost`] - no frame primitive; requests fail with
//!   [`PlatformError::Unavailable`]
//!
//! # Example
//!
//! ```
//! use pokeview_platform::{FrameHost, ManualFrameHost};
//!
//! let host = ManualFrameHost::new();
//! host.request_tick(Box::new(|ts| assert_eq!(ts, 16.0))).unwrap();
//! assert_eq!(host.advance(16.0), 1);
//! ```

mod error;
mod frame;
mod motion;

pub use error::{PlatformError, Result};
pub use frame::{
    FrameHost, HeadlessFrameHost, IntervalFrameHost, ManualFrameHost, TickCallback, TickId,
};
pub use motion::{
    EnvMotionPreference, MotionPreference, SharedMotionPreference, StaticMotionPreference,
    REDUCED_MOTION_ENV,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::frame::{FrameHost, ManualFrameHost, TickCallback, TickId};
    pub use crate::motion::{MotionPreference, StaticMotionPreference};
}
