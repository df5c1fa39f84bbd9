//! Detection probe for reCAPTCHA-style checkbox widgets.
//!
//! The probe looks at the widget's two embedded frames and reports whether the
//! session was blocked, a retry was requested, or the checkbox was verified.
//! Frames are reached through an injected [`FrameLocator`], so the same probe
//! runs against a live browser page or an in-memory [`SnapshotLocator`].
//!
//! ```rust
//! use anchorwatch_probe::{
//!     selectors, Classification, DetectionProbe, ResultChannel, SnapshotFrame, SnapshotLocator,
//! };
//!
//! # tokio_test_block_on(async {
//! let anchor = SnapshotFrame::new().with_attribute(
//!     selectors::CHECKBOX_ANCHOR_SELECTOR,
//!     selectors::CHECKED_ATTRIBUTE,
//!     "true",
//! );
//! let page = SnapshotLocator::new().with_frame("https://example.test/api2/anchor", anchor);
//!
//! let probe = DetectionProbe::new(page);
//! let mut channel = ResultChannel::new();
//! assert_eq!(probe.inspect_into(&mut channel).await, Classification::Solved);
//! assert!(channel.success);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod channel;
pub mod classification;
pub mod frame;
pub mod probe;
pub mod selectors;
pub mod snapshot;
pub mod watch;

pub use channel::ResultChannel;
pub use classification::Classification;
pub use frame::{FrameHandle, FrameLocator};
pub use probe::DetectionProbe;
pub use snapshot::{SnapshotFrame, SnapshotLocator};
pub use watch::{DetectionWatch, WatchOutcome};
