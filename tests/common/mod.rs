//! Shared helpers for pipeline tests
//!
//! Scripted providers, a recording notifier and record builders. Nothing
//! here touches the network.

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod mock_provider;

pub use fixtures::{s2_paper, test_config, write_seeds};
pub use mock_provider::{item_names, FixedExtractor, MockProvider, RecordingNotifier};
