//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::{admin_token, session_token, shopper_token, TestEnvironment, ADMIN_USERNAME, SESSION_SECRET};
#[allow(unused_imports)]
pub use mocks::{
    mount_resend_error, mount_resend_ok, mount_send_message_error, mount_send_message_ok, RecordingEmail,
    RecordingTelegram,
};
