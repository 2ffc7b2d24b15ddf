//! Integration tests for the stackship CLI
//!
//! External tools (eups, curl, rclone, cvmfs_server) are replaced by stub
//! shell scripts on a prepended PATH, so the suite is unix-only.
#![cfg(unix)]

mod helpers;
mod test_deploy;
mod test_doctor;
mod test_init;
mod test_publish;
mod test_tag;
mod test_upload;
