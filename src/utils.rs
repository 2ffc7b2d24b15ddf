//! Utility functions for upload destination handling

/// Extract the rclone remote name from a destination, if it has one
///
/// Returns the remote for:
/// - Configured remotes: `s3:bucket/prefix` -> `s3`
/// - Bare remotes: `backup:` -> `backup`
///
/// Returns None for:
/// - Absolute paths on Unix: /var/spool/archives
/// - Absolute paths on Windows: C:\archives or C:/archives
/// - Relative paths: ./archives or ../archives
/// - Anything without a colon-separated remote name
pub fn remote_name(dest: &str) -> Option<&str> {
  // Relative and absolute paths are never remotes
  if dest.starts_with('/') || dest.starts_with("./") || dest.starts_with("../") || dest.starts_with('\\') {
    return None;
  }

  // Windows drive letter (C:\ or C:/)
  // Must check before the remote check since drive paths contain ':'
  if dest.len() >= 3 {
    let bytes = dest.as_bytes();
    if bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/') {
      return None;
    }
  }

  match dest.split_once(':') {
    Some((name, _)) if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') => {
      Some(name)
    }
    _ => None,
  }
}

/// Check if a destination is a plain local directory rather than a remote
pub fn is_local_dest(dest: &str) -> bool {
  remote_name(dest).is_none()
}
