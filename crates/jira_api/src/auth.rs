use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// Value for the `Authorization` header: `Basic base64(username:password)`.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}
