use super::*;

#[test]
fn base_url_trailing_slash_is_dropped() {
    let client = ApiClient::new("http://127.0.0.1:3000/");
    assert_eq!(client.url("/api/v1/auth/login"), "http://127.0.0.1:3000/api/v1/auth/login");
}

#[test]
fn verification_urls_follow_access_level() {
    let client = ApiClient::new("http://shop.test");
    assert_eq!(client.url(AccessLevel::User.path()), "http://shop.test/api/v1/auth/user-auth");
    assert_eq!(client.url(AccessLevel::Admin.path()), "http://shop.test/api/v1/auth/admin-auth");
}

#[test]
fn server_message_reads_envelope() {
    assert_eq!(server_message(r#"{"success":false,"message":"Invalid password"}"#), "Invalid password");
}

#[test]
fn server_message_falls_back_to_body() {
    assert_eq!(server_message("  Bad Gateway \n"), "Bad Gateway");
}

#[tokio::test]
async fn unreachable_server_fails_closed() {
    // Port 9 (discard) on loopback is not expected to accept HTTP.
    let client = ApiClient::new("http://127.0.0.1:9");
    assert!(!guard::verify::verify_user(&client, "tok").await);
}
