use crate::trace::{Arrival, MAX_TOKEN_LEN};

#[test]
fn parses_six_token_line() {
    let a = Arrival::parse("0 1.1.1.1 10 2.2.2.2 20 100").expect("arrival");
    assert_eq!(a.time, 0);
    assert_eq!(a.conn.as_str(), "1.1.1.1 10 2.2.2.2 20");
    assert_eq!(a.length, 100);
    assert!(a.weight.is_none());
}

#[test]
fn parses_seven_token_line_with_explicit_weight() {
    let a = Arrival::parse("5 A a B b 42 2.50").expect("arrival");
    assert_eq!(a.time, 5);
    assert_eq!(a.conn.as_str(), "A a B b");
    assert_eq!(a.length, 42);
    assert_eq!(a.weight, Some(2.5));
}

#[test]
fn collapses_repeated_separators() {
    let a = Arrival::parse("  7   A  a   B  b   9  ").expect("arrival");
    assert_eq!(a.time, 7);
    assert_eq!(a.conn.as_str(), "A a B b");
    assert_eq!(a.length, 9);
}

#[test]
fn address_tokens_are_opaque() {
    // 不做地址语法校验，token 原样进入连接键。
    let a = Arrival::parse("0 not-an-ip :: xyz !? 1").expect("arrival");
    assert_eq!(a.conn.as_str(), "not-an-ip :: xyz !?");
}

#[test]
fn rejects_wrong_token_counts() {
    assert!(Arrival::parse("").is_none());
    assert!(Arrival::parse("   ").is_none());
    assert!(Arrival::parse("0 A a B b").is_none());
    assert!(Arrival::parse("0 A a B b 100 1.00 extra").is_none());
}

#[test]
fn rejects_non_numeric_fields() {
    assert!(Arrival::parse("x A a B b 100").is_none());
    assert!(Arrival::parse("0 A a B b len").is_none());
    assert!(Arrival::parse("0 A a B b 100 heavy").is_none());
    assert!(Arrival::parse("-1 A a B b 100").is_none());
}

#[test]
fn rejects_overlong_address_tokens() {
    let long = "x".repeat(MAX_TOKEN_LEN + 1);
    assert!(Arrival::parse(&format!("0 {long} a B b 100")).is_none());

    let max = "x".repeat(MAX_TOKEN_LEN);
    let a = Arrival::parse(&format!("0 {max} a B b 100")).expect("31-char token is legal");
    assert!(a.conn.as_str().starts_with(&max));
}
