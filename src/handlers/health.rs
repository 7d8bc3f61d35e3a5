//! Liveness probe.

pub async fn check() -> &'static str {
    "OK"
}
