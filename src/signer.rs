//! Request signing for the upstream API
//!
//! Every upstream request carries `ts`, `apikey` and `hash` query parameters,
//! where `hash` is the lowercase hex MD5 of `ts + private_key + public_key`
//! concatenated as plain strings in exactly that order.

/// Compute the request hash for a timestamp and key pair
pub fn sign(timestamp: i64, public_key: &str, private_key: &str) -> String {
    let digest = md5::compute(format!("{timestamp}{private_key}{public_key}"));
    format!("{:x}", digest)
}
