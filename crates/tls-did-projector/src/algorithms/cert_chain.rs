//! # Certificate Chain Framing
//!
//! Chains travel as PEM blocks joined by `\n`. Splitting cuts at every
//! newline that directly precedes a `BEGIN CERTIFICATE` marker, so newlines
//! inside a block are preserved. The root certificate is never part of a
//! stored chain.

/// Opening marker of a PEM certificate block.
pub const CERT_BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";

/// Split a concatenated blob into its certificates, in order.
///
/// An empty blob yields no certificates.
pub fn split_chain(blob: &str) -> Vec<String> {
    if blob.is_empty() {
        return Vec::new();
    }

    let boundary = format!("\n{}", CERT_BEGIN_MARKER);
    let mut certs = Vec::new();
    let mut start = 0;
    for (idx, _) in blob.match_indices(&boundary) {
        certs.push(blob[start..idx].to_string());
        // Skip the newline, keep the marker
        start = idx + 1;
    }
    certs.push(blob[start..].to_string());
    certs
}

/// Join certificates into the wire blob.
pub fn join_chain(certs: &[String]) -> String {
    certs.join("\n")
}
