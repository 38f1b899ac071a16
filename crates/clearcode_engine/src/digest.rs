use sha2::{Digest, Sha256};

const FINGERPRINT_LEN: usize = 12;

/// Short, stable stand-in for editor text in logs, so user code itself is
/// never written out.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("sha256:{}", &hex[..FINGERPRINT_LEN])
}
