use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Action the per-item edit form is signed for.
pub const SEO_ACTION: &str = "mt-seo";
/// Form field carrying the nonce.
pub const NONCE_FIELD: &str = "mt_seo_nonce";

const TICK_SECONDS: i64 = 12 * 60 * 60;
const NONCE_LEN: usize = 10;

/// Issues and checks short-lived form tokens bound to an action.
/// A nonce stays valid for the tick it was minted in and the one after.
pub struct Nonces {
    secret: String,
}

impl Nonces {
    pub fn new(secret: &str) -> Self {
        Nonces {
            secret: secret.to_string(),
        }
    }

    pub fn create(&self, action: &str) -> String {
        self.create_at(action, chrono::Utc::now().timestamp())
    }

    pub fn verify(&self, nonce: &str, action: &str) -> bool {
        self.verify_at(nonce, action, chrono::Utc::now().timestamp())
    }

    fn create_at(&self, action: &str, now: i64) -> String {
        self.sign(tick(now), action)
    }

    fn verify_at(&self, nonce: &str, action: &str, now: i64) -> bool {
        if nonce.is_empty() {
            return false;
        }
        let current = tick(now);
        [current, current - 1].iter().any(|t| {
            let expected = self.sign(*t, action);
            !expected.is_empty()
                && super::constant_time_eq(nonce.as_bytes(), expected.as_bytes())
        })
    }

    fn sign(&self, tick: i64, action: &str) -> String {
        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(m) => m,
            Err(_) => return String::new(),
        };
        mac.update(format!("{}|{}", tick, action).as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        digest[..NONCE_LEN].to_string()
    }
}

fn tick(now: i64) -> i64 {
    now.div_euclid(TICK_SECONDS)
}

/// Random secret used when none is configured.
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn nonce_verifies_for_same_action() {
        let n = Nonces::new("secret");
        let nonce = n.create_at(SEO_ACTION, NOW);
        assert_eq!(nonce.len(), 10);
        assert!(n.verify_at(&nonce, SEO_ACTION, NOW));
        assert!(!n.verify_at(&nonce, "other-action", NOW));
    }

    #[test]
    fn nonce_survives_one_tick() {
        let n = Nonces::new("secret");
        let nonce = n.create_at(SEO_ACTION, NOW);
        assert!(n.verify_at(&nonce, SEO_ACTION, NOW + TICK_SECONDS));
        assert!(!n.verify_at(&nonce, SEO_ACTION, NOW + 2 * TICK_SECONDS + 1));
    }

    #[test]
    fn nonce_bound_to_secret() {
        let nonce = Nonces::new("one").create_at(SEO_ACTION, NOW);
        assert!(!Nonces::new("two").verify_at(&nonce, SEO_ACTION, NOW));
        assert!(!Nonces::new("one").verify_at("", SEO_ACTION, NOW));
    }

    #[test]
    fn generated_secrets_differ() {
        let a = generate_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, generate_secret());
    }
}
