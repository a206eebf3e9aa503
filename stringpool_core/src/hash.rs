use fnv::FnvHasher;
use std::hash::Hasher;

/// The number of top level bucket slots
pub const BUCKET_COUNT: usize = 256;

const BUCKET_MASK: u32 = 0xFF;

/// Hash `text` in a single pass, returning a 32 bit hash together with
/// the content byte length. The length never counts a terminator and is
/// used with exactly this meaning everywhere: allocation sizing, content
/// copies and comparisons.
pub fn hash_text(text: &str) -> (u32, usize) {
  let mut hasher = FnvHasher::default();
  hasher.write(text.as_bytes());
  let hash = hasher.finish();

  ((hash ^ (hash >> 32)) as u32, text.len())
}

/// Split a 32 bit hash into its two independent 8 bit index fields: the
/// low byte selects the bucket, the next byte orders heads inside the
/// bucket's tree
pub fn split_hash(hash: u32) -> (usize, u8) {
  ((hash & BUCKET_MASK) as usize, ((hash >> 8) & BUCKET_MASK) as u8)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn deterministic() {
    let (first, len) = hash_text("determinism");
    let (second, _) = hash_text("determinism");

    assert_eq!(first, second);
    assert_eq!(len, 11);
  }

  #[test]
  fn length_is_byte_length() {
    assert_eq!(hash_text("").1, 0);
    assert_eq!(hash_text("a").1, 1);
    assert_eq!(hash_text("héllo").1, 6);
  }

  #[test]
  fn split_fields_are_independent_bytes() {
    let (bucket, key) = split_hash(0x0000_BEEF);
    assert_eq!(bucket, 0xEF);
    assert_eq!(key, 0xBE);

    let (bucket, key) = split_hash(0xFFFF_0000);
    assert_eq!(bucket, 0);
    assert_eq!(key, 0);
  }

  #[test]
  fn bucket_in_range() {
    for text in ["", "a", "alpha", "beta", "gamma", "a slightly longer key"] {
      let (bucket, _) = split_hash(hash_text(text).0);
      assert!(bucket < BUCKET_COUNT);
    }
  }
}
