use std::rc::Rc;
use stringpool_core::{hash, StringPool, UsageReport};
use stringpool_env::io::Io;
use stringpool_env::stdio::support::{IoStdioTest, StdioTestContainer};
use stringpool_native::io::io_native;

fn capture_pool(container: &StdioTestContainer) -> StringPool {
  let io = Io::default().with_stdio(Rc::new(IoStdioTest::new(container)));
  StringPool::new(io)
}

/// Mine a string distinct from `base` that shares its (bucket, key) pair
fn colliding_with(base: &str) -> String {
  let target = hash::split_hash(hash::hash_text(base).0);

  for i in 0usize.. {
    let probe = format!("probe_{}", i);
    if probe != base && hash::split_hash(hash::hash_text(&probe).0) == target {
      return probe;
    }
  }

  unreachable!()
}

#[test]
fn shared_handle_lifecycle() {
  let container = StdioTestContainer::default();
  let mut pool = capture_pool(&container);
  assert_eq!(pool.init(), 1);

  let first = pool.intern("hello").expect("intern failed");
  let second = pool.intern("hello").expect("intern failed");
  assert_eq!(first, second);
  assert_eq!(first.to_usize(), second.to_usize());

  pool.release(first);
  assert_eq!(pool.usage().unique, 1);

  pool.release(second);
  assert_eq!(pool.usage().unique, 0);

  pool.dump().expect("dump failed");
  let out = container.stdout.to_utf8();
  assert!(out.contains("(0 duplicates, 0 unique)"));

  assert_eq!(pool.shutdown(), 0);
}

#[test]
fn teardown_then_reinit_observes_empty_table() {
  let mut pool = StringPool::default();
  pool.init();

  pool.intern("one").expect("intern failed");
  pool.intern("two").expect("intern failed");
  pool.intern("two").expect("intern failed");
  assert_eq!(pool.shutdown(), 0);

  assert_eq!(pool.init(), 1);
  assert_eq!(pool.usage(), UsageReport::default());
  assert_eq!(pool.shutdown(), 0);
}

#[test]
fn move_to_front_reorders_dump() {
  let container = StdioTestContainer::default();
  let mut pool = capture_pool(&container);
  pool.init();

  let base = "front_runner";
  let other = colliding_with(base);

  // base lands first in the chain, other is pushed in front of it
  let h_base = pool.intern(base).expect("intern failed");
  let h_other = pool.intern(&other).expect("intern failed");

  // a rehit on base moves it back to the front of the chain
  let h_again = pool.intern(base).expect("intern failed");

  pool.dump().expect("dump failed");
  let out = container.stdout.to_utf8();

  let base_at = out.find(base).expect("entry missing from dump");
  let other_at = out.find(other.as_str()).expect("entry missing from dump");
  assert!(base_at < other_at);

  pool.release(h_again);
  pool.release(h_other);
  pool.release(h_base);
  pool.shutdown();
}

#[test]
fn colliding_entries_release_independently() {
  let mut pool = StringPool::default();
  pool.init();

  let base = "independent";
  let first_twin = colliding_with(base);
  let second_twin = colliding_with(&first_twin);

  let a = pool.intern(base).expect("intern failed");
  let b = pool.intern(&first_twin).expect("intern failed");
  let c = pool.intern(&second_twin).expect("intern failed");

  assert_eq!(pool.usage().unique, 3);

  pool.release(b);
  assert_eq!(pool.usage().unique, 2);
  assert_eq!(&*a, base);
  assert_eq!(&*c, second_twin.as_str());

  pool.release(a);
  pool.release(c);
  assert_eq!(pool.usage().unique, 0);
  pool.shutdown();
}

#[test]
fn native_io_smoke() {
  let mut pool = StringPool::new(io_native());
  assert_eq!(pool.init(), 1);

  let handle = pool.intern("native").expect("intern failed");
  assert_eq!(&*handle, "native");

  pool.release(handle);
  assert_eq!(pool.shutdown(), 0);
}
