use crate::hash::{hash_text, split_hash, BUCKET_COUNT};
use crate::managed::{HeadRef, Interned, NodeRef};
use std::alloc::{self, Layout};
use std::collections::BTreeMap;
use std::io::Write;
use std::process;
use std::ptr::{self, NonNull};
use stringpool_env::io::Io;
use termcolor::{Color, ColorSpec, WriteColor};

/// When this variable is set in the process environment a misuse of
/// [`StringPool::release`] aborts the process instead of only warning.
/// Intended for development builds.
pub const ABORT_ENV: &str = "STRINGPOOL_ABORT";

/// One top level slot: a balanced search tree over collision heads,
/// ordered by their 8 bit secondary hash
type Bucket = BTreeMap<u8, HeadRef>;

fn buckets_layout() -> Layout {
  Layout::array::<Bucket>(BUCKET_COUNT).unwrap()
}

#[cfg(feature = "usage_stats")]
#[derive(Debug, Default)]
struct UsageStats {
  population: usize,
  max_population: usize,
  max_node_population: usize,
}

/// An interning table for immutable strings. Equal content is stored
/// exactly once; callers hold shared read only [`Interned`] handles to
/// the canonical copy and give them back through [`release`] when done.
/// Storage is reclaimed when the last handle to an entry is released.
///
/// The pool is deliberately single threaded: all mutation funnels
/// through `&mut self` and the type is neither `Send` nor `Sync`.
/// Callers that share a pool across threads must serialize every
/// operation behind their own lock.
///
/// [`release`]: StringPool::release
///
/// ## Example
/// ```
/// use stringpool_core::StringPool;
///
/// let mut pool = StringPool::default();
/// assert_eq!(pool.init(), 1);
///
/// let first = pool.intern("symbol").unwrap();
/// let second = pool.intern("symbol").unwrap();
/// assert_eq!(first, second);
///
/// pool.release(first);
/// pool.release(second);
/// assert_eq!(pool.shutdown(), 0);
/// ```
pub struct StringPool {
  /// The 256 slot bucket array, present while the pool is initialized
  buckets: Option<NonNull<Bucket>>,

  /// Nested init / shutdown pairs currently outstanding
  init_count: usize,

  /// Io in the given environment
  io: Io,

  #[cfg(feature = "usage_stats")]
  stats: UsageStats,
}

impl StringPool {
  /// Create a new un-initialized pool wired to the provided io. No
  /// storage is allocated until [`init`] is called.
  ///
  /// [`init`]: StringPool::init
  ///
  /// ## Example
  /// ```
  /// use stringpool_core::StringPool;
  /// use stringpool_env::io::Io;
  ///
  /// let pool = StringPool::new(Io::default());
  /// ```
  pub fn new(io: Io) -> Self {
    Self {
      buckets: None,
      init_count: 0,
      io,
      #[cfg(feature = "usage_stats")]
      stats: UsageStats::default(),
    }
  }

  /// Increment the nested use count, allocating the empty bucket table
  /// on the 0 to 1 transition. Returns the new use count, or 0 when the
  /// table allocation failed, in which case the count is unchanged.
  pub fn init(&mut self) -> usize {
    if self.buckets.is_none() {
      #[allow(clippy::cast_ptr_alignment)]
      let buf = unsafe { alloc::alloc(buckets_layout()) } as *mut Bucket;
      let buckets = match NonNull::new(buf) {
        Some(buckets) => buckets,
        None => return 0,
      };

      for i in 0..BUCKET_COUNT {
        unsafe { ptr::write(buckets.as_ptr().add(i), Bucket::new()) };
      }
      self.buckets = Some(buckets);
    }

    self.init_count += 1;
    self.init_count
  }

  /// Decrement the nested use count. On the 1 to 0 transition every
  /// remaining entry is freed regardless of outstanding references and
  /// the bucket table itself is released; any handle still held by a
  /// caller is dead from that point on. Returns the post decrement
  /// count, 0 meaning the pool is fully torn down.
  pub fn shutdown(&mut self) -> usize {
    self.init_count = self.init_count.saturating_sub(1);
    if self.init_count == 0 {
      self.teardown();
    }

    self.init_count
  }

  /// Obtain the canonical handle for `text`, storing a copy if the
  /// content is not already present. Returns `None` when an allocation
  /// fails or the pool is not initialized; no partial structure is left
  /// behind in either case.
  ///
  /// ## Example
  /// ```
  /// use stringpool_core::StringPool;
  ///
  /// let mut pool = StringPool::default();
  /// pool.init();
  ///
  /// let first = pool.intern("canonical").unwrap();
  /// let second = pool.intern("canonical").unwrap();
  ///
  /// // both handles point at the same storage
  /// assert_eq!(first, second);
  /// ```
  pub fn intern(&mut self, text: &str) -> Option<Interned> {
    let buckets = self.buckets?;
    let (hash, length) = hash_text(text);
    let (bucket_index, key) = split_hash(hash);

    let bucket = unsafe { &mut *buckets.as_ptr().add(bucket_index) };

    // A fresh head carries an embedded slot for this string; the slot is
    // only committed once the chain walk below confirms there is no match.
    let mut fresh_slot = None;
    let mut head = match bucket.get(&key) {
      Some(&head) => head,
      None => {
        let head = HeadRef::alloc(key, length)?;
        bucket.insert(key, head);
        fresh_slot = Some(head.embed_slot());
        head
      },
    };

    // An exact match requires equal length and equal bytes, never hash
    // equality alone.
    let mut prev: Option<NodeRef> = None;
    let mut cursor = head.header().chain;
    while let Some(node) = cursor {
      if node.header().length == length && node.as_bytes() == text.as_bytes() {
        break;
      }
      prev = Some(node);
      cursor = node.header().next;
    }

    if let Some(mut node) = cursor {
      // Move a rehit to the front of the chain, repeated lookups cluster
      // in time.
      if let Some(mut prev) = prev {
        prev.header_mut().next = node.header().next;
        node.header_mut().next = head.header().chain;
        head.header_mut().chain = Some(node);
      }

      node.header_mut().references += 1;
      return Some(Interned::new(node));
    }

    let mut node = match fresh_slot {
      Some(slot) => unsafe { NodeRef::init(slot, text, true) },
      None => NodeRef::alloc(text)?,
    };

    node.header_mut().next = head.header().chain;
    head.header_mut().chain = Some(node);

    #[cfg(feature = "usage_stats")]
    self.record_insert(head);

    Some(Interned::new(node))
  }

  /// Give back one unit of ownership over `handle`'s entry. When the
  /// reference count reaches 0 the entry is unlinked and freed, and a
  /// head whose chain empties is removed from its tree. A handle that
  /// does not name a live entry of this pool is a misuse: it is reported
  /// on the warning stream, aborts the process when [`ABORT_ENV`] is
  /// set, and otherwise leaves the pool untouched.
  ///
  /// ## Example
  /// ```
  /// use stringpool_core::StringPool;
  ///
  /// let mut pool = StringPool::default();
  /// pool.init();
  ///
  /// let handle = pool.intern("transient").unwrap();
  /// pool.release(handle);
  /// assert_eq!(pool.usage().unique, 0);
  /// ```
  pub fn release(&mut self, handle: Interned) {
    let buckets = match self.buckets {
      Some(buckets) => buckets,
      None => return self.misuse(&handle),
    };

    // The handle does not carry its hash, recompute it from the content.
    let (hash, _) = hash_text(&handle);
    let (bucket_index, key) = split_hash(hash);

    let bucket = unsafe { &mut *buckets.as_ptr().add(bucket_index) };

    let mut head = match bucket.get(&key) {
      Some(&head) => head,
      None => return self.misuse(&handle),
    };

    // Identity match on the allocation address, not content equality: a
    // caller supplied buffer with equal text is still a misuse.
    let target = handle.node();
    let mut prev: Option<NodeRef> = None;
    let mut cursor = head.header().chain;
    while let Some(node) = cursor {
      if node == target {
        break;
      }
      prev = Some(node);
      cursor = node.header().next;
    }

    let mut node = match cursor {
      Some(node) => node,
      None => return self.misuse(&handle),
    };

    node.header_mut().references -= 1;
    if node.header().references > 0 {
      return;
    }

    match prev {
      Some(mut prev) => prev.header_mut().next = node.header().next,
      None => head.header_mut().chain = node.header().next,
    }

    #[cfg(feature = "usage_stats")]
    self.record_remove(head);

    // An embedded node's storage is reclaimed with its head.
    if !node.header().embedded {
      unsafe { node.dealloc() };
    }

    if head.header().chain.is_none() {
      bucket.remove(&key);
      unsafe { head.dealloc() };
    }
  }

  /// Visit every live head, buckets in ascending order and heads in key
  /// order within each bucket
  pub(crate) fn each_head<F: FnMut(HeadRef)>(&self, mut visit: F) {
    if let Some(buckets) = self.buckets {
      for i in 0..BUCKET_COUNT {
        let bucket = unsafe { &*buckets.as_ptr().add(i) };
        for head in bucket.values() {
          visit(*head);
        }
      }
    }
  }

  /// Whether the pool currently holds a bucket table
  pub(crate) fn initialized(&self) -> bool {
    self.buckets.is_some()
  }

  /// A fresh wrapper to the stdio facilities this pool reports through
  pub(crate) fn stdio(&self) -> stringpool_env::stdio::Stdio {
    self.io.stdio()
  }

  /// Report a release that does not correspond to any live entry
  fn misuse(&self, handle: &Interned) {
    let mut stdio = self.io.stdio();
    let stderr = stdio.stderr_color();

    // A failed warning write has nowhere left to be reported.
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = write!(stderr, "warning");
    let _ = stderr.reset();
    let _ = writeln!(
      stderr,
      ": released a string that was never interned: '{}'",
      &**handle
    );

    if self.io.env().var(ABORT_ENV).is_some() {
      process::abort();
    }
  }

  fn teardown(&mut self) {
    if let Some(buckets) = self.buckets.take() {
      #[cfg(feature = "usage_stats")]
      self.report_stats();

      for i in 0..BUCKET_COUNT {
        let bucket = unsafe { ptr::read(buckets.as_ptr().add(i)) };
        for head in bucket.into_values() {
          unsafe { head.dealloc() };
        }
      }

      unsafe { alloc::dealloc(buckets.as_ptr() as *mut u8, buckets_layout()) };
    }

    #[cfg(feature = "usage_stats")]
    {
      self.stats = UsageStats::default();
    }
  }

  #[cfg(feature = "usage_stats")]
  fn record_insert(&mut self, mut head: HeadRef) {
    head.header_mut().population += 1;

    self.stats.population += 1;
    if self.stats.population > self.stats.max_population {
      self.stats.max_population = self.stats.population;
    }
    if head.header().population as usize > self.stats.max_node_population {
      self.stats.max_node_population = head.header().population as usize;
    }
  }

  #[cfg(feature = "usage_stats")]
  fn record_remove(&mut self, mut head: HeadRef) {
    head.header_mut().population -= 1;
    self.stats.population -= 1;
  }

  #[cfg(feature = "usage_stats")]
  fn report_stats(&self) {
    let mut stdio = self.io.stdio();
    let stderr = stdio.stderr();

    let _ = writeln!(stderr, "string pool statistics:");
    let _ = writeln!(
      stderr,
      " * maximum shared strings : {}",
      self.stats.max_population
    );
    let _ = writeln!(
      stderr,
      " * maximum shared strings per head : {}",
      self.stats.max_node_population
    );
  }
}

impl Default for StringPool {
  fn default() -> Self {
    StringPool::new(Io::default())
  }
}

impl Drop for StringPool {
  fn drop(&mut self) {
    self.teardown();
  }
}
