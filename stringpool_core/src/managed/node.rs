use super::utils::{get_content_offset, make_node_layout};
use std::{
  alloc, fmt,
  ptr::{self, NonNull},
  slice, str,
};

/// The header of a content node allocation. The node's immutable content
/// bytes live immediately after the header in the same allocation, so the
/// address handed out to callers stays stable for the node's whole
/// lifetime.
#[repr(C)]
pub struct NodeHeader {
  /// The next node in the owning head's chain
  pub next: Option<NodeRef>,

  /// Byte length of the stored content, a terminator is never counted
  pub length: usize,

  /// The number of outstanding handles to this node
  pub references: u32,

  /// Whether this node's storage is co-allocated with its head
  pub embedded: bool,
}

/// A non owning reference to a content node allocation. Note this
/// reference is the same size as a single pointer.
pub struct NodeRef {
  ptr: NonNull<u8>,
}

impl NodeRef {
  /// Allocate a standalone node holding a copy of `text`, returning
  /// `None` when the allocation fails
  pub fn alloc(text: &str) -> Option<NodeRef> {
    let layout = make_node_layout::<NodeHeader>(text.len());
    let buf = unsafe { alloc::alloc(layout) };

    NonNull::new(buf).map(|ptr| unsafe { NodeRef::init(ptr, text, false) })
  }

  /// Write a node header and a copy of `text` into the provided block,
  /// returning a reference to the now initialized node.
  ///
  /// ## Safety
  /// `ptr` must point to writable memory of at least
  /// `make_node_layout::<NodeHeader>(text.len())` bytes that outlives the
  /// returned reference
  pub unsafe fn init(ptr: NonNull<u8>, text: &str, embedded: bool) -> NodeRef {
    #[allow(clippy::cast_ptr_alignment)]
    ptr::write(
      ptr.as_ptr() as *mut NodeHeader,
      NodeHeader {
        next: None,
        length: text.len(),
        references: 1,
        embedded,
      },
    );
    ptr::copy_nonoverlapping(
      text.as_ptr(),
      ptr.as_ptr().add(get_content_offset::<NodeHeader>()),
      text.len(),
    );

    NodeRef { ptr }
  }

  /// Retrieve the header of this node
  #[inline]
  pub fn header(&self) -> &NodeHeader {
    #[allow(clippy::cast_ptr_alignment)]
    unsafe {
      &*(self.ptr.as_ptr() as *const NodeHeader)
    }
  }

  /// Retrieve the header of this node mutably
  #[inline]
  pub fn header_mut(&mut self) -> &mut NodeHeader {
    #[allow(clippy::cast_ptr_alignment)]
    unsafe {
      &mut *(self.ptr.as_ptr() as *mut NodeHeader)
    }
  }

  /// Get the stable address of this node's allocation
  #[inline]
  pub fn as_alloc_ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  /// The stored content bytes
  #[inline]
  pub fn as_bytes(&self) -> &[u8] {
    unsafe {
      slice::from_raw_parts(
        self.ptr.as_ptr().add(get_content_offset::<NodeHeader>()),
        self.header().length,
      )
    }
  }

  /// The stored content as utf8
  #[inline]
  pub fn as_str(&self) -> &str {
    unsafe { str::from_utf8_unchecked(self.as_bytes()) }
  }

  /// Free this node's standalone allocation.
  ///
  /// ## Safety
  /// The node must not be embedded, must already be unlinked from its
  /// chain and no handle to it may be dereferenced afterwards
  pub unsafe fn dealloc(self) {
    debug_assert!(!self.header().embedded);

    let layout = make_node_layout::<NodeHeader>(self.header().length);
    alloc::dealloc(self.ptr.as_ptr(), layout);
  }
}

impl Copy for NodeRef {}
impl Clone for NodeRef {
  fn clone(&self) -> Self {
    *self
  }
}

impl PartialEq for NodeRef {
  #[inline]
  fn eq(&self, other: &NodeRef) -> bool {
    ptr::eq(self.ptr.as_ptr(), other.ptr.as_ptr())
  }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeRef").field("ptr", &self.ptr).finish()
  }
}
