use super::node::{NodeHeader, NodeRef};
use super::utils::{get_embed_offset, make_head_layout};
use std::{
  alloc,
  ptr::{self, NonNull},
};

/// A collision head: the tree node grouping every interned string that
/// shares one (bucket, key) pair. The head owns its chain of content
/// nodes and its allocation carries a slot for one embedded node, sized
/// for the first string ever interned under it. That first string rides
/// along in the head's allocation and saves a second trip to the
/// allocator for the common case of an uncontended hash.
#[repr(C)]
pub struct Head {
  /// First node of the chain
  pub chain: Option<NodeRef>,

  /// Byte capacity of the embedded node slot, required to rebuild the
  /// allocation layout when the block is freed
  pub embed_len: usize,

  /// The 8 bit secondary hash used as this head's tree key
  pub key: u8,

  /// Live nodes currently chained under this head
  #[cfg(feature = "usage_stats")]
  pub population: u32,
}

/// A non owning reference to a head allocation
pub struct HeadRef {
  ptr: NonNull<u8>,
}

impl HeadRef {
  /// Allocate a head block with an embedded node slot sized for
  /// `embed_len` content bytes, returning `None` when the allocation
  /// fails. The embedded slot is left uninitialized until the caller
  /// commits a string to it.
  pub fn alloc(key: u8, embed_len: usize) -> Option<HeadRef> {
    let layout = make_head_layout::<Head, NodeHeader>(embed_len);
    let buf = unsafe { alloc::alloc(layout) };

    NonNull::new(buf).map(|ptr| {
      #[allow(clippy::cast_ptr_alignment)]
      unsafe {
        ptr::write(
          ptr.as_ptr() as *mut Head,
          Head {
            chain: None,
            embed_len,
            key,
            #[cfg(feature = "usage_stats")]
            population: 0,
          },
        );
      }

      HeadRef { ptr }
    })
  }

  /// Retrieve the header of this head
  #[inline]
  pub fn header(&self) -> &Head {
    #[allow(clippy::cast_ptr_alignment)]
    unsafe {
      &*(self.ptr.as_ptr() as *const Head)
    }
  }

  /// Retrieve the header of this head mutably
  #[inline]
  pub fn header_mut(&mut self) -> &mut Head {
    #[allow(clippy::cast_ptr_alignment)]
    unsafe {
      &mut *(self.ptr.as_ptr() as *mut Head)
    }
  }

  /// The uninitialized embedded node slot co-allocated with this head
  #[inline]
  pub fn embed_slot(&self) -> NonNull<u8> {
    unsafe {
      NonNull::new_unchecked(
        self
          .ptr
          .as_ptr()
          .add(get_embed_offset::<Head, NodeHeader>()),
      )
    }
  }

  /// Free every remaining standalone node in the chain, then the head
  /// block itself. Embedded storage is reclaimed with the block.
  ///
  /// ## Safety
  /// The head must already be removed from its bucket tree and no handle
  /// into its chain may be dereferenced afterwards
  pub unsafe fn dealloc(self) {
    let mut cursor = self.header().chain;
    while let Some(node) = cursor {
      cursor = node.header().next;
      if !node.header().embedded {
        node.dealloc();
      }
    }

    let embed_len = self.header().embed_len;
    alloc::dealloc(
      self.ptr.as_ptr(),
      make_head_layout::<Head, NodeHeader>(embed_len),
    );
  }
}

impl Copy for HeadRef {}
impl Clone for HeadRef {
  fn clone(&self) -> Self {
    *self
  }
}

#[cfg(test)]
mod test {
  use super::*;

  mod alloc {
    use super::*;

    #[test]
    fn fresh_head_is_empty() {
      let head = HeadRef::alloc(42, 5).expect("allocation failed");

      assert_eq!(head.header().key, 42);
      assert_eq!(head.header().embed_len, 5);
      assert!(head.header().chain.is_none());

      unsafe { head.dealloc() };
    }
  }

  mod chain {
    use super::*;

    #[test]
    fn embedded_then_standalone() {
      let mut head = HeadRef::alloc(7, 5).expect("allocation failed");

      let embedded = unsafe { NodeRef::init(head.embed_slot(), "first", true) };
      head.header_mut().chain = Some(embedded);

      let mut second = NodeRef::alloc("second").expect("allocation failed");
      second.header_mut().next = head.header().chain;
      head.header_mut().chain = Some(second);

      assert!(embedded.header().embedded);
      assert!(!second.header().embedded);
      assert_eq!(head.header().chain, Some(second));
      assert_eq!(second.header().next, Some(embedded));
      assert_eq!(embedded.as_str(), "first");
      assert_eq!(second.as_str(), "second");

      // both nodes, chained or embedded, go down with the head
      unsafe { head.dealloc() };
    }
  }
}
