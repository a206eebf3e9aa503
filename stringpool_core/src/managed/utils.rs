use std::{alloc::Layout, mem};

/// For a given offset determine the total offset until the next alignment
pub const fn next_aligned(num_bytes: usize, alignment: usize) -> usize {
  let remaining = num_bytes % alignment;
  if remaining == 0 {
    num_bytes
  } else {
    num_bytes + (alignment - remaining)
  }
}

/// Determine the max alignment between the header `H`
/// and the node header `N`
pub const fn max_align<H, N>() -> usize {
  let n_align = mem::align_of::<N>();
  let h_align = mem::align_of::<H>();

  if n_align >= h_align {
    n_align
  } else {
    h_align
  }
}

/// Get the offset from the start of a node allocation to its content bytes
pub const fn get_content_offset<N>() -> usize {
  next_aligned(mem::size_of::<N>(), mem::align_of::<u8>())
}

/// Get the offset from the start of a head allocation to its embedded
/// node slot
pub const fn get_embed_offset<H, N>() -> usize {
  next_aligned(mem::size_of::<H>(), mem::align_of::<N>())
}

/// Create a rust `Layout` for a node holding `len` content bytes
pub fn make_node_layout<N>(len: usize) -> Layout {
  let num_bytes = get_content_offset::<N>() + len;
  Layout::from_size_align(num_bytes, mem::align_of::<N>()).unwrap()
}

/// Create a rust `Layout` for a head block followed by an embedded node
/// slot holding `len` content bytes
pub fn make_head_layout<H, N>(len: usize) -> Layout {
  let num_bytes = get_embed_offset::<H, N>() + get_content_offset::<N>() + len;
  Layout::from_size_align(num_bytes, max_align::<H, N>()).unwrap()
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn next_aligned_test() {
    assert_eq!(next_aligned(9, 4), 12);
    assert_eq!(next_aligned(13, 4), 16);
    assert_eq!(next_aligned(12, 4), 12);
    assert_eq!(next_aligned(13, 1), 13);
    assert_eq!(next_aligned(8, 8), 8);
    assert_eq!(next_aligned(16, 32), 32);
  }

  #[test]
  fn max_align_test() {
    let header_alignment = mem::align_of::<u64>();

    assert!(mem::align_of::<i32>() <= mem::align_of::<u64>());
    assert_eq!(max_align::<u64, i32>(), header_alignment);

    assert!(mem::align_of::<u8>() <= mem::align_of::<u64>());
    assert_eq!(max_align::<u64, u8>(), header_alignment);
  }

  #[test]
  fn get_content_offset_test() {
    assert_eq!(get_content_offset::<u32>(), 4);
    assert_eq!(get_content_offset::<u64>(), 8);
    assert_eq!(get_content_offset::<[usize; 3]>(), 3 * mem::size_of::<usize>());
  }

  #[test]
  fn get_embed_offset_test() {
    assert_eq!(get_embed_offset::<u32, u64>(), 8);
    assert_eq!(get_embed_offset::<u64, u64>(), 8);
    assert_eq!(get_embed_offset::<[u8; 9], u64>(), 16);
  }

  #[test]
  fn make_node_layout_test() {
    let layout = make_node_layout::<u64>(0);
    assert_eq!(layout.align(), mem::align_of::<u64>());
    assert_eq!(layout.size(), mem::size_of::<u64>());

    let layout = make_node_layout::<u64>(17);
    assert_eq!(layout.align(), mem::align_of::<u64>());
    assert_eq!(layout.size(), mem::size_of::<u64>() + 17);
  }

  #[test]
  fn make_head_layout_test() {
    let layout = make_head_layout::<u64, u64>(5);
    assert_eq!(layout.align(), mem::align_of::<u64>());
    assert_eq!(layout.size(), 2 * mem::size_of::<u64>() + 5);

    let layout = make_head_layout::<[u8; 12], u64>(0);
    assert_eq!(layout.align(), mem::align_of::<u64>());
    assert_eq!(layout.size(), 16 + mem::size_of::<u64>());
  }
}
