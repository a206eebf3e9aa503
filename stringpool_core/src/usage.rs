use crate::managed::{Head, HeadRef, NodeHeader};
use crate::pool::StringPool;
use std::io::{self, Write};
use std::mem;

/// Aggregate usage of the live entries of a pool
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UsageReport {
  /// Total bytes held: head and node overhead plus content
  pub used: usize,

  /// Bytes that sharing avoided, `(references - 1) * length` summed
  pub saved: usize,

  /// Total duplicate references across all entries
  pub dups: usize,

  /// Number of distinct interned strings
  pub unique: usize,
}

impl UsageReport {
  fn visit_head(&mut self) {
    self.used += mem::size_of::<Head>();
  }

  fn visit_node(&mut self, header: &NodeHeader) {
    self.used += mem::size_of::<NodeHeader>() + header.length;
    self.saved += (header.references as usize - 1) * header.length;
    self.dups += header.references as usize - 1;
    self.unique += 1;
  }
}

impl StringPool {
  /// Walk the whole table, buckets in ascending order, heads in key
  /// order and chains front to back, accumulating a usage report. Read
  /// only; an un-initialized pool reports all zeros.
  ///
  /// ## Example
  /// ```
  /// use stringpool_core::StringPool;
  ///
  /// let mut pool = StringPool::default();
  /// pool.init();
  ///
  /// let first = pool.intern("metric").unwrap();
  /// let second = pool.intern("metric").unwrap();
  ///
  /// let report = pool.usage();
  /// assert_eq!(report.unique, 1);
  /// assert_eq!(report.dups, 1);
  /// assert_eq!(report.saved, "metric".len());
  ///
  /// pool.release(first);
  /// pool.release(second);
  /// ```
  pub fn usage(&self) -> UsageReport {
    let mut report = UsageReport::default();

    self.each_head(|head| {
      report.visit_head();

      let mut cursor = head.header().chain;
      while let Some(node) = cursor {
        report.visit_node(node.header());
        cursor = node.header().next;
      }
    });

    report
  }

  /// Write one line per interned string, length, reference count and
  /// quoted content, followed by a usage summary, to the diagnostic
  /// stream. The traversal matches [`usage`].
  ///
  /// [`usage`]: StringPool::usage
  pub fn dump(&self) -> io::Result<()> {
    if !self.initialized() {
      return Ok(());
    }

    let mut heads: Vec<HeadRef> = vec![];
    self.each_head(|head| heads.push(head));

    let mut report = UsageReport::default();
    let mut stdio = self.stdio();
    let out = stdio.stdout();

    writeln!(out, "  len   ref string")?;
    writeln!(out, "-------------------")?;

    for head in heads {
      report.visit_head();

      let mut cursor = head.header().chain;
      while let Some(node) = cursor {
        let header = node.header();
        writeln!(
          out,
          "{:5} {:5} '{}'",
          header.length,
          header.references,
          node.as_str()
        )?;
        report.visit_node(header);
        cursor = header.next;
      }
    }

    writeln!(out, "-------------------")?;
    writeln!(
      out,
      "usage (bytes) = {}, saved = {} ({} duplicates, {} unique)",
      report.used, report.saved, report.dups, report.unique
    )
  }
}
