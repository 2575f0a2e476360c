//! Character-level edit script for highlighting a single modified cell.
//!
//! [`InlineDiff`] is a lazy iterator: nothing is computed until the first call to `next`,
//! and once drained it cannot be restarted. The script is a character LCS over the span
//! left after trimming the common prefix and suffix, emitted as merged runs. Within a
//! changed span deletions come before insertions.

use serde::Serialize;

/// Upper bound on `len(a) * len(b)` DP cells after trimming. Above it the changed span is
/// reported as one delete run followed by one insert run.
pub const INLINE_DIFF_WORK_LIMIT: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Keep,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineFragment {
    pub kind: FragmentKind,
    pub text: String,
}

impl InlineFragment {
    fn new(kind: FragmentKind, text: String) -> InlineFragment {
        InlineFragment { kind, text }
    }
}

#[derive(Debug, Clone)]
pub struct InlineDiff {
    original: String,
    modified: String,
    work_limit: usize,
    pending: Option<std::vec::IntoIter<InlineFragment>>,
}

impl InlineDiff {
    pub fn new(original: impl Into<String>, modified: impl Into<String>) -> InlineDiff {
        InlineDiff::with_work_limit(original, modified, INLINE_DIFF_WORK_LIMIT)
    }

    pub fn with_work_limit(
        original: impl Into<String>,
        modified: impl Into<String>,
        work_limit: usize,
    ) -> InlineDiff {
        InlineDiff {
            original: original.into(),
            modified: modified.into(),
            work_limit,
            pending: None,
        }
    }
}

impl Iterator for InlineDiff {
    type Item = InlineFragment;

    fn next(&mut self) -> Option<InlineFragment> {
        if self.pending.is_none() {
            let script = edit_script(&self.original, &self.modified, self.work_limit);
            self.pending = Some(script.into_iter());
        }
        self.pending.as_mut().and_then(Iterator::next)
    }
}

/// Accumulates single-character edits into runs of the same kind.
#[derive(Default)]
struct RunBuilder {
    fragments: Vec<InlineFragment>,
}

impl RunBuilder {
    fn push(&mut self, kind: FragmentKind, ch: char) {
        match self.fragments.last_mut() {
            Some(last) if last.kind == kind => last.text.push(ch),
            _ => self.fragments.push(InlineFragment::new(kind, ch.to_string())),
        }
    }

    fn push_all(&mut self, kind: FragmentKind, chars: &[char]) {
        for &ch in chars {
            self.push(kind, ch);
        }
    }

    fn finish(self) -> Vec<InlineFragment> {
        self.fragments
    }
}

fn edit_script(original: &str, modified: &str, work_limit: usize) -> Vec<InlineFragment> {
    let a: Vec<char> = original.chars().collect();
    let b: Vec<char> = modified.chars().collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];

    let mut runs = RunBuilder::default();
    runs.push_all(FragmentKind::Keep, &a[..prefix]);

    if mid_a.len().saturating_mul(mid_b.len()) > work_limit {
        runs.push_all(FragmentKind::Delete, mid_a);
        runs.push_all(FragmentKind::Insert, mid_b);
    } else {
        lcs_runs(mid_a, mid_b, &mut runs);
    }

    runs.push_all(FragmentKind::Keep, &a[a.len() - suffix..]);
    runs.finish()
}

fn lcs_runs(a: &[char], b: &[char], runs: &mut RunBuilder) {
    let m = a.len();
    let n = b.len();
    let width = n + 1;

    // dp[i * width + j] = LCS length of a[i..] and b[j..].
    let mut dp = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            dp[i * width + j] = if a[i] == b[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if a[i] == b[j] {
            runs.push(FragmentKind::Keep, a[i]);
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            runs.push(FragmentKind::Delete, a[i]);
            i += 1;
        } else {
            runs.push(FragmentKind::Insert, b[j]);
            j += 1;
        }
    }
    runs.push_all(FragmentKind::Delete, &a[i..]);
    runs.push_all(FragmentKind::Insert, &b[j..]);
}
