// src/text_diff.rs
//! Line-oriented text diff and reorder-aware interval adjustment
//! (spec.md §4.3). This sits squarely inside the core — unlike the
//! ambient `frontend` module, this is not something the teacher's stack
//! already has a crate for at the right granularity, so it's hand-rolled
//! (a classic O(n·m) LCS line differ) rather than imported.

use crate::line_index::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct DiffEntry<'a> {
    pub marker: Marker,
    pub line: &'a str,
}

/// A changed region on both sides, half-open on each: `[start_before,
/// end_before)` and `[start_after, end_after)`, 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start_before: u32,
    pub end_before: u32,
    pub start_after: u32,
    pub end_after: u32,
}

/// Classic LCS-based line diff: O(n·m) dynamic program, then a
/// backtrack that emits unchanged/removed/added runs.
#[must_use]
pub fn line_diff<'a>(before: &'a [&'a str], after: &'a [&'a str]) -> Vec<DiffEntry<'a>> {
    let n = before.len();
    let m = after.len();
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if before[i] == after[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut entries = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0usize, 0usize);
    while i < n && j < m {
        if before[i] == after[j] {
            entries.push(DiffEntry { marker: Marker::Unchanged, line: before[i] });
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            entries.push(DiffEntry { marker: Marker::Removed, line: before[i] });
            i += 1;
        } else {
            entries.push(DiffEntry { marker: Marker::Added, line: after[j] });
            j += 1;
        }
    }
    while i < n {
        entries.push(DiffEntry { marker: Marker::Removed, line: before[i] });
        i += 1;
    }
    while j < m {
        entries.push(DiffEntry { marker: Marker::Added, line: after[j] });
        j += 1;
    }
    entries
}

/// Raw (before the neighbor-shift correction) interval, plus the
/// `+`-marked lines it covers, needed for the neighbor-detection test.
struct RawInterval<'a> {
    start_before: u32,
    end_before: u32,
    start_after: u32,
    end_after: u32,
    added: Vec<&'a str>,
    removed: usize,
}

/// Walks `diff` and groups consecutive `+`/`-` runs into [`Interval`]s,
/// applying the duplicated-block correction from spec.md §4.3.
#[must_use]
pub fn adjust_seqdiff(diff: &[DiffEntry<'_>], after_src: &[&str], after_index: &LineIndex) -> Vec<Interval> {
    let raws = group_runs(diff);
    let mut out = Vec::with_capacity(raws.len());

    for raw in raws {
        if raw.added.len() <= 1 && raw.removed <= 1 {
            out.push(Interval {
                start_before: raw.start_before,
                end_before: raw.end_before,
                start_after: raw.start_after,
                end_after: raw.end_after,
            });
            continue;
        }

        let neighbors = longest_matching_prefix(&raw.added, after_src, raw.end_after);
        if neighbors == 0 {
            out.push(Interval {
                start_before: raw.start_before,
                end_before: raw.end_before,
                start_after: raw.start_after,
                end_after: raw.end_after,
            });
            continue;
        }

        let original = after_index.nodes_in_open_interval(raw.start_after, raw.end_after);
        let shifted = after_index.nodes_in_open_interval(raw.start_after + neighbors, raw.end_after + neighbors);
        if original.len() == shifted.len() {
            out.push(Interval {
                start_before: raw.start_before,
                end_before: raw.end_before,
                start_after: raw.start_after,
                end_after: raw.end_after,
            });
            continue;
        }

        if raw.removed > 0 {
            out.push(Interval {
                start_before: raw.start_before,
                end_before: raw.end_before,
                start_after: raw.start_after,
                end_after: raw.start_after,
            });
        }
        out.push(Interval {
            start_before: raw.end_before + neighbors,
            end_before: raw.end_before + neighbors,
            start_after: raw.start_after + neighbors,
            end_after: raw.end_after + neighbors,
        });
    }

    out
}

fn group_runs<'a>(diff: &[DiffEntry<'a>]) -> Vec<RawInterval<'a>> {
    let mut raws = Vec::new();
    let (mut before_cursor, mut after_cursor) = (1u32, 1u32);
    let mut i = 0;

    while i < diff.len() {
        match diff[i].marker {
            Marker::Unchanged => {
                before_cursor += 1;
                after_cursor += 1;
                i += 1;
            }
            Marker::Added | Marker::Removed => {
                let start_before = before_cursor;
                let start_after = after_cursor;
                let mut added = Vec::new();
                let mut removed = 0usize;
                while i < diff.len() && diff[i].marker != Marker::Unchanged {
                    match diff[i].marker {
                        Marker::Added => {
                            added.push(diff[i].line);
                            after_cursor += 1;
                        }
                        Marker::Removed => {
                            removed += 1;
                            before_cursor += 1;
                        }
                        Marker::Unchanged => unreachable!(),
                    }
                    i += 1;
                }
                raws.push(RawInterval {
                    start_before,
                    end_before: before_cursor,
                    start_after,
                    end_after: after_cursor,
                    added,
                    removed,
                });
            }
        }
    }
    raws
}

/// Longest prefix of `added` matching `after_src` starting right after the
/// interval. `end_after` is 1-based and exclusive, so the first line past
/// the interval is the 0-based index `end_after - 1`.
fn longest_matching_prefix(added: &[&str], after_src: &[&str], end_after: u32) -> u32 {
    let start = end_after as usize - 1;
    let mut k = 0u32;
    while (k as usize) < added.len() {
        let idx = start + k as usize;
        if idx >= after_src.len() || after_src[idx] != added[k as usize] {
            break;
        }
        k += 1;
    }
    k
}
