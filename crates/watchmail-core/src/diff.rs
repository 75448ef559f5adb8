//! Unified diff generation and HTML rendering for notification emails.

const CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy)]
struct DiffLine<'a> {
    op: Op,
    text: &'a str,
}

struct Hunk<'a> {
    old_start: usize,
    old_count: usize,
    new_start: usize,
    new_count: usize,
    lines: Vec<DiffLine<'a>>,
}

impl Hunk<'_> {
    fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

/// Build a unified patch between two command outputs, labeled with the
/// command text. Identical inputs yield a header-only patch.
pub fn unified_diff(old: &str, new: &str, label: &str) -> String {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();
    let script = diff_lines(&old_lines, &new_lines);

    let mut out = String::new();
    out.push_str(&format!("--- {}\tprevious\n", label));
    out.push_str(&format!("+++ {}\tcurrent\n", label));

    for hunk in build_hunks(&script) {
        out.push_str(&hunk.header());
        out.push('\n');
        for line in &hunk.lines {
            out.push(match line.op {
                Op::Equal => ' ',
                Op::Delete => '-',
                Op::Insert => '+',
            });
            out.push_str(line.text);
            out.push('\n');
        }
    }

    out
}

/// Line-level edit script from a longest-common-subsequence table.
fn diff_lines<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffLine<'a>> {
    let n = old.len();
    let m = new.len();

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            script.push(DiffLine {
                op: Op::Equal,
                text: old[i],
            });
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            script.push(DiffLine {
                op: Op::Delete,
                text: old[i],
            });
            i += 1;
        } else {
            script.push(DiffLine {
                op: Op::Insert,
                text: new[j],
            });
            j += 1;
        }
    }
    for &text in &old[i..] {
        script.push(DiffLine {
            op: Op::Delete,
            text,
        });
    }
    for &text in &new[j..] {
        script.push(DiffLine {
            op: Op::Insert,
            text,
        });
    }

    script
}

/// Group changed script entries into hunks with `CONTEXT` surrounding lines,
/// merging hunks whose context regions touch.
fn build_hunks<'a>(script: &[DiffLine<'a>]) -> Vec<Hunk<'a>> {
    let change_idx: Vec<usize> = script
        .iter()
        .enumerate()
        .filter(|(_, line)| line.op != Op::Equal)
        .map(|(i, _)| i)
        .collect();
    if change_idx.is_empty() {
        return Vec::new();
    }

    let last = script.len() - 1;
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut start = change_idx[0].saturating_sub(CONTEXT);
    let mut end = (change_idx[0] + CONTEXT).min(last);
    for &idx in &change_idx[1..] {
        let lo = idx.saturating_sub(CONTEXT);
        if lo <= end + 1 {
            end = (idx + CONTEXT).min(last);
        } else {
            spans.push((start, end));
            start = lo;
            end = (idx + CONTEXT).min(last);
        }
    }
    spans.push((start, end));

    // Prefix sums of old/new lines consumed before each script index.
    let mut old_pos = vec![0usize; script.len() + 1];
    let mut new_pos = vec![0usize; script.len() + 1];
    for (i, line) in script.iter().enumerate() {
        old_pos[i + 1] = old_pos[i] + usize::from(line.op != Op::Insert);
        new_pos[i + 1] = new_pos[i] + usize::from(line.op != Op::Delete);
    }

    spans
        .into_iter()
        .map(|(start, end)| {
            let old_count = old_pos[end + 1] - old_pos[start];
            let new_count = new_pos[end + 1] - new_pos[start];
            Hunk {
                old_start: if old_count == 0 {
                    old_pos[start]
                } else {
                    old_pos[start] + 1
                },
                old_count,
                new_start: if new_count == 0 {
                    new_pos[start]
                } else {
                    new_pos[start] + 1
                },
                new_count,
                lines: script[start..=end].to_vec(),
            }
        })
        .collect()
}

/// Render a unified patch as an HTML fragment: additions green, removals
/// red, hunk headers purple, file markers uncolored, everything escaped.
pub fn diff_to_html(patch: &str) -> String {
    let rendered: Vec<String> = patch
        .split('\n')
        .map(|line| {
            let escaped = escape_html(line);
            if line.starts_with('+') && !line.starts_with("+++") {
                format!(
                    "<span style=\"color:#22863a;background:#f0fff4\">{}</span>",
                    escaped
                )
            } else if line.starts_with('-') && !line.starts_with("---") {
                format!(
                    "<span style=\"color:#cb2431;background:#ffeef0\">{}</span>",
                    escaped
                )
            } else if line.starts_with("@@") {
                format!("<span style=\"color:#6f42c1\">{}</span>", escaped)
            } else {
                escaped
            }
        })
        .collect();

    format!(
        "<pre style=\"font-family:'SFMono-Regular',Consolas,'Liberation Mono',Menlo,monospace;\
font-size:13px;line-height:1.45;padding:16px;overflow:auto;background:#f6f8fa;\
border-radius:6px\">{}</pre>",
        rendered.join("\n")
    )
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
