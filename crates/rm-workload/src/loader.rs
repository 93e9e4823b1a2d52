//! Workload file loader.
//!
//! # File format
//!
//! A header of whitespace-separated integers (`T R c1 … cR`: task count,
//! resource count, then each resource's capacity) followed by one step per
//! line.  Blank lines separate groups.
//!
//! ```text
//! 2 1 4
//!
//! initiate  1 1 4
//! request   1 1 1
//! release   1 1 1
//! terminate 1 0 0
//!
//! initiate  2 1 4
//! request   2 1 1
//! compute   2 3 0
//! release   2 1 1
//! terminate 2 0 0
//! ```
//!
//! Each step line is `<kind> <task> <operand> <amount>`.  Tasks and
//! resources are numbered from 1.  The operand is a resource number for
//! `initiate`/`request`/`release` and a cycle count for `compute` (and is
//! ignored for `terminate`).
//!
//! The header may span several lines; it ends as soon as `2 + R` numbers have
//! been read.

use std::io::Read;
use std::path::Path;

use rm_core::{ResourceId, TaskId};

use crate::{Step, StepKind, StepTarget, Workload, WorkloadError, WorkloadResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and validate a workload file.
pub fn load_workload_path(path: &Path) -> WorkloadResult<Workload> {
    let file = std::fs::File::open(path).map_err(WorkloadError::Io)?;
    load_workload_reader(file)
}

/// Like [`load_workload_path`] but accepts any `Read` source.
pub fn load_workload_reader<R: Read>(mut reader: R) -> WorkloadResult<Workload> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_workload(&text)
}

/// Parse workload text.
pub fn parse_workload(text: &str) -> WorkloadResult<Workload> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    // ── Header ────────────────────────────────────────────────────────────
    let mut header: Vec<u32> = Vec::new();
    let mut wanted: Option<usize> = None;
    let mut header_line = 0;

    while wanted.is_none_or(|n| header.len() < n) {
        let Some((line, content)) = lines.next() else {
            return Err(WorkloadError::Parse {
                line:    header_line,
                message: "file ends before the header is complete".into(),
            });
        };
        header_line = line;
        for token in content.split_whitespace() {
            if wanted.is_some_and(|n| header.len() >= n) {
                return Err(WorkloadError::Parse {
                    line,
                    message: format!("unexpected {token:?} after the header"),
                });
            }
            header.push(parse_number(token, line, "header value")?);
            if header.len() == 2 {
                wanted = Some(2 + header[1] as usize);
            }
        }
    }

    let task_count = header[0] as usize;
    let capacities = header[2..].to_vec();

    // ── Steps ─────────────────────────────────────────────────────────────
    let mut steps: Vec<Step> = Vec::new();
    let mut group = 0u32;
    let mut group_has_steps = false;

    for (line, content) in lines {
        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.is_empty() {
            if group_has_steps {
                group += 1;
                group_has_steps = false;
            }
            continue;
        }
        if fields.len() != 4 {
            return Err(WorkloadError::Parse {
                line,
                message: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let kind = StepKind::from_keyword(fields[0]).ok_or_else(|| WorkloadError::UnknownStepKind {
            line,
            kind: fields[0].to_owned(),
        })?;
        let task_number = parse_number(fields[1], line, "task number")?;
        let operand     = parse_number(fields[2], line, "operand")?;
        let amount      = parse_number(fields[3], line, "amount")?;

        if task_number == 0 || task_number as usize > task_count {
            return Err(WorkloadError::TaskOutOfRange {
                line,
                task:  task_number as u64,
                count: task_count,
            });
        }
        let task = TaskId(task_number - 1);

        let target = if kind.uses_resource() {
            if operand == 0 || operand as usize > capacities.len() {
                return Err(WorkloadError::ResourceOutOfRange {
                    line,
                    resource: operand as u64,
                    count:    capacities.len(),
                });
            }
            StepTarget::Resource(ResourceId(operand - 1))
        } else {
            StepTarget::Duration(operand)
        };

        steps.push(Step::new(kind, task, target, amount).in_group(group));
        group_has_steps = true;
    }

    Workload::new(capacities, task_count, steps)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_number(token: &str, line: usize, what: &str) -> WorkloadResult<u32> {
    token.parse::<u32>().map_err(|_| WorkloadError::Parse {
        line,
        message: format!("invalid {what} {token:?}: expected a non-negative integer"),
    })
}
