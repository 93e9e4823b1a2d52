//! Unit tests for rm-workload.

use rm_core::{ResourceId, StepId, TaskId};

use crate::{Program, Step, StepKind, StepTarget, Workload, WorkloadError, parse_workload};

// ── Helpers ───────────────────────────────────────────────────────────────────

const T1: TaskId = TaskId(0);
const T2: TaskId = TaskId(1);
const R1: ResourceId = ResourceId(0);

/// Two interleaved tasks on one resource.
fn interleaved() -> Vec<Step> {
    vec![
        Step::initiate(T1, R1, 2),
        Step::initiate(T2, R1, 2),
        Step::request(T1, R1, 1),
        Step::request(T2, R1, 1),
        Step::terminate(T1),
        Step::terminate(T2),
    ]
}

const TWO_TASKS: &str = "\
2 1 4

initiate  1 1 4
request   1 1 1
release   1 1 1
terminate 1 0 0

initiate  2 1 4
request   2 1 1
compute   2 3 0
release   2 1 1
terminate 2 0 0
";

// ── Program linking ───────────────────────────────────────────────────────────

#[cfg(test)]
mod program {
    use super::*;

    #[test]
    fn ids_follow_arena_order() {
        let program = Program::new(interleaved(), 2);
        let ids: Vec<StepId> = program.steps().iter().map(|s| s.id).collect();
        assert_eq!(ids, (0..6).map(StepId).collect::<Vec<_>>());
    }

    #[test]
    fn links_skip_other_tasks() {
        let program = Program::new(interleaved(), 2);
        assert_eq!(program.step(StepId(0)).next, Some(StepId(2)));
        assert_eq!(program.step(StepId(2)).next, Some(StepId(4)));
        assert_eq!(program.step(StepId(4)).next, None);
        assert_eq!(program.step(StepId(3)).prev, Some(StepId(1)));
        assert_eq!(program.step(StepId(1)).prev, None);
    }

    #[test]
    fn first_step_per_task() {
        let program = Program::new(interleaved(), 2);
        assert_eq!(program.first_step(T1), Some(StepId(0)));
        assert_eq!(program.first_step(T2), Some(StepId(1)));
        assert_eq!(program.first_step(TaskId(7)), None);
    }

    #[test]
    fn steps_of_walks_one_task() {
        let program = Program::new(interleaved(), 2);
        let kinds: Vec<StepKind> = program.steps_of(T2).map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::Initiate, StepKind::Request, StepKind::Terminate]);
    }

    #[test]
    fn group_count_from_highest_group() {
        let steps = vec![
            Step::initiate(T1, R1, 1),
            Step::terminate(T1).in_group(2),
        ];
        assert_eq!(Program::new(steps, 1).group_count(), 3);
    }
}

// ── Workload validation ───────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;

    #[test]
    fn accepts_well_formed_programs() {
        let workload = Workload::new(vec![2], 2, interleaved()).unwrap();
        assert_eq!(workload.task_count(), 2);
        assert_eq!(workload.resource_count(), 1);
        assert_eq!(workload.capacity(R1), 2);
    }

    #[test]
    fn task_without_steps_rejected() {
        let steps = vec![Step::initiate(T1, R1, 1), Step::terminate(T1)];
        let err = Workload::new(vec![1], 2, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::EmptyProgram { task } if task == T2));
    }

    #[test]
    fn task_count_above_step_count_rejected_up_front() {
        let steps = vec![Step::initiate(T1, R1, 1), Step::terminate(T1)];
        let err = Workload::new(vec![1], 4_000_000_000, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::EmptyProgram { task } if task == T2));
    }

    #[test]
    fn must_start_with_initiate() {
        let steps = vec![Step::request(T1, R1, 1), Step::terminate(T1)];
        let err = Workload::new(vec![1], 1, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::MissingInitiate { found: StepKind::Request, .. }));
    }

    #[test]
    fn must_end_with_terminate() {
        let steps = vec![Step::initiate(T1, R1, 1), Step::request(T1, R1, 1)];
        let err = Workload::new(vec![1], 1, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::MissingTerminate { .. }));
    }

    #[test]
    fn nothing_after_terminate() {
        let steps = vec![
            Step::initiate(T1, R1, 1),
            Step::terminate(T1),
            Step::request(T1, R1, 1),
        ];
        let err = Workload::new(vec![1], 1, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::StepAfterTerminate { step: StepId(2), .. }));
    }

    #[test]
    fn compute_needs_a_duration() {
        let steps = vec![
            Step::initiate(T1, R1, 1),
            Step::new(StepKind::Compute, T1, StepTarget::Resource(R1), 0),
            Step::terminate(T1),
        ];
        let err = Workload::new(vec![1], 1, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::TargetMismatch { expected: "duration", .. }));
    }

    #[test]
    fn resource_out_of_range() {
        let steps = vec![Step::initiate(T1, ResourceId(3), 1), Step::terminate(T1)];
        let err = Workload::new(vec![1], 1, steps).unwrap_err();
        assert!(matches!(err, WorkloadError::ResourceOutOfRange { resource: 4, .. }));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    #[test]
    fn parses_header_and_steps() {
        let workload = parse_workload(TWO_TASKS).unwrap();
        assert_eq!(workload.task_count(), 2);
        assert_eq!(workload.capacities, vec![4]);
        assert_eq!(workload.program.len(), 9);
        assert_eq!(workload.program.group_count(), 2);
    }

    #[test]
    fn file_numbers_become_zero_based() {
        let workload = parse_workload(TWO_TASKS).unwrap();
        let step = workload.program.step(StepId(5));
        assert_eq!(step.kind, StepKind::Request);
        assert_eq!(step.task, T2);
        assert_eq!(step.target, StepTarget::Resource(R1));
        assert_eq!(step.group, 1);
    }

    #[test]
    fn compute_operand_is_a_duration() {
        let workload = parse_workload(TWO_TASKS).unwrap();
        let compute = workload
            .program
            .steps_of(T2)
            .find(|s| s.kind == StepKind::Compute)
            .unwrap();
        assert_eq!(compute.duration(), Some(3));
        assert_eq!(compute.resource(), None);
    }

    #[test]
    fn header_may_span_lines() {
        let text = "1 2\n3\n5\ninitiate 1 2 1\nterminate 1 0 0\n";
        let workload = parse_workload(text).unwrap();
        assert_eq!(workload.capacities, vec![3, 5]);
    }

    #[test]
    fn repeated_blank_lines_count_as_one_group_break() {
        let text = "1 1 1\n\n\ninitiate 1 1 1\n\n\n\nterminate 1 0 0\n";
        let workload = parse_workload(text).unwrap();
        assert_eq!(workload.program.group_count(), 2);
    }

    #[test]
    fn unknown_kind_reports_line() {
        let text = "1 1 1\ninitiate 1 1 1\nborrow 1 1 1\nterminate 1 0 0\n";
        let err = parse_workload(text).unwrap_err();
        assert!(matches!(err, WorkloadError::UnknownStepKind { line: 3, ref kind } if kind == "borrow"));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let text = "1 1 1\ninitiate 1 1\n";
        assert!(matches!(parse_workload(text), Err(WorkloadError::Parse { line: 2, .. })));
    }

    #[test]
    fn non_numeric_field_is_a_parse_error() {
        let text = "1 1 1\ninitiate one 1 1\n";
        assert!(matches!(parse_workload(text), Err(WorkloadError::Parse { line: 2, .. })));
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(parse_workload("2 3 1 1"), Err(WorkloadError::Parse { .. })));
        assert!(matches!(parse_workload(""), Err(WorkloadError::Parse { .. })));
    }

    #[test]
    fn huge_task_count_is_an_error() {
        let text = "4000000000 1 1\ninitiate 1 1 1\nterminate 1 0 0\n";
        let err = parse_workload(text).unwrap_err();
        assert!(matches!(err, WorkloadError::EmptyProgram { task } if task == T2));
    }

    #[test]
    fn task_number_out_of_range() {
        let text = "1 1 1\ninitiate 2 1 1\n";
        let err = parse_workload(text).unwrap_err();
        assert!(matches!(err, WorkloadError::TaskOutOfRange { line: 2, task: 2, count: 1 }));
    }

    #[test]
    fn resource_zero_rejected() {
        let text = "1 1 1\nrequest 1 0 1\n";
        let err = parse_workload(text).unwrap_err();
        assert!(matches!(err, WorkloadError::ResourceOutOfRange { line: 2, resource: 0, .. }));
    }

    #[test]
    fn reader_and_text_agree() {
        let from_reader = crate::load_workload_reader(std::io::Cursor::new(TWO_TASKS)).unwrap();
        assert_eq!(from_reader, parse_workload(TWO_TASKS).unwrap());
    }
}
