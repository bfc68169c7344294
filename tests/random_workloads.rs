use sched_sim::{
    Cell, Policy, Process, StatsReport, Timeline,
    sim::{WorkloadParams, bernoulli_processes},
};

const SEEDS: std::ops::Range<u64> = 0..40;
const HORIZON: u64 = 40;

const COMPLETING: [Policy; 8] = [
    Policy::Fcfs,
    Policy::RoundRobin { quantum: 1 },
    Policy::RoundRobin { quantum: 3 },
    Policy::Spn,
    Policy::Srt,
    Policy::Hrrn,
    Policy::Feedback1,
    Policy::Feedback2i,
];

fn workload(seed: u64) -> Vec<Process> {
    let params = WorkloadParams {
        ticks: 25,
        ..WorkloadParams::default()
    };
    bernoulli_processes(&params, seed)
}

fn traced(policy: Policy, processes: &[Process], horizon: u64) -> (Vec<Option<u64>>, Timeline) {
    let report = policy.run(processes, horizon, true);
    let finish = report.records.iter().map(|r| r.finish_time).collect();
    (finish, report.timeline.expect("trace requested"))
}

fn present(process: &Process, finish: Option<u64>, tick: u64) -> bool {
    process.arrival_time <= tick && finish.is_none_or(|f| tick < f)
}

#[test]
fn one_runner_while_work_is_present() {
    for seed in SEEDS {
        let processes = workload(seed);
        for policy in COMPLETING {
            let (finish, timeline) = traced(policy, &processes, HORIZON);
            for tick in 0..HORIZON {
                let runners = timeline.running_at(tick).count();
                let busy = processes
                    .iter()
                    .zip(&finish)
                    .any(|(p, &f)| present(p, f, tick));
                assert!(runners <= 1, "{policy} seed {seed} tick {tick}");
                assert_eq!(runners == 1, busy, "{policy} seed {seed} tick {tick}");
            }
        }
    }
}

#[test]
fn cells_follow_process_lifetime() {
    for seed in SEEDS {
        let processes = workload(seed);
        for policy in COMPLETING {
            let (finish, timeline) = traced(policy, &processes, HORIZON);
            for (task, process) in processes.iter().enumerate() {
                for tick in 0..HORIZON {
                    let cell = timeline.cell(task, tick);
                    let expect_present = present(process, finish[task], tick);
                    assert_eq!(
                        cell != Cell::Idle,
                        expect_present,
                        "{policy} seed {seed} task {task} tick {tick}"
                    );
                }
            }
        }
    }
}

#[test]
fn running_ticks_match_service() {
    for seed in SEEDS {
        let processes = workload(seed);
        for policy in COMPLETING {
            let (finish, timeline) = traced(policy, &processes, HORIZON);
            for (task, process) in processes.iter().enumerate() {
                let ran = timeline.count(task, Cell::Running) as u64;
                match finish[task] {
                    Some(f) => {
                        assert_eq!(ran, process.service_time, "{policy} seed {seed}");
                        assert_eq!(timeline.cell(task, f - 1), Cell::Running);
                        assert!(f >= process.arrival_time + process.service_time);
                    }
                    None => assert!(ran < process.service_time, "{policy} seed {seed}"),
                }
            }
        }
    }
}

#[test]
fn shorter_horizon_is_a_prefix() {
    let short = HORIZON / 2;
    for seed in SEEDS {
        let processes = workload(seed);
        for policy in COMPLETING {
            let (long_finish, long) = traced(policy, &processes, HORIZON);
            let (short_finish, truncated) = traced(policy, &processes, short);
            for task in 0..processes.len() {
                let prefix: String = long.row_string(task).chars().take(short as usize).collect();
                assert_eq!(truncated.row_string(task), prefix, "{policy} seed {seed}");

                let expected = long_finish[task].filter(|&f| f <= short);
                assert_eq!(short_finish[task], expected, "{policy} seed {seed}");
            }
        }
    }
}

#[test]
fn runs_do_not_share_state() {
    for seed in SEEDS.step_by(5) {
        let processes = workload(seed);
        for policy in COMPLETING {
            let first = StatsReport::from_records(&policy.run(&processes, HORIZON, false).records);
            let second = StatsReport::from_records(&policy.run(&processes, HORIZON, false).records);
            assert_eq!(first, second, "{policy} seed {seed}");
        }
    }
}

#[test]
fn aging_keeps_every_task_queued() {
    for seed in SEEDS {
        // One shared priority exercises every tie-break path
        let processes: Vec<Process> = workload(seed)
            .into_iter()
            .map(|p| p.with_priority(2))
            .collect();
        for quantum in [1, 2, 3] {
            let policy = Policy::Aging { quantum };
            let (finish, timeline) = traced(policy, &processes, HORIZON);
            assert!(finish.iter().all(Option::is_none));

            for tick in 0..HORIZON {
                assert_eq!(
                    timeline.running_at(tick).count(),
                    usize::from(processes.iter().any(|p| p.arrival_time <= tick)),
                    "quantum {quantum} seed {seed} tick {tick}"
                );
                for (task, process) in processes.iter().enumerate() {
                    let cell = timeline.cell(task, tick);
                    assert_eq!(
                        cell != Cell::Idle,
                        process.arrival_time <= tick,
                        "quantum {quantum} seed {seed} task {task} tick {tick}"
                    );
                }
            }
        }
    }
}
