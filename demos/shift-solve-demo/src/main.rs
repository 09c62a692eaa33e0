//! Runs a small shift-scheduling scenario end to end against the bundled
//! reference solver and prints the resulting schedule.

use chrono::{NaiveDate, NaiveTime};

use shiftsolve::{ConstraintSpec, ShiftType, SolverConfig, SolverInputs, Worker};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn main() {
    tracing_subscriber::fmt::init();

    let workers = vec![
        Worker::new("alice", "Alice", None, [], []).unwrap(),
        Worker::new("bob", "Bob", None, ["night".to_string()], []).unwrap(),
        Worker::new("carol", "Carol", None, [], []).unwrap(),
        Worker::new("dave", "Dave", None, [], []).unwrap(),
    ];

    let shift_types = vec![
        ShiftType::new("day", "Day", "day", time(8), time(16), 8.0, false, 1, None).unwrap(),
        ShiftType::new("night", "Night", "night", time(22), time(6), 8.0, true, 1, None).unwrap(),
    ];

    let period_dates: Vec<(NaiveDate, NaiveDate)> = (0..4)
        .map(|week| {
            (
                date(2026, 3, 2) + chrono::Duration::days(week * 7),
                date(2026, 3, 8) + chrono::Duration::days(week * 7),
            )
        })
        .collect();

    let inputs = SolverInputs {
        schedule_id: "demo-schedule".to_string(),
        workers,
        shift_types,
        period_dates,
        availabilities: vec![],
        worker_requests: vec![],
    };

    let mut config = SolverConfig::default();
    config.constraint_specs.insert(
        "fairness".to_string(),
        ConstraintSpec {
            is_hard: false,
            weight: 1000,
            ..ConstraintSpec::default()
        },
    );

    let result = shiftsolve::solve(&inputs, &config).expect("configuration is valid");

    println!("status: {}", result.status.name());
    println!("solve time: {:.3}s", result.solve_time_seconds);

    match result.schedule {
        Some(schedule) => {
            for period in &schedule.periods {
                for (worker_id, instances) in &period.assignments {
                    for instance in instances {
                        println!(
                            "period {}: {} -> {} on {}",
                            period.period_index, worker_id, instance.shift_type_id, instance.date
                        );
                    }
                }
            }
        }
        None => {
            if let Some(issues) = result.feasibility_issues {
                for issue in issues {
                    println!("infeasible: {}", issue.message);
                }
            }
        }
    }
}
