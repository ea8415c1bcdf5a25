//! Worker Handoff
//!
//! A job machine advanced by flags that a worker thread sets. The main
//! thread waits with a deadline, shows a timeout, then follows the job to
//! its terminal state and prints the recorded history.
//!
//! Run with: RUST_LOG=gatefsm=debug cargo run --example worker_handoff

use gatefsm::{state_enum, Fsm, TriggerError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

state_enum! {
    enum Job {
        Queued,
        Running,
        Succeeded,
        Failed,
    }
}

fn flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

fn reader(flag: &Arc<AtomicBool>) -> impl Fn() -> bool + Send + 'static {
    let flag = Arc::clone(flag);
    move || flag.load(Ordering::SeqCst)
}

fn main() -> Result<(), TriggerError<Job>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Worker Handoff ===\n");

    let picked_up = flag();
    let ok = flag();
    let failed = flag();

    let mut fsm = Fsm::new();
    fsm.register_transition(Job::Queued, Job::Running, reader(&picked_up));
    fsm.register_transition(Job::Running, Job::Succeeded, reader(&ok));
    fsm.register_transition(Job::Running, Job::Failed, reader(&failed));
    fsm.set_state(Job::Queued);

    let short = Instant::now() + Duration::from_millis(20);
    match fsm.timed_trigger(short)? {
        Some((from, to)) => println!("unexpected move {:?} -> {:?}", from, to),
        None => println!("No worker yet: timed out in {:?}", fsm.state()),
    }

    let worker = {
        let picked_up = Arc::clone(&picked_up);
        let ok = Arc::clone(&ok);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            picked_up.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(30));
            ok.store(true, Ordering::SeqCst);
        })
    };

    loop {
        let (from, to) = fsm.trigger()?;
        if from == to {
            println!("Reached terminal state {}", to.name());
            break;
        }
        println!("{} -> {}", from.name(), to.name());
    }
    worker.join().expect("worker thread panicked");

    println!("\nHistory:");
    for transition in fsm.history().transitions() {
        println!(
            "  {} -> {} after {} pass(es)",
            transition.from.name(),
            transition.to.name(),
            transition.attempt
        );
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
