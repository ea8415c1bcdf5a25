//! Traffic Light State Machine
//!
//! A cyclic machine whose guards read a shared tick counter. Each call to
//! `trigger` blocks until the current light's timer expires.
//!
//! Run with: cargo run --example traffic_light

use gatefsm::{state_enum, FsmBuilder};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

state_enum! {
    enum TrafficLight {
        Red,
        Green,
        Yellow,
    }
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let ticks = Arc::new(AtomicU32::new(0));
    let after = |limit: u32| {
        let ticks = Arc::clone(&ticks);
        move || ticks.load(Ordering::SeqCst) >= limit
    };

    let mut machine = FsmBuilder::new()
        .initial(TrafficLight::Red)
        .transition(TrafficLight::Red, TrafficLight::Green, after(3))
        .transition(TrafficLight::Green, TrafficLight::Yellow, after(3))
        .transition(TrafficLight::Yellow, TrafficLight::Red, after(1))
        .build()
        .expect("traffic light graph is valid");

    let clock = Arc::clone(&ticks);
    thread::spawn(move || loop {
        thread::sleep(Duration::from_millis(50));
        clock.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..6 {
        let (from, to) = machine.trigger().expect("no ambiguous lights");
        ticks.store(0, Ordering::SeqCst);
        println!("  {:<6} -> {}", from.name(), to.name());
    }

    println!("\nNo terminal state: the cycle repeats until the caller stops polling.");
    println!("\n=== Example Complete ===");
}
