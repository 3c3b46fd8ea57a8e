use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttackEvent {
    pub damage: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HealEvent {
    pub amount: i32,
}

/// Event that records which subscribers saw it, in delivery order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trace {
    pub steps: Vec<&'static str>,
}

pub fn base_attack(event: &mut AttackEvent) {
    if event.damage <= 0 {
        event.damage = 1;
    }
}

pub fn heal(event: &mut HealEvent) {
    event.amount += 10;
}

#[derive(Debug, Default)]
pub struct Player {
    pub attacks: AtomicUsize,
}

impl Player {
    pub fn attack(&self, event: &mut AttackEvent) {
        self.attacks.fetch_add(1, Ordering::SeqCst);
        event.damage += 150;
    }

    pub fn parry(&self, event: &mut AttackEvent) {
        event.damage /= 2;
    }
}

#[derive(Debug, Default)]
pub struct Inventory {
    pub used: u32,
}

impl Inventory {
    pub fn drink(&mut self, event: &mut HealEvent) {
        self.used += 1;
        event.amount += 25;
    }
}

pub fn step_one(trace: &mut Trace) {
    trace.steps.push("one");
}

pub fn step_two(trace: &mut Trace) {
    trace.steps.push("two");
}

pub fn step_three(trace: &mut Trace) {
    trace.steps.push("three");
}

pub fn step_four(trace: &mut Trace) {
    trace.steps.push("four");
}
