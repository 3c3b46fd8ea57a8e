use herald_event_bus::{LocalEventBus, Priority, SharedEventBus, make_func, make_method};
use proptest::prelude::*;
use std::cmp::Reverse;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Delivery {
    order: Vec<usize>,
}

#[derive(Debug)]
struct Marker {
    index: usize,
}

impl Marker {
    fn mark(&self, delivery: &mut Delivery) {
        delivery.order.push(self.index);
    }
}

fn count(delivery: &mut Delivery) {
    delivery.order.push(usize::MAX);
}

proptest! {
    #[test]
    fn delivery_follows_priority_then_subscription_order(
        levels in proptest::collection::vec(0..Priority::ALL.len(), 0..48)
    ) {
        let bus = LocalEventBus::new();
        let markers: Vec<_> = (0..levels.len()).map(|index| Arc::new(Marker { index })).collect();
        for (marker, level) in markers.iter().zip(&levels) {
            bus.subscribe_with_priority(make_method(marker, Marker::mark), Priority::ALL[*level]);
        }

        let mut delivery = Delivery::default();
        let delivered = bus.publish(&mut delivery);
        prop_assert_eq!(delivered, !levels.is_empty());

        let mut expected: Vec<usize> = (0..levels.len()).collect();
        expected.sort_by_key(|&index| Reverse(levels[index]));
        prop_assert_eq!(delivery.order, expected);
    }

    #[test]
    fn each_unsubscribe_removes_one_duplicate(copies in 1usize..16, removals in 0usize..20) {
        let bus = SharedEventBus::new();
        for _ in 0..copies {
            bus.subscribe(make_func(count));
        }
        for _ in 0..removals {
            prop_assert!(bus.unsubscribe(&make_func(count)));
        }

        let remaining = copies.saturating_sub(removals);
        prop_assert_eq!(bus.subscriber_count::<Delivery>(), remaining);

        let mut delivery = Delivery::default();
        prop_assert!(bus.publish(&mut delivery));
        prop_assert_eq!(delivery.order.len(), remaining);
    }
}
