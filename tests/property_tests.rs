//! Property tests for peer lookup and event ordering.

use proptest::prelude::*;

use stand_gateway::bluetooth::{find_peer_by_name, Peer};
use stand_gateway::EventBus;

fn peer_set() -> impl Strategy<Value = Vec<Peer>> {
    let names = prop::sample::select(vec!["StandController", "OtherDevice", "Speaker", "Phone"]);
    proptest::collection::vec(names, 0..8).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Peer::new(name, format!("00:00:00:00:00:{:02X}", i)))
            .collect()
    })
}

proptest! {
    /// Lookup returns a peer iff one carries the name, and it is the first.
    #[test]
    fn lookup_matches_linear_scan(
        peers in peer_set(),
        target in prop::sample::select(vec!["StandController", "OtherDevice", "Missing"]),
    ) {
        let expected = peers.iter().position(|p| p.name == target);
        let found = find_peer_by_name(&peers, target);

        match (expected, found) {
            (None, None) => {}
            (Some(index), Some(peer)) => {
                prop_assert_eq!(peer.name.as_str(), target);
                prop_assert_eq!(peer, &peers[index]);
            }
            (expected, found) => {
                prop_assert!(false, "expected {:?}, found {:?}", expected, found);
            }
        }
    }

    /// Every subscriber sees exactly the published sequence.
    #[test]
    fn bus_preserves_publish_order(texts in proptest::collection::vec("[a-z]{1,8}", 0..32)) {
        let bus = EventBus::new();
        let (_sub, rx) = bus.subscribe_channel();

        for text in &texts {
            bus.publish(text.as_str());
        }

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event.text().to_string());
        }
        prop_assert_eq!(received, texts);
    }
}
